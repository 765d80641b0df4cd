use crate::bus::{BusEvent, MessageBus};
use avsim_neon_core::{BrokerConfig, CoreError, CoreResult};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cloneable handle to the broker session. Requests are queued on the
/// client without waiting for the network.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
}

impl MessageBus for MqttBus {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn publish(&self, topic: &str, payload: Vec<u8>) -> CoreResult<()> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| CoreError::Bus(e.to_string()))
    }

    fn subscribe(&self, topic: &str) -> CoreResult<()> {
        self.client
            .try_subscribe(topic, QoS::AtMostOnce)
            .map_err(|e| CoreError::Bus(e.to_string()))
    }
}

/// Owns the broker connection and its background I/O task.
pub struct Connection {
    bus: MqttBus,
    task: JoinHandle<()>,
}

impl Connection {
    /// Starts connecting in the background. Must be called inside a tokio
    /// runtime. `topics` are subscribed at QoS 0 on every successful connect.
    pub fn open(cfg: &BrokerConfig, topics: Vec<String>, events: mpsc::Sender<BusEvent>) -> Self {
        let mut options = MqttOptions::new(cfg.client_id.clone(), cfg.host.clone(), cfg.port);
        options.set_keep_alive(cfg.keepalive());
        options.set_clean_session(cfg.clean_session);

        let (client, eventloop) = AsyncClient::new(options, cfg.request_capacity);
        let bus = MqttBus {
            client,
            connected: Arc::new(AtomicBool::new(false)),
        };
        tracing::info!(host = %cfg.host, port = cfg.port, "connecting to broker");
        let task = tokio::spawn(run(eventloop, bus.clone(), topics, events, cfg.retry_delay()));
        Self { bus, task }
    }

    pub fn bus(&self) -> MqttBus {
        self.bus.clone()
    }

    /// Sends DISCONNECT and stops the background task.
    pub async fn close(self) {
        if let Err(e) = self.bus.client.try_disconnect() {
            tracing::debug!(error = %e, "disconnect request not queued");
        }
        // Give the event loop a moment to flush the DISCONNECT packet.
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.bus.connected.store(false, Ordering::SeqCst);
        self.task.abort();
        let _ = self.task.await;
        tracing::info!("broker connection closed");
    }
}

/// Subscribes every topic at QoS 0. Subscribing twice is harmless: the
/// broker keeps one subscription per topic filter.
pub fn resubscribe(bus: &dyn MessageBus, topics: &[String]) -> usize {
    let mut queued = 0;
    for topic in topics {
        match bus.subscribe(topic) {
            Ok(()) => queued += 1,
            Err(e) => tracing::warn!(topic = %topic, error = %e, "subscribe failed"),
        }
    }
    queued
}

async fn run(
    mut eventloop: EventLoop,
    bus: MqttBus,
    topics: Vec<String>,
    events: mpsc::Sender<BusEvent>,
    retry_delay: Duration,
) {
    loop {
        let event = match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                bus.connected.store(true, Ordering::SeqCst);
                resubscribe(&bus, &topics);
                BusEvent::Connected {
                    code: format!("{:?}", ack.code),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => BusEvent::Message {
                topic: publish.topic,
                payload: publish.payload.to_vec(),
            },
            Ok(Event::Incoming(Packet::Disconnect)) => {
                bus.connected.store(false, Ordering::SeqCst);
                BusEvent::Disconnected {
                    reason: "broker sent disconnect".to_string(),
                }
            }
            Ok(_) => continue,
            Err(e) => {
                let was_connected = bus.connected.swap(false, Ordering::SeqCst);
                // The next poll reconnects; pause so a dead broker is not hammered.
                tokio::time::sleep(retry_delay).await;
                if !was_connected {
                    tracing::debug!(error = %e, "broker not reachable, retrying");
                    continue;
                }
                tracing::warn!(error = %e, "broker connection lost");
                BusEvent::Disconnected {
                    reason: e.to_string(),
                }
            }
        };
        if events.send(event).await.is_err() {
            tracing::debug!("event receiver dropped, stopping broker loop");
            break;
        }
    }
}
