use anyhow::Context;
use avsim_neon_core::{logging::init_logging, CoreConfig};
use avsim_neon_mapi::{topics, Connection, ControlPanel, Dispatcher, LogHost};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Bus events waiting for the foreground loop.
const EVENT_QUEUE_CAPACITY: usize = 256;

#[derive(Parser, Debug)]
#[command(name = "avsim-neon")]
#[command(about = "Flame AVSim Neon control panel (MAPI control plane)")]
struct Args {
    /// Broker address
    #[arg(long)]
    broker: Option<String>,

    /// Broker port
    #[arg(long)]
    port: Option<u16>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Co-app shown in the liveness table; repeat for more rows
    #[arg(long = "peer")]
    peers: Vec<String>,

    /// Send a liveness probe every N seconds
    #[arg(long)]
    probe_interval: Option<u64>,
}

fn build_config(args: &Args) -> anyhow::Result<CoreConfig> {
    let mut cfg = match &args.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CoreConfig::default(),
    };
    if let Some(broker) = &args.broker {
        cfg.broker.host = broker.clone();
    }
    if let Some(port) = args.port {
        cfg.broker.port = port;
    }
    if !args.peers.is_empty() {
        cfg.app.peers = args.peers.clone();
    }
    if args.probe_interval.is_some() {
        cfg.app.probe_interval_secs = args.probe_interval;
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn next_probe(probe: &mut Option<Interval>) {
    match probe {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let cfg = build_config(&args)?;

    let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let subscriptions = Dispatcher::new(cfg.app.app_id.clone()).external_topics();
    let conn = Connection::open(&cfg.broker, subscriptions, tx);
    let mut panel = ControlPanel::new(&cfg, conn.bus(), LogHost);

    let mut probe = cfg
        .app
        .probe_interval_secs
        .filter(|secs| *secs > 0)
        .map(|secs| {
            let mut timer = interval(Duration::from_secs(secs));
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            timer
        });

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(
        app = panel.app_id(),
        peers = panel.peers().rows().len(),
        scenario_rows = panel.scenario().rows().len(),
        "control panel running"
    );

    // Row tables are only touched here, after an event has been dequeued.
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    panel.handle_event(event);
                }
                None => {
                    tracing::warn!("broker loop ended");
                    break;
                }
            },
            _ = next_probe(&mut probe) => {
                if let Err(e) = panel.trigger_internal(topics::REQUEST_ACTIVE) {
                    tracing::warn!(error = %e, "liveness probe failed");
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "signal handler failed");
                }
                tracing::info!("shutting down");
                break;
            }
        }
    }

    panel.end_process();
    conn.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_flag_overrides_default() {
        let args = Args::parse_from(["avsim-neon", "--broker", "192.168.0.10", "--peer", "robotA", "--peer", "robotB"]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.broker.host, "192.168.0.10");
        assert_eq!(cfg.broker.port, 1883);
        assert_eq!(cfg.app.peers, vec!["robotA", "robotB"]);
    }

    #[test]
    fn no_flags_uses_loopback() {
        let args = Args::parse_from(["avsim-neon"]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.broker.host, "127.0.0.1");
        assert!(cfg.app.probe_interval_secs.is_none());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["avsim-neon", "--config", "/nonexistent/avsim-neon.json"]);
        assert!(build_config(&args).is_err());
    }
}
