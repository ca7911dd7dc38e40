use std::path::PathBuf;
use std::process::ExitCode;

use farm_viewer::ViewerConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: farm-viewer <replay.jsonl>";

pub(crate) struct AppWiring {
    pub(crate) config: ViewerConfig,
    pub(crate) replay_path: PathBuf,
}

pub(crate) fn build_app() -> Result<AppWiring, ExitCode> {
    init_tracing();
    info!("=== Farm Viewer Startup ===");

    let Some(replay_path) = parse_replay_path(std::env::args().skip(1)) else {
        error!(usage = USAGE, "missing_replay_path");
        return Err(ExitCode::from(2));
    };

    let config = match ViewerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "config_load_failed");
            return Err(ExitCode::FAILURE);
        }
    };
    info!(
        frames_per_snapshot = config.frames_per_snapshot,
        ring_radius = config.map.ring_radius,
        "config_ready"
    );

    Ok(AppWiring {
        config,
        replay_path,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_replay_path(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    args.next()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
