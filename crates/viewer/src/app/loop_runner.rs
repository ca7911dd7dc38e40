use std::process::ExitCode;

use engine::RecordingSink;
use farm_viewer::{load_replay, FarmMap, MapSnapshot};
use tracing::{debug, error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let snapshots = match load_replay(&app.replay_path) {
        Ok(snapshots) => snapshots,
        Err(err) => {
            error!(error = %err, "replay_load_failed");
            return ExitCode::FAILURE;
        }
    };

    let frames_per_snapshot = app.config.frames_per_snapshot;
    let mut map = FarmMap::new(app.config);
    let summary = replay(&mut map, &snapshots, frames_per_snapshot);
    info!(
        snapshots = summary.snapshots,
        frames = summary.frames,
        tokens = summary.tokens,
        farms = map.farms().len(),
        "replay_finished"
    );

    ExitCode::SUCCESS
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReplaySummary {
    snapshots: usize,
    frames: u64,
    tokens: u64,
}

fn replay(map: &mut FarmMap, snapshots: &[MapSnapshot], frames_per_snapshot: u32) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    let mut sink = RecordingSink::default();

    for snapshot in snapshots {
        map.apply(snapshot);
        let mut first_frame_tokens = 0;
        for frame in 0..frames_per_snapshot {
            sink.clear();
            map.draw(&mut sink);
            if frame == 0 {
                first_frame_tokens = sink.len();
            }
            summary.frames += 1;
            summary.tokens += sink.len() as u64;
        }
        debug!(
            snapshot = summary.snapshots,
            day = ?snapshot.day,
            first_frame_tokens,
            last_frame_tokens = sink.len(),
            "snapshot_replayed"
        );
        summary.snapshots += 1;
    }

    summary
}
