use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sander::engine::progress::{Progress, ProgressCallback};
use std::sync::Mutex;
use std::time::Duration;

/// Setup, evaluation and cleanup.
const SINGLE_POINT_PHASES: u64 = 3;
const TICK_MS: u64 = 80;

/// Renders a single-point run as one `[n/3]` step bar on stderr.
///
/// The last status message reported during the run (the total energy) becomes the
/// bar's closing line once every phase has finished.
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(SINGLE_POINT_PHASES), target)
            .with_style(step_style());
        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        let status: Mutex<Option<String>> = Mutex::new(None);

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                pb.enable_steady_tick(Duration::from_millis(TICK_MS));
                pb.set_message(name);
            }
            Progress::PhaseFinish => {
                pb.inc(1);
                if pb.position() >= SINGLE_POINT_PHASES {
                    let summary = status
                        .lock()
                        .ok()
                        .and_then(|mut s| s.take())
                        .unwrap_or_else(|| "Done".to_string());
                    pb.finish_with_message(format!("✓ {summary}"));
                }
            }
            Progress::Message(msg) => {
                if let Ok(mut s) = status.lock() {
                    *s = Some(msg);
                }
            }
        })
    }
}

fn step_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
