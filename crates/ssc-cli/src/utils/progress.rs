use indicatif::{ProgressBar, ProgressStyle};
use ssc::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders grouping progress as one bar advancing per refinement step.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::StepStart { step, max_steps } => {
                    if pb_guard.is_finished() {
                        pb_guard.reset();
                    }
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_length(max_steps as u64);
                    pb_guard.set_position(step.saturating_sub(1) as u64);
                    pb_guard.set_message(format!("Step {}/{}", step, max_steps));
                }
                Progress::PhaseStart { name } => {
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                }
                Progress::PassFinish {
                    clusters,
                    unclustered,
                } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!(
                        "  Pass complete: {} new cluster(s), {} peak(s) unclustered",
                        clusters, unclustered
                    ));
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    pub fn finish(&self) {
        if let Ok(pb_guard) = self.pb.lock() {
            pb_guard.disable_steady_tick();
            pb_guard.finish_with_message("✓ Done");
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg:<20} [{bar:30.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_steps_and_passes() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::StepStart {
            step: 1,
            max_steps: 10,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(10));
            assert_eq!(pb.position(), 0);
            assert_eq!(pb.message(), "Step 1/10");
            assert!(!pb.is_finished());
        }

        callback(Progress::PhaseStart {
            name: "Registration",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Registration");
        }

        callback(Progress::PhaseFinish);
        callback(Progress::PassFinish {
            clusters: 3,
            unclustered: 4,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 1);
        }

        callback(Progress::StepStart {
            step: 2,
            max_steps: 10,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 1);
            assert_eq!(pb.message(), "Step 2/10");
        }

        handler.finish();
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::StepStart {
                step: 1,
                max_steps: 2,
            });
            callback(Progress::PassFinish {
                clusters: 1,
                unclustered: 0,
            });
        })
        .join()
        .unwrap();

        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 1);
        }
        handler.finish();
        assert!(handler.pb.lock().unwrap().is_finished());
    }
}
