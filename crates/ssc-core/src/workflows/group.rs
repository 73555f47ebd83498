use crate::core::models::peaklist::PeakList;
use crate::core::models::tolerance::ToleranceMap;
use crate::engine::config::GroupingConfig;
use crate::engine::dbscan::Dbscan;
use crate::engine::error::EngineError;
use crate::engine::oracle::{DimensionRoles, RegistrationOracle, RegistrationRequest};
use crate::engine::policy::{MonotonicPolicy, TolerancePolicy};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::registry::ClusterRegistry;
use crate::engine::state::RefinementState;
use tracing::{debug, info, instrument, warn};

/// Why the refinement loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last pass left no peak in the noise bucket.
    AllPeaksClustered,
    /// A tolerance reached the cutoff before the next pass.
    ToleranceOutOfRange,
    /// The configured number of steps was exhausted.
    StepLimit,
}

#[derive(Debug, Clone)]
pub struct GroupingOutcome {
    /// Number of clustering passes that ran.
    pub passes: usize,
    pub stop: StopReason,
    /// Tolerances of the last clustering pass.
    pub tolerances: ToleranceMap,
    /// Peaks still unclustered when the loop ended.
    pub unclustered: PeakList,
}

/// Groups `peaklist` into spin systems with the default [`MonotonicPolicy`].
///
/// Clusters of every pass are stored in `registry`; the caller serializes it
/// once the run returns.
pub fn run<O: RegistrationOracle + ?Sized>(
    peaklist: &PeakList,
    config: &GroupingConfig,
    oracle: &O,
    registry: &mut ClusterRegistry,
    reporter: &ProgressReporter,
) -> Result<GroupingOutcome, EngineError> {
    run_with_policy(peaklist, config, oracle, &MonotonicPolicy, registry, reporter)
}

/// Alternates registration and clustering passes over the still-unclustered
/// peaks until every peak is clustered, a tolerance leaves its valid range or
/// the step budget runs out.
///
/// # Errors
///
/// Returns [`EngineError::UnregistrableInput`] when the first registration
/// yields nothing usable or a tolerance at or above the cutoff. Nothing is
/// written to `registry` in that case.
#[instrument(skip_all, name = "grouping_workflow", fields(peaks = peaklist.len()))]
pub fn run_with_policy<O, P>(
    peaklist: &PeakList,
    config: &GroupingConfig,
    oracle: &O,
    policy: &P,
    registry: &mut ClusterRegistry,
    reporter: &ProgressReporter,
) -> Result<GroupingOutcome, EngineError>
where
    O: RegistrationOracle + ?Sized,
    P: TolerancePolicy + ?Sized,
{
    let dbscan = Dbscan::new(config.min_points, config.probability)?;

    let mut working = if config.filters.is_empty() {
        peaklist.clone()
    } else {
        let filtered = peaklist.filtered(&config.filters);
        info!(
            kept = filtered.len(),
            dropped = peaklist.len() - filtered.len(),
            "Applied chemical-shift filters."
        );
        filtered
    };
    let roles = DimensionRoles::anonymize(working.labels(), &config.root_dimensions);
    debug!(input = ?roles.input, root = ?roles.root, "Dimension roles for registration.");

    let mut state = RefinementState::new();
    let mut passes = 0;
    let mut stop = StopReason::StepLimit;

    for step in 0..config.max_steps {
        let was_registering = state.using_registration;
        state.enter_step(step, config.max_registration_steps);
        if was_registering && !state.using_registration {
            info!(step, "Registration step budget exhausted; switching to tolerance inflation.");
            reporter.message(format!(
                "Registration budget exhausted at step {}; inflating tolerances",
                step + 1
            ));
        }
        reporter.report(Progress::StepStart {
            step: step + 1,
            max_steps: config.max_steps,
        });

        // === Registration ===
        let fresh = if state.using_registration {
            reporter.report(Progress::PhaseStart {
                name: "Registration",
            });
            let estimate = oracle
                .register(&RegistrationRequest {
                    input: &working,
                    root: &working,
                    roles: &roles,
                })
                .filter(|stds| !stds.is_empty());
            reporter.report(Progress::PhaseFinish);
            estimate
        } else {
            None
        };

        if step == 0 {
            match &fresh {
                None => {
                    return Err(EngineError::UnregistrableInput {
                        reason: "registration produced no estimate".to_string(),
                    });
                }
                Some(stds) if stds.any_at_or_above(config.std_cutoff) => {
                    return Err(EngineError::UnregistrableInput {
                        reason: format!(
                            "initial standard deviations {:?} are not all below {}",
                            stds, config.std_cutoff
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        // === Tolerance Update ===
        match fresh {
            Some(stds) => {
                state.history.record(&stds);
                state.current = policy.refine(&state.previous, &stds);
            }
            None => {
                if state.using_registration {
                    warn!(step, "Registration unavailable; switching to tolerance inflation.");
                    reporter.message(format!(
                        "Registration unavailable at step {}; inflating tolerances",
                        step + 1
                    ));
                    state.using_registration = false;
                }
                state.current = policy.inflate(&state.current, &state.history);
            }
        }
        info!(step, tolerances = ?state.current, "Tolerances for this pass.");

        if state.current.any_at_or_above(config.std_cutoff) {
            info!(step, cutoff = config.std_cutoff, "Tolerance out of range; stopping.");
            reporter.message(format!(
                "Tolerances reached the cutoff of {}; stopping refinement",
                config.std_cutoff
            ));
            stop = StopReason::ToleranceOutOfRange;
            break;
        }

        // === Clustering ===
        reporter.report(Progress::PhaseStart { name: "Clustering" });
        let pass = dbscan.run(&working, &state.current, registry)?;
        reporter.report(Progress::PhaseFinish);
        passes += 1;
        state.commit();

        reporter.report(Progress::PassFinish {
            clusters: pass.clusters.len(),
            unclustered: pass.noise.len(),
        });
        working = working.select(&pass.noise);

        if working.is_empty() {
            stop = StopReason::AllPeaksClustered;
            break;
        }
    }

    info!(
        passes,
        clusters = registry.len(),
        unclustered = working.len(),
        stop = ?stop,
        "Grouping finished."
    );
    Ok(GroupingOutcome {
        passes,
        stop,
        tolerances: state.previous,
        unclustered: working,
    })
}
