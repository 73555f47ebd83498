/// Events emitted by the grouping workflow while it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A refinement step begins (1-based).
    StepStart { step: usize, max_steps: usize },

    PhaseStart { name: &'static str },
    PhaseFinish,

    /// A clustering pass finished with this many new clusters and leftover peaks.
    PassFinish { clusters: usize, unclustered: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub fn message(&self, text: impl Into<String>) {
        self.report(Progress::Message(text.into()));
    }
}
