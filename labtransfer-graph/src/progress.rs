use tracing::info;

/// Receives advisory progress: one step per processed section.
pub trait ProgressSink {
    fn start(&mut self, _total_steps: usize, _label: &str) {}

    fn step(&mut self, _label: &str) {}

    fn finish(&mut self) {}
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Logs every step at info level.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
}

impl LogProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn done(&self) -> usize {
        self.done
    }
}

impl ProgressSink for LogProgress {
    fn start(&mut self, total_steps: usize, label: &str) {
        self.total = total_steps;
        self.done = 0;
        info!("{} ({} steps)", label, total_steps);
    }

    fn step(&mut self, label: &str) {
        self.done += 1;
        info!("[{}/{}] {}", self.done, self.total, label);
    }
}
