/// A sink for progress reports.
///
/// Reports are a side channel only, a sink never affects the outcome of a parse or a check.
/// Implementations must be `Sync` as entries may be parsed in parallel.
pub trait Progress: Sync {
    /// Reports a human-readable status message.
    fn message(&self, message: &str);

    /// Reports the start of a step processing `total` items.
    fn start(&self, total: u64) {
        let _ = total;
    }

    /// Reports that `delta` more items were processed.
    fn inc(&self, delta: u64) {
        let _ = delta;
    }

    /// Reports the end of the current step.
    fn finish(&self) {}
}

/// A progress sink which discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn message(&self, _message: &str) {}
}
