// SPDX-License-Identifier: MIT OR Apache-2.0
//! Progress reporting for long serializations.
//!
//! A serialization runs in phases (nodes, edges, groups). Notifiers are
//! purely observational: they cannot change or abort the operation.

/// Receives serialization progress
#[allow(unused_variables)]
pub trait ProgressNotifier {
    /// A serialization starts
    fn begin_progress(&mut self) {}

    /// Number of phases of the current serialization
    fn set_phase_count(&mut self, count: usize) {}

    /// A new phase starts
    fn begin_phase(&mut self, name: &str) {}

    /// Progress inside the current phase, between 0.0 and 1.0
    fn set_phase_progress(&mut self, progress: f64) {}

    /// The serialization is over
    fn end_progress(&mut self) {}
}

/// Notifier ignoring every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidProgress;

impl ProgressNotifier for VoidProgress {}

/// Notifier logging phases through `tracing`
#[derive(Debug, Default, Clone)]
pub struct TracingProgress {
    phase_count: usize,
    phase: usize,
    phase_name: String,
}

impl TracingProgress {
    /// Create a notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Overall progress between 0.0 and 1.0, given the progress of the current phase
    pub fn overall(&self, phase_progress: f64) -> f64 {
        if self.phase_count == 0 {
            return phase_progress.clamp(0.0, 1.0);
        }
        let done = self.phase.saturating_sub(1) as f64;
        ((done + phase_progress.clamp(0.0, 1.0)) / self.phase_count as f64).min(1.0)
    }
}

impl ProgressNotifier for TracingProgress {
    fn begin_progress(&mut self) {
        self.phase = 0;
        self.phase_name.clear();
        tracing::debug!("Serialization started");
    }

    fn set_phase_count(&mut self, count: usize) {
        self.phase_count = count;
    }

    fn begin_phase(&mut self, name: &str) {
        self.phase += 1;
        self.phase_name = name.to_string();
        tracing::info!("{name} ({}/{})", self.phase, self.phase_count);
    }

    fn set_phase_progress(&mut self, progress: f64) {
        tracing::trace!(phase = %self.phase_name, "{:.0}%", self.overall(progress) * 100.0);
    }

    fn end_progress(&mut self) {
        tracing::debug!("Serialization finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_progress() {
        let mut progress = TracingProgress::new();
        assert_eq!(progress.overall(0.5), 0.5);

        progress.begin_progress();
        progress.set_phase_count(2);
        progress.begin_phase("first");
        assert_eq!(progress.overall(0.5), 0.25);
        progress.begin_phase("second");
        assert_eq!(progress.overall(1.0), 1.0);
        assert_eq!(progress.overall(3.0), 1.0);
    }
}
