//! Convergence bookkeeping for the propagation loop.

/// Tracks the per-iteration total change and decides termination.
///
/// Pure bookkeeping: the engine records one diff per completed step and
/// asks whether the run is done. The recorded history stays available
/// for diagnostics.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    tol: f64,
    diffs: Vec<f64>,
}

impl ConvergenceMonitor {
    /// Creates a monitor with the given convergence tolerance.
    pub fn new(tol: f64) -> Self {
        Self {
            tol,
            diffs: Vec::new(),
        }
    }

    /// Records one iteration's total absolute change.
    ///
    /// Returns true if this diff is below tolerance.
    pub fn record(&mut self, diff: f64) -> bool {
        self.diffs.push(diff);
        diff < self.tol
    }

    /// True once a recorded diff has fallen below tolerance.
    pub fn has_converged(&self) -> bool {
        self.final_diff().is_some_and(|diff| diff < self.tol)
    }

    /// Number of iterations recorded so far.
    pub fn iterations(&self) -> usize {
        self.diffs.len()
    }

    /// The most recent diff, if any iteration has run.
    pub fn final_diff(&self) -> Option<f64> {
        self.diffs.last().copied()
    }

    /// The full diff sequence, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.diffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_until_below_tolerance() {
        let mut monitor = ConvergenceMonitor::new(1e-6);

        assert!(!monitor.record(0.5));
        assert!(!monitor.record(1e-6)); // strictly-below comparison
        assert!(monitor.record(9e-7));

        assert!(monitor.has_converged());
        assert_eq!(monitor.iterations(), 3);
        assert_eq!(monitor.final_diff(), Some(9e-7));
        assert_eq!(monitor.history(), &[0.5, 1e-6, 9e-7]);
    }

    #[test]
    fn test_fresh_monitor_has_not_converged() {
        let monitor = ConvergenceMonitor::new(1e-6);
        assert!(!monitor.has_converged());
        assert_eq!(monitor.iterations(), 0);
        assert_eq!(monitor.final_diff(), None);
    }
}
