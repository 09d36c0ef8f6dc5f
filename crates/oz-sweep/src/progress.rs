use oz_solver::{SolverStatus, StatePoint};

/// Emitted once per finished sweep point.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepProgress {
    pub index: usize,
    pub completed: usize,
    pub total: usize,
    pub point: StatePoint,
    pub status: SolverStatus,
    pub iterations: usize,
}

impl SweepProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
