/// One recorded tableau state: the initial basis or the state after a pivot.
///
/// Every container is an independent copy of the engine's working state, so
/// later pivots cannot retroactively change a recorded step.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableauStep {
    /// Constraint-coefficient matrix in the current basis, one row per constraint.
    pub tableau: Vec<Vec<f64>>,
    /// Per-row basic variable column, `None` while the row has no basis yet.
    pub basic_variables: Vec<Option<usize>>,
    /// Objective row; the extra last slot holds the running objective value.
    pub objective_row: Vec<f64>,
    /// Objective coefficient minus objective-row contribution, per column.
    pub reduced_costs: Vec<f64>,
    /// Right-hand-side value per row.
    pub limits: Vec<f64>,
    /// Entering column of the pivot leaving from this step, `None` on the final step.
    pub entering_index: Option<usize>,
    /// Leaving row of the pivot leaving from this step, `None` on the final step.
    pub leaving_index: Option<usize>,
}

impl TableauStep {
    /// Records an independently-allocated copy of the engine's working state.
    pub fn record(
        tableau: &[Vec<f64>],
        basic_variables: &[Option<usize>],
        objective_row: &[f64],
        reduced_costs: &[f64],
        limits: &[f64],
    ) -> Self {
        Self {
            tableau: tableau.to_vec(),
            basic_variables: basic_variables.to_vec(),
            objective_row: objective_row.to_vec(),
            reduced_costs: reduced_costs.to_vec(),
            limits: limits.to_vec(),
            entering_index: None,
            leaving_index: None,
        }
    }

    /// Running objective value, the last slot of the objective row.
    pub fn objective_value(&self) -> f64 {
        self.objective_row.last().copied().unwrap_or(0.0)
    }
}

/// How a solve run ended.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    /// Full basis and every reduced cost within tolerance.
    Optimal,
    /// The program had no constraints; nothing to trace.
    NoConstraints,
    /// The iteration cap was hit before optimality; the trace is partial.
    IterationCapExceeded,
    /// A zero pivot element was encountered; the trace is partial.
    DegeneratePivot,
    /// The ratio test found no leaving row; the trace is partial.
    Failed,
}

/// Ordered sequence of tableau steps plus the terminal engine state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub status: TraceStatus,
    pub steps: Vec<TableauStep>,
}

impl Trace {
    pub fn is_optimal(&self) -> bool {
        self.status == TraceStatus::Optimal
    }

    pub fn final_step(&self) -> Option<&TableauStep> {
        self.steps.last()
    }
}
