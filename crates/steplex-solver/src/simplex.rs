use log::{debug, error, warn};

use crate::problem::LinearProgram;
use crate::trace::{TableauStep, Trace, TraceStatus};

/// Step-tracing simplex engine for upper-bounded maximization problems.
///
/// `solve` is a pure function of its input: the engine owns all working
/// state for the duration of the call and records a deep snapshot of the
/// tableau after the initial basis and after every pivot.
pub struct Solver {
    /// Maximum pivot iterations before giving up
    max_iterations: usize,
    /// Reduced costs at or below this are treated as non-improving
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            tolerance: 0.009,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Runs the simplex method and returns every intermediate tableau state,
    /// from the initial basis to termination.
    pub fn solve(&self, program: &LinearProgram) -> Trace {
        if program.num_constraints() == 0 {
            error!("no constraints defined");
            return Trace {
                status: TraceStatus::NoConstraints,
                steps: Vec::new(),
            };
        }

        let mut tableau = Tableau::build(program);
        let mut steps = vec![tableau.snapshot()];

        let status = self.iterate(program, &mut tableau, &mut steps);
        Trace { status, steps }
    }

    fn iterate(
        &self,
        program: &LinearProgram,
        tableau: &mut Tableau,
        steps: &mut Vec<TableauStep>,
    ) -> TraceStatus {
        let coefficients = program.objective().coefficients();
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.max_iterations {
                warn!(
                    "iteration cap of {} reached before optimality",
                    self.max_iterations
                );
                return TraceStatus::IterationCapExceeded;
            }

            let missing_base = tableau.first_missing_base();

            if missing_base.is_none()
                && tableau.reduced_costs.iter().all(|&diff| diff <= self.tolerance)
            {
                debug!("optimal solution found after {} pivots", iteration - 1);
                return TraceStatus::Optimal;
            }

            let (entering, leaving) = if let Some(row) = missing_base {
                // Repair: give the first basis-less row the first column not
                // already used as a basic variable. No ratio test here.
                debug!("missing basic variable at row {}", row);
                (tableau.first_unused_column(), row)
            } else {
                let Some(entering) = tableau.select_entering() else {
                    debug!("no entering candidate among reduced costs");
                    return TraceStatus::Optimal;
                };
                let Some(leaving) = tableau.select_leaving(entering) else {
                    error!("ratio test found no leaving row for column {}", entering);
                    return TraceStatus::Failed;
                };
                (entering, leaving)
            };

            let pivot = tableau.data[leaving][entering];
            if pivot == 0.0 {
                error!(
                    "zero pivot element at row {}, column {}",
                    leaving, entering
                );
                return TraceStatus::DegeneratePivot;
            }

            debug!(
                "pivoting on {} at row {}, column {}",
                pivot, leaving, entering
            );
            tableau.pivot(leaving, entering);
            tableau.refresh_objective(coefficients);

            // The previous step records the pivot that produced this one.
            if let Some(previous) = steps.last_mut() {
                previous.entering_index = Some(entering);
                previous.leaving_index = Some(leaving);
            }
            steps.push(tableau.snapshot());
        }
    }
}

/// Engine-internal working state: the dense matrix plus the derived rows.
struct Tableau {
    data: Vec<Vec<f64>>,
    limits: Vec<f64>,
    basic_vars: Vec<Option<usize>>,
    objective_row: Vec<f64>,
    reduced_costs: Vec<f64>,
    n_vars: usize,
}

impl Tableau {
    fn build(program: &LinearProgram) -> Self {
        let n_vars = program.num_variables();
        let n_constraints = program.num_constraints();

        let mut data = vec![vec![0.0; n_vars]; n_constraints];
        let mut limits = vec![0.0; n_constraints];
        for (i, constraint) in program.constraints().iter().enumerate() {
            data[i].copy_from_slice(constraint.coefficients());
            limits[i] = constraint.limit();
        }

        // A column is a unit column when exactly one row holds 1 and every
        // other row holds 0; its row gets the column as basic variable
        // unless an earlier column already claimed that row.
        let mut basic_vars = vec![None; n_constraints];
        for col in 0..n_vars {
            let mut one_row = None;
            let mut is_unit = true;
            for (row, values) in data.iter().enumerate() {
                if values[col] == 1.0 {
                    if one_row.is_some() {
                        is_unit = false;
                        break;
                    }
                    one_row = Some(row);
                } else if values[col] != 0.0 {
                    is_unit = false;
                }
            }
            if is_unit {
                if let Some(row) = one_row {
                    debug!("unit column {} found for row {}", col, row);
                    if basic_vars[row].is_none() {
                        basic_vars[row] = Some(col);
                    }
                }
            }
        }

        let mut tableau = Self {
            data,
            limits,
            basic_vars,
            objective_row: vec![0.0; n_vars + 1],
            reduced_costs: vec![0.0; n_vars],
            n_vars,
        };
        tableau.initial_objective(program.objective().coefficients());
        tableau
    }

    fn snapshot(&self) -> TableauStep {
        TableauStep::record(
            &self.data,
            &self.basic_vars,
            &self.objective_row,
            &self.reduced_costs,
            &self.limits,
        )
    }

    fn first_missing_base(&self) -> Option<usize> {
        self.basic_vars.iter().position(|base| base.is_none())
    }

    fn first_unused_column(&self) -> usize {
        for col in 0..self.n_vars {
            if !self.basic_vars.iter().any(|&base| base == Some(col)) {
                return col;
            }
        }
        // every column is already basic
        0
    }

    /// Column with the largest strictly positive reduced cost, first-seen on
    /// ties. Falls back to any non-zero reduced cost before reporting that
    /// no candidate exists.
    fn select_entering(&self) -> Option<usize> {
        let mut best = f64::NEG_INFINITY;
        let mut entering = None;
        for (col, &diff) in self.reduced_costs.iter().enumerate() {
            if diff > best && diff > 0.0 {
                best = diff;
                entering = Some(col);
            }
        }
        if entering.is_none() {
            for (col, &diff) in self.reduced_costs.iter().enumerate() {
                if diff > best && diff != 0.0 {
                    best = diff;
                    entering = Some(col);
                }
            }
        }
        entering
    }

    /// Minimum-ratio test over rows with a non-zero entry in the entering
    /// column and a non-negative ratio; when no row qualifies, a second scan
    /// takes the largest non-zero ratio instead.
    fn select_leaving(&self, entering: usize) -> Option<usize> {
        let mut smallest = f64::INFINITY;
        let mut leaving = None;
        for row in 0..self.limits.len() {
            let value = self.data[row][entering];
            if value != 0.0 {
                let ratio = self.limits[row] / value;
                if self.row_can_swap(row) && ratio < smallest && ratio >= 0.0 {
                    smallest = ratio;
                    leaving = Some(row);
                }
            }
        }

        if leaving.is_none() {
            let mut largest = f64::NEG_INFINITY;
            for row in 0..self.limits.len() {
                let value = self.data[row][entering];
                if value != 0.0 {
                    let ratio = self.limits[row] / value;
                    if self.row_can_swap(row) && ratio > largest && ratio != 0.0 {
                        largest = ratio;
                        leaving = Some(row);
                    }
                }
            }
        }

        leaving
    }

    // A row is ineligible to leave while its index appears as some row's
    // basic-variable value. The comparison really is row index against
    // variable column index.
    fn row_can_swap(&self, row: usize) -> bool {
        !self.basic_vars.iter().any(|&base| base == Some(row))
    }

    /// Gauss-Jordan elimination on the pivot position, limits included.
    fn pivot(&mut self, leaving: usize, entering: usize) {
        let pivot = self.data[leaving][entering];
        for value in self.data[leaving].iter_mut() {
            *value /= pivot;
        }
        self.limits[leaving] /= pivot;

        for row in 0..self.data.len() {
            if row != leaving {
                let factor = self.data[row][entering];
                for col in 0..self.n_vars {
                    self.data[row][col] -= factor * self.data[leaving][col];
                }
                self.limits[row] -= factor * self.limits[leaving];
            }
        }

        self.basic_vars[leaving] = Some(entering);
    }

    /// Objective row for the initial snapshot: plain column sums, nothing
    /// rounded and the value slot left at zero.
    fn initial_objective(&mut self, coefficients: &[f64]) {
        let mut row = vec![0.0; self.n_vars + 1];
        for (col, entry) in row.iter_mut().take(self.n_vars).enumerate() {
            *entry = self.column_sum(col, coefficients);
        }
        self.set_objective_row(row, coefficients);
    }

    /// Post-pivot objective row: every column sum and the objective value
    /// are rounded to 2 decimal places. The initial snapshot is not rounded;
    /// keep the asymmetry, downstream output depends on it.
    fn refresh_objective(&mut self, coefficients: &[f64]) {
        let mut row = vec![0.0; self.n_vars + 1];
        for (col, entry) in row.iter_mut().take(self.n_vars).enumerate() {
            *entry = round2(self.column_sum(col, coefficients));
        }

        let mut value = 0.0;
        for (row_index, base) in self.basic_vars.iter().enumerate() {
            if let Some(var) = base {
                value += self.limits[row_index] * coefficients[*var];
            }
        }
        row[self.n_vars] = round2(value);

        self.set_objective_row(row, coefficients);
    }

    /// Sum over rows of the tableau entry weighted by the basic variable's
    /// objective coefficient; rows without a basis contribute nothing.
    fn column_sum(&self, col: usize, coefficients: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (row, base) in self.basic_vars.iter().enumerate() {
            if let Some(var) = base {
                sum += self.data[row][col] * coefficients[*var];
            }
        }
        sum
    }

    fn set_objective_row(&mut self, row: Vec<f64>, coefficients: &[f64]) {
        self.objective_row = row;
        for col in 0..self.n_vars {
            self.reduced_costs[col] = coefficients[col] - self.objective_row[col];
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
