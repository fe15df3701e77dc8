use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("variable count must be at least 1, got {0}")]
    InvalidDimension(usize),
    #[error("constraint coefficients cannot be empty")]
    EmptyCoefficients,
    #[error("expected {expected} coefficients, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Objective function: one real coefficient per decision variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveFunction {
    coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    /// All-zero objective over `variables` decision variables.
    pub fn new(variables: usize) -> Result<Self, ModelError> {
        if variables < 1 {
            return Err(ModelError::InvalidDimension(variables));
        }
        Ok(Self {
            coefficients: vec![0.0; variables],
        })
    }

    pub fn from_coefficients(coefficients: Vec<f64>) -> Result<Self, ModelError> {
        if coefficients.is_empty() {
            return Err(ModelError::InvalidDimension(0));
        }
        Ok(Self { coefficients })
    }

    /// Builds an objective from user-typed decimal strings.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self, ModelError> {
        Self::from_coefficients(parse_numbers(values)?)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Replaces the coefficients; the variable count cannot change.
    pub fn set_coefficients(&mut self, coefficients: Vec<f64>) -> Result<(), ModelError> {
        check_len(self.coefficients.len(), coefficients.len())?;
        self.coefficients = coefficients;
        Ok(())
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Weighted sum of a candidate assignment.
    pub fn evaluate(&self, variables: &[f64]) -> Result<f64, ModelError> {
        weighted_sum(&self.coefficients, variables)
    }
}

/// A single `Σ coeff[i]·x[i] <= limit` constraint.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    coefficients: Vec<f64>,
    limit: f64,
}

impl Constraint {
    pub fn new(coefficients: Vec<f64>, limit: f64) -> Result<Self, ModelError> {
        if coefficients.is_empty() {
            return Err(ModelError::EmptyCoefficients);
        }
        Ok(Self { coefficients, limit })
    }

    /// All-zero constraint row, the starting point for a user-edited row.
    pub fn zeroed(variables: usize) -> Result<Self, ModelError> {
        if variables < 1 {
            return Err(ModelError::EmptyCoefficients);
        }
        Ok(Self {
            coefficients: vec![0.0; variables],
            limit: 0.0,
        })
    }

    /// Builds a constraint from user-typed decimal strings.
    pub fn parse<S: AsRef<str>>(values: &[S], limit: &str) -> Result<Self, ModelError> {
        Self::new(parse_numbers(values)?, parse_number(limit)?)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// True when the weighted sum of the assignment stays within the limit.
    pub fn is_satisfied(&self, variables: &[f64]) -> Result<bool, ModelError> {
        Ok(weighted_sum(&self.coefficients, variables)? <= self.limit)
    }
}

/// A maximization problem: one objective plus an ordered list of
/// upper-bound constraints over the same variables.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    objective: ObjectiveFunction,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    /// Empty program with an all-zero objective over `variables` variables.
    pub fn new(variables: usize) -> Result<Self, ModelError> {
        Ok(Self {
            objective: ObjectiveFunction::new(variables)?,
            constraints: Vec::new(),
        })
    }

    pub fn with_objective(objective: ObjectiveFunction) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn objective(&self) -> &ObjectiveFunction {
        &self.objective
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>) -> Result<(), ModelError> {
        self.objective.set_coefficients(coefficients)
    }

    /// Appends a constraint; its width must match the objective's.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        check_len(self.num_variables(), constraint.coefficients.len())?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Removes and returns the constraint at `index`, if it exists.
    pub fn remove_constraint(&mut self, index: usize) -> Option<Constraint> {
        if index < self.constraints.len() {
            Some(self.constraints.remove(index))
        } else {
            None
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// True when every constraint is satisfied by the assignment.
    pub fn is_feasible(&self, variables: &[f64]) -> Result<bool, ModelError> {
        for constraint in &self.constraints {
            if !constraint.is_satisfied(variables)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn check_len(expected: usize, found: usize) -> Result<(), ModelError> {
    if expected != found {
        return Err(ModelError::LengthMismatch { expected, found });
    }
    Ok(())
}

fn weighted_sum(coefficients: &[f64], variables: &[f64]) -> Result<f64, ModelError> {
    check_len(coefficients.len(), variables.len())?;
    Ok(coefficients
        .iter()
        .zip(variables)
        .map(|(coeff, value)| coeff * value)
        .sum())
}

fn parse_number(text: &str) -> Result<f64, ModelError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ModelError::InvalidNumber(text.to_string()))
}

fn parse_numbers<S: AsRef<str>>(values: &[S]) -> Result<Vec<f64>, ModelError> {
    values.iter().map(|v| parse_number(v.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_rejects_zero_variables() {
        assert_eq!(
            ObjectiveFunction::new(0),
            Err(ModelError::InvalidDimension(0))
        );
        assert_eq!(
            ObjectiveFunction::from_coefficients(Vec::new()),
            Err(ModelError::InvalidDimension(0))
        );
    }

    #[test]
    fn objective_evaluates_weighted_sum() {
        let objective = ObjectiveFunction::from_coefficients(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(objective.evaluate(&[1.0, 1.0, 1.0]).unwrap(), 6.0);
        assert_eq!(
            objective.evaluate(&[1.0, 1.0]),
            Err(ModelError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn set_coefficients_keeps_variable_count() {
        let mut objective = ObjectiveFunction::new(2).unwrap();
        objective.set_coefficients(vec![3.0, 4.0]).unwrap();
        assert_eq!(objective.coefficients(), &[3.0, 4.0]);
        assert!(objective.set_coefficients(vec![1.0]).is_err());
    }

    #[test]
    fn constraint_rejects_empty_coefficients() {
        assert_eq!(
            Constraint::new(Vec::new(), 1.0),
            Err(ModelError::EmptyCoefficients)
        );
        assert_eq!(Constraint::zeroed(0), Err(ModelError::EmptyCoefficients));
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        assert_eq!(
            Constraint::parse(&["1.5", "abc"], "6"),
            Err(ModelError::InvalidNumber("abc".to_string()))
        );
        assert_eq!(
            Constraint::parse(&["1.5", "2"], ""),
            Err(ModelError::InvalidNumber("".to_string()))
        );
        let parsed = Constraint::parse(&["1.5", " -2 "], "6.25").unwrap();
        assert_eq!(parsed.coefficients(), &[1.5, -2.0]);
        assert_eq!(parsed.limit(), 6.25);
    }

    #[test]
    fn objective_parses_decimal_strings() {
        let objective = ObjectiveFunction::parse(&["1", " 0.5 ", "-2"]).unwrap();
        assert_eq!(objective.coefficients(), &[1.0, 0.5, -2.0]);
        assert_eq!(
            ObjectiveFunction::parse(&["1", "x2"]),
            Err(ModelError::InvalidNumber("x2".to_string()))
        );
    }

    #[test]
    fn program_rejects_mismatched_constraint() {
        let mut program = LinearProgram::new(3).unwrap();
        let narrow = Constraint::new(vec![1.0, 2.0], 4.0).unwrap();
        assert_eq!(
            program.add_constraint(narrow),
            Err(ModelError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn remove_constraint_checks_index() {
        let mut program = LinearProgram::new(2).unwrap();
        program
            .add_constraint(Constraint::new(vec![1.0, 1.0], 4.0).unwrap())
            .unwrap();
        assert!(program.remove_constraint(1).is_none());
        assert!(program.remove_constraint(0).is_some());
        assert_eq!(program.num_constraints(), 0);
    }

    #[test]
    fn feasibility_checks_every_constraint() {
        // 2x1 + x2 - x3 + 2x4 <= 6
        let mut program = LinearProgram::new(4).unwrap();
        program
            .add_constraint(Constraint::new(vec![2.0, 1.0, -1.0, 2.0], 6.0).unwrap())
            .unwrap();

        assert!(program.is_feasible(&[1.0, 1.0, 1.0, 1.0]).unwrap());
        assert!(!program.is_feasible(&[10.0, 0.0, 0.0, 0.0]).unwrap());
        assert_eq!(
            program.is_feasible(&[1.0, 1.0]),
            Err(ModelError::LengthMismatch {
                expected: 4,
                found: 2
            })
        );
    }
}
