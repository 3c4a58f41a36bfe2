//! Declarative input validation.
//!
//! A [`Validatable`] pairs a value with the constraints it must satisfy. Only the
//! constraints that are present are checked, and only those applicable to the
//! value's kind: length bounds apply to text, numeric bounds apply to numbers.
//! `required` applies to both (numbers are checked via their textual form).
//!
//! Evaluation is a plain logical AND starting from "valid": a value with no
//! constraints is always valid.

use thiserror::Error;

/// The value under validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatableValue {
    Text(String),
    Number(f64),
}

impl ValidatableValue {
    /// Trimmed character count of the value's textual form.
    fn trimmed_len(&self) -> usize {
        match self {
            ValidatableValue::Text(s) => s.trim().chars().count(),
            ValidatableValue::Number(n) => n.to_string().trim().chars().count(),
        }
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("value is required")]
    Required,

    #[error("length {actual} is below the minimum of {min}")]
    MinLength { min: usize, actual: usize },

    #[error("length {actual} exceeds the maximum of {max}")]
    MaxLength { max: usize, actual: usize },

    #[error("{actual} is below the minimum of {min}")]
    Min { min: f64, actual: f64 },

    #[error("{actual} exceeds the maximum of {max}")]
    Max { max: f64, actual: f64 },
}

/// A value plus the constraints it is checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Validatable {
    pub value: ValidatableValue,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validatable {
    pub fn new(value: ValidatableValue) -> Self {
        Self {
            value,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(ValidatableValue::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        Self::new(ValidatableValue::Number(value))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Every present, applicable constraint the value fails, in declaration order.
    pub fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();

        if self.required && self.value.trimmed_len() == 0 {
            out.push(Violation::Required);
        }

        match &self.value {
            ValidatableValue::Text(_) => {
                let actual = self.value.trimmed_len();
                if let Some(min) = self.min_length {
                    if actual < min {
                        out.push(Violation::MinLength { min, actual });
                    }
                }
                if let Some(max) = self.max_length {
                    if actual > max {
                        out.push(Violation::MaxLength { max, actual });
                    }
                }
            }
            ValidatableValue::Number(actual) => {
                let actual = *actual;
                // NaN fails both bounds.
                if let Some(min) = self.min {
                    if actual.is_nan() || actual < min {
                        out.push(Violation::Min { min, actual });
                    }
                }
                if let Some(max) = self.max {
                    if actual.is_nan() || actual > max {
                        out.push(Violation::Max { max, actual });
                    }
                }
            }
        }

        out
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

/// Returns whether `input` satisfies all of its present constraints.
pub fn validate(input: &Validatable) -> bool {
    input.is_valid()
}
