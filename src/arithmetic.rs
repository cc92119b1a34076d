// src/arithmetic.rs
// The five supported operations and their evaluation

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Arithmetic operation, stored by its lowercase name
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Square,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Whether the operation reads a second operand
    pub fn is_binary(&self) -> bool {
        !matches!(self, Operation::Square)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Square => "²",
        }
    }

    /// Evaluate with the given operands. `b` is ignored by `square`.
    pub fn evaluate(&self, a: f64, b: f64) -> Result<f64> {
        match self {
            Operation::Add => Ok(add(a, b)),
            Operation::Subtract => Ok(subtract(a, b)),
            Operation::Multiply => Ok(multiply(a, b)),
            Operation::Divide => divide(a, b),
            Operation::Square => Ok(square(a)),
        }
    }

    /// Human-readable form of the invocation, e.g. `10.0 * 5.0` or `3.0²`
    pub fn describe(&self, a: f64, b: f64) -> String {
        match self {
            Operation::Square => format!("{}{}", format_number(a), self.symbol()),
            _ => format!(
                "{} {} {}",
                format_number(a),
                self.symbol(),
                format_number(b)
            ),
        }
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Fails for any zero divisor, including `-0.0`
pub fn divide(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn square(a: f64) -> f64 {
    a * a
}

/// Shortest round-trip rendering that always keeps a fractional part
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}
