// src/input.rs
// Parsing of submitted form fields into operands

use crate::arithmetic::Operation;
use crate::error::{CalcError, Field, Result};

/// Raw form submission. Both fields are optional so that a missing field
/// reports the same error as a malformed one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CalcForm {
    pub number1: Option<String>,
    pub number2: Option<String>,
}

impl CalcForm {
    pub fn new(number1: impl Into<String>, number2: impl Into<String>) -> Self {
        Self {
            number1: Some(number1.into()),
            number2: Some(number2.into()),
        }
    }

    /// Build from decoded `key=value` pairs. A repeated field keeps its
    /// first value; unrelated fields are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "number1" => &mut form.number1,
                "number2" => &mut form.number2,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }
}

/// Operands ready for evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operands {
    pub a: f64,
    pub b: f64,
}

/// Parse a single field. NaN and infinities are rejected.
pub fn parse_number(raw: Option<&str>, field: Field) -> Result<f64> {
    let value = raw
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or(CalcError::InvalidNumberFormat(field))?;

    if !value.is_finite() {
        return Err(CalcError::InvalidNumberFormat(field));
    }
    Ok(value)
}

/// Parse the fields `operation` needs. The first field is checked first;
/// `square` never looks at `number2` and records it as 0.
pub fn parse_operands(form: &CalcForm, operation: Operation) -> Result<Operands> {
    let a = parse_number(form.number1.as_deref(), Field::First)?;
    let b = if operation.is_binary() {
        parse_number(form.number2.as_deref(), Field::Second)?
    } else {
        0.0
    };
    Ok(Operands { a, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(result: Result<Operands>) -> Option<Field> {
        match result {
            Err(CalcError::InvalidNumberFormat(field)) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_parse_valid_numbers() {
        let form = CalcForm::new("10", "-2.5e1");
        let operands = parse_operands(&form, Operation::Add).unwrap();
        assert_eq!(operands, Operands { a: 10.0, b: -25.0 });
    }

    #[test]
    fn test_parse_first_field_fails() {
        let form = CalcForm::new("abc", "5");
        assert_eq!(invalid_field(parse_operands(&form, Operation::Multiply)), Some(Field::First));
    }

    #[test]
    fn test_parse_second_field_fails() {
        let form = CalcForm::new("5", "five");
        assert_eq!(invalid_field(parse_operands(&form, Operation::Divide)), Some(Field::Second));
    }

    #[test]
    fn test_first_field_reported_before_second() {
        let form = CalcForm::new("x", "y");
        assert_eq!(invalid_field(parse_operands(&form, Operation::Subtract)), Some(Field::First));
    }

    #[test]
    fn test_missing_fields() {
        let form = CalcForm::default();
        assert_eq!(invalid_field(parse_operands(&form, Operation::Add)), Some(Field::First));

        let form = CalcForm {
            number1: Some("1".into()),
            number2: None,
        };
        assert_eq!(invalid_field(parse_operands(&form, Operation::Add)), Some(Field::Second));
    }

    #[test]
    fn test_empty_and_padded_input_rejected() {
        assert!(parse_number(Some(""), Field::First).is_err());
        assert!(parse_number(Some(" 4"), Field::First).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "Infinity"] {
            assert!(
                parse_number(Some(raw), Field::First).is_err(),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let pairs = [("number1", "10"), ("number1", "3"), ("other", "x"), ("number2", "5")]
            .map(|(k, v)| (k.to_string(), v.to_string()));
        assert_eq!(CalcForm::from_pairs(pairs), CalcForm::new("10", "5"));
        assert_eq!(CalcForm::from_pairs(Vec::new()), CalcForm::default());
    }

    #[test]
    fn test_square_ignores_second_field() {
        let form = CalcForm {
            number1: Some("3".into()),
            number2: Some("not a number".into()),
        };
        let operands = parse_operands(&form, Operation::Square).unwrap();
        assert_eq!(operands, Operands { a: 3.0, b: 0.0 });
    }
}
