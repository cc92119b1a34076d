// src/db/validator.rs
// Evaluation of `$jsonSchema` collection validators for the in-memory backend
//
// Only the subset schema setup emits is understood: top-level `required`
// and per-property `bsonType` (a single name or a list of names).

use mongodb::bson::{Bson, Document};

use crate::error::StoreError;

/// Check `document` against a `{ "$jsonSchema": { ... } }` validator
pub fn validate(validator: &Document, document: &Document) -> Result<(), StoreError> {
    let Ok(schema) = validator.get_document("$jsonSchema") else {
        return Ok(());
    };

    if let Ok(required) = schema.get_array("required") {
        for field in required.iter().filter_map(Bson::as_str) {
            if !document.contains_key(field) {
                return Err(StoreError::Validation(format!(
                    "missing required field `{}`",
                    field
                )));
            }
        }
    }

    if let Ok(properties) = schema.get_document("properties") {
        for (field, rules) in properties {
            let (Some(value), Some(rules)) = (document.get(field), rules.as_document()) else {
                continue;
            };
            let Some(expected) = rules.get("bsonType") else {
                continue;
            };

            if !type_allowed(expected, value) {
                return Err(StoreError::Validation(format!(
                    "field `{}` must be {}, got {}",
                    field,
                    describe_expected(expected),
                    bson_type_name(value)
                )));
            }
        }
    }

    Ok(())
}

fn type_allowed(expected: &Bson, value: &Bson) -> bool {
    match expected {
        Bson::String(name) => type_matches(name, value),
        Bson::Array(names) => names
            .iter()
            .filter_map(Bson::as_str)
            .any(|name| type_matches(name, value)),
        _ => true,
    }
}

fn type_matches(name: &str, value: &Bson) -> bool {
    match name {
        "number" => matches!(
            value,
            Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_) | Bson::Decimal128(_)
        ),
        other => bson_type_name(value) == other,
    }
}

fn describe_expected(expected: &Bson) -> String {
    match expected {
        Bson::String(name) => name.clone(),
        Bson::Array(names) => names
            .iter()
            .filter_map(Bson::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}

/// MongoDB alias for the value's BSON type
pub fn bson_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::Double(_) => "double",
        Bson::String(_) => "string",
        Bson::Document(_) => "object",
        Bson::Array(_) => "array",
        Bson::Boolean(_) => "bool",
        Bson::Null => "null",
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::DateTime(_) => "date",
        Bson::ObjectId(_) => "objectId",
        Bson::Decimal128(_) => "decimal",
        Bson::Timestamp(_) => "timestamp",
        Bson::Binary(_) => "binData",
        Bson::RegularExpression(_) => "regex",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{DateTime, doc};

    fn validator() -> Document {
        doc! {
            "$jsonSchema": {
                "bsonType": "object",
                "required": ["amount", "label"],
                "properties": {
                    "amount": { "bsonType": "double" },
                    "label": { "bsonType": "string" },
                    "at": { "bsonType": "date" },
                    "count": { "bsonType": ["int", "long"] },
                }
            }
        }
    }

    #[test]
    fn test_accepts_valid_document() {
        let document = doc! { "amount": 1.5, "label": "x", "at": DateTime::now(), "count": 3_i64 };
        assert!(validate(&validator(), &document).is_ok());
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let err = validate(&validator(), &doc! { "amount": 1.5 }).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref msg) if msg.contains("`label`")));
    }

    #[test]
    fn test_rejects_wrong_type() {
        let err = validate(&validator(), &doc! { "amount": "1.5", "label": "x" }).unwrap_err();
        let StoreError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("`amount`"));
        assert!(msg.contains("double"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn test_int_is_not_double() {
        assert!(validate(&validator(), &doc! { "amount": 2_i32, "label": "x" }).is_err());
    }

    #[test]
    fn test_type_list() {
        let ok = doc! { "amount": 1.0, "label": "x", "count": 2_i32 };
        assert!(validate(&validator(), &ok).is_ok());

        let bad = doc! { "amount": 1.0, "label": "x", "count": 2.0 };
        let err = validate(&validator(), &bad).unwrap_err();
        assert!(err.to_string().contains("int or long"));
    }

    #[test]
    fn test_no_schema_accepts_anything() {
        assert!(validate(&Document::new(), &doc! { "anything": true }).is_ok());
    }
}
