//! Query-string encoding for typed filter structs.

use rcap_core::error::{RcapError, Result};
use serde::Serialize;
use serde_json::Value;

/// Flattens a filter struct into query pairs.
///
/// `null` fields are dropped, arrays repeat the key with a `[]` suffix, and
/// booleans and numbers use their JSON spelling.
pub fn to_query_pairs<Q: Serialize + ?Sized>(filters: &Q) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(filters)?;
    let object = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(object) => object,
        other => {
            return Err(RcapError::internal(format!(
                "Query filters must serialize to an object, got {}",
                other
            )));
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let array_key = format!("{}[]", key);
                for item in items {
                    if let Some(text) = scalar(&item) {
                        pairs.push((array_key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(&other) {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Filters {
        page: Option<u32>,
        status: Option<&'static str>,
        unread_only: Option<bool>,
        tags: Vec<u64>,
    }

    #[test]
    fn test_skips_none_and_expands_arrays() {
        let pairs = to_query_pairs(&Filters {
            page: Some(2),
            status: None,
            unread_only: Some(true),
            tags: vec![4, 5],
        })
        .unwrap();

        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("unread_only".to_string(), "true".to_string()),
                ("tags[]".to_string(), "4".to_string()),
                ("tags[]".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_unit_is_empty() {
        assert!(to_query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(to_query_pairs(&42).is_err());
    }
}
