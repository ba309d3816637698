//! Query-string parameter marshaling.
//!
//! List filters are plain serializable structs with optional fields. Only the
//! fields that carry a value reach the query string: `null`, blank strings and
//! empty arrays are dropped.

use serde::Serialize;
use serde_json::Value;

use crate::error::{PayloadError, PayloadResult};

/// Flatten a serializable parameter object into query pairs.
///
/// Arrays become repeated keys (`status=open&status=closed`); numbers and
/// booleans are stringified. Nested objects are not representable and are
/// rejected. Keys come out in lexical order.
pub fn query_pairs<T: Serialize + ?Sized>(params: &T) -> PayloadResult<Vec<(String, String)>> {
    let value = serde_json::to_value(params).map_err(|e| PayloadError::invalid_query(e.to_string()))?;

    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(PayloadError::invalid_query(format!(
                "expected an object, got {}",
                kind(&other)
            )));
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        push(&mut pairs, &key, value, true)?;
    }
    Ok(pairs)
}

fn push(pairs: &mut Vec<(String, String)>, key: &str, value: Value, allow_array: bool) -> PayloadResult<()> {
    match value {
        Value::Null => {}
        Value::String(s) if s.trim().is_empty() => {}
        Value::String(s) => pairs.push((key.to_string(), s)),
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::Array(items) if allow_array => {
            for item in items {
                push(pairs, key, item, false)?;
            }
        }
        other => {
            return Err(PayloadError::invalid_query(format!(
                "`{key}` holds {}, which has no query-string form",
                kind(&other)
            )));
        }
    }
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[derive(Serialize, Default)]
    struct Filter {
        search: Option<String>,
        status: Option<String>,
        department_id: Option<i64>,
        is_active: Option<bool>,
        tags: Vec<String>,
    }

    #[test]
    fn strips_unset_and_blank_values() {
        let filter = Filter {
            search: Some(String::new()),
            status: Some("approved".to_string()),
            department_id: None,
            is_active: Some(false),
            tags: Vec::new(),
        };

        let pairs = query_pairs(&filter).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("is_active".to_string(), "false".to_string()),
                ("status".to_string(), "approved".to_string()),
            ]
        );
    }

    #[test]
    fn arrays_repeat_the_key() {
        let filter = Filter {
            tags: vec!["ccp".to_string(), "".to_string(), "allergen".to_string()],
            ..Filter::default()
        };
        let pairs = query_pairs(&filter).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("tags".to_string(), "ccp".to_string()),
                ("tags".to_string(), "allergen".to_string()),
            ]
        );
    }

    #[test]
    fn numbers_are_stringified() {
        let filter = Filter {
            department_id: Some(12),
            ..Filter::default()
        };
        assert_eq!(query_pairs(&filter).unwrap(), vec![("department_id".to_string(), "12".to_string())]);
    }

    #[test]
    fn unit_and_none_produce_no_pairs() {
        assert!(query_pairs(&()).unwrap().is_empty());
        assert!(query_pairs(&Option::<Filter>::None).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_object_and_nested_values() {
        assert!(matches!(query_pairs(&42), Err(PayloadError::InvalidQuery(_))));

        let nested = serde_json::json!({ "range": { "from": 1 } });
        assert!(matches!(query_pairs(&nested), Err(PayloadError::InvalidQuery(_))));
    }

    proptest! {
        /// Property: only keys holding a non-blank value survive, unchanged.
        #[test]
        fn only_set_keys_survive(
            params in prop::collection::btree_map("[a-z_]{1,8}", prop::option::of("[a-z ]{0,6}"), 0..12)
        ) {
            let pairs = query_pairs(&params).unwrap();

            let expected: Vec<(String, String)> = params
                .iter()
                .filter_map(|(k, v)| match v {
                    Some(v) if !v.trim().is_empty() => Some((k.clone(), v.clone())),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(pairs, expected);
        }

        #[test]
        fn never_emits_blank_values(
            params in prop::collection::btree_map("[a-z]{1,6}", prop::option::of("[ a-c]{0,4}"), 0..8)
        ) {
            let map: BTreeMap<String, Option<String>> = params;
            for (_, value) in query_pairs(&map).unwrap() {
                prop_assert!(!value.trim().is_empty());
            }
        }
    }
}
