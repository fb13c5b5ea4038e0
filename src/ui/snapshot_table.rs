// src/ui/snapshot_table.rs
//! Flattens an arbitrary JSON snapshot into rows and columns. Nothing about
//! the payload shape is assumed beyond what is checked here.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// `None` when the value is not tabular (scalars) or has nothing to show
/// (empty containers). Callers fall back to raw JSON or a placeholder.
pub fn table_from_snapshot(value: &Value) -> Option<SnapshotTable> {
    match value {
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let mut headers: Vec<String> = Vec::new();
            for item in items {
                if let Value::Object(map) = item {
                    for key in map.keys() {
                        if !headers.iter().any(|h| h == key) {
                            headers.push(key.clone());
                        }
                    }
                }
            }

            let rows = items
                .iter()
                .map(|item| {
                    headers
                        .iter()
                        .map(|h| item.get(h).map(cell_text).unwrap_or_default())
                        .collect()
                })
                .collect();

            Some(SnapshotTable { headers, rows })
        }
        Value::Array(items) => Some(SnapshotTable {
            headers: vec!["#".to_string(), "value".to_string()],
            rows: items
                .iter()
                .enumerate()
                .map(|(i, v)| vec![i.to_string(), cell_text(v)])
                .collect(),
        }),
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(SnapshotTable {
            headers: vec!["key".to_string(), "value".to_string()],
            rows: map
                .iter()
                .map(|(k, v)| vec![k.clone(), cell_text(v)])
                .collect(),
        }),
        _ => None,
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Row count for the overview/status line.
pub fn entry_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_array_becomes_rows() {
        let table = table_from_snapshot(&json!([
            {"name": "T1", "value": 1},
            {"name": "T2", "value": 2.5, "units": "psi"},
        ]))
        .unwrap();

        assert_eq!(table.headers, vec!["name", "value", "units"]);
        assert_eq!(table.rows[0], vec!["T1", "1", ""]);
        assert_eq!(table.rows[1], vec!["T2", "2.5", "psi"]);
    }

    #[test]
    fn test_object_becomes_key_value_rows() {
        let table = table_from_snapshot(&json!({"tags": 12, "alarms": {"active": 1}})).unwrap();

        assert_eq!(table.headers, vec!["key", "value"]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.contains(&vec!["tags".to_string(), "12".to_string()]));
        assert!(table
            .rows
            .contains(&vec!["alarms".to_string(), "{\"active\":1}".to_string()]));
    }

    #[test]
    fn test_scalar_array_is_indexed() {
        let table = table_from_snapshot(&json!(["a", null, true])).unwrap();
        assert_eq!(table.rows[1], vec!["1", "-"]);
        assert_eq!(table.rows[2], vec!["2", "true"]);
    }

    #[test]
    fn test_empty_and_scalar_have_no_table() {
        assert!(table_from_snapshot(&json!([])).is_none());
        assert!(table_from_snapshot(&json!({})).is_none());
        assert!(table_from_snapshot(&json!("ok")).is_none());
    }

    #[test]
    fn test_entry_count() {
        assert_eq!(entry_count(&json!([1, 2, 3])), 3);
        assert_eq!(entry_count(&json!({"a": 1})), 1);
        assert_eq!(entry_count(&json!(null)), 0);
        assert_eq!(entry_count(&json!(7)), 1);
    }
}
