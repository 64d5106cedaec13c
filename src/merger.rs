use serde_json::{Map, Value};

/// Fold per-chunk results into a single mapping.
///
/// Results are folded left to right, in chunk order. The first occurrence of
/// a key adopts its value as-is; later occurrences accumulate via [`combine`]
/// so no colliding value is silently dropped. The fold is not commutative
/// when a key changes shape across chunks (a mapping arriving after a scalar
/// wins; the reverse collects into a list) — callers relying on merge output
/// must preserve chunk order.
pub fn merge_results(results: Vec<Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();

    for result in results {
        for (key, value) in result {
            match merged.remove(&key) {
                None => {
                    merged.insert(key, value);
                }
                Some(existing) => {
                    merged.insert(key, combine(existing, value));
                }
            }
        }
    }

    merged
}

/// Combine two values that landed on the same key.
///
/// One rule per (existing, incoming) shape pair, over the three JSON shape
/// categories: sequence (array), mapping (object), scalar (everything else,
/// strings included).
fn combine(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        // sequence + sequence: concatenate
        (Value::Array(mut items), Value::Array(more)) => {
            items.extend(more);
            Value::Array(items)
        }
        // scalar/mapping + sequence: existing becomes the head of the list
        (existing, Value::Array(more)) => {
            let mut items = vec![existing];
            items.extend(more);
            Value::Array(items)
        }
        // mapping + mapping: shallow merge, incoming keys overwrite (one
        // level only — nested sub-mappings replace rather than merge)
        (Value::Object(mut entries), Value::Object(more)) => {
            entries.extend(more);
            Value::Object(entries)
        }
        // scalar/sequence + mapping: the mapping replaces the existing value
        (_, incoming @ Value::Object(_)) => incoming,
        // sequence + scalar: append
        (Value::Array(mut items), scalar) => {
            items.push(scalar);
            Value::Array(items)
        }
        // scalar + scalar: collect both, in arrival order
        (existing, scalar) => Value::Array(vec![existing, scalar]),
    }
}

/// Stand-in result for a chunk whose generation or parsing failed.
///
/// Carries the failure message and the first 100 characters of the chunk so
/// the merged output shows which text was skipped.
pub fn error_marker(message: &str, chunk: &str) -> Map<String, Value> {
    let preview: String = chunk.chars().take(100).collect();

    let mut marker = Map::new();
    marker.insert("error".into(), Value::String(message.to_string()));
    marker.insert("chunk_preview".into(), Value::String(format!("{preview}...")));
    marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test value must be an object")
    }

    #[test]
    fn test_merge_empty_is_empty() {
        assert!(merge_results(vec![]).is_empty());
    }

    #[test]
    fn test_single_result_passes_through() {
        let merged = merge_results(vec![obj(json!({"title": "Doc", "pages": 3}))]);
        assert_eq!(Value::Object(merged), json!({"title": "Doc", "pages": 3}));
    }

    #[test]
    fn test_scalar_collision_collects_into_list() {
        let merged = merge_results(vec![obj(json!({"a": 1})), obj(json!({"a": 2}))]);
        assert_eq!(Value::Object(merged), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_list_collision_concatenates() {
        let merged = merge_results(vec![obj(json!({"a": [1]})), obj(json!({"a": [2, 3]}))]);
        assert_eq!(Value::Object(merged), json!({"a": [1, 2, 3]}));
    }

    #[test]
    fn test_scalar_then_list_flattens_one_level() {
        let merged = merge_results(vec![obj(json!({"a": 1})), obj(json!({"a": [2, 3]}))]);
        assert_eq!(Value::Object(merged), json!({"a": [1, 2, 3]}));
    }

    #[test]
    fn test_list_then_scalar_appends() {
        let merged = merge_results(vec![obj(json!({"a": [1, 2]})), obj(json!({"a": 3}))]);
        assert_eq!(Value::Object(merged), json!({"a": [1, 2, 3]}));
    }

    #[test]
    fn test_mapping_collision_merges_shallowly() {
        let merged = merge_results(vec![
            obj(json!({"a": {"x": 1}})),
            obj(json!({"a": {"y": 2}})),
        ]);
        assert_eq!(Value::Object(merged), json!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn test_mapping_merge_is_one_level_only() {
        // Nested sub-mappings replace wholesale; "x" does not deep-merge.
        let merged = merge_results(vec![
            obj(json!({"a": {"x": {"deep": 1}, "keep": true}})),
            obj(json!({"a": {"x": {"other": 2}}})),
        ]);
        assert_eq!(
            Value::Object(merged),
            json!({"a": {"x": {"other": 2}, "keep": true}})
        );
    }

    #[test]
    fn test_shape_change_is_order_sensitive() {
        // mapping after scalar: the mapping wins
        let merged = merge_results(vec![obj(json!({"a": 1})), obj(json!({"a": {"x": 2}}))]);
        assert_eq!(Value::Object(merged), json!({"a": {"x": 2}}));

        // scalar after mapping: both collect into a list
        let merged = merge_results(vec![obj(json!({"a": {"x": 2}})), obj(json!({"a": 1}))]);
        assert_eq!(Value::Object(merged), json!({"a": [{"x": 2}, 1]}));
    }

    #[test]
    fn test_strings_collect_like_scalars() {
        let merged = merge_results(vec![
            obj(json!({"title": "Part one"})),
            obj(json!({"title": "Part two"})),
        ]);
        assert_eq!(Value::Object(merged), json!({"title": ["Part one", "Part two"]}));
    }

    #[test]
    fn test_error_marker_merges_beside_content_keys() {
        let merged = merge_results(vec![
            error_marker("boom", "Hello world, this chunk failed"),
            obj(json!({"title": "Doc"})),
        ]);

        assert_eq!(merged["error"], json!("boom"));
        assert_eq!(
            merged["chunk_preview"],
            json!("Hello world, this chunk failed...")
        );
        assert_eq!(merged["title"], json!("Doc"));
    }

    #[test]
    fn test_error_marker_preview_truncates_at_100_chars() {
        let chunk = "x".repeat(250);
        let marker = error_marker("boom", &chunk);

        let preview = marker["chunk_preview"].as_str().unwrap();
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }
}
