//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge overlay values into the base.
///
/// Objects merge key by key; any other overlay value, `null` included,
/// replaces the base value.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let mut base = json!({
            "vector_store": { "provider": "milvus", "config": { "collection_name": "a", "dims": 1024 } },
            "search": { "default_limit": 5 }
        });
        let overlay = json!({
            "vector_store": { "config": { "collection_name": "b" } },
            "search": { "default_limit": 10 }
        });
        merge_json_values(&mut base, &overlay);
        assert_eq!(
            base,
            json!({
                "vector_store": { "provider": "milvus", "config": { "collection_name": "b", "dims": 1024 } },
                "search": { "default_limit": 10 }
            })
        );
    }

    #[test]
    fn null_overlay_clears_block() {
        let mut base = json!({ "llm": { "provider": "google" } });
        merge_json_values(&mut base, &json!({ "llm": null }));
        assert_eq!(base, json!({ "llm": null }));
    }
}
