//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge `overlay` into `base`. Objects merge key by key; any other value
/// (including arrays) in the overlay replaces the base value.
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
    fn nested_objects_merge_and_arrays_replace() {
        let mut base = json!({
            "providers": { "timeout_secs": 10, "google": { "api_key": "a" } },
            "search": { "chain_brands": ["A", "B"] }
        });
        let overlay = json!({
            "providers": { "google": { "base_url": "http://localhost" } },
            "search": { "chain_brands": ["C"] }
        });
        merge_json_values(&mut base, &overlay);
        assert_eq!(
            base,
            json!({
                "providers": {
                    "timeout_secs": 10,
                    "google": { "api_key": "a", "base_url": "http://localhost" }
                },
                "search": { "chain_brands": ["C"] }
            })
        );
    }
}
