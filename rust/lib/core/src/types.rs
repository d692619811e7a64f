/// Next id for a collection: one past the largest id in use, starting at 1.
pub fn next_id<I>(ids: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter().max().unwrap_or(0) + 1
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Shallow merge: every top-level key of `patch` overwrites the same key
/// in `base`. Nested objects are replaced, not merged, and `null` is
/// stored as `null`.
pub fn merge_fields(base: &mut serde_json::Value, patch: &serde_json::Value) {
    if let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            base_obj.insert(key.clone(), value.clone());
        }
    } else {
        *base = patch.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(Vec::<i64>::new()), 1);
        assert_eq!(next_id(vec![3, 9, 4]), 10);
    }

    #[test]
    fn test_now_rfc3339() {
        let ts = now_rfc3339();
        assert!(ts.contains('T'));
    }

    #[test]
    fn test_merge_fields_is_shallow() {
        let mut base = serde_json::json!({"a": 1, "b": 2, "c": {"d": 3}});
        let patch = serde_json::json!({"b": null, "c": {"e": 4}, "f": 5});
        merge_fields(&mut base, &patch);
        assert_eq!(
            base,
            serde_json::json!({"a": 1, "b": null, "c": {"e": 4}, "f": 5})
        );
    }
}
