//! Lenient field readers for loosely typed upstream payloads.

use serde_json::Value;

/// Read a coordinate that may arrive as a number or a numeric string.
pub(crate) fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Drop empty or whitespace-only strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_f64_accepts_numbers_and_numeric_strings() {
        assert_eq!(lenient_f64(Some(&json!(35.5))), Some(35.5));
        assert_eq!(lenient_f64(Some(&json!(" 139.7 "))), Some(139.7));
        assert_eq!(lenient_f64(Some(&json!(""))), None);
        assert_eq!(lenient_f64(Some(&json!(null))), None);
        assert_eq!(lenient_f64(None), None);
    }
}
