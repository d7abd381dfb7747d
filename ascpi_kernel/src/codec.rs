/// ASCπ Kernel v1: Flat State Codec
///
/// A FieldState exports to a flat object of six numbers and imports back
/// through the validating constructor. Import is strict: every field is
/// required, unknown keys are rejected, and nothing is defaulted.

use serde_json::{Map, Value};

use crate::domain::FieldState;
use crate::error::CodecError;

/// Field names in export order.
pub const FIELD_NAMES: [&str; 6] = ["diff", "curvature", "phase", "coherence", "context", "step"];

/// Export a state as a flat `name → number` object in `FIELD_NAMES` order.
pub fn to_value(state: &FieldState) -> Value {
    let mut map = Map::new();
    map.insert("diff".to_string(), Value::from(state.diff));
    map.insert("curvature".to_string(), Value::from(state.curvature));
    map.insert("phase".to_string(), Value::from(state.phase));
    map.insert("coherence".to_string(), Value::from(state.coherence));
    map.insert("context".to_string(), Value::from(state.context));
    map.insert("step".to_string(), Value::from(state.step));
    Value::Object(map)
}

/// Import a state from a flat object.
pub fn from_value(value: &Value) -> Result<FieldState, CodecError> {
    let map = value
        .as_object()
        .ok_or_else(|| CodecError::NotAnObject(describe(value)))?;

    if let Some(unknown) = map.keys().find(|k| !FIELD_NAMES.contains(&k.as_str())) {
        return Err(CodecError::UnknownField(unknown.clone()));
    }

    let step_value = map.get("step").ok_or(CodecError::MissingField("step"))?;
    let step = step_value.as_u64().ok_or_else(|| CodecError::InvalidField {
        field: "step",
        expected: "a non-negative integer",
        found: describe(step_value),
    })?;

    let state = FieldState::from_parts(
        number_field(map, "diff")?,
        number_field(map, "curvature")?,
        number_field(map, "phase")?,
        number_field(map, "coherence")?,
        number_field(map, "context")?,
        step,
    )?;
    Ok(state)
}

/// Compact JSON encoding of `to_value`.
pub fn encode_state(state: &FieldState) -> String {
    to_value(state).to_string()
}

/// Parse JSON and import it with `from_value`.
pub fn decode_state(json: &str) -> Result<FieldState, CodecError> {
    let value: Value = serde_json::from_str(json).map_err(|e| CodecError::Json(e.to_string()))?;
    from_value(&value)
}

impl TryFrom<Value> for FieldState {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        from_value(&value)
    }
}

fn number_field(map: &Map<String, Value>, field: &'static str) -> Result<f64, CodecError> {
    let value = map.get(field).ok_or(CodecError::MissingField(field))?;
    value.as_f64().ok_or_else(|| CodecError::InvalidField {
        field,
        expected: "a number",
        found: describe(value),
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use serde_json::json;

    fn sample() -> FieldState {
        FieldState::from_parts(
            -0.123456789012345,
            2.5e-7,
            4.1,
            0.333333333333,
            1.618033988749895,
            17,
        )
            .unwrap()
    }

    #[test]
    fn export_is_flat_and_ordered() {
        let v = to_value(&sample());
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, FIELD_NAMES.to_vec());
        assert!(v.as_object().unwrap().values().all(|x| x.is_number()));
    }

    #[test]
    fn roundtrip_is_exact() {
        let s = sample();
        assert_eq!(from_value(&to_value(&s)).unwrap(), s);
        assert_eq!(decode_state(&encode_state(&s)).unwrap(), s);
    }

    #[test]
    fn serde_derive_roundtrip_goes_through_validation() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        let back: FieldState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let bad =
            r#"{"diff":0.1,"curvature":-1.0,"phase":0.0,"coherence":0.5,"context":1.0,"step":0}"#;
        assert!(serde_json::from_str::<FieldState>(bad).is_err());
    }

    #[test]
    fn missing_field_is_named() {
        let v = json!({"diff": 0.1, "curvature": 1.0, "phase": 0.0, "context": 1.0, "step": 0});
        assert_eq!(from_value(&v).unwrap_err(), CodecError::MissingField("coherence"));
    }

    #[test]
    fn wrong_type_is_named() {
        let v = json!({
            "diff": "0.1",
            "curvature": 1.0,
            "phase": 0.0,
            "coherence": 0.5,
            "context": 1.0,
            "step": 0
        });
        match from_value(&v).unwrap_err() {
            CodecError::InvalidField { field, .. } => assert_eq!(field, "diff"),
            other => panic!("Expected InvalidField, got: {:?}", other),
        }
    }

    #[test]
    fn fractional_step_rejected() {
        let v = json!({
            "diff": 0.1,
            "curvature": 1.0,
            "phase": 0.0,
            "coherence": 0.5,
            "context": 1.0,
            "step": 1.5
        });
        assert!(matches!(
            from_value(&v).unwrap_err(),
            CodecError::InvalidField { field: "step", .. }
        ));
    }

    #[test]
    fn unknown_field_rejected() {
        let v = json!({
            "diff": 0.1,
            "curvature": 1.0,
            "phase": 0.0,
            "coherence": 0.5,
            "context": 1.0,
            "step": 0,
            "N": 1.0
        });
        assert_eq!(from_value(&v).unwrap_err(), CodecError::UnknownField("N".to_string()));
    }

    #[test]
    fn invariant_violation_surfaces() {
        let v = json!({
            "diff": 0.1,
            "curvature": 1.0,
            "phase": 0.0,
            "coherence": 2.0,
            "context": 1.0,
            "step": 0
        });
        assert_eq!(
            from_value(&v).unwrap_err(),
            CodecError::Invalid(StateError::CoherenceOutOfRange(2.0))
        );
    }

    #[test]
    fn non_object_rejected() {
        assert!(matches!(from_value(&json!([1, 2])), Err(CodecError::NotAnObject(_))));
        assert!(matches!(decode_state("{ nope"), Err(CodecError::Json(_))));
    }

    #[test]
    fn import_normalizes_out_of_range_phase() {
        let v = json!({
            "diff": 0.1,
            "curvature": 1.0,
            "phase": -1.0,
            "coherence": 0.5,
            "context": 1.0,
            "step": 2
        });
        let s = from_value(&v).unwrap();
        assert!(s.phase() > 0.0);
        assert_eq!(s.step(), 2);
    }
}
