use proptree_core::{
    AttributeData, AttributeId, Name, TraversalConfig, TraversalWarning, TypeId, Value,
    Visibility, WarningKind, names,
};

#[test]
fn test_well_known_names_have_distinct_ids() {
    let mut ids: Vec<AttributeId> = names::ALL.iter().map(|n| AttributeId::of(n)).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), names::ALL.len());
}

#[test]
fn test_value_serializes_untagged() {
    let mut object = proptree_core::Object::new();
    object.insert("label".to_string(), Value::from("Intensity"));
    object.insert("min".to_string(), Value::from(0.5));
    object.insert("count".to_string(), Value::from(3u64));

    let json = serde_json::to_string(&Value::Object(object)).unwrap();
    assert_eq!(json, r#"{"label":"Intensity","min":0.5,"count":3}"#);
}

#[test]
fn test_value_round_trips_through_json() {
    let value = Value::from(vec![Value::Bool(true), Value::Int(-4), Value::from("x")]);
    let json = serde_json::to_string(&value).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_visibility_value_conversion() {
    assert_eq!(Value::from(Visibility::Hide), Value::from("Hide"));
    assert!(Visibility::Hide.hides_descendants());
    assert!(Visibility::HideChildren.hides_descendants());
    assert!(!Visibility::ShowChildrenOnly.hides_descendants());
}

#[test]
fn test_attribute_data_root_group() {
    let attribute = AttributeData::new(names::SERIALIZED_PATH, "/a/b");
    assert!(attribute.group.is_empty());
    assert_eq!(attribute.name, Name::new("SerializedPath"));
    assert_eq!(attribute.value.as_str(), Some("/a/b"));
}

#[test]
fn test_type_id_serializes_as_string() {
    let json = serde_json::to_string(&TypeId::F32).unwrap();
    assert_eq!(json, r#""f32""#);
}

#[test]
fn test_warning_constructors() {
    let warning = TraversalWarning::stringification("/map/0", &TypeId::new("Vec3"));
    assert_eq!(warning.kind, WarningKind::Stringification);
    assert!(warning.message.contains("Vec3"));
}

#[test]
fn test_default_config() {
    let config = TraversalConfig::default();
    assert!(config.visit_from_root);
    assert!(config.primitive_handlers);
    assert_eq!(config.max_warnings, None);
}
