//! Integration tests for proptree-bridge traversals over in-memory graphs.

use pretty_assertions::assert_eq;
use proptree_bridge::{
    Attributes, DocumentBuilder, EventKind, ObjectAccess, Recorder, ReflectionBridge,
    TraversalReport, VisitEvent, VisitResponse, Visitor,
};
use proptree_core::{TraversalConfig, TypeId, Value, Visibility, WarningKind, names};
use proptree_reflect::memory::{Data, MemoryIntrospection, ObjectGraph, TypeRegistry};
use proptree_reflect::{
    AttributeRegistry, ElementDescriptor, ElementEditData, InstanceHandle, Primitive,
    PrimitiveKind,
};

fn record(
    types: &TypeRegistry,
    graph: &ObjectGraph,
    root: InstanceHandle,
    root_type: &TypeId,
) -> (Vec<VisitEvent>, TraversalReport) {
    record_with(|bridge| bridge, types, graph, root, root_type, Recorder::new())
}

fn record_with(
    configure: impl for<'b> FnOnce(ReflectionBridge<'b>) -> ReflectionBridge<'b>,
    types: &TypeRegistry,
    graph: &ObjectGraph,
    root: InstanceHandle,
    root_type: &TypeId,
    mut recorder: Recorder,
) -> (Vec<VisitEvent>, TraversalReport) {
    let introspection = MemoryIntrospection::new(types, graph);
    let report = configure(ReflectionBridge::new(&introspection))
        .visit(&mut recorder, root, root_type)
        .unwrap();
    (recorder.into_events(), report)
}

/// `(kind, label)` of every event.
fn outline(events: &[VisitEvent]) -> Vec<(EventKind, String)> {
    events
        .iter()
        .map(|e| (e.kind, e.label().unwrap_or_default().to_string()))
        .collect()
}

fn values<'e>(events: &'e [VisitEvent]) -> impl Iterator<Item = &'e VisitEvent> {
    events.iter().filter(|e| e.kind == EventKind::Value)
}

/// A light with two groups: General (color, intensity) and Shadows (bias).
fn light() -> (TypeRegistry, ObjectGraph, TypeId, InstanceHandle) {
    let mut types = TypeRegistry::new();
    let light = types
        .class("Light", "Light")
        .group("General")
        .edited_field("color", TypeId::U32, "Color")
        .edited_field("intensity", TypeId::F32, "Intensity")
        .group("Shadows")
        .edited_field("bias", TypeId::F32, "Bias")
        .register();

    let mut graph = ObjectGraph::new();
    let color = graph.primitive(Primitive::U32(0xff_ff_ff));
    let intensity = graph.primitive(Primitive::F32(1.0));
    let bias = graph.primitive(Primitive::F32(0.5));
    let root = graph.object(light.clone(), vec![color, intensity, bias]);
    (types, graph, light, root)
}

/// An outer object holding an inner object and a shown scalar. The inner
/// field's edit metadata is given by `inner_edit`.
fn nested(inner_edit: ElementEditData) -> (TypeRegistry, ObjectGraph, TypeId, InstanceHandle) {
    let mut types = TypeRegistry::new();
    let inner = types
        .class("Inner", "Inner")
        .edited_field("value", TypeId::F64, "Value")
        .register();
    let outer = types
        .class("Outer", "Outer")
        .element(ElementDescriptor::new("inner", inner.clone()).with_edit(inner_edit))
        .edited_field("shown", TypeId::U8, "Shown")
        .register();

    let mut graph = ObjectGraph::new();
    let value = graph.primitive(Primitive::F64(2.0));
    let inner_obj = graph.object(inner, vec![value]);
    let shown = graph.primitive(Primitive::U8(3));
    let root = graph.object(outer.clone(), vec![inner_obj, shown]);
    (types, graph, outer, root)
}

fn event(kind: EventKind, label: &str) -> (EventKind, String) {
    (kind, label.to_string())
}

#[test]
fn test_groups_wrap_their_fields() {
    let (types, graph, light, root) = light();
    let (events, report) = record(&types, &graph, root, &light);

    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Light"),
        event(EventKind::Begin, "General"),
        event(EventKind::Value, "Color"),
        event(EventKind::Value, "Intensity"),
        event(EventKind::End, "General"),
        event(EventKind::Begin, "Shadows"),
        event(EventKind::Value, "Bias"),
        event(EventKind::End, "Shadows"),
        event(EventKind::End, "Light"),
    ]);
    assert!(report.is_balanced());
    assert_eq!(report.objects_begun, 3);
    assert_eq!(report.values, 3);
    assert!(!report.has_warnings());
}

#[test]
fn test_group_frames_share_owner_identity() {
    let (types, graph, light, root) = light();
    let (events, _) = record(&types, &graph, root, &light);

    let general = &events[1];
    assert_eq!(general.path(), Some(""));
    assert_eq!(general.type_id.as_ref(), Some(&light));
    assert_eq!(general.visibility(), Some(Visibility::Show));

    let paths: Vec<_> = values(&events).map(|e| e.path().unwrap_or_default()).collect();
    assert_eq!(paths, ["/color", "/intensity", "/bias"]);
    let depths: Vec<_> = values(&events).map(|e| e.depth).collect();
    assert_eq!(depths, [2, 2, 2]);
    for value in values(&events) {
        assert_eq!(value.attribute(names::PARENT_VALUE), Some(&Value::from(root)));
    }
}

#[test]
fn test_groups_released_together_nest() {
    let mut types = TypeRegistry::new();
    let panel = types
        .class("Panel", "Panel")
        .group("Outer")
        .group("Inner")
        .edited_field("x", TypeId::U8, "X")
        .register();
    let mut graph = ObjectGraph::new();
    let x = graph.primitive(Primitive::U8(1));
    let root = graph.object(panel.clone(), vec![x]);

    let (events, report) = record(&types, &graph, root, &panel);
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Panel"),
        event(EventKind::Begin, "Outer"),
        event(EventKind::Begin, "Inner"),
        event(EventKind::Value, "X"),
        event(EventKind::End, "Inner"),
        event(EventKind::End, "Outer"),
        event(EventKind::End, "Panel"),
    ]);
    assert_eq!(events[2].depth, 2);
    assert!(report.is_balanced());
}

#[test]
fn test_groups_after_a_field_replace_each_other() {
    let mut types = TypeRegistry::new();
    let panel = types
        .class("Panel", "Panel")
        .edited_field("a", TypeId::U8, "A")
        .group("First")
        .group("Second")
        .edited_field("b", TypeId::U8, "B")
        .register();
    let mut graph = ObjectGraph::new();
    let a = graph.primitive(Primitive::U8(1));
    let b = graph.primitive(Primitive::U8(2));
    let root = graph.object(panel.clone(), vec![a, b]);

    let (events, report) = record(&types, &graph, root, &panel);
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Panel"),
        event(EventKind::Value, "A"),
        event(EventKind::Begin, "First"),
        event(EventKind::End, "First"),
        event(EventKind::Begin, "Second"),
        event(EventKind::Value, "B"),
        event(EventKind::End, "Second"),
        event(EventKind::End, "Panel"),
    ]);
    let depths: Vec<_> = events.iter().map(|e| e.depth).collect();
    assert_eq!(depths, [0, 1, 1, 1, 1, 2, 1, 0]);
    assert!(report.is_balanced());
}

#[test]
fn test_unnamed_group_ends_previous_group() {
    let mut types = TypeRegistry::new();
    let panel = types
        .class("Panel", "Panel")
        .group("Advanced")
        .edited_field("a", TypeId::U8, "A")
        .group("")
        .edited_field("b", TypeId::U8, "B")
        .register();
    let mut graph = ObjectGraph::new();
    let a = graph.primitive(Primitive::U8(1));
    let b = graph.primitive(Primitive::U8(2));
    let root = graph.object(panel.clone(), vec![a, b]);

    let (events, _) = record(&types, &graph, root, &panel);
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Panel"),
        event(EventKind::Begin, "Advanced"),
        event(EventKind::Value, "A"),
        event(EventKind::End, "Advanced"),
        event(EventKind::Value, "B"),
        event(EventKind::End, "Panel"),
    ]);
}

#[test]
fn test_ui_element_is_injected_after_its_field() {
    let mut types = TypeRegistry::new();
    let material = types
        .class("Material", "Material")
        .edited_field("albedo", TypeId::U32, "Albedo")
        .ui_element(ElementEditData {
            name: Some("Preview".into()),
            ..ElementEditData::ui_element()
        })
        .edited_field("roughness", TypeId::F32, "Roughness")
        .register();
    let mut graph = ObjectGraph::new();
    let albedo = graph.primitive(Primitive::U32(7));
    let roughness = graph.primitive(Primitive::F32(0.25));
    let root = graph.object(material.clone(), vec![albedo, roughness]);

    let (events, report) = record(&types, &graph, root, &material);
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Material"),
        event(EventKind::Value, "Albedo"),
        event(EventKind::Begin, "Preview"),
        event(EventKind::End, "Preview"),
        event(EventKind::Value, "Roughness"),
        event(EventKind::End, "Material"),
    ]);
    assert!(report.is_balanced());
}

#[test]
fn test_map_entries_become_labeled_values() {
    let mut types = TypeRegistry::new();
    let counts = types.map("Counts", TypeId::STRING, TypeId::U32);
    let inventory = types
        .class("Inventory", "Inventory")
        .edited_field("counts", counts.clone(), "Counts")
        .register();

    let mut graph = ObjectGraph::new();
    let apples = graph.string("apples");
    let three = graph.primitive(Primitive::U32(3));
    let pears = graph.string("pears");
    let five = graph.primitive(Primitive::U32(5));
    let map = graph.map(counts.clone(), TypeRegistry::pair_type(&counts), vec![
        (apples, three),
        (pears, five),
    ]);
    let root = graph.object(inventory.clone(), vec![map]);

    let (events, report) = record(&types, &graph, root, &inventory);
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Inventory"),
        event(EventKind::Begin, "Counts"),
        event(EventKind::Value, "apples"),
        event(EventKind::Value, "pears"),
        event(EventKind::End, "Counts"),
        event(EventKind::End, "Inventory"),
    ]);
    assert!(report.is_balanced());
    assert_eq!(report.values, 2);

    let map_begin = &events[1];
    assert_eq!(map_begin.attribute(names::CONTAINER), Some(&Value::from("Counts")));

    let entries: Vec<_> = values(&events).collect();
    assert_eq!(entries[0].path(), Some("/counts/0/1"));
    assert_eq!(entries[1].path(), Some("/counts/1/1"));
    assert_eq!(entries[0].value, Some(Value::Uint(3)));
    assert_eq!(entries[0].attribute(names::PARENT_CONTAINER), Some(&Value::from("Counts")));
    assert_eq!(entries[0].attribute(names::PARENT_CONTAINER_INSTANCE), Some(&Value::from(map)));
    assert!(entries[0].attribute(names::CONTAINER_ELEMENT_OVERRIDE).is_some());
}

#[test]
fn test_enum_keys_label_map_entries() {
    let mut types = TypeRegistry::new();
    let mode = types.enumeration("Mode", "Mode", PrimitiveKind::U8, &[("Off", 0), ("On", 1)]);
    let levels = types.map("Levels", mode.clone(), TypeId::F32);
    let lamp = types
        .class("Lamp", "Lamp")
        .edited_field("levels", levels.clone(), "Levels")
        .register();

    let mut graph = ObjectGraph::new();
    let on = graph.enum_value(mode, Primitive::U8(1));
    let level = graph.primitive(Primitive::F32(0.75));
    let map = graph.map(levels.clone(), TypeRegistry::pair_type(&levels), vec![(on, level)]);
    let root = graph.object(lamp.clone(), vec![map]);

    let (events, report) = record(&types, &graph, root, &lamp);
    let labels: Vec<_> = values(&events).map(|e| e.label()).collect();
    assert_eq!(labels, [Some("On")]);
    assert!(!report.has_warnings());
}

#[test]
fn test_unstringifiable_key_warns() {
    let mut types = TypeRegistry::new();
    let point = types
        .class("Point", "Point")
        .field("x", TypeId::I32)
        .field("y", TypeId::I32)
        .register();
    let heights = types.map("Heights", point.clone(), TypeId::U32);
    let terrain = types
        .class("Terrain", "Terrain")
        .edited_field("heights", heights.clone(), "Heights")
        .register();

    let mut graph = ObjectGraph::new();
    let x = graph.primitive(Primitive::I32(1));
    let y = graph.primitive(Primitive::I32(2));
    let key = graph.object(point, vec![x, y]);
    let height = graph.primitive(Primitive::U32(40));
    let map = graph.map(heights.clone(), TypeRegistry::pair_type(&heights), vec![(key, height)]);
    let root = graph.object(terrain.clone(), vec![map]);

    let (events, report) = record(&types, &graph, root, &terrain);
    let entry = values(&events).next().unwrap();
    assert_eq!(entry.label(), Some("[0]"));
    assert_eq!(entry.value, Some(Value::Uint(40)));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::Stringification);
    assert_eq!(report.warnings[0].path, "/heights/0/0");
}

#[test]
fn test_set_elements_are_unlabeled_and_disabled() {
    let mut types = TypeRegistry::new();
    let tags = types.set("Tags", TypeId::U32);
    let asset = types
        .class("Asset", "Asset")
        .edited_field("tags", tags.clone(), "Tags")
        .register();

    let mut graph = ObjectGraph::new();
    let four = graph.primitive(Primitive::U32(4));
    let eight = graph.primitive(Primitive::U32(8));
    let set = graph.set(tags, vec![four, eight]);
    let root = graph.object(asset.clone(), vec![set]);

    let (events, _) = record(&types, &graph, root, &asset);
    let elements: Vec<_> = values(&events).collect();
    assert_eq!(elements.len(), 2);
    for element in &elements {
        assert_eq!(element.label(), None);
        assert_eq!(element.attribute(names::DISABLED), Some(&Value::Bool(true)));
        assert_eq!(element.attribute(names::PARENT_CONTAINER), Some(&Value::from("Tags")));
    }
    assert_eq!(elements[0].path(), Some("/tags/0"));
    assert_eq!(elements[1].path(), Some("/tags/1"));
}

#[test]
fn test_sequence_items_use_index_labels() {
    let mut types = TypeRegistry::new();
    let list = types.sequence("Vec<u32>", TypeId::U32);
    let curve = types
        .class("Curve", "Curve")
        .edited_field("points", list.clone(), "Points")
        .register();

    let mut graph = ObjectGraph::new();
    let a = graph.primitive(Primitive::U32(10));
    let b = graph.primitive(Primitive::U32(20));
    let seq = graph.sequence(list, vec![a, b]);
    let root = graph.object(curve.clone(), vec![seq]);

    let (events, _) = record(&types, &graph, root, &curve);
    let items: Vec<_> = values(&events)
        .map(|e| (e.label().unwrap_or_default(), e.path().unwrap_or_default()))
        .collect();
    assert_eq!(items, [("[0]", "/points/0"), ("[1]", "/points/1")]);
}

#[test]
fn test_describes_children_labels_items() {
    let mut types = TypeRegistry::new();
    let list = types.sequence("Vec<u8>", TypeId::U8);
    let edit = ElementEditData::field("Bytes").with_raw_attribute(
        names::NAME_LABEL_OVERRIDE,
        proptree_reflect::Attribute::constant("Byte").describing_children(),
    );
    let blob = types
        .class("Blob", "Blob")
        .element(ElementDescriptor::new("bytes", list.clone()).with_edit(edit))
        .register();

    let mut graph = ObjectGraph::new();
    let a = graph.primitive(Primitive::U8(1));
    let b = graph.primitive(Primitive::U8(2));
    let seq = graph.sequence(list, vec![a, b]);
    let root = graph.object(blob.clone(), vec![seq]);

    let (events, _) = record(&types, &graph, root, &blob);
    assert_eq!(events[1].label(), Some("Bytes"));
    let labels: Vec<_> = values(&events).map(|e| e.label()).collect();
    assert_eq!(labels, [Some("Byte"), Some("Byte")]);
}

#[test]
fn test_hidden_field_hides_descendants() {
    let edit = ElementEditData::field("Inner").with_attribute(names::VISIBILITY, false);
    let (types, graph, outer, root) = nested(edit);
    let (events, report) = record(&types, &graph, root, &outer);

    let visibilities: Vec<_> = events
        .iter()
        .map(|e| (e.kind, e.label().unwrap_or_default().to_string(), e.visibility()))
        .collect();
    assert_eq!(visibilities, vec![
        (EventKind::Begin, "Outer".to_string(), Some(Visibility::ShowChildrenOnly)),
        (EventKind::Begin, "Inner".to_string(), Some(Visibility::Hide)),
        (EventKind::Value, "Value".to_string(), Some(Visibility::Hide)),
        (EventKind::End, "Inner".to_string(), Some(Visibility::Hide)),
        (EventKind::Value, "Shown".to_string(), Some(Visibility::Show)),
        (EventKind::End, "Outer".to_string(), Some(Visibility::ShowChildrenOnly)),
    ]);
    assert!(report.is_balanced());
}

#[test]
fn test_hidden_container_items_keep_distinct_paths() {
    let mut types = TypeRegistry::new();
    let list = types.sequence("Vec<u32>", TypeId::U32);
    let edit = ElementEditData::field("Items").with_attribute(names::VISIBILITY, false);
    let bag = types
        .class("Bag", "Bag")
        .element(ElementDescriptor::new("items", list.clone()).with_edit(edit))
        .register();

    let mut graph = ObjectGraph::new();
    let a = graph.primitive(Primitive::U32(1));
    let b = graph.primitive(Primitive::U32(2));
    let seq = graph.sequence(list, vec![a, b]);
    let root = graph.object(bag.clone(), vec![seq]);

    let (events, _) = record(&types, &graph, root, &bag);
    let items: Vec<_> = values(&events)
        .map(|e| (e.path().unwrap_or_default(), e.visibility()))
        .collect();
    assert_eq!(items, [
        ("/items/0", Some(Visibility::Hide)),
        ("/items/1", Some(Visibility::Hide)),
    ]);
}

#[test]
fn test_hide_children_keeps_node_visible() {
    let edit =
        ElementEditData::field("Inner").with_attribute(names::VISIBILITY, Visibility::HideChildren);
    let (types, graph, outer, root) = nested(edit);
    let (events, _) = record(&types, &graph, root, &outer);

    assert_eq!(events[1].visibility(), Some(Visibility::HideChildren));
    assert_eq!(events[2].visibility(), Some(Visibility::Hide));
}

#[test]
fn test_read_only_disables_descendants() {
    let edit = ElementEditData::field("Inner").with_attribute(names::READ_ONLY, true);
    let (types, graph, outer, root) = nested(edit);
    let (events, _) = record(&types, &graph, root, &outer);

    let inner = &events[1];
    assert_eq!(inner.attribute(names::DISABLED), Some(&Value::Bool(true)));
    assert_eq!(inner.attribute(names::ANCESTOR_DISABLED), None);

    let value = &events[2];
    assert_eq!(value.attribute(names::DISABLED), None);
    assert_eq!(value.attribute(names::ANCESTOR_DISABLED), Some(&Value::Bool(true)));

    let shown = &events[4];
    assert_eq!(shown.attribute(names::ANCESTOR_DISABLED), None);
}

#[test]
fn test_change_notify_accumulates_down_the_tree() {
    let mut types = TypeRegistry::new();
    let inner = types
        .class("Inner", "Inner")
        .element(
            ElementDescriptor::new("value", TypeId::F64).with_edit(
                ElementEditData::field("Value").with_attribute(names::CHANGE_NOTIFY, "on_value"),
            ),
        )
        .edited_field("plain", TypeId::F64, "Plain")
        .register();
    let outer = types
        .class("Outer", "Outer")
        .element(
            ElementDescriptor::new("inner", inner.clone()).with_edit(
                ElementEditData::field("Inner").with_attribute(names::CHANGE_NOTIFY, "on_inner"),
            ),
        )
        .register();

    let mut graph = ObjectGraph::new();
    let value = graph.primitive(Primitive::F64(1.0));
    let plain = graph.primitive(Primitive::F64(2.0));
    let inner_obj = graph.object(inner, vec![value, plain]);
    let root = graph.object(outer.clone(), vec![inner_obj]);

    let (events, _) = record(&types, &graph, root, &outer);
    assert_eq!(events[1].attribute(names::CHANGE_NOTIFY), Some(&Value::from("on_inner")));
    assert_eq!(
        events[2].attribute(names::CHANGE_NOTIFY),
        Some(&Value::Array(vec![Value::from("on_inner"), Value::from("on_value")]))
    );
    assert_eq!(events[3].attribute(names::CHANGE_NOTIFY), Some(&Value::from("on_inner")));
}

#[test]
fn test_enum_field_delivered_as_underlying_value() {
    let mut types = TypeRegistry::new();
    let mode = types.enumeration("Mode", "Mode", PrimitiveKind::U8, &[("Off", 0), ("On", 1)]);
    let lamp = types
        .class("Lamp", "Lamp")
        .edited_field("mode", mode.clone(), "Mode")
        .register();
    let mut graph = ObjectGraph::new();
    let on = graph.enum_value(mode, Primitive::U8(1));
    let root = graph.object(lamp.clone(), vec![on]);

    let (events, report) = record(&types, &graph, root, &lamp);
    assert_eq!(report.values, 1);
    let field = values(&events).next().unwrap();
    assert_eq!(field.value, Some(Value::Uint(1)));
    assert_eq!(field.attribute(names::VALUE_TYPE), Some(&Value::from("u64")));
    assert_eq!(field.attribute(names::ENUM_UNDERLYING_TYPE), Some(&Value::from("u8")));
    assert_eq!(
        field.attribute(names::GENERIC_VALUE_LIST),
        Some(&Value::Array(vec![
            Value::Array(vec![Value::Int(0), Value::from("Off")]),
            Value::Array(vec![Value::Int(1), Value::from("On")]),
        ]))
    );
}

#[test]
fn test_text_handler_delivers_strings() {
    let mut types = TypeRegistry::new();
    let named = types
        .class("Named", "Named")
        .edited_field("name", TypeId::STRING, "Name")
        .register();
    let mut graph = ObjectGraph::new();
    let name = graph.string("Key Light");
    let root = graph.object(named.clone(), vec![name]);

    let (events, _) = record(&types, &graph, root, &named);
    assert_eq!(events[1].kind, EventKind::Begin);
    assert_eq!(events[1].attribute(names::VALUE_TYPE), Some(&Value::from("string")));

    let (events, report) = record_with(
        |mut bridge| {
            bridge.register_text_handler(TypeId::STRING);
            bridge
        },
        &types,
        &graph,
        root,
        &named,
        Recorder::new(),
    );
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Named"),
        event(EventKind::Text, "Name"),
        event(EventKind::End, "Named"),
    ]);
    assert_eq!(events[1].value, Some(Value::from("Key Light")));
    assert_eq!(report.values, 1);
}

#[test]
fn test_unreadable_handled_value_warns() {
    let mut types = TypeRegistry::new();
    let angle = types.class("Angle", "Angle").register();
    let arm = types
        .class("Arm", "Arm")
        .edited_field("angle", angle.clone(), "Angle")
        .register();
    let mut graph = ObjectGraph::new();
    let bad = graph.insert(angle.clone(), Data::String("north".to_string()));
    let root = graph.object(arm.clone(), vec![bad]);

    let (events, report) = record_with(
        |mut bridge| {
            bridge.register_handler(angle, PrimitiveKind::F32);
            bridge
        },
        &types,
        &graph,
        root,
        &arm,
        Recorder::new(),
    );
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Arm"),
        event(EventKind::End, "Arm"),
    ]);
    assert_eq!(report.values, 0);
    assert_eq!(report.warnings[0].kind, WarningKind::UnreadablePrimitive);
    assert_eq!(report.warnings[0].path, "/angle");
}

#[test]
fn test_unknown_attribute_is_reported() {
    let mut types = TypeRegistry::new();
    let probe = types
        .class("Probe", "Probe")
        .element(
            ElementDescriptor::new("x", TypeId::U8)
                .with_edit(ElementEditData::field("X").with_attribute("Bespoke", 1_u64)),
        )
        .register();
    let mut graph = ObjectGraph::new();
    let x = graph.primitive(Primitive::U8(9));
    let root = graph.object(probe.clone(), vec![x]);

    let (events, report) = record(&types, &graph, root, &probe);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::UnknownAttribute);
    assert_eq!(report.warnings[0].path, "/x");
    assert_eq!(values(&events).count(), 1);
}

#[test]
fn test_custom_handler_name_and_descriptions() {
    let mut types = TypeRegistry::new();
    let lamp = types
        .class("Lamp", "Lamp")
        .description("A lamp")
        .element(
            ElementDescriptor::new("level", TypeId::F32).with_edit(
                ElementEditData::field("Level")
                    .with_handler("Slider")
                    .with_description("Brightness"),
            ),
        )
        .register();
    let mut graph = ObjectGraph::new();
    let level = graph.primitive(Primitive::F32(0.5));
    let root = graph.object(lamp.clone(), vec![level]);

    let (events, _) = record_with(
        |bridge| {
            let mut registry = AttributeRegistry::with_defaults();
            registry.register_name("Slider").unwrap();
            bridge.with_registry(registry)
        },
        &types,
        &graph,
        root,
        &lamp,
        Recorder::new(),
    );
    assert_eq!(events[0].attribute(names::DESCRIPTION), Some(&Value::from("A lamp")));
    assert_eq!(events[1].attribute(names::HANDLER), Some(&Value::from("Slider")));
    assert_eq!(events[1].attribute(names::DESCRIPTION), Some(&Value::from("Brightness")));
}

#[test]
fn test_pointer_fields_resolve_to_target() {
    let mut types = TypeRegistry::new();
    let inner = types
        .class("Inner", "Inner")
        .edited_field("value", TypeId::F64, "Value")
        .register();
    let holder = types
        .class("Holder", "Holder")
        .element(
            ElementDescriptor::new("target", inner.clone())
                .with_edit(ElementEditData::field("Target"))
                .pointer(),
        )
        .element(
            ElementDescriptor::new("missing", inner.clone())
                .with_edit(ElementEditData::field("Missing"))
                .pointer(),
        )
        .register();

    let mut graph = ObjectGraph::new();
    let value = graph.primitive(Primitive::F64(4.0));
    let target = graph.object(inner.clone(), vec![value]);
    let pointer = graph.pointer(TypeId::new("*Inner"), Some(target));
    let null = graph.pointer(TypeId::new("*Inner"), None);
    let root = graph.object(holder.clone(), vec![pointer, null]);

    let (events, report) = record(&types, &graph, root, &holder);
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Holder"),
        event(EventKind::Begin, "Target"),
        event(EventKind::Value, "Value"),
        event(EventKind::End, "Target"),
        event(EventKind::End, "Holder"),
    ]);
    assert_eq!(events[1].type_id.as_ref(), Some(&inner));
    assert_eq!(events[2].attribute(names::PARENT_VALUE), Some(&Value::from(target)));
    assert!(report.is_balanced());
}

#[test]
fn test_fields_without_edit_data_show_children_only() {
    let mut types = TypeRegistry::new();
    let inner = types
        .class("Inner", "Inner")
        .edited_field("value", TypeId::F64, "Value")
        .register();
    let outer = types.class("Outer", "Outer").field("inner", inner.clone()).register();
    let mut graph = ObjectGraph::new();
    let value = graph.primitive(Primitive::F64(1.0));
    let inner_obj = graph.object(inner, vec![value]);
    let root = graph.object(outer.clone(), vec![inner_obj]);

    let (events, _) = record(&types, &graph, root, &outer);
    assert_eq!(events[1].visibility(), Some(Visibility::ShowChildrenOnly));
    assert_eq!(events[1].path(), Some(""));
    assert_eq!(events[2].path(), Some("/value"));
    assert_eq!(events[2].visibility(), Some(Visibility::Show));
}

#[test]
fn test_root_shown_when_not_visiting_from_root() {
    let (types, graph, light, root) = light();
    let config = TraversalConfig::builder().visit_from_root(false).build().unwrap();
    let (events, _) = record_with(
        |bridge| bridge.with_config(config),
        &types,
        &graph,
        root,
        &light,
        Recorder::new(),
    );
    assert_eq!(events[0].visibility(), Some(Visibility::Show));
}

#[test]
fn test_skip_object_still_ends_it() {
    let (types, graph, outer, root) = nested(ElementEditData::field("Inner"));
    let (events, report) = record_with(
        |bridge| bridge,
        &types,
        &graph,
        root,
        &outer,
        Recorder::new().skip_path("/inner"),
    );
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Outer"),
        event(EventKind::Begin, "Inner"),
        event(EventKind::End, "Inner"),
        event(EventKind::Value, "Shown"),
        event(EventKind::End, "Outer"),
    ]);
    assert!(report.is_balanced());
}

/// Skips the group with the given label.
struct SkipGroup {
    recorder: Recorder,
    label: &'static str,
}

impl Visitor for SkipGroup {
    fn visit_object_begin(
        &mut self,
        access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse {
        let response = self.recorder.visit_object_begin(access, attributes);
        if attributes.find(names::LABEL) == Some(&Value::from(self.label)) {
            VisitResponse::Skip
        } else {
            response
        }
    }

    fn visit_object_end(
        &mut self,
        access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse {
        self.recorder.visit_object_end(access, attributes)
    }

    fn visit_value(&mut self, value: Primitive, attributes: &dyn Attributes) -> VisitResponse {
        self.recorder.visit_value(value, attributes)
    }
}

#[test]
fn test_skipped_group_suppresses_its_fields() {
    let (types, graph, light, root) = light();
    let introspection = MemoryIntrospection::new(&types, &graph);
    let mut visitor = SkipGroup {
        recorder: Recorder::new(),
        label: "General",
    };
    let report = ReflectionBridge::new(&introspection)
        .visit(&mut visitor, root, &light)
        .unwrap();

    assert_eq!(outline(visitor.recorder.events()), vec![
        event(EventKind::Begin, "Light"),
        event(EventKind::Begin, "General"),
        event(EventKind::End, "General"),
        event(EventKind::Begin, "Shadows"),
        event(EventKind::Value, "Bias"),
        event(EventKind::End, "Shadows"),
        event(EventKind::End, "Light"),
    ]);
    assert!(report.is_balanced());
    assert_eq!(report.values, 1);
}

#[test]
fn test_stop_ends_traversal() {
    let (types, graph, light, root) = light();
    let (events, report) = record_with(
        |bridge| bridge,
        &types,
        &graph,
        root,
        &light,
        Recorder::new().stop_after(2),
    );
    assert_eq!(outline(&events), vec![
        event(EventKind::Begin, "Light"),
        event(EventKind::Begin, "General"),
    ]);
    assert!(report.stopped);
    assert!(!report.is_balanced());
}

#[test]
fn test_traversal_is_repeatable() {
    let (types, graph, light, root) = light();
    let (first, _) = record(&types, &graph, root, &light);
    let (second, _) = record(&types, &graph, root, &light);
    assert_eq!(first, second);
}

#[test]
fn test_document_of_map_has_one_row_per_entry() {
    let mut types = TypeRegistry::new();
    let counts = types.map("Counts", TypeId::STRING, TypeId::U32);
    let inventory = types
        .class("Inventory", "Inventory")
        .group("Stock")
        .edited_field("counts", counts.clone(), "Counts")
        .edited_field("locked", TypeId::BOOL, "Locked")
        .register();

    let mut graph = ObjectGraph::new();
    let entries = ["apples", "pears", "plums"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let key = graph.string(name);
            let value = graph.primitive(Primitive::U32(u32::try_from(i).unwrap()));
            (key, value)
        })
        .collect::<Vec<_>>();
    let map = graph.map(counts.clone(), TypeRegistry::pair_type(&counts), entries);
    let locked = graph.primitive(Primitive::Bool(false));
    let root = graph.object(inventory.clone(), vec![map, locked]);

    let introspection = MemoryIntrospection::new(&types, &graph);
    let mut builder = DocumentBuilder::new();
    let report = ReflectionBridge::new(&introspection)
        .visit(&mut builder, root, &inventory)
        .unwrap();
    assert!(report.is_balanced());

    let document = builder.into_document();
    let rows = document.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let stock = rows[0].as_object().unwrap();
    assert_eq!(stock["label"], Value::from("Stock"));

    let fields = stock["children"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    let map_row = fields[0].as_object().unwrap();
    assert_eq!(map_row["path"], Value::from("/counts"));
    let entry_rows = map_row["children"].as_array().unwrap();
    let labels: Vec<_> = entry_rows
        .iter()
        .map(|row| row.as_object().unwrap()["label"].clone())
        .collect();
    assert_eq!(labels, vec![
        Value::from("apples"),
        Value::from("pears"),
        Value::from("plums")
    ]);
    assert_eq!(fields[1].as_object().unwrap()["value"], Value::Bool(false));
}
