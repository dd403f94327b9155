//! JSON scene files: type declarations plus one root instance.
//!
//! ```json
//! {
//!   "types": [
//!     { "kind": "enum", "id": "Mode", "underlying": "u8", "values": { "Off": 0, "On": 1 } },
//!     { "kind": "sequence", "id": "Vec<f32>", "element": "f32" },
//!     { "kind": "class", "id": "Lamp", "elements": [
//!       { "kind": "group", "name": "General" },
//!       { "kind": "field", "name": "mode", "type": "Mode", "label": "Mode" }
//!     ] }
//!   ],
//!   "root": { "type": "Lamp", "value": { "mode": "On" } }
//! }
//! ```
//!
//! Instance values follow their declared type: numbers and booleans for
//! primitives, strings for `string` and enums, arrays for sequences and
//! sets, objects (or arrays of `[key, value]`) for maps, objects keyed by
//! field name for classes, and `null` for empty pointers.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use proptree_core::{TraversalConfig, TypeId};
use proptree_reflect::memory::{ObjectGraph, TypeRegistry};
use proptree_reflect::{
    AttributeRegistry, ClassDescriptor, ContainerKind, ElementDescriptor, ElementEditData,
    InstanceHandle, Primitive, PrimitiveKind, RegistryError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a scene.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown type '{type_id}' at {path}")]
    UnknownType { type_id: String, path: String },

    #[error("Unknown primitive kind '{0}'")]
    UnknownPrimitive(String),

    #[error("Expected {expected} at {path}")]
    Mismatch { path: String, expected: String },

    #[error("Missing field '{field}' at {path}")]
    MissingField { path: String, field: String },

    #[error("Unknown value '{value}' of enum '{enum_type}' at {path}")]
    UnknownEnumValue {
        path: String,
        enum_type: String,
        value: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A scene file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Attribute names used by the scene beyond the well-known ones.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Traversal configuration.
    #[serde(default)]
    pub config: TraversalConfig,
    /// Type declarations.
    pub types: Vec<TypeDef>,
    /// The instance to traverse.
    pub root: RootDef,
}

/// One type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDef {
    Class(ClassDef),
    Enum {
        id: String,
        #[serde(default)]
        name: Option<String>,
        underlying: String,
        values: IndexMap<String, i64>,
    },
    Sequence {
        id: String,
        element: String,
    },
    Set {
        id: String,
        element: String,
    },
    Map {
        id: String,
        key: String,
        value: String,
    },
}

/// A class declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Display name from the class edit metadata.
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub serializer: bool,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

/// One entry of a class: a field, a group header or a UI element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementDef {
    Field(FieldDef),
    Group {
        name: String,
    },
    Ui {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        attributes: IndexMap<String, serde_json::Value>,
    },
}

/// A field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    /// Display label; fields without one have no edit metadata.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub pointer: bool,
    /// Edit attributes.
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
    /// Edit attributes applied to the field's children.
    #[serde(default)]
    pub children: IndexMap<String, serde_json::Value>,
}

/// The root instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootDef {
    #[serde(rename = "type")]
    pub type_id: String,
    pub value: serde_json::Value,
}

/// A scene with its types registered and its instances built.
#[derive(Debug)]
pub struct LoadedScene {
    pub types: TypeRegistry,
    pub graph: ObjectGraph,
    pub root: InstanceHandle,
    pub root_type: TypeId,
}

impl Scene {
    /// Read a scene file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse scene JSON.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Attribute registry knowing the well-known names, the scene's own
    /// attribute names and every handler it references.
    pub fn attribute_registry(&self) -> Result<AttributeRegistry, SchemaError> {
        let mut registry = AttributeRegistry::with_defaults();
        let handlers = self.types.iter().flat_map(|def| match def {
            TypeDef::Class(class) => class
                .elements
                .iter()
                .filter_map(|element| match element {
                    ElementDef::Field(field) => field.handler.as_deref(),
                    _ => None,
                })
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        });
        for name in self.attributes.iter().map(String::as_str).chain(handlers) {
            registry.register_name(name)?;
        }
        Ok(registry)
    }

    /// Register the types and build the root instance.
    pub fn load(&self) -> Result<LoadedScene, SchemaError> {
        let types = self.register_types()?;
        let root_type = TypeId::new(self.root.type_id.as_str());
        let mut builder = InstanceBuilder {
            types: &types,
            graph: ObjectGraph::new(),
        };
        let root = builder.build(&root_type, &self.root.value, "")?;
        let graph = builder.graph;

        tracing::debug!(
            target: "proptree::schema",
            types = types.len(),
            instances = graph.len(),
            root_type = %root_type,
            "loaded scene"
        );
        Ok(LoadedScene {
            types,
            graph,
            root,
            root_type,
        })
    }

    fn register_types(&self) -> Result<TypeRegistry, SchemaError> {
        let mut types = TypeRegistry::new();
        // Enums first: map keys of enum type are tagged at registration.
        for def in &self.types {
            if let TypeDef::Enum {
                id,
                name,
                underlying,
                values,
            } = def
            {
                let kind = PrimitiveKind::from_type_id(&TypeId::new(underlying.as_str()))
                    .ok_or_else(|| SchemaError::UnknownPrimitive(underlying.clone()))?;
                let values: Vec<_> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
                types.enumeration(id.as_str(), name.as_deref().unwrap_or(id), kind, &values);
            }
        }
        for def in &self.types {
            match def {
                TypeDef::Sequence { id, element } => {
                    types.sequence(id.as_str(), TypeId::new(element.as_str()));
                }
                TypeDef::Set { id, element } => {
                    types.set(id.as_str(), TypeId::new(element.as_str()));
                }
                TypeDef::Map { id, key, value } => {
                    types.map(id.as_str(), TypeId::new(key.as_str()), TypeId::new(value.as_str()));
                }
                TypeDef::Class(class) => register_class(&mut types, class),
                TypeDef::Enum { .. } => {}
            }
        }
        Ok(types)
    }
}

fn register_class(types: &mut TypeRegistry, def: &ClassDef) {
    let mut class = types.class(def.id.as_str(), def.name.as_deref().unwrap_or(&def.id));
    if let Some(edit) = &def.edit {
        class = class.edit(edit.as_str());
    }
    if let Some(description) = &def.description {
        class = class.description(description.as_str());
    }
    if def.serializer {
        class = class.serializer();
    }
    for (name, value) in &def.attributes {
        class = class.attribute(name, value.clone());
    }

    for element in &def.elements {
        class = match element {
            ElementDef::Group { name } => class.group(name.as_str()),
            ElementDef::Ui { name, attributes } => {
                let mut edit = ElementEditData::ui_element();
                edit.name = name.as_deref().map(Into::into);
                for (attribute, value) in attributes {
                    edit = edit.with_attribute(attribute, value.clone());
                }
                class.ui_element(edit)
            }
            ElementDef::Field(field) => class.element(field_descriptor(field)),
        };
    }
    class.register();
}

fn field_descriptor(field: &FieldDef) -> ElementDescriptor {
    let mut element = ElementDescriptor::new(field.name.as_str(), TypeId::new(field.type_id.as_str()));
    if let Some(label) = &field.label {
        let mut edit = ElementEditData::field(label.as_str());
        if let Some(handler) = &field.handler {
            edit = edit.with_handler(handler);
        }
        if let Some(description) = &field.description {
            edit = edit.with_description(description.as_str());
        }
        for (name, value) in &field.attributes {
            edit = edit.with_attribute(name, value.clone());
        }
        for (name, value) in &field.children {
            edit = edit.with_raw_attribute(
                name,
                proptree_reflect::Attribute::constant(value.clone()).describing_children(),
            );
        }
        element = element.with_edit(edit);
    }
    if field.pointer {
        element = element.pointer();
    }
    element
}

/// Builds instances of registered types from JSON values.
struct InstanceBuilder<'t> {
    types: &'t TypeRegistry,
    graph: ObjectGraph,
}

impl InstanceBuilder<'_> {
    fn build(
        &mut self,
        type_id: &TypeId,
        value: &serde_json::Value,
        path: &str,
    ) -> Result<InstanceHandle, SchemaError> {
        if let Some(kind) = PrimitiveKind::from_type_id(type_id) {
            let primitive = primitive(kind, value).ok_or_else(|| mismatch(path, kind))?;
            return Ok(self.graph.primitive(primitive));
        }
        if *type_id == TypeId::STRING {
            let text = value.as_str().ok_or_else(|| mismatch(path, "a string"))?;
            return Ok(self.graph.string(text));
        }
        let types = self.types;
        if let Some(descriptor) = types.find_enum(type_id) {
            let number = match value {
                serde_json::Value::String(name) => descriptor
                    .values
                    .iter()
                    .find(|(n, _)| n == name.as_str())
                    .map(|(_, v)| *v)
                    .ok_or_else(|| SchemaError::UnknownEnumValue {
                        path: path.to_string(),
                        enum_type: type_id.to_string(),
                        value: name.clone(),
                    })?,
                other => other
                    .as_i64()
                    .ok_or_else(|| mismatch(path, "an enum value name"))?,
            };
            let primitive = Primitive::I64(number)
                .cast(descriptor.underlying)
                .ok_or_else(|| mismatch(path, descriptor.underlying))?;
            return Ok(self.graph.enum_value(type_id.clone(), primitive));
        }

        let class = types
            .find(type_id)
            .ok_or_else(|| SchemaError::UnknownType {
                type_id: type_id.to_string(),
                path: path.to_string(),
            })?;
        match &class.container {
            Some(container) => match container.kind {
                ContainerKind::Sequence | ContainerKind::Set => {
                    self.items(class, container.kind, value, path)
                }
                ContainerKind::Map => self.map(class, value, path),
                ContainerKind::Pair => Err(mismatch(path, "a map entry outside of a map")),
            },
            None => self.object(class, value, path),
        }
    }

    fn items(
        &mut self,
        class: &ClassDescriptor,
        kind: ContainerKind,
        value: &serde_json::Value,
        path: &str,
    ) -> Result<InstanceHandle, SchemaError> {
        let element = element_type(class, 0, path)?;
        let items = value
            .as_array()
            .ok_or_else(|| mismatch(path, "an array"))?
            .iter()
            .enumerate()
            .map(|(i, item)| self.build(&element, item, &format!("{path}/{i}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match kind {
            ContainerKind::Set => self.graph.set(class.type_id.clone(), items),
            _ => self.graph.sequence(class.type_id.clone(), items),
        })
    }

    fn map(
        &mut self,
        class: &ClassDescriptor,
        value: &serde_json::Value,
        path: &str,
    ) -> Result<InstanceHandle, SchemaError> {
        let pair_type = element_type(class, 0, path)?;
        let types = self.types;
        let pair = types.find(&pair_type).ok_or_else(|| SchemaError::UnknownType {
            type_id: pair_type.to_string(),
            path: path.to_string(),
        })?;
        let key_type = element_type(pair, 0, path)?;
        let value_type = element_type(pair, 1, path)?;

        let entries: Vec<(serde_json::Value, &serde_json::Value)> = match value {
            serde_json::Value::Object(object) => object
                .iter()
                .map(|(k, v)| (serde_json::Value::String(k.clone()), v))
                .collect(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item.as_array().map(Vec::as_slice) {
                    Some([k, v]) => Ok((k.clone(), v)),
                    _ => Err(mismatch(path, "a [key, value] pair")),
                })
                .collect::<Result<_, _>>()?,
            _ => return Err(mismatch(path, "an object or an array of pairs")),
        };

        let mut handles = Vec::with_capacity(entries.len());
        for (i, (key, value)) in entries.iter().enumerate() {
            let entry_path = format!("{path}/{i}");
            let key = self.build(&key_type, key, &format!("{entry_path}/0"))?;
            let value = self.build(&value_type, value, &format!("{entry_path}/1"))?;
            handles.push((key, value));
        }
        Ok(self.graph.map(class.type_id.clone(), pair_type, handles))
    }

    fn object(
        &mut self,
        class: &ClassDescriptor,
        value: &serde_json::Value,
        path: &str,
    ) -> Result<InstanceHandle, SchemaError> {
        let fields = value.as_object().ok_or_else(|| mismatch(path, "an object"))?;
        let mut handles = Vec::with_capacity(class.elements.len());
        for element in &class.elements {
            let field_path = format!("{path}/{}", element.name);
            let Some(field) = fields.get(element.name.as_str()) else {
                return Err(SchemaError::MissingField {
                    path: path.to_string(),
                    field: element.name.to_string(),
                });
            };
            let handle = if element.is_pointer {
                let target = if field.is_null() {
                    None
                } else {
                    Some(self.build(&element.type_id, field, &field_path)?)
                };
                self.graph.pointer(element.type_id.clone(), target)
            } else {
                self.build(&element.type_id, field, &field_path)?
            };
            handles.push(handle);
        }
        Ok(self.graph.object(class.type_id.clone(), handles))
    }
}

fn element_type(class: &ClassDescriptor, index: usize, path: &str) -> Result<TypeId, SchemaError> {
    class
        .container
        .as_ref()
        .and_then(|c| c.elements.get(index))
        .map(|e| e.type_id.clone())
        .ok_or_else(|| mismatch(path, format!("a complete container type '{}'", class.type_id)))
}

fn mismatch(path: &str, expected: impl ToString) -> SchemaError {
    SchemaError::Mismatch {
        path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        expected: expected.to_string(),
    }
}

fn primitive(kind: PrimitiveKind, value: &serde_json::Value) -> Option<Primitive> {
    let integer = || -> Option<Primitive> {
        let wide = value
            .as_i64()
            .map(i128::from)
            .or_else(|| value.as_u64().map(i128::from))?;
        let candidate = if wide < 0 {
            Primitive::I64(i64::try_from(wide).ok()?)
        } else {
            Primitive::U64(u64::try_from(wide).ok()?)
        };
        candidate.cast(kind)
    };
    match kind {
        PrimitiveKind::Bool => value.as_bool().map(Primitive::Bool),
        PrimitiveKind::Char => {
            let mut chars = value.as_str()?.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Primitive::Char(c)),
                _ => None,
            }
        }
        PrimitiveKind::F32 => value.as_f64().map(|v| Primitive::F32(v as f32)),
        PrimitiveKind::F64 => value.as_f64().map(Primitive::F64),
        _ => integer(),
    }
}
