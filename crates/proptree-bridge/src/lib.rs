//! Traversal engine for proptree.
//!
//! This crate walks a reflected object graph through an
//! [`Introspection`](proptree_reflect::Introspection) context and reports it
//! to a [`Visitor`] as a tree of objects and values, each carrying a resolved
//! attribute set.
//!
//! # Overview
//!
//! For every node the bridge:
//!
//! - **Resolves attributes** from the element edit metadata, the element
//!   declaration and the class declaration, in that precedence
//! - **Derives presentation attributes**: label, visibility, serialized
//!   path, handler, description, disabled state and container linkage
//! - **Injects group headers and UI elements** declared between fields
//! - **Flattens map entries** into value rows labeled by their key
//! - **Delivers primitives** as values rather than objects
//!
//! # Example
//!
//! ```rust
//! use proptree_bridge::{DocumentBuilder, ReflectionBridge};
//! use proptree_core::TypeId;
//! use proptree_reflect::memory::{MemoryIntrospection, ObjectGraph, TypeRegistry};
//! use proptree_reflect::Primitive;
//!
//! let mut types = TypeRegistry::new();
//! let light = types
//!     .class("Light", "Light")
//!     .group("General")
//!     .edited_field("intensity", TypeId::F32, "Intensity")
//!     .register();
//!
//! let mut graph = ObjectGraph::new();
//! let intensity = graph.primitive(Primitive::F32(2.0));
//! let root = graph.object(light.clone(), vec![intensity]);
//!
//! let introspection = MemoryIntrospection::new(&types, &graph);
//! let mut builder = DocumentBuilder::new();
//! ReflectionBridge::new(&introspection)
//!     .visit(&mut builder, root, &light)
//!     .unwrap();
//!
//! let document = builder.into_document();
//! assert_eq!(document.as_array().map(<[_]>::len), Some(1));
//! ```

mod document;
mod driver;
mod frame;
mod handlers;
mod pairs;
mod recorder;
mod report;
mod resolver;
mod stack;
mod synthetic;
mod visibility;
mod visitor;

pub use document::DocumentBuilder;
pub use driver::{ReflectionBridge, visit_instance};
pub use frame::{EffectiveType, ElementSource, Frame};
pub use handlers::{HandlerRegistry, ValueHandler};
pub use recorder::{EventKind, Recorder, VisitEvent};
pub use report::TraversalReport;
pub use stack::FrameStack;
pub use visitor::{Attributes, ObjectAccess, VisitResponse, Visitor};
