//! The traversal driver.
//!
//! The driver receives depth-first enumeration callbacks from the
//! introspection context, keeps the frame stack in step with them, and turns
//! them into visitor events. Synthetic group headers and UI elements are
//! injected between fields, map entries are flattened into labeled value
//! rows, and handled types are delivered as values instead of objects.

use std::fmt;

use proptree_core::{BridgeError, Name, TraversalConfig, TraversalWarning, TypeId, Value, Visibility, WarningKind, names};
use proptree_reflect::{
    AttributeRegistry, ClassDescriptor, ElementDescriptor, EnumerationSink, InstanceHandle,
    Introspection, PrimitiveKind,
};

use crate::frame::{ElementSource, Frame};
use crate::handlers::{HandlerRegistry, ValueHandler};
use crate::pairs;
use crate::report::{Diagnostics, TraversalReport};
use crate::resolver;
use crate::stack::FrameStack;
use crate::synthetic::{PendingElement, SyntheticQueue};
use crate::visitor::{FrameView, VisitResponse, Visitor};

const UNREGISTERED_TYPE: &str = "<unregistered type>";

/// Entry point for traversing an object graph with a [`Visitor`].
///
/// # Example
///
/// ```
/// use proptree_bridge::{Recorder, ReflectionBridge};
/// use proptree_core::TypeId;
/// use proptree_reflect::memory::{MemoryIntrospection, ObjectGraph, TypeRegistry};
/// use proptree_reflect::Primitive;
///
/// let mut types = TypeRegistry::new();
/// let light = types
///     .class("Light", "Light")
///     .edited_field("intensity", TypeId::F32, "Intensity")
///     .register();
///
/// let mut graph = ObjectGraph::new();
/// let intensity = graph.primitive(Primitive::F32(2.5));
/// let root = graph.object(light.clone(), vec![intensity]);
///
/// let introspection = MemoryIntrospection::new(&types, &graph);
/// let bridge = ReflectionBridge::new(&introspection);
/// let mut recorder = Recorder::new();
/// let report = bridge.visit(&mut recorder, root, &light).unwrap();
///
/// assert!(report.is_balanced());
/// assert_eq!(report.values, 1);
/// ```
pub struct ReflectionBridge<'i> {
    introspection: &'i dyn Introspection,
    registry: AttributeRegistry,
    config: TraversalConfig,
    handlers: Vec<(TypeId, ValueHandler)>,
}

impl<'i> ReflectionBridge<'i> {
    /// Create a bridge with the default attribute registry and config.
    pub fn new(introspection: &'i dyn Introspection) -> Self {
        Self {
            introspection,
            registry: AttributeRegistry::with_defaults(),
            config: TraversalConfig::default(),
            handlers: Vec::new(),
        }
    }

    /// Use a custom configuration.
    pub fn with_config(mut self, config: TraversalConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom attribute registry.
    pub fn with_registry(mut self, registry: AttributeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Deliver values of `type_id` through `visit_value`, read as `kind`.
    pub fn register_handler(&mut self, type_id: TypeId, kind: PrimitiveKind) {
        self.handlers.push((type_id, ValueHandler::Primitive(kind)));
    }

    /// Deliver values of `type_id` as text through `visit_text`.
    pub fn register_text_handler(&mut self, type_id: TypeId) {
        self.handlers.push((type_id, ValueHandler::Text));
    }

    /// The traversal configuration.
    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// The attribute registry.
    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// Traverse the instance `root` of type `root_type`.
    pub fn visit(
        &self,
        visitor: &mut dyn Visitor,
        root: InstanceHandle,
        root_type: &TypeId,
    ) -> Result<TraversalReport, BridgeError> {
        let mut handlers = default_handlers(&self.config);
        for (type_id, handler) in &self.handlers {
            handlers.register(type_id.clone(), *handler);
        }
        run(
            visitor,
            root,
            root_type,
            Some(self.introspection),
            &self.registry,
            &handlers,
            &self.config,
        )
    }
}

impl fmt::Debug for ReflectionBridge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionBridge")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// Traverse `root` with an explicitly supplied context.
///
/// Fails without emitting any event when no introspection context is given
/// or the context carries no edit metadata.
pub fn visit_instance(
    visitor: &mut dyn Visitor,
    root: InstanceHandle,
    root_type: &TypeId,
    introspection: Option<&dyn Introspection>,
    registry: &AttributeRegistry,
    config: &TraversalConfig,
) -> Result<TraversalReport, BridgeError> {
    let handlers = default_handlers(config);
    run(visitor, root, root_type, introspection, registry, &handlers, config)
}

fn default_handlers(config: &TraversalConfig) -> HandlerRegistry {
    if config.primitive_handlers {
        HandlerRegistry::with_primitives()
    } else {
        HandlerRegistry::new()
    }
}

fn run(
    visitor: &mut dyn Visitor,
    root: InstanceHandle,
    root_type: &TypeId,
    introspection: Option<&dyn Introspection>,
    registry: &AttributeRegistry,
    handlers: &HandlerRegistry,
    config: &TraversalConfig,
) -> Result<TraversalReport, BridgeError> {
    let Some(introspection) = introspection else {
        tracing::error!(target: "proptree::bridge", "No introspection context available");
        return Err(BridgeError::MissingIntrospection);
    };
    if !introspection.has_edit_metadata() {
        tracing::error!(target: "proptree::bridge", "Introspection context has no edit metadata");
        return Err(BridgeError::MissingEditMetadata);
    }
    if let Err(err) = config.validate() {
        tracing::error!(target: "proptree::bridge", "{err}");
        return Err(err);
    }
    if introspection.find_class(root_type).is_none() {
        return Err(BridgeError::UnknownType {
            type_id: root_type.clone(),
        });
    }

    let mut traversal = Traversal {
        introspection,
        registry,
        handlers,
        visit_from_root: config.visit_from_root,
        visitor,
        stack: FrameStack::new(Frame::sentinel(root, root_type.clone())),
        pending: SyntheticQueue::new(),
        diagnostics: Diagnostics::new(config),
        report: TraversalReport::default(),
    };
    introspection.enumerate(root, root_type, &mut traversal);
    let report = traversal.finish();

    tracing::debug!(
        target: "proptree::bridge",
        root_type = %root_type,
        objects = report.objects_begun,
        values = report.values,
        warnings = report.warnings.len(),
        stopped = report.stopped,
        "traversal complete"
    );
    Ok(report)
}

/// Path of a child of `parent`: the position under containers, the field
/// name for fields with edit metadata, the parent's path otherwise.
fn child_path(parent: &Frame<'_>, element: Option<&ElementDescriptor>) -> String {
    if parent.is_container() {
        return format!("{}/{}", parent.path, parent.child_position);
    }
    match element {
        Some(element) if element.edit.is_some() && !element.name.is_empty() => {
            format!("{}/{}", parent.path, element.name)
        }
        _ => parent.path.clone(),
    }
}

fn type_name<'a>(introspection: &'a dyn Introspection, frame: &Frame<'_>) -> &'a str {
    introspection
        .find_class(frame.type_id.effective())
        .map_or(UNREGISTERED_TYPE, |class| class.name.as_str())
}

/// State of one traversal.
struct Traversal<'a, 'v> {
    introspection: &'a dyn Introspection,
    registry: &'a AttributeRegistry,
    handlers: &'a HandlerRegistry,
    visit_from_root: bool,
    visitor: &'v mut dyn Visitor,
    stack: FrameStack<'a>,
    pending: SyntheticQueue<'a>,
    diagnostics: Diagnostics<'a>,
    report: TraversalReport,
}

impl<'a> Traversal<'a, '_> {
    fn finish(self) -> TraversalReport {
        let mut report = self.report;
        self.diagnostics.finish(&mut report);
        report
    }

    fn stopped(&self) -> bool {
        self.report.stopped
    }

    fn push(&mut self, frame: Frame<'a>) {
        tracing::trace!(
            target: "proptree::bridge",
            depth = self.stack.len(),
            path = %frame.path,
            synthetic = frame.element.is_synthetic(),
            suppressed = frame.suppressed,
            "push frame"
        );
        self.stack.push(frame);
    }

    fn respond(&mut self, response: VisitResponse) -> VisitResponse {
        if response == VisitResponse::Stop && !self.report.stopped {
            tracing::debug!(target: "proptree::bridge", "visitor stopped the traversal");
            self.report.stopped = true;
        }
        response
    }

    /// A frame for a node reported under the current top.
    fn child_frame(
        &self,
        instance: InstanceHandle,
        class: &'a ClassDescriptor,
        element: Option<&'a ElementDescriptor>,
    ) -> Frame<'a> {
        let parent = self.stack.top();
        let source = element.map_or(ElementSource::None, ElementSource::Field);
        let mut frame = Frame::new(
            instance,
            Some(parent.instance),
            class.type_id.clone(),
            Some(class),
            source,
            child_path(parent, element),
        );
        frame.is_ancestor_disabled = parent.disable_editor || parent.is_ancestor_disabled;
        frame
    }

    fn resolve_top(&mut self) {
        let Some((frame, ancestors)) = self.stack.split_top_mut() else {
            return;
        };
        resolver::cache_attributes(
            frame,
            ancestors,
            self.registry,
            self.visit_from_root,
            &mut self.diagnostics,
        );
        if let Some(parent) = ancestors.last() {
            resolver::inherit_change_notify(frame, parent);
        }
    }

    fn emit_begin(&mut self) -> VisitResponse {
        let frame = self.stack.top();
        let view = FrameView {
            frame,
            type_name: type_name(self.introspection, frame),
        };
        let response = self.visitor.visit_object_begin(&view, &view);
        self.report.objects_begun += 1;
        self.respond(response)
    }

    fn emit_end(&mut self, frame: &Frame<'_>) -> VisitResponse {
        let view = FrameView {
            frame,
            type_name: type_name(self.introspection, frame),
        };
        let response = self.visitor.visit_object_end(&view, &view);
        self.report.objects_ended += 1;
        self.respond(response)
    }

    /// Deliver the top frame through a value handler, if its type has one.
    fn deliver_value(&mut self) -> bool {
        let frame = self.stack.top();
        let handler_type = frame
            .find(&Name::empty(), names::ENUM_UNDERLYING_TYPE)
            .and_then(Value::as_str)
            .map_or_else(|| frame.type_id.effective().clone(), TypeId::new);
        let Some(handler) = self.handlers.get(&handler_type) else {
            return false;
        };

        let view = FrameView {
            frame,
            type_name: type_name(self.introspection, frame),
        };
        let response = match handler {
            ValueHandler::Primitive(kind) => self
                .introspection
                .read_primitive(frame.instance, kind)
                .map(|value| self.visitor.visit_value(value, &view)),
            ValueHandler::Text => self
                .introspection
                .read_string(frame.instance)
                .or_else(|| self.introspection.data_to_text(frame.instance, &handler_type))
                .map(|text| self.visitor.visit_text(&text, &view)),
        };
        if response.is_none() {
            self.diagnostics.warn(TraversalWarning::new(
                &frame.path,
                format!("Unable to read value of type {handler_type}"),
                WarningKind::UnreadablePrimitive,
            ));
        }

        self.stack.top_mut().entry_closed = true;
        if let Some(response) = response {
            self.report.values += 1;
            self.respond(response);
        }
        true
    }

    /// Handle the key of a map entry: label the entry with it and close it
    /// without descending.
    fn begin_key(
        &mut self,
        mut frame: Frame<'a>,
        class: &'a ClassDescriptor,
        element: Option<&'a ElementDescriptor>,
    ) -> bool {
        let label = pairs::stringify_key(self.introspection, frame.instance, class, element);
        if label.is_none() {
            self.diagnostics
                .warn(TraversalWarning::stringification(&frame.path, &class.type_id));
        }
        self.stack.top_mut().label_override = label;
        frame.entry_closed = true;
        self.push(frame);
        false
    }

    /// Release the synthetic elements keyed by `key` for the object at
    /// stack index `owner`.
    ///
    /// A group released after a sibling closes the open group first. Groups
    /// declared ahead of the first field nest in declaration order.
    fn flush(&mut self, key: &str, owner: usize) {
        let mut supersede = true;
        for pending in self.pending.take(key, owner) {
            if self.stopped() {
                break;
            }
            let is_group = pending.edit.is_group();
            self.open_synthetic(pending, supersede && is_group);
            if key.is_empty() {
                supersede &= !is_group;
            }
        }
    }

    fn open_synthetic(&mut self, pending: PendingElement<'a>, supersede: bool) {
        let edit = pending.edit;
        if supersede && self.stack.top().is_open_group() {
            self.close_synthetic();
            if self.stopped() {
                return;
            }
        }
        let group = if edit.is_group() {
            // An unnamed group only closes the previous one.
            let Some(name) = edit.group_name() else {
                return;
            };
            Some(name.to_string())
        } else {
            None
        };

        let Some(owner) = self.stack.get(pending.owner) else {
            return;
        };
        let mut frame = Frame::new(
            owner.instance,
            Some(owner.instance),
            owner.type_id.declared().clone(),
            Some(pending.class),
            ElementSource::Synthetic(edit),
            owner.path.clone(),
        );
        frame.group = group;

        let top = self.stack.top();
        if top.hides_new_children() {
            if frame.is_open_group() {
                frame.suppressed = true;
                self.push(frame);
            }
            return;
        }
        frame.is_ancestor_disabled = top.disable_editor || top.is_ancestor_disabled;
        let is_group = frame.is_open_group();

        self.push(frame);
        self.resolve_top();
        let response = self.emit_begin();
        if !is_group {
            if response != VisitResponse::Stop {
                self.close_synthetic();
            }
        } else if response == VisitResponse::Skip {
            self.stack.top_mut().skip_children = true;
        }
    }

    fn close_synthetic(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if !frame.suppressed {
            self.emit_end(&frame);
        }
    }
}

impl<'a> EnumerationSink<'a> for Traversal<'a, '_> {
    fn begin(
        &mut self,
        instance: InstanceHandle,
        class: &'a ClassDescriptor,
        element: Option<&'a ElementDescriptor>,
    ) -> bool {
        if self.stopped() {
            return false;
        }
        let owner = self.stack.enclosing_object_index();
        self.flush("", owner);
        if self.stopped() {
            return false;
        }

        let instance = match element {
            Some(element) if element.is_pointer => self
                .introspection
                .resolve_pointer(instance)
                .unwrap_or(instance),
            _ => instance,
        };
        let mut frame = self.child_frame(instance, class, element);

        let parent = self.stack.top();
        if parent.hides_new_children() {
            frame.suppressed = true;
            self.push(frame);
            return false;
        }
        if parent.extract_keyed_pair {
            if parent.child_element_index % 2 == 0 {
                return self.begin_key(frame, class, element);
            }
            frame.label_override = parent.label_override.clone();
        }
        if let Some(role) = pairs::classify(self.introspection, parent, instance, class) {
            pairs::apply(role, &mut frame, parent);
        }

        self.pending.scan(class, self.stack.next_index());
        self.push(frame);
        self.resolve_top();

        if self.stack.top().entry_closed {
            // Map entry: only its value is shown.
            return true;
        }
        if self.deliver_value() {
            return false;
        }
        self.emit_begin() == VisitResponse::Continue
    }

    fn end(&mut self) -> bool {
        if self.stopped() {
            return false;
        }
        while self.stack.top().is_open_group() {
            self.close_synthetic();
            if self.stopped() {
                return false;
            }
        }

        let Some(frame) = self.stack.pop() else {
            return true;
        };
        let index = self.stack.next_index();
        tracing::trace!(target: "proptree::bridge", depth = index, path = %frame.path, "pop frame");

        if !frame.entry_closed && !frame.suppressed && self.emit_end(&frame) == VisitResponse::Stop {
            return false;
        }
        self.pending.discard_owner(index);

        let parent = self.stack.top_mut();
        parent.child_position += 1;
        if !frame.suppressed && frame.visibility == Visibility::Show {
            parent.child_element_index += 1;
        }
        let owner = self.stack.enclosing_object_index();
        self.flush(frame.element.edit_name(), owner);
        !self.stopped()
    }
}
