//! The boundary between the style engine and the UI layer that owns the
//! elements.
//!
//! The engine decides *which* values reach *which* element and *when*; the
//! host turns them into visual changes, reports layout metrics, and wires
//! pointer events to the [`RuleHandler`]s the cascade hands it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use quokka_dom::{Document, NodeId};
use strum_macros::{Display, EnumString};

use crate::cascade::apply_rules;
use crate::error::StyleError;
use crate::rules::{PropertyValue, Rule, RuleInvoke};

/// Pixels per millimetre at 96 dpi.
pub const DEFAULT_DOTS_PER_MILLIMETER: f64 = 3.7795;

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Layout facts needed to resolve relative lengths for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMetrics {
    /// Content width of the parent, padding excluded.
    pub parent_width: f64,
    /// Content height of the parent, padding excluded.
    pub parent_height: f64,
    /// The element's font size in pixels.
    pub font_size: f64,
    /// Device resolution.
    pub dots_per_millimeter: f64,
}

impl Default for ElementMetrics {
    fn default() -> Self {
        Self {
            parent_width: 0.0,
            parent_height: 0.0,
            font_size: DEFAULT_FONT_SIZE,
            dots_per_millimeter: DEFAULT_DOTS_PER_MILLIMETER,
        }
    }
}

/// Pointer events a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PointerEvent {
    /// The pointer moved onto the element.
    Enter,
    /// The pointer left the element.
    Exit,
    /// A button was pressed on the element.
    Press,
    /// The button was released.
    Release,
}

/// What the engine needs from the UI layer.
pub trait StyleHost {
    /// Apply resolved values of one property to an element.
    ///
    /// # Errors
    ///
    /// Usually [`StyleError::PropertyApplyFailed`] when the property is not
    /// supported or a value cannot be used. The cascade collects the error
    /// and carries on.
    fn apply_property(
        &mut self,
        element: NodeId,
        property: &str,
        values: &[PropertyValue],
    ) -> Result<(), StyleError>;

    /// Metrics used to resolve `%`, `em` and physical units for `element`.
    fn metrics(&self, element: NodeId) -> ElementMetrics;

    /// Drop whatever dynamic layout state earlier rule applications left on
    /// the element, before a handler re-applies its rules.
    fn clear_dynamic_layout(&mut self, element: NodeId);

    /// Keep `handler` and call [`RuleHandler::fire`] whenever `event`
    /// happens on `element`.
    fn register_handler(&mut self, element: NodeId, event: PointerEvent, handler: RuleHandler);
}

/// Re-applies an element's rules on a pointer event.
///
/// Firing clears the element's dynamic layout, re-applies the immediate
/// rules and then, for an enter or press handler, the rules of its dynamic
/// layer on top. The element's inline `style` rules run last, as they do in
/// the cascade.
#[derive(Debug, Clone)]
pub struct RuleHandler {
    element: NodeId,
    rules: Rc<[Rule]>,
    inline: Rc<[Rule]>,
    layer: Option<RuleInvoke>,
    custom_vars: Rc<BTreeMap<String, Vec<String>>>,
}

impl RuleHandler {
    pub(crate) fn new(
        element: NodeId,
        rules: Rc<[Rule]>,
        inline: Rc<[Rule]>,
        layer: Option<RuleInvoke>,
        custom_vars: Rc<BTreeMap<String, Vec<String>>>,
    ) -> Self {
        Self {
            element,
            rules,
            inline,
            layer,
            custom_vars,
        }
    }

    /// The element this handler styles.
    #[must_use]
    pub const fn element(&self) -> NodeId {
        self.element
    }

    /// The invocation layered over the immediate rules, `None` for a
    /// handler that reverts to them.
    #[must_use]
    pub const fn layer(&self) -> Option<RuleInvoke> {
        self.layer
    }

    /// Run the handler against `host`. Failed applications are returned,
    /// the remaining rules still run.
    pub fn fire<H: StyleHost + ?Sized>(&self, host: &mut H, document: &Document) -> Vec<StyleError> {
        tracing::debug!(element = self.element.0, layer = ?self.layer, "firing rule handler");
        host.clear_dynamic_layout(self.element);

        let live = |invocation: RuleInvoke| {
            self.rules
                .iter()
                .filter(move |r| r.invocation == invocation && !r.self_destruct)
        };
        let mut problems = apply_rules(
            host,
            document,
            self.element,
            live(RuleInvoke::Immediate),
            &self.custom_vars,
        );
        if let Some(layer) = self.layer {
            problems.extend(apply_rules(
                host,
                document,
                self.element,
                live(layer),
                &self.custom_vars,
            ));
        }
        problems.extend(apply_rules(
            host,
            document,
            self.element,
            self.inline.iter(),
            &self.custom_vars,
        ));
        problems
    }
}

/// One recorded [`StyleHost::apply_property`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedProperty {
    /// The styled element.
    pub element: NodeId,
    /// The property name.
    pub property: String,
    /// The resolved values.
    pub values: Vec<PropertyValue>,
}

/// A host that records everything instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingHost {
    default_metrics: ElementMetrics,
    metrics: HashMap<NodeId, ElementMetrics>,
    rejected: HashSet<String>,
    applied: Vec<AppliedProperty>,
    cleared: Vec<NodeId>,
    handlers: Vec<(NodeId, PointerEvent, RuleHandler)>,
}

impl RecordingHost {
    /// A host reporting [`ElementMetrics::default`] for every element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A host reporting `metrics` for elements without their own.
    #[must_use]
    pub fn with_metrics(metrics: ElementMetrics) -> Self {
        Self {
            default_metrics: metrics,
            ..Self::default()
        }
    }

    /// Report `metrics` for `element`.
    pub fn set_metrics(&mut self, element: NodeId, metrics: ElementMetrics) {
        let _ = self.metrics.insert(element, metrics);
    }

    /// Fail every application of `property`.
    pub fn reject_property(&mut self, property: &str) {
        let _ = self.rejected.insert(property.to_ascii_lowercase());
    }

    /// All applications in call order.
    #[must_use]
    pub fn applied(&self) -> &[AppliedProperty] {
        &self.applied
    }

    /// Applications to `element` in call order.
    pub fn applied_to(&self, element: NodeId) -> impl Iterator<Item = &AppliedProperty> {
        self.applied.iter().filter(move |a| a.element == element)
    }

    /// The values most recently applied to `element` for `property`.
    #[must_use]
    pub fn current_value(&self, element: NodeId, property: &str) -> Option<&[PropertyValue]> {
        self.applied
            .iter()
            .rev()
            .find(|a| a.element == element && a.property == property)
            .map(|a| a.values.as_slice())
    }

    /// Elements whose dynamic layout was cleared, in call order.
    #[must_use]
    pub fn cleared(&self) -> &[NodeId] {
        &self.cleared
    }

    /// The handler most recently registered for `event` on `element`.
    #[must_use]
    pub fn handler(&self, element: NodeId, event: PointerEvent) -> Option<&RuleHandler> {
        self.handlers
            .iter()
            .rev()
            .find(|(e, ev, _)| *e == element && *ev == event)
            .map(|(_, _, handler)| handler)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Forget recorded applications and clears, keeping handlers.
    pub fn reset_log(&mut self) {
        self.applied.clear();
        self.cleared.clear();
    }

    /// Fire the handler registered for `event` on `element`, as a UI event
    /// loop would. `None` when there is no such handler.
    pub fn dispatch(
        &mut self,
        element: NodeId,
        event: PointerEvent,
        document: &Document,
    ) -> Option<Vec<StyleError>> {
        let handler = self.handler(element, event)?.clone();
        Some(handler.fire(self, document))
    }
}

impl StyleHost for RecordingHost {
    fn apply_property(
        &mut self,
        element: NodeId,
        property: &str,
        values: &[PropertyValue],
    ) -> Result<(), StyleError> {
        if self.rejected.contains(property) {
            return Err(StyleError::apply_failed(property, "property is not supported"));
        }
        self.applied.push(AppliedProperty {
            element,
            property: property.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }

    fn metrics(&self, element: NodeId) -> ElementMetrics {
        self.metrics
            .get(&element)
            .copied()
            .unwrap_or(self.default_metrics)
    }

    fn clear_dynamic_layout(&mut self, element: NodeId) {
        self.cleared.push(element);
    }

    fn register_handler(&mut self, element: NodeId, event: PointerEvent, handler: RuleHandler) {
        tracing::trace!(element = element.0, %event, "handler registered");
        self.handlers.push((element, event, handler));
    }
}
