//! The seam between the lifecycle core and whatever renders the elements.
//!
//! The core never touches a concrete document. An [`Environment`] answers
//! process-wide capability questions and accepts global stylesheets; an
//! [`Element`] is one rendered node an instance controls.

/// Opaque handle for a notification subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(pub u64);

/// Kinds of host notifications an instance can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observation {
    /// The element's content box changed size
    Resize,
    /// Children were added to or removed from the element
    ChildList,
}

/// Child cardinality of an element, as far as the structural checks need it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildShape {
    pub children: usize,
    /// Number of children of the first child, if there is one
    pub first_child_children: Option<usize>,
}

pub trait Environment {
    /// Attach `css` as a global stylesheet identified by `id`. Returns `false`
    /// when the host has no way to attach global styles.
    fn attach_style(&mut self, id: &str, css: &str) -> bool;

    /// CSS feature query, as in `@supports (property: value)`
    fn supports(&self, property: &str, value: &str) -> bool;

    fn can_observe(&self, observation: Observation) -> bool;
}

pub trait Element {
    fn set_attribute(&mut self, name: &str, value: &str);

    fn toggle_class(&mut self, class: &str, on: bool);

    fn child_shape(&self) -> ChildShape;

    /// Insert an invisible child whose width is `width`, read its used width
    /// in pixels and remove it again, all within the current turn. `None`
    /// when the host cannot measure.
    fn probe_width(&mut self, width: &str) -> Option<f64>;

    fn scroll_width(&self) -> f64;

    fn client_width(&self) -> f64;

    fn observe(&mut self, observation: Observation) -> Option<ObserverHandle>;

    fn unobserve(&mut self, handle: ObserverHandle);
}
