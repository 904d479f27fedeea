//! In-memory host used by the page renderer and the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::host::{ChildShape, Element, Environment, ObserverHandle, Observation};

const DEFAULT_FONT_SIZE: f64 = 16.0;

/// A document head that records attached stylesheets
#[derive(Debug, Clone)]
pub struct VirtualEnvironment {
    pub styles: Vec<(String, String)>,
    pub can_attach_styles: bool,
    /// Whether `min()` is understood inside length values
    pub supports_min_function: bool,
    pub resize_observer: bool,
    pub mutation_observer: bool,
}

impl Default for VirtualEnvironment {
    fn default() -> Self {
        Self {
            styles: Vec::new(),
            can_attach_styles: true,
            supports_min_function: true,
            resize_observer: true,
            mutation_observer: true,
        }
    }
}

impl VirtualEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose CSS lacks `min()`, forcing the measured grid fallback
    pub fn without_min_function() -> Self {
        Self {
            supports_min_function: false,
            ..Self::default()
        }
    }

    pub fn style(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(i, _)| i == id)
            .map(|(_, css)| css.as_str())
    }
}

impl Environment for VirtualEnvironment {
    fn attach_style(&mut self, id: &str, css: &str) -> bool {
        if !self.can_attach_styles {
            return false;
        }
        self.styles.push((id.to_string(), css.to_string()));
        true
    }

    fn supports(&self, _property: &str, value: &str) -> bool {
        self.supports_min_function || !value.contains("min(")
    }

    fn can_observe(&self, observation: Observation) -> bool {
        match observation {
            Observation::Resize => self.resize_observer,
            Observation::ChildList => self.mutation_observer,
        }
    }
}

/// A single element with fixed measurements
#[derive(Debug, Clone)]
pub struct VirtualElement {
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub shape: ChildShape,
    pub client_width: f64,
    pub scroll_width: f64,
    pub font_size: f64,
    /// Number of probe elements inserted so far
    pub probes: usize,
    observers: BTreeMap<ObserverHandle, Observation>,
    next_handle: u64,
}

impl Default for VirtualElement {
    fn default() -> Self {
        Self {
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
            shape: ChildShape::default(),
            client_width: 0.0,
            scroll_width: 0.0,
            font_size: DEFAULT_FONT_SIZE,
            probes: 0,
            observers: BTreeMap::new(),
            next_handle: 1,
        }
    }
}

impl VirtualElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, children: usize) -> Self {
        self.shape.children = children;
        self
    }

    pub fn with_grandchildren(mut self, first_child_children: usize) -> Self {
        self.shape.first_child_children = Some(first_child_children);
        self
    }

    pub fn with_width(mut self, client_width: f64) -> Self {
        self.client_width = client_width;
        if self.scroll_width < client_width {
            self.scroll_width = client_width;
        }
        self
    }

    pub fn with_scroll_width(mut self, scroll_width: f64) -> Self {
        self.scroll_width = scroll_width;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Live subscriptions
    pub fn observers(&self) -> impl Iterator<Item = (ObserverHandle, Observation)> + '_ {
        self.observers.iter().map(|(h, o)| (*h, *o))
    }

    /// Resolve a simple CSS length against this element
    pub fn resolve_length(&self, width: &str) -> Option<f64> {
        static LENGTH: OnceLock<Regex> = OnceLock::new();
        let re = LENGTH.get_or_init(|| {
            Regex::new(r"^\s*(-?\d+(?:\.\d+)?)(px|rem|em|%)?\s*$").expect("length regex")
        });
        let caps = re.captures(width)?;
        let n: f64 = caps.get(1)?.as_str().parse().ok()?;
        match caps.get(2).map(|m| m.as_str()) {
            None if n == 0.0 => Some(0.0),
            None => None,
            Some("px") => Some(n),
            Some("rem") | Some("em") => Some(n * self.font_size),
            Some("%") => Some(self.client_width * n / 100.0),
            Some(_) => None,
        }
    }
}

impl Element for VirtualElement {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    fn child_shape(&self) -> ChildShape {
        self.shape
    }

    fn probe_width(&mut self, width: &str) -> Option<f64> {
        self.probes += 1;
        self.resolve_length(width)
    }

    fn scroll_width(&self) -> f64 {
        self.scroll_width
    }

    fn client_width(&self) -> f64 {
        self.client_width
    }

    fn observe(&mut self, observation: Observation) -> Option<ObserverHandle> {
        let handle = ObserverHandle(self.next_handle);
        self.next_handle += 1;
        self.observers.insert(handle, observation);
        Some(handle)
    }

    fn unobserve(&mut self, handle: ObserverHandle) {
        self.observers.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_length_units() {
        let el = VirtualElement::new().with_width(800.0);
        assert_eq!(el.resolve_length("250px"), Some(250.0));
        assert_eq!(el.resolve_length("15rem"), Some(240.0));
        assert_eq!(el.resolve_length("50%"), Some(400.0));
        assert_eq!(el.resolve_length("0"), Some(0.0));
        assert_eq!(el.resolve_length("var(--s1)"), None);
    }

    #[test]
    fn test_environment_without_min() {
        let env = VirtualEnvironment::without_min_function();
        assert!(!env.supports("width", "min(250px, 100%)"));
        assert!(env.supports("display", "grid"));
    }
}
