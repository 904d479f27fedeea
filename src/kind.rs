use std::fmt;

use crate::config::LayoutConfig;
use crate::css::collapse_whitespace;
use crate::diagnostics::Finding;
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::host::ChildShape;
use crate::params::{Attributes, DecodeAdvisory, ParamDef, Params};

/// What a template sees when it renders
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    /// Attribute selector matching every instance sharing the fingerprint
    pub selector: &'a str,
    pub params: &'a Params,
}

/// Per-kind CSS template
pub type Template = fn(&StyleContext<'_>) -> String;

/// Runtime measurement a kind needs when the host lacks a CSS feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    None,
    /// Measure `width_param` once, then toggle `class` while the element is wider
    Breakpoint {
        width_param: &'static str,
        class: &'static str,
    },
    /// Toggle `class` while the content overflows horizontally
    Overflow { class: &'static str },
}

/// A component kind: its parameter schema, its template and its checks
pub struct ComponentKind {
    /// PascalCase name, also the fingerprint prefix
    pub name: &'static str,
    /// Custom element name, e.g. `grid-l`
    pub element: &'static str,
    /// Declared parameter order is fingerprint order
    pub params: &'static [ParamDef],
    pub template: Template,
    /// Whether the parameters call for a stylesheet at all
    pub gate: fn(&Params) -> bool,
    pub check: fn(&Params, ChildShape) -> Vec<Finding>,
    pub fallback: Fallback,
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentKind")
            .field("name", &self.name)
            .field("element", &self.element)
            .field("params", &self.params)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl ComponentKind {
    pub fn param(&self, name: &str) -> Option<&'static ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn recognizes(&self, name: &str) -> bool {
        self.observed_attributes().any(|a| a == name)
    }

    pub fn observed_attributes(&self) -> impl Iterator<Item = &'static str> {
        self.params.iter().map(|p| p.name)
    }

    pub fn resolve(&self, attrs: &Attributes) -> (Params, Vec<DecodeAdvisory>) {
        Params::resolve(self.params, attrs)
    }

    pub fn fingerprint(&self, params: &Params) -> Fingerprint {
        fingerprint(self.name, params)
    }

    /// Render the stylesheet for `fingerprint`
    pub fn synthesize(
        &self,
        params: &Params,
        fingerprint: &Fingerprint,
        config: &LayoutConfig,
    ) -> String {
        let selector = fingerprint.selector(&config.tag_attribute);
        let css = (self.template)(&StyleContext {
            selector: &selector,
            params,
        });
        if config.minify {
            collapse_whitespace(&css)
        } else {
            css
        }
    }
}

pub(crate) fn always(_: &Params) -> bool {
    true
}

pub(crate) fn no_checks(_: &Params, _: ChildShape) -> Vec<Finding> {
    Vec::new()
}
