//! Page descriptions: a YAML list of layout elements rendered offline
//! against the in-memory host.
//!
//! ```yaml
//! supportsMinFunction: false
//! instances:
//!   - element: grid-l
//!     attributes: { min: 20rem }
//!     width: 900
//!   - element: sidebar-l
//!     children: 1
//!     grandchildren: 2
//! ```

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::controller::{LayoutInstance, RenderContext, RenderOutcome};
use crate::diagnostics::Diagnostic;
use crate::error::{LayoutError, LayoutResult};
use crate::fingerprint::Fingerprint;
use crate::observer::{FallbackState, Notification};
use crate::params::Attributes;
use crate::primitives;
use crate::registry::{StyleRegistry, StyleStore};
use crate::virtual_host::{VirtualElement, VirtualEnvironment};

const MAX_INSTANCES: usize = 10_000;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default = "yes")]
    pub supports_min_function: bool,
    #[serde(default = "yes")]
    pub can_attach_styles: bool,
    #[serde(default)]
    pub instances: Vec<InstanceDesc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDesc {
    /// Custom element name, e.g. `switcher-l`
    pub element: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: usize,
    #[serde(default)]
    pub grandchildren: Option<usize>,
    /// Content width in pixels, delivered as a size notification after attach
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub scroll_width: Option<f64>,
}

/// One rendered element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedInstance {
    pub element: String,
    pub tag: Option<Fingerprint>,
    pub classes: Vec<String>,
    /// Layout mode of the measured fallback, when one is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_on: Option<bool>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRender {
    /// Every registered stylesheet, in registration order
    #[serde(skip)]
    pub stylesheet: String,
    /// Number of distinct stylesheets
    pub entries: usize,
    pub instances: Vec<RenderedInstance>,
}

impl PageRender {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.instances.iter().flat_map(|i| i.diagnostics.iter())
    }

    /// Machine-readable summary of every instance, without the stylesheet
    pub fn report_yaml(&self) -> LayoutResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn parse_page(yaml: &str) -> LayoutResult<Page> {
    let page: Page = serde_yaml::from_str(yaml)?;
    if page.instances.len() > MAX_INSTANCES {
        return Err(LayoutError::InvalidPage(format!(
            "too many instances: maximum {} per page",
            MAX_INSTANCES
        )));
    }
    Ok(page)
}

/// Attach every instance of `page` against a fresh registry
pub fn render_page(page: &Page, config: &LayoutConfig) -> LayoutResult<PageRender> {
    let mut env = VirtualEnvironment {
        supports_min_function: page.supports_min_function,
        can_attach_styles: page.can_attach_styles,
        ..VirtualEnvironment::new()
    };
    let mut store = StyleRegistry::new();
    let mut instances = Vec::with_capacity(page.instances.len());

    for desc in &page.instances {
        let kind = primitives::by_element(&desc.element)?;
        for (name, _) in desc.attributes.iter() {
            if !kind.recognizes(name) {
                tracing::debug!(element = kind.element, attribute = name, "ignoring attribute");
            }
        }

        let mut element = VirtualElement::new().with_children(desc.children);
        if let Some(n) = desc.grandchildren {
            element = element.with_grandchildren(n);
        }
        if let Some(w) = desc.width {
            element = element.with_width(w);
        }
        if let Some(w) = desc.scroll_width {
            element = element.with_scroll_width(w);
        }

        let mut instance = LayoutInstance::with_attributes(kind, desc.attributes.clone());
        let mut cx = RenderContext::new(&mut env, &mut store, config);
        let outcome = instance.connect(&mut element, &mut cx);

        if let Some(w) = desc.width {
            instance.notify(Notification::Resize { content_width: w }, &mut element);
        }
        if desc.scroll_width.is_some() {
            instance.notify(Notification::ChildList, &mut element);
        }

        instances.push(RenderedInstance {
            element: desc.element.clone(),
            tag: element
                .attribute(&config.tag_attribute)
                .and_then(|_| instance.fingerprint().cloned()),
            classes: element.classes.iter().cloned().collect(),
            fallback_on: instance.fallback().map(FallbackState::is_on),
            skipped: outcome == RenderOutcome::Skipped,
            diagnostics: instance.take_diagnostics(),
        });
    }

    Ok(PageRender {
        stylesheet: store.stylesheet(),
        entries: store.len(),
        instances,
    })
}
