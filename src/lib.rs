//! # Layout primitives
//!
//! Ten composable layout elements (box, center, cluster, cover, frame, grid,
//! imposter, reel, sidebar, switcher). Each derives a small stylesheet from
//! its parameters; identically configured instances share one stylesheet.
//!
//! ## Features
//! - Declarative parameter schemas with typed defaults
//! - Injective fingerprints of effective parameter values
//! - An append-only style registry that synthesizes each stylesheet at most once
//! - A lifecycle controller driven by explicit attach / change / detach events
//! - Measured fallbacks for hosts without `min()` (grid) and for overflow tracking (reel)
//!
//! ## Example
//! ```ignore
//! use layout_primitives::{
//!     primitives, LayoutConfig, LayoutInstance, RenderContext, StyleRegistry,
//!     VirtualElement, VirtualEnvironment,
//! };
//!
//! let config = LayoutConfig::default();
//! let mut env = VirtualEnvironment::new();
//! let mut registry = StyleRegistry::new();
//! let mut element = VirtualElement::new();
//!
//! let mut switcher = LayoutInstance::new(&primitives::SWITCHER);
//! let mut cx = RenderContext::new(&mut env, &mut registry, &config);
//! switcher.connect(&mut element, &mut cx);
//! switcher.update("limit", Some("3"), &mut element, &mut cx);
//! ```

pub mod config;
pub mod controller;
pub mod css;
pub mod diagnostics;
pub mod error;
pub mod fingerprint;
pub mod host;
pub mod kind;
pub mod observer;
pub mod page;
pub mod params;
pub mod primitives;
pub mod registry;
pub mod virtual_host;

// --- Core types ---
pub use config::LayoutConfig;
pub use controller::{
    LayoutInstance, LifecycleEvent, LifecycleState, ParamChange, RenderContext, RenderOutcome,
};
pub use diagnostics::{Diagnostic, Finding, Severity};
pub use error::{LayoutError, LayoutResult};
pub use fingerprint::{fingerprint, Fingerprint};
pub use host::{ChildShape, Element, Environment, ObserverHandle, Observation};
pub use kind::{ComponentKind, Fallback, StyleContext};
pub use observer::{FallbackState, Notification};
pub use params::{Attributes, Encoding, ParamDef, ParamValue, Params};
pub use registry::{Registration, SharedStyleRegistry, StyleEntry, StyleRegistry, StyleStore};
pub use virtual_host::{VirtualElement, VirtualEnvironment};

// --- Page rendering ---
pub use page::{InstanceDesc, Page, PageRender, RenderedInstance};

/// Parse a YAML page description
pub fn parse_page(yaml: &str) -> LayoutResult<page::Page> {
    page::parse_page(yaml)
}

/// Render a page description with the given configuration
pub fn render_page(page: &page::Page, config: &LayoutConfig) -> LayoutResult<PageRender> {
    page::render_page(page, config)
}
