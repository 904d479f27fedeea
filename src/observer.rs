//! Measured fallbacks for hosts that lack a CSS feature a template relies on.
//!
//! Grid probes its `min` width once and then follows size-change
//! notifications, toggling its class when the content width crosses the
//! probed breakpoint. Reel follows size changes and child-list mutations,
//! toggling its class while its content overflows.

use crate::host::{Element, Environment, ObserverHandle, Observation};
use crate::kind::Fallback;
use crate::params::Params;

/// A host notification delivered to an instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    Resize { content_width: f64 },
    ChildList,
}

/// Why no fallback state was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inactive {
    /// The kind has no fallback
    NotNeeded,
    /// The host handles the feature natively
    Native,
    /// A measurement or observation primitive is missing
    Unavailable(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointState {
    /// Probed width in pixels
    pub breakpoint: f64,
    pub above: bool,
    class: &'static str,
    subscription: ObserverHandle,
}

impl BreakpointState {
    fn on_resize<E: Element>(&mut self, content_width: f64, element: &mut E) -> Option<bool> {
        let above = content_width > self.breakpoint;
        if above == self.above {
            return None;
        }
        self.above = above;
        element.toggle_class(self.class, above);
        Some(above)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverflowState {
    pub overflowing: bool,
    class: &'static str,
    subscriptions: Vec<ObserverHandle>,
}

impl OverflowState {
    fn refresh<E: Element>(&mut self, element: &mut E) -> Option<bool> {
        let overflowing = element.scroll_width() > element.client_width();
        if overflowing == self.overflowing {
            return None;
        }
        self.overflowing = overflowing;
        element.toggle_class(self.class, overflowing);
        Some(overflowing)
    }
}

/// Per-instance fallback state, created on attach
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackState {
    Breakpoint(BreakpointState),
    Overflow(OverflowState),
}

impl FallbackState {
    /// Set up the fallback `fallback` calls for, if the host needs one and can support it.
    ///
    /// The breakpoint probe runs synchronously here, before control returns
    /// to the host, so the probe element is never painted.
    pub fn activate<E, V>(
        fallback: Fallback,
        params: &Params,
        element: &mut E,
        env: &V,
    ) -> Result<Self, Inactive>
    where
        E: Element,
        V: Environment,
    {
        match fallback {
            Fallback::None => Err(Inactive::NotNeeded),
            Fallback::Breakpoint { width_param, class } => {
                let width = params.text(width_param);
                if !env.can_observe(Observation::Resize) {
                    return Err(Inactive::Unavailable("resize observation"));
                }
                if env.supports("width", &format!("min({}, 100%)", width)) {
                    return Err(Inactive::Native);
                }
                let breakpoint = element
                    .probe_width(width)
                    .ok_or(Inactive::Unavailable("width probe"))?;
                let subscription = element
                    .observe(Observation::Resize)
                    .ok_or(Inactive::Unavailable("resize observation"))?;
                Ok(FallbackState::Breakpoint(BreakpointState {
                    breakpoint,
                    above: false,
                    class,
                    subscription,
                }))
            }
            Fallback::Overflow { class } => {
                let subscriptions: Vec<_> = [Observation::Resize, Observation::ChildList]
                    .into_iter()
                    .filter(|o| env.can_observe(*o))
                    .filter_map(|o| element.observe(o))
                    .collect();
                if subscriptions.is_empty() {
                    return Err(Inactive::Unavailable("resize and mutation observation"));
                }
                Ok(FallbackState::Overflow(OverflowState {
                    overflowing: false,
                    class,
                    subscriptions,
                }))
            }
        }
    }

    /// Apply one notification. Returns the new mode when it changed.
    pub fn notify<E: Element>(
        &mut self,
        notification: Notification,
        element: &mut E,
    ) -> Option<bool> {
        match (self, notification) {
            (FallbackState::Breakpoint(state), Notification::Resize { content_width }) => {
                state.on_resize(content_width, element)
            }
            (FallbackState::Breakpoint(_), Notification::ChildList) => None,
            (FallbackState::Overflow(state), _) => state.refresh(element),
        }
    }

    /// The current layout-mode flag
    pub fn is_on(&self) -> bool {
        match self {
            FallbackState::Breakpoint(state) => state.above,
            FallbackState::Overflow(state) => state.overflowing,
        }
    }

    pub fn subscriptions(&self) -> Vec<ObserverHandle> {
        match self {
            FallbackState::Breakpoint(state) => vec![state.subscription],
            FallbackState::Overflow(state) => state.subscriptions.clone(),
        }
    }

    /// Cancel every subscription this state holds
    pub fn release<E: Element>(self, element: &mut E) {
        for handle in self.subscriptions() {
            element.unobserve(handle);
        }
    }
}
