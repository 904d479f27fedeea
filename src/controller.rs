//! The per-instance lifecycle controller.
//!
//! One [`LayoutInstance`] drives one element of any [`ComponentKind`]. Every
//! lifecycle event goes through [`LayoutInstance::handle`], which on attach
//! and on every recognized parameter change recomputes the fingerprint,
//! re-tags the element and registers the stylesheet if the registry has not
//! seen that fingerprint yet.

use crate::config::LayoutConfig;
use crate::diagnostics::{Diagnostic, Finding};
use crate::fingerprint::Fingerprint;
use crate::host::{Element, Environment};
use crate::kind::ComponentKind;
use crate::observer::{FallbackState, Inactive, Notification};
use crate::params::{Attributes, ParamValue, Params};
use crate::registry::{Registration, StyleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unattached,
    Attached,
    Detached,
}

/// A recognized parameter changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamChange {
    pub name: &'static str,
    pub old: ParamValue,
    pub new: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connected,
    ParamChanged(ParamChange),
    Disconnected,
}

/// What a render did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A new stylesheet was synthesized; `attached` is false when the host
    /// could not take it and the instance renders unstyled
    Inserted { attached: bool },
    /// The fingerprint was already registered
    Reused,
    /// Tagged, but the parameters call for no stylesheet
    Unstyled,
    /// A severe structural violation prevented rendering
    Skipped,
    /// Nothing to do in the current state
    Idle,
}

/// The collaborators every render needs
pub struct RenderContext<'a, V, S> {
    pub env: &'a mut V,
    pub store: &'a mut S,
    pub config: &'a LayoutConfig,
}

impl<'a, V: Environment, S: StyleStore> RenderContext<'a, V, S> {
    pub fn new(env: &'a mut V, store: &'a mut S, config: &'a LayoutConfig) -> Self {
        Self { env, store, config }
    }
}

#[derive(Debug)]
pub struct LayoutInstance {
    kind: &'static ComponentKind,
    attributes: Attributes,
    params: Params,
    fingerprint: Option<Fingerprint>,
    state: LifecycleState,
    fallback: Option<FallbackState>,
    diagnostics: Vec<Diagnostic>,
}

impl LayoutInstance {
    pub fn new(kind: &'static ComponentKind) -> Self {
        Self::with_attributes(kind, Attributes::new())
    }

    pub fn with_attributes(kind: &'static ComponentKind, attributes: Attributes) -> Self {
        let (params, _) = kind.resolve(&attributes);
        Self {
            kind,
            attributes,
            params,
            fingerprint: None,
            state: LifecycleState::Unattached,
            fallback: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static ComponentKind {
        self.kind
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Effective parameters as of the last completed render. A skipped
    /// render leaves these, the fingerprint and the element's tag as they were.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The fingerprint of the last successful render
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn fallback(&self) -> Option<&FallbackState> {
        self.fallback.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Store a raw attribute value (`None` removes it). Returns the change
    /// event when `name` is a recognized parameter; other attributes are
    /// stored and ignored.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Option<ParamChange> {
        let def = self.kind.param(name);
        let old = def.map(|d| d.decode(self.attributes.get(d.name)).0);
        match value {
            Some(v) => {
                self.attributes.set(name, v);
            }
            None => {
                self.attributes.remove(name);
            }
        }
        let (def, old) = (def?, old?);
        let (new, _) = def.decode(self.attributes.get(def.name));
        Some(ParamChange {
            name: def.name,
            old,
            new,
        })
    }

    /// Set a parameter from its decoded value
    pub fn set_param(&mut self, name: &str, value: &ParamValue) -> Option<ParamChange> {
        let def = self.kind.param(name)?;
        let encoded = def.encode(value);
        self.set_attribute(def.name, encoded.as_deref())
    }

    pub fn connect<E, V, S>(
        &mut self,
        element: &mut E,
        cx: &mut RenderContext<'_, V, S>,
    ) -> RenderOutcome
    where
        E: Element,
        V: Environment,
        S: StyleStore,
    {
        self.handle(LifecycleEvent::Connected, element, cx)
    }

    pub fn disconnect<E, V, S>(
        &mut self,
        element: &mut E,
        cx: &mut RenderContext<'_, V, S>,
    ) -> RenderOutcome
    where
        E: Element,
        V: Environment,
        S: StyleStore,
    {
        self.handle(LifecycleEvent::Disconnected, element, cx)
    }

    /// Set an attribute and, if it is a recognized parameter, run the reactive render
    pub fn update<E, V, S>(
        &mut self,
        name: &str,
        value: Option<&str>,
        element: &mut E,
        cx: &mut RenderContext<'_, V, S>,
    ) -> RenderOutcome
    where
        E: Element,
        V: Environment,
        S: StyleStore,
    {
        match self.set_attribute(name, value) {
            Some(change) => self.handle(LifecycleEvent::ParamChanged(change), element, cx),
            None => RenderOutcome::Idle,
        }
    }

    /// The single reducer for lifecycle events
    pub fn handle<E, V, S>(
        &mut self,
        event: LifecycleEvent,
        element: &mut E,
        cx: &mut RenderContext<'_, V, S>,
    ) -> RenderOutcome
    where
        E: Element,
        V: Environment,
        S: StyleStore,
    {
        match (self.state, event) {
            (LifecycleState::Attached, LifecycleEvent::Connected) => RenderOutcome::Idle,
            (_, LifecycleEvent::Connected) => {
                self.state = LifecycleState::Attached;
                let outcome = self.render(element, cx);
                self.activate_fallback(element, &*cx.env);
                outcome
            }
            (LifecycleState::Attached, LifecycleEvent::ParamChanged(change)) => {
                tracing::trace!(
                    element = self.kind.element,
                    param = change.name,
                    "parameter changed"
                );
                self.render(element, cx)
            }
            (_, LifecycleEvent::ParamChanged(_)) => RenderOutcome::Idle,
            (LifecycleState::Attached, LifecycleEvent::Disconnected) => {
                self.state = LifecycleState::Detached;
                if cx.config.release_observers_on_detach {
                    if let Some(fallback) = self.fallback.take() {
                        fallback.release(element);
                    }
                }
                RenderOutcome::Idle
            }
            (_, LifecycleEvent::Disconnected) => RenderOutcome::Idle,
        }
    }

    /// Deliver a host notification to the fallback, if one is active.
    /// Returns the new layout mode when it changed.
    pub fn notify<E: Element>(
        &mut self,
        notification: Notification,
        element: &mut E,
    ) -> Option<bool> {
        self.fallback.as_mut()?.notify(notification, element)
    }

    /// Deliver a batch of notifications; returns the mode changes in order
    pub fn notify_all<E, I>(&mut self, notifications: I, element: &mut E) -> Vec<bool>
    where
        E: Element,
        I: IntoIterator<Item = Notification>,
    {
        notifications
            .into_iter()
            .filter_map(|n| self.notify(n, element))
            .collect()
    }

    fn render<E, V, S>(
        &mut self,
        element: &mut E,
        cx: &mut RenderContext<'_, V, S>,
    ) -> RenderOutcome
    where
        E: Element,
        V: Environment,
        S: StyleStore,
    {
        let kind = self.kind;
        let (params, advisories) = kind.resolve(&self.attributes);
        let fingerprint = kind.fingerprint(&params);

        let mut findings: Vec<Finding> = advisories
            .into_iter()
            .map(|a| {
                Finding::advisory(format!(
                    "{} '{}' is invalid: {}",
                    a.param, a.value, a.reason
                ))
            })
            .collect();
        findings.extend((kind.check)(&params, element.child_shape()));
        let skip = findings.iter().any(Finding::skips_render);
        for finding in findings {
            self.report(Diagnostic::from_finding(
                kind.element,
                Some(fingerprint.clone()),
                finding,
            ));
        }
        if skip {
            return RenderOutcome::Skipped;
        }
        self.params = params;

        element.set_attribute(&cx.config.tag_attribute, fingerprint.as_str());

        let outcome = if (kind.gate)(&self.params) {
            let params = &self.params;
            let config = cx.config;
            match cx
                .store
                .ensure_with(&fingerprint, || kind.synthesize(params, &fingerprint, config))
            {
                Registration::Existing => RenderOutcome::Reused,
                Registration::Inserted => {
                    let attached = self.attach(&fingerprint, cx);
                    RenderOutcome::Inserted { attached }
                }
            }
        } else {
            RenderOutcome::Unstyled
        };
        self.fingerprint = Some(fingerprint);
        outcome
    }

    fn attach<V, S>(&self, fingerprint: &Fingerprint, cx: &mut RenderContext<'_, V, S>) -> bool
    where
        V: Environment,
        S: StyleStore,
    {
        let Some(css) = cx.store.css(fingerprint) else {
            return false;
        };
        let id = format!("{}{}", cx.config.style_id_prefix, fingerprint);
        if cx.env.attach_style(&id, &css) {
            cx.store.mark_attached(fingerprint);
            true
        } else {
            tracing::debug!(
                element = self.kind.element,
                fingerprint = %fingerprint,
                "host cannot attach global styles; instance renders unstyled"
            );
            false
        }
    }

    fn activate_fallback<E, V>(&mut self, element: &mut E, env: &V)
    where
        E: Element,
        V: Environment,
    {
        if let Some(previous) = self.fallback.take() {
            // Re-attached without releasing on detach
            previous.release(element);
        }
        match FallbackState::activate(self.kind.fallback, &self.params, element, env) {
            Ok(state) => {
                tracing::debug!(element = self.kind.element, "measured fallback active");
                self.fallback = Some(state);
            }
            Err(Inactive::NotNeeded) | Err(Inactive::Native) => {}
            Err(Inactive::Unavailable(what)) => {
                tracing::debug!(
                    element = self.kind.element,
                    missing = what,
                    "measured fallback not activated"
                );
            }
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }
}
