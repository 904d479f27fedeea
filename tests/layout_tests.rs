use layout_primitives::primitives::{
    self, GRID, GRID_ABOVE_CLASS, REEL, REEL_OVERFLOWING_CLASS, SWITCHER,
};
use layout_primitives::{
    parse_page, render_page, Attributes, ComponentKind, Fingerprint, LayoutConfig,
    LayoutInstance, Notification, ParamValue, Registration, RenderContext, RenderOutcome,
    Severity, SharedStyleRegistry, StyleEntry, StyleRegistry, StyleStore, VirtualElement,
    VirtualEnvironment,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

fn get_demo_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("demos");
    path.push(filename);
    path
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs.iter().copied().collect()
}

fn fingerprint_of(kind: &ComponentKind, pairs: &[(&str, &str)]) -> Fingerprint {
    let (params, _) = kind.resolve(&attrs(pairs));
    kind.fingerprint(&params)
}

/// Registry wrapper that counts how often a stylesheet is synthesized
#[derive(Default)]
struct CountingStore {
    inner: StyleRegistry,
    synthesized: usize,
}

impl StyleStore for CountingStore {
    fn has(&self, fingerprint: &Fingerprint) -> bool {
        self.inner.has(fingerprint)
    }

    fn put(&mut self, fingerprint: Fingerprint, css: String) -> bool {
        self.inner.put(fingerprint, css)
    }

    fn ensure_with<F>(&mut self, fingerprint: &Fingerprint, synth: F) -> Registration
    where
        F: FnOnce() -> String,
    {
        let counter = &mut self.synthesized;
        self.inner.ensure_with(fingerprint, || {
            *counter += 1;
            synth()
        })
    }

    fn css(&self, fingerprint: &Fingerprint) -> Option<String> {
        self.inner.css(fingerprint)
    }

    fn mark_attached(&mut self, fingerprint: &Fingerprint) {
        self.inner.mark_attached(fingerprint)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn snapshot(&self) -> Vec<(Fingerprint, StyleEntry)> {
        self.inner.snapshot()
    }
}

// Fingerprint properties

#[test]
fn test_fingerprint_is_deterministic() {
    let pairs = [("space", "var(--s2)"), ("limit", "3")];
    let first = fingerprint_of(&SWITCHER, &pairs);
    for _ in 0..10 {
        assert_eq!(fingerprint_of(&SWITCHER, &pairs), first);
    }
}

#[test]
fn test_fingerprint_is_injective_over_distinct_values() {
    let values = ["", "0", "1", "|", "1:", "a|b", "var(--s1)", "var(--s1)|", "~", "#4"];
    let mut seen: HashSet<Fingerprint> = HashSet::new();
    let mut distinct_params = HashSet::new();
    for threshold in values {
        for space in values {
            let pairs = [("threshold", threshold), ("space", space)];
            let (params, _) = SWITCHER.resolve(&attrs(&pairs));
            if distinct_params.insert(params.clone()) {
                assert!(
                    seen.insert(SWITCHER.fingerprint(&params)),
                    "collision for threshold={:?} space={:?}",
                    threshold,
                    space
                );
            }
        }
    }
    assert_eq!(seen.len(), distinct_params.len());
}

#[test]
fn test_fingerprints_differ_across_kinds() {
    let cluster = fingerprint_of(&primitives::CLUSTER, &[]);
    let switcher = fingerprint_of(&SWITCHER, &[]);
    assert_ne!(cluster, switcher);
}

#[test]
fn test_no_default_drift() {
    for kind in primitives::ALL {
        let explicit: Vec<(&str, String)> = kind
            .params
            .iter()
            .filter_map(|def| def.encode(&def.default_value()).map(|v| (def.name, v)))
            .collect();
        let explicit: Attributes = explicit.into_iter().collect();
        let (with_defaults, _) = kind.resolve(&explicit);
        let (unset, _) = kind.resolve(&Attributes::new());
        assert_eq!(
            kind.fingerprint(&with_defaults),
            kind.fingerprint(&unset),
            "{} drifts when defaults are set explicitly",
            kind.name
        );
    }
}

// Registry and lifecycle properties

#[test]
fn test_at_most_once_registration() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = CountingStore::default();

    let mut elements: Vec<VirtualElement> = (0..5).map(|_| VirtualElement::new()).collect();
    let mut instances: Vec<LayoutInstance> = (0..5)
        .map(|_| LayoutInstance::with_attributes(&SWITCHER, attrs(&[("limit", "4")])))
        .collect();

    for (instance, element) in instances.iter_mut().zip(elements.iter_mut()) {
        let mut cx = RenderContext::new(&mut env, &mut store, &config);
        instance.connect(element, &mut cx);
        for _ in 0..4 {
            instance.update("limit", Some("4"), element, &mut cx);
            instance.update("space", Some("var(--s1)"), element, &mut cx);
        }
    }

    assert_eq!(store.synthesized, 1);
    assert_eq!(store.len(), 1);
    assert_eq!(env.styles.len(), 1);
}

#[test]
fn test_registry_grows_monotonically() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new();
    let mut instance = LayoutInstance::new(&SWITCHER);

    let mut fingerprints = HashSet::new();
    let mut last_len = 0;
    let mut cx = RenderContext::new(&mut env, &mut store, &config);
    instance.connect(&mut element, &mut cx);
    fingerprints.extend(instance.fingerprint().cloned());

    for limit in ["2", "3", "2", "9", "3", "2"] {
        instance.update("limit", Some(limit), &mut element, &mut cx);
        fingerprints.extend(instance.fingerprint().cloned());
        let len = cx.store.len();
        assert!(len >= last_len);
        assert!(len <= fingerprints.len());
        last_len = len;
    }
    instance.disconnect(&mut element, &mut cx);
    assert_eq!(cx.store.len(), fingerprints.len());
}

#[test]
fn test_identical_switchers_share_one_entry() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let pairs = [("space", "var(--s1)"), ("limit", "4")];

    let mut a = LayoutInstance::with_attributes(&SWITCHER, attrs(&pairs));
    let mut b = LayoutInstance::with_attributes(&SWITCHER, attrs(&pairs));
    let mut el_a = VirtualElement::new();
    let mut el_b = VirtualElement::new();

    let mut cx = RenderContext::new(&mut env, &mut store, &config);
    assert_eq!(
        a.connect(&mut el_a, &mut cx),
        RenderOutcome::Inserted { attached: true }
    );
    assert_eq!(b.connect(&mut el_b, &mut cx), RenderOutcome::Reused);

    assert_eq!(store.len(), 1);
    assert_eq!(el_a.attribute("data-i"), el_b.attribute("data-i"));
    assert!(el_a.attribute("data-i").is_some());
}

#[test]
fn test_different_limits_get_separate_entries() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();

    let mut four = LayoutInstance::with_attributes(&SWITCHER, attrs(&[("limit", "4")]));
    let mut six = LayoutInstance::with_attributes(&SWITCHER, attrs(&[("limit", "6")]));
    let mut el_four = VirtualElement::new();
    let mut el_six = VirtualElement::new();

    let mut cx = RenderContext::new(&mut env, &mut store, &config);
    four.connect(&mut el_four, &mut cx);
    six.connect(&mut el_six, &mut cx);

    assert_eq!(store.len(), 2);
    assert_ne!(el_four.attribute("data-i"), el_six.attribute("data-i"));
    assert!(store.stylesheet().contains(":nth-last-child(n+5)"));
    assert!(store.stylesheet().contains(":nth-last-child(n+7)"));
}

#[test]
fn test_change_retags_and_keeps_old_entry() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new();
    let mut instance = LayoutInstance::new(&SWITCHER);

    let mut cx = RenderContext::new(&mut env, &mut store, &config);
    instance.connect(&mut element, &mut cx);
    let before = element.attribute("data-i").map(str::to_string);

    let outcome = instance.update("limit", Some("2"), &mut element, &mut cx);
    assert_eq!(outcome, RenderOutcome::Inserted { attached: true });
    let after = element.attribute("data-i").map(str::to_string);
    assert_ne!(before, after);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_bad_limit_is_an_advisory() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new();
    let mut instance = LayoutInstance::with_attributes(&SWITCHER, attrs(&[("limit", "lots")]));

    let mut cx = RenderContext::new(&mut env, &mut store, &config);
    let outcome = instance.connect(&mut element, &mut cx);
    assert_eq!(outcome, RenderOutcome::Inserted { attached: true });
    assert_eq!(instance.diagnostics().len(), 1);
    assert_eq!(instance.diagnostics()[0].severity, Severity::Warning);
    assert_eq!(instance.params().get("limit"), Some(&ParamValue::Integer(5)));
}

#[test]
fn test_shared_registry_drives_instances() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let registry = SharedStyleRegistry::new();

    let mut handle_a = registry.clone();
    let mut handle_b = registry.clone();
    let mut el_a = VirtualElement::new();
    let mut el_b = VirtualElement::new();
    let mut a = LayoutInstance::new(&REEL);
    let mut b = LayoutInstance::new(&REEL);

    a.connect(&mut el_a, &mut RenderContext::new(&mut env, &mut handle_a, &config));
    let outcome = b.connect(&mut el_b, &mut RenderContext::new(&mut env, &mut handle_b, &config));
    assert_eq!(outcome, RenderOutcome::Reused);
    assert_eq!(registry.len(), 1);
}

// Measured fallbacks

#[test]
fn test_grid_breakpoint_toggles_once_per_crossing() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::without_min_function();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new();
    let mut grid = LayoutInstance::with_attributes(&GRID, attrs(&[("min", "250px")]));

    grid.connect(&mut element, &mut RenderContext::new(&mut env, &mut store, &config));
    assert_eq!(element.probes, 1);

    let widths = [120.0, 240.0, 251.0, 400.0, 400.0, 800.0, 249.0, 100.0, 300.0];
    let changes = grid.notify_all(
        widths
            .iter()
            .map(|w| Notification::Resize { content_width: *w }),
        &mut element,
    );
    assert_eq!(changes, vec![true, false, true]);
    assert!(element.has_class(GRID_ABOVE_CLASS));
    // Calibration happens once, not per notification
    assert_eq!(element.probes, 1);
}

#[test]
fn test_grid_probe_uses_current_font_size() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::without_min_function();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new();
    element.font_size = 20.0;
    let mut grid = LayoutInstance::with_attributes(&GRID, attrs(&[("min", "15rem")]));

    grid.connect(&mut element, &mut RenderContext::new(&mut env, &mut store, &config));
    assert_eq!(
        grid.notify(Notification::Resize { content_width: 290.0 }, &mut element),
        None
    );
    assert_eq!(
        grid.notify(Notification::Resize { content_width: 301.0 }, &mut element),
        Some(true)
    );
}

#[test]
fn test_grid_with_native_min_has_no_fallback() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new();
    let mut grid = LayoutInstance::new(&GRID);

    grid.connect(&mut element, &mut RenderContext::new(&mut env, &mut store, &config));
    assert!(grid.fallback().is_none());
    assert_eq!(element.probes, 0);
    assert_eq!(
        grid.notify(Notification::Resize { content_width: 1000.0 }, &mut element),
        None
    );
}

#[test]
fn test_reel_tracks_overflow_on_child_changes() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new().with_width(500.0);
    let mut reel = LayoutInstance::new(&REEL);

    reel.connect(&mut element, &mut RenderContext::new(&mut env, &mut store, &config));
    element.scroll_width = 1500.0;
    assert_eq!(reel.notify(Notification::ChildList, &mut element), Some(true));
    assert_eq!(
        reel.notify(Notification::Resize { content_width: 500.0 }, &mut element),
        None
    );
    element.scroll_width = 500.0;
    assert_eq!(reel.notify(Notification::ChildList, &mut element), Some(false));
    assert!(!element.has_class("overflowing"));
}

#[test]
fn test_reel_overflow_follows_resize() {
    let config = LayoutConfig::default();
    let mut env = VirtualEnvironment::new();
    let mut store = StyleRegistry::new();
    let mut element = VirtualElement::new().with_width(600.0);
    let mut reel = LayoutInstance::new(&REEL);

    reel.connect(&mut element, &mut RenderContext::new(&mut env, &mut store, &config));

    // The container shrinks below its content
    element.client_width = 300.0;
    assert_eq!(
        reel.notify(Notification::Resize { content_width: 300.0 }, &mut element),
        Some(true)
    );
    assert!(element.has_class(REEL_OVERFLOWING_CLASS));

    // and grows past it again
    element.client_width = 900.0;
    assert_eq!(
        reel.notify(Notification::Resize { content_width: 900.0 }, &mut element),
        Some(false)
    );
    assert!(!element.has_class(REEL_OVERFLOWING_CLASS));
    assert_eq!(reel.fallback().map(|f| f.is_on()), Some(false));
}

#[test]
fn test_sidebar_without_children_is_skipped() {
    let yaml = "instances:\n  - element: sidebar-l\n";
    let render = render_page(&parse_page(yaml).unwrap(), &LayoutConfig::default()).unwrap();
    let sidebar = &render.instances[0];
    assert!(sidebar.skipped);
    assert!(sidebar.tag.is_none());
    assert_eq!(sidebar.diagnostics.len(), 1);
    assert_eq!(sidebar.diagnostics[0].severity, Severity::Error);
    assert_eq!(render.entries, 0);
}

// Demo pages

#[test]
fn test_article_demo() {
    let yaml = fs::read_to_string(get_demo_path("article.yaml")).unwrap();
    let page = parse_page(&yaml).unwrap();
    let render = render_page(&page, &LayoutConfig::default()).unwrap();

    assert_eq!(render.instances.len(), 6);
    assert_eq!(render.entries, 5);
    assert_eq!(render.diagnostics().count(), 0);
    assert_eq!(render.instances[2].tag, render.instances[3].tag);
    assert!(render.instances[2].tag.is_some());
}

#[test]
fn test_legacy_grid_demo() {
    let yaml = fs::read_to_string(get_demo_path("legacy-grid.yaml")).unwrap();
    let page = parse_page(&yaml).unwrap();
    let render = render_page(&page, &LayoutConfig::default()).unwrap();

    assert_eq!(render.entries, 2);
    assert_eq!(render.instances[0].classes, vec![GRID_ABOVE_CLASS.to_string()]);
    assert!(render.instances[1].classes.is_empty());
    assert_eq!(render.instances[2].classes, vec!["overflowing".to_string()]);
    assert_eq!(render.instances[0].fallback_on, Some(true));
    assert_eq!(render.instances[1].fallback_on, Some(false));
    assert_eq!(render.instances[2].fallback_on, Some(true));
}

#[test]
fn test_demo_report() {
    let yaml = fs::read_to_string(get_demo_path("broken-sidebar.yaml")).unwrap();
    let render = render_page(&parse_page(&yaml).unwrap(), &LayoutConfig::default()).unwrap();
    let report = render.report_yaml().unwrap();
    assert!(report.contains("element: sidebar-l"));
    assert!(report.contains("skipped: true"));
    assert!(report.contains("severity: error"));
}

#[test]
fn test_broken_sidebar_demo() {
    let yaml = fs::read_to_string(get_demo_path("broken-sidebar.yaml")).unwrap();
    let page = parse_page(&yaml).unwrap();
    let render = render_page(&page, &LayoutConfig::default()).unwrap();

    let sidebar = &render.instances[0];
    assert!(sidebar.skipped);
    assert!(sidebar.tag.is_none());
    let severities: Vec<Severity> = sidebar.diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(severities, vec![Severity::Warning, Severity::Error]);
    assert_eq!(render.entries, 1);
    assert!(render.stylesheet.contains("filter: invert(100%);"));
}

#[test]
fn test_demo_config() {
    let config = LayoutConfig::load(get_demo_path("layout.yaml")).unwrap();
    assert_eq!(config.tag_attribute, "data-layout");

    let yaml = fs::read_to_string(get_demo_path("article.yaml")).unwrap();
    let render = render_page(&parse_page(&yaml).unwrap(), &config).unwrap();
    assert!(render.stylesheet.starts_with("[data-layout=\"Center-"));
}

#[test]
fn test_unstyled_host_still_tags() {
    let yaml = "canAttachStyles: false\ninstances:\n  - element: cluster-l\n";
    let render = render_page(&parse_page(yaml).unwrap(), &LayoutConfig::default()).unwrap();
    assert!(render.instances[0].tag.is_some());
    assert_eq!(render.entries, 1);
}
