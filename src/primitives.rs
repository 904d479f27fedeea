//! The ten layout primitives: parameter schemas, templates and checks.
//!
//! Every template targets the selector handed to it in [`StyleContext`], so
//! one stylesheet serves every instance that shares a fingerprint.

use crate::css::calc_length;
use crate::diagnostics::Finding;
use crate::error::{LayoutError, LayoutResult};
use crate::host::ChildShape;
use crate::kind::{always, no_checks, ComponentKind, Fallback, StyleContext};
use crate::params::{ParamDef, Params};

/// Every built-in kind
pub static ALL: [&ComponentKind; 10] = [
    &BOX, &CENTER, &CLUSTER, &COVER, &FRAME, &GRID, &IMPOSTER, &REEL, &SIDEBAR, &SWITCHER,
];

/// Look up a kind by custom element name (`grid-l`)
pub fn by_element(element: &str) -> LayoutResult<&'static ComponentKind> {
    ALL.iter()
        .copied()
        .find(|k| k.element == element)
        .ok_or_else(|| LayoutError::UnknownElement {
            element: element.to_string(),
        })
}

/// Look up a kind by its PascalCase name (`Grid`)
pub fn by_name(name: &str) -> Option<&'static ComponentKind> {
    ALL.iter().copied().find(|k| k.name == name)
}

// ─── Box ────────────────────────────────────────────────────────────────────

pub static BOX: ComponentKind = ComponentKind {
    name: "Box",
    element: "box-l",
    params: &[
        ParamDef::text("padding", "var(--s1)"),
        ParamDef::text("borderWidth", "var(--border-thin)"),
        ParamDef::flag("invert"),
    ],
    template: box_css,
    gate: always,
    check: no_checks,
    fallback: Fallback::None,
};

fn box_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let invert = if p.flag("invert") {
        "background-color: var(--color-light);\n    filter: invert(100%);"
    } else {
        ""
    };
    format!(
        r#"
  {sel} {{
    padding: {padding};
    border: {border} solid;
    {invert}
  }}

  {sel} {{
    background-color: inherit;
  }}
"#,
        sel = cx.selector,
        padding = p.text("padding"),
        border = p.text("borderWidth"),
        invert = invert,
    )
}

// ─── Center ─────────────────────────────────────────────────────────────────

pub static CENTER: ComponentKind = ComponentKind {
    name: "Center",
    element: "center-l",
    params: &[
        ParamDef::text("max", "var(--measure)"),
        ParamDef::flag("andText"),
        ParamDef::optional("gutters"),
        ParamDef::flag("intrinsic"),
    ],
    template: center_css,
    gate: always,
    check: no_checks,
    fallback: Fallback::None,
};

fn center_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let gutters = p
        .opt_text("gutters")
        .map(|g| format!("padding-left: {g};\n    padding-right: {g};"))
        .unwrap_or_default();
    let and_text = if p.flag("andText") {
        "text-align: center;"
    } else {
        ""
    };
    let intrinsic = if p.flag("intrinsic") {
        "display: flex;\n    flex-direction: column;\n    align-items: center;"
    } else {
        ""
    };
    format!(
        r#"
  {sel} {{
    max-width: {max};
    {gutters}
    {and_text}
    {intrinsic}
  }}
"#,
        sel = cx.selector,
        max = p.text("max"),
    )
}

// ─── Cluster ────────────────────────────────────────────────────────────────

pub static CLUSTER: ComponentKind = ComponentKind {
    name: "Cluster",
    element: "cluster-l",
    params: &[
        ParamDef::text("justify", "center"),
        ParamDef::text("align", "center"),
        ParamDef::text("space", "var(--s1)"),
    ],
    template: cluster_css,
    gate: always,
    check: no_checks,
    fallback: Fallback::None,
};

fn cluster_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let space = calc_length(p.text("space"));
    format!(
        r#"
  {sel} > * {{
    justify-content: {justify};
    align-items: {align};
    margin: calc({space} / 2 * -1);
  }}

  {sel} > * > * {{
    margin: calc({space} / 2);
  }}
"#,
        sel = cx.selector,
        justify = p.text("justify"),
        align = p.text("align"),
    )
}

// ─── Cover ──────────────────────────────────────────────────────────────────

pub static COVER: ComponentKind = ComponentKind {
    name: "Cover",
    element: "cover-l",
    params: &[
        ParamDef::text("centered", "h1"),
        ParamDef::text("space", "var(--s1)"),
        ParamDef::text("minHeight", "100vh"),
        ParamDef::flag("noPad"),
    ],
    template: cover_css,
    gate: always,
    check: no_checks,
    fallback: Fallback::None,
};

fn cover_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let space = p.text("space");
    let padding = if p.flag("noPad") { "0" } else { space };
    format!(
        r#"
  {sel} {{
    min-height: {min_height};
    padding: {padding};
  }}

  {sel} > * {{
    margin-top: {space};
    margin-bottom: {space};
  }}

  {sel} > :first-child:not({centered}) {{
    margin-top: 0;
  }}

  {sel} > :last-child:not({centered}) {{
    margin-bottom: 0;
  }}

  {sel} > {centered} {{
    margin-top: auto;
    margin-bottom: auto;
  }}
"#,
        sel = cx.selector,
        min_height = p.text("minHeight"),
        centered = p.text("centered"),
    )
}

// ─── Frame ──────────────────────────────────────────────────────────────────

const DEFAULT_RATIO: (&str, &str) = ("16", "9");

pub static FRAME: ComponentKind = ComponentKind {
    name: "Frame",
    element: "frame-l",
    params: &[ParamDef::text("ratio", "16:9")],
    template: frame_css,
    gate: always,
    check: frame_checks,
    fallback: Fallback::None,
};

/// Split `w:h`, both sides numeric
fn parse_ratio(ratio: &str) -> Option<(&str, &str)> {
    let (w, h) = ratio.split_once(':')?;
    let (w, h) = (w.trim(), h.trim());
    let numeric = |s: &str| s.parse::<f64>().map(|n| n > 0.0).unwrap_or(false);
    (numeric(w) && numeric(h)).then_some((w, h))
}

fn frame_css(cx: &StyleContext<'_>) -> String {
    let (w, h) = parse_ratio(cx.params.text("ratio")).unwrap_or(DEFAULT_RATIO);
    format!(
        r#"
  {sel} {{
    padding-bottom: calc({h} / {w} * 100%);
  }}
"#,
        sel = cx.selector,
    )
}

fn frame_checks(params: &Params, shape: ChildShape) -> Vec<Finding> {
    let mut findings = Vec::new();
    if shape.children != 1 {
        findings.push(Finding::structural(
            "<frame-l> elements should have just one child element",
        ));
    }
    let ratio = params.text("ratio");
    if parse_ratio(ratio).is_none() {
        findings.push(Finding::advisory(format!(
            "ratio '{}' is not of the form width:height; 16:9 is used",
            ratio
        )));
    }
    findings
}

// ─── Grid ───────────────────────────────────────────────────────────────────

pub const GRID_ABOVE_CLASS: &str = "grid-l--above";

pub static GRID: ComponentKind = ComponentKind {
    name: "Grid",
    element: "grid-l",
    params: &[
        ParamDef::text("min", "250px"),
        ParamDef::text("space", "var(--s0)"),
    ],
    template: grid_css,
    gate: always,
    check: no_checks,
    fallback: Fallback::Breakpoint {
        width_param: "min",
        class: GRID_ABOVE_CLASS,
    },
};

fn grid_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    format!(
        r#"
  {sel} {{
    grid-gap: {space};
  }}

  {sel}.{above} {{
    grid-template-columns: repeat(auto-fit, minmax({min}, 1fr));
  }}

  @supports (width: min({min}, 100%)) {{
    {sel} {{
      grid-gap: {space};
      grid-template-columns: repeat(auto-fill, minmax(min({min}, 100%), 1fr));
    }}
  }}
"#,
        sel = cx.selector,
        above = GRID_ABOVE_CLASS,
        min = p.text("min"),
        space = p.text("space"),
    )
}

// ─── Imposter ───────────────────────────────────────────────────────────────

pub static IMPOSTER: ComponentKind = ComponentKind {
    name: "Imposter",
    element: "imposter-l",
    params: &[
        ParamDef::flag("breakout"),
        ParamDef::flag("fixed"),
        ParamDef::text("margin", "0px"),
    ],
    template: imposter_css,
    gate: imposter_gate,
    check: no_checks,
    fallback: Fallback::None,
};

/// A breakout imposter that is not fixed needs no rules
fn imposter_gate(params: &Params) -> bool {
    !params.flag("breakout") || params.flag("fixed")
}

fn imposter_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let margin = calc_length(p.text("margin"));
    let contained = if p.flag("breakout") {
        String::new()
    } else {
        format!(
            "max-width: calc(100% - ({margin} * 2));\n    max-height: calc(100% - ({margin} * 2));\n    overflow: auto;"
        )
    };
    let fixed = if p.flag("fixed") { "position: fixed;" } else { "" };
    format!(
        r#"
  {sel} {{
    {contained}
    {fixed}
  }}
"#,
        sel = cx.selector,
    )
}

// ─── Reel ───────────────────────────────────────────────────────────────────

pub const REEL_OVERFLOWING_CLASS: &str = "overflowing";

pub static REEL: ComponentKind = ComponentKind {
    name: "Reel",
    element: "reel-l",
    params: &[
        ParamDef::text("itemWidth", "auto"),
        ParamDef::text("height", "auto"),
        ParamDef::text("space", "var(--s0)"),
        ParamDef::flag("noBar"),
    ],
    template: reel_css,
    gate: always,
    check: no_checks,
    fallback: Fallback::Overflow {
        class: REEL_OVERFLOWING_CLASS,
    },
};

fn reel_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let sel = cx.selector;
    let space = p.text("space");
    let no_bar = p.flag("noBar");
    let gutter = if no_bar {
        String::new()
    } else {
        format!("padding-bottom: {space}")
    };
    let hide_bar = if no_bar {
        format!(
            "{sel} {{\n    scrollbar-width: none;\n  }}\n\n  {sel}::-webkit-scrollbar {{\n    display: none;\n  }}"
        )
    } else {
        String::new()
    };
    format!(
        r#"
  {sel} {{
    height: {height};
  }}

  {sel} > * {{
    flex: 0 0 {item_width};
  }}

  {sel} > img {{
    height: 100%;
    flex-basis: auto;
    width: auto;
  }}

  {sel} > * + * {{
    margin-left: {space};
  }}

  {sel}.{overflowing} {{
    {gutter}
  }}

  {hide_bar}
"#,
        height = p.text("height"),
        item_width = p.text("itemWidth"),
        overflowing = REEL_OVERFLOWING_CLASS,
    )
}

// ─── Sidebar ────────────────────────────────────────────────────────────────

pub static SIDEBAR: ComponentKind = ComponentKind {
    name: "Sidebar",
    element: "sidebar-l",
    params: &[
        ParamDef::text("side", "left"),
        ParamDef::optional("sideWidth"),
        ParamDef::text("contentMin", "50%"),
        ParamDef::text("space", "var(--s1)"),
        ParamDef::flag("noStretch"),
    ],
    template: sidebar_css,
    gate: always,
    check: sidebar_checks,
    fallback: Fallback::None,
};

fn sidebar_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let space = calc_length(p.text("space"));
    let no_stretch = if p.flag("noStretch") {
        "align-items: flex-start;"
    } else {
        ""
    };
    let side_width = p
        .opt_text("sideWidth")
        .map(|w| format!("flex-basis: {w};"))
        .unwrap_or_default();
    // Everything but "left" puts the sidebar on the right
    let content = if p.text("side") != "left" {
        ":first-child"
    } else {
        ":last-child"
    };
    format!(
        r#"
  {sel} > * {{
    margin: calc({space} / 2 * -1);
    {no_stretch}
  }}

  {sel} > * > * {{
    margin: calc({space} / 2);
    {side_width}
  }}

  {sel} > * > {content} {{
    flex-basis: 0;
    flex-grow: 999;
    min-width: calc({content_min} - {space});
  }}
"#,
        sel = cx.selector,
        content_min = p.text("contentMin"),
    )
}

fn sidebar_checks(params: &Params, shape: ChildShape) -> Vec<Finding> {
    let mut findings = Vec::new();
    if !params.text("contentMin").contains('%') {
        findings.push(Finding::advisory(
            "The value for each <sidebar-l> `contentMin` property should be a percentage. Otherwise overflow is likely to occur",
        ));
    }
    match shape.first_child_children {
        Some(n) if n <= 2 => {}
        _ => findings.push(Finding::severe(
            "<sidebar-l> elements should have exactly one child element containing exactly two child elements of its own",
        )),
    }
    findings
}

// ─── Switcher ───────────────────────────────────────────────────────────────

pub static SWITCHER: ComponentKind = ComponentKind {
    name: "Switcher",
    element: "switcher-l",
    params: &[
        ParamDef::text("threshold", "var(--measure)"),
        ParamDef::text("space", "var(--s1)"),
        ParamDef::integer("limit", 5),
    ],
    template: switcher_css,
    gate: always,
    check: switcher_checks,
    fallback: Fallback::None,
};

fn switcher_css(cx: &StyleContext<'_>) -> String {
    let p = cx.params;
    let space = calc_length(p.text("space"));
    let nth = p.integer("limit").unwrap_or(5).saturating_add(1);
    format!(
        r#"
  {sel} > * {{
    margin: calc(({space} / 2) * -1);
  }}

  {sel} > * > * {{
    flex-basis: calc(({threshold} - (100% - {space})) * 999);
    margin: calc({space} / 2);
  }}

  {sel} > * > :nth-last-child(n+{nth}),
  {sel} > * > :nth-last-child(n+{nth}) ~ * {{
    flex-basis: 100%;
  }}
"#,
        sel = cx.selector,
        threshold = p.text("threshold"),
    )
}

fn switcher_checks(params: &Params, _: ChildShape) -> Vec<Finding> {
    match params.integer("limit") {
        Some(n) if n < 1 => vec![Finding::advisory(format!(
            "limit {} leaves no room for a horizontal layout",
            n
        ))],
        _ => Vec::new(),
    }
}
