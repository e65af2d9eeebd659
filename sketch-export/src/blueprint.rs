//! Markdown blueprint assembly.
//!
//! A blueprint describes every screen of a project for a code generator:
//! an ASCII wireframe per state, the element inventory, suggested
//! components, annotations, a JSON mirror of the layout tree, the
//! navigation graph and a closing prompt for the chosen target.

use std::collections::HashSet;
use std::fmt::Write;

use serde::Serialize;
use sketch_core::{DeviceType, Element, ElementType, Project, Screen, ScreenState};

use crate::glyph::{render_forest, type_label};
use crate::layout::{layout_for_state, reading_order, LayoutNode};
use crate::target::ExportTarget;

/// Render the full blueprint for `project`.
#[must_use]
pub fn generate_blueprint(project: &Project, target: ExportTarget) -> String {
    tracing::debug!(
        project = %project.id,
        target = target.as_str(),
        screens = project.screens.len(),
        "Generating blueprint"
    );

    let (width, height) = project.device.dimensions();
    let mut md = String::new();

    let _ = write!(md, "# {} — UI Blueprint\n\n", project.name);
    let _ = writeln!(
        md,
        "## Device: {} ({width}×{height}px)",
        project.device.title()
    );
    if !project.goal.is_empty() {
        let _ = writeln!(md, "## Goal: {}", project.goal);
    }
    md.push_str("\n---\n\n");

    md.push_str(&responsive_hints(project));
    md.push_str("\n\n---\n\n");

    for (index, screen) in project.screens.iter().enumerate() {
        render_screen(&mut md, index + 1, screen, target);
    }

    let paths = navigation_lines(project);
    if !paths.is_empty() {
        md.push_str("### Navigation Flow:\n");
        for line in &paths {
            let _ = writeln!(md, "{line}");
        }
        md.push_str("\n---\n\n");
    }

    md.push_str("### Global Notes:\n");
    let _ = writeln!(
        md,
        "- Device target: {} ({width}×{height})",
        project.device
    );
    if !project.goal.is_empty() {
        let _ = writeln!(md, "- Project intent: {}", project.goal);
    }
    let _ = writeln!(md, "- Total screens: {}", project.screens.len());
    let _ = writeln!(md, "- Total navigation paths: {}", paths.len());
    md.push_str("\n---\n\n");

    md.push_str("## Prompt Instructions for Code Generator:\n");
    md.push_str(target.instructions());
    md.push('\n');

    md
}

fn render_screen(md: &mut String, number: usize, screen: &Screen, target: ExportTarget) {
    let _ = writeln!(md, "### Screen {number}: {}", screen.name);
    if !screen.user_goal.is_empty() {
        let _ = write!(md, "**User Goal:** {}\n\n", screen.user_goal);
    }

    for state in ScreenState::ALL {
        let elements: Vec<&Element> = screen.elements_in(state).collect();
        if elements.is_empty() && state != ScreenState::Default {
            continue;
        }

        let tree = layout_for_state(&screen.elements, state);
        let _ = write!(md, "**{} State:**\n```\n", state.title());
        md.push_str(&render_forest(&tree));
        md.push_str("\n```\n\n");

        let sections = [
            element_inventory(&elements),
            component_map(&elements, target),
            annotations(&elements),
            json_tree(&tree),
        ];
        for section in sections.iter().filter(|s| !s.is_empty()) {
            md.push_str(section);
            md.push_str("\n\n");
        }
    }

    md.push_str("---\n\n");
}

/// Nearest integer, halves away from zero.
#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}

fn in_reading_order<'a>(elements: &[&'a Element]) -> Vec<&'a Element> {
    let mut sorted = elements.to_vec();
    sorted.sort_by(|a, b| reading_order(a, b));
    sorted
}

/// Numbered element list in reading order.
fn element_inventory(elements: &[&Element]) -> String {
    if elements.is_empty() {
        return String::new();
    }

    let mut out = String::from("**Element Inventory:**");
    for (i, el) in in_reading_order(elements).into_iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. **{}**: \"{}\" — position: ({}, {}), size: {}×{}",
            i + 1,
            type_label(el.kind),
            el.label,
            round(el.x),
            round(el.y),
            round(el.width),
            round(el.height)
        );
        if el.semantic_tag.is_set() {
            let _ = write!(out, " [{}]", el.semantic_tag);
        }
        if !el.annotation.is_empty() {
            let _ = write!(out, " — _{}_", el.annotation);
        }
    }
    out
}

/// One suggestion per distinct kind and semantic tag.
fn component_map(elements: &[&Element], target: ExportTarget) -> String {
    if elements.is_empty() {
        return String::new();
    }

    let mut out = String::from("**Suggested Components:**");
    let mut seen = HashSet::new();
    for el in in_reading_order(elements) {
        if !seen.insert((el.kind, el.semantic_tag)) {
            continue;
        }
        let _ = write!(
            out,
            "\n- {} → `{}`",
            type_label(el.kind),
            target.component_suggestion(el.kind, el.semantic_tag)
        );
    }
    out
}

fn annotations(elements: &[&Element]) -> String {
    let annotated: Vec<&&Element> = elements.iter().filter(|el| !el.annotation.is_empty()).collect();
    let tagged: Vec<&&Element> = elements.iter().filter(|el| el.semantic_tag.is_set()).collect();

    let mut lines = Vec::new();
    if !annotated.is_empty() {
        lines.push("**Annotations:**".to_string());
        for el in annotated {
            lines.push(format!(
                "- \"{}\" ({}): {}",
                el.label,
                type_label(el.kind),
                el.annotation
            ));
        }
    }
    if !tagged.is_empty() {
        lines.push("**Semantic Tags:**".to_string());
        for el in tagged {
            lines.push(format!(
                "- \"{}\" ({}): [{}]",
                el.label,
                type_label(el.kind),
                el.semantic_tag
            ));
        }
    }
    lines.join("\n")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode<'a> {
    #[serde(rename = "type")]
    kind: ElementType,
    label: &'a str,
    position: JsonPosition,
    size: JsonSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_tag: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonPosition {
    x: i64,
    y: i64,
}

#[derive(Debug, Serialize)]
struct JsonSize {
    width: i64,
    height: i64,
}

impl<'a> JsonNode<'a> {
    fn from_layout(node: &LayoutNode<'a>) -> Self {
        let el = node.element;
        Self {
            kind: el.kind,
            label: &el.label,
            position: JsonPosition {
                x: round(el.x),
                y: round(el.y),
            },
            size: JsonSize {
                width: round(el.width),
                height: round(el.height),
            },
            semantic_tag: el.semantic_tag.is_set().then_some(el.semantic_tag.as_str()),
            annotation: (!el.annotation.is_empty()).then_some(el.annotation.as_str()),
            children: node.children.iter().map(JsonNode::from_layout).collect(),
        }
    }
}

/// The layout tree as pretty-printed JSON.
fn json_tree(tree: &[LayoutNode<'_>]) -> String {
    if tree.is_empty() {
        return String::new();
    }

    let nodes: Vec<JsonNode<'_>> = tree.iter().map(JsonNode::from_layout).collect();
    match serde_json::to_string_pretty(&nodes) {
        Ok(json) => format!("**JSON Element Tree:**\n```json\n{json}\n```"),
        Err(e) => {
            tracing::warn!("Failed to serialize element tree: {}", e);
            String::new()
        }
    }
}

fn responsive_hints(project: &Project) -> String {
    let (width, _) = project.device.dimensions();
    let mut lines = vec!["**Responsive Breakpoints:**".to_string()];

    match project.device {
        DeviceType::Mobile => {
            lines.push(format!("- Base: {width}px (mobile — designed for)"));
            lines.push("- sm (640px): Stack → side-by-side where appropriate".to_string());
            lines.push("- md (768px): Increase padding, font sizes".to_string());
            lines.push("- lg (1024px): Max-width container, centered layout".to_string());
        }
        DeviceType::Tablet => {
            lines.push("- Below 768px: Collapse to single-column mobile layout".to_string());
            lines.push(format!("- Base: {width}px (tablet — designed for)"));
            lines.push("- lg (1024px): Expand grid columns, increase spacing".to_string());
        }
        DeviceType::Desktop => {
            lines.push("- Below 640px: Single column, stacked layout".to_string());
            lines.push("- md (768px): 2-column layout where applicable".to_string());
            lines.push(format!("- Base: {width}px (desktop — designed for)"));
        }
    }

    lines.push(String::new());
    lines.push("**Layout Strategy:**".to_string());

    let has = |kind: ElementType| {
        project
            .screens
            .iter()
            .flat_map(|s| &s.elements)
            .any(|el| el.kind == kind)
    };
    if has(ElementType::Topnav) {
        lines.push(
            "- Top nav: Sticky on all breakpoints. Collapse to hamburger menu on mobile."
                .to_string(),
        );
    }
    if has(ElementType::Tabbar) {
        lines.push(
            "- Tab bar: Fixed bottom on mobile. Convert to sidebar tabs on desktop.".to_string(),
        );
    }
    if has(ElementType::Bottomsheet) {
        lines.push(
            "- Bottom sheet: Slide up on mobile. Render as side panel or modal on desktop."
                .to_string(),
        );
    }

    lines.join("\n")
}

/// `From → To: [Trigger: t]` for every arrow between two distinct live screens.
fn navigation_lines(project: &Project) -> Vec<String> {
    project
        .arrows
        .iter()
        .filter(|arrow| !arrow.is_self_loop())
        .filter_map(|arrow| {
            let from = project.screen(&arrow.from_screen_id)?;
            let to = project.screen(&arrow.to_screen_id)?;
            Some(format!(
                "- {} → {}: [Trigger: {}]",
                from.name, to.name, arrow.trigger
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sketch_core::{FlowArrow, ScreenId, SemanticTag};

    fn el(kind: ElementType, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(kind, x, y, ScreenState::Default).with_size(w, h)
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -3);
        assert_eq!(round(7.49), 7);
    }

    #[test]
    fn test_inventory_reading_order_and_extras() {
        let mut button = el(ElementType::Cta, 16.0, 100.4, 200.0, 48.0).with_label("Buy");
        button.semantic_tag = SemanticTag::PrimaryCta;
        button.annotation = "Opens checkout".to_string();
        let heading = el(ElementType::Heading, 16.0, 16.0, 300.0, 40.0).with_label("Shop");

        let inventory = element_inventory(&[&button, &heading]);
        assert_eq!(
            inventory,
            "**Element Inventory:**\n\
             1. **Heading**: \"Shop\" — position: (16, 16), size: 300×40\n\
             2. **Button**: \"Buy\" — position: (16, 100), size: 200×48 [primary-cta] — _Opens checkout_"
        );
    }

    #[test]
    fn test_component_map_deduplicates() {
        let a = el(ElementType::Cta, 0.0, 0.0, 100.0, 40.0);
        let b = el(ElementType::Cta, 0.0, 50.0, 100.0, 40.0);
        let mut c = el(ElementType::Cta, 0.0, 100.0, 100.0, 40.0);
        c.semantic_tag = SemanticTag::DestructiveAction;

        let map = component_map(&[&a, &b, &c], ExportTarget::HtmlCss);
        assert_eq!(
            map,
            "**Suggested Components:**\n- Button → `<button>`\n- Button → `<button class=\"destructive\">`"
        );
    }

    #[test]
    fn test_annotations_empty_without_notes_or_tags() {
        let plain = el(ElementType::Body, 0.0, 0.0, 100.0, 40.0);
        assert!(annotations(&[&plain]).is_empty());
    }

    #[test]
    fn test_json_tree_omits_empty_fields() {
        let section = el(ElementType::Container, 0.0, 0.0, 300.0, 300.0).with_label("Hero");
        let body = el(ElementType::Body, 10.0, 10.0, 100.0, 20.0).with_label("Hi");
        let elements = vec![section, body];
        let tree = layout_for_state(&elements, ScreenState::Default);

        let json = json_tree(&tree);
        assert!(json.starts_with("**JSON Element Tree:**\n```json\n[\n  {\n    \"type\": \"container\""));
        assert!(json.contains("\"children\": ["));
        assert!(!json.contains("semanticTag"));
        assert!(!json.contains("annotation"));
        assert!(json.ends_with("]\n```"));
    }

    #[test]
    fn test_navigation_skips_dangling_and_self_loops() {
        let mut project = Project::new();
        project.screens.push(Screen::new("Checkout"));
        let home = project.screens[0].id.clone();
        let checkout = project.screens[1].id.clone();
        project.arrows = vec![
            FlowArrow::new(home.clone(), checkout, "Buy"),
            FlowArrow::new(home.clone(), home.clone(), "Refresh"),
            FlowArrow::new(home, ScreenId::new(), "Ghost"),
        ];

        let lines = navigation_lines(&project);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("→ Checkout: [Trigger: Buy]"));
    }

    #[test]
    fn test_layout_strategy_mentions_present_kinds() {
        let mut project = Project::new();
        project.device = DeviceType::Desktop;
        project.screens[0]
            .elements
            .push(el(ElementType::Tabbar, 0.0, 800.0, 1440.0, 56.0));

        let hints = responsive_hints(&project);
        assert!(hints.contains("- Base: 1440px (desktop — designed for)"));
        assert!(hints.contains("- Tab bar:"));
        assert!(!hints.contains("- Top nav:"));
        assert!(!hints.contains("- Bottom sheet:"));
    }
}
