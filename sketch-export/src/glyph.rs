//! ASCII wireframe glyphs.
//!
//! Each element kind has a fixed text shape. Containers draw a box and
//! render their children inside it one indent level deeper.

use std::fmt::Write;

use sketch_core::ElementType;

use crate::layout::LayoutNode;

/// Inner width of container boxes, in characters.
const BOX_WIDTH: usize = 40;

/// Placeholder shown for a state with nothing in it.
pub const EMPTY_STATE_TEXT: &str = "  (no elements defined for this state)";

/// Human-facing name for an element kind.
#[must_use]
pub const fn type_label(kind: ElementType) -> &'static str {
    match kind {
        ElementType::Container => "Section",
        ElementType::Heading => "Heading",
        ElementType::Body => "Text",
        ElementType::Cta => "Button",
        ElementType::Textfield => "Input",
        ElementType::Image => "Image",
        ElementType::Card => "Card",
        ElementType::Topnav => "Nav",
        ElementType::Tabbar => "TabBar",
        ElementType::Bottomsheet => "Sheet",
        ElementType::List => "List",
    }
}

/// Box-drawing characters for one border style.
struct BoxStyle {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

const SINGLE: BoxStyle = BoxStyle {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
};

const DOUBLE: BoxStyle = BoxStyle {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
};

/// Render a forest as ASCII, roots separated by a blank line.
#[must_use]
pub fn render_forest(nodes: &[LayoutNode<'_>]) -> String {
    if nodes.is_empty() {
        return EMPTY_STATE_TEXT.to_string();
    }
    nodes
        .iter()
        .map(|node| render_node(node, 0))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render one node and its subtree at `indent` levels.
#[must_use]
pub fn render_node(node: &LayoutNode<'_>, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let el = node.element;
    let label = &el.label;
    let mut lines: Vec<String> = Vec::new();

    match el.kind {
        ElementType::Container | ElementType::Card | ElementType::Bottomsheet => {
            let style = if el.kind == ElementType::Card {
                &DOUBLE
            } else {
                &SINGLE
            };
            let rule: String = std::iter::repeat(style.horizontal).take(BOX_WIDTH).collect();

            if el.kind == ElementType::Bottomsheet {
                lines.push(format!("{pad}      ──────"));
            }
            lines.push(format!(
                "{pad}{}{rule}{}  [{}: \"{label}\"]",
                style.top_left,
                style.top_right,
                type_label(el.kind)
            ));
            if node.children.is_empty() {
                lines.push(format!(
                    "{pad}{}{}{}",
                    style.vertical,
                    " ".repeat(BOX_WIDTH),
                    style.vertical
                ));
            } else {
                for child in &node.children {
                    lines.push(render_node(child, indent + 1));
                }
            }
            lines.push(format!("{pad}{}{rule}{}", style.bottom_left, style.bottom_right));
        }
        ElementType::Heading => lines.push(format!("{pad}## {label}")),
        ElementType::Body => lines.push(format!("{pad}   {label}")),
        ElementType::Cta => lines.push(format!("{pad}   [ {label} ]")),
        ElementType::Textfield => lines.push(format!("{pad}   |_ {label} ________________|")),
        ElementType::Image => {
            lines.push(format!("{pad}   ┌────────────────────────┐"));
            lines.push(format!(
                "{pad}   │     ╲      ╱           │  [Image: \"{label}\"]"
            ));
            lines.push(format!("{pad}   │       ╳                │"));
            lines.push(format!("{pad}   │     ╱      ╲           │"));
            lines.push(format!("{pad}   └────────────────────────┘"));
        }
        ElementType::Topnav => {
            let mut line = String::new();
            let _ = write!(line, "{pad}   [☰]  {label}  {}  [⋯]", "─".repeat(20));
            lines.push(line);
        }
        ElementType::Tabbar => {
            lines.push(format!("{pad}   {}", "─".repeat(34)));
            lines.push(format!("{pad}    {label}"));
        }
        ElementType::List => {
            for _ in 0..3 {
                lines.push(format!("{pad}   ├─ {label} (item) ──────────┤"));
            }
        }
    }

    lines.join("\n")
}
