//! Containment-based layout tree.
//!
//! Absolutely positioned elements are nested by bounding-box containment:
//!
//! ```text
//! 1. Order candidates by area, largest first (ties keep input order)
//! 2. For each element, smallest first, pick the tightest other
//!    container-type element whose box encloses it (edges inclusive)
//! 3. Elements with no such container become roots
//! 4. Siblings are ordered top-to-bottom, then left-to-right
//! ```
//!
//! A container may only be hosted by an equal-area container that comes
//! earlier in the area order, so the result is a forest even for zero-area
//! or coincident elements.

use std::cmp::Ordering;

use sketch_core::{Element, ScreenState};

/// One element and the elements nested inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode<'a> {
    /// The element at this node.
    pub element: &'a Element,
    /// Nesting depth, 0 for roots.
    pub depth: usize,
    /// Nested elements, in reading order.
    pub children: Vec<LayoutNode<'a>>,
}

impl LayoutNode<'_> {
    /// Number of nodes in this subtree, including itself.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(LayoutNode::len).sum::<usize>()
    }

    /// Always false; a node contains at least itself.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Visit this node and its descendants depth-first.
    pub fn walk<'s>(&'s self, visit: &mut impl FnMut(&'s Self)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Nest `elements` into a forest by geometric containment.
#[must_use]
pub fn build_layout_tree<'a>(elements: &[&'a Element]) -> Vec<LayoutNode<'a>> {
    let mut order: Vec<&'a Element> = elements.to_vec();
    // Stable: equal areas keep their input order.
    order.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let count = order.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots = Vec::new();

    for i in (0..count).rev() {
        let child = order[i];
        let child_area = child.area();
        let mut best: Option<(usize, f64)> = None;
        for (j, candidate) in order.iter().enumerate() {
            if j == i || !candidate.kind.is_container() || !candidate.contains(child) {
                continue;
            }
            let area = candidate.area();
            // Equal-area containers nest in order only, never both ways.
            if j > i && child.kind.is_container() && area.total_cmp(&child_area).is_eq() {
                continue;
            }
            if best.map_or(true, |(_, best_area)| area < best_area) {
                best = Some((j, area));
            }
        }
        match best {
            Some((parent, _)) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    let mut forest: Vec<LayoutNode<'a>> = roots
        .into_iter()
        .map(|i| build_node(&order, &children, i, 0))
        .collect();
    sort_reading_order(&mut forest);
    forest
}

/// Elements of `state` from `elements`, nested.
#[must_use]
pub fn layout_for_state(elements: &[Element], state: ScreenState) -> Vec<LayoutNode<'_>> {
    let filtered: Vec<&Element> = elements
        .iter()
        .filter(|el| el.screen_state == state)
        .collect();
    build_layout_tree(&filtered)
}

fn build_node<'a>(
    order: &[&'a Element],
    children: &[Vec<usize>],
    index: usize,
    depth: usize,
) -> LayoutNode<'a> {
    let mut nested: Vec<LayoutNode<'a>> = children[index]
        .iter()
        .map(|&child| build_node(order, children, child, depth + 1))
        .collect();
    sort_reading_order(&mut nested);
    LayoutNode {
        element: order[index],
        depth,
        children: nested,
    }
}

fn sort_reading_order(nodes: &mut [LayoutNode<'_>]) {
    nodes.sort_by(|a, b| reading_order(a.element, b.element));
}

/// Top-to-bottom, then left-to-right.
#[must_use]
pub fn reading_order(a: &Element, b: &Element) -> Ordering {
    a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::ElementType;

    fn el(kind: ElementType, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(kind, x, y, ScreenState::Default).with_size(w, h)
    }

    #[test]
    fn test_container_holds_heading() {
        let container = el(ElementType::Container, 0.0, 0.0, 300.0, 300.0);
        let heading = el(ElementType::Heading, 20.0, 20.0, 100.0, 30.0);
        let tree = build_layout_tree(&[&container, &heading]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].element.id, container.id);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].element.id, heading.id);
        assert_eq!(tree[0].children[0].depth, 1);
    }

    #[test]
    fn test_non_container_cannot_host() {
        let image = el(ElementType::Image, 0.0, 0.0, 300.0, 300.0);
        let button = el(ElementType::Cta, 20.0, 20.0, 100.0, 40.0);
        let tree = build_layout_tree(&[&image, &button]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_tightest_container_wins() {
        let outer = el(ElementType::Container, 0.0, 0.0, 400.0, 400.0);
        let card = el(ElementType::Card, 10.0, 10.0, 200.0, 200.0);
        let button = el(ElementType::Cta, 20.0, 20.0, 100.0, 40.0);
        let tree = build_layout_tree(&[&button, &outer, &card]);

        assert_eq!(tree.len(), 1);
        let card_node = &tree[0].children[0];
        assert_eq!(card_node.element.id, card.id);
        assert_eq!(card_node.children[0].element.id, button.id);
        assert_eq!(card_node.children[0].depth, 2);
    }

    #[test]
    fn test_edges_inclusive() {
        let sheet = el(ElementType::Bottomsheet, 0.0, 0.0, 100.0, 100.0);
        let body = el(ElementType::Body, 0.0, 0.0, 100.0, 100.0);
        let tree = build_layout_tree(&[&sheet, &body]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].element.id, sheet.id);
    }

    #[test]
    fn test_identical_containers_do_not_cycle() {
        let a = el(ElementType::Container, 0.0, 0.0, 100.0, 100.0);
        let b = el(ElementType::Container, 0.0, 0.0, 100.0, 100.0);
        let tree = build_layout_tree(&[&a, &b]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].element.id, a.id);
        assert_eq!(tree[0].children[0].element.id, b.id);
    }

    #[test]
    fn test_leaf_nests_in_equal_area_container_listed_after_it() {
        let body = el(ElementType::Body, 0.0, 0.0, 100.0, 100.0);
        let card = el(ElementType::Card, 0.0, 0.0, 100.0, 100.0);
        let tree = build_layout_tree(&[&body, &card]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].element.id, card.id);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].element.id, body.id);
    }

    #[test]
    fn test_zero_area_elements() {
        let a = el(ElementType::Container, 5.0, 5.0, 0.0, 0.0);
        let b = el(ElementType::Card, 5.0, 5.0, 0.0, 0.0);
        let c = el(ElementType::Body, 5.0, 5.0, 0.0, 0.0);
        let tree = build_layout_tree(&[&a, &b, &c]);
        let total: usize = tree.iter().map(LayoutNode::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_reading_order() {
        let low = el(ElementType::Body, 0.0, 200.0, 50.0, 50.0);
        let right = el(ElementType::Body, 100.0, 0.0, 50.0, 50.0);
        let left = el(ElementType::Body, 0.0, 0.0, 50.0, 50.0);
        let tree = build_layout_tree(&[&low, &right, &left]);
        let ids: Vec<_> = tree.iter().map(|n| n.element.id.clone()).collect();
        assert_eq!(ids, vec![left.id, right.id, low.id]);
    }

    #[test]
    fn test_layout_for_state_filters() {
        let elements = vec![
            el(ElementType::Body, 0.0, 0.0, 50.0, 50.0),
            Element::new(ElementType::Cta, 0.0, 0.0, ScreenState::Error),
        ];
        assert_eq!(layout_for_state(&elements, ScreenState::Default).len(), 1);
        assert_eq!(layout_for_state(&elements, ScreenState::Error).len(), 1);
        assert!(layout_for_state(&elements, ScreenState::Loading).is_empty());
    }
}
