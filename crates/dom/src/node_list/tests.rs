use super::*;
use crate::document::QuirksMode;

/// `<html><body>` followed by `count` `<div><span/></div>` blocks.
fn doc_with_blocks(count: usize) -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new();
    let html = doc.create_element("html").unwrap();
    let body = doc.create_element("body").unwrap();
    doc.append_child(doc.root(), html).unwrap();
    doc.append_child(html, body).unwrap();
    let mut divs = Vec::new();
    for _ in 0..count {
        let div = doc.create_element("div").unwrap();
        let span = doc.create_element("span").unwrap();
        doc.append_child(body, div).unwrap();
        doc.append_child(div, span).unwrap();
        divs.push(div);
    }
    (doc, body, divs)
}

fn linear_scan<M: NodeMatcher>(doc: &Document, list: &DynamicNodeList<M>) -> Vec<NodeId> {
    doc.descendants(list.root())
        .filter(|&node| {
            // Descendants ignores `recurse`, so only use this with matchers
            // that recurse everywhere.
            list.matcher().matches(doc, node).matches
        })
        .collect()
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self, upper: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 33) as usize) % upper
    }
}

#[test]
fn child_nodes_lists_on_one_node_share_a_cache() {
    let (doc, body, _) = doc_with_blocks(3);
    let a = doc.child_nodes(body);
    let b = doc.child_nodes(body);
    let other = doc.child_nodes(doc.root());
    assert!(a.shares_cache_with(&b));
    assert!(!a.shares_cache_with(&other));
    assert_eq!(doc.live_shared_list_caches(), 2);

    drop(a);
    drop(b);
    assert_eq!(doc.live_shared_list_caches(), 1, "cache released with its last list");
}

#[test]
fn parameterized_lists_never_share() {
    let (doc, body, _) = doc_with_blocks(2);
    let a = doc.elements_by_tag_name(body, "div");
    let b = doc.elements_by_tag_name(body, "div");
    assert!(!a.shares_cache_with(&b));
    assert_eq!(doc.live_shared_list_caches(), 0);
}

#[test]
fn child_nodes_does_not_descend() {
    let (doc, body, divs) = doc_with_blocks(3);
    let list = doc.child_nodes(body);
    assert_eq!(list.length(&doc), 3);
    assert_eq!(list.to_vec(&doc), divs);
    assert_eq!(list.item(&doc, 3), None);
}

#[test]
fn length_tracks_insertions_without_refresh() {
    let (mut doc, body, divs) = doc_with_blocks(2);
    let list = doc.elements_by_tag_name(doc.root(), "div");
    assert_eq!(list.length(&doc), 2);

    let nested = doc.create_element("div").unwrap();
    doc.append_child(divs[0], nested).unwrap();
    assert_eq!(list.length(&doc), 3);
    assert_eq!(list.item(&doc, 1), Some(nested), "nested div sorts before the second block");

    doc.remove_child(body, divs[1]).unwrap();
    assert_eq!(list.length(&doc), 2);
    assert_eq!(list.item(&doc, 2), None);
}

#[test]
fn random_access_matches_linear_scan() {
    let (mut doc, _, divs) = doc_with_blocks(40);
    // Nest some extra divs so the walk has depth.
    for (i, &div) in divs.iter().enumerate().filter(|(i, _)| i % 3 == 0) {
        let inner = doc.create_element("div").unwrap();
        doc.append_child(div, inner).unwrap();
        if i % 2 == 0 {
            let deeper = doc.create_element("div").unwrap();
            doc.append_child(inner, deeper).unwrap();
        }
    }
    let list = doc.elements_by_tag_name(doc.root(), "DIV");
    let expected = linear_scan(&doc, &list);
    assert_eq!(list.length(&doc), expected.len());

    for seed in 0..8u64 {
        let mut order: Vec<usize> = (0..expected.len()).collect();
        let mut rng = Lcg(seed);
        for i in (1..order.len()).rev() {
            let j = rng.next(i + 1);
            order.swap(i, j);
        }
        for &index in &order {
            assert_eq!(
                list.item(&doc, index),
                Some(expected[index]),
                "seed={seed} index={index}"
            );
        }
    }
}

#[test]
fn backward_walk_respects_non_recursing_matcher() {
    let (mut doc, body, _) = doc_with_blocks(0);
    let mut expected = Vec::new();
    for i in 0..20 {
        let div = doc.create_element("div").unwrap();
        doc.append_child(body, div).unwrap();
        if i % 2 == 0 {
            doc.set_attribute(div, "class", "hit").unwrap();
            expected.push(div);
        }
        // Text children are skipped without descending.
        let text = doc.create_text("t");
        doc.append_child(div, text).unwrap();
    }
    let list = doc.elements_by_class_name(body, "hit");
    for index in (0..expected.len()).rev() {
        assert_eq!(list.item(&doc, index), Some(expected[index]));
    }
    assert_eq!(list.item(&doc, 0), Some(expected[0]));
}

#[test]
fn class_list_revalidates_on_class_change_only() {
    let (mut doc, body, divs) = doc_with_blocks(3);
    doc.set_quirks_mode(QuirksMode::NoQuirks);
    doc.set_attribute(divs[1], "class", "a b").unwrap();
    let list = doc.elements_by_class_name(body, "b a");
    assert_eq!(list.to_vec(&doc), vec![divs[1]]);

    doc.set_attribute(divs[2], "class", "a").unwrap();
    assert_eq!(list.length(&doc), 1);
    doc.set_attribute(divs[2], "class", "b a c").unwrap();
    assert_eq!(list.to_vec(&doc), vec![divs[1], divs[2]]);

    doc.set_attribute(divs[0], "class", "A B").unwrap();
    assert_eq!(list.length(&doc), 2, "standards mode compares case-sensitively");
    doc.set_quirks_mode(QuirksMode::Quirks);
    assert_eq!(list.length(&doc), 3, "quirks mode folds ASCII case");
}

#[test]
fn empty_class_query_matches_nothing() {
    let (mut doc, body, divs) = doc_with_blocks(2);
    doc.set_attribute(divs[0], "class", "x").unwrap();
    let list = doc.elements_by_class_name(body, "  ");
    assert_eq!(list.length(&doc), 0);
    assert!(list.is_empty(&doc));
}

#[test]
fn name_list_follows_name_attribute() {
    let (mut doc, _, divs) = doc_with_blocks(3);
    let list = doc.elements_by_name("field");
    assert_eq!(list.length(&doc), 0);
    doc.set_attribute(divs[2], "name", "field").unwrap();
    doc.set_attribute(divs[0], "name", "field").unwrap();
    assert_eq!(list.to_vec(&doc), vec![divs[0], divs[2]]);
    doc.set_attribute(divs[0], "name", "other").unwrap();
    assert_eq!(list.to_vec(&doc), vec![divs[2]]);
}

#[test]
fn name_list_includes_foreign_elements() {
    let (mut doc, body, divs) = doc_with_blocks(1);
    let rect = doc
        .create_element_ns("http://www.w3.org/2000/svg", "svg:rect")
        .unwrap();
    doc.append_child(body, rect).unwrap();
    let list = doc.elements_by_name("field");
    doc.set_attribute(rect, "name", "field").unwrap();
    doc.set_attribute(divs[0], "name", "field").unwrap();
    assert_eq!(list.to_vec(&doc), vec![divs[0], rect]);
}

#[test]
fn wildcard_and_namespace_queries() {
    let (mut doc, body, _) = doc_with_blocks(1);
    let svg = doc
        .create_element_ns("http://www.w3.org/2000/svg", "svg:rect")
        .unwrap();
    doc.append_child(body, svg).unwrap();

    let all = doc.elements_by_tag_name(doc.root(), "*");
    // html, body, div, span, svg:rect
    assert_eq!(all.length(&doc), 5);

    let prefixed = doc.elements_by_tag_name(doc.root(), "svg:rect");
    assert_eq!(prefixed.to_vec(&doc), vec![svg]);
    let unprefixed = doc.elements_by_tag_name(doc.root(), "rect");
    assert_eq!(unprefixed.length(&doc), 0);

    let in_svg = doc.elements_by_tag_name_ns(doc.root(), "http://www.w3.org/2000/svg", "*");
    assert_eq!(in_svg.to_vec(&doc), vec![svg]);
    let any_span = doc.elements_by_tag_name_ns(doc.root(), "*", "span");
    assert_eq!(any_span.length(&doc), 1);
    let null_ns = doc.elements_by_tag_name_ns(doc.root(), "", "span");
    assert_eq!(null_ns.length(&doc), 0);
}

#[test]
fn literal_star_element_is_not_a_wildcard() {
    let (mut doc, body, _) = doc_with_blocks(1);
    let star = doc.create_element_ns("urn:x", "*").unwrap();
    doc.append_child(body, star).unwrap();
    let list = doc.elements_by_tag_name_ns(doc.root(), "urn:x", "*");
    assert_eq!(list.to_vec(&doc), vec![star]);
    let exact = doc.elements_by_tag_name_ns(doc.root(), "*", "div");
    assert_eq!(exact.length(&doc), 1);
}

#[test]
fn item_during_mutation_sees_shifted_indices() {
    let (mut doc, body, divs) = doc_with_blocks(3);
    let list = doc.child_nodes(body);
    assert_eq!(list.item(&doc, 1), Some(divs[1]));
    doc.remove_child(body, divs[0]).unwrap();
    assert_eq!(list.item(&doc, 1), Some(divs[2]));
}
