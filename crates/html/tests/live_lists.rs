use dom::QuirksMode;
use html::parse_document;

#[test]
fn tag_lists_follow_mutations_of_a_parsed_document() {
    let mut doc = parse_document("<div id=a><p>one<p>two</div><ul><li>x</ul>");
    let root = doc.root();
    let paragraphs = doc.elements_by_tag_name(root, "p");
    let all = doc.elements_by_tag_name(root, "*");
    assert_eq!(paragraphs.length(&doc), 2);
    assert_eq!(all.length(&doc), 6);

    let div = doc.element_by_id("a").expect("div");
    let extra = doc.create_element("p").expect("p");
    doc.append_child(div, extra).expect("append");
    assert_eq!(paragraphs.length(&doc), 3);
    assert_eq!(paragraphs.item(&doc, 2), Some(extra));

    let first = paragraphs.item(&doc, 0).expect("first p");
    doc.remove_child(div, first).expect("remove");
    assert_eq!(paragraphs.length(&doc), 2);
    assert_eq!(paragraphs.item(&doc, 1), Some(extra));
    assert_eq!(all.length(&doc), 6);
}

#[test]
fn child_lists_of_one_parent_share_a_cache() {
    let doc = parse_document("<p class=a>x<p class=a>y");
    let html = doc.document_element().expect("root");
    let first = doc.child_nodes(html);
    let second = doc.child_nodes(html);
    assert!(first.shares_cache_with(&second));
    assert_eq!(second.length(&doc), 2);
    assert_eq!(doc.live_shared_list_caches(), 1);

    let upper = doc.elements_by_tag_name(doc.root(), "P");
    let lower = doc.elements_by_tag_name(doc.root(), "p");
    assert!(!upper.shares_cache_with(&lower));
    assert_eq!(upper.length(&doc), lower.length(&doc));

    drop(first);
    drop(second);
    assert_eq!(doc.live_shared_list_caches(), 0);
}

#[test]
fn class_lists_track_attribute_changes() {
    let mut doc = parse_document("<!DOCTYPE html><div class='a b'></div><span class=b></span>");
    assert_eq!(doc.quirks_mode(), QuirksMode::NoQuirks);
    let root = doc.root();
    let both = doc.elements_by_class_name(root, "b a");
    let only_b = doc.elements_by_class_name(root, " b ");
    assert_eq!(both.length(&doc), 1);
    assert_eq!(only_b.length(&doc), 2);

    let span = only_b.item(&doc, 1).expect("span");
    doc.set_attribute(span, "class", "a b").expect("set class");
    assert_eq!(both.length(&doc), 2);

    doc.remove_attribute(span, "class").expect("remove class");
    assert_eq!(both.length(&doc), 1);
    assert_eq!(only_b.length(&doc), 1);
}

#[test]
fn quirks_documents_match_classes_without_case() {
    let doc = parse_document("<div class=Foo></div>");
    assert_eq!(doc.quirks_mode(), QuirksMode::Quirks);
    assert_eq!(doc.elements_by_class_name(doc.root(), "foo").length(&doc), 1);

    let doc = parse_document("<!doctype html><div class=Foo></div>");
    assert_eq!(doc.elements_by_class_name(doc.root(), "foo").length(&doc), 0);
    assert_eq!(doc.elements_by_class_name(doc.root(), "Foo").length(&doc), 1);
}

#[test]
fn name_lists_and_child_nodes() {
    let mut doc = parse_document("<form><input name=q><input name=q><input name=r></form>");
    let named = doc.elements_by_name("q");
    assert_eq!(named.length(&doc), 2);

    let form = doc
        .elements_by_tag_name(doc.root(), "form")
        .item(&doc, 0)
        .expect("form");
    let children = doc.child_nodes(form);
    assert_eq!(children.length(&doc), 3);

    let last = children.item(&doc, 2).expect("third input");
    doc.set_attribute(last, "name", "q").expect("rename");
    assert_eq!(named.length(&doc), 3);

    let text = doc.create_text("t");
    doc.append_child(form, text).expect("append text");
    assert_eq!(children.length(&doc), 4);
    assert_eq!(children.to_vec(&doc).last(), Some(&text));
}

#[test]
fn iteration_matches_document_order() {
    let doc = parse_document("<b>1</b><i><b>2</b></i><b>3</b>");
    let bold = doc.elements_by_tag_name(doc.root(), "b");
    let texts: Vec<String> = bold.iter(&doc).map(|b| doc.text_content(b)).collect();
    assert_eq!(texts, ["1", "2", "3"]);
    let backwards: Vec<String> = (0..bold.length(&doc))
        .rev()
        .filter_map(|i| bold.item(&doc, i))
        .map(|b| doc.text_content(b))
        .collect();
    assert_eq!(backwards, ["3", "2", "1"]);
}
