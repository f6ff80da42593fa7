use html::parse_document;
use html_test_support::tree_json::{document_element_json, tree_json};
use serde_json::json;

#[test]
fn paragraphs_lists_and_void_elements() {
    let doc = parse_document("<p>one<div>two<br>three</div><ul><li>a<li>b<ol><li>c</ol></ul>");
    assert_eq!(
        document_element_json(&doc),
        json!({
            "name": "html",
            "children": [
                { "name": "p", "children": ["one"] },
                { "name": "div", "children": ["two", { "name": "br" }, "three"] },
                { "name": "ul", "children": [
                    { "name": "li", "children": ["a"] },
                    { "name": "li", "children": ["b", { "name": "ol", "children": [
                        { "name": "li", "children": ["c"] }
                    ] }] }
                ] }
            ]
        })
    );
}

#[test]
fn doctype_comments_and_attributes() {
    let doc = parse_document("<!DOCTYPE html>\n<!--c--><html lang=en><a href='x?a=1&amp;b=2' title=t>link</a>");
    assert_eq!(
        tree_json(&doc, doc.root()),
        json!({
            "document": [
                { "doctype": "html" },
                { "comment": "c" },
                {
                    "name": "html",
                    "attrs": { "lang": "en" },
                    "children": [
                        {
                            "name": "a",
                            "attrs": { "href": "x?a=1&b=2", "title": "t" },
                            "children": ["link"]
                        }
                    ]
                }
            ]
        })
    );
}

#[test]
fn raw_text_elements_keep_markup_as_text() {
    let doc = parse_document("<title>a &amp; <b></title><script>if (a<b) x()</script><textarea>\n<i>&lt;</textarea>");
    assert_eq!(
        document_element_json(&doc),
        json!({
            "name": "html",
            "children": [
                { "name": "title", "children": ["a & <b>"] },
                { "name": "script", "children": ["if (a<b) x()"] },
                { "name": "textarea", "children": ["<i><"] }
            ]
        })
    );
}

#[test]
fn empty_input_has_no_document_element() {
    let doc = parse_document("");
    assert_eq!(document_element_json(&doc), serde_json::Value::Null);
    let doc = parse_document("   \n");
    assert_eq!(tree_json(&doc, doc.root()), json!({ "document": [] }));
}
