//! Tests for the lookup operations the style engine relies on.

use quokka_dom::{Document, ElementData, NodeId};

fn sample() -> (Document, NodeId, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.append_element(NodeId::ROOT, ElementData::new("body"));
    let list = doc.append_element(
        body,
        ElementData::new("ul")
            .with_attr("id", "menu")
            .with_attr("class", "list wide"),
    );
    let first = doc.append_element(list, ElementData::new("li").with_attr("class", "entry"));
    let _ = doc.append_text(list, "  ");
    let second = doc.append_element(list, ElementData::new("LI").with_attr("class", "entry"));
    (doc, body, list, first, second)
}

#[test]
fn test_element_by_id() {
    let (doc, _, list, _, _) = sample();
    assert_eq!(doc.element_by_id("menu"), Some(list));
    assert_eq!(doc.element_by_id("missing"), None);
}

#[test]
fn test_elements_by_class_in_document_order() {
    let (doc, _, list, first, second) = sample();
    assert_eq!(doc.elements_by_class("entry"), vec![first, second]);
    assert_eq!(doc.elements_by_class("wide"), vec![list]);
    assert!(doc.elements_by_class("list wide").is_empty());
}

#[test]
fn test_elements_by_tag_name_ignores_case() {
    let (doc, _, _, first, second) = sample();
    assert_eq!(doc.elements_by_tag_name("li"), vec![first, second]);
}

#[test]
fn test_elements_skip_document_and_text() {
    let (doc, body, list, first, second) = sample();
    assert_eq!(doc.elements(), vec![body, list, first, second]);
}

#[test]
fn test_element_children_skip_text() {
    let (doc, _, list, first, second) = sample();
    assert_eq!(doc.children(list).len(), 3);
    assert_eq!(doc.element_children(list), vec![first, second]);
}

#[test]
fn test_parent_relationships() {
    let (doc, body, list, first, _) = sample();
    assert_eq!(doc.parent(first), Some(list));
    assert_eq!(doc.parent(body), Some(NodeId::ROOT));
}

#[test]
fn test_attributes() {
    let (mut doc, body, list, _, _) = sample();
    assert_eq!(doc.attribute(list, "id"), Some("menu"));
    assert_eq!(doc.attribute(NodeId::ROOT, "id"), None);
    assert_eq!(doc.set_attribute(body, "style", "color: red"), None);
    assert_eq!(doc.attribute(body, "style"), Some("color: red"));
}

#[test]
fn test_classes_split_on_whitespace() {
    let data = ElementData::new("div").with_attr("class", " a  b\tc ");
    let classes = data.classes();
    assert_eq!(classes.len(), 3);
    assert!(classes.contains("b"));
    assert!(data.has_class("c"));
    assert!(!data.has_class(""));
}
