//! Integration tests for the pseudo-class registry and selection through it.

use std::collections::HashSet;

use quokka_css::pseudos::{self, Pseudo};
use quokka_css::{SelectType, SelectorPart, StyleError, StyleSheet, collect_rules};
use quokka_dom::{Document, ElementData, NodeId};

fn list_of(count: usize) -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new();
    let list = doc.append_element(NodeId::ROOT, ElementData::new("ul").with_attr("id", "list"));
    let items = (0..count)
        .map(|_| doc.append_element(list, ElementData::new("li")))
        .collect();
    (doc, list, items)
}

fn nth_child(args: &[&str]) -> SelectorPart {
    let mut part = SelectorPart::new("nth-child", SelectType::PseudoFunction);
    part.args = args.iter().map(|a| (*a).to_string()).collect();
    part
}

fn positions(items: &[NodeId], selected: &[NodeId]) -> HashSet<usize> {
    selected
        .iter()
        .filter_map(|id| items.iter().position(|item| item == id))
        .collect()
}

#[test]
fn test_registry_flags() {
    let nth = pseudos::lookup("nth-child").unwrap();
    assert!(nth.is_function());
    assert_eq!(nth.key(), "nth-child");
    assert!(!pseudos::lookup("HOVER").unwrap().is_function());
    assert!(pseudos::lookup("frobnicate").is_none());
}

#[test]
fn test_odd_even_and_an_plus_b() {
    let (doc, list, items) = list_of(5);
    let nth = pseudos::lookup("nth-child").unwrap();
    let expected: HashSet<usize> = [1, 3].into_iter().collect();

    for args in [&["odd"][..], &["2", "n", "+", "1"][..]] {
        let selected = nth.process(&doc, list, &nth_child(args)).unwrap();
        assert_eq!(positions(&items, &selected), expected, "args {args:?}");
    }

    let even = nth.process(&doc, list, &nth_child(&["even"])).unwrap();
    assert_eq!(positions(&items, &even), [0, 2, 4].into_iter().collect());
}

#[test]
fn test_nth_child_without_children() {
    let (doc, _, items) = list_of(1);
    let nth = pseudos::lookup("nth-child").unwrap();
    assert!(matches!(
        nth.process(&doc, items[0], &nth_child(&["2", "n"])),
        Err(StyleError::Eval(_))
    ));
}

#[test]
fn test_placeholder_is_not_implemented() {
    let (doc, list, _) = list_of(2);
    let focus = pseudos::lookup("focus").unwrap();
    assert_eq!(
        focus.process(&doc, list, &SelectorPart::new("focus", SelectType::Pseudo)),
        Err(StyleError::PseudoNotImplemented {
            name: "focus".to_string()
        })
    );
}

#[test]
fn test_selector_through_nth_child() {
    let (doc, _, items) = list_of(5);
    let mut sheet = StyleSheet::new();
    sheet.parse("#list:nth-child(2n+1) { color: red }");
    let map = collect_rules(&sheet, &doc);
    let styled: HashSet<usize> = positions(&items, &map.keys().copied().collect::<Vec<_>>());
    assert_eq!(styled, [1, 3].into_iter().collect());
}

#[test]
fn test_unknown_pseudo_selects_nothing() {
    let (doc, _, _) = list_of(3);
    let mut sheet = StyleSheet::new();
    sheet.parse("#list:frobnicate { color: red }");
    assert!(collect_rules(&sheet, &doc).is_empty());
}

#[test]
fn test_unimplemented_pseudo_selects_nothing() {
    let (doc, _, _) = list_of(3);
    let mut sheet = StyleSheet::new();
    sheet.parse("#list:checked { color: red }");
    assert!(collect_rules(&sheet, &doc).is_empty());
}

#[test]
fn test_root_selects_document_element() {
    let (doc, list, _) = list_of(2);
    let mut sheet = StyleSheet::new();
    sheet.parse(":root { color: black }");
    let map = collect_rules(&sheet, &doc);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![list]);
}
