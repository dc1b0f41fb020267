//! Integration tests for matching, deduplication and dispatch to the host.

use quokka_css::{
    ElementMetrics, PointerEvent, PropertyValue, RecordingHost, RuleInvoke, StyleError, StyleSheet, apply,
    collect_rules,
};
use quokka_dom::{Document, ElementData, NodeId};

fn sheet(css: &str) -> StyleSheet {
    let mut sheet = StyleSheet::new();
    sheet.parse(css);
    sheet
}

fn text_of(values: Option<&[PropertyValue]>) -> Option<String> {
    values.map(|v| v.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(" "))
}

/// `<div class="panel"><span class="label"/><span class="wide"/></div>`
fn panel() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let panel = doc.append_element(NodeId::ROOT, ElementData::new("div").with_attr("class", "panel"));
    let label = doc.append_element(panel, ElementData::new("span").with_attr("class", "label"));
    let wide = doc.append_element(panel, ElementData::new("span").with_attr("class", "wide"));
    (doc, panel, label, wide)
}

#[test]
fn test_later_rule_wins() {
    let (doc, panel, _, _) = panel();
    let sheet = sheet(".panel { color: red; } div { color: blue; }");
    let map = collect_rules(&sheet, &doc);
    let rules = &map[&panel];
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].values[0].text, "blue");

    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(panel, "color")), Some("blue".to_string()));
    assert_eq!(host.applied_to(panel).count(), 1);
}

#[test]
fn test_chain_matches_children_of_anchor() {
    let (mut doc, _, label, wide) = panel();
    let stray = doc.append_element(NodeId::ROOT, ElementData::new("span"));
    let sheet = sheet(".panel span { margin: 1px }");

    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(label, "margin")), Some("1px".to_string()));
    assert_eq!(text_of(host.current_value(wide, "margin")), Some("1px".to_string()));
    assert_eq!(host.current_value(stray, "margin"), None);
}

#[test]
fn test_chain_parts_match_by_tag_name() {
    let (mut doc, panel, _, span_wide) = panel();
    let tag_wide = doc.append_element(panel, ElementData::new("wide"));
    let stray_wide = doc.append_element(NodeId::ROOT, ElementData::new("wide"));
    let sheet = sheet(".panel .wide { margin: 2px }");

    let map = collect_rules(&sheet, &doc);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![tag_wide]);

    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(tag_wide, "margin")), Some("2px".to_string()));
    assert_eq!(host.current_value(span_wide, "margin"), None);
    assert_eq!(host.current_value(stray_wide, "margin"), None);
}

#[test]
fn test_hover_lifecycle() {
    let (doc, panel, _, _) = panel();
    let sheet = sheet(".panel { color: red; } .panel:hover { color: green; }");
    let map = collect_rules(&sheet, &doc);
    let invocations: Vec<RuleInvoke> = map[&panel].iter().map(|r| r.invocation).collect();
    assert_eq!(invocations, vec![RuleInvoke::Immediate, RuleInvoke::Hover]);

    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(host.handler_count(), 2);
    assert_eq!(host.handler(panel, PointerEvent::Enter).and_then(|h| h.layer()), Some(RuleInvoke::Hover));
    assert_eq!(text_of(host.current_value(panel, "color")), Some("red".to_string()));

    host.reset_log();
    let problems = host.dispatch(panel, PointerEvent::Enter, &doc).unwrap();
    assert!(problems.is_empty());
    assert_eq!(host.cleared(), &[panel]);
    let applied: Vec<String> = host.applied().iter().map(|a| a.values[0].text.clone()).collect();
    assert_eq!(applied, vec!["red", "green"]);
    assert_eq!(text_of(host.current_value(panel, "color")), Some("green".to_string()));

    host.reset_log();
    let _ = host.dispatch(panel, PointerEvent::Exit, &doc).unwrap();
    assert_eq!(host.cleared(), &[panel]);
    assert_eq!(text_of(host.current_value(panel, "color")), Some("red".to_string()));
    assert_eq!(host.applied().len(), 1);
}

#[test]
fn test_active_press_and_release() {
    let (doc, panel, _, _) = panel();
    let sheet = sheet(".panel { opacity: 1 } .panel:active { opacity: 0.5 }");
    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert!(host.handler(panel, PointerEvent::Enter).is_none());

    let _ = host.dispatch(panel, PointerEvent::Press, &doc).unwrap();
    assert_eq!(text_of(host.current_value(panel, "opacity")), Some("0.5".to_string()));
    let _ = host.dispatch(panel, PointerEvent::Release, &doc).unwrap();
    assert_eq!(text_of(host.current_value(panel, "opacity")), Some("1".to_string()));
}

#[test]
fn test_no_handlers_without_dynamic_rules() {
    let (doc, _, _, _) = panel();
    let mut host = RecordingHost::new();
    let _ = apply(&sheet("span { color: red }"), &doc, &mut host);
    assert_eq!(host.handler_count(), 0);
}

#[test]
fn test_inline_style_applied_last() {
    let (mut doc, panel, _, _) = panel();
    let _ = doc.set_attribute(panel, "style", "color: purple; padding: var(--pad)");
    let sheet = sheet(":root { --pad: 6px } .panel { color: red; }");

    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(panel, "color")), Some("purple".to_string()));
    assert_eq!(text_of(host.current_value(panel, "padding")), Some("6px".to_string()));
    let order: Vec<&str> = host.applied_to(panel).map(|a| a.property.as_str()).collect();
    assert_eq!(order, vec!["color", "color", "padding"]);
}

#[test]
fn test_inline_style_survives_hover() {
    let (mut doc, panel, _, _) = panel();
    let _ = doc.set_attribute(panel, "style", "color: purple");
    let sheet = sheet(".panel { color: red } .panel:hover { color: green; margin: 1px }");

    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(panel, "color")), Some("purple".to_string()));

    host.reset_log();
    assert!(host.dispatch(panel, PointerEvent::Enter, &doc).unwrap().is_empty());
    let order: Vec<String> = host.applied().iter().map(|a| a.values[0].text.clone()).collect();
    assert_eq!(order, vec!["red", "green", "1px", "purple"]);
    assert_eq!(text_of(host.current_value(panel, "color")), Some("purple".to_string()));
    assert_eq!(text_of(host.current_value(panel, "margin")), Some("1px".to_string()));

    host.reset_log();
    assert!(host.dispatch(panel, PointerEvent::Exit, &doc).unwrap().is_empty());
    assert_eq!(text_of(host.current_value(panel, "color")), Some("purple".to_string()));
}

#[test]
fn test_calc_through_cascade() {
    let (doc, panel, label, _) = panel();
    let sheet = sheet(".label { width: calc(50% - 10px); height: calc(50% - 10px) }");
    let mut host = RecordingHost::new();
    host.set_metrics(
        label,
        ElementMetrics {
            parent_width: 200.0,
            parent_height: 80.0,
            ..ElementMetrics::default()
        },
    );
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(label, "width")), Some("90px".to_string()));
    assert_eq!(text_of(host.current_value(label, "height")), Some("30px".to_string()));
    assert_eq!(host.applied_to(panel).count(), 0);
}

#[test]
fn test_calc_with_custom_property() {
    let (doc, panel, _, _) = panel();
    let sheet = sheet(":root { --bar: 24px } .panel { height: calc(100% - var(--bar)) }");
    let mut host = RecordingHost::with_metrics(ElementMetrics {
        parent_height: 600.0,
        ..ElementMetrics::default()
    });
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(panel, "height")), Some("576px".to_string()));
}

#[test]
fn test_problems_are_collected() {
    let (doc, panel, _, _) = panel();
    let sheet = sheet(".panel { cursor: pointer; width: calc(1px / 0); color: red }");
    let mut host = RecordingHost::new();
    host.reject_property("cursor");

    let problems = apply(&sheet, &doc, &mut host);
    assert_eq!(problems.len(), 2);
    assert!(matches!(&problems[0], StyleError::PropertyApplyFailed { property, .. } if property == "cursor"));
    assert!(matches!(problems[1], StyleError::Eval(_)));

    // The failing value is handed over unresolved and the rest still runs.
    assert_eq!(text_of(host.current_value(panel, "width")), Some("calc".to_string()));
    assert_eq!(text_of(host.current_value(panel, "color")), Some("red".to_string()));
}

#[test]
fn test_self_destruct_rules_skip_handlers() {
    let (doc, panel, _, _) = panel();
    let mut sheet = sheet(".panel { color: red; margin: 4px } .panel:hover { color: green }");
    for rule in &mut sheet.groups[0].rules {
        rule.self_destruct = rule.property == "margin";
    }
    let mut host = RecordingHost::new();
    assert!(apply(&sheet, &doc, &mut host).is_empty());
    assert_eq!(text_of(host.current_value(panel, "margin")), Some("4px".to_string()));

    host.reset_log();
    let _ = host.dispatch(panel, PointerEvent::Enter, &doc).unwrap();
    let properties: Vec<&str> = host.applied().iter().map(|a| a.property.as_str()).collect();
    assert_eq!(properties, vec!["color", "color"]);
}
