//! Integration tests for reading stylesheets into the rule model.

use quokka_css::{PropertyValue, RuleInvoke, SelectType, StyleSheet};

fn parse(css: &str) -> StyleSheet {
    let mut sheet = StyleSheet::new();
    sheet.parse(css);
    sheet
}

fn part_names(sheet: &StyleSheet, group: usize, selector: usize) -> Vec<(String, SelectType)> {
    sheet.groups[group].selectors[selector]
        .parts
        .iter()
        .map(|p| (p.name.clone(), p.select_type))
        .collect()
}

fn texts(values: &[PropertyValue]) -> Vec<&str> {
    values.iter().map(|v| v.text.as_str()).collect()
}

#[test]
fn test_class_then_descendant_tag() {
    let sheet = parse(".entry span { color: red; }");
    assert_eq!(sheet.groups.len(), 1);
    assert_eq!(
        part_names(&sheet, 0, 0),
        vec![
            ("entry".to_string(), SelectType::Class),
            ("span".to_string(), SelectType::Tag),
        ]
    );
}

#[test]
fn test_two_classes() {
    let sheet = parse(".entry .wide { margin: 0; }");
    assert_eq!(
        part_names(&sheet, 0, 0),
        vec![
            ("entry".to_string(), SelectType::Class),
            ("wide".to_string(), SelectType::Class),
        ]
    );
}

#[test]
fn test_id_and_selector_list() {
    let sheet = parse("#menu, ul > li { padding: 2px }");
    let group = &sheet.groups[0];
    assert_eq!(group.selectors.len(), 2);
    assert_eq!(part_names(&sheet, 0, 0), vec![("menu".to_string(), SelectType::Id)]);
    assert_eq!(
        part_names(&sheet, 0, 1),
        vec![
            ("ul".to_string(), SelectType::Tag),
            ("li".to_string(), SelectType::Child),
        ]
    );
    assert_eq!(group.rules.len(), 1);
}

#[test]
fn test_attribute_selector_becomes_plain_parts() {
    let sheet = parse(r#"input[type="text"] { width: 10px }"#);
    let names: Vec<String> = part_names(&sheet, 0, 0).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["input", "type", "text"]);
}

#[test]
fn test_pseudo_function_arguments() {
    let sheet = parse("li:nth-child(2n+1) { color: red }");
    let parts = &sheet.groups[0].selectors[0].parts;
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].name, "nth-child");
    assert_eq!(parts[1].select_type, SelectType::PseudoFunction);
    assert_eq!(parts[1].args, vec!["2", "n", "+", "1"]);
}

#[test]
fn test_hover_part() {
    let sheet = parse("button:hover { color: blue }");
    assert_eq!(
        part_names(&sheet, 0, 0),
        vec![
            ("button".to_string(), SelectType::Tag),
            ("hover".to_string(), SelectType::Pseudo),
        ]
    );
    // Retagging happens during matching, not parsing.
    assert_eq!(sheet.groups[0].rules[0].invocation, RuleInvoke::Immediate);
}

#[test]
fn test_declarations_in_order() {
    let sheet = parse("p { Color: red; margin: 1px 2px; }");
    let rules = &sheet.groups[0].rules;
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].property, "color");
    assert_eq!(texts(&rules[1].values), vec!["1px", "2px"]);
    assert_eq!(rules[1].values[0].num, Some(1.0));
    assert!(rules[0].sort < rules[1].sort);
}

#[test]
fn test_function_value_collects_arguments() {
    let sheet = parse("div { width: calc(100% - 24px); color: rgb(1, 2, 3) }");
    let rules = &sheet.groups[0].rules;
    let calc = &rules[0].values[0];
    assert_eq!(calc.text, "calc");
    assert_eq!(calc.args, vec!["100%", "-", "24px"]);
    assert_eq!(calc.arg_nums, vec![Some(100.0), None, Some(24.0)]);
    assert_eq!(rules[1].values[0].args, vec!["1", "2", "3"]);
}

#[test]
fn test_nested_parentheses_in_calc() {
    let sheet = parse("div { width: calc((10px + 2px) * 2) }");
    let calc = &sheet.groups[0].rules[0].values[0];
    assert_eq!(calc.args, vec!["(", "10px", "+", "2px", ")", "*", "2"]);
}

#[test]
fn test_deeply_nested_calc_does_not_overflow() {
    let sheet = parse(&format!("b {{ color: red }} a {{ width: calc({}1px) }}", "(".repeat(5_000)));
    assert_eq!(sheet.groups.len(), 2);
    let rule = &sheet.groups[1].rules[0];
    assert_eq!(rule.property, "width");
    let calc = &rule.values[0];
    assert_eq!(calc.text, "calc");
    let count = |text: &str| calc.args.iter().filter(|a| *a == text).count();
    assert_eq!(count("("), count(")"));
    assert_eq!(count("1px"), 0);
}

#[test]
fn test_custom_property_binding() {
    let sheet = parse(":root { --ed-menu-bar-height: 24px; }");
    assert_eq!(sheet.custom_var("--ed-menu-bar-height"), Some(&["24px".to_string()][..]));
    assert!(sheet.groups[0].rules.is_empty());
}

#[test]
fn test_var_substituted_inside_function() {
    let sheet = parse(
        ":root { --ed-menu-bar-height: 24px; }
         #panel { height: calc(100% - var(--ed-menu-bar-height)); }",
    );
    let calc = &sheet.groups[1].rules[0].values[0];
    assert_eq!(calc.text, "calc");
    assert_eq!(calc.args, vec!["100%", "-", "24px"]);
}

#[test]
fn test_var_fallback_and_unresolved() {
    let sheet = parse("a { margin: var(--gap, 4px); padding: var(--later); }");
    let rules = &sheet.groups[0].rules;
    assert_eq!(texts(&rules[0].values), vec!["4px"]);

    let unresolved = &rules[1].values[0];
    assert_eq!(unresolved.text, "var");
    assert_eq!(unresolved.args, vec!["--later"]);
}

#[test]
fn test_property_values_are_independent_copies() {
    let sheet = parse("a { width: calc(1px + 2px) }");
    let original = sheet.groups[0].rules[0].values[0].clone();
    let mut copy = original.clone();
    copy.push_arg("3px");
    copy.text.push('x');
    assert_eq!(original.args.len(), 3);
    assert_eq!(original.text, "calc");
    assert_eq!(copy.args.len(), 4);
}

#[test]
fn test_unterminated_ruleset_is_dropped() {
    let sheet = parse("a { color: red } b");
    assert_eq!(sheet.groups.len(), 1);
}

#[test]
fn test_inline_style() {
    let sheet = parse(":root { --accent: #ff0000; }");
    let group = sheet.parse_inline("color: var(--accent); width: 10px !important");
    assert!(group.selectors.is_empty());
    assert_eq!(group.rules.len(), 2);
    assert_eq!(texts(&group.rules[0].values), vec!["#ff0000"]);
    assert_eq!(texts(&group.rules[1].values), vec!["10px"]);
}

#[test]
fn test_comments_and_at_rules_are_skipped() {
    let sheet = parse("/* header */ @media print { a { color: red } } p { color: blue }");
    assert_eq!(sheet.groups.len(), 1);
    assert_eq!(part_names(&sheet, 0, 0), vec![("p".to_string(), SelectType::Tag)]);
}
