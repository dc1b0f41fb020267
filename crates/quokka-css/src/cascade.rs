//! Matching rules to elements and handing them to the host.
//!
//! [CSS Cascading Level 4 § 6](https://www.w3.org/TR/css-cascade-4/#cascading)
//!
//! The cascade here has no specificity. For every element the matched rules
//! are kept in declaration order and a later rule for the same property and
//! invocation replaces an earlier one. Inline `style` attributes are applied
//! after everything else.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use quokka_dom::{Document, NodeId};

use crate::error::StyleError;
use crate::functions::{FunctionContext, resolve_values};
use crate::host::{PointerEvent, RuleHandler, StyleHost};
use crate::pseudos;
use crate::rules::{Rule, RuleInvoke, SelectType, Selector, SelectorPart, StyleSheet};

/// Rules gathered per element during one cascade pass.
pub type CssMap = HashMap<NodeId, Vec<Rule>>;

/// Resolve a selector part by its own type: one id, a class list, or a tag
/// list. A pseudo-class missing from the registry selects nothing.
fn lookup_part(document: &Document, part: &SelectorPart) -> Vec<NodeId> {
    match part.select_type {
        SelectType::Id => document.element_by_id(&part.name).into_iter().collect(),
        SelectType::Class => document.elements_by_class(&part.name),
        SelectType::Pseudo | SelectType::PseudoFunction => {
            tracing::debug!(pseudo = %part.name, "unknown pseudo-class");
            Vec::new()
        }
        _ => document.elements_by_tag_name(&part.name),
    }
}

/// Elements selected by a one-part selector. A lone pseudo-class is
/// anchored on the document node, so `:root` finds the document element.
fn match_direct(document: &Document, part: &SelectorPart, rules: Vec<Rule>) -> (Vec<NodeId>, Vec<Rule>) {
    let is_pseudo = matches!(part.select_type, SelectType::Pseudo | SelectType::PseudoFunction);
    if let Some(pseudo) = is_pseudo.then(|| pseudos::lookup(&part.name)).flatten() {
        return match pseudo.process(document, NodeId::ROOT, part) {
            Ok(found) => (found, pseudo.alter_rules(rules)),
            Err(err) => {
                tracing::debug!(pseudo = %part.name, error = %err, "selector matches nothing");
                (Vec::new(), rules)
            }
        };
    }
    (lookup_part(document, part), rules)
}

/// Elements selected by a selector chain, and the rules as the chain's
/// pseudo-classes rewrite them.
///
/// Every later part is evaluated against the anchors found by the first
/// part. A registered pseudo-class selects through [`pseudos::Pseudo::process`];
/// any other part selects the anchor's children whose tag is the part's
/// name, whatever its own select type.
fn match_chain(document: &Document, selector: &Selector, rules: Vec<Rule>) -> (Vec<NodeId>, Vec<Rule>) {
    let Some(first) = selector.anchor() else {
        return (Vec::new(), rules);
    };
    let anchors = lookup_part(document, first);
    let mut apply_rules = rules;
    let mut targets = Vec::new();

    for part in selector.parts.iter().skip(1) {
        if let Some(pseudo) = pseudos::lookup(&part.name) {
            for &anchor in &anchors {
                match pseudo.process(document, anchor, part) {
                    Ok(found) => targets.extend(found),
                    Err(err) => {
                        tracing::debug!(pseudo = %part.name, error = %err, "pseudo-class selected nothing");
                    }
                }
            }
            apply_rules = pseudo.alter_rules(apply_rules);
        } else {
            let candidates = document.elements_by_tag_name(&part.name);
            for &anchor in &anchors {
                targets.extend(
                    candidates
                        .iter()
                        .copied()
                        .filter(|&c| document.parent(c) == Some(anchor)),
                );
            }
        }
    }

    let mut seen = HashSet::new();
    targets.retain(|id| seen.insert(*id));
    (targets, apply_rules)
}

fn match_selector(document: &Document, selector: &Selector, rules: &[Rule]) -> (Vec<NodeId>, Vec<Rule>) {
    if selector.is_direct() {
        match_direct(document, &selector.parts[0], rules.to_vec())
    } else {
        match_chain(document, selector, rules.to_vec())
    }
}

/// Keep the last rule of every `(property, invocation)` pair, preserving the
/// order of the survivors.
#[must_use]
pub fn dedup_rules(rules: Vec<Rule>) -> Vec<Rule> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Rule> = rules
        .into_iter()
        .rev()
        .filter(|rule| seen.insert((rule.property.clone(), rule.invocation)))
        .collect();
    kept.reverse();
    kept
}

/// Match every selector of `sheet` against `document` and deduplicate the
/// rules of each element.
#[must_use]
pub fn collect_rules(sheet: &StyleSheet, document: &Document) -> CssMap {
    let mut map = CssMap::new();
    for group in &sheet.groups {
        for selector in group.selectors.iter().filter(|s| !s.parts.is_empty()) {
            let (targets, rules) = match_selector(document, selector, &group.rules);
            for target in targets {
                map.entry(target).or_default().extend(rules.iter().cloned());
            }
        }
    }
    for rules in map.values_mut() {
        *rules = dedup_rules(std::mem::take(rules));
    }
    tracing::debug!(elements = map.len(), "rules matched");
    map
}

/// Resolve the values of `rules` and hand them to the host one by one.
/// Failures are returned and do not stop the remaining rules.
pub(crate) fn apply_rules<'r, H: StyleHost + ?Sized>(
    host: &mut H,
    document: &Document,
    element: NodeId,
    rules: impl IntoIterator<Item = &'r Rule>,
    custom_vars: &BTreeMap<String, Vec<String>>,
) -> Vec<StyleError> {
    let mut problems = Vec::new();
    for rule in rules {
        let context = FunctionContext {
            document,
            element,
            property: &rule.property,
            metrics: host.metrics(element),
            custom_vars,
        };
        let (values, unresolved) = resolve_values(&context, &rule.values);
        problems.extend(unresolved);
        if let Err(err) = host.apply_property(element, &rule.property, &values) {
            tracing::debug!(element = element.0, property = %rule.property, error = %err, "apply failed");
            problems.push(err);
        }
    }
    problems
}

/// Register the enter/exit or press/release pair for a dynamic layer.
fn register_layer<H: StyleHost + ?Sized>(
    host: &mut H,
    element: NodeId,
    (rules, inline): (&Rc<[Rule]>, &Rc<[Rule]>),
    custom_vars: &Rc<BTreeMap<String, Vec<String>>>,
    layer: RuleInvoke,
    (on, off): (PointerEvent, PointerEvent),
) {
    let handler = |layer| {
        RuleHandler::new(
            element,
            Rc::clone(rules),
            Rc::clone(inline),
            layer,
            Rc::clone(custom_vars),
        )
    };
    host.register_handler(element, on, handler(Some(layer)));
    host.register_handler(element, off, handler(None));
}

/// Run the cascade: match `sheet` against `document`, apply immediate rules,
/// register pointer handlers for `:hover` and `:active` rules, then apply
/// inline `style` attributes.
///
/// Returns every problem met on the way; none of them stops the pass.
pub fn apply<H: StyleHost + ?Sized>(sheet: &StyleSheet, document: &Document, host: &mut H) -> Vec<StyleError> {
    let mut map = collect_rules(sheet, document);
    let custom_vars = Rc::new(sheet.custom_vars.clone());
    let mut problems = Vec::new();

    // Read up front so pointer handlers re-apply them too.
    let inline: HashMap<NodeId, Rc<[Rule]>> = document
        .elements()
        .into_iter()
        .filter_map(|element| {
            let style = document.attribute(element, "style").filter(|s| !s.trim().is_empty())?;
            let group = sheet.parse_inline(style);
            tracing::trace!(element = element.0, rules = group.rules.len(), "inline style");
            Some((element, Rc::<[Rule]>::from(group.rules)))
        })
        .collect();

    for element in document.elements() {
        let Some(rules) = map.remove(&element) else {
            continue;
        };
        problems.extend(apply_rules(
            host,
            document,
            element,
            rules.iter().filter(|r| r.invocation == RuleInvoke::Immediate),
            &custom_vars,
        ));

        let has = |invocation: RuleInvoke| rules.iter().any(|r| r.invocation == invocation);
        let (hover, active) = (has(RuleInvoke::Hover), has(RuleInvoke::Active));
        if hover || active {
            let captured: Rc<[Rule]> = rules.iter().filter(|r| !r.self_destruct).cloned().collect();
            let own_inline = inline.get(&element).map_or_else(|| Rc::<[Rule]>::from(Vec::new()), Rc::clone);
            if hover {
                register_layer(
                    host,
                    element,
                    (&captured, &own_inline),
                    &custom_vars,
                    RuleInvoke::Hover,
                    (PointerEvent::Enter, PointerEvent::Exit),
                );
            }
            if active {
                register_layer(
                    host,
                    element,
                    (&captured, &own_inline),
                    &custom_vars,
                    RuleInvoke::Active,
                    (PointerEvent::Press, PointerEvent::Release),
                );
            }
        }
    }

    for element in document.elements() {
        if let Some(rules) = inline.get(&element) {
            problems.extend(apply_rules(host, document, element, rules.iter(), &custom_vars));
        }
    }

    tracing::debug!(problems = problems.len(), "cascade finished");
    problems
}
