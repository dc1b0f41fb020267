//! Tree-structural pseudo-classes.
//!
//! [Selectors Level 4 § 14](https://www.w3.org/TR/selectors-4/#structural-pseudos)
//!
//! Each selects among the element children of the anchor. Text nodes are
//! never counted.

use quokka_dom::{Document, NodeId, NodeType};

use super::Pseudo;
use crate::error::StyleError;
use crate::expr::parse_nth;
use crate::rules::SelectorPart;

fn children_or_error(document: &Document, element: NodeId, key: &str) -> Result<Vec<NodeId>, StyleError> {
    let children = document.element_children(element);
    if children.is_empty() {
        return Err(StyleError::NoChildren {
            name: key.to_string(),
        });
    }
    Ok(children)
}

/// `items[start]`, `items[start + step]`, ...
fn every_nth(items: &[NodeId], start: i64, step: i64) -> Vec<NodeId> {
    let start = usize::try_from(start).unwrap_or(usize::MAX);
    let step = usize::try_from(step).unwrap_or(1).max(1);
    items.iter().skip(start).step_by(step).copied().collect()
}

/// Children grouped by lower-cased tag name, groups in order of first
/// appearance and children in document order.
fn group_by_type(document: &Document, children: &[NodeId]) -> Vec<(String, Vec<NodeId>)> {
    let mut groups: Vec<(String, Vec<NodeId>)> = Vec::new();
    for &child in children {
        let Some(tag) = document.as_element(child).map(|e| e.tag_name.to_ascii_lowercase()) else {
            continue;
        };
        match groups.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, members)) => members.push(child),
            None => groups.push((tag, vec![child])),
        }
    }
    groups
}

/// Restore document order after selecting per type.
fn in_child_order(children: &[NodeId], mut selected: Vec<NodeId>) -> Vec<NodeId> {
    selected.sort_by_key(|id| children.iter().position(|c| c == id));
    selected
}

/// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
#[derive(Debug)]
pub struct FirstChild;

impl Pseudo for FirstChild {
    fn key(&self) -> &'static str {
        "first-child"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        Ok(children.into_iter().take(1).collect())
    }
}

/// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
#[derive(Debug)]
pub struct LastChild;

impl Pseudo for LastChild {
    fn key(&self) -> &'static str {
        "last-child"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        Ok(children.last().copied().into_iter().collect())
    }
}

/// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
#[derive(Debug)]
pub struct OnlyChild;

impl Pseudo for OnlyChild {
    fn key(&self) -> &'static str {
        "only-child"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        Ok(if children.len() == 1 { children } else { Vec::new() })
    }
}

/// [§ 14.3.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
#[derive(Debug)]
pub struct NthChild;

impl Pseudo for NthChild {
    fn key(&self) -> &'static str {
        "nth-child"
    }

    fn is_function(&self) -> bool {
        true
    }

    fn process(&self, document: &Document, element: NodeId, part: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = document.element_children(element);
        let (start, step) = parse_nth(&part.args, children.len())?;
        Ok(every_nth(&children, start, step))
    }
}

/// [§ 14.3.2 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
///
/// Counts from the last child; the result is in that order too.
#[derive(Debug)]
pub struct NthLastChild;

impl Pseudo for NthLastChild {
    fn key(&self) -> &'static str {
        "nth-last-child"
    }

    fn is_function(&self) -> bool {
        true
    }

    fn process(&self, document: &Document, element: NodeId, part: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let mut children = document.element_children(element);
        let (start, step) = parse_nth(&part.args, children.len())?;
        children.reverse();
        Ok(every_nth(&children, start, step))
    }
}

/// [§ 14.4.4 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
#[derive(Debug)]
pub struct FirstOfType;

impl Pseudo for FirstOfType {
    fn key(&self) -> &'static str {
        "first-of-type"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        let firsts = group_by_type(document, &children)
            .into_iter()
            .filter_map(|(_, members)| members.first().copied())
            .collect();
        Ok(in_child_order(&children, firsts))
    }
}

/// [§ 14.4.5 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
#[derive(Debug)]
pub struct LastOfType;

impl Pseudo for LastOfType {
    fn key(&self) -> &'static str {
        "last-of-type"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        let lasts = group_by_type(document, &children)
            .into_iter()
            .filter_map(|(_, members)| members.last().copied())
            .collect();
        Ok(in_child_order(&children, lasts))
    }
}

/// [§ 14.4.6 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
#[derive(Debug)]
pub struct OnlyOfType;

impl Pseudo for OnlyOfType {
    fn key(&self) -> &'static str {
        "only-of-type"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        let onlies = group_by_type(document, &children)
            .into_iter()
            .filter(|(_, members)| members.len() == 1)
            .flat_map(|(_, members)| members)
            .collect();
        Ok(in_child_order(&children, onlies))
    }
}

/// [§ 14.3.3 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
#[derive(Debug)]
pub struct NthOfType;

impl Pseudo for NthOfType {
    fn key(&self) -> &'static str {
        "nth-of-type"
    }

    fn is_function(&self) -> bool {
        true
    }

    fn process(&self, document: &Document, element: NodeId, part: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        nth_of_type(document, element, part, false)
    }
}

/// [§ 14.3.4 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
#[derive(Debug)]
pub struct NthLastOfType;

impl Pseudo for NthLastOfType {
    fn key(&self) -> &'static str {
        "nth-last-of-type"
    }

    fn is_function(&self) -> bool {
        true
    }

    fn process(&self, document: &Document, element: NodeId, part: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        nth_of_type(document, element, part, true)
    }
}

fn nth_of_type(
    document: &Document,
    element: NodeId,
    part: &SelectorPart,
    from_end: bool,
) -> Result<Vec<NodeId>, StyleError> {
    let children = document.element_children(element);
    if children.is_empty() {
        // Surface the same error nth-child reports.
        let _ = parse_nth(&part.args, 0)?;
    }
    let mut selected = Vec::new();
    for (_, mut members) in group_by_type(document, &children) {
        let (start, step) = parse_nth(&part.args, members.len())?;
        if from_end {
            members.reverse();
        }
        selected.extend(every_nth(&members, start, step));
    }
    Ok(in_child_order(&children, selected))
}

/// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
///
/// Children of the anchor that contain nothing but whitespace text.
#[derive(Debug)]
pub struct Empty;

impl Pseudo for Empty {
    fn key(&self) -> &'static str {
        "empty"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let children = children_or_error(document, element, self.key())?;
        Ok(children
            .into_iter()
            .filter(|&child| {
                document.children(child).iter().all(|&c| {
                    matches!(
                        document.get(c).map(|n| &n.node_type),
                        Some(NodeType::Text(t)) if t.trim().is_empty()
                    )
                })
            })
            .collect())
    }
}

/// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
///
/// Selects the document element when anchored on the document node.
#[derive(Debug)]
pub struct Root;

impl Pseudo for Root {
    fn key(&self) -> &'static str {
        "root"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, document: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        Ok(document
            .element_children(element)
            .into_iter()
            .filter(|&child| document.parent(child) == Some(NodeId::ROOT))
            .collect())
    }
}
