//! Pseudo-classes, looked up by name during matching.
//!
//! [Selectors Level 4 § 3.6](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//!
//! A pseudo-class is scoped to an anchor element (the element matched by
//! the first part of the selector) and answers with the elements it selects.
//! Structural pseudo-classes select among the anchor's element children;
//! dynamic ones select the anchor itself and retag the rules so they only
//! run on pointer events.
//!
//! Every name of the catalogue is registered. Names without behavior are
//! placeholders that fail with [`StyleError::PseudoNotImplemented`], so a
//! selector using them matches nothing.

mod dynamic;
mod structural;

use std::collections::HashMap;
use std::sync::LazyLock;

use quokka_common::warning::warn_once;
use quokka_dom::{Document, NodeId};

use crate::error::StyleError;
use crate::rules::{Rule, RuleInvoke, SelectorPart};

pub use dynamic::{Active, Hover};
pub use structural::{
    Empty, FirstChild, FirstOfType, LastChild, LastOfType, NthChild, NthLastChild, NthLastOfType,
    NthOfType, OnlyChild, OnlyOfType, Root,
};

/// One pseudo-class.
pub trait Pseudo: Sync {
    /// Lower-case name without `:`.
    fn key(&self) -> &'static str;

    /// Whether the pseudo-class takes arguments, as in `:nth-child(2n)`.
    fn is_function(&self) -> bool;

    /// The elements selected relative to `element`.
    ///
    /// # Errors
    ///
    /// Structural pseudo-classes fail when the anchor has no children or
    /// their arguments do not evaluate; placeholders always fail.
    fn process(
        &self,
        document: &Document,
        element: NodeId,
        part: &SelectorPart,
    ) -> Result<Vec<NodeId>, StyleError>;

    /// Rewrite the rules of a selector that uses this pseudo-class.
    fn alter_rules(&self, rules: Vec<Rule>) -> Vec<Rule> {
        rules
    }
}

/// A catalogue entry with no behavior yet.
#[derive(Debug)]
pub struct Placeholder {
    key: &'static str,
    is_function: bool,
}

impl Placeholder {
    const fn new(key: &'static str) -> Self {
        Self {
            key,
            is_function: false,
        }
    }

    const fn function(key: &'static str) -> Self {
        Self {
            key,
            is_function: true,
        }
    }
}

impl Pseudo for Placeholder {
    fn key(&self) -> &'static str {
        self.key
    }

    fn is_function(&self) -> bool {
        self.is_function
    }

    fn process(&self, _: &Document, _: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        let _ = warn_once("pseudo", &format!("':{}' is not implemented", self.key));
        Err(StyleError::PseudoNotImplemented {
            name: self.key.to_string(),
        })
    }
}

static CATALOGUE: &[&dyn Pseudo] = &[
    &Active,
    &Placeholder::new("any-link"),
    &Placeholder::new("autofill"),
    &Placeholder::new("blank"),
    &Placeholder::new("checked"),
    &Placeholder::new("current"),
    &Placeholder::new("default"),
    &Placeholder::new("defined"),
    &Placeholder::function("dir"),
    &Placeholder::new("disabled"),
    &Empty,
    &Placeholder::new("enabled"),
    &Placeholder::new("first"),
    &FirstChild,
    &FirstOfType,
    &Placeholder::new("fullscreen"),
    &Placeholder::new("future"),
    &Placeholder::new("focus"),
    &Placeholder::new("focus-visible"),
    &Placeholder::new("focus-within"),
    &Placeholder::function("has"),
    &Placeholder::function("host"),
    &Placeholder::function("host-context"),
    &Hover,
    &Placeholder::new("indeterminate"),
    &Placeholder::new("in-range"),
    &Placeholder::new("invalid"),
    &Placeholder::function("is"),
    &Placeholder::new("lang"),
    &LastChild,
    &LastOfType,
    &Placeholder::new("left"),
    &Placeholder::new("link"),
    &Placeholder::new("local-link"),
    &Placeholder::new("modal"),
    &Placeholder::new("not"),
    &NthChild,
    &Placeholder::function("nth-col"),
    &NthLastChild,
    &Placeholder::function("nth-last-col"),
    &NthLastOfType,
    &NthOfType,
    &OnlyChild,
    &OnlyOfType,
    &Placeholder::new("optional"),
    &Placeholder::new("out-of-range"),
    &Placeholder::new("past"),
    &Placeholder::new("picture-in-picture"),
    &Placeholder::new("placeholder-shown"),
    &Placeholder::new("paused"),
    &Placeholder::new("playing"),
    &Placeholder::new("read-only"),
    &Placeholder::new("read-write"),
    &Placeholder::new("required"),
    &Placeholder::new("right"),
    &Root,
    &Placeholder::new("scope"),
    &Placeholder::new("state"),
    &Placeholder::new("target"),
    &Placeholder::new("target-within"),
    &Placeholder::new("user-invalid"),
    &Placeholder::new("valid"),
    &Placeholder::new("visited"),
    &Placeholder::new("where"),
];

static REGISTRY: LazyLock<HashMap<&'static str, &'static dyn Pseudo>> =
    LazyLock::new(|| catalogue().map(|p| (p.key(), p)).collect());

/// Find a pseudo-class by name, ignoring ASCII case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static dyn Pseudo> {
    REGISTRY.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Every registered pseudo-class, in catalogue order.
pub fn catalogue() -> impl Iterator<Item = &'static dyn Pseudo> {
    CATALOGUE.iter().copied()
}

/// Rewrite `Immediate` rules to `invocation`.
pub(crate) fn retag(rules: Vec<Rule>, invocation: RuleInvoke) -> Vec<Rule> {
    rules
        .into_iter()
        .map(|mut rule| {
            if rule.invocation == RuleInvoke::Immediate {
                rule.invocation = invocation;
            }
            rule
        })
        .collect()
}
