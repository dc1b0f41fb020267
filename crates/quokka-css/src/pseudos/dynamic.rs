//! User-action pseudo-classes.
//!
//! [Selectors Level 4 § 9](https://www.w3.org/TR/selectors-4/#useraction-pseudos)
//!
//! These do not filter anything at cascade time. They keep the anchor and
//! move the rules onto a pointer-event layer, which the cascade turns into
//! handlers on the element.

use quokka_dom::{Document, NodeId};

use super::{Pseudo, retag};
use crate::error::StyleError;
use crate::rules::{Rule, RuleInvoke, SelectorPart};

/// [§ 9.2 :hover](https://www.w3.org/TR/selectors-4/#the-hover-pseudo)
#[derive(Debug)]
pub struct Hover;

impl Pseudo for Hover {
    fn key(&self) -> &'static str {
        "hover"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, _: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        Ok(vec![element])
    }

    fn alter_rules(&self, rules: Vec<Rule>) -> Vec<Rule> {
        retag(rules, RuleInvoke::Hover)
    }
}

/// [§ 9.3 :active](https://www.w3.org/TR/selectors-4/#the-active-pseudo)
#[derive(Debug)]
pub struct Active;

impl Pseudo for Active {
    fn key(&self) -> &'static str {
        "active"
    }

    fn is_function(&self) -> bool {
        false
    }

    fn process(&self, _: &Document, element: NodeId, _: &SelectorPart) -> Result<Vec<NodeId>, StyleError> {
        Ok(vec![element])
    }

    fn alter_rules(&self, rules: Vec<Rule>) -> Vec<Rule> {
        retag(rules, RuleInvoke::Active)
    }
}
