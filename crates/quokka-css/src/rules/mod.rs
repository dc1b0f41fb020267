//! The rule model a stylesheet is parsed into.
//!
//! A [`StyleSheet`] is an ordered list of [`SelectorGroup`]s, one per
//! ruleset, plus the custom properties (`--name: value`) seen while parsing.
//! Each group pairs the selectors of a selector list with the declarations
//! of its block. Nothing here knows about documents; matching lives in
//! [`crate::cascade`].

mod parser;

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// How a [`SelectorPart`] is matched, from the character that introduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SelectType {
    /// `div`
    Tag,
    /// `#menu`
    Id,
    /// `.entry`
    Class,
    /// `> span`
    Child,
    /// `~ span`
    Sibling,
    /// `+ span`
    Adjacent,
    /// `:hover`
    Pseudo,
    /// `:nth-child(2n+1)`
    PseudoFunction,
}

/// Cursor of the token-driven parser. It decides what the next token means.
///
/// The selector states are ordered before the property states, so
/// `state < ParseState::ReadingProperty` means "inside a selector".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ParseState {
    /// A bare identifier is a tag name.
    #[default]
    ReadingTag,
    /// After `#`.
    ReadingId,
    /// After `.`.
    ReadingClass,
    /// After `>`.
    ReadingChild,
    /// After `~`.
    ReadingSibling,
    /// After `+`.
    ReadingAdjacent,
    /// After `:`.
    ReadingPseudo,
    /// Inside the arguments of a pseudo-class function.
    ReadingPseudoFunction,
    /// Inside a declaration block.
    ReadingProperty,
    /// Inside the arguments of a value function such as `calc(`.
    ReadingPropertyFunction,
}

impl ParseState {
    /// The select type a part read in this state gets. Property states have
    /// no select type of their own and fall back to [`SelectType::Tag`].
    #[must_use]
    pub const fn select_type(self) -> SelectType {
        match self {
            Self::ReadingId => SelectType::Id,
            Self::ReadingClass => SelectType::Class,
            Self::ReadingChild => SelectType::Child,
            Self::ReadingSibling => SelectType::Sibling,
            Self::ReadingAdjacent => SelectType::Adjacent,
            Self::ReadingPseudo => SelectType::Pseudo,
            Self::ReadingPseudoFunction => SelectType::PseudoFunction,
            Self::ReadingTag | Self::ReadingProperty | Self::ReadingPropertyFunction => {
                SelectType::Tag
            }
        }
    }

    /// After `>`, `~` or `+`.
    #[must_use]
    pub const fn is_combinator(self) -> bool {
        matches!(self, Self::ReadingChild | Self::ReadingSibling | Self::ReadingAdjacent)
    }
}

/// One simple selector within a [`Selector`] chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorPart {
    /// Identifier text with its sigil removed (`menu` for `#menu`).
    pub name: String,
    /// How the part is matched.
    pub select_type: SelectType,
    /// Argument tokens of a pseudo-class function, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl SelectorPart {
    /// A part without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, select_type: SelectType) -> Self {
        Self {
            name: name.into(),
            select_type,
            args: Vec::new(),
        }
    }
}

/// A chain of parts read from one comma-separated selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// The parts in source order.
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// The first part, which matching anchors on.
    #[must_use]
    pub fn anchor(&self) -> Option<&SelectorPart> {
        self.parts.first()
    }

    /// Whether the selector has exactly one part and is looked up directly.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.parts.len() == 1
    }
}

/// One value of a declaration: a bare token, or a function with arguments.
///
/// `args` is non-empty exactly when the value is a function call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyValue {
    /// The token text, or the function name without `(`.
    pub text: String,
    /// `text` read as a number, ignoring a unit suffix.
    pub num: Option<f32>,
    /// Raw argument token texts of a function value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// `args` read as numbers, index for index.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arg_nums: Vec<Option<f32>>,
}

impl PropertyValue {
    /// A bare value.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            num: leading_number(&text),
            text,
            args: Vec::new(),
            arg_nums: Vec::new(),
        }
    }

    /// A function value whose arguments are pushed with [`PropertyValue::push_arg`].
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            ..Self::default()
        }
    }

    /// Append one argument to a function value.
    pub fn push_arg(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        self.arg_nums.push(leading_number(&arg));
        self.args.push(arg);
    }

    /// Whether this value is a function call.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        !self.args.is_empty()
    }
}

/// `24px` → 24, `-1.5em` → -1.5, `50%` → 50, `red` → `None`.
fn leading_number(text: &str) -> Option<f32> {
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && matches!(c, '+' | '-'))))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}

/// When a rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RuleInvoke {
    /// During the cascade pass.
    #[default]
    Immediate,
    /// When the pointer enters the element; reverted when it exits.
    Hover,
    /// When the pointer is pressed on the element; reverted on release.
    Active,
}

/// One declaration: a property and its values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Lower-cased property name.
    pub property: String,
    /// The declared values in source order.
    pub values: Vec<PropertyValue>,
    /// When the rule runs.
    pub invocation: RuleInvoke,
    /// Declaration order within the stylesheet that produced it.
    pub sort: usize,
    /// Applied once by the cascade and never re-run by event handlers.
    pub self_destruct: bool,
}

impl Rule {
    /// An immediate rule without values.
    #[must_use]
    pub fn new(property: impl Into<String>, sort: usize) -> Self {
        Self {
            property: property.into(),
            values: Vec::new(),
            invocation: RuleInvoke::Immediate,
            sort,
            self_destruct: false,
        }
    }
}

/// The selectors of one selector list and the rules of its block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectorGroup {
    /// Comma-separated selectors, in source order.
    pub selectors: Vec<Selector>,
    /// Declarations, in source order.
    pub rules: Vec<Rule>,
}

impl SelectorGroup {
    /// Append a rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }
}

/// A parsed stylesheet. [`StyleSheet::parse`] may be called repeatedly to
/// layer further stylesheets on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleSheet {
    /// Rulesets in parse order.
    pub groups: Vec<SelectorGroup>,
    /// Custom property bindings as raw token texts. A later binding of the
    /// same name replaces an earlier one.
    pub custom_vars: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    next_sort: usize,
}

impl StyleSheet {
    /// An empty stylesheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw tokens bound to a custom property.
    #[must_use]
    pub fn custom_var(&self, name: &str) -> Option<&[String]> {
        self.custom_vars.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_numbers() {
        assert_eq!(PropertyValue::new("24px").num, Some(24.0));
        assert_eq!(PropertyValue::new("-1.5em").num, Some(-1.5));
        assert_eq!(PropertyValue::new("red").num, None);
    }

    #[test]
    fn test_function_value() {
        let mut value = PropertyValue::function("calc");
        assert!(!value.is_function());
        value.push_arg("100%");
        value.push_arg("-");
        assert!(value.is_function());
        assert_eq!(value.arg_nums, vec![Some(100.0), None]);
    }

    #[test]
    fn test_select_type_names() {
        assert_eq!(SelectType::PseudoFunction.to_string(), "pseudo-function");
        assert_eq!("class".parse::<SelectType>(), Ok(SelectType::Class));
        assert_eq!(RuleInvoke::Hover.to_string(), "hover");
    }

    #[test]
    fn test_state_ordering() {
        assert!(ParseState::ReadingPseudoFunction < ParseState::ReadingProperty);
        assert_eq!(ParseState::ReadingClass.select_type(), SelectType::Class);
    }
}
