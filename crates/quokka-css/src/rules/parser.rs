//! Token-driven reading of selectors and declarations into the rule model.

use super::{ParseState, PropertyValue, Rule, SelectType, Selector, SelectorGroup, SelectorPart, StyleSheet};
use crate::grammar::{self, GrammarEvent};
use crate::lexer::{Token, TokenKind};

impl StyleSheet {
    /// Parse `css` and append its rulesets and custom properties.
    ///
    /// Parsing never fails. Malformed selectors become parts that match
    /// nothing; reading stops at a selector that never opens a block.
    pub fn parse(&mut self, css: &str) {
        let mut state = ParseState::ReadingTag;
        let mut group: Option<SelectorGroup> = None;

        for event in grammar::stylesheet_events(css) {
            tracing::trace!(?event, "grammar event");
            match event {
                GrammarEvent::QualifiedRule(tokens) => {
                    if state < ParseState::ReadingProperty {
                        let selector = read_selector(&mut state, &tokens);
                        group.get_or_insert_with(SelectorGroup::default).selectors.push(selector);
                    }
                }
                GrammarEvent::BeginRuleset(tokens) => {
                    let selector = read_selector(&mut state, &tokens);
                    group.get_or_insert_with(SelectorGroup::default).selectors.push(selector);
                    state = ParseState::ReadingProperty;
                }
                GrammarEvent::EndRuleset => {
                    state = ParseState::ReadingTag;
                    if let Some(finished) = group.take() {
                        self.groups.push(finished);
                    }
                }
                GrammarEvent::Declaration { property, values } => {
                    let sort = self.take_sort();
                    let rule = self.read_property(&mut state, &property, &values, sort);
                    group.get_or_insert_with(SelectorGroup::default).add_rule(rule);
                }
                GrammarEvent::CustomProperty { name, values } => {
                    let raw = values
                        .iter()
                        .filter(|t| !t.is_trivia())
                        .map(|t| t.text.clone())
                        .collect();
                    let _ = self.custom_vars.insert(name, raw);
                }
                GrammarEvent::Comment(_) | GrammarEvent::AtRule { .. } => {}
                GrammarEvent::Error(message) => {
                    tracing::debug!(%message, "stylesheet reading stopped");
                    break;
                }
            }
        }
        // A group whose block never opened is dropped.
    }

    /// Parse a declaration list, such as a `style` attribute, into a single
    /// selector-less group. The stylesheet itself is left untouched; its
    /// custom properties are used for `var()` substitution.
    #[must_use]
    pub fn parse_inline(&self, css: &str) -> SelectorGroup {
        let mut state = ParseState::ReadingProperty;
        let mut group = SelectorGroup::default();
        let mut sort = 0;
        for event in grammar::inline_events(css) {
            match event {
                GrammarEvent::Declaration { property, values } => {
                    group.add_rule(self.read_property(&mut state, &property, &values, sort));
                    sort += 1;
                }
                GrammarEvent::Error(message) => {
                    tracing::debug!(%message, "inline style reading stopped");
                    break;
                }
                other => tracing::trace!(event = ?other, "ignored in inline style"),
            }
        }
        group
    }

    fn take_sort(&mut self) -> usize {
        let sort = self.next_sort;
        self.next_sort += 1;
        sort
    }

    /// Build one rule from a declaration's value tokens.
    fn read_property(&self, state: &mut ParseState, property: &str, tokens: &[Token], sort: usize) -> Rule {
        *state = ParseState::ReadingProperty;
        let mut rule = Rule::new(property, sort);
        // Plain parentheses open inside a function's arguments.
        let mut nested = 0usize;
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::Function if token.value().eq_ignore_ascii_case("var") => {
                    let close = matching_close(tokens, i);
                    self.substitute_var(*state, &tokens[i + 1..close], &mut rule.values);
                    i = close + 1;
                    continue;
                }
                TokenKind::Function => {
                    *state = ParseState::ReadingPropertyFunction;
                    rule.values.push(PropertyValue::function(token.value()));
                }
                TokenKind::Comma | TokenKind::Whitespace | TokenKind::Comment => {}
                TokenKind::LeftParen if *state == ParseState::ReadingPropertyFunction => {
                    nested += 1;
                    push_value(*state, &mut rule.values, &token.text);
                }
                TokenKind::RightParen if nested > 0 => {
                    nested -= 1;
                    push_value(*state, &mut rule.values, &token.text);
                }
                TokenKind::RightParen => *state = ParseState::ReadingProperty,
                _ => push_value(*state, &mut rule.values, &token.text),
            }
            i += 1;
        }
        *state = ParseState::ReadingProperty;
        rule
    }

    /// Replace `var(--name[, fallback])` by the bound tokens, else by the
    /// fallback. Unresolved references stay behind for the `var` function.
    fn substitute_var(&self, state: ParseState, inner: &[Token], values: &mut Vec<PropertyValue>) {
        let mut parts = inner.splitn(2, |t| t.kind == TokenKind::Comma);
        let name = parts
            .next()
            .and_then(|head| head.iter().find(|t| !t.is_trivia()))
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let fallback: Vec<String> = parts
            .next()
            .map(|tail| {
                tail.iter()
                    .filter(|t| !t.is_trivia() && t.kind != TokenKind::Comma)
                    .map(|t| t.text.clone())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(bound) = self.custom_var(&name) {
            for text in bound {
                push_value(state, values, text);
            }
        } else if !fallback.is_empty() {
            for text in &fallback {
                push_value(state, values, text);
            }
        } else if state == ParseState::ReadingPropertyFunction {
            push_value(state, values, &format!("var({name})"));
        } else {
            let mut unresolved = PropertyValue::function("var");
            unresolved.push_arg(name);
            values.push(unresolved);
        }
    }
}

/// Inside a function the text is the last value's next argument; otherwise
/// it is a value of its own.
fn push_value(state: ParseState, values: &mut Vec<PropertyValue>, text: &str) {
    match values.last_mut() {
        Some(last) if state == ParseState::ReadingPropertyFunction => last.push_arg(text),
        _ => values.push(PropertyValue::new(text)),
    }
}

/// Index of the token closing the block opened at `open`.
fn matching_close(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.opens_block() {
            depth += 1;
        } else if token.closes_block() {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    tokens.len().saturating_sub(1)
}

/// Read one comma-separated selector.
fn read_selector(state: &mut ParseState, tokens: &[Token]) -> Selector {
    *state = ParseState::ReadingTag;
    let mut selector = Selector::default();
    for token in tokens {
        if let (ParseState::ReadingPseudoFunction, Some(part)) = (*state, selector.parts.last_mut()) {
            match token.kind {
                TokenKind::RightParen => *state = ParseState::ReadingPseudo,
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::Comma => {}
                TokenKind::Ident
                | TokenKind::Number
                | TokenKind::Dimension
                | TokenKind::Percentage
                | TokenKind::Delim => {
                    let at_start = part.args.is_empty();
                    part.args.extend(split_nth_token(&token.text, at_start));
                }
                _ => part.args.push(token.value().to_string()),
            }
            continue;
        }

        match token.kind {
            TokenKind::Ident | TokenKind::Number | TokenKind::String => {
                selector.parts.push(SelectorPart::new(token.value(), state.select_type()));
                *state = ParseState::ReadingTag;
            }
            TokenKind::Hash => {
                selector.parts.push(SelectorPart::new(token.value(), SelectType::Id));
                *state = ParseState::ReadingTag;
            }
            TokenKind::Colon => *state = ParseState::ReadingPseudo,
            TokenKind::Function => {
                *state = ParseState::ReadingPseudoFunction;
                selector
                    .parts
                    .push(SelectorPart::new(token.value(), SelectType::PseudoFunction));
            }
            TokenKind::RightParen => *state = ParseState::ReadingPseudo,
            // A combinator carries over the whitespace around it.
            TokenKind::Whitespace if !state.is_combinator() => *state = ParseState::ReadingTag,
            TokenKind::Delim => match token.text.as_str() {
                "#" => *state = ParseState::ReadingId,
                "." => *state = ParseState::ReadingClass,
                ">" => *state = ParseState::ReadingChild,
                "~" => *state = ParseState::ReadingSibling,
                "+" => *state = ParseState::ReadingAdjacent,
                ":" => *state = ParseState::ReadingPseudo,
                _ => {}
            },
            _ => {}
        }
    }
    selector
}

/// Split an argument token of a pseudo-class function into evaluator-sized
/// pieces: `2n` → `2`, `n`; `n-1` → `n`, `-`, `1`; `+1` → `+`, `1`.
///
/// A sign at the very start of the argument list stays on its number, so a
/// lone `-5` remains one token.
fn split_nth_token(text: &str, at_start: bool) -> Vec<String> {
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_is_number = false;
    for (i, c) in text.char_indices() {
        let is_number_char = c.is_ascii_digit() || c == '.';
        if matches!(c, '+' | '-' | '*' | '/') {
            let signs_number = at_start
                && i == 0
                && text[1..].starts_with(|n: char| n.is_ascii_digit() || n == '.');
            if signs_number {
                current.push(c);
                current_is_number = true;
                continue;
            }
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            pieces.push(c.to_string());
            continue;
        }
        if !current.is_empty() && current_is_number != is_number_char {
            pieces.push(std::mem::take(&mut current));
        }
        current_is_number = is_number_char;
        current.push(c);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
