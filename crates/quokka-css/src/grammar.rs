//! Grammar events over the flat token stream.
//!
//! [CSS Syntax Level 3 § 5](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! The stylesheet reader does not want a syntax tree. It wants to be told
//! "here is a selector", "a ruleset starts", "here is a declaration", "the
//! ruleset ended", and to interpret the raw tokens of each itself. This
//! module walks the token stream with the consume-a-list-of-rules /
//! consume-a-qualified-rule / consume-a-list-of-declarations structure of
//! CSS Syntax and emits those events in source order.

use crate::lexer::{Token, TokenKind, tokenize};

/// One step of the stylesheet grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarEvent {
    /// A top-level comment.
    Comment(String),
    /// An at-rule. Its block, if any, is skipped.
    AtRule {
        /// The at-keyword without `@`.
        name: String,
        /// Tokens between the keyword and `;` or `{`.
        prelude: Vec<Token>,
    },
    /// A selector of a selector list that is followed by another selector.
    QualifiedRule(Vec<Token>),
    /// The last selector of a selector list; the declaration block starts.
    BeginRuleset(Vec<Token>),
    /// `property: values` inside a block or an inline style.
    Declaration {
        /// Lower-cased property name.
        property: String,
        /// Value tokens with surrounding whitespace and `!important` removed.
        values: Vec<Token>,
    },
    /// `--name: values`.
    CustomProperty {
        /// The property name as written, including `--`.
        name: String,
        /// Value tokens with surrounding whitespace removed.
        values: Vec<Token>,
    },
    /// The declaration block closed.
    EndRuleset,
    /// The input could not be read further.
    Error(String),
}

/// Events for a full stylesheet.
#[must_use]
pub fn stylesheet_events(css: &str) -> Vec<GrammarEvent> {
    let mut reader = GrammarReader::new(tokenize(css));
    reader.consume_list_of_rules();
    reader.events
}

/// Events for a declaration list such as a `style` attribute.
#[must_use]
pub fn inline_events(css: &str) -> Vec<GrammarEvent> {
    let mut reader = GrammarReader::new(tokenize(css));
    reader.consume_list_of_declarations(false);
    reader.events
}

struct GrammarReader {
    tokens: Vec<Token>,
    position: usize,
    events: Vec<GrammarEvent>,
}

impl GrammarReader {
    const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            events: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Move the current token into `out`. A block opener brings its whole
    /// block along, closing token included.
    fn take_component(&mut self, out: &mut Vec<Token>) {
        let mut depth = 0usize;
        while let Some(token) = self.tokens.get(self.position) {
            if token.opens_block() {
                depth += 1;
            } else if token.closes_block() {
                depth = depth.saturating_sub(1);
            }
            out.push(token.clone());
            self.position += 1;
            if depth == 0 {
                break;
            }
        }
    }

    /// Skip the current token, and its block if it opens one.
    fn skip_component(&mut self) {
        let mut discard = Vec::new();
        self.take_component(&mut discard);
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_list_of_rules(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Whitespace | TokenKind::Other | TokenKind::Semicolon => self.advance(),
                TokenKind::Comment => {
                    let text = token.text.clone();
                    self.events.push(GrammarEvent::Comment(text));
                    self.advance();
                }
                TokenKind::AtKeyword => self.consume_at_rule(),
                // Stray closers left over from malformed input.
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket => {
                    self.advance();
                }
                _ => {
                    if !self.consume_qualified_rule() {
                        return;
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) {
        let name = self.peek().map(|t| t.value().to_string()).unwrap_or_default();
        self.advance();

        let mut prelude = Vec::new();
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokenKind::Semicolon) => {
                    self.advance();
                    break;
                }
                Some(TokenKind::LeftBrace) => {
                    self.skip_component();
                    break;
                }
                Some(_) => self.take_component(&mut prelude),
            }
        }
        tracing::trace!(%name, "at-rule");
        self.events.push(GrammarEvent::AtRule {
            name,
            prelude: trim_trivia(prelude),
        });
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Returns `false` when the input ended before a block was found.
    fn consume_qualified_rule(&mut self) -> bool {
        let mut prelude = Vec::new();
        loop {
            match self.peek_kind() {
                None => {
                    self.events.push(GrammarEvent::Error(
                        "selector without a declaration block".to_string(),
                    ));
                    return false;
                }
                Some(TokenKind::LeftBrace) => break,
                Some(_) => self.take_component(&mut prelude),
            }
        }

        // [Selectors Level 4 § 5.1](https://www.w3.org/TR/selectors-4/#selector-list)
        // "A selector list is a comma-separated list of selectors"
        let mut selectors = split_on_commas(prelude);
        let last = selectors.pop().unwrap_or_default();
        for selector in selectors {
            self.events.push(GrammarEvent::QualifiedRule(selector));
        }
        self.events.push(GrammarEvent::BeginRuleset(last));

        self.advance(); // {
        self.consume_list_of_declarations(true);
        if self.peek_kind() == Some(TokenKind::RightBrace) {
            self.advance();
        }
        self.events.push(GrammarEvent::EndRuleset);
        true
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Inside a block, stops in front of the closing `}`.
    fn consume_list_of_declarations(&mut self, in_block: bool) {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::RightBrace if in_block => return,
                TokenKind::Whitespace | TokenKind::Semicolon => self.advance(),
                TokenKind::Comment => {
                    let text = token.text.clone();
                    self.events.push(GrammarEvent::Comment(text));
                    self.advance();
                }
                TokenKind::AtKeyword => self.consume_at_rule(),
                TokenKind::Ident => self.consume_declaration(in_block),
                _ => {
                    // "This is a parse error. ... consume a component value and
                    // throw away the returned value" until the next `;`.
                    let _ = self.collect_until_declaration_end(in_block);
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self, in_block: bool) {
        let name = self.peek().map(|t| t.text.clone()).unwrap_or_default();
        self.advance();
        while self.peek().is_some_and(Token::is_trivia) {
            self.advance();
        }
        if self.peek_kind() != Some(TokenKind::Colon) {
            tracing::trace!(%name, "declaration without ':' dropped");
            let _ = self.collect_until_declaration_end(in_block);
            return;
        }
        self.advance(); // :

        let values = trim_trivia(self.collect_until_declaration_end(in_block));
        if name.starts_with("--") {
            self.events.push(GrammarEvent::CustomProperty { name, values });
        } else {
            self.events.push(GrammarEvent::Declaration {
                property: name.to_ascii_lowercase(),
                values: strip_important(values),
            });
        }
    }

    /// Collect components up to (and consuming) the next `;`, or up to the
    /// block's closing `}` which is left in place.
    fn collect_until_declaration_end(&mut self, in_block: bool) -> Vec<Token> {
        let mut out = Vec::new();
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokenKind::Semicolon) => {
                    self.advance();
                    break;
                }
                Some(TokenKind::RightBrace) if in_block => break,
                Some(_) => self.take_component(&mut out),
            }
        }
        out
    }
}

/// Split a selector list on top-level commas, trimming whitespace around each selector.
fn split_on_commas(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut selectors = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for token in tokens {
        if token.opens_block() {
            depth += 1;
        } else if token.closes_block() {
            depth = depth.saturating_sub(1);
        }
        if depth == 0 && token.kind == TokenKind::Comma {
            selectors.push(trim_trivia(std::mem::take(&mut current)));
        } else {
            current.push(token);
        }
    }
    selectors.push(trim_trivia(current));
    selectors
}

fn trim_trivia(mut tokens: Vec<Token>) -> Vec<Token> {
    while tokens.last().is_some_and(Token::is_trivia) {
        let _ = tokens.pop();
    }
    let start = tokens
        .iter()
        .position(|t| !t.is_trivia())
        .unwrap_or(tokens.len());
    let _ = tokens.drain(..start);
    tokens
}

/// Remove a trailing `!important`. The engine has no importance layer, so
/// the flag itself is dropped.
fn strip_important(tokens: Vec<Token>) -> Vec<Token> {
    let significant: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_trivia())
        .map(|(i, _)| i)
        .collect();
    if let [.., bang, word] = significant.as_slice() {
        let is_bang = tokens[*bang].kind == TokenKind::Delim && tokens[*bang].text == "!";
        let is_important = tokens[*word].kind == TokenKind::Ident
            && tokens[*word].text.eq_ignore_ascii_case("important");
        if is_bang && is_important {
            let mut kept = tokens;
            kept.truncate(*bang);
            return trim_trivia(kept);
        }
    }
    tokens
}
