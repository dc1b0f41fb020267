//! Flat token stream over the `cssparser` tokenizer.
//!
//! [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization)
//! tokenization is delegated to `cssparser`. Its parser hands out blocks
//! (`calc(`, `(`, `[`, `{`) as single tokens whose contents must be entered
//! explicitly; the stylesheet reader instead wants one linear stream in which
//! a function start is followed by its arguments and a `)`. This module
//! performs that flattening and keeps the exact source text of every token.

use cssparser::{ParseError, Parser, ParserInput, Token as CssToken};
use serde::Serialize;

/// The lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// `<ident-token>`, e.g. `span`, `--menu-height`.
    Ident,
    /// `<number-token>`, e.g. `2`, `-5`, `+1`.
    Number,
    /// `<percentage-token>`, e.g. `50%`.
    Percentage,
    /// `<dimension-token>`, e.g. `24px`, `2n`.
    Dimension,
    /// `<hash-token>`, e.g. `#menu`.
    Hash,
    /// `<string-token>`, quotes included in the text.
    String,
    /// `<url-token>`.
    Url,
    /// `<function-token>`; the text ends with `(`.
    Function,
    /// `<at-keyword-token>`, e.g. `@media`.
    AtKeyword,
    /// `<delim-token>`, a single code point such as `.`, `>` or `+`.
    Delim,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// One or more whitespace code points.
    Whitespace,
    /// A `/* ... */` comment.
    Comment,
    /// `(` opening a plain parenthesis block.
    LeftParen,
    /// `)` closing a function or parenthesis block.
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// Anything the style engine has no use for (`~=`, `<!--`, bad strings, ...).
    Other,
}

/// One lexical unit: its kind and the exact source text it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The token's category.
    pub kind: TokenKind,
    /// The raw source text.
    pub text: String,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Whitespace and comments carry no meaning for selectors or values.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Whether this token opens a block that a later `)`, `]` or `}` closes.
    #[must_use]
    pub const fn opens_block(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Function | TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
        )
    }

    /// Whether this token closes a block.
    #[must_use]
    pub const fn closes_block(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
        )
    }

    /// The token's value with its syntax stripped: a function's name without
    /// `(`, a hash without `#`, a string without its quotes.
    #[must_use]
    pub fn value(&self) -> &str {
        match self.kind {
            TokenKind::Function => self.text.strip_suffix('(').unwrap_or(&self.text),
            TokenKind::Hash => self.text.strip_prefix('#').unwrap_or(&self.text),
            TokenKind::AtKeyword => self.text.strip_prefix('@').unwrap_or(&self.text),
            TokenKind::String => strip_quotes(&self.text),
            _ => &self.text,
        }
    }
}

fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    text
}

/// Tokenize `css` into a flat, balanced stream.
///
/// Every block opener is followed by the block's contents and a synthesized
/// closing token, also when the source never closes the block. Blocks nested
/// deeper than [`MAX_NESTING`] keep their opener and closer but lose their
/// contents. Tokenizing never fails.
#[must_use]
pub fn tokenize(css: &str) -> Vec<Token> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut out = Vec::new();
    if let Err(err) = flatten(&mut parser, &mut out, 0) {
        tracing::debug!(?err, "token stream ended early");
    }
    out
}

/// Deepest block nesting [`tokenize`] descends into.
pub const MAX_NESTING: usize = 64;

/// The closing token synthesized after a block's contents.
const fn closer_for(kind: TokenKind) -> Option<(TokenKind, &'static str)> {
    match kind {
        TokenKind::Function | TokenKind::LeftParen => Some((TokenKind::RightParen, ")")),
        TokenKind::LeftBracket => Some((TokenKind::RightBracket, "]")),
        TokenKind::LeftBrace => Some((TokenKind::RightBrace, "}")),
        _ => None,
    }
}

const fn classify(token: &CssToken<'_>) -> TokenKind {
    match token {
        CssToken::Ident(_) => TokenKind::Ident,
        CssToken::Number { .. } => TokenKind::Number,
        CssToken::Percentage { .. } => TokenKind::Percentage,
        CssToken::Dimension { .. } => TokenKind::Dimension,
        CssToken::Hash(_) | CssToken::IDHash(_) => TokenKind::Hash,
        CssToken::QuotedString(_) => TokenKind::String,
        CssToken::UnquotedUrl(_) => TokenKind::Url,
        CssToken::Function(_) => TokenKind::Function,
        CssToken::AtKeyword(_) => TokenKind::AtKeyword,
        CssToken::Delim(_) => TokenKind::Delim,
        CssToken::Colon => TokenKind::Colon,
        CssToken::Semicolon => TokenKind::Semicolon,
        CssToken::Comma => TokenKind::Comma,
        CssToken::WhiteSpace(_) => TokenKind::Whitespace,
        CssToken::Comment(_) => TokenKind::Comment,
        CssToken::ParenthesisBlock => TokenKind::LeftParen,
        CssToken::CloseParenthesis => TokenKind::RightParen,
        CssToken::SquareBracketBlock => TokenKind::LeftBracket,
        CssToken::CloseSquareBracket => TokenKind::RightBracket,
        CssToken::CurlyBracketBlock => TokenKind::LeftBrace,
        CssToken::CloseCurlyBracket => TokenKind::RightBrace,
        _ => TokenKind::Other,
    }
}

fn flatten<'i>(input: &mut Parser<'i, '_>, out: &mut Vec<Token>, depth: usize) -> Result<(), ParseError<'i, ()>> {
    loop {
        let start = input.position();
        let kind = match input.next_including_whitespace_and_comments() {
            Ok(token) => classify(token),
            // End of input, or end of the enclosing block.
            Err(_) => return Ok(()),
        };
        out.push(Token::new(kind, input.slice_from(start)));

        if let Some((close_kind, close_text)) = closer_for(kind) {
            if depth < MAX_NESTING {
                input.parse_nested_block(|nested| flatten(nested, out, depth + 1))?;
            } else {
                // The parser consumes the rest of the block without recursing.
                tracing::debug!(depth, "block nested too deep, contents dropped");
                input.parse_nested_block(|_| Ok::<(), ParseError<'i, ()>>(()))?;
            }
            out.push(Token::new(close_kind, close_text));
        }
    }
}
