//! Stylesheet parsing, selector matching and cascade for retained-mode UI
//! trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizing** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   through `cssparser`, flattened into one token stream
//!
//! - **Stylesheet reading** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Rulesets, selector lists, declarations, custom properties
//!   - `var()` substitution while reading
//!   - Inline `style` attributes
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class and ID selectors and combinator chains anchored on the first part
//!   - Structural pseudo-classes (`:first-child`, `:nth-child()`, `:only-of-type`, ...)
//!   - `:hover` and `:active`, applied through pointer-event handlers
//!
//! - **Value functions** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - `calc()`, `min()`, `max()` over px, %, em, ex and physical units
//!   - `rgb()`, `rgba()`, `hsl()`, `hsla()`, `var()`, `attr()`
//!
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Declaration order decides, a later rule replaces an earlier one
//!   - Inline styles applied last
//!
//! # Not Implemented
//!
//! - Specificity
//! - Inheritance and computed values; applying values is the host's job
//! - At-rules (parsed and skipped)
//!
//! # Example
//!
//! ```
//! use quokka_css::{RecordingHost, StyleSheet, apply};
//! use quokka_dom::{Document, ElementData, NodeId};
//!
//! let mut document = Document::new();
//! let panel = document.append_element(NodeId::ROOT, ElementData::new("div").with_attr("class", "panel"));
//!
//! let mut sheet = StyleSheet::new();
//! sheet.parse(".panel { color: red; }");
//!
//! let mut host = RecordingHost::new();
//! let problems = apply(&sheet, &document, &mut host);
//! assert!(problems.is_empty());
//! assert_eq!(host.current_value(panel, "color").map(|v| v[0].text.as_str()), Some("red"));
//! ```

/// Cascade and dispatch per [CSS Cascading Level 4 § 6](https://www.w3.org/TR/css-cascade-4/#cascading).
pub mod cascade;
/// Error types.
pub mod error;
/// Arithmetic and `An+B` evaluation.
pub mod expr;
/// Value functions per [CSS Values Level 4 § 2.5](https://www.w3.org/TR/css-values-4/#functional-notations).
pub mod functions;
/// Grammar events per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod grammar;
/// Host interface: property application, metrics and pointer events.
pub mod host;
/// Token stream per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod lexer;
/// Pseudo-classes per [Selectors Level 4 § 3.6](https://www.w3.org/TR/selectors-4/#pseudo-classes).
pub mod pseudos;
/// The rule model and the stylesheet reader.
pub mod rules;
/// Lengths per [CSS Values Level 4 § 6](https://www.w3.org/TR/css-values-4/#lengths).
pub mod units;

// Re-exports for convenience
pub use cascade::{CssMap, apply, collect_rules};
pub use error::{EvalError, StyleError};
pub use expr::{evaluate, parse_nth, tokenize_expression};
pub use host::{AppliedProperty, ElementMetrics, PointerEvent, RecordingHost, RuleHandler, StyleHost};
pub use rules::{
    ParseState, PropertyValue, Rule, RuleInvoke, SelectType, Selector, SelectorGroup, SelectorPart,
    StyleSheet,
};
