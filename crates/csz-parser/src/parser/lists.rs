//! Generic separated-list driver.
//!
//! Every comma-separated construct (type arguments, parameters, arguments,
//! enum members, variable declarators, initializer elements, ...) runs
//! through `parse_separated_list`. The driver owns the recovery policy so the
//! individual grammar productions do not repeat it.

use csz_common::diagnostics::diagnostic_codes;
use csz_scanner::SyntaxKind;

use super::arena::{ChildList, GreenElement, NodeIndex};
use super::state::ParserState;

/// Per-construct list policy.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ListOptions {
    pub separator: SyntaxKind,
    /// Trailing separators are legal (initializers, enum bodies).
    pub allow_trailing: bool,
    /// An empty list is itself an error (base lists, orderby clauses).
    pub require_one: bool,
    /// A common wrong separator to tolerate with a diagnostic, e.g. `;`
    /// between enum members.
    pub wrong_separator: Option<SyntaxKind>,
}

impl ListOptions {
    pub fn comma() -> ListOptions {
        ListOptions {
            separator: SyntaxKind::CommaToken,
            allow_trailing: false,
            require_one: false,
            wrong_separator: None,
        }
    }

    pub fn comma_trailing() -> ListOptions {
        ListOptions {
            allow_trailing: true,
            ..ListOptions::comma()
        }
    }

    pub fn comma_required() -> ListOptions {
        ListOptions {
            require_one: true,
            ..ListOptions::comma()
        }
    }

    pub fn with_wrong_separator(self, wrong: SyntaxKind) -> ListOptions {
        ListOptions {
            wrong_separator: Some(wrong),
            ..self
        }
    }
}

impl ParserState {
    /// Parse `element (separator element)*` into `children`.
    ///
    /// The loop guarantees progress: any iteration that consumes no tokens
    /// terminates the list. Unparsable tokens between elements are skipped as
    /// trivia with a single diagnostic per run; a separator followed directly
    /// by a terminator yields a missing element unless trailing separators
    /// are allowed.
    pub(crate) fn parse_separated_list(
        &mut self,
        children: &mut ChildList,
        options: ListOptions,
        is_element_start: impl Fn(&ParserState) -> bool + Copy,
        mut parse_element: impl FnMut(&mut ParserState) -> NodeIndex,
        error_message: &str,
        error_code: u32,
    ) {
        let at_separator = |p: &ParserState| {
            p.is_token(options.separator)
                || options.wrong_separator.is_some_and(|w| p.is_token(w))
        };

        if self.is_terminator() && !is_element_start(self) && !at_separator(self) {
            if options.require_one {
                let element = parse_element(self);
                children.push(GreenElement::Node(element));
            }
            return;
        }
        let element = parse_element(self);
        children.push(GreenElement::Node(element));
        loop {
            if self.is_terminator() && !at_separator(self) {
                break;
            }
            let pos_before = self.cursor.position();
            if at_separator(self) {
                if !self.is_token(options.separator) {
                    let message = format!(
                        "'{}' expected, not '{}'",
                        options.separator.display_text(),
                        self.token().display_text()
                    );
                    self.parse_error_at_current_token(
                        &message,
                        diagnostic_codes::WRONG_SEPARATOR,
                    );
                }
                children.push(GreenElement::Token(self.eat_token()));
                if options.allow_trailing && self.is_terminator() && !is_element_start(self) {
                    break;
                }
                let element = parse_element(self);
                children.push(GreenElement::Node(element));
            } else if is_element_start(self) {
                // Two elements with no separator between them.
                self.error_expected(options.separator);
                children.push(GreenElement::Token(self.eat_missing(options.separator)));
                let element = parse_element(self);
                children.push(GreenElement::Node(element));
            } else {
                let skipped = self.skip_bad_tokens(error_message, error_code, |p| {
                    is_element_start(p) || at_separator(p)
                });
                if !skipped {
                    break;
                }
            }
            if self.cursor.position() == pos_before {
                break;
            }
        }
    }
}
