//! Type productions: names, predefined types, tuples, nullable and array
//! suffixes, type argument lists.

use csz_common::diagnostics::diagnostic_codes;
use csz_scanner::{SyntaxKind, Token};

use super::arena::{GreenElement, NodeIndex};
use super::lists::ListOptions;
use super::state::{ParserState, TerminatorFlags};
use super::state_expressions::kind_can_start_expression;

/// Context-sensitive `?` and `[` suffix policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TypeParseMode {
    Normal,
    /// After `is`/`as`: `?` binds to the type only when a conditional
    /// expression reading is impossible.
    AfterIs,
    /// After `new`: array ranks belong to the creation expression, not the
    /// type.
    NewExpression,
}

impl ParserState {
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        self.parse_type_core(TypeParseMode::Normal)
    }

    pub(crate) fn parse_type_core(&mut self, mode: TypeParseMode) -> NodeIndex {
        let mut type_node = match self.token() {
            kind if kind.is_predefined_type_keyword() => {
                let keyword = self.eat_token();
                let mut children = self.builder();
                children.push(GreenElement::Token(keyword));
                self.finish(SyntaxKind::PredefinedType, children)
            }
            SyntaxKind::Identifier => self.parse_name(),
            SyntaxKind::OpenParenToken => self.parse_tuple_type(),
            _ => {
                self.error_type_expected();
                return self.error_node();
            }
        };

        loop {
            match self.token() {
                SyntaxKind::QuestionToken if self.question_is_nullable(mode) => {
                    let question = self.eat_token();
                    let mut children = self.builder();
                    children.push(GreenElement::Node(type_node));
                    children.push(GreenElement::Token(question));
                    type_node = self.finish(SyntaxKind::NullableType, children);
                }
                SyntaxKind::OpenBracketToken if mode != TypeParseMode::NewExpression => {
                    let rank = self.parse_array_rank_specifier(false);
                    let mut children = self.builder();
                    children.push(GreenElement::Node(type_node));
                    children.push(GreenElement::Node(rank));
                    type_node = self.finish(SyntaxKind::ArrayType, children);
                }
                _ => break,
            }
        }
        type_node
    }

    fn question_is_nullable(&self, mode: TypeParseMode) -> bool {
        match mode {
            TypeParseMode::Normal => true,
            // `x is T ? a : b` must stay a conditional; the `?` is part of
            // the type only when no expression can follow it.
            TypeParseMode::AfterIs => !kind_can_start_expression(self.peek_kind(1)),
            // `new T?(...)` / `new T?[...]` / `new T? {...}` construct a
            // nullable; anything else falls back to the conditional rule.
            TypeParseMode::NewExpression => matches!(
                self.peek_kind(1),
                SyntaxKind::OpenParenToken
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::OpenBraceToken
            ) || !kind_can_start_expression(self.peek_kind(1)),
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Dotted, possibly generic name. Used by type positions, using
    /// directives, namespace headers, base lists, and attributes; `<` always
    /// opens a type argument list here.
    pub(crate) fn parse_name(&mut self) -> NodeIndex {
        let mut left = self.parse_simple_name(false);
        while self.is_token(SyntaxKind::DotToken) {
            let dot = self.eat_token();
            let right = self.parse_simple_name(false);
            let mut children = self.builder();
            children.push(GreenElement::Node(left));
            children.push(GreenElement::Token(dot));
            children.push(GreenElement::Node(right));
            left = self.finish(SyntaxKind::QualifiedName, children);
        }
        left
    }

    /// Identifier or generic name. With `in_expression` set, `<` opens a
    /// type argument list only when the follow-set resolver commits to one;
    /// otherwise it is left for the comparison operator parser.
    pub(crate) fn parse_simple_name(&mut self, in_expression: bool) -> NodeIndex {
        if !self.is_token(SyntaxKind::Identifier) {
            self.error_expected(SyntaxKind::Identifier);
            return self.error_node();
        }
        let identifier = self.eat_token();
        let generic = self.is_token(SyntaxKind::LessThanToken)
            && (!in_expression || self.is_definitely_type_argument_list());
        if !generic {
            let mut children = self.builder();
            children.push(GreenElement::Token(identifier));
            return self.finish(SyntaxKind::IdentifierName, children);
        }
        let arguments = self.parse_type_argument_list();
        let mut children = self.builder();
        children.push(GreenElement::Token(identifier));
        children.push(GreenElement::Node(arguments));
        self.finish(SyntaxKind::GenericName, children)
    }

    pub(crate) fn parse_type_argument_list(&mut self) -> NodeIndex {
        let less_than = self.parse_expected(SyntaxKind::LessThanToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(less_than));

        self.with_terminators(TerminatorFlags::IS_END_OF_TYPE_ARGUMENT_LIST, |p| {
            if !p.is_token(SyntaxKind::GreaterThanToken) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma(),
                    |p| p.is_possible_type_start() || p.is_token(SyntaxKind::GreaterThanToken),
                    |p| p.parse_type_argument(),
                    "Type expected",
                    diagnostic_codes::TYPE_EXPECTED,
                );
            }
        });

        let greater_than = self.parse_expected(SyntaxKind::GreaterThanToken);
        children.push(GreenElement::Token(greater_than));
        self.finish(SyntaxKind::TypeArgumentList, children)
    }

    /// One type argument; `,` or `>` in argument position is the open
    /// generic form (`List<>`, `Dictionary<,>`).
    fn parse_type_argument(&mut self) -> NodeIndex {
        if matches!(
            self.token(),
            SyntaxKind::CommaToken | SyntaxKind::GreaterThanToken
        ) {
            return self.omitted_type_argument();
        }
        self.parse_type()
    }

    fn omitted_type_argument(&mut self) -> NodeIndex {
        // Zero-width placeholder; not "missing" since the open generic form
        // is valid syntax.
        let pos = self.token_full_start();
        let token = self.arena.add_token(Token::new(SyntaxKind::None, pos, pos));
        let mut children = self.builder();
        children.push(GreenElement::Token(token));
        self.finish(SyntaxKind::OmittedTypeArgument, children)
    }

    pub(crate) fn is_possible_type_start(&self) -> bool {
        let kind = self.token();
        kind.is_predefined_type_keyword()
            || kind == SyntaxKind::Identifier
            || kind == SyntaxKind::OpenParenToken
    }

    // =========================================================================
    // Tuples and arrays
    // =========================================================================

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));

        self.with_terminators(TerminatorFlags::IS_END_OF_PARAMETER_LIST, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_required(),
                |p| p.is_possible_type_start(),
                |p| p.parse_tuple_element(),
                "Type expected",
                diagnostic_codes::TYPE_EXPECTED,
            );
        });

        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::TupleType, children)
    }

    fn parse_tuple_element(&mut self) -> NodeIndex {
        let element_type = self.parse_type();
        let mut children = self.builder();
        children.push(GreenElement::Node(element_type));
        if self.is_token(SyntaxKind::Identifier) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        self.finish(SyntaxKind::TupleElement, children)
    }

    /// `[ , , ]` in type position, or `[ expr, expr ]` in array creation
    /// when `allow_sizes` is set.
    pub(crate) fn parse_array_rank_specifier(&mut self, allow_sizes: bool) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        if allow_sizes && kind_can_start_expression(self.token()) {
            self.with_terminators(TerminatorFlags::IS_END_OF_ARGUMENT_LIST, |p| {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma(),
                    |p| kind_can_start_expression(p.token()),
                    |p| p.parse_expression(),
                    "Expression expected",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
            });
        } else {
            while self.is_token(SyntaxKind::CommaToken) {
                children.push(GreenElement::Token(self.eat_token()));
            }
        }
        let close = self.parse_expected(SyntaxKind::CloseBracketToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::ArrayRankSpecifier, children)
    }
}
