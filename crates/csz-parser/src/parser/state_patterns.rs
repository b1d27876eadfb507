//! Pattern productions: `is` patterns, switch patterns, combinators,
//! recursive patterns, designations.

use csz_common::diagnostics::diagnostic_codes;
use csz_scanner::SyntaxKind;

use super::arena::{GreenElement, NodeIndex};
use super::features::LanguageFeature;
use super::lists::ListOptions;
use super::state::{CONTEXT_FLAG_IN_PATTERN, ParserState, TerminatorFlags};
use super::state_expressions::{Precedence, kind_can_start_expression};
use super::state_types::TypeParseMode;

impl ParserState {
    /// Pattern directly after `is`.
    pub(crate) fn parse_is_pattern(&mut self) -> NodeIndex {
        self.parse_pattern()
    }

    /// Full pattern with `or`/`and`/`not` combinators.
    pub(crate) fn parse_pattern(&mut self) -> NodeIndex {
        self.with_context(CONTEXT_FLAG_IN_PATTERN, |p| p.parse_disjunctive_pattern())
    }

    pub(crate) fn is_possible_pattern_start(&self) -> bool {
        kind_can_start_expression(self.token())
            || matches!(
                self.token(),
                SyntaxKind::OpenBraceToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::LessThanEqualsToken
                    | SyntaxKind::GreaterThanToken
                    | SyntaxKind::GreaterThanEqualsToken
            )
    }

    fn parse_disjunctive_pattern(&mut self) -> NodeIndex {
        let mut left = self.parse_conjunctive_pattern();
        while self.is_contextual(SyntaxKind::OrKeyword) {
            self.check_feature(LanguageFeature::PatternCombinators);
            let operator = self.eat_token_as(SyntaxKind::OrKeyword);
            let right = self.parse_conjunctive_pattern();
            let mut children = self.builder();
            children.push(GreenElement::Node(left));
            children.push(GreenElement::Token(operator));
            children.push(GreenElement::Node(right));
            left = self.finish(SyntaxKind::OrPattern, children);
        }
        left
    }

    fn parse_conjunctive_pattern(&mut self) -> NodeIndex {
        let mut left = self.parse_negated_pattern();
        while self.is_contextual(SyntaxKind::AndKeyword) {
            self.check_feature(LanguageFeature::PatternCombinators);
            let operator = self.eat_token_as(SyntaxKind::AndKeyword);
            let right = self.parse_negated_pattern();
            let mut children = self.builder();
            children.push(GreenElement::Node(left));
            children.push(GreenElement::Token(operator));
            children.push(GreenElement::Node(right));
            left = self.finish(SyntaxKind::AndPattern, children);
        }
        left
    }

    fn parse_negated_pattern(&mut self) -> NodeIndex {
        if self.is_contextual(SyntaxKind::NotKeyword) {
            self.check_feature(LanguageFeature::PatternCombinators);
            let operator = self.eat_token_as(SyntaxKind::NotKeyword);
            let operand = self.recurse(
                |p| p.parse_negated_pattern(),
                |p| p.parse_primary_pattern(),
            );
            let mut children = self.builder();
            children.push(GreenElement::Token(operator));
            children.push(GreenElement::Node(operand));
            return self.finish(SyntaxKind::NotPattern, children);
        }
        self.parse_primary_pattern()
    }

    fn parse_primary_pattern(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::LessThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::GreaterThanEqualsToken => {
                let operator = self.eat_token();
                let operand = self.parse_sub_expression(Precedence::Relational);
                let mut children = self.builder();
                children.push(GreenElement::Token(operator));
                children.push(GreenElement::Node(operand));
                self.finish(SyntaxKind::RelationalPattern, children)
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_or_positional_pattern(),
            SyntaxKind::OpenBraceToken => {
                // Type-less property pattern: `{ Length: 0 }`.
                let property = self.parse_property_pattern_clause();
                let mut children = self.builder();
                children.push(GreenElement::Node(property));
                if self.is_token(SyntaxKind::Identifier) {
                    children.push(GreenElement::Node(self.parse_designation()));
                }
                self.finish(SyntaxKind::RecursivePattern, children)
            }
            SyntaxKind::Identifier if self.is_contextual(SyntaxKind::VarKeyword) => {
                let keyword = self.eat_token_as(SyntaxKind::VarKeyword);
                let designation = self.parse_designation();
                let mut children = self.builder();
                children.push(GreenElement::Token(keyword));
                children.push(GreenElement::Node(designation));
                self.finish(SyntaxKind::VarPattern, children)
            }
            SyntaxKind::Identifier if self.token_text() == "_" => {
                let underscore = self.eat_token();
                let mut children = self.builder();
                children.push(GreenElement::Token(underscore));
                self.finish(SyntaxKind::DiscardPattern, children)
            }
            _ => self.parse_type_or_constant_pattern(),
        }
    }

    /// Type-first pattern forms (declaration, recursive, bare type) with a
    /// rewind to a constant-expression pattern when the parsed "type" is
    /// really a value (`Color.Red`, `SOME_CONST`).
    fn parse_type_or_constant_pattern(&mut self) -> NodeIndex {
        if !self.is_possible_type_start() {
            return self.parse_constant_pattern();
        }
        let checkpoint = self.checkpoint();
        let diagnostics_before = self.parse_diagnostics.len();
        let pattern_type = self.parse_type_core(TypeParseMode::AfterIs);
        if self.parse_diagnostics.len() > diagnostics_before {
            self.restore(checkpoint);
            return self.parse_constant_pattern();
        }

        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::OpenBraceToken
        ) {
            self.release(checkpoint);
            return self.parse_recursive_pattern_rest(Some(pattern_type));
        }
        if self.is_token(SyntaxKind::Identifier)
            && !self.is_contextual(SyntaxKind::WhenKeyword)
            && !self.is_contextual(SyntaxKind::OrKeyword)
            && !self.is_contextual(SyntaxKind::AndKeyword)
        {
            self.release(checkpoint);
            let designation = self.parse_designation();
            let mut children = self.builder();
            children.push(GreenElement::Node(pattern_type));
            children.push(GreenElement::Node(designation));
            return self.finish(SyntaxKind::DeclarationPattern, children);
        }
        if matches!(
            self.arena.kind(pattern_type),
            SyntaxKind::PredefinedType
                | SyntaxKind::ArrayType
                | SyntaxKind::NullableType
                | SyntaxKind::TupleType
        ) {
            self.release(checkpoint);
            let mut children = self.builder();
            children.push(GreenElement::Node(pattern_type));
            return self.finish(SyntaxKind::TypePattern, children);
        }
        // A bare name: prefer the constant reading.
        self.restore(checkpoint);
        self.parse_constant_pattern()
    }

    fn parse_constant_pattern(&mut self) -> NodeIndex {
        let expression = self.parse_sub_expression(Precedence::Relational);
        let mut children = self.builder();
        children.push(GreenElement::Node(expression));
        self.finish(SyntaxKind::ConstantPattern, children)
    }

    fn parse_parenthesized_or_positional_pattern(&mut self) -> NodeIndex {
        let open = self.eat_token();
        let first = self.parse_pattern();
        if !self.is_token(SyntaxKind::CommaToken) {
            let close = self.parse_expected(SyntaxKind::CloseParenToken);
            let mut children = self.builder();
            children.push(GreenElement::Token(open));
            children.push(GreenElement::Node(first));
            children.push(GreenElement::Token(close));
            return self.finish(SyntaxKind::ParenthesizedPattern, children);
        }
        // `(a, b)` deconstructs: wrap elements as subpatterns.
        let mut clause = self.builder();
        clause.push(GreenElement::Token(open));
        let mut subpattern = self.builder();
        subpattern.push(GreenElement::Node(first));
        let first = self.finish(SyntaxKind::Subpattern, subpattern);
        clause.push(GreenElement::Node(first));
        while self.is_token(SyntaxKind::CommaToken) {
            clause.push(GreenElement::Token(self.eat_token()));
            clause.push(GreenElement::Node(self.parse_subpattern()));
        }
        clause.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
        let positional = self.finish(SyntaxKind::PositionalPatternClause, clause);

        let mut children = self.builder();
        children.push(GreenElement::Node(positional));
        if self.is_token(SyntaxKind::OpenBraceToken) {
            children.push(GreenElement::Node(self.parse_property_pattern_clause()));
        }
        if self.is_token(SyntaxKind::Identifier) {
            children.push(GreenElement::Node(self.parse_designation()));
        }
        self.finish(SyntaxKind::RecursivePattern, children)
    }

    /// `[type] [positional] [property] [designation]` after the type has
    /// been committed.
    fn parse_recursive_pattern_rest(&mut self, pattern_type: Option<NodeIndex>) -> NodeIndex {
        let mut children = self.builder();
        if let Some(t) = pattern_type {
            children.push(GreenElement::Node(t));
        }
        if self.is_token(SyntaxKind::OpenParenToken) {
            let open = self.eat_token();
            let mut clause = self.builder();
            clause.push(GreenElement::Token(open));
            self.with_terminators(TerminatorFlags::IS_END_OF_ARGUMENT_LIST, |p| {
                if !p.is_token(SyntaxKind::CloseParenToken) {
                    p.parse_separated_list(
                        &mut clause,
                        ListOptions::comma(),
                        |p| p.is_possible_pattern_start(),
                        |p| p.parse_subpattern(),
                        "Pattern expected",
                        diagnostic_codes::PATTERN_EXPECTED,
                    );
                }
            });
            clause.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
            let positional = self.finish(SyntaxKind::PositionalPatternClause, clause);
            children.push(GreenElement::Node(positional));
        }
        if self.is_token(SyntaxKind::OpenBraceToken) {
            children.push(GreenElement::Node(self.parse_property_pattern_clause()));
        }
        if self.is_token(SyntaxKind::Identifier)
            && !self.is_contextual(SyntaxKind::WhenKeyword)
            && !self.is_contextual(SyntaxKind::OrKeyword)
            && !self.is_contextual(SyntaxKind::AndKeyword)
        {
            children.push(GreenElement::Node(self.parse_designation()));
        }
        self.finish(SyntaxKind::RecursivePattern, children)
    }

    fn parse_property_pattern_clause(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_INITIALIZER, |p| {
            if !p.is_token(SyntaxKind::CloseBraceToken) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma_trailing(),
                    |p| {
                        p.is_possible_pattern_start() || p.is_token(SyntaxKind::Identifier)
                    },
                    |p| p.parse_subpattern(),
                    "Pattern expected",
                    diagnostic_codes::PATTERN_EXPECTED,
                );
            }
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseBraceToken)));
        self.finish(SyntaxKind::PropertyPatternClause, children)
    }

    fn parse_subpattern(&mut self) -> NodeIndex {
        let mut children = self.builder();
        if self.is_token(SyntaxKind::Identifier) && self.peek_kind(1) == SyntaxKind::ColonToken {
            let identifier = self.eat_token();
            let mut name = self.builder();
            name.push(GreenElement::Token(identifier));
            let name_node = self.finish(SyntaxKind::IdentifierName, name);
            let colon = self.eat_token();
            let mut name_colon = self.builder();
            name_colon.push(GreenElement::Node(name_node));
            name_colon.push(GreenElement::Token(colon));
            let name_colon = self.finish(SyntaxKind::NameColon, name_colon);
            children.push(GreenElement::Node(name_colon));
        }
        let pattern = self.parse_pattern();
        children.push(GreenElement::Node(pattern));
        self.finish(SyntaxKind::Subpattern, children)
    }

    // =========================================================================
    // Designations
    // =========================================================================

    pub(crate) fn parse_designation(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::OpenParenToken) {
            let open = self.eat_token();
            let mut children = self.builder();
            children.push(GreenElement::Token(open));
            loop {
                children.push(GreenElement::Node(self.parse_designation()));
                if self.is_token(SyntaxKind::CommaToken) {
                    children.push(GreenElement::Token(self.eat_token()));
                    continue;
                }
                break;
            }
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
            return self.finish(SyntaxKind::ParenthesizedVariableDesignation, children);
        }
        if self.is_token(SyntaxKind::Identifier) {
            let kind = if self.token_text() == "_" {
                SyntaxKind::DiscardDesignation
            } else {
                SyntaxKind::SingleVariableDesignation
            };
            let identifier = self.eat_token();
            let mut children = self.builder();
            children.push(GreenElement::Token(identifier));
            return self.finish(kind, children);
        }
        self.error_expected(SyntaxKind::Identifier);
        let missing = self.eat_missing(SyntaxKind::Identifier);
        let mut children = self.builder();
        children.push(GreenElement::Token(missing));
        self.finish(SyntaxKind::SingleVariableDesignation, children)
    }
}
