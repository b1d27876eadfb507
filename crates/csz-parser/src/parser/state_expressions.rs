//! Expression productions: precedence climbing, postfix chains, conditional
//! access, creation expressions, lambdas, switch/with expressions.

use csz_common::diagnostics::diagnostic_codes;
use csz_scanner::SyntaxKind;

use super::arena::{GreenElement, NodeIndex};
use super::features::LanguageFeature;
use super::lists::ListOptions;
use super::lookahead::ScanTypeFlags;
use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_FORCE_CONDITIONAL_ACCESS, ParserState, TerminatorFlags,
};
use super::state_types::TypeParseMode;

/// Binding strength, weakest first. Every operator maps to exactly one
/// level; the climb in `parse_binary_continuation` compares these directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Expression,
    Assignment,
    Conditional,
    Coalescing,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Switch,
    Range,
    Unary,
    Cast,
}

pub(crate) fn kind_can_start_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::CharacterLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::BaseKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::TypeofKeyword
            | SyntaxKind::DefaultKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::CaretToken
            | SyntaxKind::DotDotToken
    ) || kind.is_predefined_type_keyword()
}

fn binary_operator_precedence(kind: SyntaxKind) -> Option<Precedence> {
    use SyntaxKind::*;
    let precedence = match kind {
        EqualsToken | PlusEqualsToken | MinusEqualsToken | AsteriskEqualsToken
        | SlashEqualsToken | PercentEqualsToken | AmpersandEqualsToken | BarEqualsToken
        | CaretEqualsToken | LessThanLessThanEqualsToken | GreaterThanGreaterThanEqualsToken
        | GreaterThanGreaterThanGreaterThanEqualsToken | QuestionQuestionEqualsToken => {
            Precedence::Assignment
        }
        QuestionQuestionToken => Precedence::Coalescing,
        BarBarToken => Precedence::ConditionalOr,
        AmpersandAmpersandToken => Precedence::ConditionalAnd,
        BarToken => Precedence::LogicalOr,
        CaretToken => Precedence::LogicalXor,
        AmpersandToken => Precedence::LogicalAnd,
        EqualsEqualsToken | ExclamationEqualsToken => Precedence::Equality,
        LessThanToken | LessThanEqualsToken | GreaterThanToken | GreaterThanEqualsToken
        | IsKeyword | AsKeyword => Precedence::Relational,
        LessThanLessThanToken | GreaterThanGreaterThanToken
        | GreaterThanGreaterThanGreaterThanToken => Precedence::Shift,
        PlusToken | MinusToken => Precedence::Additive,
        AsteriskToken | SlashToken | PercentToken => Precedence::Multiplicative,
        SwitchKeyword => Precedence::Switch,
        DotDotToken => Precedence::Range,
        _ => return Option::None,
    };
    Some(precedence)
}

fn is_assignment_operator(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        EqualsToken
            | PlusEqualsToken
            | MinusEqualsToken
            | AsteriskEqualsToken
            | SlashEqualsToken
            | PercentEqualsToken
            | AmpersandEqualsToken
            | BarEqualsToken
            | CaretEqualsToken
            | LessThanLessThanEqualsToken
            | GreaterThanGreaterThanEqualsToken
            | GreaterThanGreaterThanGreaterThanEqualsToken
            | QuestionQuestionEqualsToken
    )
}

fn is_right_associative(kind: SyntaxKind) -> bool {
    is_assignment_operator(kind) || kind == SyntaxKind::QuestionQuestionToken
}

fn prefix_unary_kind(kind: SyntaxKind) -> SyntaxKind {
    match kind {
        SyntaxKind::PlusToken => SyntaxKind::UnaryPlusExpression,
        SyntaxKind::MinusToken => SyntaxKind::UnaryMinusExpression,
        SyntaxKind::ExclamationToken => SyntaxKind::LogicalNotExpression,
        SyntaxKind::TildeToken => SyntaxKind::BitwiseNotExpression,
        SyntaxKind::PlusPlusToken => SyntaxKind::PreIncrementExpression,
        SyntaxKind::MinusMinusToken => SyntaxKind::PreDecrementExpression,
        SyntaxKind::CaretToken => SyntaxKind::IndexExpression,
        _ => unreachable!("not a prefix operator"),
    }
}

impl ParserState {
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        self.parse_sub_expression(Precedence::Expression)
    }

    pub(crate) fn parse_sub_expression(&mut self, precedence: Precedence) -> NodeIndex {
        self.recurse(
            |p| p.parse_sub_expression_core(precedence),
            |p| p.error_node(),
        )
    }

    fn parse_sub_expression_core(&mut self, precedence: Precedence) -> NodeIndex {
        let term = self.parse_unary_or_term();
        let left = self.parse_binary_continuation(term, precedence);
        if self.is_token(SyntaxKind::QuestionToken) && precedence <= Precedence::Conditional {
            return self.parse_conditional_tail(left);
        }
        left
    }

    // =========================================================================
    // Unary operators and terms
    // =========================================================================

    fn parse_unary_or_term(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::CaretToken => {
                let node_kind = prefix_unary_kind(self.token());
                let operator = self.eat_token();
                let operand = self.parse_sub_expression(Precedence::Unary);
                let mut children = self.builder();
                children.push(GreenElement::Token(operator));
                children.push(GreenElement::Node(operand));
                self.finish(node_kind, children)
            }
            SyntaxKind::DotDotToken => {
                // Open-start range: `..b` or bare `..`.
                self.check_feature(LanguageFeature::RangeOperator);
                let operator = self.eat_token();
                let mut children = self.builder();
                children.push(GreenElement::Token(operator));
                if kind_can_start_expression(self.token()) {
                    let right = self.parse_sub_expression(Precedence::Range);
                    children.push(GreenElement::Node(right));
                }
                self.finish(SyntaxKind::RangeExpression, children)
            }
            SyntaxKind::ThrowKeyword => {
                let keyword = self.eat_token();
                let operand = self.parse_sub_expression(Precedence::Coalescing);
                let mut children = self.builder();
                children.push(GreenElement::Token(keyword));
                children.push(GreenElement::Node(operand));
                self.finish(SyntaxKind::ThrowExpression, children)
            }
            _ if self.is_await_expression() => {
                let keyword = self.eat_token_as(SyntaxKind::AwaitKeyword);
                let operand = self.parse_sub_expression(Precedence::Unary);
                let mut children = self.builder();
                children.push(GreenElement::Token(keyword));
                children.push(GreenElement::Node(operand));
                self.finish(SyntaxKind::AwaitExpression, children)
            }
            _ => {
                if self.is_possible_lambda_expression() {
                    return self.parse_lambda_expression();
                }
                if self.is_token(SyntaxKind::OpenParenToken) && self.is_possible_cast_expression()
                {
                    return self.parse_cast_expression();
                }
                let term = self.parse_primary_expression();
                self.parse_postfix_expression(term)
            }
        }
    }

    fn is_await_expression(&self) -> bool {
        self.is_contextual(SyntaxKind::AwaitKeyword)
            && self.context_flags & CONTEXT_FLAG_ASYNC != 0
    }

    fn parse_cast_expression(&mut self) -> NodeIndex {
        let open = self.eat_token();
        let target = self.parse_type();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let operand = self.parse_sub_expression(Precedence::Cast);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(target));
        children.push(GreenElement::Token(close));
        children.push(GreenElement::Node(operand));
        self.finish(SyntaxKind::CastExpression, children)
    }

    fn parse_primary_expression(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::NumericLiteral => {
                self.parse_literal_expression(SyntaxKind::NumericLiteralExpression)
            }
            SyntaxKind::StringLiteral => {
                self.parse_literal_expression(SyntaxKind::StringLiteralExpression)
            }
            SyntaxKind::CharacterLiteral => {
                self.parse_literal_expression(SyntaxKind::CharacterLiteralExpression)
            }
            SyntaxKind::TrueKeyword => {
                self.parse_literal_expression(SyntaxKind::TrueLiteralExpression)
            }
            SyntaxKind::FalseKeyword => {
                self.parse_literal_expression(SyntaxKind::FalseLiteralExpression)
            }
            SyntaxKind::NullKeyword => {
                self.parse_literal_expression(SyntaxKind::NullLiteralExpression)
            }
            SyntaxKind::ThisKeyword => self.parse_literal_expression(SyntaxKind::ThisExpression),
            SyntaxKind::BaseKeyword => self.parse_literal_expression(SyntaxKind::BaseExpression),
            SyntaxKind::DefaultKeyword => self.parse_default_expression(),
            SyntaxKind::TypeofKeyword => self.parse_typeof_expression(),
            SyntaxKind::NewKeyword => self.parse_new_expression(),
            SyntaxKind::OpenParenToken => self.parse_paren_or_tuple_expression(),
            SyntaxKind::OpenBracketToken => self.parse_collection_expression(),
            kind if kind.is_predefined_type_keyword() => {
                // `int.MaxValue`: a predefined type in value position.
                let keyword = self.eat_token();
                let mut children = self.builder();
                children.push(GreenElement::Token(keyword));
                self.finish(SyntaxKind::PredefinedType, children)
            }
            SyntaxKind::Identifier => {
                if self.is_query_expression_start() {
                    return self.parse_query_expression();
                }
                if self.is_deconstruction_declaration_start() {
                    return self.parse_declaration_expression();
                }
                self.parse_simple_name(true)
            }
            kind => {
                if binary_operator_precedence(kind).is_some() || kind.fixed_text().is_some() {
                    let message =
                        format!("Invalid expression term '{}'", kind.display_text());
                    self.parse_error_at_current_token(
                        &message,
                        diagnostic_codes::INVALID_EXPRESSION_TERM,
                    );
                } else {
                    self.error_expression_expected();
                }
                self.error_node()
            }
        }
    }

    fn parse_literal_expression(&mut self, kind: SyntaxKind) -> NodeIndex {
        let token = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(token));
        self.finish(kind, children)
    }

    fn parse_default_expression(&mut self) -> NodeIndex {
        let keyword = self.eat_token();
        if !self.is_token(SyntaxKind::OpenParenToken) {
            let mut children = self.builder();
            children.push(GreenElement::Token(keyword));
            return self.finish(SyntaxKind::DefaultLiteralExpression, children);
        }
        let open = self.eat_token();
        let target = self.parse_type();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(keyword));
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(target));
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::DefaultExpression, children)
    }

    fn parse_typeof_expression(&mut self) -> NodeIndex {
        let keyword = self.eat_token();
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let target = self.parse_type();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(keyword));
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(target));
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::TypeOfExpression, children)
    }

    fn is_query_expression_start(&self) -> bool {
        self.is_contextual(SyntaxKind::FromKeyword) && {
            let next = self.peek_kind(1);
            next == SyntaxKind::Identifier
                || next.is_predefined_type_keyword()
                || next == SyntaxKind::OpenParenToken
        }
    }

    /// `var (x, y)` in value position is a deconstruction declaration when a
    /// designation and an assignment plausibly follow.
    fn is_deconstruction_declaration_start(&mut self) -> bool {
        if !self.is_contextual(SyntaxKind::VarKeyword)
            || self.peek_kind(1) != SyntaxKind::OpenParenToken
        {
            return false;
        }
        let checkpoint = self.checkpoint();
        self.next_token();
        let mut depth = 0usize;
        let balanced = loop {
            match self.token() {
                SyntaxKind::OpenParenToken => depth += 1,
                SyntaxKind::CloseParenToken => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        break true;
                    }
                }
                SyntaxKind::EndOfFileToken => break false,
                _ => {}
            }
            self.next_token();
        };
        let result = balanced && self.is_token(SyntaxKind::EqualsToken);
        self.restore(checkpoint);
        result
    }

    fn parse_declaration_expression(&mut self) -> NodeIndex {
        let var = self.eat_token();
        let mut name = self.builder();
        name.push(GreenElement::Token(var));
        let var_type = self.finish(SyntaxKind::IdentifierName, name);
        let designation = self.parse_designation();
        let mut children = self.builder();
        children.push(GreenElement::Node(var_type));
        children.push(GreenElement::Node(designation));
        self.finish(SyntaxKind::DeclarationExpression, children)
    }

    // =========================================================================
    // Parenthesized, tuple, collection
    // =========================================================================

    fn parse_paren_or_tuple_expression(&mut self) -> NodeIndex {
        let open = self.eat_token();
        self.with_terminators(TerminatorFlags::IS_END_OF_ARGUMENT_LIST, |p| {
            let first_is_named =
                p.is_token(SyntaxKind::Identifier) && p.peek_kind(1) == SyntaxKind::ColonToken;
            if !first_is_named {
                let expression = p.parse_expression();
                if !p.is_token(SyntaxKind::CommaToken) {
                    let close = p.parse_expected(SyntaxKind::CloseParenToken);
                    let mut children = p.builder();
                    children.push(GreenElement::Token(open));
                    children.push(GreenElement::Node(expression));
                    children.push(GreenElement::Token(close));
                    return p.finish(SyntaxKind::ParenthesizedExpression, children);
                }
                // Comma: re-wrap the first element and continue as a tuple.
                let mut element = p.builder();
                element.push(GreenElement::Node(expression));
                let first = p.finish(SyntaxKind::Argument, element);
                return p.parse_tuple_expression_rest(open, first);
            }
            let first = p.parse_tuple_expression_element();
            p.parse_tuple_expression_rest(open, first)
        })
    }

    fn parse_tuple_expression_rest(
        &mut self,
        open: super::arena::TokenIndex,
        first: NodeIndex,
    ) -> NodeIndex {
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(first));
        while self.is_token(SyntaxKind::CommaToken) {
            children.push(GreenElement::Token(self.eat_token()));
            let element = self.parse_tuple_expression_element();
            children.push(GreenElement::Node(element));
        }
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::TupleExpression, children)
    }

    /// One tuple-expression element: `[name :] expression` as an Argument.
    fn parse_tuple_expression_element(&mut self) -> NodeIndex {
        let mut children = self.builder();
        if self.is_token(SyntaxKind::Identifier) && self.peek_kind(1) == SyntaxKind::ColonToken {
            children.push(GreenElement::Node(self.parse_name_colon()));
        }
        let expression = self.parse_expression();
        children.push(GreenElement::Node(expression));
        self.finish(SyntaxKind::Argument, children)
    }

    fn parse_name_colon(&mut self) -> NodeIndex {
        let identifier = self.eat_token();
        let mut name = self.builder();
        name.push(GreenElement::Token(identifier));
        let name_node = self.finish(SyntaxKind::IdentifierName, name);
        let colon = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Node(name_node));
        children.push(GreenElement::Token(colon));
        self.finish(SyntaxKind::NameColon, children)
    }

    /// `[ element, ... ]` in value position. Spread elements arrive as
    /// open-start range expressions.
    fn parse_collection_expression(&mut self) -> NodeIndex {
        let open = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_ARGUMENT_LIST, |p| {
            if !p.is_token(SyntaxKind::CloseBracketToken) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma_trailing(),
                    |p| kind_can_start_expression(p.token()),
                    |p| p.parse_expression(),
                    "Expression expected",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
            }
        });
        let close = self.parse_expected(SyntaxKind::CloseBracketToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::CollectionExpression, children)
    }

    // =========================================================================
    // Postfix chains
    // =========================================================================

    pub(crate) fn parse_postfix_expression(&mut self, mut expr: NodeIndex) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::OpenParenToken => {
                    let arguments = self.parse_argument_list();
                    let mut children = self.builder();
                    children.push(GreenElement::Node(expr));
                    children.push(GreenElement::Node(arguments));
                    expr = self.finish(SyntaxKind::InvocationExpression, children);
                }
                SyntaxKind::OpenBracketToken => {
                    let arguments = self.parse_bracketed_argument_list();
                    let mut children = self.builder();
                    children.push(GreenElement::Node(expr));
                    children.push(GreenElement::Node(arguments));
                    expr = self.finish(SyntaxKind::ElementAccessExpression, children);
                }
                SyntaxKind::DotToken => {
                    let dot = self.eat_token();
                    let name = self.parse_simple_name(true);
                    let mut children = self.builder();
                    children.push(GreenElement::Node(expr));
                    children.push(GreenElement::Token(dot));
                    children.push(GreenElement::Node(name));
                    expr = self.finish(SyntaxKind::SimpleMemberAccessExpression, children);
                }
                SyntaxKind::PlusPlusToken => {
                    expr = self.parse_postfix_operator(expr, SyntaxKind::PostIncrementExpression);
                }
                SyntaxKind::MinusMinusToken => {
                    expr = self.parse_postfix_operator(expr, SyntaxKind::PostDecrementExpression);
                }
                SyntaxKind::ExclamationToken => {
                    expr = self
                        .parse_postfix_operator(expr, SyntaxKind::SuppressNullableWarningExpression);
                }
                SyntaxKind::QuestionToken if self.tokens_adjacent(0, 1) => {
                    match self.peek_kind(1) {
                        SyntaxKind::DotToken => expr = self.parse_conditional_access(expr),
                        SyntaxKind::OpenBracketToken => {
                            let force = self.context_flags
                                & CONTEXT_FLAG_FORCE_CONDITIONAL_ACCESS
                                != 0;
                            if force || !self.conditional_bracket_is_ternary() {
                                expr = self.parse_conditional_access(expr);
                            } else {
                                break;
                            }
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_postfix_operator(&mut self, expr: NodeIndex, kind: SyntaxKind) -> NodeIndex {
        let operator = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Node(expr));
        children.push(GreenElement::Token(operator));
        self.finish(kind, children)
    }

    /// At `?[`: does the bracketed run read as the when-true branch of a
    /// conditional (a collection expression followed by `:`) rather than
    /// element access? Pure scan, no trace.
    fn conditional_bracket_is_ternary(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        self.next_token();
        debug_assert_eq!(self.token(), SyntaxKind::OpenBracketToken);
        let mut depth = 0usize;
        let balanced = loop {
            match self.token() {
                SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBracketToken => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        break true;
                    }
                }
                SyntaxKind::EndOfFileToken => break false,
                _ => {}
            }
            self.next_token();
        };
        let ternary = balanced && self.is_token(SyntaxKind::ColonToken);
        self.restore(checkpoint);
        ternary
    }

    fn parse_conditional_access(&mut self, expr: NodeIndex) -> NodeIndex {
        let question = self.eat_token();
        let binding = if self.is_token(SyntaxKind::DotToken) {
            let dot = self.eat_token();
            let name = self.parse_simple_name(true);
            let mut children = self.builder();
            children.push(GreenElement::Token(dot));
            children.push(GreenElement::Node(name));
            self.finish(SyntaxKind::MemberBindingExpression, children)
        } else {
            let arguments = self.parse_bracketed_argument_list();
            let mut children = self.builder();
            children.push(GreenElement::Node(arguments));
            self.finish(SyntaxKind::ElementBindingExpression, children)
        };
        let when_not_null = self.parse_postfix_expression(binding);
        let mut children = self.builder();
        children.push(GreenElement::Node(expr));
        children.push(GreenElement::Token(question));
        children.push(GreenElement::Node(when_not_null));
        self.finish(SyntaxKind::ConditionalAccessExpression, children)
    }

    // =========================================================================
    // Binary operators
    // =========================================================================

    fn parse_binary_continuation(
        &mut self,
        mut left: NodeIndex,
        precedence: Precedence,
    ) -> NodeIndex {
        loop {
            if self.is_contextual(SyntaxKind::WithKeyword)
                && self.peek_kind(1) == SyntaxKind::OpenBraceToken
            {
                if Precedence::Switch < precedence {
                    break;
                }
                left = self.parse_with_expression_suffix(left);
                continue;
            }
            let (op_kind, extra) = match self.try_merge_shift() {
                Some((kind, extra)) => (kind, extra),
                None => (self.token(), 0),
            };
            let Some(new_precedence) = binary_operator_precedence(op_kind) else {
                break;
            };
            if new_precedence < precedence {
                break;
            }
            if new_precedence == precedence && !is_right_associative(op_kind) {
                break;
            }
            match op_kind {
                SyntaxKind::IsKeyword => {
                    let operator = self.eat_token();
                    let pattern = self.parse_is_pattern();
                    let mut children = self.builder();
                    children.push(GreenElement::Node(left));
                    children.push(GreenElement::Token(operator));
                    children.push(GreenElement::Node(pattern));
                    left = self.finish(SyntaxKind::IsPatternExpression, children);
                }
                SyntaxKind::AsKeyword => {
                    let operator = self.eat_token();
                    let target = self.parse_type_core(TypeParseMode::AfterIs);
                    let mut children = self.builder();
                    children.push(GreenElement::Node(left));
                    children.push(GreenElement::Token(operator));
                    children.push(GreenElement::Node(target));
                    left = self.finish(SyntaxKind::BinaryExpression, children);
                }
                SyntaxKind::SwitchKeyword => {
                    left = self.parse_switch_expression_suffix(left);
                }
                SyntaxKind::DotDotToken => {
                    self.check_feature(LanguageFeature::RangeOperator);
                    let operator = self.eat_token();
                    let mut children = self.builder();
                    children.push(GreenElement::Node(left));
                    children.push(GreenElement::Token(operator));
                    if kind_can_start_expression(self.token()) {
                        let right = self.parse_sub_expression(Precedence::Range);
                        children.push(GreenElement::Node(right));
                    }
                    left = self.finish(SyntaxKind::RangeExpression, children);
                }
                _ => {
                    if op_kind == SyntaxKind::QuestionQuestionEqualsToken {
                        self.check_feature(LanguageFeature::NullCoalescingAssignment);
                    }
                    let operator = if extra > 0 {
                        self.eat_merged(op_kind, extra)
                    } else {
                        self.eat_token()
                    };
                    let right = self.parse_sub_expression(new_precedence);
                    let node_kind = if is_assignment_operator(op_kind) {
                        SyntaxKind::AssignmentExpression
                    } else {
                        SyntaxKind::BinaryExpression
                    };
                    let mut children = self.builder();
                    children.push(GreenElement::Node(left));
                    children.push(GreenElement::Token(operator));
                    children.push(GreenElement::Node(right));
                    left = self.finish(node_kind, children);
                }
            }
        }
        left
    }

    // =========================================================================
    // Conditional expressions
    // =========================================================================

    /// `condition ? whenTrue : whenFalse`, with the collection-conflict
    /// retry: if no `:` remains after the when-true branch and that branch
    /// swallowed one as a nested ternary-over-collection, re-parse it
    /// forcing `?[` to mean conditional element access.
    fn parse_conditional_tail(&mut self, condition: NodeIndex) -> NodeIndex {
        let question = self.eat_token();
        let saved = self.saw_ternary_collection;
        self.saw_ternary_collection = false;

        let checkpoint = self.checkpoint();
        let mut when_true = self.parse_sub_expression(Precedence::Expression);
        if !self.is_token(SyntaxKind::ColonToken)
            && self.saw_ternary_collection
            && self.context_flags & CONTEXT_FLAG_FORCE_CONDITIONAL_ACCESS == 0
        {
            self.restore(checkpoint);
            when_true = self.with_context(CONTEXT_FLAG_FORCE_CONDITIONAL_ACCESS, |p| {
                p.parse_sub_expression(Precedence::Expression)
            });
        } else {
            self.release(checkpoint);
        }
        self.saw_ternary_collection = saved;

        let colon = self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_sub_expression(Precedence::Expression);

        if self.arena.kind(when_true) == SyntaxKind::CollectionExpression {
            self.saw_ternary_collection = true;
        }
        let mut children = self.builder();
        children.push(GreenElement::Node(condition));
        children.push(GreenElement::Token(question));
        children.push(GreenElement::Node(when_true));
        children.push(GreenElement::Token(colon));
        children.push(GreenElement::Node(when_false));
        self.finish(SyntaxKind::ConditionalExpression, children)
    }

    // =========================================================================
    // Argument lists
    // =========================================================================

    pub(crate) fn parse_argument_list(&mut self) -> NodeIndex {
        self.parse_argument_list_core(
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::ArgumentList,
        )
    }

    pub(crate) fn parse_bracketed_argument_list(&mut self) -> NodeIndex {
        self.parse_argument_list_core(
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::BracketedArgumentList,
        )
    }

    fn parse_argument_list_core(
        &mut self,
        open_kind: SyntaxKind,
        close_kind: SyntaxKind,
        node_kind: SyntaxKind,
    ) -> NodeIndex {
        let open = self.parse_expected(open_kind);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_ARGUMENT_LIST, |p| {
            if !p.is_token(close_kind) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma(),
                    |p| p.is_possible_argument_start(),
                    |p| p.parse_argument(),
                    "Expression expected",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
            }
        });
        let close = self.parse_expected(close_kind);
        children.push(GreenElement::Token(close));
        self.finish(node_kind, children)
    }

    fn is_possible_argument_start(&self) -> bool {
        kind_can_start_expression(self.token())
            || matches!(
                self.token(),
                SyntaxKind::RefKeyword | SyntaxKind::OutKeyword | SyntaxKind::InKeyword
            )
    }

    fn parse_argument(&mut self) -> NodeIndex {
        let mut children = self.builder();
        if self.is_token(SyntaxKind::Identifier) && self.peek_kind(1) == SyntaxKind::ColonToken {
            children.push(GreenElement::Node(self.parse_name_colon()));
        }
        let has_modifier = matches!(
            self.token(),
            SyntaxKind::RefKeyword | SyntaxKind::OutKeyword | SyntaxKind::InKeyword
        );
        if has_modifier {
            children.push(GreenElement::Token(self.eat_token()));
        }
        let expression = if has_modifier {
            self.parse_expression_or_declaration()
        } else {
            self.parse_expression()
        };
        children.push(GreenElement::Node(expression));
        self.finish(SyntaxKind::Argument, children)
    }

    /// `out var x` / `out int x` style declaration expressions.
    fn parse_expression_or_declaration(&mut self) -> NodeIndex {
        let checkpoint = self.checkpoint();
        let flags = self.scan_type();
        let is_declaration = flags != ScanTypeFlags::NotType
            && self.is_token(SyntaxKind::Identifier)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::CommaToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::EndOfFileToken
            );
        self.restore(checkpoint);
        if !is_declaration {
            return self.parse_expression();
        }
        let target_type = self.parse_type();
        let designation = self.parse_designation();
        let mut children = self.builder();
        children.push(GreenElement::Node(target_type));
        children.push(GreenElement::Node(designation));
        self.finish(SyntaxKind::DeclarationExpression, children)
    }

    // =========================================================================
    // Creation expressions
    // =========================================================================

    fn parse_new_expression(&mut self) -> NodeIndex {
        let new_keyword = self.eat_token();
        if self.is_token(SyntaxKind::OpenParenToken) && !self.new_paren_is_tuple_type() {
            // Target-typed `new(...)`.
            self.check_feature(LanguageFeature::ImplicitObjectCreation);
            let arguments = self.parse_argument_list();
            let mut children = self.builder();
            children.push(GreenElement::Token(new_keyword));
            children.push(GreenElement::Node(arguments));
            if self.is_token(SyntaxKind::OpenBraceToken) {
                let initializer = self.parse_initializer_expression();
                children.push(GreenElement::Node(initializer));
            }
            return self.finish(SyntaxKind::ImplicitObjectCreationExpression, children);
        }
        if self.is_token(SyntaxKind::OpenBraceToken) {
            // `new { ... }`: tolerate the absent type.
            self.error_type_expected();
            let bad_type = self.error_node();
            let initializer = self.parse_initializer_expression();
            let mut children = self.builder();
            children.push(GreenElement::Token(new_keyword));
            children.push(GreenElement::Node(bad_type));
            children.push(GreenElement::Node(initializer));
            return self.finish(SyntaxKind::ObjectCreationExpression, children);
        }

        let target_type = self.parse_type_core(TypeParseMode::NewExpression);
        if self.is_token(SyntaxKind::OpenBracketToken) {
            let mut children = self.builder();
            children.push(GreenElement::Token(new_keyword));
            children.push(GreenElement::Node(target_type));
            let mut first = true;
            while self.is_token(SyntaxKind::OpenBracketToken) {
                let rank = self.parse_array_rank_specifier(first);
                children.push(GreenElement::Node(rank));
                first = false;
            }
            if self.is_token(SyntaxKind::OpenBraceToken) {
                let initializer = self.parse_initializer_expression();
                children.push(GreenElement::Node(initializer));
            }
            return self.finish(SyntaxKind::ArrayCreationExpression, children);
        }

        let mut children = self.builder();
        children.push(GreenElement::Token(new_keyword));
        children.push(GreenElement::Node(target_type));
        let mut has_parts = false;
        if self.is_token(SyntaxKind::OpenParenToken) {
            children.push(GreenElement::Node(self.parse_argument_list()));
            has_parts = true;
        }
        if self.is_token(SyntaxKind::OpenBraceToken) {
            children.push(GreenElement::Node(self.parse_initializer_expression()));
            has_parts = true;
        }
        if !has_parts {
            self.error_expected(SyntaxKind::OpenParenToken);
            children.push(GreenElement::Token(
                self.eat_missing(SyntaxKind::OpenParenToken),
            ));
            children.push(GreenElement::Token(
                self.eat_missing(SyntaxKind::CloseParenToken),
            ));
        }
        self.finish(SyntaxKind::ObjectCreationExpression, children)
    }

    /// Distinguish `new (int, string)[3]` (tuple-typed creation) from
    /// target-typed `new(...)`.
    fn new_paren_is_tuple_type(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let flags = self.scan_type();
        let result = flags != ScanTypeFlags::NotType
            && matches!(
                self.token(),
                SyntaxKind::OpenBracketToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::OpenParenToken
            );
        self.restore(checkpoint);
        result
    }

    /// `{ element, ... }` object, collection, or nested initializer.
    pub(crate) fn parse_initializer_expression(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_INITIALIZER, |p| {
            if !p.is_token(SyntaxKind::CloseBraceToken) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma_trailing(),
                    |p| {
                        kind_can_start_expression(p.token())
                            || p.is_token(SyntaxKind::OpenBraceToken)
                    },
                    |p| {
                        if p.is_token(SyntaxKind::OpenBraceToken) {
                            p.parse_initializer_expression()
                        } else {
                            p.parse_expression()
                        }
                    },
                    "Expression expected",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
            }
        });
        let close = self.parse_expected(SyntaxKind::CloseBraceToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::InitializerExpression, children)
    }

    // =========================================================================
    // Lambdas
    // =========================================================================

    pub(crate) fn parse_lambda_expression(&mut self) -> NodeIndex {
        let mut children = self.builder();
        let mut body_context = 0u32;
        if self.is_contextual(SyntaxKind::AsyncKeyword)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::Identifier | SyntaxKind::OpenParenToken
            )
        {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::AsyncKeyword)));
            body_context = CONTEXT_FLAG_ASYNC;
        }
        let node_kind = if self.is_token(SyntaxKind::Identifier) {
            let identifier = self.eat_token();
            let mut parameter = self.builder();
            parameter.push(GreenElement::Token(identifier));
            let parameter = self.finish(SyntaxKind::Parameter, parameter);
            children.push(GreenElement::Node(parameter));
            SyntaxKind::SimpleLambdaExpression
        } else {
            children.push(GreenElement::Node(self.parse_lambda_parameter_list()));
            SyntaxKind::ParenthesizedLambdaExpression
        };
        children.push(GreenElement::Token(
            self.parse_expected(SyntaxKind::EqualsGreaterThanToken),
        ));
        let body = self.with_context(body_context, |p| {
            if p.is_token(SyntaxKind::OpenBraceToken) {
                p.parse_block()
            } else {
                p.parse_expression()
            }
        });
        children.push(GreenElement::Node(body));
        self.finish(node_kind, children)
    }

    fn parse_lambda_parameter_list(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_PARAMETER_LIST, |p| {
            if !p.is_token(SyntaxKind::CloseParenToken) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma(),
                    |p| {
                        p.is_possible_type_start()
                            || matches!(
                                p.token(),
                                SyntaxKind::RefKeyword
                                    | SyntaxKind::OutKeyword
                                    | SyntaxKind::InKeyword
                            )
                    },
                    |p| p.parse_lambda_parameter(),
                    "Identifier expected",
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
            }
        });
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::ParameterList, children)
    }

    fn parse_lambda_parameter(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while matches!(
            self.token(),
            SyntaxKind::RefKeyword | SyntaxKind::OutKeyword | SyntaxKind::InKeyword
        ) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        let implicitly_typed = self.is_token(SyntaxKind::Identifier)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::CommaToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::EqualsGreaterThanToken
                    | SyntaxKind::EqualsToken
            );
        if implicitly_typed {
            children.push(GreenElement::Token(self.eat_token()));
        } else {
            children.push(GreenElement::Node(self.parse_type()));
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        }
        if self.is_token(SyntaxKind::EqualsToken) {
            children.push(GreenElement::Node(self.parse_equals_value_clause()));
        }
        self.finish(SyntaxKind::Parameter, children)
    }

    pub(crate) fn parse_equals_value_clause(&mut self) -> NodeIndex {
        let equals = self.parse_expected(SyntaxKind::EqualsToken);
        let value = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Token(equals));
        children.push(GreenElement::Node(value));
        self.finish(SyntaxKind::EqualsValueClause, children)
    }

    // =========================================================================
    // Switch and with expressions
    // =========================================================================

    fn parse_switch_expression_suffix(&mut self, governing: NodeIndex) -> NodeIndex {
        let keyword = self.eat_token();
        self.check_feature(LanguageFeature::SwitchExpressions);
        let mut children = self.builder();
        children.push(GreenElement::Node(governing));
        children.push(GreenElement::Token(keyword));
        let open = self.parse_expected(SyntaxKind::OpenBraceToken);
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_INITIALIZER, |p| {
            if !p.is_token(SyntaxKind::CloseBraceToken) {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma_trailing(),
                    |p| p.is_possible_pattern_start(),
                    |p| p.parse_switch_expression_arm(),
                    "Pattern expected",
                    diagnostic_codes::PATTERN_EXPECTED,
                );
            }
        });
        let close = self.parse_expected(SyntaxKind::CloseBraceToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::SwitchExpression, children)
    }

    fn parse_switch_expression_arm(&mut self) -> NodeIndex {
        let pattern = self.parse_pattern();
        let mut children = self.builder();
        children.push(GreenElement::Node(pattern));
        if self.is_contextual(SyntaxKind::WhenKeyword) {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::WhenKeyword)));
            let condition = self.parse_expression();
            children.push(GreenElement::Node(condition));
        }
        children.push(GreenElement::Token(
            self.parse_expected(SyntaxKind::EqualsGreaterThanToken),
        ));
        let value = self.parse_expression();
        children.push(GreenElement::Node(value));
        self.finish(SyntaxKind::SwitchExpressionArm, children)
    }

    fn parse_with_expression_suffix(&mut self, left: NodeIndex) -> NodeIndex {
        let keyword = self.eat_token_as(SyntaxKind::WithKeyword);
        self.check_feature(LanguageFeature::WithExpressions);
        let initializer = self.parse_initializer_expression();
        let mut children = self.builder();
        children.push(GreenElement::Node(left));
        children.push(GreenElement::Token(keyword));
        children.push(GreenElement::Node(initializer));
        self.finish(SyntaxKind::WithExpression, children)
    }
}
