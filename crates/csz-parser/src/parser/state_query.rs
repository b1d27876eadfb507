//! Query comprehension productions (`from x in xs where ... select ...`).
//!
//! Every query keyword is contextual: the scanner hands them over as
//! identifiers and the parser commits them clause by clause. The query
//! context flag is active for the whole comprehension and is captured on the
//! nodes built under it.

use csz_scanner::SyntaxKind;

use super::arena::{GreenElement, NodeIndex};
use super::state::{CONTEXT_FLAG_QUERY, ParserState};

impl ParserState {
    pub(crate) fn parse_query_expression(&mut self) -> NodeIndex {
        self.with_context(CONTEXT_FLAG_QUERY, |p| {
            let from = p.parse_from_clause();
            let body = p.parse_query_body();
            let mut children = p.builder();
            children.push(GreenElement::Node(from));
            children.push(GreenElement::Node(body));
            p.finish(SyntaxKind::QueryExpression, children)
        })
    }

    fn parse_from_clause(&mut self) -> NodeIndex {
        let from = self.eat_token_as(SyntaxKind::FromKeyword);
        let mut children = self.builder();
        children.push(GreenElement::Token(from));
        // `from T x in e` vs `from x in e`.
        if !(self.is_token(SyntaxKind::Identifier) && self.peek_kind(1) == SyntaxKind::InKeyword) {
            children.push(GreenElement::Node(self.parse_type()));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::InKeyword)));
        let source = self.parse_expression();
        children.push(GreenElement::Node(source));
        self.finish(SyntaxKind::FromClause, children)
    }

    fn parse_query_body(&mut self) -> NodeIndex {
        let mut children = self.builder();
        loop {
            let clause = if self.is_contextual(SyntaxKind::FromKeyword) {
                self.parse_from_clause()
            } else if self.is_contextual(SyntaxKind::LetKeyword) {
                self.parse_let_clause()
            } else if self.is_contextual(SyntaxKind::WhereKeyword) {
                self.parse_where_clause()
            } else if self.is_contextual(SyntaxKind::JoinKeyword) {
                self.parse_join_clause()
            } else if self.is_contextual(SyntaxKind::OrderByKeyword) {
                self.parse_orderby_clause()
            } else {
                break;
            };
            children.push(GreenElement::Node(clause));
        }

        if self.is_contextual(SyntaxKind::SelectKeyword) {
            children.push(GreenElement::Node(self.parse_select_clause()));
        } else if self.is_contextual(SyntaxKind::GroupKeyword) {
            children.push(GreenElement::Node(self.parse_group_clause()));
        } else {
            self.parse_error_at_current_token(
                "Expected 'select' or 'group'",
                csz_common::diagnostics::diagnostic_codes::EXPRESSION_EXPECTED,
            );
        }

        if self.is_contextual(SyntaxKind::IntoKeyword) {
            let into = self.eat_token_as(SyntaxKind::IntoKeyword);
            let identifier = self.parse_expected(SyntaxKind::Identifier);
            let body = self.recurse(|p| p.parse_query_body(), |p| p.error_node());
            let mut continuation = self.builder();
            continuation.push(GreenElement::Token(into));
            continuation.push(GreenElement::Token(identifier));
            continuation.push(GreenElement::Node(body));
            let continuation = self.finish(SyntaxKind::QueryContinuation, continuation);
            children.push(GreenElement::Node(continuation));
        }
        self.finish(SyntaxKind::QueryBody, children)
    }

    fn parse_let_clause(&mut self) -> NodeIndex {
        let let_keyword = self.eat_token_as(SyntaxKind::LetKeyword);
        let identifier = self.parse_expected(SyntaxKind::Identifier);
        let equals = self.parse_expected(SyntaxKind::EqualsToken);
        let value = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Token(let_keyword));
        children.push(GreenElement::Token(identifier));
        children.push(GreenElement::Token(equals));
        children.push(GreenElement::Node(value));
        self.finish(SyntaxKind::LetClause, children)
    }

    fn parse_where_clause(&mut self) -> NodeIndex {
        let where_keyword = self.eat_token_as(SyntaxKind::WhereKeyword);
        let condition = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Token(where_keyword));
        children.push(GreenElement::Node(condition));
        self.finish(SyntaxKind::WhereClause, children)
    }

    fn parse_join_clause(&mut self) -> NodeIndex {
        let join = self.eat_token_as(SyntaxKind::JoinKeyword);
        let mut children = self.builder();
        children.push(GreenElement::Token(join));
        if !(self.is_token(SyntaxKind::Identifier) && self.peek_kind(1) == SyntaxKind::InKeyword) {
            children.push(GreenElement::Node(self.parse_type()));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::InKeyword)));
        children.push(GreenElement::Node(self.parse_expression()));
        if self.is_contextual(SyntaxKind::OnKeyword) {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::OnKeyword)));
        } else {
            self.parse_error_at_current_token(
                "'on' expected",
                csz_common::diagnostics::diagnostic_codes::TOKEN_EXPECTED,
            );
        }
        children.push(GreenElement::Node(self.parse_expression()));
        if self.is_contextual(SyntaxKind::EqualsKeyword) {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::EqualsKeyword)));
        } else {
            self.parse_error_at_current_token(
                "'equals' expected",
                csz_common::diagnostics::diagnostic_codes::TOKEN_EXPECTED,
            );
        }
        children.push(GreenElement::Node(self.parse_expression()));
        if self.is_contextual(SyntaxKind::IntoKeyword) {
            let into = self.eat_token_as(SyntaxKind::IntoKeyword);
            let identifier = self.parse_expected(SyntaxKind::Identifier);
            let mut into_children = self.builder();
            into_children.push(GreenElement::Token(into));
            into_children.push(GreenElement::Token(identifier));
            let into_clause = self.finish(SyntaxKind::JoinIntoClause, into_children);
            children.push(GreenElement::Node(into_clause));
        }
        self.finish(SyntaxKind::JoinClause, children)
    }

    fn parse_orderby_clause(&mut self) -> NodeIndex {
        let orderby = self.eat_token_as(SyntaxKind::OrderByKeyword);
        let mut children = self.builder();
        children.push(GreenElement::Token(orderby));
        loop {
            children.push(GreenElement::Node(self.parse_ordering()));
            if self.is_token(SyntaxKind::CommaToken) {
                children.push(GreenElement::Token(self.eat_token()));
                continue;
            }
            break;
        }
        self.finish(SyntaxKind::OrderByClause, children)
    }

    fn parse_ordering(&mut self) -> NodeIndex {
        let expression = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Node(expression));
        if self.is_contextual(SyntaxKind::AscendingKeyword) {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::AscendingKeyword)));
        } else if self.is_contextual(SyntaxKind::DescendingKeyword) {
            children.push(GreenElement::Token(
                self.eat_token_as(SyntaxKind::DescendingKeyword),
            ));
        }
        self.finish(SyntaxKind::Ordering, children)
    }

    fn parse_select_clause(&mut self) -> NodeIndex {
        let select = self.eat_token_as(SyntaxKind::SelectKeyword);
        let expression = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Token(select));
        children.push(GreenElement::Node(expression));
        self.finish(SyntaxKind::SelectClause, children)
    }

    fn parse_group_clause(&mut self) -> NodeIndex {
        let group = self.eat_token_as(SyntaxKind::GroupKeyword);
        let group_expression = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Token(group));
        children.push(GreenElement::Node(group_expression));
        if self.is_contextual(SyntaxKind::ByKeyword) {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::ByKeyword)));
        } else {
            self.parse_error_at_current_token(
                "'by' expected",
                csz_common::diagnostics::diagnostic_codes::TOKEN_EXPECTED,
            );
        }
        let by_expression = self.parse_expression();
        children.push(GreenElement::Node(by_expression));
        self.finish(SyntaxKind::GroupClause, children)
    }
}
