//! Statement productions: blocks, control flow, local declarations, local
//! functions, and the statement-level declaration/expression split.

use csz_common::diagnostics::diagnostic_codes;
use csz_scanner::SyntaxKind;

use super::arena::{ChildList, GreenElement, NodeIndex};
use super::lists::ListOptions;
use super::state::{CONTEXT_FLAG_ASYNC, ParserState, TerminatorFlags};
use super::state_expressions::kind_can_start_expression;

impl ParserState {
    /// Token could begin a statement. Consulted by the statement-level
    /// terminator bit and by list recovery.
    pub(crate) fn is_statement_start(&self) -> bool {
        match self.token() {
            SyntaxKind::OpenBraceToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::IfKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ForeachKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::UsingKeyword
            | SyntaxKind::GotoKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::StaticKeyword => true,
            kind => kind_can_start_expression(kind),
        }
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_POSSIBLE_STATEMENT_START_OR_STOP, |p| {
            p.parse_statement_list(&mut children);
        });
        let close = self.parse_expected(SyntaxKind::CloseBraceToken);
        children.push(GreenElement::Token(close));
        self.finish(SyntaxKind::Block, children)
    }

    pub(crate) fn parse_statement_list(&mut self, children: &mut ChildList) {
        loop {
            if self.is_token(SyntaxKind::CloseBraceToken) || self.cursor.is_at_end() {
                break;
            }
            if self.is_statement_start() {
                let before = self.cursor.position();
                let statement = self.parse_statement();
                children.push(GreenElement::Node(statement));
                if self.cursor.position() == before {
                    self.force_skip_token(
                        "Declaration or statement expected",
                        diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                    );
                }
                continue;
            }
            let skipped = self.skip_bad_tokens(
                "Declaration or statement expected",
                diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                |p| p.is_statement_start() || p.is_token(SyntaxKind::CloseBraceToken),
            );
            if !skipped {
                break;
            }
        }
    }

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        self.recurse(|p| p.parse_statement_core(), |p| p.error_node())
    }

    fn parse_statement_core(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let semicolon = self.eat_token();
                let mut children = self.builder();
                children.push(GreenElement::Token(semicolon));
                self.finish(SyntaxKind::EmptyStatement, children)
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ForeachKeyword => self.parse_foreach_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_like_statement(
                SyntaxKind::ReturnStatement,
                true,
            ),
            SyntaxKind::ThrowKeyword => self.parse_return_like_statement(
                SyntaxKind::ThrowStatement,
                true,
            ),
            SyntaxKind::BreakKeyword => {
                self.parse_return_like_statement(SyntaxKind::BreakStatement, false)
            }
            SyntaxKind::ContinueKeyword => {
                self.parse_return_like_statement(SyntaxKind::ContinueStatement, false)
            }
            SyntaxKind::UsingKeyword => self.parse_using_statement(),
            SyntaxKind::GotoKeyword => self.parse_goto_statement(),
            SyntaxKind::ConstKeyword => {
                let modifier = self.eat_token();
                self.parse_local_declaration_statement(Some(modifier))
            }
            SyntaxKind::ElseKeyword => self.parse_misplaced_else(),
            _ => {
                if self.is_contextual(SyntaxKind::YieldKeyword)
                    && matches!(
                        self.peek_kind(1),
                        SyntaxKind::ReturnKeyword | SyntaxKind::BreakKeyword
                    )
                {
                    return self.parse_yield_statement();
                }
                if self.is_token(SyntaxKind::Identifier)
                    && self.peek_kind(1) == SyntaxKind::ColonToken
                {
                    return self.parse_labeled_statement();
                }
                if self.is_token(SyntaxKind::StaticKeyword)
                    || self.is_contextual(SyntaxKind::AsyncKeyword)
                {
                    if let Some(statement) = self.try_parse_modified_local_function() {
                        return statement;
                    }
                }
                if self.is_possible_declaration_statement() {
                    return self.parse_local_declaration_or_function(None, false);
                }
                self.parse_expression_statement()
            }
        }
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let expression = self.parse_expression();
        let semicolon = self.parse_expected(SyntaxKind::SemicolonToken);
        let mut children = self.builder();
        children.push(GreenElement::Node(expression));
        children.push(GreenElement::Token(semicolon));
        self.finish(SyntaxKind::ExpressionStatement, children)
    }

    /// `static`/`async` local functions: commit only when a declaration
    /// header follows the modifiers.
    fn try_parse_modified_local_function(&mut self) -> Option<NodeIndex> {
        let checkpoint = self.checkpoint();
        let mut modifiers = 0usize;
        while self.is_token(SyntaxKind::StaticKeyword)
            || self.is_contextual(SyntaxKind::AsyncKeyword)
        {
            self.next_token();
            modifiers += 1;
        }
        let possible = modifiers > 0 && self.is_possible_declaration_statement();
        self.restore(checkpoint);
        if !possible {
            return None;
        }
        let mut tokens = self.builder();
        let mut is_async = false;
        for _ in 0..modifiers {
            let token = if self.is_contextual(SyntaxKind::AsyncKeyword) {
                is_async = true;
                self.eat_token_as(SyntaxKind::AsyncKeyword)
            } else {
                self.eat_token()
            };
            tokens.push(GreenElement::Token(token));
        }
        Some(self.parse_local_declaration_or_function(Some(tokens), is_async))
    }

    // =========================================================================
    // Local declarations and local functions
    // =========================================================================

    /// Shared entry once the declaration-vs-expression resolver has
    /// committed. `int x = 1, y;` or `int F(int a) { ... }`.
    fn parse_local_declaration_or_function(
        &mut self,
        modifiers: Option<ChildList>,
        is_async: bool,
    ) -> NodeIndex {
        let mut children = modifiers.unwrap_or_else(|| self.builder());
        let declaration_type = self.parse_type();
        if self.is_token(SyntaxKind::Identifier)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            return self.parse_local_function_rest(children, declaration_type, is_async);
        }
        let declaration = self.parse_variable_declaration_rest(declaration_type);
        children.push(GreenElement::Node(declaration));
        let semicolon = self.parse_expected(SyntaxKind::SemicolonToken);
        children.push(GreenElement::Token(semicolon));
        self.finish(SyntaxKind::LocalDeclarationStatement, children)
    }

    fn parse_local_declaration_statement(
        &mut self,
        modifier: Option<super::arena::TokenIndex>,
    ) -> NodeIndex {
        let mut children = self.builder();
        if let Some(token) = modifier {
            children.push(GreenElement::Token(token));
        }
        let declaration_type = self.parse_type();
        let declaration = self.parse_variable_declaration_rest(declaration_type);
        children.push(GreenElement::Node(declaration));
        let semicolon = self.parse_expected(SyntaxKind::SemicolonToken);
        children.push(GreenElement::Token(semicolon));
        self.finish(SyntaxKind::LocalDeclarationStatement, children)
    }

    /// `type declarator (, declarator)*` with the type already parsed.
    pub(crate) fn parse_variable_declaration_rest(
        &mut self,
        declaration_type: NodeIndex,
    ) -> NodeIndex {
        let mut children = self.builder();
        children.push(GreenElement::Node(declaration_type));
        self.with_terminators(
            TerminatorFlags::IS_POSSIBLE_END_OF_VARIABLE_DECLARATION,
            |p| {
                p.parse_separated_list(
                    &mut children,
                    ListOptions::comma_required(),
                    |p| p.is_token(SyntaxKind::Identifier),
                    |p| p.parse_variable_declarator(),
                    "Identifier expected",
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
            },
        );
        self.finish(SyntaxKind::VariableDeclaration, children)
    }

    pub(crate) fn parse_variable_declarator(&mut self) -> NodeIndex {
        let identifier = self.parse_expected(SyntaxKind::Identifier);
        let mut children = self.builder();
        children.push(GreenElement::Token(identifier));
        if self.is_token(SyntaxKind::EqualsToken) {
            children.push(GreenElement::Node(self.parse_equals_value_clause()));
        }
        self.finish(SyntaxKind::VariableDeclarator, children)
    }

    fn parse_local_function_rest(
        &mut self,
        mut children: ChildList,
        return_type: NodeIndex,
        is_async: bool,
    ) -> NodeIndex {
        children.push(GreenElement::Node(return_type));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        if self.is_token(SyntaxKind::LessThanToken) {
            children.push(GreenElement::Node(self.parse_type_parameter_list()));
        }
        children.push(GreenElement::Node(self.parse_parameter_list()));
        while self.is_contextual(SyntaxKind::WhereKeyword) {
            children.push(GreenElement::Node(self.parse_type_parameter_constraint_clause()));
        }
        let context = if is_async { CONTEXT_FLAG_ASYNC } else { 0 };
        if self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            let clause = self.with_context(context, |p| p.parse_arrow_expression_clause());
            children.push(GreenElement::Node(clause));
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        } else {
            let body = self.with_context(context, |p| p.parse_block());
            children.push(GreenElement::Node(body));
        }
        self.finish(SyntaxKind::LocalFunctionStatement, children)
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if_statement(&mut self) -> NodeIndex {
        let if_keyword = self.eat_token();
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        let mut children = self.builder();
        children.push(GreenElement::Token(if_keyword));
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(condition));
        children.push(GreenElement::Token(close));
        children.push(GreenElement::Node(body));
        if self.is_token(SyntaxKind::ElseKeyword) {
            let else_keyword = self.eat_token();
            let else_body = self.parse_statement();
            let mut clause = self.builder();
            clause.push(GreenElement::Token(else_keyword));
            clause.push(GreenElement::Node(else_body));
            let clause = self.finish(SyntaxKind::ElseClause, clause);
            children.push(GreenElement::Node(clause));
        }
        self.finish(SyntaxKind::IfStatement, children)
    }

    fn parse_misplaced_else(&mut self) -> NodeIndex {
        self.parse_error_at_current_token(
            "'else' cannot start a statement",
            diagnostic_codes::ELSE_WITHOUT_IF,
        );
        let else_keyword = self.eat_token();
        let body = self.parse_statement();
        let mut children = self.builder();
        children.push(GreenElement::Token(else_keyword));
        children.push(GreenElement::Node(body));
        self.finish(SyntaxKind::ElseClause, children)
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let while_keyword = self.eat_token();
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        let mut children = self.builder();
        children.push(GreenElement::Token(while_keyword));
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(condition));
        children.push(GreenElement::Token(close));
        children.push(GreenElement::Node(body));
        self.finish(SyntaxKind::WhileStatement, children)
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let do_keyword = self.eat_token();
        let body = self.parse_statement();
        let while_keyword = self.parse_expected(SyntaxKind::WhileKeyword);
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let semicolon = self.parse_expected(SyntaxKind::SemicolonToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(do_keyword));
        children.push(GreenElement::Node(body));
        children.push(GreenElement::Token(while_keyword));
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(condition));
        children.push(GreenElement::Token(close));
        children.push(GreenElement::Token(semicolon));
        self.finish(SyntaxKind::DoStatement, children)
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let for_keyword = self.eat_token();
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(for_keyword));
        children.push(GreenElement::Token(open));

        // Initializer: declaration or expression list.
        if !self.is_token(SyntaxKind::SemicolonToken) {
            if self.is_possible_declaration_statement() {
                let declaration_type = self.parse_type();
                let declaration = self.parse_variable_declaration_rest(declaration_type);
                children.push(GreenElement::Node(declaration));
            } else {
                self.parse_for_expression_list(&mut children);
            }
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        if !self.is_token(SyntaxKind::SemicolonToken) {
            let condition = self.parse_expression();
            children.push(GreenElement::Node(condition));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        if !self.is_token(SyntaxKind::CloseParenToken) {
            self.parse_for_expression_list(&mut children);
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
        let body = self.parse_statement();
        children.push(GreenElement::Node(body));
        self.finish(SyntaxKind::ForStatement, children)
    }

    fn parse_for_expression_list(&mut self, children: &mut ChildList) {
        self.with_terminators(
            TerminatorFlags::IS_POSSIBLE_END_OF_VARIABLE_DECLARATION,
            |p| {
                p.parse_separated_list(
                    children,
                    ListOptions::comma(),
                    |p| kind_can_start_expression(p.token()),
                    |p| p.parse_expression(),
                    "Expression expected",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
            },
        );
    }

    fn parse_foreach_statement(&mut self) -> NodeIndex {
        let foreach_keyword = self.eat_token();
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let iteration_type = self.parse_type();
        let designation = self.parse_designation();
        let in_keyword = self.parse_expected(SyntaxKind::InKeyword);
        let source = self.parse_expression();
        let close = self.parse_expected(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        let mut children = self.builder();
        children.push(GreenElement::Token(foreach_keyword));
        children.push(GreenElement::Token(open));
        children.push(GreenElement::Node(iteration_type));
        children.push(GreenElement::Node(designation));
        children.push(GreenElement::Token(in_keyword));
        children.push(GreenElement::Node(source));
        children.push(GreenElement::Token(close));
        children.push(GreenElement::Node(body));
        self.finish(SyntaxKind::ForEachStatement, children)
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let switch_keyword = self.eat_token();
        let open_paren = self.parse_expected(SyntaxKind::OpenParenToken);
        let governing = self.parse_expression();
        let close_paren = self.parse_expected(SyntaxKind::CloseParenToken);
        let open_brace = self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(switch_keyword));
        children.push(GreenElement::Token(open_paren));
        children.push(GreenElement::Node(governing));
        children.push(GreenElement::Token(close_paren));
        children.push(GreenElement::Token(open_brace));
        while matches!(
            self.token(),
            SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
        ) {
            let section = self.parse_switch_section();
            children.push(GreenElement::Node(section));
        }
        let close_brace = self.parse_expected(SyntaxKind::CloseBraceToken);
        children.push(GreenElement::Token(close_brace));
        self.finish(SyntaxKind::SwitchStatement, children)
    }

    fn parse_switch_section(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while matches!(
            self.token(),
            SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
        ) {
            children.push(GreenElement::Node(self.parse_switch_label()));
        }
        self.with_terminators(TerminatorFlags::IS_END_OF_SWITCH_SECTION, |p| {
            loop {
                if matches!(
                    p.token(),
                    SyntaxKind::CaseKeyword
                        | SyntaxKind::DefaultKeyword
                        | SyntaxKind::CloseBraceToken
                ) || p.cursor.is_at_end()
                {
                    break;
                }
                if p.is_statement_start() {
                    let before = p.cursor.position();
                    let statement = p.parse_statement();
                    children.push(GreenElement::Node(statement));
                    if p.cursor.position() == before {
                        p.force_skip_token(
                            "Declaration or statement expected",
                            diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                        );
                    }
                    continue;
                }
                let skipped = p.skip_bad_tokens(
                    "Declaration or statement expected",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                    |p| p.is_statement_start(),
                );
                if !skipped {
                    break;
                }
            }
        });
        self.finish(SyntaxKind::SwitchSection, children)
    }

    fn parse_switch_label(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::DefaultKeyword) {
            let keyword = self.eat_token();
            let colon = self.parse_expected(SyntaxKind::ColonToken);
            let mut children = self.builder();
            children.push(GreenElement::Token(keyword));
            children.push(GreenElement::Token(colon));
            return self.finish(SyntaxKind::DefaultSwitchLabel, children);
        }
        let case_keyword = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(case_keyword));
        let pattern = self.parse_pattern();
        let is_pattern_label = !matches!(
            self.arena.kind(pattern),
            SyntaxKind::ConstantPattern
        ) || self.is_contextual(SyntaxKind::WhenKeyword);
        children.push(GreenElement::Node(pattern));
        if self.is_contextual(SyntaxKind::WhenKeyword) {
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::WhenKeyword)));
            let condition = self.parse_expression();
            children.push(GreenElement::Node(condition));
        }
        let colon = self.parse_expected(SyntaxKind::ColonToken);
        children.push(GreenElement::Token(colon));
        let kind = if is_pattern_label {
            SyntaxKind::CasePatternSwitchLabel
        } else {
            SyntaxKind::CaseSwitchLabel
        };
        self.finish(kind, children)
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let try_keyword = self.eat_token();
        let block = self.parse_block();
        let mut children = self.builder();
        children.push(GreenElement::Token(try_keyword));
        children.push(GreenElement::Node(block));
        let mut handled = false;
        while self.is_token(SyntaxKind::CatchKeyword) {
            children.push(GreenElement::Node(self.parse_catch_clause()));
            handled = true;
        }
        if self.is_token(SyntaxKind::FinallyKeyword) {
            let finally_keyword = self.eat_token();
            let finally_block = self.parse_block();
            let mut clause = self.builder();
            clause.push(GreenElement::Token(finally_keyword));
            clause.push(GreenElement::Node(finally_block));
            let clause = self.finish(SyntaxKind::FinallyClause, clause);
            children.push(GreenElement::Node(clause));
            handled = true;
        }
        if !handled {
            self.parse_error_at_current_token(
                "Expected catch or finally",
                diagnostic_codes::CATCH_OR_FINALLY_EXPECTED,
            );
        }
        self.finish(SyntaxKind::TryStatement, children)
    }

    fn parse_catch_clause(&mut self) -> NodeIndex {
        let catch_keyword = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(catch_keyword));
        if self.is_token(SyntaxKind::OpenParenToken) {
            let open = self.eat_token();
            let exception_type = self.parse_type();
            let mut declaration = self.builder();
            declaration.push(GreenElement::Token(open));
            declaration.push(GreenElement::Node(exception_type));
            if self.is_token(SyntaxKind::Identifier) {
                declaration.push(GreenElement::Token(self.eat_token()));
            }
            declaration.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
            let declaration = self.finish(SyntaxKind::CatchDeclaration, declaration);
            children.push(GreenElement::Node(declaration));
        }
        if self.is_contextual(SyntaxKind::WhenKeyword) {
            let when_keyword = self.eat_token_as(SyntaxKind::WhenKeyword);
            let open = self.parse_expected(SyntaxKind::OpenParenToken);
            let condition = self.parse_expression();
            let close = self.parse_expected(SyntaxKind::CloseParenToken);
            let mut filter = self.builder();
            filter.push(GreenElement::Token(when_keyword));
            filter.push(GreenElement::Token(open));
            filter.push(GreenElement::Node(condition));
            filter.push(GreenElement::Token(close));
            let filter = self.finish(SyntaxKind::CatchFilterClause, filter);
            children.push(GreenElement::Node(filter));
        }
        children.push(GreenElement::Node(self.parse_block()));
        self.finish(SyntaxKind::CatchClause, children)
    }

    /// `return [expr];`, `throw [expr];`, `break;`, `continue;`.
    fn parse_return_like_statement(
        &mut self,
        kind: SyntaxKind,
        allow_operand: bool,
    ) -> NodeIndex {
        let keyword = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(keyword));
        if allow_operand
            && !self.is_token(SyntaxKind::SemicolonToken)
            && kind_can_start_expression(self.token())
        {
            let operand = self.parse_expression();
            children.push(GreenElement::Node(operand));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        self.finish(kind, children)
    }

    fn parse_yield_statement(&mut self) -> NodeIndex {
        let yield_keyword = self.eat_token_as(SyntaxKind::YieldKeyword);
        let mut children = self.builder();
        children.push(GreenElement::Token(yield_keyword));
        if self.is_token(SyntaxKind::BreakKeyword) {
            children.push(GreenElement::Token(self.eat_token()));
        } else {
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::ReturnKeyword)));
            let operand = self.parse_expression();
            children.push(GreenElement::Node(operand));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        self.finish(SyntaxKind::YieldStatement, children)
    }

    fn parse_goto_statement(&mut self) -> NodeIndex {
        let goto_keyword = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(goto_keyword));
        match self.token() {
            SyntaxKind::CaseKeyword => {
                children.push(GreenElement::Token(self.eat_token()));
                let value = self.parse_expression();
                children.push(GreenElement::Node(value));
            }
            SyntaxKind::DefaultKeyword => {
                children.push(GreenElement::Token(self.eat_token()));
            }
            _ => {
                children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
            }
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        self.finish(SyntaxKind::GotoStatement, children)
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let label = self.eat_token();
        let colon = self.eat_token();
        let statement = self.parse_statement();
        let mut children = self.builder();
        children.push(GreenElement::Token(label));
        children.push(GreenElement::Token(colon));
        children.push(GreenElement::Node(statement));
        self.finish(SyntaxKind::LabeledStatement, children)
    }

    /// `using (resource) statement` or a `using`-prefixed local declaration.
    fn parse_using_statement(&mut self) -> NodeIndex {
        let using_keyword = self.eat_token();
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return self.parse_local_declaration_statement(Some(using_keyword));
        }
        let open = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(using_keyword));
        children.push(GreenElement::Token(open));
        if self.is_possible_declaration_statement() {
            let resource_type = self.parse_type();
            let declaration = self.parse_variable_declaration_rest(resource_type);
            children.push(GreenElement::Node(declaration));
        } else {
            let resource = self.parse_expression();
            children.push(GreenElement::Node(resource));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
        let body = self.parse_statement();
        children.push(GreenElement::Node(body));
        self.finish(SyntaxKind::UsingStatement, children)
    }
}
