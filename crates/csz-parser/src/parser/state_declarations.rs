//! Declaration productions: compilation units, using directives, namespaces,
//! type declarations, members, parameters, and attribute lists.
//!
//! Top-level loops are the cancellation poll points and the only place the
//! incremental-reuse cursor is consulted.

use csz_common::cancellation::Cancelled;
use csz_common::diagnostics::diagnostic_codes;
use csz_scanner::SyntaxKind;
use smallvec::SmallVec;

use super::arena::{ChildList, GreenElement, NodeIndex};
use super::features::LanguageFeature;
use super::lists::ListOptions;
use super::state::{CONTEXT_FLAG_ASYNC, ParserState, TerminatorFlags};

/// Declaration modifiers, in any order. Contextual modifiers (`partial`,
/// `async`) are recognized separately.
fn is_modifier(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PublicKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::InternalKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::ReadonlyKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::SealedKeyword
            | SyntaxKind::VirtualKeyword
            | SyntaxKind::OverrideKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::ConstKeyword
    )
}

fn is_type_declaration_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ClassKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::EnumKeyword
    )
}

impl ParserState {
    /// Token could begin a namespace-level member. Consulted by the
    /// namespace-level terminator bit.
    pub(crate) fn is_namespace_member_start(&self) -> bool {
        let kind = self.token();
        if is_modifier(kind) && kind != SyntaxKind::NewKeyword {
            return true;
        }
        match kind {
            SyntaxKind::UsingKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::OpenBracketToken => true,
            _ if is_type_declaration_keyword(kind) => true,
            _ => {
                self.is_contextual(SyntaxKind::RecordKeyword)
                    || self.is_contextual(SyntaxKind::PartialKeyword)
            }
        }
    }

    /// Token could begin a type member. Consulted by the member-level
    /// terminator bit.
    pub(crate) fn is_possible_member_start(&self) -> bool {
        let kind = self.token();
        if is_modifier(kind) || is_type_declaration_keyword(kind) {
            return true;
        }
        match kind {
            SyntaxKind::OpenBracketToken
            | SyntaxKind::VoidKeyword
            | SyntaxKind::Identifier => true,
            _ => {
                self.is_possible_type_start()
                    || self.is_contextual(SyntaxKind::RecordKeyword)
                    || self.is_contextual(SyntaxKind::PartialKeyword)
                    || self.is_contextual(SyntaxKind::AsyncKeyword)
            }
        }
    }

    // =========================================================================
    // Compilation unit and namespaces
    // =========================================================================

    pub(crate) fn parse_compilation_unit_core(&mut self) -> Result<NodeIndex, Cancelled> {
        let mut children = self.builder();
        self.with_terminators(
            TerminatorFlags::IS_NAMESPACE_MEMBER_START_OR_STOP,
            |p| p.parse_namespace_members(&mut children, false),
        )?;
        let eof = self.parse_expected(SyntaxKind::EndOfFileToken);
        children.push(GreenElement::Token(eof));
        Ok(self.finish(SyntaxKind::CompilationUnit, children))
    }

    /// Members of a compilation unit or namespace body. `inside_braces`
    /// stops at the closing brace instead of treating it as skippable.
    fn parse_namespace_members(
        &mut self,
        children: &mut ChildList,
        inside_braces: bool,
    ) -> Result<(), Cancelled> {
        loop {
            self.poll_cancellation()?;
            if self.cursor.is_at_end() || self.is_token(SyntaxKind::EndOfFileToken) {
                break;
            }
            if self.is_stack_exhausted() {
                // The guard fired somewhere below: absorb the rest of the
                // input as one opaque node instead of grinding through it.
                let collapsed = self.collapse_remaining_input();
                children.push(GreenElement::Node(collapsed));
                break;
            }
            if self.is_token(SyntaxKind::CloseBraceToken) {
                if inside_braces {
                    break;
                }
                // Stray close brace at the top level. The member-level
                // terminator treats `}` as a stop, so the skip loop would
                // refuse it; drop it unconditionally instead.
                self.force_skip_token(
                    "Declaration or statement expected",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                continue;
            }
            if let Some(reused) = self.try_reuse_top_level() {
                children.push(GreenElement::Node(reused));
                continue;
            }
            let before = self.cursor.position();
            let member = match self.token() {
                SyntaxKind::UsingKeyword
                    if self.peek_kind(1) != SyntaxKind::OpenParenToken
                        && !self.using_is_declaration_statement() =>
                {
                    self.parse_using_directive()
                }
                SyntaxKind::NamespaceKeyword => self.parse_namespace_declaration()?,
                _ if self.is_namespace_member_start() => self.parse_member_declaration(),
                _ if self.is_statement_start() => {
                    let statement = self.parse_statement();
                    let mut wrapper = self.builder();
                    wrapper.push(GreenElement::Node(statement));
                    self.finish(SyntaxKind::GlobalStatement, wrapper)
                }
                _ => {
                    let skipped = self.skip_bad_tokens(
                        "Declaration or statement expected",
                        diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                        |p| p.is_namespace_member_start() || p.is_statement_start(),
                    );
                    if !skipped {
                        if inside_braces {
                            break;
                        }
                        // At the top level nothing may be left unconsumed;
                        // a terminator that blocked the skip still has to go.
                        self.force_skip_token(
                            "Declaration or statement expected",
                            diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                        );
                    }
                    continue;
                }
            };
            children.push(GreenElement::Node(member));
            if self.cursor.position() == before {
                self.force_skip_token(
                    "Declaration or statement expected",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
            }
        }
        Ok(())
    }

    /// `using var x = ...;` at the top level is a statement, not a directive.
    fn using_is_declaration_statement(&self) -> bool {
        self.peek_contextual(1, SyntaxKind::VarKeyword)
            && self.peek_kind(2) == SyntaxKind::Identifier
            && self.peek_kind(3) == SyntaxKind::EqualsToken
    }

    /// `using Name;`, `using static Name;`, `using Alias = Name;`.
    fn parse_using_directive(&mut self) -> NodeIndex {
        let using_keyword = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(using_keyword));
        if self.is_token(SyntaxKind::StaticKeyword) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        if self.is_token(SyntaxKind::Identifier)
            && self.peek_kind(1) == SyntaxKind::EqualsToken
        {
            let alias = self.eat_token();
            let equals = self.eat_token();
            let mut name_equals = self.builder();
            name_equals.push(GreenElement::Token(alias));
            name_equals.push(GreenElement::Token(equals));
            let name_equals = self.finish(SyntaxKind::NameEquals, name_equals);
            children.push(GreenElement::Node(name_equals));
        }
        children.push(GreenElement::Node(self.parse_name()));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        self.finish(SyntaxKind::UsingDirective, children)
    }

    fn parse_namespace_declaration(&mut self) -> Result<NodeIndex, Cancelled> {
        let namespace_keyword = self.eat_token();
        let name = self.parse_name();
        let mut children = self.builder();
        children.push(GreenElement::Token(namespace_keyword));
        children.push(GreenElement::Node(name));
        if self.is_token(SyntaxKind::SemicolonToken) {
            self.check_feature(LanguageFeature::FileScopedNamespaces);
            children.push(GreenElement::Token(self.eat_token()));
            self.parse_namespace_members(&mut children, false)?;
            return Ok(self.finish(SyntaxKind::FileScopedNamespaceDeclaration, children));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::OpenBraceToken)));
        self.parse_namespace_members(&mut children, true)?;
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseBraceToken)));
        if self.is_token(SyntaxKind::SemicolonToken) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        Ok(self.finish(SyntaxKind::NamespaceDeclaration, children))
    }

    // =========================================================================
    // Type declarations and members
    // =========================================================================

    /// Attributes and modifiers, then whatever member follows. Also the
    /// entry used for namespace-level type declarations.
    pub(crate) fn parse_member_declaration(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while self.is_token(SyntaxKind::OpenBracketToken) {
            children.push(GreenElement::Node(self.parse_attribute_list()));
        }
        let is_async = self.parse_modifiers(&mut children);

        if is_type_declaration_keyword(self.token())
            || self.is_contextual(SyntaxKind::RecordKeyword)
        {
            return self.parse_type_declaration_rest(children);
        }
        self.parse_typed_member_rest(children, is_async)
    }

    /// Returns whether an `async` modifier was consumed, so the member body
    /// can treat `await` as an operator.
    fn parse_modifiers(&mut self, children: &mut ChildList) -> bool {
        let mut seen: SmallVec<[SyntaxKind; 8]> = SmallVec::new();
        loop {
            let kind = if is_modifier(self.token()) {
                self.token()
            } else if self.is_contextual(SyntaxKind::PartialKeyword)
                && (is_type_declaration_keyword(self.peek_kind(1))
                    || self.peek_contextual(1, SyntaxKind::RecordKeyword))
            {
                SyntaxKind::PartialKeyword
            } else if self.is_contextual(SyntaxKind::AsyncKeyword)
                && self.peek_kind(1) != SyntaxKind::EqualsGreaterThanToken
                && self.peek_kind(1) != SyntaxKind::OpenParenToken
            {
                SyntaxKind::AsyncKeyword
            } else {
                break;
            };
            if seen.contains(&kind) {
                self.parse_error_at_current_token(
                    &format!("Duplicate '{}' modifier", self.token_text()),
                    diagnostic_codes::DUPLICATE_MODIFIER,
                );
            } else {
                seen.push(kind);
            }
            let token = if self.is_token(kind) {
                self.eat_token()
            } else {
                self.eat_token_as(kind)
            };
            children.push(GreenElement::Token(token));
        }
        seen.contains(&SyntaxKind::AsyncKeyword)
    }

    /// `class`/`struct`/`interface`/`enum`/`record` declaration after any
    /// attributes and modifiers.
    fn parse_type_declaration_rest(&mut self, mut children: ChildList) -> NodeIndex {
        let kind = match self.token() {
            SyntaxKind::ClassKeyword => SyntaxKind::ClassDeclaration,
            SyntaxKind::StructKeyword => SyntaxKind::StructDeclaration,
            SyntaxKind::InterfaceKeyword => SyntaxKind::InterfaceDeclaration,
            SyntaxKind::EnumKeyword => SyntaxKind::EnumDeclaration,
            _ => SyntaxKind::RecordDeclaration,
        };
        if kind == SyntaxKind::RecordDeclaration {
            self.check_feature(LanguageFeature::Records);
            children.push(GreenElement::Token(self.eat_token_as(SyntaxKind::RecordKeyword)));
            // `record class C` / `record struct S`
            if matches!(
                self.token(),
                SyntaxKind::ClassKeyword | SyntaxKind::StructKeyword
            ) {
                children.push(GreenElement::Token(self.eat_token()));
            }
        } else {
            children.push(GreenElement::Token(self.eat_token()));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));

        if kind == SyntaxKind::EnumDeclaration {
            return self.parse_enum_body(children);
        }
        if self.is_token(SyntaxKind::LessThanToken) {
            children.push(GreenElement::Node(self.parse_type_parameter_list()));
        }
        // Primary constructor on records.
        if kind == SyntaxKind::RecordDeclaration && self.is_token(SyntaxKind::OpenParenToken) {
            children.push(GreenElement::Node(self.parse_parameter_list()));
        }
        if self.is_token(SyntaxKind::ColonToken) {
            children.push(GreenElement::Node(self.parse_base_list()));
        }
        while self.is_contextual(SyntaxKind::WhereKeyword) {
            children.push(GreenElement::Node(self.parse_type_parameter_constraint_clause()));
        }
        if kind == SyntaxKind::RecordDeclaration && self.is_token(SyntaxKind::SemicolonToken) {
            children.push(GreenElement::Token(self.eat_token()));
            return self.finish(kind, children);
        }

        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::OpenBraceToken)));
        self.with_terminators(TerminatorFlags::IS_POSSIBLE_MEMBER_START_OR_STOP, |p| {
            loop {
                if p.is_token(SyntaxKind::CloseBraceToken) || p.cursor.is_at_end() {
                    break;
                }
                if p.is_possible_member_start() {
                    let before = p.cursor.position();
                    let member = p.parse_member_declaration();
                    children.push(GreenElement::Node(member));
                    if p.cursor.position() == before {
                        p.force_skip_token(
                            "Member declaration expected",
                            diagnostic_codes::MEMBER_DECLARATION_EXPECTED,
                        );
                    }
                    continue;
                }
                let skipped = p.skip_bad_tokens(
                    "Member declaration expected",
                    diagnostic_codes::MEMBER_DECLARATION_EXPECTED,
                    |p| p.is_possible_member_start(),
                );
                if !skipped {
                    break;
                }
            }
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseBraceToken)));
        if self.is_token(SyntaxKind::SemicolonToken) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        self.finish(kind, children)
    }

    fn parse_enum_body(&mut self, mut children: ChildList) -> NodeIndex {
        if self.is_token(SyntaxKind::ColonToken) {
            children.push(GreenElement::Node(self.parse_base_list()));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::OpenBraceToken)));
        self.with_terminators(TerminatorFlags::IS_END_OF_INITIALIZER, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_trailing().with_wrong_separator(SyntaxKind::SemicolonToken),
                |p| {
                    p.is_token(SyntaxKind::Identifier)
                        || p.is_token(SyntaxKind::OpenBracketToken)
                },
                |p| p.parse_enum_member(),
                "Identifier expected",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseBraceToken)));
        if self.is_token(SyntaxKind::SemicolonToken) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        self.finish(SyntaxKind::EnumDeclaration, children)
    }

    fn parse_enum_member(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while self.is_token(SyntaxKind::OpenBracketToken) {
            children.push(GreenElement::Node(self.parse_attribute_list()));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        if self.is_token(SyntaxKind::EqualsToken) {
            children.push(GreenElement::Node(self.parse_equals_value_clause()));
        }
        self.finish(SyntaxKind::EnumMemberDeclaration, children)
    }

    fn parse_base_list(&mut self) -> NodeIndex {
        let colon = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(colon));
        self.with_terminators(TerminatorFlags::IS_END_OF_CONSTRAINT_CLAUSE, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_required(),
                // A contextual `where` ends the base list; it opens the
                // first constraint clause, not another base type.
                |p| !p.is_contextual(SyntaxKind::WhereKeyword) && p.is_possible_type_start(),
                |p| {
                    let base_type = p.parse_type();
                    let mut wrapper = p.builder();
                    wrapper.push(GreenElement::Node(base_type));
                    p.finish(SyntaxKind::SimpleBaseType, wrapper)
                },
                "Type expected",
                diagnostic_codes::TYPE_EXPECTED,
            );
        });
        self.finish(SyntaxKind::BaseList, children)
    }

    /// Members that open with a type: fields, methods, properties; plus
    /// constructors, which have no return type at all.
    fn parse_typed_member_rest(&mut self, mut children: ChildList, is_async: bool) -> NodeIndex {
        // Constructor: identifier immediately followed by a parameter list.
        if self.is_token(SyntaxKind::Identifier)
            && self.peek_kind(1) == SyntaxKind::OpenParenToken
        {
            children.push(GreenElement::Token(self.eat_token()));
            children.push(GreenElement::Node(self.parse_parameter_list()));
            self.parse_method_body(&mut children, false);
            return self.finish(SyntaxKind::ConstructorDeclaration, children);
        }

        if !self.is_possible_type_start() && self.token() != SyntaxKind::VoidKeyword {
            // Attributes/modifiers with nothing usable after them.
            return self.parse_incomplete_member(children, None);
        }

        let member_type = if self.is_token(SyntaxKind::VoidKeyword) {
            let keyword = self.eat_token();
            let mut wrapper = self.builder();
            wrapper.push(GreenElement::Token(keyword));
            self.finish(SyntaxKind::PredefinedType, wrapper)
        } else {
            self.parse_type()
        };

        if self.is_token(SyntaxKind::Identifier) {
            match self.peek_kind(1) {
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                    return self.parse_method_rest(children, member_type, is_async);
                }
                SyntaxKind::OpenBraceToken | SyntaxKind::EqualsGreaterThanToken => {
                    return self.parse_property_rest(children, member_type);
                }
                _ => {
                    children.push(GreenElement::Node(
                        self.parse_field_declaration_rest(member_type),
                    ));
                    children.push(GreenElement::Token(
                        self.parse_expected(SyntaxKind::SemicolonToken),
                    ));
                    return self.finish(SyntaxKind::FieldDeclaration, children);
                }
            }
        }
        self.parse_incomplete_member(children, Some(member_type))
    }

    fn parse_field_declaration_rest(&mut self, field_type: NodeIndex) -> NodeIndex {
        let mut children = self.builder();
        children.push(GreenElement::Node(field_type));
        self.with_terminators(TerminatorFlags::IS_END_OF_FIELD_DECLARATION, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_required(),
                |p| p.is_token(SyntaxKind::Identifier),
                |p| p.parse_variable_declarator(),
                "Identifier expected",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        });
        self.finish(SyntaxKind::VariableDeclaration, children)
    }

    fn parse_method_rest(
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
        self.parse_method_body(&mut children, is_async);
        self.finish(SyntaxKind::MethodDeclaration, children)
    }

    /// Block body, expression body, or a bare semicolon (abstract/extern).
    /// `is_async` makes `await` an operator inside the body.
    fn parse_method_body(&mut self, children: &mut ChildList, is_async: bool) {
        let context = if is_async { CONTEXT_FLAG_ASYNC } else { 0 };
        if self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            let clause =
                self.with_context(context, |p| p.parse_arrow_expression_clause());
            children.push(GreenElement::Node(clause));
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        } else if self.is_token(SyntaxKind::SemicolonToken) {
            children.push(GreenElement::Token(self.eat_token()));
        } else {
            let body = self.with_context(context, |p| p.parse_block());
            children.push(GreenElement::Node(body));
        }
    }

    fn parse_property_rest(
        &mut self,
        mut children: ChildList,
        property_type: NodeIndex,
    ) -> NodeIndex {
        children.push(GreenElement::Node(property_type));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        if self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            children.push(GreenElement::Node(self.parse_arrow_expression_clause()));
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
            return self.finish(SyntaxKind::PropertyDeclaration, children);
        }
        children.push(GreenElement::Node(self.parse_accessor_list()));
        // Auto-property initializer: `public int X { get; } = 1;`
        if self.is_token(SyntaxKind::EqualsToken) {
            children.push(GreenElement::Node(self.parse_equals_value_clause()));
            children.push(GreenElement::Token(self.parse_expected(SyntaxKind::SemicolonToken)));
        }
        self.finish(SyntaxKind::PropertyDeclaration, children)
    }

    fn parse_accessor_list(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        loop {
            if self.is_token(SyntaxKind::CloseBraceToken) || self.cursor.is_at_end() {
                break;
            }
            if self.is_accessor_start() {
                children.push(GreenElement::Node(self.parse_accessor_declaration()));
                continue;
            }
            let skipped = self.skip_bad_tokens(
                "Accessor declaration expected",
                diagnostic_codes::MEMBER_DECLARATION_EXPECTED,
                |p| p.is_accessor_start() || p.is_token(SyntaxKind::CloseBraceToken),
            );
            if !skipped {
                break;
            }
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseBraceToken)));
        self.finish(SyntaxKind::AccessorList, children)
    }

    fn is_accessor_start(&self) -> bool {
        self.is_token(SyntaxKind::OpenBracketToken)
            || is_modifier(self.token())
            || self.is_contextual(SyntaxKind::GetKeyword)
            || self.is_contextual(SyntaxKind::SetKeyword)
            || self.is_contextual(SyntaxKind::InitKeyword)
    }

    fn parse_accessor_declaration(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while self.is_token(SyntaxKind::OpenBracketToken) {
            children.push(GreenElement::Node(self.parse_attribute_list()));
        }
        self.parse_modifiers(&mut children);
        let (keyword, kind) = if self.is_contextual(SyntaxKind::GetKeyword) {
            (SyntaxKind::GetKeyword, SyntaxKind::GetAccessorDeclaration)
        } else if self.is_contextual(SyntaxKind::SetKeyword) {
            (SyntaxKind::SetKeyword, SyntaxKind::SetAccessorDeclaration)
        } else if self.is_contextual(SyntaxKind::InitKeyword) {
            self.check_feature(LanguageFeature::Records);
            (SyntaxKind::InitKeyword, SyntaxKind::InitAccessorDeclaration)
        } else {
            self.parse_error_at_current_token(
                "'get', 'set', or 'init' expected",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
            (SyntaxKind::GetKeyword, SyntaxKind::GetAccessorDeclaration)
        };
        let token = if self.is_contextual(keyword) {
            self.eat_token_as(keyword)
        } else {
            self.eat_missing(keyword)
        };
        children.push(GreenElement::Token(token));
        self.parse_method_body(&mut children, false);
        self.finish(kind, children)
    }

    /// Attributes, modifiers, and maybe a type with nothing after them.
    /// Everything consumed so far is preserved under an incomplete-member
    /// node so the text still round-trips.
    fn parse_incomplete_member(
        &mut self,
        mut children: ChildList,
        member_type: Option<NodeIndex>,
    ) -> NodeIndex {
        if let Some(node) = member_type {
            children.push(GreenElement::Node(node));
        }
        self.parse_error_at_current_token(
            "Member declaration expected",
            diagnostic_codes::MEMBER_DECLARATION_EXPECTED,
        );
        self.finish(SyntaxKind::IncompleteMember, children)
    }

    pub(crate) fn parse_arrow_expression_clause(&mut self) -> NodeIndex {
        let arrow = self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let expression = self.parse_expression();
        let mut children = self.builder();
        children.push(GreenElement::Token(arrow));
        children.push(GreenElement::Node(expression));
        self.finish(SyntaxKind::ArrowExpressionClause, children)
    }

    // =========================================================================
    // Parameters, type parameters, constraints
    // =========================================================================

    pub(crate) fn parse_parameter_list(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenParenToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_PARAMETER_LIST, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma(),
                |p| p.is_parameter_start(),
                |p| p.parse_parameter(),
                "Type expected",
                diagnostic_codes::TYPE_EXPECTED,
            );
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
        self.finish(SyntaxKind::ParameterList, children)
    }

    fn is_parameter_start(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::OpenBracketToken
                | SyntaxKind::RefKeyword
                | SyntaxKind::OutKeyword
                | SyntaxKind::InKeyword
                | SyntaxKind::ParamsKeyword
                | SyntaxKind::ThisKeyword
        ) || self.is_possible_type_start()
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while self.is_token(SyntaxKind::OpenBracketToken) {
            children.push(GreenElement::Node(self.parse_attribute_list()));
        }
        while matches!(
            self.token(),
            SyntaxKind::RefKeyword
                | SyntaxKind::OutKeyword
                | SyntaxKind::InKeyword
                | SyntaxKind::ParamsKeyword
                | SyntaxKind::ThisKeyword
        ) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        children.push(GreenElement::Node(self.parse_type()));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        if self.is_token(SyntaxKind::EqualsToken) {
            children.push(GreenElement::Node(self.parse_equals_value_clause()));
        }
        self.finish(SyntaxKind::Parameter, children)
    }

    pub(crate) fn parse_type_parameter_list(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::LessThanToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_TYPE_ARGUMENT_LIST, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_required(),
                |p| {
                    p.is_token(SyntaxKind::Identifier)
                        || p.is_token(SyntaxKind::OpenBracketToken)
                        || matches!(p.token(), SyntaxKind::InKeyword | SyntaxKind::OutKeyword)
                },
                |p| p.parse_type_parameter(),
                "Identifier expected",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::GreaterThanToken)));
        self.finish(SyntaxKind::TypeParameterList, children)
    }

    fn parse_type_parameter(&mut self) -> NodeIndex {
        let mut children = self.builder();
        while self.is_token(SyntaxKind::OpenBracketToken) {
            children.push(GreenElement::Node(self.parse_attribute_list()));
        }
        // Variance annotations.
        if matches!(self.token(), SyntaxKind::InKeyword | SyntaxKind::OutKeyword) {
            children.push(GreenElement::Token(self.eat_token()));
        }
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        self.finish(SyntaxKind::TypeParameter, children)
    }

    /// `where T : class, IComparable<T>, new()`
    pub(crate) fn parse_type_parameter_constraint_clause(&mut self) -> NodeIndex {
        let where_keyword = self.eat_token_as(SyntaxKind::WhereKeyword);
        let mut children = self.builder();
        children.push(GreenElement::Token(where_keyword));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::Identifier)));
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::ColonToken)));
        self.with_terminators(TerminatorFlags::IS_END_OF_CONSTRAINT_CLAUSE, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_required(),
                |p| {
                    (!p.is_contextual(SyntaxKind::WhereKeyword) && p.is_possible_type_start())
                        || matches!(
                            p.token(),
                            SyntaxKind::ClassKeyword
                                | SyntaxKind::StructKeyword
                                | SyntaxKind::NewKeyword
                        )
                },
                |p| p.parse_type_parameter_constraint(),
                "Type expected",
                diagnostic_codes::TYPE_EXPECTED,
            );
        });
        self.finish(SyntaxKind::TypeParameterConstraintClause, children)
    }

    fn parse_type_parameter_constraint(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::NewKeyword => {
                let new_keyword = self.eat_token();
                let open = self.parse_expected(SyntaxKind::OpenParenToken);
                let close = self.parse_expected(SyntaxKind::CloseParenToken);
                let mut children = self.builder();
                children.push(GreenElement::Token(new_keyword));
                children.push(GreenElement::Token(open));
                children.push(GreenElement::Token(close));
                self.finish(SyntaxKind::ConstructorConstraint, children)
            }
            SyntaxKind::ClassKeyword | SyntaxKind::StructKeyword => {
                let keyword = self.eat_token();
                let mut children = self.builder();
                children.push(GreenElement::Token(keyword));
                self.finish(SyntaxKind::TypeConstraint, children)
            }
            _ => {
                let constraint_type = self.parse_type();
                let mut children = self.builder();
                children.push(GreenElement::Node(constraint_type));
                self.finish(SyntaxKind::TypeConstraint, children)
            }
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// `[Target: Attr(args), Attr2]`
    pub(crate) fn parse_attribute_list(&mut self) -> NodeIndex {
        let open = self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        if self.is_identifier_or_keyword() && self.peek_kind(1) == SyntaxKind::ColonToken {
            let target = self.eat_token();
            let colon = self.eat_token();
            let mut specifier = self.builder();
            specifier.push(GreenElement::Token(target));
            specifier.push(GreenElement::Token(colon));
            let specifier = self.finish(SyntaxKind::AttributeTargetSpecifier, specifier);
            children.push(GreenElement::Node(specifier));
        }
        self.with_terminators(TerminatorFlags::IS_ATTRIBUTE_LIST_TERMINATOR, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma_trailing(),
                |p| p.is_token(SyntaxKind::Identifier),
                |p| p.parse_attribute(),
                "Identifier expected",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseBracketToken)));
        self.finish(SyntaxKind::AttributeList, children)
    }

    fn parse_attribute(&mut self) -> NodeIndex {
        let name = self.parse_name();
        let mut children = self.builder();
        children.push(GreenElement::Node(name));
        if self.is_token(SyntaxKind::OpenParenToken) {
            children.push(GreenElement::Node(self.parse_attribute_argument_list()));
        }
        self.finish(SyntaxKind::Attribute, children)
    }

    fn parse_attribute_argument_list(&mut self) -> NodeIndex {
        let open = self.eat_token();
        let mut children = self.builder();
        children.push(GreenElement::Token(open));
        self.with_terminators(TerminatorFlags::IS_END_OF_ARGUMENT_LIST, |p| {
            p.parse_separated_list(
                &mut children,
                ListOptions::comma(),
                |p| super::state_expressions::kind_can_start_expression(p.token()),
                |p| p.parse_attribute_argument(),
                "Expression expected",
                diagnostic_codes::EXPRESSION_EXPECTED,
            );
        });
        children.push(GreenElement::Token(self.parse_expected(SyntaxKind::CloseParenToken)));
        self.finish(SyntaxKind::AttributeArgumentList, children)
    }

    fn parse_attribute_argument(&mut self) -> NodeIndex {
        let mut children = self.builder();
        if self.is_token(SyntaxKind::Identifier) {
            match self.peek_kind(1) {
                SyntaxKind::EqualsToken => {
                    let name = self.eat_token();
                    let equals = self.eat_token();
                    let mut name_equals = self.builder();
                    name_equals.push(GreenElement::Token(name));
                    name_equals.push(GreenElement::Token(equals));
                    let name_equals = self.finish(SyntaxKind::NameEquals, name_equals);
                    children.push(GreenElement::Node(name_equals));
                }
                SyntaxKind::ColonToken => {
                    let name = self.eat_token();
                    let colon = self.eat_token();
                    let mut name_colon = self.builder();
                    name_colon.push(GreenElement::Token(name));
                    name_colon.push(GreenElement::Token(colon));
                    let name_colon = self.finish(SyntaxKind::NameColon, name_colon);
                    children.push(GreenElement::Node(name_colon));
                }
                _ => {}
            }
        }
        children.push(GreenElement::Node(self.parse_expression()));
        self.finish(SyntaxKind::AttributeArgument, children)
    }
}
