//! Diagnostic-free lookahead scans.
//!
//! Each resolver here answers a local ambiguity (generic argument list vs.
//! comparison chain, cast vs. parenthesized expression, lambda vs. tuple,
//! declaration vs. expression statement) by scanning forward over the raw
//! cursor and rewinding. Scans advance the cursor only - they never build
//! nodes or emit diagnostics - so a checkpoint/restore pair erases them
//! completely.

use csz_scanner::SyntaxKind;

use super::state::{CONTEXT_FLAG_ASYNC, ParserState};

/// Result of a speculative type scan. The distinction matters to the
/// declaration-vs-expression resolver: `MustBeType` commits immediately,
/// the `..OrExpression` variants require a follow-token check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScanTypeFlags {
    NotType,
    MustBeType,
    GenericTypeOrExpression,
    NonGenericTypeOrExpression,
    NullableType,
    TupleType,
}

impl ParserState {
    // =========================================================================
    // Type scanning
    // =========================================================================

    /// Scan a type at the cursor, consuming its tokens. Returns `NotType`
    /// (cursor position is then unspecified; callers restore a checkpoint)
    /// or a classification of what was scanned.
    pub(crate) fn scan_type(&mut self) -> ScanTypeFlags {
        let mut flags = match self.token() {
            kind if kind.is_predefined_type_keyword() => {
                self.next_token();
                ScanTypeFlags::MustBeType
            }
            SyntaxKind::Identifier => self.scan_named_type_part(),
            SyntaxKind::OpenParenToken => self.scan_tuple_type(),
            _ => return ScanTypeFlags::NotType,
        };
        if flags == ScanTypeFlags::NotType {
            return flags;
        }

        // Dotted qualifications.
        while self.is_token(SyntaxKind::DotToken) && self.peek_kind(1) == SyntaxKind::Identifier {
            self.next_token();
            let part = self.scan_named_type_part();
            if part == ScanTypeFlags::NotType {
                return ScanTypeFlags::NotType;
            }
            flags = part;
        }

        // Nullable and array-rank suffixes.
        loop {
            match self.token() {
                SyntaxKind::QuestionToken => {
                    self.next_token();
                    flags = ScanTypeFlags::NullableType;
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    while self.is_token(SyntaxKind::CommaToken) {
                        self.next_token();
                    }
                    if !self.is_token(SyntaxKind::CloseBracketToken) {
                        return ScanTypeFlags::NotType;
                    }
                    self.next_token();
                    flags = ScanTypeFlags::MustBeType;
                }
                _ => break,
            }
        }
        flags
    }

    /// Identifier with an optional type argument list.
    fn scan_named_type_part(&mut self) -> ScanTypeFlags {
        debug_assert_eq!(self.token(), SyntaxKind::Identifier);
        self.next_token();
        if self.is_token(SyntaxKind::LessThanToken) {
            if !self.scan_type_argument_list_core() {
                return ScanTypeFlags::NotType;
            }
            ScanTypeFlags::GenericTypeOrExpression
        } else {
            ScanTypeFlags::NonGenericTypeOrExpression
        }
    }

    /// Scan `< type (, type)* >` from an open `<`. Also accepts the open
    /// generic form `<>` and `<,>`.
    fn scan_type_argument_list_core(&mut self) -> bool {
        debug_assert_eq!(self.token(), SyntaxKind::LessThanToken);
        self.next_token();
        if self.is_token(SyntaxKind::GreaterThanToken) {
            self.next_token();
            return true;
        }
        if self.is_token(SyntaxKind::CommaToken) {
            // Open generic arity marker: <,,>
            while self.is_token(SyntaxKind::CommaToken) {
                self.next_token();
            }
            if !self.is_token(SyntaxKind::GreaterThanToken) {
                return false;
            }
            self.next_token();
            return true;
        }
        loop {
            if self.scan_type() == ScanTypeFlags::NotType {
                return false;
            }
            if self.is_token(SyntaxKind::CommaToken) {
                self.next_token();
                continue;
            }
            if self.is_token(SyntaxKind::GreaterThanToken) {
                self.next_token();
                return true;
            }
            return false;
        }
    }

    /// Tuple type: `( type [id] , type [id] ... )` with at least two
    /// elements.
    fn scan_tuple_type(&mut self) -> ScanTypeFlags {
        debug_assert_eq!(self.token(), SyntaxKind::OpenParenToken);
        self.next_token();
        let mut elements = 0usize;
        loop {
            if self.scan_type() == ScanTypeFlags::NotType {
                return ScanTypeFlags::NotType;
            }
            if self.is_token(SyntaxKind::Identifier) {
                self.next_token();
            }
            elements += 1;
            if self.is_token(SyntaxKind::CommaToken) {
                self.next_token();
                continue;
            }
            break;
        }
        if elements < 2 || !self.is_token(SyntaxKind::CloseParenToken) {
            return ScanTypeFlags::NotType;
        }
        self.next_token();
        ScanTypeFlags::TupleType
    }

    // =========================================================================
    // Generic name vs. comparison chain
    // =========================================================================

    /// At a `<` following an expression-context identifier: commit to a type
    /// argument list only when the list scans cleanly *and* the token after
    /// the closing `>` could not continue a comparison expression.
    pub(crate) fn is_definitely_type_argument_list(&mut self) -> bool {
        debug_assert_eq!(self.token(), SyntaxKind::LessThanToken);
        let checkpoint = self.checkpoint();
        let scanned = self.scan_type_argument_list_core();
        let committed = scanned && self.can_follow_type_argument_list();
        self.restore(checkpoint);
        committed
    }

    /// Tokens after which `name<...>` is unambiguously a generic name.
    /// Deliberately closed: an identifier follows only in pattern contexts
    /// (`is List<int> l`), where a comparison chain is impossible.
    fn can_follow_type_argument_list(&self) -> bool {
        match self.token() {
            SyntaxKind::OpenParenToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::ColonToken
            | SyntaxKind::CommaToken
            | SyntaxKind::DotToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::AmpersandAmpersandToken
            | SyntaxKind::BarBarToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::BarToken
            | SyntaxKind::CaretToken
            | SyntaxKind::EndOfFileToken => true,
            SyntaxKind::Identifier => self.in_pattern_context(),
            kind => kind == SyntaxKind::IsKeyword || kind == SyntaxKind::AsKeyword,
        }
    }

    fn in_pattern_context(&self) -> bool {
        self.context_flags & super::state::CONTEXT_FLAG_IN_PATTERN != 0
    }

    // =========================================================================
    // Cast vs. parenthesized expression
    // =========================================================================

    /// At an open paren: is `( type )` followed by an operand, i.e. a cast?
    /// Predefined-type casts commit unconditionally; casts of ambiguous
    /// names additionally require the next token to be a plausible operand
    /// start.
    pub(crate) fn is_possible_cast_expression(&mut self) -> bool {
        debug_assert_eq!(self.token(), SyntaxKind::OpenParenToken);
        let checkpoint = self.checkpoint();
        let result = self.scan_cast();
        self.restore(checkpoint);
        result
    }

    fn scan_cast(&mut self) -> bool {
        self.next_token();
        let flags = self.scan_type();
        if flags == ScanTypeFlags::NotType || !self.is_token(SyntaxKind::CloseParenToken) {
            return false;
        }
        self.next_token();
        match flags {
            ScanTypeFlags::MustBeType => {
                // `(int)-1` is a cast even though `-` can also be binary.
                !matches!(
                    self.token(),
                    SyntaxKind::CloseParenToken
                        | SyntaxKind::CloseBracketToken
                        | SyntaxKind::CloseBraceToken
                        | SyntaxKind::SemicolonToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::EndOfFileToken
                )
            }
            _ => can_follow_cast(self.token()),
        }
    }

    // =========================================================================
    // Lambda detection
    // =========================================================================

    /// True at a token sequence that must begin a lambda: `id =>`,
    /// `async id =>`, `( ... ) =>`, or `async ( ... ) =>`. Checked before
    /// cast and tuple interpretation so that `(a, b) => a + b` wins.
    pub(crate) fn is_possible_lambda_expression(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let result = self.scan_lambda_start();
        self.restore(checkpoint);
        result
    }

    fn scan_lambda_start(&mut self) -> bool {
        if self.is_contextual(SyntaxKind::AsyncKeyword)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::Identifier | SyntaxKind::OpenParenToken
            )
        {
            self.next_token();
        }
        match self.token() {
            SyntaxKind::Identifier => {
                self.next_token();
                self.is_token(SyntaxKind::EqualsGreaterThanToken)
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let mut depth = 1usize;
                while depth > 0 {
                    match self.token() {
                        SyntaxKind::OpenParenToken => depth += 1,
                        SyntaxKind::CloseParenToken => depth -= 1,
                        SyntaxKind::EndOfFileToken => return false,
                        _ => {}
                    }
                    self.next_token();
                }
                self.is_token(SyntaxKind::EqualsGreaterThanToken)
            }
            _ => false,
        }
    }

    // =========================================================================
    // Declaration vs. expression statement
    // =========================================================================

    /// Statement-context resolver: a statement beginning with a scannable
    /// type followed by an identifier in declarator position is a local
    /// declaration. `a<b> c;` declares; bare `a<b>c` at expression level
    /// stays a comparison chain.
    pub(crate) fn is_possible_declaration_statement(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let result = self.scan_declaration_start();
        self.restore(checkpoint);
        result
    }

    fn scan_declaration_start(&mut self) -> bool {
        // In an async body `await` is an operator; `await t();` must not
        // read as a local function with return type `await`.
        if self.is_contextual(SyntaxKind::AwaitKeyword)
            && self.context_flags & CONTEXT_FLAG_ASYNC != 0
        {
            return false;
        }
        let flags = self.scan_type();
        if flags == ScanTypeFlags::NotType || !self.is_token(SyntaxKind::Identifier) {
            return false;
        }
        self.next_token();
        match flags {
            ScanTypeFlags::MustBeType | ScanTypeFlags::TupleType => true,
            // `(` and `<` after the identifier are local function headers.
            _ => matches!(
                self.token(),
                SyntaxKind::SemicolonToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::EndOfFileToken
            ) || self.is_token(SyntaxKind::InKeyword),
        }
    }
}

/// Deny list for the token after a closing cast paren: anything that reads
/// as a continuation of the parenthesized value rules the cast out.
pub(crate) fn can_follow_cast(kind: SyntaxKind) -> bool {
    !matches!(
        kind,
        SyntaxKind::SemicolonToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::CommaToken
            | SyntaxKind::ColonToken
            | SyntaxKind::EqualsToken
            | SyntaxKind::PlusEqualsToken
            | SyntaxKind::MinusEqualsToken
            | SyntaxKind::AsteriskEqualsToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::PercentEqualsToken
            | SyntaxKind::AmpersandEqualsToken
            | SyntaxKind::BarEqualsToken
            | SyntaxKind::CaretEqualsToken
            | SyntaxKind::LessThanLessThanEqualsToken
            | SyntaxKind::QuestionQuestionEqualsToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::SlashToken
            | SyntaxKind::PercentToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::BarToken
            | SyntaxKind::CaretToken
            | SyntaxKind::AmpersandAmpersandToken
            | SyntaxKind::BarBarToken
            | SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::LessThanLessThanToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::QuestionQuestionToken
            | SyntaxKind::DotToken
            | SyntaxKind::MinusGreaterThanToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::IsKeyword
            | SyntaxKind::AsKeyword
            | SyntaxKind::EqualsGreaterThanToken
            | SyntaxKind::EndOfFileToken
    )
}
