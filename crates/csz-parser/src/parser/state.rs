//! Parser state - core token operations, checkpoints, error recovery.
//!
//! `ParserState` owns the token cursor, the node arena, the ambient mode
//! flags, and the terminator bitset. Grammar-layer methods live in the
//! `state_*` sibling modules; everything here is the machinery they share.

use bitflags::bitflags;
use csz_common::cancellation::{CancellationToken, Cancelled};
use csz_common::diagnostics::diagnostic_codes;
use csz_common::limits::{MAX_RECURSION_DEPTH, STACK_RED_ZONE};
use csz_scanner::{ScannerState, SyntaxKind, Token, TriviaPiece};
use serde::Serialize;
use std::sync::Arc;

use super::arena::{ChildList, GreenElement, NodeArena, NodeFlags, NodeIndex, TokenIndex};
use super::cursor::{Checkpoint, TokenCursor};
use super::features::{LanguageFeature, LanguageVersion};
use super::incremental::ReusableNodes;

// Ambient mode flags. Dynamically scoped: saved and restored in matched
// pairs around the construct that sets them.
pub const CONTEXT_FLAG_ASYNC: u32 = 1 << 0;
pub const CONTEXT_FLAG_QUERY: u32 = 1 << 1;
pub const CONTEXT_FLAG_IN_PATTERN: u32 = 1 << 2;
/// Forces `?[` to parse as conditional element access during the
/// conditional-expression retry.
pub const CONTEXT_FLAG_FORCE_CONDITIONAL_ACCESS: u32 = 1 << 3;

bitflags! {
    /// One bit per syntactic context that may legitimately stop a sub-parse.
    /// OR'd in on entry to a construct, restored on exit; a set bit always
    /// corresponds to a currently active enclosing construct.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct TerminatorFlags: u32 {
        const IS_NAMESPACE_MEMBER_START_OR_STOP = 1 << 0;
        const IS_ATTRIBUTE_LIST_TERMINATOR = 1 << 1;
        const IS_POSSIBLE_MEMBER_START_OR_STOP = 1 << 2;
        const IS_END_OF_PARAMETER_LIST = 1 << 3;
        const IS_END_OF_FIELD_DECLARATION = 1 << 4;
        const IS_POSSIBLE_END_OF_VARIABLE_DECLARATION = 1 << 5;
        const IS_END_OF_TYPE_ARGUMENT_LIST = 1 << 6;
        const IS_POSSIBLE_STATEMENT_START_OR_STOP = 1 << 7;
        const IS_END_OF_SWITCH_SECTION = 1 << 8;
        const IS_END_OF_INITIALIZER = 1 << 9;
        const IS_END_OF_ARGUMENT_LIST = 1 << 10;
        const IS_END_OF_CONSTRAINT_CLAUSE = 1 << 11;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

pub struct ParserState {
    pub(crate) file_name: String,
    pub(crate) source: Arc<str>,
    pub(crate) cursor: TokenCursor,
    pub(crate) arena: NodeArena,
    pub(crate) context_flags: u32,
    pub(crate) terminators: TerminatorFlags,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) recursion_depth: u32,
    pub(crate) stack_exhausted: bool,
    pub(crate) last_error_pos: u32,
    /// Skipped-token trivia waiting to attach as leading trivia on the next
    /// eaten token (used when nothing has parsed yet).
    pub(crate) pending_skipped: Vec<TriviaPiece>,
    /// Set when a conditional expression was parsed whose when-true branch
    /// is a bare collection expression; consulted by the enclosing
    /// conditional's retry when its `:` went missing.
    pub(crate) saw_ternary_collection: bool,
    pub(crate) language_version: LanguageVersion,
    pub(crate) cancellation: Option<CancellationToken>,
    pub(crate) reusable: Option<ReusableNodes>,
    checkpoint_depth: u32,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        ParserState::with_version(file_name, source_text, LanguageVersion::default())
    }

    pub fn with_version(
        file_name: String,
        source_text: String,
        language_version: LanguageVersion,
    ) -> ParserState {
        let mut scanner = ScannerState::new(source_text);
        let tokens = scanner.scan_all_tokens();
        let mut parse_diagnostics: Vec<ParseDiagnostic> = scanner
            .diagnostics()
            .iter()
            .map(|d| ParseDiagnostic {
                start: d.pos as u32,
                length: d.length as u32,
                message: d.message.to_string(),
                code: d.code,
            })
            .collect();
        parse_diagnostics.sort_by_key(|d| d.start);

        let arena = NodeArena::with_token_capacity(tokens.len());
        ParserState {
            file_name,
            source: scanner.source_text_arc(),
            cursor: TokenCursor::new(tokens),
            arena,
            context_flags: 0,
            terminators: TerminatorFlags::empty(),
            parse_diagnostics,
            recursion_depth: 0,
            stack_exhausted: false,
            last_error_pos: u32::MAX,
            pending_skipped: Vec::new(),
            saw_ternary_collection: false,
            language_version,
            cancellation: None,
            reusable: None,
            checkpoint_depth: 0,
        }
    }

    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancellation = Some(token);
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    // =========================================================================
    // Token access
    // =========================================================================

    pub(crate) fn token(&self) -> SyntaxKind {
        self.cursor.kind()
    }

    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.cursor.kind() == kind
    }

    /// True when the current token is an identifier carrying the given
    /// contextual keyword kind.
    pub(crate) fn is_contextual(&self, kind: SyntaxKind) -> bool {
        let token = self.cursor.current();
        token.kind == SyntaxKind::Identifier && token.contextual_kind == kind
    }

    pub(crate) fn peek_kind(&self, k: usize) -> SyntaxKind {
        self.cursor.peek(k).kind
    }

    pub(crate) fn peek_contextual(&self, k: usize, kind: SyntaxKind) -> bool {
        let token = self.cursor.peek(k);
        token.kind == SyntaxKind::Identifier && token.contextual_kind == kind
    }

    pub(crate) fn token_pos(&self) -> u32 {
        self.cursor.current().pos
    }

    pub(crate) fn token_full_start(&self) -> u32 {
        self.cursor.current().full_start()
    }

    pub(crate) fn token_end(&self) -> u32 {
        self.cursor.current().end
    }

    pub(crate) fn token_width(&self) -> u32 {
        self.cursor.current().width()
    }

    pub(crate) fn token_text(&self) -> &str {
        self.cursor.current().text(&self.source)
    }

    pub(crate) fn next_token(&mut self) {
        self.cursor.advance();
    }

    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        let kind = self.token();
        kind == SyntaxKind::Identifier || kind.is_reserved_keyword()
    }

    // =========================================================================
    // Eating tokens into the tree
    // =========================================================================

    /// Move the current token into the tree and advance.
    pub(crate) fn eat_token(&mut self) -> TokenIndex {
        let token = self.cursor.current().clone();
        let index = self.push_tree_token(token);
        self.cursor.advance();
        index
    }

    /// Eat the current token reinterpreted as the given kind (contextual
    /// keyword commitment).
    pub(crate) fn eat_token_as(&mut self, kind: SyntaxKind) -> TokenIndex {
        let token = self.cursor.current().with_kind(kind);
        let index = self.push_tree_token(token);
        self.cursor.advance();
        index
    }

    /// Synthesize a zero-width missing token of the expected kind without
    /// consuming input.
    pub(crate) fn eat_missing(&mut self, kind: SyntaxKind) -> TokenIndex {
        let token = Token::missing(kind, self.token_full_start());
        self.push_tree_token(token)
    }

    fn push_tree_token(&mut self, mut token: Token) -> TokenIndex {
        if !self.pending_skipped.is_empty() {
            let mut leading = std::mem::take(&mut self.pending_skipped);
            leading.append(&mut token.leading);
            token.leading = leading;
        }
        self.arena.add_token(token)
    }

    /// Require a token of the given kind: eat it if present, otherwise emit
    /// an expected-token diagnostic and synthesize a missing token.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> TokenIndex {
        if self.is_token(kind) {
            return self.eat_token();
        }
        self.error_expected(kind);
        self.eat_missing(kind)
    }

    pub(crate) fn error_expected(&mut self, kind: SyntaxKind) {
        let (message, code) = expected_diagnostic(kind);
        self.parse_error_at_current_token(&message, code);
    }

    // =========================================================================
    // Compound operator merging
    //
    // The scanner only produces single `>` (and `>=`) tokens. Adjacent
    // trivia-free runs merge here into the shift family.
    // =========================================================================

    /// If the current token starts a mergeable `>` run, the merged kind and
    /// the number of extra tokens it covers.
    pub(crate) fn try_merge_shift(&self) -> Option<(SyntaxKind, usize)> {
        if !self.is_token(SyntaxKind::GreaterThanToken) {
            return None;
        }
        if !self.tokens_adjacent(0, 1) {
            return None;
        }
        match self.peek_kind(1) {
            SyntaxKind::GreaterThanToken => {
                if self.tokens_adjacent(1, 2) {
                    match self.peek_kind(2) {
                        SyntaxKind::GreaterThanToken if self.tokens_adjacent(2, 3)
                            && self.peek_kind(3) == SyntaxKind::EqualsToken =>
                        {
                            return Some((
                                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
                                3,
                            ));
                        }
                        SyntaxKind::GreaterThanToken => {
                            return Some((SyntaxKind::GreaterThanGreaterThanGreaterThanToken, 2));
                        }
                        SyntaxKind::EqualsToken => {
                            return Some((SyntaxKind::GreaterThanGreaterThanEqualsToken, 2));
                        }
                        _ => {}
                    }
                }
                Some((SyntaxKind::GreaterThanGreaterThanToken, 1))
            }
            SyntaxKind::GreaterThanEqualsToken => {
                Some((SyntaxKind::GreaterThanGreaterThanEqualsToken, 1))
            }
            _ => None,
        }
    }

    pub(crate) fn tokens_adjacent(&self, a: usize, b: usize) -> bool {
        let first = self.cursor.peek(a);
        let second = self.cursor.peek(b);
        first.trailing.is_empty() && second.leading.is_empty() && second.pos == first.end
    }

    /// Eat a merged compound operator covering `extra + 1` cursor tokens.
    pub(crate) fn eat_merged(&mut self, kind: SyntaxKind, extra: usize) -> TokenIndex {
        let first = self.cursor.current().clone();
        let last = self.cursor.peek(extra).clone();
        let mut token = Token::new(kind, first.pos, last.end);
        token.leading = first.leading;
        token.trailing = last.trailing;
        let index = self.push_tree_token(token);
        for _ in 0..=extra {
            self.cursor.advance();
        }
        index
    }

    // =========================================================================
    // Checkpoints
    // =========================================================================

    /// O(1) snapshot of cursor position and ambient state. Any parse attempt
    /// between `checkpoint` and `restore` leaves no observable trace.
    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.checkpoint_depth += 1;
        Checkpoint {
            token_position: self.cursor.position(),
            context_flags: self.context_flags,
            terminators: self.terminators,
            node_count: self.arena.nodes.len(),
            token_count: self.arena.tokens.len(),
            diagnostics_len: self.parse_diagnostics.len(),
            pending_skipped_len: self.pending_skipped.len(),
            last_error_pos: self.last_error_pos,
            depth: self.checkpoint_depth,
        }
    }

    /// Rewind to the snapshot, truncating speculative nodes, tokens, and
    /// diagnostics.
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(
            checkpoint.depth, self.checkpoint_depth,
            "checkpoints must restore in stack order"
        );
        self.checkpoint_depth -= 1;
        self.cursor.set_position(checkpoint.token_position);
        self.context_flags = checkpoint.context_flags;
        self.terminators = checkpoint.terminators;
        self.arena
            .truncate(checkpoint.node_count, checkpoint.token_count);
        self.parse_diagnostics.truncate(checkpoint.diagnostics_len);
        self.pending_skipped.truncate(checkpoint.pending_skipped_len);
        self.last_error_pos = checkpoint.last_error_pos;
    }

    /// Discard the snapshot without rewinding (the speculative branch was
    /// committed).
    pub(crate) fn release(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(
            checkpoint.depth, self.checkpoint_depth,
            "checkpoints must release in stack order"
        );
        self.checkpoint_depth -= 1;
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        // One diagnostic per position: suppress cascades at the same spot.
        if start == self.last_error_pos {
            return;
        }
        self.last_error_pos = start;
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_width();
        self.parse_error_at(start, length, message, code);
    }

    pub(crate) fn error_expression_expected(&mut self) {
        self.parse_error_at_current_token(
            "Expression expected",
            diagnostic_codes::EXPRESSION_EXPECTED,
        );
    }

    pub(crate) fn error_type_expected(&mut self) {
        self.parse_error_at_current_token("Type expected", diagnostic_codes::TYPE_EXPECTED);
    }

    // =========================================================================
    // Feature gating
    // =========================================================================

    pub(crate) fn check_feature(&mut self, feature: LanguageFeature) {
        if !self.language_version.supports(feature) {
            let message = format!(
                "The feature '{}' is not available in this language version",
                feature.display_name()
            );
            self.parse_error_at_current_token(&message, diagnostic_codes::FEATURE_NOT_AVAILABLE);
        }
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    /// Run `f` if there is recursion budget and native stack headroom left,
    /// otherwise record exhaustion (once) and run `fallback`. Adversarial
    /// nesting degrades to a degenerate parse instead of crashing.
    pub(crate) fn recurse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> T,
        fallback: impl FnOnce(&mut Self) -> T,
    ) -> T {
        if self.stack_exhausted {
            return fallback(self);
        }
        let headroom =
            stacker::remaining_stack().map_or(true, |remaining| remaining > STACK_RED_ZONE);
        if self.recursion_depth >= MAX_RECURSION_DEPTH || !headroom {
            self.note_stack_exhaustion();
            return fallback(self);
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    fn note_stack_exhaustion(&mut self) {
        if self.stack_exhausted {
            return;
        }
        self.stack_exhausted = true;
        tracing::debug!(pos = self.token_pos(), "parser recursion limit reached");
        // Exactly one diagnostic for the whole collapse.
        self.parse_diagnostics.push(ParseDiagnostic {
            start: self.token_pos(),
            length: self.token_width(),
            message: "Input is too deeply nested to parse".to_string(),
            code: diagnostic_codes::INSUFFICIENT_STACK,
        });
    }

    pub(crate) fn is_stack_exhausted(&self) -> bool {
        self.stack_exhausted
    }

    /// Swallow all remaining input as a single opaque error token inside a
    /// degenerate node. Used after stack exhaustion.
    pub(crate) fn collapse_remaining_input(&mut self) -> NodeIndex {
        let start = self.token_full_start();
        let end = self.source.len() as u32;
        let token = Token::new(SyntaxKind::Unknown, start, end);
        let index = self.push_tree_token(token);
        self.cursor.skip_to(self.cursor.len() - 1);
        let mut children = self.builder();
        children.push(GreenElement::Token(index));
        self.finish(SyntaxKind::IncompleteMember, children)
    }

    // =========================================================================
    // Cancellation
    // =========================================================================

    /// True while inside an unreleased checkpoint; reuse never fires during
    /// speculation.
    pub(crate) fn in_speculation(&self) -> bool {
        self.checkpoint_depth > 0
    }

    /// Poll point; called at the start of each top-level declaration and
    /// each statement in a list.
    pub(crate) fn poll_cancellation(&self) -> Result<(), Cancelled> {
        match &self.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Terminators and recovery
    // =========================================================================

    /// True at end of input or when any active terminator matches the
    /// current token.
    pub(crate) fn is_terminator(&self) -> bool {
        if self.cursor.is_at_end() {
            return true;
        }
        let kind = self.token();
        let t = self.terminators;
        if t.contains(TerminatorFlags::IS_NAMESPACE_MEMBER_START_OR_STOP)
            && (kind == SyntaxKind::CloseBraceToken || self.is_namespace_member_start())
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_ATTRIBUTE_LIST_TERMINATOR)
            && kind == SyntaxKind::CloseBracketToken
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_POSSIBLE_MEMBER_START_OR_STOP)
            && (kind == SyntaxKind::CloseBraceToken || self.is_possible_member_start())
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_PARAMETER_LIST)
            && matches!(
                kind,
                SyntaxKind::CloseParenToken | SyntaxKind::SemicolonToken | SyntaxKind::OpenBraceToken
            )
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_FIELD_DECLARATION)
            && kind == SyntaxKind::SemicolonToken
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_POSSIBLE_END_OF_VARIABLE_DECLARATION)
            && matches!(
                kind,
                SyntaxKind::SemicolonToken | SyntaxKind::CommaToken | SyntaxKind::CloseParenToken
            )
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_TYPE_ARGUMENT_LIST)
            && kind == SyntaxKind::GreaterThanToken
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_POSSIBLE_STATEMENT_START_OR_STOP)
            && (kind == SyntaxKind::SemicolonToken || self.is_statement_start())
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_SWITCH_SECTION)
            && matches!(
                kind,
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken
            )
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_INITIALIZER)
            && matches!(kind, SyntaxKind::CloseBraceToken | SyntaxKind::SemicolonToken)
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_ARGUMENT_LIST)
            && matches!(kind, SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken)
        {
            return true;
        }
        if t.contains(TerminatorFlags::IS_END_OF_CONSTRAINT_CLAUSE)
            && (matches!(
                kind,
                SyntaxKind::OpenBraceToken
                    | SyntaxKind::EqualsGreaterThanToken
                    | SyntaxKind::SemicolonToken
            ) || self.is_contextual(SyntaxKind::WhereKeyword))
        {
            return true;
        }
        false
    }

    /// The bad-token-skip loop. Consumes tokens until `is_expected` matches,
    /// a terminator fires, or input ends; the whole run becomes one
    /// skipped-tokens trivia piece attached to the last in-tree token (or to
    /// the next construct if nothing has parsed yet). Exactly one diagnostic
    /// is emitted per contiguous run. Returns true if anything was skipped.
    pub(crate) fn skip_bad_tokens(
        &mut self,
        message: &str,
        code: u32,
        is_expected: impl Fn(&ParserState) -> bool,
    ) -> bool {
        let mut first: Option<(u32, u32)> = None;
        let mut full_start = 0u32;
        let mut full_end = 0u32;
        while !self.cursor.is_at_end() && !is_expected(self) && !self.is_terminator() {
            let token = self.cursor.current();
            if first.is_none() {
                first = Some((token.pos, token.width().max(1)));
                full_start = token.full_start();
            }
            full_end = token.full_end();
            self.cursor.advance();
        }
        let Some((error_pos, error_len)) = first else {
            return false;
        };
        let piece = TriviaPiece::new(SyntaxKind::SkippedTokensTrivia, full_start, full_end);
        match self.arena.last_token_index() {
            Some(index) => {
                let wrapped = self.arena.token(index).with_appended_trailing(piece);
                self.arena.replace_token(index, wrapped);
            }
            None => self.pending_skipped.push(piece),
        }
        self.parse_error_at(error_pos, error_len, message, code);
        true
    }

    /// Unconditionally skip the current token into skipped trivia.
    /// Last-resort progress guarantee for list loops whose start predicate
    /// admitted a token the productions then refused to consume.
    pub(crate) fn force_skip_token(&mut self, message: &str, code: u32) {
        if self.cursor.is_at_end() {
            return;
        }
        let token = self.cursor.current();
        let (error_pos, error_len) = (token.pos, token.width().max(1));
        let piece = TriviaPiece::new(
            SyntaxKind::SkippedTokensTrivia,
            token.full_start(),
            token.full_end(),
        );
        self.cursor.advance();
        match self.arena.last_token_index() {
            Some(index) => {
                let wrapped = self.arena.token(index).with_appended_trailing(piece);
                self.arena.replace_token(index, wrapped);
            }
            None => self.pending_skipped.push(piece),
        }
        self.parse_error_at(error_pos, error_len, message, code);
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    pub(crate) fn builder(&mut self) -> ChildList {
        ChildList::new()
    }

    /// Run `f` with extra context flags set, restoring the previous flags on
    /// exit.
    pub(crate) fn with_context<T>(&mut self, set: u32, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags |= set;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    /// Run `f` with extra terminator bits active, restoring the previous set
    /// on exit.
    pub(crate) fn with_terminators<T>(
        &mut self,
        set: TerminatorFlags,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = self.terminators;
        self.terminators |= set;
        let result = f(self);
        self.terminators = saved;
        result
    }

    pub(crate) fn finish(&mut self, kind: SyntaxKind, children: ChildList) -> NodeIndex {
        let mut context = NodeFlags::empty();
        if self.context_flags & CONTEXT_FLAG_ASYNC != 0 {
            context |= NodeFlags::ASYNC_CONTEXT;
        }
        if self.context_flags & CONTEXT_FLAG_QUERY != 0 {
            context |= NodeFlags::QUERY_CONTEXT;
        }
        self.arena.finish_node(kind, children, context)
    }

    /// Zero-width identifier-name node used when a required expression or
    /// type is absent; keeps the tree total without consuming input.
    pub(crate) fn error_node(&mut self) -> NodeIndex {
        let token = self.eat_missing(SyntaxKind::Identifier);
        let mut children = self.builder();
        children.push(GreenElement::Token(token));
        self.finish(SyntaxKind::IdentifierName, children)
    }
}

/// Message and code for an expected-token diagnostic.
fn expected_diagnostic(kind: SyntaxKind) -> (String, u32) {
    let code = match kind {
        SyntaxKind::Identifier => diagnostic_codes::IDENTIFIER_EXPECTED,
        SyntaxKind::SemicolonToken => diagnostic_codes::SEMICOLON_EXPECTED,
        SyntaxKind::CloseParenToken => diagnostic_codes::CLOSE_PAREN_EXPECTED,
        SyntaxKind::CloseBraceToken => diagnostic_codes::CLOSE_BRACE_EXPECTED,
        SyntaxKind::OpenBraceToken => diagnostic_codes::OPEN_BRACE_EXPECTED,
        _ => diagnostic_codes::TOKEN_EXPECTED,
    };
    let message = match kind {
        SyntaxKind::Identifier => "Identifier expected".to_string(),
        _ => format!("'{}' expected", kind.display_text()),
    };
    (message, code)
}
