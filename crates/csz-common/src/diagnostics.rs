//! Stable error codes for syntax diagnostics.
//!
//! Every syntax error is reported as a diagnostic value; nothing is ever
//! thrown for malformed input. Codes are stable so tests and tooling can
//! match on them without depending on message wording.

/// Stable numeric codes for parse diagnostics.
///
/// Grouped by the error taxonomy: expected-token errors synthesize a missing
/// token, unexpected-token errors accompany skipped trivia, structural errors
/// come from delimiter bookkeeping, and resource errors from the recursion
/// guard.
pub mod diagnostic_codes {
    // Expected-token errors
    pub const IDENTIFIER_EXPECTED: u32 = 1001;
    pub const SEMICOLON_EXPECTED: u32 = 1002;
    pub const TOKEN_EXPECTED: u32 = 1003;
    pub const CLOSE_PAREN_EXPECTED: u32 = 1026;
    pub const TYPE_EXPECTED: u32 = 1031;
    pub const EXPRESSION_EXPECTED: u32 = 1733;
    pub const OPEN_BRACE_EXPECTED: u32 = 1514;
    pub const CLOSE_BRACE_EXPECTED: u32 = 1513;
    pub const PATTERN_EXPECTED: u32 = 8504;

    // Unexpected-token / garbage errors
    pub const INVALID_TOKEN: u32 = 1056;
    pub const UNEXPECTED_CHARACTER: u32 = 1519;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1022;
    pub const MEMBER_DECLARATION_EXPECTED: u32 = 1520;
    pub const WRONG_SEPARATOR: u32 = 1521;

    // Structural errors
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1010;
    pub const UNTERMINATED_COMMENT: u32 = 1035;
    pub const EMPTY_CHARACTER_LITERAL: u32 = 1011;
    pub const TOO_MANY_CHARACTERS_IN_LITERAL: u32 = 1012;

    // Grammar-shape errors
    pub const DUPLICATE_MODIFIER: u32 = 1004;
    pub const INVALID_EXPRESSION_TERM: u32 = 1525;
    pub const ELSE_WITHOUT_IF: u32 = 1059;
    pub const CATCH_OR_FINALLY_EXPECTED: u32 = 1524;

    // Feature gating
    pub const FEATURE_NOT_AVAILABLE: u32 = 8107;

    // Resource exhaustion
    pub const INSUFFICIENT_STACK: u32 = 8078;
}
