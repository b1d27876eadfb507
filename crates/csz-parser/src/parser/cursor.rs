//! Token cursor and checkpoint engine.
//!
//! The cursor wraps the scanner's token stream (fully lexed up front, which
//! satisfies the rewind requirement trivially) and exposes current token,
//! bounded-depth peek, and advance. Checkpoints snapshot cursor position plus
//! the ambient parser state in O(1); restoring one must be indistinguishable
//! from never having advanced past it.

use csz_common::limits::MAX_PEEK_DEPTH;
use csz_scanner::{SyntaxKind, Token};

use super::state::TerminatorFlags;

pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> TokenCursor {
        debug_assert!(
            tokens.last().map(|t| t.kind) == Some(SyntaxKind::EndOfFileToken),
            "token stream must end with EndOfFileToken"
        );
        TokenCursor { tokens, index: 0 }
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    pub fn kind(&self) -> SyntaxKind {
        self.current().kind
    }

    /// Peek `k` tokens ahead (0 = current). Clamped to end of input and to
    /// the documented bounded depth.
    pub fn peek(&self, k: usize) -> &Token {
        debug_assert!(k <= MAX_PEEK_DEPTH, "peek depth exceeds supported bound");
        let index = (self.index + k).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn set_position(&mut self, position: usize) {
        debug_assert!(position <= self.index, "cursor may only rewind");
        self.index = position;
    }

    /// Jump forward (used when promoting a reused node over its tokens, and
    /// when collapsing the remaining input after stack exhaustion).
    pub fn skip_to(&mut self, position: usize) {
        debug_assert!(position >= self.index);
        self.index = position.min(self.tokens.len() - 1);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Scan forward from the current position for a token whose full start
    /// equals `target`. Used when promoting a reused node: the cursor must
    /// land exactly on the first token after the node or the promotion is
    /// abandoned.
    pub fn find_boundary(&self, target: u32) -> Option<usize> {
        let mut index = self.index;
        while index < self.tokens.len() {
            let full_start = self.tokens[index].full_start();
            if full_start == target {
                return Some(index);
            }
            if full_start > target {
                return None;
            }
            index += 1;
        }
        None
    }

    pub fn is_at_end(&self) -> bool {
        self.kind() == SyntaxKind::EndOfFileToken
    }
}

/// Value snapshot of cursor position plus ambient mode state. Checkpoints
/// nest with stack discipline; `ParserState::restore` / `release` verify it
/// in debug builds.
#[derive(Copy, Clone, Debug)]
pub struct Checkpoint {
    pub(crate) token_position: usize,
    pub(crate) context_flags: u32,
    pub(crate) terminators: TerminatorFlags,
    pub(crate) node_count: usize,
    pub(crate) token_count: usize,
    pub(crate) diagnostics_len: usize,
    pub(crate) pending_skipped_len: usize,
    pub(crate) last_error_pos: u32,
    pub(crate) depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(kinds: &[SyntaxKind]) -> Vec<Token> {
        let mut out: Vec<Token> = kinds
            .iter()
            .enumerate()
            .map(|(i, &k)| Token::new(k, i as u32, i as u32 + 1))
            .collect();
        let end = out.len() as u32;
        out.push(Token::new(SyntaxKind::EndOfFileToken, end, end));
        out
    }

    #[test]
    fn advance_clamps_at_end_of_file() {
        let mut cursor = TokenCursor::new(tokens(&[SyntaxKind::Identifier]));
        assert_eq!(cursor.kind(), SyntaxKind::Identifier);
        cursor.advance();
        assert_eq!(cursor.kind(), SyntaxKind::EndOfFileToken);
        cursor.advance();
        assert_eq!(cursor.kind(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn peek_is_clamped() {
        let cursor = TokenCursor::new(tokens(&[SyntaxKind::Identifier, SyntaxKind::DotToken]));
        assert_eq!(cursor.peek(1).kind, SyntaxKind::DotToken);
        assert_eq!(cursor.peek(5).kind, SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn set_position_rewinds() {
        let mut cursor = TokenCursor::new(tokens(&[SyntaxKind::Identifier, SyntaxKind::DotToken]));
        let saved = cursor.position();
        cursor.advance();
        cursor.advance();
        cursor.set_position(saved);
        assert_eq!(cursor.kind(), SyntaxKind::Identifier);
    }
}
