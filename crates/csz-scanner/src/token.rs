//! Full-fidelity tokens.
//!
//! A token records its own text extent plus leading and trailing trivia as
//! byte ranges into the source. Tokens are immutable once produced; the
//! parser only *wraps* them (missing-token synthesis, contextual-keyword
//! reinterpretation, skipped-token trivia attachment) by constructing new
//! token values via the `with_*` methods.

use crate::syntax_kind::SyntaxKind;
use serde::{Deserialize, Serialize};

/// One piece of trivia (whitespace, comment, or skipped tokens) as a byte
/// range into the source text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriviaPiece {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
}

impl TriviaPiece {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> TriviaPiece {
        TriviaPiece { kind, pos, end }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.pos as usize..self.end as usize]
    }
}

/// Cooked literal value attached to literal tokens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    #[default]
    None,
    Int(i64),
    Float(f64),
    String(String),
    Char(char),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: SyntaxKind,
    /// Soft-keyword reinterpretation of an identifier (`SyntaxKind::None`
    /// when the token is not a contextual keyword candidate).
    pub contextual_kind: SyntaxKind,
    /// Start of the token text, excluding trivia.
    pub pos: u32,
    /// End of the token text, excluding trivia.
    pub end: u32,
    pub leading: Vec<TriviaPiece>,
    pub trailing: Vec<TriviaPiece>,
    pub value: TokenValue,
    /// True for zero-width tokens synthesized where a required token was
    /// absent.
    pub is_missing: bool,
}

impl Token {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Token {
        Token {
            kind,
            contextual_kind: SyntaxKind::None,
            pos,
            end,
            leading: Vec::new(),
            trailing: Vec::new(),
            value: TokenValue::None,
            is_missing: false,
        }
    }

    /// Synthesize a zero-width missing token of the expected kind.
    pub fn missing(kind: SyntaxKind, pos: u32) -> Token {
        Token {
            kind,
            contextual_kind: SyntaxKind::None,
            pos,
            end: pos,
            leading: Vec::new(),
            trailing: Vec::new(),
            value: TokenValue::None,
            is_missing: true,
        }
    }

    /// Reinterpret an identifier as its contextual keyword kind. The token
    /// text is untouched; only the kind changes.
    pub fn with_kind(&self, kind: SyntaxKind) -> Token {
        let mut token = self.clone();
        token.kind = kind;
        token
    }

    /// A copy of this token with an extra trailing trivia piece appended.
    pub fn with_appended_trailing(&self, piece: TriviaPiece) -> Token {
        let mut token = self.clone();
        token.trailing.push(piece);
        token
    }

    /// Start of the token including its leading trivia.
    pub fn full_start(&self) -> u32 {
        self.leading.first().map_or(self.pos, |t| t.pos)
    }

    /// End of the token including its trailing trivia.
    pub fn full_end(&self) -> u32 {
        self.trailing.last().map_or(self.end, |t| t.end)
    }

    pub fn width(&self) -> u32 {
        self.end - self.pos
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.pos as usize..self.end as usize]
    }

    /// Append leading trivia, token text, and trailing trivia to `out`.
    /// Concatenating this across all tokens of a tree in order reproduces
    /// the original source exactly.
    pub fn write_full_text(&self, source: &str, out: &mut String) {
        for piece in &self.leading {
            out.push_str(piece.text(source));
        }
        out.push_str(self.text(source));
        for piece in &self.trailing {
            out.push_str(piece.text(source));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_zero_width() {
        let token = Token::missing(SyntaxKind::SemicolonToken, 7);
        assert!(token.is_missing);
        assert_eq!(token.width(), 0);
        assert_eq!(token.full_start(), 7);
        assert_eq!(token.full_end(), 7);
    }

    #[test]
    fn full_extent_includes_trivia() {
        let source = "  foo // c\n";
        let mut token = Token::new(SyntaxKind::Identifier, 2, 5);
        token.leading.push(TriviaPiece::new(SyntaxKind::WhitespaceTrivia, 0, 2));
        token
            .trailing
            .push(TriviaPiece::new(SyntaxKind::WhitespaceTrivia, 5, 6));
        token
            .trailing
            .push(TriviaPiece::new(SyntaxKind::SingleLineCommentTrivia, 6, 10));
        token
            .trailing
            .push(TriviaPiece::new(SyntaxKind::EndOfLineTrivia, 10, 11));
        assert_eq!(token.full_start(), 0);
        assert_eq!(token.full_end(), 11);

        let mut out = String::new();
        token.write_full_text(source, &mut out);
        assert_eq!(out, source);
    }

    #[test]
    fn wrapping_preserves_the_original() {
        let token = Token::new(SyntaxKind::Identifier, 0, 3);
        let rewritten = token.with_kind(SyntaxKind::WhereKeyword);
        assert_eq!(token.kind, SyntaxKind::Identifier);
        assert_eq!(rewritten.kind, SyntaxKind::WhereKeyword);
        assert_eq!(rewritten.pos, token.pos);
    }
}
