//! The tokenizer state machine.
//!
//! `ScannerState` turns source text into a vector of full-fidelity tokens.
//! Every byte of input lands in exactly one token's text or trivia, so the
//! token stream round-trips to the original text even when the input is
//! malformed. Lexical errors (unterminated literals, stray characters) are
//! recorded as scanner diagnostics; the scanner itself never fails.
//!
//! Note the `>` rule: the scanner only ever produces `>` and `>=`. The parser
//! merges adjacent trivia-free `>` tokens into the shift family so that
//! nested generic argument lists (`List<List<int>>`) close correctly.

use crate::syntax_kind::SyntaxKind;
use crate::token::{Token, TokenValue, TriviaPiece};
use csz_common::diagnostics::diagnostic_codes;
use std::sync::Arc;

/// A lexical-level diagnostic, later merged into the parse diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: &'static str,
    pub code: u32,
}

pub struct ScannerState {
    source: Arc<str>,
    pos: usize,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(source: impl Into<Arc<str>>) -> ScannerState {
        ScannerState {
            source: source.into(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        self.source.clone()
    }

    pub fn diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    /// Tokenize the whole input. The last token is always `EndOfFileToken`;
    /// trailing trivia of the file hangs off it as leading trivia.
    pub fn scan_all_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let leading = self.scan_leading_trivia();
            let mut token = self.scan_token();
            token.leading = leading;
            if token.kind != SyntaxKind::EndOfFileToken {
                token.trailing = self.scan_trailing_trivia();
            }
            let done = token.kind == SyntaxKind::EndOfFileToken;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    /// Leading trivia: everything up to the next token, including newlines.
    fn scan_leading_trivia(&mut self) -> Vec<TriviaPiece> {
        let mut pieces = Vec::new();
        while let Some(piece) = self.scan_trivia_piece() {
            pieces.push(piece);
        }
        pieces
    }

    /// Trailing trivia: same-line trivia plus at most one line terminator.
    fn scan_trailing_trivia(&mut self) -> Vec<TriviaPiece> {
        let mut pieces = Vec::new();
        loop {
            match self.scan_trivia_piece() {
                Some(piece) if piece.kind == SyntaxKind::EndOfLineTrivia => {
                    pieces.push(piece);
                    break;
                }
                Some(piece) => pieces.push(piece),
                None => break,
            }
        }
        pieces
    }

    fn scan_trivia_piece(&mut self) -> Option<TriviaPiece> {
        let start = self.pos;
        match self.current_char()? {
            ' ' | '\t' => {
                while matches!(self.current_char(), Some(' ' | '\t')) {
                    self.pos += 1;
                }
                Some(self.trivia(SyntaxKind::WhitespaceTrivia, start))
            }
            '\r' => {
                self.pos += 1;
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
                Some(self.trivia(SyntaxKind::EndOfLineTrivia, start))
            }
            '\n' => {
                self.pos += 1;
                Some(self.trivia(SyntaxKind::EndOfLineTrivia, start))
            }
            '/' if self.char_at(self.pos + 1) == Some('/') => {
                while let Some(ch) = self.current_char() {
                    if ch == '\r' || ch == '\n' {
                        break;
                    }
                    self.pos += ch.len_utf8();
                }
                Some(self.trivia(SyntaxKind::SingleLineCommentTrivia, start))
            }
            '/' if self.char_at(self.pos + 1) == Some('*') => {
                self.pos += 2;
                let mut terminated = false;
                while let Some(ch) = self.current_char() {
                    if ch == '*' && self.char_at(self.pos + 1) == Some('/') {
                        self.pos += 2;
                        terminated = true;
                        break;
                    }
                    self.pos += ch.len_utf8();
                }
                if !terminated {
                    self.diagnostics.push(ScannerDiagnostic {
                        pos: start,
                        length: self.pos - start,
                        message: "End-of-file found, '*/' expected",
                        code: diagnostic_codes::UNTERMINATED_COMMENT,
                    });
                }
                Some(self.trivia(SyntaxKind::MultiLineCommentTrivia, start))
            }
            _ => None,
        }
    }

    fn trivia(&self, kind: SyntaxKind, start: usize) -> TriviaPiece {
        TriviaPiece::new(kind, start as u32, self.pos as u32)
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn scan_token(&mut self) -> Token {
        let start = self.pos;
        let Some(ch) = self.current_char() else {
            return Token::new(SyntaxKind::EndOfFileToken, start as u32, start as u32);
        };

        match ch {
            '0'..='9' => self.scan_numeric_literal(),
            '"' => self.scan_string_literal(start, false),
            '\'' => self.scan_character_literal(),
            '@' if self.char_at(self.pos + 1) == Some('"') => {
                self.pos += 1;
                self.scan_string_literal(start, true)
            }
            ch if is_identifier_start(ch) => self.scan_identifier_or_keyword(),
            _ => self.scan_punctuation(),
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        if self.current_char() == Some('@') {
            self.pos += 1;
        }
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = &self.source[start..self.pos];
        let mut token;
        if text.starts_with('@') {
            // Verbatim identifier: never a keyword.
            token = Token::new(SyntaxKind::Identifier, start as u32, self.pos as u32);
        } else if let Some(kind) = SyntaxKind::keyword_from_text(text) {
            token = Token::new(kind, start as u32, self.pos as u32);
        } else {
            token = Token::new(SyntaxKind::Identifier, start as u32, self.pos as u32);
            if let Some(contextual) = SyntaxKind::contextual_from_text(text) {
                token.contextual_kind = contextual;
            }
        }
        token
    }

    fn scan_numeric_literal(&mut self) -> Token {
        let start = self.pos;
        let mut is_float = false;

        if self.current_char() == Some('0')
            && matches!(self.char_at(self.pos + 1), Some('x' | 'X'))
        {
            self.pos += 2;
            while matches!(self.current_char(), Some(c) if c.is_ascii_hexdigit() || c == '_') {
                self.pos += 1;
            }
            let digits: String = self.source[start + 2..self.pos]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            let mut token = Token::new(SyntaxKind::NumericLiteral, start as u32, self.pos as u32);
            token.value = i64::from_str_radix(&digits, 16)
                .map(TokenValue::Int)
                .unwrap_or(TokenValue::None);
            return token;
        }

        self.scan_digits();
        // A dot continues the number only when a digit follows; `1..2` must
        // lex as `1` `..` `2`.
        if self.current_char() == Some('.')
            && matches!(self.char_at(self.pos + 1), Some('0'..='9'))
        {
            is_float = true;
            self.pos += 1;
            self.scan_digits();
        }
        if matches!(self.current_char(), Some('e' | 'E')) {
            let mut lookahead = self.pos + 1;
            if matches!(self.char_at(lookahead), Some('+' | '-')) {
                lookahead += 1;
            }
            if matches!(self.char_at(lookahead), Some('0'..='9')) {
                is_float = true;
                self.pos = lookahead;
                self.scan_digits();
            }
        }
        let digits_end = self.pos;
        // Type suffix (f, d, m, u, l and combinations); kept as token text.
        while matches!(
            self.current_char(),
            Some('f' | 'F' | 'd' | 'D' | 'm' | 'M' | 'u' | 'U' | 'l' | 'L')
        ) {
            is_float |= matches!(self.current_char(), Some('f' | 'F' | 'd' | 'D' | 'm' | 'M'));
            self.pos += 1;
        }

        let digits: String = self.source[start..digits_end]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let mut token = Token::new(SyntaxKind::NumericLiteral, start as u32, self.pos as u32);
        token.value = if is_float {
            digits.parse::<f64>().map(TokenValue::Float).unwrap_or(TokenValue::None)
        } else {
            digits.parse::<i64>().map(TokenValue::Int).unwrap_or(TokenValue::None)
        };
        token
    }

    fn scan_digits(&mut self) {
        while matches!(self.current_char(), Some('0'..='9' | '_')) {
            self.pos += 1;
        }
    }

    fn scan_string_literal(&mut self, start: usize, verbatim: bool) -> Token {
        // Opening quote.
        self.pos += 1;
        let mut value = String::new();
        let mut terminated = false;
        while let Some(ch) = self.current_char() {
            if ch == '"' {
                if verbatim && self.char_at(self.pos + 1) == Some('"') {
                    value.push('"');
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                terminated = true;
                break;
            }
            if !verbatim && (ch == '\r' || ch == '\n') {
                break;
            }
            if !verbatim && ch == '\\' {
                self.pos += 1;
                value.push(self.scan_escape_sequence());
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        if !terminated {
            self.diagnostics.push(ScannerDiagnostic {
                pos: start,
                length: self.pos - start,
                message: "Unterminated string literal",
                code: diagnostic_codes::UNTERMINATED_STRING_LITERAL,
            });
        }
        let mut token = Token::new(SyntaxKind::StringLiteral, start as u32, self.pos as u32);
        token.value = TokenValue::String(value);
        token
    }

    fn scan_character_literal(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        let mut chars: Vec<char> = Vec::new();
        let mut terminated = false;
        while let Some(ch) = self.current_char() {
            if ch == '\'' {
                self.pos += 1;
                terminated = true;
                break;
            }
            if ch == '\r' || ch == '\n' {
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                chars.push(self.scan_escape_sequence());
                continue;
            }
            chars.push(ch);
            self.pos += ch.len_utf8();
        }
        if !terminated {
            self.diagnostics.push(ScannerDiagnostic {
                pos: start,
                length: self.pos - start,
                message: "Unterminated character literal",
                code: diagnostic_codes::UNTERMINATED_STRING_LITERAL,
            });
        } else if chars.is_empty() {
            self.diagnostics.push(ScannerDiagnostic {
                pos: start,
                length: self.pos - start,
                message: "Empty character literal",
                code: diagnostic_codes::EMPTY_CHARACTER_LITERAL,
            });
        } else if chars.len() > 1 {
            self.diagnostics.push(ScannerDiagnostic {
                pos: start,
                length: self.pos - start,
                message: "Too many characters in character literal",
                code: diagnostic_codes::TOO_MANY_CHARACTERS_IN_LITERAL,
            });
        }
        let mut token = Token::new(SyntaxKind::CharacterLiteral, start as u32, self.pos as u32);
        if let Some(&ch) = chars.first() {
            token.value = TokenValue::Char(ch);
        }
        token
    }

    fn scan_escape_sequence(&mut self) -> char {
        let Some(ch) = self.current_char() else {
            return '\\';
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    match self.current_char().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            code = code * 16 + digit;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                char::from_u32(code).unwrap_or('\u{FFFD}')
            }
            other => other,
        }
    }

    fn scan_punctuation(&mut self) -> Token {
        let start = self.pos;
        let ch = self.current_char().unwrap_or('\0');
        self.pos += ch.len_utf8();

        use SyntaxKind::*;
        let kind = match ch {
            '{' => OpenBraceToken,
            '}' => CloseBraceToken,
            '(' => OpenParenToken,
            ')' => CloseParenToken,
            '[' => OpenBracketToken,
            ']' => CloseBracketToken,
            ';' => SemicolonToken,
            ',' => CommaToken,
            '~' => TildeToken,
            '.' => {
                if self.try_eat('.') {
                    DotDotToken
                } else {
                    DotToken
                }
            }
            ':' => {
                if self.try_eat(':') {
                    ColonColonToken
                } else {
                    ColonToken
                }
            }
            '?' => {
                if self.try_eat('?') {
                    if self.try_eat('=') {
                        QuestionQuestionEqualsToken
                    } else {
                        QuestionQuestionToken
                    }
                } else {
                    QuestionToken
                }
            }
            '!' => {
                if self.try_eat('=') {
                    ExclamationEqualsToken
                } else {
                    ExclamationToken
                }
            }
            '+' => {
                if self.try_eat('+') {
                    PlusPlusToken
                } else if self.try_eat('=') {
                    PlusEqualsToken
                } else {
                    PlusToken
                }
            }
            '-' => {
                if self.try_eat('-') {
                    MinusMinusToken
                } else if self.try_eat('=') {
                    MinusEqualsToken
                } else if self.try_eat('>') {
                    MinusGreaterThanToken
                } else {
                    MinusToken
                }
            }
            '*' => {
                if self.try_eat('=') {
                    AsteriskEqualsToken
                } else {
                    AsteriskToken
                }
            }
            '/' => {
                if self.try_eat('=') {
                    SlashEqualsToken
                } else {
                    SlashToken
                }
            }
            '%' => {
                if self.try_eat('=') {
                    PercentEqualsToken
                } else {
                    PercentToken
                }
            }
            '&' => {
                if self.try_eat('&') {
                    AmpersandAmpersandToken
                } else if self.try_eat('=') {
                    AmpersandEqualsToken
                } else {
                    AmpersandToken
                }
            }
            '|' => {
                if self.try_eat('|') {
                    BarBarToken
                } else if self.try_eat('=') {
                    BarEqualsToken
                } else {
                    BarToken
                }
            }
            '^' => {
                if self.try_eat('=') {
                    CaretEqualsToken
                } else {
                    CaretToken
                }
            }
            '=' => {
                if self.try_eat('=') {
                    EqualsEqualsToken
                } else if self.try_eat('>') {
                    EqualsGreaterThanToken
                } else {
                    EqualsToken
                }
            }
            '<' => {
                if self.try_eat('<') {
                    if self.try_eat('=') {
                        LessThanLessThanEqualsToken
                    } else {
                        LessThanLessThanToken
                    }
                } else if self.try_eat('=') {
                    LessThanEqualsToken
                } else {
                    LessThanToken
                }
            }
            '>' => {
                // Never merge `>>` here; see the module docs.
                if self.try_eat('=') {
                    GreaterThanEqualsToken
                } else {
                    GreaterThanToken
                }
            }
            _ => {
                self.diagnostics.push(ScannerDiagnostic {
                    pos: start,
                    length: self.pos - start,
                    message: "Unexpected character",
                    code: diagnostic_codes::UNEXPECTED_CHARACTER,
                });
                Unknown
            }
        };
        Token::new(kind, start as u32, self.pos as u32)
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    fn current_char(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|s| s.chars().next())
    }

    fn try_eat(&mut self, ch: char) -> bool {
        if self.current_char() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '@' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> (Vec<Token>, ScannerState) {
        let mut scanner = ScannerState::new(source);
        let tokens = scanner.scan_all_tokens();
        (tokens, scanner)
    }

    fn kinds(tokens: &[Token]) -> Vec<SyntaxKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn round_trip_including_trivia_and_comments() {
        let source = "  int x = 1; // trailing\n/* block */ string s;\n";
        let (tokens, _) = scan(source);
        let mut out = String::new();
        for token in &tokens {
            token.write_full_text(source, &mut out);
        }
        assert_eq!(out, source);
    }

    #[test]
    fn greater_than_never_merges_in_scanner() {
        let (tokens, _) = scan("a >> b");
        assert_eq!(
            kinds(&tokens),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::GreaterThanToken,
                SyntaxKind::GreaterThanToken,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFileToken,
            ]
        );
    }

    #[test]
    fn question_dot_is_two_tokens() {
        let (tokens, _) = scan("a?.b");
        assert_eq!(
            kinds(&tokens),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::QuestionToken,
                SyntaxKind::DotToken,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFileToken,
            ]
        );
    }

    #[test]
    fn contextual_keywords_lex_as_identifiers() {
        let (tokens, _) = scan("var async");
        assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[0].contextual_kind, SyntaxKind::VarKeyword);
        assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[1].contextual_kind, SyntaxKind::AsyncKeyword);
    }

    #[test]
    fn range_vs_float_dot_disambiguation() {
        let (tokens, _) = scan("1..2");
        assert_eq!(
            kinds(&tokens),
            vec![
                SyntaxKind::NumericLiteral,
                SyntaxKind::DotDotToken,
                SyntaxKind::NumericLiteral,
                SyntaxKind::EndOfFileToken,
            ]
        );
        let (tokens, _) = scan("1.5");
        assert_eq!(tokens[0].kind, SyntaxKind::NumericLiteral);
        assert_eq!(tokens[0].value, TokenValue::Float(1.5));
    }

    #[test]
    fn unterminated_string_is_diagnosed_but_tokenized() {
        let source = "string s = \"abc\nint x;";
        let (tokens, scanner) = scan(source);
        assert!(scanner
            .diagnostics()
            .iter()
            .any(|d| d.code == diagnostic_codes::UNTERMINATED_STRING_LITERAL));
        // The line after the broken literal still lexes.
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::IntKeyword));
        let mut out = String::new();
        for token in &tokens {
            token.write_full_text(source, &mut out);
        }
        assert_eq!(out, source);
    }

    #[test]
    fn trailing_trivia_stops_after_newline() {
        let (tokens, _) = scan("a // c\nb");
        let a = &tokens[0];
        assert_eq!(a.trailing.last().unwrap().kind, SyntaxKind::EndOfLineTrivia);
        let b = &tokens[1];
        assert!(b.leading.is_empty());
    }

    #[test]
    fn unknown_character_becomes_unknown_token() {
        let (tokens, scanner) = scan("int x = #;");
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::Unknown));
        assert!(scanner
            .diagnostics()
            .iter()
            .any(|d| d.code == diagnostic_codes::UNEXPECTED_CHARACTER));
    }

    #[test]
    fn verbatim_string_and_identifier() {
        let (tokens, _) = scan("@\"a\"\"b\" @class");
        assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
        assert_eq!(tokens[0].value, TokenValue::String("a\"b".to_string()));
        assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
    }
}
