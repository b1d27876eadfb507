//! Scanner/tokenizer for the csz compiler front end.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - the closed set of token, trivia, and tree-node kinds
//! - `Token` / `TriviaPiece` - immutable full-fidelity tokens
//! - `ScannerState` - the tokenizer state machine

pub mod scanner;
pub mod syntax_kind;
pub mod token;

pub use scanner::{ScannerDiagnostic, ScannerState};
pub use syntax_kind::SyntaxKind;
pub use token::{Token, TokenValue, TriviaPiece};
