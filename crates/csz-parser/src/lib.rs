//! Error-tolerant, full-fidelity parser for the csz compiler front end.
//!
//! The parser turns the scanner's token stream into a lossless concrete
//! syntax tree: every byte of the original input, including malformed
//! fragments, is recoverable from the tree. Local ambiguities (generic
//! argument lists vs. chained comparisons, casts vs. parenthesized
//! expressions, lambdas vs. tuples, declarations vs. expression statements)
//! are resolved by speculative trial parsing with exact rewind.

pub mod parser;

pub use parser::{
    GreenElement, GreenNode, LanguageFeature, LanguageVersion, NodeArena, NodeFlags, NodeIndex,
    ParseDiagnostic, ParserState, ReusableNodes, SyntaxTree, TokenIndex,
};
