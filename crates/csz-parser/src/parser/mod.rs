//! Parser entry points and the parsed-tree handle.
//!
//! `ParserState` drives a single parse of a single source text. Every entry
//! point is total: it always returns a tree, however heavily diagnosed, and
//! the only non-tree exits are explicit cancellation and the recursion
//! guard's input collapse (which still yields a tree).

mod arena;
mod cursor;
mod features;
mod incremental;
mod lists;
mod lookahead;
mod node_access;
mod state;
mod state_declarations;
mod state_expressions;
mod state_patterns;
mod state_query;
mod state_statements;
mod state_types;

pub use arena::{GreenElement, GreenNode, NodeArena, NodeFlags, NodeIndex, TokenIndex};
pub use features::{LanguageFeature, LanguageVersion};
pub use incremental::ReusableNodes;
pub use state::{ParseDiagnostic, ParserState};

use csz_common::cancellation::{CancellationToken, Cancelled};
use csz_common::diagnostics::diagnostic_codes;
use std::sync::Arc;

/// The product of a parse: arena, root, diagnostics, and the source text the
/// token ranges index into.
pub struct SyntaxTree {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub source: Arc<str>,
}

impl SyntaxTree {
    /// Full text of a subtree, trivia included.
    pub fn text_of(&self, node: NodeIndex) -> String {
        self.arena.node_full_text(node, &self.source)
    }

    /// Full text of the whole tree. For a compilation-unit root this is the
    /// original input, byte for byte.
    pub fn full_text(&self) -> String {
        self.text_of(self.root)
    }
}

impl ParserState {
    /// Parse a whole compilation unit. Total: always returns a tree.
    pub fn parse_compilation_unit(&mut self) -> NodeIndex {
        tracing::debug!(file = %self.file_name, "parsing compilation unit");
        match self.parse_compilation_unit_core() {
            Ok(root) => root,
            // Unreachable without a cancellation token installed; kept total
            // regardless.
            Err(Cancelled) => self.error_node(),
        }
    }

    /// Parse a whole compilation unit, polling the token at each top-level
    /// declaration or statement start.
    pub fn parse_compilation_unit_cancellable(
        &mut self,
        token: &CancellationToken,
    ) -> Result<NodeIndex, Cancelled> {
        self.set_cancellation(token.clone());
        self.parse_compilation_unit_core()
    }

    /// Parse a single statement fragment.
    pub fn parse_statement_root(&mut self) -> NodeIndex {
        let statement = self.parse_statement();
        self.finish_fragment(statement)
    }

    /// Parse a single expression fragment.
    pub fn parse_expression_root(&mut self) -> NodeIndex {
        let expression = self.parse_expression();
        self.finish_fragment(expression)
    }

    /// Parse a single type-name fragment.
    pub fn parse_type_root(&mut self) -> NodeIndex {
        let parsed = self.parse_type();
        self.finish_fragment(parsed)
    }

    /// Parse a single member-declaration fragment.
    pub fn parse_member_root(&mut self) -> NodeIndex {
        let member = self.parse_member_declaration();
        self.finish_fragment(member)
    }

    /// Parse a single attribute-list fragment.
    pub fn parse_attribute_list_root(&mut self) -> NodeIndex {
        let list = self.parse_attribute_list();
        self.finish_fragment(list)
    }

    /// Trailing tokens after a fragment are skipped (with one diagnostic)
    /// so fragment entry points are total too.
    fn finish_fragment(&mut self, node: NodeIndex) -> NodeIndex {
        if !self.cursor.is_at_end() {
            self.skip_bad_tokens(
                "Unexpected tokens after the parsed fragment",
                diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                |_| false,
            );
        }
        node
    }

    /// Consume the parser, yielding the tree rooted at `root` (as returned
    /// by one of the entry points) together with everything needed to read
    /// it back.
    pub fn into_tree(self, root: NodeIndex) -> SyntaxTree {
        let mut diagnostics = self.parse_diagnostics;
        diagnostics.sort_by_key(|d| d.start);
        SyntaxTree {
            arena: self.arena,
            root,
            diagnostics,
            source: self.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csz_scanner::SyntaxKind;

    #[test]
    fn compilation_unit_root_always_exists() {
        let mut parser = ParserState::new("test.csz".into(), String::new());
        let root = parser.parse_compilation_unit();
        let tree = parser.into_tree(root);
        assert_eq!(tree.arena.kind(root), SyntaxKind::CompilationUnit);
        assert_eq!(tree.full_text(), "");
    }

    #[test]
    fn fragment_entry_points_skip_trailing_garbage() {
        let mut parser = ParserState::new("test.csz".into(), "a + b ; ; ;".into());
        let root = parser.parse_expression_root();
        assert_eq!(parser.get_arena().kind(root), SyntaxKind::BinaryExpression);
        assert!(!parser.get_diagnostics().is_empty());
    }

    #[test]
    fn cancellation_surfaces_as_err() {
        let token = CancellationToken::new();
        token.cancel();
        let mut parser = ParserState::new("test.csz".into(), "class C { }".into());
        assert_eq!(
            parser.parse_compilation_unit_cancellable(&token),
            Err(Cancelled)
        );
    }
}
