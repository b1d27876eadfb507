//! Green-tree node storage.
//!
//! Nodes are immutable once built: a `GreenNode` owns an ordered sequence of
//! children (token indices and/or node indices), is tagged by kind, and
//! aggregates child flags bottom-up. Nodes live contiguously in a `NodeArena`
//! and are referenced by index; abandoning a speculative branch truncates the
//! arena back to a checkpoint, discarding the branch wholesale.
//!
//! The arena also owns the in-tree tokens, in source order. Concatenating
//! every token's leading trivia, text, and trailing trivia reproduces the
//! original input exactly - that ordering is the full-fidelity guarantee.

use bitflags::bitflags;
use csz_scanner::{SyntaxKind, Token};
use smallvec::SmallVec;

use csz_common::limits::MAX_NODE_PREALLOC;

/// Index of a node in the arena. `NONE` is the absent-child sentinel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

/// Index of an in-tree token in the arena's token vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenIndex(pub u32);

/// One ordered child of a green node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GreenElement {
    Token(TokenIndex),
    Node(NodeIndex),
}

bitflags! {
    /// Per-node flags aggregated bottom-up, plus the ambient context bits
    /// captured at parse time (consulted by the incremental reuse engine).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u16 {
        /// The node or one of its descendants carries a diagnostic.
        const CONTAINS_DIAGNOSTICS = 1 << 0;
        /// The node or one of its descendants holds skipped-token trivia.
        const CONTAINS_SKIPPED_TEXT = 1 << 1;
        /// The node or one of its descendants has a missing token.
        const CONTAINS_MISSING = 1 << 2;
        /// Parsed while the async context flag was active.
        const ASYNC_CONTEXT = 1 << 3;
        /// Parsed while the query context flag was active.
        const QUERY_CONTEXT = 1 << 4;

        const CONTEXT_MASK = Self::ASYNC_CONTEXT.bits() | Self::QUERY_CONTEXT.bits();
    }
}

pub type ChildList = SmallVec<[GreenElement; 4]>;

#[derive(Clone, Debug)]
pub struct GreenNode {
    pub kind: SyntaxKind,
    pub flags: NodeFlags,
    /// Extent recorded when the node was built (token text extents, not
    /// including trivia attached afterwards by error recovery). Use
    /// [`NodeArena::full_extent`] when the authoritative range is needed.
    pub pos: u32,
    pub end: u32,
    pub children: ChildList,
}

/// Arena-based storage for the green tree.
#[derive(Default, Debug)]
pub struct NodeArena {
    pub nodes: Vec<GreenNode>,
    /// In-tree tokens, in source order.
    pub tokens: Vec<Token>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena pre-sized from a token-count heuristic.
    pub fn with_token_capacity(token_count: usize) -> NodeArena {
        let capacity = token_count.min(MAX_NODE_PREALLOC);
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            tokens: Vec::with_capacity(capacity),
        }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    pub fn add_token(&mut self, token: Token) -> TokenIndex {
        let index = TokenIndex(self.tokens.len() as u32);
        self.tokens.push(token);
        index
    }

    pub fn token(&self, index: TokenIndex) -> &Token {
        &self.tokens[index.0 as usize]
    }

    pub fn last_token_index(&self) -> Option<TokenIndex> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(TokenIndex(self.tokens.len() as u32 - 1))
        }
    }

    /// Replace the stored token with a wrapped copy. Tokens are immutable
    /// values; "attaching" skipped trivia builds a new token.
    pub fn replace_token(&mut self, index: TokenIndex, token: Token) {
        self.tokens[index.0 as usize] = token;
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    pub fn add_node(&mut self, node: GreenNode) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    pub fn get(&self, index: NodeIndex) -> Option<&GreenNode> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    pub fn kind(&self, index: NodeIndex) -> SyntaxKind {
        self.get(index).map_or(SyntaxKind::None, |n| n.kind)
    }

    /// Build a node from already-parsed children, aggregating child flags.
    /// `context` carries the ambient context bits captured at parse time.
    pub fn finish_node(
        &mut self,
        kind: SyntaxKind,
        children: ChildList,
        context: NodeFlags,
    ) -> NodeIndex {
        let mut flags = context & NodeFlags::CONTEXT_MASK;
        let mut pos = u32::MAX;
        let mut end = 0u32;
        for child in &children {
            match *child {
                GreenElement::Token(t) => {
                    let token = self.token(t);
                    if token.is_missing {
                        flags |= NodeFlags::CONTAINS_MISSING | NodeFlags::CONTAINS_DIAGNOSTICS;
                    }
                    if token
                        .leading
                        .iter()
                        .chain(token.trailing.iter())
                        .any(|p| p.kind == SyntaxKind::SkippedTokensTrivia)
                    {
                        flags |= NodeFlags::CONTAINS_SKIPPED_TEXT
                            | NodeFlags::CONTAINS_DIAGNOSTICS;
                    }
                    pos = pos.min(token.pos);
                    end = end.max(token.end);
                }
                GreenElement::Node(n) => {
                    if let Some(node) = self.get(n) {
                        flags |= node.flags
                            & (NodeFlags::CONTAINS_DIAGNOSTICS
                                | NodeFlags::CONTAINS_SKIPPED_TEXT
                                | NodeFlags::CONTAINS_MISSING);
                        pos = pos.min(node.pos);
                        end = end.max(node.end);
                    }
                }
            }
        }
        if pos == u32::MAX {
            pos = 0;
            end = 0;
        }
        self.add_node(GreenNode {
            kind,
            flags,
            pos,
            end,
            children,
        })
    }

    /// Truncate back to a snapshot, discarding speculative nodes and tokens.
    pub fn truncate(&mut self, node_count: usize, token_count: usize) {
        self.nodes.truncate(node_count);
        self.tokens.truncate(token_count);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// First in-tree token of a subtree, by child order.
    pub fn first_token(&self, index: NodeIndex) -> Option<TokenIndex> {
        let node = self.get(index)?;
        for child in &node.children {
            match *child {
                GreenElement::Token(t) => return Some(t),
                GreenElement::Node(n) => {
                    if let Some(t) = self.first_token(n) {
                        return Some(t);
                    }
                }
            }
        }
        None
    }

    /// Last in-tree token of a subtree, by child order.
    pub fn last_token(&self, index: NodeIndex) -> Option<TokenIndex> {
        let node = self.get(index)?;
        for child in node.children.iter().rev() {
            match *child {
                GreenElement::Token(t) => return Some(t),
                GreenElement::Node(n) => {
                    if let Some(t) = self.last_token(n) {
                        return Some(t);
                    }
                }
            }
        }
        None
    }

    /// Authoritative full extent of a subtree including trivia, computed from
    /// the live tokens (recovery may attach trivia after a node is built).
    pub fn full_extent(&self, index: NodeIndex) -> (u32, u32) {
        let first = self.first_token(index);
        let last = self.last_token(index);
        match (first, last) {
            (Some(f), Some(l)) => (self.token(f).full_start(), self.token(l).full_end()),
            _ => {
                let node = self.get(index).map(|n| (n.pos, n.end)).unwrap_or((0, 0));
                node
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csz_scanner::Token;

    #[test]
    fn finish_node_aggregates_missing_flag() {
        let mut arena = NodeArena::new();
        let ok = arena.add_token(Token::new(SyntaxKind::Identifier, 0, 1));
        let missing = arena.add_token(Token::missing(SyntaxKind::SemicolonToken, 1));
        let mut children = ChildList::new();
        children.push(GreenElement::Token(ok));
        children.push(GreenElement::Token(missing));
        let node = arena.finish_node(
            SyntaxKind::ExpressionStatement,
            children,
            NodeFlags::empty(),
        );
        let green = arena.get(node).unwrap();
        assert!(green.flags.contains(NodeFlags::CONTAINS_MISSING));
        assert!(green.flags.contains(NodeFlags::CONTAINS_DIAGNOSTICS));
        assert_eq!((green.pos, green.end), (0, 1));
    }

    #[test]
    fn truncate_discards_speculative_content() {
        let mut arena = NodeArena::new();
        let nodes_before = arena.nodes.len();
        let tokens_before = arena.tokens.len();
        arena.add_token(Token::new(SyntaxKind::Identifier, 0, 1));
        let children = ChildList::new();
        arena.finish_node(SyntaxKind::IdentifierName, children, NodeFlags::empty());
        arena.truncate(nodes_before, tokens_before);
        assert!(arena.nodes.is_empty());
        assert!(arena.tokens.is_empty());
    }
}
