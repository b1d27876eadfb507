//! Incremental reuse of top-level nodes from a previous parse.
//!
//! Reuse is consulted only at top-level member/statement granularity, and
//! correctness never depends on it firing: the engine is bypassed entirely
//! when no previous tree is supplied, and every candidate check is
//! conservative. A node is promoted only when its kind still matches the
//! construct about to be parsed, its recorded context flags equal the
//! parser's current flags, and its full span does not intersect the edited
//! range. Promotion deep-copies the subtree between arenas - sound because
//! green nodes are immutable and self-contained - with every position
//! shifted by the edit delta, and carries the node's diagnostics over.

use csz_common::TextChangeRange;
use csz_scanner::{SyntaxKind, Token, TriviaPiece};
use rustc_hash::FxHashMap;

use super::arena::{ChildList, GreenElement, GreenNode, NodeArena, NodeFlags, NodeIndex};
use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_QUERY, ParseDiagnostic, ParserState,
};
use super::SyntaxTree;

/// One promotable top-level node from the previous tree.
#[derive(Debug)]
struct Candidate {
    node: NodeIndex,
    kind: SyntaxKind,
    context: NodeFlags,
    /// Full extent in the *new* source (edit delta already applied).
    full_start: u32,
    full_end: u32,
    /// Position delta between the old and new source for this node.
    shift: i64,
    diagnostics: Vec<ParseDiagnostic>,
}

/// Candidates harvested from a previous parse, keyed by their full start in
/// the new source.
#[derive(Debug)]
pub struct ReusableNodes {
    old_nodes: Vec<GreenNode>,
    old_tokens: Vec<Token>,
    candidates: Vec<Candidate>,
    by_start: FxHashMap<u32, usize>,
}

impl ReusableNodes {
    /// Harvest the direct children of the previous tree's root that survive
    /// the given edit.
    pub fn from_previous(tree: &SyntaxTree, change: TextChangeRange) -> ReusableNodes {
        let delta = change.delta();
        let mut candidates = Vec::new();
        if let Some(root) = tree.arena.get(tree.root) {
            for child in &root.children {
                let GreenElement::Node(node) = *child else {
                    continue;
                };
                let (old_start, old_end) = tree.arena.full_extent(node);
                if old_start == old_end {
                    continue;
                }
                let shift = if old_end <= change.span.start {
                    0i64
                } else if old_start >= change.span.end {
                    delta
                } else {
                    continue;
                };
                let diagnostics = tree
                    .diagnostics
                    .iter()
                    .filter(|d| d.start >= old_start && d.start < old_end)
                    .map(|d| ParseDiagnostic {
                        start: apply_shift(d.start, shift),
                        length: d.length,
                        message: d.message.clone(),
                        code: d.code,
                    })
                    .collect();
                let green = match tree.arena.get(node) {
                    Some(green) => green,
                    None => continue,
                };
                candidates.push(Candidate {
                    node,
                    kind: green.kind,
                    context: green.flags & NodeFlags::CONTEXT_MASK,
                    full_start: apply_shift(old_start, shift),
                    full_end: apply_shift(old_end, shift),
                    shift,
                    diagnostics,
                });
            }
        }
        let by_start = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.full_start, i))
            .collect();
        ReusableNodes {
            old_nodes: tree.arena.nodes.clone(),
            old_tokens: tree.arena.tokens.clone(),
            candidates,
            by_start,
        }
    }

    /// Candidate starting exactly at `position`, if any. Does not consume it.
    fn peek_at(&self, position: u32) -> Option<&Candidate> {
        let index = *self.by_start.get(&position)?;
        self.candidates.get(index)
    }
}

fn apply_shift(position: u32, shift: i64) -> u32 {
    (i64::from(position) + shift) as u32
}

fn shift_trivia(piece: &TriviaPiece, shift: i64) -> TriviaPiece {
    TriviaPiece::new(
        piece.kind,
        apply_shift(piece.pos, shift),
        apply_shift(piece.end, shift),
    )
}

fn shift_token(token: &Token, shift: i64) -> Token {
    let mut shifted = token.clone();
    shifted.pos = apply_shift(token.pos, shift);
    shifted.end = apply_shift(token.end, shift);
    shifted.leading = token.leading.iter().map(|p| shift_trivia(p, shift)).collect();
    shifted.trailing = token.trailing.iter().map(|p| shift_trivia(p, shift)).collect();
    shifted
}

/// Deep-copy a subtree out of the old arena, shifting every position.
fn promote(
    old_nodes: &[GreenNode],
    old_tokens: &[Token],
    node: NodeIndex,
    shift: i64,
    arena: &mut NodeArena,
) -> NodeIndex {
    let green = &old_nodes[node.0 as usize];
    let mut children = ChildList::with_capacity(green.children.len());
    for child in &green.children {
        match *child {
            GreenElement::Token(t) => {
                let token = shift_token(&old_tokens[t.0 as usize], shift);
                children.push(GreenElement::Token(arena.add_token(token)));
            }
            GreenElement::Node(n) => {
                let copied = promote(old_nodes, old_tokens, n, shift, arena);
                children.push(GreenElement::Node(copied));
            }
        }
    }
    arena.add_node(GreenNode {
        kind: green.kind,
        flags: green.flags,
        pos: apply_shift(green.pos, shift),
        end: apply_shift(green.end, shift),
        children,
    })
}

impl ParserState {
    /// Supply candidates harvested from a previous parse of an edited
    /// version of this source.
    pub fn set_reusable(&mut self, reusable: ReusableNodes) {
        self.reusable = Some(reusable);
    }

    /// The current parser context, expressed in the flag bits recorded on
    /// nodes at build time.
    fn current_context(&self) -> NodeFlags {
        let mut context = NodeFlags::empty();
        if self.context_flags & CONTEXT_FLAG_ASYNC != 0 {
            context |= NodeFlags::ASYNC_CONTEXT;
        }
        if self.context_flags & CONTEXT_FLAG_QUERY != 0 {
            context |= NodeFlags::QUERY_CONTEXT;
        }
        context
    }

    /// Cheap forward check that the old node's kind still matches what the
    /// parser is looking at. Anything unrecognized is declined.
    fn reuse_kind_still_applies(&self, kind: SyntaxKind) -> bool {
        match kind {
            SyntaxKind::UsingDirective => self.is_token(SyntaxKind::UsingKeyword),
            SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration => {
                self.is_token(SyntaxKind::NamespaceKeyword)
            }
            SyntaxKind::GlobalStatement => self.is_statement_start(),
            SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::RecordDeclaration
            | SyntaxKind::FieldDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::IncompleteMember => self.is_namespace_member_start(),
            _ => false,
        }
    }

    /// Try to promote a node from the previous tree at the current position.
    /// Returns the promoted node, with the cursor advanced past its tokens.
    pub(crate) fn try_reuse_top_level(&mut self) -> Option<NodeIndex> {
        if self.reusable.is_none() || self.in_speculation() {
            return None;
        }
        let position = self.token_full_start();
        let context = self.current_context();

        // Borrow the candidate list briefly to decide, then promote.
        let (node, kind, shift, full_end, diagnostics) = {
            let reusable = self.reusable.as_ref()?;
            let candidate = reusable.peek_at(position)?;
            if candidate.context != context {
                return None;
            }
            (
                candidate.node,
                candidate.kind,
                candidate.shift,
                candidate.full_end,
                candidate.diagnostics.clone(),
            )
        };
        if !self.reuse_kind_still_applies(kind) {
            return None;
        }
        // The node must end exactly on a token boundary of the new stream.
        let landing = self.cursor.find_boundary(full_end)?;

        let mut reusable = self.reusable.take()?;
        reusable.by_start.remove(&position);
        let promoted = promote(
            &reusable.old_nodes,
            &reusable.old_tokens,
            node,
            shift,
            &mut self.arena,
        );
        self.reusable = Some(reusable);
        self.parse_diagnostics.extend(diagnostics);
        self.cursor.skip_to(landing);
        Some(promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_token_moves_text_and_trivia() {
        let mut token = Token::new(SyntaxKind::Identifier, 10, 13);
        token
            .leading
            .push(TriviaPiece::new(SyntaxKind::WhitespaceTrivia, 8, 10));
        let shifted = shift_token(&token, 5);
        assert_eq!((shifted.pos, shifted.end), (15, 18));
        assert_eq!(shifted.leading[0].pos, 13);
        let back = shift_token(&shifted, -5);
        assert_eq!(back, token);
    }
}
