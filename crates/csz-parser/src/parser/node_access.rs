//! Read-side helpers over the green tree: token iteration, text
//! reconstruction, and child navigation.

use csz_scanner::SyntaxKind;

use super::arena::{GreenElement, NodeArena, NodeIndex, TokenIndex};

impl NodeArena {
    /// Visit every in-tree token of a subtree, in source order.
    pub fn for_each_token(&self, index: NodeIndex, f: &mut impl FnMut(TokenIndex)) {
        let Some(node) = self.get(index) else {
            return;
        };
        for child in &node.children {
            match *child {
                GreenElement::Token(t) => f(t),
                GreenElement::Node(n) => self.for_each_token(n, f),
            }
        }
    }

    /// Reconstruct the full text of a subtree, trivia included.
    pub fn node_full_text(&self, index: NodeIndex, source: &str) -> String {
        let mut out = String::new();
        self.for_each_token(index, &mut |t| {
            self.token(t).write_full_text(source, &mut out);
        });
        out
    }

    /// Direct child nodes of the given kind.
    pub fn children_of_kind(&self, index: NodeIndex, kind: SyntaxKind) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        if let Some(node) = self.get(index) {
            for child in &node.children {
                if let GreenElement::Node(n) = *child {
                    if self.kind(n) == kind {
                        out.push(n);
                    }
                }
            }
        }
        out
    }

    /// First descendant (preorder, the node itself included) of the given
    /// kind.
    pub fn find_descendant(&self, index: NodeIndex, kind: SyntaxKind) -> Option<NodeIndex> {
        if self.kind(index) == kind {
            return Some(index);
        }
        let node = self.get(index)?;
        for child in &node.children {
            if let GreenElement::Node(n) = *child {
                if let Some(found) = self.find_descendant(n, kind) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Count every descendant node of the given kind, the node itself
    /// included.
    pub fn count_descendants(&self, index: NodeIndex, kind: SyntaxKind) -> usize {
        let mut count = usize::from(self.kind(index) == kind);
        if let Some(node) = self.get(index) {
            for child in &node.children {
                if let GreenElement::Node(n) = *child {
                    count += self.count_descendants(n, kind);
                }
            }
        }
        count
    }

    /// True if any in-tree token of the subtree is a synthesized missing
    /// token.
    pub fn contains_missing_token(&self, index: NodeIndex) -> bool {
        let mut found = false;
        self.for_each_token(index, &mut |t| {
            found |= self.token(t).is_missing;
        });
        found
    }
}
