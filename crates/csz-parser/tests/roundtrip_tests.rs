// Full-fidelity invariant: concatenating the tree's tokens and trivia must
// reproduce the input byte for byte, for well-formed and malformed inputs
// alike. Speculative scans must leave no trace on inputs that parse clean.

use csz_parser::{NodeIndex, ParserState, SyntaxTree};

fn parse(source: &str) -> (SyntaxTree, NodeIndex) {
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_compilation_unit();
    (parser.into_tree(root), root)
}

fn assert_round_trip(source: &str) {
    let (tree, _) = parse(source);
    assert_eq!(tree.full_text(), source, "round trip failed for: {:?}", source);
}

#[test]
fn test_well_formed_program_round_trips() {
    let source = r#"// File header comment.
using System;

namespace Geometry
{
    /* A point in the plane. */
    public class Point
    {
        private int x, y;   // coordinates

        public Point(int x, int y)
        {
            this.x = x;
            this.y = y;
        }

        public int LengthSquared => x * x + y * y;
    }
}
"#;
    assert_round_trip(source);
}

#[test]
fn test_odd_whitespace_round_trips() {
    assert_round_trip("class\tC\r\n{\r\n\tint  x ;\r\n}\r\n");
    assert_round_trip("   \n\n  class C { }  \n");
    assert_round_trip("");
    assert_round_trip("\n");
}

#[test]
fn test_malformed_inputs_round_trip() {
    let sources = [
        "class",
        "class C {",
        "class C { int }",
        "int x = ;",
        "namespace { }",
        "using ;",
        "x + + ;",
        "((((",
        "} } }",
        "class C { void M( { } }",
        "[Attr class C { }",
    ];
    for source in sources {
        assert_round_trip(source);
    }
}

#[test]
fn test_garbage_bytes_round_trip() {
    assert_round_trip("@#$ %^ ~ `` class C { } §§");
    assert_round_trip("\u{0}\u{1}\u{2}");
}

#[test]
fn test_ambiguous_inputs_parse_without_diagnostics() {
    // Each of these forces a speculative scan; a released or restored
    // checkpoint must not leave diagnostics behind.
    let sources = [
        "class C { void M() { var r = (a < b, c > d); } }",
        "class C { void M() { var r = f<int, string>(x); } }",
        "class C { void M() { var r = (Foo)(-bar); } }",
        "class C { void M() { var r = x is int? ? a : b; } }",
        "class C { void M() { var r = cond ? f() : g(); } }",
        "class C { void M() { Func<int, int> f = (a) => a + 1; } }",
        "class C { void M() { var q = from item in items where item > 0 select item; } }",
    ];
    for source in sources {
        let (tree, _) = parse(source);
        assert!(
            tree.diagnostics.is_empty(),
            "unexpected diagnostics for {:?}: {:?}",
            source,
            tree.diagnostics
        );
        assert_eq!(tree.full_text(), source);
    }
}

#[test]
fn test_merged_operator_tokens_round_trip() {
    assert_round_trip("class C { void M() { x = a >> 2; y >>= 1; } }");
    assert_round_trip("class C { void M() { var l = new List<List<int>>(); } }");
}

#[test]
fn test_directive_like_trivia_round_trips() {
    // Comments that look like code must stay trivia.
    assert_round_trip("class C { // int x = 1;\n }");
    assert_round_trip("class C { /* } */ }");
}

#[test]
fn test_subtree_text_carries_its_own_trivia() {
    let (tree, root) = parse("  class C { }  ");
    let class = tree
        .arena
        .children_of_kind(root, csz_scanner::SyntaxKind::ClassDeclaration)[0];
    // Leading trivia of the file attaches to the class keyword; the trailing
    // spaces belong to the closing brace.
    assert_eq!(tree.text_of(class), "  class C { }  ");
}
