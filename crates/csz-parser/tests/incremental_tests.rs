// Incremental reparse: supplying a previous tree plus an edit range must be
// observably identical to a fresh parse of the new text.

use csz_common::{TextChangeRange, TextSpan};
use csz_parser::{NodeIndex, ParserState, ReusableNodes, SyntaxTree};
use csz_scanner::SyntaxKind;

fn parse(source: &str) -> (SyntaxTree, NodeIndex) {
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_compilation_unit();
    (parser.into_tree(root), root)
}

/// Reparse `new_source` reusing `previous`, where the edit replaced
/// `[change_start, change_old_end)` of the old text.
fn reparse(
    previous: &SyntaxTree,
    new_source: &str,
    change_start: u32,
    change_old_end: u32,
    change_new_end: u32,
) -> (SyntaxTree, NodeIndex) {
    let change = TextChangeRange::new(
        TextSpan::new(change_start, change_old_end),
        change_new_end - change_start,
    );
    let reusable = ReusableNodes::from_previous(previous, change);
    let mut parser = ParserState::new("test.csz".to_string(), new_source.to_string());
    parser.set_reusable(reusable);
    let root = parser.parse_compilation_unit();
    (parser.into_tree(root), root)
}

fn assert_trees_equivalent(incremental: &SyntaxTree, fresh: &SyntaxTree, source: &str) {
    assert_eq!(incremental.full_text(), source);
    assert_eq!(fresh.full_text(), source);
    for kind in [
        SyntaxKind::ClassDeclaration,
        SyntaxKind::MethodDeclaration,
        SyntaxKind::FieldDeclaration,
        SyntaxKind::UsingDirective,
        SyntaxKind::GlobalStatement,
        SyntaxKind::IncompleteMember,
    ] {
        assert_eq!(
            incremental.arena.count_descendants(incremental.root, kind),
            fresh.arena.count_descendants(fresh.root, kind),
            "node count mismatch for {:?}",
            kind
        );
    }
    let incremental_diags: Vec<(u32, u32)> = incremental
        .diagnostics
        .iter()
        .map(|d| (d.start, d.code))
        .collect();
    let fresh_diags: Vec<(u32, u32)> =
        fresh.diagnostics.iter().map(|d| (d.start, d.code)).collect();
    assert_eq!(incremental_diags, fresh_diags);
}

#[test]
fn test_edit_inside_one_member_is_transparent() {
    let v1 = "class A { void M() { say(); } }\nclass B { int x; }\n";
    let (tree1, _) = parse(v1);

    let start = v1.find("int x").unwrap() as u32;
    let v2 = v1.replace("int x", "long y");
    let (incremental, _) = reparse(
        &tree1,
        &v2,
        start,
        start + "int x".len() as u32,
        start + "long y".len() as u32,
    );
    let (fresh, _) = parse(&v2);
    assert_trees_equivalent(&incremental, &fresh, &v2);
    assert!(incremental.diagnostics.is_empty(), "got: {:?}", incremental.diagnostics);
}

#[test]
fn test_insert_before_members_shifts_positions() {
    // Class D carries a diagnostic; after inserting text ahead of it, the
    // carried diagnostic must land at the shifted position.
    let v1 = "class D { int }\nclass E { }\n";
    let (tree1, _) = parse(v1);
    assert!(!tree1.diagnostics.is_empty());

    let prefix = "using X;\n";
    let v2 = format!("{prefix}{v1}");
    let (incremental, _) = reparse(&tree1, &v2, 0, 0, prefix.len() as u32);
    let (fresh, _) = parse(&v2);
    assert_trees_equivalent(&incremental, &fresh, &v2);
}

#[test]
fn test_append_member_at_end() {
    let v1 = "class A { }\n";
    let (tree1, _) = parse(v1);

    let v2 = format!("{v1}class B {{ int x; }}\n");
    let old_len = v1.len() as u32;
    let (incremental, _) = reparse(&tree1, &v2, old_len, old_len, v2.len() as u32);
    let (fresh, _) = parse(&v2);
    assert_trees_equivalent(&incremental, &fresh, &v2);
    assert_eq!(
        incremental
            .arena
            .count_descendants(incremental.root, SyntaxKind::ClassDeclaration),
        2
    );
}

#[test]
fn test_edit_spanning_members_reparses_both() {
    let v1 = "class A { int a; }\nclass B { int b; }\n";
    let (tree1, _) = parse(v1);

    // Replace the gap between the classes and their adjacent braces, so
    // neither old class node survives intact.
    let start = v1.find("}\nclass B").unwrap() as u32;
    let v2 = v1.replace("}\nclass B", "}\nclass Replaced");
    let (incremental, _) = reparse(
        &tree1,
        &v2,
        start,
        start + "}\nclass B".len() as u32,
        start + "}\nclass Replaced".len() as u32,
    );
    let (fresh, _) = parse(&v2);
    assert_trees_equivalent(&incremental, &fresh, &v2);
}

#[test]
fn test_edit_that_changes_member_kind() {
    // The old candidate at this position was a class; after the edit the
    // text is an enum. The kind check must decline reuse.
    let v1 = "class A { }\nclass B { }\n";
    let (tree1, _) = parse(v1);

    let v2 = "enum  A { }\nclass B { }\n";
    let (incremental, _) = reparse(&tree1, v2, 0, 5, 5);
    let (fresh, _) = parse(v2);
    assert_trees_equivalent(&incremental, &fresh, v2);
    assert_eq!(
        incremental
            .arena
            .count_descendants(incremental.root, SyntaxKind::EnumDeclaration),
        1
    );
}

#[test]
fn test_global_statements_are_reusable() {
    let v1 = "say(1);\nsay(2);\nclass C { }\n";
    let (tree1, _) = parse(v1);

    let start = v1.find("say(2)").unwrap() as u32;
    let v2 = v1.replace("say(2)", "shout(2)");
    let (incremental, _) = reparse(
        &tree1,
        &v2,
        start,
        start + "say(2)".len() as u32,
        start + "shout(2)".len() as u32,
    );
    let (fresh, _) = parse(&v2);
    assert_trees_equivalent(&incremental, &fresh, &v2);
}
