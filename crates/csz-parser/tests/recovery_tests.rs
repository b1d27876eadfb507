// Error recovery: missing tokens, skipped tokens, incomplete members, and
// the recursion guard. Every malformed input must still round-trip.

use csz_parser::{NodeIndex, ParserState, SyntaxTree};
use csz_scanner::SyntaxKind;

fn parse(source: &str) -> (SyntaxTree, NodeIndex) {
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_compilation_unit();
    (parser.into_tree(root), root)
}

#[test]
fn test_unterminated_class_inserts_missing_tokens() {
    let source = "class C { int x";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source);
    assert!(tree.arena.contains_missing_token(root));
    assert!(!tree.diagnostics.is_empty());
    // The class and its field are still in the tree.
    assert!(tree.arena.find_descendant(root, SyntaxKind::ClassDeclaration).is_some());
    assert!(tree.arena.find_descendant(root, SyntaxKind::FieldDeclaration).is_some());
}

#[test]
fn test_skipped_tokens_are_preserved() {
    let source = "class C { ) int x; }";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source, "skipped tokens must stay in the text");
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 1520),
        "got: {:?}",
        tree.diagnostics
    );
    assert!(tree.arena.find_descendant(root, SyntaxKind::FieldDeclaration).is_some());
}

#[test]
fn test_missing_initializer_expression() {
    let mut parser = ParserState::new("test.csz".to_string(), "int x = ;".to_string());
    let root = parser.parse_statement_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalDeclarationStatement);
    assert_eq!(tree.full_text(), "int x = ;");
    // A known token in operand position reports "invalid expression term",
    // not the bare "expression expected".
    assert!(
        tree.diagnostics
            .iter()
            .any(|d| d.code == 1525 && d.message.contains("';'")),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_modifiers_without_member_become_incomplete_member() {
    let source = "class C { public }";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::IncompleteMember)
            .is_some()
    );
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 1520),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_stray_close_brace_at_top_level() {
    let source = "}\nclass C { }";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source);
    assert!(tree.arena.find_descendant(root, SyntaxKind::ClassDeclaration).is_some());
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 1022),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_deep_nesting_degrades_with_one_diagnostic() {
    let mut source = "(".repeat(3000);
    source.push('x');
    let mut parser = ParserState::new("test.csz".to_string(), source.clone());
    let root = parser.parse_expression_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.full_text(), source);
    let overflows = tree.diagnostics.iter().filter(|d| d.code == 8078).count();
    assert_eq!(overflows, 1, "got: {:?}", tree.diagnostics.len());
}

#[test]
fn test_deeply_nested_compilation_unit_is_total() {
    let mut source = String::from("class C { void M() { ");
    for _ in 0..2500 {
        source.push_str("if (a) ");
    }
    source.push_str("f();");
    let mut parser = ParserState::new("test.csz".to_string(), source.clone());
    let root = parser.parse_compilation_unit();
    let tree = parser.into_tree(root);
    assert_eq!(tree.full_text(), source);
    let overflows = tree.diagnostics.iter().filter(|d| d.code == 8078).count();
    assert!(overflows <= 1, "got: {}", overflows);
}

#[test]
fn test_cascading_errors_are_suppressed() {
    // A run of missing tokens at one position produces one diagnostic for
    // that position, not one per insertion.
    let (tree, _) = parse("class C { int ");
    let mut starts: Vec<u32> = tree.diagnostics.iter().map(|d| d.start).collect();
    let before = starts.len();
    starts.dedup();
    assert_eq!(starts.len(), before, "got: {:?}", tree.diagnostics);
}

#[test]
fn test_error_survives_abandoned_speculation() {
    // The `?[` retry abandons a speculative branch that already reported
    // the broken index expression; re-reporting it on the committed branch
    // must not be swallowed by cascade suppression.
    let source = "class C { void M() { var r = a ? b?[c +] : d; } }";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source);
    assert!(tree.arena.contains_missing_token(root));
    assert!(
        !tree.diagnostics.is_empty(),
        "malformed input must carry a diagnostic"
    );
}

#[test]
fn test_garbage_between_members_recovers() {
    let source = "class C { int a; = = int b; }";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source);
    let class = tree
        .arena
        .find_descendant(root, SyntaxKind::ClassDeclaration)
        .expect("class");
    assert_eq!(tree.arena.count_descendants(class, SyntaxKind::FieldDeclaration), 2);
}

#[test]
fn test_statement_list_recovers_after_bad_token() {
    let source = "{ f(); ] g(); }";
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_statement_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.full_text(), source);
    assert_eq!(
        tree.arena.count_descendants(root, SyntaxKind::ExpressionStatement),
        2
    );
}

#[test]
fn test_unknown_characters_round_trip() {
    let source = "class C { int x = 1; § }";
    let (tree, root) = parse(source);
    assert_eq!(tree.full_text(), source);
    assert!(tree.arena.find_descendant(root, SyntaxKind::FieldDeclaration).is_some());
    assert!(!tree.diagnostics.is_empty());
}
