// Statement parsing: the declaration-vs-expression split, control flow,
// local functions, and statement-level recovery points.

use csz_parser::{NodeIndex, ParserState, SyntaxTree};
use csz_scanner::SyntaxKind;

fn parse_stmt(source: &str) -> (SyntaxTree, NodeIndex) {
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_statement_root();
    (parser.into_tree(root), root)
}

#[test]
fn test_generic_type_local_declaration() {
    // `List<int> x = null;` resolves the `<` in favor of a declaration.
    let (tree, root) = parse_stmt("List<int> x = null;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalDeclarationStatement);
    assert!(tree.arena.find_descendant(root, SyntaxKind::GenericName).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_comparison_expression_statement() {
    let (tree, root) = parse_stmt("a < b;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ExpressionStatement);
    assert!(tree.arena.find_descendant(root, SyntaxKind::BinaryExpression).is_some());
}

#[test]
fn test_adjacent_identifiers_read_as_declaration() {
    let (tree, root) = parse_stmt("Foo bar;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalDeclarationStatement);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_multiple_declarators_and_const() {
    let (tree, root) = parse_stmt("int x = 1, y = 2, z;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalDeclarationStatement);
    assert_eq!(
        tree.arena.count_descendants(root, SyntaxKind::VariableDeclarator),
        3
    );

    let (tree, root) = parse_stmt("const int limit = 10;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalDeclarationStatement);
    assert!(tree.diagnostics.is_empty());
}

#[test]
fn test_local_function() {
    let (tree, root) = parse_stmt("int add(int a, int b) => a + b;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalFunctionStatement);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::ArrowExpressionClause)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);

    let (tree, root) = parse_stmt("static T id<T>(T value) where T : class { return value; }");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalFunctionStatement);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::TypeParameterConstraintClause)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_if_else_binds_to_nearest_if() {
    let (tree, root) = parse_stmt("if (a) if (b) f(); else g();");
    assert_eq!(tree.arena.kind(root), SyntaxKind::IfStatement);
    let outer_else = tree
        .arena
        .children_of_kind(root, SyntaxKind::ElseClause);
    assert!(outer_else.is_empty(), "else must attach to the inner if");
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::ElseClause), 1);
}

#[test]
fn test_for_statement_with_declaration_and_incrementors() {
    let (tree, root) = parse_stmt("for (int i = 0; i < n; i++) body();");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ForStatement);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::VariableDeclaration)
            .is_some()
    );
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::PostIncrementExpression)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_foreach_with_tuple_deconstruction() {
    let (tree, root) = parse_stmt("foreach (var (k, v) in map) use(k, v);");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ForEachStatement);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::ParenthesizedVariableDesignation)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_switch_statement_with_pattern_labels() {
    let source = "switch (shape) { case Circle c when c.R > 0: a(); break; case null: b(); break; default: c(); break; }";
    let (tree, root) = parse_stmt(source);
    assert_eq!(tree.arena.kind(root), SyntaxKind::SwitchStatement);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::SwitchSection), 3);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::CasePatternSwitchLabel)
            .is_some()
    );
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::DefaultSwitchLabel)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_try_catch_filter_finally() {
    let source = "try { f(); } catch (IoError e) when (e.Code != 2) { g(); } catch { h(); } finally { k(); }";
    let (tree, root) = parse_stmt(source);
    assert_eq!(tree.arena.kind(root), SyntaxKind::TryStatement);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::CatchClause), 2);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::CatchFilterClause)
            .is_some()
    );
    assert!(tree.arena.find_descendant(root, SyntaxKind::FinallyClause).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_try_without_handler_is_diagnosed() {
    let (tree, root) = parse_stmt("try { f(); }");
    assert_eq!(tree.arena.kind(root), SyntaxKind::TryStatement);
    assert!(tree.diagnostics.iter().any(|d| d.code == 1524));
}

#[test]
fn test_using_statement_and_using_declaration() {
    let (tree, root) = parse_stmt("using (var f = open()) read(f);");
    assert_eq!(tree.arena.kind(root), SyntaxKind::UsingStatement);

    let (tree, root) = parse_stmt("using var f = open();");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LocalDeclarationStatement);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_yield_statements() {
    let (tree, root) = parse_stmt("yield return x + 1;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::YieldStatement);

    let (tree, root) = parse_stmt("yield break;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::YieldStatement);
    assert!(tree.diagnostics.is_empty());
}

#[test]
fn test_yield_as_plain_identifier() {
    let (tree, root) = parse_stmt("yield = 5;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ExpressionStatement);
}

#[test]
fn test_labeled_statement_and_goto() {
    let (tree, root) = parse_stmt("retry: attempt();");
    assert_eq!(tree.arena.kind(root), SyntaxKind::LabeledStatement);

    let (tree, root) = parse_stmt("goto retry;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::GotoStatement);

    let (tree, root) = parse_stmt("goto case 2;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::GotoStatement);
    assert!(tree.diagnostics.is_empty());
}

#[test]
fn test_do_while() {
    let (tree, root) = parse_stmt("do { step(); } while (more);");
    assert_eq!(tree.arena.kind(root), SyntaxKind::DoStatement);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_empty_and_block_statements() {
    let (tree, root) = parse_stmt(";");
    assert_eq!(tree.arena.kind(root), SyntaxKind::EmptyStatement);

    let (tree, root) = parse_stmt("{ a(); b(); }");
    assert_eq!(tree.arena.kind(root), SyntaxKind::Block);
    assert_eq!(
        tree.arena.count_descendants(root, SyntaxKind::ExpressionStatement),
        2
    );
}

#[test]
fn test_deconstruction_assignment() {
    let (tree, root) = parse_stmt("var (x, y) = point;");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ExpressionStatement);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::DeclarationExpression)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_throw_statement() {
    let (tree, root) = parse_stmt("throw new Error(msg);");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ThrowStatement);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::ObjectCreationExpression)
            .is_some()
    );
}
