// Expression parsing: precedence, ambiguity resolution, and the compound
// operators the parser assembles from single `>` tokens.

use csz_parser::{NodeIndex, ParserState, SyntaxTree};
use csz_scanner::SyntaxKind;

fn parse_expr(source: &str) -> (SyntaxTree, NodeIndex) {
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_expression_root();
    (parser.into_tree(root), root)
}

fn token_kinds(tree: &SyntaxTree, node: NodeIndex) -> Vec<SyntaxKind> {
    let mut kinds = Vec::new();
    tree.arena.for_each_token(node, &mut |t| {
        kinds.push(tree.arena.token(t).kind);
    });
    kinds
}

#[test]
fn test_chained_comparison_is_not_generic() {
    // `a < b > c` must parse as (a < b) > c, not a generic name.
    let (tree, root) = parse_expr("a < b > c");
    assert_eq!(tree.arena.kind(root), SyntaxKind::BinaryExpression);
    assert!(tree.arena.find_descendant(root, SyntaxKind::GenericName).is_none());
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::BinaryExpression), 2);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_generic_invocation_commits_to_type_arguments() {
    let (tree, root) = parse_expr("f<int>(3)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::InvocationExpression);
    assert!(tree.arena.find_descendant(root, SyntaxKind::GenericName).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_cast_vs_parenthesized() {
    let (tree, root) = parse_expr("(int)x");
    assert_eq!(tree.arena.kind(root), SyntaxKind::CastExpression);

    let (tree, root) = parse_expr("(x)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ParenthesizedExpression);
    assert!(tree.diagnostics.is_empty());
}

#[test]
fn test_cast_of_parenthesized_name_before_minus_is_binary() {
    // `(a)-b` subtracts: an identifier cast target does not absorb `-`.
    let (tree, root) = parse_expr("(a)-b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::BinaryExpression);
}

#[test]
fn test_lambda_beats_tuple() {
    let (tree, root) = parse_expr("(a, b) => a + b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ParenthesizedLambdaExpression);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);

    let (tree, root) = parse_expr("(a, b)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::TupleExpression);
}

#[test]
fn test_simple_lambda_and_async_lambda() {
    let (tree, root) = parse_expr("x => x * 2");
    assert_eq!(tree.arena.kind(root), SyntaxKind::SimpleLambdaExpression);

    let (tree, root) = parse_expr("async () => await task");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ParenthesizedLambdaExpression);
    assert!(
        tree.arena.find_descendant(root, SyntaxKind::AwaitExpression).is_some(),
        "await must be an operator inside an async lambda"
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_await_outside_async_context_is_an_identifier() {
    let (tree, root) = parse_expr("await (x)");
    assert!(tree.arena.find_descendant(root, SyntaxKind::AwaitExpression).is_none());
    assert_eq!(tree.arena.kind(root), SyntaxKind::InvocationExpression);
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let (tree, root) = parse_expr("a + b * c");
    let node = tree.arena.get(root).expect("root node");
    assert_eq!(node.kind, SyntaxKind::BinaryExpression);
    // Children are [a, +, b * c].
    let last = node.children.last().expect("right operand");
    match *last {
        csz_parser::GreenElement::Node(right) => {
            assert_eq!(tree.arena.kind(right), SyntaxKind::BinaryExpression);
            assert_eq!(tree.text_of(right).trim(), "b * c");
        }
        _ => panic!("right operand should be a node"),
    }
}

#[test]
fn test_assignment_is_right_associative() {
    let (tree, root) = parse_expr("a = b = c");
    let node = tree.arena.get(root).expect("root node");
    assert_eq!(node.kind, SyntaxKind::AssignmentExpression);
    match *node.children.last().expect("right operand") {
        csz_parser::GreenElement::Node(right) => {
            assert_eq!(tree.arena.kind(right), SyntaxKind::AssignmentExpression);
        }
        _ => panic!("right operand should be a node"),
    }
}

#[test]
fn test_right_shift_is_merged_from_adjacent_tokens() {
    let (tree, root) = parse_expr("a >> b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::BinaryExpression);
    assert!(token_kinds(&tree, root).contains(&SyntaxKind::GreaterThanGreaterThanToken));

    let (tree, root) = parse_expr("a >>= b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::AssignmentExpression);
    assert!(token_kinds(&tree, root).contains(&SyntaxKind::GreaterThanGreaterThanEqualsToken));

    // A space between the two `>` leaves them as comparisons.
    let (tree, _) = parse_expr("a > > b");
    assert!(!tree.diagnostics.is_empty() || tree.full_text() == "a > > b");
}

#[test]
fn test_nested_generics_close_without_merged_tokens() {
    let (tree, root) = parse_expr("f<List<int>>(x)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::InvocationExpression);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::GenericName), 2);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_conditional_access_requires_adjacency() {
    let (tree, root) = parse_expr("x?.y");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ConditionalAccessExpression);

    let (tree, root) = parse_expr("x?[0]");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ConditionalAccessExpression);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::ElementBindingExpression)
            .is_some()
    );
}

#[test]
fn test_ternary_over_collection_expressions() {
    // `x ? [a] : [b]` is a conditional with two collection expressions.
    let (tree, root) = parse_expr("x ? [a] : [b]");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ConditionalExpression);
    assert_eq!(
        tree.arena.count_descendants(root, SyntaxKind::CollectionExpression),
        2
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_is_type_then_conditional() {
    // The trailing `?` opens a conditional, not a nullable type.
    let (tree, root) = parse_expr("x is T ? a : b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ConditionalExpression);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::IsPatternExpression)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_is_nullable_type_when_no_expression_follows() {
    let (tree, root) = parse_expr("x is int?");
    assert!(
        tree.arena.find_descendant(root, SyntaxKind::NullableType).is_some(),
        "`int?` should be a nullable type here"
    );
    assert_eq!(tree.arena.kind(root), SyntaxKind::IsPatternExpression);
}

#[test]
fn test_range_expressions() {
    let (tree, root) = parse_expr("a..b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::RangeExpression);

    let (tree, root) = parse_expr("..b");
    assert_eq!(tree.arena.kind(root), SyntaxKind::RangeExpression);

    let (tree, root) = parse_expr("a..");
    assert_eq!(tree.arena.kind(root), SyntaxKind::RangeExpression);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_switch_expression() {
    let (tree, root) = parse_expr("x switch { 1 => a, _ => b }");
    assert_eq!(tree.arena.kind(root), SyntaxKind::SwitchExpression);
    assert_eq!(
        tree.arena.count_descendants(root, SyntaxKind::SwitchExpressionArm),
        2
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_with_expression() {
    let (tree, root) = parse_expr("p with { X = 1 }");
    assert_eq!(tree.arena.kind(root), SyntaxKind::WithExpression);
}

#[test]
fn test_query_expression() {
    let (tree, root) = parse_expr("from x in xs where x > 0 orderby x descending select x");
    assert_eq!(tree.arena.kind(root), SyntaxKind::QueryExpression);
    assert!(tree.arena.find_descendant(root, SyntaxKind::WhereClause).is_some());
    assert!(tree.arena.find_descendant(root, SyntaxKind::OrderByClause).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_query_continuation() {
    let (tree, root) = parse_expr("from x in xs group x by k into g select g");
    assert!(tree.arena.find_descendant(root, SyntaxKind::GroupClause).is_some());
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::QueryContinuation)
            .is_some()
    );
}

#[test]
fn test_from_identifier_alone_is_not_a_query() {
    let (tree, root) = parse_expr("from + 1");
    assert_eq!(tree.arena.kind(root), SyntaxKind::BinaryExpression);
    assert!(tree.arena.find_descendant(root, SyntaxKind::QueryExpression).is_none());
}

#[test]
fn test_object_and_array_creation() {
    let (tree, root) = parse_expr("new List<int> { 1, 2 }");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ObjectCreationExpression);

    let (tree, root) = parse_expr("new int[3]");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ArrayCreationExpression);

    let (tree, root) = parse_expr("new(1, 2)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::ImplicitObjectCreationExpression);
}

#[test]
fn test_throw_expression_in_coalescing() {
    let (tree, root) = parse_expr("x ?? throw e");
    assert_eq!(tree.arena.kind(root), SyntaxKind::BinaryExpression);
    assert!(tree.arena.find_descendant(root, SyntaxKind::ThrowExpression).is_some());
}

#[test]
fn test_feature_gating_emits_diagnostic_but_still_parses() {
    let mut parser = ParserState::with_version(
        "test.csz".to_string(),
        "x switch { _ => 1 }".to_string(),
        csz_parser::LanguageVersion::V7,
    );
    let root = parser.parse_expression_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.arena.kind(root), SyntaxKind::SwitchExpression);
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 8107),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_tuple_with_named_elements() {
    let (tree, root) = parse_expr("(a: 1, b: 2)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::TupleExpression);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::NameColon), 2);
}

#[test]
fn test_out_variable_declaration_argument() {
    let (tree, root) = parse_expr("f(out var x)");
    assert_eq!(tree.arena.kind(root), SyntaxKind::InvocationExpression);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::DeclarationExpression)
            .is_some()
    );
}
