// Declaration parsing: compilation units, namespaces, types, members,
// attributes, and version gating of declaration forms.

use csz_parser::{LanguageVersion, NodeIndex, ParserState, SyntaxTree};
use csz_scanner::SyntaxKind;

fn parse(source: &str) -> (SyntaxTree, NodeIndex) {
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_compilation_unit();
    (parser.into_tree(root), root)
}

fn parse_versioned(source: &str, version: LanguageVersion) -> (SyntaxTree, NodeIndex) {
    let mut parser =
        ParserState::with_version("test.csz".to_string(), source.to_string(), version);
    let root = parser.parse_compilation_unit();
    (parser.into_tree(root), root)
}

#[test]
fn test_using_directives() {
    let source = "using System;\nusing static System.Math;\nusing IO = System.IO;\n";
    let (tree, root) = parse(source);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::UsingDirective), 3);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::NameEquals), 1);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_block_namespace() {
    let (tree, root) = parse("namespace A.B { class C { } }");
    let ns = tree
        .arena
        .find_descendant(root, SyntaxKind::NamespaceDeclaration)
        .expect("namespace");
    assert!(tree.arena.find_descendant(ns, SyntaxKind::QualifiedName).is_some());
    assert!(tree.arena.find_descendant(ns, SyntaxKind::ClassDeclaration).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_file_scoped_namespace() {
    let (tree, root) = parse("namespace A.B;\nclass C { }\n");
    let ns = tree
        .arena
        .find_descendant(root, SyntaxKind::FileScopedNamespaceDeclaration)
        .expect("file-scoped namespace");
    assert!(tree.arena.find_descendant(ns, SyntaxKind::ClassDeclaration).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_file_scoped_namespace_gated_by_version() {
    let (tree, _) = parse_versioned("namespace A;\n", LanguageVersion::V9);
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 8107),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_class_with_field_method_property() {
    let source = r#"
public class Point
{
    private int x, y;
    public int X { get; set; }
    public int Length() { return x; }
    public int Sum => x + y;
}
"#;
    let (tree, root) = parse(source);
    let class = tree
        .arena
        .find_descendant(root, SyntaxKind::ClassDeclaration)
        .expect("class");
    assert_eq!(tree.arena.count_descendants(class, SyntaxKind::FieldDeclaration), 1);
    assert_eq!(
        tree.arena.count_descendants(class, SyntaxKind::VariableDeclarator),
        2
    );
    assert_eq!(tree.arena.count_descendants(class, SyntaxKind::MethodDeclaration), 1);
    assert_eq!(
        tree.arena.count_descendants(class, SyntaxKind::PropertyDeclaration),
        2
    );
    assert!(
        tree.arena
            .find_descendant(class, SyntaxKind::GetAccessorDeclaration)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_constructor() {
    let (tree, root) = parse("class C { public C(int x) { this.x = x; } }");
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::ConstructorDeclaration)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_interface_struct_and_nested_types() {
    let source = "interface IShape { int Area(); } struct Pair { int a; class Inner { } }";
    let (tree, root) = parse(source);
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::InterfaceDeclaration)
            .is_some()
    );
    let strct = tree
        .arena
        .find_descendant(root, SyntaxKind::StructDeclaration)
        .expect("struct");
    assert!(tree.arena.find_descendant(strct, SyntaxKind::ClassDeclaration).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_enum_with_values_and_trailing_comma() {
    let (tree, root) = parse("enum Color { Red = 1, Green, Blue, }");
    let en = tree
        .arena
        .find_descendant(root, SyntaxKind::EnumDeclaration)
        .expect("enum");
    assert_eq!(
        tree.arena.count_descendants(en, SyntaxKind::EnumMemberDeclaration),
        3
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_enum_with_wrong_separator_recovers() {
    let (tree, root) = parse("enum E { A; B }");
    let en = tree
        .arena
        .find_descendant(root, SyntaxKind::EnumDeclaration)
        .expect("enum");
    assert_eq!(
        tree.arena.count_descendants(en, SyntaxKind::EnumMemberDeclaration),
        2
    );
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 1521),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_record_with_primary_constructor() {
    let (tree, root) = parse("public record Point(int X, int Y);");
    let record = tree
        .arena
        .find_descendant(root, SyntaxKind::RecordDeclaration)
        .expect("record");
    assert!(tree.arena.find_descendant(record, SyntaxKind::ParameterList).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_record_gated_by_version() {
    let (tree, _) = parse_versioned("record R(int A);", LanguageVersion::V8);
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 8107),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_generic_class_with_constraints_and_base_list() {
    let source = "class Cache<TKey, TValue> : Base, IStore<TKey> where TKey : class, new() { }";
    let (tree, root) = parse(source);
    let class = tree
        .arena
        .find_descendant(root, SyntaxKind::ClassDeclaration)
        .expect("class");
    assert_eq!(tree.arena.count_descendants(class, SyntaxKind::TypeParameter), 2);
    assert!(tree.arena.find_descendant(class, SyntaxKind::BaseList).is_some());
    assert!(
        tree.arena
            .find_descendant(class, SyntaxKind::ConstructorConstraint)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_attributes_with_target_and_arguments() {
    let source = "[method: Obsolete(\"old\", error: true)] void M() { }";
    let mut parser = ParserState::new("test.csz".to_string(), source.to_string());
    let root = parser.parse_member_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.arena.kind(root), SyntaxKind::MethodDeclaration);
    let list = tree
        .arena
        .find_descendant(root, SyntaxKind::AttributeList)
        .expect("attribute list");
    assert!(
        tree.arena
            .find_descendant(list, SyntaxKind::AttributeTargetSpecifier)
            .is_some()
    );
    assert!(tree.arena.find_descendant(list, SyntaxKind::NameColon).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_attribute_list_entry_point() {
    let mut parser = ParserState::new("test.csz".to_string(), "[Fact, Trait(\"a\")]".to_string());
    let root = parser.parse_attribute_list_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.arena.kind(root), SyntaxKind::AttributeList);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::Attribute), 2);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_duplicate_modifier_is_diagnosed() {
    let (tree, _) = parse("public public class C { }");
    assert!(
        tree.diagnostics.iter().any(|d| d.code == 1004),
        "got: {:?}",
        tree.diagnostics
    );
}

#[test]
fn test_global_statements_mix_with_declarations() {
    let source = "using System;\nint x = compute();\nclass Helper { }\n";
    let (tree, root) = parse(source);
    assert_eq!(tree.arena.count_descendants(root, SyntaxKind::GlobalStatement), 1);
    assert!(tree.arena.find_descendant(root, SyntaxKind::ClassDeclaration).is_some());
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_partial_and_async_modifiers() {
    let source = "partial class C { async Task M() { await t(); } }";
    let (tree, root) = parse(source);
    let method = tree
        .arena
        .find_descendant(root, SyntaxKind::MethodDeclaration)
        .expect("method");
    assert!(
        tree.arena
            .find_descendant(method, SyntaxKind::AwaitExpression)
            .is_some(),
        "await must be an operator inside an async method"
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_member_entry_point() {
    let mut parser = ParserState::new(
        "test.csz".to_string(),
        "public static int Max(int a, int b) => a > b ? a : b;".to_string(),
    );
    let root = parser.parse_member_root();
    let tree = parser.into_tree(root);
    assert_eq!(tree.arena.kind(root), SyntaxKind::MethodDeclaration);
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}

#[test]
fn test_init_accessor() {
    let (tree, root) = parse("class C { public int X { get; init; } }");
    assert!(
        tree.arena
            .find_descendant(root, SyntaxKind::InitAccessorDeclaration)
            .is_some()
    );
    assert!(tree.diagnostics.is_empty(), "got: {:?}", tree.diagnostics);
}
