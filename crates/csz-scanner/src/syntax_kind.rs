//! The closed set of syntactic kinds.
//!
//! One exhaustive `#[repr(u16)]` enum covers punctuation, keywords, contextual
//! (soft) keywords, literals, trivia, and every tree-node kind the parser can
//! produce. Classification helpers are exhaustive matches so that adding a
//! kind forces every dispatch site to be revisited at compile time.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum SyntaxKind {
    /// Absence of a kind (e.g. no contextual reinterpretation applies).
    None = 0,
    /// An unrecognized character in the input.
    Unknown,
    EndOfFileToken,

    // =========================================================================
    // Literals and names
    // =========================================================================
    Identifier,
    NumericLiteral,
    StringLiteral,
    CharacterLiteral,

    // =========================================================================
    // Punctuation
    // =========================================================================
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    SemicolonToken,
    CommaToken,
    DotToken,
    DotDotToken,
    ColonToken,
    ColonColonToken,
    QuestionToken,
    QuestionQuestionToken,
    QuestionQuestionEqualsToken,
    TildeToken,
    ExclamationToken,
    ExclamationEqualsToken,
    PlusToken,
    PlusPlusToken,
    PlusEqualsToken,
    MinusToken,
    MinusMinusToken,
    MinusEqualsToken,
    MinusGreaterThanToken,
    AsteriskToken,
    AsteriskEqualsToken,
    SlashToken,
    SlashEqualsToken,
    PercentToken,
    PercentEqualsToken,
    AmpersandToken,
    AmpersandAmpersandToken,
    AmpersandEqualsToken,
    BarToken,
    BarBarToken,
    BarEqualsToken,
    CaretToken,
    CaretEqualsToken,
    EqualsToken,
    EqualsEqualsToken,
    EqualsGreaterThanToken,
    LessThanToken,
    LessThanEqualsToken,
    LessThanLessThanToken,
    LessThanLessThanEqualsToken,
    GreaterThanToken,
    GreaterThanEqualsToken,
    // The scanner never produces the `>>` family; the parser merges adjacent
    // trivia-free `>` tokens so that `List<List<int>>` closes two argument
    // lists while `a >> b` still shifts.
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,

    // =========================================================================
    // Reserved keywords
    // =========================================================================
    AbstractKeyword,
    AsKeyword,
    BaseKeyword,
    BoolKeyword,
    BreakKeyword,
    ByteKeyword,
    CaseKeyword,
    CatchKeyword,
    CharKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DecimalKeyword,
    DefaultKeyword,
    DoKeyword,
    DoubleKeyword,
    ElseKeyword,
    EnumKeyword,
    FalseKeyword,
    FinallyKeyword,
    FloatKeyword,
    ForKeyword,
    ForeachKeyword,
    GotoKeyword,
    IfKeyword,
    InKeyword,
    IntKeyword,
    InterfaceKeyword,
    InternalKeyword,
    IsKeyword,
    LongKeyword,
    NamespaceKeyword,
    NewKeyword,
    NullKeyword,
    ObjectKeyword,
    OutKeyword,
    OverrideKeyword,
    ParamsKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReadonlyKeyword,
    RefKeyword,
    ReturnKeyword,
    SealedKeyword,
    ShortKeyword,
    StaticKeyword,
    StringKeyword,
    StructKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeofKeyword,
    UintKeyword,
    UlongKeyword,
    UsingKeyword,
    VirtualKeyword,
    VoidKeyword,
    WhileKeyword,

    // =========================================================================
    // Contextual (soft) keywords - lexed as Identifier with a contextual kind
    // =========================================================================
    AndKeyword,
    AscendingKeyword,
    AsyncKeyword,
    AwaitKeyword,
    ByKeyword,
    DescendingKeyword,
    EqualsKeyword,
    FromKeyword,
    GetKeyword,
    GroupKeyword,
    InitKeyword,
    IntoKeyword,
    JoinKeyword,
    LetKeyword,
    NotKeyword,
    OnKeyword,
    OrKeyword,
    OrderByKeyword,
    PartialKeyword,
    RecordKeyword,
    SelectKeyword,
    SetKeyword,
    VarKeyword,
    WhenKeyword,
    WhereKeyword,
    WithKeyword,
    YieldKeyword,

    // =========================================================================
    // Trivia
    // =========================================================================
    WhitespaceTrivia,
    EndOfLineTrivia,
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,
    SkippedTokensTrivia,

    // =========================================================================
    // Node kinds - declarations
    // =========================================================================
    CompilationUnit,
    GlobalStatement,
    UsingDirective,
    NameEquals,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    RecordDeclaration,
    EnumMemberDeclaration,
    FieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    PropertyDeclaration,
    AccessorList,
    GetAccessorDeclaration,
    SetAccessorDeclaration,
    InitAccessorDeclaration,
    ArrowExpressionClause,
    ParameterList,
    Parameter,
    TypeParameterList,
    TypeParameter,
    TypeParameterConstraintClause,
    TypeConstraint,
    ConstructorConstraint,
    BaseList,
    SimpleBaseType,
    AttributeList,
    AttributeTargetSpecifier,
    Attribute,
    AttributeArgumentList,
    AttributeArgument,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,
    IncompleteMember,

    // =========================================================================
    // Node kinds - statements
    // =========================================================================
    Block,
    LocalDeclarationStatement,
    LocalFunctionStatement,
    ExpressionStatement,
    EmptyStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForEachStatement,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    CasePatternSwitchLabel,
    DefaultSwitchLabel,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    CatchFilterClause,
    FinallyClause,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    UsingStatement,
    YieldStatement,
    LabeledStatement,
    GotoStatement,

    // =========================================================================
    // Node kinds - types
    // =========================================================================
    IdentifierName,
    GenericName,
    QualifiedName,
    PredefinedType,
    ArrayType,
    ArrayRankSpecifier,
    NullableType,
    TupleType,
    TupleElement,
    OmittedTypeArgument,
    TypeArgumentList,

    // =========================================================================
    // Node kinds - expressions
    // =========================================================================
    NumericLiteralExpression,
    StringLiteralExpression,
    CharacterLiteralExpression,
    TrueLiteralExpression,
    FalseLiteralExpression,
    NullLiteralExpression,
    DefaultLiteralExpression,
    ThisExpression,
    BaseExpression,
    ParenthesizedExpression,
    TupleExpression,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    NameColon,
    InvocationExpression,
    ElementAccessExpression,
    SimpleMemberAccessExpression,
    ConditionalAccessExpression,
    MemberBindingExpression,
    ElementBindingExpression,
    PostIncrementExpression,
    PostDecrementExpression,
    SuppressNullableWarningExpression,
    ObjectCreationExpression,
    ImplicitObjectCreationExpression,
    ArrayCreationExpression,
    InitializerExpression,
    CollectionExpression,
    CastExpression,
    AwaitExpression,
    ThrowExpression,
    RangeExpression,
    IndexExpression,
    UnaryPlusExpression,
    UnaryMinusExpression,
    LogicalNotExpression,
    BitwiseNotExpression,
    PreIncrementExpression,
    PreDecrementExpression,
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    SimpleLambdaExpression,
    ParenthesizedLambdaExpression,
    DeclarationExpression,
    TypeOfExpression,
    DefaultExpression,
    SwitchExpression,
    SwitchExpressionArm,
    WithExpression,
    IsPatternExpression,

    // =========================================================================
    // Node kinds - query expressions
    // =========================================================================
    QueryExpression,
    QueryBody,
    FromClause,
    LetClause,
    WhereClause,
    JoinClause,
    JoinIntoClause,
    OrderByClause,
    Ordering,
    SelectClause,
    GroupClause,
    QueryContinuation,

    // =========================================================================
    // Node kinds - patterns
    // =========================================================================
    ConstantPattern,
    DeclarationPattern,
    VarPattern,
    DiscardPattern,
    TypePattern,
    RelationalPattern,
    AndPattern,
    OrPattern,
    NotPattern,
    ParenthesizedPattern,
    RecursivePattern,
    PropertyPatternClause,
    PositionalPatternClause,
    Subpattern,
    SingleVariableDesignation,
    DiscardDesignation,
    ParenthesizedVariableDesignation,
}

impl SyntaxKind {
    /// Reserved keyword lookup for the scanner's identifier path.
    pub fn keyword_from_text(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let kind = match text {
            "abstract" => AbstractKeyword,
            "as" => AsKeyword,
            "base" => BaseKeyword,
            "bool" => BoolKeyword,
            "break" => BreakKeyword,
            "byte" => ByteKeyword,
            "case" => CaseKeyword,
            "catch" => CatchKeyword,
            "char" => CharKeyword,
            "class" => ClassKeyword,
            "const" => ConstKeyword,
            "continue" => ContinueKeyword,
            "decimal" => DecimalKeyword,
            "default" => DefaultKeyword,
            "do" => DoKeyword,
            "double" => DoubleKeyword,
            "else" => ElseKeyword,
            "enum" => EnumKeyword,
            "false" => FalseKeyword,
            "finally" => FinallyKeyword,
            "float" => FloatKeyword,
            "for" => ForKeyword,
            "foreach" => ForeachKeyword,
            "goto" => GotoKeyword,
            "if" => IfKeyword,
            "in" => InKeyword,
            "int" => IntKeyword,
            "interface" => InterfaceKeyword,
            "internal" => InternalKeyword,
            "is" => IsKeyword,
            "long" => LongKeyword,
            "namespace" => NamespaceKeyword,
            "new" => NewKeyword,
            "null" => NullKeyword,
            "object" => ObjectKeyword,
            "out" => OutKeyword,
            "override" => OverrideKeyword,
            "params" => ParamsKeyword,
            "private" => PrivateKeyword,
            "protected" => ProtectedKeyword,
            "public" => PublicKeyword,
            "readonly" => ReadonlyKeyword,
            "ref" => RefKeyword,
            "return" => ReturnKeyword,
            "sealed" => SealedKeyword,
            "short" => ShortKeyword,
            "static" => StaticKeyword,
            "string" => StringKeyword,
            "struct" => StructKeyword,
            "switch" => SwitchKeyword,
            "this" => ThisKeyword,
            "throw" => ThrowKeyword,
            "true" => TrueKeyword,
            "try" => TryKeyword,
            "typeof" => TypeofKeyword,
            "uint" => UintKeyword,
            "ulong" => UlongKeyword,
            "using" => UsingKeyword,
            "virtual" => VirtualKeyword,
            "void" => VoidKeyword,
            "while" => WhileKeyword,
            _ => return Option::None,
        };
        Some(kind)
    }

    /// Contextual keyword lookup. These lex as `Identifier` and only behave
    /// as keywords in specific syntactic positions.
    pub fn contextual_from_text(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let kind = match text {
            "and" => AndKeyword,
            "ascending" => AscendingKeyword,
            "async" => AsyncKeyword,
            "await" => AwaitKeyword,
            "by" => ByKeyword,
            "descending" => DescendingKeyword,
            "equals" => EqualsKeyword,
            "from" => FromKeyword,
            "get" => GetKeyword,
            "group" => GroupKeyword,
            "init" => InitKeyword,
            "into" => IntoKeyword,
            "join" => JoinKeyword,
            "let" => LetKeyword,
            "not" => NotKeyword,
            "on" => OnKeyword,
            "or" => OrKeyword,
            "orderby" => OrderByKeyword,
            "partial" => PartialKeyword,
            "record" => RecordKeyword,
            "select" => SelectKeyword,
            "set" => SetKeyword,
            "var" => VarKeyword,
            "when" => WhenKeyword,
            "where" => WhereKeyword,
            "with" => WithKeyword,
            "yield" => YieldKeyword,
            _ => return Option::None,
        };
        Some(kind)
    }

    pub fn is_reserved_keyword(self) -> bool {
        use SyntaxKind::*;
        (self as u16) >= AbstractKeyword as u16 && (self as u16) <= WhileKeyword as u16
    }

    pub fn is_contextual_keyword(self) -> bool {
        use SyntaxKind::*;
        (self as u16) >= AndKeyword as u16 && (self as u16) <= YieldKeyword as u16
    }

    pub fn is_trivia(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            WhitespaceTrivia
                | EndOfLineTrivia
                | SingleLineCommentTrivia
                | MultiLineCommentTrivia
                | SkippedTokensTrivia
        )
    }

    /// Keywords naming built-in types (`int`, `string`, `void`, ...).
    pub fn is_predefined_type_keyword(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            BoolKeyword
                | ByteKeyword
                | CharKeyword
                | DecimalKeyword
                | DoubleKeyword
                | FloatKeyword
                | IntKeyword
                | LongKeyword
                | ObjectKeyword
                | ShortKeyword
                | StringKeyword
                | UintKeyword
                | UlongKeyword
                | VoidKeyword
        )
    }

    /// Fixed source text for punctuation and keyword kinds. Literal and
    /// identifier kinds have no fixed text and return `None`.
    pub fn fixed_text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let text = match self {
            OpenBraceToken => "{",
            CloseBraceToken => "}",
            OpenParenToken => "(",
            CloseParenToken => ")",
            OpenBracketToken => "[",
            CloseBracketToken => "]",
            SemicolonToken => ";",
            CommaToken => ",",
            DotToken => ".",
            DotDotToken => "..",
            ColonToken => ":",
            ColonColonToken => "::",
            QuestionToken => "?",
            QuestionQuestionToken => "??",
            QuestionQuestionEqualsToken => "??=",
            TildeToken => "~",
            ExclamationToken => "!",
            ExclamationEqualsToken => "!=",
            PlusToken => "+",
            PlusPlusToken => "++",
            PlusEqualsToken => "+=",
            MinusToken => "-",
            MinusMinusToken => "--",
            MinusEqualsToken => "-=",
            MinusGreaterThanToken => "->",
            AsteriskToken => "*",
            AsteriskEqualsToken => "*=",
            SlashToken => "/",
            SlashEqualsToken => "/=",
            PercentToken => "%",
            PercentEqualsToken => "%=",
            AmpersandToken => "&",
            AmpersandAmpersandToken => "&&",
            AmpersandEqualsToken => "&=",
            BarToken => "|",
            BarBarToken => "||",
            BarEqualsToken => "|=",
            CaretToken => "^",
            CaretEqualsToken => "^=",
            EqualsToken => "=",
            EqualsEqualsToken => "==",
            EqualsGreaterThanToken => "=>",
            LessThanToken => "<",
            LessThanEqualsToken => "<=",
            LessThanLessThanToken => "<<",
            LessThanLessThanEqualsToken => "<<=",
            GreaterThanToken => ">",
            GreaterThanEqualsToken => ">=",
            GreaterThanGreaterThanToken => ">>",
            GreaterThanGreaterThanEqualsToken => ">>=",
            GreaterThanGreaterThanGreaterThanToken => ">>>",
            GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
            AbstractKeyword => "abstract",
            AsKeyword => "as",
            BaseKeyword => "base",
            BoolKeyword => "bool",
            BreakKeyword => "break",
            ByteKeyword => "byte",
            CaseKeyword => "case",
            CatchKeyword => "catch",
            CharKeyword => "char",
            ClassKeyword => "class",
            ConstKeyword => "const",
            ContinueKeyword => "continue",
            DecimalKeyword => "decimal",
            DefaultKeyword => "default",
            DoKeyword => "do",
            DoubleKeyword => "double",
            ElseKeyword => "else",
            EnumKeyword => "enum",
            FalseKeyword => "false",
            FinallyKeyword => "finally",
            FloatKeyword => "float",
            ForKeyword => "for",
            ForeachKeyword => "foreach",
            GotoKeyword => "goto",
            IfKeyword => "if",
            InKeyword => "in",
            IntKeyword => "int",
            InterfaceKeyword => "interface",
            InternalKeyword => "internal",
            IsKeyword => "is",
            LongKeyword => "long",
            NamespaceKeyword => "namespace",
            NewKeyword => "new",
            NullKeyword => "null",
            ObjectKeyword => "object",
            OutKeyword => "out",
            OverrideKeyword => "override",
            ParamsKeyword => "params",
            PrivateKeyword => "private",
            ProtectedKeyword => "protected",
            PublicKeyword => "public",
            ReadonlyKeyword => "readonly",
            RefKeyword => "ref",
            ReturnKeyword => "return",
            SealedKeyword => "sealed",
            ShortKeyword => "short",
            StaticKeyword => "static",
            StringKeyword => "string",
            StructKeyword => "struct",
            SwitchKeyword => "switch",
            ThisKeyword => "this",
            ThrowKeyword => "throw",
            TrueKeyword => "true",
            TryKeyword => "try",
            TypeofKeyword => "typeof",
            UintKeyword => "uint",
            UlongKeyword => "ulong",
            UsingKeyword => "using",
            VirtualKeyword => "virtual",
            VoidKeyword => "void",
            WhileKeyword => "while",
            AndKeyword => "and",
            AscendingKeyword => "ascending",
            AsyncKeyword => "async",
            AwaitKeyword => "await",
            ByKeyword => "by",
            DescendingKeyword => "descending",
            EqualsKeyword => "equals",
            FromKeyword => "from",
            GetKeyword => "get",
            GroupKeyword => "group",
            InitKeyword => "init",
            IntoKeyword => "into",
            JoinKeyword => "join",
            LetKeyword => "let",
            NotKeyword => "not",
            OnKeyword => "on",
            OrKeyword => "or",
            OrderByKeyword => "orderby",
            PartialKeyword => "partial",
            RecordKeyword => "record",
            SelectKeyword => "select",
            SetKeyword => "set",
            VarKeyword => "var",
            WhenKeyword => "when",
            WhereKeyword => "where",
            WithKeyword => "with",
            YieldKeyword => "yield",
            _ => return Option::None,
        };
        Some(text)
    }

    /// Display text used in "'{0}' expected" diagnostics.
    pub fn display_text(self) -> &'static str {
        match self.fixed_text() {
            Some(text) => text,
            None => match self {
                SyntaxKind::Identifier => "identifier",
                SyntaxKind::NumericLiteral => "numeric literal",
                SyntaxKind::StringLiteral => "string literal",
                SyntaxKind::CharacterLiteral => "character literal",
                SyntaxKind::EndOfFileToken => "end of file",
                _ => "syntax",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_round_trips_through_fixed_text() {
        for text in ["class", "foreach", "readonly", "typeof", "ulong"] {
            let kind = SyntaxKind::keyword_from_text(text).unwrap();
            assert!(kind.is_reserved_keyword());
            assert_eq!(kind.fixed_text(), Some(text));
        }
    }

    #[test]
    fn contextual_keywords_are_not_reserved() {
        for text in ["var", "async", "await", "where", "yield", "record"] {
            let kind = SyntaxKind::contextual_from_text(text).unwrap();
            assert!(kind.is_contextual_keyword());
            assert!(!kind.is_reserved_keyword());
            assert!(SyntaxKind::keyword_from_text(text).is_none());
        }
    }

    #[test]
    fn predefined_type_keywords() {
        assert!(SyntaxKind::IntKeyword.is_predefined_type_keyword());
        assert!(SyntaxKind::VoidKeyword.is_predefined_type_keyword());
        assert!(!SyntaxKind::ClassKeyword.is_predefined_type_keyword());
    }
}
