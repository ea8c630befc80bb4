//! Typed node payloads.
//!
//! Node kinds are plain sum types with a leading discriminant; the per-kind
//! payload structs carry interned names, child ids, and spans. Small lists
//! (parameters, attributes, import entries) live inline in their owning
//! payload; the owning node is what gets addressed by id.

use surge_common::{Span, StringId};

use crate::ids::{ExprId, ExternMemberId, StmtId, TypeId};

// =============================================================================
// Items
// =============================================================================

/// A top-level item.
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ItemKind {
    /// `let x = e;` / `const X = e;` at item level.
    Binding(BindingItem),
    Fn(FnItem),
    Type(TypeItem),
    Contract(ContractItem),
    Tag(TagItem),
    Import(ImportItem),
    Extern(ExternItem),
}

impl ItemKind {
    /// Short kind name for tracing output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Binding(b) if b.is_const => "const",
            Self::Binding(_) => "let",
            Self::Fn(_) => "fn",
            Self::Type(_) => "type",
            Self::Contract(_) => "contract",
            Self::Tag(_) => "tag",
            Self::Import(_) => "import",
            Self::Extern(_) => "extern",
        }
    }
}

/// `let`/`const` item. `is_const` selects the `const` form.
#[derive(Debug, Clone)]
pub struct BindingItem {
    pub is_const: bool,
    pub name: StringId,
    pub name_span: Span,
    pub mutable: bool,
    pub public: bool,
    /// Declared type, `TypeId::NONE` if inferred.
    pub ty: TypeId,
    /// Initialiser, `ExprId::NONE` for bare declarations.
    pub init: ExprId,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct FnItem {
    pub decl: FnDecl,
}

/// Shared function declaration payload for free functions and extern members.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: StringId,
    /// Span of the name token; may be absent for malformed declarations.
    pub name_span: Span,
    /// Span of the `fn` keyword.
    pub keyword_span: Span,
    /// Span of the parameter list including parentheses.
    pub params_span: Span,
    pub public: bool,
    pub params: Vec<Param>,
    /// Return type, `TypeId::NONE` if omitted.
    pub ret: TypeId,
    pub generics: Vec<GenericParam>,
    pub generics_span: Span,
    pub attrs: Vec<Attribute>,
    /// Body block statement, `StmtId::NONE` for bodyless declarations.
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: StringId,
    pub span: Span,
    pub ty: TypeId,
    pub variadic: bool,
}

#[derive(Debug, Clone)]
pub struct GenericParam {
    pub name: StringId,
    pub span: Span,
}

/// `@name` or `@name(args...)`.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: StringId,
    pub span: Span,
    pub args: Vec<AttrArg>,
}

#[derive(Debug, Clone)]
pub struct AttrArg {
    pub span: Span,
    pub value: AttrValue,
}

#[derive(Debug, Clone)]
pub enum AttrValue {
    Str(StringId),
    Ident(StringId),
    Int(i64),
}

#[derive(Debug, Clone)]
pub struct TypeItem {
    pub name: StringId,
    pub name_span: Span,
    pub public: bool,
    pub generics: Vec<GenericParam>,
    pub generics_span: Span,
    pub attrs: Vec<Attribute>,
    pub body: TypeBody,
}

#[derive(Debug, Clone)]
pub enum TypeBody {
    Struct { fields: Vec<FieldDef> },
    Alias(TypeId),
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: StringId,
    pub span: Span,
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub struct ContractItem {
    pub name: StringId,
    pub name_span: Span,
    pub public: bool,
    pub generics: Vec<GenericParam>,
    pub generics_span: Span,
    pub attrs: Vec<Attribute>,
    pub requirements: Vec<ContractRequirement>,
}

#[derive(Debug, Clone)]
pub enum ContractRequirement {
    Field {
        name: StringId,
        span: Span,
        ty: TypeId,
    },
    Method {
        name: StringId,
        span: Span,
        params: Vec<Param>,
        ret: TypeId,
    },
}

#[derive(Debug, Clone)]
pub struct TagItem {
    pub name: StringId,
    pub name_span: Span,
    pub public: bool,
    pub generics: Vec<GenericParam>,
    pub generics_span: Span,
    pub attrs: Vec<Attribute>,
    /// Payload types of the tag constructor.
    pub payload: Vec<TypeId>,
}

/// One `import` item in any of its shapes:
/// `import m/n`, `import m/n as a`, `import m/n::one`,
/// `import m/n::{a, b as c}`, `import m/n::*`.
#[derive(Debug, Clone)]
pub struct ImportItem {
    pub segments: Vec<PathSeg>,
    /// Explicit `as` alias for whole-module imports; `StringId::NONE` if absent.
    pub alias: StringId,
    pub alias_span: Span,
    /// Item list for `::one` / `::{...}` imports; empty for whole-module.
    pub entries: Vec<ImportEntry>,
    /// `::*`
    pub star: bool,
}

#[derive(Debug, Clone)]
pub struct PathSeg {
    pub name: StringId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImportEntry {
    pub name: StringId,
    pub name_span: Span,
    /// `as` alias, `StringId::NONE` if absent.
    pub alias: StringId,
    pub alias_span: Span,
}

/// `extern<Target> { fn ... }` block.
#[derive(Debug, Clone)]
pub struct ExternItem {
    pub target: TypeId,
    pub target_span: Span,
    pub members: Vec<ExternMemberId>,
}

/// A function member of an extern block.
#[derive(Debug, Clone)]
pub struct ExternMember {
    pub decl: FnDecl,
    pub span: Span,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Let(LetStmt),
    Expr(ExprId),
    /// `return e;` with `ExprId::NONE` for bare `return;`.
    Return(ExprId),
    Break,
    Continue,
    Drop(ExprId),
    Signal(ExprId),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    Compare(CompareStmt),
    Block(Vec<StmtId>),
}

#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: StringId,
    pub name_span: Span,
    pub mutable: bool,
    pub ty: TypeId,
    pub init: ExprId,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: ExprId,
    pub then_body: StmtId,
    /// `StmtId::NONE` if there is no `else`.
    pub else_body: StmtId,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: ExprId,
    pub body: StmtId,
}

/// Classic three-clause `for`; any clause may be absent.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: StmtId,
    pub cond: ExprId,
    pub step: ExprId,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct ForInStmt {
    /// Loop pattern name; `_` drops the binding.
    pub pattern: StringId,
    pub pattern_span: Span,
    pub iterable: ExprId,
    pub body: StmtId,
}

#[derive(Debug, Clone)]
pub struct CompareStmt {
    pub scrutinee: ExprId,
    pub arms: Vec<CompareArm>,
}

#[derive(Debug, Clone)]
pub struct CompareArm {
    pub pattern: Pattern,
    pub body: StmtId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    Wildcard,
    /// Binds the matched value under a fresh name.
    Ident(StringId),
    /// Matches a literal value; binds nothing.
    Literal(ExprId),
    /// Tag constructor pattern `Name(sub...)`.
    Call {
        name: StringId,
        name_span: Span,
        args: Vec<Pattern>,
    },
    Tuple(Vec<Pattern>),
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Ident(StringId),
    Literal(Literal),
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Member {
        target: ExprId,
        field: StringId,
        field_span: Span,
    },
    Index {
        target: ExprId,
        index: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Tuple(Vec<ExprId>),
    Array(Vec<ExprId>),
    /// `a..b`; either bound may be absent.
    Range {
        start: ExprId,
        end: ExprId,
    },
}

#[derive(Debug, Clone)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(StringId),
    Bool(bool),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Deref,
    Ref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Assign,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    /// `name` or `name<args...>`.
    Named {
        name: StringId,
        name_span: Span,
        args: Vec<TypeId>,
    },
    Ptr(TypeId),
    Ref(TypeId),
    Array(TypeId),
    ArrayFixed(TypeId, u64),
    Tuple(Vec<TypeId>),
    Fn {
        params: Vec<TypeId>,
        ret: TypeId,
    },
    /// The `nothing` unit type.
    Unit,
}
