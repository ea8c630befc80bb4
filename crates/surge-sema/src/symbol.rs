//! Symbols: declared named entities.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use surge_common::{FileId, Span, StringId};
use surge_ast::{ExprId, ItemId, StmtId, TypeId};

use crate::arena::{ScopeId, SymbolId};

/// What a symbol declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Sentinel; never appears on a live symbol.
    #[default]
    Invalid,
    /// Whole-module import alias.
    Module,
    /// Item import not yet bound to its export.
    Import,
    Function,
    Let,
    Const,
    Type,
    Param,
    Tag,
    Contract,
}

impl SymbolKind {
    /// Lookup-filter bit for this kind.
    #[must_use]
    pub const fn mask(self) -> SymbolMask {
        match self {
            Self::Invalid => SymbolMask::empty(),
            Self::Module => SymbolMask::MODULE,
            Self::Import => SymbolMask::IMPORT,
            Self::Function => SymbolMask::FUNCTION,
            Self::Let => SymbolMask::LET,
            Self::Const => SymbolMask::CONST,
            Self::Type => SymbolMask::TYPE,
            Self::Param => SymbolMask::PARAM,
            Self::Tag => SymbolMask::TAG,
            Self::Contract => SymbolMask::CONTRACT,
        }
    }

    /// Whether a new declaration of kind `self` may share a name with an
    /// existing declaration of kind `other` in the same scope: functions
    /// overload each other, and functions and tags live in distinct
    /// namespaces (call-site ambiguity is reported separately).
    #[must_use]
    pub const fn can_share_name(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Function, Self::Function)
                | (Self::Function, Self::Tag)
                | (Self::Tag, Self::Function)
        )
    }
}

bitflags! {
    /// Kind filter for scope lookups.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SymbolMask: u16 {
        const MODULE = 1 << 0;
        const IMPORT = 1 << 1;
        const FUNCTION = 1 << 2;
        const LET = 1 << 3;
        const CONST = 1 << 4;
        const TYPE = 1 << 5;
        const PARAM = 1 << 6;
        const TAG = 1 << 7;
        const CONTRACT = 1 << 8;
    }
}

impl SymbolMask {
    /// Matches every live symbol kind.
    pub const ANY: SymbolMask = SymbolMask::all();

    #[inline]
    #[must_use]
    pub fn matches(self, kind: SymbolKind) -> bool {
        self.intersects(kind.mask())
    }
}

bitflags! {
    /// Properties of a declaration. Serde impls come from the bitflags
    /// `serde` feature (string form, e.g. `"PUBLIC | IMPORTED"`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SymbolFlags: u16 {
        const PUBLIC = 1 << 0;
        const MUTABLE = 1 << 1;
        const IMPORTED = 1 << 2;
        const BUILTIN = 1 << 3;
        const METHOD = 1 << 4;
        /// `@hidden`: visible in this file only, excluded from exports.
        const FILE_PRIVATE = 1 << 5;
        const ENTRYPOINT = 1 << 6;
    }
}

/// Input mode of an `@entrypoint` function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrypointMode {
    #[default]
    None,
    Argv,
    Stdin,
    /// Reserved for a future release.
    Env,
    /// Reserved for a future release.
    Config,
}

/// AST provenance of a declaration, for diagnostics and deduplication.
///
/// Symbols synthesised from module exports carry a zero `ast_file`: there is
/// no local AST node behind them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeclOrigin {
    /// File the declaration textually lives in.
    pub source_file: FileId,
    /// File whose AST holds the declaring nodes; zero for synthesised symbols.
    pub ast_file: FileId,
    pub item: ItemId,
    pub stmt: StmtId,
    pub expr: ExprId,
}

impl DeclOrigin {
    #[must_use]
    pub fn item(file: FileId, item: ItemId) -> Self {
        Self {
            source_file: file,
            ast_file: file,
            item,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stmt(file: FileId, item: ItemId, stmt: StmtId) -> Self {
        Self {
            source_file: file,
            ast_file: file,
            item,
            stmt,
            ..Self::default()
        }
    }

    /// Provenance of a symbol synthesised from another module's exports.
    #[must_use]
    pub fn synthetic(source_file: FileId) -> Self {
        Self {
            source_file,
            ..Self::default()
        }
    }

    /// Whether this symbol was synthesised from exports rather than declared
    /// by local AST nodes.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.ast_file.is_none()
    }
}

/// Deterministic string rendering of a type AST.
///
/// Used for overload distinctness and receiver matching; not a full type
/// representation.
pub type TypeKey = String;

/// A function's shape for overload distinctness: parameter type keys in
/// order, a variadic bitmap, and the result type key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<TypeKey>,
    pub variadic: Vec<bool>,
    pub result: TypeKey,
}

impl Signature {
    /// Compact rendering for messages: `(a, b...) -> r`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("(");
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(param);
            if self.variadic.get(i).copied().unwrap_or(false) {
                out.push_str("...");
            }
        }
        out.push_str(") -> ");
        out.push_str(&self.result);
        out
    }
}

/// Field/method requirements of a contract declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub members: Vec<ContractMember>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMember {
    pub name: StringId,
    pub is_method: bool,
    /// Type key of the required field, or signature rendering of the
    /// required method.
    pub key: TypeKey,
}

/// A declared named entity.
#[derive(Debug, Default)]
pub struct Symbol {
    pub name: StringId,
    pub kind: SymbolKind,
    /// Owning scope.
    pub scope: ScopeId,
    /// Declaration span: name span preferred, keyword or item span as
    /// fallback.
    pub span: Span,
    pub flags: SymbolFlags,
    pub decl: DeclOrigin,
    /// Opaque type-world id, populated by the type pass; 0 until then.
    pub type_id: u32,
    /// Functions only.
    pub signature: Option<Signature>,
    /// Additional names that may identify this symbol (imports carry the
    /// original name and module path segments).
    pub aliases: SmallVec<[StringId; 2]>,
    /// Imports and synthesised import symbols.
    pub module_path: Option<String>,
    pub import_name: StringId,
    /// Extern methods.
    pub receiver: TypeId,
    pub receiver_key: Option<TypeKey>,
    /// Generics metadata.
    pub type_params: Vec<StringId>,
    pub type_param_span: Span,
    pub type_param_symbols: Vec<SymbolId>,
    /// Contract declarations only.
    pub contract: Option<ContractInfo>,
    pub entrypoint_mode: EntrypointMode,
}

impl Symbol {
    #[must_use]
    pub fn new(
        name: StringId,
        kind: SymbolKind,
        scope: ScopeId,
        span: Span,
        flags: SymbolFlags,
        decl: DeclOrigin,
    ) -> Self {
        Self {
            name,
            kind,
            scope,
            span,
            flags,
            decl,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags.contains(SymbolFlags::PUBLIC)
    }

    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.flags.contains(SymbolFlags::BUILTIN)
    }

    #[must_use]
    pub fn is_imported(&self) -> bool {
        self.flags.contains(SymbolFlags::IMPORTED)
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        self.flags.contains(SymbolFlags::METHOD)
    }

    /// Whether this symbol may not be overridden: it comes from a protected
    /// module (`core`, `stdlib`, or a descendant), or it is a built-in that
    /// arrived through an import.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        if let Some(path) = &self.module_path {
            if crate::prelude::is_protected_module(path) {
                return true;
            }
        }
        self.flags
            .contains(SymbolFlags::BUILTIN | SymbolFlags::IMPORTED)
    }
}
