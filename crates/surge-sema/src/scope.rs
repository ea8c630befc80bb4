//! Lexical scopes.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use surge_common::{FileId, Span, StringId};
use surge_ast::{ExprId, ExternMemberId, ItemId, StmtId};

use crate::arena::{ScopeId, SymbolId};

/// What kind of lexical region a scope covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeKind {
    /// Sentinel; only the arena's index-0 entry carries it.
    #[default]
    Invalid,
    File,
    Module,
    Function,
    Block,
}

/// The AST node that induced a scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScopeOwner {
    #[default]
    None,
    File(FileId),
    Item(ItemId),
    ExternMember(ExternMemberId),
    Stmt(StmtId),
    Expr(ExprId),
}

/// A lexical scope: a set of symbols in declaration order, a name index for
/// same-scope lookup, and tree links.
///
/// Invariants (checked by [`SymbolTable::validate`](crate::SymbolTable::validate)):
/// every symbol in `symbols` names this scope as its owner and appears in
/// exactly the `name_index` bucket of its own name; every bucket is a
/// subsequence of `symbols` in declaration order; every child scope names
/// this scope as its parent.
#[derive(Debug, Default)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Parent scope, `ScopeId::NONE` for roots.
    pub parent: ScopeId,
    pub owner: ScopeOwner,
    pub span: Span,
    /// Symbols declared directly in this scope, in declaration order.
    pub symbols: Vec<SymbolId>,
    /// Name -> symbols with that name, in declaration order.
    pub name_index: FxHashMap<StringId, SmallVec<[SymbolId; 2]>>,
    /// Child scopes in creation order.
    pub children: Vec<ScopeId>,
}

impl Scope {
    #[must_use]
    pub fn new(kind: ScopeKind, parent: ScopeId, owner: ScopeOwner, span: Span) -> Self {
        Self {
            kind,
            parent,
            owner,
            span,
            symbols: Vec::new(),
            name_index: FxHashMap::default(),
            children: Vec::new(),
        }
    }

    /// Record a symbol declared directly in this scope.
    pub fn add_symbol(&mut self, name: StringId, id: SymbolId) {
        self.symbols.push(id);
        self.name_index.entry(name).or_default().push(id);
    }

    /// Symbols with the given name declared directly in this scope, in
    /// declaration order.
    #[must_use]
    pub fn symbols_named(&self, name: StringId) -> &[SymbolId] {
        self.name_index
            .get(&name)
            .map_or(&[], |bucket| bucket.as_slice())
    }
}
