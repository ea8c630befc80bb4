//! The symbol table: scope and symbol arenas plus root-scope bookkeeping.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use surge_common::{FileId, Interner, Span};

use crate::arena::{Arena, ScopeId, SymbolId};
use crate::scope::{Scope, ScopeKind, ScopeOwner};
use crate::state::ArenaHints;
use crate::symbol::Symbol;

/// Owns every scope and symbol produced by resolution, the interner they
/// name into, and the file/module root registries. A table may be reused
/// across files; arenas only grow.
#[derive(Debug)]
pub struct SymbolTable {
    pub scopes: Arena<ScopeId, Scope>,
    pub symbols: Arena<SymbolId, Symbol>,
    interner: Arc<Interner>,
    file_roots: FxHashMap<FileId, ScopeId>,
    module_roots: FxHashMap<String, ScopeId>,
}

impl SymbolTable {
    #[must_use]
    pub fn new(interner: Arc<Interner>) -> Self {
        Self::with_hints(interner, ArenaHints::default())
    }

    #[must_use]
    pub fn with_hints(interner: Arc<Interner>, hints: ArenaHints) -> Self {
        Self {
            scopes: Arena::with_capacity(hints.scopes),
            symbols: Arena::with_capacity(hints.symbols),
            interner,
            file_roots: FxHashMap::default(),
            module_roots: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn interner(&self) -> &Arc<Interner> {
        &self.interner
    }

    /// Root scope for a file; allocated on first request, stable afterwards.
    pub fn file_root(&mut self, file: FileId, span: Span) -> ScopeId {
        if let Some(&scope) = self.file_roots.get(&file) {
            return scope;
        }
        let scope = self.scopes.alloc(Scope::new(
            ScopeKind::File,
            ScopeId::NONE,
            ScopeOwner::File(file),
            span,
        ));
        self.file_roots.insert(file, scope);
        scope
    }

    /// Root scope for a module key; allocated on first request.
    pub fn module_root(&mut self, key: &str, span: Span) -> ScopeId {
        if let Some(&scope) = self.module_roots.get(key) {
            return scope;
        }
        let scope = self.scopes.alloc(Scope::new(
            ScopeKind::Module,
            ScopeId::NONE,
            ScopeOwner::None,
            span,
        ));
        self.module_roots.insert(key.to_string(), scope);
        scope
    }

    /// Allocate a child scope and wire the parent's child list.
    pub fn alloc_scope(
        &mut self,
        kind: ScopeKind,
        parent: ScopeId,
        owner: ScopeOwner,
        span: Span,
    ) -> ScopeId {
        let id = self.scopes.alloc(Scope::new(kind, parent, owner, span));
        if let Some(parent_scope) = self.scopes.get_mut(parent) {
            parent_scope.children.push(id);
        }
        id
    }

    /// Allocate a symbol and record it in its scope's symbol list and name
    /// index.
    pub fn alloc_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let scope = symbol.scope;
        let name = symbol.name;
        let id = self.symbols.alloc(symbol);
        if let Some(scope) = self.scopes.get_mut(scope) {
            scope.add_symbol(name, id);
        }
        id
    }

    /// Check every structural invariant and return all violations.
    ///
    /// For every scope: the kind is valid, each child names it as parent,
    /// each symbol names it as owner and sits in exactly its own name-index
    /// bucket, and each bucket references only symbols in the scope's list,
    /// in declaration order.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        for scope_id in self.scopes.ids() {
            let scope = match self.scopes.get(scope_id) {
                Some(scope) => scope,
                None => continue,
            };

            if scope.kind == ScopeKind::Invalid {
                errors.push(ValidationError::InvalidScopeKind { scope: scope_id });
            }
            if scope.parent.is_some() && self.scopes.get(scope.parent).is_none() {
                errors.push(ValidationError::DanglingParent {
                    scope: scope_id,
                    parent: scope.parent,
                });
            }

            for &child in &scope.children {
                match self.scopes.get(child) {
                    Some(child_scope) if child_scope.parent == scope_id => {}
                    _ => errors.push(ValidationError::BrokenChildLink {
                        scope: scope_id,
                        child,
                    }),
                }
            }

            for &sym_id in &scope.symbols {
                let sym = match self.symbols.get(sym_id) {
                    Some(sym) => sym,
                    None => {
                        errors.push(ValidationError::DanglingSymbol {
                            scope: scope_id,
                            symbol: sym_id,
                        });
                        continue;
                    }
                };
                if sym.scope != scope_id {
                    errors.push(ValidationError::SymbolOutsideScope {
                        symbol: sym_id,
                        scope: scope_id,
                        recorded: sym.scope,
                    });
                }
                let in_own_bucket = scope.symbols_named(sym.name).contains(&sym_id);
                let bucket_hits = scope
                    .name_index
                    .values()
                    .map(|bucket| bucket.iter().filter(|&&id| id == sym_id).count())
                    .sum::<usize>();
                if !in_own_bucket || bucket_hits != 1 {
                    errors.push(ValidationError::MissingFromNameIndex {
                        symbol: sym_id,
                        scope: scope_id,
                    });
                }
            }

            for (&name, bucket) in &scope.name_index {
                // Each bucket must be a subsequence of `symbols` in
                // declaration order.
                let mut cursor = scope.symbols.iter();
                for &sym_id in bucket {
                    if !cursor.any(|&s| s == sym_id) {
                        errors.push(ValidationError::NameIndexGhost {
                            scope: scope_id,
                            name,
                            symbol: sym_id,
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// One structural invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidScopeKind {
        scope: ScopeId,
    },
    DanglingParent {
        scope: ScopeId,
        parent: ScopeId,
    },
    BrokenChildLink {
        scope: ScopeId,
        child: ScopeId,
    },
    DanglingSymbol {
        scope: ScopeId,
        symbol: SymbolId,
    },
    SymbolOutsideScope {
        symbol: SymbolId,
        scope: ScopeId,
        recorded: ScopeId,
    },
    MissingFromNameIndex {
        symbol: SymbolId,
        scope: ScopeId,
    },
    NameIndexGhost {
        scope: ScopeId,
        name: surge_common::StringId,
        symbol: SymbolId,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScopeKind { scope } => {
                write!(f, "{scope} has the invalid kind")
            }
            Self::DanglingParent { scope, parent } => {
                write!(f, "{scope} points at nonexistent parent {parent}")
            }
            Self::BrokenChildLink { scope, child } => {
                write!(f, "{scope} lists child {child} that does not point back")
            }
            Self::DanglingSymbol { scope, symbol } => {
                write!(f, "{scope} lists nonexistent symbol {symbol}")
            }
            Self::SymbolOutsideScope {
                symbol,
                scope,
                recorded,
            } => {
                write!(f, "{symbol} sits in {scope} but records owner {recorded}")
            }
            Self::MissingFromNameIndex { symbol, scope } => {
                write!(f, "{symbol} is not indexed under its name in {scope}")
            }
            Self::NameIndexGhost {
                scope,
                name,
                symbol,
            } => {
                write!(
                    f,
                    "name index of {scope} references {symbol} (name id {}) outside the symbol list or out of order",
                    name.0
                )
            }
        }
    }
}

/// All violations found by one [`SymbolTable::validate`] call, joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
