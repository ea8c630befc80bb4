//! Scope-stack resolver: declaration and lookup over a [`SymbolTable`].
//!
//! The resolver keeps a stack of scope ids whose top is the current scope.
//! `enter`/`leave` must pair; an unbalanced `leave` is reported once per
//! actual scope and the stack still pops so resolution recovers.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use surge_common::{DiagnosticCode, Reporter, Span, StringId};
use tracing::debug;

use crate::arena::{ScopeId, SymbolId};
use crate::prelude::PreludeEntry;
use crate::scope::{ScopeKind, ScopeOwner};
use crate::symbol::{DeclOrigin, Signature, Symbol, SymbolFlags, SymbolKind, SymbolMask};
use crate::table::SymbolTable;

pub struct Resolver<'t, 'r> {
    table: &'t mut SymbolTable,
    reporter: Reporter<'r>,
    stack: Vec<ScopeId>,
    /// Scopes a mismatch warning was already emitted for.
    scope_mismatch_reported: FxHashSet<ScopeId>,
    wildcard: StringId,
}

impl<'t, 'r> Resolver<'t, 'r> {
    /// Build a resolver anchored at `root`.
    pub fn new(table: &'t mut SymbolTable, reporter: Reporter<'r>, root: ScopeId) -> Self {
        let wildcard = table.interner().intern("_");
        Self {
            table,
            reporter,
            stack: vec![root],
            scope_mismatch_reported: FxHashSet::default(),
            wildcard,
        }
    }

    #[must_use]
    pub fn table(&self) -> &SymbolTable {
        self.table
    }

    #[must_use]
    pub fn table_mut(&mut self) -> &mut SymbolTable {
        self.table
    }

    #[must_use]
    pub fn reporter(&self) -> Reporter<'r> {
        self.reporter
    }

    /// Top of the scope stack, `ScopeId::NONE` if empty.
    #[must_use]
    pub fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::NONE)
    }

    /// Open a child scope of the current scope and make it current.
    /// Must be paired with [`leave`](Self::leave).
    pub fn enter(&mut self, kind: ScopeKind, owner: ScopeOwner, span: Span) -> ScopeId {
        let parent = self.current_scope();
        let id = self.table.alloc_scope(kind, parent, owner, span);
        self.stack.push(id);
        id
    }

    /// Close the current scope, which the caller expects to be `expected`.
    ///
    /// A mismatch is a structural bug in the walker; it is reported (once
    /// per actual scope) and one level is still popped so the stack
    /// recovers.
    pub fn leave(&mut self, expected: ScopeId) {
        let Some(&actual) = self.stack.last() else {
            debug_assert!(false, "leave() on an empty scope stack");
            return;
        };
        if actual != expected {
            if self.scope_mismatch_reported.insert(actual) {
                let actual_span = self.table.scopes.get(actual).map_or(Span::default(), |s| s.span);
                let expected_span = self
                    .table
                    .scopes
                    .get(expected)
                    .map_or(Span::default(), |s| s.span);
                self.reporter
                    .warning(
                        DiagnosticCode::ScopeMismatch,
                        actual_span,
                        format!("unbalanced scope stack: closed {actual} while expecting {expected}"),
                    )
                    .with_note(expected_span, "expected scope was opened here")
                    .emit();
            }
        }
        self.stack.pop();
    }

    /// Declare a symbol in the current scope, enforcing duplicate and
    /// shadow rules.
    ///
    /// Returns `(SymbolId::NONE, false)` when the declaration conflicts with
    /// an existing same-scope symbol it cannot share a name with. Built-in
    /// prelude symbols are shadowable even in their own scope: conflicting
    /// with one produces a shadow warning and the declaration proceeds.
    pub fn declare(
        &mut self,
        name: StringId,
        span: Span,
        kind: SymbolKind,
        flags: SymbolFlags,
        decl: DeclOrigin,
    ) -> (SymbolId, bool) {
        let scope = self.current_scope();
        let mut shadowed: Option<SymbolId> = None;

        if let Some(scope_ref) = self.table.scopes.get(scope) {
            let existing: SmallVec<[SymbolId; 2]> =
                scope_ref.symbols_named(name).iter().copied().collect();
            for prior_id in existing {
                let Some(prior) = self.table.symbols.get(prior_id) else {
                    continue;
                };
                if kind.can_share_name(prior.kind) {
                    continue;
                }
                if prior.is_builtin() {
                    shadowed = Some(prior_id);
                    continue;
                }
                let prior_span = prior.span;
                let name_text = self.table.interner().must_lookup(name);
                self.reporter
                    .error(
                        DiagnosticCode::DuplicateSymbol,
                        span,
                        format!("`{name_text}` is already declared in this scope"),
                    )
                    .with_note(prior_span, "previous declaration here")
                    .emit();
                return (SymbolId::NONE, false);
            }
        }

        // Ancestor shadow check, skipped for the anonymous wildcard.
        if name != self.wildcard && shadowed.is_none() {
            shadowed = self.find_in_ancestors(scope, name);
        }
        if let Some(prior_id) = shadowed {
            if name != self.wildcard {
                if let Some(prior) = self.table.symbols.get(prior_id) {
                    let label = if prior.is_builtin() {
                        "built-in declaration here"
                    } else {
                        "shadowed declaration here"
                    };
                    let prior_span = prior.span;
                    let name_text = self.table.interner().must_lookup(name);
                    self.reporter
                        .warning(
                            DiagnosticCode::ShadowSymbol,
                            span,
                            format!("`{name_text}` shadows an earlier declaration"),
                        )
                        .with_note(prior_span, label)
                        .emit();
                }
            }
        }

        let id = self
            .table
            .alloc_symbol(Symbol::new(name, kind, scope, span, flags, decl));
        debug!(symbol = id.0, scope = scope.0, "declared symbol");
        (id, true)
    }

    /// Allocate a symbol in the current scope without conflict checks.
    ///
    /// Used after the caller has performed signature-aware overload and
    /// override validation the plain duplicate rules cannot express.
    pub fn declare_without_checks(
        &mut self,
        name: StringId,
        span: Span,
        kind: SymbolKind,
        flags: SymbolFlags,
        decl: DeclOrigin,
        signature: Option<Signature>,
    ) -> SymbolId {
        let scope = self.current_scope();
        let mut symbol = Symbol::new(name, kind, scope, span, flags, decl);
        symbol.signature = signature;
        self.table.alloc_symbol(symbol)
    }

    /// Innermost-scope, last-declared symbol with the given name.
    #[must_use]
    pub fn lookup(&self, name: StringId) -> Option<SymbolId> {
        self.lookup_one(name, SymbolMask::ANY)
    }

    /// Walk the scope chain from the current scope; in the first scope with
    /// any match under `mask`, return the last-declared one.
    #[must_use]
    pub fn lookup_one(&self, name: StringId, mask: SymbolMask) -> Option<SymbolId> {
        let mut scope = self.current_scope();
        while scope.is_some() {
            let scope_ref = self.table.scopes.get(scope)?;
            for &sym_id in scope_ref.symbols_named(name).iter().rev() {
                if let Some(sym) = self.table.symbols.get(sym_id) {
                    if mask.matches(sym.kind) {
                        return Some(sym_id);
                    }
                }
            }
            scope = scope_ref.parent;
        }
        None
    }

    /// Every matching symbol along the scope chain: innermost scope first,
    /// reverse declaration order within each scope.
    #[must_use]
    pub fn lookup_all(&self, name: StringId, mask: SymbolMask) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut scope = self.current_scope();
        while scope.is_some() {
            let Some(scope_ref) = self.table.scopes.get(scope) else {
                break;
            };
            for &sym_id in scope_ref.symbols_named(name).iter().rev() {
                if let Some(sym) = self.table.symbols.get(sym_id) {
                    if mask.matches(sym.kind) {
                        out.push(sym_id);
                    }
                }
            }
            scope = scope_ref.parent;
        }
        out
    }

    /// Install prelude entries as built-in symbols of `root`.
    ///
    /// Idempotent: an entry whose name already has a built-in in `root` is
    /// skipped, so re-resolving a file against a reused table does not
    /// duplicate the prelude.
    pub fn install_prelude(&mut self, root: ScopeId, entries: &[PreludeEntry]) {
        for entry in entries {
            let name = self.table.interner().intern(&entry.name);
            let already_installed = self
                .table
                .scopes
                .get(root)
                .map(|scope| {
                    scope.symbols_named(name).iter().any(|&id| {
                        self.table
                            .symbols
                            .get(id)
                            .is_some_and(|sym| sym.is_builtin() && sym.kind == entry.kind)
                    })
                })
                .unwrap_or(false);
            if already_installed {
                continue;
            }
            self.table.alloc_symbol(Symbol::new(
                name,
                entry.kind,
                root,
                Span::default(),
                SymbolFlags::BUILTIN,
                DeclOrigin::default(),
            ));
        }
    }

    fn find_in_ancestors(&self, scope: ScopeId, name: StringId) -> Option<SymbolId> {
        let mut current = self.table.scopes.get(scope)?.parent;
        while current.is_some() {
            let scope_ref = self.table.scopes.get(current)?;
            if let Some(&last) = scope_ref.symbols_named(name).last() {
                return Some(last);
            }
            current = scope_ref.parent;
        }
        None
    }
}
