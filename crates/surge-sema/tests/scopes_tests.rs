//! Scope-tree structure: enter/leave pairing, root bookkeeping, and the
//! structural invariants `SymbolTable::validate` enforces.

mod common;

use std::sync::Arc;

use common::{Fx, assert_no_diagnostics, count_code};
use surge_common::{
    CollectedDiagnostics, DiagnosticCode, FileId, Interner, Reporter, Span,
};
use surge_sema::{
    Resolver, ScopeId, ScopeKind, ScopeOwner, SymbolTable,
};

#[test]
fn empty_file_resolves_to_empty_result() {
    let fx = Fx::new();
    let (result, diags) = fx.resolve();
    assert_no_diagnostics(&diags);
    assert!(result.item_symbols.is_empty());
    assert!(result.expr_symbols.is_empty());
    assert!(result.extern_syms.is_empty());
    // Only the file root exists.
    assert_eq!(result.table.scopes.len(), 1);
    assert_eq!(result.stats.scopes_created, 0);
    assert!(result.table.validate().is_ok());
}

#[test]
fn file_root_is_stable_across_requests() {
    let interner = Arc::new(Interner::new());
    let mut table = SymbolTable::new(interner);
    let a = table.file_root(FileId(1), Span::new(FileId(1), 0, 10));
    let b = table.file_root(FileId(1), Span::new(FileId(1), 0, 99));
    let c = table.file_root(FileId(2), Span::new(FileId(2), 0, 10));
    assert_eq!(a, b);
    assert_ne!(a, c);
    let scope = table.scopes.get(a).unwrap();
    assert_eq!(scope.kind, ScopeKind::File);
    assert!(scope.parent.is_none());
}

#[test]
fn module_root_is_keyed_by_path() {
    let interner = Arc::new(Interner::new());
    let mut table = SymbolTable::new(interner);
    let a = table.module_root("core/io", Span::default());
    let b = table.module_root("core/io", Span::default());
    let c = table.module_root("core/task", Span::default());
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.scopes.get(a).unwrap().kind, ScopeKind::Module);
}

#[test]
fn enter_links_parent_and_children() {
    let interner = Arc::new(Interner::new());
    let mut table = SymbolTable::new(interner);
    let root = table.file_root(FileId(1), Span::default());
    let reporter = Reporter::disabled();
    let mut resolver = Resolver::new(&mut table, reporter, root);

    let inner = resolver.enter(ScopeKind::Block, ScopeOwner::None, Span::default());
    assert_eq!(resolver.current_scope(), inner);
    resolver.leave(inner);
    assert_eq!(resolver.current_scope(), root);

    let scope = table.scopes.get(inner).unwrap();
    assert_eq!(scope.parent, root);
    assert!(table.scopes.get(root).unwrap().children.contains(&inner));
    assert!(table.validate().is_ok());
}

#[test]
fn unbalanced_leave_warns_once_and_recovers() {
    let sink = CollectedDiagnostics::new();
    let interner = Arc::new(Interner::new());
    let mut table = SymbolTable::new(interner);
    let root = table.file_root(FileId(1), Span::default());
    let reporter = Reporter::new(&sink);
    let mut resolver = Resolver::new(&mut table, reporter, root);

    let a = resolver.enter(ScopeKind::Function, ScopeOwner::None, Span::default());
    let _b = resolver.enter(ScopeKind::Block, ScopeOwner::None, Span::default());
    // Closing `a` while `b` is still open: warn, but still pop one level.
    resolver.leave(a);
    assert_eq!(resolver.current_scope(), a);
    // The stack recovered; the matched leave is silent.
    resolver.leave(a);
    assert_eq!(resolver.current_scope(), root);

    let diags = sink.take();
    assert_eq!(count_code(&diags, DiagnosticCode::ScopeMismatch), 1);
    assert_eq!(diags[0].notes.len(), 1);
}

#[test]
fn nested_blocks_form_a_tree() {
    let mut fx = Fx::new();
    let one = fx.int(1);
    let inner_let = fx.let_stmt("x", false, one);
    let inner_block = fx.block(vec![inner_let]);
    let outer_block = fx.block(vec![inner_block]);
    let decl = fx.fn_decl("run", Vec::new(), surge_ast::TypeId::NONE, outer_block, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve();
    assert_no_diagnostics(&diags);
    // Function scope + two block scopes.
    assert_eq!(result.stats.scopes_created, 3);
    assert!(result.table.validate().is_ok());

    // Every non-root scope points at a parent that lists it as a child.
    for id in result.table.scopes.ids() {
        let scope = result.table.scopes.get(id).unwrap();
        if scope.parent.is_some() {
            let parent = result.table.scopes.get(scope.parent).unwrap();
            assert!(parent.children.contains(&id));
        }
    }
}

#[test]
fn validate_reports_broken_links() {
    let interner = Arc::new(Interner::new());
    let mut table = SymbolTable::new(interner);
    let root = table.file_root(FileId(1), Span::default());
    // Corrupt the tree: claim a child that does not point back.
    table.scopes.get_mut(root).unwrap().children.push(ScopeId(99));
    let errors = table.validate().unwrap_err();
    assert_eq!(errors.0.len(), 1);
    assert!(errors.to_string().contains("ScopeId(99)"));
}

#[test]
fn declare_only_skips_function_bodies() {
    let mut fx = Fx::new();
    let missing = fx.ident("missing");
    let stmt = fx.expr_stmt(missing);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("run", vec![("a", surge_ast::TypeId::NONE)], surge_ast::TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(common::TestOpts {
        declare_only: true,
        ..common::TestOpts::default()
    });
    assert_no_diagnostics(&diags);
    // No function scope, no parameter symbols, no bindings.
    assert_eq!(result.stats.scopes_created, 0);
    assert!(result.expr_symbols.is_empty());
    assert_eq!(result.item_symbols.len(), 1);
}
