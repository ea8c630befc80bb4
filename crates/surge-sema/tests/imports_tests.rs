//! Import shapes, module aliases, lazy import binding, star imports, core
//! injection, and the `no_std` policy.

mod common;

use common::{
    Fx, TestOpts, assert_no_diagnostics, codes, count_code, export_const, export_fn, exports_map,
};
use surge_ast::TypeId;
use surge_common::DiagnosticCode;
use surge_sema::{SymbolFlags, SymbolKind, collect_module_exports};

#[test]
fn imported_member_binds_to_a_synthesised_symbol() {
    // import foo::run; fn wrapper() { run(); }
    let mut fx = Fx::new();
    let exports = exports_map(vec![("foo", vec![export_fn("run", true)])]);
    fx.import_items(&["foo"], &[("run", None)]);
    let callee = fx.ident("run");
    let call = fx.call(callee, Vec::new());
    let stmt = fx.expr_stmt(call);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);

    let sym = result.table.symbols.get(result.expr_symbols[&callee]).unwrap();
    assert_eq!(sym.kind, SymbolKind::Function);
    assert_eq!(sym.module_path.as_deref(), Some("foo"));
    assert!(sym.flags.contains(SymbolFlags::IMPORTED | SymbolFlags::PUBLIC));
    assert_eq!(result.stats.synthetic_imports, 1);
}

#[test]
fn repeated_uses_share_one_synthetic_symbol() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("foo", vec![export_fn("run", true)])]);
    fx.import_items(&["foo"], &[("run", None)]);
    let first = fx.ident("run");
    let second = fx.ident("run");
    let stmt_a = fx.expr_stmt(first);
    let stmt_b = fx.expr_stmt(second);
    let body = fx.block(vec![stmt_a, stmt_b]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);
    assert_eq!(result.expr_symbols[&first], result.expr_symbols[&second]);
    assert_eq!(result.stats.synthetic_imports, 1);
}

#[test]
fn duplicate_whole_module_import_is_rejected() {
    // import foo; import foo as bar;
    let mut fx = Fx::new();
    let exports = exports_map(vec![("foo", vec![export_fn("run", true)])]);
    fx.import_module(&["foo"], None);
    fx.import_module(&["foo"], Some("bar"));

    let (_, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_eq!(codes(&diags), vec![DiagnosticCode::DuplicateSymbol]);
    assert_eq!(diags[0].notes[0].message, "module first imported here");
}

#[test]
fn module_alias_member_access_resolves_against_exports() {
    // import deep/util as u; fn wrapper() { u.helper(); }
    let mut fx = Fx::new();
    let exports = exports_map(vec![("deep/util", vec![export_fn("helper", true)])]);
    fx.import_module(&["deep", "util"], Some("u"));
    let target = fx.ident("u");
    let member = fx.member(target, "helper");
    let call = fx.call(member, Vec::new());
    let stmt = fx.expr_stmt(call);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);

    let alias = result.table.symbols.get(result.expr_symbols[&target]).unwrap();
    assert_eq!(alias.kind, SymbolKind::Module);
    let bound = result.table.symbols.get(result.expr_symbols[&member]).unwrap();
    assert_eq!(bound.kind, SymbolKind::Function);
    assert_eq!(bound.module_path.as_deref(), Some("deep/util"));
}

#[test]
fn default_alias_is_the_last_path_segment() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("deep/util", vec![export_fn("helper", true)])]);
    fx.import_module(&["deep", "util"], None);
    let target = fx.ident("util");
    let member = fx.member(target, "helper");
    let stmt = fx.expr_stmt(member);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (_, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);
}

#[test]
fn missing_module_member_is_reported_on_use() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("foo", vec![export_fn("run", true)])]);
    fx.import_items(&["foo"], &[("gone", None)]);
    let use_gone = fx.ident("gone");
    let stmt = fx.expr_stmt(use_gone);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_eq!(codes(&diags), vec![DiagnosticCode::ModuleMemberNotFound]);
    assert!(!result.expr_symbols.contains_key(&use_gone));
}

#[test]
fn private_module_member_is_reported_with_note() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("foo", vec![export_fn("run", false)])]);
    fx.import_items(&["foo"], &[("run", None)]);
    let use_run = fx.ident("run");
    let stmt = fx.expr_stmt(use_run);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_eq!(codes(&diags), vec![DiagnosticCode::ModuleMemberNotPublic]);
    assert_eq!(diags[0].notes[0].message, "declared here");
    assert!(!result.expr_symbols.contains_key(&use_run));
}

#[test]
fn import_alias_declares_under_the_alias() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("foo", vec![export_fn("run", true)])]);
    fx.import_items(&["foo"], &[("run", Some("go"))]);
    let use_go = fx.ident("go");
    let stmt = fx.expr_stmt(use_go);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);
    let sym = result.table.symbols.get(result.expr_symbols[&use_go]).unwrap();
    assert_eq!(sym.module_path.as_deref(), Some("foo"));
}

#[test]
fn star_import_expands_public_names_only() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![(
        "foo",
        vec![
            export_fn("run", true),
            export_fn("hidden_helper", false),
            export_const("LIMIT", true),
        ],
    )]);
    let item = fx.import_star(&["foo"]);
    let use_run = fx.ident("run");
    let use_limit = fx.ident("LIMIT");
    let stmt_a = fx.expr_stmt(use_run);
    let stmt_b = fx.expr_stmt(use_limit);
    let body = fx.block(vec![stmt_a, stmt_b]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);
    // `run` and `LIMIT` came in; `hidden_helper` did not.
    assert_eq!(result.item_symbols[&item].len(), 2);
    assert!(result.expr_symbols.contains_key(&use_run));
    assert!(result.expr_symbols.contains_key(&use_limit));
}

#[test]
fn core_exports_are_injected_without_imports() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("core/io", vec![export_fn("print", true)])]);
    let callee = fx.ident("print");
    let call = fx.call(callee, Vec::new());
    let stmt = fx.expr_stmt(call);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&diags);
    let sym = result.table.symbols.get(result.expr_symbols[&callee]).unwrap();
    assert_eq!(sym.module_path.as_deref(), Some("core/io"));
    assert!(sym.is_imported());
}

#[test]
fn no_std_disables_core_injection() {
    let mut fx = Fx::new();
    let exports = exports_map(vec![("core/io", vec![export_fn("print", true)])]);
    let callee = fx.ident("print");
    let stmt = fx.expr_stmt(callee);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (_, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        no_std: true,
        ..TestOpts::default()
    });
    assert_eq!(codes(&diags), vec![DiagnosticCode::UnresolvedSymbol]);
}

#[test]
fn no_std_rejects_stdlib_and_substitutes_core() {
    // import stdlib/strings::upper under no_std resolves against
    // core/strings after the error.
    let mut fx = Fx::new();
    let exports = exports_map(vec![("core/strings", vec![export_fn("upper", true)])]);
    fx.import_items(&["stdlib", "strings"], &[("upper", None)]);
    let use_upper = fx.ident("upper");
    let stmt = fx.expr_stmt(use_upper);
    let body = fx.block(vec![stmt]);
    let decl = fx.fn_decl("wrapper", Vec::new(), TypeId::NONE, body, Vec::new());
    fx.add_fn(decl);

    let (result, diags) = fx.resolve_opts(TestOpts {
        exports: Some(&exports),
        no_std: true,
        ..TestOpts::default()
    });
    assert_eq!(count_code(&diags, DiagnosticCode::NoStdlib), 1);
    let sym = result.table.symbols.get(result.expr_symbols[&use_upper]).unwrap();
    assert_eq!(sym.module_path.as_deref(), Some("core/strings"));
}

#[test]
fn module_exports_serialize_round_trip() {
    let exports = exports_map(vec![(
        "util",
        vec![export_fn("helper", true), export_const("LIMIT", true)],
    )]);
    let module = &exports["util"];
    let json = serde_json::to_string(module).unwrap();
    let back: surge_sema::ModuleExports = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, module);
}

#[test]
fn collected_exports_round_trip_through_resolution() {
    // Resolve a "library" file, publish its exports, consume them from a
    // second file.
    let mut lib = Fx::new();
    let body = lib.block(Vec::new());
    let mut decl = lib.fn_decl("helper", Vec::new(), TypeId::NONE, body, Vec::new());
    decl.public = true;
    lib.add_fn(decl);
    let hidden = lib.int(3);
    lib.let_item("internal", false, hidden);

    let (lib_result, lib_diags) = lib.resolve_opts(TestOpts {
        module_path: "util".to_string(),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&lib_diags);

    let published = collect_module_exports(&lib_result.table, lib_result.file_scope, "util");
    assert!(published.get("helper").is_some());
    assert!(published.get("internal").is_none(), "private symbols stay home");
    assert!(published.get("int").is_none(), "prelude built-ins are not re-exported");

    let mut map = surge_sema::ModuleExportsMap::default();
    map.insert("util".to_string(), published);

    let mut app = Fx::new();
    app.import_items(&["util"], &[("helper", None)]);
    let callee = app.ident("helper");
    let call = app.call(callee, Vec::new());
    let stmt = app.expr_stmt(call);
    let body = app.block(vec![stmt]);
    let decl = app.fn_decl("main", Vec::new(), TypeId::NONE, body, Vec::new());
    app.add_fn(decl);

    let (app_result, app_diags) = app.resolve_opts(TestOpts {
        exports: Some(&map),
        ..TestOpts::default()
    });
    assert_no_diagnostics(&app_diags);
    let sym = app_result.table.symbols.get(app_result.expr_symbols[&callee]).unwrap();
    assert_eq!(sym.kind, SymbolKind::Function);
}
