//! Per-file resolution pass.
//!
//! `resolve_file` drives one file's semantic analysis: it creates or adopts
//! the file-root scope, assembles the prelude, injects `core/*` exports,
//! pre-declares item-level constants so forward references succeed, then
//! walks items in source order. Item, import, function, and
//! statement/expression handling live in the `state_*` sibling modules; all
//! of them are methods on [`FileResolver`].

use std::sync::Arc;

use rustc_hash::FxHashMap;
use surge_ast::{Ast, ExprId, ExternMemberId, ItemId, ItemKind};
use surge_common::{DiagnosticCode, FileId, Interner, Reporter, Span, StringId};
use tracing::debug;

use crate::arena::{ScopeId, SymbolId};
use crate::exports::{ExportedSymbol, ModuleExportsMap};
use crate::paths::{ImportPathResolver, ProjectPathResolver};
use crate::prelude::{PreludeEntry, builtin_prelude, is_core_module};
use crate::resolver::Resolver;
use crate::scope::{ScopeKind, ScopeOwner};
use crate::symbol::{DeclOrigin, Signature, Symbol, SymbolFlags, SymbolKind};
use crate::table::SymbolTable;

/// Capacity hints for the scope and symbol arenas.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArenaHints {
    pub scopes: usize,
    pub symbols: usize,
}

/// Configuration of one `resolve_file` call.
pub struct ResolveOptions<'a> {
    /// Existing table to extend; a fresh one is created otherwise.
    pub table: Option<SymbolTable>,
    /// Interner the AST was built with. Ignored when `table` is given (the
    /// table's interner wins); required to match the AST either way.
    pub interner: Option<Arc<Interner>>,
    pub hints: ArenaHints,
    /// Extra prelude entries beyond the built-in type names.
    pub prelude: Vec<PreludeEntry>,
    /// Diagnostic sink; a disabled reporter drops everything.
    pub reporter: Reporter<'a>,
    /// Run `SymbolTable::validate` after the pass and report violations.
    pub validate: bool,
    /// Normalised path of the module being resolved.
    pub module_path: String,
    pub file_path: String,
    pub base_dir: String,
    /// Exports of previously resolved modules.
    pub module_exports: Option<&'a ModuleExportsMap>,
    /// Disable `stdlib` imports and core-exports injection.
    pub no_std: bool,
    /// Pre-existing scope to attach to when multiple files share a module.
    pub module_scope: ScopeId,
    /// Stop after item-level declarations; skip bodies and expressions.
    pub declare_only: bool,
    /// Reuse symbols with identical AST provenance instead of re-declaring.
    pub reuse_decls: bool,
    pub path_resolver: Option<&'a dyn ImportPathResolver>,
}

impl Default for ResolveOptions<'_> {
    fn default() -> Self {
        Self {
            table: None,
            interner: None,
            hints: ArenaHints::default(),
            prelude: Vec::new(),
            reporter: Reporter::disabled(),
            validate: false,
            module_path: String::new(),
            file_path: String::new(),
            base_dir: String::new(),
            module_exports: None,
            no_std: false,
            module_scope: ScopeId::NONE,
            declare_only: false,
            reuse_decls: false,
            path_resolver: None,
        }
    }
}

/// Counters surfaced for tracing and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub scopes_created: u32,
    pub symbols_declared: u32,
    pub synthetic_imports: u32,
}

/// Output of one `resolve_file` call.
pub struct ResolveResult {
    pub table: SymbolTable,
    pub file_id: FileId,
    pub file_scope: ScopeId,
    /// Declarations produced per item, in declaration order.
    pub item_symbols: FxHashMap<ItemId, Vec<SymbolId>>,
    /// Binding of identifier and member expressions.
    pub expr_symbols: FxHashMap<ExprId, SymbolId>,
    /// Binding of extern-method declarations.
    pub extern_syms: FxHashMap<ExternMemberId, SymbolId>,
    pub stats: ResolutionStats,
}

/// Interned names the walker tests against repeatedly.
pub(crate) struct WellKnown {
    pub(crate) wildcard: StringId,
    pub(crate) hidden: StringId,
    pub(crate) intrinsic: StringId,
    pub(crate) overload: StringId,
    pub(crate) override_: StringId,
    pub(crate) entrypoint: StringId,
    pub(crate) opaque_field: StringId,
}

impl WellKnown {
    fn new(interner: &Interner) -> Self {
        Self {
            wildcard: interner.intern("_"),
            hidden: interner.intern("hidden"),
            intrinsic: interner.intern("intrinsic"),
            overload: interner.intern("overload"),
            override_: interner.intern("override"),
            entrypoint: interner.intern("entrypoint"),
            opaque_field: interner.intern("__opaque"),
        }
    }
}

/// Memoisation key for symbols synthesised from exports.
pub(crate) type SyntheticKey = (String, StringId, SymbolKind, Option<Signature>);

/// One file's resolution state. Single-use: constructed for one file,
/// discarded after its pass.
pub(crate) struct FileResolver<'a, 't> {
    pub(crate) ast: &'a Ast,
    pub(crate) resolver: Resolver<'t, 'a>,
    pub(crate) reporter: Reporter<'a>,
    pub(crate) interner: Arc<Interner>,
    pub(crate) module_path: String,
    pub(crate) base_dir: String,
    pub(crate) exports: Option<&'a ModuleExportsMap>,
    pub(crate) path_resolver: &'a dyn ImportPathResolver,
    pub(crate) no_std: bool,
    pub(crate) declare_only: bool,
    pub(crate) reuse_decls: bool,
    pub(crate) file_scope: ScopeId,
    /// Whole-module imports seen so far, for duplicate detection.
    pub(crate) module_imports: FxHashMap<String, Span>,
    /// Module alias name -> normalised module path.
    pub(crate) alias_module_paths: FxHashMap<StringId, String>,
    pub(crate) synthetic_import_syms: FxHashMap<SyntheticKey, SymbolId>,
    /// In-scope generic parameters during function/type walking.
    pub(crate) type_param_stack: Vec<Vec<StringId>>,
    pub(crate) item_symbols: FxHashMap<ItemId, Vec<SymbolId>>,
    pub(crate) expr_symbols: FxHashMap<ExprId, SymbolId>,
    pub(crate) extern_syms: FxHashMap<ExternMemberId, SymbolId>,
    pub(crate) stats: ResolutionStats,
    pub(crate) names: WellKnown,
    /// Item currently being walked, for statement-level provenance.
    pub(crate) current_item: ItemId,
}

/// Resolve one file's AST into the symbol table.
///
/// Diagnostics go through `options.reporter` and never abort the pass.
pub fn resolve_file(ast: &Ast, options: ResolveOptions<'_>) -> ResolveResult {
    let ResolveOptions {
        table,
        interner,
        hints,
        prelude,
        reporter,
        validate,
        module_path,
        file_path: _,
        base_dir,
        module_exports,
        no_std,
        module_scope,
        declare_only,
        reuse_decls,
        path_resolver,
    } = options;

    let interner = match &table {
        Some(table) => Arc::clone(table.interner()),
        None => interner.unwrap_or_else(|| Arc::new(Interner::new())),
    };
    let mut table = table.unwrap_or_else(|| SymbolTable::with_hints(Arc::clone(&interner), hints));

    let file_id = ast.file();
    let file_scope = if module_scope.is_some() {
        module_scope
    } else {
        table.file_root(file_id, ast.span())
    };

    let default_paths = ProjectPathResolver;
    let names = WellKnown::new(&interner);
    let mut resolver = Resolver::new(&mut table, reporter, file_scope);

    let mut full_prelude = builtin_prelude();
    full_prelude.extend(prelude);
    resolver.install_prelude(file_scope, &full_prelude);

    let mut state = FileResolver {
        ast,
        resolver,
        reporter,
        interner,
        module_path,
        base_dir,
        exports: module_exports,
        path_resolver: path_resolver.unwrap_or(&default_paths),
        no_std,
        declare_only,
        reuse_decls,
        file_scope,
        module_imports: FxHashMap::default(),
        alias_module_paths: FxHashMap::default(),
        synthetic_import_syms: FxHashMap::default(),
        type_param_stack: Vec::new(),
        item_symbols: FxHashMap::default(),
        expr_symbols: FxHashMap::default(),
        extern_syms: FxHashMap::default(),
        stats: ResolutionStats::default(),
        names,
        current_item: ItemId::NONE,
    };

    state.inject_core_exports();
    state.predeclare_consts();
    state.walk_items();

    let FileResolver {
        item_symbols,
        expr_symbols,
        extern_syms,
        stats,
        resolver,
        ..
    } = state;
    drop(resolver);

    if validate {
        if let Err(errors) = table.validate() {
            for error in &errors.0 {
                reporter
                    .error(DiagnosticCode::SemaError, ast.span(), error.to_string())
                    .emit();
            }
        }
    }

    debug!(
        file = file_id.0,
        scopes = stats.scopes_created,
        symbols = stats.symbols_declared,
        "resolved file"
    );

    ResolveResult {
        table,
        file_id,
        file_scope,
        item_symbols,
        expr_symbols,
        extern_syms,
        stats,
    }
}

impl<'a, 't> FileResolver<'a, 't> {
    /// Inject public/built-in exports of every `core/*` module into the
    /// file-root scope so unqualified references resolve without an
    /// explicit import. Modules and names are visited in sorted order so
    /// repeated runs produce identical symbol sequences.
    fn inject_core_exports(&mut self) {
        if self.no_std {
            return;
        }
        let Some(exports_map) = self.exports else {
            return;
        };
        let mut paths: Vec<&str> = exports_map
            .keys()
            .map(String::as_str)
            .filter(|path| is_core_module(path))
            .collect();
        paths.sort_unstable();
        for path in paths {
            let Some(module) = exports_map.get(path) else {
                continue;
            };
            let mut names: Vec<&str> = module.symbols.keys().map(String::as_str).collect();
            names.sort_unstable();
            for name in names {
                let Some(overloads) = module.get(name) else {
                    continue;
                };
                for export in overloads {
                    if export.flags.contains(SymbolFlags::PUBLIC)
                        || export.flags.contains(SymbolFlags::BUILTIN)
                    {
                        self.synthesize_export(self.file_scope, path, export);
                    }
                }
            }
        }
    }

    /// Declare every top-level `const` before the main walk so later items
    /// can refer to them regardless of textual order.
    fn predeclare_consts(&mut self) {
        for &item_id in self.ast.items() {
            if let Some(binding) = self.ast.get_binding(item_id) {
                if binding.is_const {
                    self.current_item = item_id;
                    self.declare_binding_item(item_id, binding);
                }
            }
        }
        self.current_item = ItemId::NONE;
    }

    /// Main walk: items in source order, dispatched per kind.
    fn walk_items(&mut self) {
        for &item_id in self.ast.items() {
            self.current_item = item_id;
            let Some(item) = self.ast.item(item_id) else {
                continue;
            };
            let span = item.span;
            match &item.kind {
                ItemKind::Binding(binding) => {
                    // Constants were declared up front; only their type and
                    // initialiser remain to walk. A plain `let` declares
                    // after its initialiser so the binding cannot see itself.
                    self.walk_binding_parts(binding);
                    if !binding.is_const {
                        self.declare_binding_item(item_id, binding);
                    }
                }
                ItemKind::Fn(func) => self.resolve_fn_item(item_id, func, span),
                ItemKind::Type(ty) => self.resolve_type_item(item_id, ty, span),
                ItemKind::Contract(contract) => self.resolve_contract_item(item_id, contract, span),
                ItemKind::Tag(tag) => self.resolve_tag_item(item_id, tag, span),
                ItemKind::Import(import) => self.resolve_import_item(item_id, import, span),
                ItemKind::Extern(ext) => self.resolve_extern_item(item_id, ext, span),
            }
        }
        self.current_item = ItemId::NONE;
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    pub(crate) fn enter_scope(
        &mut self,
        kind: ScopeKind,
        owner: ScopeOwner,
        span: Span,
    ) -> ScopeId {
        self.stats.scopes_created += 1;
        self.resolver.enter(kind, owner, span)
    }

    pub(crate) fn leave_scope(&mut self, expected: ScopeId) {
        self.resolver.leave(expected);
    }

    pub(crate) fn record_item_symbol(&mut self, item: ItemId, sym: SymbolId) {
        self.item_symbols.entry(item).or_default().push(sym);
        self.stats.symbols_declared += 1;
    }

    /// Find a previously declared symbol with identical AST provenance in
    /// the current scope, for `reuse_decls` re-resolution.
    pub(crate) fn find_reusable(
        &self,
        name: StringId,
        kind: SymbolKind,
        item: ItemId,
    ) -> Option<SymbolId> {
        if !self.reuse_decls {
            return None;
        }
        let scope = self.resolver.table().scopes.get(self.resolver.current_scope())?;
        scope
            .symbols_named(name)
            .iter()
            .copied()
            .find(|&id| {
                self.resolver.table().symbols.get(id).is_some_and(|sym| {
                    sym.kind == kind && sym.decl.item == item && !sym.decl.ast_file.is_none()
                })
            })
    }

    /// Materialise (or reuse) a concrete symbol for an exported name.
    ///
    /// Memoised per `(module_path, name, kind, signature)` within the pass
    /// and, across passes over a reused table, by searching the target
    /// scope for an identical synthetic symbol.
    pub(crate) fn synthesize_export(
        &mut self,
        scope: ScopeId,
        module_path: &str,
        export: &ExportedSymbol,
    ) -> SymbolId {
        let name = self.interner.intern(&export.name);
        let key: SyntheticKey = (
            module_path.to_string(),
            name,
            export.kind,
            export.signature.clone(),
        );
        if let Some(&sym) = self.synthetic_import_syms.get(&key) {
            return sym;
        }

        // A reused table may already hold the synthetic from a prior pass.
        if let Some(scope_ref) = self.resolver.table().scopes.get(scope) {
            let found = scope_ref.symbols_named(name).iter().copied().find(|&id| {
                self.resolver.table().symbols.get(id).is_some_and(|sym| {
                    sym.is_imported()
                        && sym.decl.is_synthetic()
                        && sym.kind == export.kind
                        && sym.module_path.as_deref() == Some(module_path)
                        && sym.signature == export.signature
                })
            });
            if let Some(sym) = found {
                self.synthetic_import_syms.insert(key, sym);
                return sym;
            }
        }

        let type_params = export
            .type_params
            .iter()
            .map(|param| self.interner.intern(param))
            .collect();
        let mut symbol = Symbol::new(
            name,
            export.kind,
            scope,
            export.span,
            export.flags | SymbolFlags::IMPORTED,
            DeclOrigin::synthetic(export.span.file),
        );
        symbol.signature = export.signature.clone();
        symbol.receiver_key = export.receiver_key.clone();
        symbol.type_params = type_params;
        symbol.type_param_span = export.type_param_span;
        symbol.module_path = Some(module_path.to_string());
        symbol.import_name = name;
        symbol.type_id = export.type_id;

        let sym = self.resolver.table_mut().alloc_symbol(symbol);
        self.stats.synthetic_imports += 1;
        self.synthetic_import_syms.insert(key, sym);
        sym
    }

    pub(crate) fn name_text(&self, name: StringId) -> Arc<str> {
        self.interner.must_lookup(name)
    }
}
