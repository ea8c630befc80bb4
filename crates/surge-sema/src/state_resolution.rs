//! Identifier and member resolution.
//!
//! Identifier expressions bind to the symbol the scope chain yields;
//! `import`-kind symbols are rewritten on first use into concrete symbols
//! synthesised from the owning module's exports, so no binding ever points
//! at an unresolved import. Member accesses on module aliases resolve
//! against the module's exports with the same rules.

use surge_ast::ExprId;
use surge_common::{DiagnosticCode, Span, StringId};
use tracing::debug;

use crate::arena::SymbolId;
use crate::state::FileResolver;
use crate::symbol::{SymbolFlags, SymbolKind, SymbolMask};

impl FileResolver<'_, '_> {
    /// Bind an identifier expression.
    pub(crate) fn resolve_ident(&mut self, expr_id: ExprId, span: Span, name: StringId) {
        if name == self.names.wildcard {
            self.reporter
                .error(
                    DiagnosticCode::WildcardValue,
                    span,
                    "wildcard `_` is not a value",
                )
                .emit();
            return;
        }

        match self.resolver.lookup(name) {
            Some(sym_id) => {
                let kind = self
                    .resolver
                    .table()
                    .symbols
                    .get(sym_id)
                    .map_or(SymbolKind::Invalid, |sym| sym.kind);
                if kind == SymbolKind::Import {
                    if let Some(synth) = self.try_resolve_import_symbol(span, sym_id) {
                        self.expr_symbols.insert(expr_id, synth);
                    }
                } else {
                    self.expr_symbols.insert(expr_id, sym_id);
                }
            }
            None => {
                if self.type_param_in_scope(name) {
                    // Generic parameters resolve without a symbol binding.
                    return;
                }
                let text = self.name_text(name);
                self.reporter
                    .error(
                        DiagnosticCode::UnresolvedSymbol,
                        span,
                        format!("cannot find `{text}` in this scope"),
                    )
                    .emit();
            }
        }
    }

    /// Bind a `target.field` expression. If the target is a module alias,
    /// the field resolves against that module's exports.
    pub(crate) fn resolve_member(
        &mut self,
        expr_id: ExprId,
        target: ExprId,
        field: StringId,
        field_span: Span,
    ) {
        self.walk_expr(target);

        let Some(&target_sym) = self.expr_symbols.get(&target) else {
            return;
        };
        let module_path = self.resolver.table().symbols.get(target_sym).and_then(|sym| {
            if sym.kind == SymbolKind::Module {
                sym.module_path
                    .clone()
                    .or_else(|| self.alias_module_paths.get(&sym.name).cloned())
            } else {
                None
            }
        });
        if let Some(path) = module_path {
            if let Some(synth) = self.resolve_module_member(field_span, &path, field) {
                self.expr_symbols.insert(expr_id, synth);
            }
        }
    }

    /// Rewrite an `import`-kind symbol into a concrete synthesised symbol.
    /// Returns `None` (and reports) when the export is missing or private.
    fn try_resolve_import_symbol(&mut self, use_span: Span, import_sym: SymbolId) -> Option<SymbolId> {
        let (module_path, import_name) = {
            let sym = self.resolver.table().symbols.get(import_sym)?;
            (sym.module_path.clone()?, sym.import_name)
        };
        let resolved = self.resolve_module_member(use_span, &module_path, import_name);
        if let Some(sym) = resolved {
            debug!(import = import_sym.0, synthetic = sym.0, "bound import on use");
        }
        resolved
    }

    /// Resolve a name against a module's exports, synthesising (and
    /// memoising) the concrete symbol on success.
    pub(crate) fn resolve_module_member(
        &mut self,
        use_span: Span,
        module_path: &str,
        member: StringId,
    ) -> Option<SymbolId> {
        let member_text = self.name_text(member);
        let exports = self.exports;
        let overloads = exports
            .and_then(|map| map.get(module_path))
            .and_then(|module| module.get(&member_text));

        let Some(overloads) = overloads else {
            self.reporter
                .error(
                    DiagnosticCode::ModuleMemberNotFound,
                    use_span,
                    format!("module `{module_path}` has no member `{member_text}`"),
                )
                .emit();
            return None;
        };

        let visible = overloads.iter().find(|export| {
            export.flags.contains(SymbolFlags::PUBLIC) || export.flags.contains(SymbolFlags::BUILTIN)
        });
        let Some(export) = visible else {
            let decl_span = overloads.first().map_or(Span::default(), |export| export.span);
            self.reporter
                .error(
                    DiagnosticCode::ModuleMemberNotPublic,
                    use_span,
                    format!("`{member_text}` of module `{module_path}` is not public"),
                )
                .with_note(decl_span, "declared here")
                .emit();
            return None;
        };

        Some(self.synthesize_export(self.file_scope, module_path, export))
    }

    /// Report a call whose target name is both a function and a tag in the
    /// nearest scope that declares it.
    pub(crate) fn check_call_ambiguity(&mut self, call_span: Span, name: StringId) {
        let candidates = self
            .resolver
            .lookup_all(name, SymbolMask::FUNCTION | SymbolMask::TAG);
        let Some(&innermost) = candidates.first() else {
            return;
        };
        let table = self.resolver.table();
        let Some(scope) = table.symbols.get(innermost).map(|sym| sym.scope) else {
            return;
        };
        let mut in_scope: Vec<SymbolId> = candidates
            .into_iter()
            .filter(|&id| table.symbols.get(id).is_some_and(|sym| sym.scope == scope))
            .collect();
        // lookup_all yields reverse declaration order; notes read better in
        // source order.
        in_scope.reverse();

        let has_fn = in_scope
            .iter()
            .any(|&id| table.symbols.get(id).is_some_and(|s| s.kind == SymbolKind::Function));
        let has_tag = in_scope
            .iter()
            .any(|&id| table.symbols.get(id).is_some_and(|s| s.kind == SymbolKind::Tag));
        if !has_fn || !has_tag {
            return;
        }

        let notes: Vec<(Span, &'static str)> = in_scope
            .iter()
            .filter_map(|&id| {
                table.symbols.get(id).map(|sym| {
                    let label = if sym.kind == SymbolKind::Tag {
                        "tag declared here"
                    } else {
                        "function declared here"
                    };
                    (sym.span, label)
                })
            })
            .collect();
        let text = self.name_text(name);
        let mut builder = self.reporter.error(
            DiagnosticCode::AmbiguousCtorOrFn,
            call_span,
            format!("`{text}` is ambiguous here: both a function and a tag constructor"),
        );
        for (span, label) in notes {
            builder = builder.with_note(span, label);
        }
        builder.emit();
    }

    pub(crate) fn type_param_in_scope(&self, name: StringId) -> bool {
        self.type_param_stack
            .iter()
            .any(|frame| frame.contains(&name))
    }
}
