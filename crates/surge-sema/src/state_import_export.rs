//! Import declaration handling.
//!
//! Shapes: `import m/n`, `import m/n as alias`, `import m/n::one`,
//! `import m/n::one as alias`, `import m/n::{a, b as c}`, `import m/n::*`.
//! Whole-module imports declare a `module` alias symbol; item imports
//! declare `import` symbols that bind lazily on first use; star imports
//! expand to one `import` symbol per public export.

use surge_ast::{ImportItem, ItemId};
use surge_common::{DiagnosticCode, Span, StringId};

use crate::state::FileResolver;
use crate::symbol::{DeclOrigin, SymbolFlags, SymbolKind};

impl FileResolver<'_, '_> {
    pub(crate) fn resolve_import_item(&mut self, item_id: ItemId, import: &ImportItem, span: Span) {
        let mut segment_ids: Vec<StringId> = import.segments.iter().map(|seg| seg.name).collect();
        let mut segment_texts: Vec<String> = segment_ids
            .iter()
            .map(|&id| self.name_text(id).to_string())
            .collect();

        if self.no_std && segment_texts.first().map(String::as_str) == Some("stdlib") {
            let first_span = import.segments.first().map_or(span, |seg| seg.span);
            self.reporter
                .error(
                    DiagnosticCode::NoStdlib,
                    first_span,
                    "`stdlib` imports are unavailable under `no_std`",
                )
                .emit();
            // Substitute `core` so downstream resolution can still succeed.
            segment_texts[0] = "core".to_string();
            segment_ids[0] = self.interner.intern("core");
        }

        let segment_refs: Vec<&str> = segment_texts.iter().map(String::as_str).collect();
        let resolved =
            self.path_resolver
                .resolve_import_path(&self.module_path, &self.base_dir, &segment_refs);

        if import.star {
            self.resolve_star_import(item_id, &resolved, &segment_ids, span);
        } else if !import.entries.is_empty() {
            for entry in &import.entries {
                let (declared_name, declared_span) = if entry.alias.is_some() {
                    (entry.alias, entry.alias_span)
                } else {
                    (entry.name, entry.name_span)
                };
                self.declare_item_import(
                    item_id,
                    declared_name,
                    declared_span,
                    entry.name,
                    &resolved,
                    &segment_ids,
                );
            }
        } else {
            self.resolve_whole_module_import(item_id, import, &resolved, &segment_ids, span);
        }
    }

    fn resolve_whole_module_import(
        &mut self,
        item_id: ItemId,
        import: &ImportItem,
        resolved: &str,
        segment_ids: &[StringId],
        span: Span,
    ) {
        if let Some(&prior) = self.module_imports.get(resolved) {
            self.reporter
                .error(
                    DiagnosticCode::DuplicateSymbol,
                    span,
                    format!("module `{resolved}` is already imported"),
                )
                .with_note(prior, "module first imported here")
                .emit();
            return;
        }
        self.module_imports.insert(resolved.to_string(), span);

        let (alias, alias_span) = if import.alias.is_some() {
            (import.alias, import.alias_span)
        } else {
            // Last path segment that names a real module directory.
            let fallback = import
                .segments
                .iter()
                .rev()
                .find(|seg| {
                    let text = self.name_text(seg.name);
                    &*text != "." && &*text != ".."
                })
                .map(|seg| (seg.name, seg.span));
            match fallback {
                Some(pair) => pair,
                None => return,
            }
        };

        self.declare_module_alias(item_id, alias, alias_span, resolved, segment_ids);
    }

    fn declare_module_alias(
        &mut self,
        item_id: ItemId,
        alias: StringId,
        alias_span: Span,
        resolved: &str,
        segment_ids: &[StringId],
    ) {
        if let Some(existing) = self.find_reusable(alias, SymbolKind::Module, item_id) {
            self.item_symbols.entry(item_id).or_default().push(existing);
            self.alias_module_paths.insert(alias, resolved.to_string());
            return;
        }

        let (sym, ok) = self.resolver.declare(
            alias,
            alias_span,
            SymbolKind::Module,
            SymbolFlags::IMPORTED,
            DeclOrigin::item(self.ast.file(), item_id),
        );
        if !ok {
            return;
        }
        if let Some(symbol) = self.resolver.table_mut().symbols.get_mut(sym) {
            symbol.module_path = Some(resolved.to_string());
            symbol.aliases = segment_ids.iter().copied().collect();
        }
        self.alias_module_paths.insert(alias, resolved.to_string());
        self.record_item_symbol(item_id, sym);
    }

    /// Declare one `import`-kind symbol for a `::item` import. The symbol is
    /// not yet bound to the exported symbol; binding happens lazily on use.
    fn declare_item_import(
        &mut self,
        item_id: ItemId,
        declared_name: StringId,
        declared_span: Span,
        original_name: StringId,
        resolved: &str,
        segment_ids: &[StringId],
    ) {
        if let Some(existing) = self.find_reusable(declared_name, SymbolKind::Import, item_id) {
            self.item_symbols.entry(item_id).or_default().push(existing);
            return;
        }

        let (sym, ok) = self.resolver.declare(
            declared_name,
            declared_span,
            SymbolKind::Import,
            SymbolFlags::IMPORTED,
            DeclOrigin::item(self.ast.file(), item_id),
        );
        if !ok {
            return;
        }
        if let Some(symbol) = self.resolver.table_mut().symbols.get_mut(sym) {
            symbol.module_path = Some(resolved.to_string());
            symbol.import_name = original_name;
            symbol.aliases.push(original_name);
            symbol.aliases.extend(segment_ids.iter().copied());
        }
        self.record_item_symbol(item_id, sym);
    }

    /// `import m/n::*`: one import symbol per publicly exported name.
    /// `@hidden` exports were already filtered at export-collection time.
    fn resolve_star_import(
        &mut self,
        item_id: ItemId,
        resolved: &str,
        segment_ids: &[StringId],
        span: Span,
    ) {
        let Some(module) = self.exports.and_then(|map| map.get(resolved)) else {
            self.reporter
                .error(
                    DiagnosticCode::SemaError,
                    span,
                    format!("cannot expand `{resolved}::*`: module exports are unknown"),
                )
                .emit();
            return;
        };

        let mut names: Vec<&str> = module
            .symbols
            .iter()
            .filter(|(_, overloads)| {
                overloads.iter().any(|export| {
                    export.flags.contains(SymbolFlags::PUBLIC)
                        || export.flags.contains(SymbolFlags::BUILTIN)
                })
            })
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();

        let name_ids: Vec<StringId> = names.iter().map(|name| self.interner.intern(name)).collect();
        for name in name_ids {
            self.declare_item_import(item_id, name, span, name, resolved, segment_ids);
        }
    }
}
