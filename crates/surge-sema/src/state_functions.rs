//! Function declaration rules: overload/override compatibility, intrinsic
//! legality, entrypoint modes, naming style, and function-scope walking.

use surge_ast::{AttrValue, FnDecl, FnItem, ItemId, TypeId};
use surge_common::{DiagnosticCode, FixSuggestion, Span, StringId};

use crate::arena::SymbolId;
use crate::prelude::{INTRINSIC_NAMES, intrinsic_allowed, intrinsic_fn_module};
use crate::scope::{ScopeKind, ScopeOwner};
use crate::state::FileResolver;
use crate::symbol::{DeclOrigin, EntrypointMode, Signature, SymbolFlags, SymbolKind, TypeKey};
use crate::type_key::signature_of;

impl FileResolver<'_, '_> {
    pub(crate) fn resolve_fn_item(&mut self, item_id: ItemId, func: &FnItem, span: Span) {
        let decl = &func.decl;

        if self.reuse_decls {
            if let Some(existing) = self.find_reusable_fn(decl, item_id) {
                self.item_symbols.entry(item_id).or_default().push(existing);
                if !self.declare_only {
                    self.walk_fn_scope(decl, ScopeOwner::Item(item_id), span);
                }
                return;
            }
        }

        let origin = DeclOrigin::item(self.ast.file(), item_id);
        if let Some(sym) = self.declare_function(decl, span, origin, None) {
            self.record_item_symbol(item_id, sym);
        }
        if !self.declare_only {
            self.walk_fn_scope(decl, ScopeOwner::Item(item_id), span);
        }
    }

    /// The declaration span of a function: the explicit name span, else the
    /// range between the `fn` keyword and the parameter list, else the whole
    /// item.
    pub(crate) fn fn_name_span(&self, decl: &FnDecl, item_span: Span) -> Span {
        if !decl.name_span.is_none() {
            return decl.name_span;
        }
        if !decl.keyword_span.is_none() && !decl.params_span.is_none() {
            return Span::new(
                decl.keyword_span.file,
                decl.keyword_span.end,
                decl.params_span.start,
            );
        }
        item_span
    }

    // =========================================================================
    // Naming style
    // =========================================================================

    /// Function names start lowercase. Names whose first character is not an
    /// ASCII letter are left alone.
    pub(crate) fn check_fn_name_style(&mut self, name: StringId, span: Span) {
        if name == self.names.wildcard {
            return;
        }
        let text = self.name_text(name);
        let Some(first) = text.chars().next() else {
            return;
        };
        if !first.is_ascii_uppercase() {
            return;
        }
        let mut fixed = String::with_capacity(text.len());
        fixed.push(first.to_ascii_lowercase());
        fixed.push_str(&text[1..]);
        self.reporter
            .warning(
                DiagnosticCode::FnNameStyle,
                span,
                format!("function `{text}` should start lowercase"),
            )
            .with_fix_suggestion(FixSuggestion::replace(
                format!("rename to `{fixed}`"),
                span,
                fixed.clone(),
                text.to_string(),
            ))
            .emit();
    }

    /// Tag names start uppercase.
    pub(crate) fn check_tag_name_style(&mut self, name: StringId, span: Span) {
        if name == self.names.wildcard {
            return;
        }
        let text = self.name_text(name);
        let Some(first) = text.chars().next() else {
            return;
        };
        if !first.is_ascii_lowercase() {
            return;
        }
        let mut fixed = String::with_capacity(text.len());
        fixed.push(first.to_ascii_uppercase());
        fixed.push_str(&text[1..]);
        self.reporter
            .warning(
                DiagnosticCode::TagNameStyle,
                span,
                format!("tag `{text}` should start uppercase"),
            )
            .with_fix_suggestion(FixSuggestion::replace(
                format!("rename to `{fixed}`"),
                span,
                fixed.clone(),
                text.to_string(),
            ))
            .emit();
    }

    // =========================================================================
    // Declaration rule engine
    // =========================================================================

    /// Validate and declare one function (free or extern method).
    ///
    /// Returns `None` when a rule rejects the declaration; the symbol is
    /// then never added to the scope.
    pub(crate) fn declare_function(
        &mut self,
        decl: &FnDecl,
        item_span: Span,
        origin: DeclOrigin,
        receiver: Option<(TypeId, TypeKey)>,
    ) -> Option<SymbolId> {
        let name = decl.name;
        let name_span = self.fn_name_span(decl, item_span);
        self.check_fn_name_style(name, name_span);

        let has_overload = self.find_attr(&decl.attrs, self.names.overload).is_some();
        let has_override = self.find_attr(&decl.attrs, self.names.override_).is_some();
        let intrinsic_span = self
            .find_attr(&decl.attrs, self.names.intrinsic)
            .map(|attr| attr.span);
        let entrypoint_attr = self
            .find_attr(&decl.attrs, self.names.entrypoint)
            .cloned();
        let mut flags = self.item_visibility(decl.public, &decl.attrs);

        let mut existing = self.existing_fn_candidates(name, receiver.as_ref().map(|(_, key)| key.as_str()));
        let signature = signature_of(self.ast, &self.interner, decl);

        if has_overload && has_override {
            self.reporter
                .error(
                    DiagnosticCode::FnOverride,
                    name_span,
                    "cannot combine `@overload` and `@override`",
                )
                .emit();
            return None;
        }
        if has_override && existing.is_empty() {
            self.reporter
                .error(
                    DiagnosticCode::FnOverride,
                    name_span,
                    "`@override` requires an existing declaration",
                )
                .emit();
            return None;
        }

        if let Some(attr_span) = intrinsic_span {
            if has_override {
                self.reporter
                    .error(
                        DiagnosticCode::FnOverride,
                        name_span,
                        "cannot combine `@intrinsic` and `@override`",
                    )
                    .emit();
                return None;
            }
            if !intrinsic_fn_module(&self.module_path) {
                self.reporter
                    .error(
                        DiagnosticCode::IntrinsicBadContext,
                        attr_span,
                        format!(
                            "`@intrinsic` functions must live in `core/intrinsics` or `core/task`, not `{}`",
                            self.module_path
                        ),
                    )
                    .emit();
                return None;
            }
            if decl.body.is_some() {
                self.reporter
                    .error(
                        DiagnosticCode::IntrinsicHasBody,
                        name_span,
                        "`@intrinsic` functions take their body from the runtime",
                    )
                    .emit();
                return None;
            }
            let text = self.name_text(name);
            if !intrinsic_allowed(&text) {
                self.reporter
                    .error(
                        DiagnosticCode::IntrinsicBadName,
                        name_span,
                        format!(
                            "`{text}` is not a recognised intrinsic; allowed names: {}",
                            INTRINSIC_NAMES.join(", ")
                        ),
                    )
                    .emit();
                return None;
            }
            flags |= SymbolFlags::BUILTIN;
            // A legal intrinsic is a fresh declaration: prior symbols no
            // longer participate in overload rules.
            existing.clear();
        }

        if has_override
            && !flags.contains(SymbolFlags::PUBLIC)
            && self.any_public(&existing)
        {
            self.reporter
                .error(
                    DiagnosticCode::FnOverride,
                    name_span,
                    "`@override` cannot reduce the visibility of a public declaration",
                )
                .emit();
            return None;
        }

        if let Some(protected) = self.protected_with_signature(&existing, &signature) {
            let prior_span = self.symbol_span(protected);
            let text = self.name_text(name);
            self.reporter
                .error(
                    DiagnosticCode::FnOverride,
                    name_span,
                    format!("`{text}` is already defined in core/stdlib"),
                )
                .with_note(prior_span, "protected declaration here")
                .emit();
            return None;
        }

        if !existing.is_empty() {
            let same_sig: Vec<SymbolId> = existing
                .iter()
                .copied()
                .filter(|&id| self.symbol_signature_eq(id, &signature))
                .collect();

            if has_overload {
                if let Some(&dup) = same_sig.first() {
                    let prior_span = self.symbol_span(dup);
                    self.reporter
                        .error(
                            DiagnosticCode::FnOverride,
                            name_span,
                            "`@overload` duplicates an existing signature; use `@override`",
                        )
                        .with_note(prior_span, "existing declaration here")
                        .emit();
                    return None;
                }
            } else if has_override {
                let target = same_sig
                    .iter()
                    .copied()
                    .find(|&id| !self.symbol_is_builtin(id));
                if target.is_none() {
                    let (message, note_at) = if same_sig.is_empty() {
                        ("`@override` requires a matching signature", existing[0])
                    } else {
                        ("cannot override a built-in declaration", same_sig[0])
                    };
                    let prior_span = self.symbol_span(note_at);
                    self.reporter
                        .error(DiagnosticCode::FnOverride, name_span, message)
                        .with_note(prior_span, "existing declaration here")
                        .emit();
                    return None;
                }
            } else {
                let text = self.name_text(name);
                let fix = if same_sig.is_empty() {
                    FixSuggestion::insert(
                        "mark function as overload",
                        decl.keyword_span.zero_at_start(),
                        "@overload ",
                        "",
                    )
                } else {
                    FixSuggestion::insert(
                        "mark function as override",
                        decl.keyword_span.zero_at_start(),
                        "@override ",
                        "",
                    )
                };
                let prior_span = self.symbol_span(existing[0]);
                self.reporter
                    .error(
                        DiagnosticCode::FnOverride,
                        name_span,
                        format!("`{text}` redeclared without `@overload` or `@override`"),
                    )
                    .with_note(prior_span, "previous declaration here")
                    .with_fix_suggestion(fix)
                    .emit();
                return None;
            }
        }

        let mut entrypoint_mode = EntrypointMode::None;
        if let Some(attr) = entrypoint_attr {
            if intrinsic_span.is_some() {
                self.reporter
                    .error(
                        DiagnosticCode::EntrypointInvalidAttr,
                        attr.span,
                        "cannot combine `@entrypoint` and `@intrinsic`",
                    )
                    .emit();
            } else if decl.body.is_none() {
                self.reporter
                    .error(
                        DiagnosticCode::EntrypointNoBody,
                        attr.span,
                        "`@entrypoint` functions must have a body",
                    )
                    .emit();
            } else {
                flags |= SymbolFlags::ENTRYPOINT;
                entrypoint_mode = self.parse_entrypoint_mode(&attr);
            }
        }

        let sym = self.resolver.declare_without_checks(
            name,
            name_span,
            SymbolKind::Function,
            flags,
            origin,
            Some(signature),
        );
        let type_params: Vec<StringId> = decl.generics.iter().map(|g| g.name).collect();
        if let Some(symbol) = self.resolver.table_mut().symbols.get_mut(sym) {
            symbol.type_params = type_params;
            symbol.type_param_span = decl.generics_span;
            symbol.entrypoint_mode = entrypoint_mode;
            if let Some((receiver_ty, receiver_key)) = receiver {
                symbol.flags |= SymbolFlags::METHOD;
                symbol.receiver = receiver_ty;
                symbol.receiver_key = Some(receiver_key);
            }
        }
        Some(sym)
    }

    /// Existing same-name functions in the current scope that the new
    /// declaration competes with: same-module synthetics are invisible, and
    /// methods only compete within their receiver key.
    fn existing_fn_candidates(&self, name: StringId, receiver_key: Option<&str>) -> Vec<SymbolId> {
        let table = self.resolver.table();
        let Some(scope) = table.scopes.get(self.resolver.current_scope()) else {
            return Vec::new();
        };
        scope
            .symbols_named(name)
            .iter()
            .copied()
            .filter(|&id| {
                let Some(sym) = table.symbols.get(id) else {
                    return false;
                };
                if sym.kind != SymbolKind::Function {
                    return false;
                }
                if sym.decl.is_synthetic()
                    && sym.module_path.as_deref() == Some(self.module_path.as_str())
                {
                    return false;
                }
                match receiver_key {
                    Some(key) => sym.receiver_key.as_deref() == Some(key),
                    None => sym.receiver_key.is_none() && !sym.is_method(),
                }
            })
            .collect()
    }

    fn parse_entrypoint_mode(&mut self, attr: &surge_ast::Attribute) -> EntrypointMode {
        let mode_arg = attr.args.first().and_then(|arg| match arg.value {
            AttrValue::Str(text) => Some((text, arg.span)),
            _ => None,
        });
        let Some((mode_id, mode_span)) = mode_arg else {
            self.reporter
                .error(
                    DiagnosticCode::EntrypointModeInvalid,
                    attr.span,
                    "`@entrypoint` expects a string literal mode (`argv` or `stdin`)",
                )
                .emit();
            return EntrypointMode::None;
        };
        let mode = self.name_text(mode_id);
        match &*mode {
            "argv" => EntrypointMode::Argv,
            "stdin" => EntrypointMode::Stdin,
            "env" => {
                self.reporter
                    .error(
                        DiagnosticCode::FutEntrypointModeEnv,
                        mode_span,
                        "`@entrypoint(\"env\")` is reserved for a future release",
                    )
                    .emit();
                EntrypointMode::None
            }
            "config" => {
                self.reporter
                    .error(
                        DiagnosticCode::FutEntrypointModeConfig,
                        mode_span,
                        "`@entrypoint(\"config\")` is reserved for a future release",
                    )
                    .emit();
                EntrypointMode::None
            }
            other => {
                self.reporter
                    .error(
                        DiagnosticCode::EntrypointModeInvalid,
                        mode_span,
                        format!("unknown entrypoint mode `{other}`"),
                    )
                    .emit();
                EntrypointMode::None
            }
        }
    }

    // =========================================================================
    // Function scope walking
    // =========================================================================

    /// Enter a function scope, declare parameters, and walk the body.
    ///
    /// Parameters named `_` are dropped; duplicate parameter names are
    /// reported by the resolver's declare path.
    pub(crate) fn walk_fn_scope(&mut self, decl: &FnDecl, owner: ScopeOwner, span: Span) {
        let scope = self.enter_scope(ScopeKind::Function, owner, span);
        self.type_param_stack
            .push(decl.generics.iter().map(|g| g.name).collect());

        for param in &decl.params {
            self.walk_type(param.ty);
            if param.name == self.names.wildcard || param.name.is_none() {
                continue;
            }
            let origin = DeclOrigin::item(self.ast.file(), self.current_item);
            let (_, ok) = self.resolver.declare(
                param.name,
                param.span,
                SymbolKind::Param,
                SymbolFlags::empty(),
                origin,
            );
            if ok {
                self.stats.symbols_declared += 1;
            }
        }
        if decl.ret.is_some() {
            self.walk_type(decl.ret);
        }
        if decl.body.is_some() {
            self.walk_stmt(decl.body);
        }

        self.type_param_stack.pop();
        self.leave_scope(scope);
    }

    fn find_reusable_fn(&self, decl: &FnDecl, item_id: ItemId) -> Option<SymbolId> {
        let table = self.resolver.table();
        let scope = table.scopes.get(self.resolver.current_scope())?;
        let signature = signature_of(self.ast, &self.interner, decl);
        scope.symbols_named(decl.name).iter().copied().find(|&id| {
            table.symbols.get(id).is_some_and(|sym| {
                sym.kind == SymbolKind::Function
                    && sym.decl.item == item_id
                    && !sym.decl.is_synthetic()
                    && sym.receiver_key.is_none()
                    && sym.signature.as_ref() == Some(&signature)
            })
        })
    }

    // Symbol query helpers; each takes the table borrow only briefly so the
    // reporter can run in between.

    fn any_public(&self, ids: &[SymbolId]) -> bool {
        ids.iter()
            .any(|&id| self.resolver.table().symbols.get(id).is_some_and(|s| s.is_public()))
    }

    fn protected_with_signature(&self, ids: &[SymbolId], signature: &Signature) -> Option<SymbolId> {
        ids.iter().copied().find(|&id| {
            self.resolver.table().symbols.get(id).is_some_and(|sym| {
                sym.is_protected() && sym.signature.as_ref() == Some(signature)
            })
        })
    }

    fn symbol_signature_eq(&self, id: SymbolId, signature: &Signature) -> bool {
        self.resolver
            .table()
            .symbols
            .get(id)
            .is_some_and(|sym| sym.signature.as_ref() == Some(signature))
    }

    fn symbol_is_builtin(&self, id: SymbolId) -> bool {
        self.resolver
            .table()
            .symbols
            .get(id)
            .is_some_and(|sym| sym.is_builtin())
    }

    pub(crate) fn symbol_span(&self, id: SymbolId) -> Span {
        self.resolver
            .table()
            .symbols
            .get(id)
            .map_or(Span::default(), |sym| sym.span)
    }
}
