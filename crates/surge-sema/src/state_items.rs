//! Item-level declaration handling: bindings, types, contracts, tags, and
//! extern blocks.

use surge_ast::{
    Attribute, BindingItem, ContractItem, ContractRequirement, ExternItem, ItemId, TagItem,
    TypeBody, TypeItem,
};
use surge_common::{DiagnosticCode, FixSuggestion, Span, StringId};

use crate::scope::ScopeOwner;
use crate::state::FileResolver;
use crate::symbol::{ContractInfo, ContractMember, DeclOrigin, SymbolFlags, SymbolKind};
use crate::type_key::{receiver_key_of, signature_of, type_key_of};

impl FileResolver<'_, '_> {
    // =========================================================================
    // Attributes and visibility
    // =========================================================================

    pub(crate) fn find_attr<'b>(
        &self,
        attrs: &'b [Attribute],
        name: StringId,
    ) -> Option<&'b Attribute> {
        attrs.iter().find(|attr| attr.name == name)
    }

    /// Compute declaration flags from `pub` and `@hidden`.
    ///
    /// `@hidden` makes the symbol file-private; combining it with `pub`
    /// warns and the hidden side wins.
    pub(crate) fn item_visibility(&mut self, public: bool, attrs: &[Attribute]) -> SymbolFlags {
        let mut flags = SymbolFlags::empty();
        if public {
            flags |= SymbolFlags::PUBLIC;
        }
        if let Some(attr) = self.find_attr(attrs, self.names.hidden) {
            if public {
                self.reporter
                    .warning(
                        DiagnosticCode::HiddenPublic,
                        attr.span,
                        "`@hidden` on a `pub` declaration; the symbol stays file-private",
                    )
                    .with_fix_suggestion(FixSuggestion::replace(
                        "remove @hidden",
                        attr.span,
                        "",
                        "@hidden",
                    ))
                    .emit();
            }
            flags.remove(SymbolFlags::PUBLIC);
            flags |= SymbolFlags::FILE_PRIVATE;
        }
        flags
    }

    // =========================================================================
    // let / const items
    // =========================================================================

    /// Declare a `let`/`const` item. Constants go through here during
    /// pre-declaration; the main walk only revisits their type and
    /// initialiser.
    pub(crate) fn declare_binding_item(&mut self, item_id: ItemId, binding: &BindingItem) {
        if binding.name == self.names.wildcard {
            if binding.mutable {
                self.reporter
                    .error(
                        DiagnosticCode::WildcardMut,
                        binding.name_span,
                        "wildcard `_` cannot be a mutable binding",
                    )
                    .emit();
            }
            // `_` is a discard, never a symbol.
            return;
        }

        let kind = if binding.is_const {
            SymbolKind::Const
        } else {
            SymbolKind::Let
        };
        if let Some(existing) = self.find_reusable(binding.name, kind, item_id) {
            self.item_symbols.entry(item_id).or_default().push(existing);
            return;
        }

        let mut flags = self.item_visibility(binding.public, &binding.attrs);
        if binding.mutable {
            flags |= SymbolFlags::MUTABLE;
        }
        let (sym, ok) = self.resolver.declare(
            binding.name,
            binding.name_span,
            kind,
            flags,
            DeclOrigin::item(self.ast.file(), item_id),
        );
        if ok {
            self.record_item_symbol(item_id, sym);
        }
    }

    /// Walk a binding's declared type and, outside declare-only mode, its
    /// initialiser.
    pub(crate) fn walk_binding_parts(&mut self, binding: &BindingItem) {
        if binding.ty.is_some() {
            self.walk_type(binding.ty);
        }
        if !self.declare_only && binding.init.is_some() {
            self.walk_expr(binding.init);
        }
    }

    // =========================================================================
    // type items
    // =========================================================================

    pub(crate) fn resolve_type_item(&mut self, item_id: ItemId, ty: &TypeItem, _span: Span) {
        let flags = self.item_visibility(ty.public, &ty.attrs);

        if let Some(attr) = self.find_attr(&ty.attrs, self.names.intrinsic) {
            let attr_span = attr.span;
            if !crate::prelude::intrinsic_type_module(&self.module_path) {
                self.reporter
                    .error(
                        DiagnosticCode::IntrinsicBadContext,
                        attr_span,
                        format!(
                            "`@intrinsic` types must live in a `core/*` or `stdlib/*` module, not `{}`",
                            self.module_path
                        ),
                    )
                    .emit();
                return;
            }
            if !intrinsic_type_body_ok(ty, self.names.opaque_field) {
                self.reporter
                    .error(
                        DiagnosticCode::IntrinsicHasBody,
                        attr_span,
                        "`@intrinsic` types must be an empty struct or a single `__opaque` field",
                    )
                    .emit();
                return;
            }
            return self.declare_type_like(
                item_id,
                ty.name,
                ty.name_span,
                SymbolKind::Type,
                flags | SymbolFlags::BUILTIN,
                ty,
            );
        }

        self.declare_type_like(item_id, ty.name, ty.name_span, SymbolKind::Type, flags, ty);
    }

    fn declare_type_like(
        &mut self,
        item_id: ItemId,
        name: StringId,
        name_span: Span,
        kind: SymbolKind,
        flags: SymbolFlags,
        ty: &TypeItem,
    ) {
        if let Some(existing) = self.find_reusable(name, kind, item_id) {
            self.item_symbols.entry(item_id).or_default().push(existing);
            self.walk_type_item_body(ty);
            return;
        }
        let (sym, ok) = self.resolver.declare(
            name,
            name_span,
            kind,
            flags,
            DeclOrigin::item(self.ast.file(), item_id),
        );
        if !ok {
            return;
        }
        let type_params: Vec<StringId> = ty.generics.iter().map(|g| g.name).collect();
        if let Some(symbol) = self.resolver.table_mut().symbols.get_mut(sym) {
            symbol.type_params = type_params;
            symbol.type_param_span = ty.generics_span;
        }
        self.record_item_symbol(item_id, sym);
        self.walk_type_item_body(ty);
    }

    fn walk_type_item_body(&mut self, ty: &TypeItem) {
        self.type_param_stack
            .push(ty.generics.iter().map(|g| g.name).collect());
        match &ty.body {
            TypeBody::Struct { fields } => {
                for field in fields {
                    self.walk_type(field.ty);
                }
            }
            TypeBody::Alias(aliased) => self.walk_type(*aliased),
        }
        self.type_param_stack.pop();
    }

    // =========================================================================
    // contract items
    // =========================================================================

    pub(crate) fn resolve_contract_item(
        &mut self,
        item_id: ItemId,
        contract: &ContractItem,
        _span: Span,
    ) {
        if let Some(existing) = self.find_reusable(contract.name, SymbolKind::Contract, item_id) {
            self.item_symbols.entry(item_id).or_default().push(existing);
            return;
        }
        let flags = self.item_visibility(contract.public, &contract.attrs);
        let (sym, ok) = self.resolver.declare(
            contract.name,
            contract.name_span,
            SymbolKind::Contract,
            flags,
            DeclOrigin::item(self.ast.file(), item_id),
        );
        if !ok {
            return;
        }

        self.type_param_stack
            .push(contract.generics.iter().map(|g| g.name).collect());
        let mut members = Vec::with_capacity(contract.requirements.len());
        for req in &contract.requirements {
            match req {
                ContractRequirement::Field { name, ty, .. } => {
                    self.walk_type(*ty);
                    members.push(ContractMember {
                        name: *name,
                        is_method: false,
                        key: type_key_of(self.ast, &self.interner, *ty),
                    });
                }
                ContractRequirement::Method {
                    name, params, ret, ..
                } => {
                    for param in params {
                        self.walk_type(param.ty);
                    }
                    self.walk_type(*ret);
                    let mut key = String::from("fn(");
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            key.push(',');
                        }
                        key.push_str(&type_key_of(self.ast, &self.interner, param.ty));
                    }
                    key.push_str(")->");
                    if ret.is_none() {
                        key.push_str("nothing");
                    } else {
                        key.push_str(&type_key_of(self.ast, &self.interner, *ret));
                    }
                    members.push(ContractMember {
                        name: *name,
                        is_method: true,
                        key,
                    });
                }
            }
        }
        self.type_param_stack.pop();

        let type_params: Vec<StringId> = contract.generics.iter().map(|g| g.name).collect();
        if let Some(symbol) = self.resolver.table_mut().symbols.get_mut(sym) {
            symbol.type_params = type_params;
            symbol.type_param_span = contract.generics_span;
            symbol.contract = Some(ContractInfo { members });
        }
        self.record_item_symbol(item_id, sym);
    }

    // =========================================================================
    // tag items
    // =========================================================================

    pub(crate) fn resolve_tag_item(&mut self, item_id: ItemId, tag: &TagItem, _span: Span) {
        self.check_tag_name_style(tag.name, tag.name_span);

        if let Some(existing) = self.find_reusable(tag.name, SymbolKind::Tag, item_id) {
            self.item_symbols.entry(item_id).or_default().push(existing);
            return;
        }
        let flags = self.item_visibility(tag.public, &tag.attrs);
        let (sym, ok) = self.resolver.declare(
            tag.name,
            tag.name_span,
            SymbolKind::Tag,
            flags,
            DeclOrigin::item(self.ast.file(), item_id),
        );
        if !ok {
            return;
        }

        self.type_param_stack
            .push(tag.generics.iter().map(|g| g.name).collect());
        for &payload_ty in &tag.payload {
            self.walk_type(payload_ty);
        }
        self.type_param_stack.pop();

        let type_params: Vec<StringId> = tag.generics.iter().map(|g| g.name).collect();
        if let Some(symbol) = self.resolver.table_mut().symbols.get_mut(sym) {
            symbol.type_params = type_params;
            symbol.type_param_span = tag.generics_span;
        }
        self.record_item_symbol(item_id, sym);
    }

    // =========================================================================
    // extern blocks
    // =========================================================================

    pub(crate) fn resolve_extern_item(&mut self, item_id: ItemId, ext: &ExternItem, _span: Span) {
        let receiver_key = receiver_key_of(self.ast, &self.interner, ext.target);
        self.walk_type(ext.target);

        for &member_id in &ext.members {
            let Some(member) = self.ast.extern_member(member_id) else {
                continue;
            };
            let decl = member.decl.clone();
            let member_span = member.span;

            if let Some(existing) = self.find_reusable_method(&decl, item_id, &receiver_key) {
                self.extern_syms.insert(member_id, existing);
                self.item_symbols.entry(item_id).or_default().push(existing);
                if !self.declare_only {
                    self.walk_fn_scope(&decl, ScopeOwner::ExternMember(member_id), member_span);
                }
                continue;
            }

            let origin = DeclOrigin {
                source_file: self.ast.file(),
                ast_file: self.ast.file(),
                item: item_id,
                ..DeclOrigin::default()
            };
            let declared = self.declare_function(
                &decl,
                member_span,
                origin,
                Some((ext.target, receiver_key.clone())),
            );
            if let Some(sym) = declared {
                self.extern_syms.insert(member_id, sym);
                self.record_item_symbol(item_id, sym);
            }
            if !self.declare_only {
                self.walk_fn_scope(&decl, ScopeOwner::ExternMember(member_id), member_span);
            }
        }
    }

    fn find_reusable_method(
        &self,
        decl: &surge_ast::FnDecl,
        item_id: ItemId,
        receiver_key: &str,
    ) -> Option<crate::arena::SymbolId> {
        if !self.reuse_decls {
            return None;
        }
        let scope = self
            .resolver
            .table()
            .scopes
            .get(self.resolver.current_scope())?;
        let signature = signature_of(self.ast, &self.interner, decl);
        scope.symbols_named(decl.name).iter().copied().find(|&id| {
            self.resolver.table().symbols.get(id).is_some_and(|sym| {
                sym.kind == SymbolKind::Function
                    && sym.decl.item == item_id
                    && sym.receiver_key.as_deref() == Some(receiver_key)
                    && sym.signature.as_ref() == Some(&signature)
            })
        })
    }
}

/// An intrinsic type carries no real body: an empty struct, or a single
/// `__opaque` marker field.
fn intrinsic_type_body_ok(ty: &TypeItem, opaque_field: StringId) -> bool {
    match &ty.body {
        TypeBody::Struct { fields } => {
            fields.is_empty() || (fields.len() == 1 && fields[0].name == opaque_field)
        }
        TypeBody::Alias(_) => false,
    }
}
