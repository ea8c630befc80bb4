//! Shared fixture builder for the resolution integration tests.
//!
//! Tests construct ASTs through the same `push_*` surface the parser uses,
//! with auto-advancing spans so every node gets a distinct location.

#![allow(dead_code)]

use std::sync::Arc;

use surge_ast::{
    Ast, AttrArg, AttrValue, Attribute, BindingItem, CompareArm, CompareStmt, ExprId, ExprKind,
    ExternItem, ExternMember, FieldDef, FnDecl, FnItem, ForInStmt, GenericParam, ImportEntry,
    ImportItem, ItemId, ItemKind, LetStmt, Literal, Param, PathSeg, Pattern, PatternKind, StmtId,
    StmtKind, TagItem, TypeBody, TypeId, TypeItem, TypeKind,
};
use surge_common::{
    CollectedDiagnostics, Diagnostic, DiagnosticCode, FileId, Interner, Reporter, Span, StringId,
};
use surge_sema::{
    ExportedSymbol, ModuleExports, ModuleExportsMap, PreludeEntry, ResolveOptions, ResolveResult,
    Signature, SymbolFlags, SymbolKind, SymbolTable, resolve_file,
};

pub struct Fx {
    pub interner: Arc<Interner>,
    pub ast: Ast,
    pub file: FileId,
    next_pos: u32,
}

impl Fx {
    pub fn new() -> Self {
        let interner = Arc::new(Interner::new());
        let file = FileId(1);
        let mut ast = Ast::new(file);
        ast.set_span(Span::new(file, 0, 4096));
        Self {
            interner,
            ast,
            file,
            next_pos: 0,
        }
    }

    pub fn id(&self, text: &str) -> StringId {
        self.interner.intern(text)
    }

    pub fn sp(&mut self) -> Span {
        self.next_pos += 8;
        Span::new(self.file, self.next_pos, self.next_pos + 4)
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn named_ty(&mut self, name: &str) -> TypeId {
        let span = self.sp();
        let name = self.id(name);
        self.ast.push_type(
            TypeKind::Named {
                name,
                name_span: span,
                args: Vec::new(),
            },
            span,
        )
    }

    pub fn ptr_ty(&mut self, inner: TypeId) -> TypeId {
        let span = self.sp();
        self.ast.push_type(TypeKind::Ptr(inner), span)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn ident(&mut self, name: &str) -> ExprId {
        let span = self.sp();
        let name = self.id(name);
        self.ast.push_expr(ExprKind::Ident(name), span)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        let span = self.sp();
        self.ast.push_expr(ExprKind::Literal(Literal::Int(value)), span)
    }

    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        let span = self.sp();
        self.ast.push_expr(ExprKind::Call { callee, args }, span)
    }

    pub fn member(&mut self, target: ExprId, field: &str) -> ExprId {
        let field_span = self.sp();
        let span = self.sp();
        let field = self.id(field);
        self.ast.push_expr(
            ExprKind::Member {
                target,
                field,
                field_span,
            },
            span,
        )
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        let span = self.sp();
        self.ast.push_stmt(StmtKind::Expr(expr), span)
    }

    pub fn return_stmt(&mut self, expr: ExprId) -> StmtId {
        let span = self.sp();
        self.ast.push_stmt(StmtKind::Return(expr), span)
    }

    pub fn let_stmt(&mut self, name: &str, mutable: bool, init: ExprId) -> StmtId {
        let name_span = self.sp();
        let span = self.sp();
        let name = self.id(name);
        self.ast.push_stmt(
            StmtKind::Let(LetStmt {
                name,
                name_span,
                mutable,
                ty: TypeId::NONE,
                init,
            }),
            span,
        )
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        let span = self.sp();
        self.ast.push_stmt(StmtKind::Block(stmts), span)
    }

    pub fn for_in_stmt(&mut self, pattern: &str, iterable: ExprId, body: StmtId) -> StmtId {
        let pattern_span = self.sp();
        let span = self.sp();
        let pattern = self.id(pattern);
        self.ast.push_stmt(
            StmtKind::ForIn(ForInStmt {
                pattern,
                pattern_span,
                iterable,
                body,
            }),
            span,
        )
    }

    pub fn compare_stmt(&mut self, scrutinee: ExprId, arms: Vec<(Pattern, StmtId)>) -> StmtId {
        let span = self.sp();
        let arms = arms
            .into_iter()
            .map(|(pattern, body)| CompareArm {
                span: pattern.span,
                pattern,
                body,
            })
            .collect();
        self.ast
            .push_stmt(StmtKind::Compare(CompareStmt { scrutinee, arms }), span)
    }

    pub fn ident_pattern(&mut self, name: &str) -> Pattern {
        let span = self.sp();
        Pattern {
            kind: PatternKind::Ident(self.id(name)),
            span,
        }
    }

    pub fn call_pattern(&mut self, name: &str, args: Vec<Pattern>) -> Pattern {
        let name_span = self.sp();
        Pattern {
            kind: PatternKind::Call {
                name: self.id(name),
                name_span,
                args,
            },
            span: name_span,
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attr(&mut self, name: &str) -> Attribute {
        let span = self.sp();
        Attribute {
            name: self.id(name),
            span,
            args: Vec::new(),
        }
    }

    pub fn attr_str(&mut self, name: &str, arg: &str) -> Attribute {
        let span = self.sp();
        let arg_span = self.sp();
        Attribute {
            name: self.id(name),
            span,
            args: vec![AttrArg {
                span: arg_span,
                value: AttrValue::Str(self.id(arg)),
            }],
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub fn let_item(&mut self, name: &str, mutable: bool, init: ExprId) -> ItemId {
        self.binding_item(name, false, mutable, false, init, Vec::new())
    }

    pub fn const_item(&mut self, name: &str, init: ExprId) -> ItemId {
        self.binding_item(name, true, false, false, init, Vec::new())
    }

    pub fn binding_item(
        &mut self,
        name: &str,
        is_const: bool,
        mutable: bool,
        public: bool,
        init: ExprId,
        attrs: Vec<Attribute>,
    ) -> ItemId {
        let name_span = self.sp();
        let span = self.sp();
        let name = self.id(name);
        self.ast.add_item(
            ItemKind::Binding(BindingItem {
                is_const,
                name,
                name_span,
                mutable,
                public,
                ty: TypeId::NONE,
                init,
                attrs,
            }),
            span,
        )
    }

    pub fn fn_decl(
        &mut self,
        name: &str,
        params: Vec<(&str, TypeId)>,
        ret: TypeId,
        body: StmtId,
        attrs: Vec<Attribute>,
    ) -> FnDecl {
        let keyword_span = self.sp();
        let name_span = self.sp();
        let params_span = self.sp();
        let params = params
            .into_iter()
            .map(|(param_name, ty)| {
                let span = self.sp();
                Param {
                    name: self.id(param_name),
                    span,
                    ty,
                    variadic: false,
                }
            })
            .collect();
        FnDecl {
            name: self.id(name),
            name_span,
            keyword_span,
            params_span,
            public: false,
            params,
            ret,
            generics: Vec::new(),
            generics_span: Span::default(),
            attrs,
            body,
        }
    }

    pub fn add_fn(&mut self, decl: FnDecl) -> ItemId {
        let span = self.sp();
        self.ast.add_item(ItemKind::Fn(FnItem { decl }), span)
    }

    /// `fn name() {}` with an empty body.
    pub fn simple_fn(&mut self, name: &str) -> ItemId {
        let body = self.block(Vec::new());
        let decl = self.fn_decl(name, Vec::new(), TypeId::NONE, body, Vec::new());
        self.add_fn(decl)
    }

    pub fn with_generics(&mut self, mut decl: FnDecl, generics: &[&str]) -> FnDecl {
        decl.generics_span = self.sp();
        decl.generics = generics
            .iter()
            .map(|&name| GenericParam {
                name: self.id(name),
                span: self.sp(),
            })
            .collect();
        decl
    }

    pub fn tag_item(&mut self, name: &str) -> ItemId {
        let name_span = self.sp();
        let span = self.sp();
        let name = self.id(name);
        self.ast.add_item(
            ItemKind::Tag(TagItem {
                name,
                name_span,
                public: false,
                generics: Vec::new(),
                generics_span: Span::default(),
                attrs: Vec::new(),
                payload: Vec::new(),
            }),
            span,
        )
    }

    pub fn type_item(&mut self, name: &str, fields: Vec<(&str, TypeId)>, attrs: Vec<Attribute>) -> ItemId {
        let name_span = self.sp();
        let span = self.sp();
        let fields = fields
            .into_iter()
            .map(|(field_name, ty)| FieldDef {
                name: self.id(field_name),
                span: name_span,
                ty,
            })
            .collect();
        let name = self.id(name);
        self.ast.add_item(
            ItemKind::Type(TypeItem {
                name,
                name_span,
                public: false,
                generics: Vec::new(),
                generics_span: Span::default(),
                attrs,
                body: TypeBody::Struct { fields },
            }),
            span,
        )
    }

    pub fn import_module(&mut self, segments: &[&str], alias: Option<&str>) -> ItemId {
        let (alias, alias_span) = match alias {
            Some(text) => (self.id(text), self.sp()),
            None => (StringId::NONE, Span::default()),
        };
        self.import_raw(segments, alias, alias_span, Vec::new(), false)
    }

    pub fn import_items(&mut self, segments: &[&str], entries: &[(&str, Option<&str>)]) -> ItemId {
        let entries = entries
            .iter()
            .map(|&(name, alias)| {
                let name_span = self.sp();
                let (alias, alias_span) = match alias {
                    Some(text) => (self.id(text), self.sp()),
                    None => (StringId::NONE, Span::default()),
                };
                ImportEntry {
                    name: self.id(name),
                    name_span,
                    alias,
                    alias_span,
                }
            })
            .collect();
        self.import_raw(segments, StringId::NONE, Span::default(), entries, false)
    }

    pub fn import_star(&mut self, segments: &[&str]) -> ItemId {
        self.import_raw(segments, StringId::NONE, Span::default(), Vec::new(), true)
    }

    fn import_raw(
        &mut self,
        segments: &[&str],
        alias: StringId,
        alias_span: Span,
        entries: Vec<ImportEntry>,
        star: bool,
    ) -> ItemId {
        let segments = segments
            .iter()
            .map(|&seg| PathSeg {
                name: self.id(seg),
                span: self.sp(),
            })
            .collect();
        let span = self.sp();
        self.ast.add_item(
            ItemKind::Import(ImportItem {
                segments,
                alias,
                alias_span,
                entries,
                star,
            }),
            span,
        )
    }

    pub fn extern_block(&mut self, target: TypeId, decls: Vec<FnDecl>) -> ItemId {
        let target_span = self.sp();
        let members = decls
            .into_iter()
            .map(|decl| {
                let span = self.sp();
                self.ast.push_extern_member(ExternMember { decl, span })
            })
            .collect();
        let span = self.sp();
        self.ast.add_item(
            ItemKind::Extern(ExternItem {
                target,
                target_span,
                members,
            }),
            span,
        )
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    pub fn resolve(&self) -> (ResolveResult, Vec<Diagnostic>) {
        self.resolve_opts(TestOpts::default())
    }

    pub fn resolve_opts(&self, opts: TestOpts<'_>) -> (ResolveResult, Vec<Diagnostic>) {
        let sink = CollectedDiagnostics::new();
        let options = ResolveOptions {
            table: opts.table,
            interner: Some(Arc::clone(&self.interner)),
            prelude: opts.prelude,
            reporter: Reporter::new(&sink),
            validate: true,
            module_path: opts.module_path,
            file_path: "main.sg".to_string(),
            module_exports: opts.exports,
            no_std: opts.no_std,
            declare_only: opts.declare_only,
            reuse_decls: opts.reuse_decls,
            ..ResolveOptions::default()
        };
        let result = resolve_file(&self.ast, options);
        (result, sink.take())
    }
}

pub struct TestOpts<'a> {
    pub module_path: String,
    pub exports: Option<&'a ModuleExportsMap>,
    pub no_std: bool,
    pub declare_only: bool,
    pub reuse_decls: bool,
    pub table: Option<SymbolTable>,
    pub prelude: Vec<PreludeEntry>,
}

impl Default for TestOpts<'_> {
    fn default() -> Self {
        Self {
            module_path: "app/main".to_string(),
            exports: None,
            no_std: false,
            declare_only: false,
            reuse_decls: false,
            table: None,
            prelude: Vec::new(),
        }
    }
}

// =============================================================================
// Exports-map fixtures
// =============================================================================

pub fn export_fn(name: &str, public: bool) -> ExportedSymbol {
    ExportedSymbol {
        name: name.to_string(),
        kind: SymbolKind::Function,
        flags: if public {
            SymbolFlags::PUBLIC
        } else {
            SymbolFlags::empty()
        },
        span: Span::new(FileId(7), 10, 14),
        signature: Some(Signature {
            params: Vec::new(),
            variadic: Vec::new(),
            result: "nothing".to_string(),
        }),
        ..ExportedSymbol::default()
    }
}

pub fn export_const(name: &str, public: bool) -> ExportedSymbol {
    ExportedSymbol {
        name: name.to_string(),
        kind: SymbolKind::Const,
        flags: if public {
            SymbolFlags::PUBLIC
        } else {
            SymbolFlags::empty()
        },
        span: Span::new(FileId(7), 20, 24),
        ..ExportedSymbol::default()
    }
}

pub fn exports_map(modules: Vec<(&str, Vec<ExportedSymbol>)>) -> ModuleExportsMap {
    let mut map = ModuleExportsMap::default();
    for (path, exports) in modules {
        let mut module = ModuleExports::new(path);
        for export in exports {
            module.add(export);
        }
        map.insert(path.to_string(), module);
    }
    map
}

// =============================================================================
// Diagnostic assertions
// =============================================================================

pub fn codes(diags: &[Diagnostic]) -> Vec<DiagnosticCode> {
    diags.iter().map(|d| d.code).collect()
}

pub fn count_code(diags: &[Diagnostic], code: DiagnosticCode) -> usize {
    diags.iter().filter(|d| d.code == code).count()
}

pub fn assert_no_diagnostics(diags: &[Diagnostic]) {
    assert!(
        diags.is_empty(),
        "expected no diagnostics, got: {:?}",
        codes(diags)
    );
}
