//! Per-file node arenas.
//!
//! `Ast` owns every node of one parsed file. Index 0 of each arena is a
//! sentinel so the zero id stays "none"; allocation only appends and ids are
//! never recycled. Consumers go through `get(id)`-style accessors that
//! return `None` for the sentinel and out-of-range ids.

use surge_common::{FileId, Span};

use crate::ids::{ExprId, ExternMemberId, ItemId, StmtId, TypeId};
use crate::node::{
    BindingItem, ContractItem, Expr, ExprKind, ExternItem, ExternMember, FnItem, ImportItem, Item,
    ItemKind, Stmt, StmtKind, TagItem, TypeItem, TypeKind, TypeNode,
};

/// The parsed nodes of one source file.
#[derive(Debug)]
pub struct Ast {
    file: FileId,
    span: Span,
    items: Vec<Item>,
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    types: Vec<TypeNode>,
    extern_members: Vec<ExternMember>,
    /// Top-level items in source order.
    top_level: Vec<ItemId>,
}

impl Ast {
    #[must_use]
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            span: Span::default(),
            // Index 0 of every arena is a sentinel.
            items: vec![Item {
                kind: ItemKind::Binding(BindingItem {
                    is_const: false,
                    name: surge_common::StringId::NONE,
                    name_span: Span::default(),
                    mutable: false,
                    public: false,
                    ty: TypeId::NONE,
                    init: ExprId::NONE,
                    attrs: Vec::new(),
                }),
                span: Span::default(),
            }],
            stmts: vec![Stmt {
                kind: StmtKind::Block(Vec::new()),
                span: Span::default(),
            }],
            exprs: vec![Expr {
                kind: ExprKind::Tuple(Vec::new()),
                span: Span::default(),
            }],
            types: vec![TypeNode {
                kind: TypeKind::Unit,
                span: Span::default(),
            }],
            extern_members: Vec::new(),
            top_level: Vec::new(),
        }
    }

    #[must_use]
    pub const fn file(&self) -> FileId {
        self.file
    }

    /// Span of the whole file contents.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Top-level items in source order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.top_level
    }

    // =========================================================================
    // Constructors (parser/test surface)
    // =========================================================================

    /// Append a top-level item.
    pub fn add_item(&mut self, kind: ItemKind, span: Span) -> ItemId {
        let id = self.push_item(kind, span);
        self.top_level.push(id);
        id
    }

    /// Allocate an item without adding it to the top level.
    pub fn push_item(&mut self, kind: ItemKind, span: Span) -> ItemId {
        let id = ItemId(arena_next(self.items.len()));
        self.items.push(Item { kind, span });
        id
    }

    pub fn push_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(arena_next(self.stmts.len()));
        self.stmts.push(Stmt { kind, span });
        id
    }

    pub fn push_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(arena_next(self.exprs.len()));
        self.exprs.push(Expr { kind, span });
        id
    }

    pub fn push_type(&mut self, kind: TypeKind, span: Span) -> TypeId {
        let id = TypeId(arena_next(self.types.len()));
        self.types.push(TypeNode { kind, span });
        id
    }

    /// Allocate an extern member. The first member gets id 1; id 0 stays
    /// "none" like every other node id.
    pub fn push_extern_member(&mut self, member: ExternMember) -> ExternMemberId {
        let id = ExternMemberId(arena_next(self.extern_members.len()) + 1);
        self.extern_members.push(member);
        id
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        if id.is_none() {
            return None;
        }
        self.items.get(id.0 as usize)
    }

    #[must_use]
    pub fn stmt(&self, id: StmtId) -> Option<&Stmt> {
        if id.is_none() {
            return None;
        }
        self.stmts.get(id.0 as usize)
    }

    #[must_use]
    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        if id.is_none() {
            return None;
        }
        self.exprs.get(id.0 as usize)
    }

    #[must_use]
    pub fn ty(&self, id: TypeId) -> Option<&TypeNode> {
        if id.is_none() {
            return None;
        }
        self.types.get(id.0 as usize)
    }

    #[must_use]
    pub fn extern_member(&self, id: ExternMemberId) -> Option<&ExternMember> {
        if id.is_none() {
            return None;
        }
        self.extern_members.get(id.0 as usize - 1)
    }

    #[must_use]
    pub fn get_binding(&self, id: ItemId) -> Option<&BindingItem> {
        match &self.item(id)?.kind {
            ItemKind::Binding(binding) => Some(binding),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_fn(&self, id: ItemId) -> Option<&FnItem> {
        match &self.item(id)?.kind {
            ItemKind::Fn(func) => Some(func),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_type_item(&self, id: ItemId) -> Option<&TypeItem> {
        match &self.item(id)?.kind {
            ItemKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_contract(&self, id: ItemId) -> Option<&ContractItem> {
        match &self.item(id)?.kind {
            ItemKind::Contract(contract) => Some(contract),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_tag(&self, id: ItemId) -> Option<&TagItem> {
        match &self.item(id)?.kind {
            ItemKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_import(&self, id: ItemId) -> Option<&ImportItem> {
        match &self.item(id)?.kind {
            ItemKind::Import(import) => Some(import),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_extern(&self, id: ItemId) -> Option<&ExternItem> {
        match &self.item(id)?.kind {
            ItemKind::Extern(ext) => Some(ext),
            _ => None,
        }
    }
}

fn arena_next(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("AST arena exhausted the u32 id space"))
}
