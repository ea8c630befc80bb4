//! Statement and expression walking.
//!
//! The walker never mutates the AST: it recurses into every child that may
//! contain references or declarations, opening block scopes for control-flow
//! bodies and binding loop/compare patterns along the way.

use surge_ast::{ExprKind, Pattern, PatternKind, StmtId, StmtKind, TypeId, TypeKind};
use surge_common::DiagnosticCode;

use crate::scope::{ScopeKind, ScopeOwner};
use crate::state::FileResolver;
use crate::symbol::{DeclOrigin, SymbolFlags, SymbolKind};

impl FileResolver<'_, '_> {
    pub(crate) fn walk_stmt(&mut self, stmt_id: StmtId) {
        let ast = self.ast;
        let Some(stmt) = ast.stmt(stmt_id) else {
            return;
        };
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Let(let_stmt) => {
                if let_stmt.ty.is_some() {
                    self.walk_type(let_stmt.ty);
                }
                if let_stmt.init.is_some() {
                    self.walk_expr(let_stmt.init);
                }
                if let_stmt.name == self.names.wildcard {
                    if let_stmt.mutable {
                        self.reporter
                            .error(
                                DiagnosticCode::WildcardMut,
                                let_stmt.name_span,
                                "wildcard `_` cannot be a mutable binding",
                            )
                            .emit();
                    }
                    return;
                }
                let mut flags = SymbolFlags::empty();
                if let_stmt.mutable {
                    flags |= SymbolFlags::MUTABLE;
                }
                let origin = DeclOrigin::stmt(ast.file(), self.current_item, stmt_id);
                let (_, ok) = self.resolver.declare(
                    let_stmt.name,
                    let_stmt.name_span,
                    SymbolKind::Let,
                    flags,
                    origin,
                );
                if ok {
                    self.stats.symbols_declared += 1;
                }
            }
            StmtKind::Expr(expr) => self.walk_expr(*expr),
            StmtKind::Return(expr) | StmtKind::Drop(expr) | StmtKind::Signal(expr) => {
                if expr.is_some() {
                    self.walk_expr(*expr);
                }
            }
            StmtKind::Break | StmtKind::Continue => {}
            StmtKind::If(if_stmt) => {
                self.walk_expr(if_stmt.cond);
                self.walk_stmt(if_stmt.then_body);
                if if_stmt.else_body.is_some() {
                    self.walk_stmt(if_stmt.else_body);
                }
            }
            StmtKind::While(while_stmt) => {
                self.walk_expr(while_stmt.cond);
                self.walk_stmt(while_stmt.body);
            }
            StmtKind::For(for_stmt) => {
                // The init clause declares into the loop's own scope.
                let scope = self.enter_scope(ScopeKind::Block, ScopeOwner::Stmt(stmt_id), span);
                if for_stmt.init.is_some() {
                    self.walk_stmt(for_stmt.init);
                }
                if for_stmt.cond.is_some() {
                    self.walk_expr(for_stmt.cond);
                }
                if for_stmt.step.is_some() {
                    self.walk_expr(for_stmt.step);
                }
                self.walk_stmt(for_stmt.body);
                self.leave_scope(scope);
            }
            StmtKind::ForIn(for_in) => {
                self.walk_expr(for_in.iterable);
                let scope = self.enter_scope(ScopeKind::Block, ScopeOwner::Stmt(stmt_id), span);
                if for_in.pattern != self.names.wildcard && !for_in.pattern.is_none() {
                    let origin = DeclOrigin::stmt(ast.file(), self.current_item, stmt_id);
                    let (_, ok) = self.resolver.declare(
                        for_in.pattern,
                        for_in.pattern_span,
                        SymbolKind::Let,
                        SymbolFlags::empty(),
                        origin,
                    );
                    if ok {
                        self.stats.symbols_declared += 1;
                    }
                }
                self.walk_stmt(for_in.body);
                self.leave_scope(scope);
            }
            StmtKind::Compare(compare) => {
                self.walk_expr(compare.scrutinee);
                for arm in &compare.arms {
                    let scope =
                        self.enter_scope(ScopeKind::Block, ScopeOwner::Stmt(stmt_id), arm.span);
                    self.bind_compare_pattern(stmt_id, &arm.pattern);
                    self.walk_stmt(arm.body);
                    self.leave_scope(scope);
                }
            }
            StmtKind::Block(stmts) => {
                let scope = self.enter_scope(ScopeKind::Block, ScopeOwner::Stmt(stmt_id), span);
                for &inner in stmts {
                    self.walk_stmt(inner);
                }
                self.leave_scope(scope);
            }
        }
    }

    /// Bind the identifiers of a compare-arm pattern as `let` symbols in the
    /// arm's scope.
    pub(crate) fn bind_compare_pattern(&mut self, stmt_id: StmtId, pattern: &Pattern) {
        match &pattern.kind {
            PatternKind::Wildcard => {}
            PatternKind::Ident(name) => {
                if *name == self.names.wildcard || name.is_none() {
                    return;
                }
                let origin = DeclOrigin::stmt(self.ast.file(), self.current_item, stmt_id);
                let (_, ok) = self.resolver.declare(
                    *name,
                    pattern.span,
                    SymbolKind::Let,
                    SymbolFlags::empty(),
                    origin,
                );
                if ok {
                    self.stats.symbols_declared += 1;
                }
            }
            PatternKind::Literal(expr) => {
                if expr.is_some() {
                    self.walk_expr(*expr);
                }
            }
            PatternKind::Call { args, .. } => {
                for sub in args {
                    self.bind_compare_pattern(stmt_id, sub);
                }
            }
            PatternKind::Tuple(elems) => {
                for sub in elems {
                    self.bind_compare_pattern(stmt_id, sub);
                }
            }
        }
    }

    pub(crate) fn walk_expr(&mut self, expr_id: surge_ast::ExprId) {
        let ast = self.ast;
        let Some(expr) = ast.expr(expr_id) else {
            return;
        };
        let span = expr.span;
        match &expr.kind {
            ExprKind::Ident(name) => self.resolve_ident(expr_id, span, *name),
            ExprKind::Literal(_) => {}
            ExprKind::Call { callee, args } => {
                self.walk_expr(*callee);
                if let Some(callee_expr) = ast.expr(*callee) {
                    if let ExprKind::Ident(name) = callee_expr.kind {
                        self.check_call_ambiguity(span, name);
                    }
                }
                for &arg in args {
                    self.walk_expr(arg);
                }
            }
            ExprKind::Member {
                target,
                field,
                field_span,
            } => self.resolve_member(expr_id, *target, *field, *field_span),
            ExprKind::Index { target, index } => {
                self.walk_expr(*target);
                self.walk_expr(*index);
            }
            ExprKind::Unary { operand, .. } => self.walk_expr(*operand),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.walk_expr(*lhs);
                self.walk_expr(*rhs);
            }
            ExprKind::Tuple(elems) | ExprKind::Array(elems) => {
                for &elem in elems {
                    self.walk_expr(elem);
                }
            }
            ExprKind::Range { start, end } => {
                if start.is_some() {
                    self.walk_expr(*start);
                }
                if end.is_some() {
                    self.walk_expr(*end);
                }
            }
        }
    }

    /// Recurse a type annotation. Named types are left for the type pass;
    /// the walk exists so generic-argument subtrees are visited uniformly.
    pub(crate) fn walk_type(&mut self, ty: TypeId) {
        let ast = self.ast;
        let Some(node) = ast.ty(ty) else {
            return;
        };
        match &node.kind {
            TypeKind::Named { args, .. } => {
                for &arg in args {
                    self.walk_type(arg);
                }
            }
            TypeKind::Ptr(inner)
            | TypeKind::Ref(inner)
            | TypeKind::Array(inner)
            | TypeKind::ArrayFixed(inner, _) => self.walk_type(*inner),
            TypeKind::Tuple(elems) => {
                for &elem in elems {
                    self.walk_type(elem);
                }
            }
            TypeKind::Fn { params, ret } => {
                for &param in params {
                    self.walk_type(param);
                }
                if ret.is_some() {
                    self.walk_type(*ret);
                }
            }
            TypeKind::Unit => {}
        }
    }
}
