//! Interned AST for the surge compiler.
//!
//! This crate provides:
//! - Opaque node ids (`ItemId`, `StmtId`, `ExprId`, `TypeId`, `ExternMemberId`)
//! - Typed node payloads (`ItemKind`, `StmtKind`, `ExprKind`, `TypeKind`)
//! - `Ast` - per-file node arenas with explicit `get_*` accessors
//!
//! Nodes are addressed by small integer ids with 0 reserved as "none";
//! consumers dispatch on the kind discriminant and fetch per-kind payloads
//! through the accessors, never through dynamic dispatch. The parser fills
//! an `Ast` through the `push_*`/`add_*` constructors; tests construct
//! fixtures through the same API.

pub mod ids;
pub mod node;

mod ast;
pub use ast::Ast;

pub use ids::{ExprId, ExternMemberId, ItemId, StmtId, TypeId};
pub use node::*;
