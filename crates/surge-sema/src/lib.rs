//! Name binder for the surge compiler.
//!
//! This crate provides:
//! - `SymbolTable` - scope/symbol arenas, root-scope bookkeeping, validation
//! - `Resolver` - scope-stack declaration and lookup with duplicate/shadow rules
//! - `resolve_file` - the per-file resolution pass over an `Ast`
//! - `ModuleExports` - the flattened publication of one module's public symbols
//!
//! The pass materialises every declaration as a symbol in a lexical scope
//! tree, binds every identifier use to the symbol it refers to, and enforces
//! declaration-time rules (duplicates, overload/override compatibility,
//! visibility, intrinsic legality, naming style, wildcard legality, import
//! legality) with structured diagnostics. Type checking and later passes
//! consume the table this crate builds.

pub mod arena;
pub use arena::{Arena, ScopeId, SymbolId};

pub mod scope;
pub use scope::{Scope, ScopeKind, ScopeOwner};

pub mod symbol;
pub use symbol::{
    ContractInfo, ContractMember, DeclOrigin, EntrypointMode, Signature, Symbol, SymbolFlags,
    SymbolKind, SymbolMask, TypeKey,
};

pub mod table;
pub use table::{SymbolTable, ValidationError, ValidationErrors};

pub mod resolver;
pub use resolver::Resolver;

pub mod type_key;
pub use type_key::{receiver_key_of, signature_of, type_key_of};

pub mod prelude;
pub use prelude::{PreludeEntry, builtin_prelude, intrinsic_allowed, is_protected_module};

pub mod exports;
pub use exports::{ExportedSymbol, ModuleExports, ModuleExportsMap, collect_module_exports};

pub mod paths;
pub use paths::{ImportPathResolver, ProjectPathResolver};

mod state;
mod state_functions;
mod state_import_export;
mod state_items;
mod state_node_walking;
mod state_resolution;

pub use state::{ArenaHints, ResolutionStats, ResolveOptions, ResolveResult, resolve_file};
