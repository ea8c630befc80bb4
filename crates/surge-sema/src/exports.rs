//! Module exports: the flattened publication of one module's symbols.
//!
//! After a file resolves, the build driver collects its public surface into
//! plain value types and publishes them under the module path. Later files
//! consume them through the exports map handed to
//! [`resolve_file`](crate::resolve_file); the map is read-only during a
//! pass.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use surge_common::Span;

use crate::arena::ScopeId;
use crate::symbol::{Signature, SymbolFlags, SymbolKind, TypeKey};
use crate::table::SymbolTable;

/// A flattened, language-agnostic view of one exported symbol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    pub span: Span,
    pub signature: Option<Signature>,
    pub receiver_key: Option<TypeKey>,
    pub type_params: Vec<String>,
    pub type_param_span: Span,
    /// Opaque type-world id; 0 until the type pass runs.
    pub type_id: u32,
}

/// Everything one module publishes. Overload sets share a name and keep
/// declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleExports {
    pub path: String,
    pub symbols: FxHashMap<String, Vec<ExportedSymbol>>,
}

impl ModuleExports {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            symbols: FxHashMap::default(),
        }
    }

    /// Append an export, preserving declaration order within the name's
    /// overload set.
    pub fn add(&mut self, export: ExportedSymbol) {
        self.symbols.entry(export.name.clone()).or_default().push(export);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[ExportedSymbol]> {
        self.symbols.get(name).map(|list| list.as_slice())
    }
}

/// Exports of previously resolved modules, keyed by normalised module path.
pub type ModuleExportsMap = FxHashMap<String, ModuleExports>;

/// Flatten the public surface of a resolved scope into `ModuleExports`.
///
/// Public and built-in symbols are published; `@hidden` (file-private)
/// symbols, import aliases, and module aliases are not. Declaration order is
/// preserved within each overload set.
#[must_use]
pub fn collect_module_exports(table: &SymbolTable, scope: ScopeId, path: &str) -> ModuleExports {
    let mut exports = ModuleExports::new(path);
    let Some(scope_ref) = table.scopes.get(scope) else {
        return exports;
    };
    let interner = table.interner();
    for &sym_id in &scope_ref.symbols {
        let Some(sym) = table.symbols.get(sym_id) else {
            continue;
        };
        if matches!(sym.kind, SymbolKind::Import | SymbolKind::Module | SymbolKind::Invalid) {
            continue;
        }
        if sym.flags.contains(SymbolFlags::FILE_PRIVATE) {
            continue;
        }
        if !sym.is_public() && !sym.is_builtin() {
            continue;
        }
        // Symbols with no local AST behind them (prelude installs, import
        // synthetics) belong to another surface; only declarations of this
        // file are published.
        if sym.decl.is_synthetic() {
            continue;
        }
        exports.add(ExportedSymbol {
            name: interner.must_lookup(sym.name).to_string(),
            kind: sym.kind,
            flags: sym.flags,
            span: sym.span,
            signature: sym.signature.clone(),
            receiver_key: sym.receiver_key.clone(),
            type_params: sym
                .type_params
                .iter()
                .map(|&id| interner.must_lookup(id).to_string())
                .collect(),
            type_param_span: sym.type_param_span,
            type_id: sym.type_id,
        });
    }
    exports
}
