//! The implicit environment: built-in prelude types, the intrinsic
//! allow-list, and the protected-module predicate.

use crate::symbol::SymbolKind;

/// One prelude entry installed into a file's root scope before traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreludeEntry {
    pub name: String,
    pub kind: SymbolKind,
}

impl PreludeEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Built-in type names, always installed.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "int", "uint", "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64",
    "bool", "float", "float16", "float32", "float64", "string", "nothing",
    // Generic type constructors
    "Array", "ArrayFixed", "Map",
];

/// The default prelude: every built-in type name as a `type` symbol.
#[must_use]
pub fn builtin_prelude() -> Vec<PreludeEntry> {
    BUILTIN_TYPE_NAMES
        .iter()
        .map(|&name| PreludeEntry::new(name, SymbolKind::Type))
        .collect()
}

/// Names that `@intrinsic` functions may use. Sorted and deduplicated;
/// membership is a binary search.
pub const INTRINSIC_NAMES: &[&str] = &[
    "__abs",
    "__add",
    "__bit_and",
    "__bit_or",
    "__bit_xor",
    "__div",
    "__eq",
    "__ge",
    "__gt",
    "__heir",
    "__index",
    "__index_set",
    "__is",
    "__le",
    "__len",
    "__lt",
    "__max_value",
    "__min_value",
    "__mod",
    "__mul",
    "__ne",
    "__neg",
    "__not",
    "__pos",
    "__range",
    "__shl",
    "__shr",
    "__sub",
    "__to",
    "acquire",
    "align_of",
    "await",
    "checkpoint",
    "close",
    "default",
    "exit",
    "lock",
    "new",
    "next",
    "notify_all",
    "notify_one",
    "read_lock",
    "read_unlock",
    "readline",
    "recv",
    "release",
    "rt_alloc",
    "rt_free",
    "rt_memcpy",
    "rt_memmove",
    "rt_read_stdin",
    "rt_realloc",
    "rt_string_from_bytes",
    "rt_string_len",
    "rt_string_ptr",
    "rt_write_stdout",
    "send",
    "size_of",
    "try_acquire",
    "try_lock",
    "try_read_lock",
    "try_recv",
    "try_send",
    "try_write_lock",
    "unlock",
    "wait",
    "write_lock",
    "write_unlock",
];

/// Whether `name` is a legal `@intrinsic` function name.
#[must_use]
pub fn intrinsic_allowed(name: &str) -> bool {
    INTRINSIC_NAMES.binary_search(&name).is_ok()
}

/// Modules whose functions may be declared `@intrinsic`.
#[must_use]
pub fn intrinsic_fn_module(path: &str) -> bool {
    path == "core/intrinsics" || path == "core/task"
}

/// Modules whose types may be declared `@intrinsic`.
#[must_use]
pub fn intrinsic_type_module(path: &str) -> bool {
    in_module_tree(path, "core") || in_module_tree(path, "stdlib")
}

/// Whether `path` is `core`, `stdlib`, or a descendant of either. Symbols
/// from protected modules cannot be overridden.
#[must_use]
pub fn is_protected_module(path: &str) -> bool {
    in_module_tree(path, "core") || in_module_tree(path, "stdlib")
}

/// Whether `path` sits under the `core` tree; such modules' exports are
/// injected into every file's prelude unless `no_std` is set.
#[must_use]
pub fn is_core_module(path: &str) -> bool {
    in_module_tree(path, "core")
}

fn in_module_tree(path: &str, root: &str) -> bool {
    path == root || (path.starts_with(root) && path.as_bytes().get(root.len()) == Some(&b'/'))
}
