//! Common types and utilities for the surge compiler.
//!
//! This crate provides foundational types used across all surge crates:
//! - String interning (`StringId`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Position/LineMap types for line/column source locations
//! - Source file registry (`SourceFile`, `SourceSet`)
//! - Diagnostics (`Diagnostic`, `Reporter`, fix suggestions)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Interner, StringId};

// Span - Source location tracking (file id + byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, SourceLocation};

// Source file registry
pub mod source;
pub use source::{FileId, SourceFile, SourceSet};

// Diagnostics: codes, severities, notes, fix suggestions, reporting
pub mod diagnostics;
pub use diagnostics::{
    Applicability, CollectedDiagnostics, Diagnostic, DiagnosticBuilder, DiagnosticCode,
    DiagnosticSink, FixSuggestion, Note, Reporter, Severity,
};
