//! Diagnostics: codes, severities, notes, fix suggestions, reporting.
//!
//! User-visible problems in the front end are values routed through a
//! [`Reporter`], never panics or `Err` returns. A diagnostic carries a
//! primary span, optional notes pointing at related locations, and optional
//! quick-fix suggestions an editor can apply.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Stable diagnostic codes emitted by semantic analysis.
///
/// `Fut*` codes mark syntax that is reserved for a future release.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    DuplicateSymbol,
    ShadowSymbol,
    ScopeMismatch,
    UnresolvedSymbol,
    AmbiguousCtorOrFn,
    FnOverride,
    FnNameStyle,
    TagNameStyle,
    IntrinsicBadContext,
    IntrinsicHasBody,
    IntrinsicBadName,
    ModuleMemberNotFound,
    ModuleMemberNotPublic,
    WildcardValue,
    WildcardMut,
    HiddenPublic,
    NoStdlib,
    EntrypointNoBody,
    EntrypointModeInvalid,
    EntrypointInvalidAttr,
    FutEntrypointModeEnv,
    FutEntrypointModeConfig,
    SemaError,
}

impl DiagnosticCode {
    /// Stable string form, used in rendered output and test assertions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateSymbol => "sema_duplicate_symbol",
            Self::ShadowSymbol => "sema_shadow_symbol",
            Self::ScopeMismatch => "sema_scope_mismatch",
            Self::UnresolvedSymbol => "sema_unresolved_symbol",
            Self::AmbiguousCtorOrFn => "sema_ambiguous_ctor_or_fn",
            Self::FnOverride => "sema_fn_override",
            Self::FnNameStyle => "sema_fn_name_style",
            Self::TagNameStyle => "sema_tag_name_style",
            Self::IntrinsicBadContext => "sema_intrinsic_bad_context",
            Self::IntrinsicHasBody => "sema_intrinsic_has_body",
            Self::IntrinsicBadName => "sema_intrinsic_bad_name",
            Self::ModuleMemberNotFound => "sema_module_member_not_found",
            Self::ModuleMemberNotPublic => "sema_module_member_not_public",
            Self::WildcardValue => "sema_wildcard_value",
            Self::WildcardMut => "sema_wildcard_mut",
            Self::HiddenPublic => "sema_hidden_public",
            Self::NoStdlib => "sema_no_stdlib",
            Self::EntrypointNoBody => "sema_entrypoint_no_body",
            Self::EntrypointModeInvalid => "sema_entrypoint_mode_invalid",
            Self::EntrypointInvalidAttr => "sema_entrypoint_invalid_attr",
            Self::FutEntrypointModeEnv => "fut_entrypoint_mode_env",
            Self::FutEntrypointModeConfig => "fut_entrypoint_mode_config",
            Self::SemaError => "sema_error",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub span: Span,
    pub message: String,
}

/// How mechanically a fix suggestion can be applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Applicability {
    /// Safe to apply without review.
    AlwaysSafe,
    /// Safe under the heuristics the rule used; review recommended.
    SafeWithHeuristics,
    /// Needs a human decision.
    #[default]
    Manual,
}

/// An actionable quick fix attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSuggestion {
    /// Insert `text` at the (zero-length) `span`. `replaced` preserves the
    /// text that followed the insertion point, for preview rendering.
    InsertText {
        title: String,
        span: Span,
        text: String,
        replaced: String,
        applicability: Applicability,
    },
    /// Replace the text at `span` with `new_text`.
    ReplaceSpan {
        title: String,
        span: Span,
        new_text: String,
        old_text: String,
        applicability: Applicability,
    },
}

impl FixSuggestion {
    pub fn insert(
        title: impl Into<String>,
        span: Span,
        text: impl Into<String>,
        replaced: impl Into<String>,
    ) -> Self {
        Self::InsertText {
            title: title.into(),
            span,
            text: text.into(),
            replaced: replaced.into(),
            applicability: Applicability::default(),
        }
    }

    pub fn replace(
        title: impl Into<String>,
        span: Span,
        new_text: impl Into<String>,
        old_text: impl Into<String>,
    ) -> Self {
        Self::ReplaceSpan {
            title: title.into(),
            span,
            new_text: new_text.into(),
            old_text: old_text.into(),
            applicability: Applicability::default(),
        }
    }

    #[must_use]
    pub fn with_applicability(mut self, applicability: Applicability) -> Self {
        match &mut self {
            Self::InsertText { applicability: a, .. }
            | Self::ReplaceSpan { applicability: a, .. } => *a = applicability,
        }
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::InsertText { title, .. } | Self::ReplaceSpan { title, .. } => title,
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub span: Span,
    pub message: String,
    pub notes: Vec<Note>,
    pub fixes: Vec<FixSuggestion>,
}

/// Destination for finished diagnostics.
///
/// Sinks take `&self` so one sink can serve a whole pass; implementations
/// use interior mutability where they accumulate.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Accumulating sink used by tests and batch drivers.
#[derive(Default)]
pub struct CollectedDiagnostics {
    diagnostics: RwLock<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all diagnostics collected so far.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.write().unwrap_or_else(|e| e.into_inner()))
    }

    /// Clone out the diagnostics without draining.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(diagnostic);
    }
}

/// Reporting facade handed to resolution passes.
///
/// A reporter without a sink drops everything, which lets callers disable
/// diagnostics without branching at every report site.
#[derive(Clone, Copy)]
pub struct Reporter<'a> {
    sink: Option<&'a dyn DiagnosticSink>,
}

impl<'a> Reporter<'a> {
    #[must_use]
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// A reporter that discards every diagnostic.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { sink: None }
    }

    #[must_use]
    pub fn error(
        &self,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<String>,
    ) -> DiagnosticBuilder<'a> {
        self.build(Severity::Error, code, span, message)
    }

    #[must_use]
    pub fn warning(
        &self,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<String>,
    ) -> DiagnosticBuilder<'a> {
        self.build(Severity::Warning, code, span, message)
    }

    fn build(
        &self,
        severity: Severity,
        code: DiagnosticCode,
        span: Span,
        message: impl Into<String>,
    ) -> DiagnosticBuilder<'a> {
        DiagnosticBuilder {
            sink: self.sink,
            diagnostic: Diagnostic {
                severity,
                code,
                span,
                message: message.into(),
                notes: Vec::new(),
                fixes: Vec::new(),
            },
        }
    }
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

/// In-flight diagnostic. Dropping a builder without calling [`emit`]
/// discards the diagnostic.
///
/// [`emit`]: DiagnosticBuilder::emit
#[must_use = "call .emit() to report the diagnostic"]
pub struct DiagnosticBuilder<'a> {
    sink: Option<&'a dyn DiagnosticSink>,
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder<'_> {
    #[must_use]
    pub fn with_note(mut self, span: Span, message: impl Into<String>) -> Self {
        self.diagnostic.notes.push(Note {
            span,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn with_fix_suggestion(mut self, fix: FixSuggestion) -> Self {
        self.diagnostic.fixes.push(fix);
        self
    }

    pub fn emit(self) {
        if let Some(sink) = self.sink {
            sink.report(self.diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_routes_to_sink() {
        let sink = CollectedDiagnostics::new();
        let reporter = Reporter::new(&sink);
        reporter
            .error(DiagnosticCode::DuplicateSymbol, Span::default(), "duplicate symbol `x`")
            .with_note(Span::default(), "previous declaration here")
            .emit();
        let diags = sink.take();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::DuplicateSymbol);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].notes.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn disabled_reporter_drops_everything() {
        let reporter = Reporter::disabled();
        reporter
            .warning(DiagnosticCode::ShadowSymbol, Span::default(), "shadowed")
            .emit();
    }

    #[test]
    fn fix_applicability_defaults_to_manual() {
        let fix = FixSuggestion::replace("rename", Span::default(), "foo", "Foo");
        match fix {
            FixSuggestion::ReplaceSpan { applicability, .. } => {
                assert_eq!(applicability, Applicability::Manual);
            }
            FixSuggestion::InsertText { .. } => panic!("expected ReplaceSpan"),
        }
    }
}
