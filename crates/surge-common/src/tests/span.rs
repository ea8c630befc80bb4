use super::*;
use crate::source::FileId;

#[test]
fn default_span_is_absent() {
    let span = Span::default();
    assert!(span.is_none());
    assert_eq!(span, Span::none());
    assert_eq!(span.len(), 0);
}

#[test]
fn cover_produces_smallest_enclosing() {
    let file = FileId(1);
    let a = Span::new(file, 4, 10);
    let b = Span::new(file, 7, 20);
    assert_eq!(a.cover(b), Span::new(file, 4, 20));
    assert_eq!(b.cover(a), Span::new(file, 4, 20));
}

#[test]
fn cover_ignores_absent_and_foreign_spans() {
    let a = Span::new(FileId(1), 4, 10);
    assert_eq!(a.cover(Span::none()), a);
    assert_eq!(Span::none().cover(a), a);
    assert_eq!(a.cover(Span::new(FileId(2), 0, 100)), a);
}

#[test]
fn insertion_points_are_zero_length() {
    let span = Span::new(FileId(1), 4, 10);
    assert_eq!(span.zero_at_start(), Span::new(FileId(1), 4, 4));
    assert_eq!(span.zero_at_end(), Span::new(FileId(1), 10, 10));
    assert!(span.zero_at_start().is_empty());
}

#[test]
fn slice_clamps_out_of_range() {
    let span = Span::new(FileId(1), 4, 100);
    assert_eq!(span.slice("let x = 1;"), "x = 1;");
    assert_eq!(Span::new(FileId(1), 50, 60).slice("short"), "");
}

#[test]
fn contains_is_half_open() {
    let span = Span::new(FileId(1), 4, 10);
    assert!(span.contains(4));
    assert!(span.contains(9));
    assert!(!span.contains(10));
    assert!(!span.contains(3));
}
