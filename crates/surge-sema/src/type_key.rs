//! Deterministic type renderings.
//!
//! A `TypeKey` is a whitespace-free string form of a type AST, stable across
//! runs: `int`, `Array<string>`, `*byte`, `[int; 4]`, `(int,bool)`,
//! `fn(int)->string`. Overload distinctness and extern-receiver matching
//! compare these strings, so the grammar must stay injective over the type
//! AST shapes; it is not a type representation.

use surge_ast::{Ast, FnDecl, TypeId, TypeKind};
use surge_common::{Interner, StringId};

use crate::symbol::{Signature, TypeKey};

/// Rendering of a missing or malformed type.
pub const UNKNOWN_KEY: &str = "_";

/// Render one type node.
#[must_use]
pub fn type_key_of(ast: &Ast, interner: &Interner, ty: TypeId) -> TypeKey {
    let mut out = String::new();
    render(ast, interner, ty, &mut out);
    out
}

/// Render an extern block's target type for method-overload scoping.
#[must_use]
pub fn receiver_key_of(ast: &Ast, interner: &Interner, ty: TypeId) -> TypeKey {
    type_key_of(ast, interner, ty)
}

/// Build a function's signature from its declaration.
///
/// A missing result type renders as `nothing`.
#[must_use]
pub fn signature_of(ast: &Ast, interner: &Interner, decl: &FnDecl) -> Signature {
    let params = decl
        .params
        .iter()
        .map(|p| type_key_of(ast, interner, p.ty))
        .collect();
    let variadic = decl.params.iter().map(|p| p.variadic).collect();
    let result = if decl.ret.is_none() {
        "nothing".to_string()
    } else {
        type_key_of(ast, interner, decl.ret)
    };
    Signature {
        params,
        variadic,
        result,
    }
}

fn render(ast: &Ast, interner: &Interner, ty: TypeId, out: &mut String) {
    let Some(node) = ast.ty(ty) else {
        out.push_str(UNKNOWN_KEY);
        return;
    };
    match &node.kind {
        TypeKind::Named { name, args, .. } => {
            render_name(interner, *name, out);
            if !args.is_empty() {
                out.push('<');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    render(ast, interner, arg, out);
                }
                out.push('>');
            }
        }
        TypeKind::Ptr(inner) => {
            out.push('*');
            render(ast, interner, *inner, out);
        }
        TypeKind::Ref(inner) => {
            out.push('&');
            render(ast, interner, *inner, out);
        }
        TypeKind::Array(elem) => {
            out.push('[');
            render(ast, interner, *elem, out);
            out.push(']');
        }
        TypeKind::ArrayFixed(elem, len) => {
            out.push('[');
            render(ast, interner, *elem, out);
            out.push_str("; ");
            out.push_str(&len.to_string());
            out.push(']');
        }
        TypeKind::Tuple(elems) => {
            out.push('(');
            for (i, &elem) in elems.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render(ast, interner, elem, out);
            }
            out.push(')');
        }
        TypeKind::Fn { params, ret } => {
            out.push_str("fn(");
            for (i, &param) in params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render(ast, interner, param, out);
            }
            out.push(')');
            out.push_str("->");
            if ret.is_none() {
                out.push_str("nothing");
            } else {
                render(ast, interner, *ret, out);
            }
        }
        TypeKind::Unit => out.push_str("nothing"),
    }
}

fn render_name(interner: &Interner, name: StringId, out: &mut String) {
    if name.is_none() {
        out.push_str(UNKNOWN_KEY);
        return;
    }
    match interner.lookup(name) {
        Some(text) => out.push_str(&text),
        None => out.push_str(UNKNOWN_KEY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surge_common::{FileId, Span};

    #[test]
    fn keys_are_deterministic_and_distinct() {
        let interner = Interner::new();
        let mut ast = Ast::new(FileId(1));
        let int = ast.push_type(
            TypeKind::Named {
                name: interner.intern("int"),
                name_span: Span::default(),
                args: Vec::new(),
            },
            Span::default(),
        );
        let arr = ast.push_type(
            TypeKind::Named {
                name: interner.intern("Array"),
                name_span: Span::default(),
                args: vec![int],
            },
            Span::default(),
        );
        let ptr = ast.push_type(TypeKind::Ptr(int), Span::default());
        let fixed = ast.push_type(TypeKind::ArrayFixed(int, 4), Span::default());
        let tuple = ast.push_type(TypeKind::Tuple(vec![int, ptr]), Span::default());
        let func = ast.push_type(
            TypeKind::Fn {
                params: vec![int],
                ret: TypeId::NONE,
            },
            Span::default(),
        );

        assert_eq!(type_key_of(&ast, &interner, int), "int");
        assert_eq!(type_key_of(&ast, &interner, arr), "Array<int>");
        assert_eq!(type_key_of(&ast, &interner, ptr), "*int");
        assert_eq!(type_key_of(&ast, &interner, fixed), "[int; 4]");
        assert_eq!(type_key_of(&ast, &interner, tuple), "(int,*int)");
        assert_eq!(type_key_of(&ast, &interner, func), "fn(int)->nothing");
        assert_eq!(type_key_of(&ast, &interner, TypeId::NONE), "_");
    }
}
