//! wavec-print - S-expression pretty printer
//!
//! A read-only traversal of a [`wavec_par::Ast`] that renders each
//! top-level declaration as a canonical `(def name value)` form, one
//! declaration per line. Only `Const` declarations and the binary/
//! identifier/int expression shapes are required to round-trip; anything
//! else renders as an empty string rather than guessing at a shape the
//! rest of the pipeline doesn't define yet.

use wavec_par::{Ast, Index, NodeData, NodeKind};

/// Render every top-level declaration in `ast`, one `(def ...)` form per
/// line, in declaration order.
pub fn print_ast(ast: &Ast) -> String {
    ast.decls
        .iter()
        .map(|&decl| print_decl(ast, decl))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_decl(ast: &Ast, decl: Index) -> String {
    match ast.kind(decl) {
        NodeKind::Const => {
            let NodeData::TwoChildren(_ty, value) = ast.data(decl) else {
                return String::new();
            };
            let name = ast.token_text(ast.token(decl));
            let rendered = print_expr(ast, value);
            if rendered.is_empty() {
                String::new()
            } else {
                format!("(def {name} {rendered})")
            }
        }
        _ => String::new(),
    }
}

/// Render an expression node. Only `Binary`, `Ident`, and `Int` are
/// required to round-trip; every other expression kind renders as an
/// empty string.
fn print_expr(ast: &Ast, node: Index) -> String {
    if node.is_invalid() {
        return String::new();
    }
    match ast.kind(node) {
        NodeKind::Ident | NodeKind::Int => ast.token_text(ast.token(node)).to_string(),
        NodeKind::Binary => {
            let NodeData::TwoChildren(lhs, rhs) = ast.data(node) else {
                return String::new();
            };
            let op = ast.token_text(ast.token(node));
            let lhs = print_expr(ast, lhs);
            let rhs = print_expr(ast, rhs);
            if lhs.is_empty() || rhs.is_empty() {
                String::new()
            } else {
                format!("({op} {lhs} {rhs})")
            }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavec_util::FileId;

    fn print(source: &str) -> String {
        let ast = wavec_par::parse(FileId::new(0), source);
        print_ast(&ast)
    }

    #[test]
    fn empty_source_prints_nothing() {
        assert_eq!(print(""), "");
    }

    #[test]
    fn operator_precedence_round_trips() {
        assert_eq!(print("hello :: 2 * 1 - 2 * 3\n"), "(def hello (- (* 2 1) (* 2 3)))");
    }

    #[test]
    fn single_identifier_value() {
        assert_eq!(print("x :: y\n"), "(def x y)");
    }

    #[test]
    fn non_round_tripping_decl_prints_empty() {
        assert_eq!(print("foo :: struct { bar: int }\n"), "");
    }

    #[test]
    fn multiple_decls_one_line_each() {
        assert_eq!(print("a :: 1\nb :: 2\n"), "(def a 1)\n(def b 2)");
    }
}
