//! Match-arm patterns: literals, identifier bindings (including `_`, an
//! ordinary identifier lexically), and a leading `-` for negative literals.
//! Patterns reuse the same node kinds as expressions - a literal pattern and
//! a literal expression are represented identically.

use crate::ast::{Index, NodeData, NodeKind};
use crate::Parser;
use wavec_lex::TokenKind;

pub(crate) fn parse_pattern(p: &mut Parser) -> Index {
    match p.cur() {
        TokenKind::Int => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Int, t, NodeData::Leaf)
        }
        TokenKind::Float => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Float, t, NodeData::Leaf)
        }
        TokenKind::Char => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Char, t, NodeData::Leaf)
        }
        TokenKind::Str => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Str, t, NodeData::Leaf)
        }
        TokenKind::Minus => {
            let t = p.advance();
            let operand = parse_pattern(p);
            p.ast.add_node(NodeKind::Unary, t, NodeData::Child(operand))
        }
        TokenKind::Ident => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Ident, t, NodeData::Leaf)
        }
        _ => {
            let found = p.cur().describe();
            p.error_here(
                format!("expected a match pattern, found {found}"),
                Some("patterns are a literal or an identifier binding".to_string()),
            );
            Index::INVALID
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_parser;

    #[test]
    fn literal_pattern() {
        let mut p = test_parser("42");
        let pat = parse_pattern(&mut p);
        assert_eq!(p.ast.kind(pat), NodeKind::Int);
    }

    #[test]
    fn identifier_binding_pattern() {
        let mut p = test_parser("x");
        let pat = parse_pattern(&mut p);
        assert_eq!(p.ast.kind(pat), NodeKind::Ident);
    }

    #[test]
    fn negative_literal_pattern() {
        let mut p = test_parser("-1");
        let pat = parse_pattern(&mut p);
        assert_eq!(p.ast.kind(pat), NodeKind::Unary);
        let NodeData::Child(inner) = p.ast.data(pat) else {
            panic!("expected a unary payload");
        };
        assert_eq!(p.ast.kind(inner), NodeKind::Int);
    }

    #[test]
    fn invalid_pattern_starter_reports_diagnostic() {
        let mut p = test_parser("{");
        let pat = parse_pattern(&mut p);
        assert!(pat.is_invalid());
    }
}
