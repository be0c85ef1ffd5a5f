//! The restricted type sublanguage: `&T`/`&mut T`/`&own T` prefixes,
//! `[N]T` array types, `map[K]V` map types. Anything else is just an
//! expression used in type position (identifiers, paths, generic
//! instantiations), so this falls through to [`crate::expr::parse_expr`].

use crate::ast::{Index, NodeData, NodeKind};
use crate::{expr, Parser};
use wavec_lex::TokenKind;

pub(crate) fn parse_type(p: &mut Parser) -> Index {
    match p.cur() {
        TokenKind::Amp => {
            let amp_tok = p.advance();
            if p.eat(TokenKind::Own).is_some() {
                let inner = parse_type(p);
                p.ast.add_node(NodeKind::RefOwnType, amp_tok, NodeData::Child(inner))
            } else if p.eat(TokenKind::Mut).is_some() {
                let inner = parse_type(p);
                p.ast.add_node(NodeKind::RefMutType, amp_tok, NodeData::Child(inner))
            } else {
                let inner = parse_type(p);
                p.ast.add_node(NodeKind::RefType, amp_tok, NodeData::Child(inner))
            }
        }
        TokenKind::LBracket => {
            let bracket_tok = p.advance();
            p.skip_newlines();
            let size = expr::parse_expr(p);
            p.skip_newlines();
            p.expect(TokenKind::RBracket, "close the array type's size with `]`");
            let elem = parse_type(p);
            p.ast.add_node(NodeKind::ArrayType, bracket_tok, NodeData::TwoChildren(size, elem))
        }
        TokenKind::Map => {
            let map_tok = p.advance();
            p.expect(TokenKind::LBracket, "open a map type's key with `[`");
            let key = parse_type(p);
            p.expect(TokenKind::RBracket, "close the map type's key with `]`");
            let value = parse_type(p);
            p.ast.add_node(NodeKind::MapType, map_tok, NodeData::TwoChildren(key, value))
        }
        _ => expr::parse_expr(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_parser;

    #[test]
    fn plain_identifier_falls_through_to_expr() {
        let mut p = test_parser("int");
        let ty = parse_type(&mut p);
        assert_eq!(p.ast.kind(ty), NodeKind::Ident);
    }

    #[test]
    fn ref_mut_and_own_prefixes() {
        let mut p = test_parser("&mut int");
        let ty = parse_type(&mut p);
        assert_eq!(p.ast.kind(ty), NodeKind::RefMutType);

        let mut p = test_parser("&own int");
        let ty = parse_type(&mut p);
        assert_eq!(p.ast.kind(ty), NodeKind::RefOwnType);

        let mut p = test_parser("&int");
        let ty = parse_type(&mut p);
        assert_eq!(p.ast.kind(ty), NodeKind::RefType);
    }

    #[test]
    fn array_type_has_size_then_element() {
        let mut p = test_parser("[5]int");
        let ty = parse_type(&mut p);
        assert_eq!(p.ast.kind(ty), NodeKind::ArrayType);
        let NodeData::TwoChildren(size, elem) = p.ast.data(ty) else {
            panic!("expected an array type payload");
        };
        assert_eq!(p.ast.kind(size), NodeKind::Int);
        assert_eq!(p.ast.kind(elem), NodeKind::Ident);
    }

    #[test]
    fn map_type_has_key_then_value() {
        let mut p = test_parser("map[int]str");
        let ty = parse_type(&mut p);
        assert_eq!(p.ast.kind(ty), NodeKind::MapType);
        let NodeData::TwoChildren(key, value) = p.ast.data(ty) else {
            panic!("expected a map type payload");
        };
        assert_eq!(p.ast.kind(key), NodeKind::Ident);
        assert_eq!(p.ast.kind(value), NodeKind::Ident);
    }
}
