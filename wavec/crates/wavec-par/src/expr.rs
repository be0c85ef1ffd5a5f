//! Expression parsing: a precedence-climbing binary-operator chain over a
//! prefix/postfix core. The general entry point climbs from `OR`, not
//! `PIPE` - `|>` is one level looser than everything this parser reaches
//! from a statement or declaration context, so it is never accidentally
//! consumed there.
//!
//! Binary operators, compound assignment, and `as`-casts all build the same
//! `Binary` node kind; the operator token carries its own spelling, so the
//! printer can render any of them without a second enum to keep in sync.

use crate::ast::{Index, NodeData, NodeKind};
use crate::{items, stmt, Parser};
use wavec_lex::TokenKind;

/// `(this_level, next_min_level)` for a left-associative binary operator, or
/// `None` if the token isn't one. Climbing calls itself with `this_level + 1`
/// for the right-hand side, so equal-precedence operators chain leftward.
fn binop_level(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::PipeGt => Some(1),
        TokenKind::Or => Some(2),
        TokenKind::PipePipe => Some(3),
        TokenKind::AmpAmp => Some(4),
        TokenKind::EqEq
        | TokenKind::BangEq
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq => Some(5),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Caret | TokenKind::Pipe => Some(6),
        TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Amp
        | TokenKind::Shl
        | TokenKind::Shr => Some(7),
        _ => None,
    }
}

const MIN_PREC_OR: u8 = 2;

pub(crate) fn parse_expr(p: &mut Parser) -> Index {
    parse_prec(p, MIN_PREC_OR)
}

fn parse_prec(p: &mut Parser, min_level: u8) -> Index {
    let mut lhs = parse_as(p);
    loop {
        let Some(level) = binop_level(p.cur()) else { break };
        if level < min_level {
            break;
        }
        let op_tok = p.advance();
        p.skip_newlines();
        let rhs = parse_prec(p, level + 1);
        lhs = p.ast.add_node(NodeKind::Binary, op_tok, NodeData::TwoChildren(lhs, rhs));
    }
    lhs
}

/// `as`-casts sit between the binary chain and unary: `a as T as U` chains
/// left, and `-x as T` casts the negation, not the other way around.
fn parse_as(p: &mut Parser) -> Index {
    let mut lhs = parse_unary(p);
    while p.check(TokenKind::As) {
        let op_tok = p.advance();
        let ty = crate::types::parse_type(p);
        lhs = p.ast.add_node(NodeKind::Binary, op_tok, NodeData::TwoChildren(lhs, ty));
    }
    lhs
}

fn parse_unary(p: &mut Parser) -> Index {
    match p.cur() {
        TokenKind::Plus | TokenKind::Minus | TokenKind::Bang | TokenKind::Tilde | TokenKind::Star => {
            let op_tok = p.advance();
            let operand = parse_unary(p);
            p.ast.add_node(NodeKind::Unary, op_tok, NodeData::Child(operand))
        }
        TokenKind::Amp => {
            let amp_tok = p.advance();
            if p.eat(TokenKind::Mut).is_some() {
                let operand = parse_unary(p);
                p.ast.add_node(NodeKind::RefMut, amp_tok, NodeData::Child(operand))
            } else {
                let operand = parse_unary(p);
                p.ast.add_node(NodeKind::Ref, amp_tok, NodeData::Child(operand))
            }
        }
        TokenKind::New => parse_new(p),
        _ => parse_postfix(p),
    }
}

fn parse_new(p: &mut Parser) -> Index {
    let new_tok = p.expect(TokenKind::New, "start an allocation with `new`");
    let ty = crate::types::parse_type(p);
    let target = if p.check(TokenKind::LParen) {
        let paren_tok = p.advance();
        p.skip_newlines();
        let mark = p.scratch.mark();
        while !p.check(TokenKind::RParen) && !p.at_eof() {
            let arg = parse_expr(p);
            p.scratch.push(arg);
            p.skip_newlines();
            if p.eat(TokenKind::Comma).is_some() {
                p.skip_newlines();
            } else {
                break;
            }
        }
        p.skip_newlines();
        p.expect(TokenKind::RParen, "close the `new` argument list with `)`");
        p.finish_call(ty, mark, paren_tok, false)
    } else {
        ty
    };
    p.ast.add_node(NodeKind::New, new_tok, NodeData::Child(target))
}

fn parse_postfix(p: &mut Parser) -> Index {
    let mut lhs = parse_primary(p);
    loop {
        match p.cur() {
            TokenKind::Dot => {
                p.advance();
                let field_tok = p.expect(TokenKind::Ident, "expected a field name after `.`");
                lhs = p.ast.add_node(NodeKind::FieldAccess, field_tok, NodeData::Child(lhs));
            }
            TokenKind::LParen => {
                let paren_tok = p.advance();
                p.skip_newlines();
                let mark = p.scratch.mark();
                while !p.check(TokenKind::RParen) && !p.at_eof() {
                    let arg = parse_expr(p);
                    p.scratch.push(arg);
                    p.skip_newlines();
                    if p.eat(TokenKind::Comma).is_some() {
                        p.skip_newlines();
                    } else {
                        break;
                    }
                }
                p.skip_newlines();
                p.expect(TokenKind::RParen, "close the argument list with `)`");
                lhs = p.finish_call(lhs, mark, paren_tok, false);
            }
            TokenKind::LBracket => {
                let bracket_tok = p.advance();
                p.skip_newlines();
                let index = parse_expr(p);
                p.skip_newlines();
                p.expect(TokenKind::RBracket, "close the index expression with `]`");
                lhs = p.ast.add_node(NodeKind::IndexExpr, bracket_tok, NodeData::TwoChildren(lhs, index));
            }
            _ => break,
        }
    }
    lhs
}

fn parse_primary(p: &mut Parser) -> Index {
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
        TokenKind::MultilineStr => {
            let t = p.advance();
            p.ast.add_node(NodeKind::MultilineStr, t, NodeData::Leaf)
        }
        TokenKind::Ident => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Ident, t, NodeData::Leaf)
        }
        TokenKind::Struct => items::parse_struct(p),
        TokenKind::Enum => items::parse_enum(p),
        TokenKind::If => stmt::parse_if(p),
        TokenKind::Match => stmt::parse_match(p),
        TokenKind::Map => parse_map_literal(p),
        TokenKind::LBracket => parse_array_literal_or_init(p),
        TokenKind::LParen => parse_paren_or_func(p),
        _ => {
            let found = p.cur().describe();
            p.error_here(
                format!("expected an expression, found {found}"),
                Some(
                    "expressions start with a literal, identifier, `(`, `struct`, `enum`, `if`, `match`, `new`, or `[`"
                        .to_string(),
                ),
            );
            Index::INVALID
        }
    }
}

/// `map[K]V{ key: value, ... }`, or just a bare `map[K]V` type used in
/// expression position (e.g. as a cast target).
fn parse_map_literal(p: &mut Parser) -> Index {
    let map_ty = crate::types::parse_type(p);
    if p.eat(TokenKind::LBrace).is_none() {
        return map_ty;
    }
    p.skip_newlines();
    let anchor = p.ast.token(map_ty);
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RBrace) && !p.at_eof() {
        let key = parse_expr(p);
        p.expect(TokenKind::Colon, "separate a map key from its value with `:`");
        let value = parse_expr(p);
        let item = p.ast.add_node(NodeKind::MapItem, p.ast.token(key), NodeData::TwoChildren(key, value));
        p.scratch.push(item);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        } else {
            break;
        }
    }
    p.expect(TokenKind::RBrace, "close the map literal with `}`");
    p.finish_aggregate(mark, NodeKind::MapTwo, NodeKind::Map, anchor)
}

/// `[a, b, c]` array literals and `[N]T{ a, b, c }` sized/typed initializers.
/// Both start with `[`; a single bracketed element immediately followed by a
/// type-looking token resolves to the initializer form.
fn parse_array_literal_or_init(p: &mut Parser) -> Index {
    let bracket_tok = p.advance();
    p.skip_newlines();
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RBracket) && !p.at_eof() {
        let elem = parse_expr(p);
        p.scratch.push(elem);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        } else {
            break;
        }
    }
    p.skip_newlines();
    p.expect(TokenKind::RBracket, "close the array literal with `]`");

    let count = p.scratch.since(mark).len();
    let looks_like_size = count == 1
        && matches!(
            p.cur(),
            TokenKind::Ident | TokenKind::Amp | TokenKind::LBracket | TokenKind::Map
        );
    if !looks_like_size {
        return p.finish_aggregate(mark, NodeKind::ArrayTwo, NodeKind::Array, bracket_tok);
    }

    let size = p.scratch.since(mark)[0];
    p.scratch.truncate(mark);
    let elem_ty = crate::types::parse_type(p);
    let array_ty = p.ast.add_node(NodeKind::ArrayType, bracket_tok, NodeData::TwoChildren(size, elem_ty));
    if p.eat(TokenKind::LBrace).is_none() {
        return array_ty;
    }
    p.skip_newlines();
    let inner_mark = p.scratch.mark();
    while !p.check(TokenKind::RBrace) && !p.at_eof() {
        let elem = parse_expr(p);
        p.scratch.push(elem);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        } else {
            break;
        }
    }
    p.expect(TokenKind::RBrace, "close the array initializer with `}`");
    let elements = p.finish_aggregate(inner_mark, NodeKind::ArrayTwo, NodeKind::Array, bracket_tok);
    p.ast.add_node(NodeKind::ArrayInit, bracket_tok, NodeData::TwoChildren(array_ty, elements))
}

/// `(params) -> R { ... }` / `(params) => expr` function literals vs. a
/// plain parenthesized expression are ambiguous on the opening `(`. Try the
/// function reading speculatively; on failure, unwind the reserved nodes
/// and the cursor and reparse as parens.
fn parse_paren_or_func(p: &mut Parser) -> Index {
    let snapshot = p.pos;
    let proto_placeholder = p.ast.reserve_node();
    let func_placeholder = p.ast.reserve_node();
    match items::try_parse_func(p, proto_placeholder, func_placeholder) {
        Some(func_idx) => func_idx,
        None => {
            p.ast.pop_node(func_placeholder);
            p.ast.pop_node(proto_placeholder);
            p.pos = snapshot;
            parse_parenthesized(p)
        }
    }
}

fn parse_parenthesized(p: &mut Parser) -> Index {
    p.expect(TokenKind::LParen, "open a parenthesized expression with `(`");
    p.skip_newlines();
    let inner = parse_expr(p);
    p.skip_newlines();
    p.expect(TokenKind::RParen, "close the parenthesized expression with `)`");
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_parser;

    #[test]
    fn multiplication_binds_tighter_than_subtraction() {
        let mut p = test_parser("2 * 1 - 2 * 3");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::Binary);
        assert_eq!(p.ast.token_text(p.ast.token(e)), "-");
        let NodeData::TwoChildren(lhs, rhs) = p.ast.data(e) else {
            panic!("expected a binary payload");
        };
        assert_eq!(p.ast.kind(lhs), NodeKind::Binary);
        assert_eq!(p.ast.token_text(p.ast.token(lhs)), "*");
        assert_eq!(p.ast.kind(rhs), NodeKind::Binary);
        assert_eq!(p.ast.token_text(p.ast.token(rhs)), "*");
    }

    #[test]
    fn as_cast_binds_looser_than_unary() {
        let mut p = test_parser("-x as int");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::Binary);
        assert_eq!(p.ast.token_text(p.ast.token(e)), "as");
        let NodeData::TwoChildren(lhs, rhs) = p.ast.data(e) else {
            panic!("expected a binary payload");
        };
        assert_eq!(p.ast.kind(lhs), NodeKind::Unary);
        assert_eq!(p.ast.kind(rhs), NodeKind::Ident);
    }

    #[test]
    fn postfix_chain_of_field_call_index() {
        let mut p = test_parser("a.b(1)[2]");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::IndexExpr);
        let NodeData::TwoChildren(call, _index) = p.ast.data(e) else {
            panic!("expected an index payload");
        };
        assert_eq!(p.ast.kind(call), NodeKind::CallTwo);
        let NodeData::TwoChildren(field, arg) = p.ast.data(call) else {
            panic!("expected a call payload");
        };
        assert_eq!(p.ast.kind(field), NodeKind::FieldAccess);
        assert_eq!(p.ast.kind(arg), NodeKind::Int);
    }

    #[test]
    fn array_literal_is_plain_when_not_size_shaped() {
        let mut p = test_parser("[1, 2, 3]");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::Array);
    }

    #[test]
    fn sized_array_initializer() {
        let mut p = test_parser("[3]int{1, 2, 3}");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::ArrayInit);
        let NodeData::TwoChildren(array_ty, elements) = p.ast.data(e) else {
            panic!("expected an array-init payload");
        };
        assert_eq!(p.ast.kind(array_ty), NodeKind::ArrayType);
        assert_eq!(p.ast.kind(elements), NodeKind::Array);
    }

    #[test]
    fn bare_array_type_without_initializer() {
        let mut p = test_parser("[3]int");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::ArrayType);
    }

    #[test]
    fn map_literal() {
        let mut p = test_parser("map[int]int{1: 2}");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::MapTwo);
    }

    #[test]
    fn bare_map_type_without_literal() {
        let mut p = test_parser("map[int]int");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::MapType);
    }

    #[test]
    fn paren_expression_unwraps_to_inner() {
        let mut p = test_parser("(1 + 2)");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::Binary);
    }

    #[test]
    fn func_literal_with_arrow_body() {
        let mut p = test_parser("(x: int) => x");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::Func);
        let NodeData::TwoChildren(proto, body) = p.ast.data(e) else {
            panic!("expected a func payload");
        };
        assert_eq!(p.ast.kind(proto), NodeKind::FuncProtoOne);
        assert_eq!(p.ast.kind(body), NodeKind::Ident);
    }

    #[test]
    fn new_allocation_with_args() {
        let mut p = test_parser("new Point(1, 2)");
        let e = parse_expr(&mut p);
        assert_eq!(p.ast.kind(e), NodeKind::New);
        let NodeData::Child(call) = p.ast.data(e) else {
            panic!("expected a new payload");
        };
        assert_eq!(p.ast.kind(call), NodeKind::Call);
    }
}
