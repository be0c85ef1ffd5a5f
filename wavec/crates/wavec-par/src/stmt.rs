//! Statements: blocks, control flow (`if`/`for`/`match`/`defer`/`return`/
//! `break`/`continue`), declarations, and expression (and assignment)
//! statements.

use crate::ast::{self, Index, NodeData, NodeKind};
use crate::{expr, items, pattern, Parser};
use wavec_lex::TokenKind;
use wavec_util::index_vec::Idx;

pub(crate) fn parse_block(p: &mut Parser) -> Index {
    let brace_tok = p.expect(TokenKind::LBrace, "open a block with `{`");
    p.skip_newlines();
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RBrace) && !p.at_eof() {
        let stmt = parse_stmt(p);
        p.scratch.push(stmt);
        p.skip_newlines();
    }
    p.expect(TokenKind::RBrace, "close the block with `}`");
    let (start, end) = p.commit_range(mark);
    p.ast.add_node(NodeKind::Block, brace_tok, NodeData::ChildRange(start, end))
}

fn parse_stmt(p: &mut Parser) -> Index {
    match p.cur() {
        TokenKind::If => parse_if(p),
        TokenKind::For => parse_for(p),
        TokenKind::Match => parse_match(p),
        TokenKind::Defer => {
            let t = p.advance();
            let e = expr::parse_expr(p);
            p.ast.add_node(NodeKind::Defer, t, NodeData::Child(e))
        }
        TokenKind::Return => {
            let t = p.advance();
            let e = if matches!(p.cur(), TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof) {
                Index::INVALID
            } else {
                expr::parse_expr(p)
            };
            p.ast.add_node(NodeKind::Return, t, NodeData::Child(e))
        }
        TokenKind::Break => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Break, t, NodeData::Leaf)
        }
        TokenKind::Continue => {
            let t = p.advance();
            p.ast.add_node(NodeKind::Continue, t, NodeData::Leaf)
        }
        TokenKind::LBrace => parse_block(p),
        TokenKind::Ident
            if matches!(
                p.peek_kind(1),
                TokenKind::Colon | TokenKind::ColonColon | TokenKind::ColonEq
            ) =>
        {
            items::parse_const(p)
        }
        _ => parse_expr_stmt(p),
    }
}

fn parse_expr_stmt(p: &mut Parser) -> Index {
    let lhs = expr::parse_expr(p);
    match p.cur() {
        TokenKind::Eq
        | TokenKind::PlusEq
        | TokenKind::MinusEq
        | TokenKind::StarEq
        | TokenKind::SlashEq
        | TokenKind::PercentEq
        | TokenKind::AmpEq
        | TokenKind::ShlEq
        | TokenKind::ShrEq
        | TokenKind::PipeEq
        | TokenKind::CaretEq => {
            let op_tok = p.advance();
            p.skip_newlines();
            let rhs = expr::parse_expr(p);
            p.ast.add_node(NodeKind::Binary, op_tok, NodeData::TwoChildren(lhs, rhs))
        }
        _ => lhs,
    }
}

/// Used both as a statement and, via [`crate::expr::parse_primary`], as an
/// expression - the `If` extra-table entry doubles for both roles.
pub(crate) fn parse_if(p: &mut Parser) -> Index {
    let if_tok = p.expect(TokenKind::If, "start a conditional with `if`");
    let cond = expr::parse_expr(p);
    p.skip_newlines();
    let then_branch = parse_block(p);
    p.skip_newlines();
    let else_branch = if p.eat(TokenKind::Else).is_some() {
        p.skip_newlines();
        if p.check(TokenKind::If) {
            parse_if(p)
        } else {
            parse_block(p)
        }
    } else {
        Index::INVALID
    };
    let offset = p.ast.push_if(ast::If { cond, then_branch, else_branch });
    p.ast.add_node(NodeKind::If, if_tok, NodeData::ExtraOffset(offset))
}

/// `for i in iterable { }` or the condition-only `for cond { }`.
fn parse_for(p: &mut Parser) -> Index {
    let for_tok = p.expect(TokenKind::For, "start a loop with `for`");
    if p.check(TokenKind::Ident) && p.peek_kind(1) == TokenKind::In {
        let var_tok = p.advance();
        p.advance();
        let iterable = expr::parse_expr(p);
        p.skip_newlines();
        let body = parse_block(p);
        p.ast.add_node(NodeKind::For, var_tok, NodeData::TwoChildren(iterable, body))
    } else {
        let cond = expr::parse_expr(p);
        p.skip_newlines();
        let body = parse_block(p);
        p.ast.add_node(NodeKind::For, for_tok, NodeData::TwoChildren(cond, body))
    }
}

/// `match subject { pattern => body, ... }`. The subject occupies the first
/// slot of the node's child range, the arms fill the rest; nothing is
/// pushed onto the main array between parsing the subject and the first
/// arm, so they land contiguously without needing the subject on scratch.
pub(crate) fn parse_match(p: &mut Parser) -> Index {
    let match_tok = p.expect(TokenKind::Match, "start a match expression with `match`");
    let subject = expr::parse_expr(p);
    p.skip_newlines();
    p.expect(TokenKind::LBrace, "open the match arms with `{`");
    p.skip_newlines();
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RBrace) && !p.at_eof() {
        let arm = parse_match_arm(p);
        p.scratch.push(arm);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        }
    }
    p.expect(TokenKind::RBrace, "close the match arms with `}`");
    let arms = p.scratch.since(mark);
    let end = Index::from_usize(subject.index() + 1 + arms.len());
    debug_assert!(
        arms.iter().enumerate().all(|(i, &a)| a.index() == subject.index() + 1 + i),
        "match arms are not contiguous with their subject"
    );
    p.scratch.truncate(mark);
    p.ast.add_node(NodeKind::Match, match_tok, NodeData::ChildRange(subject, end))
}

fn parse_match_arm(p: &mut Parser) -> Index {
    let pat = pattern::parse_pattern(p);
    p.skip_newlines();
    p.expect(TokenKind::FatArrow, "separate a match pattern from its body with `=>`");
    p.skip_newlines();
    let body = if p.check(TokenKind::LBrace) { parse_block(p) } else { expr::parse_expr(p) };
    let anchor = p.ast.token(pat);
    p.ast.add_node(NodeKind::MatchArm, anchor, NodeData::TwoChildren(pat, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_parser;

    #[test]
    fn empty_block() {
        let mut p = test_parser("{\n}");
        let block = parse_block(&mut p);
        assert_eq!(p.ast.kind(block), NodeKind::Block);
        assert_eq!(p.ast.data(block), NodeData::ChildRange(Index::INVALID, Index::INVALID));
    }

    #[test]
    fn assignment_statement_builds_binary_node() {
        let mut p = test_parser("x += 1\n");
        let stmt = parse_stmt(&mut p);
        assert_eq!(p.ast.kind(stmt), NodeKind::Binary);
        assert_eq!(p.ast.token_text(p.ast.token(stmt)), "+=");
    }

    #[test]
    fn if_else_if_chain() {
        let mut p = test_parser("if a { } else if b { } else { }");
        let node = parse_if(&mut p);
        assert_eq!(p.ast.kind(node), NodeKind::If);
        let NodeData::ExtraOffset(offset) = p.ast.data(node) else {
            panic!("expected an if payload");
        };
        let triple = p.ast.if_triple(offset);
        assert!(!triple.else_branch.is_invalid());
        assert_eq!(p.ast.kind(triple.else_branch), NodeKind::If);
    }

    #[test]
    fn for_in_loop() {
        let mut p = test_parser("for i in items { }");
        let node = parse_stmt(&mut p);
        assert_eq!(p.ast.kind(node), NodeKind::For);
        assert_eq!(p.ast.token_text(p.ast.token(node)), "i");
    }

    #[test]
    fn for_condition_loop() {
        let mut p = test_parser("for x < 10 { }");
        let node = parse_stmt(&mut p);
        assert_eq!(p.ast.kind(node), NodeKind::For);
    }

    #[test]
    fn match_arms_are_contiguous_with_subject() {
        let mut p = test_parser("match n {\n1 => 1,\n2 => 2,\n}");
        let node = parse_match(&mut p);
        assert_eq!(p.ast.kind(node), NodeKind::Match);
        let NodeData::ChildRange(subject, end) = p.ast.data(node) else {
            panic!("expected a match payload");
        };
        assert_eq!(p.ast.kind(subject), NodeKind::Ident);
        assert_eq!(end.index() - subject.index(), 3);
    }
}
