//! Top-level declarations: constants/variables, imports, `foreign`, `when`,
//! `using`, macro invocations, and the `struct`/`enum` aggregate bodies those
//! declarations' values can be.

use crate::ast::{self, Index, NodeData, NodeKind};
use crate::{expr, stmt, types, Parser};
use wavec_lex::TokenKind;
use wavec_util::index_vec::Idx;

/// True when the current token could start a declaration - used both for
/// the top-level loop and to resynchronize after a declaration-level error.
fn is_decl_starter(p: &Parser) -> bool {
    match p.cur() {
        TokenKind::Foreign
        | TokenKind::Import
        | TokenKind::When
        | TokenKind::Using
        | TokenKind::At => true,
        TokenKind::Ident => matches!(
            p.peek_kind(1),
            TokenKind::Colon | TokenKind::ColonColon | TokenKind::ColonEq
        ),
        _ => false,
    }
}

/// Tier-3 recovery: on a failed declaration, skip tokens until the next
/// plausible declaration starter (or EOF) and let the caller retry there.
fn synchronize(p: &mut Parser) {
    while !p.at_eof() && !is_decl_starter(p) {
        p.advance();
        p.skip_newlines();
    }
}

pub(crate) fn parse_decl_synced(p: &mut Parser) -> Index {
    let decl = parse_decl(p);
    if decl.is_invalid() {
        synchronize(p);
    }
    decl
}

fn parse_decl(p: &mut Parser) -> Index {
    match p.cur() {
        TokenKind::At => parse_macro_call(p),
        TokenKind::Foreign => parse_foreign(p),
        TokenKind::Import => parse_import(p),
        TokenKind::When => parse_when(p),
        TokenKind::Using => parse_using(p),
        TokenKind::Ident => parse_const(p),
        _ => {
            let found = p.cur().describe();
            p.error_here(
                format!("expected a declaration, found {found}"),
                Some(
                    "declarations start with a name, `import`, `foreign`, `when`, `using`, or `@`"
                        .to_string(),
                ),
            );
            Index::INVALID
        }
    }
}

/// `name ::|:=|: T :|: T = value` - the single declaration form covering
/// constants, inferred variables, and typed variables alike.
pub(crate) fn parse_const(p: &mut Parser) -> Index {
    let name_tok = p.expect(TokenKind::Ident, "expected a declaration name");
    let mut ty = Index::INVALID;
    match p.cur() {
        TokenKind::ColonColon | TokenKind::ColonEq => {
            p.advance();
        }
        TokenKind::Colon => {
            p.advance();
            ty = types::parse_type(p);
            if p.eat(TokenKind::Colon).is_none() && p.eat(TokenKind::Eq).is_none() {
                p.error_here(
                    "expected `:` or `=` after a declaration's type",
                    Some("write `name: T : value` or `name: T = value`".to_string()),
                );
            }
        }
        _ => {
            let name = p.ast.token_text(name_tok).to_string();
            p.error_here(
                format!("expected `::`, `:=`, or `:` after `{name}`"),
                Some(
                    "declare a constant with `name :: value` or a variable with `name := value`"
                        .to_string(),
                ),
            );
            return Index::INVALID;
        }
    }
    let value = expr::parse_expr(p);
    p.ast.add_node(NodeKind::Const, name_tok, NodeData::TwoChildren(ty, value))
}

/// `import name [as alias]`, the glob form `import name { ... } [as alias]`,
/// and the symbol-list form `import name { a, b } [as alias]`.
pub(crate) fn parse_import(p: &mut Parser) -> Index {
    p.expect(TokenKind::Import, "start an import with `import`");
    let name_tok = p.expect(TokenKind::Ident, "expected a module name after `import`");

    if p.eat(TokenKind::LBrace).is_none() {
        let alias = parse_optional_alias(p);
        let token = alias.unwrap_or(name_tok);
        return p
            .ast
            .add_node(NodeKind::Import, token, NodeData::TokenRef(alias.unwrap_or(u32::MAX)));
    }

    p.skip_newlines();
    if p.eat(TokenKind::Ellipsis).is_some() {
        p.skip_newlines();
        p.expect(TokenKind::RBrace, "close the glob import list with `}`");
        let alias = parse_optional_alias(p);
        let token = alias.unwrap_or(name_tok);
        return p
            .ast
            .add_node(NodeKind::Import, token, NodeData::TokenRef(alias.unwrap_or(u32::MAX)));
    }

    let mark = p.scratch.mark();
    loop {
        p.skip_newlines();
        if p.check(TokenKind::RBrace) {
            break;
        }
        let sym_tok = p.expect(TokenKind::Ident, "expected an imported symbol name");
        let sym = p.ast.add_node(NodeKind::Ident, sym_tok, NodeData::Leaf);
        p.scratch.push(sym);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    p.skip_newlines();
    p.expect(TokenKind::RBrace, "close the import list with `}`");
    let (start, end) = p.commit_range(mark);
    let alias = parse_optional_alias(p);
    p.ast.add_node(
        NodeKind::ImportComplex,
        alias.unwrap_or(u32::MAX),
        NodeData::ChildRange(start, end),
    )
}

fn parse_optional_alias(p: &mut Parser) -> Option<u32> {
    if p.eat(TokenKind::As).is_some() {
        Some(p.expect(TokenKind::Ident, "expected an alias name after `as`"))
    } else {
        None
    }
}

/// `foreign import ...` or a bare `foreign { decls }` block.
fn parse_foreign(p: &mut Parser) -> Index {
    let foreign_tok = p.expect(TokenKind::Foreign, "start a foreign declaration with `foreign`");
    if p.check(TokenKind::Import) {
        let inner = parse_import(p);
        return p.ast.add_node(NodeKind::Foreign, foreign_tok, NodeData::Child(inner));
    }
    if p.eat(TokenKind::LBrace).is_some() {
        p.skip_newlines();
        let mark = p.scratch.mark();
        while !p.check(TokenKind::RBrace) && !p.at_eof() {
            let decl = parse_decl_synced(p);
            if !decl.is_invalid() {
                p.scratch.push(decl);
            }
            p.skip_newlines();
        }
        p.expect(TokenKind::RBrace, "close the foreign block with `}`");
        let (start, end) = p.commit_range(mark);
        return p
            .ast
            .add_node(NodeKind::ForeignBlock, foreign_tok, NodeData::ChildRange(start, end));
    }
    p.error_here(
        "expected `import` or `{` after `foreign`",
        Some("use `foreign import name` or `foreign { decls }`".to_string()),
    );
    Index::INVALID
}

fn parse_when(p: &mut Parser) -> Index {
    let when_tok = p.expect(TokenKind::When, "start a conditional declaration with `when`");
    let cond = expr::parse_expr(p);
    p.skip_newlines();
    let body = stmt::parse_block(p);
    p.ast.add_node(NodeKind::When, when_tok, NodeData::TwoChildren(cond, body))
}

fn parse_using(p: &mut Parser) -> Index {
    let using_tok = p.expect(TokenKind::Using, "start a `using` declaration with `using`");
    let expr = expr::parse_expr(p);
    p.ast.add_node(NodeKind::Using, using_tok, NodeData::Child(expr))
}

fn parse_macro_call(p: &mut Parser) -> Index {
    p.expect(TokenKind::At, "start a macro invocation with `@`");
    let name_tok = p.expect(TokenKind::Ident, "expected a macro name after `@`");
    p.expect(TokenKind::LParen, "open the macro argument list with `(`");
    p.skip_newlines();
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RParen) && !p.at_eof() {
        let arg = expr::parse_expr(p);
        p.scratch.push(arg);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        } else {
            break;
        }
    }
    p.expect(TokenKind::RParen, "close the macro argument list with `)`");
    let (start, end) = p.commit_range(mark);
    p.ast.add_node(NodeKind::MacroCall, name_tok, NodeData::ChildRange(start, end))
}

/// `struct { name: T = init, ... }`, reused both for a `Const`'s value and
/// wherever a type expression resolves to a struct body.
pub(crate) fn parse_struct(p: &mut Parser) -> Index {
    let struct_tok = p.expect(TokenKind::Struct, "start a struct body with `struct`");
    p.expect(TokenKind::LBrace, "open the struct body with `{`");
    p.skip_newlines();
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RBrace) && !p.at_eof() {
        let field = parse_field(p);
        p.scratch.push(field);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        } else if !p.check(TokenKind::RBrace) {
            p.error_here(
                "expected `,` between struct fields",
                Some("separate fields with a comma:\n    struct { a: int, b: int }".to_string()),
            );
        }
    }
    p.expect(TokenKind::RBrace, "close the struct body with `}`");
    p.finish_aggregate(mark, NodeKind::StructTwo, NodeKind::Struct, struct_tok)
}

/// A struct field or named enum-variant field: `name: T = init`, `name := init`,
/// or a bare `name` with neither.
pub(crate) fn parse_field(p: &mut Parser) -> Index {
    let name_tok = p.expect(TokenKind::Ident, "expected a field name");
    let mut ty = Index::INVALID;
    let mut init = Index::INVALID;
    if p.eat(TokenKind::ColonEq).is_some() {
        init = expr::parse_expr(p);
    } else {
        if p.eat(TokenKind::Colon).is_some() {
            ty = types::parse_type(p);
        }
        if p.eat(TokenKind::Eq).is_some() {
            init = expr::parse_expr(p);
        }
    }
    p.ast.add_node(NodeKind::Field, name_tok, NodeData::TwoChildren(ty, init))
}

/// `enum { variant, variant = value, variant(T, T), variant(name: T) }`.
pub(crate) fn parse_enum(p: &mut Parser) -> Index {
    let enum_tok = p.expect(TokenKind::Enum, "start an enum body with `enum`");
    p.expect(TokenKind::LBrace, "open the enum body with `{`");
    p.skip_newlines();
    let mark = p.scratch.mark();
    while !p.check(TokenKind::RBrace) && !p.at_eof() {
        let variant = parse_variant(p);
        p.scratch.push(variant);
        let mut separated = p.eat(TokenKind::Comma).is_some();
        while p.eat(TokenKind::Newline).is_some() {
            separated = true;
        }
        if !separated && !p.check(TokenKind::RBrace) {
            p.error_here(
                "expected `,` or a newline between enum variants",
                Some(
                    "separate variants with a comma or a newline:\n    enum {\n        a,\n        b\n    }"
                        .to_string(),
                ),
            );
        }
    }
    p.expect(TokenKind::RBrace, "close the enum body with `}`");
    p.finish_aggregate(mark, NodeKind::EnumTwo, NodeKind::Enum, enum_tok)
}

fn parse_variant(p: &mut Parser) -> Index {
    let name_tok = p.expect(TokenKind::Ident, "expected a variant name");
    if p.eat(TokenKind::LParen).is_some() {
        p.skip_newlines();
        let named = p.check(TokenKind::Ident) && p.peek_kind(1) == TokenKind::Colon;
        let mark = p.scratch.mark();
        while !p.check(TokenKind::RParen) && !p.at_eof() {
            let member = if named { parse_field(p) } else { types::parse_type(p) };
            p.scratch.push(member);
            p.skip_newlines();
            if p.eat(TokenKind::Comma).is_some() {
                p.skip_newlines();
            } else {
                break;
            }
        }
        p.skip_newlines();
        p.expect(TokenKind::RParen, "close the variant's parameter list with `)`");
        if named {
            p.finish_aggregate(mark, NodeKind::VariantNamedTwo, NodeKind::VariantNamed, name_tok)
        } else {
            p.finish_aggregate(
                mark,
                NodeKind::VariantUnnamedTwo,
                NodeKind::VariantUnnamed,
                name_tok,
            )
        }
    } else if p.eat(TokenKind::Eq).is_some() {
        let value = expr::parse_expr(p);
        p.ast.add_node(NodeKind::VariantSimple, name_tok, NodeData::Child(value))
    } else {
        p.ast.add_node(NodeKind::VariantSimple, name_tok, NodeData::Child(Index::INVALID))
    }
}

/// `(params) -> R "cc" { body }` / `(params) => expr`, built into the
/// `FuncProtoOne`/`FuncProto` extra tables plus a `Func` node pairing the
/// prototype with its body.
pub(crate) fn try_parse_func(p: &mut Parser, proto_idx: Index, func_idx: Index) -> Option<Index> {
    p.eat(TokenKind::LParen)?;
    p.skip_newlines();
    let mark = p.scratch.mark();
    let mut variadic = false;
    let mut first = true;
    while !p.check(TokenKind::RParen) {
        if p.at_eof() {
            p.scratch.truncate(mark);
            return None;
        }
        if first && p.check(TokenKind::Ellipsis) {
            p.advance();
            variadic = true;
        }
        first = false;
        let Some(name_tok) = p.eat(TokenKind::Ident) else {
            p.scratch.truncate(mark);
            return None;
        };
        if p.eat(TokenKind::Colon).is_none() {
            p.scratch.truncate(mark);
            return None;
        }
        let ty = types::parse_type(p);
        let mut default = Index::INVALID;
        if p.eat(TokenKind::Eq).is_some() {
            default = expr::parse_expr(p);
        }
        let field = p.ast.add_node(NodeKind::Field, name_tok, NodeData::TwoChildren(ty, default));
        p.scratch.push(field);
        p.skip_newlines();
        if p.eat(TokenKind::Comma).is_some() {
            p.skip_newlines();
        } else {
            break;
        }
    }
    if p.eat(TokenKind::RParen).is_none() {
        p.scratch.truncate(mark);
        return None;
    }

    let mut ret_type = Index::INVALID;
    let mut calling_convention = None;
    if p.eat(TokenKind::Arrow).is_some() {
        ret_type = types::parse_type(p);
        if p.check(TokenKind::Str) {
            calling_convention = Some(p.advance());
        }
    }

    p.skip_newlines();
    let body = if p.eat(TokenKind::FatArrow).is_some() {
        expr::parse_expr(p)
    } else if p.check(TokenKind::LBrace) {
        stmt::parse_block(p)
    } else {
        p.scratch.truncate(mark);
        return None;
    };

    let params = p.scratch.since(mark).to_vec();
    p.scratch.truncate(mark);

    let (proto_kind, proto_data) = if params.len() <= 1 {
        let payload = ast::FuncProtoOne {
            param: params.first().copied().unwrap_or(Index::INVALID),
            ret_type,
            calling_convention,
            variadic,
        };
        let offset = p.ast.push_func_proto_one(payload);
        (NodeKind::FuncProtoOne, NodeData::ExtraOffset(offset))
    } else {
        let start = params[0];
        let end = Index::from_usize(start.index() + params.len());
        debug_assert!(
            params.iter().enumerate().all(|(i, &c)| c.index() == start.index() + i),
            "try_parse_func: parameters are not contiguous"
        );
        let payload = ast::FuncProto { params: (start, end), ret_type, calling_convention, variadic };
        let offset = p.ast.push_func_proto(payload);
        (NodeKind::FuncProto, NodeData::ExtraOffset(offset))
    };
    p.ast.set_node(proto_idx, proto_kind, 0, proto_data);
    p.ast.set_node(func_idx, NodeKind::Func, 0, NodeData::TwoChildren(proto_idx, body));
    Some(func_idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_parser;

    #[test]
    fn const_declaration() {
        let mut p = test_parser("x :: 1\n");
        let decl = parse_const(&mut p);
        assert_eq!(p.ast.kind(decl), NodeKind::Const);
        let NodeData::TwoChildren(ty, value) = p.ast.data(decl) else {
            panic!("expected a const payload");
        };
        assert!(ty.is_invalid());
        assert_eq!(p.ast.kind(value), NodeKind::Int);
    }

    #[test]
    fn typed_variable_declaration() {
        let mut p = test_parser("x: int = 1\n");
        let decl = parse_const(&mut p);
        let NodeData::TwoChildren(ty, value) = p.ast.data(decl) else {
            panic!("expected a const payload");
        };
        assert_eq!(p.ast.kind(ty), NodeKind::Ident);
        assert_eq!(p.ast.kind(value), NodeKind::Int);
    }

    #[test]
    fn plain_import() {
        let mut p = test_parser("import geometry\n");
        let decl = parse_import(&mut p);
        assert_eq!(p.ast.kind(decl), NodeKind::Import);
    }

    #[test]
    fn import_with_symbol_list_and_alias() {
        let mut p = test_parser("import foo { baz, fizzbuzz } as bar\n");
        let decl = parse_import(&mut p);
        assert_eq!(p.ast.kind(decl), NodeKind::ImportComplex);
        assert_eq!(p.ast.token_text(p.ast.token(decl)), "bar");
        let NodeData::ChildRange(start, end) = p.ast.data(decl) else {
            panic!("expected a child range");
        };
        assert_eq!(end.index() - start.index(), 2);
    }

    #[test]
    fn struct_with_field() {
        let mut p = test_parser("struct { x: int }");
        let decl = parse_struct(&mut p);
        assert_eq!(p.ast.kind(decl), NodeKind::StructTwo);
    }

    #[test]
    fn enum_with_unnamed_variant() {
        let mut p = test_parser("enum { Pair(int, int) }");
        let decl = parse_enum(&mut p);
        assert_eq!(p.ast.kind(decl), NodeKind::EnumTwo);
        let NodeData::TwoChildren(variant, _) = p.ast.data(decl) else {
            panic!("expected an enum payload");
        };
        assert_eq!(p.ast.kind(variant), NodeKind::VariantUnnamedTwo);
    }

    #[test]
    fn try_parse_func_fails_cleanly_on_non_function() {
        let mut p = test_parser("(1 + 2)");
        let proto = p.ast.reserve_node();
        let func = p.ast.reserve_node();
        let before = p.ast.len();
        let result = try_parse_func(&mut p, proto, func);
        assert!(result.is_none());
        p.ast.pop_node(func);
        p.ast.pop_node(proto);
        assert_eq!(p.ast.len(), before - 2);
    }
}
