//! End-to-end scenarios exercised through the public `parse` entry point.

use wavec_par::{Index, NodeData, NodeKind};
use wavec_util::index_vec::Idx;
use wavec_util::FileId;

fn parse(source: &str) -> wavec_par::Ast {
    wavec_par::parse(FileId::new(0), source)
}

#[test]
fn empty_source_yields_invalid_and_root_only() {
    let ast = parse("");
    assert_eq!(ast.len(), 2);
    assert_eq!(ast.kind(Index::INVALID), NodeKind::Invalid);
    assert_eq!(ast.kind(Index::ROOT), NodeKind::Root);
    assert!(ast.decls.is_empty());
    assert!(ast.diagnostics.is_empty());
}

#[test]
fn zero_param_function() {
    let ast = parse("main :: () {\n}\n");
    assert_eq!(ast.decls.len(), 1);
    let decl = ast.decls[0];
    assert_eq!(ast.kind(decl), NodeKind::Const);
    let NodeData::TwoChildren(_ty, value) = ast.data(decl) else {
        panic!("expected a const node");
    };
    assert_eq!(ast.kind(value), NodeKind::Func);
    let NodeData::TwoChildren(proto, body) = ast.data(value) else {
        panic!("expected a func node");
    };
    assert_eq!(ast.kind(proto), NodeKind::FuncProtoOne);
    let NodeData::ExtraOffset(offset) = ast.data(proto) else {
        panic!("expected an extra offset");
    };
    let payload = ast.func_proto_one(offset);
    assert!(payload.param.is_invalid());
    assert!(payload.ret_type.is_invalid());
    assert!(payload.calling_convention.is_none());
    assert_eq!(ast.kind(body), NodeKind::Block);
    assert_eq!(ast.data(body), NodeData::ChildRange(Index::INVALID, Index::INVALID));
}

#[test]
fn struct_with_two_fields() {
    let ast = parse("foo :: struct { bar: int,\n baz: [5]int\n}\n");
    assert_eq!(ast.decls.len(), 1);
    let decl = ast.decls[0];
    assert_eq!(ast.kind(decl), NodeKind::Const);
    let NodeData::TwoChildren(_, value) = ast.data(decl) else {
        panic!("expected a const node");
    };
    assert_eq!(ast.kind(value), NodeKind::StructTwo);
    let NodeData::TwoChildren(bar, baz) = ast.data(value) else {
        panic!("expected two fields");
    };
    assert_eq!(ast.kind(bar), NodeKind::Field);
    let NodeData::TwoChildren(bar_ty, _) = ast.data(bar) else {
        panic!("expected a field payload");
    };
    assert_eq!(ast.kind(bar_ty), NodeKind::Ident);

    assert_eq!(ast.kind(baz), NodeKind::Field);
    let NodeData::TwoChildren(baz_ty, _) = ast.data(baz) else {
        panic!("expected a field payload");
    };
    assert_eq!(ast.kind(baz_ty), NodeKind::ArrayType);
    let NodeData::TwoChildren(size, elem) = ast.data(baz_ty) else {
        panic!("expected an array type payload");
    };
    assert_eq!(ast.kind(size), NodeKind::Int);
    assert_eq!(ast.kind(elem), NodeKind::Ident);
}

#[test]
fn import_with_symbol_list() {
    let ast = parse("import foo { baz, fizzbuzz } as bar\n");
    assert_eq!(ast.decls.len(), 1);
    let decl = ast.decls[0];
    assert_eq!(ast.kind(decl), NodeKind::ImportComplex);
    assert_eq!(ast.token_text(ast.token(decl)), "bar");
    let NodeData::ChildRange(start, end) = ast.data(decl) else {
        panic!("expected a child range");
    };
    assert_eq!(end.index() - start.index(), 2);
    assert_eq!(ast.kind(start), NodeKind::Ident);
}

#[test]
fn operator_precedence() {
    let ast = parse("hello :: 2 * 1 - 2 * 3\n");
    let decl = ast.decls[0];
    let NodeData::TwoChildren(_, value) = ast.data(decl) else {
        panic!("expected a const node");
    };
    assert_eq!(ast.kind(value), NodeKind::Binary);
    assert_eq!(ast.token_text(ast.token(value)), "-");
    let NodeData::TwoChildren(lhs, rhs) = ast.data(value) else {
        panic!("expected a binary payload");
    };
    assert_eq!(ast.kind(lhs), NodeKind::Binary);
    assert_eq!(ast.token_text(ast.token(lhs)), "*");
    assert_eq!(ast.kind(rhs), NodeKind::Binary);
    assert_eq!(ast.token_text(ast.token(rhs)), "*");
}

#[test]
fn enum_with_simple_variant() {
    let ast = parse("foo :: enum { hello = 1 }\n");
    let decl = ast.decls[0];
    let NodeData::TwoChildren(_, value) = ast.data(decl) else {
        panic!("expected a const node");
    };
    assert_eq!(ast.kind(value), NodeKind::EnumTwo);
    let NodeData::TwoChildren(variant, second) = ast.data(value) else {
        panic!("expected variant payload");
    };
    assert!(second.is_invalid());
    assert_eq!(ast.kind(variant), NodeKind::VariantSimple);
    let NodeData::Child(init) = ast.data(variant) else {
        panic!("expected a variant init child");
    };
    assert_eq!(ast.kind(init), NodeKind::Int);
}
