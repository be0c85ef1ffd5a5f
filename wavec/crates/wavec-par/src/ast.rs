//! The structure-of-arrays AST produced by the parser.
//!
//! A node is not an owned tree value but a row across three parallel
//! arrays, addressed by [`Index`]: `kind[i]` is the node's variant tag,
//! `token[i]` is the index of its anchor token (the token a diagnostic or
//! the printer should point at), and `data[i]` is interpreted according to
//! `kind[i]` as a pair of children, a contiguous child range, a single
//! child, a raw token reference, or an offset into one of the typed
//! `extra` side-tables. Index `0` is the reserved invalid sentinel; index
//! `1` is always [`Index::ROOT`].

use wavec_util::index_vec::{define_idx, Idx, IndexVec};
use wavec_util::Diagnostic;

define_idx!(Index);

impl Index {
    /// The reserved "no node"/invalid sentinel, always row 0.
    pub const INVALID: Index = Index(0);
    /// The root node, always row 1.
    pub const ROOT: Index = Index(1);

    pub fn is_invalid(self) -> bool {
        self.0 == 0
    }
}

impl Default for Index {
    fn default() -> Self {
        Index::INVALID
    }
}

define_idx!(FuncProtoOneId);
define_idx!(FuncProtoId);
define_idx!(GenericOneId);
define_idx!(GenericId);
define_idx!(IfId);

/// Payload interpretation for a node's `data` slot. The tag is implied by
/// the node's `kind` - constructors only ever build the variant the
/// grammar production that created the node calls for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// No payload beyond `kind`/`token` (e.g. `break`, `continue`).
    Leaf,
    /// Two child node ids. For every `_TWO` aggregate kind, when both
    /// children are present they occupy consecutive ids `(start,
    /// start+1)`; a missing second child is `Index::INVALID`; an empty
    /// aggregate is `(Index::INVALID, Index::INVALID)`.
    TwoChildren(Index, Index),
    /// `(start, end)`: a contiguous, half-open range of child ids in the
    /// main node array.
    ChildRange(Index, Index),
    /// A single child node id.
    Child(Index),
    /// A raw token index, used where a node's payload is "a token, not a
    /// node" (e.g. an import's alias). `u32::MAX` means absent.
    TokenRef(u32),
    /// An offset into one of the typed `extra` tables named by `kind`
    /// (`FuncProtoOne`, `FuncProto`, `GenericOne`, `Generic`, `If`).
    ExtraOffset(u32),
}

/// Every node variant the parser can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    /// Row 0's own kind; never produced by a grammar production.
    Invalid,
    /// Row 1's own kind; `data` is unused.
    Root,

    // --- literals and names ---------------------------------------------
    Ident,
    Int,
    Float,
    Char,
    Str,
    MultilineStr,

    // --- expressions ------------------------------------------------------
    /// `lhs OP rhs`; `token` is the operator. Also used for `as`-casts
    /// (rhs is a type node) and for every compound-assignment operator.
    Binary,
    /// Prefix `+ - ! ~ *`; `token` is the operator, `data` is the operand.
    Unary,
    /// Prefix `&expr`; upgraded to [`NodeKind::RefMut`] when immediately
    /// followed by `mut`.
    Ref,
    /// Prefix `&mut expr`.
    RefMut,
    /// `object.field`; `token` is the field name.
    FieldAccess,
    /// `object[index]`.
    IndexExpr,
    /// `new T` / `new T(args)`.
    New,

    /// Call with callee plus <=1 argument: `data = (callee, arg)`, `arg`
    /// absent is `Index::INVALID`.
    CallTwo,
    /// Call with callee plus N arguments: `data = (start, end)` where
    /// `children[0]` is the callee and `children[1..]` are the arguments.
    Call,
    /// As [`NodeKind::Call`], but the callee was followed by a bracketed
    /// generic-argument list; the generic arguments are folded into the
    /// same child range ahead of the value arguments (see DESIGN.md).
    CallGeneric,

    // --- aggregates: types and literals ------------------------------------
    /// `struct { <=2 fields }`.
    StructTwo,
    /// `struct { N fields }`.
    Struct,
    /// One struct/named-variant field: `name: T = init`. `token` is the
    /// field name; `data = (type, init)`, either absent as
    /// `Index::INVALID`.
    Field,
    /// `enum { <=2 variants }`.
    EnumTwo,
    /// `enum { N variants }`.
    Enum,
    /// `name` with an optional `= value`; `data = Child(value)`
    /// (`Index::INVALID` if bare).
    VariantSimple,
    /// `name(T, ...)` with <=2 positional types.
    VariantUnnamedTwo,
    /// `name(T, ...)` with N positional types.
    VariantUnnamed,
    /// `name(a: T, ...)` with <=2 named fields.
    VariantNamedTwo,
    /// `name(a: T, ...)` with N named fields.
    VariantNamed,

    /// `[N]T`: `data = (size, element_type)`.
    ArrayType,
    /// `[K]V`: `data = (key_type, value_type)`.
    MapType,
    /// `&T`.
    RefType,
    /// `&mut T`.
    RefMutType,
    /// `&own T`.
    RefOwnType,

    /// Array literal with <=2 elements.
    ArrayTwo,
    /// Array literal with N elements.
    Array,
    /// `[N]T{ elements }`: `data = (array_type, elements)`, where
    /// `elements` is an `ArrayTwo`/`Array` node.
    ArrayInit,
    /// Map literal with <=2 entries.
    MapTwo,
    /// Map literal with N entries.
    Map,
    /// One `key: value` map entry.
    MapItem,

    // --- functions ----------------------------------------------------------
    /// `data = ExtraOffset` into [`FuncProtoOne`]: <=1 parameter.
    FuncProtoOne,
    /// `data = ExtraOffset` into [`FuncProto`]: N parameters.
    FuncProto,
    /// `data = (prototype, body)`; `body` is a `Block` or an expression
    /// (`=> expr` form).
    Func,

    // --- statements and control flow ----------------------------------------
    /// `data = (start, end)` range of statement nodes. `token` is the
    /// opening `{`.
    Block,
    /// `data = ExtraOffset` into [`If`]: condition/then/else (else id
    /// `Index::INVALID` when absent). Doubles as the `if` expression form.
    If,
    /// `data = (iterable_or_cond, body)`; `token` is the loop variable
    /// (or the `for` keyword itself for a condition-only loop).
    For,
    /// `data = (start, end)`; `children[0]` is the subject expression,
    /// `children[1..]` are `MatchArm` nodes.
    Match,
    /// `data = (pattern, body)`.
    MatchArm,
    /// `data = Child(expr)`.
    Defer,
    /// `data = Child(expr)`, `Index::INVALID` for a bare `return`.
    Return,
    Break,
    Continue,

    // --- declarations --------------------------------------------------
    /// Any `name ::|:=|: T :|: T = value` declaration. `token` is the
    /// declared name; `data = (type, value)`, `type` is `Index::INVALID`
    /// when inferred (`::`/`:=`).
    Const,
    /// `import name [as alias]` or `import name { ... } [as alias]` (the
    /// glob form; neither keeps a child-range payload). `token` is the
    /// alias if present, else the module name; `data = TokenRef(alias)`,
    /// `u32::MAX` when there is no alias.
    Import,
    /// `import name { a, b, c } as alias`. `token` is the alias token
    /// (`u32::MAX` if absent); `data` is the `(start, end)` range of the
    /// imported symbol `Ident` nodes. The module path name is not
    /// separately retained on this node - see DESIGN.md.
    ImportComplex,
    /// `foreign import ...`; `data = Child` wrapping an `Import` or
    /// `ImportComplex` node.
    Foreign,
    /// Bare `foreign { decls }`; `data` is the `(start, end)` range of
    /// declaration nodes.
    ForeignBlock,
    /// `when cond { ... }`; `data = (cond, body)`.
    When,
    /// `using expr`; `data = Child(expr)`.
    Using,
    /// `@name(args)`; `token` is the macro name, `data` is the
    /// `(start, end)` range of argument expression nodes.
    MacroCall,

    // --- generics (structural completeness; see DESIGN.md) -------------------
    /// `data = ExtraOffset` into [`GenericOne`].
    GenericOne,
    /// `data = ExtraOffset` into [`Generic`].
    Generic,
}

/// `<=1`-parameter function prototype payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FuncProtoOne {
    /// The single parameter (a `Field` node), `Index::INVALID` if none.
    pub param: Index,
    pub ret_type: Index,
    /// Index of the calling-convention string literal token, if any.
    pub calling_convention: Option<u32>,
    pub variadic: bool,
}

/// N-parameter function prototype payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FuncProto {
    /// `(start, end)` range of `Field` parameter nodes.
    pub params: (Index, Index),
    pub ret_type: Index,
    pub calling_convention: Option<u32>,
    pub variadic: bool,
}

/// A single generic parameter with an optional bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GenericOne {
    pub name_token: u32,
    /// Constraint type, `Index::INVALID` if unbounded.
    pub bound: Index,
}

/// N generic parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Generic {
    /// `(start, end)` range of generic-parameter nodes.
    pub params: (Index, Index),
}

/// `if`/then/else triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct If {
    pub cond: Index,
    pub then_branch: Index,
    /// `Index::INVALID` when there is no `else`.
    pub else_branch: Index,
}

/// The parsed tree: three parallel node arrays, the five typed `extra`
/// side-tables, the owned token stream and source text it was parsed
/// from, the top-level declaration list, and residual diagnostics.
#[derive(Debug, Default)]
pub struct Ast {
    pub source: std::sync::Arc<str>,
    pub tokens: wavec_lex::TokenStream,

    kind: IndexVec<Index, NodeKind>,
    token: IndexVec<Index, u32>,
    data: IndexVec<Index, NodeData>,

    pub func_proto_one: IndexVec<FuncProtoOneId, FuncProtoOne>,
    pub func_proto: IndexVec<FuncProtoId, FuncProto>,
    pub generic_one: IndexVec<GenericOneId, GenericOne>,
    pub generic: IndexVec<GenericId, Generic>,
    pub if_extra: IndexVec<IfId, If>,

    pub decls: Vec<Index>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Ast {
    /// A fresh AST with the invariant `[INVALID, ROOT]` pair of rows
    /// already present, matching the empty-source scenario in §8.
    pub fn new(source: std::sync::Arc<str>, tokens: wavec_lex::TokenStream) -> Self {
        let mut ast = Ast {
            source,
            tokens,
            ..Default::default()
        };
        let invalid = ast.add_node(NodeKind::Invalid, 0, NodeData::Leaf);
        debug_assert_eq!(invalid, Index::INVALID);
        let root = ast.add_node(NodeKind::Root, 0, NodeData::Leaf);
        debug_assert_eq!(root, Index::ROOT);
        ast
    }

    pub fn len(&self) -> usize {
        self.kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    pub fn kind(&self, i: Index) -> NodeKind {
        self.kind[i]
    }

    pub fn token(&self, i: Index) -> u32 {
        self.token[i]
    }

    pub fn data(&self, i: Index) -> NodeData {
        self.data[i]
    }

    /// Append a fully-formed node, returning its id.
    pub fn add_node(&mut self, kind: NodeKind, token: u32, data: NodeData) -> Index {
        self.kind.push(kind);
        self.token.push(token);
        self.data.push(data)
    }

    /// Append an invalid placeholder whose fields will be overwritten by a
    /// later [`Ast::set_node`]. Used when a parent node must be given a
    /// lower id than children it hasn't parsed yet.
    pub fn reserve_node(&mut self) -> Index {
        self.add_node(NodeKind::Invalid, 0, NodeData::Leaf)
    }

    /// Overwrite a previously reserved node's fields in place.
    pub fn set_node(&mut self, index: Index, kind: NodeKind, token: u32, data: NodeData) {
        self.kind[index] = kind;
        self.token[index] = token;
        self.data[index] = data;
    }

    /// Remove the trailing node `i`, used to unwind a speculative parse.
    ///
    /// # Panics
    /// Panics if `i` is not the last row - popping anything else would
    /// leave a hole in the contiguous id space every `ChildRange` relies
    /// on.
    pub fn pop_node(&mut self, i: Index) {
        let last = Index::from_usize(self.kind.len() - 1);
        assert_eq!(
            i, last,
            "pop_node: {i:?} is not the tail node ({last:?}) - speculative rollback must unwind in reverse order"
        );
        self.kind.pop();
        self.token.pop();
        self.data.pop();
    }

    pub fn push_func_proto_one(&mut self, payload: FuncProtoOne) -> u32 {
        self.func_proto_one.push(payload).index() as u32
    }

    pub fn push_func_proto(&mut self, payload: FuncProto) -> u32 {
        self.func_proto.push(payload).index() as u32
    }

    pub fn push_generic_one(&mut self, payload: GenericOne) -> u32 {
        self.generic_one.push(payload).index() as u32
    }

    pub fn push_generic(&mut self, payload: Generic) -> u32 {
        self.generic.push(payload).index() as u32
    }

    pub fn push_if(&mut self, payload: If) -> u32 {
        self.if_extra.push(payload).index() as u32
    }

    pub fn func_proto_one(&self, offset: u32) -> FuncProtoOne {
        self.func_proto_one[FuncProtoOneId(offset)]
    }

    pub fn func_proto(&self, offset: u32) -> &FuncProto {
        &self.func_proto[FuncProtoId(offset)]
    }

    pub fn if_triple(&self, offset: u32) -> If {
        self.if_extra[IfId(offset)]
    }

    /// The source text spanned by token `i`, re-derived by re-lexing from
    /// its start offset rather than stored redundantly on the node.
    pub fn token_text(&self, i: u32) -> &str {
        let start = self.tokens.start_at(i as usize) as usize;
        let kind = self.tokens.kind_at(i as usize);
        let len = wavec_lex::token_length(kind, &self.source[start..]);
        &self.source[start..start + len]
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == wavec_util::Level::Error)
    }
}
