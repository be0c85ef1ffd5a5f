//! wavec-par - Parser (Syntactic Analyzer)
//!
//! Turns a [`wavec_lex::TokenStream`] into an [`ast::Ast`]: a
//! structure-of-arrays tree addressed by [`ast::Index`], built with a
//! recursive-descent/Pratt hybrid over the token stream. Nothing here
//! allocates an owned tree of boxed nodes - every node the parser finishes is
//! appended straight into the `Ast`'s arrays, and an aggregate's children are
//! staged on the [`scratch::Scratch`] stack until their count is known, then
//! turned into a contiguous id range.
//!
//! Diagnostics use the four-tier recovery scheme the rest of the front end
//! follows: scanning errors are the lexer's problem and already resolved by
//! the time this crate sees a token stream; syntactic errors synthesize the
//! expected token and keep parsing the current construct; declaration-level
//! errors give up on the current top-level declaration and resynchronize at
//! the next one; and an internal invariant violation (a scratch range that
//! didn't land contiguously) is the one place this crate panics.

pub mod ast;
mod expr;
mod items;
mod pattern;
pub mod scratch;
mod stmt;
mod types;

pub use ast::{Ast, Index, NodeData, NodeKind};

use scratch::Scratch;
use wavec_lex::TokenKind;
use wavec_util::index_vec::Idx;
use wavec_util::{FileId, Handler, Span};

/// Parse a whole source file into an [`Ast`]. Lexes internally; diagnostics
/// from both passes end up on the returned `Ast`'s `diagnostics` list.
pub fn parse(file_id: FileId, source: &str) -> Ast {
    let mut handler = Handler::new();
    let tokens = wavec_lex::lex(source, file_id, &mut handler);
    let parser = Parser::new(file_id, std::sync::Arc::from(source), tokens, &handler);
    let mut ast = parser.run();
    ast.diagnostics = handler.diagnostics();
    ast
}

pub(crate) struct Parser<'a> {
    ast: Ast,
    pos: usize,
    file_id: FileId,
    handler: &'a Handler,
    scratch: Scratch,
}

impl<'a> Parser<'a> {
    fn new(
        file_id: FileId,
        source: std::sync::Arc<str>,
        tokens: wavec_lex::TokenStream,
        handler: &'a Handler,
    ) -> Self {
        Parser {
            ast: Ast::new(source, tokens),
            pos: 0,
            file_id,
            handler,
            scratch: Scratch::new(),
        }
    }

    fn run(mut self) -> Ast {
        self.skip_newlines();
        while !self.at_eof() {
            let before = self.pos;
            let decl = items::parse_decl_synced(&mut self);
            if !decl.is_invalid() {
                self.ast.decls.push(decl);
            }
            self.skip_newlines();
            if self.pos == before {
                self.advance();
                self.skip_newlines();
            }
        }
        self.ast
    }

    // --- token cursor ---------------------------------------------------

    fn cur(&self) -> TokenKind {
        self.ast.tokens.kind_at(self.pos)
    }

    fn peek_kind(&self, ahead: usize) -> TokenKind {
        let i = self.pos + ahead;
        if i < self.ast.tokens.len() {
            self.ast.tokens.kind_at(i)
        } else {
            TokenKind::Eof
        }
    }

    fn at_eof(&self) -> bool {
        self.cur() == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.cur() == kind
    }

    /// Consume the current token and return its index, skipping any trivia
    /// that follows. `Newline` is not trivia here: the grammar is sensitive
    /// to it, so callers skip it explicitly with [`Self::skip_newlines`].
    fn advance(&mut self) -> u32 {
        let index = self.pos as u32;
        if !self.at_eof() {
            self.pos += 1;
        }
        self.skip_trivia();
        index
    }

    fn skip_trivia(&mut self) {
        while matches!(
            self.cur(),
            TokenKind::Comment | TokenKind::DocComment | TokenKind::MultilineComment
        ) {
            self.pos += 1;
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.pos += 1;
            self.skip_trivia();
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Option<u32> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Synthesize the expected token: emit a diagnostic, but pretend it was
    /// there and keep parsing the current construct (tier 2 recovery).
    fn expect(&mut self, kind: TokenKind, hint: &str) -> u32 {
        if let Some(index) = self.eat(kind) {
            return index;
        }
        let message = format!(
            "expected {}, found {}",
            kind.describe(),
            self.cur().describe()
        );
        self.error_here(message, Some(hint.to_string()));
        self.pos as u32
    }

    // --- diagnostics ------------------------------------------------------

    fn current_span(&self) -> Span {
        let (start, end) = self.ast.tokens.span_of(self.pos, &self.ast.source);
        Span::with_file(start as usize, end as usize, self.file_id, 0, 0)
    }

    fn error_here(&mut self, message: impl Into<String>, hint: Option<String>) {
        let label = format!("found {} here", self.cur().describe());
        let mut builder = wavec_util::diagnostic::DiagnosticBuilder::error(message)
            .span(self.current_span())
            .label(label);
        if let Some(hint) = hint {
            builder = builder.help(hint);
        }
        builder.emit(self.handler);
    }

    // --- shared node-building helpers -------------------------------------

    /// Turn the scratch entries collected since `mark` into a contiguous id
    /// range, asserting the contiguity invariant the whole crate depends on.
    fn commit_range(&mut self, mark: usize) -> (Index, Index) {
        let children = self.scratch.since(mark);
        if children.is_empty() {
            self.scratch.truncate(mark);
            return (Index::INVALID, Index::INVALID);
        }
        let start = children[0];
        let end = Index::from_usize(start.index() + children.len());
        debug_assert!(
            children
                .iter()
                .enumerate()
                .all(|(i, &c)| c.index() == start.index() + i),
            "commit_range: children did not land contiguously in the node array"
        );
        self.scratch.truncate(mark);
        (start, end)
    }

    /// Like [`Self::commit_range`], but also decides between the `_TWO`
    /// specialization (<=2 children, stored inline) and the N-ary range form.
    fn finish_aggregate(
        &mut self,
        mark: usize,
        two_kind: NodeKind,
        many_kind: NodeKind,
        token: u32,
    ) -> Index {
        let (start, end) = self.commit_range(mark);
        let count = if start.is_invalid() {
            0
        } else {
            end.index() - start.index()
        };
        if count <= 2 {
            let first = if count >= 1 { start } else { Index::INVALID };
            let second = if count == 2 {
                Index::from_usize(start.index() + 1)
            } else {
                Index::INVALID
            };
            self.ast.add_node(two_kind, token, NodeData::TwoChildren(first, second))
        } else {
            self.ast.add_node(many_kind, token, NodeData::ChildRange(start, end))
        }
    }

    /// `CallTwo`/`Call`/`CallGeneric`: the callee occupies the first slot,
    /// so a zero- or one-argument call still fits in `TwoChildren`.
    fn finish_call(&mut self, callee: Index, mark: usize, token: u32, generic: bool) -> Index {
        let args = self.scratch.since(mark).to_vec();
        let end = Index::from_usize(callee.index() + 1 + args.len());
        debug_assert!(
            args.iter()
                .enumerate()
                .all(|(i, &a)| a.index() == callee.index() + 1 + i),
            "finish_call: arguments are not contiguous with their callee"
        );
        self.scratch.truncate(mark);
        if generic {
            self.ast
                .add_node(NodeKind::CallGeneric, token, NodeData::ChildRange(callee, end))
        } else if args.is_empty() {
            self.ast.add_node(
                NodeKind::CallTwo,
                token,
                NodeData::TwoChildren(callee, Index::INVALID),
            )
        } else if args.len() == 1 {
            self.ast
                .add_node(NodeKind::CallTwo, token, NodeData::TwoChildren(callee, args[0]))
        } else {
            self.ast.add_node(NodeKind::Call, token, NodeData::ChildRange(callee, end))
        }
    }
}

/// Build a `Parser` over `source` for use by inline unit tests in the
/// sibling grammar modules. The handler is leaked for the test's duration -
/// acceptable since `#[test]` binaries exit after the run.
#[cfg(test)]
pub(crate) fn test_parser(source: &'static str) -> Parser<'static> {
    let handler: &'static Handler = Box::leak(Box::new(Handler::new()));
    let mut lex_handler = Handler::new();
    let tokens = wavec_lex::lex(source, FileId::new(0), &mut lex_handler);
    Parser::new(FileId::new(0), std::sync::Arc::from(source), tokens, handler)
}
