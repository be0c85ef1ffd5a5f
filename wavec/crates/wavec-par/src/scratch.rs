//! The scratch stack: a parser-owned buffer for collecting the children of
//! a bracketed construct before they are copied contiguously into the main
//! node array.
//!
//! Contiguity of an aggregate's children is load-bearing: `NodeData::
//! ChildRange`/`TwoChildren` identify a span of consecutive ids in the main
//! array, so every child has to land there back-to-back. The scratch stack
//! lets the parser discover how many children a construct has (and parse
//! each one, which may itself push/pop more scratch entries for a nested
//! construct) before it knows the final shape, then commit them in one
//! contiguous run.

use crate::ast::Index;

/// A single growable arena, not one allocation per nested scope. Nested
/// parses mark their own `top` and restore it on exit; they never get
/// their own backing `Vec`.
#[derive(Debug, Default)]
pub struct Scratch {
    stack: Vec<Index>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current depth before collecting a construct's children.
    pub fn mark(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, child: Index) {
        self.stack.push(child);
    }

    /// Children collected since `mark`, in order.
    pub fn since(&self, mark: usize) -> &[Index] {
        &self.stack[mark..]
    }

    /// Drop every entry collected since `mark` (used once they've been
    /// copied into the main array, or to unwind a failed speculative
    /// parse).
    pub fn truncate(&mut self, mark: usize) {
        self.stack.truncate(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavec_util::index_vec::Idx;

    #[test]
    fn nested_marks_only_see_their_own_children() {
        let mut scratch = Scratch::new();
        let outer_mark = scratch.mark();
        scratch.push(Index::from_usize(1));

        let inner_mark = scratch.mark();
        scratch.push(Index::from_usize(2));
        scratch.push(Index::from_usize(3));
        assert_eq!(scratch.since(inner_mark).len(), 2);
        scratch.truncate(inner_mark);

        assert_eq!(scratch.since(outer_mark).len(), 1);
    }
}
