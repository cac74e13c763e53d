//! Replacement-call construction for matched assertion calls.
//!
//! A [`Rewrite`] ties one original call expression to a target callee name and
//! a new positional-argument list. Sub-expressions are shared with the
//! original tree by reference and rendered verbatim from the original source,
//! so the tree is never cloned or mutated and unchanged arguments reproduce
//! byte-identically.

use crate::utils::slice;
use ruff_python_ast::{Expr, ExprCall, Keyword};
use ruff_text_size::Ranged;
use smallvec::SmallVec;

/// One positional argument of a replacement call.
#[derive(Debug, Clone, Copy)]
pub enum NewArg<'a> {
    /// An expression reused from the original call, unchanged.
    Expr(&'a Expr),
    /// A `{**base, **overlay}` merge literal synthesized for the
    /// dict-subset rewrite.
    DictMerge {
        /// The full dictionary being asserted against.
        base: &'a Expr,
        /// The expected subset, merged over `base`.
        overlay: &'a Expr,
    },
}

impl NewArg<'_> {
    /// Renders this argument as source text, reusing original bytes for
    /// shared sub-expressions.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self {
            NewArg::Expr(expr) => slice(source, expr.range()).to_owned(),
            NewArg::DictMerge { base, overlay } => format!(
                "{{**{}, **{}}}",
                slice(source, base.range()),
                slice(source, overlay.range())
            ),
        }
    }
}

/// New positional arguments for a rewrite. Recognized call shapes have at
/// most a handful, so these live on the stack.
pub type NewArgs<'a> = SmallVec<[NewArg<'a>; 4]>;

/// A proposed substitution of one assertion call for a more specific one.
///
/// Created by a matcher handler, consumed once by the source patcher, and
/// discarded at the end of the pass.
#[derive(Debug)]
pub struct Rewrite<'a> {
    /// The original call expression, borrowed from the parsed tree.
    pub call: &'a ExprCall,
    /// Canonical name of the replacement assertion.
    pub target: &'static str,
    /// New positional arguments; keyword arguments carry over unchanged.
    pub new_args: NewArgs<'a>,
}

impl<'a> Rewrite<'a> {
    /// Creates a rewrite of `call` to `target` with the given arguments.
    #[must_use]
    pub fn new(call: &'a ExprCall, target: &'static str, new_args: NewArgs<'a>) -> Self {
        Self {
            call,
            target,
            new_args,
        }
    }

    /// Callee name of the original call.
    #[must_use]
    pub fn original_name(&self) -> &'a str {
        match &*self.call.func {
            Expr::Attribute(attribute) => attribute.attr.as_str(),
            _ => "",
        }
    }

    /// Keyword arguments carried over from the original call.
    #[must_use]
    pub fn keywords(&self) -> &'a [Keyword] {
        &self.call.arguments.keywords
    }

    /// Signed change in total argument count caused by this rewrite.
    ///
    /// Keywords appear on both sides, so this reduces to the positional
    /// difference; it still drives comment remapping over the combined list.
    #[must_use]
    pub fn arg_offset(&self) -> i64 {
        let original = self.call.arguments.args.len() + self.call.arguments.keywords.len();
        let new = self.new_args.len() + self.call.arguments.keywords.len();
        new as i64 - original as i64
    }

    /// Receiver of the original call (`self` for every matched call),
    /// rendered verbatim.
    #[must_use]
    pub fn receiver<'s>(&self, source: &'s str) -> &'s str {
        match &*self.call.func {
            Expr::Attribute(attribute) => slice(source, attribute.value.range()),
            _ => "self",
        }
    }

    /// Renders the full new argument list, new positionals first, then the
    /// carried-over keywords verbatim.
    #[must_use]
    pub fn argument_texts(&self, source: &str) -> Vec<String> {
        let mut texts: Vec<String> = self
            .new_args
            .iter()
            .map(|argument| argument.render(source))
            .collect();
        texts.extend(
            self.keywords()
                .iter()
                .map(|keyword| slice(source, keyword.range()).to_owned()),
        );
        texts
    }
}
