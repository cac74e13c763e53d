//! Call-site pattern matching for rewritable assertion calls.
//!
//! The matcher walks a parsed module in source order and proposes at most one
//! [`Rewrite`] per call expression. A call is a candidate only when it is an
//! attribute call on the literal test-case receiver `self` and its callee
//! name is not blacklisted. Handlers encode their shape preconditions as
//! explicit pattern matches: an unexpected shape is a clean non-match, never
//! a swallowed error.

use crate::rewrite::{NewArg, NewArgs, Rewrite};
use crate::rules;
use ruff_python_ast::visitor::{self, Visitor};
use ruff_python_ast::{CmpOp, Expr, ExprCall, Stmt};
use rustc_hash::FxHashSet;
use smallvec::smallvec;

/// Collects proposed rewrites from a parsed module body.
pub struct AssertMatcher<'a> {
    rewrites: Vec<Rewrite<'a>>,
    blacklist: &'a FxHashSet<String>,
}

impl<'a> AssertMatcher<'a> {
    /// Creates a matcher that skips callee names in `blacklist`.
    #[must_use]
    pub fn new(blacklist: &'a FxHashSet<String>) -> Self {
        Self {
            rewrites: Vec::new(),
            blacklist,
        }
    }

    /// Traverses `body` depth-first and returns the rewrites found, in
    /// source order.
    #[must_use]
    pub fn scan(mut self, body: &'a [Stmt]) -> Vec<Rewrite<'a>> {
        for stmt in body {
            self.visit_stmt(stmt);
        }
        self.rewrites
    }

    fn match_call(&self, call: &'a ExprCall) -> Option<Rewrite<'a>> {
        let Expr::Attribute(attribute) = &*call.func else {
            return None;
        };
        let Expr::Name(receiver) = &*attribute.value else {
            return None;
        };
        if receiver.id.as_str() != "self" {
            return None;
        }
        let name = attribute.attr.as_str();
        if self.blacklist.contains(name) {
            return None;
        }

        if let Some(canonical) = rules::canonical_alias(name) {
            // Pure rename: same arguments, offset 0.
            let args: NewArgs<'a> = call.arguments.args.iter().map(NewArg::Expr).collect();
            return Some(Rewrite::new(call, canonical, args));
        }

        match name {
            "assertTrue" => Self::match_boolean_assert(call, true),
            "assertFalse" => Self::match_boolean_assert(call, false),
            "assertIs" => Self::match_identity_assert(call, true),
            "assertIsNot" => Self::match_identity_assert(call, false),
            "assertDictContainsSubset" => Self::match_dict_subset(call),
            _ => None,
        }
    }

    /// `assertTrue(expr, ...)` / `assertFalse(expr, ...)` where `expr` is a
    /// single comparison or a two-argument `isinstance` call.
    fn match_boolean_assert(call: &'a ExprCall, positive: bool) -> Option<Rewrite<'a>> {
        let (test, extra) = call.arguments.args.split_first()?;
        match test {
            Expr::Compare(compare)
                if compare.ops.len() == 1 && compare.comparators.len() == 1 =>
            {
                let mut operator = compare.ops[0];
                if !positive {
                    operator = rules::negated_operator(operator)?;
                }
                let comparator = &compare.comparators[0];

                if matches!(operator, CmpOp::Is | CmpOp::IsNot)
                    && matches!(comparator, Expr::NoneLiteral(_))
                {
                    let target = if matches!(operator, CmpOp::Is) {
                        "assertIsNone"
                    } else {
                        "assertIsNotNone"
                    };
                    let mut args: NewArgs<'a> = smallvec![NewArg::Expr(&*compare.left)];
                    args.extend(extra.iter().map(NewArg::Expr));
                    Some(Rewrite::new(call, target, args))
                } else {
                    let target = rules::assertion_for_operator(operator);
                    let mut args: NewArgs<'a> =
                        smallvec![NewArg::Expr(&*compare.left), NewArg::Expr(comparator)];
                    args.extend(extra.iter().map(NewArg::Expr));
                    Some(Rewrite::new(call, target, args))
                }
            }
            Expr::Call(inner) => {
                let Expr::Name(func) = &*inner.func else {
                    return None;
                };
                if func.id.as_str() != "isinstance"
                    || inner.arguments.args.len() != 2
                    || !inner.arguments.keywords.is_empty()
                {
                    return None;
                }
                let target = if positive {
                    "assertIsInstance"
                } else {
                    "assertNotIsInstance"
                };
                let mut args: NewArgs<'a> =
                    inner.arguments.args.iter().map(NewArg::Expr).collect();
                args.extend(extra.iter().map(NewArg::Expr));
                Some(Rewrite::new(call, target, args))
            }
            _ => None,
        }
    }

    /// `assertIs(left, right, ...)` / `assertIsNot(left, right, ...)` where
    /// `right` is a boolean or `None` literal.
    fn match_identity_assert(call: &'a ExprCall, positive: bool) -> Option<Rewrite<'a>> {
        let (left, rest) = call.arguments.args.split_first()?;
        let (right, extra) = rest.split_first()?;

        let target = match right {
            Expr::BooleanLiteral(literal) => {
                if !positive {
                    // `assertIsNot(x, True)` has no safe single-name
                    // equivalent.
                    return None;
                }
                if literal.value {
                    "assertTrue"
                } else {
                    "assertFalse"
                }
            }
            Expr::NoneLiteral(_) => {
                if positive {
                    "assertIsNone"
                } else {
                    "assertIsNotNone"
                }
            }
            _ => return None,
        };

        let mut args: NewArgs<'a> = smallvec![NewArg::Expr(left)];
        args.extend(extra.iter().map(NewArg::Expr));
        Some(Rewrite::new(call, target, args))
    }

    /// `assertDictContainsSubset(subset, full, ...)` becomes a full-equality
    /// check against `{**full, **subset}`.
    fn match_dict_subset(call: &'a ExprCall) -> Option<Rewrite<'a>> {
        let (subset, rest) = call.arguments.args.split_first()?;
        let (full, extra) = rest.split_first()?;

        let mut args: NewArgs<'a> = smallvec![
            NewArg::Expr(full),
            NewArg::DictMerge {
                base: full,
                overlay: subset,
            },
        ];
        args.extend(extra.iter().map(NewArg::Expr));
        Some(Rewrite::new(call, "assertEqual", args))
    }
}

impl<'a> Visitor<'a> for AssertMatcher<'a> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Call(call) = expr {
            if let Some(rewrite) = self.match_call(call) {
                self.rewrites.push(rewrite);
            }
        }
        visitor::walk_expr(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str, blacklist: &FxHashSet<String>) -> Vec<(String, String)> {
        let parsed = ruff_python_parser::parse_module(source).expect("valid source");
        let module = parsed.into_syntax();
        let result = AssertMatcher::new(blacklist)
            .scan(&module.body)
            .iter()
            .map(|rewrite| (rewrite.original_name().to_owned(), rewrite.target.to_owned()))
            .collect();
        result
    }

    fn scan_all(source: &str) -> Vec<(String, String)> {
        scan(source, &FxHashSet::default())
    }

    #[test]
    fn test_candidate_requires_self_receiver() {
        assert!(scan_all("other.assertTrue(x == y)").is_empty());
        assert!(scan_all("assertTrue(x == y)").is_empty());
        assert!(scan_all("self.helper.assertTrue(x == y)").is_empty());
        assert_eq!(
            scan_all("self.assertTrue(x == y)"),
            vec![("assertTrue".to_owned(), "assertEqual".to_owned())]
        );
    }

    #[test]
    fn test_blacklisted_names_are_skipped() {
        let blacklist: FxHashSet<String> =
            ["assertTrue".to_owned()].into_iter().collect();
        assert!(scan("self.assertTrue(x == y)", &blacklist).is_empty());
        assert_eq!(
            scan("self.assertEquals(x, y)", &blacklist),
            vec![("assertEquals".to_owned(), "assertEqual".to_owned())]
        );
    }

    #[test]
    fn test_handler_preconditions_are_clean_non_matches() {
        // Shapes a handler cannot rewrite must come back as "no rewrite",
        // not a panic.
        assert!(scan_all("self.assertTrue()").is_empty());
        assert!(scan_all("self.assertTrue(a < b < c)").is_empty());
        assert!(scan_all("self.assertIs(x)").is_empty());
        assert!(scan_all("self.assertIs(x, y)").is_empty());
        assert!(scan_all("self.assertIs(x, 0)").is_empty());
        assert!(scan_all("self.assertDictContainsSubset(subset)").is_empty());
        assert!(scan_all("self.assertTrue(isinstance(x, T, extra))").is_empty());
        assert!(scan_all("self.assertTrue(isinstance(x, cls=T))").is_empty());
        assert!(scan_all("self.assertFalse(a < b)").is_empty());
    }

    #[test]
    fn test_nested_calls_each_match() {
        let matches = scan_all("self.assertTrue(self.assertEquals(a, b) == c)");
        assert_eq!(
            matches,
            vec![
                ("assertTrue".to_owned(), "assertEqual".to_owned()),
                ("assertEquals".to_owned(), "assertEqual".to_owned()),
            ]
        );
    }

    #[test]
    fn test_arg_offsets() {
        let parsed =
            ruff_python_parser::parse_module("self.assertTrue(a == b, msg='x')").expect("valid");
        let module = parsed.into_syntax();
        let blacklist = FxHashSet::default();
        let rewrites = AssertMatcher::new(&blacklist).scan(&module.body);
        assert_eq!(rewrites.len(), 1);
        // [a == b] + msg -> [a, b] + msg
        assert_eq!(rewrites[0].arg_offset(), 1);

        let parsed =
            ruff_python_parser::parse_module("self.assertIs(x, None, msg='x')").expect("valid");
        let module = parsed.into_syntax();
        let rewrites = AssertMatcher::new(&blacklist).scan(&module.body);
        // [x, None] + msg -> [x] + msg
        assert_eq!(rewrites[0].arg_offset(), -1);

        let parsed =
            ruff_python_parser::parse_module("self.assertEquals(x, y)").expect("valid");
        let module = parsed.into_syntax();
        let rewrites = AssertMatcher::new(&blacklist).scan(&module.body);
        assert_eq!(rewrites[0].arg_offset(), 0);
    }
}
