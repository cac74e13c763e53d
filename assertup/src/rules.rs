//! Static rewrite rule tables.
//!
//! Three fixed mappings drive every rewrite: comparison operator to assertion
//! name, operator to its logical negation, and deprecated alias to canonical
//! name. All three are exhaustive `match` expressions so the rule set is
//! checked at compile time.

use ruff_python_ast::CmpOp;

/// Maps a comparison operator to the assertion method that checks it directly.
#[must_use]
pub fn assertion_for_operator(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "assertEqual",
        CmpOp::NotEq => "assertNotEqual",
        CmpOp::Lt => "assertLess",
        CmpOp::LtE => "assertLessEqual",
        CmpOp::Gt => "assertGreater",
        CmpOp::GtE => "assertGreaterEqual",
        CmpOp::In => "assertIn",
        CmpOp::NotIn => "assertNotIn",
        CmpOp::Is => "assertIs",
        CmpOp::IsNot => "assertIsNot",
    }
}

/// Maps an operator to its logical negation, in both directions.
///
/// Ordering operators (`<`, `<=`, `>`, `>=`) have no negation here: flipping
/// them would change which operand the assertion message blames, so
/// `assertFalse(a < b)` is left alone rather than turned into
/// `assertGreaterEqual(a, b)`.
#[must_use]
pub fn negated_operator(op: CmpOp) -> Option<CmpOp> {
    match op {
        CmpOp::Eq => Some(CmpOp::NotEq),
        CmpOp::NotEq => Some(CmpOp::Eq),
        CmpOp::In => Some(CmpOp::NotIn),
        CmpOp::NotIn => Some(CmpOp::In),
        CmpOp::Is => Some(CmpOp::IsNot),
        CmpOp::IsNot => Some(CmpOp::Is),
        CmpOp::Lt | CmpOp::LtE | CmpOp::Gt | CmpOp::GtE => None,
    }
}

/// Maps a deprecated `unittest` assertion alias to its canonical name.
///
/// These renames never change the argument list.
#[must_use]
pub fn canonical_alias(name: &str) -> Option<&'static str> {
    match name {
        "assert_" => Some("assertTrue"),
        "failIf" => Some("assertFalse"),
        "failUnless" => Some("assertTrue"),
        "assertEquals" => Some("assertEqual"),
        "failIfEqual" => Some("assertNotEqual"),
        "failUnlessEqual" => Some("assertEqual"),
        "assertNotEquals" => Some("assertNotEqual"),
        "assertAlmostEquals" => Some("assertAlmostEqual"),
        "failIfAlmostEqual" => Some("assertNotAlmostEqual"),
        "failUnlessAlmostEqual" => Some("assertAlmostEqual"),
        "assertNotAlmostEquals" => Some("assertNotAlmostEqual"),
        "assertRegexpMatches" => Some("assertRegex"),
        "assertNotRegexpMatches" => Some("assertNotRegex"),
        _ => None,
    }
}
