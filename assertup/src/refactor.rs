//! Pass driver: match, patch, and iterate to a fixpoint.

use crate::matcher::AssertMatcher;
use crate::patcher::SourcePatcher;
use crate::utils::LineIndex;
use compact_str::CompactString;
use ruff_text_size::Ranged;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

/// Upper bound on rewrite passes for a single source.
///
/// Some rewrites legitimately need more than one pass (a deprecated-alias
/// rename can feed a structural rewrite), but an unbounded loop would be
/// unacceptable if a rule pair ever oscillated.
pub const DEFAULT_MAX_PASSES: usize = 5;

/// Callee names excluded from rewriting.
pub type Blacklist = FxHashSet<String>;

/// Error surfaced by a rewrite pass.
#[derive(Debug, Error)]
pub enum RefactorError {
    /// The input is not valid Python; no partial result is produced.
    #[error("failed to parse source: {0}")]
    Parse(#[from] ruff_python_parser::ParseError),
}

/// Summary of one applied rewrite, kept for reporting only.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteRecord {
    /// Callee name of the original call.
    pub original: CompactString,
    /// Callee name it was rewritten to.
    pub replacement: CompactString,
    /// 1-indexed line of the call at the time it was rewritten.
    pub line: usize,
}

/// Runs one full match-and-patch pass over `source`.
///
/// Returns the new source text and a record per applied rewrite. A source
/// with no rewritable calls comes back byte-identical.
///
/// # Errors
///
/// Returns [`RefactorError::Parse`] when `source` is not valid Python.
pub fn rewrite_source(
    source: &str,
    blacklist: &Blacklist,
) -> Result<(String, Vec<RewriteRecord>), RefactorError> {
    let parsed = ruff_python_parser::parse_module(source)?;
    let module = parsed.into_syntax();
    let line_index = LineIndex::new(source);

    let rewrites = AssertMatcher::new(blacklist).scan(&module.body);

    let mut patcher = SourcePatcher::new(source, &line_index);
    let mut records = Vec::with_capacity(rewrites.len());
    for rewrite in &rewrites {
        if patcher.push(rewrite) {
            records.push(RewriteRecord {
                original: rewrite.original_name().into(),
                replacement: rewrite.target.into(),
                line: line_index.line_index(rewrite.call.range().start()),
            });
        }
    }

    Ok((patcher.finish(), records))
}

/// Repeats [`rewrite_source`] until a pass applies no rewrites or
/// `max_passes` is reached, feeding each pass's output into the next.
///
/// Returns the final text and the concatenated records of every pass.
///
/// # Errors
///
/// Returns [`RefactorError::Parse`] when the input (or, in principle, an
/// intermediate result) fails to parse.
pub fn rewrite_to_fixpoint(
    source: &str,
    blacklist: &Blacklist,
    max_passes: usize,
) -> Result<(String, Vec<RewriteRecord>), RefactorError> {
    let mut current = source.to_owned();
    let mut applied = Vec::new();

    for _ in 0..max_passes {
        let (next, records) = rewrite_source(&current, blacklist)?;
        if records.is_empty() {
            break;
        }
        current = next;
        applied.extend(records);
    }

    Ok((current, applied))
}
