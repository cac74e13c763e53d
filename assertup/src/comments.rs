//! Trailing-comment recovery and remapping for rewritten call spans.
//!
//! Rewriting re-renders a whole call expression, which would otherwise drop
//! comments hanging off its argument lines. This module re-lexes the call's
//! original span, works out which comment trails which top-level argument,
//! and shifts those positions by the rewrite's argument offset so each
//! surviving comment stays glued to its argument.

use crate::utils::LineIndex;
use ruff_python_ast::token::{Token, TokenKind};
use ruff_python_parser::{parse, Mode};
use ruff_text_size::Ranged;
use std::collections::{BTreeMap, BTreeSet};

/// Maps a 0-based top-level argument index to the trailing line comment on
/// that argument's boundary line, verbatim including the `#` marker.
pub type CommentMap = BTreeMap<usize, String>;

/// Recovers trailing comments from the source lines spanning one call.
///
/// The span runs from the call's opening line to its closing line, inclusive.
/// Tokenizing tracks bracket nesting starting at -1: a comma at depth 0 ends
/// one top-level argument, and the closing parenthesis at depth -1 ends the
/// last one, using the preceding token's line as that argument's boundary.
/// Spans that fail to lex yield an empty map; comments are best-effort and
/// never fail the pass.
#[must_use]
pub fn recover_comments(span_lines: &[&str]) -> CommentMap {
    let Some((first, rest)) = span_lines.split_first() else {
        return CommentMap::new();
    };
    // Dedent the opening line so the fragment lexes as a top-level statement.
    let mut span = first.trim_start().to_owned();
    for line in rest {
        span.push('\n');
        span.push_str(line);
    }

    let Ok(parsed) = parse(&span, Mode::Module.into()) else {
        return CommentMap::new();
    };

    let index = LineIndex::new(&span);
    let tokens: &[Token] = parsed.tokens();
    let mut nesting: i32 = -1;
    let mut boundary_lines: BTreeSet<usize> = BTreeSet::new();
    let mut comment_lines: BTreeMap<usize, String> = BTreeMap::new();

    for (position, token) in tokens.iter().enumerate() {
        match token.kind() {
            TokenKind::Lpar | TokenKind::Lsqb | TokenKind::Lbrace => nesting += 1,
            TokenKind::Rpar | TokenKind::Rsqb | TokenKind::Rbrace => nesting -= 1,
            _ => {}
        }

        if nesting == 0 && token.kind() == TokenKind::Comma {
            boundary_lines.insert(index.line_index(token.start()));
        } else if nesting == -1 && token.kind() == TokenKind::Rpar {
            if let Some(previous) = position.checked_sub(1).and_then(|i| tokens.get(i)) {
                boundary_lines.insert(index.line_index(previous.start()));
            }
        }

        if token.kind() == TokenKind::Comment {
            comment_lines.insert(
                index.line_index(token.start()),
                crate::utils::slice(&span, token.range()).to_owned(),
            );
        }
    }

    boundary_lines
        .iter()
        .enumerate()
        .filter_map(|(arg_index, line)| {
            comment_lines
                .get(line)
                .map(|comment| (arg_index, comment.clone()))
        })
        .collect()
}

/// Shifts recovered comment positions by the rewrite's argument offset.
///
/// Keys are processed from highest to lowest with a position counter; the
/// walk stops as soon as the counter exceeds the key, which leaves comments
/// on leading arguments in place when only trailing arguments were consumed
/// by the rewrite. An entry whose shifted index would be negative belonged to
/// a consumed argument and is dropped.
#[must_use]
pub fn remap_comments(mut comments: CommentMap, arg_offset: i64) -> CommentMap {
    let keys: Vec<usize> = comments.keys().rev().copied().collect();
    for (operation, arg_index) in keys.into_iter().enumerate() {
        if operation > arg_index {
            break;
        }
        if let Some(comment) = comments.remove(&arg_index) {
            let shifted = arg_index as i64 + arg_offset;
            if shifted >= 0 {
                comments.insert(shifted as usize, comment);
            }
        }
    }
    comments
}
