//! Source-level splicing of rewritten calls.
//!
//! The patcher renders each rewrite's replacement text and queues it as an
//! edit against the call's original line range. All of a pass's edits are
//! applied in one sweep over the original line list, so line-number drift
//! between rewrites never needs re-splitting the document.

use crate::comments::{recover_comments, remap_comments, CommentMap};
use crate::rewrite::Rewrite;
use crate::utils::LineIndex;
use ruff_text_size::{Ranged, TextSize};

/// Indentation step for multi-line renders, matching the four-space style of
/// the test sources this tool targets.
const INDENT_WIDTH: usize = 4;

/// A pending replacement of an inclusive, 1-indexed line range.
#[derive(Debug)]
struct LineEdit {
    start_line: usize,
    end_line: usize,
    replacement: String,
}

/// Applies a pass's rewrites to the source text by line-range splicing.
pub struct SourcePatcher<'a> {
    source: &'a str,
    line_index: &'a LineIndex,
    lines: Vec<&'a str>,
    edits: Vec<LineEdit>,
}

impl<'a> SourcePatcher<'a> {
    /// Creates a patcher over the pass's input source.
    #[must_use]
    pub fn new(source: &'a str, line_index: &'a LineIndex) -> Self {
        Self {
            source,
            line_index,
            lines: source.lines().collect(),
            edits: Vec::new(),
        }
    }

    /// Renders `rewrite` and queues its splice.
    ///
    /// Returns `false` without queuing anything when the rewrite cannot be
    /// spliced safely this pass: either its span overlaps an edit already
    /// queued (a rewritable call nested inside another rewritten call, left
    /// for the next fixpoint pass to reparse), or the call shares its first
    /// or last line with other code that a whole-line splice would destroy.
    pub fn push(&mut self, rewrite: &Rewrite<'_>) -> bool {
        let range = rewrite.call.range();
        let start_line = self.line_index.line_index(range.start());
        // The range's end points just past the closing parenthesis; step back
        // one byte so the lookup lands on the final line itself.
        let end_line = self.line_index.line_index(range.end() - TextSize::new(1));

        if self
            .edits
            .iter()
            .any(|edit| edit.start_line <= end_line && start_line <= edit.end_line)
        {
            return false;
        }

        // Splicing replaces whole lines, so the call must own them: nothing
        // but indentation before it, nothing but a trailing comment after it.
        let column = range.start().to_usize() - self.line_index.line_start(start_line);
        if !self.lines[start_line - 1][..column]
            .chars()
            .all(char::is_whitespace)
        {
            return false;
        }
        let end_column = range.end().to_usize() - self.line_index.line_start(end_line);
        let trailing = self.lines[end_line - 1][end_column..].trim_start();
        if !(trailing.is_empty() || trailing.starts_with('#')) {
            return false;
        }

        let span = &self.lines[start_line - 1..end_line];
        let comments = remap_comments(recover_comments(span), rewrite.arg_offset());
        let multi_line = end_line > start_line;
        let replacement = render_call(rewrite, self.source, column, multi_line, &comments);

        self.edits.push(LineEdit {
            start_line,
            end_line,
            replacement,
        });
        true
    }

    /// Applies all queued edits in one pass and returns the new source.
    ///
    /// With no edits the input is returned byte-identically.
    #[must_use]
    pub fn finish(self) -> String {
        if self.edits.is_empty() {
            return self.source.to_owned();
        }

        let mut edits = self.edits;
        edits.sort_by_key(|edit| edit.start_line);

        let mut output = String::with_capacity(self.source.len());
        let mut next_line = 1usize;
        for edit in &edits {
            for line in &self.lines[next_line - 1..edit.start_line - 1] {
                output.push_str(line);
                output.push('\n');
            }
            output.push_str(&edit.replacement);
            output.push('\n');
            next_line = edit.end_line + 1;
        }
        for line in &self.lines[next_line - 1..] {
            output.push_str(line);
            output.push('\n');
        }

        if !self.source.ends_with('\n') {
            output.pop();
        }
        output
    }
}

/// Renders the replacement call, matching the original's single- or
/// multi-line layout.
fn render_call(
    rewrite: &Rewrite<'_>,
    source: &str,
    column: usize,
    multi_line: bool,
    comments: &CommentMap,
) -> String {
    let indent = " ".repeat(column);
    let receiver = rewrite.receiver(source);
    let arguments = rewrite.argument_texts(source);

    if !multi_line {
        let mut line = format!(
            "{indent}{receiver}.{}({})",
            rewrite.target,
            arguments.join(", ")
        );
        if comments.len() == 1 {
            if let Some(comment) = comments.values().next() {
                line.push(' ');
                line.push_str(comment);
            }
        }
        return line;
    }

    let argument_indent = " ".repeat(column + INDENT_WIDTH);
    let mut rendered = format!("{indent}{receiver}.{}(", rewrite.target);
    let total = arguments.len();
    for (position, argument) in arguments.iter().enumerate() {
        rendered.push('\n');
        rendered.push_str(&argument_indent);
        rendered.push_str(argument);
        if position + 1 != total {
            rendered.push(',');
        }
        if let Some(comment) = comments.get(&position) {
            rendered.push(' ');
            rendered.push_str(comment);
        }
    }
    rendered.push('\n');
    rendered.push_str(&indent);
    rendered.push(')');
    rendered
}
