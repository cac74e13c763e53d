use ruff_text_size::{TextRange, TextSize};

/// A utility struct to convert byte offsets to line numbers.
///
/// The AST parser works with byte offsets, but splicing happens on whole
/// lines, so every rewrite needs its span translated both ways.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Byte offset of the start of a 1-indexed line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line.saturating_sub(1).min(self.line_starts.len() - 1)]
    }
}

/// Slices a source string by a parser byte range.
#[must_use]
pub fn slice(source: &str, range: TextRange) -> &str {
    &source[range.start().to_usize()..range.end().to_usize()]
}

/// Matches a file name against a shell-style wildcard pattern.
///
/// Only `*` is supported (any run of characters, including none); everything
/// else matches literally. This covers patterns like `test_*.py` without
/// pulling in a full glob engine.
#[must_use]
pub fn matches_file_pattern(name: &str, pattern: &str) -> bool {
    fn matches(name: &[u8], pattern: &[u8]) -> bool {
        match pattern.split_first() {
            None => name.is_empty(),
            Some((b'*', rest)) => (0..=name.len()).any(|skip| matches(&name[skip..], rest)),
            Some((expected, rest)) => name
                .split_first()
                .is_some_and(|(actual, tail)| actual == expected && matches(tail, rest)),
        }
    }
    matches(name.as_bytes(), pattern.as_bytes())
}

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
#[must_use]
pub fn normalize_display_path(path: &std::path::Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_maps_offsets() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_index(TextSize::new(0)), 1);
        assert_eq!(index.line_index(TextSize::new(2)), 2);
        assert_eq!(index.line_index(TextSize::new(3)), 2);
        assert_eq!(index.line_index(TextSize::new(5)), 3);
        assert_eq!(index.line_index(TextSize::new(6)), 4);
    }

    #[test]
    fn test_line_start() {
        let index = LineIndex::new("a\nbc\nd");
        assert_eq!(index.line_start(1), 0);
        assert_eq!(index.line_start(2), 2);
        assert_eq!(index.line_start(3), 5);
    }

    #[test]
    fn test_matches_file_pattern() {
        assert!(matches_file_pattern("test_core.py", "test_*.py"));
        assert!(matches_file_pattern("test_.py", "test_*.py"));
        assert!(!matches_file_pattern("core_test.py", "test_*.py"));
        assert!(!matches_file_pattern("test_core.pyc", "test_*.py"));
        assert!(matches_file_pattern("anything", "*"));
        assert!(matches_file_pattern("a_b_c.py", "*_b_*.py"));
        assert!(!matches_file_pattern("abc.py", "abc"));
    }
}
