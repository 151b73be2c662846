//! Completion post-processing.
//!
//! The prompt forbids markdown, but models wrap SQL in code fences anyway.
//! Raw completions are cleaned of fence markers before classification and
//! execution.

/// Strips markdown code-fence markers from a completion and trims
/// surrounding whitespace.
///
/// Removes every literal ```` ```sql ```` and ```` ``` ```` marker; the
/// language-tagged form is removed first so a bare `sql` token is never
/// left behind.
pub fn strip_code_fences(completion: &str) -> String {
    completion
        .replace("```sql", "")
        .replace("```", "")
        .trim()
        .to_string()
}
