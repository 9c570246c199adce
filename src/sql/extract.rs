//! SQL extraction
//!
//! Turns a raw model completion into a candidate query. This is the only gate
//! between model output and the warehouse: a textual `SELECT` prefix check,
//! not a parser. `SELECT 1; DROP TABLE t` passes it; the warehouse role must
//! be read-only for that to be harmless.

const FENCE: &str = "```";

/// Rejected completion (does not start with `SELECT` after normalisation)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("completion is not a SELECT statement: {preview:?}")]
pub struct NotASelectError {
    /// First characters of the normalised text, for logs
    pub preview: String,
}

impl NotASelectError {
    fn new(text: &str) -> Self {
        Self {
            preview: text.chars().take(80).collect(),
        }
    }
}

/// Extract a candidate SELECT statement from a model completion
///
/// 1. If the text contains a code fence, keep the first fenced block and drop
///    a leading language tag line (` ```sql `).
/// 2. Trim whitespace.
/// 3. Require a case-insensitive `SELECT` prefix.
pub fn extract_sql(raw: &str) -> Result<String, NotASelectError> {
    let body = match raw.split(FENCE).nth(1) {
        Some(block) => strip_language_tag(block),
        None => raw,
    };

    let candidate = body.trim();
    if is_select(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(NotASelectError::new(candidate))
    }
}

/// Case-insensitive `SELECT` prefix check
pub fn is_select(text: &str) -> bool {
    text.get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("select"))
        .unwrap_or(false)
}

/// Drop the first line of a fenced block when it is a bare language tag
fn strip_language_tag(block: &str) -> &str {
    let Some((first, rest)) = block.split_once('\n') else {
        return block;
    };

    let tag = first.trim();
    let is_tag = !tag.is_empty()
        && !tag.eq_ignore_ascii_case("select")
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'));

    if is_tag {
        rest
    } else {
        block
    }
}
