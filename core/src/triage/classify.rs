/// Width of the fixed timestamp column CI runners prepend to every line,
/// e.g. `2024-03-01T10:22:41.1234567Z `.
pub const TIMESTAMP_WIDTH: usize = 29;

pub const PREFIX_STAGE: &[u8] = b"=== ";
pub const PREFIX_RESULT: &[u8] = b"--- ";
pub const PREFIX_FAIL: &[u8] = b"--- FAIL: ";

const SUBTEST_INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `=== NAME|RUN|PAUSE|CONT  <test>`
    Stage,
    /// `--- PASS|FAIL|SKIP: <test> (<duration>)`
    Result,
    /// A result marker of a sub-test; the returned line has its indent removed.
    SubResult,
    Content,
}

/// Drop the fixed-width timestamp column. This is a shape heuristic, not a
/// timestamp parser: any line with a space at offset 28 loses 29 bytes.
pub fn strip_timestamp(line: &[u8]) -> &[u8] {
    if line.len() > TIMESTAMP_WIDTH && line[TIMESTAMP_WIDTH - 1] == b' ' {
        &line[TIMESTAMP_WIDTH..]
    } else {
        line
    }
}

/// Classify one raw line (no trailing newline) and return it normalized.
pub fn classify_line(raw: &[u8]) -> (LineKind, &[u8]) {
    let line = strip_timestamp(raw);
    if line.starts_with(PREFIX_STAGE) {
        return (LineKind::Stage, line);
    }
    if line.starts_with(PREFIX_RESULT) {
        return (LineKind::Result, line);
    }
    if let Some(result) = strip_subtest_indent(line) {
        return (LineKind::SubResult, result);
    }
    (LineKind::Content, line)
}

// Sub-tests indent their result by four spaces per nesting level.
fn strip_subtest_indent(line: &[u8]) -> Option<&[u8]> {
    let mut rest = line.strip_prefix(SUBTEST_INDENT)?;
    while let Some(next) = rest.strip_prefix(SUBTEST_INDENT) {
        rest = next;
    }
    rest.starts_with(PREFIX_RESULT).then_some(rest)
}

/// Test name of a stage marker: the first token after the stage kind word.
pub fn stage_name(line: &[u8]) -> Option<&[u8]> {
    let rest = line.strip_prefix(PREFIX_STAGE)?;
    let mut tokens = rest
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());
    let _kind = tokens.next()?;
    tokens.next()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultMarker<'a> {
    pub name: &'a [u8],
    pub failed: bool,
}

/// Parse a normalized result line. Returns `None` for malformed markers:
/// fewer than three space-separated tokens, or a status token without `:`.
pub fn parse_result(line: &[u8]) -> Option<ResultMarker<'_>> {
    let mut tokens = line.split(|&b| b == b' ');
    let _dashes = tokens.next()?;
    let status = tokens.next()?;
    let name = tokens.next()?;
    if !status.ends_with(b":") {
        return None;
    }
    Some(ResultMarker {
        name,
        failed: line.starts_with(PREFIX_FAIL),
    })
}
