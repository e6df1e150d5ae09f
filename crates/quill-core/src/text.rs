use crate::line::Line;

pub(crate) fn split_lines(text: &str) -> Vec<Line> {
    // `str::split('\n')` preserves trailing empty segments, which matches typical editor
    // line semantics (N newlines => N+1 lines).
    text.split('\n')
        .map(|line| Line::from_text(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Strip control characters (and `'\r'`) from text about to be inserted, keeping `'\t'` and
/// `'\n'`.
///
/// [`Buffer::insert`](crate::Buffer::insert) assumes its input already went through this.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
        .collect()
}
