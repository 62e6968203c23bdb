//! Markdown escaping utilities.

/// Escape characters that the target renderer's Markdown dialect treats as
/// formatting.
///
/// # Examples
///
/// ```
/// use folio::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_markdown("[link]"), "\\[link\\]");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\\' | '*' | '_' | '[' | ']' | '`' => {
                result.push('\\');
                result.push(c);
            }
            '#' if at_line_start => result.push_str("\\#"),
            '!' if chars.peek() == Some(&'[') => result.push_str("\\!"),
            _ => result.push(c),
        }
        at_line_start = c == '\n';
    }

    result
}

/// Collapse runs of HTML whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Smallest backtick run (at least 1) that does not occur in `content`.
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run + 1
}
