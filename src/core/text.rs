//! Text helpers shared by the extractors: whitespace collapsing, input bounding,
//! clause windows.

/// Collapses every whitespace run into a single space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
pub fn bound_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Largest char boundary `<= idx`.
pub fn floor_char_boundary(text: &str, idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    let mut idx = idx;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Trims a captured span: whitespace collapsed, trailing separators and a dangling
/// "e" connective removed.
pub fn clean_span(text: &str) -> String {
    let mut cleaned = collapse_whitespace(text);
    loop {
        let before = cleaned.len();
        cleaned = cleaned
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '.' | '-' | '–'))
            .to_string();
        if let Some(stripped) = cleaned.strip_suffix(" e").or_else(|| cleaned.strip_suffix(" E")) {
            cleaned = stripped.to_string();
        }
        if cleaned.len() == before {
            break;
        }
    }
    cleaned
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '–'))
        .to_string()
}

/// Applies the min/max character bounds used for every extracted field.
pub fn within_bounds(value: &str, min_chars: usize, max_chars: usize) -> bool {
    let len = value.chars().count();
    len >= min_chars && len <= max_chars
}

/// Splits content into non-empty trimmed lines.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Groups the non-empty trimmed lines into blank-line separated blocks.
pub fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// First `max_chars` characters followed by "..." when the text is longer.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let (head, truncated) = bound_chars(text, max_chars);
    if truncated {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}
