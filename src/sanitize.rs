// src/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace('\u{a0}', " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop `<...>` markup and collapse whitespace. Captured cells may hold innerHTML.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of one captured cell.
pub fn clean_cell(raw: &str) -> String {
    strip_tags(normalize_entities(raw))
}

/// Lowercase, `[a-z0-9]` only. "Miss Fortune" → "missfortune".
pub fn slug(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Read a metric cell like "52,3 %", "1 204" or "4.1%".
/// Everything except digits, '.' and ',' is discarded; the first ',' is a decimal point.
/// `None` for an empty or unreadable cell, which callers treat as a missing field.
pub fn parse_metric(txt: &str) -> Option<f64> {
    let kept: String = normalize_entities(txt)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if kept.is_empty() {
        return None;
    }
    let s = kept.replacen(',', ".", 1);
    // Longest parseable prefix, e.g. "1.2.3" → 1.2
    let mut end = s.len();
    while end > 0 {
        if let Ok(v) = s[..end].parse::<f64>() {
            return v.is_finite().then_some(v);
        }
        end -= 1;
    }
    None
}

/// Games column: a metric rounded to the nearest whole game, never negative.
pub fn parse_games(txt: &str) -> Option<u64> {
    parse_metric(txt).map(|v| v.round().max(0.0) as u64)
}
