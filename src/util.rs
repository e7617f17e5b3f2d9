// ABOUTME: Utility functions for filename sanitizing and display helpers
// ABOUTME: Provides consistent path segments for exported docs and pages

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const MAX_SEGMENT_CHARS: usize = 100;

/// Turns an arbitrary title into a lowercase, dash-separated path segment.
pub fn sanitize_filename(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut dashed = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        let c = if FORBIDDEN.contains(&c) || c.is_control() || c.is_whitespace() || c == '_' {
            '-'
        } else {
            c
        };
        if c == '-' && dashed.ends_with('-') {
            continue;
        }
        dashed.push(c);
    }

    let truncated: String = dashed
        .trim_matches('-')
        .chars()
        .take(MAX_SEGMENT_CHARS)
        .collect();
    let segment = truncated.trim_end_matches('-');

    // "." and ".." would resolve outside the intended directory
    if segment.is_empty() || segment.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        segment.to_string()
    }
}

/// Shows enough of a token to recognise it without leaking it.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    // Find a valid UTF-8 boundary at or before max_chars
    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}
