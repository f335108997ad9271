//! Telegram MarkdownV2 helpers

/// Characters reserved by MarkdownV2 outside of entities
pub const RESERVED_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

pub const ESCAPE_CHAR: char = '\\';

/// Appended to truncated text. Not a reserved character, so it is safe in markup.
pub const ELLIPSIS: &str = "…";

/// Escape every reserved character by prefixing it with a backslash.
/// Use on free-form text (titles, excerpts, error messages), never on link targets.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) || c == ESCAPE_CHAR {
            escaped.push(ESCAPE_CHAR);
        }
        escaped.push(c);
    }

    escaped
}

/// Escape a URL for use as an inline link target, where only `)` and `\` are special
pub fn escape_link_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());

    for c in url.chars() {
        if c == ')' || c == ESCAPE_CHAR {
            escaped.push(ESCAPE_CHAR);
        }
        escaped.push(c);
    }

    escaped
}

/// Shorten text to at most `max_length` characters plus the ellipsis marker.
///
/// Cuts at the last whitespace at or before `max_length`; text without a usable
/// boundary is hard-cut. Text that already fits is returned unchanged.
pub fn truncate(text: &str, max_length: usize) -> String {
    let byte_end = match text.char_indices().nth(max_length) {
        Some((index, _)) => index,
        None => return text.to_string(),
    };

    let head = &text[..byte_end];

    // A boundary right after the limit keeps the whole head
    let cut = if text[byte_end..].starts_with(char::is_whitespace) {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(pos) if pos > 0 => &head[..pos],
            _ => head,
        }
    };

    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Shorten rendered MarkdownV2 to at most `max_length` characters, marker included.
///
/// Whole lines are dropped from the end so no link or bold span is left open.
/// A first line that alone exceeds the limit is hard-cut, never between a
/// backslash and the character it escapes.
pub fn truncate_markup(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let marker_length = ELLIPSIS.chars().count();
    // Room for "\n…" after the kept lines
    let budget = max_length.saturating_sub(marker_length + 1);

    let mut kept = String::new();
    let mut used = 0;
    for (index, line) in text.split('\n').enumerate() {
        let length = line.chars().count() + usize::from(index > 0);
        if used + length > budget {
            break;
        }
        if index > 0 {
            kept.push('\n');
        }
        kept.push_str(line);
        used += length;
    }

    let kept = kept.trim_end_matches('\n');
    if !kept.is_empty() {
        return format!("{}\n{}", kept, ELLIPSIS);
    }

    let mut cut: String = text
        .chars()
        .take(max_length.saturating_sub(marker_length))
        .collect();
    let trailing_escapes = cut.chars().rev().take_while(|c| *c == ESCAPE_CHAR).count();
    if trailing_escapes % 2 == 1 {
        cut.pop();
    }

    format!("{}{}", cut, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_every_reserved_char() {
        let input = "_*[]()~`>#+-=|{}.!";
        let escaped = escape_markdown(input);
        assert_eq!(
            escaped,
            "\\_\\*\\[\\]\\(\\)\\~\\`\\>\\#\\+\\-\\=\\|\\{\\}\\.\\!"
        );
    }

    #[test]
    fn test_escape_leaves_other_chars_alone() {
        let input = "Hello, world: 100% ok? ✓ été @user $5 & <tag> 'quote' \"dq\"";
        assert_eq!(escape_markdown(input), input);
    }

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_mixed_text() {
        assert_eq!(
            escape_markdown("Rust 1.75 (beta) - great!"),
            "Rust 1\\.75 \\(beta\\) \\- great\\!"
        );
    }

    #[test]
    fn test_escape_link_url_only_touches_paren_and_backslash() {
        assert_eq!(
            escape_link_url("https://example.com/a_(b).html?x=1"),
            "https://example.com/a_(b\\).html?x=1"
        );
    }

    #[test]
    fn test_truncate_short_text() {
        assert_eq!(truncate("Short text", 50), "Short text");
    }

    #[test]
    fn test_truncate_exact_length() {
        let text = "Exactly twenty chars";
        assert_eq!(truncate(text, 20), text);
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        let text = "This is a very long text that should be truncated at a word boundary";
        assert_eq!(truncate(text, 30), "This is a very long text that…");
    }

    #[test]
    fn test_truncate_boundary_right_after_limit() {
        assert_eq!(truncate("hello world", 5), "hello…");
    }

    #[test]
    fn test_truncate_no_word_boundary() {
        assert_eq!(truncate("Verylongwordwithoutspaces", 10), "Verylongwo…");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "ééééé ééééé";
        assert_eq!(truncate(text, 7), "ééééé…");
    }

    #[test]
    fn test_truncate_never_exceeds_limit_plus_marker() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(20);
        for max in [0, 1, 5, 17, 64, 255, 1000] {
            let truncated = truncate(&text, max);
            assert!(truncated.chars().count() <= max + ELLIPSIS.chars().count());
        }
    }

    fn open_links(text: &str) -> i64 {
        let mut depth = 0;
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                ESCAPE_CHAR => {
                    chars.next();
                }
                '[' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
        }
        depth
    }

    #[test]
    fn test_truncate_markup_short_text_unchanged() {
        assert_eq!(truncate_markup("*bold* text", 20), "*bold* text");
    }

    #[test]
    fn test_truncate_markup_drops_whole_lines() {
        let text = "1\\. [one](https://a.example/1)\n2\\. [two](https://a.example/2)\n3\\. [three](https://a.example/3)";
        let cut = truncate_markup(text, 70);

        assert_eq!(cut, "1\\. [one](https://a.example/1)\n2\\. [two](https://a.example/2)\n…");
        assert_eq!(open_links(&cut), 0);
    }

    #[test]
    fn test_truncate_markup_keeps_links_closed_for_any_limit() {
        let text = (1..=200)
            .map(|n| format!("{}\\. 📋 Board • [📍 Pin →](https://www.pinterest.com/pin/{}/)", n, n))
            .collect::<Vec<_>>()
            .join("\n");

        for max in [100, 1024, 4096] {
            let cut = truncate_markup(&text, max);
            assert!(cut.chars().count() <= max);
            assert_eq!(open_links(&cut), 0, "limit {}", max);
            assert!(cut.ends_with(ELLIPSIS));
        }
    }

    #[test]
    fn test_truncate_markup_long_single_line() {
        let cut = truncate_markup(&"a".repeat(50), 10);
        assert_eq!(cut, format!("{}{}", "a".repeat(9), ELLIPSIS));
    }

    #[test]
    fn test_truncate_markup_never_splits_an_escape() {
        // Every other char is a backslash: a naive cut at 9 would end on one
        let text = "\\.".repeat(20);
        let cut = truncate_markup(&text, 10);
        let body = cut.trim_end_matches(ELLIPSIS);

        let trailing = body.chars().rev().take_while(|c| *c == ESCAPE_CHAR).count();
        assert_eq!(trailing % 2, 0);
        assert!(cut.chars().count() <= 10);
    }
}
