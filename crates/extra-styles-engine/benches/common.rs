// Each bench target compiles this module separately and uses only part of it.

/// `size` copies of a note mixing styled spans, plain code and a fence.
#[allow(dead_code)]
pub fn styled_note(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with `_underlined_` and `^super^` content.\n\n- Bullet with **`\\sub/`** text\n  - Nested `plain code` item\n- Another ==`!hidden!`== item\n\n```rust\nfn example() {\n    println!(\"`_not styled_`\");\n}\n```\n\n";
    base.repeat(size)
}

/// A window of roughly `lines` lines starting at the top of `content`, as a
/// viewport would show.
#[allow(dead_code)]
pub fn first_lines(content: &str, lines: usize) -> usize {
    content
        .match_indices('\n')
        .nth(lines.saturating_sub(1))
        .map_or(content.len(), |(i, _)| i + 1)
}
