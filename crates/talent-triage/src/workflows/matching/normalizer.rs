fn is_token_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '+' | '.' | '#' | '/' | '-')
}

/// Lower-case the text, blank out anything outside `[a-z0-9+.#/-]`, and split on whitespace.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|ch| if is_token_char(ch) { ch } else { ' ' })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}
