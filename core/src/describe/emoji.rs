//! Names for emoji that show up in text fields and image labels.

const NAMES: &[(&str, &str)] = &[
    ("😀", "grinning face"),
    ("😃", "smiling face with open mouth"),
    ("😊", "smiling face"),
    ("😢", "crying face"),
    ("😡", "angry face"),
    ("❤", "red heart"),
    ("👍", "thumbs up"),
    ("👎", "thumbs down"),
    ("⭐", "star"),
    ("🐱", "cat face"),
    ("🐶", "dog face"),
    ("🎉", "party popper"),
    ("🔥", "fire"),
    ("✅", "check mark"),
    ("❌", "cross mark"),
    ("🚀", "rocket"),
    ("🌈", "rainbow"),
    ("☀", "sun"),
    ("🌙", "moon"),
    ("🎵", "musical note"),
];

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Name of a single emoji literal.
pub fn emoji_name(value: &str) -> Option<&'static str> {
    let bare: String = value
        .trim()
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR)
        .collect();
    NAMES
        .iter()
        .find(|(emoji, _)| *emoji == bare)
        .map(|(_, name)| *name)
}

/// Replace every known emoji inside a longer string with its name.
pub fn replace_emoji(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    for c in value.chars().filter(|c| *c != VARIATION_SELECTOR) {
        let mut buf = [0u8; 4];
        match emoji_name(c.encode_utf8(&mut buf)) {
            Some(name) => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(name);
                out.push(' ');
            }
            None => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_emoji() {
        assert_eq!(emoji_name("🚀"), Some("rocket"));
        assert_eq!(emoji_name("❤\u{FE0F}"), Some("red heart"));
        assert_eq!(emoji_name("rocket"), None);
    }

    #[test]
    fn test_embedded_emoji() {
        assert_eq!(replace_emoji("go🚀now"), "go rocket now");
        assert_eq!(replace_emoji("plain"), "plain");
    }
}
