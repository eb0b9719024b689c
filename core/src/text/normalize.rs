//! Turns raw field and label text into words a speech engine reads well.
//!
//! Rules run in a fixed order and the first one that produces a result wins,
//! except for the digit substitution which always runs on whatever is left.
//! The order is what separates short ambiguous strings (`"e"`, `"^"`, `"#"`)
//! from longer expressions that contain them.

/// Whole-string forms that must not be split character by character.
const SPECIAL_FORMS: &[(&str, &str)] = &[
    ("10^", "10 to the power of"),
    ("e^", "e to the power of"),
    ("-x", "negative"),
    ("√½", "square root of one half"),
    ("1/2", "one half"),
];

/// Bare tokens rewritten only when they sit inside a longer phrase.
const CONTEXTUAL: &[(&str, &str)] = &[("#", "number"), ("&", "and"), ("%", "percent")];

/// Function-call prefixes; the trailing `)` is dropped.
const FUNCTIONS: &[(&str, &str)] = &[
    ("asin(", "arc sine of"),
    ("acos(", "arc cosine of"),
    ("atan(", "arc tangent of"),
    ("sin(", "sine of"),
    ("cos(", "cosine of"),
    ("tan(", "tangent of"),
    ("log10(", "log base 10 of"),
    ("ln(", "natural log of"),
    ("abs(", "absolute value of"),
    ("sqrt(", "square root of"),
    ("exp(", "e to the power of"),
    ("round(", "round"),
    ("floor(", "round down"),
    ("ceil(", "round up"),
];

/// Exact symbols. Longer symbols precede any shorter one they start with.
const SYMBOLS: &[(&str, &str)] = &[
    ("<=", "less than or equal"),
    (">=", "greater than or equal"),
    ("!=", "not equal"),
    ("==", "equals"),
    ("&&", "and"),
    ("||", "or"),
    ("**", "to the power of"),
    ("≤", "less than or equal"),
    ("≥", "greater than or equal"),
    ("≠", "not equal"),
    ("<", "less than"),
    (">", "greater than"),
    ("=", "equals"),
    ("!", "not"),
    ("+", "plus"),
    ("-", "minus"),
    ("−", "minus"),
    ("×", "times"),
    ("*", "times"),
    ("÷", "divided by"),
    ("/", "divided by"),
    ("^", "to the power of"),
    ("%", "percent"),
    ("#", "number"),
    ("√", "square root"),
    ("∞", "infinity"),
    ("π", "pi"),
    ("φ", "golden ratio"),
    ("α", "alpha"),
    ("β", "beta"),
    ("γ", "gamma"),
    ("δ", "delta"),
    ("θ", "theta"),
    ("λ", "lambda"),
    ("μ", "mu"),
    ("σ", "sigma"),
    ("ω", "omega"),
];

const SUPERSCRIPTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUBSCRIPTS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

/// Remove invisible directional-control characters.
pub fn strip_bidi(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{061C}' | '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
            )
        })
        .collect()
}

/// Convert a short raw string into speakable text.
pub fn normalize(raw: &str) -> String {
    let cleaned = strip_bidi(raw);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(phrase) = special_form(trimmed) {
        return phrase.to_string();
    }
    if let Some(phrase) = contextual(trimmed) {
        return phrase;
    }
    if let Some(phrase) = function_call(trimmed) {
        return phrase;
    }
    if let Some(phrase) = symbol(trimmed) {
        return phrase;
    }
    collapse_spaces(&digit_scripts(trimmed))
}

fn special_form(text: &str) -> Option<&'static str> {
    SPECIAL_FORMS
        .iter()
        .find(|(form, _)| *form == text)
        .map(|(_, phrase)| *phrase)
}

fn contextual(text: &str) -> Option<String> {
    if !text.contains(char::is_whitespace) {
        return None;
    }
    let rewritten = text
        .split_whitespace()
        .map(|token| {
            CONTEXTUAL
                .iter()
                .find(|(sym, _)| *sym == token)
                .map_or(token, |(_, word)| *word)
        })
        .collect::<Vec<_>>()
        .join(" ");
    (rewritten != collapse_spaces(text)).then(|| collapse_spaces(&digit_scripts(&rewritten)))
}

fn function_call(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let (prefix, words) = FUNCTIONS.iter().find(|(p, _)| lower.starts_with(p))?;
    let inner = text[prefix.len()..].trim();
    let inner = inner.strip_suffix(')').unwrap_or(inner).trim();
    if inner.is_empty() {
        return Some((*words).to_string());
    }
    let argument = match symbol(inner) {
        Some(word) => word,
        None => digit_scripts(inner),
    };
    Some(collapse_spaces(&format!("{} {}", words, argument)))
}

fn symbol(text: &str) -> Option<String> {
    for (sym, word) in SYMBOLS {
        if text == *sym {
            return Some((*word).to_string());
        }
        // "<= 3" reads as "less than or equal 3"; the table order keeps "<" from
        // claiming the "<" of "<=".
        if let Some(rest) = text.strip_prefix(sym) {
            if rest.starts_with(char::is_whitespace) {
                let rest = digit_scripts(rest.trim());
                return Some(collapse_spaces(&format!("{} {}", word, rest)));
            }
        }
    }
    None
}

fn digit_scripts(text: &str) -> String {
    if !text
        .chars()
        .any(|c| SUPERSCRIPTS.contains(&c) || SUBSCRIPTS.contains(&c))
    {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(d) = script_digit(&SUPERSCRIPTS, c) {
            let mut digits = d.to_string();
            while let Some(next) = chars.peek().and_then(|n| script_digit(&SUPERSCRIPTS, *n)) {
                digits.push(next);
                chars.next();
            }
            match digits.as_str() {
                "2" => out.push_str(" squared "),
                "3" => out.push_str(" cubed "),
                _ => {
                    out.push_str(" to the power of ");
                    out.push_str(&digits);
                    out.push(' ');
                }
            }
        } else if let Some(d) = script_digit(&SUBSCRIPTS, c) {
            let mut digits = d.to_string();
            while let Some(next) = chars.peek().and_then(|n| script_digit(&SUBSCRIPTS, *n)) {
                digits.push(next);
                chars.next();
            }
            out.push_str(" base ");
            out.push_str(&digits);
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

fn script_digit(table: &[char; 10], c: char) -> Option<char> {
    table
        .iter()
        .position(|&s| s == c)
        .and_then(|i| char::from_digit(i as u32, 10))
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
