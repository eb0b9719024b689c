//! Colour names for hex colour values.
//!
//! Known swatches resolve through a table; anything else is classified by
//! comparing channel magnitudes.

/// Swatches of the standard colour picker plus common web colours
const NAMED: &[(&str, &str)] = &[
    ("#ffffff", "white"),
    ("#000000", "black"),
    ("#ff0000", "red"),
    ("#00ff00", "lime green"),
    ("#0000ff", "blue"),
    ("#ffff00", "yellow"),
    ("#00ffff", "cyan"),
    ("#ff00ff", "magenta"),
    ("#808080", "gray"),
    ("#c0c0c0", "silver"),
    ("#800000", "maroon"),
    ("#808000", "olive"),
    ("#008000", "green"),
    ("#800080", "purple"),
    ("#008080", "teal"),
    ("#000080", "navy"),
    ("#ffa500", "orange"),
    ("#a52a2a", "brown"),
    ("#ffc0cb", "pink"),
    ("#ffcc99", "peach"),
    ("#cc0000", "dark red"),
    ("#ff6666", "light red"),
    ("#ffcc00", "gold"),
    ("#99cc00", "yellow green"),
    ("#33cc33", "medium green"),
    ("#3366ff", "royal blue"),
    ("#9999ff", "lavender"),
    ("#cc33cc", "orchid"),
    ("#666666", "dim gray"),
    ("#cccccc", "light gray"),
];

/// Tunable thresholds of the hue heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourHeuristic {
    /// A channel this far above the next one names the colour alone
    pub dominance_gap: u8,
    /// Channels this close count as equal
    pub tolerance: u8,
}

impl Default for ColourHeuristic {
    fn default() -> Self {
        Self {
            dominance_gap: 50,
            tolerance: 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn family(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

/// Parse `#rgb` or `#rrggbb` (case-insensitive).
pub fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

pub fn is_hex_colour(value: &str) -> bool {
    parse_hex(value).is_some()
}

/// Speakable name for a hex colour; non-colours come back unchanged.
pub fn colour_name(value: &str) -> String {
    colour_name_with(value, ColourHeuristic::default())
}

pub fn colour_name_with(value: &str, heuristic: ColourHeuristic) -> String {
    let Some((r, g, b)) = parse_hex(value) else {
        return value.trim().to_string();
    };
    let canonical = format!("#{:02x}{:02x}{:02x}", r, g, b);
    if let Some((_, name)) = NAMED.iter().find(|(hex, _)| *hex == canonical) {
        return (*name).to_string();
    }
    classify(r, g, b, heuristic).to_string()
}

fn classify(r: u8, g: u8, b: u8, h: ColourHeuristic) -> &'static str {
    let mut channels = [(Channel::Red, r), (Channel::Green, g), (Channel::Blue, b)];
    channels.sort_by(|a, b| b.1.cmp(&a.1));
    let [(dom, hi), (second, mid), (_, lo)] = channels;

    if hi - lo <= h.tolerance {
        return grey_tier(hi / 3 + mid / 3 + lo / 3);
    }
    if hi - mid > h.dominance_gap {
        return dom.family();
    }
    if mid - lo <= h.dominance_gap {
        return match dom {
            Channel::Red => "reddish gray",
            Channel::Green => "greenish gray",
            Channel::Blue => "bluish gray",
        };
    }
    if hi - mid <= h.tolerance {
        return match (dom, second) {
            (Channel::Red, Channel::Green) | (Channel::Green, Channel::Red) => "yellow",
            (Channel::Green, Channel::Blue) | (Channel::Blue, Channel::Green) => "cyan",
            _ => "magenta",
        };
    }
    match (dom, second) {
        (Channel::Red, Channel::Green) => "reddish orange",
        (Channel::Green, Channel::Red) => "yellowish green",
        (Channel::Green, Channel::Blue) => "bluish green",
        (Channel::Blue, Channel::Green) => "greenish blue",
        (Channel::Red, Channel::Blue) => "reddish purple",
        _ => "bluish purple",
    }
}

fn grey_tier(brightness: u8) -> &'static str {
    match brightness {
        245..=u8::MAX => "white",
        190..=244 => "light gray",
        100..=189 => "gray",
        30..=99 => "dark gray",
        _ => "black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_table() {
        assert_eq!(colour_name("#FF0000"), "red");
        assert_eq!(colour_name("#f00"), "red");
        assert_eq!(colour_name("#ffa500"), "orange");
    }

    #[test]
    fn test_heuristic_families() {
        assert_eq!(colour_name("#e01010"), "red");
        assert_eq!(colour_name("#e0b010"), "reddish orange");
        assert_eq!(colour_name("#10b0e0"), "greenish blue");
        assert_eq!(colour_name("#10e0b0"), "bluish green");
        assert_eq!(colour_name("#e0e010"), "yellow");
    }

    #[test]
    fn test_grey_tiers() {
        assert_eq!(colour_name("#f8f8f8"), "white");
        assert_eq!(colour_name("#d0d0d0"), "light gray");
        assert_eq!(colour_name("#707070"), "gray");
        assert_eq!(colour_name("#303030"), "dark gray");
        assert_eq!(colour_name("#101010"), "black");
    }

    #[test]
    fn test_not_a_colour() {
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("ff0000"), None);
        assert_eq!(colour_name(" banana "), "banana");
    }

    #[test]
    fn test_tunable_gap() {
        let wide = ColourHeuristic {
            dominance_gap: 250,
            tolerance: 12,
        };
        // no single channel leads by 250, and the other two are close
        assert_eq!(colour_name_with("#e01010", wide), "reddish gray");
    }
}
