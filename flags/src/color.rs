//! Color flag values in hexadecimal or RGB(A) notation.

use std::any::Any;
use std::fmt;

use crate::error::ValueError;
use crate::value::FlagValue;

/// Help text listing the notations [`ColorString`] accepts. Suitable for
/// [`FlagSet::add_usage_section`](crate::FlagSet::add_usage_section).
pub const COLOR_FORMATS_HELP: &str = "- Hexadecimal: \"#234\", \"#234F\", \"#332270\", \"#A8B9CAF0\".\n\
- Explicit RGB triplets: \"rgb(9, 44, 128)\", \"RGB(4, 9, 5)\", \"rgb(12;0;24)\". The values fall between 0 and 255.\n\
- Explicit RGBA quadruplets: like RGB, but using the \"rgba\" or \"RGBA\" descriptor and four values instead of three (e.g. \"rgba(0, 255, 0, 128)\").\n\
- Implicit RGB(A): triplets or quadruplets for RGB(A) can also be passed without the descriptor, without braces, and with any punctuation symbol as a separator in general. This means that \"[255;0;128]\", \"80, 90, 60\", \"{0, 0, 255, 128}\", \"(99:98:97)\" and \"100.100.200.200\" are all weird but allowed.";

const BRACE_PAIRS: [(char, char); 5] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>'), ('«', '»')];

const CONTROL_NAMES: [&str; 32] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "TAB", "LF", "VT", "FF", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC",
    "FS", "GS", "RS", "US",
];

/// Printable name for `c`: the ASCII mnemonic for control characters, the
/// character itself otherwise.
pub fn char_name(c: char) -> String {
    match c {
        '\u{7f}' => "DEL".to_string(),
        c if (c as u32) < 32 => CONTROL_NAMES[c as usize].to_string(),
        c => c.to_string(),
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// An opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A color flag value.
///
/// See [`COLOR_FORMATS_HELP`] for the accepted notations.
///
/// # Examples
///
/// ```
/// use flagkit_flags::{ColorString, FlagValue, Rgba};
///
/// let mut color = ColorString::new(0, 0, 0);
/// color.parse_from_arg("#332270").unwrap();
/// assert_eq!(color.rgba(), Rgba::opaque(0x33, 0x22, 0x70));
///
/// color.parse_from_arg("{0, 0, 255, 128}").unwrap();
/// assert_eq!(color.to_string(), "rgba(0, 0, 255, 128)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorString {
    rgba: Rgba,
}

impl ColorString {
    /// Creates an opaque color default.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgba: Rgba::opaque(r, g, b),
        }
    }

    /// The current color.
    pub fn rgba(&self) -> Rgba {
        self.rgba
    }

    /// Replaces the current color.
    pub fn set_rgba(&mut self, rgba: Rgba) {
        self.rgba = rgba;
    }
}

impl fmt::Display for ColorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgba { r, g, b, a } = self.rgba;
        if a == 255 {
            write!(f, "rgb({r}, {g}, {b})")
        } else {
            write!(f, "rgba({r}, {g}, {b}, {a})")
        }
    }
}

impl FlagValue for ColorString {
    fn parse_from_arg(&mut self, arg: &str) -> Result<(), ValueError> {
        self.rgba = parse_color(arg)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Parses any notation listed in [`COLOR_FORMATS_HELP`].
///
/// # Errors
///
/// Returns a [`ValueError`] naming the first problem found.
pub fn parse_color(arg: &str) -> Result<Rgba, ValueError> {
    let arg = arg.trim();
    if let Some(digits) = arg.strip_prefix('#') {
        return parse_hex(digits);
    }

    let (body, needs_braces, min_components, max_components) =
        if let Some(rest) = arg.strip_prefix("rgba").or_else(|| arg.strip_prefix("RGBA")) {
            (rest.trim(), true, 4, 4)
        } else if let Some(rest) = arg.strip_prefix("rgb").or_else(|| arg.strip_prefix("RGB")) {
            (rest.trim(), true, 3, 3)
        } else {
            (arg, false, 3, 4)
        };

    let (body, has_braces) = strip_braces(body);
    if needs_braces && !has_braces {
        return Err(ValueError::MissingBraces);
    }
    if body.len() < min_components * 2 - 1 {
        return Err(ValueError::IncompleteColor);
    }
    if !body.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValueError::InvalidColorStart);
    }

    let mut components = [0u32; 4];
    let mut count = 0;
    let mut in_separator = true;
    for c in body.chars() {
        if let Some(digit) = c.to_digit(10) {
            if in_separator {
                count += 1;
                if count > max_components {
                    return Err(ValueError::TooManyComponents {
                        max: max_components,
                    });
                }
            }
            in_separator = false;
            let component = &mut components[count - 1];
            *component = *component * 10 + digit;
            if *component > 255 {
                return Err(ValueError::ComponentOverflow);
            }
        } else {
            in_separator = true;
            if c != ' ' && !c.is_ascii_punctuation() {
                return Err(ValueError::InvalidSeparator { name: char_name(c) });
            }
        }
    }

    if count < min_components {
        return Err(if min_components < max_components {
            ValueError::TooFewComponents {
                min: min_components,
            }
        } else {
            ValueError::WrongComponentCount {
                expected: min_components,
            }
        });
    }

    let [r, g, b, a] = components.map(|c| c as u8);
    Ok(Rgba {
        r,
        g,
        b,
        a: if count == 4 { a } else { 255 },
    })
}

/// Removes one pair of matching braces around `body`, if present.
fn strip_braces(body: &str) -> (&str, bool) {
    for (left, right) in BRACE_PAIRS {
        if let Some(inner) = body.strip_prefix(left).and_then(|s| s.strip_suffix(right)) {
            return (inner.trim(), true);
        }
    }
    (body, false)
}

fn parse_hex(digits: &str) -> Result<Rgba, ValueError> {
    let values = digits
        .chars()
        .map(|c| {
            c.to_digit(16).map(|v| v as u8).ok_or_else(|| ValueError::InvalidHexChar {
                name: char_name(c),
                code_point: c as u32,
            })
        })
        .collect::<Result<Vec<u8>, _>>();

    let expand = |v: u8| (v << 4) | v;
    let pair = |hi: u8, lo: u8| (hi << 4) | lo;
    match digits.chars().count() {
        3 => {
            let v = values?;
            Ok(Rgba::opaque(expand(v[0]), expand(v[1]), expand(v[2])))
        }
        4 => {
            let v = values?;
            Ok(Rgba {
                r: expand(v[0]),
                g: expand(v[1]),
                b: expand(v[2]),
                a: expand(v[3]),
            })
        }
        6 => {
            let v = values?;
            Ok(Rgba::opaque(pair(v[0], v[1]), pair(v[2], v[3]), pair(v[4], v[5])))
        }
        8 => {
            let v = values?;
            Ok(Rgba {
                r: pair(v[0], v[1]),
                g: pair(v[2], v[3]),
                b: pair(v[4], v[5]),
                a: pair(v[6], v[7]),
            })
        }
        _ => Err(ValueError::InvalidHexLength),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    #[test]
    fn test_parse_hex_notations() {
        assert_eq!(parse_color("#234").unwrap(), rgba(0x22, 0x33, 0x44, 255));
        assert_eq!(parse_color("#234F").unwrap(), rgba(0x22, 0x33, 0x44, 0xFF));
        assert_eq!(parse_color("#332270").unwrap(), rgba(0x33, 0x22, 0x70, 255));
        assert_eq!(parse_color("#A8B9CAF0").unwrap(), rgba(0xA8, 0xB9, 0xCA, 0xF0));
        assert_eq!(parse_color("  #a8b9ca ").unwrap(), rgba(0xA8, 0xB9, 0xCA, 255));
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(parse_color("#12345"), Err(ValueError::InvalidHexLength));
        assert_eq!(
            parse_color("#12G"),
            Err(ValueError::InvalidHexChar {
                name: "G".into(),
                code_point: 71
            })
        );
    }

    #[test]
    fn test_parse_explicit_rgb_and_rgba() {
        assert_eq!(parse_color("rgb(9, 44, 128)").unwrap(), rgba(9, 44, 128, 255));
        assert_eq!(parse_color("RGB(4, 9, 5)").unwrap(), rgba(4, 9, 5, 255));
        assert_eq!(parse_color("rgb(12;0;24)").unwrap(), rgba(12, 0, 24, 255));
        assert_eq!(parse_color("rgba(0, 255, 0, 128)").unwrap(), rgba(0, 255, 0, 128));
    }

    #[test]
    fn test_parse_explicit_errors() {
        assert_eq!(parse_color("rgb 1, 2, 3"), Err(ValueError::MissingBraces));
        assert_eq!(
            parse_color("rgb(1, 2, 3, 4)"),
            Err(ValueError::TooManyComponents { max: 3 })
        );
        assert_eq!(
            parse_color("rgba(1, 2, 3)"),
            Err(ValueError::WrongComponentCount { expected: 4 })
        );
    }

    #[test]
    fn test_parse_implicit_notations() {
        assert_eq!(parse_color("[255;0;128]").unwrap(), rgba(255, 0, 128, 255));
        assert_eq!(parse_color("80, 90, 60").unwrap(), rgba(80, 90, 60, 255));
        assert_eq!(parse_color("{0, 0, 255, 128}").unwrap(), rgba(0, 0, 255, 128));
        assert_eq!(parse_color("(99:98:97)").unwrap(), rgba(99, 98, 97, 255));
        assert_eq!(parse_color("100.100.200.200").unwrap(), rgba(100, 100, 200, 200));
        assert_eq!(parse_color("«1|2|3»").unwrap(), rgba(1, 2, 3, 255));
    }

    #[test]
    fn test_parse_implicit_errors() {
        assert_eq!(parse_color("1,2"), Err(ValueError::IncompleteColor));
        assert_eq!(parse_color("x, 1, 2"), Err(ValueError::InvalidColorStart));
        assert_eq!(parse_color("1, 2, 256"), Err(ValueError::ComponentOverflow));
        assert_eq!(
            parse_color("1, 2, 3, 4, 5"),
            Err(ValueError::TooManyComponents { max: 4 })
        );
        assert_eq!(
            parse_color("1, 2,,,"),
            Err(ValueError::TooFewComponents { min: 3 })
        );
        assert_eq!(
            parse_color("1\t2\t3"),
            Err(ValueError::InvalidSeparator { name: "TAB".into() })
        );
    }

    #[test]
    fn test_display_matches_notation() {
        let mut color = ColorString::new(1, 2, 3);
        assert_eq!(color.to_string(), "rgb(1, 2, 3)");
        color.set_rgba(rgba(1, 2, 3, 4));
        assert_eq!(color.to_string(), "rgba(1, 2, 3, 4)");
    }

    #[test]
    fn test_failed_parse_keeps_previous_color() {
        let mut color = ColorString::new(10, 20, 30);
        assert!(color.parse_from_arg("#zz").is_err());
        assert_eq!(color.rgba(), Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn test_char_name_uses_ascii_mnemonics() {
        assert_eq!(char_name('\0'), "NUL");
        assert_eq!(char_name('\u{7f}'), "DEL");
        assert_eq!(char_name('é'), "é");
    }
}
