//! Greedy paragraph wrapping measured in code points.
//!
//! Text is cut into fragments: explicit line breaks, runs of spaces, and
//! words. A word runs until a space or a line break, or ends right after a
//! literal `-`, so hyphenated compounds can wrap at their hyphens. Words are
//! never split unless one is long enough to leave a badly short line, in
//! which case a prefix is forced onto the current line to fill it.
//!
//! A fragment only joins a line if the line stays narrower than the maximum
//! width; a forced prefix is the only way a line reaches it exactly.
//!
//! Lines never end with spaces. Spaces at the start of the text or right
//! after a `\n` are kept as indentation; spaces where a line wrapped are
//! dropped.
//!
//! # Examples
//!
//! ```
//! use flagkit_core::wrap_to_vec;
//!
//! let lines = wrap_to_vec("the quick brown fox jumps over the lazy dog", 16).unwrap();
//! assert_eq!(lines, ["the quick brown", "fox jumps over", "the lazy dog"]);
//! ```

use crate::error::{Result, TextError};

/// Kind of a [`Fragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// An explicit `\n`. Always ends the current line.
    LineBreak,
    /// A run of spaces. Breakable and dropped at line ends.
    Spaces,
    /// A run of visible characters, possibly ending in `-`. Not breakable.
    Word,
}

/// A token of the input: byte range plus width in code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// What the fragment is.
    pub kind: FragmentKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Width in code points. Zero for line breaks.
    pub width: usize,
}

/// Returns `true` for the control characters wrapped text may not contain.
fn is_disallowed_control(c: char) -> bool {
    c != '\n' && (c < ' ' || c == '\u{7f}')
}

/// Checks `text` for control characters other than `\n`.
///
/// # Errors
///
/// Returns [`TextError::ControlCharacter`] for the first offending
/// character.
pub fn validate_paragraph(text: &str) -> Result<()> {
    match text.char_indices().find(|&(_, c)| is_disallowed_control(c)) {
        Some((offset, c)) => Err(TextError::ControlCharacter {
            code_point: u32::from(c),
            offset,
        }),
        None => Ok(()),
    }
}

/// Reads the fragment starting at byte `start`. `start` must be a char
/// boundary before the end of `text`.
fn next_fragment(text: &str, start: usize) -> Fragment {
    let rest = &text[start..];
    let mut chars = rest.char_indices().peekable();

    let kind = match chars.peek() {
        Some(&(_, '\n')) => {
            return Fragment {
                kind: FragmentKind::LineBreak,
                start,
                end: start + 1,
                width: 0,
            };
        }
        Some(&(_, ' ')) => FragmentKind::Spaces,
        _ => FragmentKind::Word,
    };

    let mut width = 0;
    let mut end = rest.len();
    for (offset, c) in chars {
        let continues = match kind {
            FragmentKind::Spaces => c == ' ',
            _ => c != ' ' && c != '\n',
        };
        if !continues {
            end = offset;
            break;
        }
        width += 1;
        if kind == FragmentKind::Word && c == '-' {
            end = offset + 1;
            break;
        }
    }

    Fragment {
        kind,
        start,
        end: start + end,
        width,
    }
}

/// Iterator over the fragments of a paragraph, created by [`fragments`].
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    text: &'a str,
    pos: usize,
}

impl Iterator for Fragments<'_> {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        if self.pos >= self.text.len() {
            return None;
        }
        let fragment = next_fragment(self.text, self.pos);
        self.pos = fragment.end;
        Some(fragment)
    }
}

/// Splits `text` into fragments, left to right.
///
/// # Errors
///
/// Returns [`TextError::ControlCharacter`] for disallowed control
/// characters.
///
/// # Examples
///
/// ```
/// use flagkit_core::{FragmentKind, fragments};
///
/// let kinds: Vec<_> = fragments("re-run now\n").unwrap().map(|f| f.kind).collect();
/// assert_eq!(
///     kinds,
///     [FragmentKind::Word, FragmentKind::Word, FragmentKind::Spaces, FragmentKind::Word, FragmentKind::LineBreak]
/// );
/// ```
pub fn fragments(text: &str) -> Result<Fragments<'_>> {
    validate_paragraph(text)?;
    Ok(Fragments { text, pos: 0 })
}

/// Byte offset reached after advancing `count` code points from `start`.
fn advance_chars(text: &str, start: usize, count: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| start + offset)
}

/// Iterator over the lines of a wrapped paragraph.
///
/// Created by [`wrapped_lines`]. Each item borrows from the input text.
#[derive(Debug, Clone)]
pub struct WrappedLines<'a> {
    text: &'a str,
    max_width: usize,
    /// Next byte to tokenize.
    pos: usize,
    line_start: usize,
    /// End of the last visible fragment on the current line.
    line_end: usize,
    /// Code points placed on the current line, trailing spaces included.
    fill: usize,
    /// The current line began at a soft wrap, so leading spaces are dropped.
    soft: bool,
    /// A fragment (or the rest of a split one) waiting for the next line.
    pending: Option<Fragment>,
    done: bool,
}

/// Wraps `text` into lines of at most `max_width` code points.
///
/// The whole text is validated before the iterator is returned, so no line
/// is produced for invalid input. A `max_width` of zero is treated as one.
///
/// # Errors
///
/// Returns [`TextError::ControlCharacter`] if `text` contains a control
/// character other than `\n`.
///
/// # Examples
///
/// ```
/// use flagkit_core::wrapped_lines;
///
/// let mut lines = wrapped_lines("hello world", 10).unwrap();
/// assert_eq!(lines.next(), Some("hello"));
/// assert_eq!(lines.next(), Some("world"));
/// assert_eq!(lines.next(), None);
///
/// assert!(wrapped_lines("tab\there", 10).is_err());
/// ```
pub fn wrapped_lines(text: &str, max_width: usize) -> Result<WrappedLines<'_>> {
    validate_paragraph(text)?;
    Ok(WrappedLines {
        text,
        max_width: max_width.max(1),
        pos: 0,
        line_start: 0,
        line_end: 0,
        fill: 0,
        soft: false,
        pending: None,
        done: false,
    })
}

impl<'a> WrappedLines<'a> {
    fn has_content(&self) -> bool {
        self.line_end > self.line_start
    }

    /// Closes the current line and starts the next one at byte `next`.
    fn finish_line(&mut self, end: usize, next: usize, soft: bool) -> &'a str {
        let text = self.text;
        let line = &text[self.line_start..end];
        self.line_start = next;
        self.line_end = next;
        self.fill = 0;
        self.soft = soft;
        line
    }

    /// Forgets leading spaces held by a line with no visible content.
    fn drop_indent(&mut self, next: usize) {
        self.line_start = next;
        self.line_end = next;
        self.fill = 0;
        self.soft = true;
    }
}

impl<'a> Iterator for WrappedLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }

        loop {
            let fragment = match self.pending.take() {
                Some(fragment) => fragment,
                None if self.pos < self.text.len() => {
                    let fragment = next_fragment(self.text, self.pos);
                    self.pos = fragment.end;
                    fragment
                }
                None => {
                    self.done = true;
                    if self.has_content() {
                        let text = self.text;
                        return Some(&text[self.line_start..self.line_end]);
                    }
                    return None;
                }
            };

            match fragment.kind {
                FragmentKind::LineBreak => {
                    return Some(self.finish_line(self.line_end, fragment.end, false));
                }
                FragmentKind::Spaces => {
                    if self.fill == 0 && self.soft {
                        self.drop_indent(fragment.end);
                    } else if self.fill + fragment.width < self.max_width {
                        self.fill += fragment.width;
                    } else if self.has_content() {
                        return Some(self.finish_line(self.line_end, fragment.end, true));
                    } else {
                        self.drop_indent(fragment.end);
                    }
                }
                FragmentKind::Word => {
                    if self.fill + fragment.width < self.max_width {
                        self.fill += fragment.width;
                        self.line_end = fragment.end;
                    } else if fragment.width > self.max_width / 3
                        && self.fill <= self.max_width / 2
                    {
                        // Force a prefix in rather than leave a short line.
                        let taken = self.max_width - self.fill;
                        let split = advance_chars(self.text, fragment.start, taken);
                        self.pending = Some(Fragment {
                            kind: FragmentKind::Word,
                            start: split,
                            end: fragment.end,
                            width: fragment.width - taken,
                        });
                        return Some(self.finish_line(split, split, true));
                    } else {
                        self.pending = Some(fragment);
                        if self.has_content() {
                            return Some(self.finish_line(self.line_end, fragment.start, true));
                        }
                        self.drop_indent(fragment.start);
                    }
                }
            }
        }
    }
}

/// Calls `on_line` for each wrapped line of `text`, in order.
///
/// Stops at the first error returned by `on_line` and hands it back
/// unchanged.
///
/// # Errors
///
/// Returns the first error from `on_line`, or a [`TextError`] converted into
/// `E` when `text` contains a disallowed control character. In the latter
/// case `on_line` is never called.
///
/// # Examples
///
/// ```
/// use flagkit_core::wrap;
///
/// let mut out = String::new();
/// wrap("one two three", 8, |line| -> std::io::Result<()> {
///     out.push_str(line);
///     out.push('|');
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(out, "one two|three|");
/// ```
pub fn wrap<E, F>(text: &str, max_width: usize, mut on_line: F) -> std::result::Result<(), E>
where
    E: From<TextError>,
    F: FnMut(&str) -> std::result::Result<(), E>,
{
    for line in wrapped_lines(text, max_width)? {
        on_line(line)?;
    }
    Ok(())
}

/// Collects the wrapped lines of `text`.
///
/// # Errors
///
/// Returns [`TextError::ControlCharacter`] for disallowed control
/// characters.
pub fn wrap_to_vec(text: &str, max_width: usize) -> Result<Vec<&str>> {
    Ok(wrapped_lines(text, max_width)?.collect())
}
