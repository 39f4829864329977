//! Label column selection for two-column usage listings.
//!
//! A usage listing renders each entry as its label padded to a shared column
//! width followed by its description. Entries that cannot fit that way on a
//! single line fall back to a two-line form. [`optimal_breakpoint`] picks the
//! column width that keeps the most entries on one line.
//!
//! # Examples
//!
//! ```
//! use flagkit_core::{Split, optimal_breakpoint};
//!
//! let entries = [Split::new(2, 5), Split::new(3, 4), Split::new(4, 3), Split::new(5, 2)];
//! assert_eq!(optimal_breakpoint(&entries, 10), 5);
//! assert_eq!(optimal_breakpoint(&[], 10), 0);
//! ```

use serde::{Deserialize, Serialize};

/// Widths of one usage entry, in code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Split {
    /// Width of the label (left column).
    pub label: u16,
    /// Width of the description (right column).
    pub description: u16,
}

impl Split {
    /// Creates a split from label and description widths.
    pub fn new(label: u16, description: u16) -> Self {
        Self { label, description }
    }

    /// Returns `true` if this entry renders on one line when labels are
    /// padded to `width` and lines hold at most `max_width` code points.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagkit_core::Split;
    ///
    /// let split = Split::new(4, 5);
    /// assert!(split.fits_at(4, 10));
    /// assert!(split.fits_at(5, 10));
    /// assert!(!split.fits_at(6, 10));
    /// assert!(!split.fits_at(3, 10));
    /// ```
    pub fn fits_at(&self, width: u16, max_width: u16) -> bool {
        self.label <= width && u32::from(width) + u32::from(self.description) <= u32::from(max_width)
    }
}

/// Chooses the label column width that fits the most entries on one line.
///
/// Candidate widths are the distinct label widths present in `entries`; the
/// count for a candidate only changes at those points. Ties go to the
/// smallest width. Returns `0` for an empty slice or when no candidate fits
/// any entry, which sends every entry to the two-line fallback.
///
/// Each entry fits on one line for every width in
/// `label..=max_width - description`. After sorting the interval ends once,
/// candidates are visited in ascending order with two monotonic cursors:
/// one over opened intervals, one over intervals already closed.
///
/// # Examples
///
/// ```
/// use flagkit_core::{Split, optimal_breakpoint};
///
/// // Neither entry fits at width 4 or 7.
/// assert_eq!(optimal_breakpoint(&[Split::new(7, 4), Split::new(4, 7)], 10), 0);
///
/// // Widths 4, 5 and 6 all admit two entries; the smallest wins.
/// let entries = [Split::new(3, 6), Split::new(4, 5), Split::new(5, 4), Split::new(6, 3)];
/// assert_eq!(optimal_breakpoint(&entries, 10), 4);
/// ```
pub fn optimal_breakpoint(entries: &[Split], max_width: u16) -> u16 {
    let mut candidates: Vec<u16> = entries.iter().map(|split| split.label).collect();
    candidates.sort_unstable();
    candidates.dedup();

    let (mut opens, mut closes): (Vec<u16>, Vec<u16>) = entries
        .iter()
        .filter_map(|split| {
            let last = max_width.checked_sub(split.description)?;
            (split.label <= last).then_some((split.label, last))
        })
        .unzip();
    opens.sort_unstable();
    closes.sort_unstable();

    let mut opened = 0;
    let mut closed = 0;
    let mut best_width = 0;
    let mut best_count = 0;

    for width in candidates {
        if width > max_width {
            break;
        }
        while opened < opens.len() && opens[opened] <= width {
            opened += 1;
        }
        while closed < closes.len() && closes[closed] < width {
            closed += 1;
        }

        // Every closed interval opened at or before its end.
        let count = opened - closed;
        if count > best_count {
            best_count = count;
            best_width = width;
        }
    }

    best_width
}
