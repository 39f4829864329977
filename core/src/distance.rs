//! Bounded optimal string alignment (OSA) distance.
//!
//! The distance counts single code-point insertions, deletions,
//! substitutions and adjacent transpositions, each at unit cost. A given
//! adjacent pair may be transposed once; transpositions never chain or
//! overlap, which is what separates OSA from full Damerau-Levenshtein.
//!
//! The dynamic program keeps three rolling rows of `u16` costs sized by the
//! shorter input, so memory is `O(min(|a|, |b|))`. Rows live in a scratch
//! buffer handed out by a [`ScratchPool`]: the first caller to reach the pool
//! reuses its buffer, every concurrent caller allocates a private one for the
//! duration of its call instead of waiting.
//!
//! # Examples
//!
//! ```
//! use flagkit_core::DistanceEngine;
//!
//! let engine = DistanceEngine::new();
//! assert_eq!(engine.distance("jellyfish", "smellyfish", None).unwrap(), 2);
//! assert_eq!(engine.distance("ab", "ba", None).unwrap(), 1);
//!
//! // A cutoff saturates the result.
//! assert_eq!(engine.distance("long-disaster", "hello-world", Some(6)).unwrap(), 6);
//! ```

use std::sync::{Mutex, MutexGuard, TryLockError};

use tracing::trace;

use crate::error::{Result, TextError};

/// Exclusive upper bound on the combined byte length of both inputs.
///
/// Costs and row indices are stored as `u16`, so inputs at or past this
/// size are rejected with [`TextError::InputTooLong`].
pub const MAX_COMBINED_LEN: usize = 65_535;

/// A reusable cost table with non-blocking, single-holder access.
///
/// The shared buffer starts empty and only grows, up to the largest table
/// any call has needed. Poisoning is ignored since the buffer never carries
/// meaningful data between calls.
#[derive(Debug, Default)]
pub struct ScratchPool {
    slot: Mutex<Vec<u16>>,
}

/// Table handed out by [`ScratchPool::acquire`].
enum Scratch<'a> {
    Shared(MutexGuard<'a, Vec<u16>>, usize),
    Private(Vec<u16>),
}

impl Scratch<'_> {
    fn table(&mut self) -> &mut [u16] {
        match self {
            Scratch::Shared(guard, len) => &mut guard[..*len],
            Scratch::Private(table) => table,
        }
    }
}

impl ScratchPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current size of the shared buffer, in `u16` cells.
    pub fn capacity(&self) -> usize {
        match self.slot.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn acquire(&self, len: usize) -> Scratch<'_> {
        let mut guard = match self.slot.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                trace!(cells = len, "Shared distance table busy, allocating");
                return Scratch::Private(vec![0; len]);
            }
        };
        if guard.len() < len {
            trace!(from = guard.len(), to = len, "Growing shared distance table");
            guard.resize(len, 0);
        }
        Scratch::Shared(guard, len)
    }
}

/// Computes bounded OSA distances, reusing one scratch table across calls.
///
/// The engine is `Sync`; share it freely between threads. Results never
/// depend on whether a call got the shared table or a private one.
#[derive(Debug, Default)]
pub struct DistanceEngine {
    pool: ScratchPool,
}

impl DistanceEngine {
    /// Creates an engine with an empty scratch pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool backing this engine.
    pub fn pool(&self) -> &ScratchPool {
        &self.pool
    }

    /// Returns the OSA distance between `a` and `b`, counted in code points.
    ///
    /// With `cutoff` set, the result is `min(distance, cutoff)`: the
    /// computation stops as soon as every alignment prefix already costs
    /// `cutoff` or more. `Some(0)` returns `0` immediately. `None` yields the
    /// exact distance. Cutoffs beyond [`MAX_COMBINED_LEN`] behave like
    /// `None`, since no distance can reach them.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InputTooLong`] when
    /// `a.len() + b.len() >= MAX_COMBINED_LEN`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagkit_core::DistanceEngine;
    ///
    /// let engine = DistanceEngine::new();
    /// assert_eq!(engine.distance("", "abcde", None).unwrap(), 5);
    /// assert_eq!(engine.distance("a cat", "an abct", None).unwrap(), 4);
    /// assert_eq!(engine.distance("tears for fears", "fears for tears", Some(1)).unwrap(), 1);
    /// ```
    pub fn distance(&self, a: &str, b: &str, cutoff: Option<usize>) -> Result<usize> {
        check_combined_len(a, b)?;

        let cap = match cutoff {
            Some(0) => return Ok(0),
            Some(c) => u16::try_from(c).unwrap_or(u16::MAX),
            None => u16::MAX,
        };

        let a_len = a.chars().count();
        let b_len = b.chars().count();
        let (long, short, short_len) = if a_len >= b_len {
            (a, b, b_len)
        } else {
            (b, a, a_len)
        };

        if short_len == 0 {
            let long_len = a_len.max(b_len);
            return Ok(long_len.min(usize::from(cap)));
        }

        let mut scratch = self.pool.acquire(3 * (short_len + 1));
        let cost = osa(long, short, short_len, cap, scratch.table());
        Ok(usize::from(cost))
    }
}

/// One-off distance computation with a private table.
///
/// Prefer a long-lived [`DistanceEngine`] when comparing against many
/// candidates.
///
/// # Errors
///
/// Same as [`DistanceEngine::distance`].
pub fn edit_distance(a: &str, b: &str, cutoff: Option<usize>) -> Result<usize> {
    DistanceEngine::new().distance(a, b, cutoff)
}

/// Rejects input pairs whose costs could overflow the `u16` table.
///
/// # Errors
///
/// Returns [`TextError::InputTooLong`] for combined lengths of
/// [`MAX_COMBINED_LEN`] bytes or more.
pub fn check_combined_len(a: &str, b: &str) -> Result<()> {
    let len = a.len() + b.len();
    if len >= MAX_COMBINED_LEN {
        return Err(TextError::InputTooLong {
            len,
            limit: MAX_COMBINED_LEN,
        });
    }
    Ok(())
}

/// Row `i` of the program holds the cost of aligning the first `i` code
/// points of `long` with each prefix of `short`. Only rows `i`, `i - 1` and
/// `i - 2` are alive at any time.
fn osa(long: &str, short: &str, short_len: usize, cap: u16, table: &mut [u16]) -> u16 {
    let width = short_len + 1;
    let (first, rest) = table.split_at_mut(width);
    let (second, third) = rest.split_at_mut(width);
    let (mut before_prev, mut prev, mut curr) = (first, second, third);

    for (j, cell) in prev.iter_mut().enumerate() {
        *cell = j as u16;
    }

    let mut prev_long_char: Option<char> = None;
    for (row, long_char) in long.chars().enumerate() {
        let i = row + 1;
        curr[0] = i as u16;
        let mut row_min = curr[0];

        let mut prev_short_char: Option<char> = None;
        for (col, short_char) in short.chars().enumerate() {
            let j = col + 1;
            let deletion = prev[j] + 1;
            let insertion = curr[j - 1] + 1;
            let substitution = prev[j - 1] + u16::from(long_char != short_char);
            let mut cost = deletion.min(insertion).min(substitution);

            if let (Some(pl), Some(ps)) = (prev_long_char, prev_short_char) {
                if long_char == ps && pl == short_char {
                    cost = cost.min(before_prev[j - 2] + 1);
                }
            }

            curr[j] = cost;
            row_min = row_min.min(cost);
            prev_short_char = Some(short_char);
        }

        // Row minima never decrease, so the final cost is at least `cap`.
        if row_min >= cap {
            return cap;
        }

        prev_long_char = Some(long_char);
        (before_prev, prev, curr) = (prev, curr, before_prev);
    }

    prev[short_len].min(cap)
}
