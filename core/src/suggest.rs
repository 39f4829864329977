//! "Did you mean" matching for mistyped names.
//!
//! Compares a name against candidates with the bounded OSA distance and
//! accepts the closest one only if it is similar enough to be a plausible
//! typo. Very short names are always accepted when within the cutoff.

use tracing::debug;

use crate::distance::DistanceEngine;

/// Smallest cutoff used when matching, regardless of name length.
pub const MIN_SUGGESTION_CUTOFF: usize = 7;

/// Minimum `(max_len - distance) / max_len` ratio for a suggestion.
pub const MIN_SIMILARITY: f64 = 0.5;

/// A candidate close enough to the requested name.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    /// The matching candidate.
    pub candidate: &'a str,
    /// OSA distance between the name and the candidate.
    pub distance: usize,
    /// `(max_len - distance) / max_len`, lengths in code points.
    pub similarity: f64,
}

/// Cutoff for matching `name`: half its length plus one, at least
/// [`MIN_SUGGESTION_CUTOFF`].
pub fn suggestion_cutoff(name: &str) -> usize {
    (name.chars().count() / 2 + 1).max(MIN_SUGGESTION_CUTOFF)
}

/// Finds the candidate most likely meant by `name`.
///
/// Candidates are scanned in order and the first one with the lowest
/// distance wins; an exact match ends the scan. Candidates too long to
/// compare are skipped.
///
/// # Examples
///
/// ```
/// use flagkit_core::{DistanceEngine, closest_match};
///
/// let engine = DistanceEngine::new();
/// let flags = ["color", "number", "output"];
///
/// let hit = closest_match(&engine, "colour", flags).unwrap();
/// assert_eq!(hit.candidate, "color");
/// assert_eq!(hit.distance, 1);
///
/// assert!(closest_match(&engine, "verbose", flags).is_none());
/// ```
pub fn closest_match<'a, I>(engine: &DistanceEngine, name: &str, candidates: I) -> Option<Suggestion<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let cutoff = suggestion_cutoff(name);
    let mut best: Option<(&'a str, usize)> = None;

    for candidate in candidates {
        let distance = match engine.distance(name, candidate, Some(cutoff)) {
            Ok(distance) => distance,
            Err(err) => {
                debug!(candidate, error = %err, "Skipping suggestion candidate");
                continue;
            }
        };
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
            if distance == 0 {
                break;
            }
        }
    }

    let (candidate, distance) = best?;
    if distance >= cutoff {
        return None;
    }

    let max_len = name.chars().count().max(candidate.chars().count());
    let similarity = if max_len == 0 {
        1.0
    } else {
        (max_len - distance) as f64 / max_len as f64
    };

    debug!(name, candidate, distance, similarity, "Closest suggestion");
    if similarity >= MIN_SIMILARITY || max_len <= 3 {
        Some(Suggestion {
            candidate,
            distance,
            similarity,
        })
    } else {
        None
    }
}
