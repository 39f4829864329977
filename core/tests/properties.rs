use flagkit_core::{DistanceEngine, Split, optimal_breakpoint, wrap_to_vec};
use proptest::prelude::*;

fn short_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('a'), Just('b'), Just('c'), Just('é'), Just('😄')], 0..10)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Single-spaced words, some longer than any line, so forced splits and
/// hyphen breaks both occur.
fn paragraph() -> impl Strategy<Value = String> {
    "[a-zé-]{1,25}( [a-zé-]{1,25}){0,8}"
}

proptest! {
    #[test]
    fn distance_to_self_is_zero(s in short_text(), cutoff in proptest::option::of(1usize..20)) {
        let engine = DistanceEngine::new();
        prop_assert_eq!(engine.distance(&s, &s, cutoff).unwrap(), 0);
    }

    #[test]
    fn distance_is_symmetric(a in short_text(), b in short_text()) {
        let engine = DistanceEngine::new();
        prop_assert_eq!(
            engine.distance(&a, &b, None).unwrap(),
            engine.distance(&b, &a, None).unwrap()
        );
    }

    #[test]
    fn distance_cutoff_is_a_saturating_cap(a in short_text(), b in short_text(), cutoff in 1usize..12) {
        let engine = DistanceEngine::new();
        let exact = engine.distance(&a, &b, None).unwrap();
        prop_assert_eq!(engine.distance(&a, &b, Some(cutoff)).unwrap(), exact.min(cutoff));
    }

    #[test]
    fn distance_from_empty_is_length(s in short_text()) {
        let engine = DistanceEngine::new();
        prop_assert_eq!(engine.distance("", &s, None).unwrap(), s.chars().count());
    }

    #[test]
    fn breakpoint_maximizes_one_line_entries(
        pairs in proptest::collection::vec((0u16..30, 0u16..30), 0..12),
        max_width in 0u16..50,
    ) {
        let entries: Vec<Split> = pairs.iter().map(|&(l, d)| Split::new(l, d)).collect();
        let chosen = optimal_breakpoint(&entries, max_width);
        let count_at = |w: u16| entries.iter().filter(|s| s.fits_at(w, max_width)).count();

        let best = entries.iter().map(|s| count_at(s.label)).max().unwrap_or(0);
        if best == 0 {
            prop_assert_eq!(chosen, 0);
        } else {
            prop_assert_eq!(count_at(chosen), best);
            for split in &entries {
                if count_at(split.label) == best {
                    prop_assert!(split.label >= chosen);
                }
            }
        }
    }

    #[test]
    fn wrapped_lines_respect_width_and_keep_content(
        text in "[ab é\\n-]{0,60}",
        max_width in 1usize..30,
    ) {
        let lines = wrap_to_vec(&text, max_width).unwrap();
        for line in &lines {
            prop_assert!(line.chars().count() <= max_width, "line {:?} too wide", line);
            prop_assert!(!line.ends_with(' '));
        }

        let visible = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(visible(&lines.concat()), visible(&text));
    }

    #[test]
    fn rewrapping_joined_lines_is_stable(text in paragraph(), max_width in 6usize..40) {
        let lines = wrap_to_vec(&text, max_width).unwrap();
        let joined = lines.join(" ");
        prop_assert_eq!(wrap_to_vec(&joined, max_width).unwrap(), lines);
    }
}
