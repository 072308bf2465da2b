//! Link pair enumeration.
//!
//! Produces every unordered pair of an ordered list exactly once. The
//! earlier element always comes first, and pairs are emitted element by
//! element in input order, so generator output is reproducible for a
//! given endpoint ordering.

/// Enumerate the C(n, 2) pairs `(from, to)` where `from` precedes `to` in
/// `items`.
///
/// For `[a, b, c]` this yields `(a, b)`, `(a, c)`, `(b, c)`. Empty and
/// single-element inputs yield nothing.
pub fn link_pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, from)| items[i + 1..].iter().map(move |to| (from, to)))
}

/// Full cross product between two groups, `from` drawn from `left`.
pub fn cross_pairs<'a, T>(left: &'a [T], right: &'a [T]) -> impl Iterator<Item = (&'a T, &'a T)> + 'a {
    left.iter()
        .flat_map(move |from| right.iter().map(move |to| (from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pair_order() {
        let pairs: Vec<_> = link_pairs(&["a", "b", "c", "d"]).map(|(f, t)| (*f, *t)).collect();
        assert_eq!(
            pairs,
            vec![("a", "b"), ("a", "c"), ("a", "d"), ("b", "c"), ("b", "d"), ("c", "d")]
        );
    }

    #[test]
    fn test_pair_count_and_uniqueness() {
        for n in 2..20usize {
            let items: Vec<usize> = (0..n).collect();
            let pairs: Vec<_> = link_pairs(&items).collect();
            assert_eq!(pairs.len(), n * (n - 1) / 2);

            let mut seen = HashSet::new();
            for (from, to) in pairs {
                // Position in the input is the value itself
                assert!(from < to, "{} should precede {}", from, to);
                assert!(seen.insert((*from, *to)), "pair ({}, {}) emitted twice", from, to);
            }
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty: [u8; 0] = [];
        assert_eq!(link_pairs(&empty).count(), 0);
        assert_eq!(link_pairs(&["solo"]).count(), 0);
    }

    #[test]
    fn test_cross_pairs() {
        let pairs: Vec<_> = cross_pairs(&[1, 2], &[3, 4]).map(|(f, t)| (*f, *t)).collect();
        assert_eq!(pairs, vec![(1, 3), (1, 4), (2, 3), (2, 4)]);
    }
}
