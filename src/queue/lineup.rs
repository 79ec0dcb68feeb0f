//! Cyclic views over the roster starting from the current broker.

use std::iter::FusedIterator;

use crate::types::{Broker, Roster};

/// Lazy iterator over the brokers after the current one, wrapping around.
///
/// Bounded by construction: it never yields more than `len - 1` brokers, so it
/// never yields the current broker and never repeats one. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Upcoming<'a> {
    brokers: &'a [Broker],
    current: usize,
    offset: usize,
    remaining: usize,
}

impl<'a> Iterator for Upcoming<'a> {
    type Item = &'a Broker;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.offset += 1;
        let index = (self.current + self.offset) % self.brokers.len();
        self.brokers.get(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Upcoming<'_> {}

impl FusedIterator for Upcoming<'_> {}

/// Returns up to `count` brokers following `current_index`, in rotation order.
pub fn upcoming(roster: &Roster, current_index: usize, count: usize) -> Upcoming<'_> {
    let brokers = roster.as_slice();
    Upcoming {
        brokers,
        current: current_index,
        offset: 0,
        remaining: count.min(brokers.len().saturating_sub(1)),
    }
}

/// A broker together with its 1-based place in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineupEntry<'a> {
    pub place: usize,
    pub broker: &'a Broker,
}

impl LineupEntry<'_> {
    pub fn is_current(&self) -> bool {
        self.place == 1
    }
}

/// The full rotation starting at the current broker.
#[derive(Debug, Clone)]
pub struct Lineup<'a> {
    current: Option<&'a Broker>,
    rest: Upcoming<'a>,
    place: usize,
}

impl<'a> Iterator for Lineup<'a> {
    type Item = LineupEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let broker = self.current.take().or_else(|| self.rest.next())?;
        self.place += 1;
        Some(LineupEntry {
            place: self.place,
            broker,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.len() + usize::from(self.current.is_some());
        (n, Some(n))
    }
}

impl ExactSizeIterator for Lineup<'_> {}

/// Every broker in the roster, current first, each with its place in line.
pub fn lineup(roster: &Roster, current_index: usize) -> Lineup<'_> {
    Lineup {
        current: roster.get(current_index),
        rest: upcoming(roster, current_index, roster.len()),
        place: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_roster, names, roster_of};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn upcoming_wraps_around() {
        let roster = roster_of(&["A", "B", "C", "D"]);
        assert_eq!(names(upcoming(&roster, 2, 3)), vec!["D", "A", "B"]);
    }

    #[test]
    fn upcoming_is_capped_below_roster_length() {
        let roster = roster_of(&["A", "B", "C"]);
        assert_eq!(names(upcoming(&roster, 0, 10)), vec!["B", "C"]);
    }

    #[test]
    fn upcoming_single_broker_is_empty() {
        let roster = roster_of(&["A"]);
        assert_eq!(upcoming(&roster, 0, 5).count(), 0);
    }

    #[test]
    fn upcoming_empty_roster_is_empty() {
        let roster = Roster::default();
        assert_eq!(upcoming(&roster, 0, 5).count(), 0);
    }

    #[test]
    fn upcoming_is_restartable() {
        let roster = roster_of(&["A", "B", "C"]);
        let iter = upcoming(&roster, 1, 2);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn lineup_starts_with_current() {
        let roster = roster_of(&["A", "B", "C"]);
        let entries: Vec<_> = lineup(&roster, 1)
            .map(|e| (e.place, e.broker.name.as_str()))
            .collect();
        assert_eq!(entries, vec![(1, "B"), (2, "C"), (3, "A")]);
    }

    #[test]
    fn lineup_marks_only_first_as_current() {
        let roster = roster_of(&["A", "B"]);
        let flags: Vec<_> = lineup(&roster, 0).map(|e| e.is_current()).collect();
        assert_eq!(flags, vec![true, false]);
    }

    proptest! {
        #[test]
        fn upcoming_never_repeats_or_includes_current(
            roster in arb_roster(1..12),
            index_seed: usize,
            count in 0usize..30,
        ) {
            let index = index_seed % roster.len();
            let current = roster.get(index).unwrap().id();
            let ids: Vec<_> = upcoming(&roster, index, count).map(|b| b.id()).collect();

            prop_assert!(ids.len() <= roster.len() - 1);
            prop_assert_eq!(ids.len(), count.min(roster.len() - 1));
            let distinct: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(distinct.len(), ids.len());
            prop_assert!(!ids.contains(&current));
        }

        #[test]
        fn lineup_covers_whole_roster(roster in arb_roster(1..12), index_seed: usize) {
            let index = index_seed % roster.len();
            let entries: Vec<_> = lineup(&roster, index).collect();
            prop_assert_eq!(entries.len(), roster.len());
            let places: Vec<_> = entries.iter().map(|e| e.place).collect();
            prop_assert_eq!(places, (1..=roster.len()).collect::<Vec<_>>());
        }
    }
}
