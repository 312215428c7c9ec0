// Minimal edit script between two ordered sequences of diffable items.
//
// Script semantics (operations are applied one after the other to a working copy of `old`)
// - Remove { at }: drop the item at `at`.
// - Move { from, to }: take the item out of `from`, then insert it so that it ends up at `to`.
// - Insert { at, item }: insert `item` so that it ends up at `at`.
// - Update { at, item }: replace the item at `at` in place.
//
// Script shape
// - Removes (descending index), then moves, then inserts (ascending index), then updates at final
//   positions.
// - Items are matched by identity. A matched item with different contents yields an Update, never a
//   Remove + Insert. A matched item out of place yields a Move, never a Remove + Insert.
// - Moves are minimal: the longest run of matched items already in relative order stays put.
//
// Cost
// - O(n log n): hash matching, patience-sort LIS, and a Fenwick tree to resolve live positions.

use crate::shared::core::diffable::Diffable;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOperation<T> {
    Insert { at: usize, item: T },
    Remove { at: usize },
    Move { from: usize, to: usize },
    Update { at: usize, item: T },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("duplicate identity in {side} sequence: {identity}")]
    DuplicateIdentity { side: Side, identity: String },

    #[error("operation index {at} out of range for length {len}")]
    IndexOutOfRange { at: usize, len: usize },
}

pub fn diff<T>(old: &[T], new: &[T]) -> Result<Vec<DiffOperation<T>>, DiffError>
where
    T: Diffable + Clone,
{
    let old_ids: Vec<T::Identity> = old.iter().map(T::identity).collect();
    let new_ids: Vec<T::Identity> = new.iter().map(T::identity).collect();
    let old_positions = index_by_identity(&old_ids, Side::Old)?;
    let new_positions = index_by_identity(&new_ids, Side::New)?;

    let mut operations = Vec::new();

    // Working position of every surviving old item once removals are done.
    let mut working_position = vec![None; old.len()];
    let mut survivors = 0;
    for (at, id) in old_ids.iter().enumerate() {
        if new_positions.contains_key(id) {
            working_position[at] = Some(survivors);
            survivors += 1;
        }
    }
    for (at, position) in working_position.iter().enumerate().rev() {
        if position.is_none() {
            operations.push(DiffOperation::Remove { at });
        }
    }

    // Working positions of the matched items, listed in their new order.
    let targets: Vec<usize> = new_ids
        .iter()
        .filter_map(|id| old_positions.get(id))
        .filter_map(|&at| working_position[at])
        .collect();
    operations.extend(moves(&targets));

    for (at, id) in new_ids.iter().enumerate() {
        if !old_positions.contains_key(id) {
            operations.push(DiffOperation::Insert {
                at,
                item: new[at].clone(),
            });
        }
    }

    for (at, id) in new_ids.iter().enumerate() {
        if let Some(&before) = old_positions.get(id) {
            if !old[before].same_content_as(&new[at]) {
                operations.push(DiffOperation::Update {
                    at,
                    item: new[at].clone(),
                });
            }
        }
    }

    Ok(operations)
}

/// Replays an edit script on `sequence`.
pub fn apply<T: Clone>(
    mut sequence: Vec<T>,
    operations: &[DiffOperation<T>],
) -> Result<Vec<T>, DiffError> {
    for operation in operations {
        match operation {
            DiffOperation::Remove { at } => {
                check_range(*at, sequence.len())?;
                sequence.remove(*at);
            }
            DiffOperation::Move { from, to } => {
                check_range(*from, sequence.len())?;
                let item = sequence.remove(*from);
                check_range(*to, sequence.len() + 1)?;
                sequence.insert(*to, item);
            }
            DiffOperation::Insert { at, item } => {
                check_range(*at, sequence.len() + 1)?;
                sequence.insert(*at, item.clone());
            }
            DiffOperation::Update { at, item } => {
                check_range(*at, sequence.len())?;
                sequence[*at] = item.clone();
            }
        }
    }
    Ok(sequence)
}

fn check_range(at: usize, len: usize) -> Result<(), DiffError> {
    if at < len {
        Ok(())
    } else {
        Err(DiffError::IndexOutOfRange { at, len })
    }
}

fn index_by_identity<I>(ids: &[I], side: Side) -> Result<HashMap<&I, usize>, DiffError>
where
    I: Eq + std::hash::Hash + fmt::Debug,
{
    let mut positions = HashMap::with_capacity(ids.len());
    for (at, id) in ids.iter().enumerate() {
        if positions.insert(id, at).is_some() {
            return Err(DiffError::DuplicateIdentity {
                side,
                identity: format!("{id:?}"),
            });
        }
    }
    Ok(positions)
}

// Every item outside the longest increasing run is glued right after its predecessor in the new
// order (or at the front when it has none). Items are processed in new order, so the predecessor
// is always final by then. Positions are resolved through a fixed total order of "slots":
// unmoved items sit at (old position, 0); a moved item sits at (old position of the stable item
// heading its run, offset within the run), or (-1, offset) in the leading run.
fn moves<T>(targets: &[usize]) -> Vec<DiffOperation<T>> {
    let stable = longest_increasing_run(targets);

    let mut resting = Vec::with_capacity(targets.len());
    let mut heading: Option<(i64, usize)> = None;
    for (t, &position) in targets.iter().enumerate() {
        if stable[t] {
            heading = Some((position as i64, t));
            resting.push((position as i64, 0));
        } else {
            resting.push(match heading {
                Some((head, head_t)) => (head, t - head_t),
                None => (-1, t),
            });
        }
    }

    let mut slots: Vec<(i64, usize)> = targets
        .iter()
        .map(|&position| (position as i64, 0))
        .chain(resting.iter().copied())
        .collect();
    slots.sort_unstable();
    slots.dedup();
    let rank = |slot: (i64, usize)| slots.partition_point(|&s| s < slot);

    let mut live = PresenceTree::new(slots.len());
    for &position in targets {
        live.add(rank((position as i64, 0)), 1);
    }

    let mut operations = Vec::new();
    for (t, &position) in targets.iter().enumerate() {
        if stable[t] {
            continue;
        }
        let origin = rank((position as i64, 0));
        let from = live.count_before(origin);
        live.add(origin, -1);
        let destination = rank(resting[t]);
        let to = live.count_before(destination);
        live.add(destination, 1);
        if from != to {
            operations.push(DiffOperation::Move { from, to });
        }
    }
    operations
}

fn longest_increasing_run(values: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];
    for (i, &value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&t| values[t] < value);
        if slot > 0 {
            previous[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut in_run = vec![false; values.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        in_run[i] = true;
        cursor = previous[i];
    }
    in_run
}

struct PresenceTree {
    counts: Vec<i64>,
}

impl PresenceTree {
    fn new(len: usize) -> Self {
        Self {
            counts: vec![0; len + 1],
        }
    }

    fn add(&mut self, rank: usize, delta: i64) {
        let mut i = rank + 1;
        while i < self.counts.len() {
            self.counts[i] += delta;
            i += i & i.wrapping_neg();
        }
    }

    fn count_before(&self, rank: usize) -> usize {
        let mut i = rank;
        let mut sum = 0;
        while i > 0 {
            sum += self.counts[i];
            i -= i & i.wrapping_neg();
        }
        sum.max(0) as usize
    }
}

#[cfg(test)]
mod diff_tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: char,
        label: &'static str,
    }

    impl Diffable for Row {
        type Identity = char;

        fn identity(&self) -> char {
            self.id
        }

        fn same_content_as(&self, other: &Self) -> bool {
            self.label == other.label
        }
    }

    fn rows(ids: &str) -> Vec<Row> {
        ids.chars().map(|id| Row { id, label: "" }).collect()
    }

    fn count_moves(operations: &[DiffOperation<Row>]) -> usize {
        operations
            .iter()
            .filter(|op| matches!(op, DiffOperation::Move { .. }))
            .count()
    }

    #[rstest]
    #[case("", "")]
    #[case("abc", "abc")]
    fn it_should_produce_no_operations_for_equal_sequences(#[case] old: &str, #[case] new: &str) {
        let operations = diff(&rows(old), &rows(new)).unwrap();
        assert!(operations.is_empty());
    }

    #[rstest]
    #[case("", "abc")]
    #[case("abc", "")]
    #[case("abc", "cab")]
    #[case("zaby", "aybz")]
    #[case("abcdef", "fedcba")]
    #[case("abcde", "xaeyc")]
    #[case("xya", "ayx")]
    fn it_should_transform_old_into_new(#[case] old: &str, #[case] new: &str) {
        let old = rows(old);
        let new = rows(new);
        let operations = diff(&old, &new).unwrap();
        assert_eq!(apply(old, &operations).unwrap(), new);
    }

    #[rstest]
    #[case("xab", "abx", 1)]
    #[case("zaby", "aybz", 2)]
    #[case("abcdef", "fedcba", 5)]
    #[case("abcd", "bcda", 1)]
    fn it_should_keep_the_longest_ordered_run_in_place(
        #[case] old: &str,
        #[case] new: &str,
        #[case] expected_moves: usize,
    ) {
        let operations = diff(&rows(old), &rows(new)).unwrap();
        assert_eq!(count_moves(&operations), expected_moves);
        assert!(
            operations
                .iter()
                .all(|op| matches!(op, DiffOperation::Move { .. }))
        );
    }

    #[rstest]
    fn it_should_prefer_update_over_remove_and_insert() {
        let old = vec![Row { id: 'a', label: "before" }, Row { id: 'b', label: "" }];
        let new = vec![Row { id: 'a', label: "after" }, Row { id: 'b', label: "" }];
        let operations = diff(&old, &new).unwrap();
        assert_eq!(
            operations,
            vec![DiffOperation::Update {
                at: 0,
                item: Row { id: 'a', label: "after" }
            }]
        );
    }

    #[rstest]
    fn it_should_report_updates_at_final_positions() {
        let old = vec![Row { id: 'a', label: "1" }, Row { id: 'b', label: "1" }];
        let new = vec![Row { id: 'b', label: "2" }, Row { id: 'a', label: "1" }];
        let operations = diff(&old, &new).unwrap();
        assert_eq!(
            operations.last(),
            Some(&DiffOperation::Update {
                at: 0,
                item: Row { id: 'b', label: "2" }
            })
        );
        assert_eq!(apply(old, &operations).unwrap(), new);
    }

    #[rstest]
    fn it_should_remove_from_the_back_first() {
        let operations = diff(&rows("abcd"), &rows("bd")).unwrap();
        assert_eq!(
            operations,
            vec![DiffOperation::Remove { at: 2 }, DiffOperation::Remove { at: 0 }]
        );
    }

    #[rstest]
    #[case("aba", "ab", Side::Old)]
    #[case("ab", "bab", Side::New)]
    fn it_should_reject_duplicate_identities(
        #[case] old: &str,
        #[case] new: &str,
        #[case] side: Side,
    ) {
        let result = diff(&rows(old), &rows(new));
        assert!(matches!(result, Err(DiffError::DuplicateIdentity { side: s, .. }) if s == side));
    }

    #[rstest]
    fn it_should_reject_out_of_range_operations() {
        let result = apply(rows("ab"), &[DiffOperation::Remove { at: 2 }]);
        assert_eq!(result, Err(DiffError::IndexOutOfRange { at: 2, len: 2 }));
    }
}
