//! Shuffled per-partition schedule of which operator each tile receives.

use std::{iter, vec};

use math_maze_core::OperationType;
use rand::{seq::SliceRandom, Rng};

/// Shuffled run of "first operation" flags consumed one per tile.
///
/// `true` selects addition or multiplication, `false` their counterpart.
#[derive(Debug)]
pub(crate) struct OperationSequence {
    kinds: vec::IntoIter<bool>,
}

impl OperationSequence {
    /// Schedules `length` tiles for `operation`.
    ///
    /// Mixed types receive `length / 2` counterpart tiles, subtraction and
    /// division alone receive nothing else, and addition and multiplication
    /// alone never receive their counterpart.
    pub(crate) fn shuffled<R: Rng + ?Sized>(
        length: usize,
        operation: OperationType,
        rng: &mut R,
    ) -> Self {
        let second = if operation.is_mixed() {
            length / 2
        } else if !operation.first_operation() {
            length
        } else {
            0
        };

        let mut kinds: Vec<bool> = iter::repeat(true)
            .take(length - second)
            .chain(iter::repeat(false).take(second))
            .collect();
        kinds.shuffle(rng);

        Self {
            kinds: kinds.into_iter(),
        }
    }
}

impl Iterator for OperationSequence {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.kinds.next()
    }
}

#[cfg(test)]
mod tests {
    use math_maze_core::OperationType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::OperationSequence;

    fn counts(length: usize, operation: OperationType) -> (usize, usize) {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let kinds: Vec<bool> = OperationSequence::shuffled(length, operation, &mut rng).collect();
        assert_eq!(kinds.len(), length);
        let first = kinds.iter().filter(|first| **first).count();
        (first, length - first)
    }

    #[test]
    fn mixed_types_split_down_the_middle() {
        assert_eq!(counts(9, OperationType::BothAdditionAndSubtraction), (5, 4));
        assert_eq!(counts(10, OperationType::BothMultiplicationAndDivision), (5, 5));
    }

    #[test]
    fn single_types_never_mix() {
        assert_eq!(counts(7, OperationType::Addition), (7, 0));
        assert_eq!(counts(7, OperationType::Multiplication), (7, 0));
        assert_eq!(counts(7, OperationType::Subtraction), (0, 7));
        assert_eq!(counts(7, OperationType::Division), (0, 7));
    }

    #[test]
    fn empty_partition_yields_nothing() {
        assert_eq!(counts(0, OperationType::BothAdditionAndSubtraction), (0, 0));
    }
}
