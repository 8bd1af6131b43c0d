//! Circular position over a fixed, ordered sequence of screens.

use crate::error::{Error, Result};

/// Which way to move through the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Current index into a sequence of `len` screens.
///
/// The index is always in `[0, len)`; the only mutations are
/// [`Navigator::advance`] and the bounds-checked [`Navigator::jump_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    len: usize,
    current: usize,
}

impl Navigator {
    /// Create a navigator positioned at the first screen.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::EmptySequence);
        }
        Ok(Self { len, current: 0 })
    }

    pub fn screen_count(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Move one step, wrapping at both ends. Returns the new index.
    pub fn advance(&mut self, direction: Direction) -> usize {
        // (current + delta + len) mod len, with delta = -1 written as len - 1
        // so the arithmetic never goes negative.
        let step = match direction {
            Direction::Next => 1,
            Direction::Prev => self.len - 1,
        };
        self.current = (self.current + step) % self.len;
        self.current
    }

    /// Jump straight to `index`. Out-of-range indices leave the position alone.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(matches!(Navigator::new(0), Err(Error::EmptySequence)));
    }

    #[test]
    fn test_wraps_at_both_ends() {
        let mut nav = Navigator::new(4).unwrap();
        assert_eq!(nav.advance(Direction::Prev), 3);
        assert_eq!(nav.advance(Direction::Next), 0);

        for expected in [1, 2, 3, 0] {
            assert_eq!(nav.advance(Direction::Next), expected);
        }
    }

    #[test]
    fn test_single_screen_stays_put() {
        let mut nav = Navigator::new(1).unwrap();
        assert_eq!(nav.advance(Direction::Next), 0);
        assert_eq!(nav.advance(Direction::Prev), 0);
    }

    #[test]
    fn test_index_always_in_range_and_next_prev_inverse() {
        let mut rng = StdRng::seed_from_u64(20_10);
        for len in 1..=9 {
            let mut nav = Navigator::new(len).unwrap();
            for _ in 0..500 {
                let before = nav.current();
                let direction = if rng.gen_bool(0.5) {
                    Direction::Next
                } else {
                    Direction::Prev
                };
                nav.advance(direction);
                assert!(nav.current() < len);

                let mut probe = nav.clone();
                probe.advance(Direction::Next);
                probe.advance(Direction::Prev);
                assert_eq!(probe.current(), nav.current());

                let mut back = nav.clone();
                back.advance(match direction {
                    Direction::Next => Direction::Prev,
                    Direction::Prev => Direction::Next,
                });
                assert_eq!(back.current(), before);
            }
        }
    }

    #[test]
    fn test_jump_to_bounds() {
        let mut nav = Navigator::new(3).unwrap();
        assert!(nav.jump_to(2));
        assert_eq!(nav.current(), 2);
        assert!(!nav.jump_to(3));
        assert_eq!(nav.current(), 2);
    }
}
