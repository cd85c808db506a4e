//! Round-robin rotation over a fixed, non-empty list.

use crate::error::{Result, SupplyRiskError};

/// Cyclic cursor. Reading the next entry advances the cursor.
#[derive(Debug, Clone)]
pub struct Rotation<T> {
    items: Vec<T>,
    position: usize,
    consumed: u64,
}

impl<T> Rotation<T> {
    pub fn new(name: &str, items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(SupplyRiskError::EmptyRotation {
                name: name.to_string(),
            });
        }
        Ok(Self {
            items,
            position: 0,
            consumed: 0,
        })
    }

    /// Return the entry under the cursor and advance, wrapping at the end.
    pub fn next_item(&mut self) -> &T {
        let index = self.position;
        self.position = (self.position + 1) % self.items.len();
        self.consumed += 1;
        &self.items[index]
    }

    /// Move the cursor to `position`, wrapping modulo the list length.
    pub fn seek(&mut self, position: usize) {
        self.position = position % self.items.len();
    }

    /// Entry that the next call to [`Rotation::next_item`] will return.
    pub fn peek(&self) -> &T {
        &self.items[self.position]
    }

    /// Index of the next entry to be consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of entries consumed since creation.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rotation_rejected() {
        let result = Rotation::<String>::new("suppliers", vec![]);
        assert!(matches!(result, Err(SupplyRiskError::EmptyRotation { .. })));
    }

    #[test]
    fn test_wraps_at_end() {
        let mut r = Rotation::new("abc", vec!['a', 'b', 'c']).unwrap();
        let seen: String = (0..7).map(|_| *r.next_item()).collect();
        assert_eq!(seen, "abcabca");
        assert_eq!(r.position(), 1);
        assert_eq!(r.consumed(), 7);
        assert_eq!(*r.peek(), 'b');
    }

    #[test]
    fn test_seek_wraps() {
        let mut r = Rotation::new("abc", vec!['a', 'b', 'c']).unwrap();
        r.seek(5);
        assert_eq!(r.position(), 2);
        assert_eq!(*r.next_item(), 'c');
        assert_eq!(r.consumed(), 1);
    }

    #[test]
    fn test_single_entry() {
        let mut r = Rotation::new("one", vec![5]).unwrap();
        assert_eq!(*r.next_item(), 5);
        assert_eq!(*r.next_item(), 5);
        assert_eq!(r.position(), 0);
    }
}
