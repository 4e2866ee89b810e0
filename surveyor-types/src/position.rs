/// An entity that carries a 1-based position inside an ordered sequence.
pub trait Positioned {
    fn position(&self) -> u32;

    fn set_position(&mut self, position: u32);
}

/// An ordered sequence whose entries always occupy positions `1..=len`.
///
/// Every mutation ends in [`Ranked::reindex`], so contiguity is a
/// post-condition of a single routine rather than something each caller has
/// to maintain. Storage order is position order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    items: Vec<T>,
}

impl<T: Positioned> Ranked<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The position the next pushed entry will receive.
    pub fn next_position(&self) -> u32 {
        to_position(self.items.len())
    }

    /// Append an entry at the next position and return that position.
    pub fn push(&mut self, mut item: T) -> u32 {
        let position = self.next_position();
        item.set_position(position);
        self.items.push(item);
        position
    }

    /// Remove the first entry matching `predicate`.
    ///
    /// Every later entry moves up by one position.
    pub fn remove_first(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let index = self.items.iter().position(predicate)?;
        let removed = self.items.remove(index);
        self.reindex();
        Some(removed)
    }

    /// Swap the entry at `position` with the one before it.
    ///
    /// Returns `false` (and changes nothing) at the first position or when
    /// `position` is out of range.
    pub fn swap_with_previous(&mut self, position: u32) -> bool {
        let Some(index) = self.index_of(position) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.items.swap(index - 1, index);
        self.reindex();
        true
    }

    /// Swap the entry at `position` with the one after it.
    ///
    /// Returns `false` (and changes nothing) at the last position or when
    /// `position` is out of range.
    pub fn swap_with_next(&mut self, position: u32) -> bool {
        let Some(index) = self.index_of(position) else {
            return false;
        };
        if index + 1 >= self.items.len() {
            return false;
        }
        self.items.swap(index, index + 1);
        self.reindex();
        true
    }

    /// Get the entry at a 1-based position.
    pub fn get(&self, position: u32) -> Option<&T> {
        self.index_of(position).map(|index| &self.items[index])
    }

    /// Find the first entry matching `predicate`.
    pub fn find(&self, predicate: impl FnMut(&&T) -> bool) -> Option<&T> {
        self.items.iter().find(predicate)
    }

    /// Find the first entry matching `predicate`, mutably.
    ///
    /// Positions must not be changed through the returned reference.
    pub fn find_mut(&mut self, predicate: impl FnMut(&&mut T) -> bool) -> Option<&mut T> {
        self.items.iter_mut().find(predicate)
    }

    /// Iterate in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check that positions are exactly `1..=len` in storage order.
    pub fn is_contiguous(&self) -> bool {
        self.items
            .iter()
            .enumerate()
            .all(|(index, item)| item.position() == to_position(index))
    }

    fn index_of(&self, position: u32) -> Option<usize> {
        let index = usize::try_from(position).ok()?.checked_sub(1)?;
        (index < self.items.len()).then_some(index)
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            let position = to_position(index);
            if item.position() != position {
                item.set_position(position);
            }
        }
        debug_assert!(self.is_contiguous());
    }
}

impl<T: Positioned> Default for Ranked<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Positioned> FromIterator<T> for Ranked<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ranked = Self::new();
        for item in iter {
            ranked.push(item);
        }
        ranked
    }
}

impl<'a, T> IntoIterator for &'a Ranked<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// Zero-based index to one-based position.
fn to_position(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        name: &'static str,
        position: u32,
    }

    impl Positioned for Entry {
        fn position(&self) -> u32 {
            self.position
        }

        fn set_position(&mut self, position: u32) {
            self.position = position;
        }
    }

    fn entry(name: &'static str) -> Entry {
        Entry { name, position: 0 }
    }

    fn layout(ranked: &Ranked<Entry>) -> Vec<(&'static str, u32)> {
        ranked.iter().map(|e| (e.name, e.position)).collect()
    }

    #[test]
    fn push_assigns_next_position() {
        let mut ranked = Ranked::new();
        assert_eq!(ranked.next_position(), 1);
        assert_eq!(ranked.push(entry("a")), 1);
        assert_eq!(ranked.push(entry("b")), 2);
        assert_eq!(ranked.next_position(), 3);
        assert!(ranked.is_contiguous());
    }

    #[test]
    fn remove_renumbers_later_entries() {
        let mut ranked: Ranked<_> = ["a", "b", "c", "d"].into_iter().map(entry).collect();
        let removed = ranked.remove_first(|e| e.name == "b").unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(layout(&ranked), vec![("a", 1), ("c", 2), ("d", 3)]);
        assert!(ranked.remove_first(|e| e.name == "zz").is_none());
    }

    #[test]
    fn swaps_are_disabled_at_the_boundaries() {
        let mut ranked: Ranked<_> = ["a", "b"].into_iter().map(entry).collect();
        assert!(!ranked.swap_with_previous(1));
        assert!(!ranked.swap_with_next(2));
        assert!(!ranked.swap_with_next(0));
        assert!(!ranked.swap_with_previous(9));
        assert_eq!(layout(&ranked), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn swap_changes_exactly_two_entries() {
        let mut ranked: Ranked<_> = ["a", "b", "c", "d"].into_iter().map(entry).collect();
        assert!(ranked.swap_with_previous(3));
        assert_eq!(layout(&ranked), vec![("a", 1), ("c", 2), ("b", 3), ("d", 4)]);
        assert!(ranked.swap_with_next(2));
        assert_eq!(layout(&ranked), vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
    }

    #[test]
    fn get_is_one_based() {
        let ranked: Ranked<_> = ["a", "b"].into_iter().map(entry).collect();
        assert!(ranked.get(0).is_none());
        assert_eq!(ranked.get(1).unwrap().name, "a");
        assert_eq!(ranked.get(2).unwrap().name, "b");
        assert!(ranked.get(3).is_none());
    }
}
