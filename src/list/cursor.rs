//! Mutable cursor over a [`List`](super::List)
//!
//! A cursor is a position handle: it parks either on an element or on the
//! ghost position between tail and head, the seam a sentinel node would
//! occupy. Stepping past either end lands on the ghost, so the cursor can
//! walk the list cyclically in both directions.

use core::ptr::NonNull;

use super::{List, Node};
use crate::allocator::BlockSource;
use crate::error::AllocResult;

/// Cursor with exclusive access to its list
///
/// Supports editing at the current position: insertion on either side,
/// removal, O(1) whole-list splicing and splitting.
pub struct CursorMut<'a, T, S: BlockSource> {
    pub(super) list: &'a mut List<T, S>,
    pub(super) current: Option<NonNull<Node<T>>>,
    /// When parked on the ghost this holds `list.len`
    pub(super) index: usize,
}

impl<T, S: BlockSource> CursorMut<'_, T, S> {
    /// Position of the current element, or `None` on the ghost
    pub fn index(&self) -> Option<usize> {
        let _ = self.current?;
        Some(self.index)
    }

    /// Steps towards the back; from the last element onto the ghost, from
    /// the ghost onto the first element
    pub fn move_next(&mut self) {
        match self.current.take() {
            None => {
                self.current = self.list.head;
                self.index = 0;
            }
            Some(current) => {
                // SAFETY: current is a live node of the borrowed list.
                self.current = unsafe { current.as_ref().next };
                self.index += 1;
            }
        }
    }

    /// Steps towards the front; from the first element onto the ghost, from
    /// the ghost onto the last element
    pub fn move_prev(&mut self) {
        match self.current.take() {
            None => {
                self.current = self.list.tail;
                self.index = self.list.len.saturating_sub(1);
            }
            Some(current) => {
                // SAFETY: current is a live node of the borrowed list.
                self.current = unsafe { current.as_ref().prev };
                self.index = self.index.checked_sub(1).unwrap_or(self.list.len);
            }
        }
    }

    /// Mutable reference to the current element, `None` on the ghost
    pub fn current(&mut self) -> Option<&mut T> {
        // SAFETY: exclusive borrow of the list through the cursor.
        self.current
            .map(|mut node| unsafe { &mut node.as_mut().element })
    }

    /// Peeks at the element after the cursor without moving it
    pub fn peek_next(&mut self) -> Option<&mut T> {
        let next = match self.current {
            // SAFETY: current is a live node of the borrowed list.
            Some(current) => unsafe { current.as_ref().next },
            None => self.list.head,
        };
        // SAFETY: exclusive borrow of the list through the cursor.
        next.map(|mut node| unsafe { &mut node.as_mut().element })
    }

    /// Peeks at the element before the cursor without moving it
    pub fn peek_prev(&mut self) -> Option<&mut T> {
        let prev = match self.current {
            // SAFETY: current is a live node of the borrowed list.
            Some(current) => unsafe { current.as_ref().prev },
            None => self.list.tail,
        };
        // SAFETY: exclusive borrow of the list through the cursor.
        prev.map(|mut node| unsafe { &mut node.as_mut().element })
    }

    /// Inserts `item` after the cursor; on the ghost this is the new front
    ///
    /// # Errors
    /// On allocation failure the list is unchanged.
    pub fn insert_after(&mut self, item: T) -> AllocResult<()> {
        let node = self.list.allocate_node(item)?;
        let existing_next = match self.current {
            // SAFETY: current is a live node of the borrowed list.
            Some(current) => unsafe { current.as_ref().next },
            None => self.list.head,
        };
        // SAFETY: node is freshly built and detached; the anchors are
        // adjacent by construction.
        unsafe {
            self.list
                .splice_nodes(self.current, existing_next, node, node, 1);
        }
        if self.current.is_none() {
            // Ghost index tracks the grown length
            self.index = self.list.len;
        }
        Ok(())
    }

    /// Inserts `item` before the cursor; on the ghost this is the new back
    ///
    /// # Errors
    /// On allocation failure the list is unchanged.
    pub fn insert_before(&mut self, item: T) -> AllocResult<()> {
        let node = self.list.allocate_node(item)?;
        let existing_prev = match self.current {
            // SAFETY: current is a live node of the borrowed list.
            Some(current) => unsafe { current.as_ref().prev },
            None => self.list.tail,
        };
        // SAFETY: as in insert_after, mirrored.
        unsafe {
            self.list
                .splice_nodes(existing_prev, self.current, node, node, 1);
        }
        self.index += 1;
        Ok(())
    }

    /// Removes and returns the current element, parking the cursor on its
    /// successor (or the ghost); `None` on the ghost
    pub fn remove_current(&mut self) -> Option<T> {
        let unlinked = self.current?;
        // SAFETY: unlinked is a live node of the borrowed list; after
        // unlinking it is exclusively owned and finalized exactly once.
        unsafe {
            self.current = unlinked.as_ref().next;
            self.list.unlink_node(unlinked);
            Some(self.list.finalize_node(unlinked))
        }
    }

    /// Splices `other` in after the cursor in O(1); on the ghost the
    /// elements land at the front
    ///
    /// Nodes keep their storage and are later freed through this list's
    /// source, so both lists must be over interchangeable sources.
    pub fn splice_after(&mut self, mut other: List<T, S>) {
        let Some((other_head, other_tail, other_len)) = other.take_all() else {
            return;
        };
        let existing_next = match self.current {
            // SAFETY: current is a live node of the borrowed list.
            Some(current) => unsafe { current.as_ref().next },
            None => self.list.head,
        };
        // SAFETY: the run is fully detached from other; anchors adjacent.
        unsafe {
            self.list
                .splice_nodes(self.current, existing_next, other_head, other_tail, other_len);
        }
        if self.current.is_none() {
            self.index = self.list.len;
        }
    }

    /// Splices `other` in before the cursor in O(1); on the ghost the
    /// elements land at the back
    pub fn splice_before(&mut self, mut other: List<T, S>) {
        let Some((other_head, other_tail, other_len)) = other.take_all() else {
            return;
        };
        let existing_prev = match self.current {
            // SAFETY: current is a live node of the borrowed list.
            Some(current) => unsafe { current.as_ref().prev },
            None => self.list.tail,
        };
        // SAFETY: as in splice_after, mirrored.
        unsafe {
            self.list
                .splice_nodes(existing_prev, self.current, other_head, other_tail, other_len);
        }
        self.index += other_len;
    }

    /// Splits off everything after the cursor in O(1)
    ///
    /// On the ghost the entire contents move to the returned list.
    pub fn split_after(&mut self) -> List<T, S>
    where
        S: Clone,
    {
        let split_off_idx = if self.index == self.list.len {
            0
        } else {
            self.index + 1
        };
        if self.index == self.list.len {
            // Ghost of the now-empty list
            self.index = 0;
        }
        // SAFETY: current sits at split_off_idx - 1 when on an element.
        unsafe { self.list.split_off_after_node(self.current, split_off_idx) }
    }

    /// Splits off everything before the cursor in O(1)
    ///
    /// On the ghost the entire contents move to the returned list. The
    /// current element becomes the front of the remaining list.
    pub fn split_before(&mut self) -> List<T, S>
    where
        S: Clone,
    {
        let split_off_idx = self.index;
        self.index = 0;
        // SAFETY: current sits at split_off_idx when on an element.
        unsafe { self.list.split_off_before_node(self.current, split_off_idx) }
    }

    /// The list the cursor is borrowed from, read-only
    pub fn as_list(&self) -> &List<T, S> {
        self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_slice(values: &[i32]) -> List<i32> {
        List::try_from_iter(values.iter().copied()).expect("allocation")
    }

    fn collect(list: &List<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn walks_cyclically_through_the_ghost() {
        let mut list = from_slice(&[1, 2, 3]);
        let mut cursor = list.cursor_front_mut();
        assert_eq!(cursor.index(), Some(0));
        assert_eq!(cursor.current(), Some(&mut 1));

        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor.index(), Some(2));
        cursor.move_next();
        assert_eq!(cursor.index(), None, "past the back is the ghost");
        cursor.move_next();
        assert_eq!(cursor.index(), Some(0), "wraps to the front");

        cursor.move_prev();
        assert_eq!(cursor.index(), None);
        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&mut 3));
    }

    #[test]
    fn peeks_do_not_move() {
        let mut list = from_slice(&[1, 2]);
        let mut cursor = list.cursor_front_mut();
        assert_eq!(cursor.peek_next(), Some(&mut 2));
        assert_eq!(cursor.peek_prev(), None, "ghost before the front");
        assert_eq!(cursor.index(), Some(0));
    }

    #[test]
    fn insert_on_both_sides() {
        let mut list = from_slice(&[2]);
        let mut cursor = list.cursor_front_mut();
        cursor.insert_before(1).expect("allocation");
        cursor.insert_after(3).expect("allocation");
        assert_eq!(cursor.index(), Some(1));
        drop(cursor);
        assert_eq!(collect(&list), [1, 2, 3]);
    }

    #[test]
    fn ghost_inserts_hit_the_ends() {
        let mut list = from_slice(&[2]);
        let mut cursor = list.cursor_front_mut();
        cursor.move_prev();
        assert_eq!(cursor.index(), None);
        cursor.insert_after(1).expect("allocation");
        cursor.insert_before(3).expect("allocation");
        drop(cursor);
        assert_eq!(collect(&list), [1, 2, 3]);
    }

    #[test]
    fn remove_current_advances() {
        let mut list = from_slice(&[1, 2, 3]);
        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        assert_eq!(cursor.remove_current(), Some(2));
        assert_eq!(cursor.current(), Some(&mut 3));
        assert_eq!(cursor.index(), Some(1));
        drop(cursor);
        assert_eq!(collect(&list), [1, 3]);
    }

    #[test]
    fn insert_then_remove_is_a_round_trip() {
        let mut list = from_slice(&[1, 3]);
        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        cursor.insert_before(2).expect("allocation");
        cursor.move_prev();
        assert_eq!(cursor.remove_current(), Some(2));
        drop(cursor);
        assert_eq!(collect(&list), [1, 3]);
    }

    #[test]
    fn splice_moves_between_lists() {
        // Move the middle of [1, 2, 3] to the front of [4, 5]
        let mut source = from_slice(&[1, 2, 3]);
        let mut cursor = source.cursor_front_mut();
        cursor.move_next();
        let after = cursor.split_after();
        let before = cursor.split_before();
        drop(cursor);

        // source now holds exactly the middle element
        assert_eq!(collect(&source), [2]);
        let mut remainder = before;
        let mut after = after;
        remainder.append(&mut after);
        assert_eq!(collect(&remainder), [1, 3]);

        let mut destination = from_slice(&[4, 5]);
        destination.cursor_front_mut().splice_before(source);
        assert_eq!(collect(&destination), [2, 4, 5]);
        assert_eq!(destination.len(), 3);
    }

    #[test]
    fn splice_on_the_ghost() {
        let mut list = from_slice(&[3]);
        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        assert_eq!(cursor.index(), None);
        cursor.splice_after(from_slice(&[1, 2]));
        cursor.splice_before(from_slice(&[4, 5]));
        drop(cursor);
        assert_eq!(collect(&list), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn split_after_on_ghost_takes_everything() {
        let mut list = from_slice(&[1, 2]);
        let mut cursor = list.cursor_front_mut();
        cursor.move_prev();
        let taken = cursor.split_after();
        drop(cursor);
        assert!(list.is_empty());
        assert_eq!(collect(&taken), [1, 2]);
    }
}
