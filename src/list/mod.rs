//! Doubly linked list over a typed allocation source
//!
//! # Safety
//!
//! Nodes are raw heap or pool blocks linked through `NonNull` pointers:
//! - Every node is exclusively owned by exactly one list at a time; splice
//!   transfers ownership, it never duplicates
//! - The element is moved out or dropped in place before its node block is
//!   released, on every removal path
//! - Element-adding operations allocate and construct before touching any
//!   link, so a failed allocation or a panicking element constructor leaves
//!   the list exactly as it was
//!
//! ## Invariants
//!
//! - Walking `next` from `head` visits exactly `len` nodes and ends at
//!   `tail`; the same holds walking `prev` from `tail`
//! - `head.prev` and `tail.next` are always `None`
//! - Detached nodes have both links cleared before they are re-linked

mod cursor;
mod iter;

use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;
use std::collections::LinkedList;

pub use cursor::CursorMut;
pub use iter::{IntoIter, Iter, IterMut};

use crate::allocator::{BlockSource, PoolSource, Typed};
use crate::error::AllocResult;

/// Number of merge buckets in [`List::sort_by`]; enough for any length
/// representable in a `usize`.
const SORT_BUCKETS: usize = 64;

struct Node<T> {
    next: Option<NonNull<Node<T>>>,
    prev: Option<NonNull<Node<T>>>,
    element: T,
}

/// Doubly linked list whose nodes come from a [`BlockSource`]
///
/// With the default [`PoolSource`] every node of a registered size is served
/// by the process-wide size-class pools; any other source can be supplied
/// through [`new_in`](Self::new_in). Lists over the same source value are
/// interchangeable for [`append`](Self::append), [`merge`](Self::merge) and
/// cursor splicing: nodes moved between them are freed through the
/// destination's source.
pub struct List<T, S: BlockSource = PoolSource> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    alloc: Typed<Node<T>, S>,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> List<T, PoolSource> {
    /// Creates an empty list over the process-wide pool registry
    pub fn new() -> Self {
        Self::new_in(PoolSource)
    }

    /// Creates a list of `len` default values
    ///
    /// # Errors
    /// Propagates allocation failure; nothing is leaked.
    pub fn with_len(len: usize) -> AllocResult<Self>
    where
        T: Default,
    {
        let mut list = Self::new();
        list.resize_with(len, T::default)?;
        Ok(list)
    }

    /// Creates a list of `len` clones of `elem`
    ///
    /// # Errors
    /// Propagates allocation failure; nothing is leaked.
    pub fn from_elem(elem: T, len: usize) -> AllocResult<Self>
    where
        T: Clone,
    {
        let mut list = Self::new();
        list.resize(len, elem)?;
        Ok(list)
    }

    /// Creates a list from an iterator
    ///
    /// On allocation failure the partially built list is torn down and the
    /// error returned; a panic from the iterator unwinds the same way.
    pub fn try_from_iter<I: IntoIterator<Item = T>>(iter: I) -> AllocResult<Self> {
        let mut list = Self::new();
        list.try_extend(iter)?;
        Ok(list)
    }
}

impl<T, S: BlockSource> List<T, S> {
    /// Creates an empty list over an explicit source
    pub fn new_in(source: S) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc: Typed::new_in(source),
            marker: PhantomData,
        }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the first element
    pub fn front(&self) -> Option<&T> {
        // SAFETY: head is a live node owned by this list.
        self.head.map(|node| unsafe { &node.as_ref().element })
    }

    /// Returns a mutable reference to the first element
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: head is a live node owned by this list, borrowed uniquely
        // through &mut self.
        self.head.map(|mut node| unsafe { &mut node.as_mut().element })
    }

    /// Returns a reference to the last element
    pub fn back(&self) -> Option<&T> {
        // SAFETY: tail is a live node owned by this list.
        self.tail.map(|node| unsafe { &node.as_ref().element })
    }

    /// Returns a mutable reference to the last element
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: tail is a live node owned by this list, borrowed uniquely
        // through &mut self.
        self.tail.map(|mut node| unsafe { &mut node.as_mut().element })
    }

    /// Returns a forward iterator over the elements
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.head,
            tail: self.tail,
            len: self.len,
            marker: PhantomData,
        }
    }

    /// Returns a forward iterator yielding mutable references
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head,
            tail: self.tail,
            len: self.len,
            marker: PhantomData,
        }
    }

    /// Returns a cursor parked on the first element, or on the ghost
    /// position if the list is empty
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, S> {
        CursorMut {
            current: self.head,
            index: 0,
            list: self,
        }
    }

    /// Returns a cursor parked on the last element, or on the ghost
    /// position if the list is empty
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, S> {
        CursorMut {
            current: self.tail,
            index: self.len.saturating_sub(1),
            list: self,
        }
    }

    /// Returns `true` if some element equals `value`
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|elt| elt == value)
    }

    /// Adds `elt` at the front
    ///
    /// # Errors
    /// On allocation failure the list is unchanged.
    pub fn push_front(&mut self, elt: T) -> AllocResult<()> {
        let node = self.allocate_node(elt)?;
        self.push_node_front(node);
        Ok(())
    }

    /// Adds `elt` at the back
    ///
    /// # Errors
    /// On allocation failure the list is unchanged.
    pub fn push_back(&mut self, elt: T) -> AllocResult<()> {
        let node = self.allocate_node(elt)?;
        self.push_node_back(node);
        Ok(())
    }

    /// Removes and returns the first element
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.detach_front()?;
        // SAFETY: node was just detached and is exclusively owned here.
        Some(unsafe { self.finalize_node(node) })
    }

    /// Removes and returns the last element
    pub fn pop_back(&mut self) -> Option<T> {
        let node = self.detach_back()?;
        // SAFETY: node was just detached and is exclusively owned here.
        Some(unsafe { self.finalize_node(node) })
    }

    /// Moves all elements of `other` to the back of `self` in O(1)
    ///
    /// `other` is left empty. Both lists must be over interchangeable
    /// sources; transplanted nodes are later freed through `self`'s source.
    pub fn append(&mut self, other: &mut Self) {
        let Some((other_head, other_tail, other_len)) = other.take_all() else {
            return;
        };
        // SAFETY: the run [other_head, other_tail] is fully detached from
        // other and spliced behind our tail in one step.
        unsafe { self.splice_nodes(self.tail, None, other_head, other_tail, other_len) };
    }

    /// Moves all elements of `other` to the front of `self` in O(1)
    ///
    /// `other` is left empty.
    pub fn prepend(&mut self, other: &mut Self) {
        let Some((other_head, other_tail, other_len)) = other.take_all() else {
            return;
        };
        // SAFETY: as in append, with the run spliced before our head.
        unsafe { self.splice_nodes(None, self.head, other_head, other_tail, other_len) };
    }

    /// Exchanges the contents of two lists
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Appends every item of `iter`, all or nothing
    ///
    /// Items are first collected into a detached list and spliced in one
    /// step, so an allocation failure or a panic from the iterator leaves
    /// `self` untouched and frees everything built so far.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> AllocResult<()>
    where
        S: Clone,
    {
        let mut staged = self.sibling();
        for elt in iter {
            staged.push_back(elt)?;
        }
        self.append(&mut staged);
        Ok(())
    }

    /// Fallible clone of the list and its elements
    ///
    /// # Errors
    /// On allocation failure everything built so far is freed.
    pub fn try_clone(&self) -> AllocResult<Self>
    where
        T: Clone,
        S: Clone,
    {
        let mut cloned = self.sibling();
        for elt in self.iter() {
            cloned.push_back(elt.clone())?;
        }
        Ok(cloned)
    }

    /// Shrinks or grows the list to `len` elements, filling with clones of
    /// `value`
    ///
    /// Growth is all or nothing; shrinking cannot fail.
    pub fn resize(&mut self, len: usize, value: T) -> AllocResult<()>
    where
        T: Clone,
        S: Clone,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        let missing = len - self.len;
        self.try_extend(core::iter::repeat_n(value, missing))
    }

    /// Shrinks or grows the list to `len` elements, filling with values from
    /// `f`
    pub fn resize_with(&mut self, len: usize, f: impl FnMut() -> T) -> AllocResult<()>
    where
        S: Clone,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        let missing = len - self.len;
        self.try_extend(core::iter::repeat_with(f).take(missing))
    }

    /// Replaces the contents with `len` copies of `value`
    ///
    /// The first `min(self.len, len)` elements are overwritten in place by
    /// clone-assignment; the rest is truncated or appended. Appending is all
    /// or nothing, overwrites already performed are kept on failure.
    pub fn assign(&mut self, len: usize, value: &T) -> AllocResult<()>
    where
        T: Clone,
        S: Clone,
    {
        let mut remaining = len;
        for slot in self.iter_mut() {
            if remaining == 0 {
                break;
            }
            slot.clone_from(value);
            remaining -= 1;
        }
        if remaining == 0 {
            self.truncate(len);
            Ok(())
        } else {
            self.try_extend(core::iter::repeat_n(value.clone(), remaining))
        }
    }

    /// Drops elements from the back until at most `len` remain
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            drop(self.pop_back());
        }
    }

    /// Removes all elements
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Reverses the list in place in O(n)
    ///
    /// Only links are rewritten; elements are neither moved nor copied.
    pub fn reverse(&mut self) {
        let mut node = self.head;
        while let Some(mut cur) = node {
            // SAFETY: cur is a live node owned by this list; swapping its
            // links keeps the cyclic structure consistent once head and tail
            // are exchanged below.
            unsafe {
                let cur = cur.as_mut();
                mem::swap(&mut cur.prev, &mut cur.next);
                node = cur.prev;
            }
        }
        mem::swap(&mut self.head, &mut self.tail);
    }

    /// Merges `other` into `self`, assuming both are sorted by `<`
    ///
    /// Stable: on ties, elements already in `self` stay in front. `other` is
    /// left empty. O(1) pointer moves per transferred node.
    pub fn merge(&mut self, other: &mut Self)
    where
        T: PartialOrd,
    {
        self.merge_impl(other, &mut |a, b| a < b);
    }

    /// Merges `other` into `self` with `less` as the ordering
    ///
    /// A node moves from `other` only when strictly less than the current
    /// element of `self`, which keeps the merge stable.
    pub fn merge_by(&mut self, other: &mut Self, mut less: impl FnMut(&T, &T) -> bool) {
        self.merge_impl(other, &mut less);
    }

    /// Sorts the list by `<` in O(n log n) without moving elements
    pub fn sort(&mut self)
    where
        T: PartialOrd,
        S: Clone,
    {
        self.sort_impl(&mut |a, b| a < b);
    }

    /// Sorts the list with `less` as the ordering
    ///
    /// Bottom-up bucketed merge sort: elements are detached one at a time
    /// and cascaded through doubling runs, then the runs are merged from
    /// shortest to longest. Stable, pointer moves only.
    pub fn sort_by(&mut self, mut less: impl FnMut(&T, &T) -> bool)
    where
        S: Clone,
    {
        self.sort_impl(&mut less);
    }

    /// Removes the second of every adjacent equal pair
    ///
    /// Only adjacent duplicates are removed; a sorted list comes out fully
    /// de-duplicated.
    pub fn unique(&mut self)
    where
        T: PartialEq,
    {
        self.unique_by(|a, b| a == b);
    }

    /// Removes adjacent duplicates as decided by `same`
    ///
    /// `same` is called as `same(kept, candidate)`; the first element of
    /// every run survives.
    pub fn unique_by(&mut self, mut same: impl FnMut(&T, &T) -> bool) {
        let mut node = self.head;
        while let Some(cur) = node {
            // SAFETY: cur is live; next is either None or a live neighbor.
            let next = unsafe { cur.as_ref().next };
            let Some(candidate) = next else { break };
            // SAFETY: both references die before any relink below.
            let duplicate =
                unsafe { same(&cur.as_ref().element, &candidate.as_ref().element) };
            if duplicate {
                // SAFETY: candidate is owned by this list; unlink detaches it
                // and finalize drops the element before freeing the block.
                unsafe {
                    self.unlink_node(candidate);
                    drop(self.finalize_node(candidate));
                }
                // Stay on cur to compare against the new neighbor
            } else {
                node = next;
            }
        }
    }

    fn merge_impl(&mut self, other: &mut Self, less: &mut impl FnMut(&T, &T) -> bool) {
        let mut node = self.head;
        while let Some(cur) = node {
            let Some(front) = other.head else { break };
            // SAFETY: front and cur are live nodes of their lists; the
            // references die before any relink.
            let take = unsafe { less(&front.as_ref().element, &cur.as_ref().element) };
            if take {
                if let Some(taken) = other.detach_front() {
                    // SAFETY: taken is fully detached; cur.prev and cur are
                    // a valid insertion point in self.
                    unsafe {
                        let prev = cur.as_ref().prev;
                        self.splice_nodes(prev, Some(cur), taken, taken, 1);
                    }
                }
            } else {
                // SAFETY: cur is live; next is None or a live neighbor.
                node = unsafe { cur.as_ref().next };
            }
        }
        // Whatever is left in other is greater than our tail
        self.append(other);
    }

    fn sort_impl(&mut self, less: &mut impl FnMut(&T, &T) -> bool)
    where
        S: Clone,
    {
        if self.len < 2 {
            return;
        }

        let mut carry = self.sibling();
        let mut counter: [Self; SORT_BUCKETS] = core::array::from_fn(|_| self.sibling());
        let mut fill = 0;

        while let Some(node) = self.detach_front() {
            carry.push_node_front(node);
            let mut i = 0;
            while i < fill && !counter[i].is_empty() {
                counter[i].merge_impl(&mut carry, less);
                mem::swap(&mut carry, &mut counter[i]);
                i += 1;
            }
            mem::swap(&mut carry, &mut counter[i]);
            if i == fill {
                fill += 1;
            }
        }

        for i in 1..fill {
            let (shorter, longer) = counter.split_at_mut(i);
            longer[0].merge_impl(&mut shorter[i - 1], less);
        }
        mem::swap(self, &mut counter[fill - 1]);
    }

    /// Empty list sharing this list's source
    fn sibling(&self) -> Self
    where
        S: Clone,
    {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc: self.alloc.clone(),
            marker: PhantomData,
        }
    }

    fn allocate_node(&self, element: T) -> AllocResult<NonNull<Node<T>>> {
        let node = self.alloc.allocate(1)?;
        // SAFETY: fresh storage for exactly one node.
        unsafe {
            self.alloc.construct(
                node,
                Node {
                    next: None,
                    prev: None,
                    element,
                },
            );
        }
        Ok(node)
    }

    /// Moves the element out of a detached node and releases the block
    ///
    /// # Safety
    /// `node` must be detached from every list and not referenced again.
    unsafe fn finalize_node(&mut self, node: NonNull<Node<T>>) -> T {
        // The element leaves the node before the block goes back to the
        // source; no path reclaims first.
        // SAFETY: node is a live, exclusively owned allocation of one Node.
        let inner = unsafe { node.as_ptr().read() };
        // SAFETY: storage for one node from this source, element moved out.
        unsafe { self.alloc.deallocate(node, 1) };
        inner.element
    }

    fn push_node_front(&mut self, mut node: NonNull<Node<T>>) {
        // SAFETY: node is detached and exclusively owned; head is None or a
        // live node of this list.
        unsafe {
            node.as_mut().prev = None;
            node.as_mut().next = self.head;
            match self.head {
                Some(mut head) => head.as_mut().prev = Some(node),
                None => self.tail = Some(node),
            }
        }
        self.head = Some(node);
        self.len += 1;
    }

    fn push_node_back(&mut self, mut node: NonNull<Node<T>>) {
        // SAFETY: mirror of push_node_front at the tail.
        unsafe {
            node.as_mut().next = None;
            node.as_mut().prev = self.tail;
            match self.tail {
                Some(mut tail) => tail.as_mut().next = Some(node),
                None => self.head = Some(node),
            }
        }
        self.tail = Some(node);
        self.len += 1;
    }

    /// Detaches the first node without finalizing it
    fn detach_front(&mut self) -> Option<NonNull<Node<T>>> {
        let mut front = self.head?;
        // SAFETY: front is the live head; the new head's prev is cleared and
        // the detached node's links are reset.
        unsafe {
            self.head = front.as_ref().next;
            match self.head {
                Some(mut head) => head.as_mut().prev = None,
                None => self.tail = None,
            }
            front.as_mut().next = None;
            front.as_mut().prev = None;
        }
        self.len -= 1;
        Some(front)
    }

    /// Detaches the last node without finalizing it
    fn detach_back(&mut self) -> Option<NonNull<Node<T>>> {
        let mut back = self.tail?;
        // SAFETY: mirror of detach_front at the tail.
        unsafe {
            self.tail = back.as_ref().prev;
            match self.tail {
                Some(mut tail) => tail.as_mut().next = None,
                None => self.head = None,
            }
            back.as_mut().next = None;
            back.as_mut().prev = None;
        }
        self.len -= 1;
        Some(back)
    }

    /// Unlinks `node` from its position, fixing up head and tail
    ///
    /// # Safety
    /// `node` must be a live node of this list.
    unsafe fn unlink_node(&mut self, mut node: NonNull<Node<T>>) {
        // SAFETY: node and its neighbors belong to this list.
        let node = unsafe { node.as_mut() };
        match node.prev {
            // SAFETY: prev is a live node of this list.
            Some(mut prev) => unsafe { prev.as_mut().next = node.next },
            None => self.head = node.next,
        }
        match node.next {
            // SAFETY: next is a live node of this list.
            Some(mut next) => unsafe { next.as_mut().prev = node.prev },
            None => self.tail = node.prev,
        }
        node.next = None;
        node.prev = None;
        self.len -= 1;
    }

    /// Splices the detached run `[splice_start, splice_end]` of
    /// `splice_length` nodes between two adjacent positions of this list
    ///
    /// `existing_prev` is `None` when inserting at the front,
    /// `existing_next` is `None` when inserting at the back. All pointer
    /// mutation happens after any allocation or construction succeeded.
    ///
    /// # Safety
    /// The run must be fully detached, internally well linked and counted by
    /// `splice_length`; `existing_prev` and `existing_next` must be adjacent
    /// in this list (or the respective end).
    unsafe fn splice_nodes(
        &mut self,
        existing_prev: Option<NonNull<Node<T>>>,
        existing_next: Option<NonNull<Node<T>>>,
        mut splice_start: NonNull<Node<T>>,
        mut splice_end: NonNull<Node<T>>,
        splice_length: usize,
    ) {
        if let Some(mut existing_prev) = existing_prev {
            // SAFETY: live node of this list per the caller's contract.
            unsafe { existing_prev.as_mut().next = Some(splice_start) };
        } else {
            self.head = Some(splice_start);
        }
        if let Some(mut existing_next) = existing_next {
            // SAFETY: live node of this list per the caller's contract.
            unsafe { existing_next.as_mut().prev = Some(splice_end) };
        } else {
            self.tail = Some(splice_end);
        }
        // SAFETY: the run is exclusively owned by the caller.
        unsafe {
            splice_start.as_mut().prev = existing_prev;
            splice_end.as_mut().next = existing_next;
        }
        self.len += splice_length;
    }

    /// Takes the whole node chain out of the list, leaving it empty
    fn take_all(&mut self) -> Option<(NonNull<Node<T>>, NonNull<Node<T>>, usize)> {
        let head = self.head.take()?;
        let tail = self.tail.take()?;
        let len = mem::replace(&mut self.len, 0);
        Some((head, tail, len))
    }

    /// Splits off everything after `split_node`; `None` splits off the
    /// entire list
    ///
    /// # Safety
    /// `split_node` must be a live node of this list sitting at index
    /// `at - 1`.
    unsafe fn split_off_after_node(
        &mut self,
        split_node: Option<NonNull<Node<T>>>,
        at: usize,
    ) -> Self
    where
        S: Clone,
    {
        let Some(mut split_node) = split_node else {
            let sibling = self.sibling();
            return mem::replace(self, sibling);
        };

        // SAFETY: split_node is live; everything after it becomes the
        // second list.
        let second_head = unsafe { split_node.as_mut().next.take() };
        let second_tail = match second_head {
            Some(mut head) => {
                // SAFETY: head of the split-off run, now detached in front.
                unsafe { head.as_mut().prev = None };
                self.tail
            }
            None => None,
        };

        let second = Self {
            head: second_head,
            tail: second_tail,
            len: self.len - at,
            alloc: self.alloc.clone(),
            marker: PhantomData,
        };
        self.tail = Some(split_node);
        self.len = at;
        second
    }

    /// Splits off everything before `split_node`; `None` splits off the
    /// entire list
    ///
    /// # Safety
    /// `split_node` must be a live node of this list sitting at index `at`.
    unsafe fn split_off_before_node(
        &mut self,
        split_node: Option<NonNull<Node<T>>>,
        at: usize,
    ) -> Self
    where
        S: Clone,
    {
        let Some(mut split_node) = split_node else {
            let sibling = self.sibling();
            return mem::replace(self, sibling);
        };

        // SAFETY: split_node is live; everything before it becomes the
        // first list.
        let first_tail = unsafe { split_node.as_mut().prev.take() };
        let first_head = match first_tail {
            Some(mut tail) => {
                // SAFETY: tail of the split-off run, now detached behind.
                unsafe { tail.as_mut().next = None };
                self.head
            }
            None => None,
        };

        let first = Self {
            head: first_head,
            tail: first_tail,
            len: at,
            alloc: self.alloc.clone(),
            marker: PhantomData,
        };
        self.head = Some(split_node);
        self.len -= at;
        first
    }
}

impl<T, S: BlockSource> Drop for List<T, S> {
    fn drop(&mut self) {
        struct DropGuard<'a, T, S: BlockSource>(&'a mut List<T, S>);

        impl<T, S: BlockSource> Drop for DropGuard<'_, T, S> {
            fn drop(&mut self) {
                // Keep freeing nodes even if an element drop panicked
                while self.0.pop_front().is_some() {}
            }
        }

        while let Some(node) = self.detach_front() {
            let guard = DropGuard(self);
            // SAFETY: node was just detached; finalize drops the element and
            // frees the block.
            drop(unsafe { guard.0.finalize_node(node) });
            mem::forget(guard);
        }
    }
}

impl<T> Default for List<T, PoolSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, S: BlockSource + Clone> Clone for List<T, S> {
    /// Clones the list, panicking on allocation failure like the standard
    /// collections; use [`try_clone`](List::try_clone) to handle it instead
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(cloned) => cloned,
            Err(err) => panic!("list clone failed: {err}"),
        }
    }
}

impl<T: fmt::Debug, S: BlockSource> fmt::Debug for List<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, S1: BlockSource, S2: BlockSource> PartialEq<List<T, S2>> for List<T, S1> {
    fn eq(&self, other: &List<T, S2>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, S: BlockSource> Eq for List<T, S> {}

/// Interoperability comparison against the standard library's list
impl<T: PartialEq, S: BlockSource> PartialEq<LinkedList<T>> for List<T, S> {
    fn eq(&self, other: &LinkedList<T>) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<'a, T, S: BlockSource> IntoIterator for &'a List<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, S: BlockSource> IntoIterator for &'a mut List<T, S> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, S: BlockSource> IntoIterator for List<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T, S>;

    fn into_iter(self) -> IntoIter<T, S> {
        IntoIter { list: self }
    }
}

// SAFETY: List owns its nodes and elements outright; sending the list sends
// the whole ownership graph. No shared interior state beyond the source.
unsafe impl<T: Send, S: BlockSource + Send> Send for List<T, S> {}

// SAFETY: shared access only reads through & references to nodes owned by
// the list; mutation requires &mut.
unsafe impl<T: Sync, S: BlockSource + Sync> Sync for List<T, S> {}
