//! Iterators over [`List`](super::List)

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use super::{List, Node};
use crate::allocator::BlockSource;

/// Borrowing forward iterator, double ended
pub struct Iter<'a, T> {
    pub(super) head: Option<NonNull<Node<T>>>,
    pub(super) tail: Option<NonNull<Node<T>>>,
    pub(super) len: usize,
    pub(super) marker: PhantomData<&'a Node<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            len: self.len,
            marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            // SAFETY: the node is alive for 'a; len bounds the walk so head
            // never runs past tail.
            let node = unsafe { node.as_ref() };
            self.len -= 1;
            self.head = node.next;
            &node.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            // SAFETY: as in next, walking prev from the tail.
            let node = unsafe { node.as_ref() };
            self.len -= 1;
            self.tail = node.prev;
            &node.element
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Borrowing forward iterator yielding mutable references, double ended
pub struct IterMut<'a, T> {
    pub(super) head: Option<NonNull<Node<T>>>,
    pub(super) tail: Option<NonNull<Node<T>>>,
    pub(super) len: usize,
    pub(super) marker: PhantomData<&'a mut Node<T>>,
}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|mut node| {
            // SAFETY: the iterator holds the list's unique borrow and each
            // node is yielded at most once, so the &mut does not alias.
            let node = unsafe { node.as_mut() };
            self.len -= 1;
            self.head = node.next;
            &mut node.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|mut node| {
            // SAFETY: as in next; front and back never overlap while len > 0.
            let node = unsafe { node.as_mut() };
            self.len -= 1;
            self.tail = node.prev;
            &mut node.element
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator; remaining elements are dropped with the iterator
pub struct IntoIter<T, S: BlockSource> {
    pub(super) list: List<T, S>,
}

impl<T: fmt::Debug, S: BlockSource> fmt::Debug for IntoIter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T, S: BlockSource> Iterator for IntoIter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, S: BlockSource> DoubleEndedIterator for IntoIter<T, S> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, S: BlockSource> ExactSizeIterator for IntoIter<T, S> {}
impl<T, S: BlockSource> FusedIterator for IntoIter<T, S> {}
