//! Boxed-chain priority stack
//!
//! Each node owns the node below it through an `Option<Box<Node<T>>>`, and the
//! stack owns the top node. There is no sharing and no reference counting: the
//! chain is a plain singly-linked list walked from top to bottom.
//!
//! # Time Complexity
//!
//! | Operation             | Complexity |
//! |-----------------------|------------|
//! | `push`                | O(1)       |
//! | `pop`                 | O(1)       |
//! | `pop_priority`        | O(n)       |
//! | `has_value`           | O(n)       |
//! | `remove_value`        | O(n)       |
//! | `reorder_by_priority` | O(n)       |
//!
//! # Example
//!
//! ```rust
//! use priority_stack::Stack;
//! use priority_stack::linked::PriorityStack;
//!
//! let mut stack = PriorityStack::new();
//! stack.push(1);
//! stack.push_with_priority(2, true);
//! stack.push(3);
//! stack.push_with_priority(4, true);
//!
//! stack.reorder_by_priority();
//! assert_eq!(stack.to_string(), "[4:P,2:P,3:N,1:N]");
//! assert_eq!(stack.pop(), Ok(4));
//! ```

use crate::traits::{fmt_entries, Stack, StackError};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, trace};

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    value: T,
    has_priority: bool,
    below: Link<T>,
}

/// Priority stack backed by a chain of boxed nodes
///
/// Not internally synchronized; wrap it in a lock to mutate it from several
/// threads.
pub struct PriorityStack<T> {
    top: Link<T>,
    len: usize,
}

impl<T> Drop for PriorityStack<T> {
    fn drop(&mut self) {
        // Unlink one node at a time so long chains don't recurse
        self.clear();
    }
}

impl<T> Stack<T> for PriorityStack<T> {
    fn new() -> Self {
        Self { top: None, len: 0 }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push_with_priority(&mut self, value: T, has_priority: bool) {
        let below = self.top.take();
        self.top = Some(Box::new(Node {
            value,
            has_priority,
            below,
        }));
        self.len += 1;
    }

    fn peek(&self) -> Option<&T> {
        self.top.as_deref().map(|node| &node.value)
    }

    fn peek_priority(&self) -> Option<&T> {
        self.nodes()
            .find(|node| node.has_priority)
            .or(self.top.as_deref())
            .map(|node| &node.value)
    }

    fn pop(&mut self) -> Result<T, StackError> {
        self.unlink_first(|_| true)
            .map(|(_, value)| value)
            .ok_or(StackError::Empty)
    }

    fn pop_priority(&mut self) -> Result<T, StackError> {
        if self.is_empty() {
            return Err(StackError::Empty);
        }
        if let Some((depth, value)) = self.unlink_first(|node| node.has_priority) {
            trace!(depth, "popping priority entry");
            return Ok(value);
        }
        trace!("no priority entry, popping top");
        self.pop()
    }

    fn has_value(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|v| v == value)
    }

    fn remove_value(&mut self, value: &T) -> Result<T, StackError>
    where
        T: PartialEq,
    {
        match self.unlink_first(|node| node.value == *value) {
            Some((depth, removed)) => {
                trace!(depth, "removing value");
                Ok(removed)
            }
            None => {
                trace!(len = self.len, "value not found");
                Err(StackError::ValueNotFound)
            }
        }
    }

    fn reorder_by_priority(&mut self) {
        if self.len <= 1 {
            return;
        }

        let mut flagged: Link<T> = None;
        let mut unflagged: Link<T> = None;
        let mut flagged_tail = &mut flagged;
        let mut unflagged_tail = &mut unflagged;
        let mut flagged_count = 0usize;

        // Detach from the top and append to the matching partition's tail,
        // which keeps the original order within each partition.
        let mut rest = self.top.take();
        while let Some(mut node) = rest {
            rest = node.below.take();
            if node.has_priority {
                flagged_count += 1;
                flagged_tail = &mut flagged_tail.insert(node).below;
            } else {
                unflagged_tail = &mut unflagged_tail.insert(node).below;
            }
        }
        *flagged_tail = unflagged;
        self.top = flagged;

        debug!(
            flagged = flagged_count,
            unflagged = self.len - flagged_count,
            "reordered stack by priority"
        );
    }

    fn priority_count(&self) -> usize {
        self.nodes().filter(|node| node.has_priority).count()
    }

    fn clear(&mut self) {
        let mut link = self.top.take();
        while let Some(mut node) = link {
            link = node.below.take();
        }
        self.len = 0;
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.len);
        values.extend(self.iter().cloned());
        values
    }
}

impl<T> PriorityStack<T> {
    /// Returns an iterator over the values from top to bottom
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.top.as_deref(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over `(value, has_priority)` pairs from top to bottom
    pub fn entries(&self) -> Entries<'_, T> {
        Entries { inner: self.iter() }
    }

    fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        let mut next = self.top.as_deref();
        std::iter::from_fn(move || {
            let node = next?;
            next = node.below.as_deref();
            Some(node)
        })
    }

    /// Splices out the first node (top to bottom) accepted by `matches`
    ///
    /// Returns the node's distance from the top together with its value, in a
    /// single walk down the chain.
    fn unlink_first(&mut self, mut matches: impl FnMut(&Node<T>) -> bool) -> Option<(usize, T)> {
        let mut link = &mut self.top;
        let mut depth = 0;
        while link.as_deref().is_some_and(|node| !matches(node)) {
            if let Some(node) = link {
                link = &mut node.below;
            }
            depth += 1;
        }
        let node = link.take()?;
        let Node { value, below, .. } = *node;
        *link = below;
        self.len -= 1;
        Some((depth, value))
    }
}

impl<T> Default for PriorityStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> fmt::Display for PriorityStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_entries(f, self.entries())
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

impl<T> Extend<T> for PriorityStack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for PriorityStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<T> IntoIterator for PriorityStack<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { stack: self }
    }
}

impl<'a, T> IntoIterator for &'a PriorityStack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`PriorityStack`], top to bottom
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().map(|node| &node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> Iter<'a, T> {
    fn next_node(&mut self) -> Option<&'a Node<T>> {
        let node = self.next?;
        self.next = node.below.as_deref();
        self.remaining -= 1;
        Some(node)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Borrowing iterator over `(value, has_priority)` pairs, top to bottom
pub struct Entries<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (&'a T, bool);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next_node()
            .map(|node| (&node.value, node.has_priority))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Entries<'_, T> {}
impl<T> FusedIterator for Entries<'_, T> {}

/// Owning iterator over a [`PriorityStack`], popping from the top
pub struct IntoIter<T> {
    stack: PriorityStack<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len, Some(self.stack.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(entries: &[(i32, bool)]) -> PriorityStack<i32> {
        // entries are given top to bottom
        let mut stack = PriorityStack::new();
        for &(value, has_priority) in entries.iter().rev() {
            stack.push_with_priority(value, has_priority);
        }
        stack
    }

    #[test]
    fn test_basic_operations() {
        let mut stack = PriorityStack::new();

        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);

        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.peek(), Some(&3));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.pop(), Err(StackError::Empty));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_priority_falls_back_to_top() {
        let mut stack = PriorityStack::new();
        stack.push("v1");
        stack.push("v2");
        stack.push_with_priority("v3", true);

        assert_eq!(stack.pop_priority(), Ok("v3"));
        assert_eq!(stack.pop_priority(), Ok("v2"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_pop_priority_splices_from_middle() {
        let mut stack = stack_of(&[(1, false), (2, false), (3, true), (4, false)]);

        assert_eq!(stack.peek_priority(), Some(&3));
        assert_eq!(stack.pop_priority(), Ok(3));
        assert_eq!(stack.to_vec(), vec![1, 2, 4]);
        assert_eq!(stack.priority_count(), 0);
    }

    #[test]
    fn test_pop_priority_on_empty() {
        let mut stack: PriorityStack<i32> = PriorityStack::new();
        assert_eq!(stack.pop_priority(), Err(StackError::Empty));
        assert_eq!(stack.peek_priority(), None);
    }

    #[test]
    fn test_remove_value() {
        let mut stack = stack_of(&[(1, false), (2, true), (3, false)]);

        assert_eq!(stack.remove_value(&2), Ok(2));
        assert_eq!(stack.to_vec(), vec![1, 3]);
        assert_eq!(stack.remove_value(&1), Ok(1));
        assert_eq!(stack.remove_value(&3), Ok(3));
        assert_eq!(stack.remove_value(&3), Err(StackError::ValueNotFound));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_remove_value_takes_first_match_only() {
        let mut stack = stack_of(&[(5, false), (6, true), (5, true), (7, false)]);

        assert_eq!(stack.remove_value(&5), Ok(5));
        assert_eq!(stack.to_string(), "[6:P,5:P,7:N]");
        assert_eq!(stack.remove_value(&7), Ok(7));
        assert_eq!(stack.to_string(), "[6:P,5:P]");
        assert_eq!(stack.remove_value(&5), Ok(5));
        assert_eq!(stack.remove_value(&5), Err(StackError::ValueNotFound));
        assert_eq!(stack.to_string(), "[6:P]");
        assert_eq!(stack.len(), 1);

        // Pushing after a bottom splice still links correctly
        stack.push(8);
        assert_eq!(stack.pop_priority(), Ok(6));
        assert_eq!(stack.pop(), Ok(8));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_reorder_by_priority() {
        let mut stack = stack_of(&[(1, false), (2, true), (3, false), (4, true)]);

        stack.reorder_by_priority();
        assert_eq!(stack.to_string(), "[2:P,4:P,1:N,3:N]");
        assert_eq!(stack.len(), 4);

        stack.reorder_by_priority();
        assert_eq!(stack.to_string(), "[2:P,4:P,1:N,3:N]");
    }

    #[test]
    fn test_reorder_without_flags_is_noop() {
        let mut stack = stack_of(&[(1, false), (2, false), (3, false)]);
        stack.reorder_by_priority();
        assert_eq!(stack.to_vec(), vec![1, 2, 3]);

        let mut stack = stack_of(&[(1, true), (2, true)]);
        stack.reorder_by_priority();
        assert_eq!(stack.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_display_and_debug() {
        let stack = stack_of(&[(7, true), (8, false)]);
        assert_eq!(stack.to_string(), "[7:P,8:N]");
        assert_eq!(format!("{:?}", stack), "[(7, true), (8, false)]");

        let empty: PriorityStack<i32> = PriorityStack::new();
        assert_eq!(empty.to_string(), "[]");
    }

    #[test]
    fn test_iterators() {
        let stack: PriorityStack<i32> = (1..=4).collect();

        let mut iter = stack.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.len(), 3);

        assert_eq!(stack.to_vec_reversed(), vec![1, 2, 3, 4]);
        assert_eq!(stack.into_iter().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_clear() {
        let mut stack: PriorityStack<i32> = (0..10).collect();
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.peek(), None);
        stack.push(5);
        assert_eq!(stack.pop(), Ok(5));
    }
}
