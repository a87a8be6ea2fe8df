//! Arena-backed priority stack
//!
//! Nodes live in a [`SlotMap`] and link to the node below by key instead of by
//! pointer. The arena owns every node; the key chain from `top` downward still
//! references each node exactly once, so the structure is the same simple
//! chain as [`PriorityStack`](crate::linked::PriorityStack) with better
//! allocation locality.
//!
//! Requires the `arena-storage` feature (enabled by default).
//!
//! # Example
//!
//! ```rust
//! use priority_stack::Stack;
//! use priority_stack::arena::ArenaPriorityStack;
//!
//! let mut stack = ArenaPriorityStack::new();
//! stack.push("low");
//! stack.push_with_priority("high", true);
//! stack.push("newest");
//!
//! assert_eq!(stack.has_value(&"high"), Some(1));
//! assert_eq!(stack.pop_priority(), Ok("high"));
//! assert_eq!(stack.to_vec(), vec!["newest", "low"]);
//! ```

use crate::traits::{fmt_entries, Stack, StackError};
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, trace};

new_key_type! {
    struct NodeKey;
}

struct Node<T> {
    value: T,
    has_priority: bool,
    below: Option<NodeKey>,
}

/// Priority stack whose nodes are stored in a slotmap arena
///
/// Not internally synchronized; wrap it in a lock to mutate it from several
/// threads.
pub struct ArenaPriorityStack<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    top: Option<NodeKey>,
}

impl<T> Stack<T> for ArenaPriorityStack<T> {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            top: None,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push_with_priority(&mut self, value: T, has_priority: bool) {
        let key = self.nodes.insert(Node {
            value,
            has_priority,
            below: self.top,
        });
        self.top = Some(key);
    }

    fn peek(&self) -> Option<&T> {
        self.top.map(|key| &self.nodes[key].value)
    }

    fn peek_priority(&self) -> Option<&T> {
        self.links()
            .find(|&(_, key)| self.nodes[key].has_priority)
            .map(|(_, key)| key)
            .or(self.top)
            .map(|key| &self.nodes[key].value)
    }

    fn pop(&mut self) -> Result<T, StackError> {
        let key = self.top.ok_or(StackError::Empty)?;
        self.unlink(None, key).ok_or(StackError::Empty)
    }

    fn pop_priority(&mut self) -> Result<T, StackError> {
        let top = self.top.ok_or(StackError::Empty)?;
        let flagged = self
            .links()
            .enumerate()
            .find(|&(_, (_, key))| self.nodes[key].has_priority);
        let (above, key) = match flagged {
            Some((depth, link)) => {
                trace!(depth, "popping priority entry");
                link
            }
            None => {
                trace!("no priority entry, popping top");
                (None, top)
            }
        };
        self.unlink(above, key).ok_or(StackError::Empty)
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
        let Some((depth, (above, key))) = self
            .links()
            .enumerate()
            .find(|&(_, (_, key))| self.nodes[key].value == *value)
        else {
            trace!(len = self.len(), "value not found");
            return Err(StackError::ValueNotFound);
        };
        trace!(depth, "removing value");
        self.unlink(above, key).ok_or(StackError::ValueNotFound)
    }

    fn reorder_by_priority(&mut self) {
        if self.len() <= 1 {
            return;
        }

        let mut flagged: (Option<NodeKey>, Option<NodeKey>) = (None, None);
        let mut unflagged: (Option<NodeKey>, Option<NodeKey>) = (None, None);
        let mut flagged_count = 0usize;

        let mut cursor = self.top;
        while let Some(key) = cursor {
            let node = &mut self.nodes[key];
            cursor = node.below.take();
            let (head, tail) = if node.has_priority {
                flagged_count += 1;
                &mut flagged
            } else {
                &mut unflagged
            };
            match *tail {
                Some(last) => self.nodes[last].below = Some(key),
                None => *head = Some(key),
            }
            *tail = Some(key);
        }

        self.top = match flagged {
            (Some(head), Some(last)) => {
                self.nodes[last].below = unflagged.0;
                Some(head)
            }
            _ => unflagged.0,
        };

        debug!(
            flagged = flagged_count,
            unflagged = self.len() - flagged_count,
            "reordered stack by priority"
        );
    }

    fn priority_count(&self) -> usize {
        self.nodes.values().filter(|node| node.has_priority).count()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.top = None;
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.len());
        values.extend(self.iter().cloned());
        values
    }
}

impl<T> ArenaPriorityStack<T> {
    /// Returns an iterator over the values from top to bottom
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            next: self.top,
            remaining: self.len(),
        }
    }

    /// Returns an iterator over `(value, has_priority)` pairs from top to bottom
    pub fn entries(&self) -> Entries<'_, T> {
        Entries { inner: self.iter() }
    }

    /// Walks the chain yielding `(key of the node above, key)` pairs
    fn links(&self) -> impl Iterator<Item = (Option<NodeKey>, NodeKey)> + '_ {
        let mut above = None;
        let mut next = self.top;
        std::iter::from_fn(move || {
            let key = next?;
            next = self.nodes[key].below;
            let pair = (above, key);
            above = Some(key);
            Some(pair)
        })
    }

    /// Splices `key` out of the chain and frees its slot
    ///
    /// `above` must be the key of the node directly above `key`, or `None`
    /// when `key` is the top.
    fn unlink(&mut self, above: Option<NodeKey>, key: NodeKey) -> Option<T> {
        let node = self.nodes.remove(key)?;
        match above {
            Some(above) => self.nodes[above].below = node.below,
            None => self.top = node.below,
        }
        Some(node.value)
    }
}

impl<T> Default for ArenaPriorityStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> fmt::Display for ArenaPriorityStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_entries(f, self.entries())
    }
}

impl<T: fmt::Debug> fmt::Debug for ArenaPriorityStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

impl<T> Extend<T> for ArenaPriorityStack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for ArenaPriorityStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<'a, T> IntoIterator for &'a ArenaPriorityStack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over an [`ArenaPriorityStack`], top to bottom
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<NodeKey, Node<T>>,
    next: Option<NodeKey>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn next_node(&mut self) -> Option<&'a Node<T>> {
        let node = self.nodes.get(self.next?)?;
        self.next = node.below;
        self.remaining -= 1;
        Some(node)
    }
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
