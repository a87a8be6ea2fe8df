//! Common traits for priority stack data structures
//!
//! This module provides the operation set shared by every stack in this crate:
//!
//! - [`Stack`]: push/pop with an optional priority flag, value search and removal,
//!   stable reordering by priority, and snapshot export
//! - [`StackError`]: the two ways a removal can fail
//!
//! Implementations differ only in how nodes are stored. See
//! [`PriorityStack`](crate::linked::PriorityStack) for the boxed chain and
//! `ArenaPriorityStack` (feature `arena-storage`) for the slotmap-backed one.

use std::fmt;

/// Error type for stack operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// `pop` or `pop_priority` was called on an empty stack
    #[error("stack is empty")]
    Empty,
    /// `remove_value` found no entry equal to the requested value
    #[error("value not found in stack")]
    ValueNotFound,
}

/// A LIFO stack whose entries carry a priority flag
///
/// Entries are ordered from top (most recently pushed) to bottom. The flag is
/// set at push time and consulted only by the priority-aware operations:
/// - `pop` always takes the top entry
/// - `pop_priority` takes the flagged entry nearest the top, or the top entry
///   when nothing is flagged
/// - `reorder_by_priority` moves every flagged entry above every unflagged one
///
/// Stacks are not internally synchronized. Sharing one across threads for
/// mutation requires an external lock.
///
/// # Example
///
/// ```rust
/// use priority_stack::Stack;
/// use priority_stack::linked::PriorityStack;
///
/// let mut stack = PriorityStack::new();
/// stack.push("a");
/// stack.push_with_priority("urgent", true);
/// stack.push("b");
///
/// assert_eq!(stack.pop_priority(), Ok("urgent"));
/// assert_eq!(stack.pop(), Ok("b"));
/// assert_eq!(stack.len(), 1);
/// ```
pub trait Stack<T> {
    /// Creates a new empty stack
    fn new() -> Self;

    /// Returns the number of entries in the stack
    fn len(&self) -> usize;

    /// Returns true if the stack is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pushes an unflagged value on top of the stack
    ///
    /// # Time Complexity
    /// O(1)
    fn push(&mut self, value: T) {
        self.push_with_priority(value, false);
    }

    /// Pushes a value on top of the stack with the given priority flag
    ///
    /// # Time Complexity
    /// O(1)
    fn push_with_priority(&mut self, value: T, has_priority: bool);

    /// Returns the top value without removing it
    fn peek(&self) -> Option<&T>;

    /// Returns the value [`pop_priority`](Stack::pop_priority) would remove
    ///
    /// # Time Complexity
    /// O(n)
    fn peek_priority(&self) -> Option<&T>;

    /// Removes and returns the top value, ignoring its priority flag
    ///
    /// # Errors
    /// Returns [`StackError::Empty`] if the stack has no entries.
    ///
    /// # Time Complexity
    /// O(1)
    fn pop(&mut self) -> Result<T, StackError>;

    /// Removes and returns the flagged value nearest the top
    ///
    /// Flagged values are therefore served LIFO among themselves. When no entry
    /// is flagged this behaves exactly like [`pop`](Stack::pop).
    ///
    /// # Errors
    /// Returns [`StackError::Empty`] if the stack has no entries.
    ///
    /// # Time Complexity
    /// O(n) worst case
    fn pop_priority(&mut self) -> Result<T, StackError>;

    /// Returns the distance from the top to the first entry equal to `value`
    ///
    /// `None` means no entry matches. The stack is never modified.
    ///
    /// # Time Complexity
    /// O(n)
    fn has_value(&self, value: &T) -> Option<usize>
    where
        T: PartialEq;

    /// Removes and returns the first entry (top to bottom) equal to `value`
    ///
    /// # Errors
    /// Returns [`StackError::ValueNotFound`] if no entry matches. An empty
    /// stack reports the same error; it never reports [`StackError::Empty`].
    ///
    /// # Time Complexity
    /// O(n)
    fn remove_value(&mut self, value: &T) -> Result<T, StackError>
    where
        T: PartialEq;

    /// Stably partitions the stack so flagged entries sit above unflagged ones
    ///
    /// Relative order inside each partition is preserved, so calling this
    /// twice is the same as calling it once. Nodes are relinked, not
    /// reallocated.
    ///
    /// # Time Complexity
    /// O(n)
    fn reorder_by_priority(&mut self);

    /// Returns the number of flagged entries
    fn priority_count(&self) -> usize;

    /// Drops every entry
    fn clear(&mut self);

    /// Copies the values from top to bottom
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone;

    /// Copies the values from bottom to top, i.e. in insertion order
    fn to_vec_reversed(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = self.to_vec();
        values.reverse();
        values
    }
}

/// Writes `[v:P,v:N,...]` for a top-to-bottom sequence of entries
pub(crate) fn fmt_entries<'a, T, I>(f: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    T: fmt::Display + 'a,
    I: IntoIterator<Item = (&'a T, bool)>,
{
    f.write_str("[")?;
    for (i, (value, has_priority)) in entries.into_iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}:{}", value, if has_priority { 'P' } else { 'N' })?;
    }
    f.write_str("]")
}
