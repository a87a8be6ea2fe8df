//! Priority Stacks for Rust
//!
//! This crate provides a LIFO stack whose entries carry a boolean priority flag.
//! Plain `pop` ignores the flag; `pop_priority` serves the flagged entry nearest
//! the top first and falls back to the top entry when nothing is flagged.
//!
//! # Features
//!
//! - **Linked Priority Stack**: a chain of boxed nodes, each owning the node below
//! - **Arena Priority Stack**: nodes stored in a `slotmap` arena and linked by key
//!   (feature `arena-storage`, on by default)
//!
//! Both implement [`Stack`]: O(1) push and pop, O(n) priority pop, value search
//! and removal, and an O(n) stable reorder that moves every flagged entry above
//! the unflagged ones without reallocating nodes.
//!
//! # Example
//!
//! ```rust
//! use priority_stack::linked::PriorityStack;
//! use priority_stack::{Stack, StackError};
//!
//! let mut stack = PriorityStack::new();
//! stack.push(1);
//! stack.push(2);
//! stack.push_with_priority(3, true);
//!
//! assert_eq!(stack.to_string(), "[3:P,2:N,1:N]");
//! assert_eq!(stack.pop_priority(), Ok(3));
//! assert_eq!(stack.pop_priority(), Ok(2));
//! assert_eq!(stack.remove_value(&7), Err(StackError::ValueNotFound));
//! ```

#![warn(missing_docs)]

#[cfg(feature = "arena-storage")]
pub mod arena;
pub mod linked;
pub mod traits;

// Re-export the main trait for convenience
pub use traits::{Stack, StackError};
