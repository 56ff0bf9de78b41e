//! Intrusive doubly-linked list.
//!
//! Elements carry their own [`Link`] records and live in a slice the caller owns; a [`List`]
//! only threads a ring through them. Linking and unlinking never allocate, and an element can
//! be in as many lists at once as it has links, one [`Hook`] per link.
//!
//! Positions are [`Cursor`]s. Each cursor remembers the list it came from and the list's epoch
//! at the time, and every removal from a list steps its epoch. A cursor from an older epoch is
//! orphaned, and with debug assertions or the `checked-cursors` feature using it panics instead
//! of silently reading whatever now occupies its node.

mod link;
mod list;

pub use link::{BaseHook, Hook, Link, Linkable, NodeRef};
pub use list::{Cursor, Iter, List, ListId};
