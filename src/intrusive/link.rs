//! The link record embedded in list elements, and the hooks that locate it.

/// Identifies a node of a list: its sentinel, or the element at an index of the storage slice.
///
/// A `NodeRef` is only meaningful together with the list and the storage it came from. The
/// sentinel of every list is spelled the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Sentinel,
    Element(usize),
}

impl NodeRef {
    /// Storage index of the element, `None` for the sentinel.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            NodeRef::Sentinel => None,
            NodeRef::Element(index) => Some(index),
        }
    }
}

/// The two non-owning references an element needs to be part of a list.
///
/// Both are `None` if and only if the element is not linked into any list. Cloning an element
/// must not clone its list membership, so a cloned `Link` is always unlinked.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Link {
    pub(crate) next: Option<NodeRef>,
    pub(crate) prev: Option<NodeRef>,
}

impl Link {
    /// An unlinked record.
    #[inline]
    pub const fn new() -> Self {
        Self {
            next: None,
            prev: None,
        }
    }

    /// A list sentinel, a ring of one.
    #[inline]
    pub(crate) const fn ring() -> Self {
        Self {
            next: Some(NodeRef::Sentinel),
            prev: Some(NodeRef::Sentinel),
        }
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.is_some()
    }

    #[inline]
    pub fn next(&self) -> Option<NodeRef> {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> Option<NodeRef> {
        self.prev
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.next = None;
        self.prev = None;
    }
}

impl Clone for Link {
    #[inline]
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Elements that are themselves the link record, or carry exactly one.
///
/// Lists use this through [`BaseHook`], the default hook of [`List`](super::List).
pub trait Linkable {
    fn link(&self) -> &Link;
    fn link_mut(&mut self) -> &mut Link;
}

impl Linkable for Link {
    #[inline]
    fn link(&self) -> &Link {
        self
    }

    #[inline]
    fn link_mut(&mut self) -> &mut Link {
        self
    }
}

/// Locates the link record of a `T` that a list threads through.
///
/// An element that is a member of several lists at once carries one [`Link`] per list, and each
/// list is typed with the hook for its field, usually declared with [`member_hook!`].
///
/// [`member_hook!`]: crate::member_hook
pub trait Hook<T> {
    fn link(elem: &T) -> &Link;
    fn link_mut(elem: &mut T) -> &mut Link;
}

/// Hook for element types that implement [`Linkable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseHook;

impl<T: Linkable> Hook<T> for BaseHook {
    #[inline]
    fn link(elem: &T) -> &Link {
        elem.link()
    }

    #[inline]
    fn link_mut(elem: &mut T) -> &mut Link {
        elem.link_mut()
    }
}

/// Declares a [`Hook`] that locates the link record in a named field.
///
/// ```
/// use stdkit::intrusive::{Link, List};
///
/// struct Task {
///     id: u32,
///     ready: Link,
///     timers: Link,
/// }
///
/// stdkit::member_hook!(pub ReadyHook = Task, ready);
/// stdkit::member_hook!(pub TimerHook = Task, timers);
///
/// let ready: List<Task, ReadyHook> = List::new();
/// let timers: List<Task, TimerHook> = List::new();
/// # let _ = (ready, timers);
/// ```
#[macro_export]
macro_rules! member_hook {
    ($(#[$meta:meta])* $vis:vis $hook:ident = $ty:ty, $field:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        $vis struct $hook;

        impl $crate::intrusive::Hook<$ty> for $hook {
            #[inline]
            fn link(elem: &$ty) -> &$crate::intrusive::Link {
                &elem.$field
            }

            #[inline]
            fn link_mut(elem: &mut $ty) -> &mut $crate::intrusive::Link {
                &mut elem.$field
            }
        }
    };
}
