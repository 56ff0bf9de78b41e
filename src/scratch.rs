//! Bounded, allocator-backed scratch storage.
//!
//! A [`ScratchBuffer`] is acquired once at the entry of a merge based algorithm, used as working
//! memory while the algorithm runs, and released when it returns, on every exit path including
//! an unwinding comparator.
//!
//! The buffer distinguishes the number of logically valid elements (`len`) from the number of
//! physically initialized slots (`constructed`). Growing the logical size re-uses slots that are
//! still initialized from an earlier, larger size instead of initializing them again, and `Drop`
//! destroys exactly the initialized prefix.

use std::alloc::{self, handle_alloc_error, Layout};
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use tracing::trace;

/// Source of raw memory for a [`ScratchBuffer`].
///
/// # Safety
///
/// `allocate` must either return `None` or a pointer valid for reads and writes of `size`
/// bytes, aligned to `align`, that stays valid until passed to `deallocate`. `deallocate` is
/// only ever called with a pointer obtained from `allocate` on the same allocator, together
/// with the `size` and `align` it was requested with. `size` is never zero.
pub unsafe trait RawAllocator {
    /// Allocates `size` bytes aligned to `align`.
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>>;

    /// Releases memory previously returned by [`RawAllocator::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr`, `size` and `align` must match an earlier, not yet released allocation.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize);
}

/// The process wide allocator, [`std::alloc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Global;

// SAFETY: Forwards to the global allocator with the exact layout it was asked for.
unsafe impl RawAllocator for Global {
    #[inline]
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let layout = Layout::from_size_align(size, align).ok()?;
        debug_assert!(layout.size() != 0);

        // SAFETY: The trait contract guarantees a non-zero size.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        // SAFETY: The layout was validated by `allocate` for this exact pointer.
        unsafe { alloc::dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(size, align)) }
    }
}

// SAFETY: Forwards every call to `A`.
unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn allocate(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        (**self).allocate(size, align)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        // SAFETY: See function safety.
        unsafe { (**self).deallocate(ptr, size, align) }
    }
}

/// Reasons [`ScratchBuffer::try_acquire_in`] can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScratchError {
    /// `capacity * size_of::<T>()` does not fit in `isize`.
    CapacityOverflow,
    /// The allocator returned no memory.
    AllocFailed {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

impl fmt::Display for ScratchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScratchError::CapacityOverflow => write!(f, "scratch buffer capacity overflow"),
            ScratchError::AllocFailed { size, align } => write!(
                f,
                "failed to allocate {size} bytes with alignment {align} for scratch buffer"
            ),
        }
    }
}

impl Error for ScratchError {}

/// Fixed capacity temporary storage for elements of type `T`, backed by allocator `A`.
pub struct ScratchBuffer<T, A: RawAllocator = Global> {
    ptr: NonNull<T>,
    capacity: usize,
    len: usize,
    constructed: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T> ScratchBuffer<T, Global> {
    /// Acquires room for `capacity` elements from the global allocator.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if the allocation fails.
    #[inline]
    pub fn acquire(capacity: usize) -> Self {
        Self::acquire_in(capacity, Global)
    }
}

impl<T, A: RawAllocator> ScratchBuffer<T, A> {
    /// Acquires room for `capacity` elements from `alloc`.
    ///
    /// Allocation failure is fatal, there is no degraded mode. Use
    /// [`ScratchBuffer::try_acquire_in`] to validate a capacity up front.
    pub fn acquire_in(capacity: usize, alloc: A) -> Self {
        match Self::try_acquire_in(capacity, alloc) {
            Ok(buf) => buf,
            Err(ScratchError::AllocFailed { size, align }) => {
                // SAFETY: `try_acquire_in` only reports layouts it constructed successfully.
                handle_alloc_error(unsafe { Layout::from_size_align_unchecked(size, align) })
            }
            Err(err @ ScratchError::CapacityOverflow) => panic!("{err}"),
        }
    }

    /// Acquires room for `capacity` elements from `alloc`, reporting failure instead of
    /// aborting.
    pub fn try_acquire_in(capacity: usize, alloc: A) -> Result<Self, ScratchError> {
        let layout = Layout::array::<T>(capacity).map_err(|_| ScratchError::CapacityOverflow)?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            alloc
                .allocate(layout.size(), layout.align())
                .ok_or(ScratchError::AllocFailed {
                    size: layout.size(),
                    align: layout.align(),
                })?
                .cast::<T>()
        };

        trace!(capacity, bytes = layout.size(), "acquired scratch buffer");

        Ok(Self {
            ptr,
            capacity,
            len: 0,
            constructed: 0,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Number of element slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of logically valid elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no element is logically valid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of physically initialized slots, always `>= len()`.
    #[inline]
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// The logically valid elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first `constructed >= len` slots are initialized.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The logically valid elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: The first `constructed >= len` slots are initialized.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Replaces the contents with clones of `src`.
    ///
    /// Slots that are still initialized are assigned with [`Clone::clone_from`], only slots past
    /// `constructed()` are newly initialized.
    ///
    /// # Panics
    ///
    /// Panics if `src.len()` exceeds the capacity.
    pub fn copy_from(&mut self, src: &[T])
    where
        T: Clone,
    {
        assert!(
            src.len() <= self.capacity,
            "copy of {} elements exceeds scratch capacity {}",
            src.len(),
            self.capacity
        );

        self.len = 0;
        for (i, value) in src.iter().enumerate() {
            // SAFETY: `i < capacity`, slots below `constructed` are initialized, and the slot at
            // `constructed` is not, so it is written exactly once before `constructed` moves.
            unsafe {
                let slot = self.ptr.as_ptr().add(i);
                if i < self.constructed {
                    (*slot).clone_from(value);
                } else {
                    slot.write(value.clone());
                    self.constructed += 1;
                }
            }
        }
        self.len = src.len();
    }

    /// Sets the logical size to `new_len`.
    ///
    /// Growing re-uses still initialized slots as they are and initializes the remainder with
    /// clones of `fill`. Shrinking keeps the slots initialized.
    ///
    /// # Panics
    ///
    /// Panics if `new_len` exceeds the capacity.
    pub fn set_len(&mut self, new_len: usize, fill: &T)
    where
        T: Clone,
    {
        assert!(
            new_len <= self.capacity,
            "size {new_len} exceeds scratch capacity {}",
            self.capacity
        );

        while self.constructed < new_len {
            // SAFETY: `constructed < new_len <= capacity`, and the slot is uninitialized.
            unsafe { self.ptr.as_ptr().add(self.constructed).write(fill.clone()) };
            self.constructed += 1;
        }
        self.len = new_len;
    }

    /// Shrinks the logical size to at most `new_len`.
    #[inline]
    pub fn truncate(&mut self, new_len: usize) {
        self.len = self.len.min(new_len);
    }

    /// Raw pointer to the start of the storage, for algorithms that keep shallow, bitwise
    /// copies of elements in it.
    ///
    /// Only valid while nothing is constructed, so that `Drop` never runs destructors on those
    /// copies.
    #[inline]
    pub(crate) fn spare_ptr(&mut self) -> *mut T {
        debug_assert_eq!(self.constructed, 0);
        self.ptr.as_ptr()
    }
}

impl<T, A: RawAllocator> Drop for ScratchBuffer<T, A> {
    fn drop(&mut self) {
        // SAFETY: Exactly the first `constructed` slots are initialized, and the allocation was
        // made with `Layout::array::<T>(capacity)` which is known to be valid.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.constructed,
            ));

            let layout = Layout::array::<T>(self.capacity).unwrap_unchecked();
            if layout.size() != 0 {
                self.alloc
                    .deallocate(self.ptr.cast::<u8>(), layout.size(), layout.align());
            }
        }

        trace!(capacity = self.capacity, "released scratch buffer");
    }
}

impl<T: fmt::Debug, A: RawAllocator> fmt::Debug for ScratchBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("capacity", &self.capacity)
            .field("constructed", &self.constructed)
            .field("elements", &self.as_slice())
            .finish()
    }
}
