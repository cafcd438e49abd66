use core::{
    mem,
    ptr::{self, NonNull},
};
use std::alloc::{self, handle_alloc_error, Layout};

/// Low level utility for allocating, reallocating, and deallocating the
/// buffer of a dynamic array without having to worry about the corner cases
/// involved. In particular:
///
/// - Produces a dangling pointer for zero-sized types and zero-length
///   buffers, and avoids freeing it.
/// - Promotes overflowing capacity computations to a "capacity overflow"
///   panic before any allocator call.
/// - Aborts on allocation failure via [`handle_alloc_error`].
///
/// This type does not in any way inspect the memory it manages. When dropped
/// it *will* free its memory, but it *won't* try to drop its contents. It is
/// up to the user of `RawArray` to drop the things actually *stored* inside.
///
/// Reallocation is always allocate-new / copy-live / free-old: the amortized
/// cost model of the container depends on the full copy, so no in-place
/// `realloc` shortcut is taken.
pub(crate) struct RawArray<T> {
    ptr: NonNull<T>,
    cap: usize,
}

unsafe impl<T: Send> Send for RawArray<T> {}
unsafe impl<T: Sync> Sync for RawArray<T> {}

impl<T> RawArray<T> {
    /// Creates a `RawArray` without allocating: capacity 0, dangling pointer.
    /// This is the moved-from / empty sentinel state.
    #[must_use]
    pub const fn dangling() -> Self {
        Self { ptr: NonNull::dangling(), cap: 0 }
    }

    /// Allocates a buffer of exactly `capacity` slots of `T`.
    ///
    /// For zero-sized `T` (or a zero capacity) no memory is allocated; the
    /// capacity is carried as bookkeeping only.
    ///
    /// # Panics
    ///
    /// Panics when `capacity * size_of::<T>()` exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    #[must_use]
    pub fn allocate(capacity: usize) -> Self {
        if mem::size_of::<T>() == 0 || capacity == 0 {
            return Self { ptr: NonNull::dangling(), cap: capacity };
        }

        let layout = Self::layout_for(capacity);
        let raw = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            handle_alloc_error(layout);
        };
        Self { ptr, cap: capacity }
    }

    /// Moves the first `live` slots into a fresh buffer of `new_capacity`
    /// slots and frees the old buffer.
    ///
    /// The caller guarantees `live <= new_capacity` and that slots
    /// `[0, live)` hold initialized values; after the call those values live
    /// in the new buffer and the old allocation is gone.
    pub fn resize(&mut self, new_capacity: usize, live: usize) {
        debug_assert!(live <= new_capacity);

        let mut fresh = Self::allocate(new_capacity);
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.ptr.as_ptr(), live);
        }
        // The old buffer only holds moved-out bits now; swapping hands it to
        // `fresh`, whose drop frees the memory without touching contents.
        mem::swap(self, &mut fresh);
    }

    /// Detaches the buffer, leaving `self` in the dangling state.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::dangling())
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn layout_for(capacity: usize) -> Layout {
        #[cold]
        fn capacity_overflow() -> ! {
            panic!("capacity overflow");
        }

        match Layout::array::<T>(capacity) {
            Ok(layout) if layout.size() <= isize::MAX as usize => layout,
            _ => capacity_overflow(),
        }
    }
}

impl<T> Drop for RawArray<T> {
    fn drop(&mut self) {
        if self.cap != 0 && mem::size_of::<T>() != 0 {
            unsafe {
                let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
            }
        }
    }
}
