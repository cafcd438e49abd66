use core::{fmt, iter::FusedIterator, ptr, slice};

use crate::collections::imp::array::RawArray;

/// A draining iterator that owns a [`FlexArr`](super::FlexArr)'s buffer.
///
/// Created by `FlexArr::into_iter`. Elements not consumed by the time the
/// iterator drops are dropped with it; the buffer is freed exactly once.
pub struct IntoIter<T> {
    buf:   RawArray<T>,
    front: usize,
    /// One past the last unyielded element.
    back:  usize,
}

impl<T> IntoIter<T> {
    pub(super) fn new(buf: RawArray<T>, len: usize) -> Self {
        Self { buf, front: 0, back: len }
    }

    /// The remaining items as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let arr = flexarr!['a', 'b', 'c'];
    /// let mut into_iter = arr.into_iter();
    /// let _ = into_iter.next().unwrap();
    /// assert_eq!(into_iter.as_slice(), &['b', 'c']);
    /// ```
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.front), self.back - self.front) }
    }

    /// The remaining items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let front = self.front;
        let remaining = self.back - front;
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr().add(front), remaining) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let value = unsafe { ptr::read(self.buf.as_ptr().add(self.front)) };
        self.front += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.back)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let front = self.front;
        let remaining = self.back - front;
        unsafe {
            let p = self.buf.as_mut_ptr().add(front);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(p, remaining));
        }
        // RawArray frees the allocation.
    }
}
