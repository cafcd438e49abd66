use core::{
    fmt,
    hash::{Hash, Hasher},
    mem::ManuallyDrop,
    ops,
    ptr,
    slice::{self, SliceIndex},
};

use super::{imp::array::RawArray, impl_slice_partial_eq, ArrayError, ReservePolicy};

mod search;
mod sort;
mod into_iter;

#[cfg(test)]
mod tests;

pub use into_iter::IntoIter;

/// A contiguous elastic array: it grows *and shrinks* its buffer according to
/// a per-instance [`ReservePolicy`].
///
/// `FlexArr` keeps its logical elements contiguous in `[0, len)` and keeps
/// two invariants at all times: `len <= capacity`, and
/// `capacity >= ReservePolicy::MIN_CAPACITY`. Appends are amortized *O*(1);
/// removals are amortized *O*(1) on top of the element shift, because the
/// shrink rule bounds wasted capacity to a constant factor of the live size.
///
/// Indexed access is available three ways: checked with [`at`]/[`at_mut`]
/// (returning [`ArrayError::OutOfRange`]), optional with the slice
/// `get`/`get_mut` (through deref), and panicking with the index operator.
///
/// The container has value semantics: [`Clone`] deep-copies the buffer,
/// length, and policy, and a move transfers ownership outright.
///
/// # Examples
///
/// ```
/// # use flexarr::prelude::*;
/// let mut arr = flexarr![1, 2, 3];
/// arr.push(4);
///
/// assert_eq!(arr.len(), 4);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr, [7, 2, 3, 4]);
/// ```
///
/// [`at`]: FlexArr::at
/// [`at_mut`]: FlexArr::at_mut
pub struct FlexArr<T> {
    arr:    RawArray<T>,
    len:    usize,
    policy: ReservePolicy,
}

impl<T> FlexArr<T> {
    /// Creates an empty array with the default policy and the minimum
    /// capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arr:    RawArray::allocate(ReservePolicy::MIN_CAPACITY),
            len:    0,
            policy: ReservePolicy::default(),
        }
    }

    /// Creates an empty array with room for at least `capacity` elements and
    /// the default policy.
    ///
    /// The actual capacity never falls below
    /// [`ReservePolicy::MIN_CAPACITY`].
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_capacity_and_policy(capacity, ReservePolicy::default())
    }

    /// Creates an empty array with room for at least `capacity` elements,
    /// governed by `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] when `capacity` is zero.
    pub fn with_capacity_and_policy(capacity: usize, policy: ReservePolicy) -> Result<Self, ArrayError> {
        if capacity == 0 {
            return Err(ArrayError::InvalidArgument { what: "capacity must be non-zero" });
        }
        Ok(Self {
            arr: RawArray::allocate(capacity.max(ReservePolicy::MIN_CAPACITY)),
            len: 0,
            policy,
        })
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of allocated slots. Always at least
    /// [`ReservePolicy::MIN_CAPACITY`] and at least [`len`](FlexArr::len).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arr.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The capacity policy governing this instance.
    #[inline]
    pub fn policy(&self) -> ReservePolicy {
        self.policy
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.arr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.arr.as_mut_ptr(), self.len) }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.arr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.arr.as_mut_ptr()
    }

    /// Checked reference to the element of rank `rank`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] unless `rank < len`.
    #[inline]
    pub fn at(&self, rank: usize) -> Result<&T, ArrayError> {
        self.as_slice().get(rank).ok_or(ArrayError::OutOfRange { index: rank, len: self.len })
    }

    /// Checked mutable reference to the element of rank `rank`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] unless `rank < len`.
    #[inline]
    pub fn at_mut(&mut self, rank: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice().get_mut(rank).ok_or(ArrayError::OutOfRange { index: rank, len })
    }

    /// Appends `value`, growing the buffer when the new length exceeds the
    /// policy's growth threshold.
    ///
    /// Amortized *O*(1): a growth step multiplies the capacity by the integer
    /// inverse of the grow ratio (doubling at the default), copying every
    /// live element into the fresh buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![1, 2];
    /// arr.push(3);
    /// assert_eq!(arr, [1, 2, 3]);
    /// ```
    pub fn push(&mut self, value: T) {
        self.grow_one();
        debug_assert!(self.len < self.arr.capacity());
        unsafe {
            ptr::write(self.arr.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    /// Removes and returns the last element, applying the shrink rule, or
    /// `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let value = unsafe { ptr::read(self.arr.as_ptr().add(self.len)) };
        self.shrink_one();
        Some(value)
    }

    /// Inserts `value` at position `index`, shifting `[index, len)` one slot
    /// rightward. `index == len` degenerates to a plain [`push`] and returns
    /// immediately. Returns the insertion index.
    ///
    /// *O*(`len - index`).
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] when `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![1, 2, 3];
    /// arr.insert(1, 4).unwrap();
    /// assert_eq!(arr, [1, 4, 2, 3]);
    /// ```
    ///
    /// [`push`]: FlexArr::push
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, ArrayError> {
        if index == self.len {
            self.push(value);
            return Ok(index);
        }
        if index > self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }

        self.grow_one();
        unsafe {
            let p = self.arr.as_mut_ptr().add(index);
            // Shift everything over to make space, duplicating the `index`th
            // element into two consecutive places, then overwrite the first.
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, value);
        }
        self.len += 1;
        Ok(index)
    }

    /// Removes and returns the element of rank `rank`, shifting the tail one
    /// slot leftward and applying the shrink rule.
    ///
    /// *O*(`len - rank`).
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] unless `rank < len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![1, 2, 3];
    /// assert_eq!(arr.remove(1).unwrap(), 2);
    /// assert_eq!(arr, [1, 3]);
    /// ```
    pub fn remove(&mut self, rank: usize) -> Result<T, ArrayError> {
        if rank >= self.len {
            return Err(ArrayError::OutOfRange { index: rank, len: self.len });
        }

        let value;
        unsafe {
            let p = self.arr.as_mut_ptr().add(rank);
            value = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - rank - 1);
        }
        self.len -= 1;
        self.shrink_one();
        Ok(value)
    }

    /// Removes the elements of rank `[lo, hi)`, clamped to the live range,
    /// and returns how many were removed.
    ///
    /// A malformed range (`lo > hi`, or a clamp that leaves nothing) is not
    /// an error: the call is a no-op returning 0. The tail shifts left in one
    /// pass; the final capacity is what applying the single-element shrink
    /// rule once per removed element would have produced.
    pub fn remove_range(&mut self, lo: usize, hi: usize) -> usize {
        if lo > hi {
            return 0;
        }
        let lo = lo.min(self.len);
        let hi = hi.min(self.len);
        let removed = hi - lo;
        if removed == 0 {
            return 0;
        }

        let old_len = self.len;
        // Keep `len` at the untouched prefix while the victims drop, so a
        // panicking Drop leaks the tail instead of double-dropping it.
        self.len = lo;
        unsafe {
            let p = self.arr.as_mut_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(p.add(lo), removed));
            ptr::copy(p.add(hi), p.add(lo), old_len - hi);
        }
        self.len = old_len - removed;
        self.shrink_many(removed);
        removed
    }

    /// Removes every element. Equivalent to `remove_range(0, len)`, shrink
    /// rule included.
    pub fn clear(&mut self) {
        let len = self.len;
        self.remove_range(0, len);
    }

    /// Shortens the array to `len` elements, dropping the rest; a no-op when
    /// `len >= self.len()`. The shrink rule applies to the removed count.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = self.len;
        self.remove_range(len, old_len);
    }

    /// Visits every element in rank order with a single polymorphic visitor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![1, 2, 3];
    /// arr.traverse(|value| *value *= 10);
    /// assert_eq!(arr, [10, 20, 30]);
    /// ```
    pub fn traverse<F>(&mut self, mut visit: F) where
        F: FnMut(&mut T),
    {
        for value in self.as_mut_slice() {
            visit(value);
        }
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Makes room for one more element: if the incremented length would
    /// exceed the growth threshold, reallocates to the grown capacity.
    fn grow_one(&mut self) {
        let capacity = self.arr.capacity();
        if self.policy.grow_due(self.len + 1, capacity) {
            self.arr.resize(self.policy.grown(capacity), self.len);
        }
    }

    /// Applies the shrink rule once, after a single-element removal.
    fn shrink_one(&mut self) {
        let capacity = self.arr.capacity();
        if self.policy.shrink_due(self.len, capacity) {
            let target = self.policy.shrunk(self.len, capacity);
            if target < capacity {
                self.arr.resize(target, self.len);
            }
        }
    }

    /// Capacity after `removed` single-shrink steps, applied while the size
    /// walks down to the current length, realized as one reallocation.
    /// `self.len` must already hold the post-removal length.
    fn shrink_many(&mut self, removed: usize) {
        let mut capacity = self.arr.capacity();
        let mut size = self.len + removed;
        for _ in 0..removed {
            size -= 1;
            if self.policy.shrink_due(size, capacity) {
                capacity = self.policy.shrunk(size, capacity);
            }
        }
        if capacity < self.arr.capacity() {
            self.arr.resize(capacity, self.len);
        }
    }
}

impl<T: Clone> FlexArr<T> {
    /// Creates an array of `len` copies of `value`, with capacity at least
    /// twice `len`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] when `len` is zero.
    pub fn filled(len: usize, value: T) -> Result<Self, ArrayError> {
        if len == 0 {
            return Err(ArrayError::InvalidArgument { what: "fill length must be non-zero" });
        }
        Ok(from_elem(value, len))
    }

    /// Copies the sub-range `[lo, hi)` of `src`, clamped to `[0, src.len())`,
    /// into a new array whose buffer exactly fits the clamped range (subject
    /// to the minimum-capacity floor). `lo > hi` copies nothing.
    ///
    /// A `FlexArr` derefs to a slice, so this covers copying from another
    /// container as well as from a raw slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let arr = FlexArr::from_range(&[10, 20, 30, 40], 1, 3);
    /// assert_eq!(arr, [20, 30]);
    ///
    /// let copy = FlexArr::from_range(&arr, 0, arr.len());
    /// assert_eq!(copy, arr);
    /// ```
    #[must_use]
    pub fn from_range(src: &[T], lo: usize, hi: usize) -> Self {
        let (lo, hi) = if lo > hi {
            (0, 0)
        } else {
            (lo.min(src.len()), hi.min(src.len()))
        };
        let count = hi - lo;

        let mut out = Self {
            arr:    RawArray::allocate(count.max(ReservePolicy::MIN_CAPACITY)),
            len:    0,
            policy: ReservePolicy::default(),
        };
        unsafe {
            let p = out.arr.as_mut_ptr();
            for (i, value) in src[lo..hi].iter().enumerate() {
                ptr::write(p.add(i), value.clone());
                out.len += 1;
            }
        }
        out
    }
}

#[doc(hidden)]
pub fn from_elem<T: Clone>(elem: T, n: usize) -> FlexArr<T> {
    let mut out = FlexArr {
        arr:    RawArray::allocate(n.saturating_mul(2).max(ReservePolicy::MIN_CAPACITY)),
        len:    0,
        policy: ReservePolicy::default(),
    };
    if n == 0 {
        return out;
    }
    unsafe {
        let p = out.arr.as_mut_ptr();
        for i in 0..n - 1 {
            ptr::write(p.add(i), elem.clone());
            // Keep `len` in step so a panicking Clone drops what exists.
            out.len += 1;
        }
        ptr::write(p.add(n - 1), elem);
        out.len = n;
    }
    out
}

/// Convenient `FlexArr` construction, push-based like array literals:
/// `flexarr![1, 2, 3]` or `flexarr![0; 5]`.
#[macro_export]
macro_rules! flexarr {
    () => {
        $crate::collections::FlexArr::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::from_elem($elem, $n)
    };
    ($($val:expr),+ $(,)?) => {
        {
            let mut arr = $crate::collections::FlexArr::new();
            $(
                arr.push($val);
            )+
            arr
        }
    };
}

//------------------------------------------------------------------------------------------------------------------------------

impl<T> ops::Deref for FlexArr<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> ops::DerefMut for FlexArr<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> ops::Index<I> for FlexArr<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        ops::Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> ops::IndexMut<I> for FlexArr<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        ops::IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Clone> Clone for FlexArr<T> {
    /// Deep copy: fresh buffer of the same capacity, same length, same
    /// policy. The source keeps sole ownership of its own buffer.
    fn clone(&self) -> Self {
        let mut out = Self {
            arr:    RawArray::allocate(self.arr.capacity()),
            len:    0,
            policy: self.policy,
        };
        unsafe {
            let p = out.arr.as_mut_ptr();
            for (i, value) in self.as_slice().iter().enumerate() {
                ptr::write(p.add(i), value.clone());
                out.len += 1;
            }
        }
        out
    }
}

impl<T> Default for FlexArr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for FlexArr<T> {
    fn drop(&mut self) {
        // Drop the live elements; the RawArray frees the allocation.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.arr.as_mut_ptr(), self.len));
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FlexArr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: Hash> Hash for FlexArr<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state)
    }
}

impl_slice_partial_eq!{ [] FlexArr<T>, FlexArr<U> }
impl_slice_partial_eq!{ [] FlexArr<T>, [U] }
impl_slice_partial_eq!{ [] FlexArr<T>, &[U] }
impl_slice_partial_eq!{ [const N: usize] FlexArr<T>, [U; N] }
impl_slice_partial_eq!{ [const N: usize] FlexArr<T>, &[U; N] }

impl<T: Eq> Eq for FlexArr<T> {}

impl<T> Extend<T> for FlexArr<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for FlexArr<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<T, const N: usize> From<[T; N]> for FlexArr<T> {
    fn from(values: [T; N]) -> Self {
        let mut out = Self {
            arr:    RawArray::allocate(N.max(ReservePolicy::MIN_CAPACITY)),
            len:    0,
            policy: ReservePolicy::default(),
        };
        out.extend(values);
        out
    }
}

impl<T: Clone> From<&[T]> for FlexArr<T> {
    fn from(src: &[T]) -> Self {
        Self::from_range(src, 0, src.len())
    }
}

impl<T> IntoIterator for FlexArr<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the array into a draining iterator. Unyielded elements are
    /// dropped with the iterator; the buffer is freed exactly once.
    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        IntoIter::new(this.arr.take(), this.len)
    }
}

impl<'a, T> IntoIterator for &'a FlexArr<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut FlexArr<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
