use core::{mem, ptr};

use rand::Rng;

use crate::collections::imp::array::RawArray;

use super::FlexArr;

impl<T: Ord> FlexArr<T> {
    /// Bubble sort over `[lo, hi)` (clamped): adjacent swaps, with an early
    /// exit as soon as a full pass makes no swap.
    ///
    /// *O*(n²) worst case, *O*(n) on already-sorted content (one clean pass).
    pub fn bubble_sort(&mut self, lo: usize, hi: usize) {
        if lo > hi {
            return;
        }
        let lo = lo.min(self.len);
        let hi = hi.min(self.len);

        let s = &mut self.as_mut_slice()[lo..hi];
        let mut n = s.len();
        while n > 1 {
            let mut swapped = false;
            for i in 1..n {
                if s[i - 1] > s[i] {
                    s.swap(i - 1, i);
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
            // The largest element of the pass has bubbled to rank n - 1.
            n -= 1;
        }
    }

    /// Merge sort over `[lo, hi)` (clamped): recursive midpoint split, then
    /// a stable merge. Each merge moves the left half into a scratch buffer
    /// allocated for that call and released with it; on ties the left-half
    /// element is taken first.
    ///
    /// *O*(n log n) time, *O*(n) auxiliary space per merge call.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![5, 3, 1, 4, 1, 2];
    /// arr.merge_sort(0, arr.len());
    /// assert_eq!(arr, [1, 1, 2, 3, 4, 5]);
    /// assert_eq!(arr.disordered(), 0);
    /// ```
    pub fn merge_sort(&mut self, lo: usize, hi: usize) {
        if lo > hi {
            return;
        }
        let lo = lo.min(self.len);
        let hi = hi.min(self.len);
        merge_sort_slice(&mut self.as_mut_slice()[lo..hi]);
    }

    /// Whole-range [`merge_sort`](FlexArr::merge_sort).
    pub fn sort(&mut self) {
        let len = self.len;
        self.merge_sort(0, len);
    }
}

impl<T> FlexArr<T> {
    /// Fisher–Yates shuffle of the whole range, driven by an injected
    /// pseudo-random source so callers (and tests) can seed it
    /// deterministically.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// # use rand::{rngs::StdRng, SeedableRng};
    /// let mut arr = flexarr![1, 2, 3, 4, 5];
    /// let mut rng = StdRng::seed_from_u64(7);
    /// arr.shuffle(&mut rng);
    /// # let mut sorted = arr.clone(); sorted.sort();
    /// # assert_eq!(sorted, [1, 2, 3, 4, 5]);
    /// ```
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let s = self.as_mut_slice();
        for i in (1..s.len()).rev() {
            let j = rng.gen_range(0..=i);
            s.swap(i, j);
        }
    }
}

fn merge_sort_slice<T: Ord>(s: &mut [T]) {
    if s.len() < 2 || mem::size_of::<T>() == 0 {
        return;
    }
    let mid = s.len() / 2;
    merge_sort_slice(&mut s[..mid]);
    merge_sort_slice(&mut s[mid..]);
    merge(s, mid);
}

/// Merges the sorted halves `s[..mid]` and `s[mid..]` in place. The left
/// half moves out into a scratch buffer; a hole guard moves whatever is left
/// of it back if a comparison panics, so the slice always holds each element
/// exactly once.
fn merge<T: Ord>(s: &mut [T], mid: usize) {
    let len = s.len();
    debug_assert!(0 < mid && mid < len);

    let mut scratch = RawArray::<T>::allocate(mid);
    unsafe {
        ptr::copy_nonoverlapping(s.as_ptr(), scratch.as_mut_ptr(), mid);

        let mut hole = MergeHole {
            start: scratch.as_mut_ptr(),
            end:   scratch.as_mut_ptr().add(mid),
            dest:  s.as_mut_ptr(),
        };
        let mut right = s.as_mut_ptr().add(mid);
        let right_end = s.as_mut_ptr().add(len);

        // `dest` never catches up with `right`: it advances once per taken
        // element while `right` advances only for right-half takes.
        while hole.start < hole.end && right < right_end {
            if *right < *hole.start {
                ptr::copy_nonoverlapping(right, hole.dest, 1);
                right = right.add(1);
            } else {
                ptr::copy_nonoverlapping(hole.start, hole.dest, 1);
                hole.start = hole.start.add(1);
            }
            hole.dest = hole.dest.add(1);
        }
        // Dropping the hole moves the rest of the left half into place;
        // leftover right-half elements are already where they belong.
    }
}

struct MergeHole<T> {
    start: *mut T,
    end:   *mut T,
    dest:  *mut T,
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        unsafe {
            let remaining = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.dest, remaining);
        }
    }
}
