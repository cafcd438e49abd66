use core::ptr;

use super::FlexArr;

impl<T: PartialEq> FlexArr<T> {
    /// Linear search over `[lo, hi)` (clamped to the live range), scanning
    /// from `hi - 1` down to `lo`.
    ///
    /// Returns the *highest* matching rank, or `None`. The backward scan
    /// direction is what [`deduplicate`] relies on to keep first occurrences.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let arr = flexarr![3, 1, 4, 1, 5];
    /// assert_eq!(arr.rfind(&1, 0, arr.len()), Some(3));
    /// assert_eq!(arr.rfind(&1, 0, 3), Some(1));
    /// assert_eq!(arr.rfind(&9, 0, arr.len()), None);
    /// ```
    ///
    /// [`deduplicate`]: FlexArr::deduplicate
    pub fn rfind(&self, value: &T, lo: usize, hi: usize) -> Option<usize> {
        if lo > hi {
            return None;
        }
        let lo = lo.min(self.len);
        let hi = hi.min(self.len);
        self.as_slice()[lo..hi]
            .iter()
            .rposition(|candidate| candidate == value)
            .map(|pos| lo + pos)
    }

    /// Removes duplicates from content in *any* order, keeping the first
    /// occurrence of each value. Returns how many elements were removed.
    ///
    /// Each duplicate goes through [`remove`], so the shrink rule fires per
    /// removal. *O*(n²) worst case; for sorted content prefer
    /// [`uniquify`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![0, 1, 2, 3, 4, 1, 2];
    /// assert_eq!(arr.deduplicate(), 2);
    /// assert_eq!(arr, [0, 1, 2, 3, 4]);
    /// ```
    ///
    /// [`remove`]: FlexArr::remove
    /// [`uniquify`]: FlexArr::uniquify
    pub fn deduplicate(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 1;
        while i < self.len {
            if self.rfind(&self[i], 0, i).is_some() {
                // i < len here, remove cannot fail; the duplicate is dropped.
                let _ = self.remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }
}

impl<T: PartialOrd> FlexArr<T> {
    /// Count of adjacent inversions. Zero means the content is
    /// non-descending, which is what the sort-family postcondition
    /// guarantees and what [`search`] and [`uniquify`] dispatch on.
    ///
    /// [`search`]: FlexArr::search
    /// [`uniquify`]: FlexArr::uniquify
    pub fn disordered(&self) -> usize {
        self.as_slice()
            .windows(2)
            .filter(|pair| pair[0] > pair[1])
            .count()
    }

    /// Searches `[lo, hi)` for `value`: binary search when the content is
    /// non-descending, linear search otherwise. Always returns the
    /// dispatched result.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let arr = flexarr![1, 2, 3, 4, 5];
    /// assert_eq!(arr.search(&3, 0, arr.len()), Some(2));
    /// assert_eq!(arr.search(&6, 0, arr.len()), None);
    /// ```
    pub fn search(&self, value: &T, lo: usize, hi: usize) -> Option<usize> {
        if self.disordered() == 0 {
            self.bi_search(value, lo, hi)
        } else {
            self.rfind(value, lo, hi)
        }
    }

    /// Whole-range [`search`](FlexArr::search).
    #[inline]
    pub fn search_all(&self, value: &T) -> Option<usize> {
        self.search(value, 0, self.len)
    }

    /// Binary search over the non-descending range `[lo, hi)`: narrows while
    /// `hi - lo > 1` around `mid = (lo + hi) / 2`, moving `hi` down on
    /// less-than and `lo` up otherwise, then checks equality at the final
    /// `lo`.
    fn bi_search(&self, value: &T, lo: usize, hi: usize) -> Option<usize> {
        if lo > hi {
            return None;
        }
        let mut lo = lo.min(self.len);
        let mut hi = hi.min(self.len);
        if lo >= hi {
            return None;
        }

        let s = self.as_slice();
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if *value < s[mid] {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        (s[lo] == *value).then_some(lo)
    }

    /// Removes duplicates, exploiting order when there is any to exploit.
    ///
    /// Non-descending content collapses in one stable forward pass, *O*(n),
    /// each equal run reduced to its first element; disordered content falls
    /// back to [`deduplicate`] (*O*(n²)). Returns how many elements were
    /// removed. The shrink rule applies to the removed count either way.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flexarr::prelude::*;
    /// let mut arr = flexarr![1, 1, 2, 2, 3];
    /// assert_eq!(arr.uniquify(), 2);
    /// assert_eq!(arr, [1, 2, 3]);
    /// ```
    ///
    /// [`deduplicate`]: FlexArr::deduplicate
    pub fn uniquify(&mut self) -> usize {
        if self.disordered() != 0 {
            return self.deduplicate();
        }

        let len = self.len;
        if len < 2 {
            return 0;
        }

        let mut kept = 1;
        unsafe {
            let p = self.arr.as_mut_ptr();
            // Track `len` at the kept prefix: a panicking comparison leaks
            // the unscanned tail instead of double-dropping dead slots.
            self.len = 1;
            for read in 1..len {
                if *p.add(read) != *p.add(kept - 1) {
                    if read != kept {
                        ptr::copy_nonoverlapping(p.add(read), p.add(kept), 1);
                    }
                    kept += 1;
                    self.len = kept;
                } else {
                    ptr::drop_in_place(p.add(read));
                }
            }
        }

        let removed = len - kept;
        self.shrink_many(removed);
        removed
    }
}
