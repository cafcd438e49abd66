mod imp;

mod flexarr;

use core::fmt;
use std::error::Error;

use static_assertions::const_assert;

pub use flexarr::*;

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs where
            T: PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
            #[inline]
            fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
        }
    };
}
use impl_slice_partial_eq;

//--------------------------------------------------------------

/// Contract violation reported by the checked container operations.
///
/// Every variant is a caller-side programming error surfaced synchronously;
/// nothing is retried and no operation touches the buffer before its bounds
/// are validated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArrayError {
    /// A construction parameter the container cannot honor, e.g. a zero
    /// capacity or a reserve ratio outside its valid interval.
    InvalidArgument { what: &'static str },
    /// An index or rank outside the valid logical bound of the operation.
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ArrayError::InvalidArgument { what } => write!(f, "invalid argument: {what}"),
            ArrayError::OutOfRange { index, len } => write!(f, "index (is {index}) should be < len (is {len})"),
        }
    }
}

impl Error for ArrayError {}

//--------------------------------------------------------------

/// Capacity policy of a [`FlexArr`]: when to reallocate and to what size.
///
/// The policy is a pair of ratios. After an append, the buffer grows when the
/// length exceeds `grow_ratio * capacity`, multiplying the capacity by the
/// integer inverse of `grow_ratio` (doubling at the default `0.5`). After a
/// removal, the buffer shrinks when the length falls to or below
/// `shrink_ratio * capacity`, down to `shrink_ratio * capacity` but never
/// below the live length or [`MIN_CAPACITY`].
///
/// Both reallocations copy every live element into a fresh buffer; the
/// amortized O(1) cost of push and remove depends on the full copy happening
/// only when a threshold is crossed.
///
/// [`MIN_CAPACITY`]: ReservePolicy::MIN_CAPACITY
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReservePolicy {
    grow_ratio:   f64,
    shrink_ratio: f64,
}

impl ReservePolicy {
    /// Floor the capacity never drops below, no matter how far the container
    /// shrinks.
    pub const MIN_CAPACITY: usize = 8;

    /// Ratio used for both thresholds by [`ReservePolicy::default`].
    pub const DEFAULT_RATIO: f64 = 0.5;

    /// Creates a policy from explicit ratios.
    ///
    /// `grow_ratio` must lie in `(0, 0.5]`: the growth multiplier is the
    /// integer inverse `(1 / grow_ratio) as usize`, and a ratio above `0.5`
    /// would truncate to a multiplier of 1, so growth would never make
    /// progress. `shrink_ratio` must lie in `(0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] when a ratio is outside its
    /// interval.
    pub fn new(grow_ratio: f64, shrink_ratio: f64) -> Result<Self, ArrayError> {
        if !(grow_ratio > 0.0 && grow_ratio <= 0.5) {
            return Err(ArrayError::InvalidArgument { what: "grow ratio must be in (0, 0.5]" });
        }
        if !(shrink_ratio > 0.0 && shrink_ratio < 1.0) {
            return Err(ArrayError::InvalidArgument { what: "shrink ratio must be in (0, 1)" });
        }
        Ok(Self { grow_ratio, shrink_ratio })
    }

    #[inline]
    pub fn grow_ratio(&self) -> f64 {
        self.grow_ratio
    }

    #[inline]
    pub fn shrink_ratio(&self) -> f64 {
        self.shrink_ratio
    }

    /// `true` when a container of `len` live elements has outgrown
    /// `capacity`.
    #[inline]
    pub(crate) fn grow_due(&self, len: usize, capacity: usize) -> bool {
        len > (capacity as f64 * self.grow_ratio) as usize
    }

    /// Capacity after one growth step.
    #[inline]
    pub(crate) fn grown(&self, capacity: usize) -> usize {
        let multiplier = (1.0 / self.grow_ratio) as usize;
        capacity.saturating_mul(multiplier)
    }

    /// `true` when a container of `len` live elements should give memory
    /// back.
    #[inline]
    pub(crate) fn shrink_due(&self, len: usize, capacity: usize) -> bool {
        len <= (capacity as f64 * self.shrink_ratio) as usize
    }

    /// Capacity after one shrink step. Never below the live length or the
    /// [`MIN_CAPACITY`](Self::MIN_CAPACITY) floor.
    #[inline]
    pub(crate) fn shrunk(&self, len: usize, capacity: usize) -> usize {
        ((capacity as f64 * self.shrink_ratio) as usize)
            .max(len)
            .max(Self::MIN_CAPACITY)
    }
}

impl Default for ReservePolicy {
    fn default() -> Self {
        Self {
            grow_ratio:   Self::DEFAULT_RATIO,
            shrink_ratio: Self::DEFAULT_RATIO,
        }
    }
}

const_assert!(ReservePolicy::MIN_CAPACITY > 0);
const_assert!(ReservePolicy::DEFAULT_RATIO > 0.0 && ReservePolicy::DEFAULT_RATIO <= 0.5);
