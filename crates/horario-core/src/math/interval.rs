// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Half-Open Intervals
//!
//! `ClosedOpenInterval<T>` models the integer range `[start, end)`. Two
//! intervals that merely touch (`a.end == b.start`) share no point, which is
//! exactly the rule a timetable needs: a class ending at 09:00 and another one
//! starting at 09:00 do not overlap.
//!
//! The overlap test is the single inequality
//! `max(a.start, b.start) < min(a.end, b.end)`, which covers partial overlap,
//! containment in both directions and identity at once.

use num_traits::PrimInt;
use std::cmp::{max, min};

/// A half-open interval `[start, end)` over a primitive integer type.
///
/// # Invariants
///
/// `start_inclusive <= end_exclusive`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use horario_core::math::interval::ClosedOpenInterval;
    ///
    /// let iv = ClosedOpenInterval::new(700u16, 759u16);
    /// assert_eq!(iv.start(), 700);
    /// assert_eq!(iv.end(), 759);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval`, checking the invariant only in debug builds.
    #[inline]
    pub fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Returns the inclusive start bound.
    #[inline]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    /// Returns the exclusive end bound.
    #[inline]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns `true` if the two intervals share at least one point.
    ///
    /// Symmetric, and reflexive for non-empty intervals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use horario_core::math::interval::ClosedOpenInterval;
    ///
    /// let a = ClosedOpenInterval::new(800, 900);
    /// assert!(a.intersects(ClosedOpenInterval::new(830, 1000)));
    /// assert!(!a.intersects(ClosedOpenInterval::new(900, 1000))); // touching
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        max(self.start_inclusive, other.start_inclusive)
            < min(self.end_exclusive, other.end_exclusive)
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedOpenInterval")
            .field("start_inclusive", &self.start_inclusive)
            .field("end_exclusive", &self.end_exclusive)
            .finish()
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}
