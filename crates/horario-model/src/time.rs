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

//! Clock intervals.
//!
//! A clock value encodes `hour * 100 + minute`, so `07:00` is `700` and
//! `13:59` is `1359`. A `TimeInterval` is the half-open range `[start, end)`
//! of two such values and is always non-empty.
//!
//! The textual form used by catalogs and configuration files is exactly nine
//! characters: four digits, a dash, four digits (`"0700-0759"`). Hours above
//! 23 and minutes above 59 are not rejected; only the shape and the ordering
//! of the bounds are validated.

use crate::error::TimeParseError;
use horario_core::math::interval::ClosedOpenInterval;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A clock value encoded as `hour * 100 + minute`.
pub type ClockTime = u16;

/// A validated, non-empty clock interval `[start, end)`.
///
/// Ordering is lexicographic on `(start, end)`, the same order as
/// [`TimeInterval::sort_key`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeInterval {
    span: ClosedOpenInterval<ClockTime>,
}

impl TimeInterval {
    /// Length of the textual `hhmm-hhmm` form.
    pub const TEXT_LEN: usize = 9;

    /// Creates an interval from two clock values.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::Range`] if `start >= end`.
    #[inline]
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, TimeParseError> {
        if start >= end {
            return Err(TimeParseError::Range { start, end });
        }
        Ok(Self {
            span: ClosedOpenInterval::new_unchecked(start, end),
        })
    }

    /// Parses the nine-character `hhmm-hhmm` form.
    ///
    /// # Errors
    ///
    /// * [`TimeParseError::Format`] if the text is not nine characters long,
    ///   has no dash at position four, or either half is not four ASCII digits.
    /// * [`TimeParseError::Range`] if the start is not before the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use horario_model::time::TimeInterval;
    ///
    /// let iv = TimeInterval::parse("0700-0759").unwrap();
    /// assert_eq!((iv.start(), iv.end()), (700, 759));
    /// assert!(TimeInterval::parse("700-759").is_err());
    /// assert!(TimeInterval::parse("0900-0800").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, TimeParseError> {
        let bytes = text.as_bytes();
        if bytes.len() != Self::TEXT_LEN || bytes[4] != b'-' {
            return Err(TimeParseError::format(text));
        }

        match (parse_clock(&bytes[..4]), parse_clock(&bytes[5..])) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(TimeParseError::format(text)),
        }
    }

    /// Returns the `hh00-hh59` block of the given hour, as used by grid rows.
    #[inline]
    pub fn hour_block(hour: u8) -> Self {
        Self::hour_range(hour, hour)
    }

    /// Returns the block from `first`:00 to `last`:59.
    ///
    /// A `last` before `first` is treated as `first`.
    #[inline]
    pub fn hour_range(first: u8, last: u8) -> Self {
        let start = ClockTime::from(first) * 100;
        let end = ClockTime::from(last.max(first)) * 100 + 59;
        Self {
            span: ClosedOpenInterval::new_unchecked(start, end),
        }
    }

    /// Returns the inclusive start.
    #[inline]
    pub fn start(&self) -> ClockTime {
        self.span.start()
    }

    /// Returns the exclusive end.
    #[inline]
    pub fn end(&self) -> ClockTime {
        self.span.end()
    }

    /// Returns `true` if the two intervals overlap by more than a shared boundary.
    ///
    /// Symmetric and reflexive. `0800-0900` and `0900-1000` do not collide.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use horario_model::time::TimeInterval;
    ///
    /// let a = TimeInterval::parse("0800-0859").unwrap();
    /// let b = TimeInterval::parse("0700-0959").unwrap();
    /// assert!(a.collides(&b));
    /// ```
    #[inline]
    pub fn collides(&self, other: &TimeInterval) -> bool {
        self.span.intersects(other.span)
    }

    /// Returns `true` if any of `others` collides with `self`.
    #[inline]
    pub fn collides_with_any<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a TimeInterval>,
    {
        others.into_iter().any(|other| self.collides(other))
    }

    /// Returns the chronological sort key `(start, end)`.
    #[inline]
    pub fn sort_key(&self) -> (ClockTime, ClockTime) {
        (self.start(), self.end())
    }

    /// Renders the interval as `hh:mm - hh:mm`.
    pub fn pretty(&self) -> String {
        format!(
            "{:02}:{:02} - {:02}:{:02}",
            self.start() / 100,
            self.start() % 100,
            self.end() / 100,
            self.end() % 100
        )
    }
}

/// Parses exactly four ASCII digits.
#[inline]
fn parse_clock(digits: &[u8]) -> Option<ClockTime> {
    if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        digits
            .iter()
            .fold(0, |acc, d| acc * 10 + ClockTime::from(d - b'0')),
    )
}

impl std::fmt::Debug for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeInterval({:04}-{:04})", self.start(), self.end())
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:04}", self.start(), self.end())
    }
}

impl FromStr for TimeInterval {
    type Err = TimeParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeInterval {
    type Error = TimeParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeInterval> for String {
    #[inline]
    fn from(iv: TimeInterval) -> Self {
        iv.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(text: &str) -> TimeInterval {
        TimeInterval::parse(text).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let iv = t("0700-0759");
        assert_eq!(iv.start(), 700);
        assert_eq!(iv.end(), 759);
        assert_eq!(t("0000-2359").sort_key(), (0, 2359));
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        for bad in [
            "",
            "0700-075",
            "0700-07599",
            "0700 0759",
            "07000759-",
            "07a0-0759",
            "-700-0759",
            "+700-0759",
            "0700-07 9",
            "0700—0759",
        ] {
            assert!(
                matches!(TimeInterval::parse(bad), Err(TimeParseError::Format { .. })),
                "expected format error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_reversed_or_empty_range() {
        assert_eq!(
            TimeInterval::parse("0900-0800"),
            Err(TimeParseError::Range {
                start: 900,
                end: 800
            })
        );
        assert!(matches!(
            TimeInterval::parse("0800-0800"),
            Err(TimeParseError::Range { .. })
        ));
    }

    #[test]
    fn test_hour_and_minute_ranges_are_not_checked() {
        // Only the shape and ordering are validated.
        assert_eq!(t("2500-2599").sort_key(), (2500, 2599));
    }

    #[test]
    fn test_touching_boundary_is_not_a_collision() {
        assert!(!t("0800-0900").collides(&t("0900-1000")));
        assert!(!t("0900-1000").collides(&t("0800-0900")));
    }

    #[test]
    fn test_containment_is_a_collision() {
        assert!(t("0800-0859").collides(&t("0700-0959")));
        assert!(t("0700-0959").collides(&t("0800-0859")));
    }

    #[test]
    fn test_partial_overlap_is_a_collision() {
        assert!(t("0700-0829").collides(&t("0800-0959")));
    }

    #[test]
    fn test_collides_with_any() {
        let forbidden = [t("0700-0859"), t("1300-1459")];
        assert!(t("1400-1559").collides_with_any(&forbidden));
        assert!(!t("0900-1259").collides_with_any(&forbidden));
        assert!(!t("0900-1259").collides_with_any(std::iter::empty()));
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let mut blocks = vec![t("1200-1359"), t("0800-0859"), t("0700-0759")];
        blocks.sort_by_key(TimeInterval::sort_key);
        assert_eq!(blocks, vec![t("0700-0759"), t("0800-0859"), t("1200-1359")]);

        // Mixed digit widths and shared starts.
        assert!(t("0900-1000").sort_key() < t("1000-1100").sort_key());
        assert!(t("0900-0930").sort_key() < t("0900-1000").sort_key());
    }

    #[test]
    fn test_display_and_pretty() {
        let iv = t("0705-1350");
        assert_eq!(iv.to_string(), "0705-1350");
        assert_eq!(iv.pretty(), "07:05 - 13:50");
        assert_eq!(format!("{:?}", iv), "TimeInterval(0705-1350)");
    }

    #[test]
    fn test_hour_block() {
        assert_eq!(TimeInterval::hour_block(7), t("0700-0759"));
        assert_eq!(TimeInterval::hour_block(20), t("2000-2059"));
    }

    #[test]
    fn test_hour_range() {
        assert_eq!(TimeInterval::hour_range(7, 8), t("0700-0859"));
        assert_eq!(TimeInterval::hour_range(13, 14), t("1300-1459"));
        assert_eq!(TimeInterval::hour_range(9, 8), t("0900-0959"));
    }

    #[test]
    fn test_serde_round_trips_through_text() {
        let iv: TimeInterval = serde_json::from_str("\"1300-1459\"").unwrap();
        assert_eq!(iv, t("1300-1459"));
        assert_eq!(serde_json::to_string(&iv).unwrap(), "\"1300-1459\"");
        assert!(serde_json::from_str::<TimeInterval>("\"1300-1200\"").is_err());
    }

    fn arb_interval() -> impl Strategy<Value = TimeInterval> {
        (0u16..2300, 1u16..400).prop_map(|(start, len)| TimeInterval::new(start, start + len).unwrap())
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(a in arb_interval(), b in arb_interval()) {
            prop_assert_eq!(a.collides(&b), b.collides(&a));
        }

        #[test]
        fn prop_collision_is_reflexive(a in arb_interval()) {
            prop_assert!(a.collides(&a));
        }

        #[test]
        fn prop_display_parses_back(a in arb_interval()) {
            prop_assert_eq!(TimeInterval::parse(&a.to_string()), Ok(a));
        }

        #[test]
        fn prop_collision_matches_pointwise_overlap(a in arb_interval(), b in arb_interval()) {
            let pointwise = (a.start()..a.end()).any(|p| b.start() <= p && p < b.end());
            prop_assert_eq!(a.collides(&b), pointwise);
        }
    }
}
