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

//! Teaching days and per-day storage.
//!
//! Catalog rows identify a day with a single letter: `L` (Monday), `A`
//! (Tuesday), `M` (Wednesday), `J` (Thursday), `V` (Friday) and `S`
//! (Saturday). Sundays are never scheduled.

use crate::error::WeekdayParseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the six teaching days, in display order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Number of teaching days.
    pub const COUNT: usize = 6;

    /// All teaching days in display order.
    pub const ALL: [Weekday; Weekday::COUNT] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Returns the zero-based position of the day in display order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the one-letter catalog code of the day.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use horario_model::weekday::Weekday;
    ///
    /// assert_eq!(Weekday::Tuesday.code(), 'A');
    /// assert_eq!(Weekday::from_code('J'), Some(Weekday::Thursday));
    /// ```
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Weekday::Monday => 'L',
            Weekday::Tuesday => 'A',
            Weekday::Wednesday => 'M',
            Weekday::Thursday => 'J',
            Weekday::Friday => 'V',
            Weekday::Saturday => 'S',
        }
    }

    /// Maps a one-letter catalog code back to its day.
    #[inline]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'L' => Some(Weekday::Monday),
            'A' => Some(Weekday::Tuesday),
            'M' => Some(Weekday::Wednesday),
            'J' => Some(Weekday::Thursday),
            'V' => Some(Weekday::Friday),
            'S' => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Returns the English name of the day.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = WeekdayParseError;

    /// Parses a one-letter catalog code, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Weekday::from_code(code),
            _ => None,
        }
        .ok_or_else(|| WeekdayParseError {
            code: trimmed.to_string(),
        })
    }
}

impl TryFrom<String> for Weekday {
    type Error = WeekdayParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weekday> for String {
    fn from(day: Weekday) -> Self {
        day.code().to_string()
    }
}

/// A map with exactly one slot per teaching day.
///
/// Indexing never fails and iteration always follows display order, which is
/// what both the search (deterministic merging) and the renderer (column
/// order) need.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct WeekdayMap<T> {
    slots: [T; Weekday::COUNT],
}

impl<T> WeekdayMap<T> {
    /// Creates a map by evaluating `f` for every day.
    #[inline]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Weekday) -> T,
    {
        Self {
            slots: Weekday::ALL.map(&mut f),
        }
    }

    /// Returns the value stored for `day`.
    #[inline]
    pub fn get(&self, day: Weekday) -> &T {
        &self.slots[day.index()]
    }

    /// Returns a mutable reference to the value stored for `day`.
    #[inline]
    pub fn get_mut(&mut self, day: Weekday) -> &mut T {
        &mut self.slots[day.index()]
    }

    /// Iterates over `(day, value)` pairs in display order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &T)> + '_ {
        Weekday::ALL.into_iter().zip(self.slots.iter())
    }

    /// Iterates mutably over `(day, value)` pairs in display order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Weekday, &mut T)> + '_ {
        Weekday::ALL.into_iter().zip(self.slots.iter_mut())
    }

    /// Iterates mutably over the stored values in display order.
    #[inline]
    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.slots.iter_mut()
    }
}

impl<T> std::ops::Index<Weekday> for WeekdayMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, day: Weekday) -> &Self::Output {
        self.get(day)
    }
}

impl<T> std::ops::IndexMut<Weekday> for WeekdayMap<T> {
    #[inline]
    fn index_mut(&mut self, day: Weekday) -> &mut Self::Output {
        self.get_mut(day)
    }
}
