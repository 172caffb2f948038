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

use crate::{
    offering::OfferingId,
    time::{ClockTime, TimeInterval},
    weekday::Weekday,
};

/// A single weekday meeting of one offering.
///
/// Sessions are owned by exactly one `Offering`; combinations hold clones.
/// Equality is structural over all four fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Session {
    weekday: Weekday,
    interval: TimeInterval,
    room: Option<String>,
    offering: OfferingId,
}

impl Session {
    /// Creates a new session. `room` is `None` for synthetic sessions.
    #[inline]
    pub fn new(
        weekday: Weekday,
        interval: TimeInterval,
        room: Option<String>,
        offering: OfferingId,
    ) -> Self {
        Self {
            weekday,
            interval,
            room,
            offering,
        }
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[inline]
    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    #[inline]
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Returns the identifier of the owning offering.
    #[inline]
    pub fn offering(&self) -> OfferingId {
        self.offering
    }

    /// Returns `true` if both sessions' intervals collide. The weekday is not compared.
    #[inline]
    pub fn collides(&self, other: &Session) -> bool {
        self.interval.collides(&other.interval)
    }

    #[inline]
    pub fn sort_key(&self) -> (ClockTime, ClockTime) {
        self.interval.sort_key()
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.weekday.code(), self.interval)?;
        if let Some(room) = &self.room {
            write!(f, " @ {}", room)?;
        }
        write!(f, " [{}]", self.offering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(time: &str, room: Option<&str>, id: u32) -> Session {
        Session::new(
            Weekday::Monday,
            TimeInterval::parse(time).unwrap(),
            room.map(str::to_string),
            OfferingId::new(id),
        )
    }

    #[test]
    fn test_accessors() {
        let s = session("0700-0759", Some("A-101"), 58469);
        assert_eq!(s.weekday(), Weekday::Monday);
        assert_eq!(s.interval().sort_key(), (700, 759));
        assert_eq!(s.room(), Some("A-101"));
        assert_eq!(s.offering(), OfferingId::new(58469));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            session("0700-0759", Some("A-101"), 1),
            session("0700-0759", Some("A-101"), 1)
        );
        assert_ne!(
            session("0700-0759", Some("A-101"), 1),
            session("0700-0759", Some("A-102"), 1)
        );
        assert_ne!(
            session("0700-0759", None, 1),
            session("0700-0759", None, 2)
        );
    }

    #[test]
    fn test_collides_delegates_to_interval() {
        assert!(session("0700-0829", None, 1).collides(&session("0800-0859", None, 2)));
        assert!(!session("0700-0800", None, 1).collides(&session("0800-0859", None, 2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            session("0700-0759", Some("A-101"), 7).to_string(),
            "L 0700-0759 @ A-101 [7]"
        );
        assert_eq!(session("0700-0759", None, 7).to_string(), "L 0700-0759 [7]");
    }
}
