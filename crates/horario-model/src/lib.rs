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

//! # Horario Model
//!
//! The domain model shared by the filtering, search and rendering layers.
//!
//! ## Architecture
//!
//! * **`weekday`**: the six teaching days, their one-letter catalog codes and
//!   `WeekdayMap`, a fixed six-slot map used for all per-day storage.
//! * **`time`**: `TimeInterval`, a validated `hhmm-hhmm` clock range and the
//!   collision primitive every other component relies on.
//! * **`session`**: a single weekday meeting of an offering.
//! * **`offering`**: an offering (one section of a subject) and the
//!   `register_session` operation that keeps its same-day meetings disjoint.
//! * **`catalog`**: the explicit registry of offerings built from raw rows.
//! * **`loading`**: CSV ingestion into a `Catalog`.
//! * **`index`**: strongly typed positions into catalogs and subject lists.
//! * **`error`**: the error taxonomy of the model layer.
//!
//! ## Design Philosophy
//!
//! Invariants are enforced where data enters the model. A `TimeInterval`
//! always satisfies `start < end`, and an `Offering` never holds two
//! overlapping sessions on the same day. Downstream search code can therefore
//! treat the model as trusted.

pub mod catalog;
pub mod error;
pub mod index;
pub mod loading;
pub mod offering;
pub mod session;
pub mod time;
pub mod weekday;
