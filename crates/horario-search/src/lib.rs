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

//! # Horario Search
//!
//! Turns a catalog and a list of wanted subjects into every weekly schedule
//! that takes exactly one offering per subject without two meetings overlapping.
//!
//! ## Pipeline
//!
//! 1. **`filter`**: `CandidateFilter` groups the catalog by wanted subject and
//!    drops offerings taught by excluded professors, excluded by code, or
//!    meeting inside a forbidden window.
//! 2. **`engine`**: `CombinationSearch` walks the subject groups depth-first,
//!    one level per subject, pruning any candidate that collides with the
//!    partial schedule built so far.
//! 3. **`post_filter`**: `CombinationPostFilter` keeps only the schedules that
//!    contain every required offering and professor.
//!
//! ## Search control
//!
//! The engine reports to a `SearchMonitor` at every node and asks it whether
//! to continue. Monitors in `monitor` cap the number of schedules, the wall
//! time, react to an external interrupt flag or log progress. A stopped search
//! still returns the schedules found so far, tagged with
//! `TerminationReason::Aborted`.
//!
//! `parallel::ParallelCombinationSearch` spreads the first subject's
//! candidates over scoped worker threads and returns the schedules in the
//! same order as the sequential engine.

pub mod combination;
pub mod engine;
pub mod filter;
pub mod group;
pub mod monitor;
pub mod parallel;
pub mod post_filter;
pub mod result;
pub mod stats;
