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

//! Allowlist filtering applied once to the finished result set.
//!
//! Requirements that only make sense for a complete schedule ("this section
//! must be in it", "at least one course with this professor") are checked
//! here rather than during the search. Both lists default to empty, which
//! accepts every combination.

use crate::combination::Combination;
use horario_model::{catalog::Catalog, offering::OfferingId};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationPostFilter {
    required_offerings: Vec<OfferingId>,
    required_professors: Vec<String>,
}

impl CombinationPostFilter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only combinations containing every one of `ids`.
    #[inline]
    pub fn require_offerings<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = OfferingId>,
    {
        self.required_offerings.extend(ids);
        self
    }

    /// Keeps only combinations in which every one of `professors` teaches at least one chosen offering.
    #[inline]
    pub fn require_professors<I, S>(mut self, professors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_professors
            .extend(professors.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if the filter accepts everything.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.required_offerings.is_empty() && self.required_professors.is_empty()
    }

    /// Returns `true` if `combination` satisfies both allowlists.
    ///
    /// Professors are looked up in `catalog`, which must hold every chosen
    /// offering.
    pub fn accepts(&self, catalog: &Catalog, combination: &Combination) -> bool {
        if !self
            .required_offerings
            .iter()
            .all(|&id| combination.contains(id))
        {
            return false;
        }
        if self.required_professors.is_empty() {
            return true;
        }

        let professors: FxHashSet<&str> = combination
            .chosen()
            .iter()
            .filter_map(|&id| {
                let offering = catalog.get(id);
                debug_assert!(
                    offering.is_some(),
                    "chosen offering {} is missing from the catalog",
                    id
                );
                offering
            })
            .map(|o| o.professor())
            .collect();
        self.required_professors
            .iter()
            .all(|p| professors.contains(p.as_str()))
    }

    /// Drops the combinations that do not satisfy both allowlists, keeping order.
    pub fn apply(&self, catalog: &Catalog, mut combinations: Vec<Combination>) -> Vec<Combination> {
        if self.is_empty() {
            return combinations;
        }
        let before = combinations.len();
        combinations.retain(|c| self.accepts(catalog, c));
        tracing::debug!(
            before,
            after = combinations.len(),
            "post filter applied"
        );
        combinations
    }
}
