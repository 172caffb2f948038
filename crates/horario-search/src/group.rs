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

use horario_model::{index::SubjectIndex, offering::Offering};

/// The offerings of one wanted subject that survived filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectGroup<'a> {
    subject: String,
    candidates: Vec<&'a Offering>,
}

impl<'a> SubjectGroup<'a> {
    #[inline]
    pub fn new<S: Into<String>>(subject: S) -> Self {
        Self {
            subject: subject.into(),
            candidates: Vec::new(),
        }
    }

    #[inline]
    pub fn with_candidates<S: Into<String>>(subject: S, candidates: Vec<&'a Offering>) -> Self {
        Self {
            subject: subject.into(),
            candidates,
        }
    }

    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[inline]
    pub fn candidates(&self) -> &[&'a Offering] {
        &self.candidates
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    pub fn push(&mut self, offering: &'a Offering) {
        self.candidates.push(offering);
    }
}

/// Candidate lists for every wanted subject, in request order.
///
/// Every wanted subject has a group, even when no offering survived filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubjectGroups<'a> {
    groups: Vec<SubjectGroup<'a>>,
}

impl<'a> SubjectGroups<'a> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn from_vec(groups: Vec<SubjectGroup<'a>>) -> Self {
        Self { groups }
    }

    /// Returns the number of subject groups, which is the depth of the search tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[inline]
    pub fn push(&mut self, group: SubjectGroup<'a>) -> SubjectIndex {
        let index = SubjectIndex::new(self.groups.len());
        self.groups.push(group);
        index
    }

    /// Returns the group at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn group(&self, index: SubjectIndex) -> &SubjectGroup<'a> {
        &self.groups[index.get()]
    }

    #[inline]
    pub fn find(&self, subject: &str) -> Option<&SubjectGroup<'a>> {
        self.groups.iter().find(|g| g.subject() == subject)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, SubjectGroup<'a>> {
        self.groups.iter()
    }

    /// Returns the first group without candidates, if any.
    ///
    /// A single empty group means no schedule can exist.
    #[inline]
    pub fn first_empty(&self) -> Option<&SubjectGroup<'a>> {
        self.groups.iter().find(|g| g.is_empty())
    }

    /// Returns the size of the full Cartesian product, saturating at `u64::MAX`.
    pub fn product_size(&self) -> u64 {
        self.groups
            .iter()
            .fold(1u64, |acc, g| acc.saturating_mul(g.len() as u64))
    }
}

impl<'a> std::ops::Index<SubjectIndex> for SubjectGroups<'a> {
    type Output = SubjectGroup<'a>;

    #[inline]
    fn index(&self, index: SubjectIndex) -> &Self::Output {
        self.group(index)
    }
}

impl<'s, 'a> IntoIterator for &'s SubjectGroups<'a> {
    type Item = &'s SubjectGroup<'a>;
    type IntoIter = std::slice::Iter<'s, SubjectGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for SubjectGroups<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            let ids = group
                .candidates
                .iter()
                .map(|o| o.id().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "{:<3} {:<30} [{}]", i, group.subject, ids)?;
        }
        Ok(())
    }
}
