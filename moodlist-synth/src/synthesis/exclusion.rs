//! Per-run exclusion set
//!
//! Candidate keys already attempted within one synthesis run. Membership uses
//! the normalized key; the display form is kept in insertion order for the
//! prompt's "avoid" block.

use crate::types::Candidate;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    index: HashSet<String>,
    display: Vec<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.index.contains(&candidate.key())
    }

    /// Mark a candidate as attempted
    ///
    /// Returns `false` when the key was already present.
    pub fn insert(&mut self, candidate: &Candidate) -> bool {
        if self.index.insert(candidate.key()) {
            self.display.push(candidate.display_key());
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Display keys in insertion order
    pub fn keys(&self) -> &[String] {
        &self.display
    }
}
