#![forbid(unsafe_code)]

//! Query matching for the command palette.
//!
//! A command matches a query when one of its normalized names contains the
//! normalized query as a substring. The base-language name is always checked
//! first, then the other languages, so a query typed in any supported
//! language finds the command whatever the display language is. A blank
//! query (empty after trimming) matches everything.
//!
//! This is plain substring containment over [`normalize`]d text, not fuzzy
//! or edit-distance matching, and results are never re-ordered: the filtered
//! list is always a subsequence of the registry.
//!
//! [`MatchCorpus`] is the cached form used by the palette. It normalizes every
//! name once and, when the new query extends the previous one, only re-checks
//! the previous survivors.
//!
//! # Invariants
//!
//! 1. **Agreement**: `MatchCorpus::filter` returns exactly the indices for
//!    which [`matches`] is true, in registry order.
//! 2. **Monotonicity**: if `normalize(q2)` starts with `normalize(q1)`, the
//!    matches for `q2` are a subset of the matches for `q1`.

use skypal_core::lang::Language;
use skypal_core::normalize::normalize;

use super::registry::Command;

/// Whether `command` matches `query`.
#[must_use]
pub fn matches(command: &Command, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = normalize(query);
    let name = command.name();
    Language::ALL
        .into_iter()
        .any(|lang| normalize(name.get(lang)).contains(&needle))
}

/// Diagnostics for incremental filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Number of full scans performed.
    pub full_scans: u64,
    /// Number of scans restricted to the previous survivors.
    pub incremental_scans: u64,
    /// Total commands checked across all scans.
    pub total_evaluated: u64,
}

/// Normalized names for a fixed list of commands.
#[derive(Debug, Clone)]
pub struct MatchCorpus {
    /// `names[i][lang]`: normalized name of command `i` in `Language::ALL[lang]`.
    names: Vec<[String; Language::COUNT]>,
    prev_needle: String,
    prev_result: Vec<usize>,
    stats: FilterStats,
}

impl MatchCorpus {
    /// Normalize every name of every command once.
    #[must_use]
    pub fn new(commands: &[Command]) -> Self {
        let names = commands
            .iter()
            .map(|command| Language::ALL.map(|lang| normalize(command.name().get(lang))))
            .collect();
        Self {
            names,
            prev_needle: String::new(),
            prev_result: Vec::new(),
            stats: FilterStats::default(),
        }
    }

    /// Number of commands in the corpus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the corpus is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Diagnostics counters.
    #[must_use]
    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    /// Drop the incremental cache.
    pub fn invalidate(&mut self) {
        self.prev_needle.clear();
        self.prev_result.clear();
    }

    /// Indices of the commands matching `query`, in registry order.
    pub fn filter(&mut self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            self.invalidate();
            return (0..self.names.len()).collect();
        }

        let needle = normalize(query);
        let can_prune = !self.prev_needle.is_empty() && needle.starts_with(&self.prev_needle);

        let result: Vec<usize> = if can_prune {
            self.stats.incremental_scans += 1;
            self.stats.total_evaluated += self.prev_result.len() as u64;
            self.prev_result
                .iter()
                .copied()
                .filter(|&idx| self.entry_matches(idx, &needle))
                .collect()
        } else {
            self.stats.full_scans += 1;
            self.stats.total_evaluated += self.names.len() as u64;
            (0..self.names.len())
                .filter(|&idx| self.entry_matches(idx, &needle))
                .collect()
        };

        self.prev_needle = needle;
        self.prev_result.clone_from(&result);
        result
    }

    fn entry_matches(&self, idx: usize, needle: &str) -> bool {
        self.names[idx].iter().any(|name| name.contains(needle))
    }
}
