use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::normalize_name;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r?\n").unwrap();
}

/// The set of names eligible to win, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    names: Vec<String>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single name. Blank and duplicate names are ignored.
    /// Returns true if the pool grew.
    pub fn add(&mut self, name: &str) -> bool {
        match normalize_name(name) {
            Some(name) if !self.contains(&name) => {
                self.names.push(name);
                true
            }
            _ => false,
        }
    }

    /// Add a batch of names, keeping the first occurrence of each and skipping
    /// anything already in the pool. Returns how many were added.
    pub fn add_many<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.names.iter().cloned().collect();
        let mut added = 0;

        for raw in names {
            if let Some(name) = normalize_name(raw.as_ref()) {
                if seen.insert(name.clone()) {
                    self.names.push(name);
                    added += 1;
                }
            }
        }

        added
    }

    /// Remove a name if present. Returns true if something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Owned copy of the pool.
    pub fn list(&self) -> Vec<String> {
        self.names.clone()
    }

    /// Names not in `exclude`, in pool order.
    pub fn available<'a>(&'a self, exclude: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
        self.names.iter().filter(move |n| !exclude.contains(n))
    }
}

/// Split a pasted block of names into one entry per line. Lines are trimmed
/// and blank lines dropped; duplicates are left for the pool to resolve.
pub fn parse_candidate_blob(text: &str) -> Vec<String> {
    LINE_BREAK
        .split(text)
        .filter_map(normalize_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_and_deduplicates() {
        let mut pool = CandidatePool::new();
        assert!(pool.add(" Alice "));
        assert!(!pool.add("Alice"));
        assert!(!pool.add("   "));
        assert!(pool.add("Bob"));
        assert_eq!(pool.list(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn add_many_keeps_first_occurrence_order() {
        let mut pool = CandidatePool::new();
        pool.add("Carol");
        let added = pool.add_many(["Bob", " Alice", "", "Bob", "Carol", "Alice "]);
        assert_eq!(added, 2);
        assert_eq!(pool.list(), vec!["Carol", "Bob", "Alice"]);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut pool = CandidatePool::new();
        pool.add_many(["A", "B"]);
        assert!(!pool.remove("Z"));
        assert!(pool.remove("A"));
        assert_eq!(pool.list(), vec!["B"]);
    }

    #[test]
    fn list_is_a_copy() {
        let mut pool = CandidatePool::new();
        pool.add("A");
        let mut listed = pool.list();
        listed.push("B".to_string());
        listed[0] = "mutated".to_string();
        assert_eq!(pool.list(), vec!["A"]);
    }

    #[test]
    fn available_excludes_given_names() {
        let mut pool = CandidatePool::new();
        pool.add_many(["A", "B", "C"]);
        let winners = vec!["B".to_string()];
        let available: Vec<&String> = pool.available(&winners).collect();
        assert_eq!(available, vec!["A", "C"]);
    }

    #[test]
    fn parse_blob_splits_lines() {
        let names = parse_candidate_blob("Alice\r\n  Bob  \n\n\nCarol\nAlice\n");
        assert_eq!(names, vec!["Alice", "Bob", "Carol", "Alice"]);
    }

    #[test]
    fn clear_empties_pool() {
        let mut pool = CandidatePool::new();
        pool.add_many(["A", "B"]);
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }
}
