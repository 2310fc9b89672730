//! Username derivation and uniqueness resolution for the backfill.
//!
//! Existing usernames are loaded into memory once; candidates are resolved
//! locally instead of probing the database per candidate.

use std::collections::HashSet;

/// Base used when an email's local part strips to nothing.
const FALLBACK_BASE: &str = "user";

/// Strip the local part of an email down to `[A-Za-z0-9]`.
///
/// "jane.doe@example.com" -> "janedoe", "a+b@example.com" -> "ab".
/// A local part with no alphanumeric characters yields an empty string;
/// the allocator substitutes [`FALLBACK_BASE`] in that case.
#[must_use]
pub fn derive_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("");
    local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// True when `name` satisfies the username invariant: non-empty, ASCII
/// alphanumeric only.
#[must_use]
pub fn is_valid_username(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Resolves unique usernames against an in-memory set of taken names.
///
/// Every allocated name is recorded, so a single allocator instance can
/// resolve an entire batch without touching the database.
pub struct UsernameAllocator {
    taken: HashSet<String>,
}

impl UsernameAllocator {
    #[must_use]
    pub fn new(taken: impl IntoIterator<Item = String>) -> Self {
        Self {
            taken: taken.into_iter().collect(),
        }
    }

    /// Return `base` if free, otherwise `base1`, `base2`, ... (first free
    /// suffix wins). The result is recorded as taken.
    pub fn allocate(&mut self, base: &str) -> String {
        let base = if base.is_empty() { FALLBACK_BASE } else { base };

        let mut candidate = base.to_string();
        let mut counter = 1u64;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }

        self.taken.insert(candidate.clone());
        candidate
    }

    #[must_use]
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_strips_punctuation() {
        assert_eq!(derive_base("jane.doe@example.com"), "janedoe");
        assert_eq!(derive_base("a+b@example.com"), "ab");
        assert_eq!(derive_base("j_o-h.n42@school.edu"), "john42");
    }

    #[test]
    fn test_derive_ignores_domain() {
        assert_eq!(derive_base("jane@with.dots.example.com"), "jane");
    }

    #[test]
    fn test_derive_output_is_alphanumeric() {
        for email in ["a.b+c@x.y", "Ü.né@x", "admin@school.local"] {
            assert!(derive_base(email).chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_derive_all_punctuation_is_empty() {
        assert_eq!(derive_base("...+++@example.com"), "");
    }

    #[test]
    fn test_allocate_free_base_unchanged() {
        let mut allocator = UsernameAllocator::new(vec!["other".to_string()]);
        assert_eq!(allocator.allocate("janedoe"), "janedoe");
    }

    #[test]
    fn test_allocate_suffixes_in_order() {
        let mut allocator =
            UsernameAllocator::new(vec!["janedoe".to_string(), "janedoe1".to_string()]);
        assert_eq!(allocator.allocate("janedoe"), "janedoe2");
    }

    #[test]
    fn test_allocate_records_results() {
        let mut allocator = UsernameAllocator::new(vec![]);
        assert_eq!(allocator.allocate("janedoe"), "janedoe");
        assert_eq!(allocator.allocate("janedoe"), "janedoe1");
        assert_eq!(allocator.allocate("janedoe"), "janedoe2");
        assert!(allocator.is_taken("janedoe2"));
    }

    #[test]
    fn test_allocate_never_returns_taken() {
        let taken: Vec<String> = (0..50).map(|i| format!("bob{i}")).collect();
        let mut allocator = UsernameAllocator::new(taken.clone());
        let got = allocator.allocate("bob");
        assert!(!taken.contains(&got));
    }

    #[test]
    fn test_empty_base_falls_back() {
        let mut allocator = UsernameAllocator::new(vec!["user".to_string()]);
        assert_eq!(allocator.allocate(""), "user1");
        assert_eq!(allocator.allocate(""), "user2");
    }

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("janedoe2"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("jane.doe"));
        assert!(!is_valid_username("jane doe"));
    }
}
