//! Filtering and ordering of branch listings.

use crate::branch::{Branch, PropertySource, BRANCH_KEY};
use regex::Regex;

const SECONDS_PER_DAY: i64 = 86400;

/// Patterns keyed by property name, or [`BRANCH_KEY`] for the branch name.
#[derive(Debug, Clone, Default)]
pub struct PatternMap {
    entries: Vec<(String, Regex)>,
}

impl PatternMap {
    pub fn new() -> Self {
        PatternMap::default()
    }

    /// Adds a pattern, replacing an earlier one for the same key.
    pub fn insert(&mut self, key: &str, pattern: Regex) {
        self.entries.retain(|(k, _)| k != key);
        self.entries.push((key.to_string(), pattern));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.entries.iter().map(|(key, regex)| (key.as_str(), regex))
    }
}

/// Filter and ordering options of a listing.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Branches whose last commit is more days old are dropped.
    pub max_days_old: Option<i64>,
    pub name_only: Option<Regex>,
    pub name_except: Option<Regex>,
    /// Every entry must match for a branch to be kept.
    pub property_only: PatternMap,
    /// No entry may match for a branch to be kept.
    pub property_except: PatternMap,
    /// List the least recently modified branch first.
    pub reverse: bool,
}

/// Outcome of applying the filters to the branches of a repository.
#[derive(Debug)]
pub enum Selection {
    /// The repository has no branches at all.
    NoBranches,
    /// Branches exist, but all were filtered out.
    NoMatches,
    Branches(Vec<Branch>),
}

impl Filters {
    /// Whether a branch passes all filters.
    pub fn matches<S: PropertySource + ?Sized>(
        &self,
        branch: &Branch,
        source: &S,
        now: i64,
    ) -> bool {
        if let (Some(max_days), Some(time)) = (self.max_days_old, branch.last_commit_time()) {
            let age = now.saturating_sub(time.as_integer());
            if age > max_days.saturating_mul(SECONDS_PER_DAY) {
                return false;
            }
        }
        if let Some(regex) = &self.name_only {
            if !regex.is_match(branch.name()) {
                return false;
            }
        }
        if let Some(regex) = &self.name_except {
            if regex.is_match(branch.name()) {
                return false;
            }
        }
        let matches_entry = |(key, regex): (&str, &Regex)| {
            let value = if key == BRANCH_KEY {
                branch.name().to_string()
            } else {
                branch.get_property(source, key).unwrap_or_default()
            };
            regex.is_match(&value)
        };
        self.property_only.iter().all(matches_entry)
            && !self.property_except.iter().any(matches_entry)
    }

    /// Filters and sorts branches, most recently modified first unless reversed.
    ///
    /// Branches without commits sort as the oldest. Ties keep their input order.
    pub fn select<S: PropertySource + ?Sized>(
        &self,
        branches: Vec<Branch>,
        source: &S,
        now: i64,
    ) -> Selection {
        if branches.is_empty() {
            return Selection::NoBranches;
        }
        let mut selected: Vec<Branch> = branches
            .into_iter()
            .filter(|branch| self.matches(branch, source, now))
            .collect();
        if selected.is_empty() {
            return Selection::NoMatches;
        }

        let key = |branch: &Branch| {
            branch
                .last_commit_time()
                .map_or(i64::MIN, |t| t.as_integer())
        };
        if self.reverse {
            selected.sort_by_key(key);
        } else {
            selected.sort_by_key(|branch| std::cmp::Reverse(key(branch)));
        }
        Selection::Branches(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::{Filters, PatternMap, Selection};
    use crate::branch::{Branch, BRANCH_KEY};
    use crate::commit_time::CommitTime;
    use regex::Regex;
    use std::collections::HashMap;

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86400;

    fn branch(name: &str, days_old: i64) -> Branch {
        Branch::new(name, Some(CommitTime::new(NOW - days_old * DAY, ""))).unwrap()
    }

    fn fixture() -> (Vec<Branch>, HashMap<(String, String), String>) {
        let branches = vec![branch("A", 10), branch("B", 20), branch("C", 30), branch("D", 40)];
        let mut store = HashMap::new();
        for (name, value) in &[("A", "bar1"), ("B", "bar2"), ("C", "baz")] {
            store.insert((name.to_string(), "foo".to_string()), value.to_string());
        }
        (branches, store)
    }

    fn names(selection: Selection) -> Vec<String> {
        match selection {
            Selection::Branches(branches) => {
                branches.iter().map(|b| b.name().to_string()).collect()
            }
            other => panic!("expected branches, got {:?}", other),
        }
    }

    fn patterns(key: &str, pattern: &str) -> PatternMap {
        let mut map = PatternMap::new();
        map.insert(key, Regex::new(pattern).unwrap());
        map
    }

    #[test]
    fn age_filter() {
        let (branches, store) = fixture();
        let filters = Filters {
            max_days_old: Some(25),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches, &store, NOW)), vec!["A", "B"]);
    }

    #[test]
    fn age_filter_counts_partial_days() {
        let store: HashMap<(String, String), String> = HashMap::new();
        let branches = vec![
            Branch::new("inside", Some(CommitTime::new(NOW - 25 * DAY, ""))).unwrap(),
            Branch::new("outside", Some(CommitTime::new(NOW - 25 * DAY - 23 * 3600, ""))).unwrap(),
            Branch::new("just", Some(CommitTime::new(NOW - 25 * DAY - 1, ""))).unwrap(),
        ];
        let filters = Filters {
            max_days_old: Some(25),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches, &store, NOW)), vec!["inside"]);
    }

    #[test]
    fn age_filter_extreme_times() {
        let store: HashMap<(String, String), String> = HashMap::new();
        let branches = vec![
            Branch::new("ancient", Some(CommitTime::new(i64::MIN, ""))).unwrap(),
            Branch::new("future", Some(CommitTime::new(i64::MAX, ""))).unwrap(),
        ];
        let filters = Filters {
            max_days_old: Some(i64::MAX),
            ..Filters::default()
        };
        assert_eq!(
            names(filters.select(branches.clone(), &store, NOW)),
            vec!["future", "ancient"]
        );

        let filters = Filters {
            max_days_old: Some(1),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches, &store, NOW)), vec!["future"]);
    }

    #[test]
    fn branch_without_commits_is_ageless() {
        let store: HashMap<(String, String), String> = HashMap::new();
        let branches = vec![branch("old", 100), Branch::new("empty", None).unwrap()];
        let filters = Filters {
            max_days_old: Some(1),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches, &store, NOW)), vec!["empty"]);
    }

    #[test]
    fn property_filters() {
        let (branches, store) = fixture();
        let only = Filters {
            property_only: patterns("foo", "bar"),
            ..Filters::default()
        };
        assert_eq!(names(only.select(branches.clone(), &store, NOW)), vec!["A", "B"]);

        let except = Filters {
            property_except: patterns("foo", "bar"),
            ..Filters::default()
        };
        assert_eq!(names(except.select(branches, &store, NOW)), vec!["C", "D"]);
    }

    #[test]
    fn branch_key_matches_name() {
        let (branches, store) = fixture();
        let filters = Filters {
            property_only: patterns(BRANCH_KEY, "^[BC]$"),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches, &store, NOW)), vec!["B", "C"]);
    }

    #[test]
    fn filters_intersect() {
        let (branches, store) = fixture();
        let filters = Filters {
            name_only: Some(Regex::new("^[ABC]$").unwrap()),
            property_except: patterns("foo", "2"),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches.clone(), &store, NOW)), vec!["A", "C"]);

        let filters = Filters {
            name_only: Some(Regex::new("A|B").unwrap()),
            name_except: Some(Regex::new("B").unwrap()),
            ..Filters::default()
        };
        assert_eq!(names(filters.select(branches, &store, NOW)), vec!["A"]);
    }

    #[test]
    fn ordering() {
        let store: HashMap<(String, String), String> = HashMap::new();
        let branches = vec![
            branch("t2", 2),
            branch("t1", 1),
            Branch::new("none", None).unwrap(),
            branch("t3", 3),
        ];

        let filters = Filters::default();
        assert_eq!(
            names(filters.select(branches.clone(), &store, NOW)),
            vec!["t1", "t2", "t3", "none"]
        );

        let reversed = Filters {
            reverse: true,
            ..Filters::default()
        };
        assert_eq!(
            names(reversed.select(branches, &store, NOW)),
            vec!["none", "t3", "t2", "t1"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let store: HashMap<(String, String), String> = HashMap::new();
        let branches = vec![branch("x", 5), branch("y", 5), branch("z", 5)];
        for reverse in [false, true] {
            let filters = Filters {
                reverse,
                ..Filters::default()
            };
            assert_eq!(names(filters.select(branches.clone(), &store, NOW)), vec!["x", "y", "z"]);
        }
    }

    #[test]
    fn empty_states_differ() {
        let (branches, store) = fixture();
        let filters = Filters {
            name_only: Some(Regex::new("nothing").unwrap()),
            ..Filters::default()
        };
        assert!(matches!(filters.select(vec![], &store, NOW), Selection::NoBranches));
        assert!(matches!(filters.select(branches, &store, NOW), Selection::NoMatches));
    }

    #[test]
    fn later_pattern_replaces_earlier() {
        let mut map = PatternMap::new();
        map.insert("foo", Regex::new("a").unwrap());
        map.insert("foo", Regex::new("b").unwrap());
        let patterns: Vec<_> = map
            .iter()
            .map(|(k, r)| (k.to_string(), r.as_str().to_string()))
            .collect();
        assert_eq!(patterns, vec![("foo".to_string(), "b".to_string())]);
    }
}
