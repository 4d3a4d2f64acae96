//! State shared by the components of a single listing.

use crate::branch::PropertySource;
use std::cell::RefCell;
use std::collections::HashMap;

/// Memoizes property lookups for the duration of one listing.
///
/// Properties are not written while a listing is built, so entries are never invalidated.
pub struct CachedSource<'a> {
    inner: &'a dyn PropertySource,
    cache: RefCell<HashMap<(String, String), Option<String>>>,
}

impl<'a> CachedSource<'a> {
    pub fn new(inner: &'a dyn PropertySource) -> Self {
        CachedSource {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl PropertySource for CachedSource<'_> {
    fn property(&self, branch: &str, property: &str) -> Option<String> {
        let key = (branch.to_string(), property.to_string());
        if let Some(value) = self.cache.borrow().get(&key) {
            return value.clone();
        }
        log::debug!("Looking up property '{}' of branch '{}'", property, branch);
        let value = self.inner.property(branch, property);
        self.cache.borrow_mut().insert(key, value.clone());
        value
    }
}

/// Per-invocation inputs of the listing engine.
pub struct Context<'a> {
    /// Property store, cached for this invocation.
    pub source: CachedSource<'a>,
    /// The discovered property set, determines the table columns.
    pub property_names: Vec<String>,
    pub current_branch: Option<String>,
    /// Reference time for the age filter, seconds since the epoch.
    pub now: i64,
    /// Whether the output terminal understands ANSI escape sequences.
    pub ansi: bool,
}

impl<'a> Context<'a> {
    pub fn new(
        source: &'a dyn PropertySource,
        property_names: Vec<String>,
        current_branch: Option<String>,
        now: i64,
        ansi: bool,
    ) -> Self {
        Context {
            source: CachedSource::new(source),
            property_names,
            current_branch,
            now,
            ansi,
        }
    }

    pub fn is_current(&self, branch: &str) -> bool {
        self.current_branch.as_deref() == Some(branch)
    }
}
