//! Branch records, the bulk branch dump and property lookup.

use crate::commit_time::CommitTime;
use crate::error::Error;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::Serialize;
use std::collections::HashMap;

/// Key that addresses the branch name wherever a property name is expected.
pub const BRANCH_KEY: &str = "branch";

/// Separator between the fields of a branch dump record.
pub const DUMP_DELIMITER: char = ',';

/// Branch configuration entries that are used by git itself.
pub const RESERVED_PROPERTIES: [&str; 5] =
    ["merge", "remote", "rebase", "pushremote", "description"];

lazy_static! {
    // Branch names and relative ages may both contain the delimiter,
    // the numeric timestamp in between anchors the split.
    static ref DUMP_RECORD: Regex = Regex::new(r"^(.+),(-?\d*),(.*)$").unwrap();
}

/// Read access to the per-branch property store.
pub trait PropertySource {
    /// The value of `property` for `branch`, `None` if unset.
    fn property(&self, branch: &str, property: &str) -> Option<String>;
}

impl PropertySource for HashMap<(String, String), String> {
    fn property(&self, branch: &str, property: &str) -> Option<String> {
        self.get(&(branch.to_string(), property.to_string())).cloned()
    }
}

/// A local branch.
#[derive(Debug, Clone)]
pub struct Branch {
    name: String,
    last_commit_time: Option<CommitTime>,
}

impl Branch {
    pub fn new(name: &str, last_commit_time: Option<CommitTime>) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("branch name must not be empty".to_string()));
        }
        Ok(Branch {
            name: name.to_string(),
            last_commit_time,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_commit_time(&self) -> Option<&CommitTime> {
        self.last_commit_time.as_ref()
    }

    /// Looks up a property, or the branch name for [`BRANCH_KEY`].
    pub fn get_property<S: PropertySource + ?Sized>(
        &self,
        source: &S,
        property: &str,
    ) -> Option<String> {
        if property == BRANCH_KEY {
            Some(self.name.clone())
        } else {
            source.property(&self.name, property)
        }
    }

    /// Values for all requested properties, with an empty string for unset ones.
    pub fn get_properties<S: PropertySource + ?Sized>(
        &self,
        source: &S,
        properties: &[String],
    ) -> HashMap<String, String> {
        properties
            .iter()
            .map(|prop| {
                (
                    prop.clone(),
                    self.get_property(source, prop).unwrap_or_default(),
                )
            })
            .collect()
    }

    pub fn to_record<S: PropertySource + ?Sized>(
        &self,
        source: &S,
        properties: &[String],
    ) -> BranchRecord {
        BranchRecord {
            name: self.name.clone(),
            properties: self.get_properties(source, properties),
        }
    }
}

/// Machine-readable export of a branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchRecord {
    pub name: String,
    pub properties: HashMap<String, String>,
}

/// Parses one `name,timestamp,relative age` record.
///
/// An empty timestamp means the branch has no commits.
pub fn parse_record(line: &str) -> Result<Branch, Error> {
    let captures = DUMP_RECORD
        .captures(line)
        .ok_or_else(|| Error::InvalidArgument(format!("malformed branch record '{}'", line)))?;
    let name = &captures[1];
    let time = match &captures[2] {
        "" => None,
        seconds => Some(CommitTime::parse(seconds, &captures[3])?),
    };
    Branch::new(name, time)
}

/// Parses a branch dump, one record per line.
///
/// Records that fail to parse are skipped. Fails only if no record could be parsed.
pub fn parse_dump(dump: &str) -> Result<Vec<Branch>, Error> {
    let mut branches = vec![];
    let mut last_error = None;
    for line in dump.lines().filter(|line| !line.trim().is_empty()) {
        match parse_record(line) {
            Ok(branch) => branches.push(branch),
            Err(err) => {
                log::warn!("Skipping branch record: {}", err);
                last_error = Some(err);
            }
        }
    }
    match last_error {
        Some(err) if branches.is_empty() => Err(err),
        _ => Ok(branches),
    }
}

/// Extracts the set of property names from `branch.<name>.<property>` config keys.
///
/// Reserved git settings are dropped, the result is sorted and free of duplicates.
pub fn property_names<'a, I>(config_keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    config_keys
        .into_iter()
        .filter_map(|key| {
            let rest = key.strip_prefix("branch.")?;
            let (branch, property) = rest.rsplit_once('.')?;
            if branch.is_empty() || property.is_empty() {
                None
            } else {
                Some(property.to_lowercase())
            }
        })
        .filter(|prop| !RESERVED_PROPERTIES.contains(&prop.as_str()))
        .sorted()
        .dedup()
        .collect()
}
