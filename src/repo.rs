//! Access to branches and branch properties of a git repository.

use crate::branch::{self, PropertySource, DUMP_DELIMITER};
use crate::commit_time::describe_age;
use crate::error::Error;
use git2::{BranchType, ConfigLevel, ErrorCode, Repository};
use std::path::Path;

/// A git repository as the source of branches and their properties.
pub struct Repo {
    repository: Repository,
}

impl Repo {
    /// Opens the repository containing `path`.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Repo {
            repository: Repository::discover(path)?,
        })
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.repository.path()
    }

    /// The branch HEAD points to, also if it has no commits yet.
    pub fn current_branch(&self) -> Option<String> {
        let head = self.repository.find_reference("HEAD").ok()?;
        head.symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(|name| name.to_string())
    }

    /// All local branches as `name,timestamp,relative age` records, one per line.
    pub fn branch_dump(&self, now: i64) -> Result<String, Error> {
        let mut lines = vec![];
        for entry in self.repository.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let name = match branch.name()? {
                Some(name) => name.to_string(),
                None => {
                    log::warn!("Skipping branch with a non-UTF-8 name");
                    continue;
                }
            };
            let line = match branch.get().peel_to_commit() {
                Ok(commit) => {
                    let seconds = commit.time().seconds();
                    format!(
                        "{}{}{}{}{}",
                        name,
                        DUMP_DELIMITER,
                        seconds,
                        DUMP_DELIMITER,
                        describe_age(now.saturating_sub(seconds))
                    )
                }
                Err(err) => {
                    log::debug!("No commit for branch '{}': {}", name, err);
                    format!("{}{}{}", name, DUMP_DELIMITER, DUMP_DELIMITER)
                }
            };
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// Names of all properties set on any branch.
    pub fn property_names(&self) -> Result<Vec<String>, Error> {
        let config = self.repository.config()?;
        let mut keys = vec![];
        config
            .entries(Some(r"branch\..*\..*"))?
            .for_each(|entry| {
                if let Some(name) = entry.name() {
                    keys.push(name.to_string());
                }
            })?;
        Ok(branch::property_names(keys.iter().map(|key| key.as_str())))
    }

    pub fn set_property(&self, branch: &str, property: &str, value: &str) -> Result<(), Error> {
        let mut config = self.repository.config()?.open_level(ConfigLevel::Local)?;
        config.set_str(&property_key(branch, property), value)?;
        Ok(())
    }

    /// Removes a property, returns `false` if it was not set.
    pub fn unset_property(&self, branch: &str, property: &str) -> Result<bool, Error> {
        let mut config = self.repository.config()?.open_level(ConfigLevel::Local)?;
        match config.remove(&property_key(branch, property)) {
            Ok(()) => Ok(true),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

impl PropertySource for Repo {
    fn property(&self, branch: &str, property: &str) -> Option<String> {
        let result = self
            .repository
            .config()
            .and_then(|config| config.get_string(&property_key(branch, property)));
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if err.code() != ErrorCode::NotFound {
                    log::debug!("Reading property '{}' of '{}' failed: {}", property, branch, err);
                }
                None
            }
        }
    }
}

fn property_key(branch: &str, property: &str) -> String {
    format!("branch.{}.{}", branch, property)
}
