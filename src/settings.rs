use crate::branch::BRANCH_KEY;
use crate::error::Error;
use crate::filter::Filters;
use crate::print::colors::to_term_color;
use crate::print::format::TextStyle;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default width of a property column.
pub const DEFAULT_WIDTH: usize = 8;
/// Default width of the branch name column.
pub const BRANCH_WIDTH: usize = 40;

/// Top-level settings of a listing
#[derive(Debug, Default)]
pub struct Settings {
    pub widths: Widths,
    /// Style of the header and underline rows
    pub header_style: TextStyle,
    pub filters: Filters,
}

/// Column widths, keyed by property name or [`BRANCH_KEY`]
#[derive(Debug, Clone)]
pub struct Widths {
    pub branch: usize,
    pub default: usize,
    pub overrides: HashMap<String, usize>,
}

impl Default for Widths {
    fn default() -> Self {
        Widths {
            branch: BRANCH_WIDTH,
            default: DEFAULT_WIDTH,
            overrides: HashMap::new(),
        }
    }
}

impl Widths {
    /// The width of the column for `key`.
    pub fn resolve(&self, key: &str) -> usize {
        match self.overrides.get(key) {
            Some(width) => *width,
            None if key == BRANCH_KEY => self.branch,
            None => self.default,
        }
    }
}

/// Settings as stored in a toml file.
/// All fields are optional so that files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDef {
    pub branch_width: Option<usize>,
    pub default_width: Option<usize>,
    pub max_days_old: Option<i64>,
    #[serde(default)]
    pub widths: HashMap<String, usize>,
    #[serde(default)]
    pub header: HeaderDef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderDef {
    pub color: Option<String>,
    pub bold: Option<bool>,
}

impl SettingsDef {
    /// Overlays `other` on top of `self`, fields set in `other` win.
    pub fn merge(mut self, other: SettingsDef) -> SettingsDef {
        self.branch_width = other.branch_width.or(self.branch_width);
        self.default_width = other.default_width.or(self.default_width);
        self.max_days_old = other.max_days_old.or(self.max_days_old);
        self.widths.extend(other.widths);
        self.header.color = other.header.color.or(self.header.color);
        self.header.bold = other.header.bold.or(self.header.bold);
        self
    }
}

impl Settings {
    pub fn from_def(def: SettingsDef) -> Result<Self, Error> {
        let color = match &def.header.color {
            Some(name) => Some(to_term_color(name).map_err(Error::Config)?),
            None => None,
        };
        Ok(Settings {
            widths: Widths {
                branch: def.branch_width.unwrap_or(BRANCH_WIDTH),
                default: def.default_width.unwrap_or(DEFAULT_WIDTH),
                overrides: def.widths,
            },
            header_style: TextStyle {
                color,
                bold: def.header.bold.unwrap_or(false),
            },
            filters: Filters {
                max_days_old: def.max_days_old,
                ..Filters::default()
            },
        })
    }
}

/// Parses a `KEY=PATTERN` option value.
pub fn parse_key_pattern(value: &str) -> Result<(String, Regex), Error> {
    let (key, pattern) = split_key_value(value)?;
    let regex = Regex::new(pattern).map_err(|err| Error::Config(err.to_string()))?;
    Ok((key.to_string(), regex))
}

/// Parses a `KEY=WIDTH` option value.
pub fn parse_key_width(value: &str) -> Result<(String, usize), Error> {
    let (key, width) = split_key_value(value)?;
    let width = width
        .parse::<usize>()
        .map_err(|err| Error::Config(format!("invalid width '{}': {}", width, err)))?;
    Ok((key.to_string(), width))
}

fn split_key_value(value: &str) -> Result<(&str, &str), Error> {
    match value.split_once('=') {
        Some((key, rest)) if !key.is_empty() => Ok((key, rest)),
        _ => Err(Error::Config(format!("expected KEY=VALUE, got '{}'", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_key_pattern, parse_key_width, HeaderDef, Settings, SettingsDef, Widths};
    use yansi::Color;

    #[test]
    fn resolve_widths() {
        let mut widths = Widths::default();
        assert_eq!(widths.resolve("owner"), 8);
        assert_eq!(widths.resolve("branch"), 40);
        widths.overrides.insert("owner".to_string(), 12);
        widths.overrides.insert("branch".to_string(), 20);
        assert_eq!(widths.resolve("owner"), 12);
        assert_eq!(widths.resolve("branch"), 20);
        assert_eq!(widths.resolve("ticket"), 8);
    }

    #[test]
    fn merge_defs() {
        let global: SettingsDef = toml::from_str(
            r#"
            branch_width = 30
            default_width = 10
            [widths]
            owner = 12
            [header]
            color = "blue"
            bold = true
            "#,
        )
        .unwrap();
        let repo: SettingsDef = toml::from_str(
            r#"
            default_width = 6
            [widths]
            ticket = 9
            [header]
            color = "purple"
            "#,
        )
        .unwrap();
        let merged = global.merge(repo);
        assert_eq!(merged.branch_width, Some(30));
        assert_eq!(merged.default_width, Some(6));
        assert_eq!(merged.widths.len(), 2);
        assert_eq!(
            merged.header,
            HeaderDef {
                color: Some("purple".to_string()),
                bold: Some(true),
            }
        );

        let settings = Settings::from_def(merged).unwrap();
        assert_eq!(settings.widths.resolve("ticket"), 9);
        assert_eq!(settings.widths.resolve("other"), 6);
        assert_eq!(settings.header_style.color, Some(Color::Magenta));
        assert!(settings.header_style.bold);
    }

    #[test]
    fn unknown_header_color() {
        let def = SettingsDef {
            header: HeaderDef {
                color: Some("orange".to_string()),
                bold: None,
            },
            ..SettingsDef::default()
        };
        assert!(Settings::from_def(def).is_err());
    }

    #[test]
    fn key_values() {
        let (key, regex) = parse_key_pattern("owner=^al(ice)?$").unwrap();
        assert_eq!(key, "owner");
        assert!(regex.is_match("alice"));

        let (key, regex) = parse_key_pattern("ticket=a=b").unwrap();
        assert_eq!(key, "ticket");
        assert_eq!(regex.as_str(), "a=b");

        assert!(parse_key_pattern("owner").is_err());
        assert!(parse_key_pattern("=x").is_err());
        assert!(parse_key_pattern("owner=(").is_err());

        assert_eq!(parse_key_width("branch=20").unwrap(), ("branch".to_string(), 20));
        assert!(parse_key_width("branch=wide").is_err());
    }
}
