//! Render branch listings as aligned text tables.

use crate::branch::{Branch, BranchRecord, PropertySource, BRANCH_KEY};
use crate::context::Context;
use crate::filter::Selection;
use crate::settings::{Settings, Widths};
use format::{
    collapse_lines, column, format_string, measure_printable_width, styled_column, TextStyle,
};
use itertools::Itertools;

pub mod colors;
pub mod format;

/// Separator after every column.
pub const GUTTER: &str = "  ";
/// Width of the last commit column, fits `YYYY-MM-DD HH:MM +HHMM (in the future)`
/// and leaves room so that it is never truncated.
pub const DATE_WIDTH: usize = 40;
pub const DATE_LABEL: &str = "last commit";
/// Shown for unset properties and branches without commits.
pub const PLACEHOLDER: &str = "-";

pub const NO_BRANCHES: &str = "No branches exist.";
pub const NO_MATCHES: &str = "No branches matched the current filters.";

const CURRENT_MARKER: &str = "* ";
const OTHER_MARKER: &str = "  ";

/// A property column and its resolved width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub width: usize,
}

/// The columns of a listing, resolved once per invocation.
#[derive(Debug, Clone)]
pub struct Layout {
    pub properties: Vec<ColumnSpec>,
    pub branch_width: usize,
}

impl Layout {
    pub fn new(property_names: &[String], widths: &Widths) -> Self {
        Layout {
            properties: property_names
                .iter()
                .map(|key| ColumnSpec {
                    key: key.clone(),
                    width: widths.resolve(key),
                })
                .collect(),
            branch_width: widths.resolve(BRANCH_KEY),
        }
    }
}

/// The header row and its underline, separated by a newline.
pub fn render_headers(layout: &Layout, style: TextStyle, ansi: bool) -> String {
    let labels = |label: &dyn Fn(&str) -> String| {
        let mut cells = vec![styled_column(&label(DATE_LABEL), DATE_WIDTH, style, ansi)];
        for spec in &layout.properties {
            cells.push(styled_column(&label(&spec.key), spec.width, style, ansi));
        }
        cells.push(format!(
            "{}{}",
            OTHER_MARKER,
            styled_column(&label(BRANCH_KEY), layout.branch_width, style, ansi)
        ));
        cells.join(GUTTER)
    };
    let names = labels(&|name| name.to_string());
    let underline = labels(&|name| "-".repeat(measure_printable_width(name)));
    format!("{}\n{}", names, underline)
}

/// One table row for a branch. The current branch is marked and bold.
pub fn render_row<S: PropertySource + ?Sized>(
    branch: &Branch,
    layout: &Layout,
    source: &S,
    is_current: bool,
    ansi: bool,
) -> String {
    let date = branch
        .last_commit_time()
        .map_or_else(|| PLACEHOLDER.to_string(), |time| time.render());
    let mut cells = vec![column(&date, DATE_WIDTH)];
    for spec in &layout.properties {
        let value = match branch.get_property(source, &spec.key) {
            Some(value) if !value.is_empty() => collapse_lines(&value),
            _ => PLACEHOLDER.to_string(),
        };
        cells.push(column(&value, spec.width));
    }
    let marker = if is_current {
        CURRENT_MARKER
    } else {
        OTHER_MARKER
    };
    cells.push(format!("{}{}", marker, column(branch.name(), layout.branch_width)));

    let row = cells.join(GUTTER);
    if is_current {
        format_string(&row, TextStyle::bold(), ansi)
    } else {
        row
    }
}

/// Filters, sorts and renders the branches of a repository.
///
/// Returns an explanatory message if there is nothing to list.
pub fn render_listing(branches: Vec<Branch>, ctx: &Context, settings: &Settings) -> String {
    let layout = Layout::new(&ctx.property_names, &settings.widths);
    match settings.filters.select(branches, &ctx.source, ctx.now) {
        Selection::NoBranches => NO_BRANCHES.to_string(),
        Selection::NoMatches => NO_MATCHES.to_string(),
        Selection::Branches(branches) => {
            let headers = render_headers(&layout, settings.header_style, ctx.ansi);
            let rows = branches
                .iter()
                .map(|branch| {
                    render_row(
                        branch,
                        &layout,
                        &ctx.source,
                        ctx.is_current(branch.name()),
                        ctx.ansi,
                    )
                })
                .join("\n");
            format!("\n{}\n{}", headers, rows)
        }
    }
}

/// Filters and sorts the branches like [`render_listing`], exporting them as records.
pub fn list_records(
    branches: Vec<Branch>,
    ctx: &Context,
    settings: &Settings,
) -> Vec<BranchRecord> {
    match settings.filters.select(branches, &ctx.source, ctx.now) {
        Selection::Branches(branches) => branches
            .iter()
            .map(|branch| branch.to_record(&ctx.source, &ctx.property_names))
            .collect(),
        Selection::NoBranches | Selection::NoMatches => vec![],
    }
}
