//! Plain-text rendering of a [`LazyTreeModel`] for the command line.
//!
//! The walk goes through the model's public addressing contract only and
//! expands a directory just before printing its children.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::fs::provider::{AttributeValue, Column, Glyph, PathProvider};
use crate::model::{LazyTreeModel, ModelIndex, Role};

/// Default `strftime` pattern for the Last Modified column.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a listing is walked and formatted.
#[derive(Debug, Clone)]
pub struct ListingOptions {
    /// Number of tree levels to print; top-level entries are level 1.
    pub max_depth: usize,
    /// Use Nerd Font icons instead of ASCII markers.
    pub use_icons: bool,
    /// Print file sizes as B/KB/MB/GB instead of raw bytes.
    pub human_sizes: bool,
    pub time_format: String,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            use_icons: false,
            human_sizes: true,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// One printed line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Nesting level, 1 for entries directly under the root.
    pub depth: usize,
    /// Box-drawing connector, e.g. `│  ├──`.
    pub prefix: String,
    pub icon: &'static str,
    pub name: String,
    pub kind: String,
    pub size: String,
    pub modified: String,
}

impl ListingRow {
    /// Text shown in the Name column.
    pub fn label(&self) -> String {
        format!("{} {}{}", self.prefix, self.icon, self.name)
    }
}

/// Walk the model from the root, expanding directories up to `max_depth`.
pub fn collect_rows<P: PathProvider>(
    model: &mut LazyTreeModel<P>,
    options: &ListingOptions,
) -> Vec<ListingRow> {
    let mut rows = Vec::new();
    let mut ancestors_last = Vec::new();
    walk(
        model,
        ModelIndex::invalid(),
        1,
        &mut ancestors_last,
        options,
        &mut rows,
    );
    rows
}

fn walk<P: PathProvider>(
    model: &mut LazyTreeModel<P>,
    parent: ModelIndex,
    depth: usize,
    ancestors_last: &mut Vec<bool>,
    options: &ListingOptions,
    rows: &mut Vec<ListingRow>,
) {
    let count = model.row_count(parent);
    for row in 0..count {
        let index = model.index(row, 0, parent);
        let is_last = row + 1 == count;
        let descend = depth < options.max_depth;
        if descend && model.is_placeholder_state(index) && model.can_expand(index) {
            model.expand(index);
        }

        let glyph = match model.data(index, Role::Decoration) {
            Some(AttributeValue::Icon(glyph)) => glyph,
            _ => Glyph::Unknown,
        };
        let expanded = model.row_count(index) > 0 && !model.is_placeholder_state(index);
        rows.push(ListingRow {
            depth,
            prefix: build_prefix(ancestors_last, is_last),
            icon: indicator(glyph, expanded, options.use_icons),
            name: display_text(model.attribute_at(index, Column::Name.index())),
            kind: display_text(model.attribute_at(index, Column::Type.index())),
            size: format_size(
                model.attribute_at(index, Column::Size.index()),
                options.human_sizes,
            ),
            modified: format_modified(
                model.attribute_at(index, Column::LastModified.index()),
                &options.time_format,
            ),
        });

        if descend && expanded {
            ancestors_last.push(is_last);
            walk(model, index, depth + 1, ancestors_last, options, rows);
            ancestors_last.pop();
        }
    }
}

/// Build the indentation prefix from each ancestor's last-sibling flag.
fn build_prefix(ancestors_last: &[bool], is_last: bool) -> String {
    let mut prefix: String = ancestors_last
        .iter()
        .map(|last| if *last { "   " } else { "│  " })
        .collect();
    prefix.push_str(if is_last { "└──" } else { "├──" });
    prefix
}

fn indicator(glyph: Glyph, expanded: bool, use_icons: bool) -> &'static str {
    if use_icons {
        match glyph {
            Glyph::Folder if expanded => "\u{f07c} ",
            Glyph::Folder => "\u{f07b} ",
            Glyph::File => "\u{f15b} ",
            Glyph::Unknown => "\u{f128} ",
        }
    } else {
        match glyph {
            Glyph::Folder => "[D] ",
            Glyph::File => "[F] ",
            Glyph::Unknown => "[?] ",
        }
    }
}

fn display_text(value: Option<AttributeValue>) -> String {
    match value {
        Some(AttributeValue::Text(text)) => text,
        _ => String::new(),
    }
}

/// Format the Size column: bytes for files, item counts for directories.
pub fn format_size(value: Option<AttributeValue>, human: bool) -> String {
    match value {
        Some(AttributeValue::Bytes(bytes)) if human => human_size(bytes),
        Some(AttributeValue::Bytes(bytes)) => bytes.to_string(),
        Some(AttributeValue::Entries(1)) => "1 item".to_string(),
        Some(AttributeValue::Entries(count)) => format!("{count} items"),
        _ => String::new(),
    }
}

/// Render a byte count with a binary unit and two decimals.
pub fn human_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value <= KIB {
        format!("{bytes} B")
    } else if value <= KIB * KIB {
        format!("{:.2} KB", value / KIB)
    } else if value <= KIB * KIB * KIB {
        format!("{:.2} MB", value / (KIB * KIB))
    } else {
        format!("{:.2} GB", value / (KIB * KIB * KIB))
    }
}

/// Format the Last Modified column in local time.
///
/// An unusable `format` falls back to [`DEFAULT_TIME_FORMAT`].
pub fn format_modified(value: Option<AttributeValue>, format: &str) -> String {
    let Some(AttributeValue::Modified(time)) = value else {
        return String::new();
    };
    let local = DateTime::<Local>::from(time);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        debug!("time format {format:?} rejected, using default");
        out.clear();
        let _ = write!(out, "{}", local.format(DEFAULT_TIME_FORMAT));
    }
    out
}

/// Lay rows out under the four column headers.
pub fn render_table(rows: &[ListingRow]) -> String {
    let headers = Column::ALL.map(Column::title);
    let labels: Vec<String> = rows.iter().map(ListingRow::label).collect();

    let name_width = column_width(headers[0], labels.iter().map(|l| l.chars().count()));
    let kind_width = column_width(headers[1], rows.iter().map(|r| r.kind.chars().count()));
    let size_width = column_width(headers[2], rows.iter().map(|r| r.size.chars().count()));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<kind_width$}  {:>size_width$}  {}",
        headers[0], headers[1], headers[2], headers[3]
    );
    for (row, label) in rows.iter().zip(&labels) {
        let pad = name_width.saturating_sub(label.chars().count());
        let _ = writeln!(
            out,
            "{label}{:pad$}  {:<kind_width$}  {:>size_width$}  {}",
            "", row.kind, row.size, row.modified
        );
    }
    out
}

fn column_width(header: &str, cells: impl Iterator<Item = usize>) -> usize {
    cells.max().unwrap_or(0).max(header.chars().count())
}
