//! The per-packet column engine.
//!
//! A [`ColumnSet`] holds the configured columns for the packet being
//! dissected. Every write is keyed by a [`ColumnFormat`] and reaches each
//! column that answers to it. Writes to kinds nobody configured, or to a
//! set that is not writable, do nothing.

use std::fmt::{self, Write as _};

use compact_str::CompactString;
use tracing::debug;

use super::config::ColumnConfig;
use super::fixed::{floor_char_boundary, FixedBuffer};
use super::format::{ColumnFormat, KindSet};
use crate::error::ConfigError;

/// Where a column's displayed text lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnData<'a> {
    /// Caller-owned text shown without copying.
    Borrowed(&'a str),
    /// The column's own bounded buffer.
    Owned,
}

/// A display filter for the value shown in a column, e.g. `ip.src == 10.0.0.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    pub field: &'static str,
    pub value: CompactString,
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.field, self.value)
    }
}

/// One configured column.
#[derive(Debug, Clone)]
pub struct Column<'a> {
    format: ColumnFormat,
    title: CompactString,
    matches: KindSet,
    data: ColumnData<'a>,
    buf: FixedBuffer,
    fence: usize,
    filter: Option<FilterExpr>,
}

impl<'a> Column<'a> {
    fn new(format: ColumnFormat, config: &ColumnConfig) -> Self {
        Self {
            format,
            title: CompactString::const_new(format.default_title()),
            matches: format.matches(config.timestamp_format),
            data: ColumnData::Owned,
            buf: FixedBuffer::new(config.capacity_for(format)),
            fence: 0,
            filter: None,
        }
    }

    pub fn format(&self) -> ColumnFormat {
        self.format
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The text currently displayed.
    pub fn text(&self) -> &str {
        match self.data {
            ColumnData::Borrowed(text) => text,
            ColumnData::Owned => self.buf.as_str(),
        }
    }

    /// Length of the committed prefix that `clear` preserves.
    pub fn fence(&self) -> usize {
        self.fence
    }

    /// True while the column shows caller-owned text.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, ColumnData::Borrowed(_))
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn filter_expr(&self) -> Option<&FilterExpr> {
        self.filter.as_ref()
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.data = ColumnData::Owned;
        self.fence = 0;
        self.filter = None;
    }

    /// Copy borrowed text into the owned buffer before mutating it.
    fn make_owned(&mut self) {
        if let ColumnData::Borrowed(text) = self.data {
            self.buf.set(text);
            self.data = ColumnData::Owned;
        }
    }

    fn set_fence(&mut self) {
        let len = floor_char_boundary(self.text(), self.buf.capacity());
        self.fence = self.fence.max(len);
    }

    fn clear(&mut self) {
        // A fenced borrowed column already shows exactly the committed text.
        if self.fence == 0 || !self.is_borrowed() {
            self.buf.truncate(self.fence);
            self.data = ColumnData::Owned;
        }
        self.filter = None;
    }

    fn set_borrowed(&mut self, text: &'a str) {
        if self.fence != 0 {
            self.make_owned();
            self.buf.truncate(self.fence);
            self.buf.push_str(text);
        } else {
            self.data = ColumnData::Borrowed(text);
        }
    }

    /// Start an owned write after the fence.
    fn begin_owned_write(&mut self) {
        if self.fence != 0 {
            self.make_owned();
        } else {
            self.data = ColumnData::Owned;
        }
        self.buf.truncate(self.fence);
    }

    pub(crate) fn write_owned(&mut self, text: &str) {
        self.begin_owned_write();
        self.buf.push_str(text);
    }

    fn write_owned_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.begin_owned_write();
        let _ = self.buf.write_fmt(args);
    }

    fn append(&mut self, text: &str) {
        self.make_owned();
        self.buf.push_str(text);
    }

    fn append_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.make_owned();
        let _ = self.buf.write_fmt(args);
    }

    fn separate(&mut self, sep: &str) {
        self.make_owned();
        if !self.buf.is_empty() {
            self.buf.push_str(sep);
        }
    }

    /// Returns the number of prefix bytes kept.
    fn prepend(&mut self, text: &str) -> usize {
        self.make_owned();
        let kept = self.buf.prepend_str(text);
        if self.fence > 0 {
            self.fence = (self.fence + kept).min(self.buf.len());
        }
        kept
    }

    pub(crate) fn set_filter(&mut self, filter: Option<FilterExpr>) {
        self.filter = filter;
    }
}

/// The columns of one packet list row.
#[derive(Debug, Clone)]
pub struct ColumnSet<'a> {
    columns: Vec<Column<'a>>,
    /// Inclusive index range of the columns answering to each kind.
    ranges: [Option<(usize, usize)>; ColumnFormat::COUNT],
    writable: bool,
    config: ColumnConfig,
}

impl<'a> ColumnSet<'a> {
    /// Allocate one column per entry of `formats`, in order.
    pub fn setup(formats: &[ColumnFormat], config: ColumnConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let columns: Vec<Column<'a>> = formats
            .iter()
            .map(|format| Column::new(*format, &config))
            .collect();

        let mut ranges = [None; ColumnFormat::COUNT];
        for (i, column) in columns.iter().enumerate() {
            for kind in column.matches.iter() {
                let range = &mut ranges[kind.index()];
                *range = match *range {
                    None => Some((i, i)),
                    Some((first, _)) => Some((first, i)),
                };
            }
        }

        debug!(
            columns = columns.len(),
            layout = %formats.iter().map(|f| f.specifier()).collect::<Vec<_>>().join(","),
            "column setup"
        );

        Ok(Self {
            columns,
            ranges,
            writable: true,
            config,
        })
    }

    /// Set up from `%`-style specifiers such as `["%m", "%t", "%s", "%p", "%i"]`.
    pub fn from_specs<S: AsRef<str>>(specs: &[S], config: ColumnConfig) -> Result<Self, ConfigError> {
        let formats = specs
            .iter()
            .map(|spec| spec.as_ref().parse())
            .collect::<Result<Vec<ColumnFormat>, _>>()?;
        Self::setup(&formats, config)
    }

    /// Reset per-packet state: empty text, no fence, no filter, writable.
    pub fn init(&mut self) {
        for column in &mut self.columns {
            column.reset();
        }
        self.writable = true;
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether writes to `kind` would reach any column.
    pub fn is_kind_present(&self, kind: ColumnFormat) -> bool {
        self.writable && self.ranges[kind.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column<'a>> {
        self.columns.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<'a>> {
        self.columns.iter()
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(Column::text)
    }

    /// Text of the first column answering to `kind`.
    pub fn text_of(&self, kind: ColumnFormat) -> Option<&str> {
        let (first, last) = self.ranges[kind.index()]?;
        self.columns[first..=last]
            .iter()
            .find(|column| column.matches.contains(kind))
            .map(Column::text)
    }

    pub fn filter_expr(&self, index: usize) -> Option<&FilterExpr> {
        self.columns.get(index).and_then(Column::filter_expr)
    }

    pub fn set_title(&mut self, index: usize, title: &str) {
        if let Some(column) = self.columns.get_mut(index) {
            column.title = CompactString::from(title);
        }
    }

    fn for_each_target(&mut self, kind: ColumnFormat, mut f: impl FnMut(&mut Column<'a>)) {
        if !self.writable {
            return;
        }
        let Some((first, last)) = self.ranges[kind.index()] else {
            return;
        };
        for column in &mut self.columns[first..=last] {
            if column.matches.contains(kind) {
                f(column);
            }
        }
    }

    pub(crate) fn columns_mut(&mut self) -> (&ColumnConfig, std::slice::IterMut<'_, Column<'a>>) {
        (&self.config, self.columns.iter_mut())
    }

    /// Commit the current text: a later `clear` keeps it.
    pub fn set_fence(&mut self, kind: ColumnFormat) {
        self.for_each_target(kind, Column::set_fence);
    }

    /// Erase everything after the fence and drop the filter expression.
    pub fn clear(&mut self, kind: ColumnFormat) {
        self.for_each_target(kind, Column::clear);
    }

    /// Show `text` without copying it. With a fence the text is copied in
    /// after the committed prefix instead.
    pub fn set_text(&mut self, kind: ColumnFormat, text: &'a str) {
        self.for_each_target(kind, |column| column.set_borrowed(text));
    }

    /// Copy `text` in after the fence.
    pub fn add_text(&mut self, kind: ColumnFormat, text: &str) {
        self.for_each_target(kind, |column| column.write_owned(text));
    }

    /// Format into the column after the fence.
    pub fn set_fmt(&mut self, kind: ColumnFormat, args: fmt::Arguments<'_>) {
        self.for_each_target(kind, |column| column.write_owned_fmt(args));
    }

    pub fn append_text(&mut self, kind: ColumnFormat, text: &str) {
        self.for_each_target(kind, |column| column.append(text));
    }

    pub fn append_fmt(&mut self, kind: ColumnFormat, args: fmt::Arguments<'_>) {
        self.for_each_target(kind, |column| column.append_fmt(args));
    }

    /// Append `text`, preceded by `sep` unless the column is empty.
    pub fn append_sep_text(&mut self, kind: ColumnFormat, sep: &str, text: &str) {
        self.for_each_target(kind, |column| {
            column.separate(sep);
            column.append(text);
        });
    }

    pub fn append_sep_fmt(&mut self, kind: ColumnFormat, sep: &str, args: fmt::Arguments<'_>) {
        self.for_each_target(kind, |column| {
            column.separate(sep);
            column.append_fmt(args);
        });
    }

    /// Insert `text` at the front. A non-zero fence moves forward with the
    /// text it protects.
    pub fn prepend_text(&mut self, kind: ColumnFormat, text: &str) {
        self.for_each_target(kind, |column| {
            column.prepend(text);
        });
    }

    pub fn prepend_fmt(&mut self, kind: ColumnFormat, args: fmt::Arguments<'_>) {
        self.for_each_target(kind, |column| {
            let prefix = render(args, column.capacity());
            column.prepend(prefix.as_str());
        });
    }

    /// Prepend and fence the prepended text along with any existing fence.
    pub fn prepend_fence_fmt(&mut self, kind: ColumnFormat, args: fmt::Arguments<'_>) {
        self.for_each_target(kind, |column| {
            let prefix = render(args, column.capacity());
            let had_fence = column.fence > 0;
            let kept = column.prepend(prefix.as_str());
            if !had_fence {
                column.fence = kept;
            }
        });
    }
}

fn render(args: fmt::Arguments<'_>, capacity: usize) -> FixedBuffer {
    let mut prefix = FixedBuffer::new(capacity);
    let _ = prefix.write_fmt(args);
    prefix
}
