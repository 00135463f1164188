//! Column schemas derived from header rows.
//!
//! A header row such as
//!
//! ```text
//! Proto Recv-Q Send-Q Local Address           Foreign Address         State       PID/Program name
//! ```
//!
//! becomes an ordered list of normalized column names (`proto`, `recv_q`,
//! `send_q`, `local_address`, `foreign_address`, `state`, `program_name`),
//! each remembering the byte offset where its title starts. Offsets let
//! parsers bound free-text columns that contain spaces.

use crate::text::tokenize;

/// Header spelling rules for one dialect or section type.
#[derive(Debug)]
pub struct HeaderAliases {
    /// Multi-word titles, lowercase, joined with `_` before tokenizing.
    pub phrases: &'static [&'static str],
    /// Exact lowercase title token → column name.
    pub renames: &'static [(&'static str, &'static str)],
}

/// One header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub start: usize,
}

/// Ordered column layout of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema from a header row.
    ///
    /// Titles are lowercased and multi-word titles are joined in place, so
    /// column offsets match the original header text. Title tokens are then
    /// renamed through `aliases`, with `-` mapped to `_` for the rest.
    pub fn from_header(line: &str, aliases: &HeaderAliases) -> Self {
        let mut lower = line.to_ascii_lowercase();
        for phrase in aliases.phrases {
            lower = lower.replace(phrase, &phrase.replace(' ', "_"));
        }

        let columns = tokenize(&lower)
            .into_iter()
            .map(|token| {
                let name = aliases
                    .renames
                    .iter()
                    .find(|(title, _)| *title == token.text)
                    .map(|(_, name)| (*name).to_string())
                    .unwrap_or_else(|| token.text.replace('-', "_"));
                Column {
                    name,
                    start: token.start,
                }
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }
}
