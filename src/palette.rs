//! Ordered literal replacement tables and the built-in color presets.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single literal substitution: every occurrence of `from` becomes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The default brand palette migration, applied top to bottom.
pub const BRAND_PALETTE: [(&str, &str); 3] = [
    ("#1243B2", "#10367D"),
    ("#A9CDE5", "#CCDDEA"),
    ("#3B82C4", "#2772A0"),
];

/// Pre-defined replacement tables.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Migrate the old brand colors to the current palette.
    #[default]
    Brand,
    /// Map the new colors back to the old ones.
    ///
    /// This is a plain inverse mapping, not an undo: colors that were
    /// already on the new palette before a `brand` run are rewritten too.
    /// Use `--undo` with `--backup` copies to restore files exactly.
    Revert,
}

impl Preset {
    /// Builds the replacement table for this preset.
    pub fn table(self) -> ReplacementTable {
        let brand = ReplacementTable {
            pairs: BRAND_PALETTE
                .iter()
                .map(|(from, to)| Replacement::new(*from, *to))
                .collect(),
        };
        match self {
            Preset::Brand => brand,
            Preset::Revert => brand.inverted(),
        }
    }
}

/// An ordered sequence of literal replacements.
///
/// Pairs are applied sequentially: each pair sees the output of the one
/// before it, so `[A -> B, B -> C]` turns `A` into `C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTable {
    pairs: Vec<Replacement>,
}

/// The result of applying a table to a piece of text.
#[derive(Debug)]
pub struct Applied<'a> {
    /// The rewritten text. Borrowed when nothing matched.
    pub content: Cow<'a, str>,
    /// Total number of occurrences replaced across all pairs.
    pub substitutions: usize,
}

impl Applied<'_> {
    /// `true` if the output differs from the input.
    ///
    /// A table with a no-op pair (`from == to`) can count substitutions and
    /// still leave the text identical, so this compares content.
    pub fn changed(&self, original: &str) -> bool {
        matches!(self.content, Cow::Owned(_)) && self.content.as_ref() != original
    }
}

impl ReplacementTable {
    /// Creates a table, rejecting any pair whose `from` is empty.
    pub fn new(pairs: Vec<Replacement>) -> Result<Self> {
        if let Some(index) = pairs.iter().position(|p| p.from.is_empty()) {
            return Err(Error::InvalidReplacement { index });
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[Replacement] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the reverse mapping: every pair swapped, in reverse order.
    pub fn inverted(&self) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .rev()
                .map(|p| Replacement::new(p.to.clone(), p.from.clone()))
                .collect(),
        }
    }

    /// Applies every pair in order to `content`.
    pub fn apply<'a>(&self, content: &'a str) -> Applied<'a> {
        let mut new_content = Cow::Borrowed(content);
        let mut substitutions = 0;

        for pair in &self.pairs {
            let matches = new_content.matches(pair.from.as_str()).count();
            if matches > 0 {
                substitutions += matches;
                new_content = Cow::Owned(new_content.replace(pair.from.as_str(), &pair.to));
            }
        }

        Applied {
            content: new_content,
            substitutions,
        }
    }
}
