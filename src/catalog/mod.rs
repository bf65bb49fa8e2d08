//! Rails API section catalog.
//!
//! The catalog is an ordered list: section detection scans it front to back
//! and the first entry that matches wins, so the order of [`RAILS_API_SECTIONS`]
//! is part of the search behaviour.

use serde::Serialize;

/// Separator between parent and child in a compound display name.
pub const COMPOUND_SEPARATOR: &str = "::";

/// Section assigned when detection finds nothing.
pub const GENERAL_SECTION: &str = "general";

/// Identifier of the aggregate corpus.
pub const ALL_SECTIONS: &str = "all";

/// Rails API sections, in detection order.
pub const RAILS_API_SECTIONS: &[(&str, &str)] = &[
    ("activerecord", "ActiveRecord"),
    ("activemodel", "ActiveModel"),
    ("actioncontroller", "ActionController"),
    ("actionview", "ActionView"),
    ("actionpack", "ActionPack"),
    ("actiondispatch", "ActionDispatch"),
    ("actionmailer", "ActionMailer"),
    ("actioncable", "ActionCable"),
    ("activejob", "ActiveJob"),
    ("activestorage", "ActiveStorage"),
    ("activesupport", "ActiveSupport"),
    ("railties", "Railties"),
    ("activerecord_associations", "ActiveRecord::Associations"),
    ("activerecord_migration", "ActiveRecord::Migration"),
    ("actioncontroller_parameters", "ActionController::Parameters"),
    ("activesupport_concern", "ActiveSupport::Concern"),
    ("dateandtime_calculations", "DateAndTime::Calculations"),
];

/// A single documentation section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    /// Lowercase identifier, also used as the document file stem.
    pub id: String,
    /// Canonical display name, e.g. `ActiveRecord` or `DateAndTime::Calculations`.
    pub display_name: String,
    /// Parent/child tokens for compound names.
    #[serde(skip)]
    compound: Option<(String, String)>,
}

impl SectionEntry {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let compound = display_name
            .split_once(COMPOUND_SEPARATOR)
            .map(|(parent, child)| (parent.trim().to_string(), child.trim().to_string()));
        Self {
            id: id.into(),
            display_name,
            compound,
        }
    }

    /// Whether the display name encodes a parent/child pair.
    pub fn is_compound(&self) -> bool {
        self.compound.is_some()
    }

    /// Whether `text` (already lowercased) refers to this entry.
    fn matches(&self, text: &str) -> bool {
        match &self.compound {
            Some((parent, child)) => mentions(text, parent) && mentions(text, child),
            None => mentions(text, &self.id) || mentions(text, &self.display_name),
        }
    }
}

/// Immutable, ordered section catalog.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    entries: Vec<SectionEntry>,
}

impl SectionCatalog {
    /// Build a catalog from `(id, display name)` pairs, keeping their order.
    pub fn new<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, name)| SectionEntry::new(id, name))
                .collect(),
        }
    }

    /// The built-in Rails API catalog.
    pub fn rails() -> Self {
        Self::new(RAILS_API_SECTIONS.iter().copied())
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SectionEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Infer which section `text` belongs to.
    ///
    /// Compound entries are tried first and need both of their tokens present;
    /// simple entries are tried only if no compound entry matched. Within each
    /// pass the first entry in catalog order wins.
    pub fn detect(&self, text: &str) -> Option<&SectionEntry> {
        let text = text.to_lowercase();

        self.entries
            .iter()
            .filter(|e| e.is_compound())
            .find(|e| e.matches(&text))
            .or_else(|| {
                self.entries
                    .iter()
                    .filter(|e| !e.is_compound())
                    .find(|e| e.matches(&text))
            })
    }

    /// Like [`detect`](Self::detect), falling back to [`GENERAL_SECTION`].
    pub fn detect_id(&self, text: &str) -> String {
        self.detect(text)
            .map(|e| e.id.clone())
            .unwrap_or_else(|| GENERAL_SECTION.to_string())
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self::rails()
    }
}

/// Whether lowercase `text` contains `token` either compact (`activerecord`)
/// or split at its CamelCase boundaries (`active record`).
fn mentions(text: &str, token: &str) -> bool {
    let compact = token.to_lowercase();
    if compact.is_empty() {
        return false;
    }
    if text.contains(&compact) {
        return true;
    }
    let words = split_camel_case(token);
    words != compact && text.contains(&words)
}

/// `DateAndTime` -> `date and time`.
fn split_camel_case(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 4);
    let mut prev_lower = false;
    for c in token.chars() {
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_lowercase());
    }
    out
}
