//! Search service - keyword search over Rails API documentation HTML.

use std::collections::HashSet;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::catalog::SectionCatalog;
use crate::error::{Error, Result};
use crate::types::{SearchMatch, SearchResponse};

/// Elements whose text is searched.
const CANDIDATE_SELECTOR: &str = "h1, h2, h3, p, div, code";

/// Headings that give a section its title.
const HEADING_SELECTOR: &str = "h1, h2, h3";

/// Title used when the enclosing section has no heading.
pub const UNTITLED_SECTION: &str = "Untitled Section";

/// Tags whose text never counts as visible.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Search service.
///
/// Stateless apart from the shared catalog, so one instance can serve
/// concurrent requests.
pub struct SearchService {
    catalog: Arc<SectionCatalog>,
    candidates: Selector,
    headings: Selector,
}

impl SearchService {
    /// Create a new search service over the given catalog.
    pub fn new(catalog: Arc<SectionCatalog>) -> Result<Self> {
        Ok(Self {
            catalog,
            candidates: parse_selector(CANDIDATE_SELECTOR)?,
            headings: parse_selector(HEADING_SELECTOR)?,
        })
    }

    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    /// Search `content` for elements containing `query`.
    ///
    /// Collection stops once `limit` matches are found, and only then are the
    /// collected matches ranked, so a later element with higher relevance is
    /// never considered once the limit is reached.
    pub fn search(
        &self,
        content: &str,
        query: &str,
        section: Option<&str>,
        limit: usize,
    ) -> Result<SearchResponse> {
        let document = Html::parse_document(content);
        if !document.errors.is_empty() {
            debug!("Recovered from {} markup errors", document.errors.len());
        }

        let needle = query.to_lowercase();
        let query_len = query.chars().count();

        let hits: Vec<(ElementRef<'_>, String)> = document
            .select(&self.candidates)
            .filter_map(|element| {
                let text = visible_text(element);
                text.to_lowercase()
                    .contains(&needle)
                    .then_some((element, text))
            })
            .collect();

        // An element that wraps another hit only repeats its text, so it is
        // dropped in favour of the inner hits. Its `#id` anchor goes with it:
        // the inner matches report their own ids, or none.
        let wrappers: HashSet<_> = hits
            .iter()
            .flat_map(|(element, _)| element.ancestors().map(|node| node.id()))
            .collect();

        let mut matches = Vec::new();
        for (element, text) in hits {
            if matches.len() >= limit {
                break;
            }
            if wrappers.contains(&element.id()) {
                continue;
            }

            let section = match section {
                Some(s) => s.to_string(),
                None => self.catalog.detect_id(&text),
            };

            let path = match element.value().id() {
                Some(id) if !id.is_empty() => format!("#{}", id),
                _ => String::new(),
            };

            let text_len = text.chars().count();
            let relevance = if text_len == 0 {
                0.0
            } else {
                query_len as f64 / text_len as f64
            };

            matches.push(SearchMatch {
                title: self.section_title(element),
                content: text,
                path,
                section,
                relevance,
            });
        }

        // `sort_by` is stable: equal scores keep document order.
        matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

        debug!(
            "Search for {:?} (section: {:?}) returned {} matches",
            query,
            section,
            matches.len()
        );

        Ok(SearchResponse::new(
            query,
            section.map(String::from),
            matches,
        ))
    }

    /// Text of the first heading in the nearest enclosing `section` or `div`.
    fn section_title(&self, element: ElementRef<'_>) -> String {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| matches!(a.value().name(), "section" | "div"))
            .and_then(|container| container.select(&self.headings).next())
            .map(visible_text)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED_SECTION.to_string())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Search(format!("invalid selector '{}': {:?}", selector, e)))
}

/// Visible text of an element with whitespace runs collapsed.
fn visible_text(element: ElementRef<'_>) -> String {
    let root = element.id();
    let mut text = String::new();

    for node in element.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|a| a.id() != root)
            .chain(std::iter::once(*element))
            .filter_map(|a| a.value().as_element())
            .any(|e| HIDDEN_TAGS.contains(&e.name()));
        if !hidden {
            text.push_str(chunk);
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
