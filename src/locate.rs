use crate::document::{DocumentQuery, Link, Table};
use regex::Regex;
use std::sync::LazyLock;

/// Profile links on the site look like `?id=2&nr=12345`.
pub static WRESTLER_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id=2&nr=(\d+)").expect("wrestler link regex must be valid"));

const ANCHOR_TAGS: &[&str] = &["b", "strong", "h1", "h2", "h3", "h4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Search,
    Matches,
    Championships,
    Stats,
    Rivalries,
    Performance,
    Achievements,
    Featured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The first table on the page.
    FirstTable,
    /// Every keyword appears in the table's header row.
    HeaderKeywords(&'static [&'static str]),
    /// Any keyword appears anywhere in the table's text.
    TextKeywords(&'static [&'static str]),
    /// The nearest table following the first bold/heading element with this phrase.
    Anchor(&'static str),
    /// As [`Strategy::Anchor`], but the last such element is the anchor.
    LastAnchor(&'static str),
    /// Every table, in document order.
    AllTables,
    /// No table: profile links anywhere on the page.
    SubjectLinks,
}

impl Facet {
    pub fn strategies(self) -> &'static [Strategy] {
        match self {
            Facet::Search => &[
                Strategy::FirstTable,
                Strategy::LastAnchor("wrestlers database"),
                Strategy::SubjectLinks,
            ],
            Facet::Matches => &[Strategy::HeaderKeywords(&["date", "match"])],
            Facet::Championships => &[Strategy::TextKeywords(&["title", "championship", "belt"])],
            Facet::Stats => &[Strategy::TextKeywords(&["statistics", "career", "debut"])],
            Facet::Rivalries => &[Strategy::TextKeywords(&["opponent", "vs.", "matches"])],
            Facet::Performance => &[Strategy::TextKeywords(&["matches per", "month", "year"])],
            Facet::Achievements => &[Strategy::TextKeywords(&["championship", "title"])],
            Facet::Featured => &[
                Strategy::Anchor("most popular active wrestlers"),
                Strategy::AllTables,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Table(Table),
    Links(Vec<Link>),
    NotFound,
}

impl Located {
    pub fn is_found(&self) -> bool {
        !matches!(self, Located::NotFound)
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Located::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// First hit of the facet's strategy chain.
pub fn locate<D: DocumentQuery + ?Sized>(doc: &D, facet: Facet) -> Located {
    candidates(doc, facet)
        .into_iter()
        .next()
        .unwrap_or(Located::NotFound)
}

/// Every hit of the facet's strategy chain, strategy order first and document
/// order second. A table is reported once even if several strategies match it.
pub fn candidates<D: DocumentQuery + ?Sized>(doc: &D, facet: Facet) -> Vec<Located> {
    let tables = doc.find_tables();
    let mut seen = Vec::new();
    let mut out = Vec::new();

    for strategy in facet.strategies() {
        for hit in apply(doc, &tables, *strategy) {
            if let Located::Table(table) = &hit {
                if seen.contains(&table.order) {
                    continue;
                }
                seen.push(table.order);
            }
            out.push(hit);
        }
    }

    out
}

pub fn apply<D: DocumentQuery + ?Sized>(
    doc: &D,
    tables: &[Table],
    strategy: Strategy,
) -> Vec<Located> {
    match strategy {
        Strategy::FirstTable => tables.first().cloned().map(Located::Table).into_iter().collect(),
        Strategy::HeaderKeywords(keywords) => tables
            .iter()
            .find(|table| keywords.iter().all(|k| table.header.contains(k)))
            .cloned()
            .map(Located::Table)
            .into_iter()
            .collect(),
        Strategy::TextKeywords(keywords) => tables
            .iter()
            .filter(|table| keywords.iter().any(|k| table.text.contains(k)))
            .cloned()
            .map(Located::Table)
            .collect(),
        Strategy::Anchor(phrase) => anchored_table(doc, tables, phrase, false)
            .map(Located::Table)
            .into_iter()
            .collect(),
        Strategy::LastAnchor(phrase) => anchored_table(doc, tables, phrase, true)
            .map(Located::Table)
            .into_iter()
            .collect(),
        Strategy::AllTables => tables.iter().cloned().map(Located::Table).collect(),
        Strategy::SubjectLinks => {
            let links = doc.links_matching(&WRESTLER_LINK);
            if links.is_empty() {
                Vec::new()
            } else {
                vec![Located::Links(links)]
            }
        }
    }
}

fn anchored_table<D: DocumentQuery + ?Sized>(
    doc: &D,
    tables: &[Table],
    phrase: &str,
    last: bool,
) -> Option<Table> {
    let pattern = Regex::new(&format!("(?i){}", regex::escape(phrase))).ok()?;
    let hits = doc.find_by_text(ANCHOR_TAGS, &pattern);
    let anchor = if last { hits.last() } else { hits.first() }?;
    tables
        .iter()
        .find(|table| table.order > anchor.order)
        .cloned()
}

/// Numeric site id from a profile link.
pub fn wrestler_id(href: &str) -> Option<String> {
    WRESTLER_LINK
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
