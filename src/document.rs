//! Parser-independent view of an HTML page.
//!
//! Everything downstream of this module works on the owned [`Table`], [`Row`],
//! [`Cell`] and [`Link`] values, so the locator and extractor never touch a
//! parser API directly.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TR: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static INFO_ROW: LazyLock<Selector> =
    LazyLock::new(|| selector(".InformationBoxTable .InformationBoxRow"));
static INFO_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".InformationBoxTitle"));
static INFO_CONTENTS: LazyLock<Selector> = LazyLock::new(|| selector(".InformationBoxContents"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must be valid")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub links: Vec<Link>,
    /// `alt` or `title` of the first image, for logo-only cells.
    pub image_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Position of the `<table>` element in document order.
    pub order: usize,
    /// First row text, lower-cased with all whitespace removed.
    pub header: String,
    /// Whole table text, lower-cased.
    pub text: String,
    pub rows: Vec<Row>,
}

impl Table {
    /// Rows after the header row.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHit {
    pub order: usize,
    pub tag: String,
    pub text: String,
}

pub trait DocumentQuery {
    fn find_tables(&self) -> Vec<Table>;

    /// Elements whose collapsed text matches `pattern`. An empty `tags` slice
    /// means every element.
    fn find_by_text(&self, tags: &[&str], pattern: &Regex) -> Vec<TextHit>;

    fn links_matching(&self, pattern: &Regex) -> Vec<Link>;

    fn first_text(&self, css: &str) -> Option<String>;

    /// Label/value pairs of the profile information box.
    fn info_box(&self) -> Vec<(String, String)>;

    fn rows_of<'t>(&self, table: &'t Table) -> &'t [Row] {
        &table.rows
    }

    fn cells_of<'r>(&self, row: &'r Row) -> &'r [Cell] {
        &row.cells
    }
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn elements(&self) -> impl Iterator<Item = (usize, ElementRef<'_>)> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
    }
}

impl DocumentQuery for HtmlDocument {
    fn find_tables(&self) -> Vec<Table> {
        self.elements()
            .filter(|(_, el)| el.value().name() == "table")
            .map(|(order, el)| build_table(order, el))
            .collect()
    }

    fn find_by_text(&self, tags: &[&str], pattern: &Regex) -> Vec<TextHit> {
        self.elements()
            .filter(|(_, el)| tags.is_empty() || tags.contains(&el.value().name()))
            .filter_map(|(order, el)| {
                let text = collapsed_text(el);
                pattern.is_match(&text).then(|| TextHit {
                    order,
                    tag: el.value().name().to_string(),
                    text,
                })
            })
            .collect()
    }

    fn links_matching(&self, pattern: &Regex) -> Vec<Link> {
        self.html
            .select(&LINK)
            .filter_map(|el| {
                let href = el.value().attr("href")?;
                pattern.is_match(href).then(|| Link {
                    href: href.to_string(),
                    text: collapsed_text(el),
                })
            })
            .collect()
    }

    fn first_text(&self, css: &str) -> Option<String> {
        let parsed = Selector::parse(css).ok()?;
        self.html
            .select(&parsed)
            .map(collapsed_text)
            .find(|text| !text.is_empty())
    }

    fn info_box(&self) -> Vec<(String, String)> {
        self.html
            .select(&INFO_ROW)
            .filter_map(|row| {
                let title = row.select(&INFO_TITLE).next()?;
                let contents = row.select(&INFO_CONTENTS).next()?;
                Some((collapsed_text(title), collapsed_text(contents)))
            })
            .collect()
    }
}

fn build_table(order: usize, table: ElementRef<'_>) -> Table {
    let rows: Vec<Row> = table.select(&TR).map(build_row).collect();
    let header = rows
        .first()
        .map(|row| {
            row.text
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase()
        })
        .unwrap_or_default();

    Table {
        order,
        header,
        text: collapsed_text(table).to_lowercase(),
        rows,
    }
}

fn build_row(row: ElementRef<'_>) -> Row {
    Row {
        text: collapsed_text(row),
        cells: row.select(&TD).map(build_cell).collect(),
    }
}

fn build_cell(cell: ElementRef<'_>) -> Cell {
    let links = cell
        .select(&LINK)
        .filter_map(|a| {
            Some(Link {
                href: a.value().attr("href")?.to_string(),
                text: collapsed_text(a),
            })
        })
        .collect();

    let image_label = cell.select(&IMG).next().and_then(|img| {
        img.value()
            .attr("alt")
            .or_else(|| img.value().attr("title"))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    });

    Cell {
        text: collapsed_text(cell),
        links,
        image_label,
    }
}

/// Text nodes concatenated as written, then whitespace runs collapsed.
pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
