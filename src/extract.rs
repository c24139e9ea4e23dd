use crate::document::{Cell, Link, Row, Table};
use crate::locate::{WRESTLER_LINK, wrestler_id};
use crate::model::{FeaturedWrestler, SearchResult};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RECORD_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-(\d+)").expect("record pair regex must be valid"));
static MATCH_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*matches?").expect("match total regex must be valid")
});
static WIN_LOSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)[W\w]*[^\d]*(\d+)[L\w]*").expect("win/loss regex must be valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpec {
    pub min_cells: usize,
    pub skip_header: bool,
}

pub const SEARCH_ROW: RowSpec = RowSpec { min_cells: 5, skip_header: true };
pub const MATCH_ROW: RowSpec = RowSpec { min_cells: 4, skip_header: true };
pub const CHAMPIONSHIP_ROW: RowSpec = RowSpec { min_cells: 3, skip_header: true };
pub const STAT_ROW: RowSpec = RowSpec { min_cells: 2, skip_header: false };
pub const RIVALRY_ROW: RowSpec = RowSpec { min_cells: 3, skip_header: true };
pub const PERIOD_ROW: RowSpec = RowSpec { min_cells: 3, skip_header: true };
pub const ACHIEVEMENT_ROW: RowSpec = RowSpec { min_cells: 2, skip_header: true };

/// Rows of `table` that satisfy `spec`. Short rows are skipped, not errors.
pub fn rows(table: &Table, spec: RowSpec) -> impl Iterator<Item = &Row> {
    let candidates = if spec.skip_header {
        table.data_rows()
    } else {
        &table.rows[..]
    };
    candidates.iter().filter(move |row| {
        let keep = row.cells.len() >= spec.min_cells;
        if !keep && !row.cells.is_empty() {
            debug!(cells = row.cells.len(), min = spec.min_cells, "skipping short row");
        }
        keep
    })
}

pub fn extract<T>(table: &Table, spec: RowSpec, map: impl Fn(&Row) -> Option<T>) -> Vec<T> {
    rows(table, spec).filter_map(map).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub date: String,
    pub promotion: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChampionship {
    pub title: String,
    pub promotion: String,
    pub date_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTitle {
    pub title: String,
    pub date_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRivalry {
    pub opponent: String,
    pub matches: u32,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub notable: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPeriod {
    pub period: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
}

/// Search rows: `#, name link, birthplace, rating, votes`.
pub fn search_rows(table: &Table) -> Vec<SearchResult> {
    extract(table, SEARCH_ROW, |row| {
        let link = profile_link(&row.cells[1])?;
        let rating = row.cells[3].text.clone();
        Some(SearchResult {
            id: wrestler_id(&link.href),
            name: link.text.clone(),
            birthplace: row.cells[2].text.clone(),
            rating: if rating.is_empty() { "0".to_string() } else { rating },
            votes: lenient_int(&row.cells[4].text),
        })
    })
}

/// Profile links from the first `limit` data rows.
pub fn featured_rows(table: &Table, limit: usize) -> Vec<FeaturedWrestler> {
    table
        .data_rows()
        .iter()
        .take(limit)
        .filter_map(|row| row.cells.iter().find_map(profile_link))
        .filter_map(|link| {
            let id = wrestler_id(&link.href)?;
            (!link.text.is_empty()).then_some(FeaturedWrestler {
                id,
                name: link.text,
            })
        })
        .collect()
}

/// Minimal search results from the first profile link of every row, for
/// tables that do not have the full search layout.
pub fn row_link_results(table: &Table) -> Vec<SearchResult> {
    table
        .rows
        .iter()
        .filter_map(|row| row.cells.iter().find_map(profile_link))
        .filter_map(|link| link_result(&link))
        .collect()
}

/// Minimal search results synthesized from bare profile links.
pub fn link_results(links: &[Link]) -> Vec<SearchResult> {
    links.iter().filter_map(link_result).collect()
}

fn link_result(link: &Link) -> Option<SearchResult> {
    Some(SearchResult {
        id: Some(wrestler_id(&link.href)?),
        name: link.text.clone(),
        birthplace: String::new(),
        rating: "0".to_string(),
        votes: 0,
    })
}

fn profile_link(cell: &Cell) -> Option<Link> {
    cell.links
        .iter()
        .find(|link| WRESTLER_LINK.is_match(&link.href))
        .cloned()
}

/// Match rows: `#, date, promotion, match`.
pub fn match_rows(table: &Table, promotions: &[String]) -> Vec<RawMatch> {
    extract(table, MATCH_ROW, |row| {
        let description = row.cells[3].text.clone();
        Some(RawMatch {
            date: row.cells[1].text.clone(),
            promotion: resolve_promotion(&row.cells[2], &description, promotions),
            description,
        })
    })
}

/// Cell text, then logo label, then a known name inside the description.
pub fn resolve_promotion(cell: &Cell, description: &str, promotions: &[String]) -> String {
    if !cell.text.is_empty() {
        return cell.text.clone();
    }
    if let Some(label) = &cell.image_label {
        return label.clone();
    }
    backfill_promotion(description, promotions)
}

pub fn backfill_promotion(description: &str, promotions: &[String]) -> String {
    promotions
        .iter()
        .find(|name| description.contains(name.as_str()))
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Championship rows: `title, promotion, dates`.
pub fn championship_rows(table: &Table) -> Vec<RawChampionship> {
    extract(table, CHAMPIONSHIP_ROW, |row| {
        let title = row.cells[0].text.clone();
        if title.is_empty() || title.to_lowercase().contains("no title") {
            return None;
        }
        let promotion = row.cells[1].text.clone();
        Some(RawChampionship {
            title,
            promotion: if promotion.is_empty() {
                "Unknown".to_string()
            } else {
                promotion
            },
            date_info: row.cells[2].text.clone(),
        })
    })
}

/// Title history rows: `title, dates`.
pub fn title_rows(table: &Table) -> Vec<RawTitle> {
    extract(table, ACHIEVEMENT_ROW, |row| {
        let title = row.cells[0].text.clone();
        if title.chars().count() <= 3 || title.to_lowercase().contains("unknown") {
            return None;
        }
        Some(RawTitle {
            title,
            date_info: row.cells[1].text.clone(),
        })
    })
}

pub fn stat_rows(table: &Table) -> Vec<StatRow> {
    extract(table, STAT_ROW, |row| {
        let label = row.cells[0].text.clone();
        let value = row.cells[1].text.clone();
        (!label.is_empty() && !value.is_empty()).then_some(StatRow { label, value })
    })
}

/// Head-to-head rows: `opponent, record, notes`. The record is either a
/// `W-L` pair or a bare match count.
pub fn rivalry_rows(table: &Table) -> Vec<RawRivalry> {
    extract(table, RIVALRY_ROW, |row| {
        let opponent = row.cells[0].text.clone();
        let info = &row.cells[1].text;

        let (matches, wins, losses) = if let Some(caps) = RECORD_PAIR.captures(info) {
            let wins = lenient_count(&caps[1]);
            let losses = lenient_count(&caps[2]);
            (wins.saturating_add(losses), Some(wins), Some(losses))
        } else if let Some(caps) = MATCH_TOTAL.captures(info) {
            (lenient_count(&caps[1]), None, None)
        } else {
            (0, None, None)
        };

        Some(RawRivalry {
            opponent,
            matches,
            wins,
            losses,
            notable: row.cells[2].text.clone(),
        })
    })
}

/// Per-period rows: `period, matches, record`.
pub fn period_rows(table: &Table) -> Vec<RawPeriod> {
    extract(table, PERIOD_ROW, |row| {
        let period = row.cells[0].text.clone();
        let listed = lenient_count(&row.cells[1].text);
        let record = &row.cells[2].text;

        let (wins, losses) = WIN_LOSS
            .captures(record)
            .or_else(|| RECORD_PAIR.captures(record))
            .map(|caps| (lenient_count(&caps[1]), lenient_count(&caps[2])))
            .unwrap_or((0, 0));

        Some(RawPeriod {
            period,
            matches: listed.max(wins.saturating_add(losses)),
            wins,
            losses,
        })
    })
}

/// Leading integer prefix (optional sign, surrounding whitespace ignored); 0 otherwise.
pub fn lenient_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}

/// [`lenient_int`] clamped into a count: negatives become 0, oversized values `u32::MAX`.
pub fn lenient_count(text: &str) -> u32 {
    u32::try_from(lenient_int(text).max(0)).unwrap_or(u32::MAX)
}

/// Leading decimal prefix, `None` when there is none.
pub fn leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (idx, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if idx == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            d if d.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse::<f64>().ok()
}

pub fn lenient_float(text: &str) -> f64 {
    leading_float(text).unwrap_or(0.0)
}
