//! Page parsers: one HTML body in, one facet record out. Nothing here fetches.

use crate::aggregate::percent;
use crate::classify::{Classifier, enrich};
use crate::dates::{first_year, parse_reign, reign_days};
use crate::dedup::{dedup, sort_by_votes, top_rivalries};
use crate::document::{DocumentQuery, HtmlDocument};
use crate::extract::{
    championship_rows, featured_rows, leading_float, lenient_count, link_results, match_rows,
    period_rows, rivalry_rows, row_link_results, search_rows, stat_rows, title_rows,
};
use crate::fetch::PageScan;
use crate::locate::{Facet, Located, Strategy, apply, candidates, locate};
use crate::model::{
    Achievement, AchievementKind, AchievementsFacet, BasicProfile, CareerStats,
    ChampionshipRecord, ChampionshipsFacet, EventKind, FeaturedWrestler, MatchRecord,
    PerformanceFacet, PeriodStats, PhysicalAttributes, Rivalry, RivalriesFacet, SearchResult,
    StatsSummary, Tally, TimelineEvent, TimelineFacet,
};
use regex::Regex;
use std::cmp::Reverse;
use std::sync::LazyLock;
use tracing::debug;

pub const UNKNOWN_NAME: &str = "Unknown Wrestler";

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("number regex must be valid"));
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9.]+)%\)").expect("percent regex must be valid"));
static EVENT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4}|\d{2}\.\d{2}\.\d{4}|\d{1,2}/\d{1,2}/\d{4})\b")
        .expect("event date regex must be valid")
});

const MONTHS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const EVENT_TEXT_MAX: usize = 200;
const ACHIEVEMENT_LABELS: &[&str] = &["debut", "championship", "title", "career", "total"];

/// Display name from the page header, else the `<title>` prefix.
pub fn page_subject_name<D: DocumentQuery + ?Sized>(doc: &D) -> String {
    if let Some(name) = doc.first_text("h1.TextHeader") {
        return name;
    }
    doc.first_text("title")
        .and_then(|title| {
            let name = title
                .split('«')
                .next()
                .unwrap_or_default()
                .replace(['«', '»'], "");
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Search results, deduplicated by id and ordered by votes.
pub fn parse_search_page(html: &str) -> Vec<SearchResult> {
    let doc = HtmlDocument::parse(html);
    let tables = doc.find_tables();
    let mut results = Vec::new();

    // Anchored tables are read for profile links only.
    'strategies: for strategy in Facet::Search.strategies() {
        for located in apply(&doc, &tables, *strategy) {
            results = match (&located, strategy) {
                (Located::Table(table), Strategy::LastAnchor(_)) => row_link_results(table),
                (Located::Table(table), _) => search_rows(table),
                (Located::Links(links), _) => link_results(links),
                (Located::NotFound, _) => Vec::new(),
            };
            if !results.is_empty() {
                break 'strategies;
            }
        }
        debug!(?strategy, "search strategy yielded no rows");
    }

    let mut unique = dedup(results);
    sort_by_votes(&mut unique);
    unique
}

pub fn parse_profile_page(html: &str, id: &str, bio_chars: usize) -> BasicProfile {
    let doc = HtmlDocument::parse(html);
    let mut physical = PhysicalAttributes::default();
    let mut listed = Tally::default();

    for (label, value) in doc.info_box() {
        let label = label.to_lowercase();
        if label.contains("height") {
            physical.height = value;
        } else if label.contains("weight") {
            physical.weight = value;
        } else if label.contains("hometown") || label.contains("birthplace") {
            physical.hometown = value;
        } else if label.contains("win") && !label.contains("rate") {
            listed.wins = lenient_count(&value);
        } else if label.contains("loss") {
            listed.losses = lenient_count(&value);
        } else if label.contains("draw") {
            listed.draws = lenient_count(&value);
        }
    }

    let bio: String = doc
        .first_text(".Borderless.Font9")
        .or_else(|| doc.first_text(".Text"))
        .map(|text| text.chars().take(bio_chars).collect())
        .unwrap_or_default();

    BasicProfile {
        id: id.to_string(),
        name: page_subject_name(&doc),
        bio,
        physical,
        listed_record: listed,
    }
}

/// One page of match history, classified against `classifier`'s subject.
pub fn scan_matches_page(
    html: &str,
    classifier: &Classifier,
    promotions: &[String],
) -> PageScan<MatchRecord> {
    let doc = HtmlDocument::parse(html);
    let Some(table) = locate(&doc, Facet::Matches).table().cloned() else {
        return PageScan::missing();
    };

    let items = match_rows(&table, promotions)
        .into_iter()
        .map(|raw| enrich(raw, classifier))
        .collect();

    PageScan {
        table_found: true,
        data_rows: table.data_rows().len(),
        items,
    }
}

pub fn parse_championships_page(html: &str, limit: usize) -> ChampionshipsFacet {
    let doc = HtmlDocument::parse(html);
    let championships = candidates(&doc, Facet::Championships)
        .iter()
        .filter_map(Located::table)
        .flat_map(championship_rows)
        .map(|raw| {
            let reign = parse_reign(&raw.date_info);
            ChampionshipRecord {
                title: raw.title,
                promotion: raw.promotion,
                date_info: raw.date_info,
                won_date: reign.won_date,
                lost_date: reign.lost_date,
                current: reign.current,
                reign_days: reign_days(reign.won_date, reign.lost_date),
            }
        })
        .take(limit)
        .collect();

    ChampionshipsFacet {
        name: page_subject_name(&doc),
        championships,
    }
}

pub fn parse_timeline_page(html: &str, limit: usize) -> TimelineFacet {
    let doc = HtmlDocument::parse(html);
    let mut career_stats = CareerStats::default();
    let mut events = Vec::new();

    for table in candidates(&doc, Facet::Stats).iter().filter_map(Located::table) {
        for stat in stat_rows(table) {
            let label = stat.label.to_lowercase();
            if label.contains("debut") {
                events.push(TimelineEvent {
                    date: stat.value.clone(),
                    title: "Professional Debut".to_string(),
                    description: "Started professional wrestling career".to_string(),
                    kind: EventKind::Debut,
                });
                career_stats.debut = Some(stat.value);
            } else if label.contains("active") {
                career_stats.active = Some(stat.value);
            } else if label.contains("years") {
                career_stats.years_active = Some(stat.value);
            }
        }
    }

    for hit in doc.find_by_text(&[], &EVENT_DATE) {
        if hit.text.chars().count() >= EVENT_TEXT_MAX {
            continue;
        }
        let Some(kind) = event_kind(&hit.text) else {
            continue;
        };
        for date in EVENT_DATE.find_iter(&hit.text) {
            events.push(TimelineEvent {
                date: date.as_str().to_string(),
                title: ellipsize(&hit.text, 50),
                description: ellipsize(&hit.text, 100),
                kind,
            });
        }
    }

    let mut events = dedup(events);
    events.truncate(limit);

    TimelineFacet {
        name: page_subject_name(&doc),
        career_stats,
        events,
    }
}

fn event_kind(text: &str) -> Option<EventKind> {
    if text.contains("Champion") || text.contains("Title") {
        Some(EventKind::Championship)
    } else if text.contains("Debut") || text.contains("Return") {
        Some(EventKind::CareerEvent)
    } else {
        None
    }
}

/// Totals from the statistics info box, derived where the box is silent.
pub fn parse_stats_page(html: &str) -> StatsSummary {
    let doc = HtmlDocument::parse(html);
    let mut total = 0u32;
    let mut tally = Tally::default();
    let mut listed_rate = None;

    for (label, value) in doc.info_box() {
        let label = label.to_lowercase();
        if !label.contains("total") {
            continue;
        }
        if label.contains("matches") {
            total = lenient_count(&value);
        } else if label.contains("wins") {
            tally.wins = first_number(&value);
            listed_rate = PERCENT
                .captures(&value)
                .and_then(|caps| leading_float(&caps[1]))
                .filter(|rate| *rate > 0.0);
        } else if label.contains("losses") {
            tally.losses = first_number(&value);
        } else if label.contains("draws") {
            tally.draws = first_number(&value);
        }
    }

    if total == 0 {
        total = tally.total();
    }
    let rate = match listed_rate {
        Some(rate) => rate,
        None if total > 0 => f64::from(tally.wins) / f64::from(total) * 100.0,
        None => 0.0,
    };

    StatsSummary {
        name: page_subject_name(&doc),
        total_matches: total,
        wins: tally.wins,
        losses: tally.losses,
        draws: tally.draws,
        win_rate: (rate * 10.0).round() / 10.0,
    }
}

pub fn parse_achievements_page(html: &str, limit: usize) -> AchievementsFacet {
    let doc = HtmlDocument::parse(html);
    let mut achievements = Vec::new();

    for (label, value) in doc.info_box() {
        let lower = label.to_lowercase();
        if label.is_empty() || value.is_empty() {
            continue;
        }
        if ACHIEVEMENT_LABELS.iter().any(|k| lower.contains(k)) {
            achievements.push(Achievement {
                year: first_year(&value),
                title: label,
                description: value,
                kind: AchievementKind::CareerStat,
            });
        }
    }

    for table in candidates(&doc, Facet::Achievements)
        .iter()
        .filter_map(Located::table)
    {
        for raw in title_rows(table) {
            achievements.push(Achievement {
                title: format!("{} Champion", raw.title),
                description: format!("Won championship on {}", raw.date_info),
                kind: AchievementKind::Championship,
                year: first_year(&raw.date_info),
            });
        }
    }

    let mut achievements = dedup(achievements);
    achievements.truncate(limit);

    AchievementsFacet {
        name: page_subject_name(&doc),
        achievements,
    }
}

/// Head-to-head records. Rows without a usable opponent or match count are
/// dropped before ranking.
pub fn parse_rivalries_page(html: &str, max_candidates: usize, top: usize) -> RivalriesFacet {
    let doc = HtmlDocument::parse(html);
    let found: Vec<Rivalry> = candidates(&doc, Facet::Rivalries)
        .iter()
        .filter_map(Located::table)
        .flat_map(rivalry_rows)
        .filter(|raw| {
            raw.opponent.chars().count() > 2
                && !raw.opponent.to_lowercase().contains("unknown")
                && raw.matches > 0
        })
        .take(max_candidates)
        .map(|raw| Rivalry {
            win_rate: raw.wins.map(|wins| percent(wins, raw.matches)),
            notable: if raw.notable.is_empty() {
                format!("{} matches total", raw.matches)
            } else {
                raw.notable
            },
            opponent_name: raw.opponent,
            matches: raw.matches,
            wins: raw.wins,
            losses: raw.losses,
        })
        .collect();

    RivalriesFacet {
        name: page_subject_name(&doc),
        rivalries: top_rivalries(found, top),
    }
}

pub fn parse_performance_page(html: &str, limit: usize) -> PerformanceFacet {
    let doc = HtmlDocument::parse(html);
    let mut monthly: Vec<PeriodStats> = candidates(&doc, Facet::Performance)
        .iter()
        .filter_map(Located::table)
        .flat_map(period_rows)
        .filter(|raw| !raw.period.is_empty() && raw.matches > 0)
        .map(|raw| PeriodStats {
            win_rate: percent(raw.wins, raw.matches),
            period: raw.period,
            matches: raw.matches,
            wins: raw.wins,
            losses: raw.losses,
            draws: 0,
        })
        .collect();

    // Month names in calendar order, everything else by volume.
    monthly.sort_by_key(|p| match month_index(&p.period) {
        Some(idx) => (0, idx, Reverse(0)),
        None => (1, 0, Reverse(p.matches)),
    });
    monthly.truncate(limit);

    PerformanceFacet {
        name: page_subject_name(&doc),
        monthly,
    }
}

fn month_index(period: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == period)
}

/// Listed wrestlers from the overview page: the table after the popularity
/// heading, else the leading rows of every table.
pub fn parse_featured_page(html: &str, limit: usize) -> Vec<FeaturedWrestler> {
    let doc = HtmlDocument::parse(html);
    let tables = doc.find_tables();

    for strategy in Facet::Featured.strategies() {
        let found: Vec<FeaturedWrestler> = apply(&doc, &tables, *strategy)
            .iter()
            .filter_map(Located::table)
            .flat_map(|table| featured_rows(table, limit))
            .take(limit)
            .collect();
        if !found.is_empty() {
            return dedup(found);
        }
    }
    Vec::new()
}

fn first_number(value: &str) -> u32 {
    FIRST_NUMBER
        .captures(value)
        .map(|caps| lenient_count(&caps[1]))
        .unwrap_or(0)
}

fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
