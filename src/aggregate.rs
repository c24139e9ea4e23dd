use crate::dates::{normalize_date, period_label};
use crate::model::{
    BasicProfile, CareerProfile, CareerSummary, ChampionshipRecord, MatchRecord, MatchType,
    MatchTypeStats, PeriodStats, RecentForm, Streak, Tally, TimelineEvent,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub fn tally(matches: &[MatchRecord]) -> Tally {
    let mut tally = Tally::default();
    for record in matches {
        tally.record(record.outcome);
    }
    tally
}

/// Percentage of classified matches won, rounded to one decimal. Zero when
/// nothing was classified.
pub fn win_rate(tally: &Tally) -> f64 {
    let total = tally.total();
    if total == 0 {
        return 0.0;
    }
    let rate = f64::from(tally.wins) / f64::from(total) * 100.0;
    (rate * 10.0).round() / 10.0
}

/// Whole-percent rate used by the bucketed summaries.
pub fn percent(wins: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(wins) / f64::from(total) * 100.0).round() as u32
}

pub fn aggregate(
    basic: BasicProfile,
    mut matches: Vec<MatchRecord>,
    championships: Vec<ChampionshipRecord>,
    timeline: Vec<TimelineEvent>,
    recent_window: usize,
) -> CareerProfile {
    let totals = tally(&matches);
    sort_by_date_desc(&mut matches);
    let summary = summarize(&matches, recent_window);

    CareerProfile {
        id: basic.id,
        name: basic.name,
        bio: basic.bio,
        physical: basic.physical,
        wins: totals.wins,
        losses: totals.losses,
        draws: totals.draws,
        win_rate: win_rate(&totals),
        matches,
        championships,
        timeline,
        summary,
    }
}

/// Expects `matches` newest first.
pub fn summarize(matches: &[MatchRecord], recent_window: usize) -> CareerSummary {
    CareerSummary {
        monthly: monthly_breakdown(matches),
        match_types: match_type_breakdown(matches),
        current_streak: current_streak(matches),
        recent_form: recent_form(matches, recent_window),
    }
}

/// Buckets by `YYYY-MM`, oldest month first. Matches with unparseable dates
/// are left out.
pub fn monthly_breakdown(matches: &[MatchRecord]) -> Vec<PeriodStats> {
    let mut buckets: BTreeMap<String, (u32, Tally)> = BTreeMap::new();
    for record in matches {
        let Some(label) = period_label(&record.date) else {
            continue;
        };
        let (count, tally) = buckets.entry(label).or_default();
        *count += 1;
        tally.record(record.outcome);
    }

    buckets
        .into_iter()
        .map(|(period, (count, tally))| PeriodStats {
            period,
            matches: count,
            wins: tally.wins,
            losses: tally.losses,
            draws: tally.draws,
            win_rate: percent(tally.wins, tally.total()),
        })
        .collect()
}

pub fn match_type_breakdown(matches: &[MatchRecord]) -> Vec<MatchTypeStats> {
    let mut buckets: BTreeMap<MatchType, (u32, Tally)> = BTreeMap::new();
    for record in matches {
        let (count, tally) = buckets.entry(record.match_type).or_default();
        *count += 1;
        tally.record(record.outcome);
    }

    buckets
        .into_iter()
        .map(|(match_type, (count, tally))| MatchTypeStats {
            match_type,
            label: match_type.label().to_string(),
            matches: count,
            wins: tally.wins,
            losses: tally.losses,
            draws: tally.draws,
            win_rate: percent(tally.wins, tally.total()),
        })
        .collect()
}

/// Newest first. The sort is stable and unparseable dates go last.
pub fn sort_by_date_desc(matches: &mut [MatchRecord]) {
    matches.sort_by(|a, b| {
        match (normalize_date(&a.date), normalize_date(&b.date)) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Run of identical outcomes at the head of a newest-first list. Unknown
/// outcomes neither extend nor break the run.
pub fn current_streak(matches: &[MatchRecord]) -> Option<Streak> {
    let mut classified = matches
        .iter()
        .map(|m| m.outcome)
        .filter(|o| o.is_classified());
    let outcome = classified.next()?;
    let count = 1 + classified.take_while(|o| *o == outcome).count() as u32;
    Some(Streak { outcome, count })
}

pub fn recent_form(matches: &[MatchRecord], n: usize) -> RecentForm {
    let window = &matches[..n.min(matches.len())];
    let tally = tally(window);
    RecentForm {
        wins: tally.wins,
        losses: tally.losses,
        draws: tally.draws,
        period: format!("last {} matches", window.len()),
    }
}
