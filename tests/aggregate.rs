use ringside::aggregate::{
    current_streak, match_type_breakdown, monthly_breakdown, percent, recent_form,
    sort_by_date_desc, tally, win_rate,
};
use ringside::dedup::{dedup, dedup_by, sort_by_votes, top_rivalries};
use ringside::model::{MatchRecord, MatchType, Outcome, Rivalry, SearchResult, Streak, Tally};

fn record(date: &str, outcome: Outcome, match_type: MatchType) -> MatchRecord {
    MatchRecord {
        date: date.to_string(),
        promotion: "WWE".to_string(),
        description: String::new(),
        outcome,
        opponent: None,
        match_type,
    }
}

fn singles(date: &str, outcome: Outcome) -> MatchRecord {
    record(date, outcome, MatchType::Singles)
}

fn result(id: Option<&str>, name: &str, votes: i64) -> SearchResult {
    SearchResult {
        id: id.map(str::to_string),
        name: name.to_string(),
        birthplace: String::new(),
        rating: "0".to_string(),
        votes,
    }
}

fn rivalry(name: &str, matches: u32) -> Rivalry {
    Rivalry {
        opponent_name: name.to_string(),
        matches,
        wins: None,
        losses: None,
        win_rate: None,
        notable: format!("{matches} matches total"),
    }
}

#[test]
fn win_rate_counts_only_classified_matches() {
    let matches = vec![
        singles("07.04.2024", Outcome::Win),
        singles("06.04.2024", Outcome::Win),
        singles("05.04.2024", Outcome::Loss),
        singles("04.04.2024", Outcome::Unknown),
    ];
    let totals = tally(&matches);

    assert_eq!(
        totals,
        Tally {
            wins: 2,
            losses: 1,
            draws: 0
        }
    );
    assert_eq!(win_rate(&totals), 66.7);
    assert_eq!(win_rate(&Tally::default()), 0.0);
}

#[test]
fn percent_rounds_to_whole_numbers() {
    assert_eq!(percent(1, 3), 33);
    assert_eq!(percent(2, 3), 67);
    assert_eq!(percent(1, 8), 13);
    assert_eq!(percent(5, 0), 0);
}

#[test]
fn newest_first_with_unparseable_dates_last() {
    let mut matches = vec![
        singles("01.01.2020", Outcome::Win),
        singles("unknown", Outcome::Loss),
        singles("2023-06-15", Outcome::Draw),
        singles("03/01/2021", Outcome::Win),
    ];
    sort_by_date_desc(&mut matches);

    let dates: Vec<&str> = matches.iter().map(|m| m.date.as_str()).collect();
    assert_eq!(dates, ["2023-06-15", "03/01/2021", "01.01.2020", "unknown"]);
}

#[test]
fn streak_skips_unknown_outcomes() {
    let matches = vec![
        singles("07.04.2024", Outcome::Unknown),
        singles("06.04.2024", Outcome::Loss),
        singles("05.04.2024", Outcome::Unknown),
        singles("04.04.2024", Outcome::Loss),
        singles("03.04.2024", Outcome::Win),
    ];
    assert_eq!(
        current_streak(&matches),
        Some(Streak {
            outcome: Outcome::Loss,
            count: 2
        })
    );

    let unknown = vec![singles("07.04.2024", Outcome::Unknown)];
    assert_eq!(current_streak(&unknown), None);
    assert_eq!(current_streak(&[]), None);
}

#[test]
fn recent_form_window_is_capped_by_history() {
    let matches = vec![
        singles("07.04.2024", Outcome::Win),
        singles("06.04.2024", Outcome::Draw),
        singles("05.04.2024", Outcome::Loss),
    ];

    let form = recent_form(&matches, 2);
    assert_eq!((form.wins, form.losses, form.draws), (1, 0, 1));
    assert_eq!(form.period, "last 2 matches");

    assert_eq!(recent_form(&matches, 10).period, "last 3 matches");
}

#[test]
fn monthly_buckets_are_chronological() {
    let matches = vec![
        singles("07.04.2024", Outcome::Win),
        singles("2024-04-01", Outcome::Loss),
        singles("15.01.2024", Outcome::Win),
        singles("no date", Outcome::Win),
    ];

    let monthly = monthly_breakdown(&matches);
    let periods: Vec<(&str, u32, u32)> = monthly
        .iter()
        .map(|p| (p.period.as_str(), p.matches, p.win_rate))
        .collect();
    assert_eq!(periods, [("2024-01", 1, 100), ("2024-04", 2, 50)]);
}

#[test]
fn match_types_are_grouped() {
    let matches = vec![
        record("07.04.2024", Outcome::Win, MatchType::Singles),
        record("06.04.2024", Outcome::Loss, MatchType::TagTeam),
        record("05.04.2024", Outcome::Win, MatchType::Singles),
    ];

    let types = match_type_breakdown(&matches);
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].match_type, MatchType::Singles);
    assert_eq!((types[0].matches, types[0].win_rate), (2, 100));
    assert_eq!(types[1].label, MatchType::TagTeam.label());
}

#[test]
fn dedup_keeps_first_and_drops_missing_ids() {
    let results = vec![
        result(Some("1"), "First", 10),
        result(None, "No Id", 99),
        result(Some("1"), "Duplicate", 50),
        result(Some("2"), "Second", 20),
    ];

    let names: Vec<String> = dedup(results).into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["First", "Second"]);
}

#[test]
fn dedup_by_uses_the_given_key() {
    let words = vec!["Apple", "avocado", "Banana", "apricot"];
    let firsts = dedup_by(words, |w| w.chars().next().map(|c| c.to_ascii_lowercase()));
    assert_eq!(firsts, ["Apple", "Banana"]);
}

#[test]
fn votes_sort_is_descending_and_stable() {
    let mut results = vec![
        result(Some("1"), "A", 5),
        result(Some("2"), "B", 9),
        result(Some("3"), "C", 5),
    ];
    sort_by_votes(&mut results);

    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["B", "A", "C"]);
}

#[test]
fn top_rivalries_ranks_unique_opponents() {
    let rivalries = vec![
        rivalry("Seth Rollins", 12),
        rivalry("Brock Lesnar", 30),
        rivalry("Seth Rollins", 99),
        rivalry("John Cena", 8),
    ];

    let top = top_rivalries(rivalries, 2);
    let names: Vec<(&str, u32)> = top
        .iter()
        .map(|r| (r.opponent_name.as_str(), r.matches))
        .collect();
    assert_eq!(names, [("Brock Lesnar", 30), ("Seth Rollins", 12)]);
}
