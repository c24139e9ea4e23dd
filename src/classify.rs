//! Match outcome classification.
//!
//! A description is tested against [`RULES`] in order. The first rule whose
//! gate applies decides the outcome, even when that decision is `Unknown`;
//! later rules are never consulted. All matching is plain lower-cased
//! substring search on the subject's name, so a subject whose name is a
//! substring of another wrestler's name can be misattributed.

use crate::extract::RawMatch;
use crate::model::{MatchRecord, MatchType, Outcome};
use regex::Regex;
use std::sync::LazyLock;

static N_WAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+-way").expect("n-way regex must be valid"));

const MULTI_MAN_MARKERS: &[&str] = &[
    "triple threat",
    "fatal four",
    "battle royal",
    "ladder match",
    "cage match",
    "rumble",
];

const OPPONENT_SEPARATORS: &[&str] = &[" defeats ", " vs. ", " vs "];
const OPPONENT_TRAILERS: &[&str] = &[" (", " - ", "[", " by "];

/// A subject name prepared for classification.
#[derive(Debug, Clone)]
pub struct Classifier {
    subject: String,
    team_wins: Vec<Regex>,
    team_losses: Vec<Regex>,
}

/// One step of the outcome cascade.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Classifier, &str) -> bool,
    pub resolve: fn(&Classifier, &str) -> Outcome,
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "draw",
        applies: is_draw,
        resolve: |_, _| Outcome::Draw,
    },
    Rule {
        name: "explicit-win",
        applies: Classifier::explicit_win,
        resolve: |_, _| Outcome::Win,
    },
    Rule {
        name: "explicit-loss",
        applies: Classifier::explicit_loss,
        resolve: |_, _| Outcome::Loss,
    },
    Rule {
        name: "tag-team",
        applies: Classifier::is_tag_team,
        resolve: Classifier::resolve_tag_team,
    },
    Rule {
        name: "multi-man",
        applies: is_multi_man,
        resolve: Classifier::resolve_multi_man,
    },
    Rule {
        name: "versus",
        applies: is_versus,
        resolve: Classifier::resolve_versus,
    },
];

fn is_draw(_: &Classifier, text: &str) -> bool {
    text.contains("draw") || text.contains("no contest") || text.contains("time limit")
}

fn is_multi_man(_: &Classifier, text: &str) -> bool {
    MULTI_MAN_MARKERS.iter().any(|m| text.contains(m)) || N_WAY.is_match(text)
}

fn is_versus(_: &Classifier, text: &str) -> bool {
    text.contains(" vs. ") || text.contains(" vs ")
}

impl Classifier {
    pub fn new(subject: &str) -> Self {
        let subject = subject.trim().to_lowercase();
        if subject.is_empty() {
            return Self {
                subject,
                team_wins: Vec::new(),
                team_losses: Vec::new(),
            };
        }

        let s = regex::escape(&subject);
        let compile = |patterns: &[String]| -> Vec<Regex> {
            patterns
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect()
        };

        Self {
            team_wins: compile(&[
                format!("{s}[^&]*&[^&]*defeat"),
                format!("{s}[^&]*and[^&]*defeat"),
                format!("&[^&]*{s}[^&]*defeat"),
                format!("and[^&]*{s}[^&]*defeat"),
            ]),
            team_losses: compile(&[format!("defeat[^&]*{s}"), format!("beat[^&]*{s}")]),
            subject,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn classify(&self, description: &str) -> Outcome {
        self.evaluate(description).1
    }

    /// Outcome plus the name of the rule that decided it (`None` if no rule applied).
    pub fn evaluate(&self, description: &str) -> (Option<&'static str>, Outcome) {
        let text = description.to_lowercase();
        let rules = if self.subject.is_empty() {
            &RULES[..1]
        } else {
            RULES
        };

        for rule in rules {
            if (rule.applies)(self, &text) {
                return (Some(rule.name), (rule.resolve)(self, &text));
            }
        }
        (None, Outcome::Unknown)
    }

    fn explicit_win(&self, text: &str) -> bool {
        let s = &self.subject;
        text.contains(&format!("{s} defeats"))
            || (text.starts_with(&format!("{s} ")) && text.contains(" defeats "))
            || text.contains(&format!("{s} pins"))
            || text.contains(&format!("{s} submits"))
            || text.contains(&format!("{s} beat"))
            || text.contains(&format!("{s} wins"))
    }

    fn explicit_loss(&self, text: &str) -> bool {
        let s = &self.subject;
        text.contains(&format!(" defeats {s}"))
            || text.contains(&format!("defeat {s}"))
            || text.contains(&format!("{s} defeated by"))
            || text.contains(&format!("pins {s}"))
            || text.contains(&format!("submits {s}"))
            || text.contains(&format!("beat {s}"))
            || text.contains(&format!("{s} loses"))
    }

    fn is_tag_team(&self, text: &str) -> bool {
        let s = &self.subject;
        (text.contains(" & ") || text.contains(" and "))
            && (text.contains(&format!("{s} ")) || text.contains(&format!(" {s}")))
    }

    fn resolve_tag_team(&self, text: &str) -> Outcome {
        if self.team_wins.iter().any(|re| re.is_match(text)) {
            return Outcome::Win;
        }
        if self.team_losses.iter().any(|re| re.is_match(text)) {
            return Outcome::Loss;
        }

        // Word position tie-break.
        let Some(at) = text.find(&self.subject) else {
            return Outcome::Unknown;
        };
        if let Some(win) = text.find("win")
            && at < win
        {
            return Outcome::Win;
        }
        if let Some(lose) = text.find("lose")
            && at < lose
        {
            return Outcome::Loss;
        }
        Outcome::Unknown
    }

    fn resolve_multi_man(&self, text: &str) -> Outcome {
        let s = &self.subject;
        let named = text.contains(s.as_str());
        if text.contains(&format!("{s} wins"))
            || text.contains(&format!("{s} defeats"))
            || (text.contains("won by") && named)
            || (text.contains("winner") && named)
        {
            Outcome::Win
        } else if text.contains(&format!("{s} eliminated"))
            || text.contains(&format!("{s} loses"))
            || (text.contains("eliminated") && named)
        {
            Outcome::Loss
        } else {
            Outcome::Unknown
        }
    }

    fn resolve_versus(&self, text: &str) -> Outcome {
        let s = &self.subject;
        let named = text.contains(s.as_str());
        if text.contains(&format!("{s} over")) || (text.contains("winner") && named) {
            Outcome::Win
        } else if text.contains(&format!("over {s}")) || (text.contains("loser") && named) {
            Outcome::Loss
        } else {
            Outcome::Unknown
        }
    }
}

pub fn classify(description: &str, subject: &str) -> Outcome {
    Classifier::new(subject).classify(description)
}

/// Best-effort name of the other side of a match.
pub fn derive_opponent(description: &str, subject: &str) -> Option<String> {
    let subject = subject.trim().to_lowercase();
    // ASCII lowering keeps byte offsets aligned with `description`.
    let lower = description.to_ascii_lowercase();

    let (sep_at, sep) = OPPONENT_SEPARATORS
        .iter()
        .filter_map(|sep| lower.find(sep).map(|at| (at, *sep)))
        .min_by_key(|(at, _)| *at)?;

    let left = &description[..sep_at];
    let right = &description[sep_at + sep.len()..];

    let other = if subject.is_empty() || left.to_lowercase().contains(&subject) {
        right
    } else if right.to_lowercase().contains(&subject) {
        left
    } else {
        return None;
    };

    let trimmed = strip_trailers(other);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn strip_trailers(side: &str) -> &str {
    let cut = OPPONENT_TRAILERS
        .iter()
        .filter_map(|t| side.find(t))
        .min()
        .unwrap_or(side.len());
    side[..cut].trim()
}

pub fn infer_match_type(description: &str) -> MatchType {
    let text = description.to_lowercase();
    if text.contains("hell in a cell") {
        MatchType::HellInACell
    } else if text.contains("ladder") {
        MatchType::Ladder
    } else if text.contains("cage") {
        MatchType::Cage
    } else if text.contains("battle royal") {
        MatchType::BattleRoyal
    } else if text.contains("rumble") {
        MatchType::Rumble
    } else if text.contains("triple threat") || text.contains("3-way") {
        MatchType::TripleThreat
    } else if text.contains("fatal four") || text.contains("4-way") {
        MatchType::FatalFourWay
    } else if N_WAY.is_match(&text) {
        MatchType::MultiWay
    } else if text.contains('&') {
        MatchType::TagTeam
    } else {
        MatchType::Singles
    }
}

/// Second stage after extraction: classify and annotate one raw row.
pub fn enrich(raw: RawMatch, classifier: &Classifier) -> MatchRecord {
    let outcome = classifier.classify(&raw.description);
    let opponent = derive_opponent(&raw.description, classifier.subject());
    let match_type = infer_match_type(&raw.description);
    MatchRecord {
        date: raw.date,
        promotion: raw.promotion,
        description: raw.description,
        outcome,
        opponent,
        match_type,
    }
}
