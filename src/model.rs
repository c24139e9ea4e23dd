use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    Unknown,
}

impl Outcome {
    pub fn is_classified(self) -> bool {
        self != Outcome::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    Singles,
    TagTeam,
    TripleThreat,
    FatalFourWay,
    MultiWay,
    BattleRoyal,
    Rumble,
    Ladder,
    Cage,
    HellInACell,
}

impl MatchType {
    pub fn label(self) -> &'static str {
        match self {
            MatchType::Singles => "Singles",
            MatchType::TagTeam => "Tag Team",
            MatchType::TripleThreat => "Triple Threat",
            MatchType::FatalFourWay => "Fatal Four-Way",
            MatchType::MultiWay => "Multi-Way",
            MatchType::BattleRoyal => "Battle Royal",
            MatchType::Rumble => "Rumble",
            MatchType::Ladder => "Ladder",
            MatchType::Cage => "Cage",
            MatchType::HellInACell => "Hell in a Cell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub date: String,
    pub promotion: String,
    pub description: String,
    pub outcome: Outcome,
    pub opponent: Option<String>,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipRecord {
    pub title: String,
    pub promotion: String,
    pub date_info: String,
    pub won_date: Option<NaiveDate>,
    pub lost_date: Option<NaiveDate>,
    pub current: bool,
    pub reign_days: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Debut,
    Championship,
    CareerEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: Option<String>,
    pub name: String,
    pub birthplace: String,
    pub rating: String,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rivalry {
    pub opponent_name: String,
    pub matches: u32,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub win_rate: Option<u32>,
    pub notable: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementKind {
    CareerStat,
    Championship,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAttributes {
    pub height: String,
    pub weight: String,
    pub hometown: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.wins.saturating_add(self.losses).saturating_add(self.draws)
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Unknown => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicProfile {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub physical: PhysicalAttributes,
    pub listed_record: Tally,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerStats {
    pub debut: Option<String>,
    pub active: Option<String>,
    pub years_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub name: String,
    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub period: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTypeStats {
    pub match_type: MatchType,
    pub label: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub outcome: Outcome,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentForm {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSummary {
    pub monthly: Vec<PeriodStats>,
    pub match_types: Vec<MatchTypeStats>,
    pub current_streak: Option<Streak>,
    pub recent_form: RecentForm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerProfile {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub physical: PhysicalAttributes,
    pub matches: Vec<MatchRecord>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub championships: Vec<ChampionshipRecord>,
    pub timeline: Vec<TimelineEvent>,
    pub summary: CareerSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    #[serde(rename = "totalOnPage")]
    pub total_on_page: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchesPage {
    pub name: String,
    pub matches: Vec<MatchRecord>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentMatches {
    pub name: String,
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionshipsFacet {
    pub name: String,
    pub championships: Vec<ChampionshipRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFacet {
    pub name: String,
    pub career_stats: CareerStats,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementsFacet {
    pub name: String,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RivalriesFacet {
    pub name: String,
    pub rivalries: Vec<Rivalry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceFacet {
    pub name: String,
    pub monthly: Vec<PeriodStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    RecentOpponent,
    Rival,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedWrestler {
    pub name: String,
    pub relationship: Relationship,
    pub matches: Option<u32>,
    pub win_rate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedFacet {
    pub name: String,
    pub related_wrestlers: Vec<RelatedWrestler>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedWrestler {
    pub id: String,
    pub name: String,
}
