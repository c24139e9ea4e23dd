use crate::model::{
    Achievement, FeaturedWrestler, RelatedWrestler, Rivalry, SearchResult, TimelineEvent,
};
use std::collections::HashSet;
use std::hash::Hash;

/// Records that can be collapsed by an identity key.
pub trait Identity {
    type Key: Eq + Hash;

    /// `None` means the record has no identity and is dropped by [`dedup`].
    fn identity(&self) -> Option<Self::Key>;
}

impl Identity for SearchResult {
    type Key = String;

    fn identity(&self) -> Option<String> {
        self.id.clone()
    }
}

impl Identity for TimelineEvent {
    type Key = (String, String);

    fn identity(&self) -> Option<(String, String)> {
        Some((self.date.clone(), self.title.clone()))
    }
}

impl Identity for Rivalry {
    type Key = String;

    fn identity(&self) -> Option<String> {
        Some(self.opponent_name.clone())
    }
}

impl Identity for Achievement {
    type Key = String;

    fn identity(&self) -> Option<String> {
        Some(self.title.clone())
    }
}

impl Identity for RelatedWrestler {
    type Key = String;

    fn identity(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl Identity for FeaturedWrestler {
    type Key = String;

    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

/// Keeps the first record for every identity, in input order.
pub fn dedup<T: Identity>(records: Vec<T>) -> Vec<T> {
    dedup_by(records, T::identity)
}

pub fn dedup_by<T, K, F>(records: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| key(record).is_some_and(|k| seen.insert(k)))
        .collect()
}

/// Stable, highest votes first.
pub fn sort_by_votes(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.votes.cmp(&a.votes));
}

/// Deduplicates by opponent, then keeps the `n` with the most matches.
pub fn top_rivalries(rivalries: Vec<Rivalry>, n: usize) -> Vec<Rivalry> {
    let mut unique = dedup(rivalries);
    unique.sort_by(|a, b| b.matches.cmp(&a.matches));
    unique.truncate(n);
    unique
}
