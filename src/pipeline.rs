use crate::aggregate::{aggregate, tally};
use crate::cache::ResponseCache;
use crate::classify::Classifier;
use crate::config::Config;
use crate::dedup::dedup;
use crate::extract::leading_float;
use crate::fetch::{HttpSource, PagePlan, PageSource, Paginated, ProfilePage, Scheduler, SiteUrls};
use crate::model::{
    AchievementsFacet, BasicProfile, CareerProfile, ChampionshipsFacet, FeaturedWrestler,
    MatchRecord, MatchesPage, PageInfo, PerformanceFacet, RecentMatches, RelatedFacet,
    RelatedWrestler, Relationship, RivalriesFacet, SearchResult, StatsSummary, TimelineFacet,
};
use crate::parser::{
    parse_achievements_page, parse_championships_page, parse_featured_page,
    parse_performance_page, parse_profile_page, parse_rivalries_page, parse_search_page,
    parse_stats_page, parse_timeline_page, scan_matches_page,
};
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Recent matches scanned for opponents by [`WrestlerClient::related`].
const RELATED_MATCH_WINDOW: usize = 10;
/// Below this many recent opponents, rivals are added too.
const RELATED_RIVAL_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: String,
    pub min_votes: Option<i64>,
    pub min_rating: Option<f64>,
    pub birthplace: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileOptions {
    pub id: String,
    pub include_championships: bool,
    pub include_timeline: bool,
}

#[derive(Debug, Clone)]
pub struct MatchesOptions {
    pub id: String,
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

/// One entry point per facet. Every call builds its own records; the only
/// state shared between calls is the optional response cache.
pub struct WrestlerClient<S> {
    scheduler: Scheduler<S>,
    urls: SiteUrls,
    config: Config,
}

impl WrestlerClient<HttpSource> {
    pub fn from_config(config: Config) -> Result<Self> {
        let source = HttpSource::from_config(&config)?;
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(ResponseCache::new(Duration::from_secs(config.cache.ttl_secs))));

        let client = Self::new(source, config)?;
        Ok(match cache {
            Some(cache) => client.with_cache(cache),
            None => client,
        })
    }
}

impl<S: PageSource> WrestlerClient<S> {
    pub fn new(source: S, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: Scheduler::new(source),
            urls: SiteUrls::from_config(&config)?,
            config,
        })
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.scheduler = self.scheduler.with_cache(cache);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        self.scheduler.source()
    }

    pub fn search(&self, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let query = options.query.trim();
        if query.is_empty() {
            bail!("search query must not be empty");
        }

        let url = self.urls.search(query);
        let body = self
            .scheduler
            .fetch(
                &url,
                self.config.fetch.search_delay(),
                self.config.fetch.search_timeout(),
            )
            .with_context(|| format!("failed to search wrestlers for {query:?}"))?;

        let found = parse_search_page(&body);
        let total = found.len();
        let results: Vec<SearchResult> = found
            .into_iter()
            .filter(|r| options.min_votes.is_none_or(|min| r.votes >= min))
            .filter(|r| {
                options.min_rating.is_none_or(|min| {
                    leading_float(&r.rating).is_some_and(|rating| rating >= min)
                })
            })
            .filter(|r| {
                options.birthplace.as_deref().is_none_or(|place| {
                    r.birthplace.to_lowercase().contains(&place.to_lowercase())
                })
            })
            .collect();

        info!(query, found = total, kept = results.len(), "search complete");
        Ok(results)
    }

    pub fn basic_profile(&self, id: &str) -> Result<BasicProfile> {
        check_id(id)?;
        let body = self.fetch_facet(
            id,
            "profile",
            &self.urls.profile(id),
            self.config.fetch.search_timeout(),
        )?;
        let profile = parse_profile_page(&body, id, self.config.limits.bio_chars);
        info!(id, name = %profile.name, "basic profile extracted");
        Ok(profile)
    }

    /// Profile plus every broadcast match the page cap allows. Championship and
    /// timeline failures are logged and leave those sections empty.
    pub fn profile(&self, options: &ProfileOptions) -> Result<CareerProfile> {
        let id = options.id.as_str();
        check_id(id)?;

        let body = self.fetch_facet(
            id,
            "profile",
            &self.urls.profile(id),
            self.config.fetch.timeout(),
        )?;
        let basic = parse_profile_page(&body, id, self.config.limits.bio_chars);
        let classifier = Classifier::new(&basic.name);

        let paged = self.all_matches(id, &classifier);
        info!(
            id,
            pages = paged.pages_fetched,
            matches = paged.items.len(),
            stop = ?paged.stop,
            "match history collected"
        );

        let championships = if options.include_championships {
            match self.championships(id) {
                Ok(facet) => facet.championships,
                Err(err) => {
                    warn!(id, error = %format!("{err:#}"), "championships unavailable");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let timeline = if options.include_timeline {
            match self.timeline(id) {
                Ok(facet) => facet.events,
                Err(err) => {
                    warn!(id, error = %format!("{err:#}"), "timeline unavailable");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let profile = aggregate(
            basic,
            paged.items,
            championships,
            timeline,
            self.config.limits.recent_form,
        );
        info!(
            id,
            name = %profile.name,
            wins = profile.wins,
            losses = profile.losses,
            draws = profile.draws,
            win_rate = profile.win_rate,
            "profile aggregated"
        );
        Ok(profile)
    }

    fn all_matches(&self, id: &str, classifier: &Classifier) -> Paginated<MatchRecord> {
        let plan = PagePlan::from_config(&self.config);
        let promotions = &self.config.extract.promotions;
        self.scheduler.paginate(
            &plan,
            |offset| self.urls.matches(id, offset),
            |body| scan_matches_page(body, classifier, promotions),
        )
    }

    pub fn matches_page(&self, options: &MatchesOptions) -> Result<MatchesPage> {
        let id = options.id.as_str();
        check_id(id)?;
        if options.page == 0 {
            bail!("page numbers start at 1");
        }
        if options.limit == 0 {
            bail!("limit must be greater than zero");
        }

        let (name, mut matches) = self.first_matches(id, (options.page - 1) * options.limit)?;
        let total_on_page = matches.len();
        let has_more = total_on_page == self.config.pagination.page_size;
        matches.truncate(options.limit);
        let totals = tally(&matches);

        info!(id, page = options.page, rows = total_on_page, has_more, "matches page collected");
        Ok(MatchesPage {
            name,
            matches,
            wins: totals.wins,
            losses: totals.losses,
            draws: totals.draws,
            pagination: PageInfo {
                page: options.page,
                limit: options.limit,
                total_on_page,
                has_more,
            },
        })
    }

    pub fn recent_matches(&self, id: &str, limit: usize) -> Result<RecentMatches> {
        check_id(id)?;
        let (name, mut matches) = self.first_matches(id, 0)?;
        matches.truncate(limit);
        Ok(RecentMatches { name, matches })
    }

    /// Subject name from the profile page, then one page of matches at `offset`.
    fn first_matches(&self, id: &str, offset: usize) -> Result<(String, Vec<MatchRecord>)> {
        let body = self.fetch_facet(
            id,
            "profile",
            &self.urls.profile(id),
            self.config.fetch.timeout(),
        )?;
        let name = parse_profile_page(&body, id, 0).name;
        let classifier = Classifier::new(&name);

        let url = self.urls.matches(id, offset);
        let body = self
            .scheduler
            .fetch(
                &url,
                Duration::from_millis(self.config.fetch.page_delay_ms),
                self.config.fetch.timeout(),
            )
            .with_context(|| format!("failed to fetch wrestler matches with id {id}"))?;

        let scan = scan_matches_page(&body, &classifier, &self.config.extract.promotions);
        Ok((name, scan.items))
    }

    pub fn championships(&self, id: &str) -> Result<ChampionshipsFacet> {
        check_id(id)?;
        let url = self.urls.profile_page(id, ProfilePage::Championships);
        let body = self.fetch_facet(id, "championships", &url, self.config.fetch.timeout())?;
        let facet = parse_championships_page(&body, self.config.limits.championships);
        info!(id, championships = facet.championships.len(), "championships extracted");
        Ok(facet)
    }

    pub fn timeline(&self, id: &str) -> Result<TimelineFacet> {
        check_id(id)?;
        let url = self.urls.profile_page(id, ProfilePage::Statistics);
        let body = self.fetch_facet(id, "timeline", &url, self.config.fetch.timeout())?;
        let facet = parse_timeline_page(&body, self.config.limits.timeline_events);
        info!(id, events = facet.events.len(), "timeline extracted");
        Ok(facet)
    }

    pub fn stats(&self, id: &str) -> Result<StatsSummary> {
        check_id(id)?;
        let url = self.urls.profile_page(id, ProfilePage::Statistics);
        let body = self.fetch_facet(id, "stats", &url, self.config.fetch.search_timeout())?;
        let stats = parse_stats_page(&body);
        info!(
            id,
            total = stats.total_matches,
            wins = stats.wins,
            losses = stats.losses,
            draws = stats.draws,
            "stats extracted"
        );
        Ok(stats)
    }

    pub fn achievements(&self, id: &str) -> Result<AchievementsFacet> {
        check_id(id)?;
        let url = self.urls.profile_page(id, ProfilePage::Achievements);
        let body = self.fetch_facet(id, "achievements", &url, self.config.fetch.search_timeout())?;
        let facet = parse_achievements_page(&body, self.config.limits.achievements);
        info!(id, achievements = facet.achievements.len(), "achievements extracted");
        Ok(facet)
    }

    pub fn rivalries(&self, id: &str) -> Result<RivalriesFacet> {
        check_id(id)?;
        let url = self.urls.profile_page(id, ProfilePage::Rivalries);
        let body = self.fetch_facet(id, "rivalries", &url, self.config.fetch.search_timeout())?;
        let limits = &self.config.limits;
        let facet = parse_rivalries_page(&body, limits.rivalry_candidates, limits.rivalries);
        info!(id, rivalries = facet.rivalries.len(), "rivalries extracted");
        Ok(facet)
    }

    pub fn performance(&self, id: &str) -> Result<PerformanceFacet> {
        check_id(id)?;
        let url = self.urls.profile_page(id, ProfilePage::Performance);
        let body = self.fetch_facet(id, "performance", &url, self.config.fetch.search_timeout())?;
        let facet = parse_performance_page(&body, self.config.limits.performance_periods);
        info!(id, periods = facet.monthly.len(), "performance extracted");
        Ok(facet)
    }

    /// Recent opponents first, topped up with head-to-head rivals when few
    /// opponents could be named.
    pub fn related(&self, id: &str) -> Result<RelatedFacet> {
        let recent = self.recent_matches(id, RELATED_MATCH_WINDOW)?;
        let subject = recent.name.to_lowercase();

        let mut related: Vec<RelatedWrestler> = recent
            .matches
            .iter()
            .filter_map(|m| m.opponent.as_deref())
            .filter(|name| {
                name.chars().count() > 3
                    && name.to_lowercase() != subject
                    && !name.to_lowercase().contains("unknown")
            })
            .map(|name| RelatedWrestler {
                name: name.to_string(),
                relationship: Relationship::RecentOpponent,
                matches: None,
                win_rate: None,
            })
            .collect();
        related = dedup(related);

        if related.len() < RELATED_RIVAL_THRESHOLD {
            match self.rivalries(id) {
                Ok(facet) => related.extend(
                    facet
                        .rivalries
                        .into_iter()
                        .filter(|r| r.opponent_name.to_lowercase() != subject)
                        .map(|r| RelatedWrestler {
                            name: r.opponent_name,
                            relationship: Relationship::Rival,
                            matches: Some(r.matches),
                            win_rate: r.win_rate,
                        }),
                ),
                Err(err) => warn!(id, error = %format!("{err:#}"), "rivalries unavailable"),
            }
        }

        let mut related = dedup(related);
        related.truncate(self.config.limits.related);
        info!(id, related = related.len(), "related wrestlers collected");

        Ok(RelatedFacet {
            name: recent.name,
            related_wrestlers: related,
        })
    }

    pub fn featured(&self) -> Result<Vec<FeaturedWrestler>> {
        let url = self.urls.featured();
        let body = self
            .scheduler
            .fetch(
                &url,
                self.config.fetch.search_delay(),
                self.config.fetch.search_timeout(),
            )
            .context("failed to fetch featured wrestlers")?;
        let featured = parse_featured_page(&body, self.config.limits.featured);
        info!(featured = featured.len(), "featured wrestlers extracted");
        Ok(featured)
    }

    fn fetch_facet(&self, id: &str, facet: &str, url: &str, timeout: Duration) -> Result<String> {
        self.scheduler
            .fetch(url, self.config.fetch.profile_delay(), timeout)
            .with_context(|| format!("failed to fetch wrestler {facet} with id {id}"))
    }
}

fn check_id(id: &str) -> Result<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        bail!("wrestler id must be numeric, got {id:?}");
    }
    Ok(())
}
