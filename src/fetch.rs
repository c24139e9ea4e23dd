use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::FetchError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Anything that can turn a url into an HTML body.
pub trait PageSource {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        (**self).get(url, timeout)
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (k, v) in &config.site.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .with_context(|| format!("invalid header name {k}"))?;
            let value = HeaderValue::from_str(v)
                .with_context(|| format!("invalid header value for {k}"))?;
            headers.insert(name, value);
        }
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.site.user_agent)?);

        let client = Client::builder()
            .timeout(config.fetch.timeout())
            .default_headers(headers)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|err| classify_reqwest_error(url, timeout, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .map_err(|err| classify_reqwest_error(url, timeout, err))
    }
}

fn classify_reqwest_error(url: &str, timeout: Duration, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::UpstreamTimeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        FetchError::UpstreamUnreachable {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Issues one request at a time, each preceded by a fixed politeness delay.
pub struct Scheduler<S> {
    source: S,
    cache: Option<Arc<ResponseCache>>,
}

impl<S: PageSource> Scheduler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cache hits skip both the delay and the request.
    pub fn fetch(
        &self,
        url: &str,
        prior_delay: Duration,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        if let Some(cache) = &self.cache
            && let Some(body) = cache.get(url)
        {
            debug!(%url, "served from response cache");
            return Ok(body);
        }

        if !prior_delay.is_zero() {
            std::thread::sleep(prior_delay);
        }

        let body = self.source.get(url, timeout)?;
        debug!(%url, bytes = body.len(), "fetched page");

        if let Some(cache) = &self.cache {
            cache.insert(url, body.clone());
        }
        Ok(body)
    }

    /// Drives an offset-paginated sequence until one of the stop conditions
    /// holds. A failed request ends the loop and keeps what was collected.
    pub fn paginate<T, U, P>(&self, plan: &PagePlan, url_for_offset: U, mut scan: P) -> Paginated<T>
    where
        U: Fn(usize) -> String,
        P: FnMut(&str) -> PageScan<T>,
    {
        let mut items = Vec::new();
        let mut pages_fetched = 0usize;
        let mut stop = StopReason::PageCap;

        for page in 0..plan.max_pages {
            let url = url_for_offset(page * plan.page_size);
            let delay = plan.delay_for(page);

            let body = match self.fetch(&url, delay, plan.timeout) {
                Ok(body) => body,
                Err(err) => {
                    warn!(%url, page, error = %err, "page fetch failed; returning partial results");
                    stop = StopReason::FetchFailed;
                    break;
                }
            };
            pages_fetched += 1;

            let scanned = scan(&body);
            if !scanned.table_found {
                debug!(%url, page, "expected table absent; stopping");
                stop = StopReason::TableMissing;
                break;
            }
            if scanned.data_rows == 0 {
                debug!(%url, page, "table has no data rows; stopping");
                stop = StopReason::NoRows;
                break;
            }

            let count = scanned.items.len();
            items.extend(scanned.items);
            info!(page, rows = count, total = items.len(), "page collected");

            if count < plan.page_size {
                stop = StopReason::ShortPage;
                break;
            }
        }

        Paginated {
            items,
            pages_fetched,
            stop,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PagePlan {
    pub page_size: usize,
    pub max_pages: usize,
    pub page_delay: Duration,
    pub page_delay_step: Duration,
    pub timeout: Duration,
}

impl PagePlan {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.pagination.page_size,
            max_pages: config.pagination.max_pages,
            page_delay: Duration::from_millis(config.fetch.page_delay_ms),
            page_delay_step: Duration::from_millis(config.fetch.page_delay_step_ms),
            timeout: config.fetch.timeout(),
        }
    }

    pub fn delay_for(&self, page: usize) -> Duration {
        self.page_delay + self.page_delay_step * page as u32
    }
}

/// What a page scanner found on one page.
#[derive(Debug, Clone)]
pub struct PageScan<T> {
    pub table_found: bool,
    pub data_rows: usize,
    pub items: Vec<T>,
}

impl<T> PageScan<T> {
    pub fn missing() -> Self {
        Self {
            table_found: false,
            data_rows: 0,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    TableMissing,
    NoRows,
    ShortPage,
    PageCap,
    FetchFailed,
}

#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages_fetched: usize,
    pub stop: StopReason,
}

/// Per-subject profile pages, keyed by the site's `page` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilePage {
    Achievements,
    Matches,
    Rivalries,
    Championships,
    Performance,
    Statistics,
}

impl ProfilePage {
    pub fn number(self) -> u32 {
        match self {
            ProfilePage::Achievements => 3,
            ProfilePage::Matches => 4,
            ProfilePage::Rivalries => 7,
            ProfilePage::Championships => 11,
            ProfilePage::Performance => 20,
            ProfilePage::Statistics => 22,
        }
    }
}

/// Builds every upstream url from the configured base.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    showtype: String,
}

impl SiteUrls {
    pub fn from_config(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.site.base_url)
            .with_context(|| format!("invalid base_url {}", config.site.base_url))?;
        Ok(Self {
            base,
            showtype: config.pagination.showtypes.join("|"),
        })
    }

    pub fn search(&self, query: &str) -> String {
        self.build(&[("id", "666"), ("search", query)])
    }

    pub fn featured(&self) -> String {
        self.build(&[("id", "2")])
    }

    pub fn profile(&self, id: &str) -> String {
        self.build(&[("id", "2"), ("nr", id)])
    }

    pub fn profile_page(&self, id: &str, page: ProfilePage) -> String {
        let page = page.number().to_string();
        self.build(&[("id", "2"), ("nr", id), ("page", &page)])
    }

    pub fn matches(&self, id: &str, offset: usize) -> String {
        let page = ProfilePage::Matches.number().to_string();
        let offset = offset.to_string();
        let mut pairs = vec![("id", "2"), ("nr", id), ("page", page.as_str())];
        if !self.showtype.is_empty() {
            pairs.push(("showtype", self.showtype.as_str()));
        }
        pairs.push(("s", offset.as_str()));
        self.build(&pairs)
    }

    fn build(&self, pairs: &[(&str, &str)]) -> String {
        let mut url = self.base.clone();
        {
            let mut qp = url.query_pairs_mut();
            qp.clear();
            for (k, v) in pairs {
                qp.append_pair(k, v);
            }
        }
        url.to_string()
    }
}
