use futures::future::BoxFuture;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::handle::Handle;
use crate::numbers::{parse_count, parse_number};
use crate::sources::{floor_impressions, FetchError, ProfileSource};
use crate::ProfileStats;

const TIMELINE_SAMPLE: usize = 10;
const ENGAGEMENT_MULTIPLIER: u64 = 10;

const STATS: [(&str, &str); 3] = [
    ("posts", "li.posts span.profile-stat-num"),
    ("following", "li.following span.profile-stat-num"),
    ("followers", "li.followers span.profile-stat-num"),
];

/// Scrapes the profile page of a Nitter-style Twitter mirror.
#[derive(Clone)]
pub struct NitterSource {
    client: reqwest::Client,
    base_url: String,
}

impl NitterSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(username))
    }

    async fn fetch_profile(&self, handle: &Handle) -> Result<ProfileStats, FetchError> {
        let url = self.profile_url(&handle.username);
        debug!(%url, "fetching mirror profile");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        parse_profile_html(&body)
    }
}

impl ProfileSource for NitterSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch<'a>(&'a self, handle: &'a Handle) -> BoxFuture<'a, Result<ProfileStats, FetchError>> {
        Box::pin(self.fetch_profile(handle))
    }
}

/// Extracts profile counts and an impressions estimate from a mirror page.
pub fn parse_profile_html(html: &str) -> Result<ProfileStats, FetchError> {
    let document = Html::parse_document(html);

    let [posts, following, followers] = read_counts(&document)?;

    if posts == 0 {
        return Err(FetchError::Empty("posts"));
    }
    if following == 0 {
        return Err(FetchError::Empty("following"));
    }
    if followers == 0 {
        return Err(FetchError::Empty("followers"));
    }

    Ok(ProfileStats {
        followers,
        following,
        posts,
        impressions: estimate_impressions(&document)?,
    })
}

/// Sums the engagement counters of the most recent timeline entries.
fn estimate_impressions(document: &Html) -> Result<u64, FetchError> {
    let item = selector("div.timeline-item")?;
    let counter = selector(".icon-container")?;

    let engagement = document
        .select(&item)
        .take(TIMELINE_SAMPLE)
        .flat_map(|tweet| tweet.select(&counter).collect::<Vec<_>>())
        .map(|container| parse_number(&element_text(&container)))
        .fold(0u64, |acc, value| acc.saturating_add(value));

    Ok(floor_impressions(engagement.saturating_mul(ENGAGEMENT_MULTIPLIER)))
}

/// Reads posts, following and followers. Labelled list items win; the bare
/// stat order is only used when the page carries no labels at all.
fn read_counts(document: &Html) -> Result<[u64; 3], FetchError> {
    let mut labelled = Vec::with_capacity(STATS.len());
    for (_, css) in STATS {
        let found = selector(css)?;
        labelled.push(document.select(&found).next());
    }

    let elements: Vec<Option<ElementRef<'_>>> = if labelled.iter().any(Option::is_some) {
        labelled
    } else {
        let stat_num = selector("span.profile-stat-num")?;
        let mut positional = document.select(&stat_num);
        STATS.iter().map(|_| positional.next()).collect()
    };

    let mut counts = [0u64; 3];
    for ((count, element), (field, _)) in counts.iter_mut().zip(elements).zip(STATS) {
        let element = element.ok_or(FetchError::MissingField(field))?;
        *count = parse_count(&element_text(&element))
            .map_err(|source| FetchError::Malformed { field, source })?;
    }
    Ok(counts)
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|err| FetchError::Unexpected(format!("invalid selector {}: {}", css, err)))
}
