// src/checker/http.rs
// =============================================================================
// This module checks whether the links found on a page are reachable.
//
// For every link we:
// 1. Decide whether it is internal (same host as the page) or external
// 2. Send a HEAD request (no body transfer) and look at the status code
//
// Many links are checked concurrently, but never more than a fixed number at
// the same time, so a page with thousands of links doesn't turn into
// thousands of simultaneous requests. The whole phase shares one deadline:
// when it passes, probes still running are dropped (which aborts their
// requests) and counted as inaccessible. The caller always gets counts back.
//
// Rust concepts:
// - Streams: futures::stream turns an iterator into async work items
// - buffer_unordered: runs up to N futures at once, yielding in finish order
// - tokio::select!: wait on whichever of several futures finishes first
// - Generics with Fn bounds: the probe itself is pluggable (tests use fakes)
// =============================================================================

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info};
use reqwest::Client;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What we learned about one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOutcome {
    pub is_internal: bool,
    pub is_accessible: bool,
}

/// Aggregated counts over all checked links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub internal: usize,
    pub external: usize,
    pub inaccessible_internal: usize,
    pub inaccessible_external: usize,
}

impl LinkTally {
    // Every outcome lands in exactly one of internal/external; only the
    // inaccessible ones also bump the matching inaccessible counter.
    pub fn record(&mut self, outcome: LinkOutcome) {
        if outcome.is_internal {
            self.internal += 1;
            if !outcome.is_accessible {
                self.inaccessible_internal += 1;
            }
        } else {
            self.external += 1;
            if !outcome.is_accessible {
                self.inaccessible_external += 1;
            }
        }
    }

    pub fn total(&self) -> usize {
        self.internal + self.external
    }
}

impl Extend<LinkOutcome> for LinkTally {
    fn extend<I: IntoIterator<Item = LinkOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}

impl FromIterator<LinkOutcome> for LinkTally {
    fn from_iter<I: IntoIterator<Item = LinkOutcome>>(iter: I) -> Self {
        let mut tally = LinkTally::default();
        tally.extend(iter);
        tally
    }
}

/// Probes every link found on one page.
///
/// Cheap to construct; the analyzer builds one per analysis around the
/// shared client, so limits and deadlines never leak between requests.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    max_in_flight: usize,
    deadline: Duration,
}

impl LinkChecker {
    pub fn new(client: Client, max_in_flight: usize, deadline: Duration) -> Self {
        Self {
            client,
            max_in_flight,
            deadline,
        }
    }

    // Checks all links and returns the aggregated counts
    pub async fn check_links(&self, links: &[String], base: &Url) -> LinkTally {
        self.check_links_until(links, base, CancellationToken::new())
            .await
    }

    // Same as check_links, but `cancel` can end the phase early
    //
    // Cancelling has the same effect as the deadline passing: outstanding
    // probes are dropped and reported as inaccessible.
    pub async fn check_links_until(
        &self,
        links: &[String],
        base: &Url,
        cancel: CancellationToken,
    ) -> LinkTally {
        let client = &self.client;
        let tally = run_probes(
            links,
            base,
            self.max_in_flight,
            self.deadline,
            cancel,
            |url| probe_link(client, url),
        )
        .await;

        info!(
            "Checked {} links: internal={} external={} inaccessible_internal={} inaccessible_external={}",
            tally.total(),
            tally.internal,
            tally.external,
            tally.inaccessible_internal,
            tally.inaccessible_external
        );
        tally
    }
}

// Internal means: no host at all (mailto:, relative leftovers) or the same
// host and port as the page. Plain string comparison, no case folding
// beyond what URL parsing already did.
pub fn is_internal(link: &Url, base: &Url) -> bool {
    match link.host_str() {
        None | Some("") => true,
        Some(host) => Some(host) == base.host_str() && link.port() == base.port(),
    }
}

// Sends one HEAD request; reachable means "got a response below 400"
async fn probe_link(client: &Client, url: Url) -> bool {
    match client.head(url.as_str()).send().await {
        Ok(response) => {
            let status = response.status();
            debug!("Probed link url={} status={}", url, status.as_u16());
            status.as_u16() < 400
        }
        Err(e) => {
            debug!("Probe failed url={} error={}", url, e);
            false
        }
    }
}

// Runs `probe` for every link with bounded concurrency and a shared deadline
//
// The deadline clock starts when this function is called. All probes are
// awaited before the counts are folded, so every link ends up with either
// its real outcome or the "inaccessible" fallback.
pub(crate) async fn run_probes<F, Fut>(
    links: &[String],
    base: &Url,
    max_in_flight: usize,
    deadline: Duration,
    cancel: CancellationToken,
    probe: F,
) -> LinkTally
where
    F: Fn(Url) -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline_at = Instant::now() + deadline;
    let probe = &probe;

    // Links are cloned into the stream so each check owns its input; a
    // closure over borrowed items would make the whole future non-Send.
    let checks = links
        .iter()
        .cloned()
        .map(|link| check_one(link, base, deadline_at, cancel.clone(), probe));

    stream::iter(checks)
        .buffer_unordered(max_in_flight.max(1))
        .collect::<LinkTally>()
        .await
}

// Classifies and probes a single link
async fn check_one<F, Fut>(
    link: String,
    base: &Url,
    deadline_at: Instant,
    cancel: CancellationToken,
    probe: &F,
) -> LinkOutcome
where
    F: Fn(Url) -> Fut,
    Fut: Future<Output = bool>,
{
    let url = match Url::parse(&link) {
        Ok(url) => url,
        Err(e) => {
            debug!("Unparseable link counted as external link={:?} error={}", link, e);
            return LinkOutcome {
                is_internal: false,
                is_accessible: false,
            };
        }
    };
    let internal = is_internal(&url, base);

    // Admitted too late: no point starting a request
    if cancel.is_cancelled() || Instant::now() >= deadline_at {
        return LinkOutcome {
            is_internal: internal,
            is_accessible: false,
        };
    }

    let is_accessible = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Probe cancelled url={}", url);
            false
        }
        result = tokio::time::timeout_at(deadline_at, probe(url.clone())) => {
            result.unwrap_or_else(|_| {
                debug!("Probe hit the check deadline url={}", url);
                false
            })
        }
    };

    LinkOutcome {
        is_internal: internal,
        is_accessible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base() -> Url {
        Url::parse("https://ex.com/page").unwrap()
    }

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_is_internal() {
        let base = base();
        assert!(is_internal(&Url::parse("https://ex.com/about").unwrap(), &base));
        assert!(is_internal(&Url::parse("http://ex.com/").unwrap(), &base));
        assert!(is_internal(&Url::parse("mailto:me@ex.com").unwrap(), &base));
        assert!(!is_internal(&Url::parse("https://other.com/y").unwrap(), &base));
        assert!(!is_internal(&Url::parse("https://www.ex.com/").unwrap(), &base));
        assert!(!is_internal(&Url::parse("https://ex.com:8443/").unwrap(), &base));
    }

    #[tokio::test]
    async fn test_relative_href_resolves_to_internal_link() {
        let base = base();
        let mut links = Vec::new();
        {
            let document = scraper::Html::parse_document(
                r#"<a href="/about">About</a><a href="https://other.com/y">Other</a>"#,
            );
            let mut report = crate::report::AnalysisReport::default();
            crate::page::extract_structure(&document, &base, &mut report, &mut links);
        }
        assert_eq!(links, vec!["https://ex.com/about", "https://other.com/y"]);

        let tally = run_probes(
            &links,
            &base,
            4,
            Duration::from_secs(5),
            CancellationToken::new(),
            |_| async { true },
        )
        .await;

        assert_eq!(tally.internal, 1);
        assert_eq!(tally.external, 1);
        assert_eq!(tally.inaccessible_internal + tally.inaccessible_external, 0);
    }

    #[test]
    fn test_tally_record() {
        let tally: LinkTally = vec![
            LinkOutcome { is_internal: true, is_accessible: true },
            LinkOutcome { is_internal: true, is_accessible: false },
            LinkOutcome { is_internal: false, is_accessible: false },
            LinkOutcome { is_internal: false, is_accessible: true },
            LinkOutcome { is_internal: false, is_accessible: true },
        ]
        .into_iter()
        .collect();

        assert_eq!(tally.internal, 2);
        assert_eq!(tally.external, 3);
        assert_eq!(tally.inaccessible_internal, 1);
        assert_eq!(tally.inaccessible_external, 1);
        assert_eq!(tally.total(), 5);
    }

    #[tokio::test]
    async fn test_probe_results_are_classified() {
        let urls = links(&[
            "https://ex.com/ok",
            "https://ex.com/broken",
            "https://other.com/ok",
            "https://other.com/broken",
        ]);

        let tally = run_probes(
            &urls,
            &base(),
            4,
            Duration::from_secs(5),
            CancellationToken::new(),
            |url| async move { !url.path().contains("broken") },
        )
        .await;

        assert_eq!(
            tally,
            LinkTally {
                internal: 2,
                external: 2,
                inaccessible_internal: 1,
                inaccessible_external: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_unparseable_link_is_external_and_inaccessible() {
        let urls = links(&["http://[bad", "https://ex.com/fine"]);

        let tally = run_probes(
            &urls,
            &base(),
            4,
            Duration::from_secs(5),
            CancellationToken::new(),
            |_| async { true },
        )
        .await;

        assert_eq!(tally.internal, 1);
        assert_eq!(tally.external, 1);
        assert_eq!(tally.inaccessible_external, 1);
        assert_eq!(tally.inaccessible_internal, 0);
    }

    #[tokio::test]
    async fn test_in_flight_probes_never_exceed_limit() {
        let limit = 3;
        let urls: Vec<String> = (0..20).map(|i| format!("https://ex.com/{}", i)).collect();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tally = run_probes(
            &urls,
            &base(),
            limit,
            Duration::from_secs(10),
            CancellationToken::new(),
            |_| {
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    true
                }
            },
        )
        .await;

        assert_eq!(tally.internal, 20);
        assert_eq!(tally.inaccessible_internal, 0);
        assert!(max_seen.load(Ordering::SeqCst) <= limit);
        assert!(max_seen.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_deadline_marks_outstanding_probes_inaccessible() {
        let urls = links(&[
            "https://ex.com/a",
            "https://ex.com/b",
            "https://other.com/c",
        ]);
        let started = std::time::Instant::now();

        let tally = run_probes(
            &urls,
            &base(),
            2,
            Duration::from_millis(100),
            CancellationToken::new(),
            |_| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                true
            },
        )
        .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(tally.internal, 2);
        assert_eq!(tally.external, 1);
        assert_eq!(tally.inaccessible_internal, 2);
        assert_eq!(tally.inaccessible_external, 1);
    }

    #[tokio::test]
    async fn test_cancel_before_any_probe_completes() {
        let urls: Vec<String> = (0..50).map(|i| format!("https://other.com/{}", i)).collect();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let tally = run_probes(
            &urls,
            &base(),
            8,
            Duration::from_secs(60),
            cancel,
            |_| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                true
            },
        )
        .await;

        assert_eq!(tally.external, 50);
        assert_eq!(tally.inaccessible_external, 50);
    }

    #[tokio::test]
    async fn test_no_links_gives_zero_counts() {
        let tally = run_probes(
            &[],
            &base(),
            64,
            Duration::from_secs(1),
            CancellationToken::new(),
            |_| async { true },
        )
        .await;
        assert_eq!(tally, LinkTally::default());
    }

    #[tokio::test]
    async fn test_head_probes_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let urls = vec![
            format!("{}/ok", server.uri()),
            format!("{}/moved", server.uri()),
            format!("{}/gone", server.uri()),
            // Nothing mounted: wiremock answers 404
            format!("{}/missing", server.uri()),
        ];

        let checker = LinkChecker::new(Client::new(), 64, Duration::from_secs(5));
        let tally = checker.check_links(&urls, &base).await;

        assert_eq!(tally.internal, 4);
        assert_eq!(tally.inaccessible_internal, 2);
        assert_eq!(tally.external, 0);
    }
}
