// src/page/headers.rs
// =============================================================================
// Browser-like request headers for the page fetch.
//
// Some sites answer plain HTTP clients with 403 or an empty page. Sending the
// headers a desktop browser would send gets us past the most trivial bot
// filters. It is a best-effort measure, nothing more.
// =============================================================================

use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "Mozilla/5.0 (X11; Linux x86_64)",
];

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

// Picks one identity from the pool, uniformly at random
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

// Builds the header set sent with every page fetch
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_comes_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        let agent = headers.get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(USER_AGENTS.contains(&agent));
        assert_eq!(headers.get(ACCEPT).unwrap(), ACCEPT_HTML);
        assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), ACCEPT_LANGUAGE_EN);
        assert_eq!(headers.get(CONNECTION).unwrap(), "keep-alive");
    }
}
