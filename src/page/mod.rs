// src/page/mod.rs
// =============================================================================
// Everything about the page being analyzed, before any link is checked.
//
// Submodules:
// - fetch: downloads the page through the shared HTTP client
// - headers: browser-like request headers (randomized User-Agent)
// - parse: turns the response body into a DOM tree
// - extract: walks the tree once and records the page structure
// =============================================================================

mod extract;
mod fetch;
mod headers;
mod parse;

pub use extract::{extract_structure, resolve_link};
pub use fetch::{build_client, fetch_page, FetchedPage};
pub use headers::{browser_headers, random_user_agent, USER_AGENTS};
pub use parse::parse_document;
