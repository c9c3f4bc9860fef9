// src/page/extract.rs
// =============================================================================
// The structural extractor: one depth-first walk over the parsed document.
//
// Every node is visited exactly once, in document order (a node first, then
// its children left to right). Depending on what the node is we:
// - set the document version (doctype, or <html lang> as a fallback)
// - take the page title from the first <title>
// - count <h1> .. <h6>
// - collect the href of every <a>, resolved against the page URL
// - look inside every <form> for a login form (password + user field)
//
// All results go into the report and link list passed in by the caller.
// Nothing here touches the network; link checking happens afterwards.
//
// Rust concepts:
// - Explicit stack instead of recursion: very deep pages can't overflow it
// - Pattern matching on enums (scraper::Node)
// - Mutable borrows held by a small struct for the duration of the walk
// =============================================================================

use log::debug;
use scraper::{ElementRef, Html, Node};
use url::Url;

use crate::report::{AnalysisReport, DocumentVersion};

// Walks the whole document once and records what it finds
//
// Parameters:
//   document: the parsed page
//   base: the page URL, used to resolve relative hrefs
//   report: receives version, title, heading counts and the login-form flag
//   links: receives every discovered link in document order (duplicates kept)
pub fn extract_structure(
    document: &Html,
    base: &Url,
    report: &mut AnalysisReport,
    links: &mut Vec<String>,
) {
    let mut walker = Walker {
        base,
        report,
        links,
        title_seen: false,
    };

    // Children are pushed in reverse so the leftmost child is popped first,
    // which keeps the visiting order identical to a recursive pre-order walk.
    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Doctype(doctype) => walker.visit_doctype(doctype.name()),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    walker.visit_element(element);
                }
            }
            _ => {}
        }

        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }
}

struct Walker<'a> {
    base: &'a Url,
    report: &'a mut AnalysisReport,
    links: &'a mut Vec<String>,
    title_seen: bool,
}

impl Walker<'_> {
    fn visit_doctype(&mut self, name: &str) {
        if self.report.document_version.is_some() {
            return;
        }

        let version = if name.eq_ignore_ascii_case("html") {
            DocumentVersion::Html5
        } else {
            DocumentVersion::LegacyOrXhtml
        };
        self.report.document_version = Some(version);
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        match element.value().name() {
            "html" => self.visit_html(element),
            "title" => self.visit_title(element),
            "a" => self.visit_anchor(element),
            "form" => {
                if is_login_form(element) {
                    self.report.login_form_detected = true;
                }
            }
            "h1" => self.report.headings.increment(1),
            "h2" => self.report.headings.increment(2),
            "h3" => self.report.headings.increment(3),
            "h4" => self.report.headings.increment(4),
            "h5" => self.report.headings.increment(5),
            "h6" => self.report.headings.increment(6),
            _ => {}
        }
    }

    // Only used when the page has no doctype
    fn visit_html(&mut self, element: ElementRef<'_>) {
        if self.report.document_version.is_some() {
            return;
        }

        let version = if element.value().attr("lang").is_some() {
            DocumentVersion::Html5
        } else {
            DocumentVersion::LegacyOrXhtml
        };
        self.report.document_version = Some(version);
    }

    // First <title> wins; later ones (e.g. inside inline SVG) are ignored
    fn visit_title(&mut self, element: ElementRef<'_>) {
        if self.title_seen {
            return;
        }
        self.title_seen = true;

        if let Some(text) = element
            .first_child()
            .and_then(|child| child.value().as_text())
        {
            self.report.page_title = String::from(&**text);
        }
    }

    fn visit_anchor(&mut self, element: ElementRef<'_>) {
        if let Some(href) = element.value().attr("href") {
            if let Some(link) = resolve_link(self.base, href) {
                self.links.push(link);
            }
        }
    }
}

// Resolves an href against the page URL
//
// Returns None for hrefs we never count: empty ones and in-page fragments.
// Absolute hrefs come back normalized, relative ones joined onto the base.
// An href the URL parser can't make sense of is kept verbatim; the link
// checker will report it as an inaccessible external link.
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Could not resolve href={:?} base={} error={}", href, base, e);
            Some(href.to_string())
        }
    }
}

// Looks through a <form> subtree for a password input and a user input
//
// Only the `type` attribute is consulted (not names or labels), so the check
// works the same whatever language the form is written in.
fn is_login_form(form: ElementRef<'_>) -> bool {
    let mut has_password = false;
    let mut has_user_field = false;

    for node in form.descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if element.name() != "input" {
            continue;
        }

        let input_type = element
            .attr("type")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default();

        match input_type.as_str() {
            "password" => has_password = true,
            "text" | "email" => has_user_field = true,
            _ => {}
        }

        if has_password && has_user_field {
            return true;
        }
    }

    false
}
