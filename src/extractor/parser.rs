//! HTML extraction engine
//!
//! Pure functions from a parsed document and a keyword list to an
//! [`ExtractResult`]:
//! - Page title (first `<title>`)
//! - Meta descriptions (`<meta name="description" content="...">`)
//! - Outbound links (`<a href="...">`, verbatim)
//! - Keyword occurrence counts over the document text

use crate::extractor::{CachedPage, ExtractResult, KeywordCounts};
use scraper::{Html, Selector};

/// Parses an HTML string into a traversable document
///
/// Parsing is lenient: malformed markup is repaired the way a browser would,
/// so this never fails once the body has been read.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Extracts every structured field from a parsed document
///
/// # Arguments
///
/// * `document` - The parsed HTML document
/// * `url` - The URL the document was fetched from, copied into the result
/// * `keywords` - Keywords to count; each appears in the result even at zero
///
/// # Example
///
/// ```
/// use domain_crawler::extractor::{extract, parse_document};
///
/// let html = r#"<html><head><title>Test</title></head><body>rust and rust</body></html>"#;
/// let document = parse_document(html);
/// let result = extract(&document, "https://example.com/", &["rust".to_string()]);
/// assert_eq!(result.title, "Test");
/// assert_eq!(result.keyword_counts["rust"], 2);
/// ```
pub fn extract(document: &Html, url: &str, keywords: &[String]) -> ExtractResult {
    extract_page(document, url, keywords).result
}

/// Like [`extract`], but also keeps the document text for later recounts
pub fn extract_page(document: &Html, url: &str, keywords: &[String]) -> CachedPage {
    let text = document_text(document);

    CachedPage {
        result: ExtractResult {
            url: url.to_string(),
            title: extract_title(document),
            meta_descriptions: extract_meta_descriptions(document),
            links: extract_links(document),
            keyword_counts: count_keywords(&text, keywords),
        },
        text,
    }
}

/// Text of the first `<title>` element, or an empty string
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

/// `content` of each `meta[name=description]`, in document order
fn extract_meta_descriptions(document: &Html) -> Vec<String> {
    let mut descriptions = Vec::new();

    if let Ok(meta_selector) = Selector::parse(r#"meta[name="description"]"#) {
        for element in document.select(&meta_selector) {
            if let Some(content) = element.value().attr("content") {
                descriptions.push(content.to_string());
            }
        }
    }

    descriptions
}

/// `href` of each anchor, in document order, duplicates kept
fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Concatenation of every text node in the document
fn document_text(document: &Html) -> String {
    document.root_element().text().collect()
}

/// Counts each keyword in `text`
pub fn count_keywords(text: &str, keywords: &[String]) -> KeywordCounts {
    keywords
        .iter()
        .map(|keyword| (keyword.clone(), count_occurrences(text, keyword)))
        .collect()
}

/// Non-overlapping, case-sensitive substring count
///
/// `"aaaa"` contains `"aa"` twice. The empty needle counts zero.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
