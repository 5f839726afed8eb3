/// Article detection heuristics
use serde_json::Value;
use url::Url;

/// JSON-LD `@type` values that mark a page as an article
const ARTICLE_TYPES: [&str; 2] = ["Article", "NewsArticle"];

/// Which heuristic identified a page as an article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSignal {
    MetaTag,
    StructuredData,
    UrlDepth,
}

/// Read-only view of the page the classifier needs
pub trait PageDocument {
    /// True if a `<meta property=.. content=..>` pair exists
    fn has_meta(&self, property: &str, content: &str) -> bool;

    /// Text of every `<script type="application/ld+json">` element, in document order
    fn json_ld_blocks(&self) -> Vec<String>;

    /// Absolute URL of the document
    fn location(&self) -> String;
}

/// Check whether a URL looks like an article from its path alone
///
/// Algorithm:
/// 1. Parse the URL (anything that is not an absolute URL is not an article)
/// 2. Split the path on "/" and drop empty segments
/// 3. More than 2 segments means article
///
/// Examples:
/// - https://www.nytimes.com/2025/10/my-post → true
/// - https://www.nytimes.com/section/world → false
/// - https://example.com/ → false
pub fn is_article_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => path_depth(parsed.path()) > 2,
        Err(_) => false,
    }
}

fn path_depth(path: &str) -> usize {
    path.split('/').filter(|segment| !segment.is_empty()).count()
}

/// Check the loaded document for article signals
pub fn is_article(doc: &impl PageDocument) -> bool {
    detect_signal(doc).is_some()
}

/// Return the first article signal that fires, in priority order:
/// Open Graph meta tag, JSON-LD structured data, URL depth.
pub fn detect_signal(doc: &impl PageDocument) -> Option<ClassificationSignal> {
    if doc.has_meta("og:type", "article") {
        return Some(ClassificationSignal::MetaTag);
    }

    if doc.json_ld_blocks().iter().any(|block| json_ld_is_article(block)) {
        return Some(ClassificationSignal::StructuredData);
    }

    if is_article_url(&doc.location()) {
        return Some(ClassificationSignal::UrlDepth);
    }

    None
}

/// Check one JSON-LD block; invalid JSON is simply not an article
fn json_ld_is_article(block: &str) -> bool {
    if block.trim().is_empty() {
        return false;
    }

    let data: Value = match serde_json::from_str(block) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("Skipping invalid JSON-LD block: {}", e);
            return false;
        }
    };

    match &data {
        Value::Array(items) => items.iter().any(has_article_type),
        item => has_article_type(item),
    }
}

fn has_article_type(item: &Value) -> bool {
    item.get("@type")
        .and_then(Value::as_str)
        .map_or(false, |kind| ARTICLE_TYPES.contains(&kind))
}
