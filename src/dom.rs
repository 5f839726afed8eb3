/// `PageDocument` backed by the live DOM (content script only)
use crate::article::PageDocument;
use web_sys::Document;

pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> WebDocument {
        WebDocument { document }
    }

    /// The document of the current window, if there is one
    pub fn current() -> Option<WebDocument> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(WebDocument::new)
    }
}

impl PageDocument for WebDocument {
    fn has_meta(&self, property: &str, content: &str) -> bool {
        let selector = format!(r#"meta[property="{}"][content="{}"]"#, property, content);
        matches!(self.document.query_selector(&selector), Ok(Some(_)))
    }

    fn json_ld_blocks(&self) -> Vec<String> {
        let scripts = match self
            .document
            .query_selector_all(r#"script[type="application/ld+json"]"#)
        {
            Ok(scripts) => scripts,
            Err(e) => {
                log::warn!("Failed to query JSON-LD scripts: {:?}", e);
                return Vec::new();
            }
        };

        (0..scripts.length())
            .filter_map(|i| scripts.item(i))
            .filter_map(|node| node.text_content())
            .collect()
    }

    fn location(&self) -> String {
        self.document
            .location()
            .and_then(|location| location.href().ok())
            .unwrap_or_default()
    }
}
