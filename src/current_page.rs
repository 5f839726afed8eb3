/// Decide which page the popup is about and whether it can be rated
use crate::article::is_article_url;
use crate::host::TabQuery;
use crate::messaging::{ContentRequest, MessageChannel};

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPage {
    pub url: Option<String>,
    pub is_article: bool,
}

impl CurrentPage {
    fn unknown() -> CurrentPage {
        CurrentPage {
            url: None,
            is_article: false,
        }
    }
}

/// Resolve the current page
///
/// Algorithm:
/// 1. Without the host's tab API, classify `fallback_location` by URL alone
/// 2. Otherwise take the active tab; no tab or URL means nothing to rate
/// 3. A URL that looks like an article is accepted without touching the DOM
/// 4. Otherwise ask the tab's content script; no answer means not an article
pub async fn resolve_current_page(
    tabs: Option<&dyn TabQuery>,
    channel: Option<&dyn MessageChannel>,
    fallback_location: Option<String>,
) -> CurrentPage {
    let Some(tabs) = tabs else {
        return match fallback_location {
            Some(url) => CurrentPage {
                is_article: is_article_url(&url),
                url: Some(url),
            },
            None => CurrentPage::unknown(),
        };
    };

    let tab = match tabs.active_tab().await {
        Ok(Some(tab)) => tab,
        Ok(None) => return CurrentPage::unknown(),
        Err(e) => {
            log::warn!("Failed to query active tab: {}", e);
            return CurrentPage::unknown();
        }
    };

    let (Some(url), Some(tab_id)) = (tab.url, tab.id) else {
        return CurrentPage::unknown();
    };

    if is_article_url(&url) {
        return CurrentPage {
            url: Some(url),
            is_article: true,
        };
    }

    let is_article = match channel {
        Some(channel) => match channel.send_to_tab(tab_id, ContentRequest::CheckIsArticle).await {
            Ok(response) => {
                if let Some(error) = &response.error {
                    log::warn!("Content script failed to classify {}: {}", url, error);
                }
                response.is_article
            }
            // No content script on chrome:// pages and the like
            Err(e) => {
                log::debug!("No article check for {}: {}", url, e);
                false
            }
        },
        None => false,
    };

    CurrentPage {
        url: Some(url),
        is_article,
    }
}
