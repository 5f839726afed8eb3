/// Toolbar badge showing how many ratings the current page has
use crate::api::{RatingsApi, fetch_page_stats};
use crate::article::is_article_url;
use crate::host::{BadgeTarget, TabQuery};
use crate::page_data::TabInfo;

pub const BADGE_COLOR: &str = "#3b82f6";

/// What the badge should display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeState {
    pub text: String,
    pub background_color: Option<&'static str>,
}

impl BadgeState {
    pub fn cleared() -> BadgeState {
        BadgeState::default()
    }

    pub fn for_total(total_ratings: u32) -> BadgeState {
        BadgeState {
            text: calculate_badge_text(total_ratings),
            background_color: (total_ratings > 0).then_some(BADGE_COLOR),
        }
    }

    pub fn apply(&self, target: &dyn BadgeTarget) {
        target.set_badge_text(&self.text);
        if let Some(color) = self.background_color {
            target.set_badge_background_color(color);
        }
    }
}

/// Badge text for a rating count: "" for 0, the count up to 99, then "99+"
pub fn calculate_badge_text(total_ratings: u32) -> String {
    match total_ratings {
        0 => String::new(),
        1..=99 => total_ratings.to_string(),
        _ => "99+".to_string(),
    }
}

/// Refresh the badge for a URL
///
/// Algorithm:
/// 1. No URL or no badge target → nothing to do
/// 2. URL does not look like an article → clear, without any request
/// 3. Stats unavailable → clear
/// 4. Otherwise show the count (colored when non-zero)
pub async fn update_badge_for_url<A: RatingsApi + ?Sized>(
    url: Option<&str>,
    target: Option<&dyn BadgeTarget>,
    api: &A,
) {
    let (Some(url), Some(target)) = (url.filter(|url| !url.is_empty()), target) else {
        return;
    };

    if !is_article_url(url) {
        log::debug!("Not an article, clearing badge: {}", url);
        BadgeState::cleared().apply(target);
        return;
    }

    let state = match fetch_page_stats(api, url).await {
        Some(data) => BadgeState::for_total(data.stats.total_ratings),
        None => BadgeState::cleared(),
    };

    log::debug!("Badge for {}: {:?}", url, state);
    state.apply(target);
}

/// Background-side wiring of the badge triggers
pub struct BadgeSynchronizer<A> {
    api: A,
    tabs: Box<dyn TabQuery>,
    target: Option<Box<dyn BadgeTarget>>,
}

impl<A: RatingsApi> BadgeSynchronizer<A> {
    pub fn new(api: A, tabs: Box<dyn TabQuery>, target: Option<Box<dyn BadgeTarget>>) -> Self {
        BadgeSynchronizer { api, tabs, target }
    }

    async fn update(&self, url: Option<&str>) {
        update_badge_for_url(url, self.target.as_deref(), &self.api).await;
    }

    /// Extension installed: badge the active tab
    pub async fn on_installed(&self) {
        match self.tabs.active_tab().await {
            Ok(tab) => self.update(tab.as_ref().and_then(|t| t.url.as_deref())).await,
            Err(e) => log::warn!("Failed to query active tab: {}", e),
        }
    }

    /// Tab updated: only finished navigations count
    pub async fn on_tab_updated(&self, status: Option<&str>, tab: &TabInfo) {
        if status == Some("complete") {
            self.update(tab.url.as_deref()).await;
        }
    }

    /// Active tab changed
    pub async fn on_tab_activated(&self, tab_id: i32) {
        match self.tabs.get_tab(tab_id).await {
            Ok(tab) => self.update(tab.as_ref().and_then(|t| t.url.as_deref())).await,
            Err(e) => log::warn!("Failed to get tab {}: {}", tab_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::FakeRatingsApi;
    use crate::error::ApiError;
    use crate::host::fakes::{BadgeCall, FakeTabs, RecordingBadge};
    use futures::executor::block_on;
    use std::rc::Rc;

    const ARTICLE: &str = "https://news.example.com/2025/10/big-story";

    fn text(s: &str) -> BadgeCall {
        BadgeCall::Text(s.to_string())
    }

    fn color() -> BadgeCall {
        BadgeCall::Color(BADGE_COLOR.to_string())
    }

    #[test]
    fn test_calculate_badge_text() {
        assert_eq!(calculate_badge_text(0), "");
        assert_eq!(calculate_badge_text(1), "1");
        assert_eq!(calculate_badge_text(99), "99");
        assert_eq!(calculate_badge_text(100), "99+");
        assert_eq!(calculate_badge_text(1000), "99+");
    }

    #[test]
    fn test_missing_url_or_target_is_noop() {
        let api = FakeRatingsApi::with_total(5);
        let badge = RecordingBadge::default();

        block_on(update_badge_for_url(None, Some(&badge), &api));
        block_on(update_badge_for_url(Some(""), Some(&badge), &api));
        block_on(update_badge_for_url(Some(ARTICLE), None, &api));

        assert!(badge.calls().is_empty());
        assert_eq!(api.check_calls.get(), 0);
    }

    #[test]
    fn test_non_article_clears_without_fetching() {
        let api = FakeRatingsApi::with_total(5);
        let badge = RecordingBadge::default();

        block_on(update_badge_for_url(Some("https://example.com/news"), Some(&badge), &api));

        assert_eq!(badge.calls(), vec![text("")]);
        assert_eq!(api.check_calls.get(), 0);
    }

    #[test]
    fn test_fetch_failure_clears_without_color() {
        let api = FakeRatingsApi::returning(Err(ApiError::Status(500)));
        let badge = RecordingBadge::default();

        block_on(update_badge_for_url(Some(ARTICLE), Some(&badge), &api));

        assert_eq!(badge.calls(), vec![text("")]);
        assert_eq!(api.check_calls.get(), 1);
    }

    #[test]
    fn test_article_with_ratings() {
        let api = FakeRatingsApi::with_total(42);
        let badge = RecordingBadge::default();

        block_on(update_badge_for_url(Some(ARTICLE), Some(&badge), &api));

        assert_eq!(badge.calls(), vec![text("42"), color()]);
    }

    #[test]
    fn test_article_with_many_ratings() {
        let api = FakeRatingsApi::with_total(250);
        let badge = RecordingBadge::default();

        block_on(update_badge_for_url(Some(ARTICLE), Some(&badge), &api));

        assert_eq!(badge.calls(), vec![text("99+"), color()]);
    }

    #[test]
    fn test_article_with_zero_ratings() {
        let api = FakeRatingsApi::with_total(0);
        let badge = RecordingBadge::default();

        block_on(update_badge_for_url(Some(ARTICLE), Some(&badge), &api));

        assert_eq!(badge.calls(), vec![text("")]);
    }

    /// Lets a test keep reading the badge after handing it to the synchronizer
    struct SharedBadge(Rc<RecordingBadge>);

    impl BadgeTarget for SharedBadge {
        fn set_badge_text(&self, text: &str) {
            self.0.set_badge_text(text);
        }

        fn set_badge_background_color(&self, color: &str) {
            self.0.set_badge_background_color(color);
        }
    }

    fn synchronizer(total: u32, tabs: FakeTabs) -> (BadgeSynchronizer<FakeRatingsApi>, Rc<RecordingBadge>) {
        let badge = Rc::new(RecordingBadge::default());
        let sync = BadgeSynchronizer::new(
            FakeRatingsApi::with_total(total),
            Box::new(tabs),
            Some(Box::new(SharedBadge(badge.clone()))),
        );
        (sync, badge)
    }

    #[test]
    fn test_on_installed_uses_active_tab() {
        let (sync, badge) = synchronizer(3, FakeTabs::with_active(TabInfo::new(1, ARTICLE)));

        block_on(sync.on_installed());

        assert_eq!(badge.calls(), vec![text("3"), color()]);
    }

    #[test]
    fn test_on_installed_without_tabs() {
        let (sync, badge) = synchronizer(3, FakeTabs::default());

        block_on(sync.on_installed());

        assert!(badge.calls().is_empty());
    }

    #[test]
    fn test_on_tab_updated_waits_for_complete() {
        let (sync, badge) = synchronizer(7, FakeTabs::default());
        let tab = TabInfo::new(4, ARTICLE);

        block_on(sync.on_tab_updated(Some("loading"), &tab));
        block_on(sync.on_tab_updated(None, &tab));
        assert!(badge.calls().is_empty());

        block_on(sync.on_tab_updated(Some("complete"), &tab));
        assert_eq!(badge.calls(), vec![text("7"), color()]);
    }

    #[test]
    fn test_on_tab_activated_looks_up_tab() {
        let tabs = FakeTabs {
            tabs: vec![TabInfo::new(1, "https://example.com/"), TabInfo::new(2, ARTICLE)],
            fail: false,
        };
        let (sync, badge) = synchronizer(12, tabs);

        block_on(sync.on_tab_activated(2));
        block_on(sync.on_tab_activated(1));

        assert_eq!(badge.calls(), vec![text("12"), color(), text("")]);
    }

    #[test]
    fn test_on_tab_activated_host_error() {
        let tabs = FakeTabs {
            tabs: Vec::new(),
            fail: true,
        };
        let (sync, badge) = synchronizer(12, tabs);

        block_on(sync.on_tab_activated(2));

        assert!(badge.calls().is_empty());
    }
}
