/// Capabilities the core logic needs from the extension host
use std::time::Duration;

use async_trait::async_trait;

use crate::error::HostError;
use crate::page_data::TabInfo;

/// Tab lookups (`chrome.tabs`)
#[async_trait(?Send)]
pub trait TabQuery {
    /// The active tab of the current window
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError>;

    async fn get_tab(&self, tab_id: i32) -> Result<Option<TabInfo>, HostError>;
}

/// Toolbar badge (`chrome.action`)
pub trait BadgeTarget {
    fn set_badge_text(&self, text: &str);
    fn set_badge_background_color(&self, color: &str);
}

/// Timer used for transient UI states
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}
