/// Chrome extension API adapters for the host capability traits
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::HostError;
use crate::host::{BadgeTarget, Delay, TabQuery};
use crate::messaging::{ContentRequest, ContentResponse, MessageChannel};
use crate::page_data::TabInfo;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeText)]
    fn action_set_badge_text(details: JsValue);

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeBackgroundColor)]
    fn action_set_badge_background_color(details: JsValue);

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    async fn tabs_query(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = get)]
    async fn tabs_get(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    async fn tabs_send_message(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    pub fn add_installed_listener(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onUpdated"], js_name = addListener)]
    pub fn add_tab_updated_listener(callback: &Closure<dyn FnMut(i32, JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onActivated"], js_name = addListener)]
    pub fn add_tab_activated_listener(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn add_message_listener(callback: &Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);

    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &js_sys::Function, timeout_ms: i32) -> JsValue;
}

/// True if `globalThis.<path>` resolves to something
pub fn has_api(path: &[&str]) -> bool {
    let mut current: JsValue = js_sys::global().into();
    for key in path {
        match js_sys::Reflect::get(&current, &JsValue::from_str(key)) {
            Ok(value) if !value.is_undefined() && !value.is_null() => current = value,
            _ => return false,
        }
    }
    true
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, HostError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| HostError::Decode(format!("{:?}", e)))
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| HostError::Decode(format!("{:?}", e)))
}

#[derive(Serialize)]
struct BadgeText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BadgeColor<'a> {
    color: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveTabQuery {
    active: bool,
    current_window: bool,
}

/// `changeInfo` of `chrome.tabs.onUpdated`
#[derive(Debug, Default, Deserialize)]
pub struct TabChange {
    #[serde(default)]
    pub status: Option<String>,
}

/// `activeInfo` of `chrome.tabs.onActivated`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
    pub tab_id: i32,
}

pub fn parse_tab_change(value: JsValue) -> TabChange {
    from_js(value).unwrap_or_default()
}

pub fn parse_tab(value: JsValue) -> TabInfo {
    from_js(value).unwrap_or_default()
}

pub fn parse_active_info(value: JsValue) -> Result<ActiveInfo, HostError> {
    from_js(value)
}

/// `chrome.action`
pub struct ChromeAction;

impl ChromeAction {
    pub fn available() -> Option<ChromeAction> {
        has_api(&["chrome", "action", "setBadgeText"]).then_some(ChromeAction)
    }
}

impl BadgeTarget for ChromeAction {
    fn set_badge_text(&self, text: &str) {
        match to_js(&BadgeText { text }) {
            Ok(details) => action_set_badge_text(details),
            Err(e) => log::warn!("Failed to set badge text: {}", e),
        }
    }

    fn set_badge_background_color(&self, color: &str) {
        match to_js(&BadgeColor { color }) {
            Ok(details) => action_set_badge_background_color(details),
            Err(e) => log::warn!("Failed to set badge color: {}", e),
        }
    }
}

/// `chrome.tabs`
pub struct ChromeTabs;

impl ChromeTabs {
    pub fn available() -> Option<ChromeTabs> {
        has_api(&["chrome", "tabs", "query"]).then_some(ChromeTabs)
    }
}

#[async_trait(?Send)]
impl TabQuery for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        let query = to_js(&ActiveTabQuery {
            active: true,
            current_window: true,
        })?;
        let tabs_js = tabs_query(query)
            .await
            .map_err(|e| HostError::Js(format!("{:?}", e)))?;
        let tabs: Vec<TabInfo> = from_js(tabs_js)?;
        Ok(tabs.into_iter().next())
    }

    async fn get_tab(&self, tab_id: i32) -> Result<Option<TabInfo>, HostError> {
        let tab_js = tabs_get(tab_id)
            .await
            .map_err(|e| HostError::Js(format!("{:?}", e)))?;
        if tab_js.is_undefined() || tab_js.is_null() {
            return Ok(None);
        }
        Ok(Some(from_js(tab_js)?))
    }
}

/// `chrome.tabs.sendMessage`, rejected when the tab has no content script
pub struct ChromeMessaging;

impl ChromeMessaging {
    pub fn available() -> Option<ChromeMessaging> {
        has_api(&["chrome", "tabs", "sendMessage"]).then_some(ChromeMessaging)
    }
}

#[async_trait(?Send)]
impl MessageChannel for ChromeMessaging {
    async fn send_to_tab(&self, tab_id: i32, request: ContentRequest) -> Result<ContentResponse, HostError> {
        let response = tabs_send_message(tab_id, to_js(&request)?)
            .await
            .map_err(|e| HostError::Js(format!("{:?}", e)))?;
        if response.is_undefined() || response.is_null() {
            return Ok(ContentResponse::answer(false));
        }
        from_js(response)
    }
}

/// `Delay` on top of `setTimeout`
pub struct TimeoutDelay;

#[async_trait(?Send)]
impl Delay for TimeoutDelay {
    async fn sleep(&self, duration: Duration) {
        let timeout_ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            set_timeout(&resolve, timeout_ms);
        });
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("Timer failed: {:?}", e);
        }
    }
}

pub fn current_location() -> Option<String> {
    web_sys::window().and_then(|window| window.location().href().ok())
}

/// Send a response through a `sendResponse` callback
pub fn send_response(callback: &js_sys::Function, response: &ContentResponse) {
    let value = to_js(response).unwrap_or(JsValue::NULL);
    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
        log::warn!("Failed to send response: {:?}", e);
    }
}
