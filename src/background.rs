/// Background service worker: keeps the badge in sync with the active tab
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpRatingsApi;
use crate::badge::BadgeSynchronizer;
use crate::chrome::{
    self, ChromeAction, ChromeTabs, parse_active_info, parse_tab, parse_tab_change,
};
use crate::config::Config;
use crate::error::HostError;
use crate::host::BadgeTarget;

pub fn start() {
    let Some(tabs) = ChromeTabs::available() else {
        log::warn!("{}; badge updates disabled", HostError::Unavailable("chrome.tabs"));
        return;
    };

    let target = ChromeAction::available().map(|action| Box::new(action) as Box<dyn BadgeTarget>);
    let sync = Rc::new(BadgeSynchronizer::new(
        HttpRatingsApi::new(Config::from_env()),
        Box::new(tabs),
        target,
    ));

    let on_installed = {
        let sync = sync.clone();
        Closure::wrap(Box::new(move |_details: JsValue| {
            let sync = sync.clone();
            spawn_local(async move { sync.on_installed().await });
        }) as Box<dyn FnMut(JsValue)>)
    };

    let on_updated = {
        let sync = sync.clone();
        Closure::wrap(Box::new(move |_tab_id: i32, change_info: JsValue, tab: JsValue| {
            let sync = sync.clone();
            let change = parse_tab_change(change_info);
            let tab = parse_tab(tab);
            spawn_local(async move { sync.on_tab_updated(change.status.as_deref(), &tab).await });
        }) as Box<dyn FnMut(i32, JsValue, JsValue)>)
    };

    let on_activated = {
        let sync = sync.clone();
        Closure::wrap(Box::new(move |active_info: JsValue| match parse_active_info(active_info) {
            Ok(info) => {
                let sync = sync.clone();
                spawn_local(async move { sync.on_tab_activated(info.tab_id).await });
            }
            Err(e) => log::warn!("Ignoring tab activation: {}", e),
        }) as Box<dyn FnMut(JsValue)>)
    };

    chrome::add_installed_listener(&on_installed);
    chrome::add_tab_updated_listener(&on_updated);
    chrome::add_tab_activated_listener(&on_activated);

    // Listeners live as long as the service worker
    on_installed.forget();
    on_updated.forget();
    on_activated.forget();

    log::info!("Badge synchronizer started");
}
