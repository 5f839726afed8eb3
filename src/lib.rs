/// WebAnnotator - rate and comment on the article open in the current tab
/// Built with Rust + WASM + Yew

pub mod api;
pub mod article;
mod background;
pub mod badge;
pub mod chrome;
pub mod config;
mod content;
pub mod current_page;
pub mod dom;
pub mod error;
pub mod host;
pub mod messaging;
pub mod page_data;
pub mod page_state;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the URL heuristic for JavaScript access
#[wasm_bindgen]
pub fn is_article_url(url: &str) -> bool {
    article::is_article_url(url)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Register the badge listeners in the background service worker
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Answer article checks from the content script
#[wasm_bindgen]
pub fn start_content_script() {
    content::start();
}
