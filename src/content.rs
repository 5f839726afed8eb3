/// Content script: answers article checks against the page's DOM
use wasm_bindgen::prelude::*;

use crate::chrome::{self, send_response};
use crate::dom::WebDocument;
use crate::error::HostError;
use crate::messaging::{ContentRequest, handle_request};

pub fn start() {
    if !chrome::has_api(&["chrome", "runtime", "onMessage"]) {
        log::warn!("{}; content script idle", HostError::Unavailable("chrome.runtime.onMessage"));
        return;
    }

    let on_message = Closure::wrap(Box::new(
        move |request: JsValue, _sender: JsValue, respond: js_sys::Function| {
            let request: ContentRequest = match serde_wasm_bindgen::from_value(request) {
                Ok(request) => request,
                // Not ours; let other listeners answer
                Err(_) => return false,
            };

            let response = handle_request(request, WebDocument::current().as_ref());
            send_response(&respond, &response);
            // Keep the channel open until the response has been sent
            true
        },
    ) as Box<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);

    chrome::add_message_listener(&on_message);
    on_message.forget();
}
