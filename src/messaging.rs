/// Request/response messages between the popup/background and the content script
use async_trait::async_trait;
use futures::channel::{mpsc, oneshot};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::article::{PageDocument, detect_signal};
use crate::error::HostError;

/// Requests understood by the content script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ContentRequest {
    #[serde(rename = "checkIsArticle")]
    CheckIsArticle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub is_article: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ContentResponse {
    pub fn answer(is_article: bool) -> ContentResponse {
        ContentResponse {
            is_article,
            error: None,
            stack: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> ContentResponse {
        ContentResponse {
            is_article: false,
            error: Some(message.into()),
            stack: None,
        }
    }
}

/// Answer a request against the given document (content script side)
pub fn handle_request<D: PageDocument>(request: ContentRequest, doc: Option<&D>) -> ContentResponse {
    match request {
        ContentRequest::CheckIsArticle => match doc {
            Some(doc) => {
                let signal = detect_signal(doc);
                log::debug!("Article check for {}: {:?}", doc.location(), signal);
                ContentResponse::answer(signal.is_some())
            }
            None => ContentResponse::failure("No document available"),
        },
    }
}

/// Send a request to the content script of a tab and wait for its single reply
#[async_trait(?Send)]
pub trait MessageChannel {
    async fn send_to_tab(&self, tab_id: i32, request: ContentRequest) -> Result<ContentResponse, HostError>;
}

type Envelope = (i32, ContentRequest, oneshot::Sender<ContentResponse>);

/// Requesting half of an in-process channel
#[derive(Clone)]
pub struct LocalRequester {
    sender: mpsc::UnboundedSender<Envelope>,
}

/// Responding half of an in-process channel
pub struct LocalResponder {
    receiver: mpsc::UnboundedReceiver<Envelope>,
}

/// In-process request/reply channel, one reply per request
pub fn local_channel() -> (LocalRequester, LocalResponder) {
    let (sender, receiver) = mpsc::unbounded();
    (LocalRequester { sender }, LocalResponder { receiver })
}

#[async_trait(?Send)]
impl MessageChannel for LocalRequester {
    async fn send_to_tab(&self, tab_id: i32, request: ContentRequest) -> Result<ContentResponse, HostError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .unbounded_send((tab_id, request, reply))
            .map_err(|_| HostError::ChannelClosed)?;
        response.await.map_err(|_| HostError::ChannelClosed)
    }
}

impl LocalResponder {
    /// Answer requests until every requester is dropped
    pub async fn serve<F>(mut self, mut handler: F)
    where
        F: FnMut(i32, ContentRequest) -> ContentResponse,
    {
        while let Some((tab_id, request, reply)) = self.receiver.next().await {
            // The requester may have given up; nothing to do then.
            let _ = reply.send(handler(tab_id, request));
        }
    }
}
