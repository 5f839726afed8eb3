/// Popup state machine for rating the current page
use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::api::RatingsApi;
use crate::host::Delay;
use crate::page_data::{PageCheckResult, normalize_comment};

/// How long the success banner stays up before the form comes back
pub const SUCCESS_RESET_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Idle,
    Submitting,
    Error,
    Success,
}

/// Snapshot handed to the UI on every transition
#[derive(Debug, Clone, PartialEq)]
pub struct PageDataState {
    pub status: ViewState,
    pub data: Option<PageCheckResult>,
    pub error: Option<String>,
}

impl PageDataState {
    /// A page without a known URL cannot be checked, so it starts idle
    pub fn initial(url_known: bool) -> PageDataState {
        PageDataState {
            status: if url_known { ViewState::Loading } else { ViewState::Idle },
            data: None,
            error: None,
        }
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.status = ViewState::Error;
    }
}

/// Owns the rating state of one popup and drives it through the API
///
/// Transitions:
/// - Loading → Idle (data loaded) or Error
/// - Idle / Error / Success → Submitting → Success or Error
/// - Success → Idle after `SUCCESS_RESET_DELAY`
pub struct PageDataController<A, D> {
    api: A,
    delay: D,
    url: Option<String>,
    state: RefCell<PageDataState>,
    /// Bumped on every successful submission; a reset timer only applies to its own
    successes: Cell<u64>,
    observer: Box<dyn Fn(&PageDataState)>,
}

impl<A: RatingsApi, D: Delay> PageDataController<A, D> {
    pub fn new(api: A, delay: D, url: Option<String>, observer: Box<dyn Fn(&PageDataState)>) -> Self {
        PageDataController {
            api,
            delay,
            state: RefCell::new(PageDataState::initial(url.is_some())),
            url,
            successes: Cell::new(0),
            observer,
        }
    }

    pub fn state(&self) -> PageDataState {
        self.state.borrow().clone()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn update(&self, change: impl FnOnce(&mut PageDataState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            change(&mut state);
            state.clone()
        };
        (self.observer)(&snapshot);
    }

    /// Fetch the page's stats and the user's rating
    pub async fn load(&self) {
        let Some(url) = self.url.as_deref() else {
            return;
        };

        self.update(|state| {
            state.status = ViewState::Loading;
            state.error = None;
        });

        match self.api.check_page(url).await {
            Ok(data) => self.update(|state| {
                state.data = Some(data);
                state.status = ViewState::Idle;
            }),
            Err(e) => {
                log::warn!("Failed to load page data for {}: {}", url, e);
                self.update(|state| state.fail(e.to_string()));
            }
        }
    }

    /// Submit a rating and merge the returned stats into the loaded data
    pub async fn submit_rating(&self, score: u8, comment: &str) {
        let Some(url) = self.url.as_deref() else {
            return;
        };

        let status = self.state.borrow().status;
        if matches!(status, ViewState::Loading | ViewState::Submitting) {
            log::debug!("Ignoring submit while {:?}", status);
            return;
        }

        self.update(|state| {
            state.status = ViewState::Submitting;
            state.error = None;
        });

        match self.api.submit_rating(url, score, comment).await {
            Ok(stats) => {
                self.update(|state| {
                    state.data = state
                        .data
                        .as_ref()
                        .map(|data| data.with_submission(stats, score, normalize_comment(comment)));
                    state.status = ViewState::Success;
                });
                let success = self.successes.get() + 1;
                self.successes.set(success);

                self.delay.sleep(SUCCESS_RESET_DELAY).await;

                let current = self.successes.get() == success;
                if current && self.state.borrow().status == ViewState::Success {
                    self.update(|state| state.status = ViewState::Idle);
                }
            }
            Err(e) => {
                log::warn!("Failed to submit rating for {}: {}", url, e);
                self.update(|state| state.fail(e.to_string()));
            }
        }
    }
}
