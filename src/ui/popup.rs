/// Popup UI for WebAnnotator

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::HttpRatingsApi;
use crate::chrome::{ChromeMessaging, ChromeTabs, TimeoutDelay, current_location};
use crate::config::Config;
use crate::current_page::{CurrentPage, resolve_current_page};
use crate::host::TabQuery;
use crate::messaging::MessageChannel;
use crate::page_state::{PageDataController, PageDataState, ViewState};
use crate::ui::components::{ReviewForm, StatsBadge};

#[function_component(App)]
pub fn app() -> Html {
    let page = use_state(|| None::<CurrentPage>);

    // Work out which page we are rating on mount
    {
        let page = page.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let tabs = ChromeTabs::available();
                let channel = ChromeMessaging::available();
                let resolved = resolve_current_page(
                    tabs.as_ref().map(|t| t as &dyn TabQuery),
                    channel.as_ref().map(|c| c as &dyn MessageChannel),
                    current_location(),
                )
                .await;
                page.set(Some(resolved));
            });
            || ()
        });
    }

    match &*page {
        None => html! {
            <div class="padding-20">
                <p class="loading-text">{"Loading..."}</p>
            </div>
        },
        Some(page) if !page.is_article => html! {
            <div class="padding-20">
                <h1 class="popup-title">{"WebAnnotator"}</h1>
                <Alert r#type={AlertType::Warning} title={"Ratings are only available for articles."} inline={true}>
                </Alert>
            </div>
        },
        Some(page) => html! {
            <RatingPanel url={page.url.clone()} />
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct RatingPanelProps {
    pub url: Option<String>,
}

#[function_component(RatingPanel)]
pub fn rating_panel(props: &RatingPanelProps) -> Html {
    let view = use_state(|| PageDataState::initial(props.url.is_some()));

    let controller = {
        let view = view.clone();
        use_memo(props.url.clone(), move |url| {
            PageDataController::new(
                HttpRatingsApi::new(Config::from_env()),
                TimeoutDelay,
                url.clone(),
                Box::new(move |state: &PageDataState| view.set(state.clone())),
            )
        })
    };

    // Load page data on mount or when the URL changes
    {
        let controller = controller.clone();
        use_effect_with(props.url.clone(), move |_| {
            spawn_local(async move { controller.load().await });
            || ()
        });
    }

    let on_submit = {
        let controller = controller.clone();
        Callback::from(move |(score, comment): (u8, String)| {
            let controller = controller.clone();
            spawn_local(async move { controller.submit_rating(score, &comment).await });
        })
    };

    match view.status {
        ViewState::Loading => html! {
            <div class="loading-text-center">
                <Spinner />
            </div>
        },
        ViewState::Error => html! {
            <div class="padding-20">
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {view.error.clone().unwrap_or_else(|| "An error occurred".to_string())}
                </Alert>
            </div>
        },
        _ => match &view.data {
            None => html! {
                <div class="padding-20">
                    <p class="message-text">{"No data available"}</p>
                </div>
            },
            Some(data) => html! {
                <div class="padding-20">
                    <h1 class="popup-title">{"WebAnnotator"}</h1>

                    if view.status == ViewState::Success {
                        <Alert r#type={AlertType::Success} title={"Rating submitted successfully!"} inline={true}>
                        </Alert>
                    }

                    <StatsBadge stats={data.stats} />

                    <ReviewForm
                        initial_rating={data.user_rating.initial_score()}
                        initial_comment={data.user_rating.initial_comment()}
                        {on_submit}
                        disabled={view.status == ViewState::Submitting}
                    />
                </div>
            },
        },
    }
}
