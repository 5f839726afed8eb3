/// Reusable rating widgets

use patternfly_yew::prelude::*;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::page_data::PageStats;

pub const MAX_SCORE: u8 = 10;

/// "No ratings yet" or e.g. "7.5/10 (3 votes)"
pub fn stats_summary(stats: &PageStats) -> String {
    if stats.total_ratings == 0 {
        return "No ratings yet".to_string();
    }

    let noun = if stats.total_ratings == 1 { "vote" } else { "votes" };
    format!("{:.1}/10 ({} {})", stats.average_score, stats.total_ratings, noun)
}

#[derive(Properties, PartialEq)]
pub struct StatsBadgeProps {
    pub stats: PageStats,
}

#[function_component(StatsBadge)]
pub fn stats_badge(props: &StatsBadgeProps) -> Html {
    html! {
        <div class="stats-badge">{stats_summary(&props.stats)}</div>
    }
}

/// Stars up to the hovered (or else the selected) score are lit
pub fn star_lit(value: u8, hover: u8, rating: u8) -> bool {
    let shown = if hover > 0 { hover } else { rating };
    value <= shown
}

/// Leaving a star clears the preview, unless the widget is disabled
pub fn hover_after_leave(hover: u8, disabled: bool) -> u8 {
    if disabled { hover } else { 0 }
}

#[derive(Properties, PartialEq)]
pub struct StarRatingProps {
    pub rating: u8,
    pub on_rate: Callback<u8>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(StarRating)]
pub fn star_rating(props: &StarRatingProps) -> Html {
    let hover = use_state(|| 0u8);

    html! {
        <div class="star-rating">
            {for (1..=MAX_SCORE).map(|value| {
                let onclick = {
                    let on_rate = props.on_rate.clone();
                    let disabled = props.disabled;
                    Callback::from(move |_: MouseEvent| {
                        if !disabled {
                            on_rate.emit(value);
                        }
                    })
                };
                let onmouseenter = {
                    let hover = hover.clone();
                    let disabled = props.disabled;
                    Callback::from(move |_: MouseEvent| {
                        if !disabled {
                            hover.set(value);
                        }
                    })
                };
                let onmouseleave = {
                    let hover = hover.clone();
                    let disabled = props.disabled;
                    Callback::from(move |_: MouseEvent| {
                        let next = hover_after_leave(*hover, disabled);
                        if next != *hover {
                            hover.set(next);
                        }
                    })
                };
                let class = if star_lit(value, *hover, props.rating) { "star star-lit" } else { "star" };

                html! {
                    <button
                        type="button"
                        {class}
                        {onclick}
                        {onmouseenter}
                        {onmouseleave}
                        disabled={props.disabled}
                        aria-label={format!("Rate {} out of {}", value, MAX_SCORE)}
                    >
                        {"★"}
                    </button>
                }
            })}
        </div>
    }
}

pub fn can_submit(rating: u8, disabled: bool) -> bool {
    rating > 0 && !disabled
}

pub fn submit_label(disabled: bool) -> &'static str {
    if disabled { "Submitting..." } else { "Submit rating" }
}

#[derive(Properties, PartialEq)]
pub struct ReviewFormProps {
    #[prop_or_default]
    pub initial_rating: u8,
    #[prop_or_default]
    pub initial_comment: String,
    pub on_submit: Callback<(u8, String)>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(ReviewForm)]
pub fn review_form(props: &ReviewFormProps) -> Html {
    let rating = use_state(|| props.initial_rating);
    let comment = use_state(|| props.initial_comment.clone());

    let on_rate = {
        let rating = rating.clone();
        Callback::from(move |value: u8| rating.set(value))
    };

    let on_comment_input = {
        let comment = comment.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                comment.set(input.value());
            }
        })
    };

    let on_submit = {
        let rating = rating.clone();
        let comment = comment.clone();
        let on_submit = props.on_submit.clone();
        let disabled = props.disabled;
        Callback::from(move |_: MouseEvent| {
            if can_submit(*rating, disabled) {
                on_submit.emit((*rating, (*comment).clone()));
            }
        })
    };

    html! {
        <div class="review-form">
            <label class="form-label">{"Your rating"}</label>
            <StarRating rating={*rating} {on_rate} disabled={props.disabled} />

            <label class="form-label">{"Your review (optional)"}</label>
            <textarea
                id="comment"
                rows="4"
                value={(*comment).clone()}
                oninput={on_comment_input}
                disabled={props.disabled}
                placeholder="Share your thoughts about this article..."
            />

            <Button onclick={on_submit} disabled={!can_submit(*rating, props.disabled)} variant={ButtonVariant::Primary} block={true}>
                {submit_label(props.disabled)}
            </Button>
        </div>
    }
}
