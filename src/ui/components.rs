/// Reusable UI components

use crate::item::{ALL_ITEMS, Item, MAX_NOTE_CHARS, alarm_countdown, time_ago};
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: String,
    #[prop_or(ToastKind::Info)]
    pub kind: ToastKind,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let alert_type = match props.kind {
        ToastKind::Info => AlertType::Success,
        ToastKind::Error => AlertType::Danger,
    };

    html! {
        <div class="toast">
            <Alert r#type={alert_type} title={props.message.clone()} inline={true}>
            </Alert>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AlarmBadgeProps {
    pub alarm: f64,
    pub now: f64,
}

#[function_component(AlarmBadge)]
pub fn alarm_badge(props: &AlarmBadgeProps) -> Html {
    let expired = props.alarm < props.now;

    html! {
        <span class={classes!("alarm-badge", expired.then_some("expired"))}>
            <span class="alarm-icon">{"🔔"}</span>
            {alarm_countdown(props.alarm, props.now)}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct ItemCardProps {
    pub item: Item,
    pub now: f64,
    pub on_open: Callback<String>,
}

#[function_component(ItemCard)]
pub fn item_card(props: &ItemCardProps) -> Html {
    let item = &props.item;
    let onclick = props.on_open.reform({
        let id = item.id.clone();
        move |_: MouseEvent| id.clone()
    });

    html! {
        <div class="item-card" {onclick}>
            if item.has_preview() {
                <img class="item-preview" src={item.preview.clone()} alt="Preview" />
            }
            <div class="item-content">
                <div class="item-name">{&item.name}</div>
                <div class="item-meta">
                    <span class="item-time">{time_ago(item.created, props.now)}</span>
                    if let Some(host) = item.source_host() {
                        <span class="item-host">{host}</span>
                    }
                    if let Some(alarm) = item.alarm {
                        <AlarmBadge alarm={alarm} now={props.now} />
                    }
                    if item.folder != ALL_ITEMS {
                        <span class="folder-badge">{format!("#{}", item.folder)}</span>
                    }
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FolderCardProps {
    pub name: String,
    pub count: usize,
    pub on_select: Callback<String>,
}

#[function_component(FolderCard)]
pub fn folder_card(props: &FolderCardProps) -> Html {
    let onclick = props.on_select.reform({
        let name = props.name.clone();
        move |_: MouseEvent| name.clone()
    });

    html! {
        <div class="folder-card" {onclick}>
            <div class="folder-card-header">
                <span class="folder-card-name">{&props.name}</span>
                <span class="folder-card-count">{format!("{} items", props.count)}</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CharCountProps {
    pub len: usize,
}

#[function_component(CharCount)]
pub fn char_count(props: &CharCountProps) -> Html {
    html! {
        <span class="char-count">{format!("{}/{}", props.len, MAX_NOTE_CHARS)}</span>
    }
}
