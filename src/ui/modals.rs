/// Save, edit and settings modals

use crate::app_state::{ItemDraft, ItemEdit};
use crate::item::{ALL_ITEMS, Item, ItemType, Theme};
use crate::ui::components::CharCount;
use crate::ui::{format_local_datetime, parse_local_datetime};
use patternfly_yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
struct ModalFrameProps {
    title: String,
    on_close: Callback<()>,
    children: Children,
}

#[function_component(ModalFrame)]
fn modal_frame(props: &ModalFrameProps) -> Html {
    // Clicking the backdrop closes, clicks inside the dialog do not
    let on_backdrop = props.on_close.reform(|_: MouseEvent| ());
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal active" onclick={on_backdrop}>
            <div class="modal-dialog" onclick={stop}>
                <div class="modal-header">
                    <h2 class="modal-title">{&props.title}</h2>
                    <button class="modal-close" onclick={props.on_close.reform(|_: MouseEvent| ())}>{"✕"}</button>
                </div>
                <div class="modal-body">
                    {props.children.clone()}
                </div>
            </div>
        </div>
    }
}

fn folder_options(folders: &[String], selected: &str) -> Html {
    folders
        .iter()
        .map(|f| {
            html! {
                <option value={f.clone()} selected={f == selected}>{f}</option>
            }
        })
        .collect()
}

fn input_value(e: &InputEvent) -> Option<String> {
    e.target_dyn_into::<HtmlInputElement>().map(|input| input.value())
}

fn textarea_value(e: &InputEvent) -> Option<String> {
    e.target_dyn_into::<HtmlTextAreaElement>().map(|area| area.value())
}

fn select_value(e: &Event) -> Option<String> {
    e.target_dyn_into::<HtmlSelectElement>().map(|select| select.value())
}

fn checkbox_checked(e: &Event) -> Option<bool> {
    e.target_dyn_into::<HtmlInputElement>().map(|input| input.checked())
}

/// Reminder toggle plus date-time picker
#[derive(Properties, PartialEq)]
struct ReminderFieldProps {
    enabled: bool,
    value: String,
    on_toggle: Callback<bool>,
    on_input: Callback<String>,
}

#[function_component(ReminderField)]
fn reminder_field(props: &ReminderFieldProps) -> Html {
    let on_toggle = {
        let cb = props.on_toggle.clone();
        Callback::from(move |e: Event| {
            if let Some(checked) = checkbox_checked(&e) {
                cb.emit(checked);
            }
        })
    };
    let on_input = {
        let cb = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                cb.emit(value);
            }
        })
    };

    html! {
        <div class="form-group reminder">
            <label class="toggle">
                <input type="checkbox" checked={props.enabled} onchange={on_toggle} />
                {" Reminder"}
            </label>
            if props.enabled {
                <input
                    type="datetime-local"
                    class="alarm-picker"
                    value={props.value.clone()}
                    oninput={on_input}
                />
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SaveModalProps {
    pub draft: ItemDraft,
    pub preview: Option<String>,
    pub folders: Vec<String>,
    pub on_save: Callback<ItemDraft>,
    pub on_close: Callback<()>,
}

#[function_component(SaveModal)]
pub fn save_modal(props: &SaveModalProps) -> Html {
    let draft = use_state(|| props.draft.clone());
    let alarm_enabled = use_state(|| false);
    let alarm_value = use_state(String::new);

    let on_name = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(name) = input_value(&e) {
                draft.set(ItemDraft { name, ..(*draft).clone() });
            }
        })
    };

    let on_type = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(kind) = select_value(&e).as_deref().and_then(ItemType::parse) {
                draft.set(ItemDraft { kind, ..(*draft).clone() });
            }
        })
    };

    let on_folder = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(folder) = select_value(&e) {
                draft.set(ItemDraft { folder, ..(*draft).clone() });
            }
        })
    };

    let on_note = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(note) = textarea_value(&e) {
                draft.set(ItemDraft { note, ..(*draft).clone() });
            }
        })
    };

    let on_save = {
        let draft = draft.clone();
        let alarm_enabled = alarm_enabled.clone();
        let alarm_value = alarm_value.clone();
        let cb = props.on_save.clone();
        Callback::from(move |_: MouseEvent| {
            let alarm = if *alarm_enabled { parse_local_datetime(&alarm_value) } else { None };
            cb.emit(ItemDraft { alarm, ..(*draft).clone() });
        })
    };

    html! {
        <ModalFrame title="Save to Boxy" on_close={props.on_close.clone()}>
            if let Some(preview) = &props.preview {
                <img class="modal-preview" src={preview.clone()} alt="Preview" />
            }
            <div class="form-group">
                <label>{"Name"}</label>
                <input type="text" value={draft.name.clone()} oninput={on_name} />
            </div>
            <div class="form-row">
                <div class="form-group">
                    <label>{"Type"}</label>
                    <select onchange={on_type}>
                        {for ItemType::ALL.iter().map(|t| html! {
                            <option value={t.as_str()} selected={*t == draft.kind}>{t.label()}</option>
                        })}
                    </select>
                </div>
                <div class="form-group">
                    <label>{"Folder"}</label>
                    <select onchange={on_folder}>
                        {folder_options(&props.folders, &draft.folder)}
                    </select>
                </div>
            </div>
            <div class="form-group">
                <label>{"Note"}</label>
                <textarea maxlength="500" value={draft.note.clone()} oninput={on_note} />
                <CharCount len={draft.note.chars().count()} />
            </div>
            <ReminderField
                enabled={*alarm_enabled}
                value={(*alarm_value).clone()}
                on_toggle={Callback::from({
                    let alarm_enabled = alarm_enabled.clone();
                    move |on: bool| alarm_enabled.set(on)
                })}
                on_input={Callback::from({
                    let alarm_value = alarm_value.clone();
                    move |v: String| alarm_value.set(v)
                })}
            />
            <div class="modal-actions">
                <Button onclick={props.on_close.reform(|_: MouseEvent| ())} variant={ButtonVariant::Secondary}>
                    {"Cancel"}
                </Button>
                <Button onclick={on_save} variant={ButtonVariant::Primary}>
                    {"Save"}
                </Button>
            </div>
        </ModalFrame>
    }
}

#[derive(Properties, PartialEq)]
pub struct EditModalProps {
    pub item: Item,
    pub edit: ItemEdit,
    pub folders: Vec<String>,
    pub on_save: Callback<ItemEdit>,
    pub on_delete: Callback<String>,
    pub on_open_link: Callback<String>,
    pub on_close: Callback<()>,
}

#[function_component(EditModal)]
pub fn edit_modal(props: &EditModalProps) -> Html {
    let edit = use_state(|| props.edit.clone());
    let alarm_enabled = use_state(|| props.edit.alarm.is_some());
    let alarm_value = use_state(|| props.edit.alarm.map(format_local_datetime).unwrap_or_default());

    let on_folder = {
        let edit = edit.clone();
        Callback::from(move |e: Event| {
            if let Some(folder) = select_value(&e) {
                edit.set(ItemEdit { folder, ..(*edit).clone() });
            }
        })
    };

    let on_note = {
        let edit = edit.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(note) = textarea_value(&e) {
                edit.set(ItemEdit { note, ..(*edit).clone() });
            }
        })
    };

    let on_save = {
        let edit = edit.clone();
        let alarm_enabled = alarm_enabled.clone();
        let alarm_value = alarm_value.clone();
        let cb = props.on_save.clone();
        Callback::from(move |_: MouseEvent| {
            let alarm = if *alarm_enabled { parse_local_datetime(&alarm_value) } else { None };
            cb.emit(ItemEdit { alarm, ..(*edit).clone() });
        })
    };

    let item = &props.item;

    html! {
        <ModalFrame title={item.name.clone()} on_close={props.on_close.clone()}>
            if item.has_preview() {
                <div class="edit-preview">
                    <img src={item.preview.clone()} alt="Preview" />
                </div>
            }
            <div class="form-group">
                <label>{"Folder"}</label>
                <select onchange={on_folder}>
                    {folder_options(&props.folders, &edit.folder)}
                </select>
            </div>
            <div class="form-group">
                <label>{"Note"}</label>
                <textarea maxlength="500" value={edit.note.clone()} oninput={on_note} />
                <CharCount len={edit.note.chars().count()} />
            </div>
            <ReminderField
                enabled={*alarm_enabled}
                value={(*alarm_value).clone()}
                on_toggle={Callback::from({
                    let alarm_enabled = alarm_enabled.clone();
                    move |on: bool| alarm_enabled.set(on)
                })}
                on_input={Callback::from({
                    let alarm_value = alarm_value.clone();
                    move |v: String| alarm_value.set(v)
                })}
            />
            <div class="modal-actions">
                <Button
                    onclick={props.on_delete.reform({
                        let id = item.id.clone();
                        move |_: MouseEvent| id.clone()
                    })}
                    variant={ButtonVariant::Danger}
                >
                    {"Delete"}
                </Button>
                if !item.url.is_empty() {
                    <Button
                        onclick={props.on_open_link.reform({
                            let url = item.url.clone();
                            move |_: MouseEvent| url.clone()
                        })}
                        variant={ButtonVariant::Secondary}
                    >
                        {"Open link"}
                    </Button>
                }
                <Button onclick={on_save} variant={ButtonVariant::Primary}>
                    {"Save"}
                </Button>
            </div>
        </ModalFrame>
    }
}

#[derive(Clone, Copy, PartialEq)]
enum SettingsTab {
    Folders,
    Items,
    Appearance,
}

#[derive(Properties, PartialEq)]
pub struct SettingsModalProps {
    pub folder_counts: Vec<(String, usize)>,
    pub groups: Vec<(String, Vec<Item>)>,
    pub theme: Theme,
    pub cleanup_days: u32,
    pub on_create_folder: Callback<String>,
    pub on_delete_folder: Callback<String>,
    pub on_delete_item: Callback<String>,
    pub on_delete_all: Callback<()>,
    pub on_theme: Callback<Theme>,
    pub on_cleanup_days: Callback<u32>,
    pub on_close: Callback<()>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsModalProps) -> Html {
    let active = use_state(|| SettingsTab::Folders);
    let new_folder = use_state(String::new);

    let on_new_folder_input = {
        let new_folder = new_folder.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                new_folder.set(value);
            }
        })
    };

    let on_create = {
        let new_folder = new_folder.clone();
        let cb = props.on_create_folder.clone();
        Callback::from(move |_: MouseEvent| {
            cb.emit((*new_folder).clone());
            new_folder.set(String::new());
        })
    };

    let on_theme = {
        let cb = props.on_theme.clone();
        Callback::from(move |e: Event| {
            let theme = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| Theme::parse(&input.value()));
            if let Some(theme) = theme {
                cb.emit(theme);
            }
        })
    };

    let on_days = {
        let cb = props.on_cleanup_days.clone();
        Callback::from(move |e: Event| {
            let days = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| input.value().parse::<u32>().ok());
            if let Some(days) = days {
                cb.emit(days);
            }
        })
    };

    let tab_button = |tab: SettingsTab, label: &'static str| {
        let active = active.clone();
        html! {
            <button
                class={classes!("settings-tab-btn", (*active == tab).then_some("active"))}
                onclick={Callback::from(move |_: MouseEvent| active.set(tab))}
            >
                {label}
            </button>
        }
    };

    let total_items: usize = props.groups.iter().map(|(_, items)| items.len()).sum();

    html! {
        <ModalFrame title="Settings" on_close={props.on_close.clone()}>
            <div class="settings-tabs">
                {tab_button(SettingsTab::Folders, "Folders")}
                {tab_button(SettingsTab::Items, "Items")}
                {tab_button(SettingsTab::Appearance, "Appearance")}
            </div>

            {match *active {
                SettingsTab::Folders => html! {
                    <div class="settings-tab-content active">
                        <div class="folder-create">
                            <input
                                type="text"
                                placeholder="New folder name"
                                value={(*new_folder).clone()}
                                oninput={on_new_folder_input}
                            />
                            <Button onclick={on_create} variant={ButtonVariant::Primary}>
                                {"Create"}
                            </Button>
                        </div>
                        <div class="folders-list">
                            {for props.folder_counts.iter().map(|(folder, count)| html! {
                                <div class="folder-item" key={folder.clone()}>
                                    <span class="folder-item-name">{folder}</span>
                                    <span class="folder-item-count">{format!("{} items", count)}</span>
                                    <div class="folder-item-actions">
                                        if folder != ALL_ITEMS {
                                            <Button
                                                onclick={props.on_delete_folder.reform({
                                                    let folder = folder.clone();
                                                    move |_: MouseEvent| folder.clone()
                                                })}
                                                variant={ButtonVariant::Danger}
                                                size={ButtonSize::Small}
                                            >
                                                {"🗑️"}
                                            </Button>
                                        }
                                    </div>
                                </div>
                            })}
                        </div>
                    </div>
                },
                SettingsTab::Items => html! {
                    <div class="settings-tab-content active">
                        if total_items == 0 {
                            <div class="empty-list">{"No saved items"}</div>
                        } else {
                            {for props.groups.iter().map(|(folder, items)| html! {
                                <div class="settings-group" key={folder.clone()}>
                                    <div class="settings-group-title">{folder}</div>
                                    {for items.iter().map(|item| html! {
                                        <div class="settings-item" key={item.id.clone()}>
                                            <span class="settings-item-name">{&item.name}</span>
                                            <Button
                                                onclick={props.on_delete_item.reform({
                                                    let id = item.id.clone();
                                                    move |_: MouseEvent| id.clone()
                                                })}
                                                variant={ButtonVariant::Danger}
                                                size={ButtonSize::Small}
                                            >
                                                {"🗑️"}
                                            </Button>
                                        </div>
                                    })}
                                </div>
                            })}
                            <Button
                                onclick={props.on_delete_all.reform(|_: MouseEvent| ())}
                                variant={ButtonVariant::Danger}
                                block={true}
                            >
                                {"Delete everything"}
                            </Button>
                        }
                    </div>
                },
                SettingsTab::Appearance => html! {
                    <div class="settings-tab-content active">
                        <div class="theme-options">
                            {for [Theme::Auto, Theme::Light, Theme::Dark].into_iter().map(|theme| html! {
                                <label class="theme-option">
                                    <input
                                        type="radio"
                                        name="theme"
                                        value={theme.as_str()}
                                        checked={props.theme == theme}
                                        onchange={on_theme.clone()}
                                    />
                                    {format!(" {}", theme.as_str())}
                                </label>
                            })}
                        </div>
                        <div class="form-group">
                            <label>{"Suggest cleanup after (days)"}</label>
                            <input
                                type="number"
                                min="1"
                                value={props.cleanup_days.to_string()}
                                onchange={on_days}
                            />
                        </div>
                    </div>
                },
            }}
        </ModalFrame>
    }
}
