/// Popup UI for the Boxy extension

use crate::app_state::{AppState, ItemDraft, ItemEdit, Modal, PageCapture};
use crate::detect::DetectedContent;
use crate::error::{BoxyError, Result};
use crate::filter::{TabFilter, group_by_folder};
use crate::item::{Item, Theme};
use crate::platform::{self, Chrome};
use crate::ui::components::{FolderCard, ItemCard, Toast, ToastKind};
use crate::ui::modals::{EditModal, SaveModal, SettingsModal};
use crate::ui::{Generation, Latest, after, apply_theme, confirm};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

const TOAST_MS: i32 = 3000;

#[derive(Clone, PartialEq)]
enum ViewState {
    Idle,
    Loading(String),
    Error(String),
}

#[derive(Clone, PartialEq)]
struct ToastMessage {
    text: String,
    kind: ToastKind,
}

/// Shows one toast at a time. Each toast hides after `TOAST_MS` unless a newer one replaced it.
#[derive(Clone)]
struct Toaster {
    message: UseStateHandle<Option<ToastMessage>>,
    generation: Generation,
}

impl Toaster {
    fn show(&self, text: impl Into<String>, kind: ToastKind) {
        let shown = self.generation.advance();
        self.message.set(Some(ToastMessage { text: text.into(), kind }));

        let this = self.clone();
        after(TOAST_MS, move || {
            if this.generation.is_current(shown) {
                this.message.set(None);
            }
        });
    }

    fn error(&self, error: BoxyError) {
        if !error.is_validation() {
            log::warn!("{}", error);
        }
        self.show(error.to_string(), ToastKind::Error);
    }
}

/// Store the new state and write the whole record in the background
fn commit(state: &UseStateHandle<AppState>, next: AppState, toast: &Toaster) {
    let data = next.data.clone();
    state.set(next);

    let toast = toast.clone();
    spawn_local(async move {
        if let Err(e) = platform::save_storage(&data).await {
            log::error!("Failed to save storage: {}", e);
            toast.show(format!("Failed to save: {}", e), ToastKind::Error);
        }
    });
}

/// Gather what the save form needs from the active tab.
/// Pages without a content script fall back to the tab title.
async fn capture_page() -> Result<PageCapture> {
    let tab = platform::active_tab().await?;

    let detected = match platform::request_detection(tab.id).await {
        Ok(detected) => detected,
        Err(e) => {
            log::info!("Content detection unavailable on {}: {}", tab.url, e);
            DetectedContent::fallback(&tab.title)
        }
    };

    let mut capture = PageCapture::new(tab.url, tab.title, detected);
    if capture.needs_screenshot() {
        capture.preview = platform::request_screenshot().await.unwrap_or_else(|e| {
            log::warn!("Screenshot failed: {}", e);
            None
        });
    }
    Ok(capture)
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(AppState::default);
    let status = use_state(|| ViewState::Loading("Loading...".to_string()));
    let toast_message = use_state(|| None::<ToastMessage>);
    let toast_generation = use_state(Generation::default);
    let toast = Toaster {
        message: toast_message.clone(),
        generation: (*toast_generation).clone(),
    };
    let save_draft = use_state(|| None::<ItemDraft>);
    let edit_form = use_state(|| None::<ItemEdit>);
    let fired = use_state(|| None::<String>);

    // Async continuations read the state through this instead of the handle they captured
    let latest = {
        let state = state.clone();
        use_state(move || Latest::new(state))
    };
    latest.replace(state.clone());

    // Load storage and subscribe to reminder events on mount
    {
        let state = state.clone();
        let status = status.clone();
        let fired = fired.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match platform::load_storage().await {
                    Ok(data) => {
                        apply_theme(data.theme);
                        state.set(AppState::new(data));
                        status.set(ViewState::Idle);
                    }
                    Err(e) => {
                        log::error!("Failed to load storage: {}", e);
                        apply_theme(Theme::Auto);
                        state.set(AppState::unavailable());
                        status.set(ViewState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });

            platform::listen_alarm_fired(move |item_id| {
                log::info!("Reminder fired for {}", item_id);
                fired.set(Some(item_id));
            });
            || ()
        });
    }

    let on_search = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*state).clone();
                next.set_search(&input.value());
                state.set(next);
            }
        })
    };

    let on_tab_click = {
        let state = state.clone();
        move |tab: TabFilter| {
            let state = state.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*state).clone();
                next.set_tab(tab);
                state.set(next);
            })
        }
    };

    let on_select_folder = {
        let state = state.clone();
        Callback::from(move |name: String| {
            let mut next = (*state).clone();
            next.select_folder(&name);
            state.set(next);
        })
    };

    // Save page button
    let on_save_page = {
        let latest = (*latest).clone();
        let status = status.clone();
        let save_draft = save_draft.clone();

        Callback::from(move |_: MouseEvent| {
            let latest = latest.clone();
            let status = status.clone();
            let save_draft = save_draft.clone();

            status.set(ViewState::Loading("Detecting content...".to_string()));

            spawn_local(async move {
                match capture_page().await {
                    Ok(capture) => {
                        let state = latest.get();
                        let mut next = (*state).clone();
                        let draft = next.open_save(capture);
                        state.set(next);
                        save_draft.set(Some(draft));
                        status.set(ViewState::Idle);
                    }
                    Err(e) => {
                        log::warn!("Cannot capture the active tab: {}", e);
                        status.set(ViewState::Error(format!("Cannot save this page: {}", e)));
                    }
                }
            });
        })
    };

    let on_create_item = {
        let state = state.clone();
        let toast = toast.clone();
        let save_draft = save_draft.clone();
        Callback::from(move |draft: ItemDraft| {
            let mut next = (*state).clone();
            let created = next
                .create_item(draft, &Chrome, js_sys::Date::now())
                .map(|item| item.name.clone());
            match created {
                Ok(name) => {
                    log::info!("Saved {}", name);
                    save_draft.set(None);
                    commit(&state, next, &toast);
                    toast.show("Saved!", ToastKind::Info);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_close_save = {
        let state = state.clone();
        let save_draft = save_draft.clone();
        Callback::from(move |_: ()| {
            let mut next = (*state).clone();
            next.close_save();
            state.set(next);
            save_draft.set(None);
        })
    };

    let on_open_item = {
        let state = state.clone();
        let toast = toast.clone();
        let edit_form = edit_form.clone();
        Callback::from(move |id: String| {
            let mut next = (*state).clone();
            match next.open_edit(&id) {
                Ok(edit) => {
                    state.set(next);
                    edit_form.set(Some(edit));
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_save_edit = {
        let state = state.clone();
        let toast = toast.clone();
        let edit_form = edit_form.clone();
        Callback::from(move |edit: ItemEdit| {
            let mut next = (*state).clone();
            match next.save_edit(edit, &Chrome, js_sys::Date::now()) {
                Ok(()) => {
                    edit_form.set(None);
                    commit(&state, next, &toast);
                    toast.show("Saved!", ToastKind::Info);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_close_edit = {
        let state = state.clone();
        let edit_form = edit_form.clone();
        Callback::from(move |_: ()| {
            let mut next = (*state).clone();
            next.close_edit();
            state.set(next);
            edit_form.set(None);
        })
    };

    let on_delete_item = {
        let state = state.clone();
        let toast = toast.clone();
        let edit_form = edit_form.clone();
        Callback::from(move |id: String| {
            if !confirm("Delete this item?") {
                return;
            }
            let mut next = (*state).clone();
            match next.delete_item(&id, &Chrome) {
                Ok(item) => {
                    log::info!("Deleted {}", item.name);
                    if next.editing.is_none() {
                        edit_form.set(None);
                    }
                    commit(&state, next, &toast);
                    toast.show("Deleted", ToastKind::Info);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_open_link = Callback::from(|url: String| platform::open_url(&url));

    let on_open_settings = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*state).clone();
            next.open_settings();
            state.set(next);
        })
    };

    let on_close_settings = {
        let state = state.clone();
        Callback::from(move |_: ()| {
            let mut next = (*state).clone();
            next.close_settings();
            state.set(next);
        })
    };

    let on_create_folder = {
        let state = state.clone();
        let toast = toast.clone();
        Callback::from(move |name: String| {
            let mut next = (*state).clone();
            match next.create_folder(&name) {
                Ok(()) => {
                    commit(&state, next, &toast);
                    toast.show("Folder created", ToastKind::Info);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_delete_folder = {
        let state = state.clone();
        let toast = toast.clone();
        Callback::from(move |name: String| {
            let prompt = format!(
                "Delete \"{}\"? Its items will move to \"{}\".",
                name,
                crate::item::ALL_ITEMS
            );
            if !confirm(&prompt) {
                return;
            }
            let mut next = (*state).clone();
            match next.delete_folder(&name) {
                Ok(moved) => {
                    commit(&state, next, &toast);
                    toast.show(format!("Folder deleted. {} items moved.", moved), ToastKind::Info);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_delete_all = {
        let state = state.clone();
        let toast = toast.clone();
        let edit_form = edit_form.clone();
        Callback::from(move |_: ()| {
            if !confirm("Delete all items? This cannot be undone.") {
                return;
            }
            let mut next = (*state).clone();
            match next.delete_all(&Chrome) {
                Ok(removed) => {
                    log::info!("Deleted all {} items", removed);
                    edit_form.set(None);
                    commit(&state, next, &toast);
                    toast.show("All items deleted", ToastKind::Info);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_theme = {
        let state = state.clone();
        let toast = toast.clone();
        Callback::from(move |theme: Theme| {
            let mut next = (*state).clone();
            match next.set_theme(theme) {
                Ok(()) => {
                    apply_theme(theme);
                    commit(&state, next, &toast);
                }
                Err(e) => toast.error(e),
            }
        })
    };

    let on_cleanup_days = {
        let state = state.clone();
        let toast = toast.clone();
        Callback::from(move |days: u32| {
            let mut next = (*state).clone();
            match next.set_cleanup_days(days) {
                Ok(()) => commit(&state, next, &toast),
                Err(e) => toast.error(e),
            }
        })
    };

    let now = js_sys::Date::now();
    let is_busy = matches!(*status, ViewState::Loading(_));
    let visible: Vec<Item> = state.visible().into_iter().cloned().collect();
    let folder_counts = state.folder_counts();

    let tab_class = |tab: TabFilter| {
        if state.tab == tab {
            "pf-v5-c-tabs__item pf-m-current"
        } else {
            "pf-v5-c-tabs__item"
        }
    };

    html! {
        <div class="padding-20">
            <div class="popup-header">
                <h1 class="popup-title">{"Boxy"}</h1>
                <Button onclick={on_open_settings} variant={ButtonVariant::Plain}>
                    {"⚙️"}
                </Button>
            </div>

            <input
                type="search"
                class="search-input"
                placeholder="Search..."
                value={state.search.clone()}
                oninput={on_search}
            />

            // Tab navigation
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    {for TabFilter::TABS.iter().map(|tab| html! {
                        <li class={tab_class(*tab)}>
                            <button class="pf-v5-c-tabs__link" onclick={on_tab_click(*tab)}>
                                <span class="pf-v5-c-tabs__item-text">{tab.label()}</span>
                            </button>
                        </li>
                    })}
                </ul>
            </div>

            // Status display
            {match &*status {
                ViewState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                ViewState::Idle => html! {}
            }}

            <div class="tab-pane-content">
                if state.tab == TabFilter::Folders {
                    <div class="folders-grid">
                        {for folder_counts.iter().map(|(name, count)| html! {
                            <FolderCard
                                key={name.clone()}
                                name={name.clone()}
                                count={*count}
                                on_select={on_select_folder.clone()}
                            />
                        })}
                    </div>
                } else if visible.is_empty() {
                    <div class="empty-state">{state.empty_message()}</div>
                } else {
                    <div class="items-list">
                        {for visible.into_iter().map(|item| {
                            let key = item.id.clone();
                            html! {
                                <ItemCard
                                    key={key}
                                    item={item}
                                    now={now}
                                    on_open={on_open_item.clone()}
                                />
                            }
                        })}
                    </div>
                }
            </div>

            <div class="fab">
                <Button onclick={on_save_page} disabled={is_busy} variant={ButtonVariant::Primary}>
                    {"＋ Save page"}
                </Button>
            </div>

            {match state.modal {
                Some(Modal::Save) => match (&*save_draft, &state.page_capture) {
                    (Some(draft), Some(capture)) => html! {
                        <SaveModal
                            draft={draft.clone()}
                            preview={capture.preview.clone()}
                            folders={state.data.folders.clone()}
                            on_save={on_create_item}
                            on_close={on_close_save}
                        />
                    },
                    _ => html! {},
                },
                Some(Modal::Edit) => match (state.editing_item(), &*edit_form) {
                    (Some(item), Some(edit)) => html! {
                        <EditModal
                            key={item.id.clone()}
                            item={item.clone()}
                            edit={edit.clone()}
                            folders={state.data.folders.clone()}
                            on_save={on_save_edit}
                            on_delete={on_delete_item.clone()}
                            on_open_link={on_open_link}
                            on_close={on_close_edit}
                        />
                    },
                    _ => html! {},
                },
                Some(Modal::Settings) => html! {
                    <SettingsModal
                        folder_counts={folder_counts.clone()}
                        groups={owned_groups(&state.data.items)}
                        theme={state.data.theme}
                        cleanup_days={state.data.settings.cleanup_days}
                        on_create_folder={on_create_folder}
                        on_delete_folder={on_delete_folder}
                        on_delete_item={on_delete_item}
                        on_delete_all={on_delete_all}
                        on_theme={on_theme}
                        on_cleanup_days={on_cleanup_days}
                        on_close={on_close_settings}
                    />
                },
                None => html! {},
            }}

            if let Some(message) = (*toast_message).clone() {
                <Toast message={message.text} kind={message.kind} />
            }
        </div>
    }
}

fn owned_groups(items: &[Item]) -> Vec<(String, Vec<Item>)> {
    group_by_folder(items)
        .into_iter()
        .map(|(folder, items)| (folder, items.into_iter().cloned().collect()))
        .collect()
}
