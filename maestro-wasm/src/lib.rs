use crate::{bind::Bindings, dom::DomPage, fetch::FetchTransport};
use maestro::{Config, InteractionController, Selectors, Session, UiEvent};
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, Window};

pub mod bind;
pub mod dom;
pub mod fetch;
pub mod logging;

pub type Controller = InteractionController<FetchTransport, DomPage>;

const CONFIG_GLOBAL: &str = "maestroConfig";
const CONFIG_SCRIPT: &str = "#maestro-config";

// Called by our JS entry point once the page has loaded
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    let document = document();
    let (config, config_error) = match load_config(&document) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init(config.log_level);
    if let Some(e) = config_error {
        warn!("ignoring maestro config: {}", e);
    }

    let controller = Rc::new(InteractionController::new(
        &config,
        FetchTransport,
        DomPage::new(document.clone(), config.selectors.clone()),
        Session::new(),
    ));
    let mut bindings = Bindings::new();
    bind_events(&mut bindings, &document, &config.selectors, &controller)?;
    bindings.forget();
    info!("DOM loaded");
    Ok(())
}

/// A `window.maestroConfig` object wins over a JSON script tag
fn load_config(document: &Document) -> Result<Config, String> {
    let global = js_sys::Reflect::get(&window(), &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|e| format!("{:?}", e))?;
    if !global.is_undefined() && !global.is_null() {
        return serde_wasm_bindgen::from_value(global).map_err(|e| e.to_string());
    }
    let text = document
        .query_selector(CONFIG_SCRIPT)
        .ok()
        .flatten()
        .and_then(|script| script.text_content());
    parse_config(text.as_deref())
}

pub fn parse_config(text: Option<&str>) -> Result<Config, String> {
    match text.map(str::trim) {
        None | Some("") => Ok(Config::default()),
        Some(text) => Config::from_json(text).map_err(|e| e.to_string()),
    }
}

/// Actions whose element is missing from the page are skipped
pub fn bind_events(
    bindings: &mut Bindings,
    document: &Document,
    selectors: &Selectors,
    controller: &Rc<Controller>,
) -> Result<(), JsValue> {
    if let Some(modal) = find(document, &selectors.track_modal) {
        let controller = Rc::clone(controller);
        let attr = selectors.track_id_attr.clone();
        // Bootstrap sets the button that opened the modal as relatedTarget
        bindings.bind("track_modal_open", &modal, "shown.bs.modal", move |e| {
            let track_id = related_target(&e).and_then(|button| button.get_attribute(&attr));
            spawn(&controller, UiEvent::TrackModalOpened { track_id });
        })?;
    }

    if let Some(form) = find(document, &selectors.add_to_playlist_form) {
        let controller = Rc::clone(controller);
        let document = document.clone();
        let playlist = selectors.playlist_select.clone();
        bindings.bind("add_to_playlist", &form, "submit", move |e| {
            e.prevent_default();
            let playlist_id = dom::field_value(&document, &playlist);
            spawn(&controller, UiEvent::AddToPlaylistSubmitted { playlist_id });
        })?;
    }

    if let Some(form) = find(document, &selectors.create_playlist_form) {
        let controller = Rc::clone(controller);
        let document = document.clone();
        let (name, description) = (
            selectors.playlist_name.clone(),
            selectors.playlist_description.clone(),
        );
        bindings.bind("create_playlist", &form, "submit", move |e| {
            e.prevent_default();
            let event = UiEvent::CreatePlaylistSubmitted {
                name: dom::field_value(&document, &name).unwrap_or_default(),
                description: dom::field_value(&document, &description).unwrap_or_default(),
            };
            spawn(&controller, event);
        })?;
    }

    if let Some(form) = find(document, &selectors.search_form) {
        let controller = Rc::clone(controller);
        bindings.bind("search", &form, "submit", move |e| {
            e.prevent_default();
            spawn(&controller, UiEvent::SearchSubmitted);
        })?;
    }

    // Clicks are delegated so icons and buttons rendered later are covered too
    {
        let controller = Rc::clone(controller);
        let (icon, attr) = (selectors.like_icon.clone(), selectors.track_id_attr.clone());
        bindings.bind("like_toggle", document, "click", move |e| {
            if let Some(icon) = closest(&e, &icon) {
                let song_id = icon.get_attribute(&attr);
                spawn(&controller, UiEvent::LikeToggled { song_id });
            }
        })?;
    }
    {
        let controller = Rc::clone(controller);
        let (button, attr) = (
            selectors.delete_playlist.clone(),
            selectors.playlist_id_attr.clone(),
        );
        bindings.bind("delete_playlist", document, "click", move |e| {
            if let Some(button) = closest(&e, &button) {
                e.prevent_default();
                let playlist_id = button.get_attribute(&attr);
                spawn(&controller, UiEvent::DeletePlaylistClicked { playlist_id });
            }
        })?;
    }
    {
        let controller = Rc::clone(controller);
        let (button, playlist_attr, song_attr) = (
            selectors.remove_song.clone(),
            selectors.playlist_id_attr.clone(),
            selectors.song_id_attr.clone(),
        );
        bindings.bind("remove_song", document, "click", move |e| {
            if let Some(button) = closest(&e, &button) {
                e.prevent_default();
                let event = UiEvent::RemoveSongClicked {
                    playlist_id: button.get_attribute(&playlist_attr),
                    song_id: button.get_attribute(&song_attr),
                };
                spawn(&controller, event);
            }
        })?;
    }
    Ok(())
}

fn spawn(controller: &Rc<Controller>, event: UiEvent) {
    let controller = Rc::clone(controller);
    spawn_local(async move { controller.handle(event).await });
}

fn find(document: &Document, selector: &str) -> Option<Element> {
    let element = document.query_selector(selector).ok().flatten();
    if element.is_none() {
        debug!(selector, "not on this page");
    }
    element
}

fn closest(e: &Event, selector: &str) -> Option<Element> {
    let target = e.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok().flatten()
}

fn related_target(e: &Event) -> Option<Element> {
    js_sys::Reflect::get(e, &JsValue::from_str("relatedTarget"))
        .ok()?
        .dyn_into::<Element>()
        .ok()
}

fn window() -> Window {
    web_sys::window().expect("no global `window` exists")
}

fn document() -> Document {
    window().document().expect("should have a document on window")
}
