use maestro::{LikeState, Page, PlaylistCreated, PlaylistId, Selectors, TrackId};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlInputElement, HtmlOptionElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

pub struct DomPage {
    document: Document,
    selectors: Selectors,
}

impl DomPage {
    pub fn new(document: Document, selectors: Selectors) -> DomPage {
        DomPage {
            document,
            selectors,
        }
    }

    /// Elements matching `selector` that carry all of `attrs`
    fn find_all(&self, selector: &str, attrs: &[(&str, &str)]) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                warn!(selector, "invalid selector: {:?}", e);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|element| {
                attrs
                    .iter()
                    .all(|(attr, value)| element.get_attribute(attr).as_deref() == Some(*value))
            })
            .collect()
    }

    fn like_icons(&self, song_id: &TrackId) -> Vec<Element> {
        self.find_all(
            &self.selectors.like_icon,
            &[(self.selectors.track_id_attr.as_str(), song_id.0.as_str())],
        )
    }

    fn remove_closest(&self, elements: Vec<Element>, container: &str) {
        for element in elements {
            match element.closest(container) {
                Ok(Some(parent)) => parent.remove(),
                Ok(None) => element.remove(),
                Err(e) => warn!(container, "invalid selector: {:?}", e),
            }
        }
    }
}

impl Page for DomPage {
    fn like_marker(&self, song_id: &TrackId) -> Option<LikeState> {
        let icon = self.like_icons(song_id).into_iter().next()?;
        let classes = icon.class_list();
        if classes.contains(LikeState::LIKED_CLASS) {
            Some(LikeState::Liked)
        } else if classes.contains(LikeState::NOT_LIKED_CLASS) {
            Some(LikeState::NotLiked)
        } else {
            None
        }
    }

    fn render_like(&self, song_id: &TrackId, state: LikeState) {
        for icon in self.like_icons(song_id) {
            let classes = icon.class_list();
            let result = classes
                .remove_2(LikeState::LIKED_CLASS, LikeState::NOT_LIKED_CLASS)
                .and_then(|_| classes.add_1(state.class()));
            if let Err(e) = result {
                warn!(song_id = %song_id, "couldn't update like marker: {:?}", e);
            }
        }
    }

    fn remove_playlist_card(&self, playlist_id: &PlaylistId) {
        let buttons = self.find_all(
            &self.selectors.delete_playlist,
            &[(self.selectors.playlist_id_attr.as_str(), playlist_id.0.as_str())],
        );
        self.remove_closest(buttons, &self.selectors.playlist_card);
    }

    fn remove_song_row(&self, playlist_id: &PlaylistId, song_id: &TrackId) {
        let buttons = self.find_all(
            &self.selectors.remove_song,
            &[
                (self.selectors.playlist_id_attr.as_str(), playlist_id.0.as_str()),
                (self.selectors.song_id_attr.as_str(), song_id.0.as_str()),
            ],
        );
        self.remove_closest(buttons, &self.selectors.song_row);
    }

    fn append_playlist_option(&self, playlist: &PlaylistCreated) {
        let select = self
            .document
            .query_selector(&self.selectors.playlist_select)
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok());
        let Some(select) = select else {
            warn!(selector = %self.selectors.playlist_select, "no playlist selector on page");
            return;
        };
        let result = HtmlOptionElement::new_with_text_and_value(&playlist.name, &playlist.id)
            .and_then(|option| select.append_child(&option));
        if let Err(e) = result {
            warn!(playlist_id = %playlist.id, "couldn't add playlist option: {:?}", e);
        }
    }

    fn reload(&self) {
        if let Err(e) = crate::window().location().reload() {
            warn!("reload failed: {:?}", e);
        }
    }
}

/// Current value of an input, select or textarea
pub fn field_value(document: &Document, selector: &str) -> Option<String> {
    let element = document.query_selector(selector).ok().flatten()?;
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        Some(select.value())
    } else {
        element
            .dyn_ref::<HtmlTextAreaElement>()
            .map(HtmlTextAreaElement::value)
    }
}
