//! Detail presenter: receives an already-resolved `DisplayRecord`.
//!
//! Selecting a character never triggers a second fetch; the record chosen
//! from the list is handed over whole and rendered as-is.

use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use tracing::debug;

use crate::types::{DisplayRecord, ImageVariant};

/// Renders one selected character.
pub trait CharacterDetailView: Send + Sync {
    fn show_character(&self, character: &DisplayRecord);
}

#[derive(Default)]
pub struct CharacterDetailPresenter {
    character: Mutex<Option<DisplayRecord>>,
    view: RwLock<Option<Weak<dyn CharacterDetailView>>>,
}

impl CharacterDetailPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_view<V>(&self, view: &Arc<V>)
    where
        V: CharacterDetailView + 'static,
    {
        let weak: Weak<V> = Arc::downgrade(view);
        let weak: Weak<dyn CharacterDetailView> = weak;
        *self.view.write().unwrap_or_else(PoisonError::into_inner) = Some(weak);
    }

    /// Store `character` and show it on the attached view, if still alive.
    pub fn select_character(&self, character: DisplayRecord) {
        *self.character.lock().unwrap_or_else(PoisonError::into_inner) = Some(character.clone());
        let view = self
            .view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade);
        match view {
            Some(view) => view.show_character(&character),
            None => debug!(name = %character.name, "no detail view attached"),
        }
    }

    pub fn character(&self) -> Option<DisplayRecord> {
        self.character
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `portrait_xlarge` thumbnail of the selected character.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail_url_for(ImageVariant::default())
    }

    pub fn thumbnail_url_for(&self, variant: ImageVariant) -> Option<String> {
        self.character
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|c| c.image_url_for(variant))
    }
}
