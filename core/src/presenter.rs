//! Character-list presenter: fetch, map, and report to a view.
//!
//! # Design
//! The UI layer owns the presenter. The presenter keeps only a `Weak`
//! reference back to its view, so an in-flight load never keeps a dismissed
//! screen alive; a completion that finds the view gone is dropped.
//!
//! Callbacks run on whichever task completes the transport future. Views
//! that own thread-affine UI state must marshal to their UI thread inside
//! `on_characters_loaded` / `on_error`.
//!
//! Overlapping loads are not cancelled, but only the most recently started
//! one reports back. Each call to `fetch_characters` takes a generation
//! number and a completion whose generation is no longer current is
//! discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use tracing::{debug, info, warn};

use crate::client::{fetch_character_list, CatalogClient};
use crate::detail::CharacterDetailPresenter;
use crate::mapper::to_display_records;
use crate::transport::Transport;
use crate::types::DisplayRecord;

/// Receiver of character-list load outcomes.
pub trait CharactersView: Send + Sync {
    fn on_characters_loaded(&self, characters: &[DisplayRecord]);
    fn on_error(&self, message: &str);
}

pub struct CharactersPresenter<T> {
    client: CatalogClient,
    transport: T,
    view: RwLock<Option<Weak<dyn CharactersView>>>,
    characters: Mutex<Vec<DisplayRecord>>,
    generation: AtomicU64,
}

impl<T: Transport> CharactersPresenter<T> {
    pub fn new(client: CatalogClient, transport: T) -> Self {
        Self {
            client,
            transport,
            view: RwLock::new(None),
            characters: Mutex::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Deliver future outcomes to `view` without extending its lifetime.
    pub fn attach_view<V>(&self, view: &Arc<V>)
    where
        V: CharactersView + 'static,
    {
        let weak: Weak<V> = Arc::downgrade(view);
        let weak: Weak<dyn CharactersView> = weak;
        *self.view.write().unwrap_or_else(PoisonError::into_inner) = Some(weak);
    }

    fn view(&self) -> Option<Arc<dyn CharactersView>> {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn lock_characters(&self) -> MutexGuard<'_, Vec<DisplayRecord>> {
        self.characters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the character list and report the outcome to the attached view.
    ///
    /// Success replaces the presenter's list and calls
    /// `on_characters_loaded`; any failure calls `on_error` with the error's
    /// message and leaves the previous list untouched. There is no retry.
    pub async fn fetch_characters(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = fetch_character_list(&self.client, &self.transport)
            .await
            .map(to_display_records);

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping superseded character load");
            return;
        }

        match outcome {
            Ok(characters) => {
                info!(count = characters.len(), "characters loaded");
                *self.lock_characters() = characters.clone();
                match self.view() {
                    Some(view) => view.on_characters_loaded(&characters),
                    None => debug!("view released before characters loaded"),
                }
            }
            Err(err) => {
                warn!(error = %err, "character load failed");
                match self.view() {
                    Some(view) => view.on_error(&err.to_string()),
                    None => debug!("view released before load failed"),
                }
            }
        }
    }

    /// The most recently delivered list.
    pub fn characters(&self) -> Vec<DisplayRecord> {
        self.lock_characters().clone()
    }

    pub fn character_count(&self) -> usize {
        self.lock_characters().len()
    }

    pub fn character_at(&self, index: usize) -> Option<DisplayRecord> {
        self.lock_characters().get(index).cloned()
    }

    /// Hand the record at `index` to `detail`. Returns `false` when the
    /// index is out of range and nothing was handed over.
    pub fn select_character(&self, index: usize, detail: &CharacterDetailPresenter) -> bool {
        match self.character_at(index) {
            Some(character) => {
                detail.select_character(character);
                true
            }
            None => {
                debug!(index, "selection outside loaded list");
                false
            }
        }
    }
}

/// Closure form of the load pipeline: exactly one of `on_success` or
/// `on_error` is called.
pub async fn load_characters<T, S, E>(
    client: &CatalogClient,
    transport: &T,
    on_success: S,
    on_error: E,
) where
    T: Transport + ?Sized,
    S: FnOnce(Vec<DisplayRecord>),
    E: FnOnce(String),
{
    match fetch_character_list(client, transport).await {
        Ok(records) => on_success(to_display_records(records)),
        Err(err) => on_error(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};

    const TWO_CHARACTERS: &str = r#"{"data":{"results":[
        {"name":"A-Bomb (HAS)","description":"Rick Jones","thumbnail":{"path":"http://img/a-bomb","extension":"jpg"}},
        {"name":"Abyss","description":"","thumbnail":{"path":"http://img/abyss","extension":"png"}}
    ]}}"#;

    /// Replies with a fixed body, or fails when `body` is `None`.
    struct StaticTransport {
        status: u16,
        body: Option<&'static str>,
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            match self.body {
                Some(body) => Ok(HttpResponse {
                    status: self.status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                None => Err(ApiError::Transport("connection refused".to_string())),
            }
        }
    }

    /// Replies from a queue, one entry per request; `None` fails.
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Option<&'static str>>>,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let reply = self.replies.lock().unwrap().pop_front().flatten();
            match reply {
                Some(body) => Ok(HttpResponse {
                    status: 200,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                None => Err(ApiError::Transport("connection reset".to_string())),
            }
        }
    }

    /// Each request waits for the next queued receiver to yield a body.
    struct GatedTransport {
        gates: Mutex<VecDeque<oneshot::Receiver<String>>>,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let gate = self.gates.lock().unwrap().pop_front().unwrap();
            let body = gate.await.unwrap();
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body,
            })
        }
    }

    #[derive(Default)]
    struct RecordingView {
        loaded: Mutex<Vec<Vec<DisplayRecord>>>,
        errors: Mutex<Vec<String>>,
    }

    impl CharactersView for RecordingView {
        fn on_characters_loaded(&self, characters: &[DisplayRecord]) {
            self.loaded.lock().unwrap().push(characters.to_vec());
        }

        fn on_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn presenter(status: u16, body: Option<&'static str>) -> CharactersPresenter<StaticTransport> {
        CharactersPresenter::new(
            CatalogClient::new("http://localhost:3000"),
            StaticTransport { status, body },
        )
    }

    #[tokio::test]
    async fn success_reports_records_in_order() {
        let view = Arc::new(RecordingView::default());
        let presenter = presenter(200, Some(TWO_CHARACTERS));
        presenter.attach_view(&view);

        presenter.fetch_characters().await;

        let loaded = view.loaded.lock().unwrap();
        assert_eq!(loaded.len(), 1);
        let names: Vec<&str> = loaded[0].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A-Bomb (HAS)", "Abyss"]);
        assert_eq!(loaded[0][0].description, "Rick Jones");
        assert_eq!(loaded[0][1].photo_extension, "png");
        assert!(view.errors.lock().unwrap().is_empty());
        assert_eq!(presenter.character_count(), 2);
    }

    #[tokio::test]
    async fn missing_results_reports_some_error() {
        let view = Arc::new(RecordingView::default());
        let presenter = presenter(200, Some(r#"{"code":200,"data":{}}"#));
        presenter.attach_view(&view);

        presenter.fetch_characters().await;

        assert!(view.loaded.lock().unwrap().is_empty());
        assert_eq!(*view.errors.lock().unwrap(), vec!["Some error".to_string()]);
    }

    #[tokio::test]
    async fn transport_failure_forwards_message() {
        let view = Arc::new(RecordingView::default());
        let presenter = presenter(200, None);
        presenter.attach_view(&view);

        presenter.fetch_characters().await;

        assert!(view.loaded.lock().unwrap().is_empty());
        assert_eq!(
            *view.errors.lock().unwrap(),
            vec!["network request failed: connection refused".to_string()]
        );
    }

    #[tokio::test]
    async fn error_status_forwards_message() {
        let view = Arc::new(RecordingView::default());
        let presenter = presenter(409, Some(r#"{"code":409,"status":"Limit greater than 100."}"#));
        presenter.attach_view(&view);

        presenter.fetch_characters().await;

        assert_eq!(
            *view.errors.lock().unwrap(),
            vec!["HTTP 409: Limit greater than 100.".to_string()]
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_list() {
        let view = Arc::new(RecordingView::default());
        let presenter = CharactersPresenter::new(
            CatalogClient::new("http://localhost:3000"),
            ScriptedTransport {
                replies: Mutex::new(VecDeque::from([Some(TWO_CHARACTERS), None])),
            },
        );
        presenter.attach_view(&view);

        presenter.fetch_characters().await;
        presenter.fetch_characters().await;

        assert_eq!(view.loaded.lock().unwrap().len(), 1);
        assert_eq!(view.errors.lock().unwrap().len(), 1);
        assert_eq!(presenter.character_count(), 2);
    }

    #[tokio::test]
    async fn repeated_loads_are_equal() {
        let view = Arc::new(RecordingView::default());
        let presenter = presenter(200, Some(TWO_CHARACTERS));
        presenter.attach_view(&view);

        presenter.fetch_characters().await;
        presenter.fetch_characters().await;

        let loaded = view.loaded.lock().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], loaded[1]);
    }

    #[tokio::test]
    async fn released_view_receives_nothing() {
        let view = Arc::new(RecordingView::default());
        let presenter = presenter(200, Some(TWO_CHARACTERS));
        presenter.attach_view(&view);
        drop(view);

        presenter.fetch_characters().await;

        assert_eq!(presenter.character_count(), 2);
    }

    #[tokio::test]
    async fn superseded_load_is_not_delivered() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let presenter = Arc::new(CharactersPresenter::new(
            CatalogClient::new("http://localhost:3000"),
            GatedTransport {
                gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
            },
        ));
        let view = Arc::new(RecordingView::default());
        presenter.attach_view(&view);

        let first = tokio::spawn({
            let presenter = presenter.clone();
            async move { presenter.fetch_characters().await }
        });
        // Wait until the first load holds its gate.
        while presenter.generation.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let presenter = presenter.clone();
            async move { presenter.fetch_characters().await }
        });
        while presenter.generation.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        second_tx.send(TWO_CHARACTERS.to_string()).unwrap();
        second.await.unwrap();
        first_tx
            .send(r#"{"data":{"results":[]}}"#.to_string())
            .unwrap();
        first.await.unwrap();

        let loaded = view.loaded.lock().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].len(), 2);
        assert_eq!(presenter.character_count(), 2);
    }

    #[tokio::test]
    async fn select_character_hands_over_resolved_record() {
        let presenter = presenter(200, Some(TWO_CHARACTERS));
        presenter.fetch_characters().await;
        let detail = CharacterDetailPresenter::new();

        assert!(presenter.select_character(1, &detail));
        assert_eq!(detail.character(), presenter.character_at(1));
        assert!(!presenter.select_character(5, &detail));
        assert_eq!(detail.character().unwrap().name, "Abyss");
    }

    #[tokio::test]
    async fn closure_form_calls_exactly_one_callback() {
        let client = CatalogClient::new("http://localhost:3000");
        let transport = StaticTransport {
            status: 200,
            body: Some(TWO_CHARACTERS),
        };
        let mut loaded = None;
        let mut failed = None;
        load_characters(
            &client,
            &transport,
            |records| loaded = Some(records),
            |message| failed = Some(message),
        )
        .await;
        assert_eq!(loaded.map(|r| r.len()), Some(2));
        assert_eq!(failed, None);

        let transport = StaticTransport {
            status: 200,
            body: Some("{}"),
        };
        let mut loaded = None;
        let mut failed = None;
        load_characters(
            &client,
            &transport,
            |records| loaded = Some(records),
            |message| failed = Some(message),
        )
        .await;
        assert!(loaded.is_none());
        assert_eq!(failed.as_deref(), Some("Some error"));
    }
}
