//! Presentation core for a comic-book character catalog.
//!
//! # Overview
//! Fetches the character list from the catalog API, maps each record into a
//! flat `DisplayRecord`, and reports either the list or an error message to a
//! view. A selected record is handed to the detail presenter as-is.
//!
//! # Design
//! - `CatalogClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO).
//! - `Transport` performs the round-trip; `ReqwestTransport` is the default.
//!   A native host can skip it and drive `build_*`/`parse_*` itself through
//!   the C ABI.
//! - Presenters hold `Weak` references to their views.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod http;
pub mod mapper;
pub mod presenter;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::{extract_results, fetch_character_list, CatalogClient};
pub use config::{ClientConfig, ConfigError};
pub use detail::{CharacterDetailPresenter, CharacterDetailView};
pub use error::{ApiError, MISSING_RESULTS_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapper::{image_url, image_url_for, to_display_records};
pub use presenter::{load_characters, CharactersPresenter, CharactersView};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CatalogRecord, CharacterDataContainer, CharacterDataWrapper, DisplayRecord, ImageVariant,
    Thumbnail,
};
