//! Typed async client for the setlist.fm REST API.
//!
//! # Overview
//! Each call is described by an `Endpoint` (relative path plus string
//! parameters), turned into an `HttpRequest` by a pure builder, executed by
//! a pluggable `Transport`, and decoded into a typed record. Every failure
//! comes back as an `ApiError`; nothing in the pipeline panics on bad
//! server data.
//!
//! # Design
//! - `SetlistClient` holds only immutable state (`ClientConfig` and the
//!   transport), so one client can serve any number of concurrent calls.
//! - Calls are one-shot: no retry, caching, rate limiting or pagination.
//! - The awaitable (`dispatch`, `execute`, per-endpoint methods) and
//!   callback (`dispatch_with`, `execute_with`) forms share one pipeline.
//! - `build_request` and `parse_response` are public, so a host can run the
//!   HTTP exchange itself and still use the client's encoding and error
//!   classification.
//!
//! ```no_run
//! use setlistfm_core::{ClientConfig, Language, SetlistClient};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("my-api-key").with_language(Language::German);
//! let client = SetlistClient::new(config);
//! let artist = client.artist("a74b1b7f-71a5-4011-9441-d0b5e4122711").await?;
//! println!("{:?}", artist.name);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod language;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{parse_response, PendingRequest, SetlistClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use endpoint::Endpoint;
pub use endpoints::{ApiRequest, ArtistSearch, ArtistSort, CitySearch, SetlistSearch, VenueSearch};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use language::Language;
pub use request::build_request;
pub use transport::{StaticTransport, Transport, UreqTransport};
pub use types::{
    Artist, Artists, Cities, City, Coords, Countries, Country, Set, Setlist, Setlists, Sets, Song, Tour, User,
    Venue, Venues,
};
