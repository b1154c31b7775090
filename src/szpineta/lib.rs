//! # Szpineta Architecture
//!
//! Szpineta keeps a static poetry site alive: the site is two hand-maintained HTML
//! pages (`poems.html`, the full listing, and `index.html`, the summary) and this
//! crate is everything that edits or reads them. New poems are spliced into both
//! pages; share pages and story-card images are derived from the listing on demand.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients: CLI (cli/, wired by main.rs) and HTTP (http/)     │
//! │  - Parse arguments / requests, print / build responses      │
//! │  - Auth, content negotiation, status codes                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns config and renderer      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - add, show, share, card                                   │
//! │  - Built on markup/ (text surgery) and card/ (rendering)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore trait with revision checks                 │
//! │  - FileStore (local), GitHubStore (contents API),           │
//! │    MemoryStore (tests)                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Markup Is Text
//!
//! The pages are never parsed into a DOM. Everything in [`markup`] works on the raw
//! text with regular expressions and offsets, so an insertion changes nothing but
//! the bytes it adds and the author's formatting survives untouched.
//!
//! ## Testing Strategy
//!
//! 1. **Markup and card layout**: unit tests over literal HTML and a fixed-width
//!    measurer.
//! 2. **Commands**: run against `MemoryStore`, including simulated write failures
//!    and concurrent edits.
//! 3. **HTTP**: the router is driven in-process with `tower::ServiceExt::oneshot`.
//! 4. **CLI**: `tests/cli.rs` runs the binary against a temporary site.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each operation
//! - [`markup`]: Locating, numbering, formatting and extracting poems in page text
//! - [`card`]: Story-card layout and rasterization
//! - [`store`]: Document storage abstraction and implementations
//! - [`http`]: Router, handlers, auth and response shapes for the site server
//! - [`model`]: Core data types (`Submission`, `AddedPoem`, `PoemText`)
//! - [`config`]: `szpineta.json` plus environment overrides
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod card;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod markup;
pub mod model;
pub mod store;
