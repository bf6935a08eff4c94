//! # Titanium Site
//!
//! A static generator for the landing page of a 3D printing studio. One
//! `config.toml` holds the copy, contact details and portfolio; the output is a
//! single `index.html` with inlined CSS and a few lines of vanilla JavaScript.
//!
//! # Deferred Media
//!
//! The portfolio is a grid of looping videos. Loading all of them up front
//! would stall the first paint, so each card holds a [`lazy_media::DeferredMedia`]
//! unit: a placeholder that materializes its `<video>` the first time the card
//! is sufficiently visible, then stops observing.
//!
//! ```text
//! Hidden ──(intersection ratio ≥ threshold)──► Shown
//!   │                                            (watch released)
//!   └──(unmount / drop)──► watch released, no transition
//! ```
//!
//! The unit is host-agnostic. [`lazy_media::IntersectionHost`] stands in for
//! the browser's `IntersectionObserver`; [`viewport::SimulatedViewport`] is an
//! in-process host driven by scroll offsets, and the generated page embeds a
//! script that performs the same transition in the browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`lazy_media`] | The deferred media state machine, observation handle and host traits |
//! | [`viewport`] | Geometry-driven intersection host for exercising units outside a browser |
//! | [`gallery`] | One deferred unit per portfolio entry; event routing and card markup |
//! | [`sections`] | Pure Maud renderers for every page section |
//! | [`generate`] | Loads the site, renders `index.html`, copies assets |
//! | [`config`] | `config.toml` loading, merging onto stock defaults, validation, CSS variables |
//! | [`contact`] | WhatsApp deep links |
//! | [`types`] | Content records (`PortfolioEntry`, `Card`, `Step`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are Rust
//! code, checked at compile time and escaped by default. The deferred unit
//! renders both of its states with the same code, so the `<video>` the browser
//! swaps in is exactly the markup the Rust side produces for `Shown`.
//!
//! ## Owned Observation Handles
//!
//! A unit's watch lives in an [`lazy_media::ObservationHandle`] whose `Drop`
//! disconnects it. Showing the media, unmounting and dropping the unit all go
//! through that one release path, so no watcher outlives its unit.
//!
//! ## Config Over Hardcoded Content
//!
//! Every text, link and portfolio entry has a stock default reproducing the
//! original page. A `config.toml` overrides any subset; see [`config`].

pub mod config;
pub mod contact;
pub mod gallery;
pub mod generate;
pub mod lazy_media;
pub mod output;
pub mod sections;
pub mod types;
pub mod viewport;

#[cfg(test)]
mod test_helpers;
