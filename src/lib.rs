//! # NFT Forge
//!
//! A client-side tool that generates AI images from text prompts, applies
//! simple visual edits (filters and rotation), keeps a bounded history of
//! generated assets, and simulates listing them on a marketplace.
//!
//! # Architecture: Asset Lifecycle Core
//!
//! Everything revolves around a single explicit state machine, the
//! [`session::Session`], which owns three collections and keeps them
//! consistent:
//!
//! ```text
//! Session ── AssetHistory   (owns the assets, newest first, capacity 12)
//!         ├─ ListingSet     (asset ids marked as listed — references only)
//!         └─ Selection      (at most one current asset id)
//! ```
//!
//! Two collaborators are injected at the seams so the core stays
//! deterministic and testable:
//!
//! - the **generation backend** ([`generation::GenerationBackend`]) turns a
//!   prompt and aspect ratio into raster bytes, over the network;
//! - the **compositor** ([`compositing::Compositor`]) renders edits: a
//!   fixed filter stack (brightness → contrast → grayscale → sepia) plus
//!   quarter-turn rotation, pixel-identical to the input at defaults.
//!
//! State persists as two JSON records (`history.json`, `listed.json`) in a
//! state directory, rewritten in full after every mutation and restored at
//! startup. Malformed state loads as empty — never fatal.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`asset`] | Data model: `Asset`, `AssetId`, `AspectRatio`, data-URI codecs |
//! | [`store`] | Bounded history, listing set, durable JSON records |
//! | [`compositing`] | The edit pipeline: params, filter math, compositor backends |
//! | [`generation`] | Prompt validation, asset construction, the Gemini client |
//! | [`session`] | The state machine tying it all together |
//! | [`share`] | Share-URL construction and download-filename derivation |
//! | [`config`] | Layered TOML/env configuration |
//!
//! # Design Decisions
//!
//! ## Explicit single-flight, not a disabled button
//!
//! Generation is admitted through a ticket ([`session::GenerationTicket`]):
//! one outstanding ticket at a time, stale results discarded on delivery.
//! This holds for programmatic callers too, not just a UI that happens to
//! disable its submit control.
//!
//! ## Eviction cascades like deletion
//!
//! When the 13th asset pushes the oldest out of the history, the evicted id
//! is also unlisted and deselected — the same cascade explicit deletion
//! runs. A listed id therefore always resolves to a live asset.
//!
//! ## Software compositing by default
//!
//! The compositor is a trait; the shipped implementation is a pure-software
//! rasterizer on the `image` crate. Edits are deterministic and run the
//! same everywhere a PNG decodes — no GPU, no canvas, no system library.

pub mod asset;
pub mod compositing;
pub mod config;
pub mod generation;
pub mod session;
pub mod share;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
