//! Content records shared by the config loader and the section renderers.

use serde::{Deserialize, Serialize};

/// One showcased project in the portfolio gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioEntry {
    pub title: String,
    pub description: String,
    /// Video shown in the card once it scrolls into view.
    pub media_url: String,
    /// Where the card links to (Instagram post, reel, profile).
    pub link: String,
}

/// A feature card in the services and differentiators grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Card {
    /// Font Awesome icon name without the `fa-` prefix (e.g. `cube`).
    pub icon: String,
    pub title: String,
    pub text: String,
}

/// One step of the "how it works" explainer. Steps are numbered by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub title: String,
    pub text: String,
}
