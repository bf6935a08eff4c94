//! HTML site generation.
//!
//! Loads the site config, builds the portfolio [`Gallery`], and writes a single
//! self-contained `index.html` next to any static assets.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html        # The landing page (CSS and JS inlined)
//! └── ...               # Everything under <source>/assets/, copied as-is
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/lazy-media.js`: the browser-side deferred media loader
//!
//! Each portfolio unit is emitted in its hidden state with a `<template>`
//! holding the video markup. The script observes every `[data-lazy-media]`
//! element with its own `IntersectionObserver` and swaps the template in on
//! the first qualifying intersection. The threshold travels on
//! `<body data-lazy-threshold>`. Browsers without `IntersectionObserver`
//! keep the placeholders.

use crate::config::{self, ConfigError, SiteConfig};
use crate::gallery::Gallery;
use crate::lazy_media::LazyMediaError;
use crate::sections;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Portfolio error: {0}")]
    LazyMedia(#[from] LazyMediaError),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/lazy-media.js");

/// What a build wrote, for CLI reporting.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Pages written, relative to the output directory.
    pub pages: Vec<String>,
    /// Deferred portfolio videos, in gallery order.
    pub media: Vec<MediaReport>,
    /// Assets copied, relative to the output directory.
    pub assets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaReport {
    pub title: String,
    pub source_url: String,
}

/// Load and validate the config in `source_dir` and build its gallery.
pub fn load_site(source_dir: &Path) -> Result<(SiteConfig, Gallery), GenerateError> {
    let config = config::load_config(source_dir)?;
    let gallery = Gallery::new(
        config.portfolio.all_entries(),
        &config.lazy_media.to_loader_options(),
    )?;
    Ok((config, gallery))
}

pub fn generate(source_dir: &Path, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let (config, gallery) = load_site(source_dir)?;

    fs::create_dir_all(output_dir)?;
    let page = render_page(&config, &gallery);
    fs::write(output_dir.join("index.html"), page.into_string())?;

    let assets = copy_assets(&source_dir.join("assets"), output_dir)?;

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages: vec!["index.html".to_string()],
        media: gallery
            .iter()
            .map(|item| MediaReport {
                title: item.entry.title.clone(),
                source_url: item.media.source_url().to_string(),
            })
            .collect(),
        assets,
    })
}

/// Copy `assets_dir` recursively into `output_dir`. A missing directory is
/// not an error.
fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<Vec<String>, GenerateError> {
    if !assets_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut copied = Vec::new();
    for entry in WalkDir::new(assets_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(assets_dir) else {
            continue;
        };
        let dest = output_dir.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(copied)
}

/// Render the complete landing page document.
pub fn render_page(config: &SiteConfig, gallery: &Gallery) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    base_document(config, &css, sections::landing_page(config, gallery))
}

/// Renders the base HTML document structure
fn base_document(config: &SiteConfig, css: &str, content: Markup) -> Markup {
    let site = &config.site;
    html! {
        (DOCTYPE)
        html lang=(site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (site.title) }
                @if !site.description.is_empty() {
                    meta name="description" content=(site.description);
                }
                @if let Some(href) = &site.icon_stylesheet {
                    link rel="stylesheet" href=(href) crossorigin="anonymous" referrerpolicy="no-referrer";
                }
                style { (PreEscaped(css)) }
            }
            body data-lazy-threshold=(config.lazy_media.threshold) {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
