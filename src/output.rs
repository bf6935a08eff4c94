//! CLI output formatting.
//!
//! Output is information-first: every entity leads with a positional index
//! and its title, with URLs and paths as indented context lines.
//!
//! ## Check
//!
//! ```text
//! Sections
//! 001 Header (Titanium Maker)
//! 002 Hero
//! 003 O Que Fazemos → #services (3 cards)
//! ...
//!
//! Portfolio
//! 001 Escultura Personalizada (featured)
//!     Media: https://i.imgur.com/4wurvfO.mp4
//!     Link: https://www.instagram.com/reel/DPzRsMVjwYE/
//!
//! Lazy media
//!     Threshold: 10% visible
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//!
//! Deferred media
//! 001 Escultura Personalizada → https://i.imgur.com/4wurvfO.mp4
//!
//! Assets
//!     favicon.svg
//!
//! Generated 1 page, 6 deferred videos, 1 asset
//! ```
//!
//! Each `format_*` function is pure and returns lines; `print_*` wraps it.

use crate::config::SiteConfig;
use crate::gallery::Gallery;
use crate::generate::GenerateReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the content inventory shown by `check`.
pub fn format_check_output(config: &SiteConfig, gallery: &Gallery) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];

    let sections = [
        format!("Header ({})", config.brand.full_name()),
        "Hero".to_string(),
        format!(
            "{} → #{} ({})",
            config.services.title,
            config.services.anchor,
            plural(config.services.cards.len(), "card", "cards")
        ),
        format!(
            "{} → #{} ({})",
            config.differentiators.title,
            config.differentiators.anchor,
            plural(config.differentiators.cards.len(), "card", "cards")
        ),
        format!(
            "{} ({})",
            config.steps.title,
            plural(config.steps.items.len(), "step", "steps")
        ),
        format!(
            "{} → #{} ({})",
            config.portfolio.title,
            config.portfolio.anchor,
            plural(gallery.len(), "entry", "entries")
        ),
        config.final_cta.title.clone(),
        "Footer".to_string(),
    ];
    for (i, title) in sections.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), title));
    }

    lines.push(String::new());
    lines.push("Portfolio".to_string());
    let featured = config.portfolio.featured_entry().is_some();
    for (i, item) in gallery.iter().enumerate() {
        if featured && i == 0 {
            lines.push(format!("{} {} (featured)", format_index(i + 1), item.entry.title));
        } else {
            lines.push(format!("{} {}", format_index(i + 1), item.entry.title));
        }
        if !item.entry.description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&item.entry.description, 60)
            ));
        }
        lines.push(format!("{}Media: {}", indent(1), item.media.source_url()));
        lines.push(format!("{}Link: {}", indent(1), item.entry.link));
    }

    lines.push(String::new());
    lines.push("Lazy media".to_string());
    lines.push(format!(
        "{}Threshold: {}% visible",
        indent(1),
        (config.lazy_media.threshold * 100.0).round()
    ));
    lines.push(format!("{}Contact: {}", indent(1), config.contact.whatsapp_link()));

    lines
}

pub fn print_check_output(config: &SiteConfig, gallery: &Gallery) {
    for line in format_check_output(config, gallery) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the files and deferred media written by `build`.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in &report.pages {
        lines.push(format!("Home → {}", page));
    }

    if !report.media.is_empty() {
        lines.push(String::new());
        lines.push("Deferred media".to_string());
        for (i, media) in report.media.iter().enumerate() {
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                media.title,
                media.source_url
            ));
        }
    }

    if !report.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &report.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.media.len(), "deferred video", "deferred videos"),
        plural(report.assets.len(), "asset", "assets"),
    ));

    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
