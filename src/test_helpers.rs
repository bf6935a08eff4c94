//! Shared test utilities for the titanium-site test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = config::load_config(tmp.path()).unwrap();
//! let entry = find_entry(&config, "Dragão Articulado");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::types::PortfolioEntry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Portfolio data
// =========================================================================

/// `n` distinct entries: `Project 1` … `Project n`, media at
/// `https://cdn.example.com/p<i>.mp4`.
pub fn sample_entries(n: usize) -> Vec<PortfolioEntry> {
    (1..=n)
        .map(|i| PortfolioEntry {
            title: format!("Project {i}"),
            description: format!("Description of project {i}"),
            media_url: format!("https://cdn.example.com/p{i}.mp4"),
            link: format!("https://instagram.com/p/{i}"),
        })
        .collect()
}

/// Find a portfolio entry (featured included) by title. Panics if not found.
pub fn find_entry<'a>(config: &'a SiteConfig, title: &str) -> &'a PortfolioEntry {
    config
        .portfolio
        .all_entries()
        .find(|e| e.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = config
                .portfolio
                .all_entries()
                .map(|e| e.title.as_str())
                .collect();
            panic!("portfolio entry '{title}' not found. Available: {titles:?}")
        })
}
