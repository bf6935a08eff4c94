//! Portfolio gallery: one deferred media unit per entry.
//!
//! Unit `i` observes region `RegionId(i)`. Units never share state or watches,
//! so an intersection for one card cannot affect another.

use crate::lazy_media::{
    DeferredMedia, IntersectionEntry, IntersectionHost, LazyMediaError, LoaderOptions, RegionId,
    Transition,
};
use crate::types::PortfolioEntry;
use maud::{Markup, html};

/// Class applied to each video once it is shown.
pub const VIDEO_CLASS: &str = "portfolio-video";

#[derive(Debug)]
pub struct GalleryItem {
    pub entry: PortfolioEntry,
    pub media: DeferredMedia,
}

#[derive(Debug, Default)]
pub struct Gallery {
    items: Vec<GalleryItem>,
}

impl Gallery {
    pub fn new<'a>(
        entries: impl IntoIterator<Item = &'a PortfolioEntry>,
        options: &LoaderOptions,
    ) -> Result<Self, LazyMediaError> {
        let items = entries
            .into_iter()
            .map(|entry| {
                let media = DeferredMedia::with_options(
                    entry.media_url.as_str(),
                    Some(VIDEO_CLASS),
                    options.clone(),
                )?;
                Ok::<_, LazyMediaError>(GalleryItem {
                    entry: entry.clone(),
                    media,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unit(&self, index: usize) -> Option<&DeferredMedia> {
        self.items.get(index).map(|item| &item.media)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.iter()
    }

    /// Attach every unit to `host`, each on its own region.
    pub fn mount_all<H: IntersectionHost>(&mut self, host: &mut H) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.media.mount(host, Some(RegionId(i)));
        }
    }

    pub fn unmount_all(&mut self) {
        for item in &mut self.items {
            item.media.unmount();
        }
    }

    /// Route a batch of entries to the units; returns the indices that
    /// switched to shown.
    pub fn dispatch(&mut self, entries: &[IntersectionEntry]) -> Vec<usize> {
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(|(i, item)| {
                let own: Vec<IntersectionEntry> = entries
                    .iter()
                    .filter(|e| e.region == RegionId(i))
                    .copied()
                    .collect();
                if own.is_empty() {
                    return None;
                }
                (item.media.on_intersection(&own) == Transition::Shown).then_some(i)
            })
            .collect()
    }

    /// Portfolio cards, each linking out and holding its deferred video.
    pub fn render(&self) -> Markup {
        html! {
            div.portfolio-grid {
                @for item in &self.items {
                    a.portfolio-card href=(item.entry.link) target="_blank" rel="noopener noreferrer" {
                        div.portfolio-media {
                            (item.media.render_deferred())
                            div.portfolio-overlay {}
                            div.portfolio-badge {
                                i.fa-solid.fa-arrow-up-right-from-square {}
                            }
                        }
                        div.portfolio-body {
                            h3 { (item.entry.title) }
                            p { (item.entry.description) }
                        }
                    }
                }
            }
        }
    }
}
