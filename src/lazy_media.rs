//! Viewport-deferred media loading.
//!
//! A [`DeferredMedia`] unit wraps one portfolio video. It starts out
//! [`MediaState::Hidden`], rendering a neutral placeholder with no media source
//! bound, and switches to [`MediaState::Shown`] the first time its layout
//! region intersects the viewport by at least the configured threshold.
//!
//! ## Lifecycle
//!
//! ```text
//!   new() ──► Hidden ──mount()──► Hidden + ObservationHandle
//!                                        │
//!                  qualifying intersection│            unmount() / drop
//!                                        ▼                   │
//!                                  Shown (handle released)   ▼
//!                                                      Hidden (handle released)
//! ```
//!
//! The transition happens at most once. The [`ObservationHandle`] disconnects
//! its watch when dropped, so every exit path (transition, unmount, the unit
//! itself going away) releases the host-side observer.
//!
//! ## Hosts
//!
//! The viewport is abstracted behind [`IntersectionHost`]. In a browser, the
//! script embedded by [`crate::generate`] plays that role using
//! `IntersectionObserver`; in-process, [`crate::viewport::SimulatedViewport`]
//! computes overlap ratios from region geometry. A host that cannot observe
//! returns `None` from [`IntersectionHost::observe`] and the unit simply stays
//! hidden.

use maud::{Markup, html};
use thiserror::Error;

/// Fraction of the region that must be visible before the media loads.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Text shown by browsers that cannot play the `<video>` element.
pub const DEFAULT_FALLBACK_TEXT: &str = "Seu navegador não suporta a tag de vídeo.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LazyMediaError {
    #[error("media source URL must not be empty")]
    EmptySource,
    #[error("visibility threshold must be greater than 0 and at most 1, got {0}")]
    InvalidThreshold(f64),
}

/// Identifies one observed layout region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub usize);

/// One geometry report delivered by the host for an observed region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub region: RegionId,
    /// Visible fraction of the region, `0.0..=1.0`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Whether this report is a qualifying intersection for `threshold`.
    pub fn qualifies(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio > 0.0 && self.ratio >= threshold
    }
}

/// Options passed to the host when a watch is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    pub threshold: f64,
}

/// A live host-side watch on a single region.
pub trait Watch {
    /// Stop delivering entries. Must be safe to call more than once.
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
}

/// The environment that reports viewport intersections.
pub trait IntersectionHost {
    type Watch: Watch + 'static;

    /// Start watching `region`. Returns `None` when the host has no
    /// observation primitive.
    fn observe(&mut self, region: RegionId, options: ObserveOptions) -> Option<Self::Watch>;
}

/// Owned watch on one region; disconnects on drop.
pub struct ObservationHandle {
    region: RegionId,
    watch: Box<dyn Watch>,
}

impl ObservationHandle {
    pub fn new(region: RegionId, watch: impl Watch + 'static) -> Self {
        Self {
            region,
            watch: Box::new(watch),
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn is_connected(&self) -> bool {
        self.watch.is_connected()
    }

    pub fn disconnect(&mut self) {
        if self.watch.is_connected() {
            self.watch.disconnect();
        }
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for ObservationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationHandle")
            .field("region", &self.region)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Visibility state of a deferred media unit. `Shown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaState {
    #[default]
    Hidden,
    Shown,
}

/// Outcome of delivering a batch of intersection entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Shown,
    Unchanged,
}

/// Loader tuning shared by every unit on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    pub threshold: f64,
    pub fallback_text: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

impl LoaderOptions {
    pub fn validate(&self) -> Result<(), LazyMediaError> {
        // NaN fails both comparisons.
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(LazyMediaError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// A media placeholder that materializes its video once scrolled into view.
#[derive(Debug)]
pub struct DeferredMedia {
    source_url: String,
    style_class: Option<String>,
    options: LoaderOptions,
    state: MediaState,
    handle: Option<ObservationHandle>,
}

impl DeferredMedia {
    /// Create a hidden unit with default loader options.
    pub fn new(source_url: impl Into<String>, style_class: Option<&str>) -> Result<Self, LazyMediaError> {
        Self::with_options(source_url, style_class, LoaderOptions::default())
    }

    /// Create a hidden unit. Fails on a blank source URL or an out-of-range
    /// threshold.
    pub fn with_options(
        source_url: impl Into<String>,
        style_class: Option<&str>,
        options: LoaderOptions,
    ) -> Result<Self, LazyMediaError> {
        let source_url = source_url.into();
        if source_url.trim().is_empty() {
            return Err(LazyMediaError::EmptySource);
        }
        options.validate()?;
        Ok(Self {
            source_url,
            style_class: style_class.map(str::to_string),
            options,
            state: MediaState::Hidden,
            handle: None,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn state(&self) -> MediaState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == MediaState::Shown
    }

    /// Minimum visible ratio that triggers loading.
    pub fn threshold(&self) -> f64 {
        self.options.threshold
    }

    /// Whether a live watch is currently attached.
    pub fn is_observing(&self) -> bool {
        self.handle.as_ref().is_some_and(ObservationHandle::is_connected)
    }

    /// Attach a watch for the unit's own region.
    ///
    /// A missing region, an already-shown unit, or a host without an
    /// observation primitive all leave the unit untouched.
    pub fn mount<H: IntersectionHost>(&mut self, host: &mut H, region: Option<RegionId>) {
        let Some(region) = region else {
            return;
        };
        if self.state == MediaState::Shown {
            return;
        }
        let options = ObserveOptions {
            threshold: self.options.threshold,
        };
        // Replacing an existing handle drops it, which disconnects the old watch.
        self.handle = host
            .observe(region, options)
            .map(|watch| ObservationHandle::new(region, watch));
    }

    /// Deliver a batch of entries reported by the host.
    ///
    /// Only entries for the observed region count, and only while the watch is
    /// live. The first qualifying entry shows the media and releases the watch.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) -> Transition {
        if self.state == MediaState::Shown {
            return Transition::Unchanged;
        }
        let Some(handle) = self.handle.as_ref().filter(|h| h.is_connected()) else {
            return Transition::Unchanged;
        };
        let region = handle.region();
        let threshold = self.options.threshold;

        if entries
            .iter()
            .any(|e| e.region == region && e.qualifies(threshold))
        {
            self.state = MediaState::Shown;
            self.handle = None;
            return Transition::Shown;
        }
        Transition::Unchanged
    }

    /// Release the watch, if any. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.handle = None;
    }

    /// Render the unit for its current state.
    pub fn render(&self) -> Markup {
        match self.state {
            MediaState::Hidden => html! {
                div.lazy-media data-state="hidden" {
                    (placeholder())
                }
            },
            MediaState::Shown => html! {
                div.lazy-media data-state="shown" {
                    (self.video())
                }
            },
        }
    }

    /// Render for a static page: the current state plus, while hidden, a
    /// `<template>` holding the shown markup for the browser-side loader.
    pub fn render_deferred(&self) -> Markup {
        match self.state {
            MediaState::Shown => self.render(),
            MediaState::Hidden => html! {
                div.lazy-media data-state="hidden" data-lazy-media data-src=(self.source_url) {
                    (placeholder())
                    template { (self.video()) }
                }
            },
        }
    }

    fn video(&self) -> Markup {
        html! {
            video src=(self.source_url) class=[self.style_class.as_deref()]
                autoplay loop muted playsinline preload="metadata" {
                (self.options.fallback_text)
            }
        }
    }
}

fn placeholder() -> Markup {
    html! {
        div.lazy-media-placeholder aria-hidden="true" {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{Rect, SimulatedViewport};
    use std::cell::Cell;
    use std::rc::Rc;

    const URL: &str = "https://example.com/a.mp4";

    /// Host that hands out watches sharing a connection flag with the test.
    #[derive(Default)]
    struct FlagHost {
        flags: Vec<Rc<Cell<bool>>>,
        disconnects: Rc<Cell<usize>>,
    }

    struct FlagWatch {
        connected: Rc<Cell<bool>>,
        disconnects: Rc<Cell<usize>>,
    }

    impl Watch for FlagWatch {
        fn disconnect(&mut self) {
            self.connected.set(false);
            self.disconnects.set(self.disconnects.get() + 1);
        }

        fn is_connected(&self) -> bool {
            self.connected.get()
        }
    }

    impl IntersectionHost for FlagHost {
        type Watch = FlagWatch;

        fn observe(&mut self, _region: RegionId, _options: ObserveOptions) -> Option<FlagWatch> {
            let flag = Rc::new(Cell::new(true));
            self.flags.push(flag.clone());
            Some(FlagWatch {
                connected: flag,
                disconnects: self.disconnects.clone(),
            })
        }
    }

    struct NoObserverHost;

    impl IntersectionHost for NoObserverHost {
        type Watch = FlagWatch;

        fn observe(&mut self, _region: RegionId, _options: ObserveOptions) -> Option<FlagWatch> {
            None
        }
    }

    fn entry(region: usize, ratio: f64) -> IntersectionEntry {
        IntersectionEntry {
            region: RegionId(region),
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    fn mounted(host: &mut FlagHost) -> DeferredMedia {
        let mut media = DeferredMedia::new(URL, Some("cover")).unwrap();
        media.mount(host, Some(RegionId(0)));
        media
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn starts_hidden_and_unobserved() {
        let media = DeferredMedia::new(URL, None).unwrap();
        assert_eq!(media.state(), MediaState::Hidden);
        assert!(!media.is_visible());
        assert!(!media.is_observing());
        assert_eq!(media.threshold(), 0.1);
    }

    #[test]
    fn empty_source_rejected() {
        assert_eq!(
            DeferredMedia::new("", None).unwrap_err(),
            LazyMediaError::EmptySource
        );
        assert_eq!(
            DeferredMedia::new("   ", None).unwrap_err(),
            LazyMediaError::EmptySource
        );
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        for threshold in [0.0, -0.5, 1.5, f64::NAN] {
            let options = LoaderOptions {
                threshold,
                ..LoaderOptions::default()
            };
            assert!(DeferredMedia::with_options(URL, None, options).is_err());
        }
    }

    #[test]
    fn threshold_of_one_is_allowed() {
        let options = LoaderOptions {
            threshold: 1.0,
            ..LoaderOptions::default()
        };
        assert!(DeferredMedia::with_options(URL, None, options).is_ok());
    }

    // =========================================================================
    // Mounting
    // =========================================================================

    #[test]
    fn mount_attaches_watch() {
        let mut host = FlagHost::default();
        let media = mounted(&mut host);
        assert!(media.is_observing());
        assert_eq!(host.flags.len(), 1);
    }

    #[test]
    fn mount_without_region_is_noop() {
        let mut host = FlagHost::default();
        let mut media = DeferredMedia::new(URL, None).unwrap();
        media.mount(&mut host, None);
        assert!(!media.is_observing());
        assert!(host.flags.is_empty());
    }

    #[test]
    fn host_without_observer_leaves_unit_hidden() {
        let mut media = DeferredMedia::new(URL, None).unwrap();
        media.mount(&mut NoObserverHost, Some(RegionId(0)));
        assert!(!media.is_observing());
        assert_eq!(media.on_intersection(&[entry(0, 1.0)]), Transition::Unchanged);
        assert_eq!(media.state(), MediaState::Hidden);
    }

    #[test]
    fn remount_releases_previous_watch() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        media.mount(&mut host, Some(RegionId(0)));
        assert!(!host.flags[0].get());
        assert!(host.flags[1].get());
        assert!(media.is_observing());
    }

    // =========================================================================
    // Intersection handling
    // =========================================================================

    #[test]
    fn qualifying_intersection_shows_and_disconnects() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);

        assert_eq!(media.on_intersection(&[entry(0, 0.1)]), Transition::Shown);
        assert!(media.is_visible());
        assert!(!media.is_observing());
        assert!(!host.flags[0].get());
    }

    #[test]
    fn below_threshold_stays_hidden_and_connected() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);

        assert_eq!(media.on_intersection(&[entry(0, 0.09)]), Transition::Unchanged);
        assert_eq!(media.state(), MediaState::Hidden);
        assert!(media.is_observing());
        assert!(host.flags[0].get());
    }

    #[test]
    fn non_intersecting_entry_ignored_even_with_ratio() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        let stale = IntersectionEntry {
            region: RegionId(0),
            ratio: 0.5,
            is_intersecting: false,
        };
        assert_eq!(media.on_intersection(&[stale]), Transition::Unchanged);
        assert!(media.is_observing());
    }

    #[test]
    fn entries_for_other_regions_ignored() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        assert_eq!(media.on_intersection(&[entry(7, 1.0)]), Transition::Unchanged);
        assert!(media.is_observing());
    }

    #[test]
    fn any_qualifying_entry_in_batch_triggers() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        let batch = [entry(0, 0.0), entry(0, 0.02), entry(0, 0.4)];
        assert_eq!(media.on_intersection(&batch), Transition::Shown);
    }

    #[test]
    fn second_qualifying_event_has_no_effect() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);

        media.on_intersection(&[entry(0, 1.0)]);
        assert_eq!(media.on_intersection(&[entry(0, 1.0)]), Transition::Unchanged);
        assert!(media.is_visible());
        assert_eq!(host.disconnects.get(), 1);
    }

    #[test]
    fn custom_threshold_respected() {
        let mut host = FlagHost::default();
        let options = LoaderOptions {
            threshold: 0.5,
            ..LoaderOptions::default()
        };
        let mut media = DeferredMedia::with_options(URL, None, options).unwrap();
        media.mount(&mut host, Some(RegionId(0)));

        assert_eq!(media.on_intersection(&[entry(0, 0.3)]), Transition::Unchanged);
        assert_eq!(media.on_intersection(&[entry(0, 0.5)]), Transition::Shown);
    }

    #[test]
    fn events_before_mount_ignored() {
        let mut media = DeferredMedia::new(URL, None).unwrap();
        assert_eq!(media.on_intersection(&[entry(0, 1.0)]), Transition::Unchanged);
        assert_eq!(media.state(), MediaState::Hidden);
    }

    // =========================================================================
    // Unmounting
    // =========================================================================

    #[test]
    fn unmount_before_intersection_disconnects_without_transition() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);

        media.unmount();
        assert!(!media.is_observing());
        assert!(!host.flags[0].get());
        assert_eq!(media.on_intersection(&[entry(0, 1.0)]), Transition::Unchanged);
        assert_eq!(media.state(), MediaState::Hidden);
    }

    #[test]
    fn unmount_is_idempotent() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        media.unmount();
        media.unmount();
        assert_eq!(host.disconnects.get(), 1);
    }

    #[test]
    fn unmount_after_transition_is_safe() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        media.on_intersection(&[entry(0, 1.0)]);
        media.unmount();
        assert!(media.is_visible());
        assert_eq!(host.disconnects.get(), 1);
    }

    #[test]
    fn dropping_unit_disconnects_watch() {
        let mut host = FlagHost::default();
        {
            let _media = mounted(&mut host);
        }
        assert!(!host.flags[0].get());
    }

    #[test]
    fn handle_skips_disconnect_when_already_released() {
        let disconnects = Rc::new(Cell::new(0));
        let flag = Rc::new(Cell::new(false));
        let handle = ObservationHandle::new(
            RegionId(3),
            FlagWatch {
                connected: flag,
                disconnects: disconnects.clone(),
            },
        );
        assert_eq!(handle.region(), RegionId(3));
        drop(handle);
        assert_eq!(disconnects.get(), 0);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn hidden_render_is_placeholder_without_source() {
        let media = DeferredMedia::new(URL, Some("cover")).unwrap();
        let html = media.render().into_string();
        assert!(html.contains("lazy-media-placeholder"));
        assert!(html.contains(r#"data-state="hidden""#));
        assert!(!html.contains("<video"));
        assert!(!html.contains(URL));
    }

    #[test]
    fn end_to_end_placeholder_then_video() {
        let mut viewport = SimulatedViewport::new(800.0);
        viewport.place(RegionId(0), Rect::new(1500.0, 224.0));

        let mut media = DeferredMedia::new(URL, Some("cover")).unwrap();
        media.mount(&mut viewport, Some(RegionId(0)));
        let initial = viewport.scroll_to(0.0);
        media.on_intersection(&initial);
        assert!(!media.render().into_string().contains(URL));

        let entries = viewport.scroll_to(800.0);
        assert_eq!(media.on_intersection(&entries), Transition::Shown);

        let html = media.render().into_string();
        assert!(html.contains(&format!(r#"src="{URL}""#)));
        assert!(html.contains(r#"class="cover""#));
        assert!(html.contains("autoplay"));
        assert!(html.contains("loop"));
        assert!(html.contains("muted"));
        assert!(html.contains("playsinline"));
        assert!(html.contains(r#"preload="metadata""#));
        assert!(html.contains(DEFAULT_FALLBACK_TEXT));
        assert!(!media.is_observing());
        assert_eq!(viewport.active_watches(), 0);
    }

    #[test]
    fn style_class_omitted_when_absent() {
        let mut host = FlagHost::default();
        let mut media = DeferredMedia::new(URL, None).unwrap();
        media.mount(&mut host, Some(RegionId(0)));
        media.on_intersection(&[entry(0, 1.0)]);
        let html = media.render().into_string();
        assert!(html.contains("<video src="));
        // Only the wrapper div carries a class.
        assert_eq!(html.matches("class=").count(), 1);
    }

    #[test]
    fn deferred_render_carries_template() {
        let media = DeferredMedia::new(URL, Some("cover")).unwrap();
        let html = media.render_deferred().into_string();
        assert!(html.contains("data-lazy-media"));
        assert!(html.contains(&format!(r#"data-src="{URL}""#)));
        assert!(html.contains("<template><video"));
        assert!(html.contains("lazy-media-placeholder"));
    }

    #[test]
    fn deferred_render_of_shown_unit_has_no_template() {
        let mut host = FlagHost::default();
        let mut media = mounted(&mut host);
        media.on_intersection(&[entry(0, 1.0)]);
        let html = media.render_deferred().into_string();
        assert!(!html.contains("<template>"));
        assert!(html.contains("<video"));
    }

    #[test]
    fn custom_fallback_text_rendered_and_escaped() {
        let options = LoaderOptions {
            fallback_text: "No <video> here".to_string(),
            ..LoaderOptions::default()
        };
        let media = DeferredMedia::with_options(URL, None, options).unwrap();
        let html = media.render_deferred().into_string();
        assert!(html.contains("No &lt;video&gt; here"));
    }
}
