//! In-process intersection host.
//!
//! [`SimulatedViewport`] implements [`IntersectionHost`] over plain vertical
//! geometry: each region is a [`Rect`] on the page, the viewport is a window of
//! fixed height at the current scroll offset. Scrolling recomputes overlap
//! ratios and reports entries the way `IntersectionObserver` does: once when a
//! watch is first evaluated, then whenever a region crosses its threshold.
//!
//! Host and watches live on one logical thread and share the registry through
//! `Rc<RefCell<_>>`.

use crate::lazy_media::{IntersectionEntry, IntersectionHost, ObserveOptions, RegionId, Watch};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Vertical extent of a region, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Fraction of this rect inside `[view_top, view_top + view_height)`.
    pub fn overlap_ratio(&self, view_top: f64, view_height: f64) -> f64 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let start = self.top.max(view_top);
        let end = (self.top + self.height).min(view_top + view_height);
        ((end - start).max(0.0) / self.height).min(1.0)
    }
}

#[derive(Debug)]
struct Slot {
    id: u64,
    region: RegionId,
    threshold: f64,
    /// Qualifying status at the last evaluation; `None` before the first one.
    last: Option<bool>,
}

#[derive(Debug, Default)]
struct Registry {
    regions: BTreeMap<RegionId, Rect>,
    slots: Vec<Slot>,
    next_id: u64,
}

/// A scriptable viewport for driving deferred media outside a browser.
#[derive(Debug)]
pub struct SimulatedViewport {
    registry: Rc<RefCell<Registry>>,
    scroll_top: f64,
    height: f64,
    supported: bool,
}

impl SimulatedViewport {
    pub fn new(height: f64) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            scroll_top: 0.0,
            height,
            supported: true,
        }
    }

    /// A viewport whose environment lacks an observation primitive.
    pub fn without_observer(height: f64) -> Self {
        Self {
            supported: false,
            ..Self::new(height)
        }
    }

    /// Position (or move) a region on the page.
    pub fn place(&mut self, region: RegionId, rect: Rect) {
        self.registry.borrow_mut().regions.insert(region, rect);
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Number of watches still connected.
    pub fn active_watches(&self) -> usize {
        self.registry.borrow().slots.len()
    }

    /// Scroll to `top` and collect the entries the move produces.
    pub fn scroll_to(&mut self, top: f64) -> Vec<IntersectionEntry> {
        self.scroll_top = top.max(0.0);
        self.evaluate()
    }

    /// Re-evaluate every connected watch at the current scroll offset.
    ///
    /// Entries come back in watch registration order.
    pub fn evaluate(&mut self) -> Vec<IntersectionEntry> {
        let mut registry = self.registry.borrow_mut();
        let Registry { regions, slots, .. } = &mut *registry;

        let mut entries = Vec::new();
        for slot in slots.iter_mut() {
            let ratio = regions
                .get(&slot.region)
                .map(|rect| rect.overlap_ratio(self.scroll_top, self.height))
                .unwrap_or(0.0);
            let is_intersecting = ratio > 0.0;
            let qualifying = is_intersecting && ratio >= slot.threshold;
            if slot.last != Some(qualifying) {
                slot.last = Some(qualifying);
                entries.push(IntersectionEntry {
                    region: slot.region,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

impl IntersectionHost for SimulatedViewport {
    type Watch = SimulatedWatch;

    fn observe(&mut self, region: RegionId, options: ObserveOptions) -> Option<SimulatedWatch> {
        if !self.supported {
            return None;
        }
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.slots.push(Slot {
            id,
            region,
            threshold: options.threshold,
            last: None,
        });
        Some(SimulatedWatch {
            id,
            registry: Rc::clone(&self.registry),
        })
    }
}

/// A watch registered with a [`SimulatedViewport`].
#[derive(Debug)]
pub struct SimulatedWatch {
    id: u64,
    registry: Rc<RefCell<Registry>>,
}

impl Watch for SimulatedWatch {
    fn disconnect(&mut self) {
        self.registry.borrow_mut().slots.retain(|s| s.id != self.id);
    }

    fn is_connected(&self) -> bool {
        self.registry.borrow().slots.iter().any(|s| s.id == self.id)
    }
}
