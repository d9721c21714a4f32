use crate::field::Section;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBand {
    pub label: &'static str,
    pub section: Option<Section>,
}

/// The scrollable page, top to bottom.
pub const PAGE: [PageBand; 5] = [
    PageBand {
        label: "Home",
        section: None,
    },
    PageBand {
        label: "About",
        section: Some(Section::About),
    },
    PageBand {
        label: "Projects",
        section: Some(Section::Projects),
    },
    PageBand {
        label: "Skills",
        section: Some(Section::Skills),
    },
    PageBand {
        label: "Contact",
        section: Some(Section::Contact),
    },
];

/// Tracks a virtual scroll offset over [`PAGE`] and reports which band
/// intersects the middle of the viewport.
#[derive(Debug, Clone)]
pub struct ScrollNavigator {
    band_height: f32,
    viewport: f32,
    offset: f32,
    active: usize,
}

impl ScrollNavigator {
    /// Each band is one viewport tall.
    pub fn new(viewport: f32) -> Self {
        let viewport = viewport.max(1.0);
        let mut nav = Self {
            band_height: viewport,
            viewport,
            offset: 0.0,
            active: 0,
        };
        nav.active = nav.band_at_centre();
        nav
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_band(&self) -> &'static PageBand {
        &PAGE[self.active]
    }

    /// Scroll position as a fraction of the scrollable range.
    pub fn progress(&self) -> f32 {
        let max = self.max_offset();
        if max <= 0.0 { 0.0 } else { self.offset / max }
    }

    pub fn set_viewport(&mut self, viewport: f32) -> Option<&'static PageBand> {
        let viewport = viewport.max(1.0);
        let ratio = viewport / self.viewport;
        self.viewport = viewport;
        self.band_height = viewport;
        self.offset = (self.offset * ratio).clamp(0.0, self.max_offset());
        self.refresh()
    }

    /// Returns the new band when the scroll crossed into it.
    pub fn scroll_by(&mut self, delta: f32) -> Option<&'static PageBand> {
        if !delta.is_finite() {
            return None;
        }
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
        self.refresh()
    }

    /// Jump straight to the top of a band, like a nav link.
    pub fn jump_to(&mut self, index: usize) -> Option<&'static PageBand> {
        if index >= PAGE.len() {
            return None;
        }
        self.offset = (index as f32 * self.band_height).clamp(0.0, self.max_offset());
        self.refresh()
    }

    fn max_offset(&self) -> f32 {
        (self.band_height * PAGE.len() as f32 - self.viewport).max(0.0)
    }

    fn band_at_centre(&self) -> usize {
        let centre = self.offset + self.viewport * 0.5;
        let idx = (centre / self.band_height).floor();
        if idx < 0.0 { 0 } else { (idx as usize).min(PAGE.len() - 1) }
    }

    fn refresh(&mut self) -> Option<&'static PageBand> {
        let next = self.band_at_centre();
        if next == self.active {
            return None;
        }
        self.active = next;
        Some(&PAGE[next])
    }
}
