//! The scrollable output the render queue paints into.

use sitesearch_types::RenderUnit;

/// Scroll geometry of a results container, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerMetrics {
    /// Distance scrolled from the top
    pub scroll_top: f64,
    /// Visible height
    pub client_height: f64,
    /// Height of all rendered content
    pub scroll_height: f64,
}

impl ContainerMetrics {
    /// True until the content overflows the visible height by more than `slack`.
    ///
    /// This is [`near_bottom`](Self::near_bottom) evaluated with the view at
    /// the top, so painting continues until the container can scroll.
    pub fn has_room(&self, slack: f64) -> bool {
        self.client_height >= self.scroll_height - slack
    }

    /// True when the visible area ends within `slack` units of the bottom.
    pub fn near_bottom(&self, slack: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - slack
    }

    /// Geometry is unusable when any value is negative or not finite.
    pub fn is_valid(&self) -> bool {
        [self.scroll_top, self.client_height, self.scroll_height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// A scrollable container that paints render units.
pub trait ResultsContainer {
    /// Append the output for one unit.
    fn append(&mut self, unit: &RenderUnit);

    /// Remove all painted output.
    fn clear(&mut self);

    /// Current scroll geometry.
    fn metrics(&self) -> ContainerMetrics;

    /// Whether the container is still attached to its surface.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Container that keeps painted units in memory.
///
/// Every unit occupies one row of `row_height` units.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    pub painted: Vec<RenderUnit>,
    pub client_height: f64,
    pub row_height: f64,
    pub scroll_top: f64,
    pub connected: bool,
}

impl MemoryContainer {
    pub fn new(client_height: f64, row_height: f64) -> Self {
        Self {
            painted: Vec::new(),
            client_height,
            row_height,
            scroll_top: 0.0,
            connected: true,
        }
    }

    /// Scroll so the last row is visible.
    pub fn scroll_to_bottom(&mut self) {
        let content = self.painted.len() as f64 * self.row_height;
        self.scroll_top = (content - self.client_height).max(0.0);
    }
}

impl ResultsContainer for MemoryContainer {
    fn append(&mut self, unit: &RenderUnit) {
        self.painted.push(unit.clone());
    }

    fn clear(&mut self) {
        self.painted.clear();
        self.scroll_top = 0.0;
    }

    fn metrics(&self) -> ContainerMetrics {
        ContainerMetrics {
            scroll_top: self.scroll_top,
            client_height: self.client_height,
            scroll_height: self.painted.len() as f64 * self.row_height,
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
