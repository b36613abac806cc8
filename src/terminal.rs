use crate::app::{GeolocationProvider, MapWidget, View};
use crate::error::GeolocationError;
use crate::render::{ListItem, MarkerPopup};
use crate::types::{Coords, WorkoutKind};

/// Position supplied up front (flag or env). `None` behaves like a
/// device that cannot report a location.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<Coords>);

impl GeolocationProvider for FixedPosition {
    fn request_position(&mut self) -> Result<Coords, GeolocationError> {
        self.0.ok_or(GeolocationError::Unavailable)
    }
}

/// Prints markers and view changes instead of drawing them.
#[derive(Debug)]
pub struct TerminalMap {
    center: Coords,
    zoom: f64,
    markers: usize,
    quiet: bool,
}

impl TerminalMap {
    pub fn new(center: Coords, zoom: f64) -> Self {
        tracing::info!(%center, zoom, "map created");
        Self {
            center,
            zoom,
            markers: 0,
            quiet: false,
        }
    }

    /// Keeps markers off stdout, e.g. when only a list is wanted.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub const fn center(&self) -> Coords {
        self.center
    }

    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    pub const fn markers(&self) -> usize {
        self.markers
    }
}

impl MapWidget for TerminalMap {
    fn add_marker(&mut self, coords: Coords, popup: &MarkerPopup) {
        self.markers += 1;
        if !self.quiet {
            println!("📍 {coords}  {}", popup.content);
        }
    }

    fn recenter(&mut self, coords: Coords, zoom: f64) {
        self.center = coords;
        self.zoom = zoom;
        println!("map centered on {coords} (zoom {zoom})");
    }
}

/// Alerts go to stderr. List items are printed only when `show_list` is set.
#[derive(Debug, Default)]
pub struct TerminalView {
    show_list: bool,
}

impl TerminalView {
    pub const fn new(show_list: bool) -> Self {
        Self { show_list }
    }
}

impl View for TerminalView {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn show_form(&mut self, anchor: Coords) {
        crate::dlog!("form open at {anchor}");
    }

    fn hide_form(&mut self) {
        crate::dlog!("form closed");
    }

    fn toggle_kind_fields(&mut self, kind: WorkoutKind) {
        crate::dlog!("form fields switched to {kind}");
    }

    fn render_workout(&mut self, item: &ListItem) {
        if self.show_list {
            println!("{}", item.to_line());
        }
    }

    fn clear_workouts(&mut self) {
        crate::dlog!("workout list cleared");
    }
}
