use glam::DVec2;
use std::f64::consts::PI;

/// Zoom scale bounds; cell-size interpolation in the clustering grid spans
/// the same range.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;

/// Geographic frame the view is clamped to (Iceland to the Urals side of
/// the Caucasus, Mediterranean to North Cape).
pub const FRAME_WEST: f64 = -25.0;
pub const FRAME_EAST: f64 = 45.0;
pub const FRAME_SOUTH: f64 = 34.0;
pub const FRAME_NORTH: f64 = 71.5;

/// Viewport representing the visible map area and zoom level.
/// Zoom 1 frames the whole configured region across the viewport width.
#[derive(Clone)]
pub struct Viewport {
    /// Center longitude (degrees)
    pub center_lon: f64,
    /// Center latitude (degrees)
    pub center_lat: f64,
    /// Zoom scale (1 = home framing, higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Web Mercator, normalized to [0, 1] on both axes (y grows south).
#[inline]
fn to_mercator(lon: f64, lat: f64) -> DVec2 {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat * PI / 180.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    DVec2::new(x, y)
}

#[inline]
fn from_mercator(m: DVec2) -> (f64, f64) {
    let lon = m.x * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * m.y)).sinh().atan();
    (lon, lat_rad * 180.0 / PI)
}

/// Normalized width of the clamp frame; zoom 1 maps this span to the
/// viewport width.
fn frame_span_x() -> f64 {
    (FRAME_EAST - FRAME_WEST) / 360.0
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        let mut vp = Self {
            center_lon,
            center_lat,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        };
        vp.clamp_center();
        vp
    }

    /// Home view: the full frame centered.
    pub fn home(width: usize, height: usize) -> Self {
        let nw = to_mercator(FRAME_WEST, FRAME_NORTH);
        let se = to_mercator(FRAME_EAST, FRAME_SOUTH);
        let (lon, lat) = from_mercator((nw + se) * 0.5);
        Self::new(lon, lat, MIN_ZOOM, width, height)
    }

    /// Pixels per normalized-mercator unit at the current zoom.
    #[inline]
    fn scale(&self) -> f64 {
        self.zoom * self.width as f64 / frame_span_x()
    }

    /// Project (lon, lat) to fractional pixel coordinates.
    pub fn project_f64(&self, lon: f64, lat: f64) -> DVec2 {
        let m = to_mercator(lon, lat);
        let center = to_mercator(self.center_lon, self.center_lat);
        (m - center) * self.scale() + DVec2::new(self.width as f64, self.height as f64) * 0.5
    }

    /// Project (lon, lat) to whole pixel coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let p = self.project_f64(lon, lat);
        (p.x as i32, p.y as i32)
    }

    /// Unproject pixel coordinates back to (lon, lat).
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let center = to_mercator(self.center_lon, self.center_lat);
        let offset = DVec2::new(
            px as f64 - self.width as f64 / 2.0,
            py as f64 - self.height as f64 / 2.0,
        );
        from_mercator(center + offset / self.scale())
    }

    /// Pan the viewport by a pixel delta, clamped to the frame.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let center = to_mercator(self.center_lon, self.center_lat);
        let moved = center + DVec2::new(dx as f64, dy as f64) / self.scale();
        let (lon, lat) = from_mercator(moved);
        self.center_lon = lon;
        self.center_lat = lat;
        self.clamp_center();
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.5);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.5);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.clamp_center();
    }

    /// Move the center directly (fly-to animation steps), clamped.
    pub fn set_center(&mut self, lon: f64, lat: f64) {
        self.center_lon = lon;
        self.center_lat = lat;
        self.clamp_center();
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor keeping the geography under the cursor fixed:
    /// unproject the cursor, zoom, and pan the reprojection error away.
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.set_zoom(self.zoom * factor);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Zoom level at which geographic bounds (west, south, east, north)
    /// occupy at most `fraction` of the viewport on both axes, clamped to
    /// the zoom range.
    pub fn zoom_to_fit(&self, bounds: (f64, f64, f64, f64), fraction: f64) -> f64 {
        let (w, s, e, n) = bounds;
        let span = (to_mercator(e, s) - to_mercator(w, n)).abs();
        // At zoom z the bounds span z * width * span / frame_span_x pixels
        let fit_x = fraction * frame_span_x() / span.x.max(1e-12);
        let fit_y = fraction * frame_span_x() * self.height as f64
            / (self.width as f64 * span.y.max(1e-12));
        fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Keep the rendered frame inside the view: the visible half-extent
    /// (derived from the viewport dimensions and current scale) may not
    /// leave the frame. When the whole frame axis fits, pin to its middle.
    fn clamp_center(&mut self) {
        let nw = to_mercator(FRAME_WEST, FRAME_NORTH);
        let se = to_mercator(FRAME_EAST, FRAME_SOUTH);
        let scale = self.scale();
        let half = DVec2::new(self.width as f64, self.height as f64) * 0.5 / scale;

        let mut center = to_mercator(self.center_lon, self.center_lat);
        center.x = clamp_axis(center.x, nw.x, se.x, half.x);
        center.y = clamp_axis(center.y, nw.y, se.y, half.y);

        let (lon, lat) = from_mercator(center);
        self.center_lon = lon;
        self.center_lat = lat;
    }

    /// Check if a projected point is visible in the viewport (small margin
    /// so markers straddling the edge still draw).
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

fn clamp_axis(value: f64, lo: f64, hi: f64, half_extent: f64) -> f64 {
    if half_extent * 2.0 >= hi - lo {
        (lo + hi) * 0.5
    } else {
        value.clamp(lo + half_extent, hi - half_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_roundtrip() {
        let vp = Viewport::new(10.0, 50.0, 4.0, 400, 300);
        let p = vp.project_f64(12.5, 48.0);
        let (lon, lat) = vp.unproject(p.x as i32, p.y as i32);
        assert!((lon - 12.5).abs() < 0.5);
        assert!((lat - 48.0).abs() < 0.5);
    }

    #[test]
    fn test_center_projects_to_middle() {
        let vp = Viewport::new(10.0, 50.0, 4.0, 400, 300);
        let p = vp.project_f64(vp.center_lon, vp.center_lat);
        assert!((p.x - 200.0).abs() < 1e-9);
        assert!((p.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::home(400, 300);
        for _ in 0..20 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_pan_cannot_leave_frame() {
        let mut vp = Viewport::new(10.0, 50.0, 4.0, 400, 300);
        for _ in 0..500 {
            vp.pan(200, 0);
        }
        assert!(vp.center_lon <= FRAME_EAST);
        // left frame edge may not pass the left viewport edge
        let (west_px, _) = vp.project(FRAME_WEST, vp.center_lat);
        assert!(west_px <= 0);
    }

    #[test]
    fn test_home_is_pinned_when_frame_fits() {
        let mut vp = Viewport::home(400, 300);
        let lon_before = vp.center_lon;
        vp.pan(500, 0);
        // Whole frame fits horizontally at zoom 1: panning is a no-op
        assert!((vp.center_lon - lon_before).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_to_fit_frames_bounds() {
        let vp = Viewport::new(10.0, 50.0, 1.0, 400, 200);
        let bounds = (6.0, 47.0, 15.0, 55.0);
        let zoom = vp.zoom_to_fit(bounds, 0.7);
        assert!(zoom > MIN_ZOOM);

        let mut fitted = vp.clone();
        fitted.set_zoom(zoom);
        fitted.set_center(10.5, 51.0);
        let a = fitted.project_f64(6.0, 55.0);
        let b = fitted.project_f64(15.0, 47.0);
        assert!((b.x - a.x).abs() <= 0.7 * 400.0 + 1.0);
        assert!((b.y - a.y).abs() <= 0.7 * 200.0 + 1.0);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_anchored() {
        let mut vp = Viewport::new(10.0, 50.0, 2.0, 400, 300);
        let (lon, lat) = vp.unproject(120, 90);
        vp.zoom_in_at(120, 90);
        let (px, py) = vp.project(lon, lat);
        assert!((px - 120).abs() <= 2);
        assert!((py - 90).abs() <= 2);
    }
}
