use glam::DVec2;
use rayon::prelude::*;

use crate::charts::{bins, Axis, Histogram};
use crate::data::codes::CountryCode;
use crate::data::Posting;
use crate::map::cluster::{self, Cluster, GridConfig};
use crate::map::{MapRenderer, Viewport};
use crate::search::{TagSearch, SKILL_VOCABULARY};

/// Fly-to animation length in frames (~0.4 s at the 60 fps poll cadence)
const FLY_FRAMES: u32 = 24;

/// Landmass fraction of the viewport a flown-to country should fill
const FIT_FRACTION: f64 = 0.7;

/// Where the map is, selection-wise. Re-clustering on arrival is an
/// explicit transition action of `App::tick`, not an animation callback.
pub enum MapState {
    Idle,
    FlyingTo {
        /// Country being flown to; None flies back to the home view
        target: Option<CountryCode>,
        flight: Flight,
    },
    Focused(CountryCode),
}

/// In-progress viewport interpolation between two (lon, lat, zoom) states.
pub struct Flight {
    from: (f64, f64, f64),
    to: (f64, f64, f64),
    frame: u32,
}

impl Flight {
    fn new(from: (f64, f64, f64), to: (f64, f64, f64)) -> Self {
        Self { from, to, frame: 0 }
    }

    /// Viewport state at the current frame, smoothstep-eased.
    fn sample(&self) -> (f64, f64, f64) {
        let t = (self.frame as f64 / FLY_FRAMES as f64).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        (
            lerp(self.from.0, self.to.0, eased),
            lerp(self.from.1, self.to.1, eased),
            lerp(self.from.2, self.to.2, eased),
        )
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Which panel keyboard input goes to
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    Search,
}

/// Application state: owns the viewport, the record set and everything
/// derived from it. All mutation happens through these methods on the
/// event loop thread; each redraw fully supersedes the previous one.
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub state: MapState,
    pub focus: Focus,
    pub grid: GridConfig,
    pub search: TagSearch,
    pub date_chart: Histogram,
    pub skill_chart: Histogram,
    pub location_chart: Histogram,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    postings: Vec<Posting>,
    /// Postings projected to screen space; rebuilt with the viewport
    projected: Vec<DVec2>,
    clusters: Vec<Cluster>,
}

impl App {
    pub fn new(map_renderer: MapRenderer, postings: Vec<Posting>) -> Self {
        let mut app = Self {
            // Sized on the first frame via `ensure_map_size`
            viewport: Viewport::home(2, 4),
            map_renderer,
            state: MapState::Idle,
            focus: Focus::Map,
            grid: GridConfig::default(),
            search: TagSearch::new(SKILL_VOCABULARY),
            date_chart: Histogram::new("Postings by month", Axis::Temporal),
            skill_chart: Histogram::new("Postings by skill", Axis::Categorical),
            location_chart: Histogram::new("Postings by location", Axis::Categorical),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            postings,
            projected: Vec::new(),
            clusters: Vec::new(),
        };
        app.refresh_spatial();
        app.refresh_charts();
        app
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    pub fn focused_country(&self) -> Option<CountryCode> {
        match self.state {
            MapState::Focused(code) => Some(code),
            _ => None,
        }
    }

    /// Adopt the map pane's pixel size, re-clustering on change. Called
    /// every frame with the laid-out size; cheap when nothing changed.
    pub fn ensure_map_size(&mut self, char_width: usize, char_height: usize) {
        // Braille gives 2x4 pixels per character cell
        let width = char_width.max(1) * 2;
        let height = char_height.max(1) * 4;
        if width != self.viewport.width || height != self.viewport.height {
            self.viewport.width = width;
            self.viewport.height = height;
            let (lon, lat) = (self.viewport.center_lon, self.viewport.center_lat);
            self.viewport.set_center(lon, lat); // re-clamp for the new extent
            self.refresh_spatial();
        }
    }

    /// Project every posting and rebuild the cluster set. The projection
    /// pass fans out across cores; clustering itself is one quadtree build
    /// plus one grid walk.
    fn refresh_spatial(&mut self) {
        let viewport = &self.viewport;
        self.projected = self
            .postings
            .par_iter()
            .map(|p| viewport.project_f64(p.coord[0], p.coord[1]))
            .collect();
        self.clusters = cluster::cluster_at_zoom(
            &self.projected,
            viewport.zoom,
            &self.grid,
            viewport.width,
            viewport.height,
        );
    }

    /// Rebuild the three histogram datasets from the filtered record set.
    fn refresh_charts(&mut self) {
        let filters = bins::Filters {
            skills: self.search.tags(),
            country: self.focused_country(),
        };
        self.date_chart.set_data(bins::by_month(&self.postings, &filters));
        self.skill_chart.set_data(bins::by_skill(&self.postings, &filters));
        self.location_chart.set_data(bins::by_country(&self.postings, &filters));
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.refresh_spatial();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.refresh_spatial();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.refresh_spatial();
    }

    /// Zoom towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::char_to_pixel(col, row);
        self.viewport.zoom_in_at(px, py);
        self.refresh_spatial();
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::char_to_pixel(col, row);
        self.viewport.zoom_out_at(px, py);
        self.refresh_spatial();
    }

    /// Convert terminal coords to braille pixel coords (2x4 per cell,
    /// 1 cell border offset)
    fn char_to_pixel(col: u16, row: u16) -> (i32, i32) {
        let px = (col.saturating_sub(1)) as i32 * 2;
        let py = (row.saturating_sub(1)) as i32 * 4;
        (px, py)
    }

    /// Country selection: fly to the country under the cursor, or back out
    /// when it is already focused. Ignored mid-flight.
    pub fn select_at(&mut self, col: u16, row: u16) {
        if matches!(self.state, MapState::FlyingTo { .. }) {
            return;
        }
        let (px, py) = Self::char_to_pixel(col, row);
        let (lon, lat) = self.viewport.unproject(px, py);
        let Some(code) = self.map_renderer.hit_test(lon, lat) else {
            return;
        };

        if self.focused_country() == Some(code) {
            self.fly_home();
        } else {
            self.fly_to_country(code);
        }
    }

    fn fly_to_country(&mut self, code: CountryCode) {
        let Some(country) = self.map_renderer.country(code) else {
            return;
        };
        let (lon, lat) = country.center();
        let zoom = self.viewport.zoom_to_fit(country.bounds, FIT_FRACTION);
        self.start_flight(Some(code), (lon, lat, zoom));
    }

    fn fly_home(&mut self) {
        let home = Viewport::home(self.viewport.width, self.viewport.height);
        self.start_flight(None, (home.center_lon, home.center_lat, home.zoom));
    }

    fn start_flight(&mut self, target: Option<CountryCode>, to: (f64, f64, f64)) {
        let from = (
            self.viewport.center_lon,
            self.viewport.center_lat,
            self.viewport.zoom,
        );
        self.state = MapState::FlyingTo {
            target,
            flight: Flight::new(from, to),
        };
    }

    /// Advance one animation frame. On arrival the map state transitions
    /// and the cluster set and charts are rebuilt.
    pub fn tick(&mut self) {
        let step = match &mut self.state {
            MapState::FlyingTo { target, flight } => {
                flight.frame += 1;
                Some((*target, flight.sample(), flight.frame >= FLY_FRAMES))
            }
            _ => None,
        };
        let Some((target, (lon, lat, zoom), arrived)) = step else {
            return;
        };

        self.viewport.set_zoom(zoom);
        self.viewport.set_center(lon, lat);
        self.refresh_spatial();

        if arrived {
            self.state = match target {
                Some(code) => MapState::Focused(code),
                None => MapState::Idle,
            };
            self.refresh_charts();
        }
    }

    /// Reset to the home view, dropping focus and filters' country part.
    pub fn reset_view(&mut self) {
        self.state = MapState::Idle;
        self.viewport = Viewport::home(self.viewport.width, self.viewport.height);
        self.refresh_spatial();
        self.refresh_charts();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // --- search panel ---

    pub fn search_char(&mut self, c: char) {
        self.search.push_char(c);
    }

    pub fn search_backspace(&mut self) {
        if self.search.backspace() {
            self.refresh_charts();
        }
    }

    pub fn search_accept(&mut self) {
        if self.search.accept() {
            self.refresh_charts();
        }
    }

    pub fn search_cycle(&mut self) {
        self.search.next_suggestion();
    }

    pub fn leave_search(&mut self) {
        self.search.clear_query();
        self.focus = Focus::Map;
    }

    // --- mouse ---

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Handle mouse drag panning, scaled down when zoomed out
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    // --- status line ---

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::codes;

    fn square(w: f64, s: f64, e: f64, n: f64) -> Vec<(f64, f64)> {
        vec![(w, s), (e, s), (e, n), (w, n), (w, s)]
    }

    fn posting(lon: f64, lat: f64, skill: &str, country: &str) -> Posting {
        Posting {
            coord: [lon, lat],
            skill: skill.to_string(),
            country: country.to_string(),
            date: "2016-05-01".to_string(),
        }
    }

    fn test_app() -> App {
        let mut renderer = MapRenderer::new();
        renderer.add_country(
            codes::CountryCode::parse("DEU").unwrap(),
            vec![square(6.0, 47.0, 15.0, 55.0)],
        );
        renderer.add_country(
            codes::CountryCode::parse("FRA").unwrap(),
            vec![square(-4.0, 42.5, 8.0, 51.0)],
        );
        let postings = vec![
            posting(13.4, 52.5, "Python", "DE"),
            posting(13.5, 52.4, "Statistics", "DE"),
            posting(2.3, 48.9, "Python", "FR"),
        ];
        let mut app = App::new(renderer, postings);
        app.ensure_map_size(100, 40);
        app
    }

    #[test]
    fn test_every_posting_is_clustered() {
        let app = test_app();
        let total: usize = app.clusters().iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_fly_to_country_arrives_focused_and_reclusters() {
        let mut app = test_app();
        let deu = codes::CountryCode::parse("DEU").unwrap();

        let (px, py) = app.viewport.project(10.0, 51.0);
        let col = (px / 2 + 1) as u16;
        let row = (py / 4 + 1) as u16;
        app.select_at(col, row);
        assert!(matches!(app.state, MapState::FlyingTo { .. }));

        for _ in 0..FLY_FRAMES + 1 {
            app.tick();
        }
        assert_eq!(app.focused_country(), Some(deu));
        assert!(app.viewport.zoom > 1.0);

        // Charts now carry only the focused country's postings
        let total: u64 = app.location_chart.visible().iter().map(|b| b.value).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_selecting_focused_country_flies_home() {
        let mut app = test_app();
        let (px, py) = app.viewport.project(10.0, 51.0);
        let (col, row) = ((px / 2 + 1) as u16, (py / 4 + 1) as u16);
        app.select_at(col, row);
        for _ in 0..FLY_FRAMES + 1 {
            app.tick();
        }
        assert!(app.focused_country().is_some());

        let (px, py) = app.viewport.project(10.0, 51.0);
        app.select_at((px / 2 + 1) as u16, (py / 4 + 1) as u16);
        for _ in 0..FLY_FRAMES + 1 {
            app.tick();
        }
        assert!(app.focused_country().is_none());
        assert!(matches!(app.state, MapState::Idle));
    }

    #[test]
    fn test_tag_selection_filters_charts() {
        let mut app = test_app();
        for c in "python".chars() {
            app.search_char(c);
        }
        app.search_accept();

        let total: u64 = app.skill_chart.visible().iter().map(|b| b.value).sum();
        assert_eq!(total, 2);

        app.search_backspace(); // pops the tag, restores the full dataset
        let total: u64 = app.skill_chart.visible().iter().map(|b| b.value).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_resize_reclusters() {
        let mut app = test_app();
        let before = app.viewport.width;
        app.ensure_map_size(140, 50);
        assert_ne!(app.viewport.width, before);
        let total: usize = app.clusters().iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_zero_postings_is_valid() {
        let mut renderer = MapRenderer::new();
        renderer.add_country(
            codes::CountryCode::parse("DEU").unwrap(),
            vec![square(6.0, 47.0, 15.0, 55.0)],
        );
        let mut app = App::new(renderer, Vec::new());
        app.ensure_map_size(100, 40);
        assert!(app.clusters().is_empty());
        assert!(app.date_chart.is_empty());
    }
}
