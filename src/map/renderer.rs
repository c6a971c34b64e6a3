use crate::braille::BrailleCanvas;
use crate::data::codes::{self, CountryCode};
use crate::map::cluster::Cluster;
use crate::map::geometry::{draw_circle, draw_line, draw_ring, point_in_ring, ring_bounds};
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// A country polygon set keyed by its alpha-3 code
pub struct Country {
    pub code: CountryCode,
    /// Exterior rings of the country's polygons
    pub rings: Vec<LineString>,
    /// (min_lon, min_lat, max_lon, max_lat) over all rings
    pub bounds: (f64, f64, f64, f64),
}

impl Country {
    /// Geographic center of the bounding box, the fly-to target.
    pub fn center(&self) -> (f64, f64) {
        let (w, s, e, n) = self.bounds;
        ((w + e) / 2.0, (s + n) / 2.0)
    }
}

/// A city marker with position and name
pub struct City {
    pub lon: f64,
    pub lat: f64,
    pub name: String,
}

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_cities: bool,
    pub show_labels: bool,
    pub show_clusters: bool,
    /// Include the non-EU mask countries in drawing and selection
    pub show_non_eu: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_cities: true,
            show_labels: true,
            show_clusters: true,
            show_non_eu: false,
        }
    }
}

/// Separately colorable render output (drawn back to front by the UI)
pub struct MapLayers {
    pub borders: BrailleCanvas,
    pub focus: BrailleCanvas,
    pub clusters: BrailleCanvas,
    /// (char_x, char_y, text) overlays: cluster counts and city names
    pub labels: Vec<(u16, u16, String)>,
}

/// Map renderer over country polygons, city markers and cluster circles
pub struct MapRenderer {
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            countries: Vec::new(),
            cities: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    pub fn add_country(&mut self, code: CountryCode, rings: Vec<LineString>) {
        let mut bounds = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for ring in &rings {
            if let Some((w, s, e, n)) = ring_bounds(ring) {
                bounds.0 = bounds.0.min(w);
                bounds.1 = bounds.1.min(s);
                bounds.2 = bounds.2.max(e);
                bounds.3 = bounds.3.max(n);
            }
        }
        self.countries.push(Country { code, rings, bounds });
    }

    pub fn add_city(&mut self, lon: f64, lat: f64, name: &str) {
        self.cities.push(City {
            lon,
            lat,
            name: name.to_string(),
        });
    }

    pub fn country(&self, code: CountryCode) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    /// The country-visibility predicate. Everything that draws, selects or
    /// filters by country goes through here.
    pub fn is_visible(&self, code: CountryCode) -> bool {
        self.settings.show_non_eu || codes::is_eu(code)
    }

    /// Country under a geographic position, respecting visibility.
    pub fn hit_test(&self, lon: f64, lat: f64) -> Option<CountryCode> {
        self.countries
            .iter()
            .filter(|c| self.is_visible(c.code))
            .find(|c| {
                let (w, s, e, n) = c.bounds;
                lon >= w
                    && lon <= e
                    && lat >= s
                    && lat <= n
                    && c.rings.iter().any(|ring| point_in_ring(lon, lat, ring))
            })
            .map(|c| c.code)
    }

    pub fn has_data(&self) -> bool {
        !self.countries.is_empty()
    }

    /// Render all layers for a `width` x `height` character area.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        clusters: &[Cluster],
        focused: Option<CountryCode>,
    ) -> MapLayers {
        let mut layers = MapLayers {
            borders: BrailleCanvas::new(width, height),
            focus: BrailleCanvas::new(width, height),
            clusters: BrailleCanvas::new(width, height),
            labels: Vec::new(),
        };

        for country in &self.countries {
            if !self.is_visible(country.code) {
                continue;
            }
            let canvas = if focused == Some(country.code) {
                &mut layers.focus
            } else {
                &mut layers.borders
            };
            for ring in &country.rings {
                draw_linestring(canvas, ring, viewport);
            }
        }

        if self.settings.show_clusters {
            self.render_clusters(&mut layers, viewport, clusters);
        }

        if self.settings.show_cities && viewport.zoom > 2.5 {
            for city in &self.cities {
                let (px, py) = viewport.project(city.lon, city.lat);
                if !viewport.is_visible(px, py) {
                    continue;
                }
                draw_ring(&mut layers.borders, px, py, 1);
                if self.settings.show_labels && px >= 0 && py >= 0 {
                    let char_x = (px / 2) as u16;
                    let char_y = (py / 4) as u16;
                    if let Some(label_x) = char_x.checked_add(2) {
                        layers.labels.push((label_x, char_y, city.name.clone()));
                    }
                }
            }
        }

        layers
    }

    fn render_clusters(&self, layers: &mut MapLayers, viewport: &Viewport, clusters: &[Cluster]) {
        for cluster in clusters {
            let px = cluster.pos.x as i32;
            let py = cluster.pos.y as i32;
            if !viewport.is_visible(px, py) {
                continue;
            }

            // Radius grows with the square root of the member count so the
            // marker area tracks the cluster size; singletons are a bare dot
            let radius = if cluster.count == 1 {
                0
            } else {
                (1.0 + (cluster.count as f64).sqrt()).min(7.0) as i32
            };
            draw_circle(&mut layers.clusters, px, py, radius);

            if cluster.count > 1 && px >= 0 && py >= 0 {
                let char_x = (px / 2) as u16;
                let char_y = (py / 4) as u16;
                if let Some(label_x) = char_x.checked_add(1 + radius as u16 / 2) {
                    layers.labels.push((label_x, char_y, cluster.count.to_string()));
                }
            }
        }
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    pub fn toggle_cities(&mut self) {
        self.settings.show_cities = !self.settings.show_cities;
    }

    pub fn toggle_clusters(&mut self) {
        self.settings.show_clusters = !self.settings.show_clusters;
    }

    pub fn toggle_non_eu(&mut self) {
        self.settings.show_non_eu = !self.settings.show_non_eu;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn square(w: f64, s: f64, e: f64, n: f64) -> LineString {
        vec![(w, s), (e, s), (e, n), (w, n), (w, s)]
    }

    fn renderer_with_two_countries() -> MapRenderer {
        let mut renderer = MapRenderer::new();
        renderer.add_country(
            CountryCode::parse("DEU").unwrap(),
            vec![square(6.0, 47.0, 15.0, 55.0)],
        );
        renderer.add_country(
            CountryCode::parse("TUR").unwrap(),
            vec![square(26.0, 36.0, 45.0, 42.0)],
        );
        renderer
    }

    #[test]
    fn test_hit_test_respects_visibility_predicate() {
        let mut renderer = renderer_with_two_countries();

        assert_eq!(
            renderer.hit_test(10.0, 50.0),
            Some(CountryCode::parse("DEU").unwrap())
        );
        // Non-EU masked country is not selectable by default
        assert_eq!(renderer.hit_test(35.0, 39.0), None);

        renderer.toggle_non_eu();
        assert_eq!(
            renderer.hit_test(35.0, 39.0),
            Some(CountryCode::parse("TUR").unwrap())
        );
    }

    #[test]
    fn test_hit_test_misses_outside() {
        let renderer = renderer_with_two_countries();
        assert_eq!(renderer.hit_test(-20.0, 40.0), None);
    }

    #[test]
    fn test_country_bounds_and_center() {
        let renderer = renderer_with_two_countries();
        let country = renderer.country(CountryCode::parse("DEU").unwrap()).unwrap();
        assert_eq!(country.bounds, (6.0, 47.0, 15.0, 55.0));
        assert_eq!(country.center(), (10.5, 51.0));
    }

    #[test]
    fn test_render_emits_cluster_count_labels() {
        let renderer = renderer_with_two_countries();
        let viewport = Viewport::new(10.0, 50.0, 2.0, 200, 160);
        let clusters = vec![Cluster {
            pos: DVec2::new(100.0, 80.0),
            count: 12,
            members: (0..12).collect(),
        }];
        let layers = renderer.render(100, 40, &viewport, &clusters, None);
        assert!(layers.labels.iter().any(|(_, _, text)| text == "12"));
    }

    #[test]
    fn test_focused_country_draws_on_focus_layer() {
        let renderer = renderer_with_two_countries();
        let viewport = Viewport::new(10.0, 50.0, 3.0, 200, 160);
        let code = CountryCode::parse("DEU").unwrap();
        let layers = renderer.render(100, 40, &viewport, &[], Some(code));
        let inked = layers
            .focus
            .rows()
            .any(|row| row.chars().any(|c| c != '\u{2800}'));
        assert!(inked);
    }
}
