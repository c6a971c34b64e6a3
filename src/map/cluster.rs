use glam::DVec2;

use crate::map::quadtree::PointQuadtree;

/// Grid-size bounds for zoom-dependent clustering, in braille pixels.
///
/// Cell size interpolates linearly with zoom: at zoom 1 the cells are at
/// `max_cell` (coarsest clustering), at `max_zoom` they are at `min_cell`.
#[derive(Clone, Copy)]
pub struct GridConfig {
    pub min_cell: f64,
    pub max_cell: f64,
    pub max_zoom: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_cell: 12.0,
            max_cell: 48.0,
            max_zoom: crate::map::projection::MAX_ZOOM,
        }
    }
}

impl GridConfig {
    /// Cell size for a zoom scale: linear between the bounds, clamped,
    /// monotonically non-increasing in zoom.
    pub fn cell_size(&self, zoom: f64) -> f64 {
        let span = self.max_zoom - 1.0;
        if span <= 0.0 {
            return self.max_cell;
        }
        let t = ((zoom - 1.0) / span).clamp(0.0, 1.0);
        self.max_cell + t * (self.min_cell - self.max_cell)
    }
}

/// One aggregate marker: centroid of the member points and their count.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub pos: DVec2,
    pub count: usize,
    /// Indices into the projected point slice, ascending
    pub members: Vec<usize>,
}

/// Partition the plane into a uniform grid of `cell`-sized squares anchored
/// at multiples of `cell`, and emit one cluster per non-empty cell.
///
/// A quadtree over the points answers each cell's half-open range query
/// `[x0, x0+cell) x [y0, y0+cell)` in sub-linear time, so the whole pass is
/// roughly O((N + M) log N) for N points and M candidate cells. The grid is
/// walked over the bounding region of the points joined with the viewport,
/// which makes the result an exact partition: every point lands in exactly
/// one cell, boundary points included. Empty cells are never emitted — an
/// empty centroid is undefined, not zero.
pub fn cluster_points(
    points: &[DVec2],
    cell: f64,
    viewport_width: usize,
    viewport_height: usize,
) -> Vec<Cluster> {
    if points.is_empty() || !(cell > 0.0) {
        return Vec::new();
    }

    let tree = PointQuadtree::build(points);

    let mut min = DVec2::new(0.0, 0.0);
    let mut max = DVec2::new(viewport_width as f64, viewport_height as f64);
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }

    let col_lo = (min.x / cell).floor() as i64;
    let col_hi = (max.x / cell).floor() as i64;
    let row_lo = (min.y / cell).floor() as i64;
    let row_hi = (max.y / cell).floor() as i64;

    let mut clusters = Vec::new();
    let mut members = Vec::new();

    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let origin = DVec2::new(col as f64 * cell, row as f64 * cell);
            members.clear();
            tree.query_into(origin, origin + DVec2::splat(cell), points, &mut members);
            if members.is_empty() {
                continue;
            }

            members.sort_unstable();
            let sum: DVec2 = members.iter().map(|&i| points[i]).sum();
            clusters.push(Cluster {
                pos: sum / members.len() as f64,
                count: members.len(),
                members: members.clone(),
            });
        }
    }

    clusters
}

/// Cluster with the cell size derived from the current zoom scale.
pub fn cluster_at_zoom(
    points: &[DVec2],
    zoom: f64,
    config: &GridConfig,
    viewport_width: usize,
    viewport_height: usize,
) -> Vec<Cluster> {
    cluster_points(
        points,
        config.cell_size(zoom),
        viewport_width,
        viewport_height,
    )
}
