use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a filled circle (cluster and city markers)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Draw a circle outline (focused-country cluster rings)
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    let r2 = radius * radius;
    let inner = (radius - 1).max(0);
    let inner2 = inner * inner;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = dx * dx + dy * dy;
            if d2 <= r2 && d2 > inner2 {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Even-odd ray cast: is (lon, lat) inside the closed ring?
/// The ring does not need an explicit closing vertex.
pub fn point_in_ring(lon: f64, lat: f64, ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > lat) != (yj > lat) {
            let cross_x = (xj - xi) * (lat - yi) / (yj - yi) + xi;
            if lon < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Geographic bounding box of a ring: (min_lon, min_lat, max_lon, max_lat).
/// Returns None for an empty ring.
pub fn ring_bounds(ring: &[(f64, f64)]) -> Option<(f64, f64, f64, f64)> {
    let (first, rest) = ring.split_first()?;
    let mut bounds = (first.0, first.1, first.0, first.1);
    for &(lon, lat) in rest {
        bounds.0 = bounds.0.min(lon);
        bounds.1 = bounds.1.min(lat);
        bounds.2 = bounds.2.max(lon);
        bounds.3 = bounds.3.max(lat);
    }
    Some(bounds)
}
