/// X-axis kind: categorical bars or an ordered time series.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Categorical,
    Temporal,
}

/// One histogram bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Bin {
    pub name: String,
    pub value: u64,
}

impl Bin {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A named bar chart dataset. Temporal histograms additionally carry a
/// visible window over their bins: zooming narrows the window, which only
/// rescales the x-axis and bar widths — the bins themselves are never
/// recomputed.
pub struct Histogram {
    pub title: &'static str,
    pub axis: Axis,
    bins: Vec<Bin>,
    /// Visible half-open bin range; always the full range for categorical
    window: (usize, usize),
}

/// Smallest temporal window, in bins
const MIN_WINDOW: usize = 2;

impl Histogram {
    pub fn new(title: &'static str, axis: Axis) -> Self {
        Self {
            title,
            axis,
            bins: Vec::new(),
            window: (0, 0),
        }
    }

    /// Replace the dataset and reset the visible window. An empty dataset
    /// is allowed and renders as an empty chart (best-effort, no error).
    pub fn set_data(&mut self, bins: Vec<Bin>) {
        self.window = (0, bins.len());
        self.bins = bins;
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// The bins inside the current window.
    pub fn visible(&self) -> &[Bin] {
        &self.bins[self.window.0..self.window.1]
    }

    pub fn max_value(&self) -> u64 {
        self.visible().iter().map(|b| b.value).max().unwrap_or(0)
    }

    pub fn is_zoomed(&self) -> bool {
        self.window != (0, self.bins.len())
    }

    /// Narrow the temporal window by a quarter on each side.
    pub fn zoom_in(&mut self) {
        if self.axis != Axis::Temporal {
            return;
        }
        let (lo, hi) = self.window;
        let width = hi - lo;
        if width <= MIN_WINDOW {
            return;
        }
        let step = (width / 4).max(1);
        let new_lo = lo + step;
        let new_hi = hi.saturating_sub(step).max(new_lo + MIN_WINDOW);
        self.window = (new_lo, new_hi.min(self.bins.len()));
    }

    /// Widen the temporal window back toward the full range.
    pub fn zoom_out(&mut self) {
        if self.axis != Axis::Temporal {
            return;
        }
        let (lo, hi) = self.window;
        let step = ((hi - lo) / 2).max(1);
        self.window = (lo.saturating_sub(step), (hi + step).min(self.bins.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months(n: usize) -> Vec<Bin> {
        (0..n)
            .map(|i| Bin::new(format!("2016-{:02}", i + 1), (i as u64 + 1) * 3))
            .collect()
    }

    #[test]
    fn test_set_data_resets_window() {
        let mut h = Histogram::new("date", Axis::Temporal);
        h.set_data(months(12));
        h.zoom_in();
        assert!(h.is_zoomed());
        h.set_data(months(6));
        assert!(!h.is_zoomed());
        assert_eq!(h.visible().len(), 6);
    }

    #[test]
    fn test_zoom_narrows_without_rebinning() {
        let mut h = Histogram::new("date", Axis::Temporal);
        h.set_data(months(12));
        h.zoom_in();
        let visible = h.visible();
        assert!(visible.len() < 12);
        // The surviving bins are the original ones, untouched
        assert_eq!(visible[0], Bin::new("2016-04", 12));
    }

    #[test]
    fn test_zoom_in_bottoms_out_at_min_window() {
        let mut h = Histogram::new("date", Axis::Temporal);
        h.set_data(months(12));
        for _ in 0..50 {
            h.zoom_in();
        }
        assert_eq!(h.visible().len(), MIN_WINDOW);
    }

    #[test]
    fn test_zoom_out_restores_full_range() {
        let mut h = Histogram::new("date", Axis::Temporal);
        h.set_data(months(12));
        h.zoom_in();
        h.zoom_in();
        for _ in 0..10 {
            h.zoom_out();
        }
        assert!(!h.is_zoomed());
        assert_eq!(h.visible().len(), 12);
    }

    #[test]
    fn test_categorical_axis_ignores_zoom() {
        let mut h = Histogram::new("skill", Axis::Categorical);
        h.set_data(months(8));
        h.zoom_in();
        assert_eq!(h.visible().len(), 8);
    }

    #[test]
    fn test_empty_dataset_is_best_effort() {
        let mut h = Histogram::new("skill", Axis::Categorical);
        h.set_data(Vec::new());
        assert!(h.is_empty());
        assert_eq!(h.max_value(), 0);
        assert!(h.visible().is_empty());
    }
}
