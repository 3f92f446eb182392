//! Coordinate scaling for the hourly line chart.

/// Padding added above and below the data range so a flat series still
/// has a non-zero domain.
pub const VALUE_PADDING: f64 = 2.0;

const TOP: f64 = 20.0;
const BOTTOM_MARGIN: f64 = 20.0;
const LEFT: f64 = 40.0;
const RIGHT_MARGIN: f64 = 10.0;

/// Horizontal grid rows drawn behind the line
pub const GRID_ROWS: usize = 5;

/// Maps series values and indices to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    min: f64,
    max: f64,
    width: f64,
    height: f64,
    points: usize,
}

impl ChartLayout {
    /// Lay out `values` on a `width` x `height` canvas.
    ///
    /// Returns `None` for an empty series; there is nothing to plot.
    pub fn compute(values: &[f64], width: f64, height: f64) -> Option<Self> {
        Self::from_values(values.iter().copied(), values.len(), width, height)
    }

    /// Lay out a series with missing samples.
    ///
    /// Every slot keeps its x position, so a gap stays visible. The value
    /// domain covers only the present, finite samples; `None` when there
    /// are none.
    pub fn compute_with_gaps(samples: &[Option<f64>], width: f64, height: f64) -> Option<Self> {
        let present = samples.iter().flatten().copied().filter(|v| v.is_finite());
        Self::from_values(present, samples.len(), width, height)
    }

    fn from_values(
        values: impl Iterator<Item = f64>,
        slots: usize,
        width: f64,
        height: f64,
    ) -> Option<Self> {
        let (lo, hi) = values.fold(None, |range: Option<(f64, f64)>, v| match range {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;

        Some(Self {
            min: lo - VALUE_PADDING,
            max: hi + VALUE_PADDING,
            width,
            height,
            points: slots,
        })
    }

    /// Padded value domain `(min, max)`
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Vertical pixel for a value; larger values sit higher (smaller y).
    pub fn y_for(&self, value: f64) -> f64 {
        let bottom = self.height - BOTTOM_MARGIN;
        let fraction = (value - self.min) / (self.max - self.min);
        bottom - fraction * (bottom - TOP)
    }

    /// Horizontal pixel for the `index`-th point
    pub fn x_for(&self, index: usize) -> f64 {
        if self.points <= 1 {
            return LEFT;
        }
        let right = self.width - RIGHT_MARGIN;
        LEFT + index as f64 * (right - LEFT) / (self.points - 1) as f64
    }

    /// Y positions of the background grid rows, top to bottom
    pub fn grid_rows(&self) -> Vec<f64> {
        let bottom = self.height - BOTTOM_MARGIN;
        (0..GRID_ROWS)
            .map(|i| TOP + (bottom - TOP) * i as f64 / (GRID_ROWS - 1) as f64)
            .collect()
    }

    /// Left and right pixel bounds of the plot area
    pub fn x_bounds(&self) -> (f64, f64) {
        (LEFT, self.width - RIGHT_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_have_no_layout() {
        assert!(ChartLayout::compute(&[], 600.0, 240.0).is_none());
    }

    #[test]
    fn test_domain_is_padded() {
        let layout = ChartLayout::compute(&[12.0, 18.0, 15.0], 600.0, 240.0).unwrap();
        assert_eq!(layout.domain(), (10.0, 20.0));
    }

    #[test]
    fn test_y_maps_domain_to_inverted_pixel_range() {
        let layout = ChartLayout::compute(&[12.0, 18.0], 600.0, 240.0).unwrap();
        assert_eq!(layout.y_for(10.0), 220.0);
        assert_eq!(layout.y_for(20.0), 20.0);
        assert_eq!(layout.y_for(15.0), 120.0);
        assert!(layout.y_for(18.0) < layout.y_for(12.0));
    }

    #[test]
    fn test_flat_line_has_single_row() {
        let layout = ChartLayout::compute(&[10.0, 10.0, 10.0], 600.0, 240.0).unwrap();
        let ys: Vec<f64> = (0..3).map(|_| layout.y_for(10.0)).collect();
        assert!(ys.iter().all(|y| y.is_finite()));
        assert!(ys.iter().all(|y| *y == ys[0]));
        assert_eq!(ys[0], 120.0);
    }

    #[test]
    fn test_x_spacing() {
        let layout = ChartLayout::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], 450.0, 240.0).unwrap();
        assert_eq!(layout.x_for(0), 40.0);
        assert_eq!(layout.x_for(4), 440.0);
        assert_eq!(layout.x_for(2), 240.0);
    }

    #[test]
    fn test_single_point_sits_on_left_bound() {
        let layout = ChartLayout::compute(&[7.0], 600.0, 240.0).unwrap();
        assert_eq!(layout.x_for(0), 40.0);
        assert!(layout.y_for(7.0).is_finite());
    }

    #[test]
    fn test_gaps_keep_slot_positions() {
        let layout =
            ChartLayout::compute_with_gaps(&[Some(12.0), None, Some(18.0)], 600.0, 240.0).unwrap();
        assert_eq!(layout.domain(), (10.0, 20.0));
        assert_eq!(layout.x_for(0), 40.0);
        assert_eq!(layout.x_for(1), 315.0);
        assert_eq!(layout.x_for(2), 590.0);
    }

    #[test]
    fn test_all_gaps_have_no_layout() {
        assert!(ChartLayout::compute_with_gaps(&[None, None], 600.0, 240.0).is_none());
        assert!(ChartLayout::compute_with_gaps(&[Some(f64::NAN)], 600.0, 240.0).is_none());
    }

    #[test]
    fn test_grid_rows_span_plot_band() {
        let layout = ChartLayout::compute(&[1.0], 600.0, 240.0).unwrap();
        assert_eq!(layout.grid_rows(), vec![20.0, 70.0, 120.0, 170.0, 220.0]);
    }
}
