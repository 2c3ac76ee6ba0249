use crate::models::chart::{ChartPath, PathCommand, PerformancePoint};
use crate::models::settings::{ChartDimensions, DEFAULT_CHART_PAD};

/// Smallest vertical range a chart is scaled to, so a flat series
/// still maps to finite coordinates.
pub const MIN_VALUE_RANGE: f64 = 0.01;

/// Turns return series into chart-ready polylines.
///
/// The core computes every coordinate; the frontend only draws.
/// Screen convention: origin top-left, so larger values get smaller `y`.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build a polyline with the default padding.
    pub fn build_path(&self, series: &[PerformancePoint], width: f64, height: f64) -> ChartPath {
        self.build_path_padded(series, width, height, DEFAULT_CHART_PAD)
    }

    /// Build a polyline for a viewport.
    pub fn build_path_for(&self, series: &[PerformancePoint], dims: &ChartDimensions) -> ChartPath {
        self.build_path_padded(series, dims.width, dims.height, dims.pad)
    }

    /// Map a series onto a `width × height` box inset by `pad`.
    ///
    /// Points are spread evenly along x; y is scaled between the series'
    /// min and max (range at least `MIN_VALUE_RANGE`). An empty series gives
    /// an empty path, a single point gives one `MoveTo`.
    pub fn build_path_padded(
        &self,
        series: &[PerformancePoint],
        width: f64,
        height: f64,
        pad: f64,
    ) -> ChartPath {
        let Some((min, max)) = value_bounds(series) else {
            return ChartPath::default();
        };
        let range = (max - min).max(MIN_VALUE_RANGE);
        let steps = series.len().saturating_sub(1).max(1) as f64;
        let inner_width = width - pad * 2.0;
        let inner_height = height - pad * 2.0;

        let commands = series
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let x = pad + (i as f64 / steps) * inner_width;
                let y = height - pad - ((point.value - min) / range) * inner_height;
                if i == 0 {
                    PathCommand::MoveTo { x, y }
                } else {
                    PathCommand::LineTo { x, y }
                }
            })
            .collect();

        ChartPath { commands }
    }

    /// Vertical middle of the plot area, where the dashboard draws its axis line.
    pub fn axis_y(&self, dims: &ChartDimensions) -> f64 {
        dims.height / 2.0
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn value_bounds(series: &[PerformancePoint]) -> Option<(f64, f64)> {
    let first = series.first()?.value;
    Some(series.iter().fold((first, first), |(min, max), p| {
        (min.min(p.value), max.max(p.value))
    }))
}
