use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single point of a portfolio's return series.
///
/// `value` is a percentage return relative to the starting capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl PerformancePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Date-ordered return series, no duplicate dates.
pub type Series = Vec<PerformancePoint>;

/// One drawing command of a chart polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
}

impl PathCommand {
    pub fn x(&self) -> f64 {
        match *self {
            PathCommand::MoveTo { x, .. } | PathCommand::LineTo { x, .. } => x,
        }
    }

    pub fn y(&self) -> f64 {
        match *self {
            PathCommand::MoveTo { y, .. } | PathCommand::LineTo { y, .. } => y,
        }
    }
}

impl std::fmt::Display for PathCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathCommand::MoveTo { x, y } => write!(f, "M{x:.2} {y:.2}"),
            PathCommand::LineTo { x, y } => write!(f, "L{x:.2} {y:.2}"),
        }
    }
}

/// A connected polyline: one `MoveTo` followed by `LineTo`s, or nothing.
///
/// `Display` renders the SVG path data string (`"M8.00 122.00 L…"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPath {
    pub commands: Vec<PathCommand>,
}

impl ChartPath {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl std::fmt::Display for ChartPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}
