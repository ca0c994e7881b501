use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A tick on one axis: data value and its pixel offset along the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub pos: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub label: String,
    pub domain: [f64; 2],
    pub ticks: Vec<AxisTick>,
    /// Pixel position of the zero line, when zero lies inside the domain.
    pub zero: Option<f64>,
}

/// Pixel-space geometry for one series. Polylines are split wherever the curve leaves the
/// visible range or stops being finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SeriesGeometry {
    Polyline { segments: Vec<Vec<LayoutPoint>> },
    Scatter { points: Vec<LayoutPoint> },
    Arrow { from: LayoutPoint, to: LayoutPoint },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayout {
    pub color: String,
    pub label: String,
    pub closed: bool,
    pub geometry: SeriesGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntryLayout {
    pub x: f64,
    pub y: f64,
    pub swatch: f64,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendLayout {
    pub width: f64,
    pub height: f64,
    pub rows: usize,
    pub entries: Vec<LegendEntryLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub size: Size,
    pub title: Option<String>,
    /// Drawing area inside the margins, in pixels.
    pub plot_area: Bounds,
    pub x_axis: AxisLayout,
    pub y_axis: AxisLayout,
    pub grid: bool,
    pub series: Vec<SeriesLayout>,
    pub legend: LegendLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceArrowLayout {
    pub name: String,
    pub color: String,
    pub magnitude: f64,
    pub from: LayoutPoint,
    pub to: LayoutPoint,
    /// Anchor for the name label, just past the arrow head.
    pub label: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceDiagramLayout {
    pub size: Size,
    pub origin: LayoutPoint,
    pub arrows: Vec<ForceArrowLayout>,
    pub legend: LegendLayout,
}
