//! Canonical function-plot model.
//!
//! Producers write `plot-function` blocks in one of two JSON shapes (a legacy single-function
//! shorthand and a multi-series form). [`normalize`] is the only place that looks at the input
//! shape; everything downstream consumes [`PlotConfig`].

mod assign;
mod normalize;

pub use assign::{PALETTE, assign, palette_color};
pub use normalize::{normalize, normalize_value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// Kind of plotted entity. Unknown tags resolve to [`FnType::Linear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FnType {
    #[default]
    Linear,
    Implicit,
    Parametric,
    Points,
    Vector,
}

impl FnType {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("implicit") => Self::Implicit,
            Some("parametric") => Self::Parametric,
            Some("points") => Self::Points,
            Some("vector") => Self::Vector,
            _ => Self::Linear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Implicit => "implicit",
            Self::Parametric => "parametric",
            Self::Points => "points",
            Self::Vector => "vector",
        }
    }
}

/// Render style of a series. Unknown tags resolve to [`GraphType::Polyline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    #[default]
    Polyline,
    Scatter,
    Interval,
}

impl GraphType {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("scatter") => Self::Scatter,
            Some("interval") => Self::Interval,
            _ => Self::Polyline,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Polyline => "polyline",
            Self::Scatter => "scatter",
            Self::Interval => "interval",
        }
    }
}

/// One series as written by the producer. Every field is optional; [`assign`] fills the visual
/// attributes and [`Series::from_item`] checks the content against the declared kind.
///
/// A field of the wrong JSON type reads as absent, so `"fnType": 5` falls back to a linear series
/// and `"nSamples": 100.5` to the default sampling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionItem {
    #[serde(
        rename = "fn",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub fn_expr: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fn_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub graph_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vector: Option<[f64; 2]>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f64; 2]>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub n_samples: Option<u32>,
}

/// Reads any JSON value and keeps it only if it has the field's type.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Like [`lenient`], but also takes integral floats (`100.0`) as counts.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

impl FunctionItem {
    pub fn with_expression(expr: impl Into<String>) -> Self {
        Self {
            fn_expr: Some(expr.into()),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> FnType {
        FnType::from_tag(self.fn_type.as_deref())
    }

    /// The content fields matching the declared kind, or a description of what is missing.
    pub fn content(&self) -> std::result::Result<SeriesContent, String> {
        let kind = self.kind();
        let missing = |field: &str| format!("{} series requires `{field}`", kind.as_str());
        match kind {
            FnType::Linear => self
                .fn_expr
                .clone()
                .map(|expression| SeriesContent::Linear { expression })
                .ok_or_else(|| missing("fn")),
            FnType::Implicit => self
                .fn_expr
                .clone()
                .map(|expression| SeriesContent::Implicit { expression })
                .ok_or_else(|| missing("fn")),
            FnType::Parametric => match (&self.x, &self.y) {
                (Some(x), Some(y)) => Ok(SeriesContent::Parametric {
                    x: x.clone(),
                    y: y.clone(),
                }),
                (None, _) => Err(missing("x")),
                (_, None) => Err(missing("y")),
            },
            FnType::Points => self
                .points
                .clone()
                .map(|points| SeriesContent::Points { points })
                .ok_or_else(|| missing("points")),
            FnType::Vector => self
                .vector
                .map(|vector| SeriesContent::Vector {
                    vector,
                    offset: self.offset,
                })
                .ok_or_else(|| missing("vector")),
        }
    }
}

/// The content of one series; exactly the fields relevant to its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fnType", rename_all = "lowercase")]
pub enum SeriesContent {
    Linear {
        #[serde(rename = "fn")]
        expression: String,
    },
    Implicit {
        #[serde(rename = "fn")]
        expression: String,
    },
    Parametric {
        x: String,
        y: String,
    },
    Points {
        points: Vec<[f64; 2]>,
    },
    Vector {
        vector: [f64; 2],
        #[serde(skip_serializing_if = "Option::is_none")]
        offset: Option<[f64; 2]>,
    },
}

impl SeriesContent {
    pub fn kind(&self) -> FnType {
        match self {
            Self::Linear { .. } => FnType::Linear,
            Self::Implicit { .. } => FnType::Implicit,
            Self::Parametric { .. } => FnType::Parametric,
            Self::Points { .. } => FnType::Points,
            Self::Vector { .. } => FnType::Vector,
        }
    }

    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Linear { expression } | Self::Implicit { expression } => Some(expression),
            _ => None,
        }
    }
}

/// A resolved series: content plus assigned visual attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(flatten)]
    pub content: SeriesContent,
    pub graph_type: GraphType,
    pub color: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_samples: Option<u32>,
}

impl Series {
    /// Resolves an item at `index` of its series list. Attributes missing from `item` get the
    /// same values [`assign`] would give them.
    pub fn from_item(index: usize, item: FunctionItem) -> std::result::Result<Self, String> {
        let content = item.content()?;
        let graph_type = GraphType::from_tag(item.graph_type.as_deref());
        let color = non_empty(item.color).unwrap_or_else(|| palette_color(index).to_string());
        let label = non_empty(item.label)
            .or_else(|| content.expression().map(str::to_string))
            .unwrap_or_else(|| format!("Function {}", index + 1));
        Ok(Self {
            content,
            graph_type,
            color,
            label,
            range: item.range,
            closed: item.closed,
            n_samples: item.n_samples,
        })
    }

    pub fn kind(&self) -> FnType {
        self.content.kind()
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub domain: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AxisSpec {
    pub fn with_domain(domain: [f64; 2]) -> Self {
        Self {
            domain,
            label: None,
        }
    }

    pub fn span(&self) -> f64 {
        self.domain[1] - self.domain[0]
    }
}

/// Canonical plot configuration. `data` is non-empty and every series has a color and label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub data: Vec<Series>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub grid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_zoom: Option<bool>,
}

impl PlotConfig {
    /// Options object in the shape a function-plot style library expects.
    ///
    /// Axis labels default to `x`/`y`; the built-in legend is expected to stay hidden because
    /// [`legend`] is rendered by the host instead.
    pub fn to_plot_json(&self, width: f64, height: f64) -> Value {
        let data: Vec<Value> = self
            .data
            .iter()
            .map(|s| serde_json::to_value(s).unwrap_or(Value::Null))
            .collect();
        let mut out = json!({
            "width": width,
            "height": height,
            "grid": self.grid,
            "tip": { "xLine": true, "yLine": true },
            "xAxis": {
                "domain": self.x_axis.domain,
                "label": self.x_axis.label.as_deref().unwrap_or("x"),
            },
            "yAxis": {
                "domain": self.y_axis.domain,
                "label": self.y_axis.label.as_deref().unwrap_or("y"),
            },
            "data": data,
        });
        if let Some(obj) = out.as_object_mut() {
            if let Some(title) = &self.title {
                obj.insert("title".to_string(), json!(title));
            }
            if let Some(disable_zoom) = self.disable_zoom {
                obj.insert("disableZoom".to_string(), json!(disable_zoom));
            }
        }
        out
    }
}

/// Cross-hair tooltip text for a hovered point.
pub fn format_tip(x: f64, y: f64) -> String {
    format!("x: {x:.2}, y: {y:.2}")
}

/// One legend entry: a color swatch and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendItem {
    pub color: String,
    pub label: String,
}

/// Legend entries, in series order, derived from the canonical config only.
pub fn legend(config: &PlotConfig) -> Vec<LegendItem> {
    config
        .data
        .iter()
        .map(|s| LegendItem {
            color: s.color.clone(),
            label: s.label.clone(),
        })
        .collect()
}

/// Parses a `[min, max]` pair of finite numbers with `min < max`.
pub fn domain_from_value(value: &Value) -> Option<[f64; 2]> {
    let arr = value.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let min = arr[0].as_f64().filter(|v| v.is_finite())?;
    let max = arr[1].as_f64().filter(|v| v.is_finite())?;
    (min < max).then_some([min, max])
}
