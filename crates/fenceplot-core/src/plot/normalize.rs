use super::{AxisSpec, FunctionItem, PlotConfig, Series, assign, domain_from_value};
use crate::config::DEFAULT_DOMAIN;
use crate::dispatch::FUNCTION_PLOT_TAG;
use crate::utils::json_type_name;
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Parses a `plot-function` payload into the canonical [`PlotConfig`].
///
/// Two input shapes are accepted:
/// - multi-series: an object whose `data` field is an array of series;
/// - shorthand: `{ "fn": "...", "domain": [min, max] }`, a single polyline with a grid.
///
/// The discriminator is an array-valued `data` field. A payload carrying both `data` and `fn`
/// uses `data`.
pub fn normalize(text: &str) -> Result<PlotConfig> {
    let value: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    normalize_value(&value, DEFAULT_DOMAIN)
}

/// [`normalize`] over an already-parsed value, with a caller-supplied fallback domain.
pub fn normalize_value(value: &Value, default_domain: [f64; 2]) -> Result<PlotConfig> {
    let Some(obj) = value.as_object() else {
        return Err(malformed(format!(
            "expected a JSON object, got {}",
            json_type_name(value)
        )));
    };

    let (shape, items) = match obj.get("data") {
        Some(Value::Array(data)) => (Shape::MultiSeries, multi_series_items(data)?),
        _ => (Shape::Shorthand, vec![shorthand_item(obj)?]),
    };

    if items.is_empty() {
        return Err(malformed("`data` must contain at least one series"));
    }

    let data = assign(&items)
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Series::from_item(index, item).map_err(|e| malformed(format!("data[{index}]: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let config = match shape {
        Shape::MultiSeries => PlotConfig {
            title: obj.get("title").and_then(Value::as_str).map(str::to_string),
            data,
            x_axis: axis_from_value(obj.get("xAxis"), default_domain),
            y_axis: axis_from_value(obj.get("yAxis"), default_domain),
            grid: !matches!(obj.get("grid"), Some(Value::Bool(false))),
            disable_zoom: obj.get("disableZoom").and_then(Value::as_bool),
        },
        Shape::Shorthand => PlotConfig {
            title: None,
            data,
            x_axis: AxisSpec::with_domain(
                obj.get("domain")
                    .and_then(domain_from_value)
                    .unwrap_or(default_domain),
            ),
            y_axis: AxisSpec::with_domain(default_domain),
            grid: true,
            disable_zoom: None,
        },
    };

    tracing::debug!(
        shape = ?shape,
        series = config.data.len(),
        "normalized plot payload"
    );
    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    MultiSeries,
    Shorthand,
}

fn multi_series_items(data: &[Value]) -> Result<Vec<FunctionItem>> {
    data.iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(malformed(format!(
                    "data[{index}]: expected an object, got {}",
                    json_type_name(item)
                )));
            }
            FunctionItem::deserialize(item)
                .map_err(|e| malformed(format!("data[{index}]: {e}")))
        })
        .collect()
}

fn shorthand_item(obj: &Map<String, Value>) -> Result<FunctionItem> {
    let expr = match obj.get("fn") {
        None | Some(Value::Null) => "x",
        Some(Value::String(s)) if s.is_empty() => "x",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(malformed(format!(
                "`fn` must be a string, got {}",
                json_type_name(other)
            )));
        }
    };
    Ok(FunctionItem {
        graph_type: Some("polyline".to_string()),
        ..FunctionItem::with_expression(expr)
    })
}

fn axis_from_value(value: Option<&Value>, default_domain: [f64; 2]) -> AxisSpec {
    let Some(obj) = value.and_then(Value::as_object) else {
        return AxisSpec::with_domain(default_domain);
    };
    AxisSpec {
        domain: obj
            .get("domain")
            .and_then(domain_from_value)
            .unwrap_or(default_domain),
        label: obj
            .get("label")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

fn malformed(message: impl Into<String>) -> Error {
    Error::malformed(FUNCTION_PLOT_TAG, message)
}
