//! Headless function-plot layout: axes, ticks, grid and per-series pixel geometry.

pub mod expr;

use crate::legend::layout_legend;
use crate::model::{
    AxisLayout, AxisTick, Bounds, LayoutPoint, PlotLayout, SeriesGeometry, SeriesLayout, Size,
};
use crate::text::TextMeasurer;
use crate::{Error, Result};
use expr::{Bindings, Expr, Var};
use fenceplot_core::plot::{GraphType, PlotConfig, Series, SeriesContent, format_tip, legend};

pub const DEFAULT_SAMPLES: u32 = 250;
const MAX_SAMPLES: u32 = 5000;
const IMPLICIT_COLS: usize = 96;
const IMPLICIT_ROWS: usize = 64;

const MARGIN_LEFT: f64 = 44.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 36.0;
const TITLE_HEIGHT: f64 = 24.0;

/// Linear data-to-pixel mapping for one plot area.
#[derive(Debug, Clone)]
pub struct Projection {
    area: Bounds,
    x_domain: [f64; 2],
    y_domain: [f64; 2],
}

impl Projection {
    pub fn new(area: Bounds, x_domain: [f64; 2], y_domain: [f64; 2]) -> Self {
        Self {
            area,
            x_domain,
            y_domain,
        }
    }

    pub fn px(&self, x: f64) -> f64 {
        let [x0, x1] = self.x_domain;
        self.area.min_x + (x - x0) / (x1 - x0) * self.area.width()
    }

    /// Pixel y grows downwards, data y upwards.
    pub fn py(&self, y: f64) -> f64 {
        let [y0, y1] = self.y_domain;
        self.area.max_y - (y - y0) / (y1 - y0) * self.area.height()
    }

    pub fn point(&self, x: f64, y: f64) -> LayoutPoint {
        LayoutPoint::new(self.px(x), self.py(y))
    }

    /// Inverse of [`Self::px`]/[`Self::py`], used for hover tips.
    pub fn invert(&self, px: f64, py: f64) -> (f64, f64) {
        let [x0, x1] = self.x_domain;
        let [y0, y1] = self.y_domain;
        let x = x0 + (px - self.area.min_x) / self.area.width() * (x1 - x0);
        let y = y0 + (self.area.max_y - py) / self.area.height() * (y1 - y0);
        (x, y)
    }
}

/// Drawing area inside the axis margins (and the title, if any).
pub fn plot_area(config: &PlotConfig, size: Size) -> Bounds {
    let top = MARGIN_TOP + if config.title.is_some() { TITLE_HEIGHT } else { 0.0 };
    Bounds {
        min_x: MARGIN_LEFT,
        min_y: top,
        max_x: (size.width - MARGIN_RIGHT).max(MARGIN_LEFT + 1.0),
        max_y: (size.height - MARGIN_BOTTOM).max(top + 1.0),
    }
}

/// Cross-hair tip for the pointer at pixel `(px, py)`; `None` outside the drawing area.
pub fn tip_at(config: &PlotConfig, size: Size, px: f64, py: f64) -> Option<String> {
    let area = plot_area(config, size);
    if !(area.min_x..=area.max_x).contains(&px) || !(area.min_y..=area.max_y).contains(&py) {
        return None;
    }
    let (x, y) = Projection::new(area, config.x_axis.domain, config.y_axis.domain).invert(px, py);
    Some(format_tip(x, y))
}

pub fn layout_plot(
    config: &PlotConfig,
    size: Size,
    measurer: &dyn TextMeasurer,
) -> Result<PlotLayout> {
    let plot_area = plot_area(config, size);
    let projection = Projection::new(
        plot_area.clone(),
        config.x_axis.domain,
        config.y_axis.domain,
    );

    let x_ticks = ticks(config.x_axis.domain, (plot_area.width() / 80.0).max(2.0) as usize)
        .into_iter()
        .map(|(value, label)| AxisTick {
            value,
            pos: projection.px(value),
            label,
        })
        .collect();
    let y_ticks = ticks(config.y_axis.domain, (plot_area.height() / 50.0).max(2.0) as usize)
        .into_iter()
        .map(|(value, label)| AxisTick {
            value,
            pos: projection.py(value),
            label,
        })
        .collect();

    let zero_in = |domain: [f64; 2]| domain[0] <= 0.0 && 0.0 <= domain[1];

    let series = config
        .data
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let geometry = series_geometry(s, config, &projection).map_err(|message| {
                Error::Expression {
                    series: index,
                    message,
                }
            })?;
            Ok(SeriesLayout {
                color: s.color.clone(),
                label: s.label.clone(),
                closed: s.closed.unwrap_or(false),
                geometry,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(series = series.len(), "laid out plot");

    Ok(PlotLayout {
        size,
        title: config.title.clone(),
        x_axis: AxisLayout {
            label: config.x_axis.label.clone().unwrap_or_else(|| "x".to_string()),
            domain: config.x_axis.domain,
            ticks: x_ticks,
            zero: zero_in(config.y_axis.domain).then(|| projection.py(0.0)),
        },
        y_axis: AxisLayout {
            label: config.y_axis.label.clone().unwrap_or_else(|| "y".to_string()),
            domain: config.y_axis.domain,
            ticks: y_ticks,
            zero: zero_in(config.x_axis.domain).then(|| projection.px(0.0)),
        },
        plot_area,
        grid: config.grid,
        series,
        legend: layout_legend(&legend(config), size.width, measurer),
    })
}

fn series_geometry(
    series: &Series,
    config: &PlotConfig,
    projection: &Projection,
) -> std::result::Result<SeriesGeometry, String> {
    let samples = series
        .n_samples
        .unwrap_or(DEFAULT_SAMPLES)
        .clamp(2, MAX_SAMPLES) as usize;

    let sampled: Vec<Option<(f64, f64)>> = match &series.content {
        SeriesContent::Linear { expression } => {
            let f = Expr::parse(expression, &[Var::X]).map_err(|e| e.to_string())?;
            let [a, b] = series.range.unwrap_or(config.x_axis.domain);
            linspace(a, b, samples)
                .map(|x| {
                    let y = f.eval(&Bindings {
                        x,
                        ..Bindings::default()
                    });
                    y.is_finite().then_some((x, y))
                })
                .collect()
        }
        SeriesContent::Parametric { x, y } => {
            let fx = Expr::parse(x, &[Var::T]).map_err(|e| format!("x(t): {e}"))?;
            let fy = Expr::parse(y, &[Var::T]).map_err(|e| format!("y(t): {e}"))?;
            let [a, b] = series.range.unwrap_or([0.0, std::f64::consts::TAU]);
            linspace(a, b, samples)
                .map(|t| {
                    let env = Bindings {
                        t,
                        ..Bindings::default()
                    };
                    let (x, y) = (fx.eval(&env), fy.eval(&env));
                    (x.is_finite() && y.is_finite()).then_some((x, y))
                })
                .collect()
        }
        SeriesContent::Implicit { expression } => {
            let f = Expr::parse(expression, &[Var::X, Var::Y]).map_err(|e| e.to_string())?;
            let segments = marching_squares(&f, config.x_axis.domain, config.y_axis.domain)
                .into_iter()
                .map(|[(x0, y0), (x1, y1)]| {
                    vec![projection.point(x0, y0), projection.point(x1, y1)]
                })
                .collect();
            return Ok(SeriesGeometry::Polyline { segments });
        }
        SeriesContent::Points { points } => points
            .iter()
            .map(|&[x, y]| (x.is_finite() && y.is_finite()).then_some((x, y)))
            .collect(),
        SeriesContent::Vector { vector, offset } => {
            let [ox, oy] = offset.unwrap_or([0.0, 0.0]);
            return Ok(SeriesGeometry::Arrow {
                from: projection.point(ox, oy),
                to: projection.point(ox + vector[0], oy + vector[1]),
            });
        }
    };

    if series.graph_type == GraphType::Scatter {
        return Ok(SeriesGeometry::Scatter {
            points: sampled
                .into_iter()
                .flatten()
                .map(|(x, y)| projection.point(x, y))
                .collect(),
        });
    }

    Ok(SeriesGeometry::Polyline {
        segments: split_segments(&sampled, config.y_axis.domain, projection),
    })
}

fn linspace(a: f64, b: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(move |i| a + step * i as f64)
}

/// Breaks the sampled curve wherever it is undefined or leaves the visible band far enough to
/// suggest an asymptote. Pieces that stay slightly outside are kept; the SVG clips them.
fn split_segments(
    sampled: &[Option<(f64, f64)>],
    y_domain: [f64; 2],
    projection: &Projection,
) -> Vec<Vec<LayoutPoint>> {
    let span = y_domain[1] - y_domain[0];
    let (lo, hi) = (y_domain[0] - span, y_domain[1] + span);

    let mut segments = Vec::new();
    let mut current: Vec<LayoutPoint> = Vec::new();
    for sample in sampled {
        match sample {
            Some((x, y)) if (lo..=hi).contains(y) => current.push(projection.point(*x, *y)),
            _ => {
                if current.len() > 1 {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
}

/// Zero contour of `f(x, y)` as unconnected line segments in data coordinates.
fn marching_squares(f: &Expr, x_domain: [f64; 2], y_domain: [f64; 2]) -> Vec<[(f64, f64); 2]> {
    let dx = (x_domain[1] - x_domain[0]) / IMPLICIT_COLS as f64;
    let dy = (y_domain[1] - y_domain[0]) / IMPLICIT_ROWS as f64;
    let at = |i: usize, j: usize| {
        let (x, y) = (x_domain[0] + i as f64 * dx, y_domain[0] + j as f64 * dy);
        (
            x,
            y,
            f.eval(&Bindings {
                x,
                y,
                t: 0.0,
            }),
        )
    };

    let mut values = Vec::with_capacity((IMPLICIT_COLS + 1) * (IMPLICIT_ROWS + 1));
    for j in 0..=IMPLICIT_ROWS {
        for i in 0..=IMPLICIT_COLS {
            values.push(at(i, j));
        }
    }
    let cell = |i: usize, j: usize| values[j * (IMPLICIT_COLS + 1) + i];

    let lerp = |a: (f64, f64, f64), b: (f64, f64, f64)| {
        let t = if (b.2 - a.2).abs() < f64::EPSILON {
            0.5
        } else {
            a.2 / (a.2 - b.2)
        };
        (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
    };

    let mut out = Vec::new();
    for j in 0..IMPLICIT_ROWS {
        for i in 0..IMPLICIT_COLS {
            let corners = [cell(i, j), cell(i + 1, j), cell(i + 1, j + 1), cell(i, j + 1)];
            if corners.iter().any(|c| !c.2.is_finite()) {
                continue;
            }
            // Edges in order: bottom, right, top, left.
            let crossings: Vec<(f64, f64)> = (0..4)
                .filter_map(|e| {
                    let (a, b) = (corners[e], corners[(e + 1) % 4]);
                    ((a.2 < 0.0) != (b.2 < 0.0)).then(|| lerp(a, b))
                })
                .collect();
            match crossings.as_slice() {
                [p, q] => out.push([*p, *q]),
                [p, q, r, s] => {
                    out.push([*p, *q]);
                    out.push([*r, *s]);
                }
                _ => {}
            }
        }
    }
    out
}

/// Round tick values covering `domain`, with labels.
pub fn ticks(domain: [f64; 2], count: usize) -> Vec<(f64, String)> {
    let [a, b] = domain;
    let step = tick_step(a, b, count);
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    let first = (a / step).ceil() as i64;
    let last = (b / step).floor() as i64;
    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            let v = if v.abs() < step * 1e-9 { 0.0 } else { v };
            (v, format!("{v:.decimals$}"))
        })
        .collect()
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let mult = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    mult * base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use fenceplot_core::plot::normalize;

    fn layout(text: &str) -> Result<PlotLayout> {
        let config = normalize(text).unwrap();
        layout_plot(
            &config,
            Size::new(500.0, 350.0),
            &DeterministicTextMeasurer::default(),
        )
    }

    #[test]
    fn ticks_are_round_numbers() {
        let t: Vec<_> = ticks([-10.0, 10.0], 5).into_iter().map(|(_, l)| l).collect();
        assert_eq!(t, ["-10", "-5", "0", "5", "10"]);

        let t: Vec<_> = ticks([0.0, 1.0], 5).into_iter().map(|(_, l)| l).collect();
        assert_eq!(t, ["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
    }

    #[test]
    fn projection_round_trips() {
        let p = Projection::new(
            Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 200.0,
                max_y: 100.0,
            },
            [-10.0, 10.0],
            [-5.0, 5.0],
        );
        assert_eq!(p.px(0.0), 100.0);
        assert_eq!(p.py(5.0), 0.0);
        let (x, y) = p.invert(150.0, 25.0);
        assert!((x - 5.0).abs() < 1e-9 && (y - 2.5).abs() < 1e-9);
    }

    #[test]
    fn tip_reports_data_coordinates() {
        let config = normalize(r#"{"fn":"x"}"#).unwrap();
        let size = Size::new(500.0, 350.0);
        let area = plot_area(&config, size);
        let center_x = (area.min_x + area.max_x) / 2.0;
        let center_y = (area.min_y + area.max_y) / 2.0;
        assert_eq!(
            tip_at(&config, size, center_x, center_y).as_deref(),
            Some("x: 0.00, y: 0.00")
        );
        assert_eq!(tip_at(&config, size, 0.0, 0.0), None);
    }

    #[test]
    fn linear_series_stays_inside_area() {
        let out = layout(r#"{"fn":"sin(x)"}"#).unwrap();
        let SeriesGeometry::Polyline { segments } = &out.series[0].geometry else {
            panic!("expected polyline");
        };
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), DEFAULT_SAMPLES as usize);
        for p in &segments[0] {
            assert!(p.x >= out.plot_area.min_x - 1e-9 && p.x <= out.plot_area.max_x + 1e-9);
            assert!(p.y >= out.plot_area.min_y && p.y <= out.plot_area.max_y);
        }
    }

    #[test]
    fn asymptotes_split_the_curve() {
        let out = layout(r#"{"fn":"1/x", "domain":[-1, 1]}"#).unwrap();
        let SeriesGeometry::Polyline { segments } = &out.series[0].geometry else {
            panic!("expected polyline");
        };
        assert!(segments.len() >= 2);
    }

    #[test]
    fn implicit_circle_has_contour() {
        let out = layout(
            r#"{"data":[{"fn":"x^2 + y^2 - 25","fnType":"implicit"}],"xAxis":{"domain":[-6,6]},"yAxis":{"domain":[-6,6]}}"#,
        )
        .unwrap();
        let SeriesGeometry::Polyline { segments } = &out.series[0].geometry else {
            panic!("expected polyline");
        };
        assert!(segments.len() > 20);
    }

    #[test]
    fn vectors_and_scatter_points() {
        let out = layout(
            r#"{"data":[
                {"fnType":"vector","vector":[2,1],"offset":[1,1]},
                {"fnType":"points","points":[[0,0],[1,1]],"graphType":"scatter"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(out.series[0].geometry, SeriesGeometry::Arrow { .. }));
        let SeriesGeometry::Scatter { points } = &out.series[1].geometry else {
            panic!("expected scatter");
        };
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn bad_expression_reports_series_index() {
        let err = layout(r#"{"data":[{"fn":"x"},{"fn":"sin(x"}]}"#).unwrap_err();
        assert!(matches!(err, Error::Expression { series: 1, .. }), "{err}");
    }

    #[test]
    fn legend_follows_series_order() {
        let out = layout(r#"{"data":[{"fn":"x","label":"a"},{"fn":"x^2"}]}"#).unwrap();
        let labels: Vec<_> = out.legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["a", "x^2"]);
        assert_eq!(out.legend.entries[1].color, out.series[1].color);
    }
}
