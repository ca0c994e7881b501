mod force;
mod notice;
mod plot;

pub use force::render_force_svg;
pub use notice::render_notice_svg;
pub use plot::render_plot_svg;

use crate::model::LayoutPoint;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `id`; also prefixes internal ids such as the clip path, so blocks inlined into the
    /// same page must use distinct values.
    pub diagram_id: Option<String>,
    pub font_family: String,
    pub background: Option<String>,
    /// When false, the legend rows under the drawing are omitted.
    pub include_legend: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            font_family: "ui-sans-serif, system-ui, sans-serif".to_string(),
            background: Some("white".to_string()),
            include_legend: true,
        }
    }
}

impl SvgRenderOptions {
    pub(crate) fn id(&self) -> &str {
        self.diagram_id.as_deref().unwrap_or("fenceplot")
    }
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form without `-0` and without float noise from our own math.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn fmt_path(v: f64) -> String {
    // Path data is written with at most 3 fractional digits.
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.abs() < 0.0005 {
        return "0".to_string();
    }

    let scaled = v * 1000.0;
    let mut r = (scaled + 0.5).floor() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }

    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Escapes text for XML and HTML attribute or element content.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `M x,y L x,y ...` for one open polyline.
fn polyline_path(points: &[LayoutPoint], closed: bool) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&fmt_path(p.x));
        d.push(',');
        d.push_str(&fmt_path(p.y));
    }
    if closed && points.len() > 2 {
        d.push('Z');
    }
    d
}

/// Triangle for an arrow head ending at `to`; empty when the arrow has no length.
fn arrow_head(from: LayoutPoint, to: LayoutPoint, size: f64) -> Option<String> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    if len < 1e-9 {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let size = size.min(len);
    let base = LayoutPoint::new(to.x - ux * size, to.y - uy * size);
    let half = size * 0.5;
    let left = LayoutPoint::new(base.x - uy * half, base.y + ux * half);
    let right = LayoutPoint::new(base.x + uy * half, base.y - ux * half);
    Some(polyline_path(&[to, left, right], true))
}

fn legend_group(out: &mut String, legend: &crate::model::LegendLayout, top: f64) {
    use std::fmt::Write as _;

    if legend.entries.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<g class="legend" transform="translate(0,{y})">"#,
        y = fmt(top)
    );
    for e in &legend.entries {
        let _ = write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" rx="2" fill="{fill}"/><text x="{tx}" y="{ty}" class="legend-label">{label}</text>"#,
            x = fmt(e.x),
            y = fmt(e.y),
            s = fmt(e.swatch),
            fill = escape_xml(&e.color),
            tx = fmt(e.x + e.swatch + 6.0),
            ty = fmt(e.y + e.swatch - 2.0),
            label = escape_xml(&e.label),
        );
    }
    out.push_str("</g>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(2.0000000001), "2");
        assert_eq!(fmt(1.5), "1.5");
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(-0.0001), "0");
        assert_eq!(fmt_path(3.0), "3");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_xml(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn arrow_head_points_at_target() {
        let d = arrow_head(LayoutPoint::new(0.0, 0.0), LayoutPoint::new(10.0, 0.0), 4.0).unwrap();
        assert_eq!(d, "M10,0L6,2L6,-2Z");
        assert!(arrow_head(LayoutPoint::new(1.0, 1.0), LayoutPoint::new(1.0, 1.0), 4.0).is_none());
    }
}
