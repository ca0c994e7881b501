use super::{SvgRenderOptions, arrow_head, escape_xml, fmt, legend_group, polyline_path};
use crate::model::{PlotLayout, SeriesGeometry};
use std::fmt::Write as _;

const STROKE_WIDTH: f64 = 2.0;
const POINT_RADIUS: f64 = 3.0;
const ARROW_HEAD: f64 = 9.0;

fn plot_css(id: &str, font_family: &str) -> String {
    format!(
        "#{id}{{font-family:{font};}}#{id} .grid{{stroke:#e5e7eb;stroke-width:1;}}#{id} .axis{{stroke:#374151;stroke-width:1;}}#{id} .tick{{font-size:11px;fill:#6b7280;}}#{id} .axis-label{{font-size:12px;fill:#374151;}}#{id} .title{{font-size:14px;font-weight:600;fill:#111827;}}#{id} .legend-label{{font-size:12px;fill:#374151;}}",
        id = id,
        font = font_family
    )
}

/// Writes a laid-out plot as a standalone SVG document; the legend (if any) is stacked under
/// the drawing, so the document is taller than `layout.size.height`.
pub fn render_plot_svg(layout: &PlotLayout, options: &SvgRenderOptions) -> String {
    let id = escape_xml(options.id());
    let width = layout.size.width;
    let legend_height = if options.include_legend {
        layout.legend.height
    } else {
        0.0
    };
    let height = layout.size.height + legend_height;
    let area = &layout.plot_area;

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="function-plot">"#,
        w = fmt(width),
        h = fmt(height),
    );
    let _ = write!(
        &mut out,
        "<style>{}</style>",
        escape_xml(&plot_css(&id, &options.font_family))
    );
    if let Some(bg) = options.background.as_deref() {
        let _ = write!(
            &mut out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape_xml(bg)
        );
    }
    let _ = write!(
        &mut out,
        r#"<defs><clipPath id="{id}-clip"><rect x="{x}" y="{y}" width="{w}" height="{h}"/></clipPath></defs>"#,
        x = fmt(area.min_x),
        y = fmt(area.min_y),
        w = fmt(area.width()),
        h = fmt(area.height()),
    );

    if let Some(title) = layout.title.as_deref() {
        let _ = write!(
            &mut out,
            r#"<text x="{x}" y="22" class="title" text-anchor="middle">{t}</text>"#,
            x = fmt(width / 2.0),
            t = escape_xml(title)
        );
    }

    if layout.grid {
        out.push_str(r#"<g class="grid">"#);
        for t in &layout.x_axis.ticks {
            let _ = write!(
                &mut out,
                r#"<line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}"/>"#,
                x = fmt(t.pos),
                y1 = fmt(area.min_y),
                y2 = fmt(area.max_y)
            );
        }
        for t in &layout.y_axis.ticks {
            let _ = write!(
                &mut out,
                r#"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}"/>"#,
                x1 = fmt(area.min_x),
                x2 = fmt(area.max_x),
                y = fmt(t.pos)
            );
        }
        out.push_str("</g>");
    }

    // Axes sit on the zero lines when visible, otherwise on the area edges.
    let x_axis_y = layout.x_axis.zero.unwrap_or(area.max_y);
    let y_axis_x = layout.y_axis.zero.unwrap_or(area.min_x);
    let _ = write!(
        &mut out,
        r#"<g class="axes"><line class="axis" x1="{x1}" y1="{y}" x2="{x2}" y2="{y}"/><line class="axis" x1="{x}" y1="{y1}" x2="{x}" y2="{y2}"/>"#,
        x1 = fmt(area.min_x),
        x2 = fmt(area.max_x),
        y = fmt(x_axis_y),
        x = fmt(y_axis_x),
        y1 = fmt(area.min_y),
        y2 = fmt(area.max_y),
    );
    for t in &layout.x_axis.ticks {
        let _ = write!(
            &mut out,
            r#"<text class="tick" x="{x}" y="{y}" text-anchor="middle">{l}</text>"#,
            x = fmt(t.pos),
            y = fmt(area.max_y + 14.0),
            l = escape_xml(&t.label)
        );
    }
    for t in &layout.y_axis.ticks {
        let _ = write!(
            &mut out,
            r#"<text class="tick" x="{x}" y="{y}" text-anchor="end">{l}</text>"#,
            x = fmt(area.min_x - 6.0),
            y = fmt(t.pos + 4.0),
            l = escape_xml(&t.label)
        );
    }
    let _ = write!(
        &mut out,
        r#"<text class="axis-label" x="{x}" y="{y}" text-anchor="end">{l}</text>"#,
        x = fmt(area.max_x),
        y = fmt(area.max_y + 30.0),
        l = escape_xml(&layout.x_axis.label)
    );
    let _ = write!(
        &mut out,
        r#"<text class="axis-label" x="{x}" y="{y}">{l}</text>"#,
        x = fmt(area.min_x + 4.0),
        y = fmt(area.min_y + 12.0),
        l = escape_xml(&layout.y_axis.label)
    );
    out.push_str("</g>");

    let _ = write!(&mut out, r#"<g class="series" clip-path="url(#{id}-clip)">"#);
    for (index, s) in layout.series.iter().enumerate() {
        let color = escape_xml(&s.color);
        let _ = write!(
            &mut out,
            r#"<g class="graph" data-index="{index}"><title>{label}</title>"#,
            label = escape_xml(&s.label)
        );
        match &s.geometry {
            SeriesGeometry::Polyline { segments } => {
                let d: String = segments
                    .iter()
                    .map(|seg| polyline_path(seg, s.closed))
                    .collect();
                if !d.is_empty() {
                    let _ = write!(
                        &mut out,
                        r#"<path d="{d}" fill="none" stroke="{color}" stroke-width="{w}" stroke-linejoin="round"/>"#,
                        w = fmt(STROKE_WIDTH)
                    );
                }
            }
            SeriesGeometry::Scatter { points } => {
                for p in points {
                    let _ = write!(
                        &mut out,
                        r#"<circle cx="{x}" cy="{y}" r="{r}" fill="{color}"/>"#,
                        x = fmt(p.x),
                        y = fmt(p.y),
                        r = fmt(POINT_RADIUS)
                    );
                }
            }
            SeriesGeometry::Arrow { from, to } => {
                let _ = write!(
                    &mut out,
                    r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="{w}"/>"#,
                    x1 = fmt(from.x),
                    y1 = fmt(from.y),
                    x2 = fmt(to.x),
                    y2 = fmt(to.y),
                    w = fmt(STROKE_WIDTH)
                );
                if let Some(head) = arrow_head(*from, *to, ARROW_HEAD) {
                    let _ = write!(&mut out, r#"<path d="{head}" fill="{color}"/>"#);
                }
            }
        }
        out.push_str("</g>");
    }
    out.push_str("</g>");

    if options.include_legend {
        legend_group(&mut out, &layout.legend, layout.size.height);
    }

    out.push_str("</svg>\n");
    out
}
