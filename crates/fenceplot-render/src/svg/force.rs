use super::{SvgRenderOptions, arrow_head, escape_xml, fmt, legend_group};
use crate::model::ForceDiagramLayout;
use std::fmt::Write as _;

const ARROW_HEAD: f64 = 10.0;

pub fn render_force_svg(layout: &ForceDiagramLayout, options: &SvgRenderOptions) -> String {
    let id = escape_xml(options.id());
    let width = layout.size.width;
    let legend_height = if options.include_legend {
        layout.legend.height
    } else {
        0.0
    };
    let height = layout.size.height + legend_height;

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="force-diagram">"#,
        w = fmt(width),
        h = fmt(height),
    );
    let _ = write!(
        &mut out,
        "<style>#{id}{{font-family:{font};}}#{id} .force-label{{font-size:12px;}}#{id} .legend-label{{font-size:12px;fill:#374151;}}</style>",
        font = escape_xml(&options.font_family)
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
        r##"<rect class="body" x="{x}" y="{y}" width="24" height="24" fill="#e5e7eb" stroke="#374151"/>"##,
        x = fmt(layout.origin.x - 12.0),
        y = fmt(layout.origin.y - 12.0),
    );

    for (index, a) in layout.arrows.iter().enumerate() {
        let color = escape_xml(&a.color);
        let _ = write!(
            &mut out,
            r#"<g class="force" data-index="{index}"><title>{name} ({m})</title>"#,
            name = escape_xml(&a.name),
            m = fmt((a.magnitude * 100.0).round() / 100.0),
        );
        let _ = write!(
            &mut out,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="2.5"/>"#,
            x1 = fmt(a.from.x),
            y1 = fmt(a.from.y),
            x2 = fmt(a.to.x),
            y2 = fmt(a.to.y),
        );
        if let Some(head) = arrow_head(a.from, a.to, ARROW_HEAD) {
            let _ = write!(&mut out, r#"<path d="{head}" fill="{color}"/>"#);
        }
        let _ = write!(
            &mut out,
            r#"<text class="force-label" x="{x}" y="{y}" fill="{color}" text-anchor="middle" dominant-baseline="middle">{name}</text></g>"#,
            x = fmt(a.label.x),
            y = fmt(a.label.y),
            name = escape_xml(&a.name),
        );
    }

    if options.include_legend {
        legend_group(&mut out, &layout.legend, layout.size.height);
    }

    out.push_str("</svg>\n");
    out
}
