use crate::legend::layout_legend;
use crate::model::{ForceArrowLayout, ForceDiagramLayout, LayoutPoint, Size};
use crate::text::TextMeasurer;
use fenceplot_core::force::ForceVector;
use fenceplot_core::plot::LegendItem;

const MARGIN: f64 = 40.0;
const LABEL_OFFSET: f64 = 12.0;

/// Arrows from the body at the center, scaled so the largest force reaches the margin.
pub fn layout_force_diagram(
    forces: &[ForceVector],
    size: Size,
    measurer: &dyn TextMeasurer,
) -> ForceDiagramLayout {
    let origin = LayoutPoint::new(size.width / 2.0, size.height / 2.0);
    let reach = (size.width.min(size.height) / 2.0 - MARGIN).max(1.0);
    let max_magnitude = forces
        .iter()
        .map(ForceVector::magnitude)
        .fold(0.0_f64, f64::max);
    let scale = if max_magnitude > 0.0 {
        reach / max_magnitude
    } else {
        0.0
    };

    let arrows = forces
        .iter()
        .map(|f| {
            // Screen y grows downwards.
            let to = LayoutPoint::new(origin.x + f.x * scale, origin.y - f.y * scale);
            let magnitude = f.magnitude();
            let label = if magnitude > 0.0 {
                let angle = f.angle();
                LayoutPoint::new(
                    to.x + angle.cos() * LABEL_OFFSET,
                    to.y - angle.sin() * LABEL_OFFSET,
                )
            } else {
                LayoutPoint::new(origin.x + LABEL_OFFSET, origin.y - LABEL_OFFSET)
            };
            ForceArrowLayout {
                name: f.name.clone(),
                color: f.color.clone(),
                magnitude,
                from: origin,
                to,
                label,
            }
        })
        .collect();

    let legend_items: Vec<LegendItem> = forces
        .iter()
        .map(|f| LegendItem {
            color: f.color.clone(),
            label: f.name.clone(),
        })
        .collect();

    ForceDiagramLayout {
        size,
        origin,
        arrows,
        legend: layout_legend(&legend_items, size.width, measurer),
    }
}
