//! Host-side legend: color swatches and labels laid out in wrapping rows below the drawing.

use crate::model::{LegendEntryLayout, LegendLayout};
use crate::text::{TextMeasurer, TextStyle};
use fenceplot_core::plot::LegendItem;

const SWATCH: f64 = 12.0;
const SWATCH_GAP: f64 = 6.0;
const ENTRY_GAP: f64 = 16.0;
const ROW_HEIGHT: f64 = 20.0;
const PADDING: f64 = 8.0;

pub fn legend_text_style() -> TextStyle {
    TextStyle {
        font_size: 12.0,
        ..TextStyle::default()
    }
}

/// Lays out `items` left to right, starting a new row whenever the next entry would overflow
/// `width`. An entry wider than a whole row still gets a row of its own.
pub fn layout_legend(
    items: &[LegendItem],
    width: f64,
    measurer: &dyn TextMeasurer,
) -> LegendLayout {
    if items.is_empty() {
        return LegendLayout::default();
    }

    let style = legend_text_style();
    let max_x = (width - PADDING).max(PADDING);
    let mut entries = Vec::with_capacity(items.len());
    let mut x = PADDING;
    let mut row = 0usize;

    for item in items {
        let text_w = measurer.measure(&item.label, &style).width;
        let entry_w = SWATCH + SWATCH_GAP + text_w;
        if x > PADDING && x + entry_w > max_x {
            row += 1;
            x = PADDING;
        }
        entries.push(LegendEntryLayout {
            x,
            y: PADDING + row as f64 * ROW_HEIGHT,
            swatch: SWATCH,
            color: item.color.clone(),
            label: item.label.clone(),
        });
        x += entry_w + ENTRY_GAP;
    }

    let rows = row + 1;
    LegendLayout {
        width,
        height: rows as f64 * ROW_HEIGHT + PADDING * 2.0,
        rows,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;

    fn item(label: &str) -> LegendItem {
        LegendItem {
            color: "#000".to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn wraps_when_row_is_full() {
        let measurer = DeterministicTextMeasurer::default();
        let items: Vec<_> = (0..6).map(|i| item(&format!("series number {i}"))).collect();
        let narrow = layout_legend(&items, 320.0, &measurer);
        let wide = layout_legend(&items, 2000.0, &measurer);

        assert_eq!(wide.rows, 1);
        assert!(narrow.rows > 1);
        assert!(narrow.height > wide.height);
        for e in &narrow.entries {
            assert!(e.x >= PADDING);
        }
    }

    #[test]
    fn keeps_series_order() {
        let measurer = DeterministicTextMeasurer::default();
        let items = vec![item("a"), item("b"), item("c")];
        let layout = layout_legend(&items, 500.0, &measurer);
        let labels: Vec<_> = layout.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn empty_legend_takes_no_space() {
        let layout = layout_legend(&[], 500.0, &DeterministicTextMeasurer::default());
        assert_eq!(layout.height, 0.0);
        assert!(layout.entries.is_empty());
    }
}
