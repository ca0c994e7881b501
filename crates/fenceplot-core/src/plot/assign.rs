use super::{FnType, FunctionItem, GraphType};

/// Series colors, cycled by position in the series list.
pub const PALETTE: [&str; 7] = [
    "#2563eb", // blue
    "#dc2626", // red
    "#16a34a", // green
    "#9333ea", // purple
    "#ea580c", // orange
    "#0891b2", // cyan
    "#db2777", // pink
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Fills missing `fnType`, `graphType`, `color` and `label` on every item.
///
/// `index` is the position in `items` as given: callers that render a legend must pass the same
/// slice they draw from, otherwise colors and legend entries drift apart. Empty strings count as
/// missing. Everything else (including `vector`) is copied through unchanged.
pub fn assign(items: &[FunctionItem]) -> Vec<FunctionItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut out = item.clone();
            if out.fn_type.is_none() {
                out.fn_type = Some(FnType::Linear.as_str().to_string());
            }
            if out.graph_type.is_none() {
                out.graph_type = Some(GraphType::Polyline.as_str().to_string());
            }
            if out.color.as_deref().is_none_or(str::is_empty) {
                out.color = Some(palette_color(index).to_string());
            }
            if out.label.as_deref().is_none_or(str::is_empty) {
                out.label = Some(match item.fn_expr.as_deref() {
                    Some(expr) if !expr.is_empty() => expr.to_string(),
                    _ => format!("Function {}", index + 1),
                });
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_through_palette_by_position() {
        let items: Vec<FunctionItem> = (0..10)
            .map(|i| FunctionItem::with_expression(format!("x^{i}")))
            .collect();
        let out = assign(&items);
        for (i, item) in out.iter().enumerate() {
            assert_eq!(item.color.as_deref(), Some(PALETTE[i % PALETTE.len()]));
        }
    }

    #[test]
    fn colors_ignore_expression_and_label() {
        let a = assign(&[
            FunctionItem::with_expression("sin(x)"),
            FunctionItem {
                label: Some("custom".to_string()),
                ..FunctionItem::with_expression("cos(x)")
            },
        ]);
        let b = assign(&[
            FunctionItem::with_expression("x"),
            FunctionItem::with_expression("y"),
        ]);
        assert_eq!(a[0].color, b[0].color);
        assert_eq!(a[1].color, b[1].color);
    }

    #[test]
    fn explicit_attributes_win() {
        let out = assign(&[FunctionItem {
            color: Some("red".to_string()),
            label: Some("Object A".to_string()),
            graph_type: Some("scatter".to_string()),
            fn_type: Some("implicit".to_string()),
            ..FunctionItem::with_expression("x^2 + y^2 - 4")
        }]);
        assert_eq!(out[0].color.as_deref(), Some("red"));
        assert_eq!(out[0].label.as_deref(), Some("Object A"));
        assert_eq!(out[0].graph_type.as_deref(), Some("scatter"));
        assert_eq!(out[0].fn_type.as_deref(), Some("implicit"));
    }

    #[test]
    fn label_falls_back_to_expression_then_position() {
        let out = assign(&[
            FunctionItem::with_expression("x^2"),
            FunctionItem {
                points: Some(vec![[0.0, 0.0]]),
                fn_type: Some("points".to_string()),
                ..FunctionItem::default()
            },
            FunctionItem {
                label: Some(String::new()),
                ..FunctionItem::with_expression("")
            },
        ]);
        assert_eq!(out[0].label.as_deref(), Some("x^2"));
        assert_eq!(out[1].label.as_deref(), Some("Function 2"));
        assert_eq!(out[2].label.as_deref(), Some("Function 3"));
    }

    #[test]
    fn defaults_kind_and_style_and_keeps_vector() {
        let out = assign(&[FunctionItem {
            vector: Some([3.0, -1.5]),
            ..FunctionItem::default()
        }]);
        assert_eq!(out[0].fn_type.as_deref(), Some("linear"));
        assert_eq!(out[0].graph_type.as_deref(), Some("polyline"));
        assert_eq!(out[0].vector, Some([3.0, -1.5]));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(assign(&[]).is_empty());
    }
}
