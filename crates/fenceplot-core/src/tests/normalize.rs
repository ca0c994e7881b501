use crate::plot::{FnType, GraphType, PALETTE, SeriesContent, legend, normalize};
use crate::*;
use serde_json::json;

#[test]
fn shorthand_uses_default_domains_and_grid() {
    let config = normalize(r#"{"fn":"sin(x)"}"#).unwrap();
    assert_eq!(config.data.len(), 1);
    assert_eq!(config.data[0].content.expression(), Some("sin(x)"));
    assert!(config.grid);
    assert_eq!(config.x_axis.domain, [-10.0, 10.0]);
    assert_eq!(config.y_axis.domain, [-10.0, 10.0]);
    assert_eq!(config.title, None);
}

#[test]
fn shorthand_domain_sets_x_axis_only() {
    let config = normalize(r#"{"fn":"x^2","domain":[0,5]}"#).unwrap();
    assert_eq!(config.x_axis.domain, [0.0, 5.0]);
    assert_eq!(config.y_axis.domain, [-10.0, 10.0]);
}

#[test]
fn shorthand_canonical_shape() {
    let config = normalize(r#"{ "fn": "sin(x)", "domain": [-6, 6] }"#).unwrap();
    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        json!({
            "data": [{
                "fnType": "linear",
                "fn": "sin(x)",
                "graphType": "polyline",
                "color": "#2563eb",
                "label": "sin(x)"
            }],
            "xAxis": { "domain": [-6.0, 6.0] },
            "yAxis": { "domain": [-10.0, 10.0] },
            "grid": true
        })
    );
}

#[test]
fn shorthand_without_fn_plots_identity() {
    let config = normalize("{}").unwrap();
    assert_eq!(config.data[0].content.expression(), Some("x"));
    assert_eq!(config.data[0].label, "x");
}

#[test]
fn data_array_wins_over_fn() {
    let config = normalize(r#"{"data":[{"fn":"x"}], "fn":"ignored"}"#).unwrap();
    assert_eq!(config.data.len(), 1);
    assert_eq!(config.data[0].content.expression(), Some("x"));
}

#[test]
fn non_array_data_falls_back_to_shorthand() {
    let config = normalize(r#"{"data":{"fn":"x"}, "fn":"cos(x)"}"#).unwrap();
    assert_eq!(config.data[0].content.expression(), Some("cos(x)"));
}

#[test]
fn multi_series_preserves_supplied_fields() {
    let config = normalize(
        r#"{
  "title": "Projectile Motion",
  "data": [
    { "fn": "-4.9*x^2 + 10*x", "color": "red", "label": "Object A" },
    { "fn": "-4.9*x^2 + 15*x", "color": "blue", "label": "Object B" }
  ],
  "xAxis": { "label": "Time (s)", "domain": [0, 4] },
  "yAxis": { "label": "Height (m)", "domain": [0, 15] },
  "grid": true,
  "disableZoom": true
}"#,
    )
    .unwrap();
    assert_eq!(config.title.as_deref(), Some("Projectile Motion"));
    assert_eq!(config.x_axis.domain, [0.0, 4.0]);
    assert_eq!(config.x_axis.label.as_deref(), Some("Time (s)"));
    assert_eq!(config.y_axis.domain, [0.0, 15.0]);
    assert_eq!(config.disable_zoom, Some(true));
    assert_eq!(
        legend(&config)
            .into_iter()
            .map(|l| (l.color, l.label))
            .collect::<Vec<_>>(),
        vec![
            ("red".to_string(), "Object A".to_string()),
            ("blue".to_string(), "Object B".to_string()),
        ]
    );
}

#[test]
fn multi_series_axes_default_independently() {
    let config = normalize(
        r#"{"data":[{"fn":"x"}], "xAxis": {"domain": [3, 1]}, "yAxis": {"domain": [0, 2]}}"#,
    )
    .unwrap();
    assert_eq!(config.x_axis.domain, [-10.0, 10.0]);
    assert_eq!(config.y_axis.domain, [0.0, 2.0]);
    assert!(config.grid);
}

#[test]
fn grid_is_disabled_only_by_explicit_false() {
    let off = normalize(r#"{"data":[{"fn":"x"}], "grid": false}"#).unwrap();
    assert!(!off.grid);
    let other = normalize(r#"{"data":[{"fn":"x"}], "grid": "no"}"#).unwrap();
    assert!(other.grid);
}

#[test]
fn implicit_curve_and_points() {
    let config = normalize(
        r#"{
  "grid": true,
  "data": [
    { "fn": "x^2 + y^2 - 4", "fnType": "implicit", "color": "purple", "label": "Circle r=2" },
    { "points": [[0,0]], "fnType": "points", "graphType": "scatter", "color": "black", "label": "Center" }
  ]
}"#,
    )
    .unwrap();
    assert_eq!(config.data[0].kind(), FnType::Implicit);
    assert_eq!(
        config.data[1].content,
        SeriesContent::Points {
            points: vec![[0.0, 0.0]]
        }
    );
    assert_eq!(config.data[1].graph_type, GraphType::Scatter);
}

#[test]
fn parametric_and_vector_series() {
    let config = normalize(
        r#"{"data":[
  { "fnType": "parametric", "x": "cos(t)", "y": "sin(t)", "range": [0, 6.28], "nSamples": 200, "closed": true },
  { "fnType": "vector", "vector": [2, 1], "offset": [1, 1] }
]}"#,
    )
    .unwrap();
    assert_eq!(config.data[0].label, "Function 1");
    assert_eq!(config.data[0].range, Some([0.0, 6.28]));
    assert_eq!(config.data[0].n_samples, Some(200));
    assert_eq!(config.data[0].closed, Some(true));
    assert_eq!(
        config.data[1].content,
        SeriesContent::Vector {
            vector: [2.0, 1.0],
            offset: Some([1.0, 1.0])
        }
    );
    assert_eq!(config.data[1].label, "Function 2");
}

#[test]
fn unknown_fn_type_is_linear() {
    let config = normalize(r#"{"data":[{"fn":"x","fnType":"spline","graphType":"bars"}]}"#)
        .unwrap();
    assert_eq!(config.data[0].kind(), FnType::Linear);
    assert_eq!(config.data[0].graph_type, GraphType::Polyline);
}

#[test]
fn non_string_tags_fall_back_to_defaults() {
    let config = normalize(r#"{"data":[{"fn":"x","fnType":5,"graphType":["scatter"]}]}"#)
        .unwrap();
    assert_eq!(config.data[0].kind(), FnType::Linear);
    assert_eq!(config.data[0].graph_type, GraphType::Polyline);
}

#[test]
fn off_type_attributes_read_as_absent() {
    let config = normalize(
        r#"{"data":[
  { "fn": "x", "closed": "yes", "range": [0], "label": 7, "color": null },
  { "fnType": "vector", "vector": [1, 2], "offset": "origin" },
  { "fn": "x", "nSamples": "lots" },
  { "fn": "x", "nSamples": -3 }
]}"#,
    )
    .unwrap();
    assert_eq!(config.data[0].closed, None);
    assert_eq!(config.data[0].range, None);
    assert_eq!(config.data[0].label, "x");
    assert_eq!(config.data[0].color, PALETTE[0]);
    assert_eq!(
        config.data[1].content,
        SeriesContent::Vector {
            vector: [1.0, 2.0],
            offset: None
        }
    );
    assert_eq!(config.data[2].n_samples, None);
    assert_eq!(config.data[3].n_samples, None);
}

#[test]
fn integral_float_sample_counts_are_accepted() {
    let config = normalize(r#"{"data":[{"fn":"x","nSamples":100.0}, {"fn":"x","nSamples":2.5}]}"#)
        .unwrap();
    assert_eq!(config.data[0].n_samples, Some(100));
    assert_eq!(config.data[1].n_samples, None);
}

#[test]
fn colors_follow_series_position() {
    let data: Vec<_> = (0..9).map(|i| json!({ "fn": format!("{i}*x") })).collect();
    let text = json!({ "data": data }).to_string();
    let config = normalize(&text).unwrap();
    for (i, series) in config.data.iter().enumerate() {
        assert_eq!(series.color, PALETTE[i % PALETTE.len()]);
    }
}

#[test]
fn malformed_inputs_are_rejected() {
    for text in [
        "not json",
        "",
        "[1, 2]",
        "42",
        "\"fn\"",
        r#"{"data": []}"#,
        r#"{"data": [1]}"#,
        r#"{"data": [{"fnType": "points"}]}"#,
        r#"{"data": [{"fn": 3}]}"#,
        r#"{"fn": 3}"#,
        r#"{"fn": "x",}"#,
    ] {
        let err = normalize(text).unwrap_err();
        assert!(
            matches!(err, Error::MalformedPayload { ref kind, .. } if kind == "plot-function"),
            "{text:?} -> {err:?}"
        );
        assert_eq!(err.notice(), "Invalid graph data received.");
    }
}

#[test]
fn plot_json_fills_axis_labels_and_tip() {
    let config = normalize(r#"{"fn":"x","domain":[0,1]}"#).unwrap();
    let out = config.to_plot_json(500.0, 350.0);
    assert_eq!(out["xAxis"]["label"], json!("x"));
    assert_eq!(out["yAxis"]["label"], json!("y"));
    assert_eq!(out["tip"], json!({ "xLine": true, "yLine": true }));
    assert_eq!(out["data"][0]["fn"], json!("x"));
    assert_eq!(out["width"], json!(500.0));
    assert!(out.get("title").is_none());
}
