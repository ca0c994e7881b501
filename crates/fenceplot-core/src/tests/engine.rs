use crate::*;
use futures::executor::block_on;
use serde_json::json;

#[test]
fn parse_block_function_plot() {
    let engine = Engine::new();
    let payload = DiagramPayload::new("plot-function", r#"{"fn":"sin(x)"}"#);
    let block = block_on(engine.parse_block(&payload)).unwrap();
    assert_eq!(block.target(), RenderTarget::FunctionPlot);
    let ParsedBlock::FunctionPlot(config) = block else {
        panic!("expected function plot");
    };
    assert_eq!(config.data[0].label, "sin(x)");
}

#[test]
fn parse_block_code_passes_text_through() {
    let engine = Engine::new();
    let payload = DiagramPayload::from_fence("rust", "fn main() {}\n");
    assert_eq!(
        engine.parse_block_sync(&payload).unwrap(),
        ParsedBlock::Code {
            text: "fn main() {}".to_string()
        }
    );
}

#[test]
fn parse_block_reports_malformed_force_payload() {
    let engine = Engine::new();
    let payload = DiagramPayload::new("plot-force", "{ not json");
    let err = engine.parse_block_sync(&payload).unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { .. }));
}

#[test]
fn site_config_overrides_default_domain() {
    let mut overrides = SiteConfig::empty_object();
    overrides.set_value("plot.defaultDomain", json!([-1, 1]));
    let engine = Engine::new().with_site_config(overrides);
    let payload = DiagramPayload::new("plot-function", r#"{"fn":"x"}"#);
    let ParsedBlock::FunctionPlot(config) = engine.parse_block_sync(&payload).unwrap() else {
        panic!("expected function plot");
    };
    assert_eq!(config.x_axis.domain, [-1.0, 1.0]);
    assert_eq!(config.y_axis.domain, [-1.0, 1.0]);
}

#[test]
fn site_config_enables_board_routing() {
    let mut overrides = SiteConfig::empty_object();
    overrides.set_value("board.fenceTag", json!("jessecode"));
    let engine = Engine::new().with_site_config(overrides);
    let payload = DiagramPayload::new("jessecode", "A = point(1, 2);");
    assert_eq!(
        engine.parse_block_sync(&payload).unwrap(),
        ParsedBlock::Board {
            script: "A = point(1, 2);".to_string()
        }
    );
    assert_eq!(engine.site_config().get_f64("board.zoom.factorX"), Some(1.25));
}
