use crate::*;

#[test]
fn recognized_tags_route_to_their_renderer() {
    assert_eq!(dispatch("plot-function", "{}"), RenderTarget::FunctionPlot);
    assert_eq!(dispatch("plot-force", "[]"), RenderTarget::ForceDiagram);
}

#[test]
fn dispatch_is_total_over_arbitrary_tags() {
    let tags = [
        "",
        "rust",
        "PLOT-FUNCTION",
        "plot-function ",
        "plot",
        "plot-forces",
        "language-plot-function",
        "plot-function\n",
        "😀",
        "plot:function",
        "\0",
    ];
    for tag in tags {
        let target = dispatch(tag, "not json");
        assert_eq!(target, RenderTarget::Code, "tag {tag:?}");
    }
}

#[test]
fn dispatch_ignores_body_text() {
    assert_eq!(
        dispatch("plot-function", "definitely not json"),
        RenderTarget::FunctionPlot
    );
    assert_eq!(dispatch("python", r#"{"fn":"x"}"#), RenderTarget::Code);
}

#[test]
fn default_dispatcher_never_routes_to_board() {
    let dispatcher = Dispatcher::new();
    assert_eq!(dispatcher.dispatch("jessecode", "point(1,2);"), RenderTarget::Code);
}

#[test]
fn configured_board_tag_routes_to_board() {
    let dispatcher = Dispatcher::new().with_board_tag("jessecode");
    assert_eq!(dispatcher.dispatch("jessecode", ""), RenderTarget::Board);
    assert_eq!(
        dispatcher.dispatch("plot-function", ""),
        RenderTarget::FunctionPlot
    );
    assert_eq!(dispatcher.dispatch("js", ""), RenderTarget::Code);
}

#[test]
fn board_tag_cannot_shadow_plot_tags() {
    let dispatcher = Dispatcher::new().with_board_tag("plot-force");
    assert_eq!(
        dispatcher.dispatch("plot-force", "[]"),
        RenderTarget::ForceDiagram
    );
}
