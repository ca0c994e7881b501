use crate::SiteConfig;

pub const FUNCTION_PLOT_TAG: &str = "plot-function";
pub const FORCE_DIAGRAM_TAG: &str = "plot-force";

/// Renderer selected for a fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// Function, implicit, parametric, point and vector plots.
    FunctionPlot,
    /// Free-body force diagrams.
    ForceDiagram,
    /// Script-driven interactive board. Only produced when a board tag is configured.
    Board,
    /// Verbatim code display.
    Code,
}

/// Classifies a fenced block by its language tag.
///
/// Total over all inputs: anything that is not a recognized tag falls through to
/// [`RenderTarget::Code`]. The text is not inspected.
pub fn dispatch(kind: &str, _text: &str) -> RenderTarget {
    match kind {
        FUNCTION_PLOT_TAG => RenderTarget::FunctionPlot,
        FORCE_DIAGRAM_TAG => RenderTarget::ForceDiagram,
        _ => RenderTarget::Code,
    }
}

/// [`dispatch`] plus the optional board routing configured via `board.fenceTag`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatcher {
    board_tag: Option<String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            board_tag: config.board_fence_tag().map(str::to_string),
        }
    }

    pub fn with_board_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.board_tag = (!tag.is_empty()).then_some(tag);
        self
    }

    pub fn board_tag(&self) -> Option<&str> {
        self.board_tag.as_deref()
    }

    pub fn dispatch(&self, kind: &str, text: &str) -> RenderTarget {
        match dispatch(kind, text) {
            RenderTarget::Code if self.board_tag.as_deref() == Some(kind) => RenderTarget::Board,
            target => target,
        }
    }
}
