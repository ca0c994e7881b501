//! The frame around a rendered diagram: a toolbar that flips between the drawing and its
//! source, plus "Reset View" for boards.

use super::{BoardEngine, InteractiveBoardController, RenderedBlock};
use fenceplot_core::DiagramPayload;
use fenceplot_render::svg::escape_xml;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameView {
    #[default]
    Diagram,
    Code,
}

impl FrameView {
    pub fn toggled(self) -> Self {
        match self {
            Self::Diagram => Self::Code,
            Self::Code => Self::Diagram,
        }
    }

    /// Localization key of the toggle button while this view is shown.
    pub fn button_key(self) -> &'static str {
        match self {
            Self::Diagram => "view-code",
            Self::Code => "view-diagram",
        }
    }

    /// English text for [`Self::button_key`].
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Diagram => "View code",
            Self::Code => "View diagram",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Diagram => "diagram",
            Self::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameAction {
    ToggleView,
    ResetView,
}

impl FrameAction {
    pub fn key(self) -> &'static str {
        match self {
            Self::ToggleView => "toggle-view",
            Self::ResetView => "reset-view",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramFrame {
    kind: String,
    source: String,
    block: RenderedBlock,
    view: FrameView,
}

impl DiagramFrame {
    pub fn new(payload: &DiagramPayload, block: RenderedBlock) -> Self {
        Self {
            kind: payload.kind().to_string(),
            source: payload.text().to_string(),
            block,
            view: FrameView::default(),
        }
    }

    pub fn view(&self) -> FrameView {
        self.view
    }

    pub fn block(&self) -> &RenderedBlock {
        &self.block
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Toolbar actions, in display order.
    pub fn actions(&self) -> Vec<FrameAction> {
        match self.block {
            RenderedBlock::Board { .. } => vec![FrameAction::ResetView, FrameAction::ToggleView],
            _ => vec![FrameAction::ToggleView],
        }
    }

    pub fn toggle(&mut self) -> FrameView {
        self.view = self.view.toggled();
        self.view
    }

    /// "Reset View": re-initializes `board` from its current script. Frames that do not hold a
    /// board ignore the request.
    pub fn reset_view<E: BoardEngine + 'static>(&self, board: &InteractiveBoardController<E>) {
        if !matches!(self.block, RenderedBlock::Board { .. }) {
            tracing::warn!(kind = %self.kind, "reset requested for a frame without a board");
            return;
        }
        board.reset();
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            &mut out,
            r#"<figure class="diagram-frame" data-kind="{}" data-view="{}"><div class="diagram-frame-toolbar">"#,
            escape_xml(&self.kind),
            self.view.as_str()
        );
        for action in self.actions() {
            let (key, label) = match action {
                FrameAction::ToggleView => (self.view.button_key(), self.view.button_label()),
                FrameAction::ResetView => ("reset-view", "Reset View"),
            };
            let _ = write!(
                &mut out,
                r#"<button type="button" data-action="{}" data-label-key="{key}">{label}</button>"#,
                action.key()
            );
        }
        out.push_str("</div>");

        match (self.view, &self.block) {
            (FrameView::Code, _) | (_, RenderedBlock::Code { .. }) => {
                let _ = write!(
                    &mut out,
                    r#"<pre class="diagram-frame-source"><code>{}</code></pre>"#,
                    escape_xml(&self.source)
                );
            }
            (FrameView::Diagram, RenderedBlock::Svg { svg, .. })
            | (FrameView::Diagram, RenderedBlock::Notice { svg, .. }) => {
                let _ = write!(&mut out, r#"<div class="diagram-frame-body">{svg}</div>"#);
            }
            (FrameView::Diagram, RenderedBlock::Board {
                mount_id, options, ..
            }) => {
                let options = serde_json::to_string(options).unwrap_or_default();
                let _ = write!(
                    &mut out,
                    r#"<div class="diagram-frame-body"><div id="{mount_id}" class="board" tabindex="0" data-options="{}"></div></div>"#,
                    escape_xml(&options)
                );
            }
        }
        out.push_str("</figure>\n");
        out
    }
}
