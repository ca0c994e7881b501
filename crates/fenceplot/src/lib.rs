#![forbid(unsafe_code)]

//! `fenceplot` renders the fenced diagram blocks of a markdown document without a browser.
//!
//! Recognized blocks are `plot-function` (function, implicit, parametric, point and vector
//! plots) and `plot-force` (free-body force diagrams). Every other tag is shown as code. A block
//! that cannot be rendered is replaced by a notice scoped to that block; its siblings are
//! unaffected.
//!
//! # Features
//!
//! - `render`: SVG output, markdown documents and the stateful components (`fenceplot::render`)
//! - `raster`: PNG output via pure-Rust SVG rasterization

pub use fenceplot_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use fenceplot_render::backend::{DrawRequest, PlotBackend, SvgBackend};
    pub use fenceplot_render::board::{
        Board, BoardEngine, BoardOptions, BoardPhase, InteractiveBoardController, KeyOutcome,
        PanDirection, Viewport,
    };
    pub use fenceplot_render::model::Size;
    pub use fenceplot_render::scheduler::{Deferred, EventLoop, Scheduler};
    pub use fenceplot_render::surface::{PlotRenderSurface, SurfaceView};
    pub use fenceplot_render::svg::SvgRenderOptions;
    pub use fenceplot_render::text::{DeterministicTextMeasurer, TextMeasurer};

    mod document;
    mod frame;

    pub use document::{RenderedDocument, render_markdown};
    pub use frame::{DiagramFrame, FrameAction, FrameView};

    #[cfg(feature = "raster")]
    pub mod raster;

    use fenceplot_core::ids::MountId;
    use fenceplot_core::{DiagramPayload, Engine, ParsedBlock, RenderTarget, SiteConfig};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] fenceplot_core::Error),
        #[error(transparent)]
        Render(#[from] fenceplot_render::Error),
    }

    impl HeadlessError {
        /// The payload-level error behind this failure. Drawing failures count as malformed
        /// payloads: the reader sees the same notice either way.
        pub fn to_core(&self) -> fenceplot_core::Error {
            match self {
                Self::Parse(err) | Self::Render(fenceplot_render::Error::Core(err)) => err.clone(),
                Self::Render(other) => fenceplot_core::Error::malformed("render", other.to_string()),
            }
        }
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token.
    ///
    /// The root id prefixes internal ids such as `<id>-clip`, so every block inlined into the
    /// same page needs its own.
    pub fn sanitize_svg_id(raw: &str) -> String {
        fenceplot_core::ids::sanitize_id(raw, "fp")
    }

    /// What a single fenced block turned into.
    #[derive(Debug, Clone, PartialEq)]
    pub enum RenderedBlock {
        /// A plot or force diagram.
        Svg { target: RenderTarget, svg: String },
        /// Boards need a live board library; the host mounts one at `mount_id`.
        Board {
            mount_id: MountId,
            script: String,
            options: BoardOptions,
        },
        /// Verbatim code.
        Code { kind: String, text: String },
        /// The block failed; `svg` shows `notice` in its place.
        Notice {
            target: RenderTarget,
            title: String,
            notice: String,
            svg: String,
        },
    }

    impl RenderedBlock {
        pub fn target(&self) -> RenderTarget {
            match self {
                Self::Svg { target, .. } | Self::Notice { target, .. } => *target,
                Self::Board { .. } => RenderTarget::Board,
                Self::Code { .. } => RenderTarget::Code,
            }
        }

        pub fn svg(&self) -> Option<&str> {
            match self {
                Self::Svg { svg, .. } | Self::Notice { svg, .. } => Some(svg.as_str()),
                Self::Board { .. } | Self::Code { .. } => None,
            }
        }

        pub fn notice(&self) -> Option<&str> {
            match self {
                Self::Notice { notice, .. } => Some(notice.as_str()),
                _ => None,
            }
        }

        pub fn is_notice(&self) -> bool {
            matches!(self, Self::Notice { .. })
        }
    }

    /// Bundles an [`Engine`] with drawing options for one-shot block rendering.
    ///
    /// Stays runtime-agnostic: all work is CPU-bound and does not perform I/O.
    #[derive(Clone)]
    pub struct HeadlessRenderer {
        pub engine: Engine,
        pub size: Size,
        pub svg: SvgRenderOptions,
        pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    }

    impl Default for HeadlessRenderer {
        fn default() -> Self {
            let engine = Engine::new();
            let size = default_size(engine.site_config());
            Self {
                engine,
                size,
                svg: SvgRenderOptions::default(),
                text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            }
        }
    }

    fn default_size(config: &SiteConfig) -> Size {
        Size::new(
            config.surface_default_width(),
            config.surface_default_height(),
        )
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Applies site overrides; the drawing size follows `surface.defaultWidth/Height`.
        pub fn with_site_config(mut self, site_config: SiteConfig) -> Self {
            self.engine = self.engine.with_site_config(site_config);
            self.size = default_size(self.engine.site_config());
            self
        }

        pub fn with_size(mut self, size: Size) -> Self {
            self.size = size;
            self
        }

        pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
            self.text_measurer = measurer;
            self
        }

        fn backend(&self, svg: &SvgRenderOptions) -> SvgBackend {
            SvgBackend::new(svg.clone()).with_text_measurer(self.text_measurer.clone())
        }

        /// Renders one block, propagating failures.
        pub fn try_render_block_sync(&self, payload: &DiagramPayload) -> Result<RenderedBlock> {
            self.try_render_block_with(payload, &self.svg)
        }

        fn try_render_block_with(
            &self,
            payload: &DiagramPayload,
            svg: &SvgRenderOptions,
        ) -> Result<RenderedBlock> {
            let request = match self.engine.parse_block_sync(payload)? {
                ParsedBlock::FunctionPlot(config) => DrawRequest::Plot {
                    config,
                    size: self.size,
                },
                ParsedBlock::ForceDiagram(forces) => DrawRequest::Force {
                    forces,
                    size: self.size,
                },
                ParsedBlock::Board { script } => {
                    let mount_id = match &svg.diagram_id {
                        Some(id) => MountId::from_raw(id),
                        None => MountId::generate(),
                    };
                    return Ok(RenderedBlock::Board {
                        mount_id,
                        script,
                        options: BoardOptions::from_config(self.engine.site_config()),
                    });
                }
                ParsedBlock::Code { text } => {
                    return Ok(RenderedBlock::Code {
                        kind: payload.kind().to_string(),
                        text,
                    });
                }
            };
            let target = self.engine.dispatch(payload);
            let svg = self.backend(svg).render(&request)?;
            Ok(RenderedBlock::Svg { target, svg })
        }

        /// Renders one block. Never fails: a broken block becomes a [`RenderedBlock::Notice`].
        pub fn render_block_sync(&self, payload: &DiagramPayload) -> RenderedBlock {
            self.render_block_with(payload, &self.svg)
        }

        /// Like [`Self::render_block_sync`] with an explicit root id for the SVG.
        pub fn render_block_sync_with_diagram_id(
            &self,
            payload: &DiagramPayload,
            diagram_id: &str,
        ) -> RenderedBlock {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self.render_block_with(payload, &svg)
        }

        fn render_block_with(&self, payload: &DiagramPayload, svg: &SvgRenderOptions) -> RenderedBlock {
            match self.try_render_block_with(payload, svg) {
                Ok(block) => block,
                Err(err) => {
                    tracing::warn!(kind = payload.kind(), error = %err, "block isolated");
                    let core = err.to_core();
                    let title = core.title().to_string();
                    let notice = core.notice();
                    let svg = fenceplot_render::svg::render_notice_svg(
                        Some(title.as_str()),
                        &notice,
                        Size::new(self.size.width, 0.0),
                        svg,
                    );
                    RenderedBlock::Notice {
                        target: self.engine.dispatch(payload),
                        title,
                        notice,
                        svg,
                    }
                }
            }
        }

        pub async fn render_block(&self, payload: &DiagramPayload) -> RenderedBlock {
            self.render_block_sync(payload)
        }

        /// SVG for a diagram block; `None` for code and board blocks.
        pub fn render_svg_sync(&self, kind: &str, text: &str) -> Result<Option<String>> {
            let payload = DiagramPayload::new(kind, text);
            Ok(match self.try_render_block_sync(&payload)? {
                RenderedBlock::Svg { svg, .. } => Some(svg),
                _ => None,
            })
        }

        /// Renders every fenced block of `source`; see [`render_markdown`].
        pub fn render_markdown(&self, source: &str) -> RenderedDocument {
            document::render_document(self, source)
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            payload: &DiagramPayload,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Option<Vec<u8>>> {
            raster::render_png_sync(self, payload, raster)
        }
    }

}
