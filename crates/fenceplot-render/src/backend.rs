//! Seam to the drawing library that turns a canonical configuration into pixels.

use crate::force::layout_force_diagram;
use crate::model::Size;
use crate::plot::layout_plot;
use crate::svg::{SvgRenderOptions, render_force_svg, render_plot_svg};
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use fenceplot_core::force::ForceVector;
use fenceplot_core::plot::PlotConfig;
use std::sync::Arc;

/// One full redraw. The surface always clears before drawing, so a request describes the
/// complete content, never a patch.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawRequest {
    Plot { config: PlotConfig, size: Size },
    Force { forces: Vec<ForceVector>, size: Size },
}

impl DrawRequest {
    pub fn size(&self) -> Size {
        match self {
            Self::Plot { size, .. } | Self::Force { size, .. } => *size,
        }
    }
}

pub trait PlotBackend {
    fn clear(&mut self);
    /// Draws `request` into an already-cleared region. Errors are display messages.
    fn draw(&mut self, request: &DrawRequest) -> Result<(), String>;
    /// Frees everything held for the region; no call follows.
    fn release(&mut self);
}

/// Headless backend that keeps the latest drawing as an SVG document.
#[derive(Clone)]
pub struct SvgBackend {
    options: SvgRenderOptions,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    svg: Option<String>,
    released: bool,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new(SvgRenderOptions::default())
    }
}

impl SvgBackend {
    pub fn new(options: SvgRenderOptions) -> Self {
        Self {
            options,
            measurer: Arc::new(DeterministicTextMeasurer::default()),
            svg: None,
            released: false,
        }
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Renders `request` without touching the retained drawing.
    pub fn render(&self, request: &DrawRequest) -> crate::Result<String> {
        Ok(match request {
            DrawRequest::Plot { config, size } => {
                let layout = layout_plot(config, *size, self.measurer.as_ref())?;
                render_plot_svg(&layout, &self.options)
            }
            DrawRequest::Force { forces, size } => {
                let layout = layout_force_diagram(forces, *size, self.measurer.as_ref());
                render_force_svg(&layout, &self.options)
            }
        })
    }
}

impl PlotBackend for SvgBackend {
    fn clear(&mut self) {
        self.svg = None;
    }

    fn draw(&mut self, request: &DrawRequest) -> Result<(), String> {
        if self.released {
            return Err("drawing region was released".to_string());
        }
        let svg = self.render(request).map_err(|e| e.to_string())?;
        self.svg = Some(svg);
        Ok(())
    }

    fn release(&mut self) {
        self.svg = None;
        self.released = true;
    }
}
