//! One drawing region per diagram block.
//!
//! The surface parses its payload as soon as it arrives, but every visible change (drawing,
//! legend, overlay) is committed by a deferred redraw on the next scheduler turn. A redraw only
//! commits if it is still the latest one scheduled, so a superseded payload or size never
//! reaches the backend.

use crate::backend::{DrawRequest, PlotBackend};
use crate::model::Size;
use crate::plot::tip_at;
use crate::scheduler::{Deferred, Scheduler};
use fenceplot_core::force::ForceVector;
use fenceplot_core::plot::{LegendItem, PlotConfig, legend};
use fenceplot_core::{DiagramPayload, Engine, Error, ParsedBlock, SiteConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Plot(PlotConfig),
    Force(Vec<ForceVector>),
}

/// What the block currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceView {
    /// Inline message replacing the drawing; when set, `legend` is empty.
    pub overlay: Option<String>,
    pub legend: Vec<LegendItem>,
    pub size: Size,
    /// Number of completed draws (each one a full clear-and-draw).
    pub draws: usize,
}

struct SurfaceState<B> {
    engine: Engine,
    backend: Option<B>,
    payload: Option<DiagramPayload>,
    content: Option<Result<Content, Error>>,
    size: Size,
    min_width: f64,
    default_height: f64,
    observing: bool,
    generation: u64,
    pending_redraw: Option<Deferred>,
    overlay: Option<String>,
    legend: Vec<LegendItem>,
    draws: usize,
}

impl<B: PlotBackend> SurfaceState<B> {
    fn clamp(&self, width: f64, height: f64) -> Size {
        let width = if width.is_finite() { width } else { 0.0 };
        let height = if height.is_finite() && height > 0.0 {
            height
        } else {
            self.default_height
        };
        Size::new(width.max(self.min_width), height)
    }

    fn redraw(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::trace!(generation, latest = self.generation, "dropping stale redraw");
            return;
        }
        self.pending_redraw = None;
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        backend.clear();
        let request = match &self.content {
            None => return,
            Some(Err(err)) => {
                self.overlay = Some(err.notice());
                self.legend.clear();
                return;
            }
            Some(Ok(Content::Plot(config))) => DrawRequest::Plot {
                config: config.clone(),
                size: self.size,
            },
            Some(Ok(Content::Force(forces))) => DrawRequest::Force {
                forces: forces.clone(),
                size: self.size,
            },
        };

        match backend.draw(&request) {
            Ok(()) => {
                self.draws += 1;
                self.overlay = None;
                self.legend = match &request {
                    DrawRequest::Plot { config, .. } => legend(config),
                    DrawRequest::Force { forces, .. } => forces
                        .iter()
                        .map(|f| LegendItem {
                            color: f.color.clone(),
                            label: f.name.clone(),
                        })
                        .collect(),
                };
                tracing::debug!(
                    width = self.size.width,
                    height = self.size.height,
                    draws = self.draws,
                    "surface redrawn"
                );
            }
            Err(message) => {
                tracing::warn!(%message, "plot backend failed to draw");
                backend.clear();
                self.overlay = Some(fenceplot_core::error::MALFORMED_NOTICE.to_string());
                self.legend.clear();
            }
        }
    }
}

/// Owns one drawing region and keeps it in sync with the latest payload and measured size.
pub struct PlotRenderSurface<B: PlotBackend + 'static> {
    state: Rc<RefCell<SurfaceState<B>>>,
    scheduler: Scheduler,
}

impl<B: PlotBackend + 'static> PlotRenderSurface<B> {
    pub fn new(backend: B, scheduler: Scheduler, config: &SiteConfig) -> Self {
        let engine = Engine::new().with_site_config(config.clone());
        let min_width = config.surface_min_width();
        let size = Size::new(
            config.surface_default_width().max(min_width),
            config.surface_default_height(),
        );
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                default_height: config.surface_default_height(),
                engine,
                backend: Some(backend),
                payload: None,
                content: None,
                size,
                min_width,
                observing: true,
                generation: 0,
                pending_redraw: None,
                overlay: None,
                legend: Vec::new(),
                draws: 0,
            })),
            scheduler,
        }
    }

    /// Replaces the payload. Parsing happens now; the redraw is deferred. Re-sending the payload
    /// already shown is a no-op.
    pub fn set_payload(&self, kind: &str, text: &str) {
        let payload = DiagramPayload::new(kind, text);
        {
            let mut state = self.state.borrow_mut();
            if state.backend.is_none() {
                tracing::trace!(kind, "payload for a torn-down surface ignored");
                return;
            }
            if state.payload.as_ref() == Some(&payload) {
                return;
            }
            let content = match state.engine.parse_block_sync(&payload) {
                Ok(ParsedBlock::FunctionPlot(config)) => Ok(Content::Plot(config)),
                Ok(ParsedBlock::ForceDiagram(forces)) => Ok(Content::Force(forces)),
                Ok(ParsedBlock::Board { .. } | ParsedBlock::Code { .. }) => Err(
                    Error::malformed(kind, "not a plot kind; nothing to draw"),
                ),
                Err(err) => Err(err),
            };
            if let Err(err) = &content {
                tracing::warn!(error = %err, "plot payload rejected");
            }
            state.payload = Some(payload);
            state.content = Some(content);
        }
        self.schedule_redraw();
    }

    /// Size callback from the host's resize observer. Width is clamped to the configured
    /// minimum, a zero height falls back to the default. Safe to call after teardown.
    pub fn observe_resize(&self, width: f64, height: f64) {
        {
            let mut state = self.state.borrow_mut();
            if !state.observing {
                tracing::trace!(width, height, "resize after teardown ignored");
                return;
            }
            let size = state.clamp(width, height);
            if size == state.size {
                return;
            }
            state.size = size;
        }
        self.schedule_redraw();
    }

    fn schedule_redraw(&self) {
        let generation = {
            let mut state = self.state.borrow_mut();
            if let Some(pending) = state.pending_redraw.take() {
                pending.cancel();
            }
            state.generation += 1;
            state.generation
        };

        let weak: Weak<RefCell<SurfaceState<B>>> = Rc::downgrade(&self.state);
        let deferred = self.scheduler.defer(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.borrow_mut().redraw(generation);
        });
        self.state.borrow_mut().pending_redraw = Some(deferred);
    }

    /// Stops observing, cancels the pending redraw, then releases the backend. Idempotent.
    pub fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        state.observing = false;
        if let Some(pending) = state.pending_redraw.take() {
            pending.cancel();
        }
        state.generation += 1;
        if let Some(mut backend) = state.backend.take() {
            backend.release();
            tracing::debug!("surface torn down");
        }
        state.legend.clear();
    }

    pub fn is_alive(&self) -> bool {
        self.state.borrow().backend.is_some()
    }

    pub fn has_pending_redraw(&self) -> bool {
        self.state.borrow().pending_redraw.is_some()
    }

    pub fn view(&self) -> SurfaceView {
        let state = self.state.borrow();
        SurfaceView {
            overlay: state.overlay.clone(),
            legend: state.legend.clone(),
            size: state.size,
            draws: state.draws,
        }
    }

    /// The error behind the overlay, if the current payload was rejected.
    pub fn failure(&self) -> Option<Error> {
        match &self.state.borrow().content {
            Some(Err(err)) => Some(err.clone()),
            _ => None,
        }
    }

    /// Cross-hair tip text for a pointer position over a function plot.
    pub fn tip_at(&self, px: f64, py: f64) -> Option<String> {
        let state = self.state.borrow();
        if state.overlay.is_some() {
            return None;
        }
        match &state.content {
            Some(Ok(Content::Plot(config))) => tip_at(config, state.size, px, py),
            _ => None,
        }
    }

    /// Runs `f` against the backend while the surface is alive.
    pub fn with_backend<R>(&self, f: impl FnOnce(&B) -> R) -> Option<R> {
        self.state.borrow().backend.as_ref().map(f)
    }
}

impl<B: PlotBackend + 'static> Drop for PlotRenderSurface<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
