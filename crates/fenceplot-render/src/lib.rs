#![forbid(unsafe_code)]

//! Headless rendering for fenced diagram blocks.
//!
//! - [`surface::PlotRenderSurface`] keeps one drawing region in sync with its payload and size
//! - [`board::InteractiveBoardController`] owns the lifecycle of a script-driven board
//! - [`backend::SvgBackend`] draws plots and force diagrams as SVG without a browser
//!
//! Stateful components run on a single-threaded [`scheduler::EventLoop`].

pub mod backend;
pub mod board;
pub mod force;
pub mod legend;
pub mod model;
pub mod plot;
pub mod scheduler;
pub mod surface;
pub mod svg;
pub mod text;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] fenceplot_core::Error),
    #[error("series {series}: {message}")]
    Expression { series: usize, message: String },
    #[error("drawing backend error: {message}")]
    Backend { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
