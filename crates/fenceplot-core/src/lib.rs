#![forbid(unsafe_code)]

//! Fenced diagram payloads (headless).
//!
//! Turns the `(language tag, body)` pair of a fenced code block into something a renderer can
//! draw:
//! - [`dispatch`] picks the renderer from the tag (total; unknown tags are plain code)
//! - [`plot::normalize`] maps both `plot-function` JSON shapes onto one [`plot::PlotConfig`]
//! - [`plot::assign`] fills missing colors and labels deterministically
//! - [`force::parse_forces`] validates `plot-force` payloads
//!
//! Nothing here keeps state between blocks; every result is derived from the block text.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod force;
pub mod ids;
pub mod payload;
pub mod plot;
pub mod utils;

pub use config::SiteConfig;
pub use dispatch::{Dispatcher, RenderTarget, dispatch};
pub use error::{Error, Result};
pub use payload::DiagramPayload;

use force::ForceVector;
use plot::PlotConfig;

/// Result of interpreting one block.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBlock {
    FunctionPlot(PlotConfig),
    ForceDiagram(Vec<ForceVector>),
    /// Board scripts are passed through untouched; the board library interprets them.
    Board { script: String },
    Code { text: String },
}

impl ParsedBlock {
    pub fn target(&self) -> RenderTarget {
        match self {
            Self::FunctionPlot(_) => RenderTarget::FunctionPlot,
            Self::ForceDiagram(_) => RenderTarget::ForceDiagram,
            Self::Board { .. } => RenderTarget::Board,
            Self::Code { .. } => RenderTarget::Code,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    dispatcher: Dispatcher,
    site_config: SiteConfig,
}

impl Default for Engine {
    fn default() -> Self {
        let site_config = SiteConfig::default();
        Self {
            dispatcher: Dispatcher::from_config(&site_config),
            site_config,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site_config(mut self, site_config: SiteConfig) -> Self {
        // Merge overrides onto the defaults so unrelated settings keep working.
        self.site_config.deep_merge(site_config.as_value());
        self.dispatcher = Dispatcher::from_config(&self.site_config);
        self
    }

    pub fn site_config(&self) -> &SiteConfig {
        &self.site_config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatch(&self, payload: &DiagramPayload) -> RenderTarget {
        self.dispatcher.dispatch(payload.kind(), payload.text())
    }

    /// Dispatches and interprets a block.
    ///
    /// Only diagram kinds can fail (with [`Error::MalformedPayload`]); code blocks and board
    /// scripts always succeed here.
    pub fn parse_block_sync(&self, payload: &DiagramPayload) -> Result<ParsedBlock> {
        let target = self.dispatch(payload);
        tracing::debug!(kind = payload.kind(), ?target, "dispatching fenced block");
        match target {
            RenderTarget::FunctionPlot => {
                let value: serde_json::Value = serde_json::from_str(payload.text())
                    .map_err(|e| Error::malformed(payload.kind(), e.to_string()))?;
                let config =
                    plot::normalize_value(&value, self.site_config.default_domain())?;
                Ok(ParsedBlock::FunctionPlot(config))
            }
            RenderTarget::ForceDiagram => {
                Ok(ParsedBlock::ForceDiagram(force::parse_forces(payload.text())?))
            }
            RenderTarget::Board => Ok(ParsedBlock::Board {
                script: payload.text().to_string(),
            }),
            RenderTarget::Code => Ok(ParsedBlock::Code {
                text: payload.text().to_string(),
            }),
        }
    }

    pub async fn parse_block(&self, payload: &DiagramPayload) -> Result<ParsedBlock> {
        self.parse_block_sync(payload)
    }
}

#[cfg(test)]
mod tests;
