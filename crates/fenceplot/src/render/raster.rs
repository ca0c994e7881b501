#![forbid(unsafe_code)]

use crate::render::{HeadlessError, HeadlessRenderer};
use fenceplot_core::DiagramPayload;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// Fill behind the drawing; `None` keeps the SVG's own background.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

/// PNG for a diagram block; broken blocks rasterize their notice. `None` for code and board
/// blocks.
pub fn render_png_sync(
    renderer: &HeadlessRenderer,
    payload: &DiagramPayload,
    raster: &RasterOptions,
) -> Result<Option<Vec<u8>>> {
    let block = renderer.render_block_sync(payload);
    let Some(svg) = block.svg() else {
        return Ok(None);
    };
    Ok(Some(svg_to_png(svg, raster)?))
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    // Keep output stable-ish across environments while still using system fonts.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Every drawing we emit has a `0 0 w h` viewBox, so the tree size is the canvas.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(color) = background.and_then(parse_tiny_skia_color) {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    let channels: Vec<u8> = match bytes.len() {
        3 | 4 => bytes.iter().map(|b| hex1(*b)).collect::<Option<_>>()?,
        6 | 8 => bytes.chunks(2).map(hex2).collect::<Option<_>>()?,
        _ => return None,
    };
    let alpha = channels.get(3).copied().unwrap_or(255);
    Some(tiny_skia::Color::from_rgba8(
        channels[0],
        channels[1],
        channels[2],
        alpha,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn plot_block_rasterizes() {
        let renderer = HeadlessRenderer::new();
        let payload = DiagramPayload::new("plot-function", r#"{"fn":"sin(x)"}"#);
        let bytes = render_png_sync(&renderer, &payload, &RasterOptions::default())
            .unwrap()
            .unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn broken_block_rasterizes_its_notice() {
        let renderer = HeadlessRenderer::new();
        let payload = DiagramPayload::new("plot-function", "{");
        let bytes = render_png_sync(&renderer, &payload, &RasterOptions::default()).unwrap();
        assert!(bytes.is_some_and(|b| b.starts_with(PNG_SIGNATURE)));
    }

    #[test]
    fn code_blocks_have_no_raster() {
        let renderer = HeadlessRenderer::new();
        let payload = DiagramPayload::new("rust", "fn main() {}");
        assert_eq!(
            render_png_sync(&renderer, &payload, &RasterOptions::default()).unwrap(),
            None
        );
    }

    #[test]
    fn parses_hex_and_named_colors() {
        let c = parse_tiny_skia_color("#f00").unwrap();
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (1.0, 0.0, 0.0, 1.0));
        let c = parse_tiny_skia_color("#00000000").unwrap();
        assert_eq!(c.alpha(), 0.0);
        assert!(parse_tiny_skia_color("white").is_some());
        assert!(parse_tiny_skia_color("#12345").is_none());
        assert!(parse_tiny_skia_color("red").is_none());
    }
}
