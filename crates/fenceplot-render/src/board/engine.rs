use super::Viewport;
use fenceplot_core::SiteConfig;
use fenceplot_core::ids::MountId;
use serde::Serialize;

/// Pointer pan settings handed to the board library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanOptions {
    pub enabled: bool,
    pub need_shift: bool,
}

/// Wheel/pinch zoom settings handed to the board library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomOptions {
    pub factor_x: f64,
    pub factor_y: f64,
    pub wheel: bool,
    pub need_shift: bool,
}

/// Construction options for one board, serialized in the board library's own key names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOptions {
    pub axis: bool,
    pub show_copyright: bool,
    #[serde(rename = "keepaspectratio")]
    pub keep_aspect_ratio: bool,
    pub pan: PanOptions,
    pub zoom: ZoomOptions,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl BoardOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        let flag = |path: &str, default: bool| config.get_bool(path).unwrap_or(default);
        let factor = |path: &str| {
            config
                .get_f64(path)
                .filter(|v| *v > 0.0)
                .unwrap_or(1.25)
        };
        Self {
            axis: flag("board.axis", true),
            show_copyright: flag("board.showCopyright", false),
            keep_aspect_ratio: flag("board.keepAspectRatio", false),
            pan: PanOptions {
                enabled: flag("board.pan.enabled", true),
                need_shift: flag("board.pan.needShift", false),
            },
            zoom: ZoomOptions {
                factor_x: factor("board.zoom.factorX"),
                factor_y: factor("board.zoom.factorY"),
                wheel: flag("board.zoom.wheel", true),
                need_shift: flag("board.zoom.needShift", false),
            },
        }
    }
}

/// A live board instance owned by an external board library. The instance doubles as the
/// interpreter session for its script language.
pub trait Board {
    /// Runs `script` against this board. Errors carry the interpreter's raw message.
    fn parse_script(&mut self, script: &str) -> Result<(), String>;
    fn bounding_box(&self) -> Viewport;
    fn set_bounding_box(&mut self, viewport: Viewport);
}

/// Creates and frees boards bound to mount points.
pub trait BoardEngine {
    type Board: Board;

    /// Errors carry the library's message (for example a missing mount target).
    fn init_board(&mut self, mount_id: &MountId, options: &BoardOptions)
    -> Result<Self::Board, String>;

    /// Releases the board together with its interpreter session.
    fn free_board(&mut self, board: Self::Board);
}
