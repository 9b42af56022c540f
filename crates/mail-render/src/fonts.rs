//! Font loading for chart text.
//!
//! The bitmap backend draws text with a font registered at runtime. When no
//! font file can be found the charts are drawn without text.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};
use tracing::{debug, warn};

/// Family name every chart text style refers to.
pub const FONT_FAMILY: &str = "sans-serif";

/// Well-known locations of a regular sans-serif face, tried in order.
const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Return the first existing font file: `explicit` if given and present,
/// otherwise the first of the well-known system locations.
pub fn discover_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!("Font {} not found, trying system fonts", path.display());
    }
    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Register a font for chart text once per process.
///
/// Returns `true` when text can be drawn. Later calls return the outcome of
/// the first one regardless of `explicit`.
pub fn ensure_font(explicit: Option<&Path>) -> bool {
    let registered = REGISTERED.get_or_init(|| {
        let Some(path) = discover_font(explicit) else {
            warn!("No usable font found; charts will be drawn without text");
            return None;
        };
        match load_and_register(&path) {
            Ok(()) => {
                debug!("Registered chart font {}", path.display());
                Some(path)
            }
            Err(reason) => {
                warn!(
                    "Could not use font {}: {}; charts will be drawn without text",
                    path.display(),
                    reason
                );
                None
            }
        }
    });
    registered.is_some()
}

fn load_and_register(path: &Path) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // Registered fonts must outlive every chart; this runs at most once.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| "invalid font data".to_string())
}
