//! PNG export - hands the SVG master to resvg

use crate::error::{Result, TartanError};
use crate::render::Tiling;

/// Whole-pixel canvas for a tiling, rounded up.
pub fn pixel_size(tiling: &Tiling) -> (u32, u32) {
    (tiling.width.ceil() as u32, tiling.height.ceil() as u32)
}

#[cfg(feature = "png")]
pub fn rasterize_png(svg: &str, tiling: &Tiling) -> Result<Vec<u8>> {
    use resvg::{tiny_skia, usvg};

    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| TartanError::Raster(e.to_string()))?;

    let (width, height) = pixel_size(tiling);
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TartanError::Raster(format!("cannot allocate {width}x{height} canvas")))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| TartanError::Raster(e.to_string()))
}

#[cfg(not(feature = "png"))]
pub fn rasterize_png(_svg: &str, _tiling: &Tiling) -> Result<Vec<u8>> {
    Err(TartanError::RasterUnavailable)
}
