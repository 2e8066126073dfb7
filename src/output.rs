//! Output Paths - validation, `.svg` normalization and sibling files

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, TartanError};
use crate::render::{RenderSize, Tiling};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

const INVALID_PATH_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Validate a destination and force the `.svg` extension.
pub fn validate_output(output: &str) -> Result<PathBuf> {
    if output.trim().is_empty() {
        return Err(TartanError::InvalidOutputPath("Output path is required".to_string()));
    }

    if output.chars().any(|c| INVALID_PATH_CHARS.contains(&c) || c.is_ascii_control()) {
        return Err(TartanError::InvalidOutputPath(format!(
            "Output path contains invalid characters: {output}"
        )));
    }

    let path = Path::new(output);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(TartanError::InvalidOutputPath(format!(
                "Invalid output directory: {}",
                parent.display()
            )));
        }
    }

    if output.to_lowercase().ends_with(".svg") {
        Ok(path.to_path_buf())
    } else {
        Ok(PathBuf::from(format!("{output}.svg")))
    }
}

/// File stem used when no output path is given. Pixel sizes are named after
/// the resolved document, so an omitted axis shows its sett-sized fallback.
pub fn default_file_stem(pattern: &str, size: RenderSize, tiling: &Tiling) -> String {
    match size {
        RenderSize::Sett => pattern.to_string(),
        RenderSize::Square { repeat } => format!("{pattern}_{repeat}x{repeat}"),
        RenderSize::Pixels { .. } => format!("{pattern}_{}x{}", tiling.width, tiling.height),
    }
}

/// `output/<stem>.svg` under `root`, creating the directory.
pub fn default_output(
    root: &Path,
    pattern: &str,
    size: RenderSize,
    tiling: &Tiling,
) -> Result<PathBuf> {
    let dir = root.join(DEFAULT_OUTPUT_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("{}.svg", default_file_stem(pattern, size, tiling))))
}

pub fn png_sibling(svg_path: &Path) -> PathBuf {
    svg_path.with_extension("png")
}

pub fn manifest_sibling(svg_path: &Path) -> PathBuf {
    svg_path.with_extension("manifest.json")
}

pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;
    info!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}
