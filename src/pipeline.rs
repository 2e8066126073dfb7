//! Generation Pipeline - Single Entry Point
//!
//! resolve -> validate -> render -> write. Any stage failing aborts the run;
//! nothing is written until the markup (and PNG, if requested) exist.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::Result;
use crate::hashing::{compute_job_hash, sha256_hex};
use crate::library::{PatternLibrary, PatternSource};
use crate::output::{default_output, manifest_sibling, png_sibling, validate_output, write_file};
use crate::pattern::PatternDefinition;
use crate::raster::rasterize_png;
use crate::render::{render, RenderSize, RenderedPattern};
use crate::validation::Validator;
use crate::ENGINE_VERSION;

/// Where the SVG master goes.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    /// Explicit destination; `.svg` is appended when missing.
    Path(String),
    /// `<root>/output/<stem>[_<size>].svg`, named after the resolved geometry.
    Default { root: PathBuf, stem: String },
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub source: PatternSource,
    pub size: RenderSize,
    pub output: OutputTarget,
    pub png: bool,
    pub manifest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationManifest {
    pub pattern: String,
    pub engine_version: String,
    pub sett_size: f64,
    pub width: f64,
    pub height: f64,
    pub repeat_x: u32,
    pub repeat_y: u32,
    pub job_hash: String,
    pub svg_sha256: String,
    #[serde(default)]
    pub png_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub manifest: GenerationManifest,
    pub svg_path: PathBuf,
    pub png_path: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
}

/// The generation pipeline - every output goes through `generate`
pub struct GenerationPipeline {
    library: PatternLibrary,
    validator: Validator,
}

impl GenerationPipeline {
    pub fn new(library: PatternLibrary) -> Self {
        Self {
            library,
            validator: Validator::new(),
        }
    }

    /// Resolve and validate a pattern.
    pub fn load_pattern(&self, source: &PatternSource) -> Result<PatternDefinition> {
        let raw = self.library.resolve(source)?;
        let pattern = self.validator.validate(raw)?;
        debug!(pattern = %pattern.name, stripes = pattern.stripes.len(), "pattern validated");
        Ok(pattern)
    }

    /// Resolve, validate and render without touching the filesystem.
    pub fn render(
        &self,
        source: &PatternSource,
        size: RenderSize,
    ) -> Result<(PatternDefinition, RenderedPattern)> {
        let pattern = self.load_pattern(source)?;
        let rendered = render(&pattern, size)?;
        Ok((pattern, rendered))
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GeneratedArtifact> {
        let pattern = self.load_pattern(&request.source)?;
        let rendered = render(&pattern, request.size)?;
        let tiling = rendered.tiling;
        info!(
            tiles = tiling.tile_count(),
            "Generating {} tartan using {} sett at {}x{}",
            pattern.name, tiling.sett_size, tiling.width, tiling.height
        );

        let svg_path = match &request.output {
            OutputTarget::Path(output) => validate_output(output)?,
            OutputTarget::Default { root, stem } => {
                default_output(root, stem, request.size, &tiling)?
            }
        };

        let png = if request.png {
            Some(rasterize_png(&rendered.svg, &tiling)?)
        } else {
            None
        };

        let manifest = GenerationManifest {
            pattern: pattern.name.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            sett_size: tiling.sett_size,
            width: tiling.width,
            height: tiling.height,
            repeat_x: tiling.repeat_x,
            repeat_y: tiling.repeat_y,
            job_hash: compute_job_hash(&pattern, request.size, ENGINE_VERSION)?,
            svg_sha256: sha256_hex(rendered.svg.as_bytes()),
            png_sha256: png.as_deref().map(sha256_hex),
        };

        write_file(&svg_path, rendered.svg.as_bytes())?;

        let png_path = match png {
            Some(data) => {
                let path = png_sibling(&svg_path);
                write_file(&path, &data)?;
                Some(path)
            }
            None => None,
        };

        let manifest_path = if request.manifest {
            let path = manifest_sibling(&svg_path);
            write_file(&path, serde_json::to_string_pretty(&manifest)?.as_bytes())?;
            Some(path)
        } else {
            None
        };

        info!(
            "{} generated at {} ({}x{})",
            pattern.name,
            svg_path.display(),
            tiling.width,
            tiling.height
        );

        Ok(GeneratedArtifact {
            manifest,
            svg_path,
            png_path,
            manifest_path,
        })
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new(PatternLibrary::default())
    }
}
