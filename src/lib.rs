//! Tartan Core - woven stripe patterns as tiled SVG
//!
//! # Pipeline
//! 1. Resolve: pattern name or inline document to raw JSON
//! 2. Validate: ordered rules, first failure wins
//! 3. Render: sett geometry, stripe groups, weave mask, tile grid
//! 4. Write: SVG master, optional PNG and manifest siblings

pub mod error;
pub mod pattern;
pub mod library;
pub mod validation;
pub mod render;
pub mod output;
pub mod raster;
pub mod hashing;
pub mod pipeline;

pub use error::{Result, TartanError};
pub use pattern::{PatternDefinition, Stripe, Palette};
pub use library::{PatternCatalog, PatternLibrary, PatternSource};
pub use validation::{Validator, ValidationRule, ValidationViolation};
pub use render::{render, RenderSize, RenderedPattern, Tiling};
pub use hashing::{canonical_json, compute_job_hash, sha256_hex};
pub use pipeline::{
    GenerationPipeline, GenerateRequest, GeneratedArtifact, GenerationManifest, OutputTarget,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
