//! # lottie-prep
//!
//! A library for preparing Lottie animations for web playback.
//!
//! Web renderers evaluate After Effects expressions poorly, and a time-remap
//! driven by `loopOut('cycle')` is the usual casualty: the animation freezes
//! after its first loop. This crate rewrites those time-remaps into literal
//! keyframes and, optionally, strips every other expression so the document
//! plays the same everywhere.
//!
//! ## Example
//!
//! ```no_run
//! use lottie_prep::{prepare, ExpressionMode, PrepOptions};
//!
//! let bytes = std::fs::read("hero.lottie").unwrap();
//! let options = PrepOptions {
//!     mode: ExpressionMode::StripAll,
//!     ..PrepOptions::default()
//! };
//!
//! let prepared = prepare(&bytes, &options).unwrap();
//! println!("Expanded {} layer(s)", prepared.report.expanded_layers);
//! println!("{}", serde_json::to_string(&prepared.document).unwrap());
//! ```

pub mod error;
pub mod parser;
pub mod player;
pub mod transformations;
pub mod types;

// Re-export commonly used items
pub use error::{PrepError, Result};
pub use player::{PlayerConfig, PlayerOptions};
pub use types::{ContainerType, ExpressionMode, PrepOptions, PrepReport, Renderer};

use serde_json::Value as JsonValue;

/// A decoded and transformed animation document
#[derive(Debug, Clone)]
pub struct Prepared {
    pub document: JsonValue,
    pub report: PrepReport,
}

/// Decode an animation file and run the transformation passes over it
///
/// # Arguments
/// * `bytes` - Raw file bytes (JSON, gzip or dotLottie)
/// * `options` - Decoding and transformation options
///
/// # Returns
/// * `Ok(Prepared)` - The prepared document with its transformation report
/// * `Err(PrepError)` - If the file can't be decoded
pub fn prepare(bytes: &[u8], options: &PrepOptions) -> Result<Prepared> {
    let mut document = parser::decode_animation(bytes, options)?;
    let report = transformations::apply_transformations(&mut document, options.mode);
    Ok(Prepared { document, report })
}
