use clap::ValueEnum;
use serde::Serialize;

/// Container format of an input file, detected from its magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    /// Bare Lottie JSON document
    Json,
    /// Gzip-wrapped Lottie JSON (Telegram `.tgs`, `.json.gz`)
    Gzip,
    /// dotLottie ZIP archive (`.lottie`)
    DotLottie,
}

/// Which expressions are removed before the document reaches the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExpressionMode {
    /// Expand cyclic `tm` loops only; other expressions stay live
    CycleOnly,
    /// Expand cyclic `tm` loops, then strip every remaining expression
    #[default]
    StripAll,
}

/// Renderer backend requested from the playback library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    #[default]
    Svg,
    Canvas,
}

/// Options controlling decoding and transformation of one animation
#[derive(Debug, Clone)]
pub struct PrepOptions {
    pub mode: ExpressionMode,
    /// dotLottie animation id to select (first one when `None`)
    pub animation_id: Option<String>,
    /// Embed dotLottie images as base64 data URIs
    pub inline_images: bool,
}

impl Default for PrepOptions {
    fn default() -> Self {
        Self {
            mode: ExpressionMode::default(),
            animation_id: None,
            inline_images: true,
        }
    }
}

/// Counters collected while preparing a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepReport {
    /// Layers whose cyclic time-remap was expanded into keyframes
    pub expanded_layers: usize,
    /// Layers carrying a cyclic time-remap that could not be expanded
    pub skipped_layers: usize,
    /// Expression fields removed by the strip pass
    pub stripped_expressions: usize,
}
