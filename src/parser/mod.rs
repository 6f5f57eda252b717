pub mod compression;
pub mod dotlottie;
pub mod header;

// Re-export commonly used items
pub use compression::decompress_gzip;
pub use dotlottie::{extract_animation, list_animations};
pub use header::{detect_container, is_gzip_stream, is_zip_container};

use crate::error::{PrepError, Result};
use crate::types::{ContainerType, PrepOptions};
use serde_json::Value as JsonValue;
use tracing::debug;

/// UTF-8 byte order mark some exporters prepend to JSON files
const UTF8_BOM: &[u8; 3] = &[0xef, 0xbb, 0xbf];

/// Decode an animation file into a JSON document
///
/// Accepts bare Lottie JSON, gzip-wrapped JSON (`.tgs`) and dotLottie
/// archives. The decoded root must be a JSON object with a `layers` array;
/// other JSON files (package manifests, settings) are rejected.
///
/// # Arguments
/// * `bytes` - Raw file bytes
/// * `options` - Selects the dotLottie animation and image inlining
///
/// # Returns
/// * `Ok(JsonValue)` - The animation document
/// * `Err(PrepError)` - If the container or JSON is invalid
///
/// # Examples
/// ```
/// use lottie_prep::parser::decode_animation;
/// use lottie_prep::PrepOptions;
///
/// let doc = decode_animation(br#"{"v":"5.7.4","layers":[]}"#, &PrepOptions::default()).unwrap();
/// assert_eq!(doc["v"], "5.7.4");
/// ```
pub fn decode_animation(bytes: &[u8], options: &PrepOptions) -> Result<JsonValue> {
    let container = detect_container(bytes);
    debug!(?container, size = bytes.len(), "decoding animation");

    let doc = match container {
        ContainerType::Json => parse_json(bytes)?,
        ContainerType::Gzip => parse_json(&decompress_gzip(bytes)?)?,
        ContainerType::DotLottie => extract_animation(
            bytes,
            options.animation_id.as_deref(),
            options.inline_images,
        )?,
    };

    ensure_animation_root(&doc)?;

    Ok(doc)
}

/// Reject documents that can't be a Lottie composition
fn ensure_animation_root(doc: &JsonValue) -> Result<()> {
    if !doc.is_object() {
        return Err(PrepError::NotAnAnimation(format!(
            "expected a JSON object at the root, found {}",
            json_kind(doc)
        )));
    }

    if !doc.get("layers").is_some_and(JsonValue::is_array) {
        return Err(PrepError::NotAnAnimation(
            "no \"layers\" array at the root".to_string(),
        ));
    }

    Ok(())
}

fn parse_json(bytes: &[u8]) -> Result<JsonValue> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(serde_json::from_slice(bytes)?)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
