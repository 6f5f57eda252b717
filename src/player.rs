use crate::types::Renderer;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// End frame used when the document has no usable out-point
pub const FALLBACK_END_FRAME: f64 = 900.0;

/// Playback settings for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOptions {
    pub renderer: Renderer,
    pub loop_playback: bool,
    pub autoplay: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            renderer: Renderer::Svg,
            loop_playback: true,
            autoplay: true,
        }
    }
}

/// Parameter object for the renderer's `loadAnimation` call
///
/// Serializes to the camelCase field names the renderer expects. The mount
/// container is added by the page itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    pub renderer: Renderer,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub autoplay: bool,
    pub initial_segment: [f64; 2],
    pub animation_data: JsonValue,
}

impl PlayerConfig {
    /// Wrap a prepared document, deriving the initial segment from its frame range
    pub fn new(animation_data: JsonValue, options: &PlayerOptions) -> Self {
        Self {
            renderer: options.renderer,
            loop_playback: options.loop_playback,
            autoplay: options.autoplay,
            initial_segment: play_range(&animation_data),
            animation_data,
        }
    }
}

/// Frame range `[start, end]` to play a document over
///
/// Start is the document's `ip` (0 when missing). End is its `op` when that
/// is a number past the start, otherwise [`FALLBACK_END_FRAME`].
///
/// # Examples
/// ```
/// use lottie_prep::player::play_range;
/// use serde_json::json;
///
/// assert_eq!(play_range(&json!({"ip": 0, "op": 120})), [0.0, 120.0]);
/// assert_eq!(play_range(&json!({"layers": []})), [0.0, 900.0]);
/// ```
pub fn play_range(doc: &JsonValue) -> [f64; 2] {
    let start = doc.get("ip").and_then(JsonValue::as_f64).unwrap_or(0.0);
    let end = doc
        .get("op")
        .and_then(JsonValue::as_f64)
        .filter(|op| *op > start)
        .unwrap_or(FALLBACK_END_FRAME);
    [start, end]
}
