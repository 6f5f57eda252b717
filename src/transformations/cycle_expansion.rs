use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// In-point used when a layer has no usable `ip`
pub const DEFAULT_IN_POINT: f64 = 0.0;

/// Out-point used when a layer has no usable `op`
pub const DEFAULT_OUT_POINT: f64 = 900.0;

/// Upper bound on the number of cycle copies emitted for one layer; layers
/// needing more are left unexpanded
pub const MAX_CYCLES: usize = 10_000;

const LOOP_OUT: &str = "loopOut";

/// Counters returned by [`expand_tm_cycles`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleExpansion {
    /// Layers whose time-remap was replaced by literal keyframes
    pub expanded: usize,
    /// Layers with a cyclic time-remap expression that were left untouched
    pub skipped: usize,
}

/// Result of looking at a single layer
enum LayerOutcome {
    NotCyclic,
    Skipped(&'static str),
    Expanded { cycles: usize, keyframes: usize },
}

/// Expand cyclic `loopOut` time-remap expressions into literal keyframes
///
/// Visits every layer reachable from the top-level `layers` array and from the
/// `layers` array of every entry in `assets`. For each layer whose `tm.x`
/// expression is a cycling `loopOut`, the keyframe span in `tm.k` is repeated
/// until it covers the layer's `ip..op` range plus one extra cycle, and the
/// expression is removed.
///
/// Layers that don't carry the expression are not modified. Layers that carry
/// it but can't be expanded (fewer than two keyframes, a keyframe without a
/// numeric `t`, a non-positive cycle duration, more than [`MAX_CYCLES`]
/// copies needed to cover the layer) are skipped unchanged. This
/// function never fails.
///
/// # Arguments
/// * `doc` - The decoded animation document (modified in place)
///
/// # Returns
/// * `CycleExpansion` - How many layers were expanded and skipped
///
/// # Examples
/// ```
/// use lottie_prep::transformations::expand_tm_cycles;
/// use serde_json::json;
///
/// let mut doc = json!({
///     "layers": [{
///         "ip": 0, "op": 100,
///         "tm": {"x": "loopOut('cycle')", "k": [{"t": 0, "s": [0]}, {"t": 25, "s": [1]}]}
///     }]
/// });
/// let stats = expand_tm_cycles(&mut doc);
/// assert_eq!(stats.expanded, 1);
/// assert_eq!(doc["layers"][0]["tm"]["k"].as_array().unwrap().len(), 10);
/// ```
pub fn expand_tm_cycles(doc: &mut JsonValue) -> CycleExpansion {
    let mut stats = CycleExpansion::default();

    if let Some(layers) = doc.get_mut("layers").and_then(JsonValue::as_array_mut) {
        expand_layers(layers, &mut stats);
    }

    // Precomp layers are expanded independently of whoever references them
    if let Some(assets) = doc.get_mut("assets").and_then(JsonValue::as_array_mut) {
        for asset in assets.iter_mut() {
            if let Some(layers) = asset.get_mut("layers").and_then(JsonValue::as_array_mut) {
                expand_layers(layers, &mut stats);
            }
        }
    }

    stats
}

fn expand_layers(layers: &mut [JsonValue], stats: &mut CycleExpansion) {
    for layer in layers.iter_mut() {
        let name = layer
            .get("nm")
            .and_then(JsonValue::as_str)
            .unwrap_or("<unnamed>")
            .to_string();

        match expand_layer(layer) {
            LayerOutcome::NotCyclic => {}
            LayerOutcome::Skipped(reason) => {
                debug!(layer = %name, reason, "cyclic time-remap left unexpanded");
                stats.skipped += 1;
            }
            LayerOutcome::Expanded { cycles, keyframes } => {
                debug!(layer = %name, cycles, keyframes, "expanded cyclic time-remap");
                stats.expanded += 1;
            }
        }
    }
}

fn expand_layer(layer: &mut JsonValue) -> LayerOutcome {
    let Some(layer) = layer.as_object_mut() else {
        return LayerOutcome::NotCyclic;
    };

    let in_point = frame_or_default(layer.get("ip"), DEFAULT_IN_POINT);
    let out_point = frame_or_default(layer.get("op"), DEFAULT_OUT_POINT);

    let Some(tm) = layer.get_mut("tm").and_then(JsonValue::as_object_mut) else {
        return LayerOutcome::NotCyclic;
    };

    let cyclic = tm
        .get("x")
        .and_then(JsonValue::as_str)
        .is_some_and(is_cycle_expression);
    if !cyclic {
        return LayerOutcome::NotCyclic;
    }

    let Some(keyframes) = tm.get("k").and_then(JsonValue::as_array) else {
        return LayerOutcome::Skipped("keyframes are not a list");
    };
    if keyframes.len() < 2 {
        return LayerOutcome::Skipped("fewer than two keyframes");
    }

    let Some(times) = keyframes
        .iter()
        .map(|kf| kf.get("t").and_then(JsonValue::as_f64))
        .collect::<Option<Vec<f64>>>()
    else {
        return LayerOutcome::Skipped("keyframe without a numeric time");
    };

    let cycle_duration = times[times.len() - 1] - times[0];
    if cycle_duration <= 0.0 {
        return LayerOutcome::Skipped("non-positive cycle duration");
    }

    let Some(cycles) = cycle_count(out_point - in_point, cycle_duration) else {
        return LayerOutcome::Skipped("cycle count exceeds the expansion limit");
    };

    let mut expanded = Vec::with_capacity(cycles * keyframes.len());
    for cycle in 0..cycles {
        let offset = cycle as f64 * cycle_duration;
        for (keyframe, time) in keyframes.iter().zip(&times) {
            let mut copy = keyframe.clone();
            if cycle > 0 {
                if let Some(obj) = copy.as_object_mut() {
                    obj.insert("t".to_string(), frame_value(time + offset));
                }
            }
            expanded.push(copy);
        }
    }

    let count = expanded.len();
    tm.insert("k".to_string(), JsonValue::Array(expanded));
    tm.remove("x");

    LayerOutcome::Expanded {
        cycles,
        keyframes: count,
    }
}

/// Check whether an expression requests a cycling `loopOut`
///
/// Recognized forms are `loopOut()` (cycle is the default loop type),
/// `loopOut('cycle')`, `loopOut("cycle")`, `loopOut(type = "cycle")` and the
/// same variants of `loopOutDuration`. Extra arguments after the loop type are
/// allowed. `pingpong`, `offset` and `continue` loops don't match.
///
/// # Examples
/// ```
/// use lottie_prep::transformations::cycle_expansion::is_cycle_expression;
///
/// assert!(is_cycle_expression("loopOut('cycle')"));
/// assert!(is_cycle_expression("loopOut()"));
/// assert!(!is_cycle_expression("loopOut('pingpong')"));
/// ```
pub fn is_cycle_expression(expression: &str) -> bool {
    expression.match_indices(LOOP_OUT).any(|(start, _)| {
        let rest = &expression[start + LOOP_OUT.len()..];
        let rest = rest.strip_prefix("Duration").unwrap_or(rest);

        let Some(args) = rest.trim_start().strip_prefix('(') else {
            return false;
        };
        let mut args = args.trim_start();
        if args.starts_with(')') {
            return true;
        }

        if let Some(named) = args.strip_prefix("type") {
            match named.trim_start().strip_prefix('=') {
                Some(value) => args = value.trim_start(),
                None => return false,
            }
        }

        let mut chars = args.chars();
        match chars.next() {
            Some(quote @ ('\'' | '"')) => chars
                .as_str()
                .strip_prefix("cycle")
                .is_some_and(|tail| tail.starts_with(quote)),
            _ => false,
        }
    })
}

/// Read a frame number, falling back when missing, zero or not numeric
fn frame_or_default(value: Option<&JsonValue>, default: f64) -> f64 {
    match value.and_then(JsonValue::as_f64) {
        Some(frame) if frame != 0.0 => frame,
        _ => default,
    }
}

/// Number of cycle copies needed to cover `duration` with one cycle of margin
///
/// `None` when covering the layer would take more than [`MAX_CYCLES`] copies;
/// a shorter expansion would stop playing partway through the layer.
fn cycle_count(duration: f64, cycle_duration: f64) -> Option<usize> {
    let wanted = (duration / cycle_duration).ceil() + 1.0;

    if wanted < 1.0 {
        warn!(duration, cycle_duration, "layer duration is negative, keeping a single cycle");
        Some(1)
    } else if wanted > MAX_CYCLES as f64 {
        warn!(
            duration,
            cycle_duration,
            max = MAX_CYCLES,
            "too many cycles to expand, leaving the expression in place"
        );
        None
    } else {
        Some(wanted as usize)
    }
}

/// Encode a frame number, keeping whole frames as JSON integers
fn frame_value(frame: f64) -> JsonValue {
    if frame.fract() == 0.0 && frame.abs() < i64::MAX as f64 {
        JsonValue::from(frame as i64)
    } else {
        JsonValue::from(frame)
    }
}
