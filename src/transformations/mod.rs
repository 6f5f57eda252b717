/// Transformation passes applied to a decoded animation document
///
/// - `cycle_expansion`: Replace cyclic `loopOut` time-remap expressions with literal keyframes
/// - `expression_removal`: Remove every remaining expression string from the document
pub mod cycle_expansion;
pub mod expression_removal;

// Re-export commonly used functions
pub use cycle_expansion::{expand_tm_cycles, CycleExpansion};
pub use expression_removal::strip_expressions;

use crate::types::{ExpressionMode, PrepReport};
use serde_json::Value as JsonValue;
use tracing::info;

/// Run the transformation passes selected by `mode` over a document
///
/// Cycle expansion always runs first. With [`ExpressionMode::StripAll`] the
/// expression strip pass follows it, so no expression string is left for the
/// renderer to evaluate.
///
/// # Examples
/// ```
/// use lottie_prep::transformations::apply_transformations;
/// use lottie_prep::ExpressionMode;
/// use serde_json::json;
///
/// let mut doc = json!({"layers": [{"ks": {"r": {"a": 0, "k": 0, "x": "time * 90"}}}]});
///
/// let report = apply_transformations(&mut doc, ExpressionMode::CycleOnly);
/// assert_eq!(report.stripped_expressions, 0);
///
/// let report = apply_transformations(&mut doc, ExpressionMode::StripAll);
/// assert_eq!(report.stripped_expressions, 1);
/// ```
pub fn apply_transformations(doc: &mut JsonValue, mode: ExpressionMode) -> PrepReport {
    let expansion = expand_tm_cycles(doc);

    let stripped_expressions = match mode {
        ExpressionMode::CycleOnly => 0,
        ExpressionMode::StripAll => strip_expressions(doc),
    };

    let report = PrepReport {
        expanded_layers: expansion.expanded,
        skipped_layers: expansion.skipped,
        stripped_expressions,
    };

    info!(
        ?mode,
        expanded = report.expanded_layers,
        skipped = report.skipped_layers,
        stripped = report.stripped_expressions,
        "animation prepared"
    );

    report
}
