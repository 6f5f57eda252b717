use crate::error::{PrepError, Result};
use flate2::read::GzDecoder;
use std::io::Read;

/// Decompress a gzip-wrapped animation
///
/// Telegram `.tgs` stickers and `.json.gz` exports are plain Lottie JSON
/// inside a single gzip member.
///
/// # Arguments
/// * `bytes` - Gzip stream
///
/// # Returns
/// * `Ok(Vec<u8>)` - Decompressed JSON bytes
/// * `Err(PrepError)` - If the stream is corrupt or truncated
///
/// # Examples
/// ```no_run
/// use lottie_prep::parser::decompress_gzip;
///
/// let sticker = std::fs::read("sticker.tgs").unwrap();
/// let json = decompress_gzip(&sticker).unwrap();
/// ```
pub fn decompress_gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PrepError::GzipError(e.to_string()))?;
    Ok(decompressed)
}
