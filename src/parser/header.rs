use crate::types::ContainerType;

/// ZIP magic signature (first two bytes), used by dotLottie archives
const ZIP_MAGIC: &[u8; 2] = b"PK";

/// Gzip magic signature (first two bytes), used by `.tgs` stickers
const GZIP_MAGIC: &[u8; 2] = &[0x1f, 0x8b];

/// Detect the container format of an animation file from its magic bytes
///
/// Anything that is neither a ZIP archive nor a gzip stream is treated as
/// bare JSON; the JSON decoder reports the error if it isn't.
///
/// # Examples
/// ```
/// use lottie_prep::parser::detect_container;
/// use lottie_prep::ContainerType;
///
/// assert_eq!(detect_container(b"PK\x03\x04"), ContainerType::DotLottie);
/// assert_eq!(detect_container(&[0x1f, 0x8b, 0x08]), ContainerType::Gzip);
/// assert_eq!(detect_container(b"{\"v\":\"5.7.4\"}"), ContainerType::Json);
/// ```
pub fn detect_container(bytes: &[u8]) -> ContainerType {
    if is_zip_container(bytes) {
        ContainerType::DotLottie
    } else if is_gzip_stream(bytes) {
        ContainerType::Gzip
    } else {
        ContainerType::Json
    }
}

/// Check if the file is a ZIP container
///
/// dotLottie (`.lottie`) files are ZIP archives holding a manifest, one or
/// more animations and their images.
///
/// # Examples
/// ```
/// use lottie_prep::parser::is_zip_container;
///
/// assert!(is_zip_container(b"PK\x03\x04..."));
/// assert!(!is_zip_container(b"{\"layers\": []}"));
/// ```
pub fn is_zip_container(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && &bytes[0..2] == ZIP_MAGIC
}

/// Check if the file is a gzip stream
pub fn is_gzip_stream(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && &bytes[0..2] == GZIP_MAGIC
}
