use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Invalid animation JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Not a Lottie animation: {0}")]
    NotAnAnimation(String),

    #[error("Gzip decompression failed: {0}")]
    GzipError(String),

    #[error("No animation found in dotLottie archive")]
    NoAnimationInArchive,

    #[error("Animation {0:?} not found in dotLottie archive")]
    AnimationNotFound(String),

    #[error("Invalid dotLottie manifest: {0}")]
    InvalidManifest(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("ZIP library error: {0}")]
    ZipLibraryError(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, PrepError>;
