//! Image inspection error types.

use std::io;
use thiserror::Error;

/// Why an image could not be measured.
///
/// [`ImageInspector::measure`](super::ImageInspector::measure) turns every
/// variant into unknown dimensions; only
/// [`try_measure_src`](super::ImageInspector::try_measure_src) exposes them.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("IO error while reading image data")]
    Io(#[from] io::Error),

    #[error("failed to create scratch file for remote image")]
    TempFile(#[source] io::Error),

    #[error("failed to fetch `{uri}`: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("`{uri}` answered with HTTP status {status}")]
    Status { uri: String, status: u16 },

    #[error("`{uri}` returned no data")]
    Empty { uri: String },

    #[error("cannot resolve `{0}` to a local file or http(s) URL")]
    UnsupportedUri(String),

    #[error("failed to decode image header")]
    Decode(#[from] image::ImageError),
}
