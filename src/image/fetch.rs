//! Bounded remote image download.
//!
//! Remote images are sized from their first few kilobytes only:
//!
//! 1. Ask the server for a byte range (`Range: bytes=0-{limit-1}`)
//! 2. Stop reading at `limit` bytes even if the server ignores the range
//! 3. Spool the bytes into a scratch file that is removed on drop
//! 4. Decode the image header from the scratch file
//!
//! The scratch file lives in a [`NamedTempFile`], so it is deleted on every
//! exit path, including fetch and decode errors.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;
use url::Url;

use super::{ImageDimensions, InspectError, decode};
use crate::config::ImageOptions;
use crate::debug;

/// Read buffer size while spooling a download.
const CHUNK_SIZE: usize = 8 * 1024;

/// Prefix of scratch file names.
const SCRATCH_PREFIX: &str = "ris";

/// Source of remote image bytes.
///
/// Implementations should honor `limit` where the transport allows it;
/// callers still cap the returned stream at `limit` bytes.
pub trait Fetch: Send + Sync {
    fn open(&self, uri: &Url, limit: u64) -> Result<Box<dyn Read + Send>, InspectError>;
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// Blocking HTTP(S) fetcher with timeouts and a redirect cap.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(options: &ImageOptions) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(options.connect_timeout))
            .timeout(Duration::from_secs(options.timeout))
            .redirects(options.max_redirects)
            .build();
        Self { agent }
    }
}

impl Fetch for HttpFetcher {
    fn open(&self, uri: &Url, limit: u64) -> Result<Box<dyn Read + Send>, InspectError> {
        let mut request = self.agent.request_url("GET", uri);
        if limit > 0 {
            request = request.set("Range", &format!("bytes=0-{}", limit - 1));
        }

        match request.call() {
            Ok(response) => Ok(Box::new(response.into_reader())),
            Err(ureq::Error::Status(status, _)) => Err(InspectError::Status {
                uri: uri.to_string(),
                status,
            }),
            Err(err) => Err(InspectError::Fetch {
                uri: uri.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

// =============================================================================
// Bounded Download
// =============================================================================

/// Copy at most `limit` bytes of `uri` into `sink`.
///
/// A transport error after some bytes arrived ends the copy early and keeps
/// what was read; an error before the first byte is returned.
pub fn download_bounded<W: Write>(
    fetcher: &dyn Fetch,
    uri: &Url,
    limit: u64,
    sink: &mut W,
) -> Result<u64, InspectError> {
    let mut reader = fetcher.open(uri, limit)?.take(limit);
    let mut buf = [0u8; CHUNK_SIZE];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if copied > 0 => {
                debug!("image"; "download of {} cut short after {} bytes: {}", uri, copied, err);
                break;
            }
            Err(err) => {
                return Err(InspectError::Fetch {
                    uri: uri.to_string(),
                    reason: err.to_string(),
                });
            }
        };
        sink.write_all(&buf[..n])?;
        copied += n as u64;
    }

    sink.flush()?;
    Ok(copied)
}

/// Measure a remote image from its first `limit` bytes.
///
/// `scratch_dir` overrides the system temp directory for the scratch file.
pub fn remote_dimensions(
    fetcher: &dyn Fetch,
    uri: &Url,
    limit: u64,
    scratch_dir: Option<&Path>,
) -> Result<ImageDimensions, InspectError> {
    let mut scratch = scratch_file(scratch_dir)?;

    let copied = download_bounded(fetcher, uri, limit, scratch.as_file_mut())?;
    if copied == 0 {
        return Err(InspectError::Empty {
            uri: uri.to_string(),
        });
    }

    let file = scratch.as_file_mut();
    file.seek(SeekFrom::Start(0))?;
    decode::reader_dimensions(io::BufReader::new(file))
}

fn scratch_file(dir: Option<&Path>) -> Result<NamedTempFile, InspectError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX);
    let file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    };
    file.map_err(InspectError::TempFile)
}
