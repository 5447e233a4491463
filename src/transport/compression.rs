//! Transparent response decompression (`br`/`gzip`/`zstd`), generalized from the teacher's
//! `common::compression` module.

use async_compression::tokio::bufread::{BrotliDecoder, GzipDecoder, ZstdDecoder};
use bytes::Bytes;
use tokio::io::{AsyncReadExt, BufReader};

use crate::error::HttpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Identity,
    Brotli,
    Gzip,
    Zstd,
}

/// Map a `Content-Encoding` header value to the `Encoding` we know how to undo. Unknown or
/// absent values are treated as `Identity` — the caller passes the body through unchanged.
pub fn detect_encoding(content_encoding: Option<&str>) -> Encoding {
    match content_encoding.map(|s| s.trim().to_ascii_lowercase()) {
        Some(ref s) if s == "br" => Encoding::Brotli,
        Some(ref s) if s == "gzip" || s == "x-gzip" => Encoding::Gzip,
        Some(ref s) if s == "zstd" => Encoding::Zstd,
        _ => Encoding::Identity,
    }
}

/// Decompress `body` per `encoding`, buffering the whole result in memory. Request bodies
/// are always small (XML control documents or one item's payload), so this is simpler than
/// streaming the decode into the caller.
pub async fn decompress(encoding: Encoding, body: Bytes) -> Result<Bytes, HttpError> {
    let out = match encoding {
        Encoding::Identity => return Ok(body),
        Encoding::Brotli => {
            let mut decoder = BrotliDecoder::new(BufReader::new(body.as_ref()));
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .await
                .map_err(|e| HttpError::Transport(anyhow::anyhow!("brotli decode failed: {e}")))?;
            out
        }
        Encoding::Gzip => {
            let mut decoder = GzipDecoder::new(BufReader::new(body.as_ref()));
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .await
                .map_err(|e| HttpError::Transport(anyhow::anyhow!("gzip decode failed: {e}")))?;
            out
        }
        Encoding::Zstd => {
            let mut decoder = ZstdDecoder::new(BufReader::new(body.as_ref()));
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .await
                .map_err(|e| HttpError::Transport(anyhow::anyhow!("zstd decode failed: {e}")))?;
            out
        }
    };
    Ok(Bytes::from(out))
}
