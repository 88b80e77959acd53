// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire framing (§4.D): 4-byte big-endian length prefix + UTF-8 JSON
//! payload, capped at `MAX_MESSAGE_SIZE`. Grounded on the teacher's
//! documented `oj-wire` crate (its `wire.rs` itself wasn't present in this
//! retrieval, but its test suite fully pins down `encode`/`decode` and the
//! `read_message`/`write_message` framing it wraps).

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Matches `MAX_MESSAGE_SIZE` in the original's `rpc.py`.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
const HEADER_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed")]
    ConnectionClosed,
    #[error("timed out waiting for message")]
    Timeout,
    #[error("message of {0} bytes exceeds the {MAX_MESSAGE_SIZE} byte limit")]
    MessageTooLarge(usize),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a value to its bare JSON payload (no length prefix).
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Parse a bare JSON payload (no length prefix).
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `payload` prefixed with its 4-byte big-endian length.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), ProtocolError> {
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(payload.len()));
    }
    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed payload, stripping the prefix.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut header = [0u8; HEADER_SIZE];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => return Err(ProtocolError::Io(e)),
    }
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(len));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ProtocolError::ConnectionClosed
        } else {
            ProtocolError::Io(e)
        }
    })?;
    Ok(buf)
}

/// Read and decode one request, with an overall deadline.
pub async fn read_request<R, T>(reader: &mut R, timeout: Duration) -> Result<T, ProtocolError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let bytes = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&bytes)
}

/// Encode and write one response, with an overall deadline.
pub async fn write_response<W, T>(writer: &mut W, value: &T, timeout: Duration) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = encode(value)?;
    tokio::time::timeout(timeout, write_message(writer, &payload))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
