//! Multipart message framing over a byte stream.
//!
//! A message is a `u32` frame count followed by each frame as a `u32` length
//! and its bytes, all integers little-endian.

use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest frame accepted from the far end.
pub const MAX_FRAME_LEN: usize = 256 * 1024 * 1024;

/// Largest number of frames accepted in one message.
pub const MAX_FRAMES: usize = 1 << 20;

/// Writes one multipart message and flushes the writer.
///
/// # Errors
///
/// Returns an error if writing fails or a frame exceeds [`MAX_FRAME_LEN`].
pub async fn write_message<W>(writer: &mut W, frames: &[Bytes]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut header = [0u8; 4];
    LittleEndian::write_u32(&mut header, to_u32(frames.len())?);
    writer.write_all(&header).await?;

    for frame in frames {
        if frame.len() > MAX_FRAME_LEN {
            return Err(oversized(frame.len()));
        }
        LittleEndian::write_u32(&mut header, to_u32(frame.len())?);
        writer.write_all(&header).await?;
        writer.write_all(frame).await?;
    }

    writer.flush().await
}

/// Reads one multipart message.
///
/// # Errors
///
/// Returns an error if the stream ends early or announces an oversized frame.
pub async fn read_message<R>(reader: &mut R) -> io::Result<Vec<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let count = read_len(reader).await?;
    if count > MAX_FRAMES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message announces {count} frames"),
        ));
    }

    let mut frames = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let len = read_len(reader).await?;
        if len > MAX_FRAME_LEN {
            return Err(oversized(len));
        }
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).await?;
        frames.push(Bytes::from(buf));
    }
    Ok(frames)
}

async fn read_len<R>(reader: &mut R) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    reader.read_exact(&mut header).await?;
    Ok(LittleEndian::read_u32(&header) as usize)
}

fn to_u32(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| oversized(len))
}

fn oversized(len: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("frame of {len} bytes exceeds limit of {MAX_FRAME_LEN}"),
    )
}
