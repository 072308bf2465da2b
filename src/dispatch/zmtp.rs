//! Minimal ZMTP 3.0 codec.
//!
//! Throttling agents listen on a ZeroMQ reply socket, so requests are framed
//! the way a ZeroMQ request socket frames them. Only the NULL security
//! mechanism is supported.
//!
//! Layout:
//! - greeting: 10-byte signature, 2-byte version, 20-byte mechanism name,
//!   1-byte as-server flag, 31 bytes of filler (64 bytes total)
//! - frame: flags byte (`MORE`, `LONG`, `COMMAND`), then a 1-byte size or,
//!   with `LONG`, an 8-byte big-endian size, then the body
//! - `READY` command: 1-byte name length, `READY`, then properties encoded
//!   as 1-byte name length, name, 4-byte big-endian value length, value

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

pub const GREETING_LEN: usize = 64;

pub const FLAG_MORE: u8 = 0x01;
pub const FLAG_LONG: u8 = 0x02;
pub const FLAG_COMMAND: u8 = 0x04;

/// Largest frame body accepted from a peer.
pub const MAX_FRAME_SIZE: u64 = 16 * 1024 * 1024;

const MECHANISM_NULL: &[u8] = b"NULL";
const READY: &[u8] = b"READY";
const ERROR: &[u8] = b"ERROR";
const SOCKET_TYPE: &str = "Socket-Type";

#[derive(Debug, thiserror::Error)]
pub enum ZmtpError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Peer did not send a ZMTP signature")]
    BadSignature,

    #[error("Unsupported ZMTP version {0}")]
    UnsupportedVersion(u8),

    #[error("Unsupported security mechanism '{0}'")]
    UnsupportedMechanism(String),

    #[error("Frame of {0} bytes exceeds the size limit")]
    FrameTooLarge(u64),

    #[error("Malformed command frame")]
    MalformedCommand,

    #[error("Expected READY, got command '{0}'")]
    UnexpectedCommand(String),

    #[error("Peer rejected the handshake: {0}")]
    PeerError(String),

    #[error("Peer socket type '{0}' cannot serve requests")]
    IncompatiblePeer(String),
}

/// A single ZMTP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub more: bool,
    pub command: bool,
    pub body: Bytes,
}

impl Frame {
    pub fn message(body: impl Into<Bytes>, more: bool) -> Self {
        Self { more, command: false, body: body.into() }
    }

    pub fn command(body: impl Into<Bytes>) -> Self {
        Self { more: false, command: true, body: body.into() }
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        let size = self.body.len();
        let long = size > u8::MAX as usize;

        let mut flags = 0;
        if self.more {
            flags |= FLAG_MORE;
        }
        if long {
            flags |= FLAG_LONG;
        }
        if self.command {
            flags |= FLAG_COMMAND;
        }

        dst.reserve(9 + size);
        dst.put_u8(flags);
        if long {
            dst.put_u64(size as u64);
        } else {
            dst.put_u8(size as u8);
        }
        dst.put_slice(&self.body);
    }
}

/// Our 64-byte greeting.
pub fn greeting(as_server: bool) -> [u8; GREETING_LEN] {
    let mut buf = [0u8; GREETING_LEN];
    buf[0] = 0xFF;
    buf[8] = 0x01;
    buf[9] = 0x7F;
    buf[10] = 3;
    buf[11] = 0;
    buf[12..12 + MECHANISM_NULL.len()].copy_from_slice(MECHANISM_NULL);
    buf[32] = as_server as u8;
    buf
}

/// Validate a peer greeting.
pub fn check_greeting(greeting: &[u8; GREETING_LEN]) -> Result<(), ZmtpError> {
    if greeting[0] != 0xFF || greeting[9] & 0x01 != 0x01 {
        return Err(ZmtpError::BadSignature);
    }
    if greeting[10] < 3 {
        return Err(ZmtpError::UnsupportedVersion(greeting[10]));
    }

    let mechanism = &greeting[12..32];
    let name_len = mechanism.iter().position(|b| *b == 0).unwrap_or(mechanism.len());
    if &mechanism[..name_len] != MECHANISM_NULL {
        return Err(ZmtpError::UnsupportedMechanism(
            String::from_utf8_lossy(&mechanism[..name_len]).into_owned(),
        ));
    }
    Ok(())
}

/// Build a `READY` command announcing `socket_type`.
pub fn ready_command(socket_type: &str) -> Frame {
    let mut body = BytesMut::new();
    body.put_u8(READY.len() as u8);
    body.put_slice(READY);
    body.put_u8(SOCKET_TYPE.len() as u8);
    body.put_slice(SOCKET_TYPE.as_bytes());
    body.put_u32(socket_type.len() as u32);
    body.put_slice(socket_type.as_bytes());
    Frame::command(body.freeze())
}

/// Split a command body into its name and payload.
fn split_command(mut body: Bytes) -> Result<(Bytes, Bytes), ZmtpError> {
    if !body.has_remaining() {
        return Err(ZmtpError::MalformedCommand);
    }
    let name_len = body.get_u8() as usize;
    if body.remaining() < name_len {
        return Err(ZmtpError::MalformedCommand);
    }
    let name = body.split_to(name_len);
    Ok((name, body))
}

/// Parse `READY` metadata into name/value pairs.
pub fn parse_ready(body: Bytes) -> Result<Vec<(String, Bytes)>, ZmtpError> {
    let (name, mut properties) = split_command(body)?;
    if name.as_ref() == ERROR {
        let reason = if properties.has_remaining() {
            let len = properties.get_u8() as usize;
            String::from_utf8_lossy(&properties[..len.min(properties.len())]).into_owned()
        } else {
            String::new()
        };
        return Err(ZmtpError::PeerError(reason));
    }
    if name.as_ref() != READY {
        return Err(ZmtpError::UnexpectedCommand(String::from_utf8_lossy(&name).into_owned()));
    }

    let mut result = Vec::new();
    while properties.has_remaining() {
        let name_len = properties.get_u8() as usize;
        if properties.remaining() < name_len + 4 {
            return Err(ZmtpError::MalformedCommand);
        }
        let name = properties.split_to(name_len);
        let value_len = properties.get_u32() as usize;
        if properties.remaining() < value_len {
            return Err(ZmtpError::MalformedCommand);
        }
        let value = properties.split_to(value_len);
        result.push((String::from_utf8_lossy(&name).into_owned(), value));
    }
    Ok(result)
}

/// Read one frame.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Frame, ZmtpError> {
    let mut flags = [0u8; 1];
    reader.read_exact(&mut flags)?;
    let flags = flags[0];

    let size = if flags & FLAG_LONG != 0 {
        let mut size = [0u8; 8];
        reader.read_exact(&mut size)?;
        u64::from_be_bytes(size)
    } else {
        let mut size = [0u8; 1];
        reader.read_exact(&mut size)?;
        size[0] as u64
    };
    if size > MAX_FRAME_SIZE {
        return Err(ZmtpError::FrameTooLarge(size));
    }

    let mut body = vec![0u8; size as usize];
    reader.read_exact(&mut body)?;

    Ok(Frame {
        more: flags & FLAG_MORE != 0,
        command: flags & FLAG_COMMAND != 0,
        body: Bytes::from(body),
    })
}

/// Write a multipart message, setting `MORE` on all but the last part.
pub fn write_message<W: Write>(writer: &mut W, parts: &[&[u8]]) -> Result<(), ZmtpError> {
    let mut buf = BytesMut::new();
    for (i, part) in parts.iter().enumerate() {
        let more = i + 1 < parts.len();
        Frame::message(Bytes::copy_from_slice(part), more).encode(&mut buf);
    }
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete multipart message, ignoring interleaved commands.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Vec<Bytes>, ZmtpError> {
    let mut parts = Vec::new();
    loop {
        let frame = read_frame(reader)?;
        if frame.command {
            debug!("Ignoring command frame of {} bytes", frame.body.len());
            continue;
        }
        let more = frame.more;
        parts.push(frame.body);
        if !more {
            return Ok(parts);
        }
    }
}

/// Exchange greetings and `READY` commands. Returns the peer socket type.
pub fn handshake<S: Read + Write>(stream: &mut S, socket_type: &str, as_server: bool) -> Result<String, ZmtpError> {
    stream.write_all(&greeting(as_server))?;
    stream.flush()?;

    let mut peer_greeting = [0u8; GREETING_LEN];
    stream.read_exact(&mut peer_greeting)?;
    check_greeting(&peer_greeting)?;

    let mut buf = BytesMut::new();
    ready_command(socket_type).encode(&mut buf);
    stream.write_all(&buf)?;
    stream.flush()?;

    let frame = read_frame(stream)?;
    if !frame.command {
        return Err(ZmtpError::MalformedCommand);
    }
    let properties = parse_ready(frame.body)?;
    let peer_type = properties
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(SOCKET_TYPE))
        .map(|(_, value)| String::from_utf8_lossy(&value).into_owned())
        .unwrap_or_default();

    debug!("ZMTP handshake complete, peer socket type '{}'", peer_type);
    Ok(peer_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_greeting_layout() {
        let g = greeting(false);
        assert_eq!(g.len(), 64);
        assert_eq!(g[0], 0xFF);
        assert_eq!(g[9], 0x7F);
        assert_eq!(&g[10..12], &[3, 0]);
        assert_eq!(&g[12..16], b"NULL");
        assert!(g[16..32].iter().all(|b| *b == 0));
        assert_eq!(g[32], 0);
        assert!(check_greeting(&g).is_ok());
    }

    #[test]
    fn test_greeting_rejects_other_mechanism() {
        let mut g = greeting(true);
        g[12..17].copy_from_slice(b"PLAIN");
        assert!(matches!(check_greeting(&g), Err(ZmtpError::UnsupportedMechanism(m)) if m == "PLAIN"));
    }

    #[test]
    fn test_short_and_long_frames() {
        let mut buf = BytesMut::new();
        Frame::message(&b"reset"[..], true).encode(&mut buf);
        assert_eq!(&buf[..], &[FLAG_MORE, 5, b'r', b'e', b's', b'e', b't']);

        let big = vec![7u8; 300];
        let mut buf = BytesMut::new();
        Frame::message(big.clone(), false).encode(&mut buf);
        assert_eq!(buf[0], FLAG_LONG);
        assert_eq!(&buf[1..9], &300u64.to_be_bytes());

        let frame = read_frame(&mut Cursor::new(buf.to_vec())).unwrap();
        assert!(!frame.more);
        assert_eq!(frame.body.len(), 300);
    }

    #[test]
    fn test_ready_round_trip() {
        let frame = ready_command("REQ");
        assert!(frame.command);
        let properties = parse_ready(frame.body).unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].0, "Socket-Type");
        assert_eq!(properties[0].1.as_ref(), b"REQ");
    }

    #[test]
    fn test_read_message_skips_commands() {
        let mut buf = BytesMut::new();
        Frame::message(Bytes::new(), true).encode(&mut buf);
        Frame::command(&b"\x04PING\x00\x00"[..]).encode(&mut buf);
        Frame::message(&b"ok"[..], false).encode(&mut buf);

        let parts = read_message(&mut Cursor::new(buf.to_vec())).unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].is_empty());
        assert_eq!(parts[1].as_ref(), b"ok");
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut raw = vec![FLAG_LONG];
        raw.extend_from_slice(&(MAX_FRAME_SIZE + 1).to_be_bytes());
        assert!(matches!(
            read_frame(&mut Cursor::new(raw)),
            Err(ZmtpError::FrameTooLarge(_))
        ));
    }
}
