//! Blocking TCP transport to throttling agents.

use std::net::TcpStream;

use log::debug;

use super::zmtp::{self, ZmtpError};
use super::{DispatchError, Transport};
use crate::topology::Endpoint;

/// Socket types a request socket can talk to.
const COMPATIBLE_PEERS: [&str; 2] = ["REP", "ROUTER"];

/// Opens one connection per request to `tcp://<destination>:<port>` and
/// blocks until the reply arrives. There is no timeout.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    port: u16,
}

impl TcpTransport {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    fn request(&self, stream: &mut TcpStream, body: &str) -> Result<String, ZmtpError> {
        let peer_type = zmtp::handshake(stream, "REQ", false)?;
        if !COMPATIBLE_PEERS.iter().any(|t| peer_type.eq_ignore_ascii_case(t)) {
            return Err(ZmtpError::IncompatiblePeer(peer_type));
        }

        // Request sockets prefix every message with an empty delimiter
        let delimiter: &[u8] = &[];
        zmtp::write_message(stream, &[delimiter, body.as_bytes()])?;

        let mut parts = zmtp::read_message(stream)?;
        if parts.first().is_some_and(|p| p.is_empty()) {
            parts.remove(0);
        }
        let reply: Vec<u8> = parts.concat();
        Ok(String::from_utf8_lossy(&reply).into_owned())
    }
}

impl Transport for TcpTransport {
    fn exchange(&mut self, destination: &Endpoint, request: &str) -> Result<String, DispatchError> {
        let address = format!("{}:{}", destination, self.port);
        debug!("Connecting to tcp://{}", address);

        let mut stream = TcpStream::connect((destination.as_str(), self.port)).map_err(|source| {
            DispatchError::Connect {
                address: address.clone(),
                source,
            }
        })?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY for {}: {}", address, e);
        }

        self.request(&mut stream, request)
            .map_err(|source| DispatchError::Protocol { address, source })
    }
}
