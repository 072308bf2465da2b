//! Request dispatch module.
//!
//! The dispatcher sends commands one at a time and waits for each reply
//! before issuing the next. Replies are logged and returned unparsed; any
//! reply counts as success. A transport failure aborts the remaining batch.

pub mod tcp;
pub mod zmtp;

use std::io;

use log::info;

use crate::command::Command;
use crate::topology::Endpoint;

pub use tcp::TcpTransport;
pub use zmtp::ZmtpError;

/// Failure of a single request/reply exchange.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to connect to tcp://{address}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Request to tcp://{address} failed")]
    Protocol {
        address: String,
        #[source]
        source: ZmtpError,
    },
}

/// A synchronous request/reply channel to throttling agents.
pub trait Transport {
    /// Send `request` to `destination` and block for exactly one reply.
    fn exchange(&mut self, destination: &Endpoint, request: &str) -> Result<String, DispatchError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn exchange(&mut self, destination: &Endpoint, request: &str) -> Result<String, DispatchError> {
        (**self).exchange(destination, request)
    }
}

/// Logs requests instead of sending them.
#[derive(Debug, Clone)]
pub struct DryRunTransport {
    port: u16,
}

impl DryRunTransport {
    pub const REPLY: &'static str = "dry-run";

    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Transport for DryRunTransport {
    fn exchange(&mut self, destination: &Endpoint, request: &str) -> Result<String, DispatchError> {
        info!("[dry-run] tcp://{}:{} <- {:?}", destination, self.port, request);
        Ok(Self::REPLY.to_string())
    }
}

/// Sends commands over a transport, strictly in order.
pub struct Dispatcher<T: Transport> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send one command and return the raw reply.
    pub fn send(&mut self, command: &Command) -> Result<String, DispatchError> {
        let destination = command.destination();
        info!("Going to send {} request: {}", command.kind(), command);

        let reply = self.transport.exchange(destination, &command.wire_text())?;

        info!("Received reply from {}: {}", destination, reply);
        Ok(reply)
    }

    /// Send commands in order, stopping at the first failure.
    pub fn send_all(&mut self, commands: &[Command]) -> Result<Vec<String>, DispatchError> {
        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            replies.push(self.send(command)?);
        }
        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records requests and fails for one chosen destination.
    #[derive(Default)]
    struct Recorder {
        sent: Vec<(String, String)>,
        unreachable: Option<String>,
    }

    impl Transport for Recorder {
        fn exchange(&mut self, destination: &Endpoint, request: &str) -> Result<String, DispatchError> {
            if self.unreachable.as_deref() == Some(destination.as_str()) {
                return Err(DispatchError::Connect {
                    address: format!("{}:1", destination),
                    source: io::Error::from(io::ErrorKind::ConnectionRefused),
                });
            }
            self.sent.push((destination.to_string(), request.to_string()));
            Ok(format!("ok {}", self.sent.len()))
        }
    }

    fn reset(host: &str) -> Command {
        Command::Reset { destination: host.into() }
    }

    #[test]
    fn test_send_all_in_order() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let replies = dispatcher.send_all(&[reset("a"), reset("b")]).unwrap();
        assert_eq!(replies, vec!["ok 1", "ok 2"]);

        let sent = &dispatcher.transport().sent;
        assert_eq!(sent[0], ("a".to_string(), "reset".to_string()));
        assert_eq!(sent[1], ("b".to_string(), "reset".to_string()));
    }

    #[test]
    fn test_failure_aborts_batch() {
        let recorder = Recorder {
            unreachable: Some("b".to_string()),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(recorder);
        let err = dispatcher.send_all(&[reset("a"), reset("b"), reset("c")]).unwrap_err();
        assert!(matches!(err, DispatchError::Connect { .. }));

        let sent = dispatcher.into_transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a");
    }

    #[test]
    fn test_dry_run_reply() {
        let mut dispatcher = Dispatcher::new(DryRunTransport::new(5555));
        let reply = dispatcher.send(&reset("10.0.0.1")).unwrap();
        assert_eq!(reply, DryRunTransport::REPLY);
    }
}
