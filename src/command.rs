//! Throttle commands and their wire encoding.
//!
//! Each command is addressed to one agent and encodes to exactly one
//! request:
//!
//! | Command        | Request text        |
//! |----------------|---------------------|
//! | `SetLink`      | `set <target>:<bw>` |
//! | `SetInterface` | `set-all <bw>`      |
//! | `Reset`        | `reset`             |
//!
//! An agent only shapes traffic between itself and the named peer, so a
//! link throttle always becomes two `SetLink` commands, one per endpoint.

use std::fmt;

use crate::topology::{BandwidthTier, Endpoint, Link};

/// Errors in a directly supplied command argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("'{input}' needs at least {expected} ':'-separated fields")]
    MissingFields { input: String, expected: usize },

    #[error("'{0}' contains an empty field")]
    EmptyField(String),
}

/// One request to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Limit traffic between `destination` and `throttle_target`.
    SetLink {
        destination: Endpoint,
        throttle_target: Endpoint,
        bandwidth: BandwidthTier,
    },
    /// Limit the default interface of `destination`.
    SetInterface {
        destination: Endpoint,
        bandwidth: BandwidthTier,
    },
    /// Remove all limits on `destination`.
    Reset { destination: Endpoint },
}

impl Command {
    /// The agent this command is sent to.
    pub fn destination(&self) -> &Endpoint {
        match self {
            Self::SetLink { destination, .. }
            | Self::SetInterface { destination, .. }
            | Self::Reset { destination } => destination,
        }
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetLink { .. } => "throttle",
            Self::SetInterface { .. } => "throttle interface",
            Self::Reset { .. } => "reset",
        }
    }

    /// Request body sent to the agent.
    pub fn wire_text(&self) -> String {
        match self {
            Self::SetLink { throttle_target, bandwidth, .. } => {
                format!("set {}:{}", throttle_target, bandwidth)
            }
            Self::SetInterface { bandwidth, .. } => format!("set-all {}", bandwidth),
            Self::Reset { .. } => "reset".to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> '{}'", self.destination(), self.wire_text())
    }
}

/// The two commands needed to throttle a link: each endpoint is told to
/// limit traffic toward the other.
pub fn link_commands(link: &Link) -> [Command; 2] {
    [
        Command::SetLink {
            destination: link.from.clone(),
            throttle_target: link.to.clone(),
            bandwidth: link.bandwidth.clone(),
        },
        Command::SetLink {
            destination: link.to.clone(),
            throttle_target: link.from.clone(),
            bandwidth: link.bandwidth.clone(),
        },
    ]
}

/// One reset per host, in list order.
pub fn reset_commands(hosts: &[Endpoint]) -> Vec<Command> {
    hosts
        .iter()
        .map(|host| Command::Reset { destination: host.clone() })
        .collect()
}

/// Split `input` on `:` and require at least `expected` non-empty leading
/// fields.
fn split_fields(input: &str, expected: usize) -> Result<Vec<&str>, CommandError> {
    let fields: Vec<&str> = input.split(':').collect();
    if fields.len() < expected {
        return Err(CommandError::MissingFields {
            input: input.to_string(),
            expected,
        });
    }
    if fields[..expected].iter().any(|f| f.is_empty()) {
        return Err(CommandError::EmptyField(input.to_string()));
    }
    Ok(fields)
}

/// Parse `<ip1>:<ip2>:<bandwidth>`.
pub fn parse_link(input: &str) -> Result<Link, CommandError> {
    let fields = split_fields(input, 3)?;
    Ok(Link::new(fields[0].into(), fields[1].into(), fields[2].into()))
}

/// Parse `<ip>:<bandwidth>` into an interface throttle.
pub fn parse_interface(input: &str) -> Result<Command, CommandError> {
    let fields = split_fields(input, 2)?;
    Ok(Command::SetInterface {
        destination: fields[0].into(),
        bandwidth: fields[1].into(),
    })
}

/// Parse `<ip1>:<ip2>:..` into a host list.
pub fn parse_hosts(input: &str) -> Result<Vec<Endpoint>, CommandError> {
    let fields: Vec<&str> = input.split(':').collect();
    if fields.iter().any(|f| f.is_empty()) {
        return Err(CommandError::EmptyField(input.to_string()));
    }
    Ok(fields.into_iter().map(Endpoint::from).collect())
}
