//! Top-level actions.
//!
//! Each command-line action maps to one `Action` variant through a pure
//! parse function. Network actions turn into a list of commands for the
//! dispatcher; generator actions turn into a topology written to a plan
//! file. Usage problems are detected before anything is sent or written.

use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::command::{self, link_commands, reset_commands, Command, CommandError};
use crate::config::Settings;
use crate::dispatch::{Dispatcher, DryRunTransport, TcpTransport, Transport};
use crate::plan;
use crate::topology::{Endpoint, GenerateRequest, GeneratorKind, Link, Topology, TopologyError};

/// Errors that abort an action before it has any effect.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("A port is required for network actions (use --port or the config file)")]
    MissingPort,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// The closed set of things the tool can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Throttle one link at both ends.
    SetLink(Link),
    /// Throttle the default interface of one host.
    SetInterface(Command),
    /// Remove throttles from each host.
    Reset(Vec<Endpoint>),
    /// Throttle every link listed in a plan file.
    ApplyPlan(PathBuf),
    /// Generate a plan file.
    Generate(GenerateRequest),
}

impl Action {
    pub fn set_link(input: &str) -> Result<Self, UsageError> {
        Ok(Self::SetLink(command::parse_link(input)?))
    }

    pub fn set_interface(input: &str) -> Result<Self, UsageError> {
        Ok(Self::SetInterface(command::parse_interface(input)?))
    }

    pub fn reset(input: &str) -> Result<Self, UsageError> {
        Ok(Self::Reset(command::parse_hosts(input)?))
    }

    pub fn apply_plan(path: impl Into<PathBuf>) -> Self {
        Self::ApplyPlan(path.into())
    }

    pub fn generate(kind: GeneratorKind, arguments: &str) -> Result<Self, UsageError> {
        Ok(Self::Generate(GenerateRequest::parse(kind, arguments)?))
    }

    /// Whether this action talks to agents and therefore needs a port.
    pub fn requires_network(&self) -> bool {
        !matches!(self, Self::Generate(_))
    }

    /// Commands for a network action, in send order.
    ///
    /// Reads the plan file for `ApplyPlan`. Generator actions yield nothing.
    pub fn commands(&self) -> Result<Vec<Command>> {
        let commands = match self {
            Self::SetLink(link) => link_commands(link).to_vec(),
            Self::SetInterface(command) => vec![command.clone()],
            Self::Reset(hosts) => reset_commands(hosts),
            Self::ApplyPlan(path) => plan::read_plan_commands(path)?,
            Self::Generate(_) => Vec::new(),
        };
        Ok(commands)
    }
}

/// What running an action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Replies from each request, in send order.
    Replies(Vec<String>),
    /// A plan written to disk.
    PlanWritten { path: PathBuf, links: usize },
}

/// Run an action with a transport chosen from the settings.
pub fn run(action: &Action, settings: &Settings) -> Result<Outcome> {
    if !action.requires_network() {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return generate(action, &mut rng);
    }

    let port = settings.port.ok_or(UsageError::MissingPort)?;
    if settings.dry_run {
        execute(action, DryRunTransport::new(port))
    } else {
        execute(action, TcpTransport::new(port))
    }
}

/// Send the commands of a network action over `transport`.
pub fn execute<T: Transport>(action: &Action, transport: T) -> Result<Outcome> {
    let commands = action.commands()?;
    info!("Dispatching {} requests", commands.len());

    let mut dispatcher = Dispatcher::new(transport);
    let replies = dispatcher.send_all(&commands)?;
    Ok(Outcome::Replies(replies))
}

/// Run a generator action, writing the plan only if generation succeeds.
pub fn generate<R: Rng + ?Sized>(action: &Action, rng: &mut R) -> Result<Outcome> {
    let Action::Generate(request) = action else {
        return Ok(Outcome::Replies(Vec::new()));
    };

    let topology: Topology = request
        .kind
        .generate(&request.endpoints, &request.tiers, rng)
        .map_err(UsageError::from)?;

    plan::write_plan(&request.output, &topology)
        .wrap_err("Failed to store generated topology")?;

    Ok(Outcome::PlanWritten {
        path: request.output.clone(),
        links: topology.len(),
    })
}
