use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use color_eyre::Result;
use env_logger::Env;
use log::info;

use shapectl::action::{self, Action, Outcome};
use shapectl::config::{self, ClientConfig, Settings};
use shapectl::topology::GeneratorKind;

/// Issue bandwidth throttling requests to remote shaping agents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["set", "set_all", "reset", "set_file", "generate_uniform", "generate_9_triangle"])
))]
struct Args {
    /// Throttle the bandwidth between machines: <ip1>:<ip2>:<bandwidth>
    #[arg(long)]
    set: Option<String>,

    /// Throttle the bandwidth of an interface on the given machine: <ip>:<bandwidth>
    #[arg(long)]
    set_all: Option<String>,

    /// Remove the bandwidth throttles on the given machines: <ip1>:<ip2>:..
    #[arg(long)]
    reset: Option<String>,

    /// Apply every link in a plan file (same syntax as --set, one per line)
    #[arg(long)]
    set_file: Option<PathBuf>,

    /// "<ip1>:<ip2>.. <bw1>:<bw2>.. <file>": distribute the bandwidth values
    /// over all links and write a plan file for --set-file
    #[arg(long, num_args = 1..=3, value_name = "ARGS")]
    generate_uniform: Option<Vec<String>>,

    /// "<9 ips> <3 bandwidths, fastest first> <file>": write a 3-triangle
    /// plan file for --set-file
    #[arg(long = "generate-9-triangle", num_args = 1..=3, value_name = "ARGS")]
    generate_9_triangle: Option<Vec<String>>,

    /// The port on the agents that the client connects to
    #[arg(long)]
    port: Option<u16>,

    /// Seed for plan generation
    #[arg(long)]
    seed: Option<u64>,

    /// Log requests instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Path to an optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Map the selected action flag to an `Action`.
    fn action(&self) -> Result<Action> {
        let action = if let Some(input) = &self.set {
            Action::set_link(input)?
        } else if let Some(input) = &self.set_all {
            Action::set_interface(input)?
        } else if let Some(hosts) = &self.reset {
            Action::reset(hosts)?
        } else if let Some(path) = &self.set_file {
            Action::apply_plan(path)
        } else if let Some(parts) = &self.generate_uniform {
            Action::generate(GeneratorKind::Uniform, &parts.join(" "))?
        } else if let Some(parts) = &self.generate_9_triangle {
            Action::generate(GeneratorKind::NineTriangle, &parts.join(" "))?
        } else {
            unreachable!("clap enforces exactly one action")
        };
        Ok(action)
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let client_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ClientConfig::default(),
    };

    // Initialize logging with default filter level of "info"
    let level = client_config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let settings = Settings::resolve(args.port, args.seed, args.dry_run, &client_config);
    let action = args.action()?;

    match action::run(&action, &settings)? {
        Outcome::Replies(replies) => info!("Completed {} requests", replies.len()),
        Outcome::PlanWritten { path, links } => info!("Plan with {} links written to {:?}", links, path),
    }
    Ok(())
}
