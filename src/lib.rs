//! # Shapectl - Control-plane client for distributed bandwidth throttling
//!
//! This library tells remote traffic-shaping agents to limit or reset
//! bandwidth on specific links or interfaces, and pre-computes batch
//! throttle plans for whole topologies.
//!
//! ## Overview
//!
//! Agents run on every host of a testbed and listen for text requests on a
//! request/reply socket. A link between two hosts is throttled by telling
//! *both* hosts to shape traffic toward each other. Plans for many links can
//! be generated up front, stored as plan files and applied later.
//!
//! ## Architecture
//!
//! - `topology`: endpoint pairing, bandwidth pool and the plan generators
//! - `plan`: plan file reading and writing
//! - `command`: throttle commands and their wire encoding
//! - `dispatch`: sequential request/reply dispatch over ZMTP/TCP
//! - `action`: the closed set of top-level actions and their execution
//! - `config`: optional YAML client configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use shapectl::action::{self, Action};
//! use shapectl::config::Settings;
//! use shapectl::topology::GeneratorKind;
//!
//! // Write a 3-triangle plan
//! let generate = Action::generate(
//!     GeneratorKind::NineTriangle,
//!     "10.0.0.1:10.0.0.2:10.0.0.3:10.0.0.4:10.0.0.5:10.0.0.6:10.0.0.7:10.0.0.8:10.0.0.9 \
//!      100mbit:10mbit:1mbit plan.txt",
//! )?;
//! action::run(&generate, &Settings::default())?;
//!
//! // Apply it to the agents listening on port 5555
//! let settings = Settings { port: Some(5555), ..Default::default() };
//! action::run(&Action::apply_plan("plan.txt"), &settings)?;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Plan File Format
//!
//! ```text
//! 10.0.0.1:10.0.0.2:100mbit
//! 10.0.0.1:10.0.0.3:100mbit
//! ```
//!
//! ## Error Handling
//!
//! Module errors are `thiserror` enums; application-level functions return
//! `color_eyre::Result` with context attached.

pub mod action;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod plan;
pub mod topology;
