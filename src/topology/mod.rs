//! Network topology module.
//!
//! This module turns an ordered endpoint list and a list of bandwidth tiers
//! into a link-to-bandwidth plan. Two generators are provided:
//!
//! - **Uniform**: every endpoint pair gets a tier drawn at random from a
//!   pool filled cyclically with the given tiers
//! - **Nine-triangle**: nine endpoints in three triangles, with the fastest
//!   tier inside a triangle, the medium tier between neighbouring triangles
//!   and the slowest tier between the outer two

pub mod types;
pub mod pairs;
pub mod pool;
pub mod uniform;
pub mod triangle;

use std::collections::HashSet;
use std::path::PathBuf;

use rand::Rng;

// Re-export key types and functions for easier access
pub use types::{BandwidthTier, Endpoint, Link, Topology};
pub use pairs::link_pairs;
pub use pool::BandwidthPool;
pub use uniform::generate_uniform;
pub use triangle::generate_nine_triangle;

/// Errors raised when generator inputs have the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("At least 2 endpoints are required, got {found}")]
    TooFewEndpoints { found: usize },

    #[error("At least one bandwidth tier is required")]
    NoTiers,

    #[error("Expects {expected} endpoints, got {found}")]
    EndpointCount { expected: usize, found: usize },

    #[error("Expects {expected} bandwidth values in descending order of size, got {found}")]
    TierCount { expected: usize, found: usize },

    #[error("Endpoint '{0}' is listed more than once")]
    DuplicateEndpoint(String),

    #[error("Empty {0} token")]
    EmptyToken(&'static str),

    #[error("Expected '<endpoints> <tiers> <output file>', got '{0}'")]
    MalformedArguments(String),
}

/// Which generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Uniform,
    NineTriangle,
}

impl GeneratorKind {
    /// Run this generator over the given endpoints and tiers.
    pub fn generate<R: Rng + ?Sized>(
        self,
        endpoints: &[Endpoint],
        tiers: &[BandwidthTier],
        rng: &mut R,
    ) -> Result<Topology, TopologyError> {
        match self {
            Self::Uniform => generate_uniform(endpoints, tiers, rng),
            Self::NineTriangle => generate_nine_triangle(endpoints, tiers),
        }
    }
}

/// Parsed generator arguments: endpoints, tiers and the plan file to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub kind: GeneratorKind,
    pub endpoints: Vec<Endpoint>,
    pub tiers: Vec<BandwidthTier>,
    pub output: PathBuf,
}

impl GenerateRequest {
    /// Parse `"<e1:e2:..> <t1:t2:..> <output>"`.
    ///
    /// Tokens are separated by whitespace; anything after the third token is
    /// ignored. Token contents are checked by the generators themselves.
    pub fn parse(kind: GeneratorKind, arguments: &str) -> Result<Self, TopologyError> {
        let parts: Vec<&str> = arguments.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(TopologyError::MalformedArguments(arguments.to_string()));
        }

        Ok(Self {
            kind,
            endpoints: parts[0].split(':').map(Endpoint::from).collect(),
            tiers: parts[1].split(':').map(BandwidthTier::from).collect(),
            output: PathBuf::from(parts[2]),
        })
    }
}

/// Check that endpoints are non-empty and pairwise distinct.
pub(crate) fn validate_endpoints(endpoints: &[Endpoint]) -> Result<(), TopologyError> {
    let mut seen = HashSet::new();
    for endpoint in endpoints {
        if endpoint.as_str().is_empty() {
            return Err(TopologyError::EmptyToken("endpoint"));
        }
        if !seen.insert(endpoint.as_str()) {
            return Err(TopologyError::DuplicateEndpoint(endpoint.to_string()));
        }
    }
    Ok(())
}

pub(crate) fn validate_tiers(tiers: &[BandwidthTier]) -> Result<(), TopologyError> {
    if tiers.iter().any(|tier| tier.as_str().is_empty()) {
        return Err(TopologyError::EmptyToken("bandwidth tier"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_request() {
        let request = GenerateRequest::parse(
            GeneratorKind::Uniform,
            "10.0.0.1:10.0.0.2:10.0.0.3 1mbit:2mbit plan.txt",
        )
        .unwrap();

        assert_eq!(request.endpoints.len(), 3);
        assert_eq!(request.endpoints[2], Endpoint::from("10.0.0.3"));
        assert_eq!(request.tiers, vec![BandwidthTier::from("1mbit"), BandwidthTier::from("2mbit")]);
        assert_eq!(request.output, PathBuf::from("plan.txt"));
    }

    #[test]
    fn test_parse_generate_request_too_short() {
        let err = GenerateRequest::parse(GeneratorKind::NineTriangle, "a:b 1mbit").unwrap_err();
        assert!(matches!(err, TopologyError::MalformedArguments(_)));
    }

    #[test]
    fn test_validate_endpoints() {
        let ok: Vec<Endpoint> = vec!["a".into(), "b".into()];
        assert!(validate_endpoints(&ok).is_ok());

        let dup: Vec<Endpoint> = vec!["a".into(), "b".into(), "a".into()];
        assert_eq!(validate_endpoints(&dup), Err(TopologyError::DuplicateEndpoint("a".to_string())));

        let empty: Vec<Endpoint> = vec!["a".into(), "".into()];
        assert_eq!(validate_endpoints(&empty), Err(TopologyError::EmptyToken("endpoint")));
    }
}
