//! Three-triangle topology.
//!
//! Nine endpoints are split into three triangles of consecutive endpoints.
//! Links inside a triangle get the fastest tier, links between neighbouring
//! triangles (0-1, 1-2) the medium tier, and links between the outer
//! triangles (0-2) the slowest tier. Together these cover all 36 pairs.

use log::info;

use super::pairs::{cross_pairs, link_pairs};
use super::types::{BandwidthTier, Endpoint, Link, Topology};
use super::{validate_endpoints, validate_tiers, TopologyError};

pub const TRIANGLE_ENDPOINTS: usize = 9;
pub const TRIANGLE_TIERS: usize = 3;

/// Build the three-triangle plan.
///
/// `tiers` is read as `[fastest, medium, slowest]`. Links are grouped as all
/// intra-triangle links, then neighbouring-triangle links, then the links
/// between the outer triangles.
pub fn generate_nine_triangle(
    endpoints: &[Endpoint],
    tiers: &[BandwidthTier],
) -> Result<Topology, TopologyError> {
    if endpoints.len() != TRIANGLE_ENDPOINTS {
        return Err(TopologyError::EndpointCount {
            expected: TRIANGLE_ENDPOINTS,
            found: endpoints.len(),
        });
    }
    if tiers.len() != TRIANGLE_TIERS {
        return Err(TopologyError::TierCount {
            expected: TRIANGLE_TIERS,
            found: tiers.len(),
        });
    }
    validate_endpoints(endpoints)?;
    validate_tiers(tiers)?;

    let triangles: [&[Endpoint]; 3] = [&endpoints[0..3], &endpoints[3..6], &endpoints[6..9]];
    let (fastest, medium, slowest) = (&tiers[0], &tiers[1], &tiers[2]);

    let mut links = Vec::with_capacity(36);
    let mut push = |from: &Endpoint, to: &Endpoint, bandwidth: &BandwidthTier| {
        links.push(Link::new(from.clone(), to.clone(), bandwidth.clone()));
    };

    for triangle in triangles {
        for (from, to) in link_pairs(triangle) {
            push(from, to, fastest);
        }
    }

    for window in triangles.windows(2) {
        for (from, to) in cross_pairs(window[0], window[1]) {
            push(from, to, medium);
        }
    }

    for (from, to) in cross_pairs(triangles[0], triangles[2]) {
        push(from, to, slowest);
    }

    info!("Generated 3-triangle topology with {} links", links.len());
    Ok(Topology::from_links(links))
}
