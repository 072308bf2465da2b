//! Uniform bandwidth assignment.
//!
//! All C(n, 2) endpoint pairs are enumerated, a pool with exactly one tier
//! per pair is filled by cycling through the tier list, and pairs then take
//! tiers from the pool at random without replacement. The tier multiset of
//! the result therefore always equals the cyclic fill; only the assignment
//! of tiers to pairs is random. When the pair count is not a multiple of the
//! tier count, the earlier tiers appear once more than the later ones.

use log::{debug, info};
use rand::Rng;

use super::pairs::link_pairs;
use super::pool::BandwidthPool;
use super::types::{BandwidthTier, Endpoint, Link, Topology};
use super::{validate_endpoints, validate_tiers, TopologyError};

/// Assign tiers to every endpoint pair, drawing from a cyclic pool.
///
/// # Arguments
/// * `endpoints` - Distinct endpoints, at least 2, in canonical order
/// * `tiers` - Bandwidth tiers, at least 1, repeats allowed
/// * `rng` - Random source for the draw
///
/// # Returns
/// A topology with one link per pair, in pair enumeration order
pub fn generate_uniform<R: Rng + ?Sized>(
    endpoints: &[Endpoint],
    tiers: &[BandwidthTier],
    rng: &mut R,
) -> Result<Topology, TopologyError> {
    if endpoints.len() < 2 {
        return Err(TopologyError::TooFewEndpoints { found: endpoints.len() });
    }
    if tiers.is_empty() {
        return Err(TopologyError::NoTiers);
    }
    validate_endpoints(endpoints)?;
    validate_tiers(tiers)?;

    let pairs: Vec<_> = link_pairs(endpoints).collect();
    let mut pool = BandwidthPool::cyclic(tiers, pairs.len());

    let mut links = Vec::with_capacity(pairs.len());
    for (from, to) in pairs {
        // The pool holds exactly one entry per pair
        let Some(bandwidth) = pool.draw(rng) else {
            break;
        };
        debug!("Link {} <-> {} assigned {}", from, to, bandwidth);
        links.push(Link::new(from.clone(), to.clone(), bandwidth));
    }
    debug_assert!(pool.is_empty());

    info!(
        "Generated uniform topology: {} endpoints, {} tiers, {} links",
        endpoints.len(),
        tiers.len(),
        links.len()
    );
    Ok(Topology::from_links(links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn endpoints(n: usize) -> Vec<Endpoint> {
        (1..=n).map(|i| Endpoint::new(format!("10.0.0.{}", i))).collect()
    }

    fn tiers(values: &[&str]) -> Vec<BandwidthTier> {
        values.iter().map(|v| BandwidthTier::from(*v)).collect()
    }

    #[test]
    fn test_link_count_and_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let eps = endpoints(5);
        let topology = generate_uniform(&eps, &tiers(&["1mbit", "5mbit"]), &mut rng).unwrap();
        assert_eq!(topology.len(), 10);

        let expected: Vec<_> = link_pairs(&eps).collect();
        for (link, (from, to)) in topology.iter().zip(expected) {
            assert_eq!(&link.from, from);
            assert_eq!(&link.to, to);
        }
    }

    #[test]
    fn test_tier_multiset_matches_cyclic_fill() {
        let tier_list = tiers(&["1mbit", "5mbit", "10mbit"]);
        for n in 2..9 {
            let mut rng = StdRng::seed_from_u64(n as u64);
            let topology = generate_uniform(&endpoints(n), &tier_list, &mut rng).unwrap();

            let pair_count = n * (n - 1) / 2;
            let mut expected: Vec<_> = tier_list.iter().cycle().take(pair_count).cloned().collect();
            let mut actual: Vec<_> = topology.iter().map(|l| l.bandwidth.clone()).collect();
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "tier multiset mismatch for {} endpoints", n);
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let eps = endpoints(6);
        let tier_list = tiers(&["a", "b", "c", "d"]);
        let first = generate_uniform(&eps, &tier_list, &mut StdRng::seed_from_u64(9)).unwrap();
        let second = generate_uniform(&eps, &tier_list, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_usage_errors() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generate_uniform(&endpoints(1), &tiers(&["a"]), &mut rng),
            Err(TopologyError::TooFewEndpoints { found: 1 })
        );
        assert_eq!(generate_uniform(&endpoints(3), &[], &mut rng), Err(TopologyError::NoTiers));
        assert_eq!(
            generate_uniform(&endpoints(3), &tiers(&["a", ""]), &mut rng),
            Err(TopologyError::EmptyToken("bandwidth tier"))
        );
    }
}
