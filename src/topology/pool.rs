//! Bandwidth pool used by the uniform generator.

use rand::Rng;

use super::types::BandwidthTier;

/// Consumable multiset of bandwidth tiers, one entry per link slot.
///
/// Entries are addressed by index and removed with `swap_remove`, so
/// repeated tier values never need to be told apart.
#[derive(Debug, Clone)]
pub struct BandwidthPool {
    entries: Vec<BandwidthTier>,
}

impl BandwidthPool {
    /// Fill a pool of `size` entries by cycling through `tiers`.
    ///
    /// Slot `i` receives `tiers[i % tiers.len()]`. An empty tier list gives
    /// an empty pool.
    pub fn cyclic(tiers: &[BandwidthTier], size: usize) -> Self {
        if tiers.is_empty() {
            return Self { entries: Vec::new() };
        }
        let entries = tiers.iter().cycle().take(size).cloned().collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remaining entries, in no particular order.
    pub fn remaining(&self) -> &[BandwidthTier] {
        &self.entries
    }

    /// Remove and return one entry chosen uniformly among those left.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<BandwidthTier> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.entries.len());
        Some(self.entries.swap_remove(index))
    }
}
