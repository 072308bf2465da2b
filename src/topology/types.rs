//! Topology type definitions.
//!
//! Endpoints and bandwidth tiers are opaque tokens: they are compared by
//! exact string match and passed through to plan files and the wire verbatim.

use std::fmt;

/// Network address of a throttling agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// Throttling value such as `10mbit`. Never interpreted numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BandwidthTier(String);

impl BandwidthTier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BandwidthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BandwidthTier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One throttled connection between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from: Endpoint,
    pub to: Endpoint,
    pub bandwidth: BandwidthTier,
}

impl Link {
    pub fn new(from: Endpoint, to: Endpoint, bandwidth: BandwidthTier) -> Self {
        Self { from, to, bandwidth }
    }
}

/// Renders the plan file form `from:to:bandwidth`.
impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.from, self.to, self.bandwidth)
    }
}

/// Ordered, immutable sequence of links produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Topology {
    links: Vec<Link>,
}

impl Topology {
    pub(crate) fn from_links(links: Vec<Link>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }
}

impl<'a> IntoIterator for &'a Topology {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_display() {
        let link = Link::new("1.1.1.1".into(), "2.2.2.2".into(), "10mbit".into());
        assert_eq!(link.to_string(), "1.1.1.1:2.2.2.2:10mbit");
    }
}
