use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use super::hop::Hop;

/// Ordered hops of one traceroute run; index 0 is the first hop from the
/// source.
///
/// Duplicate addresses are allowed (load-balanced routes may revisit a
/// router), and order is always insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    hops: Vec<Hop>,
}

impl Path {
    pub fn new() -> Self {
        Self { hops: Vec::new() }
    }

    pub fn push(&mut self, hop: Hop) {
        self.hops.push(hop);
    }

    /// Insert a hop at `index`, shifting later hops back.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, hop: Hop) {
        self.hops.insert(index, hop);
    }

    /// Remove the first hop equal to `hop`. Returns whether one was removed.
    pub fn remove(&mut self, hop: &Hop) -> bool {
        match self.hops.iter().position(|h| h == hop) {
            Some(pos) => {
                self.hops.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether any hop has this address (compared in canonical text form)
    pub fn contains_addr(&self, addr: IpAddr) -> bool {
        let wanted = addr.to_string();
        self.hops.iter().any(|h| h.addr.to_string() == wanted)
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hop> {
        self.hops.iter()
    }

    pub fn first(&self) -> Option<&Hop> {
        self.hops.first()
    }

    pub fn last(&self) -> Option<&Hop> {
        self.hops.last()
    }

    /// Sum of hop-to-hop distances along the path in kilometres.
    ///
    /// Segments where either end lacks geolocation contribute nothing.
    pub fn total_distance(&self) -> f64 {
        let mut prev: Option<&Hop> = None;
        let mut total = 0.0;
        for hop in &self.hops {
            total += hop.distance_to(prev).unwrap_or(0.0);
            prev = Some(hop);
        }
        total
    }
}

impl FromIterator<Hop> for Path {
    fn from_iter<I: IntoIterator<Item = Hop>>(iter: I) -> Self {
        Self {
            hops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = Hop;
    type IntoIter = std::vec::IntoIter<Hop>;

    fn into_iter(self) -> Self::IntoIter {
        self.hops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Hop;
    type IntoIter = std::slice::Iter<'a, Hop>;

    fn into_iter(self) -> Self::IntoIter {
        self.hops.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.hops.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>2}  {}", i, hop)?;
        }
        Ok(())
    }
}
