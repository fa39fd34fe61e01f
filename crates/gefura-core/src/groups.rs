use crate::{Error, GroupId, Network, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A validated partition of nodes into disjoint, non-empty groups.
///
/// Every node belongs to exactly one group. Construction rejects overlapping
/// membership; coverage of a concrete network is checked separately with
/// [`Grouping::validate_against`], since the same grouping may be reused
/// across networks.
///
/// # Example
///
/// ```rust
/// use gefura_core::Grouping;
///
/// let grouping = Grouping::from_sets(vec![
///     vec!["a1", "a2"],
///     vec!["b1"],
/// ]).unwrap();
///
/// assert_eq!(grouping.len(), 2);
/// assert_eq!(grouping.group_of(&"a1".into()), grouping.group_of(&"a2".into()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grouping {
    /// Node -> group label.
    membership: HashMap<NodeId, GroupId>,

    /// Group label -> member count.
    sizes: HashMap<GroupId, usize>,
}

impl Grouping {
    /// Build a grouping from (node, group label) pairs.
    ///
    /// Fails with [`Error::InvalidGroups`] if a node appears with two
    /// different labels. Repeating a (node, label) pair is harmless.
    pub fn from_membership<I, N, G>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, G)>,
        N: Into<NodeId>,
        G: Into<GroupId>,
    {
        let mut membership: HashMap<NodeId, GroupId> = HashMap::new();

        for (node, group) in pairs {
            let node = node.into();
            let group = group.into();
            match membership.get(&node) {
                Some(existing) if *existing != group => {
                    return Err(Error::InvalidGroups(format!(
                        "node {node} assigned to both {existing} and {group}"
                    )));
                }
                Some(_) => {}
                None => {
                    membership.insert(node, group);
                }
            }
        }

        Ok(Self::from_validated(membership))
    }

    /// Build a grouping from a collection of node sets.
    ///
    /// Groups are labelled `g0`, `g1`, ... by position. Fails with
    /// [`Error::InvalidGroups`] on an empty set or on a node present in two
    /// sets.
    pub fn from_sets<I, S, N>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        let mut membership: HashMap<NodeId, GroupId> = HashMap::new();

        for (i, set) in sets.into_iter().enumerate() {
            let group = GroupId(format!("g{i}"));
            let mut empty = true;
            for node in set {
                empty = false;
                let node = node.into();
                if let Some(existing) = membership.get(&node) {
                    return Err(Error::InvalidGroups(format!(
                        "node {node} present in both {existing} and {group}"
                    )));
                }
                membership.insert(node, group.clone());
            }
            if empty {
                return Err(Error::InvalidGroups(format!("group {group} is empty")));
            }
        }

        Ok(Self::from_validated(membership))
    }

    fn from_validated(membership: HashMap<NodeId, GroupId>) -> Self {
        let mut sizes: HashMap<GroupId, usize> = HashMap::new();
        for group in membership.values() {
            *sizes.entry(group.clone()).or_insert(0) += 1;
        }
        Self { membership, sizes }
    }

    /// The group a node belongs to, if the node is covered.
    pub fn group_of(&self, node: &NodeId) -> Option<&GroupId> {
        self.membership.get(node)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the grouping covers no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Number of nodes covered by the grouping.
    pub fn node_count(&self) -> usize {
        self.membership.len()
    }

    /// Iterate over group labels.
    pub fn groups(&self) -> impl Iterator<Item = &GroupId> {
        self.sizes.keys()
    }

    /// Member count of a group.
    pub fn group_size(&self, group: &GroupId) -> usize {
        self.sizes.get(group).copied().unwrap_or(0)
    }

    /// Check that this grouping exactly covers the network's node set.
    ///
    /// A grouped node missing from the network is an [`Error::InvalidNode`];
    /// a network node missing from the grouping is an
    /// [`Error::InvalidGroups`]. Both checks run before any traversal so a
    /// failed measure call never produces partial results.
    pub fn validate_against(&self, network: &Network) -> Result<()> {
        for node in self.membership.keys() {
            if !network.contains(node) {
                return Err(Error::InvalidNode(format!(
                    "grouped node {node} is not in the network"
                )));
            }
        }
        for node in network.nodes() {
            if !self.membership.contains_key(node) {
                return Err(Error::InvalidGroups(format!(
                    "network node {node} is not covered by any group"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sets() {
        let grouping = Grouping::from_sets(vec![vec!["a", "b"], vec!["c"]]).unwrap();
        assert_eq!(grouping.len(), 2);
        assert_eq!(grouping.node_count(), 3);
        assert_eq!(grouping.group_of(&"a".into()), grouping.group_of(&"b".into()));
        assert_ne!(grouping.group_of(&"a".into()), grouping.group_of(&"c".into()));
    }

    #[test]
    fn test_from_sets_rejects_overlap() {
        let result = Grouping::from_sets(vec![vec!["a", "b"], vec!["b", "c"]]);
        assert!(matches!(result, Err(Error::InvalidGroups(_))));
    }

    #[test]
    fn test_from_sets_rejects_empty_group() {
        let result = Grouping::from_sets(vec![vec!["a"], vec![]]);
        assert!(matches!(result, Err(Error::InvalidGroups(_))));
    }

    #[test]
    fn test_from_membership_rejects_conflict() {
        let result = Grouping::from_membership(vec![("a", "g0"), ("a", "g1")]);
        assert!(matches!(result, Err(Error::InvalidGroups(_))));
    }

    #[test]
    fn test_from_membership_tolerates_repeats() {
        let grouping = Grouping::from_membership(vec![("a", "g0"), ("a", "g0"), ("b", "g1")]);
        assert_eq!(grouping.unwrap().node_count(), 2);
    }

    #[test]
    fn test_validate_against() {
        let mut net = Network::undirected();
        net.add_edge("a", "b", None);

        let complete = Grouping::from_sets(vec![vec!["a"], vec!["b"]]).unwrap();
        assert!(complete.validate_against(&net).is_ok());

        let missing = Grouping::from_sets(vec![vec!["a"]]).unwrap();
        assert!(matches!(
            missing.validate_against(&net),
            Err(Error::InvalidGroups(_))
        ));

        let stranger = Grouping::from_sets(vec![vec!["a"], vec!["b", "z"]]).unwrap();
        assert!(matches!(
            stranger.validate_against(&net),
            Err(Error::InvalidNode(_))
        ));
    }
}
