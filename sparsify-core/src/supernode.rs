//! Partition of the nodes into supernodes that only ever merge.

use std::mem;

use crate::{Result, error::SparsifyError};

/// Live supernodes and the owner of every node.
///
/// Slots keep their position during a merge phase so owner lookups stay
/// valid; [`Supernodes::compact`] drops emptied slots afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Supernodes {
    members: Vec<Vec<usize>>,
    owner: Vec<usize>,
    live: usize,
}

impl Supernodes {
    /// One singleton per node of `1..=node_count`.
    pub(crate) fn singletons(node_count: usize) -> Self {
        Self {
            members: (1..=node_count).map(|node| vec![node]).collect(),
            owner: (0..node_count).collect(),
            live: node_count,
        }
    }

    /// Number of non-empty supernodes.
    #[rustfmt::skip]
    pub(crate) const fn len(&self) -> usize { self.live }

    /// Iterates `(slot, members)` for every non-empty supernode.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .map(|(slot, members)| (slot, members.as_slice()))
    }

    /// Returns the slot of the supernode containing `node`.
    pub(crate) fn owner_of(&self, node: usize) -> Result<usize> {
        node.checked_sub(1)
            .and_then(|position| self.owner.get(position))
            .copied()
            .ok_or(SparsifyError::InvariantViolation {
                invariant: "decoded endpoint has an owning supernode",
                node,
            })
    }

    /// Merges the supernodes in `left` and `right`, appending the smaller
    /// member list to the larger. Returns `false` when they are the same.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> Result<bool> {
        if left == right {
            return Ok(false);
        }
        let left_len = self.slot_len(left)?;
        let right_len = self.slot_len(right)?;
        let (target, source) = if left_len >= right_len {
            (left, right)
        } else {
            (right, left)
        };

        let moved = self
            .members
            .get_mut(source)
            .map(mem::take)
            .unwrap_or_default();
        for &node in &moved {
            if let Some(owner) = node.checked_sub(1).and_then(|slot| self.owner.get_mut(slot)) {
                *owner = target;
            }
        }
        if let Some(members) = self.members.get_mut(target) {
            members.extend(moved);
        }
        self.live -= 1;
        Ok(true)
    }

    /// Removes emptied slots and renumbers owners.
    pub(crate) fn compact(&mut self) {
        self.members.retain(|members| !members.is_empty());
        for (slot, members) in self.members.iter().enumerate() {
            for &node in members {
                if let Some(owner) = node
                    .checked_sub(1)
                    .and_then(|position| self.owner.get_mut(position))
                {
                    *owner = slot;
                }
            }
        }
    }

    /// Consumes the partition, returning sorted blocks ordered by smallest
    /// member.
    pub(crate) fn into_blocks(self) -> Vec<Vec<usize>> {
        let mut blocks: Vec<Vec<usize>> = self
            .members
            .into_iter()
            .filter(|members| !members.is_empty())
            .map(|mut members| {
                members.sort_unstable();
                members
            })
            .collect();
        blocks.sort_unstable_by_key(|block| block.first().copied());
        blocks
    }

    fn slot_len(&self, slot: usize) -> Result<usize> {
        match self.members.get(slot) {
            Some(members) if !members.is_empty() => Ok(members.len()),
            _ => Err(SparsifyError::InvariantViolation {
                invariant: "merged supernode slot is live",
                node: slot,
            }),
        }
    }
}
