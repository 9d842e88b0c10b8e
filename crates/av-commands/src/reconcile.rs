//! Action reconciliation
//!
//! Decides which candidate actions are overridden by incompatible ones on
//! the same device. A device-specific action always wins over a room-wide
//! one; two incompatible actions of equal specificity are a conflict.

use std::collections::{BTreeMap, BTreeSet};

use av_core::Action;
use av_evaluator_registry::Registry;
use tracing::{debug, instrument, trace};

use crate::error::{CommandError, CommandResult};

/// Which actions were overridden, keyed by device ID
///
/// Indices refer to positions in the action list that was reconciled. The
/// list itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    overridden: BTreeMap<i64, BTreeSet<usize>>,
}

impl Reconciliation {
    /// Whether the action at `index` was overridden
    pub fn is_overridden(&self, index: usize) -> bool {
        self.overridden.values().any(|set| set.contains(&index))
    }

    /// Overridden action indices for one device
    pub fn for_device(&self, device_id: i64) -> Option<&BTreeSet<usize>> {
        self.overridden.get(&device_id)
    }

    /// All overridden indices, ascending
    pub fn overridden(&self) -> BTreeSet<usize> {
        self.overridden.values().flatten().copied().collect()
    }

    pub fn overridden_count(&self) -> usize {
        self.overridden.values().map(BTreeSet::len).sum()
    }
}

/// Reconcile incompatible actions per device
///
/// Actions are grouped by device ID. Within a device, every present action
/// is compared with every action that declares it incompatible, walking
/// actions by (name, position) so the outcome does not depend on hashing.
/// Pairs where either side is already overridden are skipped, as is an
/// action paired with itself.
#[instrument(skip_all, fields(count = actions.len()))]
pub fn reconcile(registry: &Registry, actions: &[Action]) -> CommandResult<Reconciliation> {
    let mut by_device: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (index, action) in actions.iter().enumerate() {
        by_device.entry(action.device.id).or_default().push(index);
    }

    let mut reconciliation = Reconciliation::default();

    for (device_id, indices) in by_device {
        let overridden = reconcile_device(registry, actions, device_id, &indices)?;
        if !overridden.is_empty() {
            debug!(device_id, overridden = ?overridden, "Overrode actions");
            reconciliation.overridden.insert(device_id, overridden);
        }
    }

    Ok(reconciliation)
}

fn reconcile_device(
    registry: &Registry,
    actions: &[Action],
    device_id: i64,
    indices: &[usize],
) -> CommandResult<BTreeSet<usize>> {
    let mut present: Vec<(String, usize)> = indices
        .iter()
        .map(|&i| (actions[i].action.to_ascii_lowercase(), i))
        .collect();
    present.sort();

    // (incompatible action name, index of the action that declares it)
    let mut incompatible: Vec<(String, usize)> = Vec::new();
    for &i in indices {
        let evaluator = registry.command_for_action(&actions[i].action)?;
        incompatible.extend(
            evaluator
                .incompatible_actions()
                .iter()
                .map(|name| (name.to_ascii_lowercase(), i)),
        );
    }
    incompatible.sort();

    let mut overridden = BTreeSet::new();

    for (name, current) in &present {
        for (incompatible_name, producer) in &incompatible {
            if incompatible_name != name || producer == current {
                continue;
            }
            if overridden.contains(current) || overridden.contains(producer) {
                continue;
            }

            let current_action = &actions[*current];
            let producer_action = &actions[*producer];

            match (current_action.device_specific, producer_action.device_specific) {
                (true, false) => {
                    trace!(device_id, kept = %current_action.action, dropped = %producer_action.action, "Device-specific action wins");
                    overridden.insert(*producer);
                }
                (false, true) => {
                    trace!(device_id, kept = %producer_action.action, dropped = %current_action.action, "Device-specific action wins");
                    overridden.insert(*current);
                }
                _ => {
                    return Err(CommandError::Conflict {
                        action: producer_action.action.clone(),
                        incompatible: current_action.action.clone(),
                        device_id,
                    });
                }
            }
        }
    }

    Ok(overridden)
}
