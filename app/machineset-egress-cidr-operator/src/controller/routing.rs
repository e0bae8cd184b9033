use std::sync::Arc;

use kube::ResourceExt;
use log::{debug, info, warn};
use machineset_egress_cidr_core::{
    cidrs::{canonicalize, invalid_cidrs, EgressCidrCache},
    resources::machine::{Machine, MachineSet},
    ANNOTATION_EGRESS_CIDRS, MACHINESET_LABEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineSetChange {
    /// annotation is gone or blank, the entry was dropped
    Cleared,
    Unchanged,
    /// a new value was stored, HostSubnets of this MachineSet need a reconcile
    Changed,
}

/// Mirrors the egress CIDR annotation of an added or updated MachineSet into the cache.
pub async fn apply_machine_set(
    cidrs: &EgressCidrCache,
    machine_set: &MachineSet,
) -> MachineSetChange {
    let name = machine_set.name_any();
    let raw = machine_set
        .annotations()
        .get(ANNOTATION_EGRESS_CIDRS)
        .filter(|raw| !raw.trim().is_empty());

    let raw = match raw {
        Some(raw) => raw,
        None => {
            cidrs.delete(&name).await;
            return MachineSetChange::Cleared;
        }
    };

    if cidrs.equals(&name, raw).await {
        debug!("MachineSet<{name}>: egress CIDRs unchanged");
        return MachineSetChange::Unchanged;
    }

    let invalid = invalid_cidrs(&canonicalize(raw))
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if !invalid.is_empty() {
        warn!(
            "MachineSet<{name}>: '{}' contains entries that aren't CIDRs: {invalid:?}",
            ANNOTATION_EGRESS_CIDRS
        );
    }

    info!("MachineSet<{name}>: egress CIDRs set to '{raw}'");
    cidrs.set(&name, raw).await;

    MachineSetChange::Changed
}

pub async fn remove_machine_set(cidrs: &EgressCidrCache, machine_set: &MachineSet) {
    let name = machine_set.name_any();

    debug!("MachineSet<{name}>: deleted, dropping egress CIDRs");
    cidrs.delete(&name).await;
}

/// Replaces the whole cache content with the annotations of a fresh MachineSet
/// listing, returning the names whose entry changed.
pub async fn resync_machine_sets(
    cidrs: &EgressCidrCache,
    machine_sets: &[MachineSet],
) -> Vec<String> {
    let mut changed = Vec::new();

    for machine_set in machine_sets {
        if apply_machine_set(cidrs, machine_set).await == MachineSetChange::Changed {
            changed.push(machine_set.name_any());
        }
    }

    let listed = machine_sets
        .iter()
        .map(|machine_set| machine_set.name_any())
        .collect::<Vec<_>>();
    cidrs
        .retain(|name| listed.iter().any(|listed| listed == name))
        .await;

    changed
}

/// Names of the Machines labelled as members of `machine_set`. A Machine shares its
/// name with the HostSubnet of its node.
pub fn machines_in_machine_set(machines: &[Arc<Machine>], machine_set: &str) -> Vec<String> {
    machines
        .iter()
        .filter(|machine| {
            machine.labels().get(MACHINESET_LABEL).map(String::as_str) == Some(machine_set)
        })
        .map(|machine| machine.name_any())
        .collect()
}
