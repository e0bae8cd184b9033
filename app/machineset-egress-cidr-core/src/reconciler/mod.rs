use std::sync::Arc;

use kube::{api::PostParams, ResourceExt};
use log::{debug, info};

use crate::{
    cidrs::EgressCidrCache,
    helpers::RequireMetadata,
    resources::{hostsubnet::HostSubnet, machine::Machine},
    FIELD_MANAGER, MACHINESET_LABEL, MASTER_ROLE, ROLE_LABEL,
};

use self::error::ReconcilerError;
pub use self::outcome::ReconcileOutcome;

pub mod error;
pub mod outcome;

/// Resolves the Machine owning a HostSubnet (both share the same name).
pub trait MachineGetter {
    fn get_machine(&self, name: &str) -> anyhow::Result<Arc<Machine>>;
}

impl<F> MachineGetter for F
where
    F: Fn(&str) -> anyhow::Result<Arc<Machine>>,
{
    fn get_machine(&self, name: &str) -> anyhow::Result<Arc<Machine>> {
        self(name)
    }
}

/// Persists a HostSubnet with new egress CIDRs.
#[allow(async_fn_in_trait)]
pub trait HostSubnetUpdater {
    async fn update_host_subnet(
        &self,
        host_subnet: &HostSubnet,
        params: &PostParams,
    ) -> anyhow::Result<HostSubnet>;
}

pub fn update_params() -> PostParams {
    PostParams {
        field_manager: Some(FIELD_MANAGER.to_owned()),
        ..Default::default()
    }
}

/// Brings the egress CIDRs of a HostSubnet in line with the annotation of its
/// MachineSet. The only side effect is the conditional `update_host_subnet` call,
/// failures are returned and never retried here.
pub async fn reconcile_host_subnet<M, U>(
    host_subnet: &HostSubnet,
    cidrs: &EgressCidrCache,
    machines: &M,
    host_subnets: &U,
) -> Result<ReconcileOutcome, ReconcilerError>
where
    M: MachineGetter,
    U: HostSubnetUpdater,
{
    let name = host_subnet.require_name_or(ReconcilerError::MissingObjectMetadata)?;
    debug!("HostSubnet<{name}>: Reconcile");

    let machine = machines
        .get_machine(name)
        .map_err(ReconcilerError::GetMachine)?;

    if machine.labels().get(ROLE_LABEL).map(String::as_str) == Some(MASTER_ROLE) {
        debug!("HostSubnet<{name}>: role==master; ignore");
        return Ok(ReconcileOutcome::IgnoredRole);
    }

    let machine_set = match machine.labels().get(MACHINESET_LABEL) {
        Some(machine_set) if !machine_set.is_empty() => machine_set,
        _ => return Err(ReconcilerError::MissingMachineSetLabel),
    };

    if !cidrs.exists(machine_set).await {
        debug!("HostSubnet<{name}>: No or empty entry in CIDR cache, skipping");
        return Ok(ReconcileOutcome::NoEntry);
    }

    let actual = &host_subnet.egress_cidrs;
    if cidrs.equals_canonical(machine_set, actual).await {
        debug!("HostSubnet<{name}>: Already matches desired value, skipping");
        return Ok(ReconcileOutcome::UpToDate);
    }

    let desired = cidrs.get(machine_set).await;
    info!("HostSubnet<{name}>: Out of date, updating.");
    info!("HostSubnet<{name}>: Old value: {actual:?}");
    info!("HostSubnet<{name}>: New value: {desired:?}");

    let mut updated = host_subnet.clone();
    updated.egress_cidrs = desired;

    host_subnets
        .update_host_subnet(&updated, &update_params())
        .await
        .map_err(ReconcilerError::UpdateHostSubnet)?;

    Ok(ReconcileOutcome::Updated)
}
