use std::pin::pin;

use futures::StreamExt;
use kube::{
    runtime::{
        reflector::ObjectRef,
        watcher::{watcher, Config, Event},
    },
    Client, ResourceExt,
};
use log::info;
use machineset_egress_cidr_core::{
    kubernetes::GetApi, reconciler::HostSubnetUpdater, resources::machine::MachineSet,
};
use tokio::sync::watch::Sender;

use crate::helpers::{log_watcher_error, with_watch_backoff};

use super::{
    context::ControllerContext,
    hostsubnet::reconcile,
    routing::{
        apply_machine_set, machines_in_machine_set, remove_machine_set, resync_machine_sets,
        MachineSetChange,
    },
};

/// Feeds MachineSet annotations into the CIDR cache for as long as the watch lasts.
pub async fn start_machine_set_watcher(
    client: &Client,
    context: &ControllerContext,
    ready: Sender<bool>,
) {
    info!("Creating MachineSet watcher...");

    let api = client.namespaced_api::<MachineSet>(&context.config.machine_namespace);
    let mut events = pin!(with_watch_backoff(watcher(api, Config::default())));

    while let Some(event) = events.next().await {
        match event {
            Ok(event) => handle_machine_set_event(context, event, &ready).await,
            Err(err) => log_watcher_error::<MachineSet>(&err),
        }
    }

    info!("Exiting MachineSet watcher!");
}

async fn handle_machine_set_event<U: HostSubnetUpdater>(
    context: &ControllerContext<U>,
    event: Event<MachineSet>,
    ready: &Sender<bool>,
) {
    match event {
        Event::Applied(machine_set) => {
            if apply_machine_set(&context.cidrs, &machine_set).await == MachineSetChange::Changed {
                trigger_reconcile(context, &machine_set.name_any()).await;
            }
        }
        Event::Deleted(machine_set) => remove_machine_set(&context.cidrs, &machine_set).await,
        Event::Restarted(machine_sets) => {
            let changed = resync_machine_sets(&context.cidrs, &machine_sets).await;

            info!(
                "CIDR cache synced ({} of {} MachineSets annotated)",
                context.cidrs.len().await,
                machine_sets.len()
            );
            ready.send_replace(true);

            for machine_set in changed {
                trigger_reconcile(context, &machine_set).await;
            }
        }
    }
}

/// Reconciles the HostSubnets of every Machine belonging to `machine_set`.
pub async fn trigger_reconcile<U: HostSubnetUpdater>(
    context: &ControllerContext<U>,
    machine_set: &str,
) {
    let machines = context.machines.state();

    for machine in machines_in_machine_set(&machines, machine_set) {
        match context.host_subnets.get(&ObjectRef::new(&machine)) {
            Some(host_subnet) => reconcile(context, &host_subnet).await,
            None => info!("MachineSet<{machine_set}>: no HostSubnet for machine '{machine}' yet"),
        }
    }
}
