use std::pin::pin;

use futures::StreamExt;
use kube::{
    runtime::{
        reflector::{reflector, store::Writer},
        watcher::{watcher, Config},
        WatchStreamExt,
    },
    Client, ResourceExt,
};
use log::{error, info};
use machineset_egress_cidr_core::{
    kubernetes::GetApi,
    reconciler::{reconcile_host_subnet, HostSubnetUpdater},
    resources::hostsubnet::HostSubnet,
};
use tokio::{
    sync::watch::Receiver,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::helpers::{log_reconcile_result, log_watcher_error, with_watch_backoff};

use super::context::ControllerContext;

pub async fn reconcile<U: HostSubnetUpdater>(
    context: &ControllerContext<U>,
    host_subnet: &HostSubnet,
) {
    let result = reconcile_host_subnet(
        host_subnet,
        &context.cidrs,
        &context.machines,
        &context.host_subnet_api,
    )
    .await;

    log_reconcile_result(&host_subnet.name_any(), &result);
}

/// Reconciles every HostSubnet as it's listed, added or updated. Waits for the
/// Machine and MachineSet caches first, reconciling against a cold CIDR cache
/// would only produce spurious `no cidr entry` results.
pub async fn start_host_subnet_controller(
    client: &Client,
    context: &ControllerContext,
    writer: Writer<HostSubnet>,
    warm_up: Vec<Receiver<bool>>,
) {
    for mut ready in warm_up {
        while !*ready.borrow_and_update() {
            if ready.changed().await.is_err() {
                error!("Cache warm-up was aborted, not starting the HostSubnet controller!");
                return;
            }
        }
    }

    info!("Creating HostSubnet controller...");

    let watcher = watcher(client.global_api::<HostSubnet>(), Config::default());
    let watcher = with_watch_backoff(watcher);
    let mut host_subnets = pin!(reflector(writer, watcher).applied_objects());

    while let Some(host_subnet) = host_subnets.next().await {
        match host_subnet {
            Ok(host_subnet) => reconcile(context, &host_subnet).await,
            Err(err) => log_watcher_error::<HostSubnet>(&err),
        }
    }

    info!("Exiting HostSubnet controller!");
}

/// Periodically reconciles all known HostSubnets so missed or failed updates
/// eventually converge.
pub async fn start_resync(context: &ControllerContext) {
    let period = match context.config.resync_interval {
        Some(period) => period,
        None => {
            info!("Periodic resync is disabled");
            return;
        }
    };

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let host_subnets = context.host_subnets.state();
        info!("Resyncing {} HostSubnets...", host_subnets.len());

        for host_subnet in host_subnets {
            reconcile(context, &host_subnet).await;
        }
    }
}
