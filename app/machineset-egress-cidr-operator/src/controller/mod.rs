use kube::{runtime::reflector, Client};
use log::info;
use machineset_egress_cidr_core::{
    cidrs::EgressCidrCache, kubernetes::GetApi, resources::hostsubnet::HostSubnet,
};
use tokio::{join, sync::watch};

use crate::config::OperatorConfig;

use self::{
    accessors::{ApiHostSubnetUpdater, StoreMachineGetter},
    context::ControllerContext,
    hostsubnet::{start_host_subnet_controller, start_resync},
    machine::start_machine_reflector,
    machineset::start_machine_set_watcher,
};

pub mod accessors;
pub mod context;
pub mod hostsubnet;
pub mod machine;
pub mod machineset;
pub mod routing;

pub async fn main_controller(client: Client, config: OperatorConfig) {
    info!(
        "Watching Machines and MachineSets in '{}' namespace",
        config.machine_namespace
    );

    let (machine_reflector, machines, machines_ready) =
        start_machine_reflector(&client, &config.machine_namespace);
    let (host_subnets, host_subnet_writer) = reflector::store::<HostSubnet>();
    let (machine_sets_ready_tx, machine_sets_ready) = watch::channel(false);

    let context = ControllerContext {
        cidrs: EgressCidrCache::new(),
        machines: StoreMachineGetter::new(machines, &config.machine_namespace),
        host_subnets,
        host_subnet_api: ApiHostSubnetUpdater::new(client.global_api()),
        config,
    };

    let machine_set_watcher = start_machine_set_watcher(&client, &context, machine_sets_ready_tx);
    let host_subnet_controller = start_host_subnet_controller(
        &client,
        &context,
        host_subnet_writer,
        vec![machine_sets_ready, machines_ready],
    );
    let resync = start_resync(&context);

    join!(
        machine_reflector,
        machine_set_watcher,
        host_subnet_controller,
        resync
    );
}
