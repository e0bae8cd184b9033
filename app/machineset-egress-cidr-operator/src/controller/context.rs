use kube::runtime::reflector::Store;
use machineset_egress_cidr_core::{cidrs::EgressCidrCache, resources::hostsubnet::HostSubnet};

use crate::config::OperatorConfig;

use super::accessors::{ApiHostSubnetUpdater, StoreMachineGetter};

pub struct ControllerContext<U = ApiHostSubnetUpdater> {
    pub config: OperatorConfig,
    pub cidrs: EgressCidrCache,
    pub machines: StoreMachineGetter,
    pub host_subnets: Store<HostSubnet>,
    pub host_subnet_api: U,
}
