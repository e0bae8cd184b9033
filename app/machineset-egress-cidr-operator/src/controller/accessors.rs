use std::sync::Arc;

use anyhow::anyhow;
use kube::{
    api::PostParams,
    runtime::reflector::{ObjectRef, Store},
    Api,
};
use machineset_egress_cidr_core::{
    helpers::RequireMetadata,
    reconciler::{HostSubnetUpdater, MachineGetter},
    resources::{hostsubnet::HostSubnet, machine::Machine},
};

/// Looks Machines up in the reflector cache instead of hitting the API server.
pub struct StoreMachineGetter {
    store: Store<Machine>,
    namespace: String,
}

impl StoreMachineGetter {
    pub fn new(store: Store<Machine>, namespace: &str) -> Self {
        Self {
            store,
            namespace: namespace.to_owned(),
        }
    }

    pub fn state(&self) -> Vec<Arc<Machine>> {
        self.store.state()
    }
}

impl MachineGetter for StoreMachineGetter {
    fn get_machine(&self, name: &str) -> anyhow::Result<Arc<Machine>> {
        self.store
            .get(&ObjectRef::new(name).within(&self.namespace))
            .ok_or_else(|| {
                anyhow!(
                    "machine.machine.openshift.io \"{name}\" not found in '{}' namespace",
                    self.namespace
                )
            })
    }
}

pub struct ApiHostSubnetUpdater {
    api: Api<HostSubnet>,
}

impl ApiHostSubnetUpdater {
    pub fn new(api: Api<HostSubnet>) -> Self {
        Self { api }
    }
}

impl HostSubnetUpdater for ApiHostSubnetUpdater {
    async fn update_host_subnet(
        &self,
        host_subnet: &HostSubnet,
        params: &PostParams,
    ) -> anyhow::Result<HostSubnet> {
        let name = host_subnet.require_name_or_else(|| anyhow!("HostSubnet is missing a name!"))?;

        Ok(self.api.replace(name, params, host_subnet).await?)
    }
}

#[cfg(test)]
mod tests {
    use kube::{
        runtime::{reflector, watcher::Event},
        Resource, ResourceExt,
    };
    use machineset_egress_cidr_core::{
        reconciler::MachineGetter,
        resources::machine::{Machine, MachineSpec},
    };

    use super::StoreMachineGetter;

    fn machine(name: &str, namespace: &str) -> Machine {
        let mut machine = Machine::new(name, MachineSpec::default());
        machine.meta_mut().namespace = Some(namespace.to_owned());

        machine
    }

    #[test]
    fn machines_are_looked_up_within_namespace() {
        let (store, mut writer) = reflector::store::<Machine>();
        writer.apply_watcher_event(&Event::Restarted(vec![
            machine("node123", "openshift-machine-api"),
            machine("node456", "elsewhere"),
        ]));
        let machines = StoreMachineGetter::new(store, "openshift-machine-api");

        assert_eq!(machines.get_machine("node123").unwrap().name_any(), "node123");
        assert_eq!(machines.state().len(), 2);

        let error = machines.get_machine("node456").unwrap_err();
        assert_eq!(
            error.to_string(),
            "machine.machine.openshift.io \"node456\" not found in \
             'openshift-machine-api' namespace"
        );
    }
}
