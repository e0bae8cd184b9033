use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

// Both kinds are owned by the machine-api operator. Only their metadata is
// consumed here, the specs carry just enough to keep the types recognizable.

#[skip_serializing_none]
#[derive(CustomResource, Deserialize, Serialize, Clone, Default, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[kube(
    group = "machine.openshift.io",
    version = "v1beta1",
    kind = "MachineSet",
    namespaced
)]
pub struct MachineSetSpec {
    /// number of desired machines
    pub replicas: Option<i32>,
}

#[skip_serializing_none]
#[derive(CustomResource, Deserialize, Serialize, Clone, Default, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[kube(
    group = "machine.openshift.io",
    version = "v1beta1",
    kind = "Machine",
    namespaced
)]
pub struct MachineSpec {
    /// cloud provider identifier of the backing instance
    #[serde(rename = "providerID")]
    pub provider_id: Option<String>,
}
