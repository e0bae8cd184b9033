use k8s_openapi::{ClusterResourceScope, Metadata, Resource};
use kube::core::ObjectMeta;
use serde::{Deserialize, Serialize};

/// network.openshift.io/v1 HostSubnet
///
/// The type has no spec/status split, so it implements the k8s-openapi traits
/// by hand instead of going through the `CustomResource` derive.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostSubnet {
    #[serde(default = "HostSubnet::default_api_version")]
    pub api_version: String,
    #[serde(default = "HostSubnet::default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// name of the node this subnet belongs to
    #[serde(default)]
    pub host: String,
    #[serde(default, rename = "hostIP")]
    pub host_ip: String,
    /// CIDR of the pod network assigned to the node
    #[serde(default)]
    pub subnet: String,
    #[serde(default, rename = "egressIPs", skip_serializing_if = "Vec::is_empty")]
    pub egress_ips: Vec<String>,
    /// ranges the node may host egress IPs from, kept in sync by this operator
    #[serde(default, rename = "egressCIDRs", skip_serializing_if = "Vec::is_empty")]
    pub egress_cidrs: Vec<String>,
}

impl HostSubnet {
    pub fn new(name: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn default_api_version() -> String {
        <Self as Resource>::API_VERSION.to_owned()
    }

    fn default_kind() -> String {
        <Self as Resource>::KIND.to_owned()
    }
}

impl Default for HostSubnet {
    fn default() -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: Default::default(),
            host: Default::default(),
            host_ip: Default::default(),
            subnet: Default::default(),
            egress_ips: Default::default(),
            egress_cidrs: Default::default(),
        }
    }
}

impl Resource for HostSubnet {
    const API_VERSION: &'static str = "network.openshift.io/v1";
    const GROUP: &'static str = "network.openshift.io";
    const KIND: &'static str = "HostSubnet";
    const VERSION: &'static str = "v1";
    const URL_PATH_SEGMENT: &'static str = "hostsubnets";
    type Scope = ClusterResourceScope;
}

impl Metadata for HostSubnet {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &Self::Ty {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Self::Ty {
        &mut self.metadata
    }
}
