pub mod cidrs;
pub mod helpers;
pub mod kubernetes;
pub mod reconciler;
pub mod resources;

/// MachineSet annotation holding the comma separated egress CIDRs
pub const ANNOTATION_EGRESS_CIDRS: &str = "appuio.ch/egress-cidrs";

pub const MACHINE_NAMESPACE: &str = "openshift-machine-api";
pub const MACHINESET_LABEL: &str = "machine.openshift.io/cluster-api-machineset";
pub const ROLE_LABEL: &str = "machine.openshift.io/cluster-api-machine-role";
pub const MASTER_ROLE: &str = "master";

pub const FIELD_MANAGER: &str = "openshift-machineset-egress-cidr-operator";

/// annotation value meaning "explicitly no egress CIDRs"
pub const NO_CIDRS_SENTINEL: &str = "none";
