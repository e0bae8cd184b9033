use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("HostSubnet is missing metadata!")]
    MissingObjectMetadata,
    #[error("error getMachine: {}", .0)]
    GetMachine(anyhow::Error),
    #[error("error: no machineset label")]
    MissingMachineSetLabel,
    #[error("error update hostsubnet: {}", .0)]
    UpdateHostSubnet(anyhow::Error),
}
