use std::{num::ParseIntError, time::Duration};

use machineset_egress_cidr_core::MACHINE_NAMESPACE;
use thiserror::Error;

pub const MACHINE_NAMESPACE_ENV: &str = "MECO_MACHINE_NAMESPACE";
pub const RESYNC_SECS_ENV: &str = "MECO_RESYNC_SECS";

const DEFAULT_RESYNC_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    /// namespace watched for Machines and MachineSets
    pub machine_namespace: String,
    /// how often every known HostSubnet is reconciled again, `None` disables it
    pub resync_interval: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} must not be empty!", .0)]
    EmptyValue(&'static str),
    #[error("{} is not a valid number of seconds: {}", .0, .1)]
    InvalidSeconds(&'static str, ParseIntError),
}

impl OperatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let machine_namespace = match lookup(MACHINE_NAMESPACE_ENV) {
            Some(namespace) if namespace.trim().is_empty() => {
                return Err(ConfigError::EmptyValue(MACHINE_NAMESPACE_ENV))
            }
            Some(namespace) => namespace.trim().to_owned(),
            None => MACHINE_NAMESPACE.to_owned(),
        };

        let resync_secs = match lookup(RESYNC_SECS_ENV) {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map_err(|err| ConfigError::InvalidSeconds(RESYNC_SECS_ENV, err))?,
            None => DEFAULT_RESYNC_SECS,
        };

        Ok(Self {
            machine_namespace,
            resync_interval: match resync_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        })
    }
}
