use std::fmt::Display;

/// Decision taken by a successful reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// control plane machines are never touched
    IgnoredRole,
    /// no egress CIDRs are declared for the owning MachineSet
    NoEntry,
    UpToDate,
    Updated,
}

impl Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileOutcome::IgnoredRole => f.write_str("ignore master"),
            ReconcileOutcome::NoEntry => f.write_str("no cidr entry"),
            ReconcileOutcome::UpToDate => f.write_str("up to date"),
            ReconcileOutcome::Updated => f.write_str("updated"),
        }
    }
}
