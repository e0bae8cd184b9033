use futures::Stream;
use kube::runtime::{
    watcher::{default_backoff, Error as WatcherError},
    WatchStreamExt,
};
use log::{debug, error, info, warn};
use machineset_egress_cidr_core::{
    helpers::pretty_type_name,
    reconciler::{error::ReconcilerError, ReconcileOutcome},
};

pub fn log_reconcile_result(name: &str, result: &Result<ReconcileOutcome, ReconcilerError>) {
    match result {
        Ok(ReconcileOutcome::Updated) => info!("HostSubnet<{name}>: {}", ReconcileOutcome::Updated),
        Ok(outcome) => debug!("HostSubnet<{name}>: {outcome}"),
        Err(err) => warn!("HostSubnet<{name}>: reconciliation failed: {err}"),
    }
}

pub fn log_watcher_error<T>(err: &WatcherError) {
    error!("{} watcher has failed! {err:#?}", pretty_type_name::<T>())
}

/// Delays polling a watch stream again after it yielded an error, the watcher
/// itself would retry right away.
pub fn with_watch_backoff<S, T, E>(events: S) -> impl Stream<Item = Result<T, E>>
where
    S: Stream<Item = Result<T, E>>,
{
    events.backoff(default_backoff())
}

#[cfg(test)]
mod tests {
    use std::{pin::pin, time::Duration};

    use futures::{stream, StreamExt};
    use tokio::time::Instant;

    use super::with_watch_backoff;

    #[tokio::test(start_paused = true)]
    async fn watch_errors_are_backed_off() {
        let events = stream::iter([Ok(1), Err("api server unavailable"), Ok(2)]);
        let mut events = pin!(with_watch_backoff(events));
        let start = Instant::now();

        assert_eq!(events.next().await, Some(Ok(1)));
        assert_eq!(events.next().await, Some(Err("api server unavailable")));
        assert_eq!(start.elapsed(), Duration::ZERO);

        assert_eq!(events.next().await, Some(Ok(2)));
        assert!(start.elapsed() > Duration::ZERO);

        assert_eq!(events.next().await, None);
    }
}
