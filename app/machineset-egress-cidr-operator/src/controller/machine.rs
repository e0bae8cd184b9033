use futures::{Future, StreamExt, TryStreamExt};
use kube::{
    runtime::{
        reflector::{self, reflector, Store},
        watcher::{watcher, Config, Event},
    },
    Client, ResourceExt,
};
use log::info;
use machineset_egress_cidr_core::{kubernetes::GetApi, resources::machine::Machine};
use tokio::sync::watch::{self, Receiver};

use crate::helpers::{log_watcher_error, with_watch_backoff};

/// Mirrors Machines of `namespace` into a store. The receiver flips to `true`
/// once the initial listing went through.
pub fn start_machine_reflector(
    client: &Client,
    namespace: &str,
) -> (impl Future<Output = ()>, Store<Machine>, Receiver<bool>) {
    let (tx, rx) = watch::channel(false);

    let watcher_config = Config::default();
    let watcher = watcher(client.namespaced_api::<Machine>(namespace), watcher_config);
    let watcher = with_watch_backoff(watcher).map_ok(|event| {
        // only the labels are of any interest
        event.modify(|machine| {
            machine.managed_fields_mut().clear();
            machine.annotations_mut().clear();
            machine.owner_references_mut().clear();
            machine.finalizers_mut().clear();
        })
    });

    let (store, writer) = reflector::store();
    let reflector = reflector(writer, watcher).for_each(move |event| {
        match event {
            Ok(Event::Restarted(machines)) => {
                info!("Machine cache synced ({} machines)", machines.len());
                tx.send_replace(true);
            }
            Ok(_) => (),
            Err(err) => log_watcher_error::<Machine>(&err),
        }

        std::future::ready(())
    });

    (reflector, store, rx)
}
