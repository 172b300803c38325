//! # Peer Reconciliation
//!
//! A gate that cannot reach the edge loads its persisted list, then asks
//! peers on `/device_majority_vote` and adopts a strict-majority snapshot.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ng_04_access_list_sync::{ReconcileResult, SyncOutcome};
    use node_runtime::GateRuntime;
    use shared_bus::InMemoryMessageBus;
    use tokio::sync::watch;
    use tokio::time::Instant;

    use crate::integration::support::{edge, gate, gate_config, ids, spawn_peer};

    #[tokio::test(start_paused = true)]
    async fn test_offline_gate_adopts_majority_list() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        for node in ["2", "3", "4"] {
            spawn_peer(&bus, node, &edge, &["A", "B"], shutdown_rx.clone());
        }
        let outlier = spawn_peer(&bus, "5", &edge, &["C"], shutdown_rx.clone());

        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        let outcome = runtime.start().await;

        assert_eq!(
            outcome,
            SyncOutcome::FellBack {
                loaded: 0,
                vote: Some(ReconcileResult::Applied { entries: 2 }),
            }
        );
        assert_eq!(runtime.container().access_list.snapshot(), ids(&["A", "B"]));
        assert_eq!(outlier.access_list.snapshot(), ids(&["C"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_split_vote_keeps_local_list() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        for (node, uids) in [("2", ["A"]), ("3", ["B"]), ("4", ["C"])] {
            spawn_peer(&bus, node, &edge, &uids, shutdown_rx.clone());
        }

        let container = gate(&bus, gate_config("1", &edge));
        container.access_list.replace_and_persist(ids(&["X"])).unwrap();
        let runtime = GateRuntime::new(container);
        let outcome = runtime.start().await;

        assert_eq!(
            outcome,
            SyncOutcome::FellBack {
                loaded: 1,
                vote: Some(ReconcileResult::Unchanged),
            }
        );
        assert_eq!(runtime.container().access_list.snapshot(), ids(&["X"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_ballot_closes_round_early() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = gate_config("1", &edge);
        let sync_window = config.sync.response_window();
        let round_window = config.majority_vote.round_window();
        for node in 2..=(config.majority_vote.max_participants + 1) {
            spawn_peer(&bus, &node.to_string(), &edge, &["A"], shutdown_rx.clone());
        }

        let runtime = GateRuntime::new(gate(&bus, config));
        let started = Instant::now();
        let outcome = runtime.start().await;
        let elapsed = started.elapsed();

        assert!(matches!(
            outcome,
            SyncOutcome::FellBack {
                vote: Some(ReconcileResult::Applied { entries: 1 }),
                ..
            }
        ));
        assert!(elapsed >= sync_window);
        assert!(elapsed < sync_window + round_window);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_gate_skips_vote() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        let container = gate(&bus, gate_config("1", &edge));
        container.access_list.replace_and_persist(ids(&["A"])).unwrap();
        bus.set_connected(false);

        let runtime = GateRuntime::new(container);
        let outcome = runtime.start().await;

        assert!(matches!(
            outcome,
            SyncOutcome::FellBack {
                loaded: 1,
                vote: Some(ReconcileResult::Skipped(_)),
            }
        ));
        assert_eq!(runtime.container().access_list.snapshot(), ids(&["A"]));
    }
}
