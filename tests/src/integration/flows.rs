//! # Edge Flows
//!
//! A gate talking to a scripted edge server over the bus:
//!
//! 1. **Boot sync**: `/request_access_list` answered on `/response_access_list`
//! 2. **Edge confirmation**: unknown scan, `/authenticate` then `/allow_authentication`
//! 3. **Revocation**: `/remove_uid` takes effect on the next scan
//! 4. **Restart**: the last accepted list survives a reboot without the edge
//! 5. **Re-sync**: a configured interval re-requests the list after boot

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use ng_02_crypto_gateway::test_helpers::{foreign_keypair, sign_access_list, sign_removal};
    use ng_03_authentication::{AuthenticationApi, Decision, ScanOutcome};
    use ng_04_access_list_sync::SyncOutcome;
    use node_runtime::{GateContainer, GateRuntime};
    use shared_bus::{InMemoryMessageBus, MessagePublisher, MessageSubscriber, TopicFilter};
    use shared_types::{decode, encode, topics, AuthenticateMessage, Identifier};

    use crate::integration::support::{
        edge, gate, gate_config, ids, spawn_list_server, spawn_verdict_server,
    };

    fn uid(value: &str) -> Identifier {
        Identifier::new(value).unwrap()
    }

    // =============================================================================
    // BOOT SYNC
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_boot_sync_installs_edge_list() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04A1", "04B2"]);

        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        let outcome = runtime.start().await;

        assert_eq!(outcome, SyncOutcome::Updated { entries: 2 });
        assert_eq!(runtime.container().access_list.snapshot(), ids(&["04A1", "04B2"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forged_push_leaves_list_unchanged() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04A1"]);
        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        runtime.start().await;

        let (impostor, _) = foreign_keypair();
        let forged = sign_access_list(&impostor, ids(&["FFFF"]));
        bus.publish(topics::ACCESS_LIST, encode(&forged).unwrap())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(runtime.container().access_list.snapshot(), ids(&["04A1"]));
    }

    // =============================================================================
    // AUTHENTICATION
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_edge_confirmation_is_cached() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04B2"]);
        spawn_verdict_server(&bus, &edge, &["04A1"]);
        let mut records = bus.subscribe(TopicFilter::topics([topics::AUTHENTICATE]));

        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        runtime.start().await;
        let authentication = runtime.container().authentication.clone();

        let first = authentication.authenticate(uid("04A1")).await;
        assert_eq!(first, ScanOutcome::Completed(Decision::Authorized));
        assert!(runtime.container().access_list.contains(&uid("04A1")));

        let second = authentication.authenticate(uid("04A1")).await;
        assert_eq!(second, ScanOutcome::Completed(Decision::Authorized));

        let results: Vec<bool> = std::iter::from_fn(|| records.try_recv().unwrap())
            .map(|m| decode::<AuthenticateMessage>(&m.payload).unwrap().result)
            .collect();
        assert_eq!(results, vec![false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edge_rejection_denies_and_does_not_cache() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04B2"]);
        spawn_verdict_server(&bus, &edge, &[]);

        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        runtime.start().await;

        let outcome = runtime.container().authentication.authenticate(uid("04A1")).await;
        assert_eq!(outcome, ScanOutcome::Completed(Decision::Denied));
        assert!(!runtime.container().access_list.contains(&uid("04A1")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_revocation_applies_to_next_scan() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04A1", "04B2"]);
        spawn_verdict_server(&bus, &edge, &[]);

        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        runtime.start().await;
        let container = runtime.container();
        assert_eq!(
            container.authentication.authenticate(uid("04A1")).await,
            ScanOutcome::Completed(Decision::Authorized)
        );

        let removal = sign_removal(&edge.key, uid("04A1"));
        bus.publish(topics::REMOVE_UID, encode(&removal).unwrap())
            .await
            .unwrap();
        while container.access_list.contains(&uid("04A1")) {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            container.authentication.authenticate(uid("04A1")).await,
            ScanOutcome::Completed(Decision::Denied)
        );
        assert_eq!(container.access_list.snapshot(), ids(&["04B2"]));
    }

    // =============================================================================
    // RESTART
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_restart_without_edge_restores_last_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let edge = edge();
        let mut config = gate_config("1", &edge);
        config.storage.path = Some(dir.path().join("access_list.db"));
        config.sync.majority_vote_on_fallback = false;

        let first = GateContainer::new(config.clone()).unwrap();
        spawn_list_server(&first.bus, &edge, &["04A1", "04B2", "04C3"]);
        let runtime = GateRuntime::new(first);
        assert_eq!(runtime.start().await, SyncOutcome::Updated { entries: 3 });
        runtime.shutdown().await;
        drop(runtime);

        let second = GateContainer::new(config).unwrap();
        second.bus.set_connected(false);
        let runtime = GateRuntime::new(second);
        let outcome = runtime.start().await;

        assert_eq!(
            outcome,
            SyncOutcome::FellBack {
                loaded: 3,
                vote: None
            }
        );
        assert_eq!(
            runtime.container().access_list.snapshot(),
            ids(&["04A1", "04B2", "04C3"])
        );
    }

    // =============================================================================
    // RE-SYNC
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_resync_interval_re_requests_list_until_shutdown() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04A1"]);

        let requests = Arc::new(AtomicUsize::new(0));
        let mut seen = bus.subscribe(TopicFilter::topics([topics::REQUEST_ACCESS_LIST]));
        tokio::spawn({
            let requests = requests.clone();
            async move {
                while seen.recv().await.is_some() {
                    requests.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        let mut config = gate_config("1", &edge);
        config.sync.resync_interval = Some(Duration::from_secs(60));
        let runtime = GateRuntime::new(gate(&bus, config));
        runtime.start().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(requests.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(requests.load(Ordering::SeqCst), 3);

        runtime.shutdown().await;
        tokio::time::sleep(Duration::from_secs(180)).await;
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_resync_without_interval() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let edge = edge();
        spawn_list_server(&bus, &edge, &["04A1"]);
        let mut seen = bus.subscribe(TopicFilter::topics([topics::REQUEST_ACCESS_LIST]));

        let runtime = GateRuntime::new(gate(&bus, gate_config("1", &edge)));
        runtime.start().await;
        assert!(seen.recv().await.is_some());

        let extra = tokio::time::timeout(Duration::from_secs(600), seen.recv()).await;
        assert!(extra.is_err());
    }
}
