//! Shared fixtures: gate construction and scripted edge responders.

use std::sync::Arc;

use ng_01_access_store::{InMemoryKVStore, KeyValueStore};
use ng_02_crypto_gateway::test_helpers::{
    edge_keypair, sign_access_list, sign_verdict, EdgeSigningKey,
};
use node_runtime::{GateConfig, GateContainer, GateHardware};
use shared_bus::{InMemoryMessageBus, MessagePublisher, MessageSubscriber, TopicFilter};
use shared_types::{decode, encode, topics, AuthenticateMessage, Identifier};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub(crate) struct Edge {
    pub key: EdgeSigningKey,
    pub trusted: String,
}

pub(crate) fn edge() -> Edge {
    let (key, trusted) = edge_keypair();
    Edge { key, trusted }
}

pub(crate) fn ids(values: &[&str]) -> Vec<Identifier> {
    values.iter().map(|v| Identifier::new(*v).unwrap()).collect()
}

pub(crate) fn gate_config(node_id: &str, edge: &Edge) -> GateConfig {
    let mut config = GateConfig::default();
    config.node.node_id = node_id.to_string();
    config.storage.path = None;
    config.security.trusted_public_key = Some(edge.trusted.clone());
    config
}

pub(crate) fn gate(bus: &Arc<InMemoryMessageBus>, config: GateConfig) -> GateContainer {
    gate_with_store(bus, config, Box::new(InMemoryKVStore::new()))
}

pub(crate) fn gate_with_store(
    bus: &Arc<InMemoryMessageBus>,
    config: GateConfig,
    store: Box<dyn KeyValueStore>,
) -> GateContainer {
    GateContainer::with_parts(config, bus.clone(), store, GateHardware::logging()).unwrap()
}

/// Peer gate holding `uids`, answering vote requests until `shutdown` flips.
pub(crate) fn spawn_peer(
    bus: &Arc<InMemoryMessageBus>,
    node_id: &str,
    edge: &Edge,
    uids: &[&str],
    shutdown: watch::Receiver<bool>,
) -> Arc<GateContainer> {
    let peer = Arc::new(gate(bus, gate_config(node_id, edge)));
    peer.access_list.replace_and_persist(ids(uids)).unwrap();
    let dispatcher = node_runtime::wiring::InboundDispatcher::new(peer.clone());
    tokio::spawn(dispatcher.run(shutdown));
    peer
}

/// Edge task answering every list request with a signed `uids`.
pub(crate) fn spawn_list_server(
    bus: &Arc<InMemoryMessageBus>,
    edge: &Edge,
    uids: &[&str],
) -> JoinHandle<()> {
    let mut requests = bus.subscribe(TopicFilter::topics([topics::REQUEST_ACCESS_LIST]));
    let response = encode(&sign_access_list(&edge.key, ids(uids))).unwrap();
    let bus = bus.clone();
    tokio::spawn(async move {
        while requests.recv().await.is_some() {
            bus.publish(topics::RESPONSE_ACCESS_LIST, response.clone())
                .await
                .unwrap();
        }
    })
}

/// Edge task answering unresolved scans, granting only `allowed`.
pub(crate) fn spawn_verdict_server(
    bus: &Arc<InMemoryMessageBus>,
    edge: &Edge,
    allowed: &[&str],
) -> JoinHandle<()> {
    let mut records = bus.subscribe(TopicFilter::topics([topics::AUTHENTICATE]));
    let allowed = ids(allowed);
    let key = edge.key.clone();
    let bus = bus.clone();
    tokio::spawn(async move {
        while let Some(message) = records.recv().await {
            let record: AuthenticateMessage = decode(&message.payload).unwrap();
            let Some(uid) = record.uid.filter(|_| !record.result) else {
                continue;
            };
            let granted = allowed.contains(&uid);
            let verdict = sign_verdict(&key, uid, record.node_id, granted);
            bus.publish(topics::ALLOW_AUTHENTICATION, encode(&verdict).unwrap())
                .await
                .unwrap();
        }
    })
}
