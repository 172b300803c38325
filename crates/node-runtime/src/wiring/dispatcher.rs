//! # Inbound Dispatcher
//!
//! One task owns the bus subscription and hands each message to its
//! service. Handlers never block on a protocol window, so a pending scan
//! or vote round cannot stall delivery of the message that completes it.

use std::sync::Arc;

use ng_03_authentication::VerdictDisposition;
use ng_04_access_list_sync::AccessListSyncApi;
use ng_05_majority_vote::MajorityVoteApi;
use shared_bus::{BusMessage, MessageStream, MessageSubscriber, TopicFilter};
use shared_types::topics;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::container::GateContainer;

/// Topics a gate node subscribes to.
pub const INBOUND_TOPICS: [&str; 6] = [
    topics::ALLOW_AUTHENTICATION,
    topics::ACCESS_LIST,
    topics::RESPONSE_ACCESS_LIST,
    topics::REMOVE_UID,
    topics::MAJORITY_VOTE,
    topics::MAJORITY_RESPONSE,
];

pub struct InboundDispatcher {
    container: Arc<GateContainer>,
    messages: MessageStream,
}

impl InboundDispatcher {
    /// Subscribe immediately so nothing published after construction is missed.
    pub fn new(container: Arc<GateContainer>) -> Self {
        let messages = container
            .bus
            .subscribe(TopicFilter::topics(INBOUND_TOPICS))
            .into_stream();
        Self {
            container,
            messages,
        }
    }

    /// Run until the bus closes or `shutdown` flips.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[{}] Inbound dispatcher started", self.container.node_id);
        loop {
            tokio::select! {
                message = self.messages.next() => match message {
                    Some(message) => self.dispatch(message).await,
                    None => {
                        info!("Bus closed, dispatcher exiting");
                        break;
                    }
                },
                _ = shutdown.changed() => {
                    info!("Dispatcher shutdown signal received");
                    break;
                }
            }
        }
    }

    pub async fn dispatch(&self, message: BusMessage) {
        let payload = message.payload.as_slice();
        match message.topic.as_str() {
            topics::ALLOW_AUTHENTICATION => {
                let disposition = self.container.authentication.handle_verdict_payload(payload);
                if let VerdictDisposition::Resolved(result) = disposition {
                    debug!(result, "Edge verdict delivered");
                }
            }
            topics::ACCESS_LIST => {
                let _ = self.container.sync.handle_push(payload);
            }
            topics::RESPONSE_ACCESS_LIST => {
                let _ = self.container.sync.handle_response(payload);
            }
            topics::REMOVE_UID => {
                let _ = self.container.sync.handle_removal(payload);
            }
            topics::MAJORITY_VOTE => {
                if let Err(e) = self.container.majority_vote.handle_request(payload).await {
                    warn!("[ng-05] Vote request not answered: {}", e);
                }
            }
            topics::MAJORITY_RESPONSE => {
                self.container.majority_vote.handle_response(payload);
            }
            other => debug!(topic = other, "No handler for topic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{GateConfig, GateHardware};
    use ng_01_access_store::InMemoryKVStore;
    use ng_02_crypto_gateway::test_helpers::{
        edge_keypair, sign_access_list, sign_removal, EdgeSigningKey,
    };
    use shared_bus::{InMemoryMessageBus, MessagePublisher};
    use shared_types::{encode, Identifier, MajorityVoteRequest, MajorityVoteResponse, NodeId};

    fn ids(values: &[&str]) -> Vec<Identifier> {
        values.iter().map(|v| Identifier::new(*v).unwrap()).collect()
    }

    fn container() -> (Arc<GateContainer>, EdgeSigningKey) {
        let (edge_key, trusted) = edge_keypair();
        let mut config = GateConfig::default();
        config.storage.path = None;
        config.security.trusted_public_key = Some(trusted);
        let container = GateContainer::with_parts(
            config,
            Arc::new(InMemoryMessageBus::new()),
            Box::new(InMemoryKVStore::new()),
            GateHardware::logging(),
        )
        .unwrap();
        (Arc::new(container), edge_key)
    }

    #[tokio::test]
    async fn test_routes_list_updates() {
        let (container, edge_key) = container();
        let dispatcher = InboundDispatcher::new(container.clone());

        let push = sign_access_list(&edge_key, ids(&["A", "B"]));
        dispatcher
            .dispatch(BusMessage::new(topics::ACCESS_LIST, encode(&push).unwrap()))
            .await;
        assert_eq!(container.access_list.snapshot(), ids(&["A", "B"]));

        let removal = sign_removal(&edge_key, Identifier::new("A").unwrap());
        dispatcher
            .dispatch(BusMessage::new(topics::REMOVE_UID, encode(&removal).unwrap()))
            .await;
        assert_eq!(container.access_list.snapshot(), ids(&["B"]));
    }

    #[tokio::test]
    async fn test_answers_peer_vote_request() {
        let (container, _) = container();
        container.access_list.insert(Identifier::new("A").unwrap());
        let mut responses = container
            .bus
            .subscribe(TopicFilter::topics([topics::MAJORITY_RESPONSE]));
        let dispatcher = InboundDispatcher::new(container.clone());

        let request = MajorityVoteRequest {
            node_id: NodeId::new("9").unwrap(),
        };
        dispatcher
            .dispatch(BusMessage::new(topics::MAJORITY_VOTE, encode(&request).unwrap()))
            .await;

        let message = responses.recv().await.unwrap();
        let response: MajorityVoteResponse = shared_types::decode(&message.payload).unwrap();
        assert_eq!(response.uids, ids(&["A"]));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (container, edge_key) = container();
        let dispatcher = InboundDispatcher::new(container.clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(dispatcher.run(shutdown_rx));

        let push = sign_access_list(&edge_key, ids(&["A"]));
        container
            .bus
            .publish(topics::ACCESS_LIST, encode(&push).unwrap())
            .await
            .unwrap();
        while container.access_list.is_empty() {
            tokio::task::yield_now().await;
        }

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
        assert_eq!(container.access_list.snapshot(), ids(&["A"]));
    }
}
