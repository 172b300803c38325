//! # Majority Vote Service
//!
//! One round at a time. Responses land in the open round's ballot from the
//! dispatcher task; a full ballot ends the round early.

use crate::domain::ballot::{Ballot, SubmitOutcome};
use crate::domain::config::MajorityVoteConfig;
use crate::domain::errors::VoteError;
use crate::domain::state::{ResponseDisposition, RoundOutcome, VoteState};
use crate::domain::tally::tally;
use crate::ports::inbound::MajorityVoteApi;
use async_trait::async_trait;
use ng_01_access_store::{AccessListRepository, AccessStoreError};
use parking_lot::Mutex;
use shared_bus::MessagePublisher;
use shared_types::{
    decode, encode, topics, MajorityVoteRequest, MajorityVoteResponse, NodeId, SingleFlight,
};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Dependencies for MajorityVoteService
pub struct MajorityVoteDependencies<P> {
    pub publisher: Arc<P>,
    pub access_list: Arc<AccessListRepository>,
    pub node_id: NodeId,
    pub config: MajorityVoteConfig,
}

struct Round {
    ballot: Ballot,
    full: Arc<Notify>,
}

pub struct MajorityVoteService<P: MessagePublisher> {
    publisher: Arc<P>,
    access_list: Arc<AccessListRepository>,
    node_id: NodeId,
    config: MajorityVoteConfig,
    flight: SingleFlight,
    round: Mutex<Option<Round>>,
    state: Mutex<VoteState>,
}

impl<P: MessagePublisher> MajorityVoteService<P> {
    pub fn new(deps: MajorityVoteDependencies<P>) -> Self {
        Self {
            publisher: deps.publisher,
            access_list: deps.access_list,
            node_id: deps.node_id,
            config: deps.config,
            flight: SingleFlight::new(),
            round: Mutex::new(None),
            state: Mutex::new(VoteState::Idle),
        }
    }

    #[must_use]
    pub fn is_voting(&self) -> bool {
        self.flight.is_busy()
    }

    fn set_state(&self, state: VoteState) {
        *self.state.lock() = state;
    }

    fn open_round(&self) -> Arc<Notify> {
        let full = Arc::new(Notify::new());
        *self.round.lock() = Some(Round {
            ballot: Ballot::new(self.config.max_participants, self.config.dedup_by_peer),
            full: full.clone(),
        });
        full
    }

    fn close_round(&self) -> Option<Ballot> {
        self.round.lock().take().map(|round| round.ballot)
    }

    async fn solicit(&self) -> Result<Ballot, VoteError> {
        let full = self.open_round();
        self.set_state(VoteState::Soliciting);

        let request = MajorityVoteRequest {
            node_id: self.node_id.clone(),
        };
        let sent = match encode(&request) {
            Ok(payload) => self
                .publisher
                .publish(topics::MAJORITY_VOTE, payload)
                .await
                .map_err(VoteError::from),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = sent {
            self.close_round();
            return Err(e);
        }
        info!("[ng-05] 🗳️ Majority vote opened by node {}", self.node_id);

        if tokio::time::timeout(self.config.round_window(), full.notified())
            .await
            .is_ok()
        {
            debug!("[ng-05] Ballot full, closing round early");
        }

        let capacity = self.config.max_participants;
        Ok(self
            .close_round()
            .unwrap_or_else(|| Ballot::new(capacity, self.config.dedup_by_peer)))
    }

    fn decide(&self, ballot: Ballot) -> Result<RoundOutcome, VoteError> {
        self.set_state(VoteState::Tallying);
        let local = self.access_list.snapshot();
        let result = tally(&local, &ballot.into_snapshots());

        if !result.has_majority() {
            info!(
                best_votes = result.votes,
                threshold = result.threshold,
                participants = result.participants,
                "[ng-05] No majority reached, access list unchanged"
            );
            return Ok(RoundOutcome::Unchanged {
                best_votes: result.votes,
                threshold: result.threshold,
                participants: result.participants,
            });
        }

        let entries = match self.access_list.replace_and_persist(result.winner) {
            Ok(entries) => entries,
            Err(AccessStoreError::Persistence(e)) => {
                warn!("[ng-05] Majority list applied but not persisted: {}", e);
                self.access_list.len()
            }
            Err(e) => return Err(e.into()),
        };
        info!(
            entries,
            votes = result.votes,
            participants = result.participants,
            "[ng-05] ✅ Majority list applied"
        );
        Ok(RoundOutcome::Applied {
            entries,
            votes: result.votes,
            participants: result.participants,
        })
    }
}

#[async_trait]
impl<P: MessagePublisher> MajorityVoteApi for MajorityVoteService<P> {
    async fn run_round(&self) -> Result<RoundOutcome, VoteError> {
        let Some(_flight) = self.flight.try_acquire() else {
            warn!("[ng-05] Majority vote already in progress, trigger rejected");
            return Err(VoteError::AlreadyInProgress);
        };

        let outcome = match self.solicit().await {
            Ok(ballot) => self.decide(ballot),
            Err(e) => Err(e),
        };
        self.set_state(VoteState::Idle);
        outcome
    }

    fn handle_response(&self, payload: &[u8]) -> ResponseDisposition {
        let response = match decode::<MajorityVoteResponse>(payload) {
            Ok(r) => r,
            Err(e) => {
                warn!("[ng-05] Discarding malformed vote response: {}", e);
                return ResponseDisposition::Malformed;
            }
        };
        if response.node_id == self.node_id {
            return ResponseDisposition::OwnResponse;
        }

        let mut guard = self.round.lock();
        let Some(round) = guard.as_mut() else {
            debug!("[ng-05] Vote response from {} outside a round", response.node_id);
            return ResponseDisposition::NoRound;
        };

        let peer = response.node_id.clone();
        match round.ballot.submit(response.node_id, response.uids) {
            SubmitOutcome::Accepted => {
                debug!(peer = %peer, votes = round.ballot.len(), "[ng-05] Vote recorded");
                if round.ballot.is_full() {
                    round.full.notify_one();
                }
                ResponseDisposition::Accepted
            }
            SubmitOutcome::Duplicate => {
                debug!(peer = %peer, "[ng-05] Repeat vote ignored");
                ResponseDisposition::Duplicate
            }
            SubmitOutcome::Dropped => ResponseDisposition::Dropped,
        }
    }

    async fn handle_request(&self, payload: &[u8]) -> Result<bool, VoteError> {
        let request = decode::<MajorityVoteRequest>(payload)?;
        if request.node_id == self.node_id {
            return Ok(false);
        }

        let response = MajorityVoteResponse {
            node_id: self.node_id.clone(),
            uids: self.access_list.snapshot(),
        };
        self.publisher
            .publish(topics::MAJORITY_RESPONSE, encode(&response)?)
            .await?;
        debug!(
            requester = %request.node_id,
            entries = response.uids.len(),
            "[ng-05] Snapshot sent for majority vote"
        );
        Ok(true)
    }

    fn state(&self) -> VoteState {
        *self.state.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ng_01_access_store::{InMemoryKVStore, StorageLayout};
    use shared_bus::{InMemoryMessageBus, MessageSubscriber, TopicFilter};
    use shared_types::Identifier;
    use std::time::Duration;

    struct Fixture {
        service: Arc<MajorityVoteService<InMemoryMessageBus>>,
        bus: Arc<InMemoryMessageBus>,
        access_list: Arc<AccessListRepository>,
    }

    fn ids(values: &[&str]) -> Vec<Identifier> {
        values.iter().map(|v| Identifier::new(*v).unwrap()).collect()
    }

    fn node(n: u32) -> NodeId {
        NodeId::new(n.to_string()).unwrap()
    }

    fn fixture_with(config: MajorityVoteConfig) -> Fixture {
        let bus = Arc::new(InMemoryMessageBus::new());
        let access_list = Arc::new(AccessListRepository::new(
            100,
            Box::new(InMemoryKVStore::new()),
            StorageLayout::default(),
        ));
        let service = MajorityVoteService::new(MajorityVoteDependencies {
            publisher: bus.clone(),
            access_list: access_list.clone(),
            node_id: node(1),
            config,
        });
        Fixture {
            service: Arc::new(service),
            bus,
            access_list,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MajorityVoteConfig::default())
    }

    fn vote(peer: u32, uids: &[&str]) -> Vec<u8> {
        encode(&MajorityVoteResponse {
            node_id: node(peer),
            uids: ids(uids),
        })
        .unwrap()
    }

    /// Start a round and wait for its solicitation to go out.
    async fn open(f: &Fixture) -> tokio::task::JoinHandle<Result<RoundOutcome, VoteError>> {
        let mut requests = f.bus.subscribe(TopicFilter::topics([topics::MAJORITY_VOTE]));
        let handle = tokio::spawn({
            let service = f.service.clone();
            async move { service.run_round().await }
        });
        let message = requests.recv().await.unwrap();
        let request: MajorityVoteRequest = decode(&message.payload).unwrap();
        assert_eq!(request.node_id, node(1));
        handle
    }

    #[tokio::test(start_paused = true)]
    async fn test_majority_applied_after_window() {
        let f = fixture();
        f.access_list.replace_and_persist(ids(&["STALE"])).unwrap();
        let round = open(&f).await;
        assert_eq!(f.service.state(), VoteState::Soliciting);

        for peer in 2..=4 {
            assert_eq!(f.service.handle_response(&vote(peer, &["A", "B"])), ResponseDisposition::Accepted);
        }
        f.service.handle_response(&vote(5, &["C"]));

        let started = tokio::time::Instant::now();
        let outcome = round.await.unwrap().unwrap();

        assert_eq!(started.elapsed(), MajorityVoteConfig::default().round_window());
        assert_eq!(
            outcome,
            RoundOutcome::Applied {
                entries: 2,
                votes: 3,
                participants: 5
            }
        );
        assert_eq!(f.access_list.snapshot(), ids(&["A", "B"]));
        assert_eq!(f.service.state(), VoteState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_split_vote_leaves_list_unchanged() {
        let f = fixture();
        f.access_list.replace_and_persist(ids(&["A"])).unwrap();
        let round = open(&f).await;

        f.service.handle_response(&vote(2, &["A"]));
        f.service.handle_response(&vote(3, &["B"]));
        f.service.handle_response(&vote(4, &["B"]));
        f.service.handle_response(&vote(5, &["C"]));

        let outcome = round.await.unwrap().unwrap();
        assert_eq!(
            outcome,
            RoundOutcome::Unchanged {
                best_votes: 2,
                threshold: 3,
                participants: 5
            }
        );
        assert_eq!(f.access_list.snapshot(), ids(&["A"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_ballot_ends_round_early() {
        let f = fixture_with(MajorityVoteConfig {
            max_participants: 2,
            ..MajorityVoteConfig::default()
        });
        let round = open(&f).await;
        let started = tokio::time::Instant::now();

        f.service.handle_response(&vote(2, &["A"]));
        f.service.handle_response(&vote(3, &["A"]));
        assert_eq!(f.service.handle_response(&vote(4, &["B"])), ResponseDisposition::Dropped);

        let outcome = round.await.unwrap().unwrap();
        assert!(started.elapsed() < Duration::from_millis(1));
        assert!(matches!(outcome, RoundOutcome::Applied { votes: 2, participants: 3, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_votes_counted_once() {
        let f = fixture();
        let round = open(&f).await;

        f.service.handle_response(&vote(2, &["EVIL"]));
        assert_eq!(f.service.handle_response(&vote(2, &["EVIL"])), ResponseDisposition::Duplicate);
        assert_eq!(f.service.handle_response(&vote(1, &["EVIL"])), ResponseDisposition::OwnResponse);

        let outcome = round.await.unwrap().unwrap();
        assert!(matches!(outcome, RoundOutcome::Unchanged { participants: 2, .. }));
        assert!(f.access_list.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_votes_counted_without_dedup() {
        let f = fixture_with(MajorityVoteConfig {
            dedup_by_peer: false,
            ..MajorityVoteConfig::default()
        });
        let round = open(&f).await;

        f.service.handle_response(&vote(2, &["EVIL"]));
        f.service.handle_response(&vote(2, &["EVIL"]));

        let outcome = round.await.unwrap().unwrap();
        assert!(matches!(outcome, RoundOutcome::Applied { votes: 2, participants: 3, .. }));
        assert_eq!(f.access_list.snapshot(), ids(&["EVIL"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_round_rejected() {
        let f = fixture();
        let round = open(&f).await;

        assert!(matches!(f.service.run_round().await, Err(VoteError::AlreadyInProgress)));
        assert!(round.await.unwrap().is_ok());
        assert!(!f.service.is_voting());
    }

    #[tokio::test]
    async fn test_disconnected_bus_aborts_round() {
        let f = fixture();
        f.bus.set_connected(false);

        assert!(matches!(f.service.run_round().await, Err(VoteError::Publish(_))));
        assert_eq!(f.service.handle_response(&vote(2, &["A"])), ResponseDisposition::NoRound);
        assert!(!f.service.is_voting());
    }

    #[test]
    fn test_response_outside_round() {
        let f = fixture();
        assert_eq!(f.service.handle_response(&vote(2, &["A"])), ResponseDisposition::NoRound);
        assert_eq!(f.service.handle_response(b"{\"node_id\":2}"), ResponseDisposition::Malformed);
    }

    #[tokio::test]
    async fn test_answers_peer_request_with_snapshot() {
        let f = fixture();
        f.access_list.replace_and_persist(ids(&["A", "B"])).unwrap();
        let mut responses = f.bus.subscribe(TopicFilter::topics([topics::MAJORITY_RESPONSE]));

        let request = encode(&MajorityVoteRequest { node_id: node(7) }).unwrap();
        assert!(f.service.handle_request(&request).await.unwrap());

        let message = responses.recv().await.unwrap();
        let response: MajorityVoteResponse = decode(&message.payload).unwrap();
        assert_eq!(response.node_id, node(1));
        assert_eq!(response.uids, ids(&["A", "B"]));
    }

    #[tokio::test]
    async fn test_ignores_own_request() {
        let f = fixture();
        let mut responses = f.bus.subscribe(TopicFilter::topics([topics::MAJORITY_RESPONSE]));

        let request = encode(&MajorityVoteRequest { node_id: node(1) }).unwrap();
        assert!(!f.service.handle_request(&request).await.unwrap());
        assert!(responses.try_recv().unwrap().is_none());
    }
}
