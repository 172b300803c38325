//! # Access List Sync Service
//!
//! Every inbound update is verified before it touches the repository.
//! A full replace that reaches memory also releases a pending request.

use crate::config::SyncConfig;
use crate::domain::outcome::{SyncOutcome, UpdateApplied};
use crate::domain::waiter::UpdateWaiter;
use crate::error::SyncError;
use crate::ports::inbound::AccessListSyncApi;
use crate::ports::outbound::MajorityVoteTrigger;
use async_trait::async_trait;
use ng_01_access_store::{AccessListRepository, AccessStoreError};
use ng_02_crypto_gateway::CryptoGatewayApi;
use shared_bus::MessagePublisher;
use shared_types::{
    decode, topics, AccessListPush, AccessListResponse, Identifier, Indicator, IndicatorLed,
    KeyRotationList, RemoveUidMessage, SingleFlight, WaitIndicator,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dependencies for AccessListSyncService
pub struct SyncDependencies<P, C, V> {
    pub publisher: Arc<P>,
    pub crypto: Arc<C>,
    pub access_list: Arc<AccessListRepository>,
    pub vote: Arc<V>,
    pub indicator: Arc<dyn Indicator>,
    pub config: SyncConfig,
}

pub struct AccessListSyncService<P, C, V>
where
    P: MessagePublisher,
    C: CryptoGatewayApi,
    V: MajorityVoteTrigger,
{
    publisher: Arc<P>,
    crypto: Arc<C>,
    access_list: Arc<AccessListRepository>,
    vote: Arc<V>,
    indicator: Arc<dyn Indicator>,
    config: SyncConfig,
    flight: SingleFlight,
    waiter: UpdateWaiter,
}

impl<P, C, V> AccessListSyncService<P, C, V>
where
    P: MessagePublisher,
    C: CryptoGatewayApi,
    V: MajorityVoteTrigger,
{
    pub fn new(deps: SyncDependencies<P, C, V>) -> Self {
        Self {
            publisher: deps.publisher,
            crypto: deps.crypto,
            access_list: deps.access_list,
            vote: deps.vote,
            indicator: deps.indicator,
            config: deps.config,
            flight: SingleFlight::new(),
            waiter: UpdateWaiter::new(),
        }
    }

    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.flight.is_busy()
    }

    async fn fall_back(&self) -> SyncOutcome {
        self.waiter.clear();
        let loaded = match self.access_list.load() {
            Ok(count) => count,
            Err(e) => {
                warn!("[ng-04] Persisted access list unusable, keeping current list: {}", e);
                0
            }
        };

        let vote = if self.config.majority_vote_on_fallback {
            info!("[ng-04] Reconciling with peers");
            Some(self.vote.reconcile().await)
        } else {
            None
        };
        SyncOutcome::FellBack { loaded, vote }
    }

    fn apply_list(&self, uids: Vec<Identifier>) -> Result<UpdateApplied, SyncError> {
        match self.access_list.replace_and_persist(uids) {
            Ok(entries) => {
                self.waiter.notify(entries);
                Ok(UpdateApplied::Replaced { entries })
            }
            Err(e @ AccessStoreError::Persistence(_)) => {
                self.waiter.notify(self.access_list.len());
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn apply_push(&self, push: AccessListPush) -> Result<UpdateApplied, SyncError> {
        match push {
            AccessListPush::Signed(list) => {
                self.crypto
                    .verify_access_list(&list.uids, &list.signature)
                    .into_result()
                    .map_err(SyncError::InvalidSignature)?;
                self.apply_list(list.uids)
            }
            AccessListPush::Unsigned(uids) if self.config.accept_unsigned_lists => {
                debug!("[ng-04] Applying unsigned list ({} entries)", uids.len());
                self.apply_list(uids)
            }
            AccessListPush::Unsigned(_) => Err(SyncError::UnsignedRejected),
        }
    }

    fn apply_rotation(&self, rotation: KeyRotationList) -> Result<UpdateApplied, SyncError> {
        self.crypto
            .verify_key_rotation(&rotation)
            .into_result()
            .map_err(SyncError::InvalidSignature)?;

        let capacity = self.access_list.capacity();
        if rotation.access_list.len() > capacity {
            return Err(AccessStoreError::CapacityExceeded {
                requested: rotation.access_list.len(),
                capacity,
            }
            .into());
        }

        self.crypto
            .install_encryption_key(&rotation.public_key)
            .map_err(SyncError::KeyRotation)?;
        info!("[ng-04] 🔑 Edge encryption key rotated");
        self.apply_list(rotation.access_list)
    }

    fn apply_removal(&self, removal: RemoveUidMessage) -> Result<UpdateApplied, SyncError> {
        self.crypto
            .verify_removal(&removal.uid, &removal.signature)
            .into_result()
            .map_err(SyncError::InvalidSignature)?;
        let present = self.access_list.remove_and_persist(&removal.uid)?;
        if present {
            info!(identifier = %removal.uid, "[ng-04] Identifier revoked");
        } else {
            debug!(identifier = %removal.uid, "[ng-04] Revoked identifier was not listed");
        }
        Ok(UpdateApplied::Removed { present })
    }
}

fn logged(
    topic: &str,
    result: Result<UpdateApplied, SyncError>,
) -> Result<UpdateApplied, SyncError> {
    if let Err(e) = &result {
        if e.applied_in_memory() {
            warn!(topic, "[ng-04] Update applied but not persisted: {}", e);
        } else {
            warn!(topic, "[ng-04] Update discarded: {}", e);
        }
    }
    result
}

#[async_trait]
impl<P, C, V> AccessListSyncApi for AccessListSyncService<P, C, V>
where
    P: MessagePublisher,
    C: CryptoGatewayApi,
    V: MajorityVoteTrigger,
{
    async fn request_update(&self) -> SyncOutcome {
        let Some(_flight) = self.flight.try_acquire() else {
            warn!("[ng-04] Access list request already in flight");
            return SyncOutcome::AlreadyInProgress;
        };

        if !self.publisher.is_connected() {
            info!("[ng-04] Bus disconnected, using persisted access list");
            return self.fall_back().await;
        }

        let receiver = self.waiter.arm();
        if let Err(e) = self
            .publisher
            .publish(topics::REQUEST_ACCESS_LIST, topics::REQUEST_UPDATE_PAYLOAD.to_vec())
            .await
        {
            warn!("[ng-04] Access list request not sent: {}", e);
            return self.fall_back().await;
        }

        let blinker = WaitIndicator::start(
            self.indicator.clone(),
            IndicatorLed::Processing,
            self.config.poll_interval,
        );
        let response = tokio::time::timeout(self.config.response_window(), receiver).await;
        blinker.stop();

        match response {
            Ok(Ok(entries)) => {
                info!(entries, "[ng-04] ✅ Access list updated from edge");
                SyncOutcome::Updated { entries }
            }
            _ => {
                info!(
                    "[ng-04] ⏱️ No access list within {:?}, falling back",
                    self.config.response_window()
                );
                self.fall_back().await
            }
        }
    }

    fn handle_push(&self, payload: &[u8]) -> Result<UpdateApplied, SyncError> {
        let result = decode::<AccessListPush>(payload)
            .map_err(SyncError::from)
            .and_then(|push| self.apply_push(push));
        logged(topics::ACCESS_LIST, result)
    }

    fn handle_response(&self, payload: &[u8]) -> Result<UpdateApplied, SyncError> {
        let result = decode::<AccessListResponse>(payload)
            .map_err(SyncError::from)
            .and_then(|response| match response {
                AccessListResponse::Signed(list) => {
                    self.apply_push(AccessListPush::Signed(list))
                }
                AccessListResponse::Rotating(rotation) => self.apply_rotation(rotation),
            });
        logged(topics::RESPONSE_ACCESS_LIST, result)
    }

    fn handle_removal(&self, payload: &[u8]) -> Result<UpdateApplied, SyncError> {
        let result = decode::<RemoveUidMessage>(payload)
            .map_err(SyncError::from)
            .and_then(|removal| self.apply_removal(removal));
        logged(topics::REMOVE_UID, result)
    }
}
