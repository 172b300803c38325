//! Authentication Service - per-scan decision and actuation
//!
//! # Architecture
//! - Local hit decides immediately; a miss asks the edge with a deadline
//! - Verdicts arrive on the dispatcher task and release the waiting scan
//! - Every failure path ends in DENIED

use crate::domain::config::{AuthenticationConfig, IdentifierProtection};
use crate::domain::errors::AuthenticationError;
use crate::domain::pending::PendingEdgeQuery;
use crate::domain::state::{AuthState, Decision, ScanOutcome, VerdictDisposition};
use crate::ports::inbound::AuthenticationApi;
use async_trait::async_trait;
use ng_01_access_store::AccessListRepository;
use ng_02_crypto_gateway::CryptoGatewayApi;
use parking_lot::Mutex;
use shared_bus::MessagePublisher;
use shared_types::{
    decode, encode, topics, AllowAuthenticationMessage, AuthenticateMessage, Clock, Identifier,
    Indicator, IndicatorLed, LockActuator, NodeId, SingleFlight, SystemClock, WaitIndicator,
};
use std::sync::Arc;
use tracing::{debug, info, warn};


/// Dependencies for AuthenticationService
pub struct AuthenticationDependencies<P, C> {
    pub publisher: Arc<P>,
    pub crypto: Arc<C>,
    pub access_list: Arc<AccessListRepository>,
    pub indicator: Arc<dyn Indicator>,
    pub actuator: Arc<dyn LockActuator>,
    pub node_id: NodeId,
    pub config: AuthenticationConfig,
}

pub struct AuthenticationService<P, C>
where
    P: MessagePublisher,
    C: CryptoGatewayApi,
{
    publisher: Arc<P>,
    crypto: Arc<C>,
    access_list: Arc<AccessListRepository>,
    indicator: Arc<dyn Indicator>,
    actuator: Arc<dyn LockActuator>,
    clock: Arc<dyn Clock>,
    node_id: NodeId,
    config: AuthenticationConfig,
    flight: SingleFlight,
    pending: PendingEdgeQuery,
    state: Mutex<AuthState>,
}

impl<P, C> AuthenticationService<P, C>
where
    P: MessagePublisher,
    C: CryptoGatewayApi,
{
    pub fn new(deps: AuthenticationDependencies<P, C>) -> Self {
        Self {
            publisher: deps.publisher,
            crypto: deps.crypto,
            access_list: deps.access_list,
            indicator: deps.indicator,
            actuator: deps.actuator,
            clock: Arc::new(SystemClock),
            node_id: deps.node_id,
            config: deps.config,
            flight: SingleFlight::new(),
            pending: PendingEdgeQuery::new(),
            state: Mutex::new(AuthState::Idle),
        }
    }

    /// Set custom clock (for testing)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AuthenticationConfig {
        &self.config
    }

    /// Whether a scan is currently in flight.
    #[must_use]
    pub fn is_authenticating(&self) -> bool {
        self.flight.is_busy()
    }

    /// Decode and offer a raw `/allow_authentication` payload.
    pub fn handle_verdict_payload(&self, payload: &[u8]) -> VerdictDisposition {
        match decode::<AllowAuthenticationMessage>(payload) {
            Ok(verdict) => self.handle_verdict(verdict),
            Err(e) => {
                warn!("[ng-03] Discarding malformed verdict: {}", e);
                VerdictDisposition::Malformed
            }
        }
    }

    fn set_state(&self, state: AuthState) {
        *self.state.lock() = state;
    }

    /// Key the identifier is stored and correlated under.
    fn store_key(&self, identifier: &Identifier) -> Result<Identifier, AuthenticationError> {
        match self.config.protection {
            IdentifierProtection::Plain => Ok(identifier.clone()),
            IdentifierProtection::Encrypted => Ok(self.crypto.identifier_digest(identifier)?),
        }
    }

    fn record(&self, identifier: &Identifier, result: bool) -> Result<Vec<u8>, AuthenticationError> {
        let (uid, encrypted_uid) = match self.config.protection {
            IdentifierProtection::Plain => (Some(identifier.clone()), None),
            IdentifierProtection::Encrypted => {
                (None, Some(self.crypto.encrypt_identifier(identifier)?))
            }
        };
        let message = AuthenticateMessage {
            uid,
            encrypted_uid,
            node_id: self.node_id.clone(),
            date: self.clock.timestamp(),
            result,
        };
        Ok(encode(&message)?)
    }

    async fn publish_record(
        &self,
        identifier: &Identifier,
        result: bool,
    ) -> Result<(), AuthenticationError> {
        let payload = self.record(identifier, result)?;
        self.publisher.publish(topics::AUTHENTICATE, payload).await?;
        Ok(())
    }

    async fn decide(&self, identifier: &Identifier) -> Decision {
        self.set_state(AuthState::CheckingLocal);

        let key = match self.store_key(identifier) {
            Ok(k) => k,
            Err(e) => {
                warn!("[ng-03] Cannot derive store key, denying: {}", e);
                return Decision::Denied;
            }
        };

        if self.access_list.contains(&key) {
            info!("[ng-03] ✅ {} found in local access list", key);
            if let Err(e) = self.publish_record(identifier, true).await {
                warn!("[ng-03] Authentication record not sent: {}", e);
            }
            return Decision::Authorized;
        }

        self.set_state(AuthState::CheckingRemote);
        let waiter = self.pending.arm(key.clone());

        if let Err(e) = self.publish_record(identifier, false).await {
            self.pending.clear();
            warn!("[ng-03] Edge challenge for {} not sent, denying: {}", key, e);
            return Decision::Denied;
        }
        debug!("[ng-03] Waiting up to {:?} for edge verdict on {}", self.config.edge_window(), key);

        let blinker = WaitIndicator::start(
            self.indicator.clone(),
            IndicatorLed::Processing,
            self.config.poll_interval,
        );
        let verdict = tokio::time::timeout(self.config.edge_window(), waiter).await;
        blinker.stop();
        self.pending.clear();

        match verdict {
            Ok(Ok(true)) => Decision::Authorized,
            Ok(Ok(false)) => {
                info!("[ng-03] Edge denied {}", key);
                Decision::Denied
            }
            Ok(Err(_)) => Decision::Denied,
            Err(_) => {
                info!("[ng-03] ⏱️ No edge verdict for {} within window, denying", key);
                Decision::Denied
            }
        }
    }

    async fn actuate(&self, decision: Decision) {
        self.indicator.all_off();
        match decision {
            Decision::Authorized => {
                self.set_state(AuthState::Authorized);
                self.indicator.set(IndicatorLed::Granted, true);
                self.actuator.unlock();
                tokio::time::sleep(self.config.relay_pulse).await;
                self.actuator.lock();
            }
            Decision::Denied => {
                self.set_state(AuthState::Denied);
                self.indicator.set(IndicatorLed::Denied, true);
                tokio::time::sleep(self.config.relay_pulse).await;
            }
        }
        self.indicator.all_off();
    }
}

#[async_trait]
impl<P, C> AuthenticationApi for AuthenticationService<P, C>
where
    P: MessagePublisher,
    C: CryptoGatewayApi,
{
    async fn authenticate(&self, identifier: Identifier) -> ScanOutcome {
        let Some(_flight) = self.flight.try_acquire() else {
            debug!("[ng-03] Scan of {} ignored, authentication in flight", identifier);
            return ScanOutcome::Ignored;
        };

        let decision = self.decide(&identifier).await;
        info!(
            node_id = %self.node_id,
            authorized = decision.is_authorized(),
            "[ng-03] Scan decided"
        );
        self.actuate(decision).await;
        self.set_state(AuthState::Idle);

        ScanOutcome::Completed(decision)
    }

    fn handle_verdict(&self, verdict: AllowAuthenticationMessage) -> VerdictDisposition {
        let Some(awaited) = self.pending.awaited() else {
            debug!("[ng-03] Verdict for {} with no pending query", verdict.uid);
            return VerdictDisposition::NotAwaited;
        };

        if verdict.uid != awaited || verdict.node_id != self.node_id {
            debug!(
                uid = %verdict.uid,
                node_id = %verdict.node_id,
                "[ng-03] Verdict for another query, ignoring"
            );
            return VerdictDisposition::Mismatch;
        }

        if self.config.require_signed_verdicts {
            let check = self.crypto
                .verify_verdict(&verdict, self.config.verdict_binding);
            if !check.valid {
                warn!(
                    uid = %verdict.uid,
                    error = ?check.error,
                    "[ng-03] Untrusted verdict discarded"
                );
                return VerdictDisposition::Untrusted;
            }
        }

        if !self.pending.resolve(&verdict.uid, verdict.result) {
            return VerdictDisposition::NotAwaited;
        }

        if verdict.result && self.config.cache_confirmed {
            self.access_list.insert(verdict.uid.clone());
            debug!("[ng-03] Cached edge-confirmed {}", verdict.uid);
        }
        VerdictDisposition::Resolved(verdict.result)
    }

    fn state(&self) -> AuthState {
        *self.state.lock()
    }
}
