//! # Scan Handler
//!
//! Feeds tags from a reader into authentication. Each scan runs on its own
//! task, so a tag presented while another is being decided reaches
//! `authenticate` and is ignored there rather than queued here.

use std::sync::Arc;

use ng_03_authentication::{AuthenticationApi, ScanOutcome};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::adapters::TagReader;

pub struct ScanHandler<R, A> {
    reader: R,
    authentication: Arc<A>,
}

impl<R, A> ScanHandler<R, A>
where
    R: TagReader,
    A: AuthenticationApi + 'static,
{
    pub fn new(reader: R, authentication: Arc<A>) -> Self {
        Self {
            reader,
            authentication,
        }
    }

    /// Run until the reader closes or `shutdown` flips.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Tag reader started");
        loop {
            tokio::select! {
                tag = self.reader.next_tag() => {
                    let Some(tag) = tag else {
                        info!("Tag reader closed");
                        break;
                    };
                    let authentication = self.authentication.clone();
                    tokio::spawn(async move {
                        match authentication.authenticate(tag.clone()).await {
                            ScanOutcome::Completed(decision) => {
                                debug!(identifier = %tag, ?decision, "Scan finished");
                            }
                            ScanOutcome::Ignored => {
                                debug!(identifier = %tag, "Scan ignored");
                            }
                        }
                    });
                }
                _ = shutdown.changed() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ng_03_authentication::{AuthState, Decision, VerdictDisposition};
    use shared_types::{AllowAuthenticationMessage, Identifier, SingleFlight};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct ChannelReader(mpsc::UnboundedReceiver<Identifier>);

    #[async_trait]
    impl TagReader for ChannelReader {
        async fn next_tag(&mut self) -> Option<Identifier> {
            self.0.recv().await
        }
    }

    /// Takes one second per scan and records what it was asked.
    #[derive(Default)]
    struct SlowAuthentication {
        flight: SingleFlight,
        outcomes: Mutex<Vec<(String, ScanOutcome)>>,
    }

    #[async_trait]
    impl AuthenticationApi for SlowAuthentication {
        async fn authenticate(&self, identifier: Identifier) -> ScanOutcome {
            let outcome = match self.flight.try_acquire() {
                Some(_guard) => {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    ScanOutcome::Completed(Decision::Authorized)
                }
                None => ScanOutcome::Ignored,
            };
            self.outcomes
                .lock()
                .unwrap()
                .push((identifier.into_inner(), outcome));
            outcome
        }

        fn handle_verdict(&self, _verdict: AllowAuthenticationMessage) -> VerdictDisposition {
            VerdictDisposition::NotAwaited
        }

        fn state(&self) -> AuthState {
            AuthState::Idle
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_scan_is_ignored() {
        let (tags, receiver) = mpsc::unbounded_channel();
        let authentication = Arc::new(SlowAuthentication::default());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handler = tokio::spawn(
            ScanHandler::new(ChannelReader(receiver), authentication.clone()).run(shutdown_rx),
        );

        tags.send(Identifier::new("04A1").unwrap()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tags.send(Identifier::new("04B2").unwrap()).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(tags);
        handler.await.unwrap();

        let outcomes = authentication.outcomes.lock().unwrap();
        assert_eq!(
            *outcomes,
            vec![
                ("04B2".to_string(), ScanOutcome::Ignored),
                ("04A1".to_string(), ScanOutcome::Completed(Decision::Authorized)),
            ]
        );
    }
}
