//! The inbox actor.
//!
//! A single task owns the [`Dispatcher`] and serializes everything that
//! touches it: intents from the presentation layer and completions from
//! assist jobs. Jobs run as their own tasks and report back over a channel,
//! so a slow provider never blocks intent handling.

use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::intent::Intent;
use crate::snapshot::InboxSnapshot;
use omnichat_assist::{AnalysisProvider, AssistConfig, AssistJob, Completion};
use omnichat_core::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, info, instrument, warn};

const INTENT_QUEUE: usize = 64;

type Reply = oneshot::Sender<std::result::Result<InboxSnapshot, DispatchError>>;

struct Envelope {
    intent: Intent,
    reply: Reply,
}

/// Client side of a running inbox.
#[derive(Clone)]
pub struct InboxHandle {
    intents: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<InboxSnapshot>,
}

impl InboxHandle {
    /// Dispatches an intent and waits for the resulting state.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's rejection, or `ServiceStopped` if the
    /// actor is gone.
    pub async fn dispatch(&self, intent: Intent) -> Result<InboxSnapshot, DispatchError> {
        let (reply, response) = oneshot::channel();
        self.intents
            .send(Envelope { intent, reply })
            .await
            .map_err(|_| DispatchError::ServiceStopped)?;
        let outcome = response.await.map_err(|_| DispatchError::ServiceStopped)?;
        Ok(outcome?)
    }

    /// The most recently published state.
    #[must_use]
    pub fn snapshot(&self) -> InboxSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published state, including completions
    /// of background assist jobs.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InboxSnapshot> {
        self.snapshots.clone()
    }
}

/// Owns the dispatcher and runs assist jobs against a provider.
pub struct InboxService {
    dispatcher: Dispatcher,
    provider: Arc<dyn AnalysisProvider>,
    config: AssistConfig,
    intents: mpsc::Receiver<Envelope>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    snapshots: watch::Sender<InboxSnapshot>,
}

impl InboxService {
    /// Starts the actor on the current runtime.
    ///
    /// The task ends once every [`InboxHandle`] is dropped.
    pub fn spawn(
        dispatcher: Dispatcher,
        provider: Arc<dyn AnalysisProvider>,
        config: AssistConfig,
    ) -> (InboxHandle, JoinHandle<()>) {
        let (intent_tx, intents) = mpsc::channel(INTENT_QUEUE);
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(dispatcher.snapshot());

        info!(
            provider = provider.name(),
            latency_ms = config.latency_ms,
            "starting inbox service"
        );

        let service = Self {
            dispatcher,
            provider,
            config,
            intents,
            completions,
            completion_tx,
            snapshots,
        };
        let task = tokio::spawn(service.run());

        let handle = InboxHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
        };
        (handle, task)
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                envelope = self.intents.recv() => match envelope {
                    Some(Envelope { intent, reply }) => self.handle_intent(intent, reply),
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
            }
        }
        info!("inbox service stopped");
    }

    #[instrument(skip(self, reply))]
    fn handle_intent(&mut self, intent: Intent, reply: Reply) {
        let outcome = match self.dispatcher.apply(intent) {
            Ok(job) => {
                if let Some(job) = job {
                    self.run_job(job);
                }
                Ok(self.publish())
            }
            Err(err) => {
                debug!(error = %err, "intent rejected");
                Err(err)
            }
        };
        if reply.send(outcome).is_err() {
            debug!("caller went away before the reply");
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        if self.dispatcher.complete_assist_job(completion) {
            self.publish();
        }
    }

    fn run_job(&self, job: AssistJob) {
        let provider = Arc::clone(&self.provider);
        let completions = self.completion_tx.clone();
        let latency = self.config.latency();
        let span = debug_span!("assist_job", token = %job.token, mode = %job.request.mode());

        tokio::spawn(
            async move {
                tokio::time::sleep(latency).await;
                let result = provider.produce(job.request).await;
                if completions
                    .send(Completion {
                        token: job.token,
                        result,
                    })
                    .is_err()
                {
                    warn!("inbox stopped before the job finished");
                }
            }
            .instrument(span),
        );
    }

    fn publish(&self) -> InboxSnapshot {
        let snapshot = self.dispatcher.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}
