use super::{
    Orchestrator, Phase, SequencerConfig, SequencerEvent, SequencerUpdate, WorkflowState,
    WorkflowView,
};
use crate::domain::WorkflowRequest;
use crate::error::SequencerError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;

/// Owns the state of one agent-workflow view.
///
/// Each submission spawns two tasks on the current tokio runtime: the phase
/// ticker and the request driver. Both publish through one guarded update, which
/// drops any update whose run has been superseded or dismissed. Dismissing, or
/// dropping the sequencer, aborts both tasks and with them the in-flight
/// request.
pub struct Sequencer {
    orchestrator: Arc<dyn Orchestrator>,
    config: SequencerConfig,
    shared: Arc<Shared>,
    tasks: Vec<AbortHandle>,
}

struct Shared {
    view: watch::Sender<WorkflowView>,
    events: mpsc::UnboundedSender<SequencerUpdate>,
}

impl Shared {
    /// Applies `update` if `run` is still the live run and its state is one of
    /// `allowed`. The event is queued under the same lock as the view change.
    fn apply(
        &self,
        run: u64,
        allowed: &[WorkflowState],
        update: impl FnOnce(&mut WorkflowView) -> SequencerEvent,
    ) -> bool {
        let events = &self.events;
        self.view.send_if_modified(|view| {
            if view.run != run || !allowed.contains(&view.state) {
                return false;
            }
            let event = update(view);
            // A dropped receiver only means nobody is listening.
            let _ = events.send(SequencerUpdate { run, event });
            true
        })
    }
}

impl Sequencer {
    pub fn new(
        orchestrator: Arc<dyn Orchestrator>,
        config: SequencerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SequencerUpdate>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let (view, _) = watch::channel(WorkflowView::default());

        let sequencer = Self {
            orchestrator,
            config,
            shared: Arc::new(Shared { view, events }),
            tasks: Vec::new(),
        };
        (sequencer, receiver)
    }

    pub fn config(&self) -> SequencerConfig {
        self.config
    }

    pub fn state(&self) -> WorkflowState {
        self.shared.view.borrow().state
    }

    pub fn snapshot(&self) -> WorkflowView {
        self.shared.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowView> {
        self.shared.view.subscribe()
    }

    /// Starts a new run and returns its id.
    ///
    /// Must be called from within a tokio runtime. The previous result and
    /// error are cleared before anything is spawned.
    pub fn submit(&mut self, request: WorkflowRequest) -> Result<u64, SequencerError> {
        if request.full_name.trim().is_empty() {
            return Err(SequencerError::InvalidRequest("full name is required"));
        }
        if request.kyc_notes.trim().is_empty() {
            return Err(SequencerError::InvalidRequest("KYC notes are required"));
        }
        if self.state().is_in_flight() {
            return Err(SequencerError::InFlight);
        }

        // A finished run may still have its ticker going.
        self.abort_tasks();

        let events = &self.shared.events;
        let mut run = 0;
        self.shared.view.send_modify(|view| {
            run = view.run + 1;
            *view = WorkflowView {
                run,
                state: WorkflowState::Pending,
                ..WorkflowView::default()
            };
            let _ = events.send(SequencerUpdate {
                run,
                event: SequencerEvent::Submitted,
            });
        });
        tracing::debug!(run, client = %request.full_name, "workflow run submitted");

        let ticker = tokio::spawn(run_ticker(
            Arc::clone(&self.shared),
            run,
            self.config.phase_interval,
        ));
        let driver = tokio::spawn(run_driver(
            Arc::clone(&self.shared),
            Arc::clone(&self.orchestrator),
            request,
            self.config,
            run,
            ticker.abort_handle(),
        ));

        self.tasks = vec![ticker.abort_handle(), driver.abort_handle()];
        Ok(run)
    }

    /// Abandons the current run, if any, and returns to `Idle`.
    ///
    /// No update from the abandoned run is applied after this returns.
    pub fn dismiss(&mut self) {
        let events = &self.shared.events;
        let dismissed = self.shared.view.send_if_modified(|view| {
            if view.state == WorkflowState::Idle {
                return false;
            }
            let run = view.run;
            *view = WorkflowView {
                run,
                ..WorkflowView::default()
            };
            let _ = events.send(SequencerUpdate {
                run,
                event: SequencerEvent::Dismissed,
            });
            true
        });
        self.abort_tasks();

        if dismissed {
            tracing::debug!("workflow view dismissed");
        }
    }

    pub fn reset(&mut self) {
        self.dismiss();
    }

    fn abort_tasks(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

const PROGRESS_STATES: &[WorkflowState] = &[
    WorkflowState::Pending,
    WorkflowState::Revealing,
    WorkflowState::Done,
];

async fn run_ticker(shared: Arc<Shared>, run: u64, interval: Duration) {
    for (i, phase) in Phase::ALL.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(interval).await;
        }
        let applied = shared.apply(run, PROGRESS_STATES, |view| {
            view.phase = Some(phase);
            SequencerEvent::Phase(phase)
        });
        if !applied {
            return;
        }
    }
}

async fn run_driver(
    shared: Arc<Shared>,
    orchestrator: Arc<dyn Orchestrator>,
    request: WorkflowRequest,
    config: SequencerConfig,
    run: u64,
    ticker: AbortHandle,
) {
    let response =
        tokio::time::timeout(config.request_timeout, orchestrator.orchestrate(&request)).await;

    let result = match response {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => return fail(&shared, run, &ticker, err.to_string()),
        Err(_) => {
            let reason = format!(
                "no response within {} ms",
                config.request_timeout.as_millis()
            );
            return fail(&shared, run, &ticker, reason);
        }
    };

    let steps = result.workflow_execution.len();
    let accepted = shared.apply(run, &[WorkflowState::Pending], |view| {
        view.state = WorkflowState::Revealing;
        view.result = Some(result);
        SequencerEvent::ResponseReceived { steps }
    });
    if !accepted {
        return;
    }
    tracing::debug!(run, steps, "workflow response received");

    for count in 0..=steps {
        tokio::time::sleep(config.reveal_interval).await;
        let applied = shared.apply(run, &[WorkflowState::Revealing], |view| {
            view.revealed = Some(count);
            SequencerEvent::Revealed(count)
        });
        if !applied {
            return;
        }
    }

    if shared.apply(run, &[WorkflowState::Revealing], |view| {
        view.state = WorkflowState::Done;
        SequencerEvent::Completed
    }) {
        tracing::info!(run, steps, "workflow run completed");
    }
}

fn fail(shared: &Shared, run: u64, ticker: &AbortHandle, reason: String) {
    tracing::error!(run, "workflow run failed: {reason}");
    ticker.abort();
    shared.apply(run, &[WorkflowState::Pending], |view| {
        view.state = WorkflowState::Error;
        view.error = Some(reason.clone());
        SequencerEvent::Failed(reason)
    });
}
