use crate::submit::client::Recognizer;
use crate::submit::response::{format_entries, RecognitionEntry};
use anyhow::Result;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Placeholder shown when the service recognized nothing on the canvas.
pub const NO_RESULT_TEXT: &str = "No results found";
/// Fixed message shown for any transport or response-shape failure.
pub const SUBMIT_ERROR_TEXT: &str = "Error analyzing image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Drives the submit cycle `Idle -> Submitting -> (Succeeded | Failed)`.
///
/// The network call runs on a worker thread; the GUI pumps [`poll`] every
/// frame. The worker always sends exactly one outcome, and a dead channel is
/// treated as a failure, so the loading flag cannot stick.
///
/// [`poll`]: SubmissionController::poll
pub struct SubmissionController {
    recognizer: Arc<dyn Recognizer>,
    phase: SubmitPhase,
    result_text: String,
    outcome_rx: Option<Receiver<Result<Vec<RecognitionEntry>>>>,
}

impl SubmissionController {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            recognizer,
            phase: SubmitPhase::Idle,
            result_text: String::new(),
            outcome_rx: None,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Start a submission with an already-exported PNG snapshot. Returns
    /// `false` without issuing a request when one is still in flight.
    pub fn submit(&mut self, png: Vec<u8>) -> bool {
        if self.is_submitting() {
            tracing::debug!("submission already in flight; ignoring");
            return false;
        }

        let (outcome_tx, outcome_rx) = std::sync::mpsc::channel();
        let recognizer = Arc::clone(&self.recognizer);
        thread::spawn(move || {
            let outcome = recognizer.analyze(&png);
            let _ = outcome_tx.send(outcome);
        });

        self.outcome_rx = Some(outcome_rx);
        self.phase = SubmitPhase::Submitting;
        true
    }

    /// Collect the worker outcome, if any. Safe to call in any phase.
    pub fn poll(&mut self) {
        let Some(outcome_rx) = self.outcome_rx.as_ref() else {
            return;
        };
        match outcome_rx.try_recv() {
            Ok(Ok(entries)) => {
                self.result_text = format_entries(&entries, NO_RESULT_TEXT);
                self.finish(SubmitPhase::Succeeded);
            }
            Ok(Err(err)) => {
                tracing::error!("image analysis failed: {err:#}");
                self.result_text = SUBMIT_ERROR_TEXT.to_string();
                self.finish(SubmitPhase::Failed);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::error!("analysis worker exited without reporting an outcome");
                self.result_text = SUBMIT_ERROR_TEXT.to_string();
                self.finish(SubmitPhase::Failed);
            }
        }
    }

    fn finish(&mut self, phase: SubmitPhase) {
        self.phase = phase;
        self.outcome_rx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct CannedRecognizer {
        entries: Vec<RecognitionEntry>,
    }

    impl Recognizer for CannedRecognizer {
        fn analyze(&self, _png: &[u8]) -> Result<Vec<RecognitionEntry>> {
            Ok(self.entries.clone())
        }
    }

    struct PanickingRecognizer;

    impl Recognizer for PanickingRecognizer {
        fn analyze(&self, _png: &[u8]) -> Result<Vec<RecognitionEntry>> {
            panic!("worker died mid-flight");
        }
    }

    fn pump_until_settled(controller: &mut SubmissionController) {
        for _ in 0..500 {
            controller.poll();
            if !controller.is_submitting() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("submission never settled");
    }

    #[test]
    fn controller_starts_idle_with_empty_result() {
        let controller = SubmissionController::new(Arc::new(CannedRecognizer {
            entries: Vec::new(),
        }));
        assert_eq!(controller.phase(), SubmitPhase::Idle);
        assert_eq!(controller.result_text(), "");
        assert!(!controller.is_submitting());
    }

    #[test]
    fn a_dead_worker_finalizes_as_failure() {
        let mut controller = SubmissionController::new(Arc::new(PanickingRecognizer));
        assert!(controller.submit(vec![1, 2, 3]));
        pump_until_settled(&mut controller);
        assert_eq!(controller.phase(), SubmitPhase::Failed);
        assert_eq!(controller.result_text(), SUBMIT_ERROR_TEXT);
        assert!(!controller.is_submitting());
    }

    #[test]
    fn poll_outside_a_submission_is_harmless() {
        let mut controller = SubmissionController::new(Arc::new(CannedRecognizer {
            entries: Vec::new(),
        }));
        controller.poll();
        assert_eq!(controller.phase(), SubmitPhase::Idle);
    }
}
