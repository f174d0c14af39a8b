use std::sync::{Arc, Mutex};

use queuenotifier::delivery::{NotifyOutcome, OutcomeSink};

/// Collects every reported outcome for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    outcomes: Arc<Mutex<Vec<NotifyOutcome>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<NotifyOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl OutcomeSink for RecordingSink {
    fn report(&self, outcome: NotifyOutcome) {
        self.outcomes.lock().unwrap().push(outcome);
    }
}
