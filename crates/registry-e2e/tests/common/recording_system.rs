use std::sync::Mutex;

use registry_e2e::domain::Payload;
use registry_e2e::domain::QueryCategory;
use registry_e2e::infra::StubRegistry;
use registry_e2e::usecases::ports::QueryOutcome;
use registry_e2e::usecases::ports::SutError;
use registry_e2e::usecases::ports::SystemUnderTest;

/// Answers like the stub registry and remembers every payload it was handed.
#[derive(Default)]
pub struct RecordingSystem {
    registry: StubRegistry,
    calls: Mutex<Vec<(QueryCategory, Payload)>>,
}

impl RecordingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(QueryCategory, Payload)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SystemUnderTest for RecordingSystem {
    fn execute(
        &self,
        category: QueryCategory,
        payload: &Payload,
    ) -> Result<QueryOutcome, SutError> {
        self.calls.lock().unwrap().push((category, payload.clone()));
        Ok(self.registry.answer(category, payload))
    }

    fn name(&self) -> &str {
        "recording-stub"
    }
}
