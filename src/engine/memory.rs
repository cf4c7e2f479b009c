use super::{DecisionEngine, Result};
use crate::error::EngineError;
use crate::evaluator::{EvaluationContext, Evaluator};
use crate::flow::{EvaluationRequest, WorkflowData, WorkflowRequest, WorkflowSummary};
use futures::future::BoxFuture;
use std::sync::Mutex;
use tracing::debug;

/// A decision engine kept entirely in process.
///
/// Workflows are keyed by name: persisting a name that already exists
/// replaces the record and keeps its merchant code. New records get the
/// next free code of the form `M<n>`.
#[derive(Default)]
pub struct InMemoryDecisionEngine {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    records: Vec<WorkflowData>,
    next_code: u64,
}

impl InMemoryDecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the engine with existing records. Records without a merchant
    /// code are assigned one.
    pub fn with_records(records: Vec<WorkflowData>) -> Self {
        let mut store = Store::default();
        for record in records {
            store.insert(record);
        }
        Self {
            inner: Mutex::new(store),
        }
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        // A panic while holding the lock leaves the store usable.
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Store {
    fn insert(&mut self, mut record: WorkflowData) -> String {
        if let Some(existing) = self.records.iter_mut().find(|r| r.name == record.name) {
            record.merchant_code = existing.merchant_code.clone();
            *existing = record;
            return existing.merchant_code.clone().unwrap_or_default();
        }
        let code = match record.merchant_code.clone() {
            Some(code) => code,
            // Seeded records may already hold codes of the generated form.
            None => loop {
                self.next_code += 1;
                let code = format!("M{}", self.next_code);
                if self.find(&code).is_none() {
                    break code;
                }
            },
        };
        record.merchant_code = Some(code.clone());
        self.records.push(record);
        code
    }

    fn find(&self, merchant_id: &str) -> Option<&WorkflowData> {
        self.records
            .iter()
            .find(|r| r.merchant_code.as_deref() == Some(merchant_id))
    }
}

impl DecisionEngine for InMemoryDecisionEngine {
    fn persist(&self, request: WorkflowRequest) -> BoxFuture<'_, Result<()>> {
        let record = WorkflowData {
            merchant_code: None,
            name: request.name,
            description: request.description,
            decision_type: request.decision_type,
            flow: request.flow,
        };
        let code = self.with_store(|store| store.insert(record));
        debug!(merchant = %code, "workflow stored");
        Box::pin(async move { Ok(()) })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<WorkflowSummary>>> {
        let summaries = self.with_store(|store| {
            store
                .records
                .iter()
                .cloned()
                .map(WorkflowSummary::from)
                .collect()
        });
        Box::pin(async move { Ok(summaries) })
    }

    fn fetch(&self, merchant_id: &str) -> BoxFuture<'_, Result<WorkflowData>> {
        let found = self.with_store(|store| store.find(merchant_id).cloned());
        let result = found.ok_or_else(|| EngineError::MerchantNotFound(merchant_id.to_string()));
        Box::pin(async move { result })
    }

    fn evaluate(&self, request: EvaluationRequest) -> BoxFuture<'_, Result<Vec<String>>> {
        let found = self.with_store(|store| store.find(&request.merchant_id).cloned());
        let result = match found {
            Some(record) => {
                let context = EvaluationContext::from(&request);
                let evaluation = Evaluator::new(&record.flow).evaluate(&context);
                debug!(
                    merchant = %request.merchant_id,
                    reason = %evaluation.reason(),
                    "transaction routed"
                );
                Ok(evaluation.providers)
            }
            None => Err(EngineError::MerchantNotFound(request.merchant_id)),
        };
        Box::pin(async move { result })
    }
}
