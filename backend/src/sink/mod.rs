//! Outbound log sinks
//!
//! The core hands every event line and every money movement to an
//! [`EventSink`]. It never reads anything back, so a sink can be a file, a
//! database writer or nothing at all.

use std::sync::{Arc, Mutex};

use crate::models::TransactionRecord;

/// Persistence/logging collaborator
pub trait EventSink {
    /// One human-readable line per significant state change
    fn log(&mut self, message: &str);

    /// One structured record per balance movement
    fn record_transaction(&mut self, record: &TransactionRecord);
}

/// Forwards everything to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn log(&mut self, message: &str) {
        tracing::info!(target: "airport::events", "{}", message);
    }

    fn record_transaction(&mut self, record: &TransactionRecord) {
        tracing::info!(
            target: "airport::transactions",
            id = %record.id,
            tick = record.tick,
            amount = record.amount,
            kind = %record.kind,
            balance = record.resulting_balance,
            overdraft = record.overdraft,
            "{}",
            record.reason
        );
    }
}

#[derive(Debug, Default)]
struct Captured {
    messages: Vec<String>,
    transactions: Vec<TransactionRecord>,
}

/// Captures everything in memory
///
/// Clones share the same buffer, so a test can keep one clone and hand the
/// other to the orchestrator.
///
/// # Example
/// ```
/// use airport_simulator_core_rs::sink::{EventSink, MemorySink};
///
/// let probe = MemorySink::new();
/// let mut sink = probe.clone();
/// sink.log("hello");
/// assert_eq!(probe.messages(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Captured>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.inner
            .lock()
            .map(|c| c.transactions.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn log(&mut self, message: &str) {
        if let Ok(mut captured) = self.inner.lock() {
            captured.messages.push(message.to_string());
        }
    }

    fn record_transaction(&mut self, record: &TransactionRecord) {
        if let Ok(mut captured) = self.inner.lock() {
            captured.transactions.push(record.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, TransactionKind};

    #[test]
    fn test_memory_sink_shares_buffer() {
        let probe = MemorySink::new();
        let mut sink: Box<dyn EventSink> = Box::new(probe.clone());

        let mut account = Account::new(0);
        let record = account.credit(25, "fees", TransactionKind::Grant, 2);
        sink.record_transaction(&record);
        sink.log("one");
        sink.log("two");

        assert_eq!(probe.messages().len(), 2);
        assert_eq!(probe.transactions()[0].amount, 25);
    }
}
