//! Demo-mode score ledger
//!
//! Stands in for the on-chain score application. Each report waits out a
//! fake network delay, then applies an `Increment` operation to an
//! in-memory chain score.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::report::{Ledger, LedgerError, LocalBoxFuture};

/// Default fake network delay
pub const DEMO_LATENCY_MS: u32 = 500;

/// Operations the score application accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerOperation {
    Increment { amount: u64 },
}

/// Score held by the chain application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainScore {
    pub value: u64,
}

impl ChainScore {
    pub fn apply(&mut self, op: LedgerOperation) {
        match op {
            LedgerOperation::Increment { amount } => {
                self.value = self.value.saturating_add(amount);
            }
        }
    }
}

/// Ledger client that never leaves the process
#[derive(Debug, Clone)]
pub struct MockLedger {
    chain: Rc<RefCell<ChainScore>>,
    latency_ms: u32,
    online: bool,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new(DEMO_LATENCY_MS)
    }
}

impl MockLedger {
    pub fn new(latency_ms: u32) -> Self {
        Self {
            chain: Rc::new(RefCell::new(ChainScore::default())),
            latency_ms,
            online: true,
        }
    }

    /// A ledger that rejects every report
    pub fn offline() -> Self {
        Self {
            online: false,
            ..Self::new(0)
        }
    }

    pub fn chain_value(&self) -> u64 {
        self.chain.borrow().value
    }
}

impl Ledger for MockLedger {
    fn report_pickup(&self, points: u32) -> LocalBoxFuture<Result<(), LedgerError>> {
        let chain = self.chain.clone();
        let latency_ms = self.latency_ms;
        let online = self.online;

        Box::pin(async move {
            log::info!("[DEMO] Preparing to send {} points...", points);
            if points == 0 {
                return Err(LedgerError::Rejected {
                    points,
                    reason: "increment must be positive".into(),
                });
            }
            let op = LedgerOperation::Increment {
                amount: points as u64,
            };
            if let Ok(payload) = serde_json::to_string(&op) {
                log::debug!("[DEMO] Payload {}", payload);
            }

            network_delay(latency_ms).await;

            if !online {
                return Err(LedgerError::Unavailable);
            }
            chain.borrow_mut().apply(op);
            log::info!("[SUCCESS] Ledger received {} points", points);
            Ok(())
        })
    }
}

#[cfg(target_arch = "wasm32")]
async fn network_delay(ms: u32) {
    if ms > 0 {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
}

/// Native builds report immediately
#[cfg(not(target_arch = "wasm32"))]
async fn network_delay(_ms: u32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_score() {
        let mut chain = ChainScore::default();
        chain.apply(LedgerOperation::Increment { amount: 10 });
        assert_eq!(chain.value, 10);
        chain.apply(LedgerOperation::Increment { amount: u64::MAX });
        assert_eq!(chain.value, u64::MAX);
    }

    #[test]
    fn test_mock_ledger_applies_reports() {
        let ledger = MockLedger::new(0);
        pollster::block_on(ledger.report_pickup(5)).unwrap();
        pollster::block_on(ledger.report_pickup(5)).unwrap();
        assert_eq!(ledger.chain_value(), 10);
    }

    #[test]
    fn test_offline_ledger_rejects() {
        let ledger = MockLedger::offline();
        let result = pollster::block_on(ledger.report_pickup(5));
        assert_eq!(result, Err(LedgerError::Unavailable));
        assert_eq!(ledger.chain_value(), 0);
    }

    #[test]
    fn test_zero_point_report_rejected() {
        let ledger = MockLedger::new(0);
        let result = pollster::block_on(ledger.report_pickup(0));
        assert!(matches!(
            result,
            Err(LedgerError::Rejected { points: 0, .. })
        ));
        assert_eq!(ledger.chain_value(), 0);
    }

    #[test]
    fn test_operation_wire_shape() {
        let json = serde_json::to_string(&LedgerOperation::Increment { amount: 5 }).unwrap();
        assert_eq!(json, r#"{"Increment":{"amount":5}}"#);
    }
}
