//! Pickup score reporting
//!
//! The controller pushes a `PickupEvent` per collected diamond onto a
//! channel and moves on. `ReportWorker::pump` drains the channel from the
//! host loop and turns each event into a report future for the host to
//! spawn. Outcomes are logged and otherwise dropped, so a slow or failing
//! ledger can never stall or alter the simulation.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::mpsc;

use thiserror::Error;

/// Boxed single-threaded future
pub type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// One collected diamond worth `points`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupEvent {
    pub points: u32,
}

/// Why a ledger report did not land
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger is unavailable")]
    Unavailable,
    #[error("ledger rejected {points} points: {reason}")]
    Rejected { points: u32, reason: String },
}

/// External score ledger
pub trait Ledger {
    /// Submit a pickup worth `points`. The returned future owns everything
    /// it needs; nothing waits on it.
    fn report_pickup(&self, points: u32) -> LocalBoxFuture<Result<(), LedgerError>>;
}

impl<L: Ledger + ?Sized> Ledger for Rc<L> {
    fn report_pickup(&self, points: u32) -> LocalBoxFuture<Result<(), LedgerError>> {
        (**self).report_pickup(points)
    }
}

/// Simulation side of the report queue
#[derive(Debug, Clone)]
pub struct PickupSender {
    tx: mpsc::Sender<PickupEvent>,
}

impl PickupSender {
    /// Queue a pickup. Returns false when the worker is gone; the pickup
    /// is dropped in that case.
    pub fn send(&self, event: PickupEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                log::debug!("Report worker gone, dropping {} point pickup", event.points);
                false
            }
        }
    }
}

/// Drains queued pickups into ledger reports
pub struct ReportWorker<L> {
    rx: mpsc::Receiver<PickupEvent>,
    ledger: L,
}

/// Create a connected sender/worker pair
pub fn report_channel<L: Ledger>(ledger: L) -> (PickupSender, ReportWorker<L>) {
    let (tx, rx) = mpsc::channel();
    (PickupSender { tx }, ReportWorker { rx, ledger })
}

impl<L: Ledger> ReportWorker<L> {
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Take every queued pickup and hand one report task per pickup to
    /// `spawn`. Returns the number of tasks handed out.
    pub fn pump(&self, mut spawn: impl FnMut(LocalBoxFuture<()>)) -> usize {
        let mut dispatched = 0;
        while let Ok(event) = self.rx.try_recv() {
            spawn(self.dispatch(event));
            dispatched += 1;
        }
        dispatched
    }

    fn dispatch(&self, event: PickupEvent) -> LocalBoxFuture<()> {
        let points = event.points;
        let report = self.ledger.report_pickup(points);
        Box::pin(async move {
            match report.await {
                Ok(()) => log::debug!("Reported {} points", points),
                Err(e) => log::warn!("Score report of {} points failed: {}", points, e),
            }
        })
    }
}
