//! Controller tests against an in-memory booking API.
//!
//! Availability responses can be held back per day, which makes the order
//! of completions deterministic.

use async_trait::async_trait;
use barberslot_core::{
    ApiError, AvailabilityItem, BookingApi, CalendarDate, PickedDate, PickerCapabilities, Provider,
};
use barberslot_store::{
    AppointmentFlowController, FlowConfig, FlowEffect, FlowEvent, FlowFailure, LoadState,
    RefetchOrdering,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot};

type Payload = Result<Vec<AvailabilityItem>, String>;

// ============================================================================
// Fake API
// ============================================================================

#[derive(Default)]
struct FakeApi {
    providers: Vec<Provider>,
    fail_providers: AtomicBool,
    gates: Mutex<HashMap<CalendarDate, oneshot::Receiver<Payload>>>,
    calls: Mutex<Vec<(String, CalendarDate)>>,
}

impl FakeApi {
    fn new() -> Self {
        Self {
            providers: vec![Provider::new("abc", "Ana"), Provider::new("xyz", "Zeca")],
            ..Self::default()
        }
    }

    /// Holds back the response for `date` until the returned sender fires.
    fn gate(&self, date: CalendarDate) -> oneshot::Sender<Payload> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(date, rx);
        tx
    }

    fn calls(&self) -> Vec<(String, CalendarDate)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn list_providers(&self) -> Result<Vec<Provider>, ApiError> {
        if self.fail_providers.load(Ordering::SeqCst) {
            return Err("connection refused".into());
        }
        Ok(self.providers.clone())
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: CalendarDate,
    ) -> Result<Vec<AvailabilityItem>, ApiError> {
        self.calls.lock().unwrap().push((provider_id.to_string(), date));
        let gate = self.gates.lock().unwrap().remove(&date);
        let payload = match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err("gate dropped".to_string())),
            None => Ok(Vec::new()),
        };
        payload.map_err(Into::into)
    }
}

fn day(d: u32) -> CalendarDate {
    CalendarDate::new(2024, 5, d).unwrap()
}

fn open(hours: &[u8]) -> Vec<AvailabilityItem> {
    hours.iter().map(|&h| AvailabilityItem::new(h, true)).collect()
}

fn controller(api: &Arc<FakeApi>, config: FlowConfig) -> AppointmentFlowController {
    let api: Arc<dyn BookingApi> = api.clone();
    AppointmentFlowController::new(api, config)
}

fn android_config(seed: &str, today: CalendarDate) -> FlowConfig {
    FlowConfig::new(seed, today).with_picker(PickerCapabilities::auto_dismiss())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_mount_loads_catalog_and_seed_day() {
    let api = Arc::new(FakeApi::new());
    let seed = api.gate(day(10));
    let mut flow = controller(&api, android_config("abc", day(10)));

    assert_eq!(flow.state().selection().provider_id(), "abc");
    let effects = flow.mount();
    assert_eq!(effects.len(), 2);

    seed.send(Ok(open(&[9, 13]))).unwrap();
    flow.settle().await;

    let state = flow.state();
    assert!(state.catalog().state().is_ready());
    assert_eq!(state.catalog().len(), 2);
    assert_eq!(state.availability().day().open_hours(), vec![9, 13]);
    assert_eq!(api.calls(), vec![("abc".to_string(), day(10))]);
}

#[tokio::test]
async fn test_provider_and_date_changes_refetch_once() {
    let api = Arc::new(FakeApi::new());
    let mut flow = controller(&api, android_config("abc", day(10)));
    flow.mount();
    flow.settle().await;

    assert_eq!(flow.select_provider("xyz").len(), 1);
    assert!(flow.select_provider("xyz").is_empty());
    flow.settle().await;

    flow.toggle_date_picker();
    assert_eq!(flow.apply_date_change(Some(PickedDate::new(2024, 4, 11))).len(), 1);
    assert!(!flow.state().selection().date_picker_visible());
    flow.settle().await;

    flow.toggle_date_picker();
    assert!(flow.apply_date_change(None).is_empty());
    assert!(!flow.state().selection().date_picker_visible());
    assert_eq!(flow.state().selection().date(), day(11));

    assert_eq!(
        api.calls(),
        vec![
            ("abc".to_string(), day(10)),
            ("xyz".to_string(), day(10)),
            ("xyz".to_string(), day(11)),
        ]
    );
}

#[tokio::test]
async fn test_old_schedule_visible_while_loading() {
    let api = Arc::new(FakeApi::new());
    let seed = api.gate(day(10));
    let next = api.gate(day(11));
    let mut flow = controller(&api, android_config("abc", day(10)));
    flow.mount();
    seed.send(Ok(open(&[9]))).unwrap();
    flow.settle().await;

    flow.apply_date_change(Some(PickedDate::new(2024, 4, 11)));
    assert!(flow.state().availability().state().is_loading());
    assert_eq!(flow.state().availability().day().open_hours(), vec![9]);

    next.send(Ok(open(&[15]))).unwrap();
    flow.settle().await;
    assert_eq!(flow.state().availability().day().open_hours(), vec![15]);
}

async fn overlapping(ordering: RefetchOrdering) -> Vec<u8> {
    let api = Arc::new(FakeApi::new());
    let a = api.gate(day(5));
    let b = api.gate(day(6));
    let mut flow = controller(&api, android_config("abc", day(4)).with_ordering(ordering));
    flow.mount();
    flow.settle().await;

    flow.apply_date_change(Some(PickedDate::new(2024, 4, 5)));
    flow.apply_date_change(Some(PickedDate::new(2024, 4, 6)));
    assert_eq!(flow.state().pending_requests(), 2);

    b.send(Ok(open(&[14]))).unwrap();
    assert!(flow.next_completion().await);
    assert_eq!(flow.state().availability().day().open_hours(), vec![14]);

    a.send(Ok(open(&[8]))).unwrap();
    assert!(flow.next_completion().await);
    assert!(!flow.next_completion().await);

    flow.state().availability().day().open_hours()
}

#[tokio::test]
async fn test_late_response_overwrites_under_arrival_order() {
    assert_eq!(overlapping(RefetchOrdering::ArrivalOrder).await, vec![8]);
}

#[tokio::test]
async fn test_late_response_discarded_under_issue_order() {
    assert_eq!(overlapping(RefetchOrdering::IssueOrder).await, vec![14]);
}

#[tokio::test]
async fn test_catalog_failure_then_retry() {
    let api = Arc::new(FakeApi::new());
    api.fail_providers.store(true, Ordering::SeqCst);
    let mut flow = controller(&api, android_config("abc", day(10)));
    flow.mount();
    flow.settle().await;

    assert_eq!(
        flow.state().catalog().state(),
        &LoadState::Failed(FlowFailure::CatalogFetchFailure("connection refused".into()))
    );
    assert!(flow.state().availability().state().is_ready());

    api.fail_providers.store(false, Ordering::SeqCst);
    assert_eq!(flow.retry_catalog(), vec![FlowEffect::FetchProviders]);
    flow.settle().await;
    assert!(flow.state().catalog().state().is_ready());
}

#[tokio::test]
async fn test_availability_failure_then_retry() {
    let api = Arc::new(FakeApi::new());
    let seed = api.gate(day(10));
    let mut flow = controller(&api, android_config("abc", day(10)));
    flow.mount();
    seed.send(Err("HTTP 503".to_string())).unwrap();
    flow.settle().await;

    let failure = flow.state().availability().state().failure().cloned();
    assert!(matches!(failure, Some(FlowFailure::AvailabilityFetchFailure(m)) if m.contains("503")));

    let retry = api.gate(day(10));
    assert_eq!(flow.retry_availability().len(), 1);
    retry.send(Ok(open(&[10]))).unwrap();
    flow.settle().await;
    assert_eq!(flow.state().availability().day().open_hours(), vec![10]);
}

#[tokio::test]
async fn test_subscribers_see_updates() {
    let api = Arc::new(FakeApi::new());
    let mut flow = controller(&api, android_config("abc", day(10)));
    let mut rx = flow.subscribe();
    assert!(!rx.borrow().is_mounted());

    flow.mount();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_mounted());

    flow.settle().await;
    assert!(rx.borrow().catalog().state().is_ready());
}

#[tokio::test]
async fn test_run_drains_intents_and_requests() {
    let api = Arc::new(FakeApi::new());
    let flow = controller(
        &api,
        android_config("abc", day(10)).with_ordering(RefetchOrdering::IssueOrder),
    );

    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(flow.run(rx));
    tx.send(FlowEvent::Mount).await.unwrap();
    tx.send(FlowEvent::SelectProvider("xyz".into())).await.unwrap();
    drop(tx);

    let state = handle.await.unwrap();
    assert_eq!(state.pending_requests(), 0);
    assert_eq!(state.selection().provider_id(), "xyz");
    assert!(state.availability().is_current_for("xyz", day(10)));
    assert!(state.catalog().state().is_ready());
}
