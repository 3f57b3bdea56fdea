//! Availability query bookkeeping.
//!
//! Every change of provider or day issues a fresh [`AvailabilityRequest`].
//! The slot keeps the last applied schedule visible until another response
//! replaces it in one step.

use barberslot_core::{AvailabilityItem, CalendarDate, DayAvailability};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::load::{FlowFailure, LoadState};

// ============================================================================
// Refetch Ordering
// ============================================================================

/// How overlapping availability responses are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefetchOrdering {
    /// Every response is applied as it arrives, so a slow stale response can
    /// overwrite a newer one.
    #[default]
    ArrivalOrder,
    /// Responses older than the one currently stored are discarded.
    IssueOrder,
}

impl RefetchOrdering {
    /// All orderings.
    pub fn all() -> &'static [RefetchOrdering] {
        &[RefetchOrdering::ArrivalOrder, RefetchOrdering::IssueOrder]
    }
}

impl fmt::Display for RefetchOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefetchOrdering::ArrivalOrder => write!(f, "arrival_order"),
            RefetchOrdering::IssueOrder => write!(f, "issue_order"),
        }
    }
}

impl std::str::FromStr for RefetchOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "arrival_order" | "arrival" | "last_arrival" => Ok(Self::ArrivalOrder),
            "issue_order" | "issue" | "sequenced" => Ok(Self::IssueOrder),
            other => Err(format!(
                "Unknown refetch ordering: {other}. Use: arrival_order, issue_order"
            )),
        }
    }
}

// ============================================================================
// Availability Request
// ============================================================================

/// One issued availability retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AvailabilityRequest {
    /// Issue sequence number, increasing per flow.
    pub seq: u64,
    /// Provider the schedule is for.
    pub provider_id: String,
    /// Day the schedule is for.
    pub date: CalendarDate,
}

impl AvailabilityRequest {
    /// Returns true if both requests ask for the same schedule.
    pub fn same_key(&self, provider_id: &str, date: CalendarDate) -> bool {
        self.provider_id == provider_id && self.date == date
    }
}

// ============================================================================
// Availability Slot
// ============================================================================

/// The stored schedule and the requests feeding it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilitySlot {
    day: DayAvailability,
    state: LoadState,
    /// Request whose response is currently stored.
    shown: Option<AvailabilityRequest>,
    /// Sequence number of the last applied response, success or failure.
    #[serde(skip)]
    applied_seq: Option<u64>,
    /// Outcome of the last applied response.
    #[serde(skip)]
    last_outcome: Option<Result<(), FlowFailure>>,
    #[serde(skip)]
    in_flight: BTreeSet<u64>,
    #[serde(skip)]
    next_seq: u64,
    #[serde(skip)]
    ordering: RefetchOrdering,
}

impl AvailabilitySlot {
    /// Creates an idle slot.
    pub fn new(ordering: RefetchOrdering) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    /// The stored schedule.
    pub fn day(&self) -> &DayAvailability {
        &self.day
    }

    /// Convenience accessor for the stored slots.
    pub fn items(&self) -> &[AvailabilityItem] {
        self.day.items()
    }

    /// Load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Request the stored schedule answers, if any.
    pub fn shown(&self) -> Option<&AvailabilityRequest> {
        self.shown.as_ref()
    }

    /// Number of requests still in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Ordering policy.
    pub fn ordering(&self) -> RefetchOrdering {
        self.ordering
    }

    /// Returns true if the stored schedule answers `(provider_id, date)`.
    pub fn is_current_for(&self, provider_id: &str, date: CalendarDate) -> bool {
        self.shown
            .as_ref()
            .is_some_and(|r| r.same_key(provider_id, date))
    }

    /// Allocates a new request and moves to `Loading`.
    pub(crate) fn issue(&mut self, provider_id: &str, date: CalendarDate) -> AvailabilityRequest {
        self.next_seq += 1;
        let request = AvailabilityRequest {
            seq: self.next_seq,
            provider_id: provider_id.to_string(),
            date,
        };
        self.in_flight.insert(request.seq);
        self.state = LoadState::Loading;
        debug!(seq = request.seq, provider = %request.provider_id, date = %date, "Availability request issued");
        request
    }

    /// Applies a response. Returns true if it was stored.
    pub(crate) fn complete(
        &mut self,
        request: AvailabilityRequest,
        result: Result<Vec<AvailabilityItem>, String>,
    ) -> bool {
        if !self.in_flight.remove(&request.seq) {
            debug!(seq = request.seq, "Ignoring response for unknown request");
            return false;
        }

        let stale = self.ordering == RefetchOrdering::IssueOrder
            && self.applied_seq.is_some_and(|applied| request.seq < applied);

        let applied = if stale {
            debug!(seq = request.seq, applied = ?self.applied_seq, "Discarding stale availability response");
            false
        } else {
            self.applied_seq = Some(request.seq);
            let outcome = result.and_then(|items| {
                DayAvailability::from_items(items).map_err(|e| e.to_string())
            });
            match outcome {
                Ok(day) => {
                    self.day = day;
                    self.shown = Some(request);
                    self.last_outcome = Some(Ok(()));
                }
                Err(message) => {
                    self.last_outcome = Some(Err(FlowFailure::AvailabilityFetchFailure(message)));
                }
            }
            true
        };

        self.settle();
        applied
    }

    fn settle(&mut self) {
        self.state = if !self.in_flight.is_empty() {
            LoadState::Loading
        } else {
            match &self.last_outcome {
                Some(Ok(())) => LoadState::Ready,
                Some(Err(failure)) => LoadState::Failed(failure.clone()),
                None => LoadState::Idle,
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> CalendarDate {
        CalendarDate::new(2024, 5, d).unwrap()
    }

    fn slots(hours: &[u8]) -> Vec<AvailabilityItem> {
        hours.iter().map(|&h| AvailabilityItem::new(h, true)).collect()
    }

    #[test]
    fn test_issue_moves_to_loading() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::ArrivalOrder);
        assert_eq!(slot.state(), &LoadState::Idle);

        let request = slot.issue("abc", day(10));
        assert_eq!(request.seq, 1);
        assert!(slot.state().is_loading());
        assert_eq!(slot.in_flight(), 1);
    }

    #[test]
    fn test_old_result_visible_until_replaced() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::ArrivalOrder);
        let first = slot.issue("abc", day(10));
        slot.complete(first, Ok(slots(&[9])));

        let _second = slot.issue("abc", day(11));
        assert!(slot.state().is_loading());
        assert_eq!(slot.day().open_hours(), vec![9]);
        assert!(slot.is_current_for("abc", day(10)));
    }

    #[test]
    fn test_arrival_order_last_wins() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::ArrivalOrder);
        let a = slot.issue("abc", day(5));
        let b = slot.issue("abc", day(6));

        slot.complete(b, Ok(slots(&[10])));
        assert!(slot.state().is_loading());
        slot.complete(a, Ok(slots(&[8])));

        assert_eq!(slot.day().open_hours(), vec![8]);
        assert!(slot.is_current_for("abc", day(5)));
        assert!(slot.state().is_ready());
    }

    #[test]
    fn test_issue_order_discards_stale() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::IssueOrder);
        let a = slot.issue("abc", day(5));
        let b = slot.issue("abc", day(6));

        assert!(slot.complete(b, Ok(slots(&[10]))));
        assert!(!slot.complete(a, Ok(slots(&[8]))));

        assert_eq!(slot.day().open_hours(), vec![10]);
        assert!(slot.state().is_ready());
    }

    #[test]
    fn test_failure_keeps_stale_data() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::ArrivalOrder);
        let first = slot.issue("abc", day(10));
        slot.complete(first, Ok(slots(&[9])));

        let second = slot.issue("abc", day(11));
        slot.complete(second, Err("503".to_string()));

        assert_eq!(slot.day().open_hours(), vec![9]);
        assert_eq!(
            slot.state().failure(),
            Some(&FlowFailure::AvailabilityFetchFailure("503".to_string()))
        );
    }

    #[test]
    fn test_invalid_hour_is_a_failure() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::ArrivalOrder);
        let request = slot.issue("abc", day(10));
        slot.complete(request, Ok(vec![AvailabilityItem::new(30, true)]));

        assert!(slot.day().is_empty());
        assert!(slot.state().failure().is_some());
    }

    #[test]
    fn test_unknown_request_ignored() {
        let mut slot = AvailabilitySlot::new(RefetchOrdering::ArrivalOrder);
        let request = slot.issue("abc", day(10));
        assert!(slot.complete(request.clone(), Ok(slots(&[9]))));
        assert!(!slot.complete(request, Ok(slots(&[12]))));
        assert_eq!(slot.day().open_hours(), vec![9]);
    }

    #[test]
    fn test_ordering_parse() {
        assert_eq!("issue-order".parse::<RefetchOrdering>(), Ok(RefetchOrdering::IssueOrder));
        assert_eq!("arrival".parse::<RefetchOrdering>(), Ok(RefetchOrdering::ArrivalOrder));
        assert!("random".parse::<RefetchOrdering>().is_err());
    }
}
