use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use tavola_core::connector::{SeriesProvider, TavolaConnector};
use tavola_core::{NormalizationMode, SeriesFrame, SeriesId, TavolaError};

use crate::MOCK_VALUE_FIELDS;

/// Instruction for how a fetch should behave for a given identifier.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Return the provided value after a delay.
    ReturnAfter(Duration, T),
    /// Fail immediately with the provided error.
    Fail(TavolaError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// One recorded `fetch_series` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Identifier requested.
    pub id: SeriesId,
    /// Range start.
    pub start: NaiveDate,
    /// Range end.
    pub end: NaiveDate,
}

#[derive(Default)]
struct InternalState {
    // Front is consumed per call; the last entry sticks.
    rules: HashMap<SeriesId, VecDeque<MockBehavior<SeriesFrame>>>,
    calls: Vec<RecordedCall>,
}

#[derive(Default)]
struct Gauge {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    gauge: Arc<Gauge>,
}

impl DynamicMockController {
    /// Set the behavior for every call for a specific identifier.
    pub async fn set_behavior(&self, id: SeriesId, behavior: MockBehavior<SeriesFrame>) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(id, VecDeque::from([behavior]));
    }

    /// Script successive calls for an identifier; the last behavior repeats.
    pub async fn set_sequence(&self, id: SeriesId, behaviors: Vec<MockBehavior<SeriesFrame>>) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(id, behaviors.into());
    }

    /// Number of `fetch_series` calls made for `id`.
    pub async fn call_count(&self, id: &SeriesId) -> usize {
        let guard = self.state.lock().await;
        guard.calls.iter().filter(|c| &c.id == id).count()
    }

    /// Copy of every recorded call, in the order calls started.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        let guard = self.state.lock().await;
        guard.calls.clone()
    }

    /// Highest number of calls observed in flight at the same time.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.gauge.max_in_flight.load(Ordering::SeqCst)
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.calls.clear();
        self.gauge.max_in_flight.store(0, Ordering::SeqCst);
    }
}

/// A connector that defers all behavior to an external controller.
///
/// Identifiers without a configured behavior fail with `UnknownSeries`.
pub struct DynamicMockConnector {
    name: &'static str,
    value_fields: &'static [&'static str],
    normalization: NormalizationMode,
    state: Arc<Mutex<InternalState>>,
    gauge: Arc<Gauge>,
}

struct InFlight<'a>(&'a Gauge);

impl<'a> InFlight<'a> {
    fn enter(gauge: &'a Gauge) -> Self {
        let now = gauge.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        gauge.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(gauge)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TavolaConnector>, DynamicMockController) {
        Self::new_with_fields(name, MOCK_VALUE_FIELDS, NormalizationMode::MonthStart)
    }

    /// Like [`Self::new_with_controller`] with explicit value fields and default normalization.
    #[must_use]
    pub fn new_with_fields(
        name: &'static str,
        value_fields: &'static [&'static str],
        normalization: NormalizationMode,
    ) -> (Arc<dyn TavolaConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let gauge = Arc::new(Gauge::default());
        let controller = DynamicMockController {
            state: Arc::clone(&state),
            gauge: Arc::clone(&gauge),
        };
        let me = Arc::new(Self {
            name,
            value_fields,
            normalization,
            state,
            gauge,
        });
        (me as Arc<dyn TavolaConnector>, controller)
    }
}

impl TavolaConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn default_normalization(&self) -> NormalizationMode {
        self.normalization
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }
}

#[async_trait]
impl SeriesProvider for DynamicMockConnector {
    async fn fetch_series(
        &self,
        id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesFrame, TavolaError> {
        let _guard = InFlight::enter(&self.gauge);
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push(RecordedCall {
                id: id.clone(),
                start,
                end,
            });
            guard.rules.get_mut(id).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        match behavior {
            Some(MockBehavior::Return(frame)) => Ok(frame),
            Some(MockBehavior::ReturnAfter(delay, frame)) => {
                tokio::time::sleep(delay).await;
                Ok(frame)
            }
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(series = %id, "no behavior configured");
                Err(TavolaError::unknown_series(id.as_str()))
            }
        }
    }

    fn value_fields(&self) -> &'static [&'static str] {
        self.value_fields
    }
}
