//! The polling loop: fetch, diff, notify, log, sleep.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use pickupwatch_core::{AvailabilitySnapshot, TransitionDetector};
use pickupwatch_fetch::{FetchError, PickupClient};
use pickupwatch_notify::{BarkClient, NotifyError, NotifyOutcome};

use crate::log::CsvLog;
use crate::message;

/// Produces one availability snapshot per poll cycle.
pub trait AvailabilitySource {
    fn fetch(&self) -> impl Future<Output = Result<AvailabilitySnapshot, FetchError>>;
}

impl AvailabilitySource for PickupClient {
    async fn fetch(&self) -> Result<AvailabilitySnapshot, FetchError> {
        self.fetch_availability().await
    }
}

/// Delivers one push notification, best-effort.
pub trait PushSink {
    fn push(
        &self,
        title: &str,
        body: &str,
    ) -> impl Future<Output = Result<NotifyOutcome, NotifyError>>;
}

impl PushSink for BarkClient {
    async fn push(&self, title: &str, body: &str) -> Result<NotifyOutcome, NotifyError> {
        BarkClient::push(self, title, body).await
    }
}

/// Source of the randomized inter-cycle delay.
pub trait DelaySource {
    fn next_delay(&mut self) -> Duration;
}

/// Draws each delay uniformly from an inclusive range of seconds. This is
/// the self-throttle against the rate-sensitive upstream endpoint.
pub struct UniformDelay {
    min_secs: u64,
    max_secs: u64,
}

impl UniformDelay {
    /// Callers validate `min_secs <= max_secs` at config load.
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }
}

impl DelaySource for UniformDelay {
    fn next_delay(&mut self) -> Duration {
        use rand::Rng;
        #[allow(clippy::cast_precision_loss)]
        let secs = rand::rng().random_range(self.min_secs as f64..=self.max_secs as f64);
        Duration::from_secs_f64(secs)
    }
}

/// Clock seam so tests can pin timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// What happened during one poll cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub fetch_failed: bool,
    pub transitions: usize,
    pub pushes_sent: usize,
    pub pushes_skipped: usize,
    pub push_failures: usize,
    pub log_failures: usize,
}

/// The monitor loop driver.
///
/// Strictly sequential: one fetch in flight at a time, side effects per
/// transition, then sleep. The detector (and with it the previous snapshot)
/// is owned here and nowhere else.
pub struct Monitor<S, P, D, C> {
    source: S,
    sink: P,
    log: CsvLog,
    delays: D,
    clock: C,
    detector: TransitionDetector,
    tz: Tz,
}

impl<S, P, D, C> Monitor<S, P, D, C>
where
    S: AvailabilitySource,
    P: PushSink,
    D: DelaySource,
    C: Clock,
{
    #[must_use]
    pub fn new(
        source: S,
        sink: P,
        log: CsvLog,
        delays: D,
        clock: C,
        detector: TransitionDetector,
        tz: Tz,
    ) -> Self {
        Self {
            source,
            sink,
            log,
            delays,
            clock,
            detector,
            tz,
        }
    }

    #[must_use]
    pub fn detector(&self) -> &TransitionDetector {
        &self.detector
    }

    /// Runs one poll cycle: fetch, diff, push + log per transition, print
    /// the aggregate status line.
    ///
    /// A fetch failure is absorbed here — the previous snapshot stays
    /// untouched and the next cycle is the retry. Push and log failures are
    /// logged and never abort the cycle or affect other stores.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "availability fetch failed; keeping previous snapshot");
                println!("{}", message::failure_line(self.clock.now(), self.tz, &err));
                report.fetch_failed = true;
                return report;
            }
        };

        let events = self.detector.observe(snapshot);
        report.transitions = events.len();

        for event in &events {
            tracing::info!(
                store = %event.store_number,
                name = %event.store_name,
                previous = %event.previous_state,
                "store flipped to available"
            );

            match self
                .sink
                .push(
                    &message::event_title(event),
                    &message::event_body(event, self.tz),
                )
                .await
            {
                Ok(NotifyOutcome::Sent) => report.pushes_sent += 1,
                Ok(NotifyOutcome::Skipped) => report.pushes_skipped += 1,
                Err(err) => {
                    report.push_failures += 1;
                    tracing::warn!(store = %event.store_number, error = %err, "push failed");
                }
            }

            if let Err(err) = self.log.append(event) {
                report.log_failures += 1;
                tracing::error!(
                    store = %event.store_number,
                    error = %err,
                    "failed to append transition log — record lost"
                );
            }
        }

        if let Some(stored) = self.detector.previous() {
            println!("{}", message::status_line(stored, self.tz));
        }

        report
    }

    /// Polls until `shutdown` resolves. The signal is observed between
    /// cycles, never mid-write, so the log file stays intact.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            let report = self.run_cycle().await;
            tracing::debug!(
                fetch_failed = report.fetch_failed,
                transitions = report.transitions,
                "cycle complete"
            );

            let delay = self.delays.next_delay();
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown signal received — stopping monitor");
                    break;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, VecDeque};

    use chrono::TimeZone;
    use pickupwatch_core::{AvailabilityState, StoreStatus};

    use super::*;

    struct ScriptedSource {
        cycles: RefCell<VecDeque<Result<AvailabilitySnapshot, FetchError>>>,
    }

    impl ScriptedSource {
        fn new(cycles: Vec<Result<AvailabilitySnapshot, FetchError>>) -> Self {
            Self {
                cycles: RefCell::new(cycles.into()),
            }
        }
    }

    impl AvailabilitySource for ScriptedSource {
        async fn fetch(&self) -> Result<AvailabilitySnapshot, FetchError> {
            self.cycles
                .borrow_mut()
                .pop_front()
                .expect("test drove more cycles than scripted")
        }
    }

    struct RecordingSink {
        fail: bool,
        pushes: RefCell<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                pushes: RefCell::new(Vec::new()),
            }
        }
    }

    impl PushSink for RecordingSink {
        async fn push(&self, title: &str, body: &str) -> Result<NotifyOutcome, NotifyError> {
            if self.fail {
                return Err(NotifyError::UnexpectedStatus {
                    status: 503,
                    body_prefix: "overloaded".to_string(),
                });
            }
            self.pushes
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
            Ok(NotifyOutcome::Sent)
        }
    }

    struct FixedDelay;

    impl DelaySource for FixedDelay {
        fn next_delay(&mut self) -> Duration {
            Duration::ZERO
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 10, 2, 0, 0, 0).unwrap()
        }
    }

    fn snapshot(cycle: u32, entries: &[(&str, AvailabilityState)]) -> AvailabilitySnapshot {
        let stores: BTreeMap<String, StoreStatus> = entries
            .iter()
            .map(|(number, state)| {
                (
                    (*number).to_string(),
                    StoreStatus {
                        store_name: format!("Store {number}"),
                        city: Some("Seoul".to_string()),
                        state: *state,
                        quote: None,
                    },
                )
            })
            .collect();
        AvailabilitySnapshot::new(
            Utc.with_ymd_and_hms(2025, 10, 2, 9, 0, cycle).unwrap(),
            stores,
        )
    }

    fn monitor(
        cycles: Vec<Result<AvailabilitySnapshot, FetchError>>,
        sink: RecordingSink,
        log_path: &std::path::Path,
    ) -> Monitor<ScriptedSource, RecordingSink, FixedDelay, FixedClock> {
        Monitor::new(
            ScriptedSource::new(cycles),
            sink,
            CsvLog::new(log_path, chrono_tz::Asia::Seoul),
            FixedDelay,
            FixedClock,
            TransitionDetector::new("MFYQ4KH/A"),
            chrono_tz::Asia::Seoul,
        )
    }

    fn transport_error() -> FetchError {
        FetchError::UnexpectedStatus {
            status: 500,
            url: "http://test/pickup".to_string(),
        }
    }

    #[tokio::test]
    async fn bootstrap_cycle_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.csv");
        let mut monitor = monitor(
            vec![Ok(snapshot(0, &[("R764", AvailabilityState::Available)]))],
            RecordingSink::new(false),
            &log_path,
        );

        let report = monitor.run_cycle().await;

        assert_eq!(report.transitions, 0);
        assert_eq!(report.pushes_sent, 0);
        assert!(monitor.sink.pushes.borrow().is_empty());
        assert!(!log_path.exists());
    }

    #[tokio::test]
    async fn transition_pushes_and_logs_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.csv");
        let mut monitor = monitor(
            vec![
                Ok(snapshot(0, &[("R764", AvailabilityState::Unavailable)])),
                Ok(snapshot(1, &[("R764", AvailabilityState::Available)])),
                Ok(snapshot(2, &[("R764", AvailabilityState::Available)])),
            ],
            RecordingSink::new(false),
            &log_path,
        );

        monitor.run_cycle().await;
        let report = monitor.run_cycle().await;
        assert_eq!(report.transitions, 1);
        assert_eq!(report.pushes_sent, 1);

        // The repeat available cycle is silent.
        let report = monitor.run_cycle().await;
        assert_eq!(report.transitions, 0);

        let pushes = monitor.sink.pushes.borrow();
        assert_eq!(pushes.len(), 1);
        assert!(pushes[0].0.contains("Store R764"));

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2); // header + one row
        assert!(content.lines().nth(1).unwrap().contains("R764"));
    }

    #[tokio::test]
    async fn fetch_failure_preserves_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.csv");
        let mut monitor = monitor(
            vec![
                Ok(snapshot(0, &[("R764", AvailabilityState::Unavailable)])),
                Err(transport_error()),
                Ok(snapshot(2, &[("R764", AvailabilityState::Available)])),
            ],
            RecordingSink::new(false),
            &log_path,
        );

        monitor.run_cycle().await;
        let before = monitor.detector().previous().cloned();

        let report = monitor.run_cycle().await;
        assert!(report.fetch_failed);
        assert_eq!(monitor.detector().previous().cloned(), before);

        // The flip is still caught on the next successful cycle.
        let report = monitor.run_cycle().await;
        assert_eq!(report.transitions, 1);
        assert_eq!(report.pushes_sent, 1);
    }

    #[tokio::test]
    async fn push_failure_never_blocks_the_log_append() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.csv");
        let mut monitor = monitor(
            vec![
                Ok(snapshot(0, &[("R764", AvailabilityState::Unavailable)])),
                Ok(snapshot(1, &[("R764", AvailabilityState::Available)])),
            ],
            RecordingSink::new(true),
            &log_path,
        );

        monitor.run_cycle().await;
        let report = monitor.run_cycle().await;

        assert_eq!(report.push_failures, 1);
        assert_eq!(report.log_failures, 0);
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn log_failure_does_not_abort_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the log path makes every append fail.
        let log_path = dir.path().join("log.csv");
        std::fs::create_dir_all(&log_path).unwrap();

        let mut monitor = monitor(
            vec![
                Ok(snapshot(0, &[("R764", AvailabilityState::Unavailable)])),
                Ok(snapshot(1, &[("R764", AvailabilityState::Available)])),
            ],
            RecordingSink::new(false),
            &log_path,
        );

        monitor.run_cycle().await;
        let report = monitor.run_cycle().await;

        assert_eq!(report.transitions, 1);
        assert_eq!(report.pushes_sent, 1);
        assert_eq!(report.log_failures, 1);
    }

    #[tokio::test]
    async fn two_stores_flipping_produce_two_events_in_one_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.csv");
        let mut monitor = monitor(
            vec![
                Ok(snapshot(
                    0,
                    &[
                        ("R123", AvailabilityState::Unavailable),
                        ("R764", AvailabilityState::Unavailable),
                    ],
                )),
                Ok(snapshot(
                    1,
                    &[
                        ("R123", AvailabilityState::Available),
                        ("R764", AvailabilityState::Available),
                    ],
                )),
            ],
            RecordingSink::new(false),
            &log_path,
        );

        monitor.run_cycle().await;
        let report = monitor.run_cycle().await;

        assert_eq!(report.transitions, 2);
        assert_eq!(report.pushes_sent, 2);
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
