//! Connectivity watching and the triggered logging pipeline.
//!
//! The [`Watcher`] samples the signal source on a fixed interval, feeds
//! each sample to the transition detector, and on a trigger spawns the
//! resolve-then-append pipeline after a short settle delay. Pipelines
//! spawned by overlapping triggers proceed independently; the log does
//! not guarantee that append order matches trigger order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::Config;
use crate::detector::{TransitionDetector, Trigger};
use crate::error::Result;
use crate::geo::GeoResolver;
use crate::route::RoutePoint;
use crate::signal::SignalSource;
use crate::store::RouteStore;

/// Timestamp format of persisted route points, UTC to whole seconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A lightweight, cloneable handle to stop a running watcher.
#[derive(Debug, Clone, Default)]
pub struct WatchHandle {
    stop_signal: Arc<AtomicBool>,
}

impl WatchHandle {
    /// Create a new handle with the stop signal unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the watcher to stop after its current tick.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }

    /// Reset the stop signal.
    pub fn reset(&self) {
        self.stop_signal.store(false, Ordering::SeqCst);
    }
}

/// Resolve the current location and append it to the route log.
///
/// The accuracy label of the fix becomes the persisted location type.
///
/// # Errors
///
/// Returns an error if resolution fails or the log cannot be written.
pub async fn log_current_location(
    resolver: &dyn GeoResolver,
    store: &RouteStore,
) -> Result<RoutePoint> {
    let fix = resolver.resolve().await?;

    let point = RoutePoint {
        latitude: fix.latitude,
        longitude: fix.longitude,
        timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        location_type: fix.accuracy,
        city: fix.city,
        region: fix.region,
        country: fix.country,
    };

    store.append(&point)?;
    tracing::info!(
        latitude = point.latitude,
        longitude = point.longitude,
        city = %point.city,
        "logged current location"
    );
    Ok(point)
}

/// Caller-supplied location for the manual logging path.
#[derive(Debug, Clone)]
pub struct ManualLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// How the location was obtained (defaults to "Manual" at the CLI).
    pub location_type: String,
    /// City name (may be empty).
    pub city: String,
    /// Region or state name (may be empty).
    pub region: String,
    /// Country name (may be empty).
    pub country: String,
}

/// Append an explicitly provided location to the route log, stamped
/// with the current UTC time.
///
/// Used when the caller already knows the coordinates and the resolver
/// should be skipped.
///
/// # Errors
///
/// Returns an error if the log cannot be written.
pub fn log_manual_location(store: &RouteStore, location: ManualLocation) -> Result<RoutePoint> {
    let point = RoutePoint {
        latitude: location.latitude,
        longitude: location.longitude,
        timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        location_type: location.location_type,
        city: location.city,
        region: location.region,
        country: location.country,
    };

    store.append(&point)?;
    tracing::info!(
        latitude = point.latitude,
        longitude = point.longitude,
        "logged manual location"
    );
    Ok(point)
}

/// Periodic connectivity watcher driving the logging pipeline.
pub struct Watcher {
    source: Box<dyn SignalSource>,
    resolver: Arc<dyn GeoResolver>,
    store: RouteStore,
    detector: TransitionDetector,
    poll_interval: Duration,
    settle_delay: Duration,
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("source", &self.source.name())
            .field("resolver", &self.resolver.name())
            .field("store", &self.store)
            .field("poll_interval", &self.poll_interval)
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

impl Watcher {
    /// Create a watcher over the given source, resolver, and store,
    /// taking its cadence from the configuration.
    #[must_use]
    pub fn new(
        source: Box<dyn SignalSource>,
        resolver: Arc<dyn GeoResolver>,
        store: RouteStore,
        config: &Config,
    ) -> Self {
        Self {
            source,
            resolver,
            store,
            detector: TransitionDetector::new(),
            poll_interval: config.poll_interval(),
            settle_delay: config.settle_delay(),
        }
    }

    /// Take one sample and advance the detector.
    ///
    /// Sampling failures are downgraded to a query-error sample so a
    /// flaky OS query resets the detector instead of killing the loop.
    pub fn tick(&mut self) -> Option<Trigger> {
        let sample = match self.source.sample() {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(source = self.source.name(), error = %e, "signal query failed");
                crate::signal::SignalSample::query_error()
            }
        };

        tracing::trace!(
            quality = sample.quality,
            ssid = sample.ssid.as_deref().unwrap_or("-"),
            "signal sampled"
        );

        self.detector.observe(&sample)
    }

    /// Run the sampling loop until the handle signals stop.
    ///
    /// Each trigger spawns an independent logging pipeline; a failed
    /// pipeline is logged and does not stop the loop.
    pub async fn run(&mut self, handle: &WatchHandle) {
        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            interval.tick().await;
            if handle.should_stop() {
                tracing::info!("watcher stopping");
                return;
            }

            if let Some(trigger) = self.tick() {
                self.spawn_pipeline(trigger);
            }
        }
    }

    fn spawn_pipeline(&self, trigger: Trigger) {
        let resolver = Arc::clone(&self.resolver);
        let store = self.store.clone();
        let settle_delay = self.settle_delay;

        tokio::spawn(async move {
            // Let the network stack settle before asking for our public IP.
            tokio::time::sleep(settle_delay).await;

            match log_current_location(resolver.as_ref(), &store).await {
                Ok(point) => {
                    tracing::info!(
                        network = %trigger.identity,
                        city = %point.city,
                        "route point recorded for network transition"
                    );
                }
                Err(e) => {
                    tracing::warn!(network = %trigger.identity, error = %e, "location log failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::geo::{FixedResolver, GeoFix, SIMULATED_ACCURACY};
    use crate::route;
    use crate::signal::SignalSample;

    struct ScriptedSource {
        samples: Mutex<Vec<SignalSample>>,
    }

    impl ScriptedSource {
        fn new(mut samples: Vec<SignalSample>) -> Self {
            samples.reverse();
            Self {
                samples: Mutex::new(samples),
            }
        }
    }

    impl SignalSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn sample(&self) -> Result<SignalSample> {
            let mut samples = self.samples.lock().unwrap();
            Ok(samples.pop().unwrap_or_else(SignalSample::disconnected))
        }
    }

    fn temp_store(name: &str) -> RouteStore {
        let path = std::env::temp_dir().join(format!(
            "signaltrail_monitor_{}_{}.csv",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        RouteStore::new(path)
    }

    fn fix(lat: f64, lon: f64, city: &str) -> GeoFix {
        GeoFix {
            latitude: lat,
            longitude: lon,
            accuracy: SIMULATED_ACCURACY.to_string(),
            city: city.to_string(),
            region: "Kerala".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn test_watch_handle_stop_and_reset() {
        let handle = WatchHandle::new();
        assert!(!handle.should_stop());

        handle.stop();
        assert!(handle.should_stop());

        handle.reset();
        assert!(!handle.should_stop());
    }

    #[test]
    fn test_watch_handle_clone_shares_signal() {
        let handle1 = WatchHandle::new();
        let handle2 = handle1.clone();

        handle1.stop();
        assert!(handle2.should_stop());
    }

    #[test]
    fn test_tick_emits_triggers_per_transition() {
        let source = ScriptedSource::new(vec![
            SignalSample::disconnected(),
            SignalSample::connected(80, "A"),
            SignalSample::connected(80, "A"),
            SignalSample::connected(70, "B"),
            SignalSample::disconnected(),
        ]);

        let store = temp_store("tick");
        let resolver: Arc<dyn GeoResolver> = Arc::new(FixedResolver::new(fix(9.99, 76.3, "Kochi")));
        let mut watcher = Watcher::new(Box::new(source), resolver, store, &Config::default());

        let triggers: Vec<Option<Trigger>> = (0..5).map(|_| watcher.tick()).collect();

        assert!(triggers[0].is_none());
        assert_eq!(triggers[1].as_ref().map(|t| t.identity.as_str()), Some("A"));
        assert!(triggers[2].is_none());
        assert_eq!(triggers[3].as_ref().map(|t| t.identity.as_str()), Some("B"));
        assert!(triggers[4].is_none());
    }

    #[test]
    fn test_tick_survives_source_failure() {
        struct FailingSource;

        impl SignalSource for FailingSource {
            fn name(&self) -> &'static str {
                "failing"
            }

            fn sample(&self) -> Result<SignalSample> {
                Err(crate::error::Error::internal("no adapter"))
            }
        }

        let store = temp_store("failing");
        let resolver: Arc<dyn GeoResolver> = Arc::new(FixedResolver::new(fix(9.99, 76.3, "Kochi")));
        let mut watcher = Watcher::new(Box::new(FailingSource), resolver, store, &Config::default());

        // A failing source behaves like a disconnect, never a panic.
        assert!(watcher.tick().is_none());
    }

    #[tokio::test]
    async fn test_log_current_location_appends_point() {
        let store = temp_store("log");
        let resolver = FixedResolver::new(fix(9.99, 76.3, "Kochi"));

        let point = log_current_location(&resolver, &store).await.unwrap();
        assert!((point.latitude - 9.99).abs() < f64::EPSILON);
        assert_eq!(point.location_type, SIMULATED_ACCURACY);
        assert_eq!(point.timestamp.len(), "2026-08-30 10:00:00".len());

        let points = route::parse(&store.read_all().unwrap()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].city, "Kochi");

        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn test_log_manual_location_appends_point() {
        let store = temp_store("manual");

        let point = log_manual_location(
            &store,
            ManualLocation {
                latitude: -33.87,
                longitude: 151.21,
                location_type: "Manual".to_string(),
                city: "Sydney".to_string(),
                region: "New South Wales".to_string(),
                country: "Australia".to_string(),
            },
        )
        .unwrap();
        assert_eq!(point.location_type, "Manual");
        assert_eq!(point.timestamp.len(), "2026-08-30 10:00:00".len());

        let points = route::parse(&store.read_all().unwrap()).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].latitude + 33.87).abs() < f64::EPSILON);
        assert_eq!(points[0].city, "Sydney");

        std::fs::remove_file(store.path()).unwrap();
    }

    #[tokio::test]
    async fn test_pipeline_end_to_end() {
        let store = temp_store("pipeline");

        let first = FixedResolver::new(fix(9.99, 76.3, "Kochi"));
        let second = FixedResolver::new(fix(10.00, 76.31, "Aluva"));

        let p1 = log_current_location(&first, &store).await.unwrap();
        let p2 = log_current_location(&second, &store).await.unwrap();

        let points = route::parse(&store.read_all().unwrap()).unwrap();
        let summary = route::RouteSummary::from_points(&points);

        assert_eq!(summary.point_count, 2);
        assert!(summary.distance_meters > 0.0);
        assert_eq!(summary.start_timestamp.as_deref(), Some(p1.timestamp.as_str()));
        assert_eq!(summary.end_timestamp.as_deref(), Some(p2.timestamp.as_str()));

        std::fs::remove_file(store.path()).unwrap();
    }
}
