//! Poll loop behind every status stream.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

use space_core::config::status::StatusConfig;
use space_core::error::AppError;
use space_core::result::AppResult;
use space_service::{StatusAggregator, StatusRequest};

use super::frame::Frame;
use super::session::StreamSession;

/// Opens status streams.
#[derive(Debug, Clone)]
pub struct StreamController {
    /// Aggregator polled on every data tick.
    aggregator: Arc<StatusAggregator>,
    /// Heartbeat cadence; zero disables heartbeats.
    heartbeat: Duration,
    /// Smallest accepted poll interval.
    min_interval_ms: u64,
    /// Frames buffered per stream.
    buffer: usize,
    /// Parent of every stream's cancellation token.
    shutdown: CancellationToken,
}

impl StreamController {
    /// Creates a new controller.
    pub fn new(
        aggregator: Arc<StatusAggregator>,
        heartbeat: Duration,
        min_interval_ms: u64,
        buffer: usize,
    ) -> Self {
        Self {
            aggregator,
            heartbeat,
            min_interval_ms,
            buffer: buffer.max(1),
            shutdown: CancellationToken::new(),
        }
    }

    /// End every stream when `shutdown` is cancelled.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Creates a controller from the status configuration.
    pub fn from_config(aggregator: Arc<StatusAggregator>, config: &StatusConfig) -> Self {
        Self::new(
            aggregator,
            config.heartbeat_interval(),
            config.min_interval_ms,
            config.stream_buffer,
        )
    }

    /// Check a requested poll interval.
    pub fn validate_interval(&self, interval_ms: u64) -> AppResult<Duration> {
        if interval_ms == 0 || interval_ms < self.min_interval_ms {
            return Err(AppError::validation(format!(
                "Invalid interval: must be at least {}ms",
                self.min_interval_ms
            )));
        }
        Ok(Duration::from_millis(interval_ms))
    }

    /// Open a stream for `request`, polling every `interval_ms`.
    ///
    /// The first snapshot is emitted immediately. Dropping the returned
    /// stream stops both the poll and the heartbeat timers.
    pub fn open(&self, request: StatusRequest, interval_ms: u64) -> AppResult<StatusStream> {
        let interval = self.validate_interval(interval_ms)?;
        let (tx, rx) = mpsc::channel(self.buffer);
        let token = self.shutdown.child_token();
        let session = StreamSession::new();

        info!(
            stream_id = %session.id,
            source = %request.source,
            user_key = request.user_key,
            interval_ms,
            "Status stream opened"
        );

        tokio::spawn(run_stream(
            Arc::clone(&self.aggregator),
            request,
            interval,
            self.heartbeat,
            session,
            tx,
            token.clone(),
        ));

        Ok(StatusStream {
            rx,
            _guard: token.drop_guard(),
        })
    }
}

/// Frames of one open stream.
///
/// Owns the cancellation guard of its poll task.
#[derive(Debug)]
pub struct StatusStream {
    rx: mpsc::Receiver<Frame>,
    _guard: DropGuard,
}

impl Stream for StatusStream {
    type Item = Frame;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        self.rx.poll_recv(cx)
    }
}

async fn run_stream(
    aggregator: Arc<StatusAggregator>,
    request: StatusRequest,
    interval: Duration,
    heartbeat: Duration,
    mut session: StreamSession,
    tx: mpsc::Sender<Frame>,
    token: CancellationToken,
) {
    let mut poll = time::interval(interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut keepalive = (!heartbeat.is_zero()).then(|| {
        let mut keepalive = time::interval_at(Instant::now() + heartbeat, heartbeat);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        keepalive
    });

    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            _ = poll.tick() => {
                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    result = aggregator.get_status(&request) => result,
                };

                match result {
                    Ok(snapshot) => {
                        if session.observe(&snapshot)
                            && tx.send(Frame::Snapshot(Box::new(snapshot))).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(stream_id = %session.id, error = %e, "Status poll failed, skipping tick");
                    }
                }
            }

            _ = next_heartbeat(&mut keepalive) => {
                if tx.send(Frame::Heartbeat).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(stream_id = %session.id, "Status stream closed");
}

async fn next_heartbeat(keepalive: &mut Option<Interval>) {
    match keepalive {
        Some(keepalive) => {
            keepalive.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::DateTime;
    use futures::StreamExt;
    use space_cache::CacheManager;
    use space_cache::memory::MemoryCacheProvider;
    use space_core::config::cache::MemoryCacheConfig;
    use space_core::error::ErrorKind;
    use space_core::traits::clock::ManualClock;
    use space_entity::status::{Activity, RawActivity, SourceKind};
    use space_service::status::source::NowPlayingSource;
    use space_service::{CacheActivityStore, InactivityClassifier, SourceRegistry};

    #[derive(Debug, Default)]
    struct Player {
        song: Mutex<String>,
        failures_left: AtomicUsize,
        calls: AtomicUsize,
    }

    impl Player {
        fn play(&self, song: &str) {
            *self.song.lock().unwrap() = song.to_string();
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NowPlayingSource for Player {
        fn kind(&self) -> SourceKind {
            SourceKind::Ncm
        }

        async fn fetch(&self, user_key: u64) -> AppResult<RawActivity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures_left.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_left.store(remaining - 1, Ordering::SeqCst);
                return Err(AppError::upstream("timeout"));
            }

            let mut raw = RawActivity::idle(user_key);
            raw.activity = Some(Activity {
                id: self.song.lock().unwrap().clone(),
                ..Activity::default()
            });
            Ok(raw)
        }
    }

    struct Fixture {
        player: Arc<Player>,
        clock: Arc<ManualClock>,
        controller: StreamController,
    }

    fn fixture() -> Fixture {
        let player = Arc::new(Player::default());
        player.play("song-A");
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
            &MemoryCacheConfig::default(),
        )));
        let store = CacheActivityStore::new(Arc::new(cache));
        let aggregator = StatusAggregator::new(
            SourceRegistry::new().with(player.clone()),
            InactivityClassifier::new(Arc::new(store), chrono::Duration::minutes(5)),
            clock.clone(),
        );
        let controller =
            StreamController::new(Arc::new(aggregator), Duration::from_secs(30), 1000, 16);

        Fixture {
            player,
            clock,
            controller,
        }
    }

    fn request() -> StatusRequest {
        StatusRequest::new(SourceKind::Ncm, 42)
    }

    fn assert_elapsed(start: Instant, seconds: u64) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_secs(seconds) && elapsed < Duration::from_secs(seconds) + Duration::from_millis(500),
            "expected ~{seconds}s, got {elapsed:?}"
        );
    }

    fn activity_id(frame: &Frame) -> Option<&str> {
        frame
            .snapshot()
            .and_then(|s| s.observed_activity_id.as_deref())
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_below_minimum_rejected_before_polling() {
        let f = fixture();

        let err = f.controller.open(request(), 999).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid interval: must be at least 1000ms");
        assert_eq!(f.player.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected_even_without_minimum() {
        let f = fixture();
        let controller = StreamController {
            min_interval_ms: 0,
            ..f.controller.clone()
        };

        let err = controller.open(request(), 0).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(f.player.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_heartbeat_streams_without_heartbeats() {
        let f = fixture();
        let controller = StreamController {
            heartbeat: Duration::ZERO,
            ..f.controller.clone()
        };
        let mut stream = controller.open(request(), 1000).unwrap();

        let first = stream.next().await.unwrap();
        assert_eq!(activity_id(&first), Some("song-A"));

        f.player.play("song-B");
        let next = time::timeout(Duration::from_secs(120), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(activity_id(&next), Some("song-B"));

        let quiet = time::timeout(Duration::from_secs(120), stream.next()).await;
        assert!(quiet.is_err(), "no heartbeat expected");
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_snapshots_emit_one_frame() {
        let f = fixture();
        let mut stream = f.controller.open(request(), 1000).unwrap();

        let first = stream.next().await.unwrap();
        assert_eq!(activity_id(&first), Some("song-A"));

        let quiet = time::timeout(Duration::from_secs(10), stream.next()).await;
        assert!(quiet.is_err(), "no frame expected for unchanged status");
        assert!(f.player.calls() >= 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_is_pushed_on_next_tick() {
        let f = fixture();
        let mut stream = f.controller.open(request(), 1000).unwrap();
        stream.next().await.unwrap();

        let start = Instant::now();
        f.player.play("song-B");
        let frame = stream.next().await.unwrap();

        assert_eq!(activity_id(&frame), Some("song-B"));
        assert!(frame.snapshot().unwrap().is_active());
        assert!(start.elapsed() <= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_going_stale_is_pushed() {
        let f = fixture();
        let mut stream = f.controller.open(request(), 1000).unwrap();
        stream.next().await.unwrap();

        f.clock.advance(chrono::Duration::minutes(5));
        let frame = stream.next().await.unwrap();

        let snapshot = frame.snapshot().unwrap();
        assert!(!snapshot.is_active());
        assert!(snapshot.activity.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_cadence_independent_of_data() {
        let f = fixture();
        let start = Instant::now();
        let mut stream = f.controller.open(request(), 1000).unwrap();
        stream.next().await.unwrap();

        let frame = stream.next().await.unwrap();
        assert!(frame.is_heartbeat());
        assert_elapsed(start, 30);

        let frame = stream.next().await.unwrap();
        assert!(frame.is_heartbeat());
        assert_elapsed(start, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_ticks_are_skipped() {
        let f = fixture();
        f.player.failures_left.store(2, Ordering::SeqCst);
        let start = Instant::now();
        let mut stream = f.controller.open(request(), 1000).unwrap();

        let frame = stream.next().await.unwrap();

        assert_eq!(activity_id(&frame), Some("song-A"));
        assert_elapsed(start, 2);
        assert_eq!(f.player.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_ends_open_streams() {
        let f = fixture();
        let shutdown = CancellationToken::new();
        let controller = f.controller.clone().with_shutdown(shutdown.clone());
        let mut stream = controller.open(request(), 1000).unwrap();
        stream.next().await.unwrap();

        shutdown.cancel();

        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_stream_stops_polling() {
        let f = fixture();
        let mut stream = f.controller.open(request(), 1000).unwrap();
        stream.next().await.unwrap();
        time::sleep(Duration::from_millis(3500)).await;

        drop(stream);
        time::sleep(Duration::from_millis(10)).await;
        let calls = f.player.calls();

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(f.player.calls(), calls);
    }
}
