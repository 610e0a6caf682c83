//! Scan session orchestration
//!
//! [`ScanController`] owns the single [`StreamSession`] and the decoder
//! subscription. A scan is started and stopped with straight-line async
//! calls; detections are handled on one background task whose behaviour is
//! selected by [`DetectMode`](crate::DetectMode).

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::event::{EventStream, ScanEvent};
use crate::manual::ManualEntry;
use crate::page::Page;
use shelfscan_lookup::{render, render_detection, CatalogClient};
use shelfscan_media::{
    BarcodeDecoder, DetectionSubscription, DeviceEnumerator, DisplaySurface, MediaDevices,
    SessionState, StreamSession, VideoSurface,
};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const EVENT_CAPACITY: usize = 64;

struct Shared {
    config: ScanConfig,
    enumerator: DeviceEnumerator,
    session: Mutex<StreamSession>,
    surface: Arc<dyn DisplaySurface>,
    decoder: Arc<dyn BarcodeDecoder>,
    catalog: CatalogClient,
    page: Arc<dyn Page>,
    events: broadcast::Sender<ScanEvent>,
}

impl Shared {
    fn emit(&self, event: ScanEvent) {
        debug!("📡 {}", event.event_type());
        let _ = self.events.send(event);
    }
}

/// The spawned detection handler plus a flag it raises on exit.
///
/// The handle never leaves the controller, so `stop_scan` can always abort
/// it; waiters watch `done` instead.
struct DetectionTask {
    handle: JoinHandle<()>,
    done: watch::Receiver<bool>,
}

/// Fluent builder for a [`ScanController`]
pub struct ScanControllerBuilder {
    config: ScanConfig,
    devices: Option<Arc<dyn MediaDevices>>,
    decoder: Option<Arc<dyn BarcodeDecoder>>,
    catalog: Option<CatalogClient>,
    page: Option<Arc<dyn Page>>,
    surface: Option<Arc<dyn DisplaySurface>>,
}

impl ScanControllerBuilder {
    pub(crate) fn new(config: ScanConfig) -> Self {
        Self {
            config,
            devices: None,
            decoder: None,
            catalog: None,
            page: None,
            surface: None,
        }
    }

    /// Camera backend (required)
    pub fn media_devices(mut self, devices: Arc<dyn MediaDevices>) -> Self {
        self.devices = Some(devices);
        self
    }

    /// Barcode decoder (required)
    pub fn decoder(mut self, decoder: Arc<dyn BarcodeDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Page the results are shown on (required)
    pub fn page(mut self, page: Arc<dyn Page>) -> Self {
        self.page = Some(page);
        self
    }

    /// Catalog client; defaults to reqwest against the configured endpoint
    pub fn catalog(mut self, catalog: CatalogClient) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Display surface; defaults to an in-process [`VideoSurface`]
    pub fn surface(mut self, surface: Arc<dyn DisplaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn build(self) -> Result<ScanController, ScanError> {
        self.config.validate()?;

        let devices = self.devices.ok_or_else(|| missing("media_devices"))?;
        let decoder = self.decoder.ok_or_else(|| missing("decoder"))?;
        let page = self.page.ok_or_else(|| missing("page"))?;
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => CatalogClient::new(&self.config.catalog).map_err(|e| {
                ScanError::Configuration {
                    message: e.to_string(),
                }
            })?,
        };
        let surface = self
            .surface
            .unwrap_or_else(|| Arc::new(VideoSurface::new()) as Arc<dyn DisplaySurface>);

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Shared {
            enumerator: DeviceEnumerator::new(devices.clone(), self.config.selection_options()),
            session: Mutex::new(StreamSession::new(devices)),
            config: self.config,
            surface,
            decoder,
            catalog,
            page,
            events,
        };

        Ok(ScanController {
            shared: Arc::new(shared),
            detection_task: parking_lot::Mutex::new(None),
        })
    }
}

fn missing(field: &str) -> ScanError {
    ScanError::Configuration {
        message: format!("Missing required configuration: {}", field),
    }
}

/// Starts and stops camera scans and routes detections to the page
pub struct ScanController {
    shared: Arc<Shared>,
    detection_task: parking_lot::Mutex<Option<DetectionTask>>,
}

impl ScanController {
    /// Create a builder for a controller with `config`
    pub fn builder(config: ScanConfig) -> ScanControllerBuilder {
        ScanControllerBuilder::new(config)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.shared.config
    }

    pub fn surface(&self) -> Arc<dyn DisplaySurface> {
        self.shared.surface.clone()
    }

    /// Subscribe to scanner events
    pub fn events(&self) -> EventStream {
        EventStream::new(self.shared.events.subscribe())
    }

    /// Manual ISBN form sharing this controller's catalog and page
    pub fn manual_entry(&self) -> ManualEntry {
        ManualEntry::new(self.shared.catalog.clone(), self.shared.page.clone())
    }

    pub async fn session_state(&self) -> SessionState {
        self.shared.session.lock().await.state()
    }

    /// Whether the decoder's detection loop is running
    pub fn is_scanning(&self) -> bool {
        self.shared.decoder.is_running()
    }

    fn detection_task_alive(&self) -> bool {
        self.detection_task
            .lock()
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }

    /// Start a scan: pick a camera, acquire and attach its stream, then run
    /// the decoder against it.
    ///
    /// Any scan already in progress is fully stopped first. On failure the
    /// scanner is left idle with no stream held.
    pub async fn start_scan(&self) -> Result<(), ScanError> {
        let shared = &self.shared;
        shared.emit(ScanEvent::ScanStarted);

        let active = shared.session.lock().await.is_active();
        if active || self.detection_task_alive() {
            info!("🔁 Scan already running, stopping it before restarting");
            self.stop_scan().await;
        }

        let constraints = shared.enumerator.select_constraints().await;

        let mut session = shared.session.lock().await;
        let (stream_id, device_id) = match session.acquire(&constraints).await {
            Ok(handle) => (handle.id().to_string(), handle.device_id().map(str::to_string)),
            Err(e) => {
                error!(
                    category = ?e.category(),
                    retryable = e.is_recoverable(),
                    "Error starting barcode scanner: {}",
                    e
                );
                shared.emit(ScanEvent::ScanFailed {
                    error: e.to_string(),
                });
                return Err(e.into());
            }
        };
        shared.emit(ScanEvent::StreamAcquired {
            stream_id,
            device_id,
        });

        if let Err(e) = session.attach_to(shared.surface.clone()) {
            session.release();
            shared.emit(ScanEvent::ScanFailed {
                error: e.to_string(),
            });
            return Err(e.into());
        }

        let decoder_config = shared.config.decoder_config();
        if let Err(e) = shared.decoder.init(&decoder_config, shared.surface.clone()).await {
            error!("Barcode decoder initialization error: {}", e);
            let tracks_stopped = session.release();
            shared.emit(ScanEvent::ScanFailed {
                error: e.to_string(),
            });
            shared.emit(ScanEvent::ScanStopped { tracks_stopped });
            return Err(e.into());
        }

        // Subscribe before starting so the first detection cannot be missed
        let subscription = shared.decoder.subscribe();
        shared.decoder.start();
        shared.emit(ScanEvent::DecoderStarted);
        info!(
            "▶️ Scanning with readers {:?} ({:?})",
            decoder_config.reader_names(),
            shared.config.detect_mode
        );

        let (done_tx, done) = watch::channel(false);
        let handle = tokio::spawn(handle_detections(shared.clone(), subscription, done_tx));
        if let Some(previous) = self
            .detection_task
            .lock()
            .replace(DetectionTask { handle, done })
        {
            previous.handle.abort();
        }
        drop(session);
        Ok(())
    }

    /// Stop the decoder and release the camera. Safe to call at any time;
    /// returns the number of hardware tracks stopped.
    pub async fn stop_scan(&self) -> usize {
        // Holding the session lock waits out a start that is still requesting
        let mut session = self.shared.session.lock().await;

        let task = self.detection_task.lock().take();
        let had_task = match task {
            Some(task) => {
                task.handle.abort();
                if let Err(e) = task.handle.await {
                    if !e.is_cancelled() {
                        warn!("Detection task ended abnormally: {}", e);
                    }
                }
                true
            }
            None => false,
        };

        self.shared.decoder.stop();
        let tracks_stopped = session.release();
        drop(session);

        if !had_task && tracks_stopped == 0 {
            info!("Stop requested with no scan in progress");
        }
        self.shared.emit(ScanEvent::ScanStopped { tracks_stopped });
        tracks_stopped
    }

    /// Page teardown: [`stop_scan`](Self::stop_scan) plus a final log line.
    /// Dropping the controller does a best-effort synchronous version.
    pub async fn shutdown(&self) {
        let tracks_stopped = self.stop_scan().await;
        info!("🔌 Scanner shut down ({} track(s) stopped)", tracks_stopped);
    }

    /// Wait until the detection task has finished on its own, e.g. after a
    /// one-shot lookup. Returns immediately if no task is running.
    pub async fn wait_for_detection(&self) {
        let done = self
            .detection_task
            .lock()
            .as_ref()
            .map(|task| task.done.clone());
        if let Some(mut done) = done {
            // A dropped sender means the task was aborted, which also ends the wait
            let _ = done.wait_for(|finished| *finished).await;
        }
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        if let Some(task) = self.detection_task.get_mut().take() {
            task.handle.abort();
        }
        self.shared.decoder.stop();
        match self.shared.session.try_lock() {
            Ok(mut session) => {
                session.release();
            }
            Err(_) => warn!("Scan session busy during shutdown; stream left to its owner"),
        }
    }
}

async fn handle_detections(
    shared: Arc<Shared>,
    mut subscription: DetectionSubscription,
    done: watch::Sender<bool>,
) {
    let mode = shared.config.detect_mode;

    while let Some(code) = subscription.next().await {
        let code = code.value;
        info!("🔎 Barcode detected: {}", code);
        shared.page.show_scan_result(&render_detection(&code));
        shared.emit(ScanEvent::CodeDetected { code: code.clone() });

        if mode.stops_on_detect() {
            shared.decoder.stop();
            let tracks_stopped = shared.session.lock().await.release();
            shared.emit(ScanEvent::ScanStopped { tracks_stopped });
        }

        if mode.looks_up() {
            let result = shared.catalog.lookup(&code).await;
            shared.page.show_book_info(&render(Some(&result)));
            shared.emit(ScanEvent::LookupCompleted {
                isbn: code,
                found: result.found,
            });
        }

        if mode.stops_on_detect() {
            break;
        }
    }

    subscription.unsubscribe();
    debug!("Detection handler finished");
    let _ = done.send(true);
}
