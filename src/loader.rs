//! Async loading of the resort feed and state boundaries.
//!
//! Uses channel-based communication to bridge async loads with egui's
//! synchronous update loop. Each load is a one-shot operation: no retries,
//! no cancellation.

use crate::data::{parse_feed, ResortRecord};
use crate::error::LoadError;
use crate::geo::GeoLayer;
use eframe::egui;
use std::future::Future;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Result of a completed load.
#[derive(Debug)]
pub enum LoadResult {
    Geography(Result<GeoLayer, LoadError>),
    Feed(Result<Vec<ResortRecord>, LoadError>),
}

/// Channel-based loader for the app's external inputs.
///
/// Loads are async but egui's update() is synchronous. This struct
/// provides a channel to pass results from the async load task back to
/// the UI thread.
pub struct LoadChannel {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
}

impl Default for LoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns the feed fetch and parse.
    pub fn load_feed(&self, ctx: egui::Context, location: String) {
        self.spawn(ctx, async move {
            log::info!("Fetching resort feed from {}", location);
            LoadResult::Feed(fetch_feed(&location).await)
        });
    }

    /// Spawns the boundary file fetch and decode.
    pub fn load_geography(&self, ctx: egui::Context, location: String) {
        self.spawn(ctx, async move {
            log::info!("Fetching state boundaries from {}", location);
            LoadResult::Geography(fetch_geography(&location).await)
        });
    }

    /// Runs `task` off the update loop and sends its result through the channel.
    ///
    /// On native: spawns a new thread using pollster to block on the task.
    /// On WASM: uses wasm_bindgen_futures::spawn_local.
    ///
    /// When the task completes, ctx.request_repaint() is called to trigger a
    /// UI update.
    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<F>(&self, ctx: egui::Context, task: F)
    where
        F: Future<Output = LoadResult> + Send + 'static,
    {
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = pollster::block_on(task);
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn<F>(&self, ctx: egui::Context, task: F)
    where
        F: Future<Output = LoadResult> + 'static,
    {
        let sender = self.sender.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = task.await;
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed load.
    ///
    /// Returns Some(result) if a load completed, None if nothing is ready yet.
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.receiver.try_recv().ok()
    }
}

async fn fetch_feed(location: &str) -> Result<Vec<ResortRecord>, LoadError> {
    let bytes = fetch_bytes(location).await?;
    let text = String::from_utf8(bytes).map_err(|e| LoadError::Parse(e.to_string()))?;
    parse_feed(&text)
}

/// Loads GeoJSON, or a shapefile when the location ends in `.shp`.
async fn fetch_geography(location: &str) -> Result<GeoLayer, LoadError> {
    let bytes = fetch_bytes(location).await?;

    match shapefile_sidecar(location) {
        Some(dbf_location) => {
            let dbf = match fetch_bytes(&dbf_location).await {
                Ok(dbf) => Some(dbf),
                Err(e) => {
                    log::warn!("No attribute table for {}: {}", location, e);
                    None
                }
            };
            GeoLayer::from_shapefile(&bytes, dbf.as_deref())
        }
        None => {
            let text =
                String::from_utf8(bytes).map_err(|e| LoadError::Geography(e.to_string()))?;
            GeoLayer::from_geojson(&text)
        }
    }
}

/// Location of the `.dbf` attribute table for a `.shp` location.
fn shapefile_sidecar(location: &str) -> Option<String> {
    let stem = location
        .strip_suffix(".shp")
        .or_else(|| location.strip_suffix(".SHP"))?;
    Some(format!("{}.dbf", stem))
}

/// Reads a location from the local filesystem.
#[cfg(not(target_arch = "wasm32"))]
async fn fetch_bytes(location: &str) -> Result<Vec<u8>, LoadError> {
    std::fs::read(location).map_err(|e| LoadError::fetch(location, e))
}

/// Fetches a location over HTTP with the browser's fetch API.
#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(location: &str) -> Result<Vec<u8>, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| LoadError::fetch(location, "no window"))?;

    let response = JsFuture::from(window.fetch_with_str(location))
        .await
        .map_err(|e| LoadError::fetch(location, format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| LoadError::fetch(location, "fetch did not return a Response"))?;

    if !response.ok() {
        return Err(LoadError::fetch(
            location,
            format!("HTTP {} {}", response.status(), response.status_text()),
        ));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| LoadError::fetch(location, format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| LoadError::fetch(location, format!("{:?}", e)))?;

    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapefile_sidecar() {
        assert_eq!(
            shapefile_sidecar("./data/states.shp").as_deref(),
            Some("./data/states.dbf")
        );
        assert_eq!(shapefile_sidecar("./data/states.json"), None);
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let err = pollster::block_on(fetch_feed("./does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[test]
    fn test_empty_feed_file_resolves_empty() {
        let path = std::env::temp_dir().join(format!("schnar-empty-{}.csv", std::process::id()));
        std::fs::write(&path, "").unwrap();

        let records = pollster::block_on(fetch_feed(path.to_str().unwrap())).unwrap();
        assert!(records.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    /// Polls the channel the way the update loop does, for up to five seconds.
    fn wait_for(loader: &LoadChannel) -> LoadResult {
        for _ in 0..500 {
            if let Some(result) = loader.try_recv() {
                return result;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("load did not complete");
    }

    #[test]
    fn test_load_feed_delivers_through_channel() {
        let path = std::env::temp_dir().join(format!("schnar-feed-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "Resort Name,state,72 Hour Snowfall,Base Depth,Trails open,lon,lat\n\
             Alta,UT,4in,80in,116,-111.8,40.6\n",
        )
        .unwrap();

        let loader = LoadChannel::new();
        assert!(loader.try_recv().is_none());
        loader.load_feed(egui::Context::default(), path.to_str().unwrap().to_string());

        match wait_for(&loader) {
            LoadResult::Feed(Ok(records)) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].name, "Alta");
            }
            other => panic!("unexpected load result: {:?}", other),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_feed_failure_delivers_error() {
        let loader = LoadChannel::default();
        loader.load_feed(egui::Context::default(), "./does/not/exist.csv".to_string());

        assert!(matches!(
            wait_for(&loader),
            LoadResult::Feed(Err(LoadError::Fetch { .. }))
        ));
    }
}
