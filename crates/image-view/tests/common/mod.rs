//! Shared test loader: records every request and keeps its completion so the
//! test decides when, where and in which order loads finish.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use image_view::{Bitmap, Completion, Dimension, ImageLoader};

pub struct Request {
    pub source: String,
    pub dimension: Option<Dimension>,
    pub completion: Completion,
}

#[derive(Default)]
pub struct RecordingLoader {
    requests: Mutex<Vec<Request>>,
    history: Mutex<Vec<(String, Option<Dimension>)>>,
}

impl ImageLoader for RecordingLoader {
    fn get(&self, source: &str, dimension: Option<Dimension>, completion: Completion) {
        self.history
            .lock()
            .unwrap()
            .push((source.to_string(), dimension));
        self.requests.lock().unwrap().push(Request {
            source: source.to_string(),
            dimension,
            completion,
        });
    }

    fn is_debug_enabled(&self) -> bool {
        true
    }
}

impl RecordingLoader {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every `(source, dimension)` ever requested, in order.
    pub fn history(&self) -> Vec<(String, Option<Dimension>)> {
        self.history.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.history.lock().unwrap().len()
    }

    /// Remove and return the oldest outstanding request for `source`.
    pub fn take(&self, source: &str) -> Request {
        let mut requests = self.requests.lock().unwrap();
        let idx = requests
            .iter()
            .position(|r| r.source == source)
            .unwrap_or_else(|| panic!("no outstanding request for {source}"));
        requests.remove(idx)
    }

    pub fn take_last(&self) -> Request {
        self.requests
            .lock()
            .unwrap()
            .pop()
            .expect("no outstanding request")
    }
}

/// Deliver `bitmap` for `request` from a freshly spawned thread.
pub fn deliver_on_background_thread(request: Request, bitmap: Bitmap) {
    std::thread::spawn(move || request.completion.deliver(request.source, bitmap))
        .join()
        .unwrap();
}

pub fn bitmap(tag: u8) -> Bitmap {
    Bitmap::solid(2, 2, [tag, tag, tag, 255])
}
