// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model loading seams and progress reporting.

use crate::error::LoadError;
use crate::model::Model;

/// Overlay text while the loader has not reported progress yet
pub const LOADING_MESSAGE: &str = "Loading";

/// Byte progress of a running load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl LoadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    /// Whole percentage, rounded down and capped at 100.
    ///
    /// `None` while the total size is unknown.
    pub fn percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let percent = (self.loaded as u128 * 100) / self.total as u128;
        Some(percent.min(100) as u32)
    }

    /// Overlay text for this progress
    pub fn message(&self) -> String {
        match self.percent() {
            Some(percent) => format!("Loaded {percent}%"),
            None => LOADING_MESSAGE.to_string(),
        }
    }
}

/// Blocking progress overlay shown during a load.
///
/// Takes `&self` so a clone can be handed to the loader's progress callback
/// while the session stays borrowed elsewhere.
pub trait LoadingOverlay {
    fn show(&self, message: &str);
    fn set_message(&self, message: &str);
    fn hide(&self);
}

/// Asynchronous IFC model loader.
#[allow(async_fn_in_trait)]
pub trait ModelLoader {
    /// Load the model at `url`, reporting progress through `on_progress`
    async fn load<F>(&self, url: &str, on_progress: F) -> Result<Model, LoadError>
    where
        F: FnMut(LoadProgress) + 'static;
}

/// Proof that a load was admitted; consumed when the load finishes.
#[derive(Debug)]
#[must_use = "a load ticket must be passed to finish_load"]
pub struct LoadTicket {
    url: String,
}

impl LoadTicket {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
