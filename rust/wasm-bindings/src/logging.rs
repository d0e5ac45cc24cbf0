// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser console output for `tracing` events.

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;
use wasm_bindgen::JsValue;

/// Forwards events to `console.error/warn/info/log/debug` by level
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut line = ConsoleLine::new(metadata.target());
        event.record(&mut line);

        let text = JsValue::from_str(&line.finish());
        match *metadata.level() {
            Level::ERROR => web_sys::console::error_1(&text),
            Level::WARN => web_sys::console::warn_1(&text),
            Level::INFO => web_sys::console::info_1(&text),
            Level::DEBUG => web_sys::console::log_1(&text),
            Level::TRACE => web_sys::console::debug_1(&text),
        }
    }
}

/// `target: message key=value ...`
struct ConsoleLine {
    target: String,
    message: String,
    fields: String,
}

impl ConsoleLine {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            message: String::new(),
            fields: String::new(),
        }
    }

    fn finish(self) -> String {
        let mut line = format!("{}: {}", self.target, self.message);
        line.push_str(&self.fields);
        line
    }
}

impl Visit for ConsoleLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Parse a level name, defaulting to INFO
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::INFO)
}

/// Install the console subscriber; later calls are no-ops
pub fn init_logging(level: &str) {
    let subscriber = Registry::default()
        .with(parse_level(level))
        .with(ConsoleLayer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Console logging already initialized");
    }
}
