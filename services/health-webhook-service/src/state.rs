use std::sync::Arc;

use crate::sink::LogSink;

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn LogSink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}
