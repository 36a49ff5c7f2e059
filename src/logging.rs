use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config as LogConfig,
};

use crate::api::{ApiRequest, ApiResponse};

/// A unique identifier for a particular outgoing request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Log an outgoing request.
pub fn log_request(id: RequestId, request: &ApiRequest) {
    let method = request.method;
    let path = request.path();
    let auth = if request.bearer.is_some() {
        ""
    } else {
        " (unauthenticated)"
    };
    info!("->req{id} {method} {path}{auth}");
}

/// Log the response to a request, at a level matching its status class.
pub fn log_response(id: RequestId, endpoint: &str, response: &ApiResponse) {
    let code = response.status;
    let log_msg = format!("<-rsp{id} {code} {endpoint}");
    match code {
        500..=599 => error!("{log_msg}"),
        400..=499 => warn!("{log_msg}"),
        _ => info!("{log_msg}"),
    }
}

/// Log a request that never got a response.
pub fn log_failure(id: RequestId, endpoint: &str, err: &crate::Error) {
    error!("<-rsp{id} FAILED {endpoint}: {err}");
}

/// Initialise log4rs from a YAML file, falling back to plain console output
/// at `info` when the file is absent.
pub fn init(config_path: &Path) -> Result<(), String> {
    if config_path.exists() {
        log4rs::init_file(config_path, log4rs_dynamic_filters::default_deserializers())
            .map_err(|e| e.to_string())?;
    } else {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {m}{n}")))
            .build();
        let config = LogConfig::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info))
            .map_err(|e| e.to_string())?;
        log4rs::init_config(config).map_err(|e| e.to_string())?;
    }
    info!("Initialised logging");
    Ok(())
}
