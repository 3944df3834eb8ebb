//! Tracing setup
//!
//! `RUST_LOG` wins when set. Otherwise the filter is `info`, or `debug` in
//! development mode. Initialization runs once per process.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

pub fn default_directive(development: bool) -> &'static str {
    if development {
        "shoplist_lib=debug,tower_http=debug,info"
    } else {
        "info"
    }
}

pub fn init_tracing(development: bool) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(development)));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
