use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::flags::Flags;

/// Environment variable holding a filter directive such as `microsh=debug`.
pub const LOG_ENV: &str = "MICROSH_LOG";

/// Filter used when `MICROSH_LOG` is unset or unparsable.
pub fn default_directive(flags: &Flags) -> &'static str {
    if flags.is_set("debug") {
        "debug"
    } else {
        "warn"
    }
}

/// Sends log events to stderr so they never mix with command output.
pub fn init(flags: &Flags) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(flags)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
