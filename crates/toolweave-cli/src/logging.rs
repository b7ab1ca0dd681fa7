use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the toolweave level
/// from warn to info (`-v`) or debug (`-vv` and up).
pub fn init_logging(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "warn,toolweave=info",
        _ => "info,toolweave=debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer()
        .with_target(verbosity > 1)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
