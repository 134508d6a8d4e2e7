use crate::Result;

/// Install a `tracing` subscriber for binaries embedding the event layer.
///
/// Without the `subscriber` feature this is a no-op and the library only emits
/// events for whatever subscriber the host installs.
pub fn init(service_name: &str) -> Result<()> {
    let _ = service_name;

    #[cfg(feature = "subscriber")]
    {
        use tracing_subscriber::{fmt, EnvFilter};

        // Default: info for the event layer and the host, warn for everything else.
        // Can be overridden with `RUST_LOG`.
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("warn,tev_core=info,{service_name}=info"))
        });

        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(true)
            .try_init()
            .map_err(|e| crate::Error::Config(format!("logging already initialized: {e}")))?;
    }

    Ok(())
}
