use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CRATE_TARGET: &str = "kastoko";

/// Installs the global subscriber, writing to stderr so tables on stdout stay clean.
///
/// `--verbose` enables debug output for this crate only. `RUST_LOG` replaces
/// the default filter entirely.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}

fn default_directives(verbose: bool) -> String {
    if verbose {
        format!("off,{CRATE_TARGET}=debug")
    } else {
        "off".to_string()
    }
}
