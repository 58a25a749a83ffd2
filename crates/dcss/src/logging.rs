use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::args::GlobalArgs;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-q`/`-v`, with
/// `debug = true` in the settings raising it to at least `debug`.
pub fn init_tracing(args: &GlobalArgs, debug: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(args, debug)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(args.verbose > 1)
        .with_filter(env_filter);

    Registry::default().with(stderr_layer).init();
}

fn default_level(args: &GlobalArgs, debug: bool) -> &'static str {
    if args.quiet {
        return "error";
    }
    let verbose = if debug { args.verbose.max(2) } else { args.verbose };
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
