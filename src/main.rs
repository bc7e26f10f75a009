use std::ffi::OsString;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;

use forkwatch::{
    Config, ConfigError, LogWriter, RetryPolicy, Route, RuntimeError, SignalName, SignalRoutes,
    Supervisor,
};

const ABOUT: &str = concat!(
    "forkwatch-",
    env!("CARGO_PKG_VERSION"),
    " - forks and watches multiple instances of a program in the same environment"
);

/// Command line of the supervisor.
#[derive(Parser, Debug)]
#[command(
    name = "forkwatch",
    about = ABOUT,
    override_usage = "forkwatch [OPTIONS] <application> [app arguments]...",
    disable_version_flag = true
)]
struct Cli {
    /// Number of children to fork and watch
    #[arg(short, long, value_name = "children", default_value_t = 1, allow_negative_numbers = true)]
    forks: i64,

    /// Number of retries to fork a single child
    #[arg(short, long, value_name = "retries", default_value_t = 3, allow_negative_numbers = true)]
    retry: i64,

    /// Retry timeout in ms; if the child dies after the timeout the retry counter is reset
    #[arg(short, long, value_name = "ms", default_value_t = 10_000, allow_negative_numbers = true)]
    timeout: i64,

    /// Signal sent to children on the first terminating signal (HUP, INT, QUIT, TERM, USR1, USR2 or none)
    #[arg(short, long, value_name = "signal", default_value = "none", value_parser = parse_graceful)]
    signal: Graceful,

    /// Treat this signal as a request to terminate (repeatable)
    #[arg(long = "terminate-on", value_name = "signal", value_parser = parse_signal)]
    terminate_on: Vec<SignalName>,

    /// Relay this signal without terminating (repeatable)
    #[arg(long = "forward", value_name = "signal", value_parser = parse_signal)]
    forward: Vec<SignalName>,

    /// Show version
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Program to run, followed by its arguments
    #[arg(value_name = "application", trailing_var_arg = true, allow_hyphen_values = true)]
    app: Vec<OsString>,
}

/// Parsed `--signal` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Graceful(Option<SignalName>);

fn parse_signal(s: &str) -> Result<SignalName, ConfigError> {
    s.parse()
}

fn parse_graceful(s: &str) -> Result<Graceful, ConfigError> {
    if s.trim().eq_ignore_ascii_case("none") {
        Ok(Graceful(None))
    } else {
        parse_signal(s).map(|sig| Graceful(Some(sig)))
    }
}

impl Cli {
    /// Validates the raw options into a supervisor configuration.
    fn into_config(self) -> Result<Config, ConfigError> {
        if self.app.first().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::MissingProgram);
        }
        let forks = usize::try_from(self.forks)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(ConfigError::InvalidForks { value: self.forks })?;
        let max_retries = u32::try_from(self.retry)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(ConfigError::InvalidRetry { value: self.retry })?;
        let reset_ms = u64::try_from(self.timeout)
            .map_err(|_| ConfigError::InvalidTimeout { value: self.timeout })?;

        if let Some(sig) = self.terminate_on.iter().find(|s| self.forward.contains(s)) {
            return Err(ConfigError::ConflictingRoute { signal: *sig });
        }
        let routes = self
            .terminate_on
            .iter()
            .map(|sig| (*sig, Route::Terminate))
            .chain(self.forward.iter().map(|sig| (*sig, Route::Forward)))
            .fold(SignalRoutes::default(), |routes, (sig, route)| {
                routes.with(sig, route)
            });

        let cfg = Config {
            argv: self.app,
            forks,
            retry: RetryPolicy {
                max_retries,
                reset_after: Duration::from_millis(reset_ms),
            },
            graceful: self.signal.0,
            routes,
            ..Config::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Option parsing failed: {e}");
            process::exit(-1);
        }
    };

    if cli.version {
        println!("{ABOUT}");
        process::exit(0);
    }

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("forkwatch: [{}] {}", e.as_label(), e.as_message());
            e.exit_code()
        }
    };
    process::exit(code);
}

async fn run(cli: Cli) -> Result<(), RuntimeError> {
    let cfg = cli.into_config()?;
    let sup = Supervisor::builder(cfg)
        .with_subscribers(vec![Arc::new(LogWriter::new())])
        .build()?;
    sup.run().await
}
