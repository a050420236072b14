use class_scan::app;
use class_scan::config::LOG_ENV;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .init();

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    app::run(std::env::args_os(), &mut stdout, &mut stderr)
}
