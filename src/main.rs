use std::process::ExitCode;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = pkg_migrate::cli::parse();
    app::run(args)
}
