mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    match app::build_app() {
        Ok(wiring) => app::run(wiring),
        Err(code) => code,
    }
}
