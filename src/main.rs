use std::process::ExitCode;

use presence_engine::app;

fn main() -> ExitCode {
    if let Err(err) = app::run() {
        eprintln!("presence: {err}");
        return ExitCode::from(err.exit_code());
    }
    ExitCode::SUCCESS
}
