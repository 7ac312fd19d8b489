use std::process::ExitCode;

use stackwatch::ui::output;

fn main() -> ExitCode {
    match stackwatch::cli::run() {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
