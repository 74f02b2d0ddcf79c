use std::process::ExitCode;

fn main() -> ExitCode {
    troquey_cli::run()
}
