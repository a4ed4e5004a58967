use std::process::ExitCode;

fn main() -> ExitCode {
    gopages::cli::run()
}
