use std::process::ExitCode;

fn main() -> ExitCode {
    margo_cli::run()
}
