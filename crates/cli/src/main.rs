use std::process::ExitCode;

fn main() -> ExitCode {
    dermastudio_cli::run()
}
