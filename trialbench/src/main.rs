use std::process::ExitCode;

fn main() -> ExitCode {
    match trialbench::run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
