use std::process::ExitCode;

use clap::Parser;
use heapalign::args::Args;
use heapalign::status::ExitStatus;

fn main() -> ExitCode {
    let args = Args::parse();
    match heapalign::run(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("heapalign failed");
            for cause in err.chain() {
                eprintln!("  Cause: {cause}");
            }
            ExitStatus::Error.into()
        }
    }
}
