use std::path::Path;

use koord::capabilities::Capabilities;
use koord::launch::{self, Launch};
use koord::logging::init_tracing;
use koord::shutdown::{listen_for_signals, ShutdownCoordinator};

#[tokio::main]
async fn main() {
    init_tracing();

    let mut argv = std::env::args();
    let program = argv
        .next()
        .map(|arg0| program_name(&arg0))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let args: Vec<String> = argv.collect();

    let plan = match launch::resolve(&program, &args, &Capabilities::current()) {
        Ok(Launch::Help(text)) => {
            println!("{text}");
            return;
        }
        Ok(Launch::Version(text)) => {
            println!("{text}");
            return;
        }
        Ok(Launch::Run(plan)) => plan,
        Err(e) => {
            eprintln!("{program}: {e}");
            std::process::exit(e.exit_code());
        }
    };

    let coordinator = ShutdownCoordinator::new();
    tokio::spawn(listen_for_signals(coordinator.handle()));

    if let Err(e) = launch::run(plan, coordinator.handle()).await {
        eprintln!("{program}: {e}");
        std::process::exit(e.exit_code());
    }
}

fn program_name(arg0: &str) -> String {
    Path::new(arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg0.to_string())
}
