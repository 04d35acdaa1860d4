use std::env;
use std::process;

use log::info;
use sass_code_native::logging;
use sass_code_native::sass::server::start_sass_language_server;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        // Use eprintln for usage info since stdout carries the LSP stream
        eprintln!("Usage: {} [--stdio]", args[0]);
        eprintln!("  Starts the indented Sass language server on stdin/stdout.");
        eprintln!("  Set SASS_CODE_LOG=debug for verbose logging.");
        process::exit(0);
    }

    if let Err(e) = logging::init_logger() {
        eprintln!("Failed to initialize logger: {}", e);
        process::exit(1);
    }

    info!("Sass Code Native starting");
    info!("Command line arguments: {:?}", args);

    if let Err(e) = start_sass_language_server().await {
        log::error!("Language server stopped with an error: {}", e);
    }

    info!("Sass Code Native shutting down");
}
