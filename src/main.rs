use std::env;
use std::process::ExitCode;

use nbt_dumper::{extract, resolve_protocol_version, run_session, ClientConfig, ProtocolError};
use nbt_dumper::utils::logging::init_tracing;
use tracing::error;

/// One nonzero exit code per failure kind, so callers can branch on the
/// outcome without parsing the diagnostic line.
fn exit_code(err: &ProtocolError) -> ExitCode {
    match err {
        ProtocolError::Io(_) | ProtocolError::ConnectionClosed | ProtocolError::Timeout => {
            ExitCode::from(2)
        }
        ProtocolError::EncryptionRequired => ExitCode::from(4),
        ProtocolError::Disconnected(_) => ExitCode::from(5),
        ProtocolError::ConfigError(_) => ExitCode::from(6),
        _ => ExitCode::from(3),
    }
}

async fn run(address: &str, port: u16, config: &ClientConfig) -> Result<(), ProtocolError> {
    println!("Getting protocol version..");
    let protocol_version = resolve_protocol_version(address, port, config).await?;
    println!("Server protocol version: {protocol_version}");

    println!("Connecting to server..");
    let payload = run_session(address, port, protocol_version, config).await?;
    println!("Got registry data!");

    extract::persist_blob(&config.output_path, &payload).await?;
    println!("NBT data saved to {}", config.output_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = env::args().collect::<Vec<String>>();
    let (Some(address), Some(port)) = (args.get(1), args.get(2)) else {
        println!("Usage: {} <address> <port>", args.first().map(String::as_str).unwrap_or("nbt-dumper"));
        return ExitCode::from(1);
    };
    let Ok(port) = port.parse::<u16>() else {
        println!("Invalid port: {port}");
        return ExitCode::from(1);
    };

    init_tracing();

    let config = ClientConfig::from_env();
    if let Err(e) = config.validate_strict() {
        eprintln!("{e}");
        return exit_code(&e);
    }

    println!("Connecting to {address}:{port}");
    match run(address, port, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Session failed");
            eprintln!("{e}");
            exit_code(&e)
        }
    }
}
