//! Query or switch the power of one outlet or blade.
//!
//! # Usage
//!
//! Read the status of blade 3 on a BladeCenter chassis:
//! ```bash
//! cargo run --example fence_status -- --host bc1 --device bladecenter --user USERID --password PASSW0RD --plug 3
//! ```
//!
//! Switch outlet 4 of a password-only WTI strip off:
//! ```bash
//! cargo run --example fence_status -- --host pdu1 --device wti --password secret --plug 4 --action off
//! ```

use std::env;

use powerfence::{ActionOutcome, FaultKind, FenceAction, FenceBuilder, PowerStatus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug (or trace) to see the conversation
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = FenceBuilder::new(&args.host)
        .device(&args.device)
        .password(&args.password)
        .action(args.action);
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(user) = &args.user {
        builder = builder.username(user);
    }
    if let Some(plug) = &args.plug {
        builder = builder.plug(plug);
    }
    let fencer = builder.build()?;

    if fencer.target().action == FenceAction::Reboot {
        eprintln!("reboot is not handled by this demo; run --action off, then --action on");
        std::process::exit(2);
    }

    println!(
        "Connecting to {}:{} ({})...",
        fencer.target().address,
        fencer.target().port,
        fencer.device().name
    );
    let mut session = fencer.open().await?;

    let result = fencer.perform(&mut session).await;
    fencer.logout(&mut session).await;

    match result {
        Ok(ActionOutcome::Status(PowerStatus::NotFound)) => {
            println!("Plug not listed by the device")
        }
        Ok(ActionOutcome::Status(status)) => println!("Power status: {}", status),
        Ok(ActionOutcome::Acknowledged(state)) => println!("Power {} acknowledged", state),
        Err(e) => {
            match e.fault_kind() {
                Some(FaultKind::LoginDenied) => eprintln!("Login denied; check credentials"),
                Some(kind) => eprintln!("Fence fault: {}", kind),
                None => eprintln!("Error: {}", e),
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Simple argument parser
struct Args {
    host: String,
    port: Option<u16>,
    device: String,
    user: Option<String>,
    password: String,
    plug: Option<String>,
    action: FenceAction,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = None;
        let mut device = "wti".to_string();
        let mut user = None;
        let mut password = String::new();
        let mut plug = None;
        let mut action = FenceAction::Status;

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => host = value.unwrap_or(host),
                "--port" | "-p" => port = value.and_then(|v| v.parse().ok()),
                "--device" | "-d" => device = value.unwrap_or(device),
                "--user" | "-u" => user = value,
                "--password" | "-P" => password = value.unwrap_or_default(),
                "--plug" | "-n" => plug = value,
                "--action" | "-o" => {
                    action = match value.as_deref().unwrap_or("status").parse() {
                        Ok(action) => action,
                        Err(e) => {
                            eprintln!("{}", e);
                            std::process::exit(1);
                        }
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Self {
            host,
            port,
            device,
            user,
            password,
            plug,
            action,
        }
    }

    fn print_help() {
        println!(
            r#"powerfence fence_status example

USAGE:
    cargo run --example fence_status -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Device address [default: localhost]
    -p, --port <PORT>        Console port [default: device's, usually 23]
    -d, --device <NAME>      bladecenter, ilo or wti [default: wti]
    -u, --user <USER>        Login name
    -P, --password <PASS>    Password
    -n, --plug <ID>          Outlet or blade
    -o, --action <ACTION>    status, monitor, on or off [default: status]
    --help                   Print this help message
"#
        );
    }
}
