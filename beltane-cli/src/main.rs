mod host;
mod input;

use std::fs::File;

use beltane_core::router::Router;
use host::{LogHost, TerminalOutput};
use input::SurfaceInput;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("beltane")
        .join("beltane.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path)
        .unwrap_or_else(|_| File::create("/tmp/beltane.log").expect("Cannot create log file"));

    WriteLogger::init(log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("beltane starting (log level: {:?})", log_level);
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let list_only = args.iter().any(|a| a == "--list-ports");
    let port_index: usize = args
        .iter()
        .position(|a| a == "--port")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let mut input = SurfaceInput::new();
    input.refresh_ports();

    if list_only || input.list_ports().is_empty() {
        if input.list_ports().is_empty() {
            eprintln!("No MIDI input ports available");
        }
        for port in input.list_ports() {
            println!("{}: {}", port.index, port.name);
        }
        return Ok(());
    }

    if let Err(e) = input.connect(port_index) {
        eprintln!("Could not open MIDI port {}: {}", port_index, e);
        return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
    }
    println!(
        "Listening on {:?} (--list-ports to see all ports)",
        input.connected_port_name().unwrap_or("unknown")
    );

    let config = beltane_core::config::Config::load();
    let mut router = Router::new(&config);
    let mut daw = LogHost::default();
    let mut output = TerminalOutput::default();
    println!(
        "[display] {}",
        router.session().scaler.current_label()
    );

    // One event at a time, in arrival order, until the port goes away.
    while let Some(mut event) = input.recv_event() {
        let handled = router.process(&mut event, &mut daw, &mut output);
        if !handled {
            log::debug!(
                target: "midi",
                "pass-through: status {} data1 {} data2 {}",
                event.status,
                event.data1,
                event.data2
            );
        }
    }

    Ok(())
}
