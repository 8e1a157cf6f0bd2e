use clap::Parser;
use serial_relay::adapters::{http::ReqwestTransport, serial};
use serial_relay::core::forwarder::DEFAULT_FORWARD_PREFIX;
use serial_relay::core::relay::spawn_interrupt_listener;
use serial_relay::utils::{logger, validation::Validate};
use serial_relay::{CliArgs, Forwarder, Relay, RelayConfig, RelayError, SerialReader};

fn exit_on_fatal(e: RelayError) -> ! {
    tracing::error!("[ERROR] {}", e);
    std::process::exit(e.exit_code().max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);

    if args.list_ports {
        for port in serial::list_ports()? {
            println!("{}", port);
        }
        return Ok(());
    }

    let config: RelayConfig = match args.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => exit_on_fatal(e),
    };
    tracing::debug!("Relay config: {:?}", config);

    // 先建立 HTTP client，避免序列埠開啟後才失敗
    let transport = ReqwestTransport::new(&config.forward).unwrap_or_else(|e| exit_on_fatal(e));

    let link = serial::SerialPortLink::open(&config.serial).unwrap_or_else(|e| exit_on_fatal(e));
    tracing::info!(
        "[INFO] Listening on {} at {} baud...",
        config.serial.port,
        config.serial.baud_rate
    );

    let shutdown = spawn_interrupt_listener();
    let reader = SerialReader::new(link, config.serial.max_line_bytes);
    let forwarder = Forwarder::new(transport, DEFAULT_FORWARD_PREFIX);

    Relay::new(reader, forwarder).run(&shutdown).await;

    Ok(())
}
