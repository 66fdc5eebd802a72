use clap::Parser;
use dhcprobe::{config, Args, ProbeConfig, ProbeError, ProbeSession};
use std::time::Duration;
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ProbeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let hardware_addr = match &args.mac {
        Some(text) => config::parse_mac(text)?,
        None => read_interface_mac(&args.interface).await?,
    };
    tracing::info!(
        "Probing '{}' as {}",
        args.interface,
        format_mac(&hardware_addr)
    );

    let mut config = ProbeConfig::new(args.interface, hardware_addr);
    config.timeout = args.timeout.map(Duration::from_secs);

    let mut session = ProbeSession::new(config)?;
    tracing::info!("Opened broadcast and listen sockets on the DHCP client port");

    let offer = session.probe().await?;
    tracing::info!("Received DHCP OFFER from {}", offer.from);

    println!("offered address: {}", offer.offered_ip);
    println!("next server:     {}", offer.next_server);
    if let Some(server) = offer.server_identifier {
        println!("server id:       {}", server);
    }
    Ok(())
}

/// Reads the hardware address of an interface from sysfs.
async fn read_interface_mac(interface: &str) -> Result<[u8; 6], ProbeError> {
    let path = format!("/sys/class/net/{interface}/address");
    let text = fs::read_to_string(&path)
        .await
        .map_err(|_| ProbeError::InterfaceInvalid(interface.to_string()))?;
    config::parse_mac(text.trim())
}

fn format_mac(mac: &[u8; 6]) -> String {
    mac.map(|b| format!("{b:02x}")).join(":")
}
