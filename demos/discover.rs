use ariston_net::AristonClient;
use std::env;

#[tokio::main]
async fn main() -> ariston_net::Result<()> {
    tracing_subscriber::fmt::init();

    let username = env::var("ARISTON_USERNAME").expect("ARISTON_USERNAME not set");
    let password = env::var("ARISTON_PASSWORD").expect("ARISTON_PASSWORD not set");
    let imperial = env::args().any(|a| a == "--imperial");

    let mut client = AristonClient::builder(username, password)
        .metric(!imperial)
        .build()?;

    println!("Logging in...");
    client.connect().await?;

    for mut device in client.devices().await? {
        device.get_features().await?;
        device.update_state().await?;

        println!(
            "{} [{}] {:?}",
            device.name().unwrap_or("(unnamed)"),
            device.gateway(),
            device.family(),
        );
        let (min, max, step) = device.water_heater_temperature_range();
        println!(
            "  water: {:?}\u{00b0} now, {:?}\u{00b0} target ({:?}..{:?} step {:?}) | mode: {}",
            device.water_heater_current_temperature(),
            device.water_heater_target_temperature(),
            min,
            max,
            step,
            device.water_heater_mode_name().unwrap_or_else(|| "?".into()),
        );
        for zone in device.zone_numbers() {
            println!(
                "  zone {zone}: {:?}\u{00b0} measured, {:?}\u{00b0} comfort | mode: {}",
                device.zone_measured_temperature(zone),
                device.zone_comfort_temperature(zone),
                device.zone_mode(zone).unwrap_or("?"),
            );
        }
    }

    Ok(())
}
