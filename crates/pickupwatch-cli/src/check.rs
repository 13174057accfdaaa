//! The `check` command: one fetch, full status dump, exit.

use pickupwatch_core::AppConfig;
use pickupwatch_fetch::PickupClient;
use pickupwatch_monitor::message;

pub async fn execute(config: &AppConfig) -> anyhow::Result<()> {
    let client = PickupClient::new(config)?;
    println!("API: {}", client.endpoint());

    let snapshot = client.fetch_availability().await?;
    println!("{}", message::status_line(&snapshot, config.market_tz));

    for (number, status) in &snapshot.stores {
        let quote = status.quote.as_deref().unwrap_or("-");
        println!(
            "  {number} {} ({}): {} — {quote}",
            status.store_name,
            status.city.as_deref().unwrap_or("?"),
            status.state,
        );
    }

    Ok(())
}
