use std::io;

use kolmisoft::domain::GetDevices;
use kolmisoft::{Config, KolmisoftClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user_id: u64 = std::env::var("KOLMISOFT_DEVICES_USER_ID")
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "KOLMISOFT_DEVICES_USER_ID environment variable is required",
            )
        })?
        .parse()?;

    let client = KolmisoftClient::new(Config::from_env()?)?;
    let devices = client
        .get_devices(GetDevices::new(user_id)?.hide_hidden())
        .await?;
    println!("{}", serde_json::to_string_pretty(&devices)?);

    Ok(())
}
