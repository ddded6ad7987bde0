use std::io;

use kolmisoft::domain::GetUserBalance;
use kolmisoft::{Config, KolmisoftClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = std::env::var("KOLMISOFT_BALANCE_USER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "KOLMISOFT_BALANCE_USER environment variable is required",
        )
    })?;
    let currency = std::env::var("KOLMISOFT_CURRENCY").unwrap_or_default();

    let client = KolmisoftClient::new(Config::from_env()?)?;
    let request = GetUserBalance::new(username)?.with_currency(currency);

    let balance = client.get_user_balance(request).await?;
    println!("balance: {balance}");

    Ok(())
}
