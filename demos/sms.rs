use std::io;

use kolmisoft::domain::{PhoneNumber, SendSms};
use kolmisoft::{Config, KolmisoftClient};

fn required_var(name: &'static str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lcr_id: u64 = required_var("KOLMISOFT_SMS_LCR_ID")?.parse()?;
    let phone = required_var("KOLMISOFT_SMS_PHONE")?;
    let source = std::env::var("KOLMISOFT_SMS_SOURCE").unwrap_or_else(|_| "MOR".to_owned());
    let message = std::env::var("KOLMISOFT_SMS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the kolmisoft demo.".to_owned());

    let client = KolmisoftClient::new(Config::from_env()?)?;
    let destination = PhoneNumber::parse(None, &phone)?;
    let request = SendSms::new(lcr_id, destination, source, message)?;

    let sent = client.send_sms(request).await?;
    println!(
        "status: {}, message_id: {}, price: {} {}",
        sent.status, sent.message_id, sent.price, sent.currency
    );

    Ok(())
}
