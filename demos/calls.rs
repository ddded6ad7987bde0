use std::io;

use kolmisoft::domain::{CallOwner, GetUserCalls, UserCallsOptions};
use kolmisoft::{Config, KolmisoftClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user_id = std::env::var("KOLMISOFT_CALLS_USER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "KOLMISOFT_CALLS_USER environment variable is required",
        )
    })?;

    let client = KolmisoftClient::new(Config::from_env()?)?;

    // Today's calls, newest first.
    let options = UserCallsOptions {
        order_desc: true,
        ..Default::default()
    };
    let request = GetUserCalls::new(CallOwner::User(user_id), options)?;

    let report = client.get_user_calls(request).await?;
    println!("{} calls", report.calls.len());
    for call in &report.calls {
        println!("{call}");
    }

    Ok(())
}
