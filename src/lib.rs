//! Typed Rust client for the Kolmisoft MOR billing HTTP+XML API.
//!
//! The crate has three layers: a domain layer of validated request types and
//! typed results, a transport layer that knows each endpoint's form fields,
//! hash order and error vocabulary, and a small client layer that signs the
//! request, posts it and maps the XML answer.
//!
//! ```rust,no_run
//! use kolmisoft::{Config, KolmisoftClient};
//! use kolmisoft::domain::GetUserBalance;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kolmisoft::KolmisoftError> {
//!     let config = Config::new("https://mor.example.com/billing", "admin", "secret")
//!         .with_password("admin-password");
//!     let client = KolmisoftClient::new(config)?;
//!     let balance = client
//!         .get_user_balance(GetUserBalance::new("alice")?.with_currency("EUR"))
//!         .await?;
//!     println!("balance: {balance}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod xml;
mod transport;

pub use client::{KolmisoftClient, KolmisoftClientBuilder, KolmisoftError};
pub use config::{Config, ConfigError};
pub use domain::{KnownApiError, ValidationError};
pub use transport::{DecodeError, Operation};

#[doc(hidden)]
pub use transport::{Credentials, Endpoint, Form, RemoteFailure};
