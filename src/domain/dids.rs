//! DIDs (inbound numbers), their rates and quick forwards.

use std::fmt;

use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::{ExtraParams, UnixTimestamp};
use crate::xml::coerce;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A DID number: digits only, no `+`.
pub struct DidNumber(String);

impl DidNumber {
    pub const FIELD: &'static str = "did";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let value = value.trim();
        validation::digits(Self::FIELD, value)?;
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DidNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// List DIDs (`dids_get`).
pub struct GetDids {
    /// `free`, `reserved`, `active`, `closed`, ...
    pub search_status: Option<String>,
    pub filters: ExtraParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Register a DID on a provider (`did_create`).
pub struct CreateDid {
    provider_id: u64,
    did: DidNumber,
}

impl CreateDid {
    pub fn new(provider_id: u64, did: DidNumber) -> Result<Self, ValidationError> {
        Ok(Self {
            provider_id: validation::positive("provider_id", provider_id)?,
            did,
        })
    }

    pub fn provider_id(&self) -> u64 {
        self.provider_id
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidCreated {
    pub success: String,
    pub did_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Route a DID to a device (`did_device_assign`).
pub struct AssignDidDevice {
    device_id: u64,
    did: DidNumber,
}

impl AssignDidDevice {
    pub fn new(device_id: u64, did: DidNumber) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device_id", device_id)?,
            did,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Route a DID to a trunk device (`did_trunk_device_assign`).
pub struct AssignDidTrunkDevice {
    device_id: u64,
    did: DidNumber,
}

impl AssignDidTrunkDevice {
    pub fn new(device_id: u64, did: DidNumber) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device_id", device_id)?,
            did,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Detach a DID from its device (`did_device_unassign`).
pub struct UnassignDidDevice {
    did: DidNumber,
}

impl UnassignDidDevice {
    pub fn new(did: DidNumber) -> Self {
        Self { did }
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidDetailsOptions {
    pub active_from: Option<UnixTimestamp>,
    pub active_till: Option<UnixTimestamp>,
    /// Any other DID property.
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Change DID properties (`did_details_update`).
pub struct UpdateDidDetails {
    did_id: u64,
    options: DidDetailsOptions,
}

impl UpdateDidDetails {
    pub fn new(did_id: u64, options: DidDetailsOptions) -> Result<Self, ValidationError> {
        validation::ordered(
            "active_from",
            options.active_from,
            "active_till",
            options.active_till,
        )?;
        Ok(Self {
            did_id: validation::positive("did_id", did_id)?,
            options,
        })
    }

    pub fn did_id(&self) -> u64 {
        self.did_id
    }

    pub fn options(&self) -> &DidDetailsOptions {
        &self.options
    }
}

id_request! {
    /// Stop the subscription billed for a DID (`did_subscription_stop`).
    StopDidSubscription { did_id: "did_id" }
}

id_request! {
    /// `did_terminate`.
    TerminateDid { dids_id: "dids_id" }
}

id_request! {
    /// Return a DID to the free pool (`did_make_free`).
    MakeDidFree { dids_id: "dids_id" }
}

id_request! {
    /// `did_close`.
    CloseDid { dids_id: "dids_id" }
}

id_request! {
    /// `did_delete`.
    DeleteDid { dids_id: "dids_id" }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Change buy/sell rates of a DID (`did_rates_update`).
pub struct UpdateDidRates {
    did: DidNumber,
    rates: ExtraParams,
}

impl UpdateDidRates {
    /// `rates` carries the rate fields (`incoming_rate`, `provider_rate`, ...).
    pub fn new(did: DidNumber, rates: ExtraParams) -> Self {
        Self { did, rates }
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }

    pub fn rates(&self) -> &ExtraParams {
        &self.rates
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DidRatesUpdated {
    pub updated_rates: i64,
    pub rates: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `did_rates_get`.
pub struct GetDidRates {
    did: DidNumber,
}

impl GetDidRates {
    pub fn new(did: DidNumber) -> Self {
        Self { did }
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }
}

id_request! {
    /// `did_rates_details_get`.
    GetDidRatesDetails { did_id: "did_id" }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `did_rates_details_update`.
pub struct UpdateDidRatesDetails {
    did_id: u64,
    details: ExtraParams,
}

impl UpdateDidRatesDetails {
    pub fn new(did_id: u64, details: ExtraParams) -> Result<Self, ValidationError> {
        Ok(Self {
            did_id: validation::positive("did_id", did_id)?,
            details,
        })
    }

    pub fn did_id(&self) -> u64 {
        self.did_id
    }

    pub fn details(&self) -> &ExtraParams {
        &self.details
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// DIDs the caller may quick-forward (`quickforwards_dids_get`).
pub struct GetQuickForwardDids;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuickForwardDid {
    #[serde(deserialize_with = "coerce::string")]
    pub did: String,
    #[serde(deserialize_with = "coerce::string")]
    pub forward_to: String,
    #[serde(deserialize_with = "coerce::string")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Point a DID's quick forward somewhere else (`quickforwards_did_update`).
pub struct UpdateQuickForwardDid {
    did: DidNumber,
    forward_to: Option<String>,
    description: Option<String>,
}

impl UpdateQuickForwardDid {
    pub fn new(did: DidNumber) -> Self {
        Self {
            did,
            forward_to: None,
            description: None,
        }
    }

    pub fn forward_to(mut self, number: impl Into<String>) -> Self {
        self.forward_to = Some(number.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn did(&self) -> &DidNumber {
        &self.did
    }

    pub fn forward_number(&self) -> Option<&str> {
        self.forward_to.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn did_numbers_are_digits() {
        assert_eq!(DidNumber::new(" 37052000000 ").unwrap().as_str(), "37052000000");
        assert!(matches!(
            DidNumber::new("+3705"),
            Err(ValidationError::InvalidFormat { field: "did", .. })
        ));
        assert!(DidNumber::new("").is_err());
    }

    #[test]
    fn did_details_activation_window_is_ordered() {
        let options = DidDetailsOptions {
            active_from: Some(UnixTimestamp::new(50)),
            active_till: Some(UnixTimestamp::new(10)),
            ..DidDetailsOptions::default()
        };
        assert!(matches!(
            UpdateDidDetails::new(1, options),
            Err(ValidationError::RangeOrder { .. })
        ));
    }
}
