//! Devices, caller IDs (CLIs) and device number-rewrite rules.

use crate::domain::validation::{self, ValidationError};
use crate::domain::value::ExtraParams;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceOptions {
    pub description: Option<String>,
    pub pin: Option<String>,
    /// Device technology (`SIP`, `IAX2`, `FAX`, ...).
    pub device_type: Option<String>,
    pub devicegroup_id: Option<u64>,
    pub caller_id: Option<String>,
    /// Any other device setting.
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Create a device for a user (`device_create`).
pub struct CreateDevice {
    user_id: u64,
    options: DeviceOptions,
}

impl CreateDevice {
    pub fn new(user_id: u64, options: DeviceOptions) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            options,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn options(&self) -> &DeviceOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCreated {
    pub status: String,
    pub id: i64,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceUpdateOptions {
    pub authentication: Option<String>,
    pub username: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Change device settings (`device_update`).
pub struct UpdateDevice {
    device_id: u64,
    options: DeviceUpdateOptions,
}

impl UpdateDevice {
    pub fn new(device_id: u64, options: DeviceUpdateOptions) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device", device_id)?,
            options,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    pub fn options(&self) -> &DeviceUpdateOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteDevice {
    device_id: u64,
}

impl DeleteDevice {
    pub fn new(device_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device", device_id)?,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Devices of one user (`devices_get`).
pub struct GetDevices {
    user_id: u64,
    show_hidden: bool,
}

impl GetDevices {
    /// Hidden devices are included unless [`GetDevices::hide_hidden`] is called.
    pub fn new(user_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: validation::positive("user_id", user_id)?,
            show_hidden: true,
        })
    }

    pub fn hide_hidden(mut self) -> Self {
        self.show_hidden = false;
        self
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A device named by id or by its SIP/IAX username.
pub enum DeviceRef {
    Id(u64),
    Username(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Full settings of one device (`device_details_get`).
pub struct GetDeviceDetails {
    device: DeviceRef,
}

impl GetDeviceDetails {
    pub fn new(device: DeviceRef) -> Result<Self, ValidationError> {
        let device = match device {
            DeviceRef::Id(id) => DeviceRef::Id(validation::positive("device_id", id)?),
            DeviceRef::Username(name) => {
                DeviceRef::Username(validation::non_empty("device_u", name)?)
            }
        };
        Ok(Self { device })
    }

    pub fn device(&self) -> &DeviceRef {
        &self.device
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Call flow (forwarding, voicemail, ...) of a device (`device_callflow_get`).
pub struct GetDeviceCallFlow {
    device_id: u64,
}

impl GetDeviceCallFlow {
    pub fn new(device_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device_id", device_id)?,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Change one call flow state of a device (`device_callflow_update`).
pub struct UpdateDeviceCallFlow {
    device_id: u64,
    state: String,
    action: String,
    extra: ExtraParams,
}

impl UpdateDeviceCallFlow {
    /// `state` is `before_call`, `no_answer`, `busy` or `failed`; `action` is
    /// e.g. `empty`, `forward` or `voicemail`.
    pub fn new(
        device_id: u64,
        state: impl Into<String>,
        action: impl Into<String>,
        extra: ExtraParams,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device_id", device_id)?,
            state: validation::non_empty("state", state)?,
            action: validation::non_empty("callflow_action", action)?,
            extra,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn extra(&self) -> &ExtraParams {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Look up which device owns a caller ID (`cli_info_get`).
pub struct GetCliInfo {
    cli: String,
    domain: Option<String>,
}

impl GetCliInfo {
    pub fn new(cli: impl Into<String>, domain: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            cli: validation::non_empty("cli", cli)?,
            domain,
        })
    }

    pub fn cli(&self) -> &str {
        &self.cli
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCli {
    cli_number: String,
}

impl DeleteCli {
    pub fn new(cli_number: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            cli_number: validation::non_empty("cli_number", cli_number)?,
        })
    }

    pub fn cli_number(&self) -> &str {
        &self.cli_number
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub cli_number: Option<String>,
    pub cli_domain: Option<String>,
    pub extra: ExtraParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Attach a caller ID to a device (`cli_add`).
pub struct AddCli {
    device_id: u64,
    options: CliOptions,
}

impl AddCli {
    /// Either a number or a domain must be given.
    pub fn new(device_id: u64, options: CliOptions) -> Result<Self, ValidationError> {
        let device_id = validation::positive("device_id", device_id)?;
        let blank =
            |value: &Option<String>| value.as_deref().is_none_or(|value| value.trim().is_empty());
        if blank(&options.cli_number) && blank(&options.cli_domain) {
            return Err(ValidationError::MissingOneOf {
                fields: &["cli_number", "cli_domain"],
            });
        }
        Ok(Self { device_id, options })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    pub fn options(&self) -> &CliOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Caller IDs of a device, a user, or everything visible (`device_clis_get`).
pub struct GetDeviceClis {
    pub device_id: Option<u64>,
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetDeviceRules {
    device_id: u64,
}

impl GetDeviceRules {
    pub fn new(device_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            device_id: validation::positive("device_id", device_id)?,
        })
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteDeviceRule {
    rule_id: u64,
}

impl DeleteDeviceRule {
    pub fn new(rule_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            rule_id: validation::positive("device_rule_id", rule_id)?,
        })
    }

    pub fn rule_id(&self) -> u64 {
        self.rule_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Add a number-rewrite rule to a device (`device_rule_create`).
///
/// `cut` strips a prefix and `add` prepends one; at least one is required.
pub struct CreateDeviceRule {
    device_id: u64,
    name: String,
    cut: Option<String>,
    add: Option<String>,
    extra: ExtraParams,
}

impl CreateDeviceRule {
    pub fn new(
        device_id: u64,
        name: impl Into<String>,
        cut: Option<String>,
        add: Option<String>,
    ) -> Result<Self, ValidationError> {
        let device_id = validation::positive("device_id", device_id)?;
        let name = validation::non_empty("name", name)?;
        let cut = cut.filter(|cut| !cut.is_empty());
        let add = add.filter(|add| !add.is_empty());
        if cut.is_none() && add.is_none() {
            return Err(ValidationError::MissingOneOf {
                fields: &["cut", "add"],
            });
        }
        Ok(Self {
            device_id,
            name,
            cut,
            add,
            extra: ExtraParams::new(),
        })
    }

    /// `condition`, `rule_type` and other rule settings.
    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }

    pub fn device_id(&self) -> u64 {
        self.device_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cut(&self) -> Option<&str> {
        self.cut.as_deref()
    }

    pub fn add(&self) -> Option<&str> {
        self.add.as_deref()
    }

    pub fn extra(&self) -> &ExtraParams {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_details_validate_reference() {
        assert!(GetDeviceDetails::new(DeviceRef::Id(0)).is_err());
        assert!(GetDeviceDetails::new(DeviceRef::Username("".into())).is_err());
        assert_eq!(
            GetDeviceDetails::new(DeviceRef::Username(" 1001 ".into()))
                .unwrap()
                .device(),
            &DeviceRef::Username("1001".into())
        );
    }

    #[test]
    fn cli_needs_number_or_domain() {
        assert!(matches!(
            AddCli::new(3, CliOptions::default()),
            Err(ValidationError::MissingOneOf { .. })
        ));
        let options = CliOptions {
            cli_domain: Some("sip.example.com".into()),
            ..CliOptions::default()
        };
        assert!(AddCli::new(3, options).is_ok());
    }

    #[test]
    fn device_rule_needs_cut_or_add() {
        assert!(CreateDeviceRule::new(1, "int", None, Some(String::new())).is_err());
        assert!(CreateDeviceRule::new(1, " ", Some("00".into()), None).is_err());
        let rule = CreateDeviceRule::new(1, "int", Some("00".into()), None).unwrap();
        assert_eq!(rule.cut(), Some("00"));
        assert_eq!(rule.add(), None);
    }

    #[test]
    fn callflow_update_requires_state_and_action() {
        assert!(matches!(
            UpdateDeviceCallFlow::new(2, "busy", "", ExtraParams::new()),
            Err(ValidationError::Empty {
                field: "callflow_action"
            })
        ));
    }
}
