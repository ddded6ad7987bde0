//! Least-cost routing: LCRs, providers, provider rules and location rules.

use serde::Deserialize;

use crate::domain::validation::{self, ValidationError};
use crate::xml::coerce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an LCR orders its providers.
pub enum LcrOrder {
    Price,
    Priority,
    Percent,
    Quality,
}

impl LcrOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Priority => "priority",
            Self::Percent => "percent",
            Self::Quality => "quality",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// `lcrs_get`, optionally filtered by name.
pub struct GetLcrs {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lcr {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub order: String,
    #[serde(deserialize_with = "coerce::float")]
    pub first_provider_percent_limit: f64,
    #[serde(deserialize_with = "coerce::opt_id")]
    pub failover_provider_id: Option<i64>,
    #[serde(deserialize_with = "coerce::flag")]
    pub no_failover: bool,
    #[serde(deserialize_with = "coerce::float")]
    pub minimal_rate_margin_percent: f64,
    #[serde(deserialize_with = "coerce::int")]
    pub quality_routing_id: i64,
    #[serde(deserialize_with = "coerce::flag")]
    pub allow_loss_calls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLcr {
    name: String,
    order: Option<LcrOrder>,
}

impl CreateLcr {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::non_empty("name", name)?,
            order: None,
        })
    }

    pub fn with_order(mut self, order: LcrOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> Option<LcrOrder> {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LcrUpdateOptions {
    pub name: Option<String>,
    pub order: Option<LcrOrder>,
    pub allow_loss_calls: Option<bool>,
    pub no_failover: Option<bool>,
    pub minimal_rate_margin_percent: Option<f64>,
    pub first_provider_percent_limit: Option<f64>,
    pub quality_routing_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
/// `lcr_update`. Fields left `None` keep their current value.
pub struct UpdateLcr {
    lcr_id: u64,
    options: LcrUpdateOptions,
}

impl UpdateLcr {
    pub fn new(lcr_id: u64, mut options: LcrUpdateOptions) -> Result<Self, ValidationError> {
        if let Some(name) = options.name.take() {
            options.name = Some(validation::non_empty("name", name)?);
        }
        for (field, value) in [
            ("minimal_rate_margin_percent", options.minimal_rate_margin_percent),
            ("first_provider_percent_limit", options.first_provider_percent_limit),
        ] {
            if let Some(value) = value.filter(|value| !value.is_finite()) {
                return Err(ValidationError::InvalidFormat {
                    field,
                    input: value.to_string(),
                });
            }
        }
        Ok(Self {
            lcr_id: validation::positive("lcr_id", lcr_id)?,
            options,
        })
    }

    pub fn lcr_id(&self) -> u64 {
        self.lcr_id
    }

    pub fn options(&self) -> &LcrUpdateOptions {
        &self.options
    }
}

id_request! {
    /// `lcr_delete`.
    DeleteLcr { lcr_id: "lcr_id" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One provider slot in an LCR, shared by `lcr_add_provider` and
/// `lcr_delete_provider`.
pub struct LcrProvider {
    lcr_id: u64,
    provider_id: u64,
    failover: bool,
}

impl LcrProvider {
    pub fn new(lcr_id: u64, provider_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            lcr_id: validation::positive("lcr_id", lcr_id)?,
            provider_id: validation::positive("provider_id", provider_id)?,
            failover: false,
        })
    }

    /// Address the LCR's failover provider list instead of the main one.
    pub fn failover(mut self) -> Self {
        self.failover = true;
        self
    }

    pub fn lcr_id(&self) -> u64 {
        self.lcr_id
    }

    pub fn provider_id(&self) -> u64 {
        self.provider_id
    }

    pub fn is_failover(&self) -> bool {
        self.failover
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddLcrProvider(pub LcrProvider);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveLcrProvider(pub LcrProvider);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderTech {
    Dahdi,
    Sip,
    Iax2,
    H323,
}

impl ProviderTech {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dahdi => "dahdi",
            Self::Sip => "SIP",
            Self::Iax2 => "IAX2",
            Self::H323 => "H323",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtmfMode {
    Inband,
    Info,
    Rfc2833,
    Auto,
}

impl DtmfMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inband => "inband",
            Self::Info => "info",
            Self::Rfc2833 => "rfc2833",
            Self::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Hostname,
    Ip,
    /// The provider registers to us; registration, server IP and port are
    /// forced to `0`, `dynamic` and `0`.
    Dynamic,
}

impl NetworkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hostname => "hostname",
            Self::Ip => "ip",
            Self::Dynamic => "dynamic",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Optional provider settings for `provider_create` and `provider_update`.
pub struct ProviderOptions {
    /// Comma-separated server ids, e.g. `1,3,4`.
    pub server_ids: Option<String>,
    pub active: Option<bool>,
    pub dtmfmode: Option<DtmfMode>,
    pub location_id: Option<u64>,
    /// Seconds; at least 30.
    pub timeout: Option<u32>,
    pub max_timeout: Option<u32>,
    pub call_limit: Option<u32>,
    pub balance_limit: Option<f64>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub register: Option<bool>,
    pub cid_name: Option<String>,
    pub cid_number: Option<String>,
    pub network_type: Option<NetworkType>,
    pub server_ip: Option<String>,
    pub ipaddr: Option<String>,
    pub port: Option<u16>,
    pub fromdomain: Option<String>,
    /// Only sent on create.
    pub fromuser: Option<String>,
}

const SIP_DTMF_MODES: &[&str] = &["rfc2833", "auto"];

impl ProviderOptions {
    fn validate(&self, tech: Option<ProviderTech>) -> Result<(), ValidationError> {
        if let Some(login) = &self.login {
            if matches!(login.to_ascii_lowercase().as_str(), "anonymous" | "unknown") {
                return Err(ValidationError::InvalidFormat {
                    field: "login",
                    input: login.clone(),
                });
            }
        }
        if let (Some(ProviderTech::Sip), Some(mode)) = (tech, self.dtmfmode) {
            validation::one_of("dtmfmode", mode.as_str(), SIP_DTMF_MODES)?;
        }
        if let Some(timeout) = self.timeout {
            validation::at_least("timeout", i64::from(timeout), 30)?;
        }
        if self.port == Some(0) {
            return Err(ValidationError::NotPositive { field: "port" });
        }
        if let Some(location_id) = self.location_id {
            validation::positive("location_id", location_id)?;
        }
        if let Some(server_ids) = &self.server_ids {
            validation::id_list("server_ids", server_ids)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProvider {
    name: String,
    tech: ProviderTech,
    tariff_id: u64,
    options: ProviderOptions,
}

impl CreateProvider {
    pub fn new(
        name: impl Into<String>,
        tech: ProviderTech,
        tariff_id: u64,
        options: ProviderOptions,
    ) -> Result<Self, ValidationError> {
        options.validate(Some(tech))?;
        Ok(Self {
            name: validation::non_empty("name", name)?,
            tech,
            tariff_id: validation::positive("tariff_id", tariff_id)?,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tech(&self) -> ProviderTech {
        self.tech
    }

    pub fn tariff_id(&self) -> u64 {
        self.tariff_id
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCreated {
    pub status: String,
    pub provider_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProvider {
    provider_id: u64,
    name: Option<String>,
    tariff_id: Option<u64>,
    options: ProviderOptions,
}

impl UpdateProvider {
    pub fn new(provider_id: u64, options: ProviderOptions) -> Result<Self, ValidationError> {
        options.validate(None)?;
        Ok(Self {
            provider_id: validation::positive("provider_id", provider_id)?,
            name: None,
            tariff_id: None,
            options,
        })
    }

    pub fn rename(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(validation::non_empty("name", name)?);
        Ok(self)
    }

    pub fn with_tariff(mut self, tariff_id: u64) -> Result<Self, ValidationError> {
        self.tariff_id = Some(validation::positive("tariff_id", tariff_id)?);
        Ok(self)
    }

    pub fn provider_id(&self) -> u64 {
        self.provider_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tariff_id(&self) -> Option<u64> {
        self.tariff_id
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }
}

id_request! {
    /// `provider_delete`.
    DeleteProvider { provider_id: "provider_id" }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// `providers_get`: every provider, or just `provider_id`.
pub struct GetProviders {
    pub provider_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Provider {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::string")]
    pub tech: String,
    #[serde(deserialize_with = "coerce::string")]
    pub channel: String,
    #[serde(deserialize_with = "coerce::string")]
    pub login: String,
    #[serde(deserialize_with = "coerce::string")]
    pub password: String,
    #[serde(deserialize_with = "coerce::string")]
    pub server_ip: String,
    #[serde(deserialize_with = "coerce::int")]
    pub port: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub priority: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub quality: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub tariff_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub cut_a: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub cut_b: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub add_a: String,
    #[serde(deserialize_with = "coerce::string")]
    pub add_b: String,
    #[serde(deserialize_with = "coerce::int")]
    pub device_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub ani: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub timeout: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub call_limit: i64,
    #[serde(deserialize_with = "coerce::flag")]
    pub interpret_noanswer_as_failed: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub interpret_busy_as_failed: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub register: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub reg_extension: String,
    #[serde(deserialize_with = "coerce::int")]
    pub terminator_id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub reg_line: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub hidden: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub use_p_asserted_identity: bool,
    #[serde(deserialize_with = "coerce::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "coerce::flag")]
    pub common_use: bool,
    #[serde(deserialize_with = "coerce::float")]
    pub balance: f64,
    #[serde(deserialize_with = "coerce::opt_float")]
    pub balance_limit: Option<f64>,
    #[serde(deserialize_with = "coerce::int")]
    pub cps_call_limit: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub cps_period: i64,
    #[serde(deserialize_with = "coerce::flag")]
    pub alive: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub periodic_check: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub active: bool,
    #[serde(deserialize_with = "coerce::int")]
    pub contact_info_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub contact_info_partners_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub contact_info_noc_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub contact_info_rates_provisioning_id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub contact_info_billing_provisioning_id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub tech_details_info: String,
    #[serde(deserialize_with = "coerce::string")]
    pub privacy_from_domain: String,
    #[serde(deserialize_with = "coerce::string")]
    pub privacy_callerid: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub playback_before_dial: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub playback_before_dial_mode: String,
    #[serde(deserialize_with = "coerce::string")]
    pub prov_enable_static_source_list: String,
    #[serde(deserialize_with = "coerce::string")]
    pub prov_static_source_list_id: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub enable_mnp_tags: bool,
    #[serde(deserialize_with = "coerce::int")]
    pub responsible_accountant_id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub sip_request_uri: String,
    #[serde(deserialize_with = "coerce::string")]
    pub sip_to_uri: String,
    #[serde(deserialize_with = "coerce::string")]
    pub prov_enable_static_destination_list: String,
    #[serde(deserialize_with = "coerce::string")]
    pub prov_static_destination_list_id: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub use_tariffs_by_clis: bool,
    #[serde(deserialize_with = "coerce::flag")]
    pub use_default_tariff_if_by_cli_not_found: bool,
}

id_request! {
    /// `provider_rules_get`.
    GetProviderRules { provider_id: "provider_id" }
}

id_request! {
    /// `provider_rule_delete`.
    DeleteProviderRule { provider_rule_id: "provider_rule_id" }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Which number a provider or location rule rewrites.
pub enum RuleDirection {
    Src,
    #[default]
    Dst,
}

impl RuleDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Dst => "dst",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRuleOptions {
    pub minlen: u32,
    pub maxlen: u32,
    pub pr_type: RuleDirection,
    pub change_callerid_name: bool,
    pub tariff_id: Option<u64>,
    pub set_pai: Option<bool>,
    /// Destination rules only.
    pub suffix: Option<String>,
}

impl Default for ProviderRuleOptions {
    fn default() -> Self {
        Self {
            minlen: 1,
            maxlen: 100,
            pr_type: RuleDirection::Dst,
            change_callerid_name: false,
            tariff_id: None,
            set_pai: None,
            suffix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `provider_rule_create`. At least one of `cut` and `add` must be non-empty.
pub struct CreateProviderRule {
    provider_id: u64,
    name: String,
    cut: String,
    add: String,
    options: ProviderRuleOptions,
}

impl CreateProviderRule {
    pub fn new(
        provider_id: u64,
        name: impl Into<String>,
        cut: impl Into<String>,
        add: impl Into<String>,
        options: ProviderRuleOptions,
    ) -> Result<Self, ValidationError> {
        let (cut, add) = (cut.into(), add.into());
        if cut.is_empty() && add.is_empty() {
            return Err(ValidationError::MissingOneOf {
                fields: &["cut", "add"],
            });
        }
        validation::at_least("minlen", i64::from(options.minlen), 1)?;
        validation::at_least(
            "maxlen",
            i64::from(options.maxlen),
            i64::from(options.minlen),
        )?;
        if options.suffix.is_some() {
            validation::one_of("pr_type", options.pr_type.as_str(), &["dst"])?;
        }
        if let Some(tariff_id) = options.tariff_id {
            validation::positive("tariff_id", tariff_id)?;
        }
        Ok(Self {
            provider_id: validation::positive("provider_id", provider_id)?,
            name: validation::non_empty("name", name)?,
            cut,
            add,
            options,
        })
    }

    pub fn provider_id(&self) -> u64 {
        self.provider_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cut(&self) -> &str {
        &self.cut
    }

    pub fn add(&self) -> &str {
        &self.add
    }

    pub fn options(&self) -> &ProviderRuleOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderRule {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub provider_id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub enabled: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub cut: String,
    #[serde(deserialize_with = "coerce::string")]
    pub add: String,
    #[serde(deserialize_with = "coerce::int")]
    pub minlen: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub maxlen: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub pr_type: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub change_callerid_name: bool,
    #[serde(deserialize_with = "coerce::opt_id")]
    pub tariff_id: Option<i64>,
    #[serde(deserialize_with = "coerce::flag")]
    pub set_pai: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationRuleType {
    Src,
    Dst,
    Combined,
}

impl LocationRuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Dst => "dst",
            Self::Combined => "combined",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Location rule settings.
///
/// The length bounds default to `1..=99` for both numbers when unset. On
/// update, `-1` clears an id reference.
pub struct LocationRuleOptions {
    pub lr_type: Option<LocationRuleType>,
    pub minlen: Option<i64>,
    pub maxlen: Option<i64>,
    pub src_minlen: Option<i64>,
    pub src_maxlen: Option<i64>,
    pub tariff_id: Option<i64>,
    pub lcr_id: Option<i64>,
    pub did_id: Option<i64>,
    pub device_id: Option<i64>,
    pub location_group_id: Option<i64>,
    pub dst_locationgroup_id: Option<i64>,
    pub change_callerid_name: Option<bool>,
    pub cut: Option<String>,
    pub add: Option<String>,
    pub src_cut: Option<String>,
    pub src_add: Option<String>,
}

const PATTERN_FIELDS: &[&str] = &["cut", "add", "src_cut", "src_add"];

impl LocationRuleOptions {
    /// Numeric settings in wire order, each with its default when unset.
    pub(crate) fn numbers(&self) -> [(&'static str, Option<i64>); 10] {
        [
            ("minlen", self.minlen.or(Some(1))),
            ("maxlen", self.maxlen.or(Some(99))),
            ("src_minlen", self.src_minlen.or(Some(1))),
            ("src_maxlen", self.src_maxlen.or(Some(99))),
            ("tariff_id", self.tariff_id),
            ("lcr_id", self.lcr_id),
            ("did_id", self.did_id),
            ("device_id", self.device_id),
            ("location_group_id", self.location_group_id),
            ("dst_locationgroup_id", self.dst_locationgroup_id),
        ]
    }

    pub(crate) fn patterns(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("cut", self.cut.as_deref()),
            ("add", self.add.as_deref()),
            ("src_cut", self.src_cut.as_deref()),
            ("src_add", self.src_add.as_deref()),
        ]
    }

    fn has_pattern(&self) -> bool {
        self.patterns()
            .iter()
            .any(|(_, value)| value.is_some_and(|value| !value.is_empty()))
    }

    fn validate_numbers(&self, min: i64) -> Result<(), ValidationError> {
        for (field, value) in self.numbers() {
            if let Some(value) = value {
                validation::at_least(field, value, min)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `location_rule_create`. One of the cut/add patterns must be non-empty.
pub struct CreateLocationRule {
    location_id: u64,
    name: String,
    options: LocationRuleOptions,
}

impl CreateLocationRule {
    pub fn new(
        location_id: u64,
        name: impl Into<String>,
        options: LocationRuleOptions,
    ) -> Result<Self, ValidationError> {
        let location_id = validation::positive("location_id", location_id)?;
        let name = validation::non_empty("name", name)?;
        options.validate_numbers(0)?;
        if !options.has_pattern() {
            return Err(ValidationError::MissingOneOf {
                fields: PATTERN_FIELDS,
            });
        }
        Ok(Self {
            location_id,
            name,
            options,
        })
    }

    pub fn location_id(&self) -> u64 {
        self.location_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &LocationRuleOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRuleCreated {
    pub success: String,
    pub rule_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `location_rule_update`.
pub struct UpdateLocationRule {
    location_rule_id: u64,
    name: Option<String>,
    enabled: Option<bool>,
    options: LocationRuleOptions,
}

impl UpdateLocationRule {
    /// Patterns are only checked when at least one of them is being changed.
    pub fn new(
        location_rule_id: u64,
        options: LocationRuleOptions,
    ) -> Result<Self, ValidationError> {
        let location_rule_id = validation::positive("location_rule_id", location_rule_id)?;
        options.validate_numbers(-1)?;
        let touches_patterns = options.patterns().iter().any(|(_, value)| value.is_some());
        if touches_patterns && !options.has_pattern() {
            return Err(ValidationError::MissingOneOf {
                fields: PATTERN_FIELDS,
            });
        }
        Ok(Self {
            location_rule_id,
            name: None,
            enabled: None,
            options,
        })
    }

    pub fn rename(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(validation::non_empty("name", name)?);
        Ok(self)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn location_rule_id(&self) -> u64 {
        self.location_rule_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_enabled(&self) -> Option<bool> {
        self.enabled
    }

    pub fn options(&self) -> &LocationRuleOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSelector {
    All,
    Id(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// `location_rules_get`, paged with `from` and `max_results`.
pub struct GetLocationRules {
    location: LocationSelector,
    from: Option<u64>,
    max_results: Option<u64>,
}

impl GetLocationRules {
    pub fn new(location: LocationSelector) -> Result<Self, ValidationError> {
        if let LocationSelector::Id(id) = location {
            validation::positive("location_id", id)?;
        }
        Ok(Self {
            location,
            from: None,
            max_results: None,
        })
    }

    pub fn page(mut self, from: u64, max_results: u64) -> Result<Self, ValidationError> {
        self.from = Some(from);
        self.max_results = Some(validation::positive("max_results", max_results)?);
        Ok(self)
    }

    pub fn location(&self) -> LocationSelector {
        self.location
    }

    pub fn from(&self) -> Option<u64> {
        self.from
    }

    pub fn max_results(&self) -> Option<u64> {
        self.max_results
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuleLocation {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(rename = "location_rule", deserialize_with = "coerce::list")]
    pub rules: Vec<LocationRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocationRule {
    #[serde(deserialize_with = "coerce::int")]
    pub id: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub location_id: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(deserialize_with = "coerce::flag")]
    pub enabled: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub cut: String,
    #[serde(deserialize_with = "coerce::string")]
    pub add: String,
    #[serde(deserialize_with = "coerce::int")]
    pub minlen: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub maxlen: i64,
    #[serde(deserialize_with = "coerce::string")]
    pub lr_type: String,
    #[serde(deserialize_with = "coerce::opt_id")]
    pub lcr_id: Option<i64>,
    #[serde(deserialize_with = "coerce::opt_id")]
    pub tariff_id: Option<i64>,
    #[serde(deserialize_with = "coerce::opt_id")]
    pub did_id: Option<i64>,
    #[serde(deserialize_with = "coerce::opt_id")]
    pub device_id: Option<i64>,
    #[serde(deserialize_with = "coerce::flag")]
    pub change_callerid_name: bool,
    #[serde(deserialize_with = "coerce::string")]
    pub src_cut: String,
    #[serde(deserialize_with = "coerce::string")]
    pub src_add: String,
    #[serde(deserialize_with = "coerce::int")]
    pub src_minlen: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub src_maxlen: i64,
    #[serde(deserialize_with = "coerce::int")]
    pub locationgroup_id: i64,
}

id_request! {
    /// `location_rule_get`.
    GetLocationRule { location_rule_id: "location_rule_id" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Copy a location rule into another location (`location_rule_copy`).
pub struct CopyLocationRule {
    location_rule_id: u64,
    location_id: u64,
}

impl CopyLocationRule {
    pub fn new(location_rule_id: u64, location_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            location_rule_id: validation::positive("location_rule_id", location_rule_id)?,
            location_id: validation::positive("location_id", location_id)?,
        })
    }

    pub fn location_rule_id(&self) -> u64 {
        self.location_rule_id
    }

    pub fn location_id(&self) -> u64 {
        self.location_id
    }
}

id_request! {
    /// `location_rule_delete`.
    DeleteLocationRule { location_rule_id: "location_rule_id" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sip_providers_restrict_dtmf_modes() {
        let options = ProviderOptions {
            dtmfmode: Some(DtmfMode::Inband),
            ..ProviderOptions::default()
        };
        assert!(matches!(
            CreateProvider::new("carrier", ProviderTech::Sip, 1, options.clone()),
            Err(ValidationError::NotOneOf { field: "dtmfmode", .. })
        ));
        assert!(CreateProvider::new("carrier", ProviderTech::Iax2, 1, options).is_ok());
    }

    #[test]
    fn provider_options_are_checked() {
        let reserved_login = ProviderOptions {
            login: Some("Anonymous".into()),
            ..ProviderOptions::default()
        };
        assert!(UpdateProvider::new(3, reserved_login).is_err());

        let short_timeout = ProviderOptions {
            timeout: Some(10),
            ..ProviderOptions::default()
        };
        assert!(matches!(
            UpdateProvider::new(3, short_timeout),
            Err(ValidationError::BelowMinimum { field: "timeout", min: 30, .. })
        ));

        let bad_servers = ProviderOptions {
            server_ids: Some("1,,3".into()),
            ..ProviderOptions::default()
        };
        assert!(UpdateProvider::new(3, bad_servers).is_err());
    }

    #[test]
    fn provider_rule_needs_a_rewrite() {
        assert!(matches!(
            CreateProviderRule::new(1, "strip", "", "", ProviderRuleOptions::default()),
            Err(ValidationError::MissingOneOf { .. })
        ));

        let inverted = ProviderRuleOptions {
            minlen: 10,
            maxlen: 5,
            ..ProviderRuleOptions::default()
        };
        assert!(CreateProviderRule::new(1, "strip", "00", "", inverted).is_err());

        let src_suffix = ProviderRuleOptions {
            pr_type: RuleDirection::Src,
            suffix: Some("#".into()),
            ..ProviderRuleOptions::default()
        };
        assert!(matches!(
            CreateProviderRule::new(1, "strip", "00", "", src_suffix),
            Err(ValidationError::NotOneOf { field: "pr_type", .. })
        ));
    }

    #[test]
    fn location_rule_patterns() {
        assert!(CreateLocationRule::new(1, "intl", LocationRuleOptions::default()).is_err());

        let cut = LocationRuleOptions {
            cut: Some("00".into()),
            ..LocationRuleOptions::default()
        };
        assert!(CreateLocationRule::new(1, "intl", cut).is_ok());

        // Updates may leave patterns untouched.
        assert!(UpdateLocationRule::new(5, LocationRuleOptions::default()).is_ok());

        let cleared = LocationRuleOptions {
            add: Some(String::new()),
            ..LocationRuleOptions::default()
        };
        assert!(UpdateLocationRule::new(5, cleared).is_err());
    }

    #[test]
    fn location_rule_update_accepts_clearing_ids() {
        let clear_lcr = LocationRuleOptions {
            lcr_id: Some(-1),
            ..LocationRuleOptions::default()
        };
        assert!(UpdateLocationRule::new(5, clear_lcr.clone()).is_ok());

        let mut create = clear_lcr;
        create.cut = Some("00".into());
        assert!(matches!(
            CreateLocationRule::new(1, "intl", create),
            Err(ValidationError::BelowMinimum { field: "lcr_id", .. })
        ));
    }
}
