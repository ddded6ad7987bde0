#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Failure conditions reported by the MOR API that this crate recognizes.
///
/// Each endpoint recognizes its own closed subset of error strings; a string
/// outside that subset surfaces as [`crate::KolmisoftError::UnknownApi`] with the
/// original text instead.
pub enum KnownApiError {
    // Authentication and access.
    LoginFailed,
    LogoutFailed,
    IncorrectHash,
    AccessDenied,
    NotAuthorized,
    NotAuthorizedToViewPage,
    BadLogin,
    ApiRequestsDisabled,
    GetRequestsDisabled,
    FeatureDisabled,
    RegistrationDisabled,
    ApiSecretKeyMissing,

    // Users and balances.
    UserNotFound,
    BalanceNotUpdated,
    InsufficientBalance,
    InsufficientUserBalance,
    UserIdMissing,
    InvalidUserId,

    // System.
    ElasticsearchUnavailable,
    AsteriskUnavailable,
    ServerNotFound,
    NoDataFound,

    // Calls and spying.
    ChanspyDisabled,
    ActiveCallNotFound,
    NoSpyDevice,
    SpyDeviceOnDifferentServer,
    CannotSpyVirtualDevice,
    InvalidCallStatus,

    // Devices, CLIs and device rules.
    DeviceNotFound,
    ClisNotFound,
    DeviceRuleNotFound,
    AddFailed,
    NameBlank,
    AddAndCutBlank,

    // Aggregates.
    TerminatorNotFound,

    // Settings.
    InvalidDefaultUserPasswordLength,
    InvalidDefaultUserCredit,
    InvalidDefaultUserBalance,
    InvalidDefaultUserPostpaid,
    InvalidDefaultUserAllowLossCalls,
    InvalidDefaultUserTimeZone,
    InvalidDefaultUserCurrency,
    DefaultQuickforwardsRuleNotFound,
    InvalidDefaultUserRecordingEnabled,
    InvalidDefaultUserRecordingForcedEnabled,
    InvalidDefaultDeviceCallLimit,
    InvalidDefaultDeviceCanreinvite,
    InvalidDefaultDeviceNat,
    InvalidDefaultDeviceQualify,
    InvalidDefaultDeviceGraceTime,
    DefaultDeviceLocationNotFound,
    DefaultUserTariffNotFound,
    InvalidAllowApi,
    ApiSecretKeyTooShort,

    // Currencies and exchange rates.
    InvalidExchangeRate,
    CurrencyNotFound,
    NoCurrency,

    // DIDs and quick forwards.
    DidNotFound,
    RatesNotFound,
    QuickforwardsEmpty,
    QuickforwardsNotAuthorized,

    // Invoices and credit notes.
    NoInvoicesFound,
    InvoiceNotFound,
    CreditNoteNotCreated,
    CreditNoteNotFound,

    // Payments and vouchers.
    PaymentNotSaved,
    VoucherNotFound,
    VouchersDisabled,

    // IVR.
    DialPlanNotFound,
    DialPlanTimePeriodNotFound,
    TimePeriodNotFound,
    TimePeriodNotUpdated,

    // Monitoring.
    MonitoringNotFound,
    MissingMonitoringParams,

    // PBX pools and reseller groups.
    PbxPoolNameMissing,
    PbxPoolNameNotUnique,
    ResellerGroupNameMissing,
    ResellerGroupNameNotUnique,
    NoResellerGroupsFound,

    // Rates and tariffs.
    RateNotFound,
    TariffNotFound,
    InvalidTariff,
    NoTariffsFound,
    TariffFileMissing,
    BadXmlData,
    TariffIdNameMismatch,
    TariffNameExists,
    TariffOwnedByOtherUser,
    NoDestinations,

    // LCRs and providers.
    NoLcrsFound,
    LcrNotFound,
    ProviderNotFound,
    ProviderNotInLcr,
    CannotDeleteProvider,
    ProviderNameNotUnique,
    ProviderNameEmpty,
    ProviderHasNoRules,
    ProviderRuleNotFound,

    // Location rules.
    RuleNotUnique,
    RuleNameMissing,
    CannotAssignDevice,
    CutAndAddEmpty,
    LocationError,
    LocationNotFound,
    CannotAssignLcr,
    CannotAssignDid,
    LocationGroupNotFound,

    // Number pools.
    NumberPoolNotFound,
    NumbersEmpty,
    InvalidNumbersFormat,
    NumberPoolNumbersNotFound,
    NumberPoolNumbersInUse,

    // Phonebooks.
    NoPhonebooks,
    PhonebookNotFound,
    PhonebookNotSaved,
    SpeedDialNameMissing,
    SpeedDialTooShort,
    RecordNumberTooShort,
    SpeedDialNotNumeric,
    RecordNumberNotNumeric,
    SpeedDialNotUnique,

    // Queues and recordings.
    NoRecordingsFound,
    InvalidDateFrom,
    InvalidDateTill,
    DateFromAfterDateTill,
    RecordingNotFound,
    RecordingsNotFound,

    // SMS.
    EmptyMessage,
    WrongSource,
    WrongDestination,
    NoSuchLcr,
    NotSubscribedToSms,
    NoRateForDestination,
    SmsTariffNotFound,
    SmsLcrNotFound,
    AlreadySubscribedToSms,
    ResellerWithoutSmsSubscription,
    SmsMessagesNotFound,

    // Services.
    ServiceTypeMissing,
    FlatRateQuantityMissing,
    QuantityNotNumeric,
    QuantityNotPositive,
    ServicePriceNotNumeric,
    ServiceNotFound,
    ServicesNotAuthorized,
    ServiceHasSubscriptions,
    NoServicesFound,
    InvalidServiceType,
    ServiceNotSelected,

    // Subscriptions.
    SubscriptionDisabled,
    SubscriptionNotFound,
    SubscriptionDeleteActionNotFound,
    NoSubscriptionsFound,
    SubscriptionsNotAuthorized,
    OneOrMoreServicesNotFound,
    InvalidActivationEnd,
    InvalidActivationStart,
    ActivationStartAfterEnd,
    ServiceNotFlatRate,
    NumberMissing,
    NoFlatRateSubscriptions,
}

impl KnownApiError {
    /// Returns `true` for failures caused by credentials, hashing or permissions.
    pub fn is_auth_error(self) -> bool {
        matches!(
            self,
            Self::LoginFailed
                | Self::IncorrectHash
                | Self::AccessDenied
                | Self::NotAuthorized
                | Self::NotAuthorizedToViewPage
                | Self::BadLogin
                | Self::ApiRequestsDisabled
                | Self::GetRequestsDisabled
                | Self::ApiSecretKeyMissing
                | Self::ServicesNotAuthorized
                | Self::SubscriptionsNotAuthorized
                | Self::QuickforwardsNotAuthorized
        )
    }

    /// Returns `true` for "nothing matched" outcomes rather than rejected input.
    pub fn is_not_found(self) -> bool {
        matches!(
            self,
            Self::UserNotFound
                | Self::ServerNotFound
                | Self::NoDataFound
                | Self::ActiveCallNotFound
                | Self::DeviceNotFound
                | Self::ClisNotFound
                | Self::DeviceRuleNotFound
                | Self::TerminatorNotFound
                | Self::DefaultQuickforwardsRuleNotFound
                | Self::DefaultDeviceLocationNotFound
                | Self::DefaultUserTariffNotFound
                | Self::CurrencyNotFound
                | Self::DidNotFound
                | Self::RatesNotFound
                | Self::QuickforwardsEmpty
                | Self::NoInvoicesFound
                | Self::InvoiceNotFound
                | Self::CreditNoteNotFound
                | Self::VoucherNotFound
                | Self::DialPlanNotFound
                | Self::DialPlanTimePeriodNotFound
                | Self::TimePeriodNotFound
                | Self::MonitoringNotFound
                | Self::NoResellerGroupsFound
                | Self::RateNotFound
                | Self::TariffNotFound
                | Self::NoTariffsFound
                | Self::NoLcrsFound
                | Self::LcrNotFound
                | Self::ProviderNotFound
                | Self::ProviderNotInLcr
                | Self::ProviderHasNoRules
                | Self::ProviderRuleNotFound
                | Self::LocationNotFound
                | Self::LocationGroupNotFound
                | Self::NumberPoolNotFound
                | Self::NumberPoolNumbersNotFound
                | Self::NoPhonebooks
                | Self::PhonebookNotFound
                | Self::NoRecordingsFound
                | Self::RecordingNotFound
                | Self::RecordingsNotFound
                | Self::NoSuchLcr
                | Self::SmsTariffNotFound
                | Self::SmsLcrNotFound
                | Self::SmsMessagesNotFound
                | Self::ServiceNotFound
                | Self::NoServicesFound
                | Self::SubscriptionNotFound
                | Self::SubscriptionDeleteActionNotFound
                | Self::NoSubscriptionsFound
                | Self::OneOrMoreServicesNotFound
                | Self::NoFlatRateSubscriptions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::KnownApiError;

    #[test]
    fn classification_helpers() {
        assert!(KnownApiError::IncorrectHash.is_auth_error());
        assert!(KnownApiError::BadLogin.is_auth_error());
        assert!(!KnownApiError::UserNotFound.is_auth_error());

        assert!(KnownApiError::UserNotFound.is_not_found());
        assert!(KnownApiError::NoLcrsFound.is_not_found());
        assert!(!KnownApiError::InvalidExchangeRate.is_not_found());
    }
}
