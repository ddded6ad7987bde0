use serde_json::Value;

use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    Aggregates, GetAggregates, GetFinancialStatements, GetQuickStats, GetSystemVersion,
    QuickStats, SendEmail, UpdateExchangeRate, UpdateSettings,
};

impl KolmisoftClient {
    /// Today's call totals and the current active call count.
    ///
    /// When the configured user is `admin` the hash covers the secret only.
    pub async fn get_quick_stats(&self) -> Result<QuickStats, KolmisoftError> {
        self.execute(&GetQuickStats).await
    }

    pub async fn get_system_version(&self) -> Result<String, KolmisoftError> {
        self.execute(&GetSystemVersion).await
    }

    /// Returns MOR's `status/success` message.
    pub async fn update_settings(&self, request: UpdateSettings) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_exchange_rate(
        &self,
        request: UpdateExchangeRate,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_aggregates(
        &self,
        request: GetAggregates,
    ) -> Result<Aggregates, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn send_email(&self, request: SendEmail) -> Result<Value, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_financial_statements(
        &self,
        request: GetFinancialStatements,
    ) -> Result<Value, KolmisoftError> {
        self.execute(&request).await
    }
}
