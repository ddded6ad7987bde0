use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    ActivateMonitoring, AddPoolNumbers, CreateNumberPool, CreatePbxPool, CreateResellerGroup,
    DeleteNumberPool, GetNumberPools, GetResellerGroups, MonitoringActivation, NumberPool,
    NumberPoolCreated, RemovePoolNumbers, ResellerGroup, UpdateIvrDialPlan, UpdateIvrTimePeriod,
    UpdateNumberPool,
};

impl KolmisoftClient {
    pub async fn update_ivr_dial_plan(
        &self,
        request: UpdateIvrDialPlan,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    /// Returns the server's confirmation message.
    pub async fn update_ivr_time_period(
        &self,
        request: UpdateIvrTimePeriod,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_pbx_pool(&self, request: CreatePbxPool) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_reseller_group(
        &self,
        request: CreateResellerGroup,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_reseller_groups(&self) -> Result<Vec<ResellerGroup>, KolmisoftError> {
        self.execute(&GetResellerGroups).await
    }

    pub async fn activate_monitoring(
        &self,
        request: ActivateMonitoring,
    ) -> Result<MonitoringActivation, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_number_pools(
        &self,
        request: GetNumberPools,
    ) -> Result<Vec<NumberPool>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_number_pool(
        &self,
        request: CreateNumberPool,
    ) -> Result<NumberPoolCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_number_pool(
        &self,
        request: UpdateNumberPool,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_number_pool(
        &self,
        request: DeleteNumberPool,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn add_pool_numbers(
        &self,
        request: AddPoolNumbers,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn remove_pool_numbers(
        &self,
        request: RemovePoolNumbers,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }
}
