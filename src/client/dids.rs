use serde_json::Value;

use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    AssignDidDevice, AssignDidTrunkDevice, CloseDid, CreateDid, DeleteDid, DidCreated,
    DidRatesUpdated, GetDidRates, GetDidRatesDetails, GetDids, GetQuickForwardDids,
    MakeDidFree, QuickForwardDid, StopDidSubscription, TerminateDid, UnassignDidDevice,
    UpdateDidDetails, UpdateDidRates, UpdateDidRatesDetails, UpdateQuickForwardDid,
};

impl KolmisoftClient {
    pub async fn get_dids(&self, request: GetDids) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_did(&self, request: CreateDid) -> Result<DidCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn assign_did_device(
        &self,
        request: AssignDidDevice,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn assign_did_trunk_device(
        &self,
        request: AssignDidTrunkDevice,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn unassign_did_device(
        &self,
        request: UnassignDidDevice,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_did_details(
        &self,
        request: UpdateDidDetails,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn stop_did_subscription(
        &self,
        request: StopDidSubscription,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn terminate_did(&self, request: TerminateDid) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn make_did_free(&self, request: MakeDidFree) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn close_did(&self, request: CloseDid) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    /// Returns the `status` text MOR reports for the deletion.
    pub async fn delete_did(&self, request: DeleteDid) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_did_rates(
        &self,
        request: UpdateDidRates,
    ) -> Result<DidRatesUpdated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_did_rates(
        &self,
        request: GetDidRates,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_did_rates_details(
        &self,
        request: GetDidRatesDetails,
    ) -> Result<Value, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_did_rates_details(
        &self,
        request: UpdateDidRatesDetails,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_quick_forward_dids(&self) -> Result<Vec<QuickForwardDid>, KolmisoftError> {
        self.execute(&GetQuickForwardDids).await
    }

    /// Returns the quick forward as stored after the update.
    pub async fn update_quick_forward_did(
        &self,
        request: UpdateQuickForwardDid,
    ) -> Result<QuickForwardDid, KolmisoftError> {
        self.execute(&request).await
    }
}
