use serde_json::Value;

use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    CreateCreditNote, CreateService, CreateSubscription, CreateSubscriptionBulk,
    DeleteCreditNote, DeleteService, DeleteSubscription, FlatRateNumberStatus, GetCreditNotes,
    GetFlatRateNumberStatus, GetInvoices, GetServices, GetSubscriptions, InvoiceList, Service,
    ServiceCreated, SubscriptionCreated, SubscriptionsCreated, UpdateCreditNote, UpdateInvoice,
    UpdateService, UpdateSubscription,
};

impl KolmisoftClient {
    pub async fn get_invoices(&self, request: GetInvoices) -> Result<InvoiceList, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_invoice(&self, request: UpdateInvoice) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    /// Credit notes as returned by MOR, under `credit_notes`.
    pub async fn get_credit_notes(
        &self,
        request: GetCreditNotes,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_credit_note(
        &self,
        request: CreateCreditNote,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_credit_note(
        &self,
        request: UpdateCreditNote,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_credit_note(
        &self,
        request: DeleteCreditNote,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_service(
        &self,
        request: CreateService,
    ) -> Result<ServiceCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_service(&self, request: UpdateService) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_service(&self, request: DeleteService) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_services(&self) -> Result<Vec<Service>, KolmisoftError> {
        self.execute(&GetServices).await
    }

    pub async fn get_subscriptions(
        &self,
        request: GetSubscriptions,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> Result<SubscriptionCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_subscriptions_bulk(
        &self,
        request: CreateSubscription,
    ) -> Result<SubscriptionsCreated, KolmisoftError> {
        self.execute(&CreateSubscriptionBulk(request)).await
    }

    pub async fn update_subscription(
        &self,
        request: UpdateSubscription,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_subscription(
        &self,
        request: DeleteSubscription,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_flat_rate_number_status(
        &self,
        request: GetFlatRateNumberStatus,
    ) -> Result<FlatRateNumberStatus, KolmisoftError> {
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{
        FakeTransport, assert_no_param, assert_param, make_client, sha1_hex, test_config,
    };
    use crate::domain::{KnownApiError, SubscriptionOptions, UnixTimestamp};

    use super::*;

    #[tokio::test]
    async fn invoices_are_signed_with_username_only() {
        let transport = FakeTransport::new(
            200,
            r#"<page><Invoices from="1" till="2"><Invoice number="I-1"><id>5</id></Invoice></Invoices></page>"#,
        );
        let client = make_client(test_config(), transport.clone());

        let request = GetInvoices::new(UnixTimestamp::new(1), UnixTimestamp::new(2)).unwrap();
        let list = client.get_invoices(request).await.unwrap();
        assert_eq!(list.invoices[0].number, "I-1");

        let (url, params) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://mor.example.invalid/billing/api/invoices_get")
        );
        assert_param(&params, "from", "1");
        assert_param(&params, "till", "2");
        assert_param(&params, "hash", &sha1_hex("adminS3cr3t"));
        assert_no_param(&params, "lang");
    }

    #[tokio::test]
    async fn credit_note_delete_sends_password_and_hashes_secret_only() {
        let transport =
            FakeTransport::new(200, "<page><status>Credit note deleted</status></page>");
        let client = make_client(test_config(), transport.clone());

        let status = client
            .delete_credit_note(DeleteCreditNote::new(14).unwrap())
            .await
            .unwrap();
        assert_eq!(status, "Credit note deleted");

        let (_, params) = transport.last_request();
        assert_param(&params, "credit_note_id", "14");
        assert_param(&params, "p", "pw");
        assert_param(&params, "hash", &sha1_hex("S3cr3t"));
    }

    #[tokio::test]
    async fn subscription_create_surfaces_balance_error() {
        let transport = FakeTransport::new(
            200,
            "<page><error>User has insufficient balance</error></page>",
        );
        let client = make_client(test_config(), transport.clone());

        let request = CreateSubscription::new(3, 9, SubscriptionOptions::default()).unwrap();
        let err = client.create_subscription(request).await.unwrap_err();
        assert_eq!(err.api_code(), Some(KnownApiError::InsufficientUserBalance));

        let (_, params) = transport.last_request();
        assert_param(&params, "hash", &sha1_hex("39S3cr3t"));
    }
}
