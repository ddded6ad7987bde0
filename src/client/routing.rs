use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    AddLcrProvider, CopyLocationRule, CreateLcr, CreateLocationRule, CreateProvider,
    CreateProviderRule, DeleteLcr, DeleteLocationRule, DeleteProvider, DeleteProviderRule,
    GetLcrs, GetLocationRule, GetLocationRules, GetProviderRules, GetProviders, Lcr, LcrProvider,
    LocationRule, LocationRuleCreated, Provider, ProviderCreated, ProviderRule, RemoveLcrProvider,
    RuleLocation, UpdateLcr, UpdateLocationRule, UpdateProvider,
};

impl KolmisoftClient {
    pub async fn get_lcrs(&self, request: GetLcrs) -> Result<Vec<Lcr>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_lcr(&self, request: CreateLcr) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_lcr(&self, request: UpdateLcr) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_lcr(&self, request: DeleteLcr) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn add_lcr_provider(&self, slot: LcrProvider) -> Result<String, KolmisoftError> {
        self.execute(&AddLcrProvider(slot)).await
    }

    pub async fn remove_lcr_provider(&self, slot: LcrProvider) -> Result<String, KolmisoftError> {
        self.execute(&RemoveLcrProvider(slot)).await
    }

    pub async fn get_providers(
        &self,
        request: GetProviders,
    ) -> Result<Vec<Provider>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_provider(
        &self,
        request: CreateProvider,
    ) -> Result<ProviderCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_provider(&self, request: UpdateProvider) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_provider(&self, request: DeleteProvider) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_provider_rules(
        &self,
        request: GetProviderRules,
    ) -> Result<Vec<ProviderRule>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_provider_rule(
        &self,
        request: CreateProviderRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_provider_rule(
        &self,
        request: DeleteProviderRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_location_rule(
        &self,
        request: CreateLocationRule,
    ) -> Result<LocationRuleCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_location_rule(
        &self,
        request: UpdateLocationRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    /// `Ok(None)` when MOR returns no location block.
    pub async fn get_location_rules(
        &self,
        request: GetLocationRules,
    ) -> Result<Option<RuleLocation>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_location_rule(
        &self,
        request: GetLocationRule,
    ) -> Result<LocationRule, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn copy_location_rule(
        &self,
        request: CopyLocationRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_location_rule(
        &self,
        request: DeleteLocationRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{FakeTransport, assert_param, make_client, sha1_hex, test_config};
    use crate::domain::KnownApiError;

    use super::*;

    #[tokio::test]
    async fn lcr_delete_hashes_username_and_id() {
        let transport = FakeTransport::new(
            200,
            "<page><status><success>LCR deleted</success></status></page>",
        );
        let client = make_client(test_config(), transport.clone());

        let status = client
            .delete_lcr(DeleteLcr::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(status, "LCR deleted");

        let (url, params) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://mor.example.invalid/billing/api/lcr_delete")
        );
        assert_param(&params, "hash", &sha1_hex("admin5S3cr3t"));
    }

    #[tokio::test]
    async fn provider_create_returns_new_id() {
        let transport = FakeTransport::new(
            200,
            "<page><status><success>Provider created</success>\
             <provider_id>41</provider_id></status></page>",
        );
        let client = make_client(test_config(), transport.clone());

        let request = CreateProvider::new(
            "carrier",
            crate::domain::ProviderTech::Sip,
            2,
            Default::default(),
        )
        .unwrap();
        let created = client.create_provider(request).await.unwrap();
        assert_eq!(created.provider_id, 41);

        let (_, params) = transport.last_request();
        assert_param(&params, "hash", &sha1_hex("carrierSIP2S3cr3t"));
    }

    #[tokio::test]
    async fn location_rule_copy_reports_status_errors() {
        let transport = FakeTransport::new(
            200,
            "<page><status><error>Location error</error></status></page>",
        );
        let client = make_client(test_config(), transport);

        let err = client
            .copy_location_rule(CopyLocationRule::new(3, 4).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.api_code(), Some(KnownApiError::LocationError));
    }
}
