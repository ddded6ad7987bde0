use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    BalanceUpdateResponse, CreatePayment, GetPayments, GetSimpleBalance, GetUserBalance,
    GetUserBalanceByPassword, LoginResponse, LogoutResponse, Payment, PaymentCreated,
    UpdateUserBalance, UseVoucher, UserLogin, UserLogout, VoucherUseResponse,
};

impl KolmisoftClient {
    /// Log in with the given user's credentials.
    ///
    /// Errors:
    /// - [`KolmisoftError::Api`] with [`crate::domain::KnownApiError::LoginFailed`]
    ///   when MOR answers `status=failed`,
    /// - [`KolmisoftError::Decode`] when the response has no `action` block.
    pub async fn user_login(&self, request: UserLogin) -> Result<LoginResponse, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn user_logout(&self) -> Result<LogoutResponse, KolmisoftError> {
        self.execute(&UserLogout).await
    }

    /// Balance of a user by username, optionally converted to another currency.
    pub async fn get_user_balance(&self, request: GetUserBalance) -> Result<f64, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_user_balance(
        &self,
        request: UpdateUserBalance,
    ) -> Result<BalanceUpdateResponse, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_simple_balance(
        &self,
        request: GetSimpleBalance,
    ) -> Result<f64, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_user_balance_by_password(
        &self,
        request: GetUserBalanceByPassword,
    ) -> Result<f64, KolmisoftError> {
        self.execute(&request).await
    }

    /// Register a payment. `confirmed` in the result tells whether MOR
    /// applied it to the balance right away.
    pub async fn create_payment(
        &self,
        request: CreatePayment,
    ) -> Result<PaymentCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_payments(&self, request: GetPayments) -> Result<Vec<Payment>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn use_voucher(
        &self,
        request: UseVoucher,
    ) -> Result<VoucherUseResponse, KolmisoftError> {
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{FakeTransport, assert_param, make_client, sha1_hex, test_config};
    use crate::domain::KnownApiError;

    use super::*;

    #[tokio::test]
    async fn login_signs_the_callers_credentials() {
        let transport = FakeTransport::new(
            200,
            "<page><action><name>login</name><status>ok</status></action></page>",
        );
        let client = make_client(test_config(), transport.clone());

        let response = client
            .user_login(UserLogin::new("bob", "b0b").unwrap())
            .await
            .unwrap();
        assert_eq!(response.status, "ok");

        let (_, params) = transport.last_request();
        assert_param(&params, "u", "bob");
        assert_param(&params, "p", "b0b");
        assert_param(&params, "hash", &sha1_hex("bobb0bS3cr3t"));
    }

    #[tokio::test]
    async fn failed_login_maps_to_login_failed() {
        let transport = FakeTransport::new(
            200,
            "<page><action><name>login</name><status>failed</status></action></page>",
        );
        let client = make_client(test_config(), transport);

        let err = client
            .user_login(UserLogin::new("bob", "nope").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.api_code(), Some(KnownApiError::LoginFailed));
        assert_eq!(err.api_error(), Some("Login failed"));
    }

    #[tokio::test]
    async fn voucher_hash_covers_voucher_number_only() {
        let transport = FakeTransport::new(
            200,
            "<page><status><status>ok</status><voucher_id>9</voucher_id></status></page>",
        );
        let client = make_client(test_config(), transport.clone());

        let request = UseVoucher::new("5555").unwrap().for_user(3).unwrap();
        let response = client.use_voucher(request).await.unwrap();
        assert_eq!(response.voucher_id, 9);

        let (_, params) = transport.last_request();
        assert_param(&params, "user_id", "3");
        assert_param(&params, "hash", &sha1_hex("5555S3cr3t"));
    }
}
