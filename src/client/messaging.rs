use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    CreatePhonebookRecord, GetPhonebooks, GetUserSms, Phonebook, SendSms, SmsMessage, SmsSent,
    SubscribeSmsService, UpdatePhonebook,
};

impl KolmisoftClient {
    /// Send one SMS. The configured password is always sent with SMS calls.
    pub async fn send_sms(&self, request: SendSms) -> Result<SmsSent, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn subscribe_sms_service(
        &self,
        request: SubscribeSmsService,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_user_sms(
        &self,
        request: GetUserSms,
    ) -> Result<Vec<SmsMessage>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_phonebooks(
        &self,
        request: GetPhonebooks,
    ) -> Result<Vec<Phonebook>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_phonebook(
        &self,
        request: UpdatePhonebook,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_phonebook_record(
        &self,
        request: CreatePhonebookRecord,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }
}
