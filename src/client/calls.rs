use serde_json::Value;

use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    DeleteRecordings, GetActiveCalls, GetLocalCalls, GetQueueLog, GetRecordings, GetUserCalls,
    QueueLogEntry, Recording, RecordingsDeleted, SpyCall, SpyCallResponse, UpdateRecording,
    UserCalls,
};

impl KolmisoftClient {
    /// Call detail records of MOR's `calls_stat` document.
    pub async fn get_user_calls(&self, request: GetUserCalls) -> Result<UserCalls, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_local_calls(
        &self,
        request: GetLocalCalls,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_active_calls(
        &self,
        request: GetActiveCalls,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn spy_call(&self, request: SpyCall) -> Result<SpyCallResponse, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_queue_log(
        &self,
        request: GetQueueLog,
    ) -> Result<Vec<QueueLogEntry>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_recordings(
        &self,
        request: GetRecordings,
    ) -> Result<Vec<Recording>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_recording(
        &self,
        request: UpdateRecording,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_recordings(
        &self,
        request: DeleteRecordings,
    ) -> Result<RecordingsDeleted, KolmisoftError> {
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::tests::{
        FakeTransport, assert_no_param, assert_param, make_client, sha1_hex, test_config,
    };
    use crate::domain::{CallOwner, UnixTimestamp, UserCallsOptions};

    use super::*;

    #[tokio::test]
    async fn user_calls_return_call_records() {
        let transport = FakeTransport::new(
            200,
            "<page><calls_stat><calls><call><id>1</id></call></calls></calls_stat></page>",
        );
        let client = make_client(test_config(), transport.clone());

        let request =
            GetUserCalls::new(CallOwner::User("5".into()), UserCallsOptions::default()).unwrap();
        let calls = client.get_user_calls(request).await.unwrap();
        assert_eq!(calls.calls, vec![json!({"id": "1"})]);

        let (url, params) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://mor.example.invalid/billing/api/user_calls_get")
        );
        assert_param(&params, "s_device", "all");
        assert_no_param(&params, "p");
    }

    #[tokio::test]
    async fn local_calls_hash_order_is_from_till_user() {
        let transport = FakeTransport::new(200, "<page><local_calls/></page>");
        let client = make_client(test_config(), transport.clone());

        let request = GetLocalCalls::new(
            9,
            Some(UnixTimestamp::new(1000)),
            Some(UnixTimestamp::new(2000)),
        )
        .unwrap();
        client.get_local_calls(request).await.unwrap();

        let (_, params) = transport.last_request();
        assert_param(&params, "hash", &sha1_hex("100020009S3cr3t"));
    }
}
