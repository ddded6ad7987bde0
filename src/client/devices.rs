use serde_json::Value;

use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    AddCli, CreateDevice, CreateDeviceRule, DeleteCli, DeleteDevice, DeleteDeviceRule,
    DeviceCreated, GetCliInfo, GetDeviceCallFlow, GetDeviceClis, GetDeviceDetails, GetDeviceRules,
    GetDevices, UpdateDevice, UpdateDeviceCallFlow,
};

impl KolmisoftClient {
    /// Returns the new device's id and its generated SIP/IAX credentials.
    pub async fn create_device(
        &self,
        request: CreateDevice,
    ) -> Result<DeviceCreated, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_device(&self, request: UpdateDevice) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_device(&self, request: DeleteDevice) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_devices(&self, request: GetDevices) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_device_details(
        &self,
        request: GetDeviceDetails,
    ) -> Result<Value, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_device_callflow(
        &self,
        request: GetDeviceCallFlow,
    ) -> Result<Value, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn update_device_callflow(
        &self,
        request: UpdateDeviceCallFlow,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_cli_info(&self, request: GetCliInfo) -> Result<Value, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_cli(&self, request: DeleteCli) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn add_cli(&self, request: AddCli) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_device_clis(
        &self,
        request: GetDeviceClis,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_device_rules(
        &self,
        request: GetDeviceRules,
    ) -> Result<Vec<Value>, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn delete_device_rule(
        &self,
        request: DeleteDeviceRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn create_device_rule(
        &self,
        request: CreateDeviceRule,
    ) -> Result<String, KolmisoftError> {
        self.execute(&request).await
    }
}
