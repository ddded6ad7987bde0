use super::{KolmisoftClient, KolmisoftError};
use crate::domain::{
    GetRate, GetTariffRates, GetTariffs, ImportRetailTariff, RateQuote, SaveWholesaleTariff,
    TariffImported, TariffRates, TariffSummary, WholesaleTariffSaved,
};

impl KolmisoftClient {
    /// Retail tariffs come back grouped by destination group, wholesale ones flat.
    pub async fn get_tariff_rates(
        &self,
        request: GetTariffRates,
    ) -> Result<TariffRates, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn import_retail_tariff(
        &self,
        request: ImportRetailTariff,
    ) -> Result<TariffImported, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn save_wholesale_tariff(
        &self,
        request: SaveWholesaleTariff,
    ) -> Result<WholesaleTariffSaved, KolmisoftError> {
        self.execute(&request).await
    }

    pub async fn get_tariffs(&self) -> Result<Vec<TariffSummary>, KolmisoftError> {
        self.execute(&GetTariffs).await
    }

    pub async fn get_rate(&self, request: GetRate) -> Result<RateQuote, KolmisoftError> {
        self.execute(&request).await
    }
}
