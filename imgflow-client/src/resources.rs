//! Collection listing endpoint

use crate::ImageServiceClient;
use crate::error::Result;
use imgflow_core::dto::resource::ListResponse;

impl ImageServiceClient {
    // =============================================================================
    // Collection Listing
    // =============================================================================

    /// List one page of the image collection
    ///
    /// # Arguments
    /// * `limit` - Maximum number of records to return
    /// * `offset` - Number of records to skip
    ///
    /// # Returns
    /// The records in the window plus the total size of the collection
    pub async fn list_resources(&self, limit: u64, offset: u64) -> Result<ListResponse> {
        let url = self.api_url(&format!("/images?limit={}&offset={}", limit, offset));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
