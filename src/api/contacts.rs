//! Contact CRUD, export and stats calls

use log::info;
use reqwest::Method;

use super::client::ApiClient;
use super::constants;
use super::errors::ApiError;
use super::models::{
    Contact, ContactPage, ContactQuery, ContactStats, ContactUpdate, ExportFormat, NewContact,
};

impl ApiClient {
    pub async fn list_contacts(&self, query: &ContactQuery) -> Result<ContactPage, ApiError> {
        let url = constants::contacts_endpoint(self.base_url());
        self.send_json(self.request(Method::GET, &url).query(query))
            .await
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact, ApiError> {
        let url = constants::contact_endpoint(self.base_url(), id);
        self.send_json(self.request(Method::GET, &url)).await
    }

    pub async fn create_contact(&self, contact: &NewContact) -> Result<Contact, ApiError> {
        info!("Creating contact '{}'", contact.name);
        let url = constants::contacts_endpoint(self.base_url());
        self.send_json(self.request(Method::POST, &url).json(contact))
            .await
    }

    pub async fn update_contact(&self, id: &str, update: &ContactUpdate) -> Result<Contact, ApiError> {
        info!("Updating contact {}", id);
        let url = constants::contact_endpoint(self.base_url(), id);
        self.send_json(self.request(Method::PUT, &url).json(update))
            .await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        info!("Deleting contact {}", id);
        let url = constants::contact_endpoint(self.base_url(), id);
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }

    /// Download every contact in the requested format
    pub async fn export_contacts(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        info!("Exporting contacts as {}", format.as_str());
        let url = constants::export_endpoint(self.base_url());
        let response = self
            .send(
                self.request(Method::GET, &url)
                    .query(&[("format", format.as_str())]),
            )
            .await?;

        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    pub async fn contact_stats(&self) -> Result<ContactStats, ApiError> {
        let url = constants::stats_endpoint(self.base_url());
        self.send_json(self.request(Method::GET, &url)).await
    }
}
