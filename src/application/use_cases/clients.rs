//! Client registry use cases.

use serde_json::json;
use tracing::info;

use super::records::{RecordStore, now};
use crate::application::dto::{ClientForm, id_or_null, text_or_null};
use crate::domain::code::CodeSequence;
use crate::domain::entities::Client;
use crate::domain::errors::{OperationError, require};
use crate::domain::filter::StatusFilter;
use crate::domain::ports::{Record, Table};

/// Lists and edits clients.
#[derive(Clone)]
pub struct ClientsUseCase {
    store: RecordStore,
}

impl ClientsUseCase {
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Clients of the selected company (or all) with the given status.
    ///
    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn list(
        &self,
        company_filter: Option<&str>,
        status: StatusFilter,
    ) -> Result<Vec<Client>, OperationError> {
        let query = Client::query()
            .eq_opt("company_id", company_filter)
            .active(status.as_active_flag());
        self.store.fetch(&query).await
    }

    /// Code shown (disabled) in the create form.
    ///
    /// # Errors
    /// Returns error if the existing codes cannot be read.
    pub async fn next_code(&self) -> Result<String, OperationError> {
        self.store
            .next_code(Table::Clients, CodeSequence::CLIENT)
            .await
    }

    /// # Errors
    /// Returns error if validation, the code check or the insert fails.
    pub async fn create(&self, form: ClientForm) -> Result<(), OperationError> {
        validate(&form)?;
        self.store
            .ensure_code_free(Table::Clients, &form.code, None)
            .await?;

        self.store
            .insert(
                Table::Clients,
                vec![json!({
                    "code": form.code.trim(),
                    "legal_name": form.legal_name.trim(),
                    "trade_name": text_or_null(&form.trade_name),
                    "tax_id": form.tax_id.trim(),
                    "company_id": id_or_null(form.company_id.as_deref()),
                    "active": true,
                    "updated_at": now(),
                })],
            )
            .await?;

        info!(code = %form.code, "Client created");
        Ok(())
    }

    /// Updates a client; the code is re-checked only when it changed.
    ///
    /// # Errors
    /// Returns error if validation, the code check or the update fails.
    pub async fn update(&self, client: &Client, form: ClientForm) -> Result<(), OperationError> {
        validate(&form)?;
        if form.code.trim() != client.code {
            self.store
                .ensure_code_free(Table::Clients, &form.code, Some(&client.id))
                .await?;
        }

        self.store
            .update(
                Table::Clients,
                &client.id,
                json!({
                    "code": form.code.trim(),
                    "legal_name": form.legal_name.trim(),
                    "trade_name": text_or_null(&form.trade_name),
                    "tax_id": form.tax_id.trim(),
                    "company_id": id_or_null(form.company_id.as_deref()),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(client_id = %client.id, "Client updated");
        Ok(())
    }

    /// # Errors
    /// Returns error if the update fails.
    pub async fn toggle_active(&self, client: &Client) -> Result<(), OperationError> {
        self.store
            .set_active(Table::Clients, &client.id, !client.active)
            .await?;
        info!(client_id = %client.id, active = !client.active, "Client status toggled");
        Ok(())
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::Clients, id).await?;
        info!(client_id = %id, "Client deleted");
        Ok(())
    }
}

fn validate(form: &ClientForm) -> Result<(), OperationError> {
    require("code", &form.code)?;
    require("legal name", &form.legal_name)?;
    require("tax id", &form.tax_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::use_cases::records::fixtures::store;
    use crate::domain::errors::ValidationError;
    use crate::domain::ports::mocks::{InMemoryDataPort, Operation};

    fn seeded() -> Arc<InMemoryDataPort> {
        Arc::new(
            InMemoryDataPort::new()
                .with_rows(
                    Table::Companies,
                    vec![
                        json!({"id": "co1", "legal_name": "Acme"}),
                        json!({"id": "co2", "legal_name": "Beta"}),
                    ],
                )
                .with_rows(
                    Table::Clients,
                    vec![
                        json!({"id": "c1", "code": "C0001", "legal_name": "Ana", "tax_id": "1", "company_id": "co1", "active": true}),
                        json!({"id": "c2", "code": "C0002", "legal_name": "Bruno", "tax_id": "2", "company_id": "co2", "active": true}),
                    ],
                ),
        )
    }

    fn form(code: &str) -> ClientForm {
        ClientForm {
            code: code.to_string(),
            legal_name: "Carla".to_string(),
            tax_id: "12345678901".to_string(),
            company_id: Some("co1".to_string()),
            ..ClientForm::default()
        }
    }

    #[tokio::test]
    async fn test_list_by_company_embeds_name() {
        let port = seeded();
        let use_case = ClientsUseCase::new(store(&port));

        let clients = use_case
            .list(Some("co1"), StatusFilter::Active)
            .await
            .unwrap();

        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].company_name(), "Acme");
    }

    #[tokio::test]
    async fn test_create_with_next_code() {
        let port = seeded();
        let use_case = ClientsUseCase::new(store(&port));

        let code = use_case.next_code().await.unwrap();
        assert_eq!(code, "C0003");

        use_case.create(form(&code)).await.unwrap();
        let all = use_case.list(None, StatusFilter::All).await.unwrap();
        assert!(all.iter().any(|c| c.code == "C0003" && c.active));
    }

    #[tokio::test]
    async fn test_create_rejects_taken_code_without_insert() {
        let port = seeded();
        let use_case = ClientsUseCase::new(store(&port));

        let result = use_case.create(form("C0002")).await;

        assert!(matches!(
            result,
            Err(OperationError::Validation(ValidationError::CodeTaken { .. }))
        ));
        assert!(
            !port
                .calls()
                .iter()
                .any(|(op, _)| *op == Operation::Insert)
        );
    }

    #[tokio::test]
    async fn test_update_keeping_code_skips_check() {
        let port = seeded();
        let use_case = ClientsUseCase::new(store(&port));
        let client = use_case.list(None, StatusFilter::All).await.unwrap().remove(0);
        let selects_before = port.calls().len();

        use_case
            .update(&client, ClientForm::from(&client))
            .await
            .unwrap();

        assert_eq!(
            port.calls()[selects_before..],
            [(Operation::Update, Table::Clients)]
        );
    }

    #[tokio::test]
    async fn test_update_to_taken_code_fails() {
        let port = seeded();
        let use_case = ClientsUseCase::new(store(&port));
        let client = use_case.list(None, StatusFilter::All).await.unwrap().remove(0);

        let mut changed = ClientForm::from(&client);
        changed.code = "C0002".to_string();

        assert!(use_case.update(&client, changed).await.is_err());
        assert_eq!(port.row(Table::Clients, "c1").unwrap()["code"], "C0001");
    }
}
