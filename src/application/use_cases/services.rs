//! Service catalogue use cases.

use serde_json::json;
use tracing::{info, warn};

use super::records::{RecordStore, now};
use crate::application::dto::{ServiceForm, id_or_null, text_or_null};
use crate::domain::code::CodeSequence;
use crate::domain::entities::Service;
use crate::domain::errors::{OperationError, ValidationError, require};
use crate::domain::filter::StatusFilter;
use crate::domain::ports::{Record, Table};

/// Lists and edits services.
#[derive(Clone)]
pub struct ServicesUseCase {
    store: RecordStore,
}

impl ServicesUseCase {
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Services ordered by code.
    ///
    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn list(
        &self,
        company_filter: Option<&str>,
        status: StatusFilter,
    ) -> Result<Vec<Service>, OperationError> {
        let query = Service::query()
            .eq_opt("company_id", company_filter)
            .active(status.as_active_flag());
        self.store.fetch(&query).await
    }

    /// Creates a service under the globally selected company with the next code.
    ///
    /// # Errors
    /// Returns `CompanyRequired` without a selected company, or the
    /// validation/insert failure.
    pub async fn create(
        &self,
        form: ServiceForm,
        company_filter: Option<&str>,
    ) -> Result<String, OperationError> {
        let Some(company_id) = company_filter else {
            warn!("Service creation attempted without a selected company");
            return Err(ValidationError::CompanyRequired.into());
        };
        require("name", &form.name)?;

        let code = self
            .store
            .next_code(Table::Services, CodeSequence::SERVICE)
            .await?;
        let timestamp = now();

        self.store
            .insert(
                Table::Services,
                vec![json!({
                    "code": code,
                    "name": form.name.trim(),
                    "description": text_or_null(&form.description),
                    "company_id": company_id,
                    "active": true,
                    "created_at": timestamp,
                    "updated_at": timestamp,
                })],
            )
            .await?;

        info!(code = %code, company_id = %company_id, "Service created");
        Ok(code)
    }

    /// Updates a service; code and company are editable here.
    ///
    /// # Errors
    /// Returns error if validation, the code check or the update fails.
    pub async fn update(&self, service: &Service, form: ServiceForm) -> Result<(), OperationError> {
        require("code", &form.code)?;
        require("name", &form.name)?;
        if form.code.trim() != service.code {
            self.store
                .ensure_code_free(Table::Services, &form.code, Some(&service.id))
                .await?;
        }

        self.store
            .update(
                Table::Services,
                &service.id,
                json!({
                    "code": form.code.trim(),
                    "name": form.name.trim(),
                    "description": text_or_null(&form.description),
                    "company_id": id_or_null(form.company_id.as_deref()),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(service_id = %service.id, "Service updated");
        Ok(())
    }

    /// # Errors
    /// Returns error if the update fails.
    pub async fn toggle_active(&self, service: &Service) -> Result<(), OperationError> {
        self.store
            .set_active(Table::Services, &service.id, !service.active)
            .await?;
        info!(service_id = %service.id, active = !service.active, "Service status toggled");
        Ok(())
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::Services, id).await?;
        info!(service_id = %id, "Service deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::use_cases::records::fixtures::store;
    use crate::domain::ports::mocks::InMemoryDataPort;

    fn seeded() -> Arc<InMemoryDataPort> {
        Arc::new(InMemoryDataPort::new().with_rows(
            Table::Services,
            vec![
                json!({"id": "s2", "code": "S0002", "name": "Audit", "company_id": "co1", "active": true}),
                json!({"id": "s1", "code": "S0001", "name": "Bookkeeping", "company_id": "co1", "active": true}),
            ],
        ))
    }

    #[tokio::test]
    async fn test_list_ordered_by_code() {
        let port = seeded();
        let use_case = ServicesUseCase::new(store(&port));

        let services = use_case.list(Some("co1"), StatusFilter::Active).await.unwrap();
        let codes: Vec<_> = services.iter().map(|s| s.code.as_str()).collect();

        assert_eq!(codes, ["S0001", "S0002"]);
    }

    #[tokio::test]
    async fn test_create_stamps_both_timestamps() {
        let port = seeded();
        let use_case = ServicesUseCase::new(store(&port));

        let code = use_case
            .create(
                ServiceForm {
                    name: "Payroll".to_string(),
                    ..ServiceForm::default()
                },
                Some("co1"),
            )
            .await
            .unwrap();

        assert_eq!(code, "S0003");
        let row = port
            .rows(Table::Services)
            .into_iter()
            .find(|r| r["code"] == "S0003")
            .unwrap();
        assert_eq!(row["created_at"], row["updated_at"]);
        assert!(row["description"].is_null());
    }

    #[tokio::test]
    async fn test_update_code_must_stay_unique() {
        let port = seeded();
        let use_case = ServicesUseCase::new(store(&port));
        let service = use_case
            .list(None, StatusFilter::All)
            .await
            .unwrap()
            .remove(0);

        let mut form = ServiceForm::from(&service);
        form.code = "S0002".to_string();
        assert!(use_case.update(&service, form).await.is_err());

        let mut form = ServiceForm::from(&service);
        form.code = "S0100".to_string();
        form.company_id = Some("co2".to_string());
        use_case.update(&service, form).await.unwrap();

        let row = port.row(Table::Services, &service.id).unwrap();
        assert_eq!(row["code"], "S0100");
        assert_eq!(row["company_id"], "co2");
    }
}
