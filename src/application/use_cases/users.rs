//! User profile use cases.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::records::{RecordStore, now};
use crate::application::dto::{ProfileForm, UserForm, id_or_null, text_or_null};
use crate::application::services::SessionHub;
use crate::domain::entities::{DirectoryUser, UserProfile, UserRole};
use crate::domain::errors::{DataError, OperationError, ValidationError, require, require_email};
use crate::domain::filter::StatusFilter;
use crate::domain::ports::{AuthPort, Query, Record, Table};

/// Lists, creates and imports application users.
#[derive(Clone)]
pub struct UsersUseCase {
    store: RecordStore,
    auth_port: Arc<dyn AuthPort>,
    hub: Arc<SessionHub>,
    temporary_password: String,
}

impl UsersUseCase {
    #[must_use]
    pub fn new(
        store: RecordStore,
        auth_port: Arc<dyn AuthPort>,
        hub: Arc<SessionHub>,
        temporary_password: impl Into<String>,
    ) -> Self {
        Self {
            store,
            auth_port,
            hub,
            temporary_password: temporary_password.into(),
        }
    }

    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn list(
        &self,
        company_filter: Option<&str>,
        status: StatusFilter,
    ) -> Result<Vec<UserProfile>, OperationError> {
        let query = UserProfile::query()
            .eq_opt("company_id", company_filter)
            .active(status.as_active_flag());
        self.store.fetch(&query).await
    }

    /// Profile row of the auth user `auth_id`, if any.
    ///
    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn profile_for(&self, auth_id: &str) -> Result<Option<UserProfile>, OperationError> {
        let query = UserProfile::query().eq("auth_id", auth_id).limit(1);
        Ok(self.store.fetch(&query).await?.into_iter().next())
    }

    /// Signs up an auth account with the temporary password, then inserts
    /// its profile. A failed insert leaves the auth account behind.
    ///
    /// # Errors
    /// Returns error if validation, the sign-up or the insert fails.
    pub async fn create(&self, form: UserForm) -> Result<(), OperationError> {
        validate(&form)?;
        require_email(form.email.trim())?;

        let account = self
            .auth_port
            .sign_up(form.email.trim(), &self.temporary_password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Sign-up failed");
                e
            })?;
        debug!(auth_id = %account.id, "Auth account created");

        self.store
            .insert(
                Table::Users,
                vec![json!({
                    "auth_id": account.id,
                    "name": form.name.trim(),
                    "email": form.email.trim(),
                    "phone": text_or_null(&form.phone),
                    "job_title": text_or_null(&form.job_title),
                    "role": form.role.as_str(),
                    "company_id": id_or_null(form.effective_company().as_deref()),
                    "active": true,
                    "updated_at": now(),
                })],
            )
            .await?;

        info!(email = %form.email, role = %form.role, "User created");
        Ok(())
    }

    /// Updates a profile; the email is not editable.
    ///
    /// # Errors
    /// Returns error if validation or the update fails.
    pub async fn update(&self, user: &UserProfile, form: UserForm) -> Result<(), OperationError> {
        validate(&form)?;

        self.store
            .update(
                Table::Users,
                &user.id,
                json!({
                    "name": form.name.trim(),
                    "phone": text_or_null(&form.phone),
                    "job_title": text_or_null(&form.job_title),
                    "role": form.role.as_str(),
                    "company_id": id_or_null(form.effective_company().as_deref()),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(user_id = %user.id, "User updated");
        Ok(())
    }

    /// # Errors
    /// Returns error if the update fails.
    pub async fn toggle_active(&self, user: &UserProfile) -> Result<(), OperationError> {
        self.store
            .set_active(Table::Users, &user.id, !user.active)
            .await?;
        info!(user_id = %user.id, active = !user.active, "User status toggled");
        Ok(())
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::Users, id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Directory accounts that have no profile yet.
    ///
    /// # Errors
    /// Returns error if the directory or the profiles cannot be read.
    pub async fn importable(&self) -> Result<Vec<DirectoryUser>, OperationError> {
        let session = self.hub.session().await?;
        let directory = self
            .auth_port
            .list_directory_users(&session)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list directory users");
                e
            })?;

        let existing: Vec<Value> = self
            .store
            .fetch_as(&Query::table(Table::Users).columns("auth_id"))
            .await?;
        let linked: HashSet<&str> = existing
            .iter()
            .filter_map(|row| row["auth_id"].as_str())
            .collect();

        let importable: Vec<DirectoryUser> = directory
            .into_iter()
            .filter(|user| !linked.contains(user.id.as_str()))
            .collect();

        debug!(count = importable.len(), "Importable directory users");
        Ok(importable)
    }

    /// Creates client profiles for the selected directory accounts.
    ///
    /// # Errors
    /// Returns `NothingSelected` for an empty selection, or the insert failure.
    pub async fn import(
        &self,
        selected: &[DirectoryUser],
        company_filter: Option<&str>,
    ) -> Result<usize, OperationError> {
        if selected.is_empty() {
            return Err(ValidationError::NothingSelected.into());
        }

        let timestamp = now();
        let rows = selected
            .iter()
            .map(|user| {
                json!({
                    "auth_id": user.id,
                    "name": user.display_name(),
                    "email": user.email,
                    "role": UserRole::Client.as_str(),
                    "company_id": id_or_null(company_filter),
                    "active": true,
                    "updated_at": timestamp,
                })
            })
            .collect();

        self.store.insert(Table::Users, rows).await?;
        info!(count = selected.len(), "Users imported");
        Ok(selected.len())
    }

    /// Updates the caller's own profile.
    ///
    /// # Errors
    /// Returns `NotFound` when the caller has no profile, or the update failure.
    pub async fn update_own_profile(&self, form: ProfileForm) -> Result<UserProfile, OperationError> {
        require("name", &form.name)?;

        let session = self.hub.session().await?;
        let profile = self
            .profile_for(session.user_id())
            .await?
            .ok_or(DataError::NotFound)?;

        self.store
            .update(
                Table::Users,
                &profile.id,
                json!({
                    "name": form.name.trim(),
                    "phone": text_or_null(&form.phone),
                    "job_title": text_or_null(&form.job_title),
                    "avatar_url": text_or_null(&form.avatar_url),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(user_id = %profile.id, "Own profile updated");
        self.store.fetch_by_id(&profile.id).await
    }
}

fn validate(form: &UserForm) -> Result<(), OperationError> {
    require("name", &form.name)?;
    require("email", &form.email)?;
    if !form.role.is_master() && form.company_id.as_deref().is_none_or(str::is_empty) {
        return Err(ValidationError::required("company").into());
    }
    Ok(())
}
