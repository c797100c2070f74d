//! Administrator endpoints.
//!
//! Every call checks the local admin role first; the backend enforces it
//! again.

use docshare_core::Result;
use docshare_core::types::{DocumentId, DocumentRef, NewUser, UserAccount, UserId, UserUpdate};
use reqwest::Method;
use validator::Validate;

use crate::client::{ApiClient, TRACING_TARGET};

impl ApiClient {
    /// Lists every document in the system.
    pub async fn all_documents(&self) -> Result<Vec<DocumentRef>> {
        let request = self
            .authorized_admin(Method::GET, &["documents", "admin", "all"])
            .await?;
        self.document_list(request).await
    }

    /// Lists every team-shared document.
    pub async fn admin_team_documents(&self) -> Result<Vec<DocumentRef>> {
        let request = self
            .authorized_admin(Method::GET, &["documents", "admin", "team"])
            .await?;
        self.document_list(request).await
    }

    /// Deletes a team-shared document regardless of its owner.
    pub async fn delete_team_document(&self, id: &DocumentId) -> Result<()> {
        let request = self
            .authorized_admin(Method::DELETE, &["documents", "admin", "team", id.as_str()])
            .await?;
        self.send_empty(request).await?;

        tracing::info!(target: TRACING_TARGET, document_id = %id, "Team document deleted");
        Ok(())
    }

    /// Lists all user accounts.
    pub async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let request = self
            .authorized_admin(Method::GET, &["admin", "users"])
            .await?;
        self.send_json(request).await
    }

    /// Lists active user accounts.
    pub async fn active_users(&self) -> Result<Vec<UserAccount>> {
        let request = self
            .authorized_admin(Method::GET, &["admin", "users", "active"])
            .await?;
        self.send_json(request).await
    }

    /// Fetches a single user account.
    pub async fn get_user(&self, id: &UserId) -> Result<UserAccount> {
        let request = self
            .authorized_admin(Method::GET, &["admin", "users", id.as_str()])
            .await?;
        self.send_json(request).await
    }

    /// Creates a user account after checking the password confirmation.
    pub async fn create_user(&self, user: &NewUser, confirm_password: &str) -> Result<UserAccount> {
        user.validate_with_confirmation(confirm_password)?;

        let request = self
            .authorized_admin(Method::POST, &["admin", "users"])
            .await?
            .json(user);
        let account: UserAccount = self.send_json(request).await?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %account.id,
            username = %account.username,
            "User created"
        );
        Ok(account)
    }

    /// Updates a user account.
    pub async fn update_user(&self, id: &UserId, update: &UserUpdate) -> Result<UserAccount> {
        update.validate()?;

        let request = self
            .authorized_admin(Method::PUT, &["admin", "users", id.as_str()])
            .await?
            .json(update);
        self.send_json(request).await
    }

    /// Deletes a user account.
    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        let request = self
            .authorized_admin(Method::DELETE, &["admin", "users", id.as_str()])
            .await?;
        self.send_empty(request).await?;

        tracing::info!(target: TRACING_TARGET, user_id = %id, "User deleted");
        Ok(())
    }
}
