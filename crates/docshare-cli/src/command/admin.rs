//! `admin` subcommands.

use std::collections::BTreeSet;

use anyhow::Context;
use clap::{Args, Subcommand};
use docshare_client::ApiClient;
use docshare_core::types::{DocumentId, NewUser, Role, UserId, UserUpdate};

use super::output;
use super::prompt::{confirm, secret_or_prompt};

/// Administrator commands.
#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// List all users.
    Users,
    /// List active users.
    ActiveUsers,
    /// Show one user.
    User {
        /// User identifier.
        id: String,
    },
    /// Create a user.
    CreateUser(CreateUserArgs),
    /// Update a user.
    UpdateUser(UpdateUserArgs),
    /// Delete a user.
    DeleteUser {
        /// User identifier.
        id: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// List every document.
    Documents,
    /// List every team-shared document.
    TeamDocuments,
    /// Delete a team-shared document.
    DeleteTeamDocument {
        /// Document identifier.
        id: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments of `admin create-user`.
#[derive(Debug, Clone, Args)]
pub struct CreateUserArgs {
    /// Login name.
    #[arg(short, long)]
    pub username: String,
    /// E-mail address.
    #[arg(short, long)]
    pub email: String,
    /// Given name.
    #[arg(long, default_value = "")]
    pub first_name: String,
    /// Family name.
    #[arg(long, default_value = "")]
    pub last_name: String,
    /// Grant the admin role in addition to the user role.
    #[arg(long)]
    pub admin: bool,
    /// Password; read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
    /// Password confirmation; read from stdin when omitted.
    #[arg(long)]
    pub confirm_password: Option<String>,
}

/// Arguments of `admin update-user`.
#[derive(Debug, Clone, Args)]
pub struct UpdateUserArgs {
    /// User identifier.
    pub id: String,
    /// New login name.
    #[arg(long)]
    pub username: Option<String>,
    /// New e-mail address.
    #[arg(long)]
    pub email: Option<String>,
    /// New given name.
    #[arg(long)]
    pub first_name: Option<String>,
    /// New family name.
    #[arg(long)]
    pub last_name: Option<String>,
    /// Grant or revoke the admin role.
    #[arg(long)]
    pub admin: Option<bool>,
    /// Activate or deactivate the account.
    #[arg(long)]
    pub active: Option<bool>,
}

/// Role set for a user with or without the admin role.
fn roles_for(admin: bool) -> BTreeSet<Role> {
    let mut roles = BTreeSet::from([Role::User]);
    if admin {
        roles.insert(Role::Admin);
    }
    roles
}

impl AdminCommand {
    /// Runs the subcommand against `client`.
    pub async fn execute(self, client: &ApiClient) -> anyhow::Result<()> {
        match self {
            Self::Users => {
                let users = client.list_users().await.context("failed to list users")?;
                print!("{}", output::users(&users));
            }
            Self::ActiveUsers => {
                let users = client
                    .active_users()
                    .await
                    .context("failed to list active users")?;
                print!("{}", output::users(&users));
            }
            Self::User { id } => {
                let user = client
                    .get_user(&UserId::new(id))
                    .await
                    .context("failed to load user")?;
                print!("{}", output::users(std::slice::from_ref(&user)));
            }
            Self::CreateUser(args) => create_user(client, args).await?,
            Self::UpdateUser(args) => update_user(client, args).await?,
            Self::DeleteUser { id, yes } => {
                let id = UserId::new(id);
                if !confirm(&format!("Are you sure you want to delete user {id}?"), yes)? {
                    println!("Aborted.");
                    return Ok(());
                }
                client.delete_user(&id).await.context("failed to delete user")?;
                println!("Deleted user {id}.");
            }
            Self::Documents => {
                let documents = client
                    .all_documents()
                    .await
                    .context("failed to list documents")?;
                print!("{}", output::documents(&documents));
            }
            Self::TeamDocuments => {
                let documents = client
                    .admin_team_documents()
                    .await
                    .context("failed to list team documents")?;
                print!("{}", output::documents(&documents));
            }
            Self::DeleteTeamDocument { id, yes } => {
                let id = DocumentId::new(id);
                if !confirm(
                    &format!("Are you sure you want to delete team document {id}?"),
                    yes,
                )? {
                    println!("Aborted.");
                    return Ok(());
                }
                client
                    .delete_team_document(&id)
                    .await
                    .context("failed to delete team document")?;
                println!("Deleted team document {id}.");
            }
        }

        Ok(())
    }
}

async fn create_user(client: &ApiClient, args: CreateUserArgs) -> anyhow::Result<()> {
    let password = secret_or_prompt(args.password, "Password")?;
    let confirm_password = secret_or_prompt(args.confirm_password, "Confirm password")?;

    let user = NewUser {
        username: args.username,
        email: args.email,
        password,
        first_name: args.first_name,
        last_name: args.last_name,
        roles: roles_for(args.admin),
    };

    let account = client
        .create_user(&user, &confirm_password)
        .await
        .context("failed to create user")?;
    println!("Created user '{}' (id {}).", account.username, account.id);
    Ok(())
}

async fn update_user(client: &ApiClient, args: UpdateUserArgs) -> anyhow::Result<()> {
    let id = UserId::new(args.id);
    let current = client.get_user(&id).await.context("failed to load user")?;

    let mut update = UserUpdate::from(&current);
    if let Some(username) = args.username {
        update.username = username;
    }
    if let Some(email) = args.email {
        update.email = email;
    }
    if let Some(first_name) = args.first_name {
        update.first_name = first_name;
    }
    if let Some(last_name) = args.last_name {
        update.last_name = last_name;
    }
    if let Some(admin) = args.admin {
        update.roles = roles_for(admin);
    }
    if let Some(active) = args.active {
        update.active = active;
    }

    let account = client
        .update_user(&id, &update)
        .await
        .context("failed to update user")?;
    println!("Updated user '{}'.", account.username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_for() {
        assert_eq!(roles_for(false), BTreeSet::from([Role::User]));
        assert_eq!(roles_for(true), BTreeSet::from([Role::User, Role::Admin]));
    }
}
