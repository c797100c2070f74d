//! Subcommands and their dispatch.

mod admin;
mod auth;
mod documents;
mod output;
mod preview;
mod prompt;

use std::path::PathBuf;

use clap::{Args, Subcommand};
use docshare_client::ApiClient;

pub use self::admin::AdminCommand;
pub use self::preview::PreviewArgs;
use crate::TRACING_TARGET_COMMAND;

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        /// Username or e-mail address.
        #[arg(short, long)]
        username: String,
        /// Password; read from stdin when omitted.
        #[arg(long, env = "DOCSHARE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create a new account.
    Register(RegisterArgs),
    /// Forget the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Show counts and recent documents.
    Dashboard,
    /// List documents you own.
    MyFiles,
    /// List documents shared with the team.
    TeamFiles,
    /// Search documents by name or description.
    Search {
        /// Search terms.
        query: String,
    },
    /// Show the details of a document.
    Show {
        /// Document identifier.
        id: String,
    },
    /// Upload a file.
    Upload(UploadArgs),
    /// Download a document you have access to.
    Download {
        /// Document identifier.
        id: String,
        /// Target path; defaults to the name reported by the server.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Change who a document is shared with.
    Share {
        /// Document identifier.
        id: String,
        /// Comma separated usernames.
        #[arg(long, default_value = "")]
        users: String,
        /// Share with the whole team.
        #[arg(long)]
        team: bool,
    },
    /// Edit the name, description or team visibility of a document.
    Edit(EditArgs),
    /// Delete a document you own.
    Delete {
        /// Document identifier.
        id: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Preview a document in the terminal.
    Preview(PreviewArgs),
    /// Download a document through its public share link.
    SharedDownload {
        /// Share link or bare sharing handle.
        link: String,
        /// Target path; defaults to the name reported by the server.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Administration (requires the admin role).
    #[command(subcommand)]
    Admin(AdminCommand),
}

/// Arguments of `register`.
#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
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
    /// Password; read from stdin when omitted.
    #[arg(long, env = "DOCSHARE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Password confirmation; read from stdin when omitted.
    #[arg(long)]
    pub confirm_password: Option<String>,
}

/// Arguments of `upload`.
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// File to upload.
    pub path: PathBuf,
    /// Display name; defaults to the file name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Description.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Share with the whole team.
    #[arg(long)]
    pub team: bool,
    /// MIME type sent with the file, e.g. `application/pdf`.
    #[arg(long)]
    pub content_type: Option<String>,
}

/// Arguments of `edit`.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Document identifier.
    pub id: String,
    /// New display name.
    #[arg(long)]
    pub name: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New team visibility.
    #[arg(long)]
    pub team: Option<bool>,
}

impl Command {
    /// Short name used in logs.
    fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Dashboard => "dashboard",
            Self::MyFiles => "my-files",
            Self::TeamFiles => "team-files",
            Self::Search { .. } => "search",
            Self::Show { .. } => "show",
            Self::Upload(_) => "upload",
            Self::Download { .. } => "download",
            Self::Share { .. } => "share",
            Self::Edit(_) => "edit",
            Self::Delete { .. } => "delete",
            Self::Preview(_) => "preview",
            Self::SharedDownload { .. } => "shared-download",
            Self::Admin(_) => "admin",
        }
    }

    /// Runs the command against `client`.
    pub async fn execute(self, client: &ApiClient) -> anyhow::Result<()> {
        tracing::debug!(target: TRACING_TARGET_COMMAND, command = self.name(), "Running command");

        match self {
            Self::Login { username, password } => auth::login(client, username, password).await,
            Self::Register(args) => auth::register(client, args).await,
            Self::Logout => auth::logout(client).await,
            Self::Whoami => auth::whoami(client).await,
            Self::Dashboard => documents::dashboard(client).await,
            Self::MyFiles => documents::my_files(client).await,
            Self::TeamFiles => documents::team_files(client).await,
            Self::Search { query } => documents::search(client, &query).await,
            Self::Show { id } => documents::show(client, id).await,
            Self::Upload(args) => documents::upload(client, args).await,
            Self::Download { id, output } => documents::download(client, id, output).await,
            Self::Share { id, users, team } => documents::share(client, id, &users, team).await,
            Self::Edit(args) => documents::edit(client, args).await,
            Self::Delete { id, yes } => documents::delete(client, id, yes).await,
            Self::Preview(args) => preview::preview(client, args).await,
            Self::SharedDownload { link, output } => {
                documents::shared_download(client, &link, output).await
            }
            Self::Admin(command) => command.execute(client).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::Cli;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["docshare"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_delete_with_yes() {
        let Command::Delete { id, yes } = parse(&["delete", "42", "--yes"]) else {
            panic!("expected delete");
        };
        assert_eq!(id, "42");
        assert!(yes);
    }

    #[test]
    fn test_parse_share() {
        let Command::Share { users, team, .. } =
            parse(&["share", "1", "--users", "bob, carol", "--team"])
        else {
            panic!("expected share");
        };
        assert_eq!(users, "bob, carol");
        assert!(team);
    }

    #[test]
    fn test_parse_edit_team_flag() {
        let Command::Edit(args) = parse(&["edit", "9", "--team", "false"]) else {
            panic!("expected edit");
        };
        assert_eq!(args.team, Some(false));
        assert!(args.name.is_none());
    }

    #[test]
    fn test_parse_upload_content_type() {
        let Command::Upload(args) = parse(&["upload", "a.pdf", "--content-type", "application/pdf"])
        else {
            panic!("expected upload");
        };
        assert_eq!(args.content_type.as_deref(), Some("application/pdf"));
        assert!(!args.team);
    }

    #[test]
    fn test_parse_admin_subcommand() {
        let command = parse(&["admin", "delete-user", "7"]);
        assert_eq!(command.name(), "admin");
    }
}
