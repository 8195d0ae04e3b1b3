//! Command line dashboard for the store's user accounts.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use client::{AuthenticatedClient, ClientError, Config, UserDirectory};
use types::auth::Credentials;
use types::user::{CreateUser, UpdateUser, UserId};
use url::Url;

mod views;

#[derive(Parser, Debug)]
#[command(name = "admin")]
#[command(about = "Manage store users from the terminal", long_about = None)]
struct Cli {
    /// TOML file layered over the built-in settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// List users, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show a single user
    Show { id: UserId },
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        avatar: Url,
    },
    /// Change some fields of a user
    Update {
        id: UserId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        avatar: Option<Url>,
    },
    /// Delete a user
    Delete { id: UserId },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", views::error(&error));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).map_err(|error| anyhow!(error.message))?;
    client::init_tracing(&config.log_filter);

    let client = client::connect(&config)
        .await
        .map_err(|error| anyhow!(error.message))?;

    if !matches!(cli.command, Command::Login { .. }) {
        require_session(&client).await?;
    }

    match cli.command {
        Command::Login { email, password } => {
            login(&client, Credentials::new(email, password)).await?;
        }
        Command::Logout => {
            client.logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => println!("{}", views::profile(&client.profile().await?)),
        Command::Users(command) => users(client, command).await?,
    }

    Ok(())
}

async fn login(client: &AuthenticatedClient, credentials: Credentials) -> Result<()> {
    if client.session().is_authenticated().await {
        match client.session().user().await {
            Some(user) => println!("Already signed in as {} <{}>.", user.name, user.email),
            None => println!("Already signed in."),
        }
        return Ok(());
    }

    let profile = client.login(&credentials).await?;
    println!("Signed in as {} <{}>.", profile.name, profile.email);
    Ok(())
}

/// Everything but `login` needs a stored session.
async fn require_session(client: &AuthenticatedClient) -> Result<(), ClientError> {
    if client.session().is_authenticated().await {
        Ok(())
    } else {
        Err(ClientError::NotSignedIn)
    }
}

async fn users(client: AuthenticatedClient, command: UsersCommand) -> Result<()> {
    let directory = UserDirectory::new(client);

    match command {
        UsersCommand::List { page } => {
            let page = directory.page(page).await?;
            println!("{}", views::users_table(&page));
        }
        UsersCommand::Show { id } => {
            let user = directory.client().get_user(id).await?;
            println!("{}", views::user(&user));
        }
        UsersCommand::Create {
            name,
            email,
            password,
            avatar,
        } => {
            let input = CreateUser {
                name,
                email,
                password: password.into(),
                avatar,
            };
            let user = directory.create(&input).await?;
            println!("Created user {}.", user.id);
        }
        UsersCommand::Update {
            id,
            name,
            email,
            password,
            avatar,
        } => {
            let input = UpdateUser {
                name,
                email,
                password: password.map(Into::into),
                avatar,
            };
            let user = directory.update(id, &input).await?;
            println!("Updated user {}.", user.id);
        }
        UsersCommand::Delete { id } => {
            directory.delete(id).await?;
            println!("Deleted user {id}.");
        }
    }

    Ok(())
}
