//! Operator commands run against the portal database.

use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

use guidebook_core::config::Config;
use guidebook_core::tracing::init_tracing;
use guidebook_domain::phone::PhoneNumber;
use guidebook_portal::config::PortalConfig;
use guidebook_portal::domain::repository::UserRepository;
use guidebook_portal::domain::types::NewUser;
use guidebook_portal::infra::db::{
    DbCategoryRepository, DbGuideRepository, DbTagRepository, DbUserRepository,
};
use guidebook_portal::infra::gemini::GeminiClient;
use guidebook_portal::password::hash_password;
use guidebook_portal::usecase::seed::{SeedGuideInput, SeedGuideUseCase};
use guidebook_portal_migration::Migrator;

#[derive(Parser)]
#[command(name = "portal-admin", about = "Guidebook portal operator tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a paid admin account.
    CreateAdmin {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Grant admin rights to an existing account.
    Promote {
        #[arg(long)]
        phone: String,
    },
    /// Draft published guides with the text generator.
    Seed {
        /// Category name, created when missing.
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Tag name, created when missing. Repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,sqlx=warn");
    let cli = Cli::parse();
    let config = PortalConfig::try_from_env()?;

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    let users = DbUserRepository { db: &db };

    match cli.command {
        Command::CreateAdmin {
            phone,
            username,
            password,
        } => {
            let phone = PhoneNumber::parse(&phone)?;
            let user = NewUser {
                phone: phone.as_str().to_owned(),
                username,
                password_hash: hash_password(&password)?,
            };
            let created = users.insert(&user, true, true).await?;
            tracing::info!(user_id = created.id, phone = %created.phone, "created admin");
        }
        Command::Promote { phone } => {
            if !users.promote_admin(&phone).await? {
                anyhow::bail!("no account with phone {phone}");
            }
            tracing::info!(phone = %phone, "promoted to admin");
        }
        Command::Seed {
            category,
            description,
            tags,
            count,
        } => {
            let usecase = SeedGuideUseCase {
                categories: DbCategoryRepository { db: &db },
                tags: DbTagRepository { db: &db },
                guides: DbGuideRepository { db: &db },
                ai: GeminiClient::from_config(&config),
            };
            for _ in 0..count {
                usecase
                    .execute(SeedGuideInput {
                        category: category.clone(),
                        category_description: description.clone(),
                        tags: tags.clone(),
                    })
                    .await?;
            }
        }
    }
    Ok(())
}
