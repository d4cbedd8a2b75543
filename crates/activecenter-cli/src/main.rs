use activecenter_cli::seeder;
use activecenter_db::{PgStore, init_db_pool, run_migrations};
use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "activecenter-cli")]
#[command(about = "Active Center CLI - Administrative tools for the club API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Full name of the administrator
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Insert the default club spaces that are not present yet
    SeedSpaces,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    let store = PgStore::new(pool);

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&store, name, email, password).await,
        Commands::SeedSpaces => handle_seed_spaces(&store).await,
    }
}

async fn handle_create_admin(
    store: &PgStore,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::<String>::new().with_prompt("Full name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    match seeder::create_admin(store, &name, &email, &password).await {
        Ok(admin) => {
            println!("\n✅ Administrator created successfully!");
            println!("   Email: {}", admin.email);
            println!("   Name: {}", admin.name);
            Ok(())
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_spaces(store: &PgStore) -> anyhow::Result<()> {
    println!("🌱 Seeding default spaces...");

    match seeder::seed_spaces(store).await {
        Ok(report) => {
            for title in &report.inserted {
                println!("   ✓ {}", title);
            }
            println!(
                "\n✅ Inserted {} spaces, {} already present",
                report.inserted.len(),
                report.skipped.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding spaces: {}", e);
            std::process::exit(1);
        }
    }
}
