use birthday_notify::{
    api::users::UserResponse,
    config::Config,
    database::{self, schema},
    seed,
    services::{bootstrap::SeedOutcome, pagination::Page, users},
};
use clap::{Parser, Subcommand};

// Определяем структуру команд CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Утилита командной строки для администрирования сервиса дней рождения.
/// Позволяет управлять схемой БД, администратором и просматривать пользователей.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Команды для работы со схемой базы данных.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
    /// Команды для учётной записи администратора.
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommand,
    },
    /// Команды для просмотра пользователей.
    Users {
        #[command(subcommand)]
        users_command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Создаёт недостающие таблицы и индексы.
    Migrate,
    /// ПОЛНОСТЬЮ удаляет все таблицы сервиса. Используйте с осторожностью!
    Wipe {
        /// Подтверждение удаления.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Создаёт администратора из переменных ADMIN_USER_*, если его ещё нет.
    Seed,
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// Выводит страницу пользователей в формате JSON.
    List {
        /// Номер страницы, начиная с 1.
        #[arg(short, long)]
        page: Option<i64>,

        /// Размер страницы (не больше 100).
        #[arg(short = 's', long)]
        page_size: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let db = database::connect().await?;

    match cli.command {
        Commands::Db { db_command } => match db_command {
            DbCommand::Migrate => {
                println!("Применяем схему...");
                schema::sync(&db).await?;
                println!("Схема успешно применена.");
            }
            DbCommand::Wipe { yes } => {
                if !yes {
                    return Err("Удаление требует флага --yes".into());
                }
                println!("Удаляем таблицы...");
                schema::drop_all(&db).await?;
                println!("База данных успешно очищена.");
            }
        },
        Commands::Admin { admin_command } => match admin_command {
            AdminCommand::Seed => {
                let config = Config::from_env()?;
                schema::sync(&db).await?;
                match seed::seed_admin_from_env(&db, &config).await? {
                    SeedOutcome::Skipped => {
                        println!("{} не задан, пропускаем.", seed::ADMIN_USER_EMAIL)
                    }
                    SeedOutcome::AlreadyExists(id) => {
                        println!("Администратор уже существует, id = {}.", id)
                    }
                    SeedOutcome::Created(user) => {
                        println!("Создан администратор {} (id = {}).", user.email, user.id)
                    }
                }
            }
        },
        Commands::Users { users_command } => match users_command {
            UsersCommand::List { page, page_size } => {
                let page = Page::new(page, page_size);
                let found = users::list_users(&db, page).await?;
                let view: Vec<UserResponse> = found.into_iter().map(UserResponse::from).collect();
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        },
    }

    Ok(())
}
