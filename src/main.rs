use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use storefront::{
    app::{build_router, seed::seed, AppState},
    infrastructure::{
        config::{load_config, Config},
        database::Database,
        logger::Logger,
        migrations::Migrator,
    },
};

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "People, users and product reviews over HTTP")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 执行未应用的迁移
    Migrate,
    /// 撤销最近的迁移
    Rollback {
        #[arg(long, default_value_t = 1)]
        steps: usize,
    },
    /// 列出迁移状态
    Status,
    /// 写入示例数据
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, source) = load_config(cli.config.as_deref()).context("loading configuration")?;
    let _guard = Logger::init(&config.logging);
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let db = Database::connect(&config.database)
        .await
        .with_context(|| format!("connecting to {}", config.database.url))?;
    let migrator = Migrator::builtin();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db.clone(), migrator).await?,
        Command::Migrate => {
            let applied = migrator.run(db.get_pool()).await?;
            info!("Applied {} migration(s): {:?}", applied.len(), applied);
        }
        Command::Rollback { steps } => {
            let reverted = migrator.rollback(db.get_pool(), steps).await?;
            info!("Reverted {} migration(s): {:?}", reverted.len(), reverted);
        }
        Command::Status => {
            for status in migrator.status(db.get_pool()).await? {
                let state = match status.applied_at {
                    Some(at) => format!("up   ({})", at),
                    None => "down".to_string(),
                };
                println!("{:>16}  {:<20} {}", status.version, status.name, state);
            }
        }
        Command::Seed => {
            migrator.run(db.get_pool()).await?;
            seed(&db).await?;
        }
    }

    db.close().await;
    Ok(())
}

async fn serve(config: Config, db: Database, migrator: Migrator) -> anyhow::Result<()> {
    if config.database.auto_migrate {
        migrator.run(db.get_pool()).await.map_err(|e| {
            error!("Failed to migrate database: {}", e);
            e
        })?;
    }

    let app = build_router(AppState::new(db), &config.http);

    let listener = TcpListener::bind(config.http.socket_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 storefront running on http://{}", addr);
    info!("   GET /health       - Health check");
    info!("   GET /people/:id   - Person (XML)");
    info!("   GET /users/:id    - User (JSON)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
