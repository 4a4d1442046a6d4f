use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines
use std::sync::Arc;

use marketplace_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{LogMailer, MailgunService, Mailer},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::Services,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .context("failed to create database connection pool")?;

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 未启用 Mailgun 时邮件只写日志
    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        Arc::new(MailgunService::new(config.mail.clone()))
    } else {
        log::warn!("Mailgun is disabled, outgoing emails will only be logged");
        Arc::new(LogMailer)
    };

    let services = Services::new(pool, jwt_service.clone(), mailer, &config.app);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .configure(|cfg| services.register(cfg))
            .configure(swagger_config)
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
