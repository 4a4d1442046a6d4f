#![allow(dead_code, unused_macros)]

use actix_web::{App, web};
use async_trait::async_trait;
use chrono::Utc;
use marketplace_backend::{
    AppResult,
    config::AppConfig,
    entities::{Role, user_entity as users},
    external::{MailTemplate, Mailer},
    handlers,
    middlewares::AuthMiddleware,
    services::Services,
    utils::{JwtService, hash_password},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::sync::{Arc, Mutex};

/// 发送 JSON 请求并返回 (状态码, 响应体)
macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service($app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $auth:expr, $body:expr $(,)?) => {{
        let mut req = actix_web::test::TestRequest::post().uri($uri).set_json($body);
        let auth: Option<&str> = $auth;
        if let Some(auth) = auth {
            req = req.insert_header(("Authorization", auth.to_string()));
        }
        call_json!($app, req)
    }};
}

macro_rules! put_json {
    ($app:expr, $uri:expr, $auth:expr, $body:expr $(,)?) => {{
        let req = actix_web::test::TestRequest::put()
            .uri($uri)
            .insert_header(("Authorization", $auth.to_string()))
            .set_json($body);
        call_json!($app, req)
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr, $auth:expr $(,)?) => {{
        let mut req = actix_web::test::TestRequest::get().uri($uri);
        let auth: Option<&str> = $auth;
        if let Some(auth) = auth {
            req = req.insert_header(("Authorization", auth.to_string()));
        }
        call_json!($app, req)
    }};
}

pub const JWT_SECRET: &str = "integration-test-secret";

/// 记录所有发出的邮件：(收件人, 模板名, 正文)
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, to: &str) -> Vec<(String, String)> {
        self.sent()
            .into_iter()
            .filter(|(recipient, _, _)| recipient == to)
            .map(|(_, name, body)| (name, body))
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, template: &MailTemplate) -> AppResult<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((to.to_string(), template.name().to_string(), template.text()));
        }
        Ok(())
    }
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub jwt: JwtService,
    pub mailer: Arc<RecordingMailer>,
    pub services: Services,
}

impl TestContext {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("connect to in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");

        let jwt = JwtService::new(JWT_SECRET, 3600);
        let mailer = Arc::new(RecordingMailer::default());
        let app_config = AppConfig {
            public_url: Some("https://shop.example.com".to_string()),
            tax_rate: 0.05,
        };
        let services = Services::new(db.clone(), jwt.clone(), mailer.clone(), &app_config);

        Self {
            db,
            jwt,
            mailer,
            services,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let services = self.services.clone();
        App::new()
            .wrap(AuthMiddleware::new(self.jwt.clone()))
            .configure(move |cfg| services.register(cfg))
            .service(web::scope("/api").configure(handlers::api_config))
    }

    /// 直接写库创建用户，返回 (id, Authorization 头)
    pub async fn create_user(&self, email: &str, role: Role, merchant_id: Option<i64>) -> (i64, String) {
        let user = users::ActiveModel {
            email: Set(Some(email.to_string())),
            first_name: Set(Some("Test".to_string())),
            last_name: Set(Some("User".to_string())),
            password_hash: Set(Some(hash_password("secret123").expect("hash password"))),
            merchant_id: Set(merchant_id),
            provider: Set("email".to_string()),
            role: Set(role),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert user");

        (user.id, self.bearer(user.id, role, merchant_id))
    }

    pub fn bearer(&self, user_id: i64, role: Role, merchant_id: Option<i64>) -> String {
        let token = self
            .jwt
            .generate_access_token(user_id, role, merchant_id)
            .expect("sign token");
        format!("Bearer {token}")
    }

    pub async fn admin(&self) -> String {
        self.create_user("admin@example.com", Role::Admin, None).await.1
    }
}
