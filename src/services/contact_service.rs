use crate::entities::contact_entity as contacts;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{normalize_email, validate_email};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

#[derive(Clone)]
pub struct ContactService {
    pool: DatabaseConnection,
}

impl ContactService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 公开的联系表单
    pub async fn add_contact(&self, request: ContactRequest) -> AppResult<ContactResponse> {
        let Some(name) = filled(&request.name) else {
            return Err(AppError::ValidationError("You must enter your name.".to_string()));
        };
        let Some(email) = filled(&request.email) else {
            return Err(AppError::ValidationError(
                "You must enter an email address.".to_string(),
            ));
        };
        let Some(message) = filled(&request.message) else {
            return Err(AppError::ValidationError("You must enter a message.".to_string()));
        };
        validate_email(email)?;

        let contact = contacts::ActiveModel {
            name: Set(name.to_string()),
            email: Set(normalize_email(email)),
            message: Set(message.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Contact message received: id={}", contact.id);
        Ok(contact.into())
    }
}
