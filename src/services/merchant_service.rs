use crate::entities::{
    MerchantStatus, Role, brand_entity as brands, merchant_entity as merchants,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::external::{MailTemplate, Mailer, merchant_signup_url, send_or_log};
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::{deactivate_merchant_brands, ensure_merchant_brand};
use crate::utils::{generate_reset_token, hash_password, normalize_email, validate_email, validate_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

/// 审核通过后需要发送的通知
enum ApprovalNotice {
    Welcome { name: String },
    Signup { token: String },
}

#[derive(Clone)]
pub struct MerchantService {
    pool: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
    public_url: Option<String>,
}

impl MerchantService {
    pub fn new(pool: DatabaseConnection, mailer: Arc<dyn Mailer>, public_url: Option<String>) -> Self {
        Self {
            pool,
            mailer,
            public_url,
        }
    }

    /// 提交入驻申请（公开接口）
    pub async fn apply(&self, request: MerchantApplyRequest) -> AppResult<MerchantResponse> {
        let (Some(name), Some(email)) = (filled(&request.name), filled(&request.email)) else {
            return Err(AppError::ValidationError(
                "You must enter your name and email.".to_string(),
            ));
        };
        let Some(business) = filled(&request.business) else {
            return Err(AppError::ValidationError(
                "You must enter a business description.".to_string(),
            ));
        };
        let Some(phone_number) = filled(&request.phone_number) else {
            return Err(AppError::ValidationError(
                "You must enter a phone number and an email address.".to_string(),
            ));
        };
        validate_email(email)?;
        let email = normalize_email(email);

        // 被拒绝的申请人可以重新申请
        let existing = merchants::Entity::find()
            .filter(merchants::Column::Email.eq(email.as_str()))
            .filter(merchants::Column::Status.ne(MerchantStatus::Rejected))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::DuplicateError(
                "That email address is already in use.".to_string(),
            ));
        }

        let merchant = merchants::ActiveModel {
            name: Set(Some(name.to_string())),
            email: Set(email.clone()),
            phone_number: Set(phone_number.to_string()),
            brand_name: Set(filled(&request.brand_name).map(str::to_string)),
            business: Set(business.to_string()),
            is_active: Set(false),
            brand_id: Set(None),
            status: Set(MerchantStatus::WaitingApproval),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Merchant application received: id={}", merchant.id);
        send_or_log(self.mailer.as_ref(), &email, MailTemplate::MerchantApplication).await;

        Ok(merchant.into())
    }

    pub async fn search(&self, user: &CurrentUser, term: &str) -> AppResult<Vec<MerchantWithBrand>> {
        user.require_role(&[Role::Admin])?;
        let term = term.trim();

        let rows = merchants::Entity::find()
            .filter(
                Condition::any()
                    .add(merchants::Column::PhoneNumber.contains(term))
                    .add(merchants::Column::Email.contains(term))
                    .add(merchants::Column::Name.contains(term))
                    .add(merchants::Column::BrandName.contains(term))
                    .add(merchants::Column::Status.contains(term)),
            )
            .find_also_related(brands::Entity)
            .order_by_desc(merchants::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(with_brand).collect())
    }

    pub async fn list(
        &self,
        user: &CurrentUser,
        params: &PaginationParams,
    ) -> AppResult<Paginated<MerchantWithBrand>> {
        user.require_role(&[Role::Admin])?;

        let count = merchants::Entity::find().count(&self.pool).await?;
        let rows = merchants::Entity::find()
            .find_also_related(brands::Entity)
            .order_by_desc(merchants::Column::CreatedAt)
            .order_by_desc(merchants::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(with_brand).collect(),
            PageMeta::new(params, count),
        ))
    }

    /// 启用/停用商家；停用时在同一事务内停用其品牌及全部商品
    pub async fn set_active(
        &self,
        user: &CurrentUser,
        merchant_id: i64,
        is_active: bool,
    ) -> AppResult<MerchantResponse> {
        user.require_role(&[Role::Admin])?;

        let txn = self.pool.begin().await?;
        let merchant = find_merchant(&txn, merchant_id).await?;
        let mut model = merchant.into_active_model();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        let merchant = model.update(&txn).await?;
        if !is_active {
            deactivate_merchant_brands(&txn, merchant.id).await?;
        }
        txn.commit().await?;

        log::info!("Merchant {} active set to {}", merchant_id, is_active);
        if !is_active {
            send_or_log(
                self.mailer.as_ref(),
                &merchant.email,
                MailTemplate::MerchantDeactivateAccount,
            )
            .await;
        }

        Ok(merchant.into())
    }

    /// 审核通过：关联或创建商家账号，并确保商家品牌存在
    pub async fn approve(
        &self,
        user: &CurrentUser,
        merchant_id: i64,
        request_host: &str,
    ) -> AppResult<MerchantResponse> {
        user.require_role(&[Role::Admin])?;

        let txn = self.pool.begin().await?;
        let merchant = find_merchant(&txn, merchant_id).await?;
        let mut model = merchant.into_active_model();
        model.status = Set(MerchantStatus::Approved);
        model.is_active = Set(true);
        model.updated_at = Set(Some(Utc::now()));
        let merchant = model.update(&txn).await?;

        let existing_user = users::Entity::find()
            .filter(users::Column::Email.eq(merchant.email.as_str()))
            .one(&txn)
            .await?;

        let notice = match existing_user {
            Some(existing) => {
                let mut user_model = existing.into_active_model();
                user_model.merchant_id = Set(Some(merchant.id));
                user_model.role = Set(Role::Merchant);
                user_model.updated_at = Set(Some(Utc::now()));
                user_model.update(&txn).await?;
                ApprovalNotice::Welcome {
                    name: merchant.name.clone().unwrap_or_default(),
                }
            }
            None => {
                let token = generate_reset_token();
                users::ActiveModel {
                    email: Set(Some(merchant.email.clone())),
                    first_name: Set(merchant.name.clone()),
                    last_name: Set(Some(String::new())),
                    merchant_id: Set(Some(merchant.id)),
                    provider: Set("email".to_string()),
                    role: Set(Role::Merchant),
                    reset_password_token: Set(Some(token.clone())),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                ApprovalNotice::Signup { token }
            }
        };

        let brand = ensure_merchant_brand(&txn, &merchant).await?;
        txn.commit().await?;

        log::info!("Merchant {} approved with brand {}", merchant.id, brand.id);

        let template = match notice {
            ApprovalNotice::Welcome { name } => Some(MailTemplate::MerchantWelcome { name }),
            ApprovalNotice::Signup { token } => {
                let base = self.public_url.as_deref().unwrap_or(request_host);
                match merchant_signup_url(base, &token, &merchant.email) {
                    Ok(signup_url) => Some(MailTemplate::MerchantSignup {
                        signup_url,
                        email: merchant.email.clone(),
                    }),
                    Err(e) => {
                        log::error!("Skipping signup email for merchant {}: {}", merchant.id, e);
                        None
                    }
                }
            }
        };
        if let Some(template) = template {
            send_or_log(self.mailer.as_ref(), &merchant.email, template).await;
        }

        let mut response = MerchantResponse::from(merchant);
        response.brand_id = Some(brand.id);
        Ok(response)
    }

    pub async fn reject(&self, user: &CurrentUser, merchant_id: i64) -> AppResult<MerchantResponse> {
        user.require_role(&[Role::Admin])?;

        let merchant = find_merchant(&self.pool, merchant_id).await?;
        let mut model = merchant.into_active_model();
        model.status = Set(MerchantStatus::Rejected);
        model.updated_at = Set(Some(Utc::now()));
        let merchant = model.update(&self.pool).await?;

        log::info!("Merchant {} rejected", merchant_id);
        Ok(merchant.into())
    }

    /// 商家通过邮件中的令牌设置密码完成注册
    pub async fn complete_signup(
        &self,
        token: &str,
        request: MerchantSignupRequest,
    ) -> AppResult<UserResponse> {
        let Some(email) = filled(&request.email) else {
            return Err(AppError::ValidationError(
                "You must enter an email address.".to_string(),
            ));
        };
        let (Some(first_name), Some(last_name)) =
            (filled(&request.first_name), filled(&request.last_name))
        else {
            return Err(AppError::ValidationError(
                "You must enter your full name.".to_string(),
            ));
        };
        let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) else {
            return Err(AppError::ValidationError(
                "You must enter a password.".to_string(),
            ));
        };
        validate_password(password)?;
        let email = normalize_email(email);

        let txn = self.pool.begin().await?;
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .filter(users::Column::ResetPasswordToken.eq(token))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::AuthError("Your signup link is invalid or has expired.".to_string())
            })?;

        let merchant_id = user.merchant_id;
        let mut model = user.into_active_model();
        model.first_name = Set(Some(first_name.to_string()));
        model.last_name = Set(Some(last_name.to_string()));
        model.password_hash = Set(Some(hash_password(password)?));
        model.reset_password_token = Set(None);
        model.reset_password_expires = Set(None);
        model.updated_at = Set(Some(Utc::now()));
        let user = model.update(&txn).await?;

        let merchant = match merchant_id {
            Some(id) => merchants::Entity::find_by_id(id).one(&txn).await?,
            None => {
                merchants::Entity::find()
                    .filter(merchants::Column::Email.eq(email.as_str()))
                    .filter(merchants::Column::Status.eq(MerchantStatus::Approved))
                    .one(&txn)
                    .await?
            }
        };
        if let Some(merchant) = merchant {
            ensure_merchant_brand(&txn, &merchant).await?;
        }
        txn.commit().await?;

        log::info!("Merchant user {} completed signup", user.id);
        Ok(user.into())
    }

    /// 删除商家：先停用其品牌，品牌与用户记录保留
    pub async fn delete(&self, user: &CurrentUser, merchant_id: i64) -> AppResult<MerchantResponse> {
        user.require_role(&[Role::Admin])?;

        let txn = self.pool.begin().await?;
        let merchant = find_merchant(&txn, merchant_id).await?;
        deactivate_merchant_brands(&txn, merchant.id).await?;
        merchants::Entity::delete_by_id(merchant.id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Merchant deleted: id={}", merchant_id);
        Ok(merchant.into())
    }
}

async fn find_merchant<C: sea_orm::ConnectionTrait>(
    conn: &C,
    merchant_id: i64,
) -> AppResult<merchants::Model> {
    merchants::Entity::find_by_id(merchant_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("No merchant found.".to_string()))
}

fn with_brand((merchant, brand): (merchants::Model, Option<brands::Model>)) -> MerchantWithBrand {
    MerchantWithBrand {
        merchant: merchant.into(),
        brand: brand.map(BrandResponse::from),
    }
}
