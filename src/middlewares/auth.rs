use crate::entities::{Role, user_entity as users};
use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::dev::Payload;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, web,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::future::{Ready, ready};

/// 已通过令牌校验的用户ID，由中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub i64);

/// 身份中间件：有 Bearer 令牌时解析并写入用户ID，令牌无效时返回 401；
/// 没有令牌的请求直接放行，由各接口通过 `CurrentUser` 决定是否必须登录
pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        let Some(token) = token else {
            let fut = self.service.call(req);
            return Box::pin(fut);
        };

        let user_id = self
            .jwt_service
            .verify_access_token(token)
            .and_then(|claims| JwtService::user_id(&claims));

        match user_id {
            Ok(user_id) => {
                req.extensions_mut().insert(AuthenticatedUserId(user_id));
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(e) => {
                log::warn!("Rejected bearer token on {}: {}", req.path(), e);
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// 当前登录用户；每次请求都从数据库读取，角色变更立即生效
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
    pub merchant_id: Option<i64>,
    pub email: Option<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 角色不在允许列表中时返回 403
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl From<users::Model> for CurrentUser {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            role: user.role,
            merchant_id: user.merchant_id,
            email: user.email,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req.extensions().get::<AuthenticatedUserId>().copied();
        let db = req.app_data::<web::Data<DatabaseConnection>>().cloned();

        Box::pin(async move {
            let Some(AuthenticatedUserId(user_id)) = user_id else {
                return Err(AppError::AuthError("Missing access token".to_string()));
            };
            let db = db.ok_or_else(|| {
                AppError::InternalError("database connection is not registered".to_string())
            })?;

            let user = users::Entity::find_by_id(user_id)
                .one(db.get_ref())
                .await?
                .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

            Ok(CurrentUser::from(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: 1,
            role,
            merchant_id: None,
            email: Some("a@b.co".to_string()),
        }
    }

    #[test]
    fn test_require_role() {
        assert!(user(Role::Admin).require_role(&[Role::Admin]).is_ok());
        assert!(
            user(Role::Merchant)
                .require_role(&[Role::Admin, Role::Merchant])
                .is_ok()
        );
        assert!(matches!(
            user(Role::Member).require_role(&[Role::Admin]),
            Err(AppError::Forbidden)
        ));
    }
}
