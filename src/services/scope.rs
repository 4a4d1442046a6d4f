use crate::entities::{Role, brand_entity as brands, product_entity as products};
use crate::middlewares::CurrentUser;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, Condition};

/// 按角色划定可见数据范围：管理员看全部，商家只看自己的品牌与商品
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Merchant(i64),
    Nothing,
}

impl Scope {
    pub fn for_user(user: &CurrentUser) -> Self {
        match (user.role, user.merchant_id) {
            (Role::Admin, _) => Scope::All,
            (Role::Merchant, Some(merchant_id)) => Scope::Merchant(merchant_id),
            _ => Scope::Nothing,
        }
    }

    pub fn brand_condition(&self) -> Condition {
        match self {
            Scope::All => Condition::all(),
            Scope::Merchant(merchant_id) => {
                Condition::all().add(brands::Column::MerchantId.eq(*merchant_id))
            }
            Scope::Nothing => Condition::all().add(Expr::val(1).eq(0)),
        }
    }

    pub fn product_condition(&self) -> Condition {
        match self {
            Scope::All => Condition::all(),
            Scope::Merchant(merchant_id) => Condition::all().add(
                products::Column::BrandId.in_subquery(
                    Query::select()
                        .column(brands::Column::Id)
                        .from(brands::Entity)
                        .and_where(brands::Column::MerchantId.eq(*merchant_id))
                        .to_owned(),
                ),
            ),
            Scope::Nothing => Condition::all().add(Expr::val(1).eq(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, merchant_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: 1,
            role,
            merchant_id,
            email: None,
        }
    }

    #[test]
    fn test_scope_for_user() {
        assert_eq!(Scope::for_user(&user(Role::Admin, None)), Scope::All);
        assert_eq!(
            Scope::for_user(&user(Role::Merchant, Some(4))),
            Scope::Merchant(4)
        );
        assert_eq!(Scope::for_user(&user(Role::Merchant, None)), Scope::Nothing);
        assert_eq!(Scope::for_user(&user(Role::Member, Some(4))), Scope::Nothing);
    }
}
