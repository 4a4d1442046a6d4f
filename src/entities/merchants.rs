use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 商家审核状态
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum MerchantStatus {
    #[sea_orm(string_value = "Waiting_Approval")]
    #[serde(rename = "Waiting_Approval")]
    WaitingApproval,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl std::fmt::Display for MerchantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MerchantStatus::WaitingApproval => write!(f, "Waiting_Approval"),
            MerchantStatus::Approved => write!(f, "Approved"),
            MerchantStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "merchants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub brand_name: Option<String>,
    pub business: String,
    pub is_active: bool,
    /// 与 brands.merchant_id 双向关联，由应用层在同一事务内维护
    pub brand_id: Option<i64>,
    pub status: MerchantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brands::Entity",
        from = "Column::BrandId",
        to = "super::brands::Column::Id"
    )]
    Brand,
}

impl Related<super::brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
