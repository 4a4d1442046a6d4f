use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PhoneNumber,
    FirstName,
    LastName,
    PasswordHash,
    MerchantId,
    Provider,
    Avatar,
    Role,
    ResetPasswordToken,
    ResetPasswordExpires,
    CreatedAt,
    UpdatedAt,
}

/// 商家申请记录；brand_id 与 brands.merchant_id 由应用层双向维护
#[derive(DeriveIden)]
enum Merchants {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    BrandName,
    Business,
    IsActive,
    BrandId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Id,
    Name,
    Slug,
    Description,
    IsActive,
    MerchantId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CategoryProducts {
    Table,
    Id,
    CategoryId,
    ProductId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Sku,
    Name,
    Slug,
    ImageUrl,
    ImageKey,
    Description,
    Quantity,
    Price,
    Taxable,
    IsActive,
    BrandId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    ProductId,
    UserId,
    Title,
    Rating,
    Review,
    IsRecommended,
    Status,
    CreatedAt,
    UpdatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn updated_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).timestamp_with_time_zone().null().to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut id_col(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::PhoneNumber).string().null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(ColumnDef::new(Users::MerchantId).big_integer().null())
                    .col(
                        ColumnDef::new(Users::Provider)
                            .string_len(32)
                            .not_null()
                            .default("email"),
                    )
                    .col(ColumnDef::new(Users::Avatar).string().null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(32)
                            .not_null()
                            .default("Member"),
                    )
                    .col(ColumnDef::new(Users::ResetPasswordToken).string().null())
                    .col(
                        ColumnDef::new(Users::ResetPasswordExpires)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(&mut created_col(Users::CreatedAt))
                    .col(&mut updated_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Merchants::Table)
                    .if_not_exists()
                    .col(&mut id_col(Merchants::Id))
                    .col(ColumnDef::new(Merchants::Name).string().null())
                    .col(ColumnDef::new(Merchants::Email).string().not_null())
                    .col(ColumnDef::new(Merchants::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Merchants::BrandName).string().null())
                    .col(ColumnDef::new(Merchants::Business).string().not_null())
                    .col(
                        ColumnDef::new(Merchants::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Merchants::BrandId).big_integer().null())
                    .col(
                        ColumnDef::new(Merchants::Status)
                            .string_len(32)
                            .not_null()
                            .default("Waiting_Approval"),
                    )
                    .col(&mut created_col(Merchants::CreatedAt))
                    .col(&mut updated_col(Merchants::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_merchants_email")
                    .table(Merchants::Table)
                    .col(Merchants::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .if_not_exists()
                    .col(&mut id_col(Brands::Id))
                    .col(ColumnDef::new(Brands::Name).string().null())
                    .col(ColumnDef::new(Brands::Slug).string().not_null())
                    .col(ColumnDef::new(Brands::Description).string().null())
                    .col(
                        ColumnDef::new(Brands::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Brands::MerchantId).big_integer().null())
                    .col(&mut created_col(Brands::CreatedAt))
                    .col(&mut updated_col(Brands::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_brands_slug_unique")
                    .table(Brands::Table)
                    .col(Brands::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(&mut id_col(Categories::Id))
                    .col(ColumnDef::new(Categories::Name).string().null())
                    .col(ColumnDef::new(Categories::Slug).string().not_null())
                    .col(ColumnDef::new(Categories::Description).string().null())
                    .col(
                        ColumnDef::new(Categories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut created_col(Categories::CreatedAt))
                    .col(&mut updated_col(Categories::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_categories_slug_unique")
                    .table(Categories::Table)
                    .col(Categories::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(&mut id_col(Products::Id))
                    .col(ColumnDef::new(Products::Sku).string().not_null())
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Slug).string().not_null())
                    .col(ColumnDef::new(Products::ImageUrl).string().null())
                    .col(ColumnDef::new(Products::ImageKey).string().null())
                    .col(ColumnDef::new(Products::Description).string().null())
                    .col(
                        ColumnDef::new(Products::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::Price).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Products::Taxable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Products::BrandId).big_integer().null())
                    .col(&mut created_col(Products::CreatedAt))
                    .col(&mut updated_col(Products::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_sku_unique")
                    .table(Products::Table)
                    .col(Products::Sku)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_slug_unique")
                    .table(Products::Table)
                    .col(Products::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_brand_id")
                    .table(Products::Table)
                    .col(Products::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryProducts::Table)
                    .if_not_exists()
                    .col(&mut id_col(CategoryProducts::Id))
                    .col(
                        ColumnDef::new(CategoryProducts::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CategoryProducts::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_category_products_unique")
                    .table(CategoryProducts::Table)
                    .col(CategoryProducts::CategoryId)
                    .col(CategoryProducts::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(&mut id_col(Reviews::Id))
                    .col(ColumnDef::new(Reviews::ProductId).big_integer().null())
                    .col(ColumnDef::new(Reviews::UserId).big_integer().null())
                    .col(ColumnDef::new(Reviews::Title).string().null())
                    .col(
                        ColumnDef::new(Reviews::Rating)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Reviews::Review).string().null())
                    .col(
                        ColumnDef::new(Reviews::IsRecommended)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Reviews::Status)
                            .string_len(32)
                            .not_null()
                            .default("Waiting_Approval"),
                    )
                    .col(&mut created_col(Reviews::CreatedAt))
                    .col(&mut updated_col(Reviews::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reviews_product_id")
                    .table(Reviews::Table)
                    .col(Reviews::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(CategoryProducts::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Brands::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Merchants::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
