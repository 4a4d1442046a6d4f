use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Wishlists {
    Table,
    Id,
    ProductId,
    UserId,
    IsLiked,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Addresses {
    Table,
    Id,
    UserId,
    Address,
    City,
    State,
    Country,
    ZipCode,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    Name,
    Email,
    Message,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Carts {
    Table,
    Id,
    UserId,
    CreatedAt,
    UpdatedAt,
}

/// 金额字段均为下单时快照
#[derive(DeriveIden)]
enum CartItems {
    Table,
    Id,
    CartId,
    ProductId,
    Quantity,
    PurchasePrice,
    TotalPrice,
    PriceWithTax,
    TotalTax,
    Status,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CartId,
    UserId,
    Total,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wishlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishlists::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishlists::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(Wishlists::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Wishlists::IsLiked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Wishlists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Wishlists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个用户对同一商品只有一条收藏记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wishlists_user_product_unique")
                    .table(Wishlists::Table)
                    .col(Wishlists::UserId)
                    .col(Wishlists::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Addresses::Address).string().null())
                    .col(ColumnDef::new(Addresses::City).string().null())
                    .col(ColumnDef::new(Addresses::State).string().null())
                    .col(ColumnDef::new(Addresses::Country).string().null())
                    .col(ColumnDef::new(Addresses::ZipCode).string().null())
                    .col(
                        ColumnDef::new(Addresses::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Addresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Addresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::Name).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string().not_null())
                    .col(ColumnDef::new(Contacts::Message).string().not_null())
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Carts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Carts::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Carts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Carts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartItems::CartId).big_integer().not_null())
                    .col(ColumnDef::new(CartItems::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(CartItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(CartItems::PurchasePrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CartItems::TotalPrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CartItems::PriceWithTax)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CartItems::TotalTax)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CartItems::Status)
                            .string_len(32)
                            .not_null()
                            .default("Not_processed"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cart_items_cart_id")
                    .table(CartItems::Table)
                    .col(CartItems::CartId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::CartId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::Total).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CartItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Carts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishlists::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
