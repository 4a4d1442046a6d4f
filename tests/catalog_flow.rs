#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use common::TestContext;
use marketplace_backend::entities::{
    Role, category_product_entity as category_products, product_entity as products,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};

fn product(sku: &str, name: &str, price: f64, brand: i64) -> Value {
    json!({
        "sku": sku,
        "name": name,
        "description": format!("{name} description"),
        "quantity": 10,
        "price": price,
        "taxable": true,
        "brand": brand
    })
}

#[actix_web::test]
async fn test_brand_slug_must_be_unique() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let body = json!({ "name": "Acme Tools", "description": "Tools" });
    let (status, created) = post_json!(&app, "/api/brand/add", Some(admin.as_str()), body.clone());
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["brand"]["slug"], "acme-tools");

    let (status, err) = post_json!(&app, "/api/brand/add", Some(admin.as_str()), body);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Slug is already in use.");

    let (status, err) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "No Description" }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "You must enter description & name.");

    let (status, list) = get_json!(&app, "/api/brand/list", None);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["brands"].as_array().unwrap().len(), 1);

    let (status, err) = get_json!(&app, "/api/brand/777", None);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["message"], "Cannot find brand with the id: 777.");
}

#[actix_web::test]
async fn test_product_validation_and_duplicate_sku() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (_, brand) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Acme", "description": "Acme" }),
    );
    let brand_id = brand["brand"]["id"].as_i64().unwrap();

    let cases = [
        (json!({ "name": "X", "description": "d" }), "You must enter sku."),
        (json!({ "sku": "S1", "name": "X" }), "You must enter description & name."),
        (json!({ "sku": "S1", "name": "X", "description": "d" }), "You must enter a quantity."),
        (
            json!({ "sku": "S1", "name": "X", "description": "d", "quantity": 1 }),
            "You must enter a price.",
        ),
    ];
    for (body, message) in cases {
        let (status, err) = post_json!(&app, "/api/product/add", Some(admin.as_str()), body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"]["message"], message);
    }

    let (status, first) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("S1", "Hammer", 9.5, brand_id));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["product"]["slug"], "hammer");

    let (status, err) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("S1", "Other", 3.0, brand_id));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "This sku is already in use.");

    // 由名称生成的 slug 冲突时追加 sku
    let (status, second) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("S2", "Hammer", 11.0, brand_id));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["product"]["slug"], "hammer-s2");

    let second_id = second["product"]["id"].as_i64().unwrap();
    let (status, err) = put_json!(
        &app,
        &format!("/api/product/{second_id}"),
        &admin,
        json!({ "product": { "sku": "S1" } }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Sku or slug is already in use.");
}

#[actix_web::test]
async fn test_members_cannot_manage_products() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (_, member) = ctx.create_user("shopper@example.com", Role::Member, None).await;

    let (status, err) =
        post_json!(&app, "/api/product/add", Some(member.as_str()), product("S9", "Saw", 5.0, 1));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"]["code"], "FORBIDDEN");

    let (status, _) = post_json!(&app, "/api/product/add", None, product("S9", "Saw", 5.0, 1));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_catalogue_filters_sorts_and_rates() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (_, shopper) = ctx.create_user("shopper@example.com", Role::Member, None).await;

    let (_, acme) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Acme", "description": "Acme" }),
    );
    let acme_id = acme["brand"]["id"].as_i64().unwrap();
    let (_, hidden) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Hidden", "description": "Hidden", "isActive": false }),
    );
    let hidden_id = hidden["brand"]["id"].as_i64().unwrap();

    let mut ids = Vec::new();
    for (sku, name, price) in [("A1", "Anvil", 50.0), ("B1", "Bolt", 1.0), ("C1", "Chisel", 12.0)] {
        let (status, body) =
            post_json!(&app, "/api/product/add", Some(admin.as_str()), product(sku, name, price, acme_id));
        assert_eq!(status, StatusCode::OK);
        ids.push(body["product"]["id"].as_i64().unwrap());
    }
    let (status, _) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("H1", "Ghost", 5.0, hidden_id));
    assert_eq!(status, StatusCode::OK);

    // 非启用品牌的商品不出现在目录中
    let (status, page) = get_json!(&app, "/api/product/list", None);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 3);
    assert!(page["products"][0].get("isLiked").is_none());

    let (_, page) = get_json!(&app, "/api/product/list?sortOrder=%7B%22price%22%3A1%7D", None);
    let names: Vec<&str> = page["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Bolt", "Chisel", "Anvil"]);

    let (_, page) = get_json!(&app, "/api/product/list?min=10&max=60", None);
    assert_eq!(page["count"], 2);

    let (status, err) =
        get_json!(&app, "/api/product/list?sortOrder=%7B%22color%22%3A1%7D", None);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Invalid sort order.");

    // 只统计已审核通过的评论
    for rating in [4, 2] {
        let (status, review) = post_json!(
            &app,
            "/api/review/add",
            Some(shopper.as_str()),
            json!({ "product": ids[2], "title": "ok", "rating": rating, "review": "fine" }),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(review["review"]["status"], "Waiting_Approval");
        let review_id = review["review"]["id"].as_i64().unwrap();
        if rating == 4 {
            let req = test::TestRequest::put()
                .uri(&format!("/api/review/approve/{review_id}"))
                .insert_header(("Authorization", admin.clone()))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }
    }

    let (_, page) = get_json!(&app, "/api/product/list?rating=3", Some(shopper.as_str()));
    assert_eq!(page["count"], 1);
    let item = &page["products"][0];
    assert_eq!(item["name"], "Chisel");
    assert_eq!(item["averageRating"], 4.0);
    assert_eq!(item["totalReviews"], 1);
    assert_eq!(item["isLiked"], false);

    let (status, _) = post_json!(
        &app,
        "/api/wishlist",
        Some(shopper.as_str()),
        json!({ "productId": ids[2], "isLiked": true }),
    );
    assert_eq!(status, StatusCode::OK);
    let (_, page) = get_json!(&app, "/api/product/list?rating=3", Some(shopper.as_str()));
    assert_eq!(page["products"][0]["isLiked"], true);

    let (status, reviews) = get_json!(&app, "/api/review/chisel", None);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(reviews["reviews"][0]["rating"], 4);

    let (status, _) = get_json!(&app, "/api/review/no-such-product", None);
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_catalogue_pagination_keeps_first_page_for_small_results() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (_, brand) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Acme", "description": "Acme" }),
    );
    let brand_id = brand["brand"]["id"].as_i64().unwrap();

    for i in 0..3 {
        let (status, _) = post_json!(
            &app,
            "/api/product/add",
            Some(admin.as_str()),
            product(&format!("P{i}"), &format!("Item {i}"), 2.0, brand_id),
        );
        assert_eq!(status, StatusCode::OK);
    }

    let (_, page) = get_json!(&app, "/api/product/list?page=3&limit=5", None);
    assert_eq!(page["currentPage"], 1);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["products"].as_array().unwrap().len(), 3);

    let (_, page) = get_json!(&app, "/api/product/list?page=2&limit=2", None);
    assert_eq!(page["currentPage"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["products"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_category_links_products_and_filters_catalogue() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (_, brand) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Acme", "description": "Acme" }),
    );
    let brand_id = brand["brand"]["id"].as_i64().unwrap();
    let (_, first) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("T1", "Tent", 80.0, brand_id));
    let (_, second) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("L1", "Lamp", 20.0, brand_id));
    let tent_id = first["product"]["id"].as_i64().unwrap();
    let lamp_id = second["product"]["id"].as_i64().unwrap();

    let (status, created) = post_json!(
        &app,
        "/api/category/add",
        Some(admin.as_str()),
        json!({
            "name": "Camping",
            "description": "Outdoor gear",
            "products": [tent_id, 999_999]
        }),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["message"], "Category has been added successfully!");
    let category_id = created["category"]["id"].as_i64().unwrap();
    assert_eq!(created["category"]["products"], json!([tent_id]));

    let (_, page) = get_json!(&app, "/api/product/list?category=camping", None);
    assert_eq!(page["count"], 1);
    assert_eq!(page["products"][0]["name"], "Tent");

    // 未知分类不参与筛选
    let (_, page) = get_json!(&app, "/api/product/list?category=unknown", None);
    assert_eq!(page["count"], 2);

    let (status, updated) = put_json!(
        &app,
        &format!("/api/category/{category_id}"),
        &admin,
        json!({ "category": { "products": [lamp_id] } }),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"]["products"], json!([lamp_id]));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/category/delete/{category_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let links = category_products::Entity::find()
        .filter(category_products::Column::CategoryId.eq(category_id))
        .all(&ctx.db)
        .await
        .unwrap();
    assert!(links.is_empty());

    let (status, err) = get_json!(&app, &format!("/api/category/{category_id}"), None);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["message"], "No Category found.");
}

#[actix_web::test]
async fn test_product_item_hidden_when_brand_inactive() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (_, brand) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Acme", "description": "Acme" }),
    );
    let brand_id = brand["brand"]["id"].as_i64().unwrap();
    post_json!(&app, "/api/product/add", Some(admin.as_str()), product("K1", "Kettle", 30.0, brand_id));

    let (status, item) = get_json!(&app, "/api/product/item/kettle", None);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["product"]["brand"]["slug"], "acme");

    let (status, _) = put_json!(
        &app,
        &format!("/api/brand/{brand_id}/active"),
        &admin,
        json!({ "brand": { "isActive": false } }),
    );
    assert_eq!(status, StatusCode::OK);

    let (status, err) = get_json!(&app, "/api/product/item/kettle", None);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["message"], "No product found.");
}

#[actix_web::test]
async fn test_duplicate_category_slug_is_rejected() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let (status, _) = post_json!(
        &app,
        "/api/category/add",
        Some(admin.as_str()),
        json!({ "name": "Garden Tools", "description": "Rakes and hoes" }),
    );
    assert_eq!(status, StatusCode::OK);

    let (status, err) = post_json!(
        &app,
        "/api/category/add",
        Some(admin.as_str()),
        json!({ "name": "Tools", "slug": "garden-tools", "description": "Duplicate" }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Slug is already in use.");

    let (status, err) = post_json!(
        &app,
        "/api/category/add",
        Some(admin.as_str()),
        json!({ "name": "Garden Tools", "description": "Same name" }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "DUPLICATE_ERROR");

    let (_, all) = get_json!(&app, "/api/category", None);
    assert_eq!(all["categories"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_brand_update_deactivation_cascades_to_products() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (_, brand) = post_json!(
        &app,
        "/api/brand/add",
        Some(admin.as_str()),
        json!({ "name": "Acme", "description": "Acme" }),
    );
    let brand_id = brand["brand"]["id"].as_i64().unwrap();
    let (_, created) =
        post_json!(&app, "/api/product/add", Some(admin.as_str()), product("P1", "Pan", 25.0, brand_id));
    let product_id = created["product"]["id"].as_i64().unwrap();

    let (status, updated) = put_json!(
        &app,
        &format!("/api/brand/{brand_id}"),
        &admin,
        json!({ "brand": { "description": "Cookware", "isActive": false } }),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["brand"]["isActive"], false);
    assert_eq!(updated["brand"]["description"], "Cookware");

    let product = products::Entity::find_by_id(product_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!product.is_active);

    let (_, page) = get_json!(&app, "/api/product/list", None);
    assert_eq!(page["count"], 0);
}
