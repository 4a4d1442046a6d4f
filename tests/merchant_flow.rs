mod common;

use actix_web::{http::StatusCode, test};
use common::TestContext;
use marketplace_backend::entities::{
    MerchantStatus, Role, brand_entity as brands, merchant_entity as merchants,
    product_entity as products, user_entity as users,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};

fn application(email: &str) -> Value {
    json!({
        "name": "Jane Roe",
        "email": email,
        "phoneNumber": "+15550001111",
        "brandName": "Roe Goods",
        "business": "Handmade leather goods"
    })
}

#[actix_web::test]
async fn test_apply_validates_required_fields_in_order() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;

    let cases = [
        (json!({ "email": "a@example.com", "business": "b", "phoneNumber": "1" }),
         "You must enter your name and email."),
        (json!({ "name": "A", "email": "a@example.com", "phoneNumber": "1" }),
         "You must enter a business description."),
        (json!({ "name": "A", "email": "a@example.com", "business": "b" }),
         "You must enter a phone number and an email address."),
    ];

    for (body, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/merchant/add")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["message"], message);
    }

    let count = merchants::Entity::find().all(&ctx.db).await.unwrap().len();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn test_apply_then_duplicate_then_reapply_after_rejection() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("jane@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("+15550001111"));
    assert_eq!(body["merchant"]["status"], "Waiting_Approval");
    assert_eq!(body["merchant"]["isActive"], false);
    let merchant_id = body["merchant"]["id"].as_i64().unwrap();

    let sent = ctx.mailer.sent_to("jane@example.com");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "merchant-application");

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("jane@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "That email address is already in use.");

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/reject/{merchant_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("jane@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_approve_new_applicant_then_complete_signup() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("new@example.com"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let merchant_id = body["merchant"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/approve/{merchant_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let merchant = merchants::Entity::find_by_id(merchant_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(merchant.status, MerchantStatus::Approved);
    assert!(merchant.is_active);
    let brand_id = merchant.brand_id.expect("brand linked to merchant");

    let brand = brands::Entity::find_by_id(brand_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(brand.merchant_id, Some(merchant_id));
    assert_eq!(brand.slug, "roe-goods");

    let user = users::Entity::find()
        .filter(users::Column::Email.eq("new@example.com"))
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, Role::Merchant);
    assert_eq!(user.merchant_id, Some(merchant_id));
    assert!(user.password_hash.is_none());
    let token = user.reset_password_token.clone().expect("signup token");

    let signup = ctx
        .mailer
        .sent_to("new@example.com")
        .into_iter()
        .find(|(name, _)| name == "merchant-signup")
        .expect("signup email sent");
    assert!(signup.1.contains(&format!(
        "https://shop.example.com/merchant-signup/{token}?email=new%40example.com"
    )));

    let req = test::TestRequest::post()
        .uri("/api/merchant/signup/not-the-token")
        .set_json(json!({
            "email": "new@example.com",
            "firstName": "Jane",
            "lastName": "Roe",
            "password": "secret123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri(&format!("/api/merchant/signup/{token}"))
        .set_json(json!({
            "email": "new@example.com",
            "firstName": "Jane",
            "lastName": "Roe",
            "password": "secret123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "new@example.com", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].as_str().unwrap().starts_with("Bearer "));
    assert_eq!(body["user"]["role"], "Merchant");

    // 注册完成后品牌不会重复创建
    let owned = brands::Entity::find()
        .filter(brands::Column::MerchantId.eq(merchant_id))
        .all(&ctx.db)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
}

#[actix_web::test]
async fn test_approve_links_existing_user_and_sends_welcome() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (user_id, _) = ctx.create_user("member@example.com", Role::Member, None).await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("member@example.com"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let merchant_id = body["merchant"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/approve/{merchant_id}"))
        .insert_header(("Authorization", admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let user = users::Entity::find_by_id(user_id).one(&ctx.db).await.unwrap().unwrap();
    assert_eq!(user.role, Role::Merchant);
    assert_eq!(user.merchant_id, Some(merchant_id));
    assert!(user.reset_password_token.is_none());

    let names: Vec<String> = ctx
        .mailer
        .sent_to("member@example.com")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert!(names.contains(&"merchant-welcome".to_string()));
    assert!(!names.contains(&"merchant-signup".to_string()));
}

#[actix_web::test]
async fn test_deactivating_merchant_cascades_to_brand_and_products() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;
    let (user_id, _) = ctx.create_user("seller@example.com", Role::Member, None).await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("seller@example.com"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let merchant_id = body["merchant"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/approve/{merchant_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let merchant = merchants::Entity::find_by_id(merchant_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    let brand_id = merchant.brand_id.unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/brand/{brand_id}/active"))
        .insert_header(("Authorization", admin.clone()))
        .set_json(json!({ "brand": { "isActive": true } }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let seller = ctx.bearer(user_id, Role::Merchant, Some(merchant_id));
    let req = test::TestRequest::post()
        .uri("/api/product/add")
        .insert_header(("Authorization", seller))
        .set_json(json!({
            "sku": "BAG-1",
            "name": "Leather Bag",
            "description": "A sturdy bag",
            "quantity": 5,
            "price": 120.0,
            "brand": 9999
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    // 商家的商品总是挂在自己的品牌下
    assert_eq!(body["product"]["brandId"], brand_id);
    let product_id = body["product"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/{merchant_id}/active"))
        .insert_header(("Authorization", admin))
        .set_json(json!({ "merchant": { "isActive": false } }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let merchant = merchants::Entity::find_by_id(merchant_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!merchant.is_active);
    let brand = brands::Entity::find_by_id(brand_id).one(&ctx.db).await.unwrap().unwrap();
    assert!(!brand.is_active);
    let product = products::Entity::find_by_id(product_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!product.is_active);

    let names: Vec<String> = ctx
        .mailer
        .sent_to("seller@example.com")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert!(names.contains(&"merchant-deactivate-account".to_string()));
}

#[actix_web::test]
async fn test_deleting_brand_resets_its_merchant() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("reset@example.com"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let merchant_id = body["merchant"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/approve/{merchant_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let brand_id = merchants::Entity::find_by_id(merchant_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap()
        .brand_id
        .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/brand/delete/{brand_id}"))
        .insert_header(("Authorization", admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Brand has been deleted successfully!");

    assert!(brands::Entity::find_by_id(brand_id).one(&ctx.db).await.unwrap().is_none());
    let merchant = merchants::Entity::find_by_id(merchant_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(merchant.status, MerchantStatus::WaitingApproval);
    assert!(!merchant.is_active);
    assert!(merchant.brand_id.is_none());
}

#[actix_web::test]
async fn test_merchant_admin_routes_require_admin() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let (_, member) = ctx.create_user("plain@example.com", Role::Member, None).await;

    let req = test::TestRequest::get().uri("/api/merchant").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/merchant")
        .insert_header(("Authorization", member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let req = test::TestRequest::get()
        .uri("/api/merchant")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::try_call_service(&app, req).await;
    let status = match resp {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = ctx.admin().await;
    let req = test::TestRequest::delete()
        .uri("/api/merchant/delete/4242")
        .insert_header(("Authorization", admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "No merchant found.");
}

#[actix_web::test]
async fn test_merchant_list_is_paginated() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/merchant/add")
            .set_json(application(&format!("m{i}@example.com")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/merchant?page=2&limit=2")
        .insert_header(("Authorization", admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["merchants"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["count"], 3);
}

#[actix_web::test]
async fn test_deleting_merchant_keeps_brand_and_user_inactive() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("gone@example.com"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let merchant_id = body["merchant"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/merchant/approve/{merchant_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let brand_id = merchants::Entity::find_by_id(merchant_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap()
        .brand_id
        .unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/brand/{brand_id}/active"))
        .insert_header(("Authorization", admin.clone()))
        .set_json(json!({ "brand": { "isActive": true } }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/product/add")
        .insert_header(("Authorization", admin.clone()))
        .set_json(json!({
            "sku": "WALLET-1",
            "name": "Wallet",
            "description": "Slim wallet",
            "quantity": 3,
            "price": 40.0,
            "brand": brand_id
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let product_id = body["product"]["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/merchant/delete/{merchant_id}"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    assert!(merchants::Entity::find_by_id(merchant_id).one(&ctx.db).await.unwrap().is_none());
    let brand = brands::Entity::find_by_id(brand_id).one(&ctx.db).await.unwrap().unwrap();
    assert!(!brand.is_active);
    let product = products::Entity::find_by_id(product_id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!product.is_active);
    let user = users::Entity::find()
        .filter(users::Column::Email.eq("gone@example.com"))
        .one(&ctx.db)
        .await
        .unwrap();
    assert!(user.is_some());

    // 尚未审核、没有品牌的商家也可以删除
    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("pending@example.com"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let pending_id = body["merchant"]["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/merchant/delete/{pending_id}"))
        .insert_header(("Authorization", admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(merchants::Entity::find_by_id(pending_id).one(&ctx.db).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_huge_page_or_limit_returns_empty_page() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.create_app()).await;
    let admin = ctx.admin().await;

    let req = test::TestRequest::post()
        .uri("/api/merchant/add")
        .set_json(application("paged@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/merchant?page=18446744073709551615&limit=10")
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["merchants"].as_array().unwrap().is_empty());
    assert_eq!(body["count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/merchant?page=3&limit=18446744073709551615")
        .insert_header(("Authorization", admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["merchants"].as_array().unwrap().is_empty());
    assert_eq!(body["totalPages"], 1);

    let req = test::TestRequest::get()
        .uri("/api/product/list?page=18446744073709551615&limit=1")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
