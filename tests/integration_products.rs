mod common;

use axum::http::StatusCode;
use common::{ImagePart, TestApp, delete, get, json, multipart};
use serde_json::json;

async fn seed_twelve(app: &TestApp) {
    for i in 0..12 {
        let category = if i % 2 == 0 { "Tennis" } else { "Padel" };
        app.create_product(&format!("Product {:02}", i), category, 10.0 + i as f64, i)
            .await;
    }
}

fn names(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_first_page_defaults() {
    let app = TestApp::new();
    seed_twelve(&app).await;

    let (status, body) = app.send(get("/api/products", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body),
        vec!["Product 00", "Product 01", "Product 02", "Product 03", "Product 04"]
    );
}

#[tokio::test]
async fn test_list_last_partial_page_and_beyond() {
    let app = TestApp::new();
    seed_twelve(&app).await;

    let (status, body) = app.send(get("/api/products?page=3&limit=5", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Product 10", "Product 11"]);

    let (status, body) = app.send(get("/api/products?page=4&limit=5", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_invalid_paging_falls_back_to_defaults() {
    let app = TestApp::new();
    seed_twelve(&app).await;

    let (status, body) = app
        .send(get("/api/products?page=zero&limit=-2", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 5);
    assert_eq!(names(&body)[0], "Product 00");
}

#[tokio::test]
async fn test_empty_catalogue_is_empty_array() {
    let app = TestApp::new();

    let (status, body) = app.send(get("/api/products", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_filters_are_applied() {
    let app = TestApp::new();
    seed_twelve(&app).await;

    let (status, body) = app
        .send(get("/api/products?category=tennis&limit=20", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 6);
    assert!(
        body.as_array()
            .unwrap()
            .iter()
            .all(|p| p["category"] == "Tennis")
    );

    let (_, body) = app
        .send(get("/api/products?minPrice=15&maxPrice=17&limit=20", None))
        .await;
    assert_eq!(names(&body), vec!["Product 05", "Product 06", "Product 07"]);

    let (_, body) = app
        .send(get("/api/products?stock=10&limit=20", None))
        .await;
    assert_eq!(names(&body), vec!["Product 10", "Product 11"]);

    let (_, body) = app
        .send(get("/api/products?name=product%200&limit=20&stock=abc", None))
        .await;
    assert_eq!(names(&body).len(), 10);
}

#[tokio::test]
async fn test_get_by_id_and_not_found() {
    let app = TestApp::new();
    let product = app.create_product("Racket", "Tennis", 89.9, 4).await;

    let (status, body) = app
        .send(get(&format!("/api/products/{}", product.id), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Racket");

    let (status, body) = app
        .send(get(&format!("/api/products/{}", uuid::Uuid::new_v4()), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_get_by_name() {
    let app = TestApp::new();
    app.create_product("Grip Tape", "Tennis", 4.5, 30).await;

    let (status, body) = app
        .send(get("/api/products/by-name?name=Grip%20Tape", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 4.5);

    let (status, _) = app
        .send(get("/api/products/by-name?name=grip%20tape", None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_path_and_query_answer_with_json_errors() {
    let app = TestApp::new();

    let (status, body) = app.send(get("/api/products/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid path parameter")
    );

    let (status, body) = app.send(get("/api/products/by-name", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");
}

#[tokio::test]
async fn test_create_with_image() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let (status, body) = app
        .send(multipart(
            "/api/products",
            Some(&admin.token),
            &[
                ("name", "Shuttlecocks"),
                ("description", "Tube of 12"),
                ("category", "Badminton"),
                ("price", "15.5"),
                ("stock", "40"),
            ],
            Some(ImagePart {
                file_name: "shuttle.png",
                content_type: "image/png",
                content: &[137, 80, 78, 71],
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Shuttlecocks");
    assert_eq!(body["active"], true);

    let image = body["image"].as_str().unwrap();
    let id = body["id"].as_str().unwrap();
    assert_eq!(
        image,
        format!("http://localhost:3000/files/products/{}.png", id)
    );
    assert!(app.upload_dir.join(format!("products/{}.png", id)).exists());
}

#[tokio::test]
async fn test_create_rejects_bad_image_type() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let (status, body) = app
        .send(multipart(
            "/api/products",
            Some(&admin.token),
            &[("name", "Manual"), ("category", "Books"), ("price", "5"), ("stock", "1")],
            Some(ImagePart {
                file_name: "manual.pdf",
                content_type: "application/pdf",
                content: b"%PDF-1.4",
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not allowed"));

    let (_, body) = app.send(get("/api/products", None)).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_rejects_oversized_upload() {
    let app = TestApp::with_max_upload(1024);
    let admin = app.create_admin().await;
    let content = vec![0u8; 2048];

    let (status, _) = app
        .send(multipart(
            "/api/products",
            Some(&admin.token),
            &[("name", "Huge"), ("category", "Misc"), ("price", "1"), ("stock", "1")],
            Some(ImagePart {
                file_name: "huge.png",
                content_type: "image/png",
                content: &content,
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_requires_numeric_price() {
    let app = TestApp::new();
    let admin = app.create_admin().await;

    let (status, body) = app
        .send(multipart(
            "/api/products",
            Some(&admin.token),
            &[("name", "Ball"), ("category", "Football"), ("price", "cheap"), ("stock", "3")],
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "price must be a number");
}

#[tokio::test]
async fn test_create_is_admin_only() {
    let app = TestApp::new();
    let member = app.create_member().await;
    let fields = [("name", "Ball"), ("category", "Football"), ("price", "20"), ("stock", "3")];

    let (status, _) = app
        .send(multipart("/api/products", Some(&member.token), &fields, None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(multipart("/api/products", None, &fields, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_returns_updated_product() {
    let app = TestApp::new();
    let admin = app.create_admin().await;
    let product = app.create_product("Racket", "Tennis", 89.9, 4).await;

    let (status, body) = app
        .send(json(
            "PUT",
            &format!("/api/products/{}", product.id),
            Some(&admin.token),
            json!({ "price": 79.9, "stock": 10 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 79.9);
    assert_eq!(body["stock"], 10);
    assert_eq!(body["name"], "Racket");

    let (status, _) = app
        .send(json(
            "PUT",
            &format!("/api/products/{}", product.id),
            Some(&admin.token),
            json!({ "price": -1.0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_retire_toggles_active() {
    let app = TestApp::new();
    let admin = app.create_admin().await;
    let product = app.create_product("Racket", "Tennis", 89.9, 4).await;
    let uri = format!("/api/products/{}", product.id);

    let (status, body) = app.send(delete(&uri, Some(&admin.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (_, body) = app.send(get("/api/products?active=false", None)).await;
    assert_eq!(names(&body), vec!["Racket"]);

    let (_, body) = app.send(delete(&uri, Some(&admin.token))).await;
    assert_eq!(body["active"], true);

    let (status, _) = app
        .send(delete(
            &format!("/api/products/{}", uuid::Uuid::new_v4()),
            Some(&admin.token),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
