//! End-to-end recipe flows over the full HTTP surface.
//!
//! Covers registration through cascade deletion, photo clean-up, uniform
//! `404` on repeated deletes and optimistic concurrency on updates.

// Harness helpers are shared with suites that use more of them.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use support::{Browser, Harness};

fn recipe_body(title: &str, category_id: &Value) -> Value {
    json!({
        "title": title,
        "description": "Postre clásico",
        "ingredients": "huevos, leche, azúcar",
        "instructions": "Batir y hornear al baño maría",
        "prepTimeMinutes": 30,
        "servings": 4,
        "categoryId": category_id,
    })
}

#[actix_web::test]
async fn registered_author_publishes_a_recipe_until_its_category_goes() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let mut ana = Browser::new();

    let registered = ana
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": "ana", "email": "ana@x.com", "password": "pass1"})),
        )
        .await;
    assert_eq!(registered.status, StatusCode::SEE_OTHER);
    assert_eq!(registered.location.as_deref(), Some("/login"));
    assert_eq!(registered.body["roleName"], "Usuario");
    let ana_id = registered.body["id"].clone();

    let login = ana.login(&app, "ana@x.com", "pass1").await;
    assert_eq!(login.body["role"], "Usuario");
    assert_eq!(login.location.as_deref(), Some("/"));

    let category = ana
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Postres"})),
        )
        .await;
    assert_eq!(category.status, StatusCode::CREATED);
    let category_id = category.body["id"].clone();

    let recipe = ana
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/recipes")
                .set_json(recipe_body("Flan", &category_id)),
        )
        .await;
    assert_eq!(recipe.status, StatusCode::CREATED);
    assert_eq!(recipe.body["authorId"], ana_id);
    assert_eq!(recipe.body["categoryName"], "Postres");
    assert_eq!(recipe.body["authorName"], "ana");
    let recipe_id = recipe.body["id"].clone();

    let listing = ana
        .send(&app, TestRequest::get().uri("/api/v1/recipes?page=1"))
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["items"][0]["title"], "Flan");
    assert_eq!(listing.body["pageSize"], 3);

    let deleted = ana
        .send(
            &app,
            TestRequest::delete().uri(&format!("/api/v1/categories/{category_id}")),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = ana
        .send(
            &app,
            TestRequest::get().uri(&format!("/api/v1/recipes/{recipe_id}")),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let listing = ana
        .send(&app, TestRequest::get().uri("/api/v1/recipes"))
        .await;
    assert_eq!(listing.body["totalItems"], 0);
}

#[actix_web::test]
async fn recipe_photo_is_stored_under_a_generated_name_and_kept_on_edit() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    harness.provision_admin().await;
    let mut cook = Browser::new();
    cook.login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;

    let category = cook
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Postres"})),
        )
        .await;
    let category_id = category.body["id"].clone();

    let mut body = recipe_body("Flan", &category_id);
    body["photo"] = json!({
        "fileName": "../../etc/flan.jpg",
        "contentBase64": STANDARD.encode([0xFF_u8, 0xD8, 0xFF]),
    });
    let created = cook
        .send(
            &app,
            TestRequest::post().uri("/api/v1/recipes").set_json(body),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let photo_url = created.body["photoUrl"]
        .as_str()
        .expect("photo stored")
        .to_owned();
    let file_name = photo_url
        .strip_prefix("/images/")
        .expect("public images prefix");
    assert!(file_name.ends_with(".jpg"));
    assert!(!file_name.contains("flan"));
    assert!(harness.photos_dir.path().join(file_name).exists());

    let recipe_id = created.body["id"].clone();
    let mut edit = recipe_body("Flan casero", &category_id);
    edit["revision"] = created.body["revision"].clone();
    let edited = cook
        .send(
            &app,
            TestRequest::put()
                .uri(&format!("/api/v1/recipes/{recipe_id}"))
                .set_json(edit),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["title"], "Flan casero");
    assert_eq!(edited.body["photoUrl"], photo_url.as_str());
}

fn with_photo(mut body: Value) -> Value {
    body["photo"] = json!({
        "fileName": "foto.jpg",
        "contentBase64": STANDARD.encode([0xFF_u8, 0xD8, 0xFF]),
    });
    body
}

#[actix_web::test]
async fn deleted_recipes_leave_no_photo_files_behind() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    harness.provision_admin().await;
    let mut cook = Browser::new();
    cook.login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;

    let category = cook
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Postres"})),
        )
        .await;
    let category_id = category.body["id"].clone();
    let mut stored = Vec::new();
    let mut recipe_ids = Vec::new();
    for title in ["Flan", "Natillas"] {
        let created = cook
            .send(
                &app,
                TestRequest::post()
                    .uri("/api/v1/recipes")
                    .set_json(with_photo(recipe_body(title, &category_id))),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
        let url = created.body["photoUrl"].as_str().expect("photo stored");
        let file = harness
            .photos_dir
            .path()
            .join(url.strip_prefix("/images/").expect("public images prefix"));
        assert!(file.exists());
        stored.push(file);
        recipe_ids.push(created.body["id"].clone());
    }

    let deleted = cook
        .send(
            &app,
            TestRequest::delete().uri(&format!("/api/v1/recipes/{}", recipe_ids[0])),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(!stored[0].exists());
    assert!(stored[1].exists());

    let cascaded = cook
        .send(
            &app,
            TestRequest::delete().uri(&format!("/api/v1/categories/{category_id}")),
        )
        .await;
    assert_eq!(cascaded.status, StatusCode::NO_CONTENT);
    assert!(!stored[1].exists());
}

#[actix_web::test]
async fn deleting_twice_reports_not_found() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    harness.provision_admin().await;
    let mut admin = Browser::new();
    admin
        .login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;

    let category = admin
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Sopas"})),
        )
        .await;
    let uri = format!("/api/v1/categories/{}", category.body["id"]);

    let first = admin.send(&app, TestRequest::delete().uri(&uri)).await;
    let second = admin.send(&app, TestRequest::delete().uri(&uri)).await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(second.body["code"], "not_found");

    let role = admin
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/roles")
                .set_json(json!({"name": "Chef"})),
        )
        .await;
    let uri = format!("/api/v1/roles/{}", role.body["id"]);
    let first = admin.send(&app, TestRequest::delete().uri(&uri)).await;
    let second = admin.send(&app, TestRequest::delete().uri(&uri)).await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(second.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stale_revision_is_rejected_and_vanished_rows_are_not_found() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    harness.provision_admin().await;
    let mut first = Browser::new();
    first
        .login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;

    let category = first
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Postres"})),
        )
        .await;
    let uri = format!("/api/v1/categories/{}", category.body["id"]);
    let read_revision = category.body["revision"].clone();
    assert_eq!(read_revision, 1);

    let winner = first
        .send(
            &app,
            TestRequest::put()
                .uri(&uri)
                .set_json(json!({"name": "Dulces", "revision": read_revision})),
        )
        .await;
    assert_eq!(winner.status, StatusCode::OK);
    assert_eq!(winner.body["revision"], 2);

    let loser = first
        .send(
            &app,
            TestRequest::put()
                .uri(&uri)
                .set_json(json!({"name": "Postres caseros", "revision": read_revision})),
        )
        .await;
    assert_eq!(loser.status, StatusCode::CONFLICT);
    assert_eq!(loser.body["details"]["code"], "revision_mismatch");

    let current = first.send(&app, TestRequest::get().uri(&uri)).await;
    assert_eq!(current.body["name"], "Dulces");

    first.send(&app, TestRequest::delete().uri(&uri)).await;
    let vanished = first
        .send(
            &app,
            TestRequest::put()
                .uri(&uri)
                .set_json(json!({"name": "Postres", "revision": 2})),
        )
        .await;
    assert_eq!(vanished.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn concurrent_recipe_edits_keep_only_the_first_write() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    harness.provision_admin().await;
    let mut cook = Browser::new();
    cook.login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;
    let mut other = Browser::new();
    other
        .login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;

    let category = cook
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Postres"})),
        )
        .await;
    let category_id = category.body["id"].clone();
    let created = cook
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/recipes")
                .set_json(recipe_body("Flan", &category_id)),
        )
        .await;
    let uri = format!("/api/v1/recipes/{}", created.body["id"]);

    let cook_read = cook.send(&app, TestRequest::get().uri(&uri)).await;
    let other_read = other.send(&app, TestRequest::get().uri(&uri)).await;
    assert_eq!(cook_read.body["revision"], 1);
    assert_eq!(other_read.body["revision"], 1);

    let mut cook_edit = recipe_body("Flan de la abuela", &category_id);
    cook_edit["revision"] = cook_read.body["revision"].clone();
    let mut other_edit = recipe_body("Flan napolitano", &category_id);
    other_edit["revision"] = other_read.body["revision"].clone();

    let winner = cook
        .send(&app, TestRequest::put().uri(&uri).set_json(cook_edit))
        .await;
    assert_eq!(winner.status, StatusCode::OK);
    assert_eq!(winner.body["revision"], 2);
    let loser = other
        .send(&app, TestRequest::put().uri(&uri).set_json(other_edit))
        .await;
    assert_eq!(loser.status, StatusCode::CONFLICT);
    assert_eq!(loser.body["details"]["code"], "revision_mismatch");

    let unversioned = other
        .send(
            &app,
            TestRequest::put()
                .uri(&uri)
                .set_json(recipe_body("Flan sin versión", &category_id)),
        )
        .await;
    assert_eq!(unversioned.status, StatusCode::BAD_REQUEST);
    assert_eq!(unversioned.body["details"]["code"], "invalid_revision");

    let current = cook.send(&app, TestRequest::get().uri(&uri)).await;
    assert_eq!(current.body["title"], "Flan de la abuela");
    assert_eq!(current.body["revision"], 2);
}

#[actix_web::test]
async fn deleting_an_author_removes_their_recipes() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    harness.provision_admin().await;
    let mut admin = Browser::new();
    admin
        .login(&app, support::ADMIN_EMAIL, support::ADMIN_PASSWORD)
        .await;

    let mut ana = Browser::new();
    let registered = ana
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": "ana", "email": "ana@x.com", "password": "pass1"})),
        )
        .await;
    ana.login(&app, "ana@x.com", "pass1").await;
    let category = ana
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"name": "Postres"})),
        )
        .await;
    let recipe = ana
        .send(
            &app,
            TestRequest::post()
                .uri("/api/v1/recipes")
                .set_json(with_photo(recipe_body("Flan", &category.body["id"]))),
        )
        .await;
    assert_eq!(recipe.status, StatusCode::CREATED);
    let photo_file = harness.photos_dir.path().join(
        recipe.body["photoUrl"]
            .as_str()
            .and_then(|url| url.strip_prefix("/images/"))
            .expect("photo stored"),
    );
    assert!(photo_file.exists());

    let removed = admin
        .send(
            &app,
            TestRequest::delete().uri(&format!("/api/v1/users/{}", registered.body["id"])),
        )
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let gone = admin
        .send(
            &app,
            TestRequest::get().uri(&format!("/api/v1/recipes/{}", recipe.body["id"])),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert!(!photo_file.exists());
}
