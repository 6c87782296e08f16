//! Smoke tests for the movie catalog and review flows.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use flix::api::AppState;
use flix::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    state: Arc<AppState>,
    router: Router,
    images_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.images_dir);
    }
}

async fn spawn_app() -> TestApp {
    let images_dir =
        std::env::temp_dir().join(format!("flix-smoke-images-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&images_dir).unwrap();
    for name in ["x.jpg", "poster.png"] {
        std::fs::write(images_dir.join(name), b"image").unwrap();
    }

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.assets.images_path = images_dir.display().to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = flix::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    let router = flix::api::router(state.clone());

    TestApp {
        state,
        router,
        images_dir,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, json)
    }

    async fn sign_up(&self, username: &str) -> String {
        let (status, headers, _) = self
            .send(
                "POST",
                "/users",
                None,
                Some(json!({
                    "name": username,
                    "email": format!("{username}@example.com"),
                    "username": username,
                    "password": "secret123",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
            .expect("signup should set a session cookie")
    }

    async fn sign_up_admin(&self) -> String {
        let cookie = self.sign_up("admin").await;
        self.state.users().set_admin("admin", true).await.unwrap();
        cookie
    }

    /// Creates a movie as admin and returns its id.
    async fn create_movie(&self, admin: &str, movie: Value) -> i64 {
        let (status, headers, body) = self.send("POST", "/movies", Some(admin), Some(movie)).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "create failed: {body}");
        location(&headers)
            .trim_start_matches("/movies/")
            .parse()
            .unwrap()
    }
}

fn location(headers: &HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn movie_json(title: &str, director: &str, total_gross: Value) -> Value {
    json!({
        "title": title,
        "director": director,
        "description": "A film.",
        "released_on": "2000-01-01",
        "duration": 100,
        "rating": "G",
        "total_gross": total_gross,
        "image_file_name": "x.jpg",
    })
}

fn upcoming_movie_json(title: &str) -> Value {
    let released_on = (Utc::now().date_naive() + Duration::days(30))
        .format("%Y-%m-%d")
        .to_string();
    json!({
        "title": title,
        "director": "Someone",
        "released_on": released_on,
        "duration": 120,
        "rating": "PG-13",
        "total_gross": 0,
        "image_file_name": "poster.png",
    })
}

#[tokio::test]
async fn test_admin_creates_movie_end_to_end() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;

    let (status, headers, body) = app
        .send(
            "POST",
            "/movies",
            Some(&admin),
            Some(movie_json("X", "Y", json!(300_000_000))),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER, "{body}");
    assert_eq!(body["notice"], "Movie successfully created!");

    let (status, _, body) = app.send("GET", location(&headers), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let movie = &body["data"]["movie"];
    assert_eq!(movie["title"], "X");
    assert_eq!(movie["rating"], "G");
    assert_eq!(movie["image_url"], "/images/x.jpg");
    assert_eq!(movie["flop"], false);
    assert_eq!(movie["hit"], true);
    assert_eq!(body["data"]["average_rating"], 0.0);

    let id = app
        .create_movie(&admin, movie_json("X", "Z", json!(1)))
        .await;
    let (_, _, body) = app.send("GET", &format!("/movies/{id}"), None, None).await;
    assert_eq!(body["data"]["movie"]["flop"], true);
}

#[tokio::test]
async fn test_movie_mutations_require_admin() {
    let app = spawn_app().await;

    let (status, headers, _) = app
        .send("POST", "/movies", None, Some(movie_json("X", "Y", json!(1))))
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/signin");

    let viewer = app.sign_up("viewer").await;
    let (status, headers, body) = app
        .send(
            "POST",
            "/movies",
            Some(&viewer),
            Some(movie_json("X", "Y", json!(1))),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
    assert_eq!(body["alert"], "Unauthorized access!");

    let (status, headers, _) = app.send("GET", "/movies/new", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");

    let (_, _, body) = app.send("GET", "/movies", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_movie_validation_failures_persist_nothing() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;

    let mut unreleased = upcoming_movie_json("Soon");
    unreleased["total_gross"] = json!(5);
    let (status, _, body) = app
        .send("POST", "/movies", Some(&admin), Some(unreleased))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["total_gross"], "must be 0 for unreleased movies");
    assert_eq!(body["form"]["title"], "Soon");

    let (status, _, body) = app
        .send(
            "POST",
            "/movies",
            Some(&admin),
            Some(movie_json("X", "Y", json!(-1))),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["total_gross"],
        "must be greater than or equal to 0"
    );

    let mut missing_image = movie_json("X", "Y", json!(1));
    missing_image["image_file_name"] = json!("missing.jpg");
    let (status, _, body) = app
        .send("POST", "/movies", Some(&admin), Some(missing_image))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["image_file_name"],
        "must reference an existing image"
    );

    let (status, _, body) = app
        .send("POST", "/movies", Some(&admin), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    for field in ["title", "director", "released_on", "duration"] {
        assert_eq!(body["errors"][field], "can't be blank", "field {field}");
    }

    let (_, _, body) = app.send("GET", "/movies?filter=upcoming", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    let (_, _, body) = app.send("GET", "/", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_title_is_unique_per_director() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;

    let id = app
        .create_movie(&admin, movie_json("Heat", "Mann", json!(1)))
        .await;
    app.create_movie(&admin, movie_json("Heat", "Someone Else", json!(1)))
        .await;

    let (status, _, body) = app
        .send(
            "POST",
            "/movies",
            Some(&admin),
            Some(movie_json("Heat", "Mann", json!(1))),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["title"], "has already been taken");

    // Saving a movie under its own title is not a clash.
    let (status, headers, body) = app
        .send(
            "PATCH",
            &format!("/movies/{id}"),
            Some(&admin),
            Some(movie_json("Heat", "Mann", json!(250_000_000))),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER, "{body}");
    assert_eq!(location(&headers), format!("/movies/{id}"));
    assert_eq!(body["notice"], "Movie successfully updated!");
}

#[tokio::test]
async fn test_edit_form_is_prefilled() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;
    let id = app
        .create_movie(&admin, movie_json("Heat", "Mann", json!(1)))
        .await;

    let (status, _, body) = app
        .send("GET", &format!("/movies/{id}/edit"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["form"]["title"], "Heat");
    assert_eq!(body["data"]["form"]["released_on"], "2000-01-01");
    assert!(
        body["data"]["ratings"]
            .as_array()
            .unwrap()
            .contains(&json!("NC-17"))
    );
}

#[tokio::test]
async fn test_reviews_and_average_rating() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;
    let id = app
        .create_movie(&admin, movie_json("Heat", "Mann", json!(1)))
        .await;

    for (name, stars) in [("Roger", json!(3)), ("Gene", json!("5"))] {
        let (status, headers, body) = app
            .send(
                "POST",
                &format!("/movies/{id}/reviews"),
                None,
                Some(json!({ "name": name, "comment": "Loved it", "stars": stars })),
            )
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), format!("/movies/{id}/reviews"));
        assert_eq!(body["notice"], "Thanks for your review!");
    }

    let (status, _, body) = app
        .send("GET", &format!("/movies/{id}/reviews"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["review_count"], 2);
    assert_eq!(body["data"]["average_rating"], 4.0);
    assert_eq!(body["data"]["reviews"][0]["name"], "Gene");

    let (status, _, body) = app
        .send(
            "POST",
            &format!("/movies/{id}/reviews"),
            None,
            Some(json!({ "name": "", "comment": "meh", "stars": 6 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"], "can't be blank");
    assert_eq!(
        body["errors"]["comment"],
        "is too short (minimum is 4 characters)"
    );
    assert_eq!(body["errors"]["stars"], "must be between 1 and 5");
    assert_eq!(body["form"]["comment"], "meh");

    let (status, _, body) = app
        .send("GET", &format!("/movies/{id}/reviews/new"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movie"]["title"], "Heat");
}

#[tokio::test]
async fn test_reviews_for_unknown_movie_are_not_found() {
    let app = spawn_app().await;

    let (status, _, _) = app.send("GET", "/movies/999/reviews", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app
        .send(
            "POST",
            "/movies/999/reviews",
            None,
            Some(json!({ "name": "Roger", "comment": "Loved it", "stars": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app.send("GET", "/movies/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_movie_removes_its_reviews() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;
    let id = app
        .create_movie(&admin, movie_json("Heat", "Mann", json!(1)))
        .await;

    let (status, _, _) = app
        .send(
            "POST",
            &format!("/movies/{id}/reviews"),
            None,
            Some(json!({ "name": "Roger", "comment": "Loved it", "stars": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let movie_id = i32::try_from(id).unwrap();
    assert_eq!(
        app.state.store().get_reviews_for_movie(movie_id).await.unwrap().len(),
        1
    );

    let (status, headers, body) = app
        .send("DELETE", &format!("/movies/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/movies");
    assert_eq!(body["notice"], "Movie successfully deleted!");

    assert_eq!(
        app.state.store().get_reviews_for_movie(movie_id).await.unwrap().len(),
        0
    );
    let (status, _, _) = app.send("GET", &format!("/movies/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_filters() {
    let app = spawn_app().await;
    let admin = app.sign_up_admin().await;

    app.create_movie(&admin, movie_json("Hit", "A", json!(400_000_000)))
        .await;
    app.create_movie(&admin, movie_json("Flop", "B", json!(10)))
        .await;
    app.create_movie(&admin, upcoming_movie_json("Soon")).await;

    let titles = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, _, body) = app.send("GET", "/", None, None).await;
    let released = titles(&body);
    assert_eq!(released.len(), 2);
    assert!(!released.contains(&"Soon".to_string()));

    let (_, _, body) = app.send("GET", "/movies?filter=upcoming", None, None).await;
    assert_eq!(titles(&body), vec!["Soon"]);

    let (_, _, body) = app.send("GET", "/movies?filter=hits", None, None).await;
    assert_eq!(titles(&body), vec!["Hit"]);

    let (_, _, body) = app.send("GET", "/movies?filter=flops", None, None).await;
    assert_eq!(titles(&body), vec!["Flop"]);

    let (status, _, _) = app.send("GET", "/movies?filter=bogus", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_images_are_served() {
    let app = spawn_app().await;

    let request = Request::builder()
        .uri("/images/x.jpg")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"image");
}

#[tokio::test]
async fn test_unusable_movie_ids_are_not_found() {
    let app = spawn_app().await;

    for uri in [
        "/movies/0",
        "/movies/-4",
        "/movies/abc",
        "/movies/0/reviews",
        "/movies/abc/reviews/new",
    ] {
        let (status, _, body) = app.send("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
        assert_eq!(body["success"], false, "uri {uri}");
    }

    let (status, _, _) = app
        .send(
            "POST",
            "/movies/abc/reviews",
            None,
            Some(json!({ "name": "Roger", "comment": "Loved it", "stars": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let admin = app.sign_up_admin().await;
    let (status, _, _) = app.send("DELETE", "/movies/abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
