//! Integration tests for the REST client against a stub platform API.

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use shared::client::{ApiClient, ApiError, AuthApi};
use shared::config::ClientConfig;
use shared::models::{
    ForgotPasswordRequest, ListQuery, LoginRequest, News, NewsDraft, ProfileDraft, Recipe,
    RecipeDraft, User, UserDraft,
};
use shared::resource::{FALLBACK_MESSAGE, ResourceApi, ResourceTable};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Authorization header and raw query of every authenticated request.
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<(Option<String>, Option<String>)>>>);

impl Seen {
    fn record(&self, headers: &HeaderMap, query: Option<String>) {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.0.lock().unwrap().push((auth, query));
    }

    fn all(&self) -> Vec<(Option<String>, Option<String>)> {
        self.0.lock().unwrap().clone()
    }
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "admin@example.com" && body["password"] == "Secret1!" {
        (StatusCode::OK, Json(json!({"token": "issued-token"})))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid email or password"})),
        )
    }
}

async fn forgot_password() -> impl IntoResponse {
    "Reset link sent"
}

async fn list_users(
    State(seen): State<Seen>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    seen.record(&headers, query);
    Json(json!({
        "items": [
            {"id": 7, "fullName": "Mai Tran", "email": "mai@example.com", "role": "Staff"}
        ],
        "totalCount": 31
    }))
}

async fn list_news(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.record(&headers, None);
    Json(json!([
        {"id": "n1", "title": "Spring menu", "content": "Asparagus"},
        {"id": "n2", "title": "Holiday hours", "content": "Closed on Monday"}
    ]))
}

async fn delete_news(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    seen.record(&headers, Some(id));
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token has expired"})),
    )
}

async fn update_recipe() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "")
}

async fn create_user() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "type": "https://tools.ietf.org/html/rfc9110#section-15.5.1",
            "title": "Bad Request",
            "status": 400,
            "message": "Email already in use"
        })),
    )
}

async fn get_profile(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Json<Value> {
    seen.record(&headers, Some(id.clone()));
    Json(json!({
        "id": id.parse::<u64>().unwrap_or_default(),
        "fullName": "Mai Tran",
        "email": "mai@example.com",
        "phoneNumber": "0901234567"
    }))
}

async fn update_profile(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.record(&headers, Some(body.to_string()));
    let mut profile = body;
    profile["id"] = json!(id);
    profile["email"] = json!("mai@example.com");
    Json(profile)
}

async fn list_ingredients(
    State(seen): State<Seen>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    seen.record(&headers, query);
    Json(json!([
        {"id": 1, "name": "Jasmine rice", "calories": 130.0, "unit": "g"},
        {"id": 2, "name": "Rice paper", "calories": 33.5}
    ]))
}

async fn spawn_stub() -> (Url, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/Auth/login", post(login))
        .route("/api/identity/forgotPassword", post(forgot_password))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/UserProfile/{id}", get(get_profile).put(update_profile))
        .route("/api/Ingredients", get(list_ingredients))
        .route("/api/news", get(list_news))
        .route("/api/news/{id}", delete(delete_news))
        .route("/api/Recipes/{id}", put(update_recipe))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = Url::parse(&format!("http://{addr}/api")).unwrap();
    (base, seen)
}

fn client(base: &Url, token: Option<&str>) -> ApiClient {
    let mut config = ClientConfig::with_defaults();
    config.api_base_url = base.clone();
    config.request_timeout_secs = 5;
    ApiClient::new(&config)
        .unwrap()
        .with_token(token.map(str::to_string))
}

#[tokio::test]
async fn test_login_returns_token_and_surfaces_server_message() {
    let (base, _) = spawn_stub().await;
    let api = client(&base, None);

    let response = api
        .login(&LoginRequest {
            email: "admin@example.com".to_string(),
            password: "Secret1!".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token, "issued-token");

    let err = api
        .login(&LoginRequest {
            email: "admin@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_forgot_password_accepts_plain_text_reply() {
    let (base, _) = spawn_stub().await;
    let api = client(&base, None);

    let reply = api
        .forgot_password(&ForgotPasswordRequest {
            email: "admin@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply.message.as_deref(), Some("Reset link sent"));
}

#[tokio::test]
async fn test_server_search_sends_bearer_and_query_params() {
    let (base, seen) = spawn_stub().await;
    let api = client(&base, Some("abc"));

    let query = ListQuery::new(5)
        .with_search(Some(" mai ".to_string()))
        .with_page(2);
    let page = ResourceApi::<User>::list(&api, &query).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "7");
    assert_eq!(page.total, 31);

    let requests = seen.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("Bearer abc"));
    assert_eq!(
        requests[0].1.as_deref(),
        Some("search=mai&page=2&pageSize=5")
    );
}

#[tokio::test]
async fn test_client_search_table_filters_the_full_list() {
    let (base, seen) = spawn_stub().await;
    let mut table: ResourceTable<News, _> =
        ResourceTable::new(client(&base, Some("abc")), 10, Duration::from_secs(5));

    table.fetch().await.unwrap();
    table.search(Some("HOLIDAY".to_string())).await.unwrap();

    let visible: Vec<&str> = table.visible().iter().map(|news| news.id.as_str()).collect();
    assert_eq!(visible, vec!["n2"]);
    assert_eq!(table.total(), 1);
    // Client-side search never goes back to the server.
    assert_eq!(seen.all().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_delete_raises_banner_and_keeps_record() {
    let (base, seen) = spawn_stub().await;
    let mut table: ResourceTable<News, _> =
        ResourceTable::new(client(&base, Some("stale")), 10, Duration::from_secs(5));
    table.fetch().await.unwrap();

    let err = table.delete("n1", |_| true).await.unwrap_err();
    assert_eq!(err.user_message(), "Token has expired");
    assert_eq!(table.banner().unwrap().message(), "Token has expired");
    assert!(table.find("n1").is_some());
    assert_eq!(seen.all()[1].1.as_deref(), Some("n1"));

    let _: NewsDraft = table.begin_edit("n1").await.unwrap();
}

#[tokio::test]
async fn test_empty_error_body_falls_back_to_generic_message() {
    let (base, _) = spawn_stub().await;
    let api = client(&base, Some("abc"));

    let draft = RecipeDraft {
        name: "Pho".to_string(),
        description: "Beef noodle soup".to_string(),
        servings: Some(2),
        ..RecipeDraft::default()
    };
    let err = ResourceApi::<Recipe>::update(&api, "3", &draft)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Server { message: None, .. }));
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let (base, seen) = spawn_stub().await;
    let api = client(&base, None);

    let err = ResourceApi::<News>::list(&api, &ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert!(seen.all().is_empty());
}

#[tokio::test]
async fn test_problem_details_body_surfaces_the_message() {
    let (base, _) = spawn_stub().await;
    let api = client(&base, Some("abc"));

    let draft = UserDraft {
        full_name: "Mai Tran".to_string(),
        email: "mai@example.com".to_string(),
        ..UserDraft::default()
    };
    let err = ResourceApi::<User>::create(&api, &draft).await.unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
    assert_eq!(err.user_message(), "Email already in use");
}

#[tokio::test]
async fn test_get_profile_uses_the_user_id_path() {
    let (base, seen) = spawn_stub().await;
    let api = client(&base, Some("abc"));

    let profile = api.get_profile("42").await.unwrap();
    assert_eq!(profile.id, "42");
    assert_eq!(profile.full_name, "Mai Tran");
    assert_eq!(profile.phone_number.as_deref(), Some("0901234567"));

    let requests = seen.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("Bearer abc"));
    assert_eq!(requests[0].1.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_update_profile_puts_the_draft() {
    let (base, seen) = spawn_stub().await;
    let api = client(&base, Some("abc"));

    let draft = ProfileDraft {
        full_name: "Mai T. Tran".to_string(),
        bio: Some("Pastry lead".to_string()),
        ..ProfileDraft::default()
    };
    let profile = api.update_profile("42", &draft).await.unwrap();
    assert_eq!(profile.id, "42");
    assert_eq!(profile.full_name, "Mai T. Tran");
    assert_eq!(profile.bio.as_deref(), Some("Pastry lead"));

    let requests = seen.all();
    assert_eq!(requests[0].0.as_deref(), Some("Bearer abc"));
    let sent: Value = serde_json::from_str(requests[0].1.as_deref().unwrap()).unwrap();
    assert_eq!(sent["fullName"], "Mai T. Tran");
    assert_eq!(sent["bio"], "Pastry lead");
    assert_eq!(sent["phoneNumber"], Value::Null);
}

#[tokio::test]
async fn test_ingredient_lookup_sends_search_only_when_given() {
    let (base, seen) = spawn_stub().await;
    let api = client(&base, Some("abc"));

    let found = api.list_ingredients(Some(" rice ")).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, "1");
    assert_eq!(found[0].unit.as_deref(), Some("g"));
    assert_eq!(found[1].calories, Some(33.5));
    assert_eq!(found[1].unit, None);

    api.list_ingredients(Some("  ")).await.unwrap();
    api.list_ingredients(None).await.unwrap();

    let requests = seen.all();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|(auth, _)| auth.as_deref() == Some("Bearer abc")));
    assert_eq!(requests[0].1.as_deref(), Some("search=rice"));
    assert_eq!(requests[1].1, None);
    assert_eq!(requests[2].1, None);
}
