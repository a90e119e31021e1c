use super::*;

fn credentials(username: &str, password: &str) -> Option<Value> {
    Some(json!({ "username": username, "password": password }))
}

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let app = test_app().await;
    let user = register(&app, "alice").await;
    assert!(user.cookie.starts_with("session="));

    let response = send(&app, request("GET", "/auth/me", Some(&user.cookie), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["user"]["username"], "alice");
    assert_eq!(response.json()["user"]["id"].as_i64(), Some(user.id));
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = test_app().await;
    register(&app, "alice").await;

    let response = send(
        &app,
        request("POST", "/auth/register", None, credentials("alice", "another-password")),
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["status"], "error");
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app().await;

    let response = send(
        &app,
        request("POST", "/auth/register", None, credentials("al", "password123")),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request("POST", "/auth/register", None, credentials("alice", "short")),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login() {
    let app = test_app().await;
    register(&app, "alice").await;

    let response = send(
        &app,
        request("POST", "/auth/login", None, credentials("alice", "password123")),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response
        .header(header::SET_COOKIE)
        .and_then(|c| c.split(';').next())
        .unwrap()
        .to_string();

    let response = send(&app, request("GET", "/api/articles", Some(&cookie), None)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_app().await;
    register(&app, "alice").await;

    let response = send(
        &app,
        request("POST", "/auth/login", None, credentials("alice", "wrong-password")),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.header(header::SET_COOKIE).is_none());

    let response = send(
        &app,
        request("POST", "/auth/login", None, credentials("nobody", "password123")),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = test_app().await;
    let user = register(&app, "alice").await;

    let response = send(&app, request("POST", "/auth/logout", Some(&user.cookie), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    let cleared = response.header(header::SET_COOKIE).unwrap();
    assert!(cleared.starts_with("session=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = test_app().await;
    let response = send(&app, request("GET", "/auth/me", None, None)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_for_unknown_user_is_rejected() {
    let app = test_app().await;

    // Correctly signed, but no such user in this database
    let token = test_sessions()
        .issue_token(&CurrentUser {
            id: 777,
            username: "ghost".to_string(),
        })
        .unwrap();
    let cookie = format!("session={}", token);

    let response = send(
        &app,
        request("POST", "/api/articles", Some(&cookie), Some(json!({ "content": "C" }))),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["code"], "UNAUTHORIZED");
    assert!(!response.text().contains("FOREIGN KEY"));

    let response = send(&app, request("GET", "/api/articles", Some(&cookie), None)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
