mod support;

use std::sync::Arc;

use qms_client::{AuthStore, ClientError, MemoryAuthStore, RecordId, SessionState, TokenPair};
use reqwest::StatusCode;
use support::{EXPIRED_TOKEN, MockBackend, PASSWORD, REFRESH_TOKEN, USERNAME};

#[tokio::test]
async fn login_persists_tokens_and_authenticates_requests() {
    let srv = MockBackend::spawn().await;
    let store = Arc::new(MemoryAuthStore::new());
    let (client, _) = srv.client(store.clone());
    assert_eq!(client.session(), SessionState::Unauthenticated);

    let tokens = client.auth().login(USERNAME, PASSWORD).await.unwrap();
    assert_eq!(tokens.access_token, "access-1");
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
    assert_eq!(store.refresh_token().as_deref(), Some(REFRESH_TOKEN));
    assert_eq!(client.session(), SessionState::Authenticated);
    assert_eq!(
        *srv.state.login_content_types.lock().unwrap(),
        vec!["application/x-www-form-urlencoded".to_string()]
    );

    let me = client.auth().me().await.unwrap();
    assert_eq!(me.username, USERNAME);
    assert_eq!(me.extra["phone"], "+44 1234");

    let seen = srv.state.authorizations.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("Bearer access-1".to_string())]);
}

#[tokio::test]
async fn wrong_password_is_not_treated_as_expired_session() {
    let srv = MockBackend::spawn().await;
    let (client, navigations) = srv.client(Arc::new(MemoryAuthStore::new()));

    let err = client.auth().login(USERNAME, "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.detail(), Some("Incorrect username or password"));
    assert_eq!(srv.state.refresh_count(), 0);
    assert!(navigations.lock().unwrap().is_empty());
    assert_eq!(client.session(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed_once() {
    let srv = MockBackend::spawn().await;
    let (client, store, navigations) = srv.client_with_expired_token();

    let me = client.auth().me().await.unwrap();
    assert_eq!(me.id.get(), 7);

    assert_eq!(srv.state.refresh_count(), 1);
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
    // Not rotated by the server, so the old one is kept.
    assert_eq!(store.refresh_token().as_deref(), Some(REFRESH_TOKEN));
    assert_eq!(client.session(), SessionState::Authenticated);
    assert!(navigations.lock().unwrap().is_empty());

    let seen = srv.state.authorizations.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Some(format!("Bearer {EXPIRED_TOKEN}")),
            // The refresh exchange carries no Authorization header.
            None,
            Some("Bearer access-1".to_string()),
        ]
    );
    assert_eq!(
        srv.state.refresh_bodies.lock().unwrap()[0],
        serde_json::json!({ "refresh_token": REFRESH_TOKEN })
    );
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh() {
    let srv = MockBackend::spawn().await;
    let (client, store, _) = srv.client_with_expired_token();

    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.auth().me().await })
        })
        .collect();

    for task in tasks {
        let user = task.await.unwrap().unwrap();
        assert_eq!(user.username, USERNAME);
    }

    assert_eq!(srv.state.refresh_count(), 1);
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn failed_refresh_clears_tokens_and_navigates_to_login() {
    let srv = MockBackend::spawn().await;
    srv.state.fail_refresh.store(true, std::sync::atomic::Ordering::SeqCst);
    let (client, store, navigations) = srv.client_with_expired_token();
    let mut session = client.subscribe_session();

    let err = client.auth().me().await.unwrap_err();

    // The refresh endpoint's own 401 reaches the caller.
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.detail(), Some("Invalid refresh token"));
    assert!(err.requires_login());
    assert_eq!(srv.state.refresh_count(), 1);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert_eq!(*navigations.lock().unwrap(), vec!["/login".to_string()]);
    assert_eq!(client.session(), SessionState::LoggedOut);
    assert!(session.has_changed().unwrap());
    assert_eq!(*session.borrow_and_update(), SessionState::LoggedOut);
}

#[tokio::test]
async fn missing_refresh_token_ends_session_without_calling_server() {
    let srv = MockBackend::spawn().await;
    let store = Arc::new(MemoryAuthStore::with_tokens(&TokenPair::access_only(EXPIRED_TOKEN)));
    let (client, navigations) = srv.client(store.clone());

    let err = client.documents().list(&Default::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::NoRefreshToken));
    assert_eq!(srv.state.refresh_count(), 0);
    assert!(store.access_token().is_none());
    assert_eq!(*navigations.lock().unwrap(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn waiting_requests_fail_once_the_session_is_gone() {
    let srv = MockBackend::spawn().await;
    srv.state.fail_refresh.store(true, std::sync::atomic::Ordering::SeqCst);
    let (client, _, navigations) = srv.client_with_expired_token();

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.auth().me().await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().unwrap_err().requires_login());
    }

    assert_eq!(srv.state.refresh_count(), 1);
    let navigations = navigations.lock().unwrap();
    assert!(!navigations.is_empty());
    assert!(navigations.iter().all(|route| route == "/login"));
}

#[tokio::test]
async fn explicit_refresh_failure_keeps_session() {
    let srv = MockBackend::spawn().await;
    let store = Arc::new(MemoryAuthStore::with_tokens(&TokenPair::new("access-0", "stolen")));
    let (client, navigations) = srv.client(store.clone());

    let err = client.auth().refresh().await.unwrap_err();

    // A 401 from the refresh endpoint itself is never refreshed again.
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(srv.state.refresh_count(), 1);
    assert!(navigations.lock().unwrap().is_empty());
    assert_eq!(store.access_token().as_deref(), Some("access-0"));
    assert_eq!(client.session(), SessionState::Authenticated);
}

#[tokio::test]
async fn explicit_refresh_stores_new_access_token() {
    let srv = MockBackend::spawn().await;
    let (client, store) = srv.authenticated_client();

    let tokens = client.auth().refresh().await.unwrap();

    assert_eq!(tokens.access_token, "access-1");
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
    assert_eq!(store.refresh_token().as_deref(), Some(REFRESH_TOKEN));
    assert_eq!(client.session(), SessionState::Authenticated);
}

#[tokio::test]
async fn explicit_refresh_is_sent_without_bearer_header() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    client.auth().refresh().await.unwrap();

    assert_eq!(*srv.state.authorizations.lock().unwrap(), vec![None]);
    assert_eq!(
        *srv.state.refresh_bodies.lock().unwrap(),
        vec![serde_json::json!({ "refresh_token": REFRESH_TOKEN })]
    );
}

#[tokio::test]
async fn explicit_and_transparent_refresh_share_one_exchange() {
    let srv = MockBackend::spawn().await;
    let (client, store, _) = srv.client_with_expired_token();

    let auth = client.auth();
    let (tokens, user) = tokio::join!(auth.refresh(), auth.me());

    assert_eq!(tokens.unwrap().access_token, "access-1");
    assert_eq!(user.unwrap().username, USERNAME);
    assert_eq!(srv.state.refresh_count(), 1);
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn second_401_after_replay_is_returned_without_another_refresh() {
    let srv = MockBackend::spawn().await;
    let (client, store, navigations) = srv.client_with_expired_token();

    let err = client.audits().get(RecordId::from(9)).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.detail(), Some("Audit is restricted to the lead auditor"));
    assert_eq!(srv.state.refresh_count(), 1);
    assert_eq!(
        *srv.state.locked_authorizations.lock().unwrap(),
        vec![
            Some(format!("Bearer {EXPIRED_TOKEN}")),
            Some("Bearer access-1".to_string()),
        ]
    );
    // The refresh itself worked, so the session stays up.
    assert_eq!(store.access_token().as_deref(), Some("access-1"));
    assert!(navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn logout_clears_tokens_even_when_server_fails() {
    let srv = MockBackend::spawn().await;
    srv.state.fail_logout.store(true, std::sync::atomic::Ordering::SeqCst);
    let (client, store) = srv.authenticated_client();

    let err = client.auth().logout().await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert_eq!(client.session(), SessionState::LoggedOut);
}

#[tokio::test]
async fn logout_succeeds_against_healthy_server() {
    let srv = MockBackend::spawn().await;
    let (client, store) = srv.authenticated_client();

    client.auth().logout().await.unwrap();

    assert!(!store.has_access_token());
    assert_eq!(client.session(), SessionState::LoggedOut);
}
