mod support;

use qms_client::api::dashboard::{DashboardStats, Placeholder};
use qms_client::api::departments::DepartmentFilter;
use qms_client::api::documents::{DocumentFilter, DocumentMetadata, DocumentStatus};
use qms_client::api::nonconformance::{NcInput, Severity};
use qms_client::api::suppliers::MaterialFilter;
use qms_client::{ApiClient, ClientConfig, ClientError, PageRequest, RecordId, Upload};
use reqwest::StatusCode;
use support::MockBackend;

#[tokio::test]
async fn enveloped_page_is_unwrapped() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let page = client.documents().list(&DocumentFilter::default()).await.unwrap();

    assert_eq!(page.total, 1);
    let doc = &page.items[0];
    assert_eq!(doc.title, "Cleaning SOP");
    assert_eq!(doc.status, DocumentStatus::Approved);
    assert_eq!(doc.extra["owner_name"], "QA Manager");
    assert!(doc.updated_at.is_some());
}

#[tokio::test]
async fn unset_and_blank_filters_never_reach_the_wire() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let filter = DocumentFilter {
        page: PageRequest::new(1, 20),
        search: Some("haccp plan".to_string()),
        category: Some(String::new()),
        department_id: None,
        ..Default::default()
    };
    client.documents().list(&filter).await.unwrap();
    client.documents().list(&DocumentFilter::default()).await.unwrap();

    let queries = srv.state.queries.lock().unwrap().clone();
    assert_eq!(queries, vec!["page=1&search=haccp+plan&size=20".to_string(), String::new()]);
}

#[tokio::test]
async fn array_filters_repeat_the_key() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let filter = MaterialFilter {
        supplier_id: Some(RecordId::new(4)),
        allergens: vec!["milk".to_string(), "egg".to_string()],
        ..Default::default()
    };
    client.suppliers().materials(&filter).await.unwrap();

    let queries = srv.state.queries.lock().unwrap().clone();
    assert_eq!(queries, vec!["allergens=milk&allergens=egg&supplier_id=4".to_string()]);
}

#[tokio::test]
async fn multipart_upload_survives_token_refresh() {
    let srv = MockBackend::spawn().await;
    let (client, _, _) = srv.client_with_expired_token();

    let metadata = DocumentMetadata {
        title: "Allergen matrix".to_string(),
        category: Some("allergen".to_string()),
        ..Default::default()
    };
    let file = Upload::new("matrix.xlsx", b"PK\x03\x04 spreadsheet".to_vec())
        .with_content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");

    let created = client.documents().create(&metadata, file).await.unwrap();
    assert_eq!(created.id.get(), 42);
    assert_eq!(srv.state.refresh_count(), 1);

    let uploads = srv.state.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2, "rejected attempt plus replay");
    assert_eq!(uploads[0], uploads[1]);

    let replay = &uploads[1];
    let file_part = replay.iter().find(|p| p.name == "file").unwrap();
    assert_eq!(file_part.file_name.as_deref(), Some("matrix.xlsx"));
    assert_eq!(file_part.bytes, b"PK\x03\x04 spreadsheet");
    assert!(replay.iter().any(|p| p.name == "title" && p.bytes == b"Allergen matrix"));
    assert!(!replay.iter().any(|p| p.name == "description"));
}

#[tokio::test]
async fn download_returns_bytes_and_file_name() -> anyhow::Result<()> {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let blob = client.documents().download(RecordId::new(9)).await?;

    assert_eq!(blob.bytes, b"%PDF-1.7 fake");
    assert_eq!(blob.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(blob.filename.as_deref(), Some("Cleaning SOP v1.2.pdf"));
    Ok(())
}

#[tokio::test]
async fn bare_endpoints_are_decoded_without_envelope() -> anyhow::Result<()> {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    assert_eq!(client.notifications().unread_count().await?, 3);

    let departments = client.departments().list(&DepartmentFilter::default()).await?;
    assert_eq!(departments.len(), 2);
    assert_eq!(departments[1].manager_id, Some(RecordId::new(7)));
    Ok(())
}

#[tokio::test]
async fn empty_success_body_is_accepted() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    client.notifications().mark_all_read().await.unwrap();
}

#[tokio::test]
async fn unsuccessful_envelope_is_rejected() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let err = client.risks().stats().await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected(ref m) if m == "Risk register is disabled"));
    assert_eq!(err.user_message(), "Risk register is disabled");
}

#[tokio::test]
async fn validation_errors_carry_server_detail() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let nc = NcInput {
        title: String::new(),
        description: "Metal fragment found in line 3".to_string(),
        source: "production".to_string(),
        severity: Severity::High,
        batch_reference: Some("B-2024-117".to_string()),
        product_reference: None,
        assigned_to: None,
        target_resolution_date: None,
    };
    let err = client.nonconformance().create(&nc).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.detail(), Some("title: field required"));
    assert!(!err.requires_login());
    assert_eq!(srv.state.refresh_count(), 0);
}

#[tokio::test]
async fn missing_analytics_endpoint_leaves_placeholder_to_caller() {
    let srv = MockBackend::spawn().await;
    let (client, _) = srv.authenticated_client();

    let result = client.dashboard().stats().await;
    let err = result.as_ref().unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let stats = result.unwrap_or_else(|_| DashboardStats::placeholder());
    assert_eq!(stats, DashboardStats::default());
}

#[tokio::test]
async fn truncated_error_body_keeps_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        // Promise more body than is sent, then hang up.
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 512\r\n\r\n{\"detail\":")
            .await
            .unwrap();
    });

    let client = ApiClient::builder(ClientConfig::new(&origin).with_api_url(format!("{origin}/api/v1")))
        .build()
        .unwrap();
    let err = client.risks().stats().await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(err.detail(), None);
    server.await.unwrap();
}
