//! Request description handed to the transport.
//!
//! An [`ApiRequest`] is plain data: the transport turns it into a fresh
//! `reqwest::Request` for every attempt, which is what makes replaying a
//! request after a token refresh possible (multipart bodies included).

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use qms_core::{PayloadError, query_pairs};

use crate::error::ClientResult;

/// Endpoint that exchanges a refresh token; never refreshed itself.
pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`.
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
    refresh_on_unauthorized: bool,
    binary: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            refresh_on_unauthorized: true,
            binary: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters from a filter struct; unset and blank values
    /// are dropped.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> ClientResult<Self> {
        self.query.extend(query_pairs(params)?);
        Ok(self)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(PayloadError::encode)?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Body::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    /// Expect a binary payload (file download/export) instead of JSON.
    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// Return a 401 to the caller as-is instead of refreshing the session.
    ///
    /// Used for credential exchanges, where 401 means "wrong password".
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// Whether a 401 on this request may trigger a token refresh.
    pub fn refreshes_on_unauthorized(&self) -> bool {
        self.refresh_on_unauthorized && self.path != REFRESH_PATH
    }
}

/// In-memory file for multipart uploads.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl core::fmt::Debug for Upload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, upload: Upload },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a form from a metadata struct: every set, non-blank field
    /// becomes a text part (same rules as query parameters).
    pub fn from_fields<T: Serialize + ?Sized>(fields: &T) -> ClientResult<Self> {
        let mut form = Self::new();
        for (name, value) in query_pairs(fields)? {
            form = form.text(name, value);
        }
        Ok(form)
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, upload: Upload) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            upload,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub(crate) fn to_reqwest(&self) -> ClientResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File { name, upload } => {
                    let mut file = reqwest::multipart::Part::bytes(upload.bytes.clone())
                        .file_name(upload.file_name.clone());
                    if let Some(content_type) = &upload.content_type {
                        file = file.mime_str(content_type)?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

/// Raw response of a download/export endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// File name suggested by `Content-Disposition`.
    pub filename: Option<String>,
}

impl Blob {
    pub(crate) fn from_parts(headers: &HeaderMap, bytes: Vec<u8>) -> Self {
        let header = |name: reqwest::header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            bytes,
            content_type: header(reqwest::header::CONTENT_TYPE),
            filename: header(reqwest::header::CONTENT_DISPOSITION)
                .as_deref()
                .and_then(disposition_filename),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl core::fmt::Debug for Blob {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Blob")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .finish()
    }
}

/// `attachment; filename="a.pdf"` / `filename*=UTF-8''a%20b.pdf`.
/// The extended form wins when both are present.
fn disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = raw.trim().splitn(3, '\'').last().unwrap_or_default();
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    if !decoded.is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" => {
                let name = raw.trim().trim_matches('"');
                if !name.is_empty() {
                    plain = Some(name.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderValue};

    #[derive(Serialize)]
    struct Meta {
        title: String,
        category: Option<String>,
        department_id: Option<i64>,
        notes: String,
    }

    #[test]
    fn refresh_endpoint_never_refreshes() {
        assert!(ApiRequest::get("/documents").refreshes_on_unauthorized());
        assert!(!ApiRequest::post(REFRESH_PATH).refreshes_on_unauthorized());
        assert!(!ApiRequest::post("/auth/login").without_refresh().refreshes_on_unauthorized());
    }

    #[test]
    fn query_strips_blank_values() {
        let request = ApiRequest::get("/audits")
            .query(&serde_json::json!({ "status": "planned", "search": "", "auditor_id": null }))
            .unwrap();
        assert_eq!(request.query_params(), &[("status".to_string(), "planned".to_string())]);
    }

    #[test]
    fn multipart_from_fields_skips_unset() {
        let meta = Meta {
            title: "Cleaning SOP".to_string(),
            category: None,
            department_id: Some(4),
            notes: String::new(),
        };
        let form = MultipartForm::from_fields(&meta)
            .unwrap()
            .file("file", Upload::new("sop.pdf", b"%PDF".to_vec()));

        assert_eq!(
            form.parts(),
            &[
                FormPart::Text { name: "department_id".to_string(), value: "4".to_string() },
                FormPart::Text { name: "title".to_string(), value: "Cleaning SOP".to_string() },
                FormPart::File { name: "file".to_string(), upload: Upload::new("sop.pdf", b"%PDF".to_vec()) },
            ]
        );
        assert!(form.to_reqwest().is_ok());
    }

    #[test]
    fn invalid_mime_is_reported() {
        let form = MultipartForm::new().file("file", Upload::new("a.bin", vec![1]).with_content_type("not a mime"));
        assert!(form.to_reqwest().is_err());
    }

    #[test]
    fn disposition_parsing() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="audit-report.pdf""#).as_deref(),
            Some("audit-report.pdf")
        );
        assert_eq!(
            disposition_filename("attachment; filename=plain.csv").as_deref(),
            Some("plain.csv")
        );
        assert_eq!(
            disposition_filename(r#"attachment; filename="fallback.pdf"; filename*=UTF-8''HACCP%20plan.pdf"#)
                .as_deref(),
            Some("HACCP plan.pdf")
        );
        assert_eq!(disposition_filename("inline"), None);
    }

    #[test]
    fn blob_reads_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static(r#"attachment; filename="x.pdf""#));

        let blob = Blob::from_parts(&headers, vec![1, 2, 3]);
        assert_eq!(blob.len(), 3);
        assert_eq!(blob.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(blob.filename.as_deref(), Some("x.pdf"));
    }
}
