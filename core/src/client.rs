//! Stateless HTTP request builder and response parser for the diary API.
//!
//! # Design
//! `DiaryClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `DiarySync` glues the two together over a `Transport`.

use serde::de::DeserializeOwned;

use crate::codec::{self, JSON_CONTENT_TYPE};
use crate::error::{SyncError, NULL_BODY, UNKNOWN_ERROR};
use crate::http::{FormPart, HttpMethod, HttpRequest, HttpResponse, PartBody, RequestBody};
use crate::like::LikeAction;
use crate::types::{Confirmation, DiaryRecord, Page, VisibilityStatus};

/// Form field name of the JSON part in a create request.
pub const DIARY_PART_NAME: &str = "diary";

/// Request builder and response parser for the diary API.
#[derive(Debug, Clone)]
pub struct DiaryClient {
    base_url: String,
}

impl DiaryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn diaries_url(&self, owner_id: i64) -> String {
        format!("{}/users/{owner_id}/diaries", self.base_url)
    }

    /// Multipart create request: the JSON part first, then `images` in order.
    pub fn build_create(&self, owner_id: i64, json_body: Vec<u8>, images: Vec<FormPart>) -> HttpRequest {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(FormPart {
            name: DIARY_PART_NAME.to_string(),
            file_name: None,
            content_type: JSON_CONTENT_TYPE.to_string(),
            body: PartBody::Bytes(json_body),
        });
        parts.extend(images);
        HttpRequest {
            method: HttpMethod::Post,
            path: self.diaries_url(owner_id),
            body: RequestBody::Multipart(parts),
        }
    }

    pub fn build_list(&self, owner_id: i64, status: VisibilityStatus, page: u32, size: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?status={status}&page={page}&size={size}", self.diaries_url(owner_id)),
            body: RequestBody::Empty,
        }
    }

    pub fn build_delete(&self, owner_id: i64, diary_id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{diary_id}", self.diaries_url(owner_id)),
            body: RequestBody::Empty,
        }
    }

    /// `POST .../like` likes, `DELETE .../like` unlikes. The caller picks.
    pub fn build_like(&self, owner_id: i64, diary_id: i64, action: LikeAction) -> HttpRequest {
        let method = match action {
            LikeAction::Like => HttpMethod::Post,
            LikeAction::Unlike => HttpMethod::Delete,
        };
        HttpRequest {
            method,
            path: format!("{}/{diary_id}/like", self.diaries_url(owner_id)),
            body: RequestBody::Empty,
        }
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<DiaryRecord, SyncError> {
        parse_body(&response)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Page<DiaryRecord>, SyncError> {
        parse_body(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<Confirmation, SyncError> {
        parse_body(&response)
    }

    pub fn parse_like(&self, response: HttpResponse) -> Result<Confirmation, SyncError> {
        parse_body(&response)
    }
}

/// Classify a response: non-2xx and missing bodies are application errors,
/// anything else must decode.
fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, SyncError> {
    check_status(response)?;
    if codec::is_absent(&response.body) {
        return Err(SyncError::Application {
            status: response.status,
            message: NULL_BODY.to_string(),
        });
    }
    codec::decode(&response.body)
}

/// Map non-success status codes to `SyncError::Application`.
fn check_status(response: &HttpResponse) -> Result<(), SyncError> {
    if response.is_success() {
        return Ok(());
    }
    let text = response.body.trim();
    Err(SyncError::Application {
        status: response.status,
        message: if text.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            text.to_string()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DiaryClient {
        DiaryClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    const RECORD: &str = r#"{"diaryId":3,"userId":1,"title":"Hike","content":"Up","date":"2024-06-01",
        "latitude":35.1,"longitude":129.0,"diaryStatus":"PRIVATE","isLiked":true}"#;

    #[test]
    fn build_list_encodes_query() {
        let req = client().build_list(1, VisibilityStatus::Public, 0, 5);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/users/1/diaries?status=PUBLIC&page=0&size=5");
        assert!(matches!(req.body, RequestBody::Empty));
    }

    #[test]
    fn build_delete_produces_correct_request() {
        let req = client().build_delete(1, 42);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/users/1/diaries/42");
    }

    #[test]
    fn like_and_unlike_share_a_path() {
        let like = client().build_like(2, 9, LikeAction::Like);
        let unlike = client().build_like(2, 9, LikeAction::Unlike);
        assert_eq!(like.method, HttpMethod::Post);
        assert_eq!(unlike.method, HttpMethod::Delete);
        assert_eq!(like.path, "http://localhost:3000/users/2/diaries/9/like");
        assert_eq!(like.path, unlike.path);
        assert!(matches!(like.body, RequestBody::Empty));
        assert!(matches!(unlike.body, RequestBody::Empty));
    }

    #[test]
    fn build_create_puts_json_first_then_images_in_order() {
        let images = ["a.jpg", "b.png", "c.webp"]
            .iter()
            .map(|n| FormPart {
                name: "images".to_string(),
                file_name: Some(n.to_string()),
                content_type: "image/*".to_string(),
                body: PartBody::Bytes(Vec::new()),
            })
            .collect();
        let req = client().build_create(1, b"{}".to_vec(), images);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/users/1/diaries");

        let parts = req.body.parts();
        assert_eq!(parts[0].name, DIARY_PART_NAME);
        assert_eq!(parts[0].content_type, "application/json");
        let names: Vec<_> = parts[1..].iter().map(|p| p.file_name.as_deref().unwrap()).collect();
        assert_eq!(names, ["a.jpg", "b.png", "c.webp"]);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = DiaryClient::new("http://localhost:3000/");
        assert_eq!(client.build_delete(1, 1).path, "http://localhost:3000/users/1/diaries/1");
    }

    #[test]
    fn parse_create_success() {
        let record = client().parse_create(response(201, RECORD)).unwrap();
        assert_eq!(record.diary_id, 3);
        assert_eq!(record.diary_status, VisibilityStatus::Private);
        assert!(record.is_liked);
    }

    #[test]
    fn parse_create_error_carries_body_text() {
        let err = client().parse_create(response(400, "title must not be blank")).unwrap_err();
        match err {
            SyncError::Application { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "title must not be blank");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_error_without_text_is_unknown_error() {
        let err = client().parse_like(response(503, "")).unwrap_err();
        assert!(matches!(err, SyncError::Application { status: 503, ref message } if message == UNKNOWN_ERROR));
    }

    #[test]
    fn parse_list_null_body_is_failure() {
        let err = client().parse_list(response(200, "null")).unwrap_err();
        assert!(err.is_null_body());
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn parse_delete_empty_body_is_failure() {
        let err = client().parse_delete(response(200, "")).unwrap_err();
        assert!(err.is_null_body());
    }

    #[test]
    fn parse_delete_not_found_carries_status() {
        let err = client().parse_delete(response(404, "")).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn parse_list_bad_json_is_decode_error() {
        let err = client().parse_list(response(200, "not json")).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }

    #[test]
    fn parse_like_accepts_minimal_confirmation() {
        let ack = client().parse_like(response(200, "{}")).unwrap();
        assert_eq!(ack, Confirmation::default());
    }
}
