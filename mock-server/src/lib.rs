use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiaryStatus {
    Public,
    Private,
    Followers,
}

/// JSON part of a create request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiary {
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub diary_status: DiaryStatus,
}

/// A diary as seen by one requesting user.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diary {
    pub diary_id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub diary_status: DiaryStatus,
    pub is_liked: bool,
    pub images: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryPage {
    pub content: Vec<Diary>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub last: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub message: String,
    pub diary_id: i64,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: DiaryStatus,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    5
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        tracing::debug!(%status, error = %self, "request rejected");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

struct StoredDiary {
    owner: i64,
    diary: NewDiary,
    images: Vec<String>,
    liked_by: HashSet<i64>,
}

impl StoredDiary {
    fn view(&self, diary_id: i64, viewer: i64) -> Diary {
        Diary {
            diary_id,
            user_id: self.owner,
            title: self.diary.title.clone(),
            content: self.diary.content.clone(),
            date: self.diary.date,
            latitude: self.diary.latitude,
            longitude: self.diary.longitude,
            diary_status: self.diary.diary_status,
            is_liked: self.liked_by.contains(&viewer),
            images: self.images.clone(),
        }
    }
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    diaries: BTreeMap<i64, StoredDiary>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users/{user_id}/diaries", get(list_diaries).post(create_diary))
        .route("/users/{user_id}/diaries/{diary_id}", delete(delete_diary))
        .route(
            "/users/{user_id}/diaries/{diary_id}/like",
            delete(unlike_diary).post(like_diary),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_diary(
    State(db): State<Db>,
    Path(user_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Diary>), ApiError> {
    let mut diary = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("diary") => {
                let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let parsed: NewDiary = serde_json::from_slice(&bytes)
                    .map_err(|e| ApiError::BadRequest(format!("invalid diary part: {e}")))?;
                diary = Some(parsed);
            }
            Some("images") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::BadRequest("image part without a file name".to_string()))?;
                let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                tracing::debug!(%name, size = bytes.len(), "received image");
                images.push(name);
            }
            _ => {}
        }
    }

    let diary = diary.ok_or_else(|| ApiError::BadRequest("missing diary part".to_string()))?;
    if diary.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be blank".to_string()));
    }

    let mut store = db.write().await;
    store.next_id += 1;
    let diary_id = store.next_id;
    let stored = StoredDiary {
        owner: user_id,
        diary,
        images,
        liked_by: HashSet::new(),
    };
    let view = stored.view(diary_id, user_id);
    store.diaries.insert(diary_id, stored);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Public diaries are visible to everyone; any other status only lists the
/// requesting user's own entries. Newest first.
async fn list_diaries(
    State(db): State<Db>,
    Path(user_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Json<DiaryPage>, ApiError> {
    if params.size == 0 {
        return Err(ApiError::BadRequest("size must be positive".to_string()));
    }
    let store = db.read().await;
    let matching: Vec<Diary> = store
        .diaries
        .iter()
        .rev()
        .filter(|(_, d)| {
            d.diary.diary_status == params.status
                && (params.status == DiaryStatus::Public || d.owner == user_id)
        })
        .map(|(id, d)| d.view(*id, user_id))
        .collect();

    let total = matching.len() as u64;
    let total_pages = total.div_ceil(params.size as u64) as u32;
    let offset = u64::from(params.page).saturating_mul(u64::from(params.size));
    let content: Vec<Diary> = matching
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(params.size as usize)
        .collect();

    Ok(Json(DiaryPage {
        content,
        total_elements: total,
        total_pages,
        number: params.page,
        size: params.size,
        last: params.page.saturating_add(1) >= total_pages,
    }))
}

async fn delete_diary(
    State(db): State<Db>,
    Path((user_id, diary_id)): Path<(i64, i64)>,
) -> Result<Json<Confirmation>, ApiError> {
    let mut store = db.write().await;
    let owner = store
        .diaries
        .get(&diary_id)
        .map(|d| d.owner)
        .ok_or_else(|| ApiError::NotFound(format!("diary {diary_id} not found")))?;
    if owner != user_id {
        return Err(ApiError::Forbidden("only the author may delete a diary".to_string()));
    }
    store.diaries.remove(&diary_id);
    Ok(Json(Confirmation {
        message: "diary deleted".to_string(),
        diary_id,
    }))
}

async fn like_diary(
    State(db): State<Db>,
    Path((user_id, diary_id)): Path<(i64, i64)>,
) -> Result<Json<Confirmation>, ApiError> {
    let mut store = db.write().await;
    let diary = store
        .diaries
        .get_mut(&diary_id)
        .ok_or_else(|| ApiError::NotFound(format!("diary {diary_id} not found")))?;
    diary.liked_by.insert(user_id);
    Ok(Json(Confirmation {
        message: "diary liked".to_string(),
        diary_id,
    }))
}

async fn unlike_diary(
    State(db): State<Db>,
    Path((user_id, diary_id)): Path<(i64, i64)>,
) -> Result<Json<Confirmation>, ApiError> {
    let mut store = db.write().await;
    let diary = store
        .diaries
        .get_mut(&diary_id)
        .ok_or_else(|| ApiError::NotFound(format!("diary {diary_id} not found")))?;
    diary.liked_by.remove(&user_id);
    Ok(Json(Confirmation {
        message: "diary unliked".to_string(),
        diary_id,
    }))
}
