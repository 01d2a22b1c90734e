use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::Json;
use crate::models::{CreateUser, User};

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUser>,
) -> Result<Json<User>> {
    let conn = state.db.get()?;
    let user = queries::create_user(&conn, &request)?;
    tracing::info!("Created user {} ({})", user.id, user.email);
    Ok(Json(user))
}
