use axum::Json;

use super::ApiError;
use crate::{session::Session, types::TokenPair};

pub async fn landing_page(session: Session) -> Result<Json<TokenPair>, ApiError> {
    session
        .record()
        .token_pair()
        .map(Json)
        .ok_or(ApiError::MissingTokens)
}
