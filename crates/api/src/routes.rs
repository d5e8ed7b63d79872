use crate::AppState;
use crate::error::ApiError;
use crate::payload::Payload;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use place_canvas::{HexColor, Owner, Pixel, PixelLoc, Standing};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{Span, debug, instrument, warn};

const SLOW_OPERATION: Duration = Duration::from_millis(10);

/// Pixel as it appears on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct PixelView {
    pub x: i64,
    pub y: i64,
    pub rgb: HexColor,
    pub user: Owner,
}

impl From<Pixel> for PixelView {
    fn from(pixel: Pixel) -> Self {
        Self {
            x: pixel.x,
            y: pixel.y,
            rgb: pixel.color,
            user: pixel.owner,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpsertRequest {
    pub x: Option<i64>,
    pub y: Option<i64>,
    #[serde(alias = "color")]
    pub rgb: Option<String>,
    pub user: Option<String>,
}

impl UpsertRequest {
    pub fn into_pixel(self) -> Result<Pixel, ApiError> {
        let (Some(x), Some(y), Some(rgb), Some(user)) = (
            self.x,
            self.y,
            self.rgb.filter(|s| !s.is_empty()),
            self.user.filter(|s| !s.is_empty()),
        ) else {
            return Err(ApiError::MissingParameters);
        };
        let color = HexColor::parse(rgb).map_err(|_| ApiError::InvalidColor)?;
        let owner = Owner::new(user).map_err(|_| ApiError::MissingParameters)?;
        Ok(Pixel::new(x, y, color, owner))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl DeleteRequest {
    pub fn loc(&self) -> Result<PixelLoc, ApiError> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(PixelLoc { x, y }),
            _ => Err(ApiError::MissingParameters),
        }
    }
}

pub async fn server_info() -> String {
    format!(
        "{} v{}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION")
    )
}

pub async fn list_pixels(State(canvas): State<AppState>) -> Json<Vec<PixelView>> {
    Json(canvas.list().into_iter().map(PixelView::from).collect())
}

#[instrument(skip(canvas, request), fields(x, y))]
pub async fn upsert_pixel(
    State(canvas): State<AppState>,
    Payload(request): Payload<UpsertRequest>,
) -> Result<(StatusCode, Json<PixelView>), ApiError> {
    let start = Instant::now();
    let pixel = request
        .into_pixel()
        .inspect_err(|e| debug!("Rejected upsert: {}", e))?;

    Span::current().record("x", pixel.x);
    Span::current().record("y", pixel.y);

    let outcome = canvas.upsert(pixel);
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let elapsed = start.elapsed();
    if elapsed > SLOW_OPERATION {
        warn!("Slow upsert: {:?} for pixel {}", elapsed, outcome.pixel().loc());
    }

    Ok((status, Json(outcome.into_pixel().into())))
}

#[instrument(skip(canvas, request), fields(x, y))]
pub async fn delete_pixel(
    State(canvas): State<AppState>,
    Payload(request): Payload<DeleteRequest>,
) -> Result<StatusCode, ApiError> {
    let loc = request
        .loc()
        .inspect_err(|e| debug!("Rejected delete: {}", e))?;

    Span::current().record("x", loc.x);
    Span::current().record("y", loc.y);

    match canvas.delete(loc.x, loc.y) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::PixelNotFound { x: loc.x, y: loc.y }),
    }
}

pub async fn pixel_at(
    State(canvas): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<PixelView>, ApiError> {
    let Path((x, y)) =
        path.map_err(|rejection| ApiError::InvalidCoordinates(rejection.body_text()))?;
    canvas
        .pixel_at(x, y)
        .map(|pixel| Json(pixel.into()))
        .ok_or(ApiError::PixelNotFound { x, y })
}

pub async fn leaderboard(State(canvas): State<AppState>) -> Json<Vec<Standing>> {
    Json(canvas.leaderboard())
}

pub async fn method_not_allowed(method: Method) -> ApiError {
    debug!("Refusing {} on /pixels", method);
    ApiError::MethodNotAllowed(method)
}
