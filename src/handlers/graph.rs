use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::AppState;
use crate::entities::graphs;
use crate::error::ServiceError;
use crate::models::graph::{Graph, GraphCreate};
use crate::models::response::BaseResponse;

fn store(state: &AppState) -> Result<&DatabaseConnection, ServiceError> {
    state.db.as_ref().ok_or(ServiceError::StoreUnavailable)
}

/// Handler for GET /api/graphs
pub async fn get_graphs(State(state): State<AppState>) -> Result<Json<Vec<Graph>>, ServiceError> {
    let db = store(&state)?;
    let models = graphs::Entity::find().all(db).await?;
    let graphs = models
        .into_iter()
        .map(Graph::from_model)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(graphs))
}

/// Handler for GET /api/graphs/{graph_id}
pub async fn get_graph(
    State(state): State<AppState>,
    Path(graph_id): Path<String>,
) -> Result<Json<Graph>, ServiceError> {
    let db = store(&state)?;
    let model = graphs::Entity::find_by_id(graph_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Graph {} not found", graph_id)))?;
    Ok(Json(Graph::from_model(model)?))
}

/// Handler for POST /api/graphs
pub async fn create_graph(
    State(state): State<AppState>,
    Json(payload): Json<GraphCreate>,
) -> Result<(StatusCode, Json<Graph>), ServiceError> {
    let db = store(&state)?;
    let graph = payload.into_graph(Uuid::new_v4().to_string());
    graph.clone().into_active_model()?.insert(db).await?;

    tracing::info!("Created graph {} ({})", graph.id, graph.title);
    Ok((StatusCode::CREATED, Json(graph)))
}

/// Handler for PUT /api/graphs/{graph_id}
///
/// Replaces type, title, and data; extra and justification only when the
/// payload provides them.
pub async fn update_graph(
    State(state): State<AppState>,
    Path(graph_id): Path<String>,
    Json(payload): Json<GraphCreate>,
) -> Result<Json<Graph>, ServiceError> {
    let db = store(&state)?;
    let existing = graphs::Entity::find_by_id(graph_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Graph {} not found", graph_id)))?;

    let mut active: graphs::ActiveModel = existing.into();
    active.graph_type = Set(payload.graph_type.as_str().to_string());
    active.title = Set(payload.title.clone());
    active.data = Set(serde_json::to_value(&payload.data)
        .map_err(|err| ServiceError::Schema(format!("graph data is not serializable: {}", err)))?);
    if payload.extra.is_some() {
        active.extra = Set(payload.extra.clone());
    }
    if payload.justification.is_some() {
        active.justification = Set(payload.justification.clone());
    }

    let updated = active.update(db).await?;
    Ok(Json(Graph::from_model(updated)?))
}

/// Handler for DELETE /api/graphs/{graph_id}
pub async fn delete_graph(
    State(state): State<AppState>,
    Path(graph_id): Path<String>,
) -> Result<Json<BaseResponse>, ServiceError> {
    let db = store(&state)?;
    graphs::Entity::find_by_id(graph_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Graph {} not found", graph_id)))?;

    graphs::Entity::delete_by_id(graph_id).exec(db).await?;
    Ok(Json(BaseResponse {
        success: true,
        message: "Graph deleted successfully".to_string(),
    }))
}
