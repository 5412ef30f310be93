use axum::{
    extract::{Path, Query, State},
    Json,
};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::database::ActivityStore;
use crate::models::Activity;
use crate::services::activities_service::{self, ActivitiesError, MessageView};

#[derive(Debug, Deserialize)]
pub struct SignupQuery {
    pub email: String,
}

pub async fn activities_handler(
    State(store): State<ActivityStore>,
) -> Json<IndexMap<String, Activity>> {
    Json(activities_service::list_activities(&store).await)
}

pub async fn activity_signup_handler(
    Path(activity_name): Path<String>,
    Query(query): Query<SignupQuery>,
    State(store): State<ActivityStore>,
) -> Result<Json<MessageView>, ActivitiesError> {
    activities_service::signup_participant(&store, &activity_name, &query.email)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(activity = %activity_name, email = %query.email, error = %e, "signup rejected");
            e
        })
}

pub async fn remove_participant_handler(
    Path((activity_name, email)): Path<(String, String)>,
    State(store): State<ActivityStore>,
) -> Result<Json<MessageView>, ActivitiesError> {
    activities_service::remove_participant(&store, &activity_name, &email)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(activity = %activity_name, email = %email, error = %e, "removal rejected");
            e
        })
}
