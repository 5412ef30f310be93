use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::database::ActivityStore;
use crate::models::Activity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivitiesError {
    #[error("Activity not found")]
    ActivityNotFound { activity: String },
    #[error("Participant not found in this activity")]
    ParticipantNotFound { activity: String, email: String },
    #[error("Student is already signed up for this activity")]
    AlreadySignedUp { activity: String, email: String },
}

impl ActivitiesError {
    pub fn status(&self) -> StatusCode {
        match self {
            ActivitiesError::ActivityNotFound { .. } | ActivitiesError::ParticipantNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ActivitiesError::AlreadySignedUp { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ActivitiesError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub message: String,
}

pub async fn list_activities(store: &ActivityStore) -> IndexMap<String, Activity> {
    store.snapshot().await
}

pub async fn signup_participant(
    store: &ActivityStore,
    activity_name: &str,
    email: &str,
) -> Result<MessageView, ActivitiesError> {
    let over_capacity = store
        .update(activity_name, |activity| {
            if activity.has_participant(email) {
                return Err(ActivitiesError::AlreadySignedUp {
                    activity: activity_name.to_string(),
                    email: email.to_string(),
                });
            }
            activity.participants.push(email.to_string());
            Ok(activity
                .is_over_capacity()
                .then_some((activity.participants.len(), activity.max_participants)))
        })
        .await
        .ok_or_else(|| ActivitiesError::ActivityNotFound {
            activity: activity_name.to_string(),
        })??;

    // Capacity is advisory; make overbooking visible without refusing it.
    if let Some((enrolled, max_participants)) = over_capacity {
        warn!(
            activity = %activity_name,
            enrolled,
            max_participants,
            "activity is over capacity"
        );
    }

    info!(activity = %activity_name, email = %email, "participant signed up");
    Ok(MessageView {
        message: format!("Signed up {} for {}", email, activity_name),
    })
}

pub async fn remove_participant(
    store: &ActivityStore,
    activity_name: &str,
    email: &str,
) -> Result<MessageView, ActivitiesError> {
    store
        .update(activity_name, |activity| {
            let Some(idx) = activity.participants.iter().position(|p| p == email) else {
                return Err(ActivitiesError::ParticipantNotFound {
                    activity: activity_name.to_string(),
                    email: email.to_string(),
                });
            };
            activity.participants.remove(idx);
            Ok(())
        })
        .await
        .ok_or_else(|| ActivitiesError::ActivityNotFound {
            activity: activity_name.to_string(),
        })??;

    info!(activity = %activity_name, email = %email, "participant removed");
    Ok(MessageView {
        message: format!("Removed {} from {}", email, activity_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ActivityStore {
        ActivityStore::seeded().unwrap()
    }

    async fn participants(store: &ActivityStore, name: &str) -> Vec<String> {
        store.get(name).await.unwrap().participants
    }

    #[tokio::test]
    async fn error_response_carries_detail() {
        let response = ActivitiesError::AlreadySignedUp {
            activity: "Chess Club".to_string(),
            email: "a@mergington.edu".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "detail": "Student is already signed up for this activity" })
        );
    }

    #[tokio::test]
    async fn signup_appends_in_order() {
        let store = store();
        let before = participants(&store, "Chess Club").await;

        let view = signup_participant(&store, "Chess Club", "test@mergington.edu")
            .await
            .unwrap();

        assert!(view.message.contains("test@mergington.edu"));
        assert!(view.message.contains("Chess Club"));
        let after = participants(&store, "Chess Club").await;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[..before.len()], before[..]);
        assert_eq!(after.last().map(String::as_str), Some("test@mergington.edu"));
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected_without_change() {
        let store = store();
        signup_participant(&store, "Programming Class", "dup@mergington.edu")
            .await
            .unwrap();
        let before = participants(&store, "Programming Class").await;

        let err = signup_participant(&store, "Programming Class", "dup@mergington.edu")
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().to_lowercase().contains("already signed up"));
        assert_eq!(participants(&store, "Programming Class").await, before);
    }

    #[tokio::test]
    async fn signup_unknown_activity_leaves_registry_alone() {
        let store = store();
        let before = store.snapshot().await;

        let err = signup_participant(&store, "Nonexistent Club", "test@mergington.edu")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ActivitiesError::ActivityNotFound {
                activity: "Nonexistent Club".to_string()
            }
        );
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn activity_names_are_case_sensitive() {
        let err = signup_participant(&store(), "chess club", "test@mergington.edu")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signup_past_capacity_is_allowed() {
        let store = store();
        for i in 0..12 {
            signup_participant(&store, "Tennis Club", &format!("player{i}@mergington.edu"))
                .await
                .unwrap();
        }
        let tennis = store.get("Tennis Club").await.unwrap();
        assert!(tennis.is_over_capacity());
    }

    #[tokio::test]
    async fn remove_keeps_relative_order() {
        let store = store();
        for email in ["a@mergington.edu", "b@mergington.edu", "c@mergington.edu"] {
            signup_participant(&store, "Debate Team", email).await.unwrap();
        }

        let view = remove_participant(&store, "Debate Team", "b@mergington.edu")
            .await
            .unwrap();

        assert!(view.message.contains("b@mergington.edu"));
        assert_eq!(
            participants(&store, "Debate Team").await,
            vec![
                "isabella@mergington.edu",
                "a@mergington.edu",
                "c@mergington.edu"
            ]
        );
    }

    #[tokio::test]
    async fn remove_missing_participant_or_activity_is_not_found() {
        let store = store();

        let missing_participant =
            remove_participant(&store, "Art Studio", "nonexistent@mergington.edu")
                .await
                .unwrap_err();
        let missing_activity = remove_participant(&store, "Fake Club", "test@mergington.edu")
            .await
            .unwrap_err();

        for err in [missing_participant, missing_activity] {
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert!(err.to_string().to_lowercase().contains("not found"));
        }
    }

    #[tokio::test]
    async fn signup_then_remove_round_trips() {
        let store = store();
        let before = participants(&store, "Science Club").await;

        signup_participant(&store, "Science Club", "complete@mergington.edu")
            .await
            .unwrap();
        remove_participant(&store, "Science Club", "complete@mergington.edu")
            .await
            .unwrap();

        assert_eq!(participants(&store, "Science Club").await, before);
    }

    #[tokio::test]
    async fn same_email_can_join_several_activities() {
        let store = store();
        signup_participant(&store, "Chess Club", "multi@mergington.edu")
            .await
            .unwrap();
        signup_participant(&store, "Basketball", "multi@mergington.edu")
            .await
            .unwrap();

        let activities = list_activities(&store).await;
        assert!(activities["Chess Club"].has_participant("multi@mergington.edu"));
        assert!(activities["Basketball"].has_participant("multi@mergington.edu"));
    }

    #[tokio::test]
    async fn concurrent_duplicate_signups_admit_one() {
        let store = store();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    signup_participant(&store, "Gym Class", "race@mergington.edu").await
                })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }

        assert_eq!(ok, 1);
        let gym = participants(&store, "Gym Class").await;
        assert_eq!(gym.iter().filter(|p| *p == "race@mergington.edu").count(), 1);
    }
}
