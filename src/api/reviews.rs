use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::models::{Review, ReviewDraft};
use crate::session::Session;
use crate::wire::{decode_review, unwrap_object, ReviewBody, ReviewPatchBody};

use super::venues::records;
use super::ApiClient;

/// How [`ApiClient::submit_review`] stored the review
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome {
    Created(Option<Review>),
    /// The caller already had a review here; it was overwritten
    Updated(Option<Review>),
}

#[derive(Debug, Default, Serialize)]
struct ReviewFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    id_cancha: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_complejo: Option<i64>,
}

impl ApiClient {
    /// Reviews for a court and/or venue (`GET /resenas`)
    pub async fn reviews(
        &self,
        session: &Session,
        court_id: Option<i64>,
        venue_id: Option<i64>,
    ) -> Result<Vec<Review>> {
        let filter = ReviewFilter {
            id_cancha: court_id,
            id_complejo: venue_id,
        };
        let body = self.get_json_with_query(session, "/resenas", &filter).await?;

        Ok(records(body)?.iter().filter_map(decode_review).collect())
    }

    pub async fn create_review(
        &self,
        session: &Session,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>> {
        draft.validate()?;
        let body = self
            .post_json(session, "/resenas", &ReviewBody::from(draft))
            .await?;
        Ok(decode_review(&unwrap_object(body)))
    }

    pub async fn update_review(
        &self,
        session: &Session,
        review_id: i64,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>> {
        draft.validate()?;
        let patch = ReviewPatchBody {
            calificacion: draft.rating,
            comentario: draft.comment.trim(),
        };
        let body = self
            .patch_json(session, &format!("/resenas/{review_id}"), &patch)
            .await?;
        Ok(decode_review(&unwrap_object(body)))
    }

    /// Create a review, or update the caller's existing one for the same place.
    ///
    /// Falls back to an update only when the create is rejected as a
    /// duplicate and the caller's previous review can be found.
    pub async fn submit_review(
        &self,
        session: &Session,
        draft: &ReviewDraft,
    ) -> Result<ReviewOutcome> {
        let err = match self.create_review(session, draft).await {
            Ok(review) => {
                info!("Review created for reservation {}", draft.reservation_id);
                return Ok(ReviewOutcome::Created(review));
            }
            Err(e) if is_duplicate(&e) => e,
            Err(e) => return Err(e),
        };

        let Some(user_id) = session.user().map(|u| u.id) else {
            return Err(err);
        };

        debug!("Review already exists, looking up review by user {}", user_id);
        let existing = self
            .reviews(session, draft.court_id, draft.venue_id)
            .await?
            .into_iter()
            .find(|r| r.user_id == Some(user_id));

        match existing {
            Some(review) => {
                let updated = self.update_review(session, review.id, draft).await?;
                info!("Review {} updated", review.id);
                Ok(ReviewOutcome::Updated(updated))
            }
            None => Err(err),
        }
    }
}

fn is_duplicate(err: &ApiError) -> bool {
    if err.status() == Some(StatusCode::CONFLICT) {
        return true;
    }
    let text = err.to_string().to_lowercase();
    ["duplicate", "already exists", "ya existe", "unique constraint"]
        .iter()
        .any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::models::User;
    use crate::store::MemoryStore;

    fn draft() -> ReviewDraft {
        ReviewDraft {
            reservation_id: 7,
            court_id: Some(3),
            venue_id: None,
            rating: 4,
            comment: " Buena luz ".into(),
        }
    }

    async fn session() -> Session {
        let user = User {
            id: 5,
            name: "Ana".into(),
            last_name: String::new(),
            email: "ana@example.com".into(),
            phone: None,
            role: "user".into(),
        };
        Session::establish(&MemoryStore::default(), "jwt".into(), user)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_review_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resenas"))
            .and(body_json(json!({
                "id_reserva": 7, "id_cancha": 3, "calificacion": 4, "comentario": "Buena luz"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id_resena": 20, "id_usuario": 5, "calificacion": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let outcome = api.submit_review(&session().await, &draft()).await.unwrap();
        match outcome {
            ReviewOutcome::Created(Some(review)) => assert_eq!(review.id, 20),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_conflict_updates_existing_review() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resenas"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"detail": "Ya existe una reseña"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resenas"))
            .and(query_param("id_cancha", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id_resena": 1, "id_usuario": 9, "calificacion": 2},
                {"id_resena": 2, "id_usuario": 5, "calificacion": 3}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/resenas/2"))
            .and(body_json(json!({"calificacion": 4, "comentario": "Buena luz"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id_resena": 2, "id_usuario": 5, "calificacion": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let outcome = api.submit_review(&session().await, &draft()).await.unwrap();
        assert!(matches!(outcome, ReviewOutcome::Updated(Some(ref r)) if r.rating == 4));
    }

    #[tokio::test]
    async fn test_conflict_without_own_review_returns_original_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resenas"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "duplicate key"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resenas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let err = api.submit_review(&session().await, &draft()).await.unwrap_err();
        assert_eq!(err.user_message(), "duplicate key");
    }

    #[tokio::test]
    async fn test_invalid_rating_is_local() {
        let server = MockServer::start().await;
        let api = ApiClient::new(&server.uri());

        let mut d = draft();
        d.rating = 6;
        let err = api.submit_review(&session().await, &d).await.unwrap_err();
        assert!(err.is_validation());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_detection() {
        let conflict = ApiError::Http {
            status: StatusCode::CONFLICT,
            message: "x".into(),
        };
        assert!(is_duplicate(&conflict));
        let other = ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            message: "UNIQUE constraint failed".into(),
        };
        assert!(is_duplicate(&other));
        assert!(!is_duplicate(&ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            message: "rating".into(),
        }));
    }
}
