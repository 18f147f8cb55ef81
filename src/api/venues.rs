use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::models::{Court, Venue, VenuePage, VenueQuery};
use crate::session::Session;
use crate::wire::fields::pick_i64;
use crate::wire::{decode_court, decode_venue, unwrap_object, ListEnvelope};

use super::ApiClient;

impl ApiClient {
    /// Search venues with `GET /complejos`
    pub async fn venues(&self, session: &Session, query: &VenueQuery) -> Result<VenuePage> {
        let body = self
            .get_json_with_query(session, "/complejos", query)
            .await?;

        let page = VenuePage {
            total: pick_i64(&body, &["total"]),
            page: pick_i64(&body, &["page"]),
            page_size: pick_i64(&body, &["page_size", "pageSize"]),
            items: records(body)?.iter().filter_map(decode_venue).collect(),
        };

        debug!("Fetched {} venues (total {:?})", page.items.len(), page.total);
        Ok(page)
    }

    pub async fn venue(&self, session: &Session, venue_id: &str) -> Result<Venue> {
        let path = format!("/complejos/{}", urlencoding::encode(venue_id.trim()));
        let body = self.get_json(session, &path).await?;

        decode_venue(&unwrap_object(body))
            .ok_or_else(|| ApiError::UnexpectedResponse(format!("venue {venue_id} has no id")))
    }

    /// Courts of one venue; records without an id are skipped
    pub async fn courts(&self, session: &Session, venue_id: &str) -> Result<Vec<Court>> {
        let path = format!("/complejos/{}/canchas", urlencoding::encode(venue_id.trim()));
        let body = self.get_json(session, &path).await?;

        let courts: Vec<Court> = records(body)?
            .iter()
            .filter_map(|record| decode_court(record, venue_id.trim()))
            .collect();

        debug!("Venue {} has {} courts", venue_id, courts.len());
        Ok(courts)
    }

    /// Venues managed by `owner_id` (`GET /complejos/duenio/{id}`)
    pub async fn owner_venues(&self, session: &Session, owner_id: i64) -> Result<Vec<Venue>> {
        let body = self
            .get_json(session, &format!("/complejos/duenio/{owner_id}"))
            .await?;

        Ok(records(body)?.iter().filter_map(decode_venue).collect())
    }
}

pub(crate) fn records(body: Value) -> Result<Vec<Value>> {
    let envelope: ListEnvelope = serde_json::from_value(body)?;
    Ok(envelope.into_records())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[tokio::test]
    async fn test_search_sends_only_set_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complejos"))
            .and(query_param("comuna", "Ñuñoa"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id_complejo": 1, "nombre": "Club Norte", "comuna": "Ñuñoa", "rating_promedio": 4.5},
                    {"nombre": "sin id"}
                ],
                "total": 11,
                "page": 2,
                "page_size": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let query = VenueQuery {
            comuna: Some("Ñuñoa".into()),
            page: Some(2),
            ..Default::default()
        };
        let page = api.venues(&Session::anonymous(), &query).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Club Norte");
        assert_eq!(page.items[0].rating, Some(4.5));
        assert_eq!(page.total, Some(11));
        assert_eq!(page.page_size, Some(10));

        let requests = server.received_requests().await.unwrap();
        let query = requests[0].url.query().unwrap_or_default().to_string();
        assert!(!query.contains("sort_by"));
    }

    #[tokio::test]
    async fn test_courts_inherit_venue_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complejos/8/canchas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id_cancha": 3, "nombre": "Cancha 1", "deporte": "futbol", "esta_activa": false},
                {"id": 4, "tipo": "Padel"}
            ])))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let courts = api.courts(&Session::anonymous(), "8").await.unwrap();

        assert_eq!(courts.len(), 2);
        assert_eq!(courts[0].venue_id, "8");
        assert!(!courts[0].active);
        assert_eq!(courts[1].name, "Padel");
    }

    #[tokio::test]
    async fn test_venue_detail_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complejos/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Complejo no encontrado"})))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let err = api.venue(&Session::anonymous(), "99").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Complejo no encontrado");
    }
}
