use serde::{Deserialize, Serialize};

/// A sports facility (complejo)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub comuna: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub active: bool,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
}

/// A single bookable surface (cancha)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: String,
    pub venue_id: String,
    pub name: String,
    pub sport: Option<String>,
    pub surface: Option<String>,
    pub capacity: Option<i64>,
    pub lit: bool,
    pub covered: bool,
    pub active: bool,
}

/// One page of a venue search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenuePage {
    pub items: Vec<Venue>,
    pub total: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Filters for `GET /complejos`; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VenueQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comuna: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deporte: Option<String>,
    /// distancia | rating | nombre | recientes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// asc | desc
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}
