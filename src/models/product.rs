use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core catalog entity.
///
/// The JSON names are the labels the web front-end and the conformance
/// checker already consume, so they stay French on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prix")]
    pub price: f64,
    pub image: String,
    pub description: String,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(rename = "date_ajout")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from a creation payload, assigning a fresh id and
    /// creation timestamp.
    ///
    /// The timestamp is truncated to microseconds, the resolution of
    /// `TIMESTAMPTZ`, so the value returned from a create matches what a later
    /// read yields.
    pub fn new(payload: NewProduct) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            price: payload.price,
            image: payload.image,
            description: payload.description,
            category: payload.category,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prix")]
    pub price: f64,
    pub image: String,
    pub description: String,
    #[serde(rename = "categorie")]
    pub category: String,
}

impl NewProduct {
    /// Name of the first text field holding a NUL character, which the
    /// PostgreSQL store cannot persist.
    pub fn field_with_nul(&self) -> Option<&'static str> {
        [
            ("nom", &self.name),
            ("image", &self.image),
            ("description", &self.description),
            ("categorie", &self.category),
        ]
        .into_iter()
        .find(|(_, value)| value.contains('\0'))
        .map(|(field, _)| field)
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn payload(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: 9.99,
            image: "u".to_string(),
            description: "d".to_string(),
            category: "C".to_string(),
        }
    }

    #[test]
    fn new_assigns_non_empty_unique_ids() {
        let ids: HashSet<String> = (0..100).map(|_| Product::new(payload("X")).id).collect();
        assert_eq!(ids.len(), 100, "every created product must get a distinct id");
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn new_copies_payload_fields() {
        let p = Product::new(payload("X"));
        assert_eq!(p.name, "X");
        assert!((p.price - 9.99).abs() < f64::EPSILON);
        assert_eq!(p.image, "u");
        assert_eq!(p.description, "d");
        assert_eq!(p.category, "C");
    }

    #[test]
    fn created_at_has_microsecond_resolution() {
        let p = Product::new(payload("X"));
        assert_eq!(p.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let p = Product::new(payload("X"));
        let value = serde_json::to_value(&p).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["categorie", "date_ajout", "description", "id", "image", "nom", "prix"]
        );
        assert_eq!(obj["nom"], "X");
        assert_eq!(obj["prix"], 9.99);
    }

    #[test]
    fn created_at_serializes_as_iso_8601() {
        let p = Product::new(payload("X"));
        let value = serde_json::to_value(&p).unwrap();
        let raw = value["date_ajout"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(raw).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), p.created_at);
    }

    #[test]
    fn new_product_requires_every_field() {
        let missing_price = serde_json::json!({
            "nom": "X",
            "image": "u",
            "description": "d",
            "categorie": "C",
        });
        assert!(serde_json::from_value::<NewProduct>(missing_price).is_err());
    }

    #[test]
    fn new_product_rejects_non_numeric_price() {
        let bad_price = serde_json::json!({
            "nom": "X",
            "prix": "cheap",
            "image": "u",
            "description": "d",
            "categorie": "C",
        });
        assert!(serde_json::from_value::<NewProduct>(bad_price).is_err());
    }

    #[test]
    fn field_with_nul_names_offending_field() {
        assert_eq!(payload("X").field_with_nul(), None);
        assert_eq!(payload("a\0b").field_with_nul(), Some("nom"));

        let mut p = payload("X");
        p.category = "\0".to_string();
        assert_eq!(p.field_with_nul(), Some("categorie"));
    }

    #[test]
    fn new_product_accepts_integer_price() {
        let int_price = serde_json::json!({
            "nom": "X",
            "prix": 10,
            "image": "u",
            "description": "d",
            "categorie": "C",
        });
        let parsed: NewProduct = serde_json::from_value(int_price).unwrap();
        assert!((parsed.price - 10.0).abs() < f64::EPSILON);
    }
}
