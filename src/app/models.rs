//! Data types for the vendor catalog mirror
//!
//! Defines the vendor record shared by the staging and live collections, the
//! upstream listing page shape, and the projection types used by the
//! geographic query collaborator.
//!
//! Wire names follow the upstream API's camelCase JSON. The detail payload is
//! deliberately untyped: the upstream detail schema is not contractually
//! stable, so it is stored verbatim as an ordered key-value document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque vendor detail payload, stored verbatim from the detail endpoint
pub type Details = serde_json::Map<String, Value>;

/// A single vendor record as mirrored into the document store
///
/// `id` is the natural key for upsert in both the staging and live
/// collections. A record with no `details` is *incomplete* and is not
/// eligible for commit into the live collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Vendor identifier, unique within a snapshot
    pub id: i64,
    /// Display title
    pub title: String,
    /// Geographic latitude
    pub latitude: f64,
    /// Geographic longitude
    pub longitude: f64,
    /// Best offer percentage currently advertised
    pub max_offer_percent: f64,

    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vendor_tag: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vendor_banner: Vec<Value>,
    #[serde(default)]
    pub price_range: i32,
    #[serde(
        default,
        rename = "profilePictureURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Value>,
    #[serde(default)]
    pub total_reviews: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub has_new_tag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_json: Option<String>,
    #[serde(default)]
    pub vendor_ramadan_status: i32,

    /// Detail payload, present only after successful enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,

    /// Transient mark-and-sweep flag, meaningful only in the live collection
    /// during a refresh commit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

impl Vendor {
    /// Whether this record has been enriched with a detail payload
    pub fn is_complete(&self) -> bool {
        self.details.is_some()
    }
}

/// One section of the upstream listing page
#[derive(Debug, Clone, Deserialize)]
pub struct PageSection {
    /// Vendors carried by this section
    #[serde(default)]
    pub items: Vec<Vendor>,
}

/// Upstream listing page response
///
/// The listing nests vendors inside ordered sections; an empty aggregate item
/// list signals end-of-data.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorPage {
    #[serde(default)]
    pub sections: Vec<PageSection>,
}

impl VendorPage {
    /// Flatten all sections into a single ordered vendor list
    pub fn into_items(self) -> Vec<Vendor> {
        self.sections
            .into_iter()
            .flat_map(|section| section.items)
            .collect()
    }
}

/// Geographic bounding box for the query collaborator
///
/// Axis-aligned, expressed as top-left and bottom-right corners in the
/// upstream's latitude/longitude convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left_lat: f64,
    pub top_left_lng: f64,
    pub bottom_right_lat: f64,
    pub bottom_right_lng: f64,
}

impl BoundingBox {
    /// Whether a coordinate lies strictly inside the box
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude < self.top_left_lat
            && latitude > self.bottom_right_lat
            && longitude > self.top_left_lng
            && longitude < self.bottom_right_lng
    }
}

/// Query projection of a vendor for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDto {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    /// Offer percentage truncated to a whole number
    pub off: i64,
    /// Offer upper limit from the detail payload, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Offer lower limit from the detail payload, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::sample_vendor;
    use serde_json::json;

    #[test]
    fn test_listing_page_parses_upstream_shape() {
        let body = json!({
            "sections": [
                {
                    "items": [
                        {
                            "id": 42,
                            "title": "Cafe",
                            "latitude": 35.7,
                            "longitude": 51.4,
                            "maxOfferPercent": 25.0,
                            "profilePictureURL": "https://cdn.example/42.jpg",
                            "rating": 4.4,
                            "totalReviews": 120
                        }
                    ]
                },
                { "items": [] }
            ],
            "isEndOfList": false
        });

        let page: VendorPage = serde_json::from_value(body).unwrap();
        let items = page.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 42);
        assert_eq!(items[0].max_offer_percent, 25.0);
        assert_eq!(
            items[0].profile_picture_url.as_deref(),
            Some("https://cdn.example/42.jpg")
        );
        assert!(!items[0].is_complete());
    }

    #[test]
    fn test_empty_page_yields_no_items() {
        let page: VendorPage = serde_json::from_value(json!({ "sections": [] })).unwrap();
        assert!(page.into_items().is_empty());
    }

    #[test]
    fn test_stale_flag_not_serialized_when_clear() {
        let vendor = sample_vendor(1);
        let value = serde_json::to_value(&vendor).unwrap();
        assert!(value.get("stale").is_none());

        let marked = Vendor {
            stale: true,
            ..sample_vendor(1)
        };
        let value = serde_json::to_value(&marked).unwrap();
        assert_eq!(value.get("stale"), Some(&json!(true)));
    }

    #[test]
    fn test_bounding_box_containment_is_strict() {
        let bbox = BoundingBox {
            top_left_lat: 20.0,
            top_left_lng: 0.0,
            bottom_right_lat: 0.0,
            bottom_right_lng: 20.0,
        };

        assert!(bbox.contains(10.0, 10.0));
        assert!(!bbox.contains(50.0, 50.0));
        // Boundary coordinates are excluded
        assert!(!bbox.contains(20.0, 10.0));
        assert!(!bbox.contains(10.0, 20.0));
    }
}
