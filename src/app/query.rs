//! Geographic query over the live collection
//!
//! This is the read path the refresh pipeline feeds: vendors inside a
//! latitude/longitude bounding box, projected to display fields and sorted by
//! offer percentage descending. Vendors whose truncated offer is zero are
//! excluded regardless of box membership. The HTTP layer serving this query
//! is an external collaborator; this module pins its contract.

use serde_json::Value;

use super::models::{BoundingBox, Vendor, VendorDto};
use super::store::VendorStore;
use crate::errors::StoreResult;

/// Query vendors inside the bounding box, best offers first
pub async fn vendors_in_box(
    live: &dyn VendorStore,
    bbox: &BoundingBox,
) -> StoreResult<Vec<VendorDto>> {
    let mut vendors = live.find_in_box(bbox).await?;
    vendors.sort_by(|a, b| {
        b.max_offer_percent
            .partial_cmp(&a.max_offer_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(vendors.iter().filter_map(to_dto).collect())
}

/// Project a vendor to its display DTO, dropping zero-offer vendors
fn to_dto(vendor: &Vendor) -> Option<VendorDto> {
    let off = vendor.max_offer_percent as i64;
    if off == 0 {
        return None;
    }

    let offer = vendor
        .details
        .as_ref()
        .and_then(|details| details.get("offer"));

    Some(VendorDto {
        lat: vendor.latitude,
        lng: vendor.longitude,
        name: vendor.title.clone(),
        off,
        max: offer.and_then(|o| offer_limit(o, "upperLimit")),
        min: offer.and_then(|o| offer_limit(o, "lowerLimit")),
    })
}

/// Read a numeric offer limit from the opaque detail payload
fn offer_limit(offer: &Value, key: &str) -> Option<i64> {
    let value = offer.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}
