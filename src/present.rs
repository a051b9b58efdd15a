//! Presentation helpers
//!
//! Everything here is shell-side decoration of core results: display labels,
//! product-page links and the dashboard's default selections. The core crates
//! never format user-facing text.

use salesim_core::{Catalog, Result, SaleId};
use salesim_similarity::{RankedPeer, WeightedPeer};
use serde::Serialize;

/// Product page of a sale; `{sale_id}` is replaced by the numeric id.
pub const SALE_URL_TEMPLATE: &str = "https://www.voyage-prive.com/fiche-produit/details/{sale_id}/b1";

/// Dimensions pre-selected when the user has not chosen any.
pub const DEFAULT_DIMENSIONS: [&str; 2] = ["Location", "Equipment & Services"];

/// Link to the product page of a sale.
pub fn sale_url(sale_id: &SaleId) -> Result<String> {
    let numeric_id = sale_id.numeric_id()?;
    Ok(SALE_URL_TEMPLATE.replace("{sale_id}", &numeric_id.to_string()))
}

/// Header describing the selected sale.
#[derive(Debug, Clone, Serialize)]
pub struct SaleCard {
    pub sale_uid: SaleId,
    pub name: String,
    pub locale: String,
    pub numeric_id: u64,
    pub url: String,
}

impl SaleCard {
    pub fn new(catalog: &Catalog, sale_id: &SaleId) -> Result<Self> {
        Ok(Self {
            sale_uid: sale_id.clone(),
            name: catalog.label_of(sale_id.as_str())?.to_string(),
            locale: catalog.locale_of(sale_id)?.to_string(),
            numeric_id: catalog.numeric_id_of(sale_id)?,
            url: sale_url(sale_id)?,
        })
    }
}

/// A ranked peer decorated for display.
///
/// Label and link are optional: a peer missing from the catalog, or with an
/// identifier that yields no numeric id, is still shown.
#[derive(Debug, Clone, Serialize)]
pub struct PeerRow {
    pub rank: u32,
    pub sale_uid: SaleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub similarity: f64,
}

impl PeerRow {
    fn build(catalog: &Catalog, peer_id: &SaleId, rank: u32, similarity: f64) -> Self {
        Self {
            rank,
            sale_uid: peer_id.clone(),
            name: catalog.label_of(peer_id.as_str()).ok().map(str::to_string),
            url: sale_url(peer_id).ok(),
            similarity,
        }
    }

    pub fn from_ranked(catalog: &Catalog, peer: &RankedPeer) -> Self {
        Self::build(catalog, &peer.peer_id, peer.rank, peer.similarity)
    }

    pub fn from_weighted(catalog: &Catalog, peer: &WeightedPeer) -> Self {
        Self::build(catalog, &peer.peer_id, peer.rank, peer.weighted_similarity)
    }
}
