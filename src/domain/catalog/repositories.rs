use super::entities::{ListingId, ListingRecord};
use crate::domain::errors::InfrastructureError;

/// Where catalog records come from.
///
/// The demo ships a static seed; a paginated or remote source only has to
/// hand back the full ordered collection to satisfy the filter engine.
pub trait ListingSource {
    /// Full ordered collection
    fn listings(&self) -> Result<&[ListingRecord], InfrastructureError>;

    /// Look up a single listing
    fn find(&self, id: &ListingId) -> Result<Option<&ListingRecord>, InfrastructureError> {
        Ok(self.listings()?.iter().find(|r| &r.id == id))
    }
}
