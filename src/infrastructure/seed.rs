use crate::domain::catalog::{ListingRecord, ListingSource};
use crate::domain::errors::InfrastructureError;
use crate::domain::logging::{LogComponent, get_logger};
use once_cell::sync::OnceCell;

const SEED_JSON: &str = include_str!("../../data/listings.json");

static SEED: OnceCell<Vec<ListingRecord>> = OnceCell::new();

/// Parse and validate a JSON array of listings
pub fn parse_listings(json: &str) -> Result<Vec<ListingRecord>, InfrastructureError> {
    let listings: Vec<ListingRecord> =
        serde_json::from_str(json).map_err(|e| InfrastructureError::Serialization(e.to_string()))?;

    let mut seen = std::collections::HashSet::new();
    for listing in &listings {
        listing
            .validate()
            .map_err(|e| InfrastructureError::Repository(e.to_string()))?;
        if !seen.insert(&listing.id) {
            return Err(InfrastructureError::Repository(format!("duplicate listing id {}", listing.id)));
        }
    }
    Ok(listings)
}

/// Listings shipped with the build, parsed on first use
pub fn seed_listings() -> Result<&'static [ListingRecord], InfrastructureError> {
    SEED.get_or_try_init(|| {
        let listings = parse_listings(SEED_JSON)?;
        get_logger().info(
            LogComponent::Infrastructure("Seed"),
            &format!("loaded {} seed listings", listings.len()),
        );
        Ok(listings)
    })
    .map(Vec::as_slice)
}

/// [`ListingSource`] over the embedded seed, or over records handed in by a host
#[derive(Debug, Clone, Default)]
pub struct SeedListingSource {
    custom: Option<Vec<ListingRecord>>,
}

impl SeedListingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `listings` instead of the embedded seed. Records are validated.
    pub fn from_records(listings: Vec<ListingRecord>) -> Result<Self, InfrastructureError> {
        for listing in &listings {
            listing
                .validate()
                .map_err(|e| InfrastructureError::Repository(e.to_string()))?;
        }
        Ok(Self { custom: Some(listings) })
    }

    pub fn from_json(json: &str) -> Result<Self, InfrastructureError> {
        Ok(Self {
            custom: Some(parse_listings(json)?),
        })
    }
}

impl ListingSource for SeedListingSource {
    fn listings(&self) -> Result<&[ListingRecord], InfrastructureError> {
        match &self.custom {
            Some(listings) => Ok(listings),
            None => seed_listings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_seed_is_valid() {
        let listings = seed_listings().unwrap();
        assert_eq!(listings.iter().filter(|l| l.market.is_some()).count(), 8);
        assert_eq!(listings.iter().filter(|l| l.name == "Oslo Tech Park").count(), 1);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            parse_listings("[{"),
            Err(InfrastructureError::Serialization(_))
        ));
    }
}
