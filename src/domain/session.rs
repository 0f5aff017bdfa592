//! Per-user session context handed to the components that need it:
//! favorites and the wallet connection.

use crate::domain::catalog::{ListingId, ListingRecord};
use crate::domain::events::{CatalogEvent, EventDispatcher};
use std::collections::HashSet;

/// Listings the user starred. Lives for the session only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSet {
    ids: HashSet<ListingId>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the listings flagged as favorites in the seed data
    pub fn seeded_from(listings: &[ListingRecord]) -> Self {
        Self {
            ids: listings.iter().filter(|r| r.is_favorite).map(|r| r.id.clone()).collect(),
        }
    }

    pub fn contains(&self, id: &ListingId) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership, returning whether `id` is now a favorite
    pub fn toggle(&mut self, id: &ListingId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingId> {
        self.ids.iter()
    }
}

impl FromIterator<ListingId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = ListingId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

/// Wallet / identity provider as seen by the invest flow
pub trait WalletConnection {
    fn is_connected(&self) -> bool;
    fn address(&self) -> Option<&str>;
    /// Start the provider's connect flow. Completion is reported through
    /// `is_connected` on a later call.
    fn request_connection(&mut self);
}

/// Explicit session state: favorites plus the wallet connection
pub struct UserSession<W: WalletConnection> {
    favorites: FavoritesSet,
    wallet: W,
}

impl<W: WalletConnection> UserSession<W> {
    pub fn new(favorites: FavoritesSet, wallet: W) -> Self {
        Self { favorites, wallet }
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn toggle_favorite(&mut self, id: &ListingId, dispatcher: Option<&dyn EventDispatcher>) -> bool {
        let is_favorite = self.favorites.toggle(id);
        if let Some(dispatcher) = dispatcher {
            dispatcher.publish_catalog_event(CatalogEvent::FavoriteToggled {
                listing: id.clone(),
                is_favorite,
            });
        }
        is_favorite
    }
}
