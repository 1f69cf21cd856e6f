//! Session-backed bag store for the HTTP front end.
//!
//! The visitor's session plays the role browser local storage plays for a
//! client-side shop: one entry per visitor, keyed by cookie, holding the
//! whole serialized bag.

use tidepool_core::Bag;
use tokio::sync::watch;
use tower_sessions::Session;

use super::{BAG_KEY, BagStore, BagWatch, StoreError};

/// Bag store persisting the bag in the visitor's session.
#[derive(Debug)]
pub struct SessionBagStore {
    session: Session,
    watch: BagWatch,
}

impl SessionBagStore {
    /// Wrap the session of the current request.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            watch: BagWatch::new(),
        }
    }

    /// The underlying session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl BagStore for SessionBagStore {
    async fn get(&self) -> Result<Bag, StoreError> {
        let bag = match self.session.get::<Bag>(BAG_KEY).await {
            Ok(bag) => bag.unwrap_or_default(),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::debug!(error = %e, "Discarding malformed session bag");
                Bag::new()
            }
            Err(e) => return Err(e.into()),
        };
        self.watch.publish(&bag);
        Ok(bag)
    }

    async fn set(&self, bag: &Bag) -> Result<(), StoreError> {
        self.session.insert(BAG_KEY, bag).await?;
        self.watch.publish(bag);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.session.remove_value(BAG_KEY).await?;
        self.watch.publish(&Bag::new());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Bag> {
        self.watch.subscribe()
    }
}
