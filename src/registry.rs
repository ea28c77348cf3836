use crate::error::HitsError;
use log::{debug, warn};

/// Resolves hits collection names to the ids used to index `HCofThisEvent`.
pub trait CollectionRegistry: Sync {
    fn collection_id(&self, name: &str) -> Result<usize, HitsError>;
}

/// Process-wide table of the collections declared by sensitive detectors.
///
/// Ids are handed out in registration order starting at 0. It is filled
/// before any event is processed and then only read, so workers share it
/// by reference.
#[derive(Debug, Default)]
pub struct SdManager {
    // (detector name, collection name), index is the id
    collections: Vec<(String, String)>,
}

impl SdManager {
    pub fn new() -> SdManager {
        SdManager {
            collections: Vec::new(),
        }
    }

    /// Declares `collection` for detector `sd_name`. Declaring the same
    /// pair twice returns the id it already has.
    pub fn register(&mut self, sd_name: &str, collection: &str) -> usize {
        if let Some(id) = self
            .collections
            .iter()
            .position(|(sd, col)| sd == sd_name && col == collection)
        {
            return id;
        }
        self.collections
            .push((sd_name.to_string(), collection.to_string()));
        let id = self.collections.len() - 1;
        debug!("registered hits collection {}/{} as {}", sd_name, collection, id);
        id
    }

    pub fn number_of_collections(&self) -> usize {
        self.collections.len()
    }
}

impl CollectionRegistry for SdManager {
    /// Accepts either `"<detector>/<collection>"` or a bare collection
    /// name; a bare name resolves to the first detector declaring it.
    fn collection_id(&self, name: &str) -> Result<usize, HitsError> {
        let found = match name.find('/') {
            Some(slash) => {
                let (sd_name, collection) = (&name[..slash], &name[slash + 1..]);
                self.collections
                    .iter()
                    .position(|(sd, col)| sd == sd_name && col == collection)
            }
            None => {
                let mut matching = self
                    .collections
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, col))| col == name);
                let first = matching.next();
                if let Some((id, (sd, _))) = first {
                    if matching.next().is_some() {
                        warn!(
                            "hits collection `{}` is declared by several detectors, using {}/{}",
                            name, sd, name
                        );
                    }
                    Some(id)
                } else {
                    None
                }
            }
        };
        found.ok_or_else(|| HitsError::not_found_name(name))
    }
}
