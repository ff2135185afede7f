use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects. The id is
// assigned by storage, so it stays absent until the object has been persisted.
pub trait Identifiable : Sync + Send {
    fn id(&self) -> Option<&str>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}


// Configuration abstracts config options for the catalog
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub branch_id: String,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            default_page_size: 20,
            max_page_size: 500,
        }
    }

    // page size honoured by the transport, the catalog itself imposes no bound
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_page_size).min(self.max_page_size)
    }
}
