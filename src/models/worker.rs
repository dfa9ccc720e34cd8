use serde::{Deserialize, Serialize};

/// One row of the worker directory. Owned by the staffing backoffice;
/// this crate only mirrors and reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    /// ⇔ workers.venue_id (NULL until the coordinator assigns one)
    pub venue_id: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
