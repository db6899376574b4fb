use serde::{Deserialize, Serialize};

/// A single to-do item. `id` and `created_at` are fixed at creation;
/// `created_at` is a display-only local timestamp with minute granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: String,
}
