use serde::{Deserialize, Serialize};

use vendra_core::ProductId;

/// Product catalog read view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    /// Display key (what reports group and label by).
    pub model_number: String,
    pub category: String,
}
