use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vendra_core::CustomerId;

/// Customer directory read view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: String,
    /// Record creation date; a customer is "new" for a given invoice when
    /// this falls in the same calendar month as the invoice date.
    pub created_at: NaiveDate,
}
