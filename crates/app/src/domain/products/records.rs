//! Product Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: Timestamp,
}
