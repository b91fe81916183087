use serde::Serialize;

/// A single line in a user's cart: a product reference plus a quantity.
///
/// The product reference is weak. The product can be renamed, repriced, or
/// deleted while the line sits in the cart; nothing is resolved until the
/// cart is displayed or checked out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
}
