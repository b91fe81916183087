//! Store services. Each service owns its state and a message receiver;
//! callers talk to it through the matching client in [`crate::clients`].

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod users;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;
pub use users::UserService;
