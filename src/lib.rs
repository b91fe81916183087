//! An e-commerce backend built on message-passing services.
//!
//! Each store concern (users, catalog, cart, orders) runs as its own tokio
//! task owning its state, reachable only through a typed channel client.
//! The checkout coordinator in [`checkout`] drives the multi-service
//! order-placement flow over those clients, and [`http`] exposes the whole
//! thing as a JSON API.

pub mod app_system;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod messages;
pub mod security;
pub mod seed;
pub mod services;

#[cfg(test)]
mod mock_clients;
