//! Market
//!
//! Market is a cookie-persisted shopping basket for marketplace storefronts.
//! Baskets map item identifiers to quantities and live in a client-visible
//! persistence channel rather than the authenticated session, so logged-out
//! visitors can shop without any session state being touched.

pub mod basket;
pub mod catalog;
pub mod channel;
pub mod config;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod service;
pub mod store;
