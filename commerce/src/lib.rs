#![deny(clippy::all)]

// Entities and repository ports for the basket and catalog services.
// Storage adapters live in storage-engine; HTTP handling lives in server-http.

pub mod basket;
pub mod catalog;
