//! # partytime-shared
//!
//! Types shared between the PartyTime server and its clients: wire schemas
//! for every JSON endpoint, session/upload constants, pricing helpers and the
//! resource state container used by client-side catalog caches.

pub mod constants;
pub mod pricing;
pub mod protocol;
pub mod resource;
