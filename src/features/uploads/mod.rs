//! Legacy upload surface kept for wire compatibility.
//!
//! The old uploader returned a bare `{ url }` and the drop-CV funnel took
//! unauthenticated submissions. Both shapes survive here, but underneath
//! every upload creates a canonical file record; nothing writes the old
//! raw-path convention anymore.

pub mod dtos;
pub mod handlers;
pub mod routes;
