//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State objects are owned by whoever composes the UI and passed down
//! explicitly, so each lifecycle can be exercised in isolation.

pub mod session;
