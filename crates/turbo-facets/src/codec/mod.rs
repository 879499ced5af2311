//! Query-string codec.
//!
//! Maps listing state to and from the browser address bar under either
//! category routing convention.

mod config;
mod location;
mod query_string;
mod slug;

pub use config::{CategoryRouting, CodecConfig};
pub use location::Location;
pub use query_string::{ListingState, QueryCodec};
pub use slug::slugify;
