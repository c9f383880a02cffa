//! Web search backends

mod serpapi;

pub use serpapi::SerpApiSearchProvider;
