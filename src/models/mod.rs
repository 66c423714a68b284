pub mod resource_listing;

pub use resource_listing::ResourceListing;
