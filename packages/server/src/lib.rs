// Roofing archive resource API - server core
//
// Serves paginated, filterable archive pages (blog posts, projects, videos)
// sourced from the headless CMS behind one `POST /api/resources/{kind}` shape.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
