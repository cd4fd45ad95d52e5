pub mod endpoint;
pub mod schema;
pub mod view;

pub use endpoint::*;
pub use schema::*;
pub use view::*;
