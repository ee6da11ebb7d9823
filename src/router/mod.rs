// Route table descriptor and handlers.

mod config;
mod handler;
mod key;
mod method;
mod table;

pub use config::RouteConfig;
pub use handler::{handler_fn, ApiHandler, ApiRequest, ApiResponse, HandlerRegistry};
pub use key::RouteKey;
pub use method::HttpMethod;
pub use table::{RoutePath, RouteSpec, RouteTable, RouteTableBuilder};
