pub mod meta;

pub use meta::{ParamInfo, ParamLocation, RouteInfo, RouteRegistry};
