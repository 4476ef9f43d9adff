pub mod interactive;
pub mod model;
pub mod remote;
pub mod resolve;
pub mod select;
pub mod store;
