//! CrudService: resource operations over an injected store.

mod crud;
pub mod normalize;
mod sales;
mod validation;
pub use crud::CrudService;
pub use sales::{SalesFilter, SalesQuery};
pub use validation::RequestValidator;
