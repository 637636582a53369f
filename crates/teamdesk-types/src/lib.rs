pub mod api;
pub mod models;

pub use models::{
    Category, CashflowEntry, EventCategory, Note, Role, SessionUser,
};
