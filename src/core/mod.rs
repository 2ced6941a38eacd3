// Core value, batch, and session types shared by every layer.
pub mod access;
pub mod batch;
pub mod context;
pub mod error;
pub mod reference;
pub mod session;
pub mod traits_data;
pub mod value;
