pub mod mortgage;
pub mod portfolio;
pub mod share;
