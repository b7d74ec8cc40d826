pub mod entities;
pub mod fields;
pub mod health;
pub mod sections;
pub mod sites;
pub mod types;
