//! The canonical roster format: a source-neutral JSON document listing an
//! event's archers, validated and then upserted in one transaction.

pub mod models;
pub mod transformer;
pub mod validator;
