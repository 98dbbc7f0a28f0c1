const DB_SCHEMA_VERSION: &str = "1.0.0";

mod db_setup;
mod extract;
mod parse;
mod persist;
mod pipeline;
mod run;

pub use db_setup::{configure_connection, ensure_schema};
pub use run::{ImportSettings, run};

use extract::*;
use parse::*;
use persist::*;
use pipeline::*;
