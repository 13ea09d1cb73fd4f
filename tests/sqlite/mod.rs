mod migrations;
mod modify;
mod prefetch;
mod queries;
mod registry;
mod sql_generation;
