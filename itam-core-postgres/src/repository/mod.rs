pub mod accountability;
pub mod audit;
pub mod db_init;
pub mod inventory;
pub mod sequence;
