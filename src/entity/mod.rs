//! SeaORM entity definitions.

pub mod input_source;
pub mod script;
pub mod test_case;
pub mod test_run;
