pub mod finish_condition;
