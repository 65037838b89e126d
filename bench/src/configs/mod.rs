pub mod config_provider;
pub mod defaults;
pub mod displays;
pub mod run;
pub mod validators;

pub trait Validatable<E> {
    fn validate(&self) -> Result<(), E>;
}
