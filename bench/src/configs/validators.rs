use super::run::RunConfig;
use super::Validatable;
use crate::error::HammerError;
use tracing::error;

impl Validatable<HammerError> for RunConfig {
    fn validate(&self) -> Result<(), HammerError> {
        let mut violations = Vec::new();

        if self.inserts == 0 {
            violations.push("inserts must be greater than 0");
        }
        if self.insert_threads == 0 {
            violations.push("insert_threads must be greater than 0");
        }
        if self.insert_batch_size == 0 {
            violations.push("insert_batch_size must be greater than 0");
        }
        if self.query_timeout_secs == 0 {
            violations.push("query_timeout_secs must be greater than 0");
        }
        if self.insert_operation.trim().is_empty() {
            violations.push("insert_operation is required");
        }
        if self.select_threads > 0 && self.select_operation.trim().is_empty() {
            violations.push("select_operation is required when select_threads is greater than 0");
        }

        if violations.is_empty() {
            return Ok(());
        }

        for violation in &violations {
            error!("Run configuration -> {violation}.");
        }
        Err(HammerError::InvalidConfiguration(violations.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RunConfig {
        RunConfig {
            insert_operation: "dbo.InsertOrder".to_owned(),
            select_operation: "dbo.FindOrders".to_owned(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn defaults_with_operations_should_be_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn zero_inserts_should_be_rejected() {
        let config = RunConfig {
            inserts: 0,
            ..valid_config()
        };

        let error = config.validate().unwrap_err();

        assert!(matches!(error, HammerError::InvalidConfiguration(_)));
        assert!(error.to_string().contains("inserts must be greater than 0"));
    }

    #[test]
    fn every_violation_should_be_reported() {
        let config = RunConfig {
            insert_threads: 0,
            insert_batch_size: 0,
            insert_operation: String::new(),
            select_operation: " ".to_owned(),
            ..RunConfig::default()
        };

        let message = config.validate().unwrap_err().to_string();

        assert!(message.contains("insert_threads"));
        assert!(message.contains("insert_batch_size"));
        assert!(message.contains("insert_operation"));
        assert!(message.contains("select_operation"));
    }

    #[test]
    fn select_operation_should_be_optional_without_selectors() {
        let config = RunConfig {
            select_threads: 0,
            select_operation: String::new(),
            ..valid_config()
        };

        assert!(config.validate().is_ok());
    }
}
