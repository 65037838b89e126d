pub mod http;
pub mod simulated;

use crate::error::{HammerError, OperationError};
use async_trait::async_trait;
use std::io::Write;
use std::time::Duration;

/// Handle of a transaction opened on a [`Session`].
///
/// It is consumed by commit or rollback so it cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
pub struct Transaction {
    id: u64,
}

impl Transaction {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Tabular result of a diagnostics operation.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn dump<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.columns.join("\t"))?;
        for row in &self.rows {
            writeln!(writer, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}

/// Connection to the store under test, owned by exactly one worker.
#[async_trait]
pub trait Session: Send {
    /// Runs the named operation, giving up after `timeout`.
    async fn invoke(
        &mut self,
        operation: &str,
        timeout: Duration,
        transaction: Option<&Transaction>,
    ) -> Result<(), OperationError>;

    async fn begin_transaction(&mut self) -> Result<Transaction, OperationError>;

    async fn commit(&mut self, transaction: Transaction) -> Result<(), OperationError>;

    async fn rollback(&mut self, transaction: Transaction) -> Result<(), OperationError>;

    /// Asks the store to discard the cached plan of `operation`.
    async fn force_recompile(&mut self, operation: &str) -> Result<(), OperationError>;

    async fn fetch_table(
        &mut self,
        operation: &str,
        timeout: Duration,
    ) -> Result<Table, OperationError>;
}

#[async_trait]
pub trait SessionFactory: Sync + Send {
    async fn create_session(&self) -> Result<Box<dyn Session>, HammerError>;

    /// Short description of the store, used in logs and reports.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_dump_should_write_tab_separated_rows() {
        let table = Table {
            columns: vec!["index".to_owned(), "fragmentation".to_owned()],
            rows: vec![
                vec!["PK_Orders".to_owned(), "12.5".to_owned()],
                vec!["IX_Orders_Date".to_owned(), "3.1".to_owned()],
            ],
        };
        let mut output = Vec::new();

        table.dump(&mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "index\tfragmentation\nPK_Orders\t12.5\nIX_Orders_Date\t3.1\n"
        );
    }
}
