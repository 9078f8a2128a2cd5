//! Lakegate CLI - Access-control admin tool
//!
//! Loads the connector security configuration and an optional catalog
//! fixture, then either prints the effective policy or evaluates a single
//! access-control check against it.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use lakegate_access::{
    AccessError, AccessResult, ConnectorAccessControl, LegacyAccessControl, LegacySecurityConfig,
};
use lakegate_common::{AccessControlContext, ConnectorIdentity, SchemaTableName, TransactionHandle};
use lakegate_metastore::{InMemoryMetastore, SnapshotTransactionManager, Table};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lakegate-cli")]
#[command(about = "Lakegate connector access-control CLI")]
#[command(version)]
struct Args {
    /// Security configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog fixture: JSON array of {"schema", "table", "owner"} objects
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective capability flags
    ShowConfig,
    /// Evaluate one access-control check
    Check {
        /// Session user
        #[arg(short, long)]
        user: String,

        /// Action to check
        #[arg(short, long, value_enum)]
        action: Action,

        /// Target table as schema.table
        #[arg(short, long)]
        table: SchemaTableName,

        /// New name for rename-table, as schema.table
        #[arg(long)]
        new_table: Option<SchemaTableName>,

        /// Source reported to the metastore
        #[arg(long, default_value = "lakegate-cli")]
        source: String,

        /// Query ID (random if omitted)
        #[arg(long)]
        query_id: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    DropTable,
    RenameTable,
    AddColumn,
    DropColumn,
    RenameColumn,
    AddConstraint,
    DropConstraint,
    CreateTable,
    Insert,
    Select,
    Delete,
}

/// Read a catalog fixture into a fresh metastore
fn load_catalog(path: &Path) -> Result<InMemoryMetastore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let tables: Vec<Table> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    let metastore = InMemoryMetastore::new();
    for table in tables {
        metastore.create_table(table)?;
    }
    Ok(metastore)
}

async fn run_check(
    access_control: &LegacyAccessControl,
    transaction: &TransactionHandle,
    identity: &ConnectorIdentity,
    context: &AccessControlContext,
    action: Action,
    table: &SchemaTableName,
    new_table: Option<&SchemaTableName>,
) -> Result<AccessResult> {
    if new_table.is_some() && action != Action::RenameTable {
        bail!("--new-table is only valid for rename-table");
    }
    let (tx, ac) = (transaction, access_control);
    let result = match action {
        Action::DropTable => ac.check_can_drop_table(tx, identity, context, table).await,
        Action::RenameTable => {
            let Some(new_table) = new_table else {
                bail!("--new-table is required for rename-table");
            };
            ac.check_can_rename_table(tx, identity, context, table, new_table)
        }
        Action::AddColumn => ac.check_can_add_column(tx, identity, context, table),
        Action::DropColumn => ac.check_can_drop_column(tx, identity, context, table),
        Action::RenameColumn => ac.check_can_rename_column(tx, identity, context, table),
        Action::AddConstraint => ac.check_can_add_constraint(tx, identity, context, table),
        Action::DropConstraint => ac.check_can_drop_constraint(tx, identity, context, table),
        Action::CreateTable => ac.check_can_create_table(tx, identity, context, table),
        Action::Insert => ac.check_can_insert_into_table(tx, identity, context, table),
        Action::Select => {
            ac.check_can_select_from_columns(tx, identity, context, table, &BTreeSet::new())
        }
        Action::Delete => ac.check_can_delete_from_table(tx, identity, context, table),
    };
    Ok(result)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = LegacySecurityConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            user,
            action,
            table,
            new_table,
            source,
            query_id,
        } => {
            let metastore = match &args.catalog {
                Some(path) => load_catalog(path)?,
                None => InMemoryMetastore::new(),
            };
            info!("Loaded {} tables", metastore.len());

            let transactions = Arc::new(SnapshotTransactionManager::new(Arc::new(metastore)));
            let handle = transactions.begin();
            let access_control = LegacyAccessControl::new(transactions.clone(), config);

            let query_id = query_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let context = AccessControlContext::builder(query_id.as_str())
                .source(source)
                .build();
            let identity = ConnectorIdentity::new(user);

            let result = run_check(
                &access_control,
                &handle,
                &identity,
                &context,
                action,
                &table,
                new_table.as_ref(),
            )
            .await;
            transactions.rollback(&handle)?;

            match result? {
                Ok(()) => {
                    println!("ALLOWED");
                    Ok(ExitCode::SUCCESS)
                }
                Err(AccessError::Denied(denied)) => {
                    println!("DENIED: {denied}");
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn catalog_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn harness(
        metastore: InMemoryMetastore,
        config: LegacySecurityConfig,
    ) -> (LegacyAccessControl, TransactionHandle) {
        let transactions = Arc::new(SnapshotTransactionManager::new(Arc::new(metastore)));
        let handle = transactions.begin();
        (LegacyAccessControl::new(transactions, config), handle)
    }

    #[test]
    fn test_args_parse_check() {
        let args = Args::try_parse_from([
            "lakegate-cli",
            "check",
            "--user",
            "alice",
            "--action",
            "drop-table",
            "--table",
            "Sales.Orders",
        ])
        .unwrap();
        match args.command {
            Commands::Check { action, table, .. } => {
                assert_eq!(action, Action::DropTable);
                assert_eq!(table.to_string(), "sales.orders");
            }
            Commands::ShowConfig => panic!("expected check"),
        }
    }

    #[test]
    fn test_args_reject_unqualified_table() {
        let result = Args::try_parse_from([
            "lakegate-cli",
            "check",
            "-u",
            "alice",
            "-a",
            "insert",
            "-t",
            "orders",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_catalog() {
        let file = catalog_file(
            r#"[
                {"schema": "sales", "table": "orders", "owner": "alice"},
                {"schema": "web", "table": "clicks", "owner": "etl", "table_type": "EXTERNAL_TABLE"}
            ]"#,
        );
        let metastore = load_catalog(file.path()).unwrap();
        assert_eq!(metastore.len(), 2);
        assert_eq!(metastore.get_table("web", "clicks").unwrap().owner, "etl");
    }

    #[test]
    fn test_load_catalog_duplicate_fails() {
        let file = catalog_file(
            r#"[
                {"schema": "sales", "table": "orders", "owner": "alice"},
                {"schema": "SALES", "table": "ORDERS", "owner": "bob"}
            ]"#,
        );
        assert!(load_catalog(file.path()).is_err());
    }

    #[tokio::test]
    async fn test_run_check_drop_table() {
        let metastore = InMemoryMetastore::new();
        metastore
            .create_table(Table::new("sales", "orders", "alice"))
            .unwrap();
        let config = LegacySecurityConfig::default().with_allow_drop_table(true);
        let (ac, handle) = harness(metastore, config);
        let context = AccessControlContext::builder("q1").build();
        let table: SchemaTableName = "sales.orders".parse().unwrap();

        let owner = ConnectorIdentity::new("alice");
        let result = run_check(&ac, &handle, &owner, &context, Action::DropTable, &table, None)
            .await
            .unwrap();
        assert!(result.is_ok());

        let other = ConnectorIdentity::new("bob");
        let result = run_check(&ac, &handle, &other, &context, Action::DropTable, &table, None)
            .await
            .unwrap();
        assert!(result.unwrap_err().is_denied());
    }

    #[tokio::test]
    async fn test_run_check_rename_requires_new_table() {
        let (ac, handle) = harness(InMemoryMetastore::new(), LegacySecurityConfig::default());
        let context = AccessControlContext::builder("q1").build();
        let identity = ConnectorIdentity::new("alice");
        let table: SchemaTableName = "sales.orders".parse().unwrap();

        let missing =
            run_check(&ac, &handle, &identity, &context, Action::RenameTable, &table, None).await;
        assert!(missing.is_err());

        let new_table: SchemaTableName = "sales.orders_v2".parse().unwrap();
        let result = run_check(
            &ac,
            &handle,
            &identity,
            &context,
            Action::RenameTable,
            &table,
            Some(&new_table),
        )
        .await
        .unwrap();
        assert!(result.unwrap_err().is_denied());
    }

    #[tokio::test]
    async fn test_run_check_new_table_rejected_for_other_actions() {
        let config = LegacySecurityConfig::default().with_allow_add_column(true);
        let (ac, handle) = harness(InMemoryMetastore::new(), config);
        let context = AccessControlContext::builder("q1").build();
        let identity = ConnectorIdentity::new("alice");
        let table: SchemaTableName = "sales.orders".parse().unwrap();
        let new_table: SchemaTableName = "sales.orders_v2".parse().unwrap();

        for action in [Action::AddColumn, Action::DropTable, Action::Insert] {
            let result = run_check(
                &ac,
                &handle,
                &identity,
                &context,
                action,
                &table,
                Some(&new_table),
            )
            .await;
            assert!(result.is_err(), "{action:?}");
        }
    }

    #[tokio::test]
    async fn test_run_check_passthrough() {
        let (ac, handle) = harness(InMemoryMetastore::new(), LegacySecurityConfig::default());
        let context = AccessControlContext::builder("q1").build();
        let identity = ConnectorIdentity::new("nobody");
        let table: SchemaTableName = "sales.orders".parse().unwrap();

        for action in [Action::CreateTable, Action::Insert, Action::Select, Action::Delete] {
            let result = run_check(&ac, &handle, &identity, &context, action, &table, None)
                .await
                .unwrap();
            assert!(result.is_ok(), "{action:?}");
        }
    }
}
