//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the stable access/mutation contract over `customers` storage.
//! - Stage one unit of work's changes and commit them atomically on `save`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before anything is staged.
//! - Staged changes apply to `save` in call order, inside one transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::customer::{Customer, CustomerId, CustomerValidationError};
use crate::search::filter::CustomerSearch;
use log::info;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    date_of_birth
FROM customers";

const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED_COLUMNS: &[&str] = &["id", "first_name", "last_name", "date_of_birth"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for customer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller passed an argument the contract rules out; raised before any
    /// store interaction.
    InvalidArgument(&'static str),
    Validation(CustomerValidationError),
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not bootstrapped: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted customer data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CustomerValidationError> for RepoError {
    fn from(value: CustomerValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Access and mutation contract for customer records.
///
/// `add`/`update`/`delete` only stage changes; nothing reaches the store
/// until `save` commits the whole unit of work.
pub trait CustomerRepository {
    /// Direct key lookup; absent is a valid result, never an error.
    fn get_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Full scan in store order, narrowed by the search criteria.
    fn list(&self, search: &CustomerSearch) -> RepoResult<Vec<Customer>>;
    /// Stages a new record; the store assigns its id on `save`.
    fn add(&mut self, customer: Customer) -> RepoResult<()>;
    /// Stages a full-row update of an existing record. Callers merge new
    /// field values onto the record first (see `CustomerDraft::apply_to`).
    fn update(&mut self, customer: Customer) -> RepoResult<()>;
    /// Stages removal of an existing record.
    fn delete(&mut self, customer: Customer) -> RepoResult<()>;
    /// Commits staged changes in call order; `true` iff at least one row
    /// was persisted. Store failures propagate, never get swallowed.
    fn save(&mut self) -> RepoResult<bool>;
    /// Ids the store assigned to staged inserts during the most recent
    /// successful `save`, in staging order.
    fn assigned_ids(&self) -> &[CustomerId];
}

#[derive(Debug)]
enum StagedChange {
    Insert(Customer),
    Update(Customer),
    Delete(CustomerId),
}

/// SQLite-backed customer repository bound to one store session.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn mut Connection,
    pending: Vec<StagedChange>,
    assigned: Vec<CustomerId>,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            pending: Vec::new(),
            assigned: Vec::new(),
        })
    }

    /// Number of staged, not yet committed changes.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn get_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_customer_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, search: &CustomerSearch) -> RepoResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut customers = Vec::new();

        while let Some(row) = rows.next()? {
            let customer = parse_customer_row(row)?;
            if search.matches(&customer) {
                customers.push(customer);
            }
        }

        Ok(customers)
    }

    fn add(&mut self, customer: Customer) -> RepoResult<()> {
        if customer.has_assigned_id() {
            return Err(RepoError::InvalidArgument(
                "add requires a record without a store-assigned id",
            ));
        }
        customer.validate()?;

        self.pending.push(StagedChange::Insert(customer));
        Ok(())
    }

    fn update(&mut self, customer: Customer) -> RepoResult<()> {
        if !customer.has_assigned_id() {
            return Err(RepoError::InvalidArgument(
                "update requires a record with a store-assigned id",
            ));
        }
        customer.validate()?;

        self.pending.push(StagedChange::Update(customer));
        Ok(())
    }

    fn delete(&mut self, customer: Customer) -> RepoResult<()> {
        if !customer.has_assigned_id() {
            return Err(RepoError::InvalidArgument(
                "delete requires a record with a store-assigned id",
            ));
        }

        self.pending.push(StagedChange::Delete(customer.id));
        Ok(())
    }

    fn save(&mut self) -> RepoResult<bool> {
        self.assigned.clear();
        if self.pending.is_empty() {
            return Ok(false);
        }

        // A failed commit is terminal for the unit of work: staged changes
        // are discarded and the transaction rolls back on drop.
        let staged = std::mem::take(&mut self.pending);
        let staged_count = staged.len();
        let mut assigned = Vec::new();
        let mut changed = 0usize;

        let tx = self.conn.transaction()?;
        for change in &staged {
            match change {
                StagedChange::Insert(customer) => {
                    tx.execute(
                        "INSERT INTO customers (first_name, last_name, date_of_birth)
                         VALUES (?1, ?2, ?3);",
                        params![
                            customer.first_name.as_str(),
                            customer.last_name.as_str(),
                            customer.date_of_birth.format(DATE_FORMAT).to_string(),
                        ],
                    )?;
                    assigned.push(tx.last_insert_rowid());
                    changed += 1;
                }
                StagedChange::Update(customer) => {
                    // Zero rows changed means the row vanished under us;
                    // last commit wins, no conflict detection at this layer.
                    changed += tx.execute(
                        "UPDATE customers
                         SET first_name = ?1, last_name = ?2, date_of_birth = ?3
                         WHERE id = ?4;",
                        params![
                            customer.first_name.as_str(),
                            customer.last_name.as_str(),
                            customer.date_of_birth.format(DATE_FORMAT).to_string(),
                            customer.id,
                        ],
                    )?;
                }
                StagedChange::Delete(id) => {
                    changed += tx.execute("DELETE FROM customers WHERE id = ?1;", params![id])?;
                }
            }
        }
        tx.commit()?;

        self.assigned = assigned;
        info!(
            "event=customer_save module=repo status=ok staged={staged_count} changed={changed} created={}",
            self.assigned.len()
        );
        Ok(changed > 0)
    }

    fn assigned_ids(&self) -> &[CustomerId] {
        &self.assigned
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let tables: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'customers';",
        [],
        |row| row.get(0),
    )?;
    if tables == 0 {
        return Err(RepoError::MissingRequiredTable("customers"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(customers);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }

    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: "customers",
                column: required,
            });
        }
    }

    Ok(())
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let date_text: String = row.get("date_of_birth")?;
    let date_of_birth =
        chrono::NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date value `{date_text}` in customers.date_of_birth"
            ))
        })?;

    let customer = Customer {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        date_of_birth,
    };
    customer.validate()?;
    Ok(customer)
}
