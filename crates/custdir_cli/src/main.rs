//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `custdir_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use custdir_core::db::open_db_in_memory;
use custdir_core::{CustomerSearch, SqliteCustomerRepository};

fn main() {
    println!("custdir_core version={}", custdir_core::core_version());

    // One in-memory round trip proves store bootstrap and the repository
    // readiness guard work outside the test harness.
    let mut conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("store bootstrap failed: {err}");
            std::process::exit(1);
        }
    };

    match SqliteCustomerRepository::try_new(&mut conn) {
        Ok(repo) => {
            use custdir_core::CustomerRepository;
            match repo.list(&CustomerSearch::unfiltered()) {
                Ok(customers) => println!("customers={}", customers.len()),
                Err(err) => {
                    eprintln!("listing failed: {err}");
                    std::process::exit(1);
                }
            }
        }
        Err(err) => {
            eprintln!("repository guard failed: {err}");
            std::process::exit(1);
        }
    }
}
