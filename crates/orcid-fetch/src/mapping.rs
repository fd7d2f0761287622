//! UIN to ORCID iD lookup
//!
//! The mapping lives in a shared SQLite database with a single table:
//! `orcid_mapping(UIN, ORCID)`.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// ORCID iD mapped to `uin`, or `None` when there is no row or the iD is empty
pub fn lookup_orcid_for_uin(db_path: &Path, uin: &str) -> Result<Option<String>> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let result = conn.query_row(
        "SELECT ORCID FROM orcid_mapping WHERE UIN = ?1",
        [uin],
        |row| row.get::<_, Option<String>>(0),
    );

    match result {
        Ok(orcid) => {
            let orcid = orcid.filter(|id| !id.is_empty());
            debug!("UIN {} maps to {:?}", uin, orcid);
            Ok(orcid)
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
