//! Outlet status table scanner.
//!
//! WTI strips answer `/S` with a `|`-delimited table:
//!
//! ```text
//!  Plug | Name             | Password         | Status | Boot Delay | Default |
//! ------+------------------+------------------+--------+------------+---------+
//!   1   | db1              |  (undefined)     |   ON   |   0.5 Secs |   ON    |
//!   2   | db2              |  (undefined)     |   OFF  |   0.5 Secs |   ON    |
//! ```
//!
//! Column order differs between models, so the plug and status columns are
//! located by name in the header. The line after the header is a divider.
//! A row with fewer cells than the header ends the table.

use crate::status::PowerStatus;

/// Token a header line starts with.
pub const HEADER_TOKEN: &str = "plug";

/// Name of the column holding the outlet identifier.
pub const PLUG_COLUMN: &str = "plug";

/// Name of the column holding the power status.
pub const STATUS_COLUMN: &str = "status";

/// Cell separator.
pub const COLUMN_DELIMITER: char = '|';

/// Resolved header layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    width: usize,
    plug: usize,
    status: usize,
}

#[derive(Debug)]
enum ScanState {
    /// Looking for the header line.
    Seek,
    /// Header found; the next line is the divider.
    HeaderSeen(Header),
    /// Reading data rows.
    Rows(Header),
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(COLUMN_DELIMITER)
        .map(|cell| cell.trim().to_lowercase())
        .collect()
}

fn is_header(line: &str) -> bool {
    line.trim_start()
        .get(..HEADER_TOKEN.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(HEADER_TOKEN))
}

fn parse_header(line: &str) -> Result<Header, String> {
    let cells = split_cells(line);
    let column = |name: &str| {
        cells
            .iter()
            .position(|cell| cell == name)
            .ok_or_else(|| format!("outlet table has no '{}' column", name))
    };
    Ok(Header {
        width: cells.len(),
        plug: column(PLUG_COLUMN)?,
        status: column(STATUS_COLUMN)?,
    })
}

/// Find the status of `plug` in a status listing.
///
/// Returns the first matching row's status cell. A listing that does not
/// contain the plug is [`PowerStatus::NotFound`]; a header missing the plug
/// or status column is [`PowerStatus::Unparseable`].
pub fn find_plug_status(output: &str, plug: &str) -> PowerStatus {
    let wanted = plug.trim().to_lowercase();
    let mut state = ScanState::Seek;

    for line in output.lines() {
        state = match state {
            ScanState::Seek if is_header(line) => match parse_header(line) {
                Ok(header) => ScanState::HeaderSeen(header),
                Err(reason) => return PowerStatus::unparseable(reason),
            },
            ScanState::Seek => ScanState::Seek,
            ScanState::HeaderSeen(header) => ScanState::Rows(header),
            ScanState::Rows(header) => {
                if line.contains(COLUMN_DELIMITER) {
                    let cells = split_cells(line);
                    if cells.len() < header.width {
                        break;
                    }
                    if cells[header.plug] == wanted {
                        return PowerStatus::reported(&cells[header.status]);
                    }
                }
                ScanState::Rows(header)
            }
        };
    }

    PowerStatus::NotFound
}
