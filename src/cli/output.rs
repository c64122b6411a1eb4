//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use spec_contrib::FetchError;
use spec_contrib::RankedEntry;
use spec_contrib::acknowledgements::NAME_SEPARATOR;
use spec_contrib::disposition::{CSV_HEADER, DispositionRow};

const DIVIDER_WIDTH: usize = 39;

/// Writes the ranking as an aligned table with a header and divider.
pub fn write_ranking_table<W: Write>(
    writer: &mut W,
    ranking: &[RankedEntry],
) -> Result<(), FetchError> {
    writeln!(
        writer,
        "{:>20} | {:>6} | {:>10} | {:>8} |",
        "user", "score", "comments", "bytes"
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer, "{}", "-".repeat(DIVIDER_WIDTH)).map_err(|e| io_error(&e))?;

    for entry in ranking {
        writeln!(
            writer,
            "{:>20} | {:>6} | {:>10} | {:>8} |",
            entry.user, entry.score, entry.comments, entry.comment_bytes
        )
        .map_err(|e| io_error(&e))?;
    }

    Ok(())
}

/// Writes the ranking as pretty-printed JSON.
pub fn write_ranking_dump<W: Write>(
    writer: &mut W,
    ranking: &[RankedEntry],
) -> Result<(), FetchError> {
    let rendered = serde_json::to_string_pretty(ranking).map_err(|error| FetchError::Io {
        message: error.to_string(),
    })?;
    writeln!(writer, "{rendered}").map_err(|e| io_error(&e))
}

/// Writes acknowledgement names, one per line, separated by commas.
pub fn write_acknowledgements<W: Write>(
    writer: &mut W,
    names: &[String],
) -> Result<(), FetchError> {
    writeln!(writer, "{}", names.join(NAME_SEPARATOR)).map_err(|e| io_error(&e))
}

/// Writes the disposition report as CSV with a header row.
pub fn write_disposition_csv<W: Write>(
    writer: &mut W,
    rows: &[DispositionRow],
) -> Result<(), FetchError> {
    writeln!(writer, "{CSV_HEADER}").map_err(|e| io_error(&e))?;
    for row in rows {
        writeln!(writer, "{}", row.to_csv()).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Converts an IO error into a [`FetchError::Io`].
fn io_error(error: &io::Error) -> FetchError {
    FetchError::Io {
        message: error.to_string(),
    }
}
