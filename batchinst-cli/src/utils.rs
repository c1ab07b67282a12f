use batchinst_common::Result as CommonResult;
use color_eyre::Result;
use serde::Serialize;
use tabled::{Style, Table, Tabled};

use crate::args::Format;

pub(crate) fn format_output<I, T>(data: I, format: Format) -> Result<String>
where
    I: IntoIterator<Item = T> + Serialize,
    T: Tabled + Serialize,
{
    Ok(match format {
        Format::Table => Table::new(data).with(Style::rounded()).to_string(),
        Format::Json => serde_json::to_string(&data)?,
    })
}

/// Report a failed operation and carry on, unless the error is fatal.
///
/// Returns `Ok(None)` for errors that only abort the current operation.
pub(crate) fn report<T>(result: CommonResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            tracing::error!("{e}");
            Ok(None)
        }
    }
}
