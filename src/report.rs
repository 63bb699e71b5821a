use crate::error::Result;
use crate::query;
use crate::visits::{self, VisitQueryParameters, VISITS_ENDPOINT};
use std::fmt::Write;

/// Writes the `visit-date-filter` listing: a header naming the scheduled
/// range, the generated URL, then one `key = value` line per parameter.
pub fn write_date_filter_report<W: Write>(
    out: &mut W,
    params: &VisitQueryParameters,
) -> Result<()> {
    let qs = params.to_query_string()?;

    match (params.scheduled_date_from, params.scheduled_date_to) {
        (Some(from), Some(to)) => writeln!(
            out,
            "For date range search from {} to {}:",
            query::format_date(from),
            query::format_date(to)
        )?,
        _ => writeln!(out, "For visits search:")?,
    }
    writeln!(out)?;
    writeln!(out, "Generated URL: {}", visits::endpoint_with(VISITS_ENDPOINT, &qs))?;
    writeln!(out)?;
    writeln!(out, "Query parameters being sent:")?;
    for (key, value) in qs.pairs() {
        writeln!(out, "  {} = {}", key, value)?;
    }
    Ok(())
}

pub fn date_filter_report(params: &VisitQueryParameters) -> Result<String> {
    let mut out = String::new();
    write_date_filter_report(&mut out, params)?;
    Ok(out)
}
