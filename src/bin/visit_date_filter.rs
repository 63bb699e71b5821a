use anyhow::Result;
use visit_query::{query, report, VisitQueryParameters};

fn main() -> Result<()> {
    env_logger::init();

    let params = VisitQueryParameters::new(0, 20)
        .with_scheduled_range(query::date(2025, 8, 14)?, query::date(2025, 8, 15)?);

    print!("{}", report::date_filter_report(&params)?);
    Ok(())
}
