use crate::models::{Customer, CustomerField};

pub const CSV_FILE_NAME: &str = "customers.csv";

/// Serializes customers as CSV with a header row.
///
/// Fields containing commas, quotes or newlines are quoted, so a city such
/// as `Helsinki, Finland` stays in one column.
pub fn customers_to_csv(customers: &[Customer]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CustomerField::ALL.iter().map(|field| field.label()))?;
    for customer in customers {
        writer.write_record(CustomerField::ALL.iter().map(|field| customer.field(*field)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
