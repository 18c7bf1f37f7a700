//! CSV report of a car set: `Id,Model,Year,Brand,Price`, CRLF line endings, UTF-8.
//!
//! Rows keep the order of the input slice.

use crate::app::error::ServiceError;
use crate::domain::model::Car;
use std::io::Write;

pub const REPORT_HEADER: [&str; 5] = ["Id", "Model", "Year", "Brand", "Price"];
pub const REPORT_FILENAME: &str = "report.csv";

fn report_error(err: impl std::fmt::Display) -> ServiceError {
    ServiceError::Report(format!("Failed to generate CSV report: {}", err))
}

/// Whole prices keep one fractional digit (`20000.0`), others print as-is.
fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 {
        format!("{:.1}", price)
    } else {
        price.to_string()
    }
}

pub fn write_report<W: Write>(cars: &[Car], out: W) -> Result<W, ServiceError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);

    writer.write_record(REPORT_HEADER).map_err(report_error)?;
    for car in cars {
        writer
            .write_record([
                car.id.to_string(),
                car.model.clone(),
                car.year.to_string(),
                car.brand_name().to_string(),
                format_price(car.price),
            ])
            .map_err(report_error)?;
    }
    writer.into_inner().map_err(|e| report_error(e.error()))
}

pub fn render(cars: &[Car]) -> Result<Vec<u8>, ServiceError> {
    write_report(cars, Vec::new())
}
