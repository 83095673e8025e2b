pub mod listings_exporter;

pub use listings_exporter::{ExportResult, ListingRow, export_to_excel, listing_row};
