mod ownership_filter;
mod report_aggregator;
mod scan_report_parser;
mod scan_stream_parser;

pub use ownership_filter::OwnershipFilter;
pub use report_aggregator::ReportAggregator;
pub use scan_report_parser::ScanReportParser;
pub use scan_stream_parser::{OsvEntry, ParsedScan, ScanMessage, ScanStreamParser};
