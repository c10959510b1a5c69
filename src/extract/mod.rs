pub mod csv;
pub mod dispatch;
pub mod json;
pub mod xml;

pub use csv::extract_from_csv;
pub use dispatch::{ExtractProgress, Extractor, SourceFormat};
pub use json::extract_from_json;
pub use xml::extract_from_xml;
