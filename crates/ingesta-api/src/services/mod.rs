pub mod ingestion;
