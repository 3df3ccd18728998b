pub mod indicator_repository;
pub mod report_repository;
pub mod table_repository;
