pub mod health;
pub mod ocr;
pub mod prds;
