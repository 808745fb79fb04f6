pub mod db;
pub mod gemini;
pub mod oss;
